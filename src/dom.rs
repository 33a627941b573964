//! Value-tree model of the watched subtree.
//!
//! The engine never queries a live DOM. The host mirrors the watched region
//! into this tree and hands the current version over through [`DomSource`]
//! whenever a pass runs, which keeps extraction a pure function of one value.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomNode {
    pub tag: String,
    attrs: HashMap<String, String>,
    text: String,
    children: Vec<DomNode>,
}

impl DomNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn push_child(&mut self, child: DomNode) {
        self.children.push(child);
    }

    /// Attribute lookup. Absence is `None`, never a panic or empty default;
    /// callers decide what a missing attribute degrades to.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|raw| raw.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// First descendant matching the predicate, mutable, depth-first.
    pub fn find_descendant_mut<F>(&mut self, pred: F) -> Option<&mut DomNode>
    where
        F: Fn(&DomNode) -> bool + Copy,
    {
        for child in &mut self.children {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant_mut(pred) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants in document order (pre-order, self excluded).
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Rendered text of the subtree: every node's own text in document order,
    /// non-empty pieces joined by single spaces.
    pub fn inner_text(&self) -> String {
        let mut pieces = Vec::new();
        if !self.text.is_empty() {
            pieces.push(self.text.as_str());
        }
        pieces.extend(self.descendants().map(|n| n.text.as_str()).filter(|t| !t.is_empty()));
        pieces.join(" ")
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a DomNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a DomNode;

    fn next(&mut self) -> Option<&'a DomNode> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// The host's view of the watched subtree at this instant.
///
/// Returning `None` means the watched region is absent from the page.
pub trait DomSource: Send + Sync {
    fn root(&self) -> Option<DomNode>;
}

/// Shared mutable tree for embedders that mirror the page incrementally.
/// Also what the tests and the demo binary mutate between passes.
#[derive(Clone, Default)]
pub struct SharedDom {
    inner: Arc<RwLock<Option<DomNode>>>,
}

impl SharedDom {
    pub fn new(root: Option<DomNode>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(root)),
        }
    }

    pub fn replace(&self, root: Option<DomNode>) {
        *self.inner.write().unwrap() = root;
    }

    /// Mutate the tree in place; a no-op when the region is absent.
    pub fn update<F: FnOnce(&mut DomNode)>(&self, mutate: F) {
        if let Some(root) = self.inner.write().unwrap().as_mut() {
            mutate(root);
        }
    }
}

impl DomSource for SharedDom {
    fn root(&self) -> Option<DomNode> {
        self.inner.read().unwrap().clone()
    }
}
