//! Notification sound cue.
//!
//! Playback runs on a dedicated named thread because the rodio output stream
//! is not `Send`; the handle just posts play commands into it. Any audio
//! failure is logged and swallowed, notifications stay visual-only.

use std::f32::consts::PI;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::warn;
use rodio::{OutputStream, Sink, Source};

const SAMPLE_RATE: u32 = 44100;
const CHIME_MS: u64 = 350;

enum CueCommand {
    Play,
}

/// Short generated two-tone chime, mono, finite.
struct Chime {
    num_sample: usize,
    total_samples: usize,
}

impl Chime {
    fn new() -> Self {
        Self {
            num_sample: 0,
            total_samples: (SAMPLE_RATE as u64 * CHIME_MS / 1000) as usize,
        }
    }
}

impl Iterator for Chime {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.num_sample >= self.total_samples {
            return None;
        }
        self.num_sample += 1;

        let t = self.num_sample as f32 / SAMPLE_RATE as f32;
        // A5 for the first half, then up a fifth-and-octave to E6.
        let freq = if self.num_sample < self.total_samples / 2 {
            880.0
        } else {
            1318.5
        };
        // Linear fade-out to avoid a click at the end.
        let fade = 1.0 - self.num_sample as f32 / self.total_samples as f32;

        Some((2.0 * PI * freq * t).sin() * 0.2 * fade)
    }
}

impl Source for Chime {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.num_sample)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(CHIME_MS))
    }
}

/// Handle to the audio thread; `play` is fire-and-forget.
#[derive(Clone, Default)]
pub struct NotificationCue {
    tx: Arc<Mutex<Option<Sender<CueCommand>>>>,
}

impl NotificationCue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&self) {
        match self.ensure_thread() {
            Ok(tx) => {
                let _ = tx.send(CueCommand::Play);
            }
            Err(err) => warn!("sound cue unavailable: {err}"),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<CueCommand>, String> {
        let mut guard = self.tx.lock().map_err(|e| e.to_string())?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<CueCommand>();

        // The thread owns the non-Send output stream for its whole lifetime.
        thread::Builder::new()
            .name("notification-cue".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                while let Ok(CueCommand::Play) = rx.recv() {
                    if sink.is_none() {
                        match OutputStream::try_default() {
                            Ok((stream, handle)) => match Sink::try_new(&handle) {
                                Ok(new_sink) => {
                                    _stream = Some(stream);
                                    sink = Some(new_sink);
                                }
                                Err(err) => {
                                    warn!("could not create audio sink: {err}");
                                    continue;
                                }
                            },
                            Err(err) => {
                                warn!("could not open audio output: {err}");
                                continue;
                            }
                        }
                    }

                    if let Some(sink) = sink.as_ref() {
                        sink.append(Chime::new());
                    }
                }
            })
            .map_err(|e| e.to_string())?;

        *guard = Some(tx.clone());
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chime_is_finite_and_bounded() {
        let samples: Vec<f32> = Chime::new().collect();
        assert_eq!(samples.len(), (SAMPLE_RATE as u64 * CHIME_MS / 1000) as usize);
        assert!(samples.iter().all(|s| s.abs() <= 0.2));
    }
}
