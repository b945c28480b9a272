//! Sound sinks
//!
//! The session fires named cues at a sink and never waits on it. A sink must
//! swallow its own failures.

use std::sync::Mutex;

use tracing::trace;

use crate::types::SoundCue;

/// Fire-and-forget playback of named cues
pub trait SoundSink: Send + Sync {
    fn play(&self, cue: SoundCue);
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&self, _cue: SoundCue) {}
}

/// Logs cues at trace level
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceSink;

impl SoundSink for TraceSink {
    fn play(&self, cue: SoundCue) {
        trace!(?cue, "sound");
    }
}

/// Keeps every cue in order; handy for tests and replays
#[derive(Debug, Default)]
pub struct RecordingSink {
    cues: Mutex<Vec<SoundCue>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the cues played so far
    pub fn cues(&self) -> Vec<SoundCue> {
        match self.cues.lock() {
            Ok(cues) => cues.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drain the recorded cues
    pub fn take(&self) -> Vec<SoundCue> {
        match self.cues.lock() {
            Ok(mut cues) => std::mem::take(&mut *cues),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl SoundSink for RecordingSink {
    fn play(&self, cue: SoundCue) {
        match self.cues.lock() {
            Ok(mut cues) => cues.push(cue),
            Err(poisoned) => poisoned.into_inner().push(cue),
        }
    }
}
