//! Optional action-history recording.
//!
//! When recording is enabled the environment notifies an injected
//! [`ActionRecorder`] with every controller frame it applies: one entry per
//! tick, per slot that acted, in order. Timed-out agents are recorded too —
//! the substituted no-op frame is what the simulation actually received, so
//! the persisted history replays the match exactly.
//!
//! The recorder is an observer passed in at setup; there is no global state
//! and the environment works identically without one.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use crate::controller::ControllerFrame;

/// Observer for applied controller frames.
pub trait ActionRecorder {
    /// Called once per applied frame, in tick order per slot.
    fn record(&mut self, slot: u8, frame: &ControllerFrame);

    /// Persist what was recorded. Called by the environment on close.
    fn flush(&mut self) -> anyhow::Result<()>;
}

/// Records per-slot frame histories and writes them to a JSON file on flush.
#[derive(Debug)]
pub struct JsonActionRecorder {
    path: PathBuf,
    history: BTreeMap<u8, Vec<ControllerFrame>>,
}

impl JsonActionRecorder {
    /// A recorder that will write to `path` when flushed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonActionRecorder {
            path: path.into(),
            history: BTreeMap::new(),
        }
    }

    /// Number of frames recorded for a slot so far.
    pub fn recorded(&self, slot: u8) -> usize {
        self.history.get(&slot).map_or(0, Vec::len)
    }
}

impl ActionRecorder for JsonActionRecorder {
    fn record(&mut self, slot: u8, frame: &ControllerFrame) {
        self.history.entry(slot).or_default().push(*frame);
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("could not create {}", self.path.display()))?;
        serde_json::to_writer(BufWriter::new(file), &self.history)
            .context("could not serialize action history")?;
        info!(path = %self.path.display(), "action history saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_per_slot_order() {
        let mut recorder = JsonActionRecorder::new("unused.json");
        let neutral = ControllerFrame::neutral();
        let mut attack = ControllerFrame::neutral();
        attack.button_a = true;

        recorder.record(1, &neutral);
        recorder.record(2, &attack);
        recorder.record(1, &attack);

        assert_eq!(recorder.recorded(1), 2);
        assert_eq!(recorder.recorded(2), 1);
        assert_eq!(recorder.history[&1], vec![neutral, attack]);
    }

    #[test]
    fn flush_writes_parseable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut recorder = JsonActionRecorder::new(&path);
        recorder.record(1, &ControllerFrame::neutral());
        recorder.flush().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<u8, Vec<ControllerFrame>> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[&1], vec![ControllerFrame::neutral()]);
    }
}
