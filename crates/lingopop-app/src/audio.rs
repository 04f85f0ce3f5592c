use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use lingopop_types::MediaRef;

/// Plays a synthesized clip
pub trait AudioSink: Send + Sync {
    fn play(&self, clip: &MediaRef) -> anyhow::Result<String>;
}

/// Writes each clip under `<data_dir>/audio` and reports the path
pub struct FileAudioSink {
    dir: PathBuf,
    counter: AtomicU64,
}

impl FileAudioSink {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join("audio"),
            counter: AtomicU64::new(0),
        }
    }
}

impl AudioSink for FileAudioSink {
    fn play(&self, clip: &MediaRef) -> anyhow::Result<String> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;

        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!("clip-{n}.{}", clip.extension()));
        fs::write(&path, &clip.data).with_context(|| format!("writing {}", path.display()))?;

        tracing::info!("Audio clip written to {}", path.display());
        Ok(format!("🔊 Audio ready: {}", path.display()))
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Loading,
    Ready(MediaRef),
}

/// What to do with a play request
#[derive(Debug, Clone, PartialEq)]
pub enum PlayPlan {
    /// Clip already synthesized
    Replay(MediaRef),
    /// Start a request tagged with this generation
    Fetch(u64),
    /// Same text already in flight
    Skip,
}

/// Synthesized clips for the displayed entry, keyed by text
#[derive(Debug, Default)]
pub struct AudioCache {
    slots: HashMap<String, Slot>,
    generation: u64,
}

impl AudioCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&mut self, text: &str) -> PlayPlan {
        match self.slots.get(text) {
            Some(Slot::Ready(clip)) => PlayPlan::Replay(clip.clone()),
            Some(Slot::Loading) => PlayPlan::Skip,
            None => {
                self.slots.insert(text.to_string(), Slot::Loading);
                PlayPlan::Fetch(self.generation)
            }
        }
    }

    /// Record a finished request. Returns false when the cache was cleared
    /// since the request started.
    pub fn finish(&mut self, generation: u64, text: &str, clip: Option<&MediaRef>) -> bool {
        if generation != self.generation {
            return false;
        }
        match clip {
            Some(clip) => {
                self.slots.insert(text.to_string(), Slot::Ready(clip.clone()));
            }
            None => {
                self.slots.remove(text);
            }
        }
        true
    }

    /// Drop every clip, used when the current entry changes
    pub fn clear(&mut self) {
        self.slots.clear();
        self.generation += 1;
    }
}
