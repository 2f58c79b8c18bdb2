//! Per-request temp file namespace
//!
//! A [`Session`] owns the three file slots of one pipeline run. Every path is
//! prefixed with the session id so concurrent runs never share a file.

use std::path::{Path, PathBuf};

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: Uuid,
    voice_path: PathBuf,
    background_path: PathBuf,
    output_path: PathBuf,
}

impl Session {
    /// Creates a fresh session rooted at `work_dir`. No file is touched.
    pub fn new(work_dir: &Path) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            voice_path: work_dir.join(format!("{}_voice.mp3", id)),
            background_path: work_dir.join(format!("{}_bg.mp3", id)),
            output_path: work_dir.join(format!("{}_mixed.mp3", id)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn voice_path(&self) -> &Path {
        &self.voice_path
    }

    pub fn background_path(&self) -> &Path {
        &self.background_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// All slots, in creation order.
    pub fn slots(&self) -> [&Path; 3] {
        [&self.voice_path, &self.background_path, &self.output_path]
    }
}
