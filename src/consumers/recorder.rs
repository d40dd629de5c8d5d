use chrono::Utc;
use log::{error, info};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::core::{Receiver, Sample};
use crate::error::{GestureError, Result};

/// Saves every received sample as a file in `target_dir`
pub struct FileRecorder {
    target_dir: PathBuf,
    max_tries: usize,
    forced_gesture_id: Option<String>,
    saved: Vec<PathBuf>,
}

impl FileRecorder {
    pub const DEFAULT_MAX_TRIES: usize = 5;

    pub fn new(target_dir: impl Into<PathBuf>) -> Result<Self> {
        let target_dir = target_dir.into();
        if !target_dir.is_dir() {
            return Err(GestureError::InvalidConfig(format!(
                "{} is not a directory",
                target_dir.display()
            )));
        }
        Ok(Self {
            target_dir,
            max_tries: Self::DEFAULT_MAX_TRIES,
            forced_gesture_id: None,
            saved: Vec::new(),
        })
    }

    pub fn with_max_tries(mut self, max_tries: usize) -> Self {
        self.max_tries = max_tries;
        self
    }

    /// Label every saved sample with `gesture_id`, whatever it carried before
    pub fn with_forced_gesture_id(mut self, gesture_id: impl Into<String>) -> Self {
        self.forced_gesture_id = Some(gesture_id.into());
        self
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Paths written so far, oldest first
    pub fn saved_files(&self) -> &[PathBuf] {
        &self.saved
    }

    /// Write `sample` under a fresh `{gesture_id}_{timestamp}_{random}.txt` name
    pub fn save_sample(&mut self, mut sample: Sample) -> Result<PathBuf> {
        if let Some(forced) = &self.forced_gesture_id {
            sample.gesture_id = Some(forced.clone());
        }
        let gesture_id = sample
            .gesture_id
            .as_deref()
            .ok_or(GestureError::MissingGestureId)?;

        for _ in 0..self.max_tries {
            let path = self.target_dir.join(file_name(gesture_id));
            if path.exists() {
                continue;
            }
            sample.save_to_file(&path)?;
            info!("sample saved to {}", path.display());
            self.saved.push(path.clone());
            return Ok(path);
        }

        Err(GestureError::FilenameConflict(self.max_tries))
    }
}

fn file_name(gesture_id: &str) -> String {
    let random: String = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("{}_{}_{}.txt", gesture_id, Utc::now().timestamp(), random)
}

impl Receiver for FileRecorder {
    fn receive(&mut self, sample: Sample) {
        if let Err(e) = self.save_sample(sample) {
            error!("failed to record sample: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_shape() {
        let name = file_name("tap");
        let parts: Vec<&str> = name.trim_end_matches(".txt").split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "tap");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 6);
        assert_eq!(parts[2], parts[2].to_uppercase());
    }

    #[test]
    fn test_missing_directory_rejected() {
        assert!(FileRecorder::new("/definitely/not/here").is_err());
    }
}
