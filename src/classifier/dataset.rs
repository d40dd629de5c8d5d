use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Sample, Stage};
use crate::error::Result;

/// Load every `*.txt` sample in `dir`, ordered by file name
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<Sample>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("txt"))
        .collect();
    paths.sort();

    let samples = paths
        .iter()
        .map(Sample::load_from_file)
        .collect::<Result<Vec<_>>>()?;
    debug!("loaded {} samples from {}", samples.len(), dir.as_ref().display());
    Ok(samples)
}

/// Run every sample through `stage`, keeping those it forwards
pub fn preprocess(samples: Vec<Sample>, stage: &mut dyn Stage) -> Vec<Sample> {
    samples
        .into_iter()
        .filter_map(|sample| stage.process(sample))
        .collect()
}

/// Number of samples per gesture id; unlabeled samples are skipped
pub fn count_by_gesture(samples: &[Sample]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for id in samples.iter().filter_map(|s| s.gesture_id.as_ref()) {
        *counts.entry(id.clone()).or_insert(0) += 1;
    }
    counts
}
