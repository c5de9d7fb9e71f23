use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use super::loader::load_file;
use super::model::Dataset;

/// Process-local memo of loaded datasets, keyed by path.
///
/// A dataset is read once per session; re-opening the same path hands back
/// the already parsed table. Failed loads are not remembered.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>> {
        if let Some(ds) = self.entries.get(path) {
            log::debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(ds));
        }
        let ds = Arc::new(load_file(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&ds));
        Ok(ds)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn second_load_is_served_from_memory() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("whr.csv");
        fs::write(&path, "Country name,Ladder score\nFinland,7.8\n").expect("write csv");

        let mut cache = DatasetCache::default();
        let first = cache.get_or_load(&path).expect("first load");
        fs::remove_file(&path).expect("remove csv");
        let second = cache.get_or_load(&path).expect("cached load");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.entries.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("late.csv");

        let mut cache = DatasetCache::default();
        assert!(cache.get_or_load(&path).is_err());
        assert_eq!(cache.entries.len(), 0);

        fs::write(&path, "country,happiness_score\nChile,6.3\n").expect("write csv");
        let ds = cache.get_or_load(&path).expect("load after write");
        assert_eq!(ds.len(), 1);
    }
}
