use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::cache::DatasetCache;
use crate::data::model::Dataset;
use crate::view::{Chart, View, ViewError};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Parsed datasets by path.
    pub cache: DatasetCache,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    /// Where `dataset` came from.
    pub source: Option<PathBuf>,

    /// Selected navigation entry.
    pub view: View,

    /// Prepared chart (or the reason there is none) for `view` (cached).
    pub chart: Option<Result<Chart, ViewError>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load `path` through the cache and make it the current dataset.
    pub fn open(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(dataset) => self.set_dataset(path, dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a dataset and rebuild the current chart.
    pub fn set_dataset(&mut self, path: &Path, dataset: Arc<Dataset>) {
        self.dataset = Some(dataset);
        self.source = Some(path.to_path_buf());
        self.status_message = None;
        self.refresh();
    }

    pub fn select_view(&mut self, view: View) {
        if self.view != view || self.chart.is_none() {
            self.view = view;
            self.refresh();
        }
    }

    /// Recompute `chart` after the view or dataset changed.
    fn refresh(&mut self) {
        self.chart = self.dataset.as_ref().map(|ds| {
            let result = self.view.prepare(ds);
            if let Err(e) = &result {
                log::warn!("{} unavailable: {e}", self.view);
            }
            result
        });
    }
}
