//! Load-once sources for the dataset and the model artifact
//!
//! The first `load` runs the loader, every later call returns the cached
//! value. A failed load is cached as absence too, only a restart reloads.

use crate::valuation::dataset::load_dataset;
use crate::valuation::model::{LinearPipeline, PredictiveModel};
use crate::valuation::types::HistoricalDataset;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

struct Cached<T: ?Sized> {
    kind: &'static str,
    location: PathBuf,
    loader: Box<dyn Fn() -> Result<Arc<T>> + Send + Sync>,
    cell: OnceLock<Option<Arc<T>>>,
}

impl<T: ?Sized> Cached<T> {
    fn new(
        kind: &'static str,
        location: PathBuf,
        loader: Box<dyn Fn() -> Result<Arc<T>> + Send + Sync>,
    ) -> Self {
        Cached {
            kind,
            location,
            loader,
            cell: OnceLock::new(),
        }
    }

    fn load(&self) -> Option<Arc<T>> {
        self.cell
            .get_or_init(|| match (self.loader)() {
                Ok(value) => {
                    info!("Loaded {} from {:?}", self.kind, self.location);
                    Some(value)
                }
                Err(e) => {
                    warn!("{} unavailable at {:?}: {:#}", self.kind, self.location, e);
                    None
                }
            })
            .clone()
    }

    fn file_name(&self) -> String {
        self.location
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.location.display().to_string())
    }
}

/// Historical dataset, read once per session
pub struct DatasetSource(Cached<HistoricalDataset>);

impl DatasetSource {
    /// Source backed by a CSV or workbook file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = path.clone();
        Self::from_loader(path, move || Ok(Arc::new(load_dataset(&file)?)))
    }

    /// Source backed by an arbitrary loader
    pub fn from_loader<F>(location: impl Into<PathBuf>, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<HistoricalDataset>> + Send + Sync + 'static,
    {
        DatasetSource(Cached::new("dataset", location.into(), Box::new(loader)))
    }

    /// The cached dataset, or `None` when it could not be read
    pub fn load(&self) -> Option<Arc<HistoricalDataset>> {
        self.0.load()
    }

    pub fn location(&self) -> &Path {
        &self.0.location
    }

    pub fn file_name(&self) -> String {
        self.0.file_name()
    }
}

/// Pre-fitted model artifact, deserialized once per session
pub struct ModelSource(Cached<dyn PredictiveModel>);

impl ModelSource {
    /// Source backed by a JSON pipeline artifact
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = path.clone();
        Self::from_loader(path, move || {
            let model: Arc<dyn PredictiveModel> = Arc::new(LinearPipeline::from_path(&file)?);
            Ok(model)
        })
    }

    pub fn from_loader<F>(location: impl Into<PathBuf>, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn PredictiveModel>> + Send + Sync + 'static,
    {
        ModelSource(Cached::new("model", location.into(), Box::new(loader)))
    }

    /// The cached model, or `None` when the artifact could not be read
    pub fn load(&self) -> Option<Arc<dyn PredictiveModel>> {
        self.0.load()
    }

    pub fn location(&self) -> &Path {
        &self.0.location
    }

    pub fn file_name(&self) -> String {
        self.0.file_name()
    }
}
