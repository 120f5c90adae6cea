//! Flat-file store
//!
//! Registry of open store instances (one per schema), each fanning a sample
//! out to one file per metric.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::Config;
use crate::error::{ReqError, Result};
use crate::protocol::AttrList;

use super::Sample;

const USAGE: &str = concat!(
    "    config name=store_flatfile path=<path>\n",
    "              - Set the root path for the storage of flatfiles.\n",
    "              path      The path to the root of the flatfile directory\n",
);

/// One metric's output file
#[derive(Debug)]
struct MetricFile {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl MetricFile {
    fn open(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

/// An open store for one (container, schema) pair
#[derive(Debug)]
pub struct StoreInstance {
    /// {root}/{container}/{schema}
    path: PathBuf,
    schema: String,

    /// Output file for each metric position (duplicates share a file)
    metrics: Vec<Arc<MetricFile>>,

    /// Each distinct file once, for flushing
    files: Vec<Arc<MetricFile>>,
}

impl StoreInstance {
    /// Append one line per metric of `sample`.
    ///
    /// Every metric is attempted; if any write fails the last error is
    /// returned after the rest have been written.
    pub fn store(&self, sample: &Sample) -> Result<()> {
        if sample.metrics.len() != self.metrics.len() {
            return Err(ReqError::InvalidArgument(format!(
                "sample has {} metrics, store '{}' expects {}",
                sample.metrics.len(),
                self.schema,
                self.metrics.len()
            )));
        }

        let mut last_err = None;
        for (idx, metric) in self.metrics.iter().enumerate() {
            let Some(line) = sample.line(idx) else {
                continue;
            };
            let mut writer = metric.writer.lock();
            if let Err(e) = writer.write_all(line.as_bytes()) {
                tracing::error!("Error writing {}: {}", metric.path.display(), e);
                last_err = Some(e);
            }
        }

        match last_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Flush every metric file
    pub fn flush(&self) -> Result<()> {
        let mut last_err = None;
        for file in &self.files {
            if let Err(e) = file.writer.lock().flush() {
                tracing::error!("Error flushing {}: {}", file.path.display(), e);
                last_err = Some(e);
            }
        }
        match last_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Number of distinct metric files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Output file path for metric position `idx`
    pub fn metric_path(&self, idx: usize) -> Option<&Path> {
        self.metrics.get(idx).map(|m| m.path.as_path())
    }
}

/// Flat-file store plugin state
///
/// ## Concurrency:
/// - `root`: RwLock, replaced by `configure`
/// - `instances`: Mutex held for the whole of open/close
/// - per-metric Mutex inside each instance for writes
#[derive(Debug, Default)]
pub struct FlatfileStore {
    root: RwLock<Option<PathBuf>>,
    instances: Mutex<HashMap<String, Arc<StoreInstance>>>,
}

impl FlatfileStore {
    /// Create an unconfigured store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store rooted at `config.store_root`, if set
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: RwLock::new(config.store_root.clone()),
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Apply a decoded `config name=store_flatfile path=...` request
    pub fn configure(&self, attrs: &AttrList<'_>) -> Result<()> {
        let args = attrs.plugin_args()?;
        let path = args
            .iter()
            .find(|(k, _)| k == "path")
            .map(|(_, v)| v.clone())
            .ok_or_else(|| {
                ReqError::InvalidArgument("store_flatfile: 'path' is required".to_string())
            })?;
        self.set_root(path);
        Ok(())
    }

    /// Set the root directory directly
    pub fn set_root(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        tracing::info!("flatfile store root set to {}", path.display());
        *self.root.write() = Some(path);
    }

    pub fn root(&self) -> Option<PathBuf> {
        self.root.read().clone()
    }

    pub fn usage(&self) -> &'static str {
        USAGE
    }

    /// Open (or return the already open) store for `schema`.
    ///
    /// Metric names are cut at the first `#`; metrics that end up with the
    /// same name share one file.
    pub fn open_store(
        &self,
        container: &str,
        schema: &str,
        metrics: &[&str],
    ) -> Result<Arc<StoreInstance>> {
        let mut instances = self.instances.lock();
        if let Some(existing) = instances.get(schema) {
            return Ok(Arc::clone(existing));
        }

        let root = self
            .root()
            .ok_or_else(|| ReqError::Config("flatfile store root is not configured".to_string()))?;
        let path = root.join(container).join(schema);
        fs::create_dir_all(&path)?;

        let mut by_name: HashMap<&str, Arc<MetricFile>> = HashMap::new();
        let mut files = Vec::new();
        let mut per_metric = Vec::with_capacity(metrics.len());

        for &full_name in metrics {
            let name = match full_name.find('#') {
                Some(idx) => &full_name[..idx],
                None => full_name,
            };
            if let Some(file) = by_name.get(name) {
                per_metric.push(Arc::clone(file));
                continue;
            }

            let file = Arc::new(MetricFile::open(path.join(name)).map_err(|e| {
                tracing::error!("Error opening {}: {}", path.join(name).display(), e);
                e
            })?);
            by_name.insert(name, Arc::clone(&file));
            files.push(Arc::clone(&file));
            per_metric.push(file);
        }

        let instance = Arc::new(StoreInstance {
            path,
            schema: schema.to_string(),
            metrics: per_metric,
            files,
        });
        instances.insert(schema.to_string(), Arc::clone(&instance));

        tracing::debug!(
            "opened flatfile store '{}' with {} files",
            schema,
            instance.files.len()
        );
        Ok(instance)
    }

    /// Flush and forget the store. Files close when the last handle drops.
    pub fn close(&self, instance: &StoreInstance) -> Result<()> {
        self.instances.lock().remove(&instance.schema);
        instance.flush()
    }

    /// Number of open store instances
    pub fn open_count(&self) -> usize {
        self.instances.lock().len()
    }
}
