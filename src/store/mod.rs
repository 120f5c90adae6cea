//! Store Module
//!
//! Flat-file persistence for decoded metric samples: one append-only text
//! file per metric.
//!
//! ## Directory Layout
//! ```text
//! {root}/
//!   └── {container}/
//!         └── {schema}/
//!               ├── {metric_a}     "<sec>.<usec> <producer> <comp_id> <value>\n" ...
//!               └── {metric_b}
//! ```
//!
//! ## Concurrency
//! - The root path sits behind an RwLock (reconfigurable at runtime)
//! - The instance registry sits behind a Mutex (open/close only)
//! - Each metric file has its own Mutex, so writers to different metrics
//!   never contend

mod flatfile;
mod sample;

pub use flatfile::{FlatfileStore, StoreInstance};
pub use sample::{MetricSample, MetricValue, Sample};
