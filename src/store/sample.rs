//! Sample definitions
//!
//! Typed metric values handed to a store by the daemon's data path.

use std::fmt;

/// A single typed metric value
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Str(String),
    U8(u8),
    S8(i8),
    U16(u16),
    S16(i16),
    U32(u32),
    S32(i32),
    U64(u64),
    S64(i64),
    F32(f32),
    D64(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Str(v) => write!(f, "{}", v),
            MetricValue::U8(v) => write!(f, "{}", v),
            MetricValue::S8(v) => write!(f, "{}", v),
            MetricValue::U16(v) => write!(f, "{}", v),
            MetricValue::S16(v) => write!(f, "{}", v),
            MetricValue::U32(v) => write!(f, "{}", v),
            MetricValue::S32(v) => write!(f, "{}", v),
            MetricValue::U64(v) => write!(f, "{}", v),
            MetricValue::S64(v) => write!(f, "{}", v),
            // Shortest representation that round-trips
            MetricValue::F32(v) => write!(f, "{}", v),
            MetricValue::D64(v) => write!(f, "{}", v),
        }
    }
}

/// One metric of a sample, paired with the component it came from
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub component_id: u64,
    pub value: MetricValue,
}

/// One transaction of a metric set
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Transaction timestamp, seconds part
    pub sec: u32,

    /// Transaction timestamp, microseconds part
    pub usec: u32,

    /// Name of the producer the set came from
    pub producer: String,

    /// Values in the same order as the metrics the store was opened with
    pub metrics: Vec<MetricSample>,
}

impl Sample {
    /// Format the line written for metric `idx`
    pub(crate) fn line(&self, idx: usize) -> Option<String> {
        self.metrics.get(idx).map(|m| {
            format!(
                "{}.{:06} {} {} {}\n",
                self.sec, self.usec, self.producer, m.component_id, m.value
            )
        })
    }
}
