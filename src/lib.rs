//! # ldmsd-req
//!
//! Control-plane request codec for the metric-collection daemon:
//! - Config-string parsing (`verb key=value ...`) with keyword tables
//! - Length-framed binary request records of TLV attributes
//! - Bounds-checked decoding with environment-variable expansion
//! - A flat-file store as a downstream consumer of decoded samples
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Operator / config file                       │
//! │          "config name=store_flatfile path=/data"             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Config-String Parser                         │
//! │           (keyword tables, packing rules)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────┐
//!   │    Codec    │─────────▶│RequestBuffer │
//!   │   (TLV)     │          │  (doubling)  │
//!   └─────────────┘          └──────┬───────┘
//!                                   │  transport
//!                                   ▼
//!                           ┌──────────────┐
//!                           │ Value Access │──▶ FlatfileStore
//!                           └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ReqError, Result};
pub use config::Config;
pub use protocol::{build_request, decode_request, AttrId, AttrList, EncodedRequest, RequestCode};

// =============================================================================
// Version Info
// =============================================================================

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
