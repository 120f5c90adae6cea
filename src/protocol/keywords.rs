//! Keyword tables
//!
//! Static, lexicographically sorted (keyword, id) tables for command verbs
//! and attribute names. Lookups are byte-wise binary searches: no hashing,
//! no allocation.

use crate::error::{ReqError, Result};
use super::{AttrId, RequestCode};

/// A sorted (keyword, id) table
#[derive(Debug)]
pub struct KeywordTable<T: 'static> {
    entries: &'static [(&'static str, T)],
}

impl<T: Copy + 'static> KeywordTable<T> {
    /// Wrap a static entry list. Entries must be sorted by keyword.
    pub const fn new(entries: &'static [(&'static str, T)]) -> Self {
        Self { entries }
    }

    /// Binary search for `keyword`
    pub fn lookup(&self, keyword: &str) -> Option<T> {
        self.entries
            .binary_search_by(|(k, _)| k.as_bytes().cmp(keyword.as_bytes()))
            .ok()
            .map(|idx| self.entries[idx].1)
    }

    /// True if keywords are strictly ascending (sorted, no duplicates)
    pub fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].0.as_bytes() < pair[1].0.as_bytes())
    }

    /// All (keyword, id) pairs in table order
    pub fn entries(&self) -> &'static [(&'static str, T)] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tables
// =============================================================================

/// Command verbs. Keep sorted by keyword.
pub static COMMANDS: KeywordTable<RequestCode> = KeywordTable::new(&[
    ("config", RequestCode::PlugnConfig),
    ("daemon", RequestCode::DaemonStatus),
    ("env", RequestCode::Env),
    ("exit", RequestCode::ExitDaemon),
    ("include", RequestCode::Include),
    ("load", RequestCode::PlugnLoad),
    ("loglevel", RequestCode::Verbose),
    ("logrotate", RequestCode::Logrotate),
    ("oneshot", RequestCode::Oneshot),
    ("prdcr_add", RequestCode::PrdcrAdd),
    ("prdcr_del", RequestCode::PrdcrDel),
    ("prdcr_start", RequestCode::PrdcrStart),
    ("prdcr_start_regex", RequestCode::PrdcrStartRegex),
    ("prdcr_stop", RequestCode::PrdcrStop),
    ("prdcr_stop_regex", RequestCode::PrdcrStopRegex),
    ("start", RequestCode::PlugnStart),
    ("stop", RequestCode::PlugnStop),
    ("strgp_add", RequestCode::StrgpAdd),
    ("strgp_del", RequestCode::StrgpDel),
    ("strgp_metric_add", RequestCode::StrgpMetricAdd),
    ("strgp_metric_del", RequestCode::StrgpMetricDel),
    ("strgp_prdcr_add", RequestCode::StrgpPrdcrAdd),
    ("strgp_prdcr_del", RequestCode::StrgpPrdcrDel),
    ("strgp_start", RequestCode::StrgpStart),
    ("strgp_stop", RequestCode::StrgpStop),
    ("term", RequestCode::PlugnTerm),
    ("udata", RequestCode::SetUdata),
    ("udata_regex", RequestCode::SetUdataRegex),
    ("updtr_add", RequestCode::UpdtrAdd),
    ("updtr_del", RequestCode::UpdtrDel),
    ("updtr_match_add", RequestCode::UpdtrMatchAdd),
    ("updtr_match_del", RequestCode::UpdtrMatchDel),
    ("updtr_prdcr_add", RequestCode::UpdtrPrdcrAdd),
    ("updtr_prdcr_del", RequestCode::UpdtrPrdcrDel),
    ("updtr_start", RequestCode::UpdtrStart),
    ("updtr_stop", RequestCode::UpdtrStop),
    ("usage", RequestCode::PlugnList),
    ("version", RequestCode::Version),
]);

/// Attribute names. Keep sorted by keyword.
pub static ATTRIBUTES: KeywordTable<AttrId> = KeywordTable::new(&[
    ("base", AttrId::Base),
    ("container", AttrId::Container),
    ("host", AttrId::Host),
    ("incr", AttrId::Increment),
    ("instance", AttrId::Instance),
    ("interval", AttrId::Interval),
    ("level", AttrId::Level),
    ("match", AttrId::Match),
    ("metric", AttrId::Metric),
    ("name", AttrId::Name),
    ("offset", AttrId::Offset),
    ("path", AttrId::Path),
    ("plugin", AttrId::Plugin),
    ("port", AttrId::Port),
    ("producer", AttrId::Producer),
    ("push", AttrId::Push),
    ("regex", AttrId::Regex),
    ("schema", AttrId::Schema),
    ("string", AttrId::String),
    ("time", AttrId::Time),
    ("type", AttrId::Type),
    ("udata", AttrId::Udata),
    ("xprt", AttrId::Xprt),
]);

// =============================================================================
// Lookups
// =============================================================================

/// Resolve a command verb.
///
/// Unknown verbs map to [`RequestCode::NotSupported`] so the caller decides
/// whether that is fatal.
pub fn resolve_command(verb: &str) -> RequestCode {
    COMMANDS.lookup(verb).unwrap_or(RequestCode::NotSupported)
}

/// Resolve an attribute name, failing with `NotFound` for unknown names
pub fn resolve_attribute(name: &str) -> Result<AttrId> {
    ATTRIBUTES
        .lookup(name)
        .ok_or_else(|| ReqError::NotFound(name.to_string()))
}

/// Verb for a command code (reverse lookup, linear)
pub fn command_name(code: RequestCode) -> Option<&'static str> {
    COMMANDS
        .entries()
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(k, _)| *k)
}

/// Attribute name for an id (reverse lookup, linear)
pub fn attribute_name(id: AttrId) -> &'static str {
    ATTRIBUTES
        .entries()
        .iter()
        .find(|(_, a)| *a == id)
        .map(|(k, _)| *k)
        // Every AttrId has exactly one table entry
        .unwrap_or("unknown")
}
