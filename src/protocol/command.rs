//! Command and attribute identifiers
//!
//! Stable numeric codes the daemon dispatches on. Groups are spaced by
//! 0x100 so a new request type never renumbers an existing one.

/// Request (command) codes carried in the header's `code` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RequestCode {
    // Producer
    PrdcrAdd = 0x100,
    PrdcrDel = 0x101,
    PrdcrStart = 0x102,
    PrdcrStop = 0x103,
    PrdcrStartRegex = 0x105,
    PrdcrStopRegex = 0x106,

    // Storage policy
    StrgpAdd = 0x200,
    StrgpDel = 0x201,
    StrgpStart = 0x202,
    StrgpStop = 0x203,
    StrgpPrdcrAdd = 0x205,
    StrgpPrdcrDel = 0x206,
    StrgpMetricAdd = 0x207,
    StrgpMetricDel = 0x208,

    // Updater
    UpdtrAdd = 0x300,
    UpdtrDel = 0x301,
    UpdtrStart = 0x302,
    UpdtrStop = 0x303,
    UpdtrPrdcrAdd = 0x305,
    UpdtrPrdcrDel = 0x306,
    UpdtrMatchAdd = 0x307,
    UpdtrMatchDel = 0x308,

    // Plugin
    PlugnStart = 0x500,
    PlugnStop = 0x501,
    PlugnLoad = 0x503,
    PlugnTerm = 0x504,
    PlugnConfig = 0x505,
    PlugnList = 0x506,

    // Daemon
    SetUdata = 0x600,
    SetUdataRegex = 0x601,
    Verbose = 0x602,
    DaemonStatus = 0x603,
    Version = 0x604,
    Env = 0x605,
    Include = 0x606,
    Oneshot = 0x607,
    Logrotate = 0x608,
    ExitDaemon = 0x609,

    /// Returned for verbs that have no table entry
    NotSupported = 0xFFFF_FFFF,
}

impl RequestCode {
    /// Every code with a verb, in numeric order
    pub const ALL: [RequestCode; 38] = [
        RequestCode::PrdcrAdd,
        RequestCode::PrdcrDel,
        RequestCode::PrdcrStart,
        RequestCode::PrdcrStop,
        RequestCode::PrdcrStartRegex,
        RequestCode::PrdcrStopRegex,
        RequestCode::StrgpAdd,
        RequestCode::StrgpDel,
        RequestCode::StrgpStart,
        RequestCode::StrgpStop,
        RequestCode::StrgpPrdcrAdd,
        RequestCode::StrgpPrdcrDel,
        RequestCode::StrgpMetricAdd,
        RequestCode::StrgpMetricDel,
        RequestCode::UpdtrAdd,
        RequestCode::UpdtrDel,
        RequestCode::UpdtrStart,
        RequestCode::UpdtrStop,
        RequestCode::UpdtrPrdcrAdd,
        RequestCode::UpdtrPrdcrDel,
        RequestCode::UpdtrMatchAdd,
        RequestCode::UpdtrMatchDel,
        RequestCode::PlugnStart,
        RequestCode::PlugnStop,
        RequestCode::PlugnLoad,
        RequestCode::PlugnTerm,
        RequestCode::PlugnConfig,
        RequestCode::PlugnList,
        RequestCode::SetUdata,
        RequestCode::SetUdataRegex,
        RequestCode::Verbose,
        RequestCode::DaemonStatus,
        RequestCode::Version,
        RequestCode::Env,
        RequestCode::Include,
        RequestCode::Oneshot,
        RequestCode::Logrotate,
        RequestCode::ExitDaemon,
    ];

    /// Map a raw wire value back to a code
    pub fn from_u32(raw: u32) -> Option<Self> {
        if raw == RequestCode::NotSupported as u32 {
            return Some(RequestCode::NotSupported);
        }
        Self::ALL.iter().copied().find(|code| *code as u32 == raw)
    }

    /// Raw wire value
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Attribute identifiers carried in each real attribute record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AttrId {
    Name = 1,
    Interval = 2,
    Offset = 3,
    Regex = 4,
    Type = 5,
    Producer = 6,
    Instance = 7,
    Xprt = 8,
    Host = 9,
    Port = 10,
    Match = 11,
    Plugin = 12,
    Container = 13,
    Schema = 14,
    Metric = 15,
    /// Generic opaque string (e.g. a plugin's private argument list)
    String = 16,
    Udata = 17,
    Base = 18,
    Increment = 19,
    Level = 20,
    Path = 21,
    Time = 22,
    Push = 23,
}

impl AttrId {
    pub const ALL: [AttrId; 23] = [
        AttrId::Name,
        AttrId::Interval,
        AttrId::Offset,
        AttrId::Regex,
        AttrId::Type,
        AttrId::Producer,
        AttrId::Instance,
        AttrId::Xprt,
        AttrId::Host,
        AttrId::Port,
        AttrId::Match,
        AttrId::Plugin,
        AttrId::Container,
        AttrId::Schema,
        AttrId::Metric,
        AttrId::String,
        AttrId::Udata,
        AttrId::Base,
        AttrId::Increment,
        AttrId::Level,
        AttrId::Path,
        AttrId::Time,
        AttrId::Push,
    ];

    pub fn from_u32(raw: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| *id as u32 == raw)
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}
