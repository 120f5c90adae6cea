//! Protocol Module
//!
//! Encodes textual configuration commands into binary request records and
//! reads attribute values back out of received records.
//!
//! ## Data Flow
//! ```text
//!  "prdcr_add name=p1 host=node1 port=411"
//!          │
//!          ▼
//!  ┌───────────────┐  verb/attr lookup  ┌───────────────┐
//!  │    parser     │ ─────────────────▶ │   keywords    │
//!  └───────┬───────┘                    └───────────────┘
//!          │ append_attribute / append_terminator
//!          ▼
//!  ┌───────────────┐
//!  │     codec     │ ──▶ RequestBuffer (doubling growth)
//!  └───────┬───────┘
//!          ▼
//!   EncodedRequest ──▶ transport ──▶ AttrList::get_by_name("host")
//! ```
//!
//! ## Request Format
//! ```text
//! ┌────────────┬──────────┬────────────┬───────────────────────────┐
//! │ Marker (4) │ Code (4) │ RecLen (4) │ Attr ... Attr │ End (4)   │
//! └────────────┴──────────┴────────────┴───────────────────────────┘
//! ```

mod command;
mod keywords;
mod buffer;
mod codec;
mod parser;
mod env;
mod interval;
mod accessor;

pub use command::{AttrId, RequestCode};
pub use keywords::{
    attribute_name, command_name, resolve_attribute, resolve_command, KeywordTable, ATTRIBUTES,
    COMMANDS,
};
pub use buffer::RequestBuffer;
pub use codec::{
    append_attribute, append_terminator, decode_request, decode_request_with_limit,
    read_request, write_request, AttrIter, AttrList, Attribute, DecodedRequest, EncodedRequest,
    RequestHeader, ATTR_HEADER_SIZE, HEADER_SIZE, MAX_RECORD_SIZE, RECORD_MARKER,
    TERMINATOR_SIZE,
};
pub use parser::{
    build_request, build_request_into, build_request_with, format_command, parse_attr_tokens,
};
pub use env::{expand_env_vars, EnvLookup, ProcessEnv};
pub use interval::parse_interval;
pub use accessor::{get_by_id, get_by_name};
