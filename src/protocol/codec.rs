//! Request codec
//!
//! Encoding of attribute records into a [`RequestBuffer`] and bounds-checked
//! decoding of received records.
//!
//! ## Wire Format
//!
//! All fields are big-endian.
//!
//! ### Request Record
//! ```text
//! ┌────────────┬──────────┬────────────┬──────────────────────────┐
//! │ Marker (4) │ Code (4) │ RecLen (4) │ Attribute list           │
//! └────────────┴──────────┴────────────┴──────────────────────────┘
//! ```
//!
//! ### Attribute Record
//! ```text
//! real:        ┌─────────────┬────────┬─────────┬──────────────────┐
//!              │ Discrim=1(4)│ Id (4) │ Len (4) │ Value (Len)      │
//!              └─────────────┴────────┴─────────┴──────────────────┘
//! terminator:  ┌─────────────┐
//!              │ Discrim=0(4)│
//!              └─────────────┘
//! ```
//!
//! Values are strings followed by one NUL byte; `Len` counts the NUL.

use std::io::{ErrorKind, Read, Write};

use bytes::Bytes;

use crate::error::{ReqError, Result};
use super::buffer::RequestBuffer;
use super::keywords::resolve_attribute;
use super::{AttrId, RequestCode};

/// Sentinel stamped at the start of every request record
pub const RECORD_MARKER: u32 = 0xFFFF_FFFF;

/// Header size: marker (4) + code (4) + record length (4)
pub const HEADER_SIZE: usize = 12;

/// Real attribute record prefix: discriminator (4) + id (4) + length (4)
pub const ATTR_HEADER_SIZE: usize = 12;

/// Terminator record: discriminator (4) only
pub const TERMINATOR_SIZE: usize = 4;

/// Maximum record size accepted by the default decoders (16 MB)
pub const MAX_RECORD_SIZE: usize = 16 * 1024 * 1024;

const DISCRIM_END: u32 = 0;
const DISCRIM_ATTR: u32 = 1;

// =============================================================================
// Request Header
// =============================================================================

/// Fixed-size prefix of every request record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHeader {
    pub marker: u32,
    pub code: u32,
    pub record_length: u32,
}

impl RequestHeader {
    /// Decode and validate a header from the front of `bytes`
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ReqError::MalformedStream(format!(
                "incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let marker = read_u32(bytes, 0);
        if marker != RECORD_MARKER {
            return Err(ReqError::MalformedStream(format!(
                "bad record marker 0x{:08x}",
                marker
            )));
        }

        Ok(Self {
            marker,
            code: read_u32(bytes, 4),
            record_length: read_u32(bytes, 8),
        })
    }

    /// The command code, if it is one this crate knows
    pub fn request_code(&self) -> Option<RequestCode> {
        RequestCode::from_u32(self.code)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.marker.to_be_bytes());
        out[4..8].copy_from_slice(&self.code.to_be_bytes());
        out[8..12].copy_from_slice(&self.record_length.to_be_bytes());
        out
    }
}

// =============================================================================
// Attribute Encoding
// =============================================================================

/// Append one attribute record (or the terminator) to `buf`.
///
/// | name | value | result                                   |
/// |------|-------|------------------------------------------|
/// | None | None  | terminator                               |
/// | None | Some  | generic `string` attribute               |
/// | Some | Some  | attribute resolved from `name`           |
/// | Some | None  | `InvalidArgument`                        |
///
/// The cursor only moves after the full record has been written.
pub fn append_attribute(
    buf: &mut RequestBuffer,
    name: Option<&str>,
    value: Option<&str>,
) -> Result<()> {
    let (id, value) = match (name, value) {
        (None, None) => return append_terminator(buf),
        (Some(name), None) => {
            return Err(ReqError::InvalidArgument(format!(
                "attribute '{}' has no value",
                name
            )))
        }
        (None, Some(value)) => (AttrId::String, value),
        (Some(name), Some(value)) => {
            let id = resolve_attribute(name).map_err(|_| {
                ReqError::InvalidArgument(format!("unknown attribute '{}'", name))
            })?;
            (id, value)
        }
    };

    if value.as_bytes().contains(&0) {
        return Err(ReqError::InvalidArgument(format!(
            "value of attribute {:?} contains a NUL byte",
            id
        )));
    }

    // +1 for the trailing NUL
    let attr_len = u32::try_from(value.len() + 1).map_err(|_| {
        ReqError::InvalidArgument(format!("value of {} bytes is too long", value.len()))
    })?;

    buf.ensure_capacity(ATTR_HEADER_SIZE + attr_len as usize)?;
    buf.put_u32(DISCRIM_ATTR);
    buf.put_u32(id.as_u32());
    buf.put_u32(attr_len);
    buf.put_slice(value.as_bytes());
    buf.put_u8(0);
    Ok(())
}

/// Append the end-of-list record
pub fn append_terminator(buf: &mut RequestBuffer) -> Result<()> {
    buf.ensure_capacity(TERMINATOR_SIZE)?;
    buf.put_u32(DISCRIM_END);
    Ok(())
}

// =============================================================================
// Encoded Request
// =============================================================================

/// A finished request record (header + attribute list)
#[derive(Debug, Clone)]
pub struct EncodedRequest {
    header: RequestHeader,
    bytes: Bytes,
}

impl EncodedRequest {
    pub(crate) fn new(header: RequestHeader, bytes: Bytes) -> Self {
        Self { header, bytes }
    }

    pub fn header(&self) -> &RequestHeader {
        &self.header
    }

    pub fn code(&self) -> u32 {
        self.header.code
    }

    pub fn record_length(&self) -> usize {
        self.header.record_length as usize
    }

    /// The whole record, ready for the transport
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    /// The attribute list following the header
    pub fn attrs(&self) -> AttrList<'_> {
        AttrList::new(&self.bytes[HEADER_SIZE..])
    }
}

// =============================================================================
// Attribute Decoding
// =============================================================================

/// One decoded attribute record, borrowed from the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Raw attribute id as found on the wire
    pub id: u32,

    /// Declared payload bytes, including the NUL terminator
    pub raw: &'a [u8],
}

impl<'a> Attribute<'a> {
    /// Known attribute id, if any
    pub fn attr_id(&self) -> Option<AttrId> {
        AttrId::from_u32(self.id)
    }

    /// The string value (bytes before the first NUL)
    pub fn value_str(&self) -> Result<&'a str> {
        let end = self.raw.iter().position(|&b| b == 0).ok_or_else(|| {
            ReqError::MalformedStream(format!(
                "attribute {} value is not NUL-terminated",
                self.id
            ))
        })?;
        std::str::from_utf8(&self.raw[..end]).map_err(|e| {
            ReqError::MalformedStream(format!("attribute {} value is not UTF-8: {}", self.id, e))
        })
    }
}

/// Read-only view over an attribute list
#[derive(Debug, Clone, Copy)]
pub struct AttrList<'a> {
    bytes: &'a [u8],
}

impl<'a> AttrList<'a> {
    /// View `bytes` as an attribute list. Nothing is validated until scanned.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn iter(&self) -> AttrIter<'a> {
        AttrIter {
            bytes: self.bytes,
            pos: 0,
            done: false,
        }
    }

    /// First record with `id`, stopping at the terminator
    pub fn find(&self, id: u32) -> Result<Option<Attribute<'a>>> {
        for attr in self.iter() {
            let attr = attr?;
            if attr.id == id {
                return Ok(Some(attr));
            }
        }
        Ok(None)
    }

    /// Bytes from the start of the list through the terminator
    pub fn encoded_len(&self) -> Result<usize> {
        let mut iter = self.iter();
        for attr in iter.by_ref() {
            attr?;
        }
        Ok(iter.pos)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> IntoIterator for AttrList<'a> {
    type Item = Result<Attribute<'a>>;
    type IntoIter = AttrIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over attribute records.
///
/// Ends at the terminator. A structural error is yielded once, then the
/// iterator is exhausted.
#[derive(Debug, Clone)]
pub struct AttrIter<'a> {
    bytes: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> AttrIter<'a> {
    fn fail(&mut self, msg: String) -> Option<Result<Attribute<'a>>> {
        self.done = true;
        Some(Err(ReqError::MalformedStream(msg)))
    }
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = Result<Attribute<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let remaining = self.bytes.len() - self.pos;
        if remaining < TERMINATOR_SIZE {
            return self.fail(format!(
                "missing terminator: stream ends at offset {}",
                self.pos
            ));
        }

        let discrim = read_u32(self.bytes, self.pos);
        match discrim {
            DISCRIM_END => {
                self.pos += TERMINATOR_SIZE;
                self.done = true;
                None
            }
            DISCRIM_ATTR => {
                if remaining < ATTR_HEADER_SIZE {
                    return self.fail(format!(
                        "truncated attribute header at offset {}",
                        self.pos
                    ));
                }
                let id = read_u32(self.bytes, self.pos + 4);
                let len = read_u32(self.bytes, self.pos + 8) as usize;
                if len > remaining - ATTR_HEADER_SIZE {
                    return self.fail(format!(
                        "attribute {} declares {} bytes but only {} remain",
                        id,
                        len,
                        remaining - ATTR_HEADER_SIZE
                    ));
                }
                if len == 0 {
                    return self.fail(format!("attribute {} has an empty payload", id));
                }

                let start = self.pos + ATTR_HEADER_SIZE;
                let raw = &self.bytes[start..start + len];
                self.pos = start + len;
                Some(Ok(Attribute { id, raw }))
            }
            other => self.fail(format!(
                "invalid discriminator {} at offset {}",
                other, self.pos
            )),
        }
    }
}

// =============================================================================
// Request Decoding
// =============================================================================

/// A received request record, borrowed from the input
#[derive(Debug, Clone, Copy)]
pub struct DecodedRequest<'a> {
    pub header: RequestHeader,
    pub attrs: AttrList<'a>,
}

/// Decode a request record using the default size limit
pub fn decode_request(bytes: &[u8]) -> Result<DecodedRequest<'_>> {
    decode_request_with_limit(bytes, MAX_RECORD_SIZE)
}

/// Decode a request record, rejecting records longer than `max_len`.
///
/// Validates the marker, the declared record length and that the attribute
/// list ends exactly at its terminator.
pub fn decode_request_with_limit(bytes: &[u8], max_len: usize) -> Result<DecodedRequest<'_>> {
    let header = RequestHeader::decode(bytes)?;
    let record_len = header.record_length as usize;

    if record_len < HEADER_SIZE + TERMINATOR_SIZE {
        return Err(ReqError::MalformedStream(format!(
            "record length {} is shorter than a minimal record",
            record_len
        )));
    }
    if record_len > max_len {
        return Err(ReqError::MalformedStream(format!(
            "record length {} exceeds limit {}",
            record_len, max_len
        )));
    }
    if record_len > bytes.len() {
        return Err(ReqError::MalformedStream(format!(
            "incomplete record: expected {} bytes, got {}",
            record_len,
            bytes.len()
        )));
    }

    let attrs = AttrList::new(&bytes[HEADER_SIZE..record_len]);
    let list_len = attrs.encoded_len()?;
    if list_len != record_len - HEADER_SIZE {
        return Err(ReqError::MalformedStream(format!(
            "{} trailing bytes after terminator",
            record_len - HEADER_SIZE - list_len
        )));
    }

    Ok(DecodedRequest { header, attrs })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one complete request record from a stream
///
/// Blocks until the declared record length has been received. Returns
/// `Ok(None)` on a clean end of stream (no bytes before the next header);
/// a stream that ends inside a header or a body is `MalformedStream`.
pub fn read_request<R: Read>(reader: &mut R, max_len: usize) -> Result<Option<EncodedRequest>> {
    let mut header_bytes = [0u8; HEADER_SIZE];
    match read_full(reader, &mut header_bytes)? {
        0 => return Ok(None),
        HEADER_SIZE => {}
        got => {
            return Err(ReqError::MalformedStream(format!(
                "truncated record header: expected {} bytes, got {}",
                HEADER_SIZE, got
            )))
        }
    }
    let header = RequestHeader::decode(&header_bytes)?;

    let record_len = header.record_length as usize;
    if record_len < HEADER_SIZE + TERMINATOR_SIZE || record_len > max_len {
        return Err(ReqError::MalformedStream(format!(
            "record length {} out of range ({}..={})",
            record_len,
            HEADER_SIZE + TERMINATOR_SIZE,
            max_len
        )));
    }

    let mut record = vec![0u8; record_len];
    record[..HEADER_SIZE].copy_from_slice(&header_bytes);
    let got = read_full(reader, &mut record[HEADER_SIZE..])?;
    if got != record_len - HEADER_SIZE {
        return Err(ReqError::MalformedStream(format!(
            "truncated record: expected {} bytes, got {}",
            record_len,
            HEADER_SIZE + got
        )));
    }

    // Validate the body before handing it out
    decode_request_with_limit(&record, max_len)?;
    Ok(Some(EncodedRequest::new(header, Bytes::from(record))))
}

/// Fill `buf` as far as the stream allows, returning the bytes read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Write a request record to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &EncodedRequest) -> Result<()> {
    writer.write_all(request.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Caller guarantees `offset + 4 <= bytes.len()`
fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
