//! Codec Tests
//!
//! Tests for attribute encoding, header layout and bounds-checked decoding.

use std::io::Cursor;

use ldmsd_req::protocol::{
    append_attribute, append_terminator, build_request, decode_request,
    decode_request_with_limit, read_request, write_request, AttrId, AttrList, RequestBuffer,
    RequestHeader, ATTR_HEADER_SIZE, HEADER_SIZE, RECORD_MARKER, TERMINATOR_SIZE,
};
use ldmsd_req::ReqError;

// =============================================================================
// Helper Functions
// =============================================================================

fn be(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Hand-assemble a record: header + raw body
fn record(code: u32, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&be(RECORD_MARKER));
    out.extend_from_slice(&be(code));
    out.extend_from_slice(&be((HEADER_SIZE + body.len()) as u32));
    out.extend_from_slice(body);
    out
}

// =============================================================================
// Attribute Encoding Tests
// =============================================================================

#[test]
fn test_append_named_attribute_layout() {
    let mut buf = RequestBuffer::new();
    append_attribute(&mut buf, Some("host"), Some("node1")).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&be(1));
    expected.extend_from_slice(&be(AttrId::Host.as_u32()));
    expected.extend_from_slice(&be(6));
    expected.extend_from_slice(b"node1\0");
    assert_eq!(buf.as_slice(), expected.as_slice());
}

#[test]
fn test_append_unnamed_value_is_string_attribute() {
    let mut buf = RequestBuffer::new();
    append_attribute(&mut buf, None, Some("a=1 b=2")).unwrap();

    let attr = AttrList::new(buf.as_slice()).iter().next().unwrap();
    // No terminator yet, but the first record is complete
    let attr = attr.unwrap();
    assert_eq!(attr.attr_id(), Some(AttrId::String));
    assert_eq!(attr.value_str().unwrap(), "a=1 b=2");
}

#[test]
fn test_append_terminator_is_four_zero_bytes() {
    let mut buf = RequestBuffer::new();
    append_attribute(&mut buf, None, None).unwrap();
    assert_eq!(buf.as_slice(), &[0, 0, 0, 0]);

    let mut buf = RequestBuffer::new();
    append_terminator(&mut buf).unwrap();
    assert_eq!(buf.len(), TERMINATOR_SIZE);
}

#[test]
fn test_append_empty_value() {
    let mut buf = RequestBuffer::new();
    append_attribute(&mut buf, Some("name"), Some("")).unwrap();
    append_terminator(&mut buf).unwrap();

    assert_eq!(buf.len(), ATTR_HEADER_SIZE + 1 + TERMINATOR_SIZE);
    let list = AttrList::new(buf.as_slice());
    assert_eq!(list.get_by_id(AttrId::Name).unwrap(), Some(String::new()));
}

#[test]
fn test_name_without_value_rejected() {
    let mut buf = RequestBuffer::new();
    let result = append_attribute(&mut buf, Some("name"), None);
    assert!(matches!(result, Err(ReqError::InvalidArgument(_))));
    assert!(buf.is_empty());
}

#[test]
fn test_unknown_name_rejected_without_writing() {
    let mut buf = RequestBuffer::new();
    append_attribute(&mut buf, Some("name"), Some("x")).unwrap();
    let before = buf.len();

    let result = append_attribute(&mut buf, Some("colour"), Some("red"));
    match result {
        Err(ReqError::InvalidArgument(msg)) => assert!(msg.contains("colour")),
        other => panic!("Expected InvalidArgument, got {:?}", other),
    }
    assert_eq!(buf.len(), before);
}

#[test]
fn test_value_with_nul_rejected() {
    let mut buf = RequestBuffer::new();
    let result = append_attribute(&mut buf, Some("path"), Some("a\0b"));
    assert!(matches!(result, Err(ReqError::InvalidArgument(_))));
}

#[test]
fn test_append_grows_small_buffer() {
    let mut buf = RequestBuffer::with_capacity(4, 1 << 20).unwrap();
    let value = "v".repeat(100);
    append_attribute(&mut buf, Some("regex"), Some(value.as_str())).unwrap();

    assert_eq!(buf.capacity(), 128);
    assert_eq!(buf.len(), ATTR_HEADER_SIZE + 101);
}

#[test]
fn test_append_out_of_memory_keeps_previous_data() {
    let mut buf = RequestBuffer::with_capacity(16, 64).unwrap();
    append_attribute(&mut buf, Some("name"), Some("ok")).unwrap();
    let snapshot = buf.as_slice().to_vec();

    let value = "x".repeat(100);
    let result = append_attribute(&mut buf, Some("regex"), Some(value.as_str()));
    assert!(matches!(result, Err(ReqError::OutOfMemory { .. })));
    assert_eq!(buf.as_slice(), snapshot.as_slice());
    assert_eq!(buf.capacity(), 16);
}

// =============================================================================
// Header Tests
// =============================================================================

#[test]
fn test_terminator_only_request_bytes() {
    let request = build_request("version").unwrap();
    let expected: Vec<u8> = [
        &be(RECORD_MARKER)[..],
        &be(0x604)[..],
        &be(16)[..],
        &be(0)[..],
    ]
    .concat();
    assert_eq!(request.as_bytes(), expected.as_slice());
}

#[test]
fn test_header_roundtrip_and_bad_marker() {
    let header = RequestHeader {
        marker: RECORD_MARKER,
        code: 0x300,
        record_length: 40,
    };
    let bytes = header.to_bytes();
    assert_eq!(RequestHeader::decode(&bytes).unwrap(), header);

    let mut bad = bytes;
    bad[0] = 0xFE;
    assert!(matches!(
        RequestHeader::decode(&bad),
        Err(ReqError::MalformedStream(_))
    ));
}

// =============================================================================
// Decode Error Tests
// =============================================================================

#[test]
fn test_length_larger_than_remaining() {
    let mut body = Vec::new();
    body.extend_from_slice(&be(1));
    body.extend_from_slice(&be(AttrId::Name.as_u32()));
    body.extend_from_slice(&be(1000));
    body.extend_from_slice(b"short\0");

    let list = AttrList::new(&body);
    assert!(matches!(
        list.get_by_id(AttrId::Name),
        Err(ReqError::MalformedStream(_))
    ));

    let bytes = record(0x100, &body);
    assert!(matches!(
        decode_request(&bytes),
        Err(ReqError::MalformedStream(_))
    ));
}

#[test]
fn test_missing_terminator() {
    let mut buf = RequestBuffer::new();
    append_attribute(&mut buf, Some("name"), Some("p1")).unwrap();

    let list = AttrList::new(buf.as_slice());
    let result = list.get_by_id(AttrId::Host);
    match result {
        Err(ReqError::MalformedStream(msg)) => assert!(msg.contains("terminator")),
        other => panic!("Expected MalformedStream, got {:?}", other),
    }
}

#[test]
fn test_invalid_discriminator() {
    let body = [&be(7)[..], &be(0)[..]].concat();
    let list = AttrList::new(&body);
    let mut iter = list.iter();
    assert!(matches!(iter.next(), Some(Err(ReqError::MalformedStream(_)))));
    assert!(iter.next().is_none());
}

#[test]
fn test_value_without_nul() {
    let body = [&be(1)[..], &be(1)[..], &be(3)[..], &b"abc"[..], &be(0)[..]].concat();
    let list = AttrList::new(&body);
    assert!(matches!(
        list.get_by_id(AttrId::Name),
        Err(ReqError::MalformedStream(_))
    ));
}

#[test]
fn test_scan_stops_at_terminator() {
    // Garbage after the terminator must never be read
    let body = [&be(0)[..], &be(1)[..], &be(1)[..], &be(99)[..]].concat();
    let list = AttrList::new(&body);
    assert_eq!(list.get_by_id(AttrId::Name).unwrap(), None);
    assert_eq!(list.encoded_len().unwrap(), 4);
}

#[test]
fn test_decode_rejects_trailing_bytes_and_short_input() {
    let mut body = be(0).to_vec();
    body.extend_from_slice(&[0xAA; 4]);
    let bytes = record(0x604, &body);
    assert!(matches!(
        decode_request(&bytes),
        Err(ReqError::MalformedStream(_))
    ));

    let request = build_request("version").unwrap();
    let truncated = &request.as_bytes()[..request.record_length() - 1];
    assert!(matches!(
        decode_request(truncated),
        Err(ReqError::MalformedStream(_))
    ));
}

#[test]
fn test_decode_respects_limit() {
    let request = build_request("prdcr_add name=p1 host=node1").unwrap();
    let limit = request.record_length() - 1;
    assert!(matches!(
        decode_request_with_limit(request.as_bytes(), limit),
        Err(ReqError::MalformedStream(_))
    ));
    assert!(decode_request_with_limit(request.as_bytes(), request.record_length()).is_ok());
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_write_read_request() {
    let first = build_request("prdcr_start name=p1 interval=1s").unwrap();
    let second = build_request("exit").unwrap();

    let mut wire = Vec::new();
    write_request(&mut wire, &first).unwrap();
    write_request(&mut wire, &second).unwrap();

    let mut cursor = Cursor::new(wire);
    let read_first = read_request(&mut cursor, 1 << 20).unwrap().unwrap();
    let read_second = read_request(&mut cursor, 1 << 20).unwrap().unwrap();

    assert_eq!(read_first.as_bytes(), first.as_bytes());
    assert_eq!(read_second.as_bytes(), second.as_bytes());

    // Clean end of stream
    assert!(read_request(&mut cursor, 1 << 20).unwrap().is_none());
}

#[test]
fn test_stream_read_truncated_header() {
    let request = build_request("prdcr_add name=p1 host=node1").unwrap();

    let mut wire = Vec::new();
    write_request(&mut wire, &request).unwrap();
    wire.extend_from_slice(&request.as_bytes()[..5]);

    let mut cursor = Cursor::new(wire);
    assert!(read_request(&mut cursor, 1 << 20).unwrap().is_some());

    let err = read_request(&mut cursor, 1 << 20).unwrap_err();
    assert!(matches!(err, ReqError::MalformedStream(_)));
    assert!(err.to_string().contains("truncated record header"));
}

#[test]
fn test_stream_read_truncated_body() {
    let request = build_request("prdcr_add name=p1 host=node1").unwrap();
    let bytes = request.as_bytes();

    let mut wire = Vec::new();
    write_request(&mut wire, &request).unwrap();
    wire.extend_from_slice(&bytes[..bytes.len() - 5]);

    let mut cursor = Cursor::new(wire);
    assert!(read_request(&mut cursor, 1 << 20).unwrap().is_some());

    let err = read_request(&mut cursor, 1 << 20).unwrap_err();
    assert!(matches!(err, ReqError::MalformedStream(_)));
    assert!(err.to_string().contains("truncated record"));
}

#[test]
fn test_stream_read_rejects_bad_marker() {
    let mut bytes = build_request("exit").unwrap().as_bytes().to_vec();
    bytes[3] = 0;
    let mut cursor = Cursor::new(bytes);
    assert!(matches!(
        read_request(&mut cursor, 1 << 20),
        Err(ReqError::MalformedStream(_))
    ));
}
