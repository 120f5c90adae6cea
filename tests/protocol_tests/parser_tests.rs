//! Parser Tests
//!
//! Tests verify:
//! - Verb resolution and NotSupported handling
//! - Per-token attribute encoding for ordinary verbs
//! - `config` packing (name typed, everything else one string blob)
//! - record_length bookkeeping and buffer reuse
//! - format_command

use ldmsd_req::protocol::{
    build_request, build_request_into, build_request_with, decode_request, format_command,
    AttrId, RequestBuffer, RequestCode, HEADER_SIZE, RECORD_MARKER,
};
use ldmsd_req::{Config, ReqError};

// =============================================================================
// Helper Functions
// =============================================================================

/// (id, value) for every attribute of an encoded request
fn attrs_of(bytes: &[u8]) -> Vec<(u32, String)> {
    let decoded = decode_request(bytes).unwrap();
    decoded
        .attrs
        .iter()
        .map(|a| {
            let a = a.unwrap();
            (a.id, a.value_str().unwrap().to_string())
        })
        .collect()
}

// =============================================================================
// Verb Tests
// =============================================================================

#[test]
fn test_unknown_verb_not_supported() {
    match build_request("bogus key=1") {
        Err(ReqError::NotSupported { verb }) => assert_eq!(verb, "bogus"),
        other => panic!("Expected NotSupported, got {:?}", other),
    }
}

#[test]
fn test_unknown_verb_leaves_reused_buffer_untouched() {
    let mut buf = RequestBuffer::new();
    build_request_into(&mut buf, "version").unwrap();
    let before = buf.as_slice().to_vec();

    assert!(build_request_into(&mut buf, "bogus key=1").is_err());
    assert_eq!(buf.as_slice(), before.as_slice());
}

#[test]
fn test_empty_command_not_supported() {
    assert!(matches!(
        build_request(""),
        Err(ReqError::NotSupported { .. })
    ));
}

#[test]
fn test_verb_only_has_terminator_only() {
    let request = build_request("daemon").unwrap();
    assert_eq!(request.code(), RequestCode::DaemonStatus.as_u32());
    assert_eq!(request.header().marker, RECORD_MARKER);
    assert_eq!(request.record_length(), HEADER_SIZE + 4);
    assert!(attrs_of(request.as_bytes()).is_empty());

    let attrs = request.attrs();
    for id in AttrId::ALL {
        assert_eq!(attrs.get_by_id(id).unwrap(), None);
    }
}

#[test]
fn test_trailing_space_is_harmless() {
    let request = build_request("version ").unwrap();
    assert_eq!(request.record_length(), HEADER_SIZE + 4);
}

// =============================================================================
// Ordinary Verb Tests
// =============================================================================

#[test]
fn test_each_token_is_typed_attribute() {
    let request = build_request("prdcr_add name=p1 host=node1 port=411 xprt=sock").unwrap();
    assert_eq!(request.code(), RequestCode::PrdcrAdd.as_u32());
    assert_eq!(
        attrs_of(request.as_bytes()),
        vec![
            (AttrId::Name.as_u32(), "p1".to_string()),
            (AttrId::Host.as_u32(), "node1".to_string()),
            (AttrId::Port.as_u32(), "411".to_string()),
            (AttrId::Xprt.as_u32(), "sock".to_string()),
        ]
    );
}

#[test]
fn test_value_may_contain_equals() {
    let request = build_request("updtr_match_add name=u1 regex=a=b match=inst").unwrap();
    let attrs = request.attrs();
    assert_eq!(attrs.get_by_name("regex").unwrap().as_deref(), Some("a=b"));
}

#[test]
fn test_malformed_token_invalid_argument() {
    match build_request("prdcr_add name=p1 host") {
        Err(ReqError::InvalidArgument(msg)) => assert!(msg.contains("host")),
        other => panic!("Expected InvalidArgument, got {:?}", other),
    }
}

#[test]
fn test_unknown_attribute_invalid_argument() {
    assert!(matches!(
        build_request("prdcr_add name=p1 colour=red"),
        Err(ReqError::InvalidArgument(_))
    ));
}

#[test]
fn test_config_name_exact_match_only() {
    // "names" is not "name": it goes into the blob
    let request = build_request("config name=meminfo names=x").unwrap();
    assert_eq!(
        attrs_of(request.as_bytes()),
        vec![
            (AttrId::Name.as_u32(), "meminfo".to_string()),
            (AttrId::String.as_u32(), "names=x".to_string()),
        ]
    );
}

// =============================================================================
// Config Packing Tests
// =============================================================================

#[test]
fn test_config_packing() {
    let request = build_request("config name=store_flatfile path=/tmp/x extra=1").unwrap();
    assert_eq!(request.code(), RequestCode::PlugnConfig.as_u32());

    let attrs = attrs_of(request.as_bytes());
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs[0], (AttrId::Name.as_u32(), "store_flatfile".to_string()));
    assert_eq!(
        attrs[1],
        (AttrId::String.as_u32(), "path=/tmp/x extra=1".to_string())
    );
}

#[test]
fn test_config_packing_preserves_order_around_name() {
    let request =
        build_request("config path=/tmp/x name=store_flatfile extra=1 altheader=0").unwrap();
    let list = request.attrs();
    assert_eq!(list.get_by_name("name").unwrap().as_deref(), Some("store_flatfile"));
    assert_eq!(
        list.get_by_name("string").unwrap().as_deref(),
        Some("path=/tmp/x extra=1 altheader=0")
    );
}

#[test]
fn test_config_name_only_has_no_blob() {
    let request = build_request("config name=meminfo").unwrap();
    assert_eq!(
        attrs_of(request.as_bytes()),
        vec![(AttrId::Name.as_u32(), "meminfo".to_string())]
    );
}

#[test]
fn test_config_keys_not_resolved() {
    // Plugin-private keys need not be known attribute names
    let request = build_request("config name=p producer=x component_id=7").unwrap();
    assert_eq!(
        request.attrs().plugin_args().unwrap(),
        vec![
            ("producer".to_string(), "x".to_string()),
            ("component_id".to_string(), "7".to_string()),
        ]
    );
}

// =============================================================================
// Record Length Tests
// =============================================================================

#[test]
fn test_record_length_matches_rescan() {
    let commands = [
        "version",
        "load name=meminfo",
        "config name=meminfo producer=n1 instance=n1/meminfo component_id=1",
        "strgp_add name=s1 plugin=store_flatfile container=c schema=meminfo",
        "updtr_add name=u1 interval=1000000 offset=100000",
    ];
    for command in commands {
        let request = build_request(command).unwrap();
        let list_len = request.attrs().encoded_len().unwrap();
        assert_eq!(request.record_length(), HEADER_SIZE + list_len, "{}", command);
        assert_eq!(request.as_bytes().len(), request.record_length(), "{}", command);
    }
}

#[test]
fn test_buffer_reuse_appends_records() {
    let mut buf = RequestBuffer::new();
    let first = build_request_into(&mut buf, "prdcr_add name=p1 host=h1").unwrap();
    let second = build_request_into(&mut buf, "prdcr_start name=p1").unwrap();

    let first_len = first.record_length as usize;
    assert_eq!(buf.len(), first_len + second.record_length as usize);

    let one = decode_request(&buf.as_slice()[..first_len]).unwrap();
    let two = decode_request(&buf.as_slice()[first_len..]).unwrap();
    assert_eq!(one.header.code, RequestCode::PrdcrAdd.as_u32());
    assert_eq!(two.header.code, RequestCode::PrdcrStart.as_u32());
    assert_eq!(two.attrs.get_by_name("name").unwrap().as_deref(), Some("p1"));
}

#[test]
fn test_build_with_small_initial_capacity() {
    let config = Config::builder().initial_capacity(2).build().unwrap();
    let request = build_request_with(&config, "prdcr_add name=p1 host=node1 port=411").unwrap();
    assert_eq!(
        request.attrs().get_by_name("port").unwrap().as_deref(),
        Some("411")
    );
}

#[test]
fn test_build_over_size_limit_out_of_memory() {
    let config = Config::builder()
        .initial_capacity(64)
        .max_request_size(128)
        .build()
        .unwrap();
    let command = format!("config name=x blob={}", "z".repeat(500));
    assert!(matches!(
        build_request_with(&config, &command),
        Err(ReqError::OutOfMemory { .. })
    ));
}

// =============================================================================
// format_command Tests
// =============================================================================

#[test]
fn test_format_command_roundtrip() {
    let text = format_command("prdcr_add", &[("name", "p1"), ("host", "node1")]).unwrap();
    assert_eq!(text, "prdcr_add name=p1 host=node1");

    let request = build_request(&text).unwrap();
    assert_eq!(
        request.attrs().get_by_name("host").unwrap().as_deref(),
        Some("node1")
    );
}

#[test]
fn test_format_command_rejects_spaces() {
    assert!(format_command("load", &[("name", "a b")]).is_err());
    assert!(format_command("load", &[("na=me", "x")]).is_err());
    assert!(format_command("", &[("name", "x")]).is_err());
}
