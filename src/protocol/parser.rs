//! Config-string parser
//!
//! Turns `"<verb> key=value key=value ..."` into a request record.
//!
//! Tokens are separated by spaces and split on their first `=`. There is no
//! quoting: values cannot contain spaces.
//!
//! `config` requests are packed differently from every other verb: the
//! `name` token becomes a typed attribute, every other token is re-joined
//! into one generic string attribute, so the plugin's own arguments travel
//! as a single opaque blob.

use crate::config::Config;
use crate::error::{ReqError, Result};
use super::buffer::RequestBuffer;
use super::codec::{
    append_attribute, append_terminator, EncodedRequest, RequestHeader, HEADER_SIZE,
    RECORD_MARKER,
};
use super::keywords::resolve_command;
use super::RequestCode;

/// Build a request from a textual command using the default config
pub fn build_request(command: &str) -> Result<EncodedRequest> {
    build_request_with(&Config::default(), command)
}

/// Build a request from a textual command into a fresh buffer sized by `config`
pub fn build_request_with(config: &Config, command: &str) -> Result<EncodedRequest> {
    let mut buf = RequestBuffer::with_config(config)?;
    let header = build_request_into(&mut buf, command)?;
    Ok(EncodedRequest::new(header, buf.into_bytes()))
}

/// Append one complete request record for `command` at the buffer's cursor.
///
/// On failure the cursor is rolled back to where the record started, so
/// the buffer never holds a partial record.
pub fn build_request_into(buf: &mut RequestBuffer, command: &str) -> Result<RequestHeader> {
    let start = buf.len();
    match encode_record(buf, start, command) {
        Ok(header) => {
            tracing::debug!(
                "encoded '{}' as code 0x{:x} ({} bytes)",
                command,
                header.code,
                header.record_length
            );
            Ok(header)
        }
        Err(e) => {
            buf.truncate(start);
            tracing::warn!("rejected request '{}': {}", command, e);
            Err(e)
        }
    }
}

fn encode_record(buf: &mut RequestBuffer, start: usize, command: &str) -> Result<RequestHeader> {
    let (verb, rest) = match command.split_once(' ') {
        Some((verb, rest)) => (verb, Some(rest)),
        None => (command, None),
    };

    let code = resolve_command(verb);
    if code == RequestCode::NotSupported {
        return Err(ReqError::NotSupported {
            verb: verb.to_string(),
        });
    }

    let tokens = match rest {
        Some(rest) => parse_attr_tokens(rest)?,
        None => Vec::new(),
    };

    // Header with a placeholder length, patched once the list is complete
    buf.ensure_capacity(HEADER_SIZE)?;
    buf.put_u32(RECORD_MARKER);
    buf.put_u32(code.as_u32());
    buf.put_u32(0);

    if code == RequestCode::PlugnConfig {
        let mut plugin_args: Vec<String> = Vec::new();
        for &(key, value) in &tokens {
            if key == "name" {
                append_attribute(buf, Some(key), Some(value))?;
            } else {
                plugin_args.push(format!("{}={}", key, value));
            }
        }
        if !plugin_args.is_empty() {
            append_attribute(buf, None, Some(plugin_args.join(" ").as_str()))?;
        }
    } else {
        for &(key, value) in &tokens {
            append_attribute(buf, Some(key), Some(value))?;
        }
    }

    append_terminator(buf)?;

    let record_len = buf.len() - start;
    let record_length = u32::try_from(record_len).map_err(|_| ReqError::OutOfMemory {
        requested: record_len,
    })?;
    buf.patch_u32(start + 8, record_length);

    Ok(RequestHeader {
        marker: RECORD_MARKER,
        code: code.as_u32(),
        record_length,
    })
}

/// Split a space-separated `key=value` list into ordered pairs.
///
/// Runs of spaces are collapsed. A token without `=` is an error.
pub fn parse_attr_tokens(text: &str) -> Result<Vec<(&str, &str)>> {
    text.split(' ')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.split_once('=').ok_or_else(|| {
                ReqError::InvalidArgument(format!(
                    "malformed token '{}': expected key=value",
                    token
                ))
            })
        })
        .collect()
}

/// Render a textual command from a verb and key/value pairs.
///
/// Rejects input the parser could not read back: spaces anywhere, or `=`
/// inside a key.
pub fn format_command<K, V>(verb: &str, pairs: &[(K, V)]) -> Result<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if verb.is_empty() || verb.contains(' ') {
        return Err(ReqError::InvalidArgument(format!("invalid verb '{}'", verb)));
    }

    let mut out = verb.to_string();
    for (key, value) in pairs {
        let (key, value) = (key.as_ref(), value.as_ref());
        if key.is_empty() || key.contains(' ') || key.contains('=') {
            return Err(ReqError::InvalidArgument(format!("invalid key '{}'", key)));
        }
        if value.contains(' ') {
            return Err(ReqError::InvalidArgument(format!(
                "value for '{}' contains a space",
                key
            )));
        }
        out.push(' ');
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    Ok(out)
}
