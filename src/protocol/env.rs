//! Environment-variable expansion for attribute values
//!
//! `${NAME}` and `$NAME` are replaced by the variable's value; unset
//! variables expand to the empty string. A `$` that does not start a name,
//! or an unclosed `${`, is kept literally.

use std::collections::HashMap;

/// Source of variable values
pub trait EnvLookup {
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Return a new string with variable references in `input` replaced
pub fn expand_env_vars<E: EnvLookup + ?Sized>(input: &str, env: &E) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    out.push_str(&env.var(&braced[..end]).unwrap_or_default());
                    rest = &braced[end + 1..];
                }
                None => {
                    out.push_str(&rest[idx..]);
                    rest = "";
                }
            }
            continue;
        }

        let name_len = after
            .char_indices()
            .find(|&(i, c)| {
                !(c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()))
            })
            .map(|(i, _)| i)
            .unwrap_or(after.len());

        if name_len == 0 {
            out.push('$');
        } else {
            out.push_str(&env.var(&after[..name_len]).unwrap_or_default());
        }
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}
