//! Value accessor
//!
//! Looks up attribute values in a received attribute list. Every returned
//! value is a fresh `String` with environment variables expanded.
//!
//! `Ok(None)` means the attribute is absent; a corrupt stream is always an
//! `Err(MalformedStream)`, never silently reported as absent.

use crate::error::Result;
use super::codec::AttrList;
use super::env::{expand_env_vars, EnvLookup, ProcessEnv};
use super::interval::parse_interval;
use super::keywords::resolve_attribute;
use super::parser::parse_attr_tokens;
use super::AttrId;

impl<'a> AttrList<'a> {
    /// Value of the first attribute with `id`, expanded against the process environment
    pub fn get_by_id(&self, id: AttrId) -> Result<Option<String>> {
        self.get_by_id_with(id, &ProcessEnv)
    }

    /// Value of the first attribute with `id`, expanded against `env`
    pub fn get_by_id_with<E: EnvLookup + ?Sized>(
        &self,
        id: AttrId,
        env: &E,
    ) -> Result<Option<String>> {
        match self.find(id.as_u32())? {
            Some(attr) => Ok(Some(expand_env_vars(attr.value_str()?, env))),
            None => Ok(None),
        }
    }

    /// Resolve `name` then look it up. Unknown names fail with `NotFound`.
    pub fn get_by_name(&self, name: &str) -> Result<Option<String>> {
        self.get_by_name_with(name, &ProcessEnv)
    }

    pub fn get_by_name_with<E: EnvLookup + ?Sized>(
        &self,
        name: &str,
        env: &E,
    ) -> Result<Option<String>> {
        let id = resolve_attribute(name)?;
        self.get_by_id_with(id, env)
    }

    /// An interval-valued attribute in microseconds
    pub fn get_interval(&self, id: AttrId) -> Result<Option<u64>> {
        self.get_by_id(id)?
            .map(|value| parse_interval(&value))
            .transpose()
    }

    /// The generic string attribute parsed back into ordered key/value pairs.
    ///
    /// This is how a plugin reads the private arguments of a `config` request.
    pub fn plugin_args(&self) -> Result<Vec<(String, String)>> {
        self.plugin_args_with(&ProcessEnv)
    }

    pub fn plugin_args_with<E: EnvLookup + ?Sized>(
        &self,
        env: &E,
    ) -> Result<Vec<(String, String)>> {
        let Some(blob) = self.get_by_id_with(AttrId::String, env)? else {
            return Ok(Vec::new());
        };
        Ok(parse_attr_tokens(&blob)?
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect())
    }
}

/// Look up `id` in a raw attribute stream
pub fn get_by_id(stream: &[u8], id: AttrId) -> Result<Option<String>> {
    AttrList::new(stream).get_by_id(id)
}

/// Look up `name` in a raw attribute stream
pub fn get_by_name(stream: &[u8], name: &str) -> Result<Option<String>> {
    AttrList::new(stream).get_by_name(name)
}
