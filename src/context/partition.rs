// SPDX-License-Identifier: MIT OR Apache-2.0

//! One half of a repository.

use super::Visibility;
use crate::codec::Codec;
use crate::config::{ContextConfig, DecodeFailure};
use crate::value::{Fields, Value};
use crate::Error;
use std::collections::BTreeMap;
use std::fmt::Debug;

#[derive(Clone, Default, PartialEq)]
pub(crate) struct Partition {
    entries: Fields,
}

/// Shows each key with a placeholder naming the value's shape, never the value.
pub(crate) struct Redacted<'a>(pub(crate) &'a Fields);

struct Placeholder(&'static str);

impl Debug for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl Debug for Redacted<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.0
                    .iter()
                    .map(|(key, value)| (key, Placeholder(value.kind()))),
            )
            .finish()
    }
}

impl Partition {
    pub(crate) fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn all(&self) -> &Fields {
        &self.entries
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub(crate) fn only<K: AsRef<str>>(&self, keys: impl IntoIterator<Item = K>) -> Fields {
        keys.into_iter()
            .filter_map(|key| {
                self.entries
                    .get_key_value(key.as_ref())
                    .map(|(k, v)| (k.clone(), v.clone()))
            })
            .collect()
    }

    pub(crate) fn insert(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    /// Absent keys and lists may be pushed onto.
    pub(crate) fn is_stackable(&self, key: &str) -> bool {
        self.entries.get(key).is_none_or(Value::is_list)
    }

    /// Appends to the list at `key`, creating it if absent. Callers check
    /// [`Self::is_stackable`] first.
    pub(crate) fn append(&mut self, key: &str, values: Vec<Value>) {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::List(Vec::new()));
        if let Value::List(items) = entry {
            items.extend(values);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn encode(
        &self,
        codec: &Codec,
        visibility: Visibility,
    ) -> Result<BTreeMap<String, String>, Error> {
        self.entries
            .iter()
            .map(|(key, value)| {
                codec
                    .encode(value)
                    .map(|encoded| (key.clone(), encoded))
                    .map_err(|source| Error::Encode {
                        key: key.clone(),
                        visibility,
                        source,
                    })
            })
            .collect()
    }

    /// Decodes every entry, routing failures through the configured recovery hook.
    ///
    /// Nothing is applied here; the caller loads the result only once every entry has
    /// been decoded or recovered.
    pub(crate) fn decode(
        encoded: &BTreeMap<String, String>,
        config: &ContextConfig,
        visibility: Visibility,
    ) -> Result<Partition, Error> {
        let mut entries = Fields::new();
        for (key, raw) in encoded {
            let value = match config.codec().decode(raw) {
                Ok(value) => value,
                Err(error) => match config.recovery() {
                    Some(hook) => {
                        tracing::warn!(%key, %visibility, %error, "recovering undecodable context value");
                        hook(DecodeFailure {
                            error: &error,
                            key,
                            raw,
                            visibility,
                        })
                    }
                    None => {
                        tracing::debug!(%key, %visibility, %error, "aborting hydration");
                        return Err(Error::Decode {
                            key: key.clone(),
                            visibility,
                            source: error,
                        });
                    }
                },
            };
            entries.insert(key.clone(), value);
        }
        Ok(Partition { entries })
    }
}
