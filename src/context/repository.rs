// SPDX-License-Identifier: MIT OR Apache-2.0

//! The context repository.

use super::events::{ContextDehydrating, ContextHydrated};
use super::partition::{Partition, Redacted};
use super::snapshot::Snapshot;
use super::Visibility;
use crate::config::{ContextConfig, DecodeFailure};
use crate::dispatch::{Dispatcher, DispatcherExt};
use crate::value::{Fields, Value};
use crate::Error;
use std::fmt::Debug;
use std::sync::Arc;

/// Key/value context for one unit of work.
///
/// A repository is owned by exactly one unit of work (a request, a job, a CLI run) and
/// is mutated through `&mut self`. To move context into another unit of work, dehydrate
/// it into a [`Snapshot`] and hydrate a new repository from that snapshot; no state is
/// ever shared between the two.
///
/// Every operation comes in a visible and a hidden flavor (`add` / `add_hidden`, ...).
/// The partitions are independent: the same key may be present in both.
///
/// # Examples
///
/// ```rust
/// use contextwise::context::Repository;
/// use contextwise::dispatch::EventDispatcher;
/// use contextwise::Value;
///
/// let mut context = Repository::new(EventDispatcher::shared());
/// context
///     .add("tenant", "acme")
///     .add_if("tenant", "ignored")
///     .add_hidden("api_key", "k-123");
///
/// assert_eq!(context.get_or("tenant", Value::Null), Value::from("acme"));
/// assert!(!context.all().contains_key("api_key"));
/// assert_eq!(context.pull_hidden("api_key"), Some(Value::from("k-123")));
/// assert!(!context.has_hidden("api_key"));
/// ```
///
/// `Debug` output lists hidden keys but never hidden values.
#[derive(Clone)]
pub struct Repository {
    events: Arc<dyn Dispatcher>,
    config: Arc<ContextConfig>,
    visible: Partition,
    hidden: Partition,
}

impl Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("events", &self.events)
            .field("config", &self.config)
            .field("visible", self.visible.all())
            .field("hidden", &Redacted(self.hidden.all()))
            .finish()
    }
}

impl Repository {
    /// Creates an empty repository with the default configuration.
    pub fn new(events: Arc<dyn Dispatcher>) -> Self {
        Self::with_config(events, Arc::new(ContextConfig::default()))
    }

    pub fn with_config(events: Arc<dyn Dispatcher>, config: Arc<ContextConfig>) -> Self {
        Self {
            events,
            config,
            visible: Partition::default(),
            hidden: Partition::default(),
        }
    }

    pub fn events(&self) -> &Arc<dyn Dispatcher> {
        &self.events
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    fn partition(&self, visibility: Visibility) -> &Partition {
        match visibility {
            Visibility::Visible => &self.visible,
            Visibility::Hidden => &self.hidden,
        }
    }

    fn partition_mut(&mut self, visibility: Visibility) -> &mut Partition {
        match visibility {
            Visibility::Visible => &mut self.visible,
            Visibility::Hidden => &mut self.hidden,
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.visible.has(key)
    }

    pub fn has_hidden(&self, key: &str) -> bool {
        self.hidden.has(key)
    }

    /// Every visible entry.
    pub fn all(&self) -> &Fields {
        self.visible.all()
    }

    /// Every hidden entry. Intended for hand-off code, not for display.
    pub fn all_hidden(&self) -> &Fields {
        self.hidden.all()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.visible.get(key)
    }

    pub fn get_hidden(&self, key: &str) -> Option<&Value> {
        self.hidden.get(key)
    }

    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get_or_else(key, || default)
    }

    pub fn get_hidden_or(&self, key: &str, default: Value) -> Value {
        self.get_hidden_or_else(key, || default)
    }

    /// Returns the stored value, or `default()` when the key is absent.
    pub fn get_or_else(&self, key: &str, default: impl FnOnce() -> Value) -> Value {
        self.get(key).cloned().unwrap_or_else(default)
    }

    pub fn get_hidden_or_else(&self, key: &str, default: impl FnOnce() -> Value) -> Value {
        self.get_hidden(key).cloned().unwrap_or_else(default)
    }

    /// Removes and returns the value at `key`.
    pub fn pull(&mut self, key: &str) -> Option<Value> {
        self.visible.remove(key)
    }

    pub fn pull_hidden(&mut self, key: &str) -> Option<Value> {
        self.hidden.remove(key)
    }

    pub fn pull_or(&mut self, key: &str, default: Value) -> Value {
        self.pull(key).unwrap_or(default)
    }

    pub fn pull_hidden_or(&mut self, key: &str, default: Value) -> Value {
        self.pull_hidden(key).unwrap_or(default)
    }

    pub fn pull_or_else(&mut self, key: &str, default: impl FnOnce() -> Value) -> Value {
        self.pull(key).unwrap_or_else(default)
    }

    pub fn pull_hidden_or_else(&mut self, key: &str, default: impl FnOnce() -> Value) -> Value {
        self.pull_hidden(key).unwrap_or_else(default)
    }

    /// The visible entries for `keys`. Keys that are not present are left out.
    pub fn only<K: AsRef<str>>(&self, keys: impl IntoIterator<Item = K>) -> Fields {
        self.visible.only(keys)
    }

    pub fn only_hidden<K: AsRef<str>>(&self, keys: impl IntoIterator<Item = K>) -> Fields {
        self.hidden.only(keys)
    }

    /// Sets `key`, replacing any existing value.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.visible.insert(key.into(), value.into());
        self
    }

    pub fn add_hidden(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.hidden.insert(key.into(), value.into());
        self
    }

    /// Merges `entries` into the visible partition; later entries win.
    pub fn add_many<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.extend(Visibility::Visible, entries)
    }

    pub fn add_hidden_many<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.extend(Visibility::Hidden, entries)
    }

    fn extend<K, V>(
        &mut self,
        visibility: Visibility,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let partition = self.partition_mut(visibility);
        for (key, value) in entries {
            partition.insert(key.into(), value.into());
        }
        self
    }

    /// Sets `key` only if it is not already present.
    pub fn add_if(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        if !self.has(&key) {
            self.add(key, value);
        }
        self
    }

    pub fn add_hidden_if(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        if !self.has_hidden(&key) {
            self.add_hidden(key, value);
        }
        self
    }

    pub fn forget(&mut self, key: &str) -> &mut Self {
        self.visible.remove(key);
        self
    }

    pub fn forget_hidden(&mut self, key: &str) -> &mut Self {
        self.hidden.remove(key);
        self
    }

    pub fn forget_many<K: AsRef<str>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        for key in keys {
            self.visible.remove(key.as_ref());
        }
        self
    }

    pub fn forget_hidden_many<K: AsRef<str>>(
        &mut self,
        keys: impl IntoIterator<Item = K>,
    ) -> &mut Self {
        for key in keys {
            self.hidden.remove(key.as_ref());
        }
        self
    }

    /// Appends `values` to the list at `key`, creating the list if the key is absent.
    ///
    /// Fails with [`Error::NotStackable`] if the key holds anything other than a list;
    /// the repository is left unchanged in that case.
    pub fn push<V: Into<Value>>(
        &mut self,
        key: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<&mut Self, Error> {
        self.push_onto(Visibility::Visible, key, values)
    }

    pub fn push_hidden<V: Into<Value>>(
        &mut self,
        key: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<&mut Self, Error> {
        self.push_onto(Visibility::Hidden, key, values)
    }

    fn push_onto<V: Into<Value>>(
        &mut self,
        visibility: Visibility,
        key: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<&mut Self, Error> {
        if !self.partition(visibility).is_stackable(key) {
            return Err(Error::NotStackable {
                key: key.to_string(),
                visibility,
            });
        }
        let values = values.into_iter().map(Into::into).collect();
        self.partition_mut(visibility).append(key, values);
        Ok(self)
    }

    /// True when both partitions are empty.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.hidden.is_empty()
    }

    /// Removes every entry from both partitions.
    pub fn flush(&mut self) -> &mut Self {
        self.visible.clear();
        self.hidden.clear();
        self
    }

    /// Runs `f` when `condition` holds.
    pub fn when(&mut self, condition: bool, f: impl FnOnce(&mut Self)) -> &mut Self {
        if condition {
            f(self);
        }
        self
    }

    /// Runs `f` when `condition` does not hold.
    pub fn unless(&mut self, condition: bool, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.when(!condition, f)
    }

    /// Registers `callback` to run on the detached copy every time a repository sharing
    /// this dispatcher is dehydrated. The callback may modify the copy.
    pub fn dehydrating(
        &mut self,
        callback: impl Fn(&mut Repository) + Send + Sync + 'static,
    ) -> &mut Self {
        self.events
            .listen::<ContextDehydrating>(move |event| callback(&mut event.context));
        self
    }

    /// Registers `callback` to run every time a repository sharing this dispatcher has
    /// been hydrated.
    pub fn hydrated(
        &mut self,
        callback: impl Fn(&mut Repository) + Send + Sync + 'static,
    ) -> &mut Self {
        self.events
            .listen::<ContextHydrated>(move |event| callback(&mut event.context));
        self
    }

    /// Installs a recovery hook for values that fail to decode during [`Self::hydrate`].
    ///
    /// The hook replaces any hook from this repository's [`ContextConfig`]. Other
    /// repositories built from the same configuration are not affected; copies made by
    /// [`Self::dehydrate`] inherit it.
    pub fn handle_decode_errors_using(
        &mut self,
        hook: impl Fn(DecodeFailure<'_>) -> Value + Send + Sync + 'static,
    ) -> &mut Self {
        Arc::make_mut(&mut self.config).set_recovery(Some(Arc::new(hook)));
        self
    }

    /// Removes any recovery hook, so decode failures abort hydration again.
    pub fn propagate_decode_errors(&mut self) -> &mut Self {
        Arc::make_mut(&mut self.config).set_recovery(None);
        self
    }

    /// Produces the transportable form of this repository.
    ///
    /// A detached copy is made first and [`ContextDehydrating`] is fired against it, so
    /// listeners can add or scrub entries destined for the other unit of work without
    /// touching this one. Returns `None` if the copy is empty once listeners have run.
    pub fn dehydrate(&self) -> Result<Option<Snapshot>, Error> {
        let mut event = ContextDehydrating {
            context: self.clone(),
        };
        self.events.dispatch(&mut event);
        let instance = event.context;

        if instance.is_empty() {
            return Ok(None);
        }
        let codec = instance.config.codec();
        Ok(Some(Snapshot {
            data: instance.visible.encode(codec, Visibility::Visible)?,
            hidden: instance.hidden.encode(codec, Visibility::Hidden)?,
        }))
    }

    /// Replaces this repository's contents with the decoded `snapshot`.
    ///
    /// `None` is treated as an empty snapshot, which simply flushes. Every entry is
    /// decoded before anything changes: if an entry fails and no recovery hook is
    /// installed, the error is returned and the repository keeps its prior contents.
    /// Fires [`ContextHydrated`] once the new contents are in place.
    pub fn hydrate(&mut self, snapshot: Option<&Snapshot>) -> Result<&mut Self, Error> {
        let empty = Snapshot::default();
        let snapshot = snapshot.unwrap_or(&empty);

        let visible = Partition::decode(&snapshot.data, &self.config, Visibility::Visible)?;
        let hidden = Partition::decode(&snapshot.hidden, &self.config, Visibility::Hidden)?;

        let mut event = ContextHydrated {
            context: Repository {
                events: self.events.clone(),
                config: self.config.clone(),
                visible,
                hidden,
            },
        };
        self.events.dispatch(&mut event);
        *self = event.context;
        Ok(self)
    }
}
