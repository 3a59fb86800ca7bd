// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle events fired around a hand-off.

use super::Repository;

/// Fired by [`Repository::dehydrate`] before any value is encoded.
///
/// `context` is a detached copy of the repository being dehydrated. Listeners may add,
/// change or scrub entries; the snapshot is read from this copy after every listener
/// has run, and the repository that is being dehydrated is never affected.
#[derive(Debug)]
pub struct ContextDehydrating {
    pub context: Repository,
}

/// Fired by [`Repository::hydrate`] after the decoded entries are loaded.
///
/// `context` is the hydrated repository itself; changes made by listeners persist.
#[derive(Debug)]
pub struct ContextHydrated {
    pub context: Repository,
}
