// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context repositories: per-unit-of-work key/value state that follows the work.
//!
//! A [`Repository`] holds two partitions. The *visible* partition is for data that is
//! safe to enumerate and log (a request id, a tenant). The *hidden* partition has the
//! same operations but is never included in bulk reads used for display, and is never
//! merged into log records; it is reachable only by explicit key (an auth token).
//!
//! # Overview
//!
//! - [`Repository`]: the store, with stack keys (`push`) and dehydrate/hydrate
//! - [`Snapshot`]: the transport-safe form produced by [`Repository::dehydrate`]
//! - [`ContextDehydrating`] / [`ContextHydrated`]: lifecycle events around the hand-off
//! - [`ScopeGuard`] and [`InScope`]: make a repository the *current* one for a thread
//!   or a future, which is where [`Logger`](crate::Logger) finds ambient fields
//!
//! # Handing context to deferred work
//!
//! ```rust
//! use contextwise::context::Repository;
//! use contextwise::dispatch::EventDispatcher;
//!
//! let events = EventDispatcher::shared();
//! let mut request = Repository::new(events.clone());
//! request.add("request_id", "abc").add_hidden("token", "secret");
//!
//! // before enqueueing
//! let snapshot = request.dehydrate().unwrap();
//!
//! // inside the job
//! let mut job = Repository::new(events);
//! job.hydrate(snapshot.as_ref()).unwrap();
//! assert_eq!(job.get("request_id").and_then(|v| v.as_str()), Some("abc"));
//! assert_eq!(job.get_hidden("token").and_then(|v| v.as_str()), Some("secret"));
//! ```
//!
//! # Stack keys
//!
//! A key that is absent or holds a list may be pushed onto. Pushing onto anything else
//! is an error and changes nothing:
//!
//! ```rust
//! use contextwise::{context::Repository, dispatch::EventDispatcher, fields};
//!
//! let mut context = Repository::new(EventDispatcher::shared());
//! context.push("breadcrumbs", ["login"]).unwrap();
//! context.push("breadcrumbs", ["cart", "checkout"]).unwrap();
//! assert_eq!(context.get("breadcrumbs").unwrap().as_list().unwrap().len(), 3);
//!
//! context.add("user", fields! {"id" => 1});
//! assert!(context.push("user", [2]).is_err());
//! ```

mod events;
mod partition;
mod payload;
mod repository;
mod scope;
mod snapshot;


use std::fmt::Display;

pub use events::{ContextDehydrating, ContextHydrated};
pub use payload::PAYLOAD_KEY;
pub use repository::Repository;
pub use scope::{InScope, ScopeGuard, current_fields, with_current};
pub use snapshot::Snapshot;

/// Which partition of a repository a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Visible => f.write_str("context"),
            Visibility::Hidden => f.write_str("hidden context"),
        }
    }
}
