// SPDX-License-Identifier: MIT OR Apache-2.0

//! Carrying a snapshot inside a JSON job payload.
//!
//! Queues usually move a JSON object from the producer to the worker. These helpers
//! store the snapshot under [`PAYLOAD_KEY`] on the way in and restore it on the way
//! out, leaving every other member of the payload alone.
//!
//! ```rust
//! use contextwise::context::{Repository, PAYLOAD_KEY};
//! use contextwise::dispatch::EventDispatcher;
//!
//! let events = EventDispatcher::shared();
//! let mut request = Repository::new(events.clone());
//! request.add("trace", "t-1");
//!
//! let mut payload = serde_json::Map::new();
//! payload.insert("job".into(), "SendInvoice".into());
//! assert!(request.attach_to(&mut payload).unwrap());
//! assert!(payload.contains_key(PAYLOAD_KEY));
//!
//! let mut worker = Repository::new(events);
//! worker.hydrate_from(&payload).unwrap();
//! assert_eq!(worker.get("trace").unwrap().as_str(), Some("t-1"));
//! ```

use super::{Repository, Snapshot};
use crate::Error;
use serde::Deserialize;
use serde_json::{Map, Value as Json};

/// The payload member holding the dehydrated context.
pub const PAYLOAD_KEY: &str = "contextwise:context";

impl Repository {
    /// Dehydrates into `payload`. Returns `false`, leaving the payload untouched, when
    /// there is nothing to carry.
    pub fn attach_to(&self, payload: &mut Map<String, Json>) -> Result<bool, Error> {
        let Some(snapshot) = self.dehydrate()? else {
            return Ok(false);
        };
        payload.insert(PAYLOAD_KEY.to_string(), serde_json::to_value(snapshot)?);
        Ok(true)
    }

    /// Hydrates from the snapshot stored in `payload`. A payload without one hydrates
    /// an empty snapshot.
    pub fn hydrate_from(&mut self, payload: &Map<String, Json>) -> Result<&mut Self, Error> {
        let snapshot: Option<Snapshot> = match payload.get(PAYLOAD_KEY) {
            None | Some(Json::Null) => None,
            Some(raw) => Some(Snapshot::deserialize(raw)?),
        };
        self.hydrate(snapshot.as_ref())
    }
}
