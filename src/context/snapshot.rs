// SPDX-License-Identifier: MIT OR Apache-2.0
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// A dehydrated repository: every value of each partition, encoded as a string.
///
/// This is the only artifact that crosses a hand-off boundary. Its JSON shape is
/// `{"data": {key: encoded, ..}, "hidden": {key: encoded, ..}}`; either member may be
/// missing on input and is then treated as empty.
///
/// `Debug` output lists hidden keys but never their encoded values.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub hidden: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.hidden.is_empty()
    }
}

impl Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("data", &self.data)
            .field(
                "hidden",
                &self.hidden.keys().map(|key| (key, "<encoded>")).collect::<BTreeMap<_, _>>(),
            )
            .finish()
    }
}
