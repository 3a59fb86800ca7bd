//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# contextwise

contextwise carries per-unit-of-work context through your program and into your logs.

# Development status

contextwise is experimental and the API may change.

# The problem

A request arrives with a request id, a tenant and an auth token. Somewhere down the call
stack a log line is written, and later a background job is queued on behalf of that
request. You want the log line to carry the request id without threading it through
every function, and you want the job to run with the same context, without ever printing
the token.

# The repository

A [`context::Repository`] is a key/value store owned by one unit of work. It has two
partitions:

* **visible** entries are safe to enumerate and are merged into every log record;
* **hidden** entries are reachable by explicit key only and never appear in logs.

```rust
use contextwise::context::Repository;
use contextwise::dispatch::EventDispatcher;

let mut context = Repository::new(EventDispatcher::shared());
context.add("request_id", "abc").add_hidden("token", "secret");
context.push("breadcrumbs", ["login"]).unwrap();
```

# Hand-off

To continue a unit of work elsewhere, [`dehydrate`](context::Repository::dehydrate) the
repository into a [`context::Snapshot`], ship it, and
[`hydrate`](context::Repository::hydrate) a fresh repository from it. Listeners registered
with [`dehydrating`](context::Repository::dehydrating) and
[`hydrated`](context::Repository::hydrated) can adjust what crosses the boundary.

Structured values (your own types, via `#[derive(Structured)]`) survive the trip as long
as the receiving side registers them in its [`ContextConfig`].

# Logging

[`Logger`] decorates any [`Writer`]. It merges the visible entries of the current
repository (see [`context::Repository::enter`]), its own sticky context and the call-site
fields, in that order of precedence, and optionally publishes a [`MessageLogged`] event for
every record.

```rust
use contextwise::context::Repository;
use contextwise::dispatch::EventDispatcher;
use contextwise::{fields, InMemoryWriter, Logger};
use std::sync::Arc;

let writer = Arc::new(InMemoryWriter::new());
let logger = Logger::new(writer.clone());

let mut context = Repository::new(EventDispatcher::shared());
context.add("request_id", "abc").add_hidden("token", "secret");
let _guard = context.enter();

logger.info("loaded cart", fields! {"items" => 3});
let record = &writer.records()[0];
assert_eq!(record.context, fields! {"request_id" => "abc", "items" => 3});
```

Three reference writers are provided: [`InMemoryWriter`] for tests, [`StdErrorWriter`] for
stderr (the console on wasm), and [`TracingWriter`] to forward records into `tracing`.

# Multithreading

The current repository is thread-local. If you move a unit of work to another thread,
carry its context along with a snapshot, or wrap a future with
[`context::Repository::in_scope`] so the repository is current whenever it is polled.
*/

mod codec;
mod config;
pub mod context;
pub mod dispatch;
mod error;
mod inmemory_writer;
mod level;
mod log_record;
mod logger;
mod macros;
mod message;
mod stderror_writer;
mod tracing_writer;
mod value;
mod writer;

pub use codec::{Codec, TypeRegistry};
pub use config::{ContextConfig, DecodeFailure, LogConfig, RecoveryHook};
pub use error::{CodecError, Error};
pub use inmemory_writer::InMemoryWriter;
pub use level::Level;
pub use log_record::LogRecord;
pub use logger::{Logger, MessageLogged};
pub use message::{Arrayable, Message};
pub use stderror_writer::StdErrorWriter;
pub use tracing_writer::TracingWriter;
pub use value::{Fields, Object, Structured, Value, fields_to_json};
pub use writer::Writer;

pub use contextwise_proc::Structured;

extern crate self as contextwise;
