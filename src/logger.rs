// SPDX-License-Identifier: MIT OR Apache-2.0

//! The context-aware logger.
//!
//! [`Logger`] decorates a [`Writer`]. Every call goes through the same path:
//!
//! 1. the message is rendered to text (see [`Message`]);
//! 2. context is merged: the visible entries of the [current repository](crate::context::with_current),
//!    then the logger's sticky context, then the fields given at the call site, each layer
//!    overriding the one before;
//! 3. the writer's method for that level is called;
//! 4. if a dispatcher is attached, [`MessageLogged`] is published.
//!
//! Hidden context never reaches a record.
//!
//! ```rust
//! use contextwise::{fields, InMemoryWriter, Logger};
//! use std::sync::Arc;
//!
//! let writer = Arc::new(InMemoryWriter::new());
//! let mut logger = Logger::new(writer.clone());
//! logger.with_context(fields! {"service" => "billing"});
//! logger.info("invoice sent", fields! {"invoice" => 12});
//!
//! let record = &writer.records()[0];
//! assert_eq!(record.context, fields! {"service" => "billing", "invoice" => 12});
//! ```

use crate::Level;
use crate::context::current_fields;
use crate::dispatch::{Dispatcher, DispatcherExt};
use crate::error::Error;
use crate::message::Message;
use crate::value::Fields;
use crate::writer::Writer;
use std::sync::Arc;

/// Published after every record is written.
///
/// Listeners receive the record exactly as the writer saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageLogged {
    pub level: Level,
    pub message: String,
    pub context: Fields,
}

#[derive(Debug, Clone)]
pub struct Logger {
    writer: Arc<dyn Writer>,
    dispatcher: Option<Arc<dyn Dispatcher>>,
    context: Fields,
}

impl Logger {
    pub fn new(writer: Arc<dyn Writer>) -> Self {
        Self {
            writer,
            dispatcher: None,
            context: Fields::new(),
        }
    }

    /// Creates a logger that publishes [`MessageLogged`] on `dispatcher`.
    pub fn with_dispatcher(writer: Arc<dyn Writer>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            dispatcher: Some(dispatcher),
            ..Self::new(writer)
        }
    }

    pub fn emergency<'m>(&self, message: impl Into<Message<'m>>, context: Fields) {
        self.write(Level::Emergency, message, context)
    }

    pub fn alert<'m>(&self, message: impl Into<Message<'m>>, context: Fields) {
        self.write(Level::Alert, message, context)
    }

    pub fn critical<'m>(&self, message: impl Into<Message<'m>>, context: Fields) {
        self.write(Level::Critical, message, context)
    }

    pub fn error<'m>(&self, message: impl Into<Message<'m>>, context: Fields) {
        self.write(Level::Error, message, context)
    }

    pub fn warning<'m>(&self, message: impl Into<Message<'m>>, context: Fields) {
        self.write(Level::Warning, message, context)
    }

    pub fn notice<'m>(&self, message: impl Into<Message<'m>>, context: Fields) {
        self.write(Level::Notice, message, context)
    }

    pub fn info<'m>(&self, message: impl Into<Message<'m>>, context: Fields) {
        self.write(Level::Info, message, context)
    }

    pub fn debug<'m>(&self, message: impl Into<Message<'m>>, context: Fields) {
        self.write(Level::Debug, message, context)
    }

    /// Logs at a level chosen at runtime.
    pub fn log<'m>(&self, level: Level, message: impl Into<Message<'m>>, context: Fields) {
        self.write(level, message, context)
    }

    /// The single write path every level method goes through.
    pub fn write<'m>(&self, level: Level, message: impl Into<Message<'m>>, context: Fields) {
        let message = message.into().format();
        let mut merged = current_fields();
        merged.extend(self.context.clone());
        merged.extend(context);

        let writer = &self.writer;
        match level {
            Level::Emergency => writer.emergency(&message, &merged),
            Level::Alert => writer.alert(&message, &merged),
            Level::Critical => writer.critical(&message, &merged),
            Level::Error => writer.error(&message, &merged),
            Level::Warning => writer.warning(&message, &merged),
            Level::Notice => writer.notice(&message, &merged),
            Level::Info => writer.info(&message, &merged),
            Level::Debug => writer.debug(&message, &merged),
        }

        if let Some(dispatcher) = &self.dispatcher {
            dispatcher.dispatch(&mut MessageLogged {
                level,
                message,
                context: merged,
            });
        }
    }

    /// Adds sticky context, sent with every later record. Existing keys are replaced.
    pub fn with_context(&mut self, context: Fields) -> &mut Self {
        self.context.extend(context);
        self
    }

    /// Clears all sticky context.
    pub fn without_context(&mut self) -> &mut Self {
        self.context.clear();
        self
    }

    /// The sticky context.
    pub fn context(&self) -> &Fields {
        &self.context
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

    /// Registers a listener for [`MessageLogged`].
    ///
    /// Fails with [`Error::MissingDispatcher`] when no dispatcher is attached.
    pub fn listen(
        &self,
        listener: impl Fn(&mut MessageLogged) + Send + Sync + 'static,
    ) -> Result<(), Error> {
        let dispatcher = self.dispatcher.as_ref().ok_or(Error::MissingDispatcher)?;
        dispatcher.listen::<MessageLogged>(listener);
        Ok(())
    }

    pub fn writer(&self) -> &Arc<dyn Writer> {
        &self.writer
    }

    pub fn dispatcher(&self) -> Option<&Arc<dyn Dispatcher>> {
        self.dispatcher.as_ref()
    }

    pub fn set_dispatcher(&mut self, dispatcher: Arc<dyn Dispatcher>) -> &mut Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Flushes the underlying writer.
    pub fn flush(&self) {
        self.writer.flush()
    }
}

/*
Boilerplate notes.

# Logger

Clone: yes, a clone shares the writer and dispatcher and copies the sticky context.
PartialEq/Eq/Hash: writers have no equality.  Not implemented.
Default: there is no default writer to pick.  Not implemented.
*/
