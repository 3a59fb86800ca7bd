// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::value::Fields;
use std::fmt::Debug;

/// A leveled log sink.
///
/// The [`Logger`](crate::Logger) decorates a `Writer`: it formats the message and merges
/// context, then calls the method named after the record's level. Implementors only
/// need [`Self::log`]; the per-level methods forward to it unless overridden.
pub trait Writer: Debug + Send + Sync {
    /**
    Submits a record to the sink.

    `context` is already merged; the writer decides how (and whether) to render it.
    */
    fn log(&self, level: Level, message: &str, context: &Fields);

    fn emergency(&self, message: &str, context: &Fields) {
        self.log(Level::Emergency, message, context)
    }

    fn alert(&self, message: &str, context: &Fields) {
        self.log(Level::Alert, message, context)
    }

    fn critical(&self, message: &str, context: &Fields) {
        self.log(Level::Critical, message, context)
    }

    fn error(&self, message: &str, context: &Fields) {
        self.log(Level::Error, message, context)
    }

    fn warning(&self, message: &str, context: &Fields) {
        self.log(Level::Warning, message, context)
    }

    fn notice(&self, message: &str, context: &Fields) {
        self.log(Level::Notice, message, context)
    }

    fn info(&self, message: &str, context: &Fields) {
        self.log(Level::Info, message, context)
    }

    fn debug(&self, message: &str, context: &Fields) {
        self.log(Level::Debug, message, context)
    }

    /**
    The application may imminently exit.  Ensure all buffers are flushed and up to date.
    */
    fn flush(&self) {}
}

/*
Boilerplate notes.

# Writer

Clone on a writer doesn't make sense; writers are shared through Arc.
PartialEq/Eq/Hash: unclear if we mean data equality or provenance.  Not implemented.
Default is not sensible since who knows how the writer is constructed.
Send/Sync are required: a Logger may be used from any thread.
*/
