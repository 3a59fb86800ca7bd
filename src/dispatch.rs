// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronous, in-process event dispatch.
//!
//! Both the context repository (hydration lifecycle) and the logger (`MessageLogged`)
//! publish through a [`Dispatcher`]. Events are plain Rust types; listeners are
//! registered per event type and receive the event by `&mut`, so a listener may change
//! what later listeners and the emitting code observe.
//!
//! # Architecture
//!
//! [`Dispatcher`] is object safe and works in terms of `TypeId` and `dyn Any`, so it can
//! be shared as `Arc<dyn Dispatcher>`. The typed API lives on [`DispatcherExt`], which is
//! implemented for every dispatcher.
//!
//! ```rust
//! use contextwise::dispatch::{DispatcherExt, EventDispatcher};
//!
//! struct Ping(u32);
//!
//! let events = EventDispatcher::new();
//! events.listen::<Ping>(|ping| ping.0 += 1);
//! events.listen::<Ping>(|ping| ping.0 *= 10);
//!
//! let mut ping = Ping(1);
//! events.dispatch(&mut ping);
//! assert_eq!(ping.0, 20);
//! ```

use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// A type-erased listener.
pub type Listener = Arc<dyn Fn(&mut dyn Any) + Send + Sync>;

pub trait Dispatcher: Debug + Send + Sync {
    /// Registers `listener` for events whose type is `event`.
    fn listen_erased(&self, event: TypeId, listener: Listener);

    /// Delivers `payload` to every listener registered for `event`, in registration order.
    fn dispatch_erased(&self, event: TypeId, payload: &mut dyn Any);
}

pub trait DispatcherExt: Dispatcher {
    fn listen<E: Any>(&self, listener: impl Fn(&mut E) + Send + Sync + 'static) {
        self.listen_erased(
            TypeId::of::<E>(),
            Arc::new(move |payload: &mut dyn Any| {
                if let Some(event) = payload.downcast_mut::<E>() {
                    listener(event);
                }
            }),
        );
    }

    fn dispatch<E: Any>(&self, event: &mut E) {
        self.dispatch_erased(TypeId::of::<E>(), event);
    }
}

impl<D: Dispatcher + ?Sized> DispatcherExt for D {}

/// The default [`Dispatcher`].
#[derive(Default)]
pub struct EventDispatcher {
    listeners: RwLock<HashMap<TypeId, Vec<Listener>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher ready to be handed to repositories and loggers.
    pub fn shared() -> Arc<dyn Dispatcher> {
        Arc::new(Self::new())
    }

    pub fn has_listeners<E: Any>(&self) -> bool {
        self.listeners
            .read()
            .get(&TypeId::of::<E>())
            .is_some_and(|listeners| !listeners.is_empty())
    }
}

impl Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.read();
        f.debug_struct("EventDispatcher")
            .field("event_types", &listeners.len())
            .field(
                "listeners",
                &listeners.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}

impl Dispatcher for EventDispatcher {
    fn listen_erased(&self, event: TypeId, listener: Listener) {
        self.listeners.write().entry(event).or_default().push(listener);
    }

    fn dispatch_erased(&self, event: TypeId, payload: &mut dyn Any) {
        // Copy the list out so listeners can register listeners without deadlocking.
        let listeners = match self.listeners.read().get(&event) {
            Some(listeners) => listeners.clone(),
            None => return,
        };
        for listener in listeners {
            listener(payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::*;

    struct Renamed(String);
    struct Other;

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn listeners_run_in_registration_order() {
        let events = EventDispatcher::new();
        events.listen::<Renamed>(|e| e.0.push('a'));
        events.listen::<Renamed>(|e| e.0.push('b'));
        let mut event = Renamed(String::new());
        events.dispatch(&mut event);
        assert_eq!(event.0, "ab");
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn events_are_routed_by_type() {
        let events = EventDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        events.listen::<Other>(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        events.dispatch(&mut Renamed("x".into()));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        events.dispatch(&mut Other);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(events.has_listeners::<Other>());
        assert!(!events.has_listeners::<Renamed>());
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn listener_may_register_listeners() {
        let events: Arc<dyn Dispatcher> = EventDispatcher::shared();
        let inner = events.clone();
        events.listen::<Other>(move |_| inner.listen::<Renamed>(|e| e.0.push('!')));
        events.dispatch(&mut Other);
        let mut event = Renamed(String::new());
        events.dispatch(&mut event);
        assert_eq!(event.0, "!");
    }
}
