// SPDX-License-Identifier: MIT OR Apache-2.0

//! The current repository for a thread.
//!
//! A repository can be made *current* so that code deep inside a unit of work can reach
//! it without it being passed around, and so the [`Logger`](crate::Logger) can merge its
//! visible entries into every record. The slot is thread-local: units of work running on
//! other threads never see it.
//!
//! Entered repositories form a per-thread stack and the top of the stack is current.
//! Each [`ScopeGuard`] removes exactly its own entry, so guards may be dropped in any
//! order.
//!
//! ```rust
//! use contextwise::context::{self, Repository};
//! use contextwise::dispatch::EventDispatcher;
//!
//! let guard = Repository::new(EventDispatcher::shared()).enter();
//! context::with_current(|context| {
//!     context.add("step", "validate");
//! });
//! assert!(context::current_fields().contains_key("step"));
//!
//! let repository = guard.exit().unwrap();
//! assert!(repository.has("step"));
//! assert!(context::current_fields().is_empty());
//! ```

use super::Repository;
use crate::value::Fields;
use std::cell::RefCell;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::Poll;

static SCOPE_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
struct Frame {
    id: u64,
    repository: Repository,
}

thread_local! {
    static STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Removes the frame entered with `id`, wherever it sits on this thread's stack.
fn take_frame(id: u64) -> Option<Repository> {
    STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let position = stack.iter().rposition(|frame| frame.id == id)?;
        Some(stack.remove(position).repository)
    })
}

/// Ends its scope when dropped or exited.
///
/// The guard is `!Send`: it refers to this thread's stack.
#[derive(Debug)]
#[must_use = "the repository stops being current when the guard is dropped"]
pub struct ScopeGuard {
    id: u64,
    active: bool,
    _not_send: PhantomData<*const ()>,
}

impl ScopeGuard {
    /// Ends the scope and hands back the repository it entered.
    ///
    /// Returns `None` if that repository is no longer on this thread's stack, which
    /// happens when the guard outlives the [`InScope`] poll it was created in.
    pub fn exit(mut self) -> Option<Repository> {
        self.restore()
    }

    fn restore(&mut self) -> Option<Repository> {
        if !self.active {
            return None;
        }
        self.active = false;
        let repository = take_frame(self.id);
        if repository.is_none() {
            tracing::debug!(scope = self.id, "scope is not on this thread's stack");
        }
        repository
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

impl Repository {
    /// Makes this repository current for this thread until the guard is dropped or
    /// exited. Scopes nest; whichever entered repository is still in scope and was
    /// entered last is current.
    ///
    /// # Panics
    ///
    /// Panics if called from inside [`with_current`].
    pub fn enter(self) -> ScopeGuard {
        let id = SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        STACK.with(|stack| {
            stack.borrow_mut().push(Frame {
                id,
                repository: self,
            })
        });
        ScopeGuard {
            id,
            active: true,
            _not_send: PhantomData,
        }
    }

    /// Wraps `future` so this repository is current whenever it is polled.
    pub fn in_scope<F: Future>(self, future: F) -> InScope<F> {
        InScope {
            repository: Some(self),
            suspended: Vec::new(),
            future,
        }
    }
}

/// Runs `f` against the current repository.
///
/// Returns `None` when no repository is current on this thread, or when called from
/// inside another `with_current`.
pub fn with_current<R>(f: impl FnOnce(&mut Repository) -> R) -> Option<R> {
    STACK.with(|stack| {
        let mut stack = stack.try_borrow_mut().ok()?;
        stack.last_mut().map(|frame| f(&mut frame.repository))
    })
}

/// The visible entries of the current repository, or nothing.
pub fn current_fields() -> Fields {
    STACK.with(|stack| {
        stack
            .try_borrow()
            .ok()
            .and_then(|stack| stack.last().map(|frame| frame.repository.all().clone()))
            .unwrap_or_default()
    })
}

/// A [`Future`] that makes its repository current around every poll.
///
/// Executors that move tasks between threads do not carry thread-local state along;
/// `InScope` re-installs the repository on whichever thread polls it. Scopes the
/// wrapped future enters and keeps open across an `.await` are set aside with it and
/// re-installed on the next poll, so they never stay current for other tasks.
pub struct InScope<F> {
    repository: Option<Repository>,
    suspended: Vec<Frame>,
    future: F,
}

impl<F> Future for InScope<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        //safety: `future` is never moved out of `self`; the other fields are not pinned
        let (repository, suspended, fut) = unsafe {
            let d = self.get_unchecked_mut();
            (
                &mut d.repository,
                &mut d.suspended,
                Pin::new_unchecked(&mut d.future),
            )
        };
        let Some(entering) = repository.take() else {
            return fut.poll(cx);
        };
        let guard = entering.enter();
        STACK.with(|stack| stack.borrow_mut().append(suspended));
        let r = fut.poll(cx);
        STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(position) = stack.iter().rposition(|frame| frame.id == guard.id) {
                *suspended = stack.split_off(position + 1);
            }
        });
        *repository = guard.exit();
        r
    }
}
