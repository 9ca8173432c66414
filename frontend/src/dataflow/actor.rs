//! Single-value Actor
//!
//! An Actor owns a `Mutable<T>` and a processing task. The task is the only
//! writer; everyone else observes the value through signals.

use super::task::{Task, TaskHandle};
use futures::Stream;
use futures_signals::signal::{Mutable, Signal, SignalExt};
use std::future::Future;
use std::sync::Arc;

/// Single-value state container.
///
/// The processing task is aborted when the last clone of the Actor is
/// dropped, which also drops everything the task owns (timers, viewport
/// subscriptions, cached collaborators).
///
/// # Examples
///
/// ```ignore
/// let (vessel_selected_relay, mut vessel_selected_stream) = relay();
///
/// let selected_vessel = Actor::new(None, move |state| async move {
///     while let Some(vessel) = vessel_selected_stream.next().await {
///         state.set(vessel);
///     }
/// });
/// ```
#[derive(Clone, Debug)]
pub struct Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    state: Mutable<T>,
    #[allow(dead_code)]
    task_handle: Arc<TaskHandle>,
    #[cfg(debug_assertions)]
    #[allow(dead_code)]
    creation_location: &'static std::panic::Location<'static>,
}

impl<T> Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an Actor with `initial_state` and start its processing loop.
    ///
    /// Must be called from inside a tokio runtime.
    #[track_caller]
    pub fn new<F, Fut>(initial_state: T, processor: F) -> Self
    where
        F: FnOnce(Mutable<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = Mutable::new(initial_state);
        let task_handle = Arc::new(Task::start_droppable(processor(state.clone())));

        Self {
            state,
            task_handle,
            #[cfg(debug_assertions)]
            creation_location: std::panic::Location::caller(),
        }
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.state.signal_cloned()
    }

    pub fn signal_ref<U, F>(&self, f: F) -> impl Signal<Item = U> + use<T, U, F>
    where
        U: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        self.state.signal_ref(f).dedupe_cloned()
    }

    /// Stream of the current value followed by every later change.
    ///
    /// Intermediate values may be skipped when several writes happen
    /// between two polls; the latest value is always delivered.
    pub fn to_stream(&self) -> impl Stream<Item = T> + use<T> {
        self.signal().to_stream()
    }
}
