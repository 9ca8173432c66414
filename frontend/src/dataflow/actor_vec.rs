//! Collection Actor
//!
//! ActorVec wraps a `MutableVec<T>` written only by its processing task.
//! The handle given to the task exposes whole-list operations; the rest of
//! the dashboard reads the list through signals.

use super::task::{Task, TaskHandle};
use futures::Stream;
use futures_signals::signal::{Signal, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use std::future::Future;
use std::sync::Arc;

/// Collection state container.
///
/// # Examples
///
/// ```ignore
/// let (alerts_fetched_relay, mut alerts_fetched_stream) = relay();
///
/// let alerts = ActorVec::new(vec![], move |alerts| async move {
///     while let Some(fetched) = alerts_fetched_stream.next().await {
///         alerts.replace_cloned(fetched);
///     }
/// });
/// ```
#[derive(Clone, Debug)]
pub struct ActorVec<T>
where
    T: Clone + Send + Sync + 'static,
{
    vec: MutableVec<T>,
    #[allow(dead_code)]
    task_handle: Arc<TaskHandle>,
    #[cfg(debug_assertions)]
    #[allow(dead_code)]
    creation_location: &'static std::panic::Location<'static>,
}

impl<T> ActorVec<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[track_caller]
    pub fn new<F, Fut>(initial_items: Vec<T>, processor: F) -> Self
    where
        F: FnOnce(ActorVecHandle<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let vec = MutableVec::new_with_values(initial_items);
        let vec_handle = ActorVecHandle {
            mutable_vec: vec.clone(),
        };
        let task_handle = Arc::new(Task::start_droppable(processor(vec_handle)));

        Self {
            vec,
            task_handle,
            #[cfg(debug_assertions)]
            creation_location: std::panic::Location::caller(),
        }
    }

    /// Full collection on every change.
    pub fn signal(&self) -> impl Signal<Item = Vec<T>> + use<T> {
        self.vec.signal_vec_cloned().to_signal_cloned()
    }

    pub fn to_stream(&self) -> impl Stream<Item = Vec<T>> + use<T> {
        self.signal().to_stream()
    }
}

/// Write access to an ActorVec, only handed to its processing task.
pub struct ActorVecHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    mutable_vec: MutableVec<T>,
}

impl<T> ActorVecHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Replace the whole collection in one signal emission.
    pub fn replace_cloned(&self, items: Vec<T>) {
        self.mutable_vec.lock_mut().replace_cloned(items);
    }

    pub fn len(&self) -> usize {
        self.mutable_vec.lock_ref().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::relay;
    use futures::StreamExt;
    use tokio::time::{Duration, sleep};

    #[tokio::test]
    async fn test_actor_vec_replaces_whole_list() {
        let (geofences_fetched_relay, mut geofences_fetched_stream) = relay::<Vec<&'static str>>();

        let geofences = ActorVec::new(vec!["Port A"], move |handle| async move {
            while let Some(fetched) = geofences_fetched_stream.next().await {
                handle.replace_cloned(fetched);
            }
        });

        let mut lists = geofences.to_stream();
        assert_eq!(lists.next().await, Some(vec!["Port A"]));

        let fetches = [vec!["Port A", "Suez North"], vec!["Gibraltar"], vec![]];
        for fetched in fetches {
            geofences_fetched_relay.send(fetched.clone());
            sleep(Duration::from_millis(10)).await;
            assert_eq!(geofences.to_stream().next().await, Some(fetched));
        }
    }

    #[tokio::test]
    async fn test_actor_vec_handle_reports_length() {
        let (length_checked_relay, mut length_checked_stream) = relay::<()>();
        let (length_reported_relay, mut length_reported_stream) = relay::<usize>();

        let _alerts = ActorVec::new(vec![1, 2, 3], move |handle| async move {
            while length_checked_stream.next().await.is_some() {
                length_reported_relay.send(handle.len());
            }
        });

        length_checked_relay.send(());
        assert_eq!(length_reported_stream.next().await, Some(3));
    }
}
