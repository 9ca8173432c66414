//! Spawned tasks with owned cancellation
//!
//! `Task::start_droppable` returns a [`TaskHandle`]; dropping the handle
//! aborts the task. Timers and processing loops are kept alive only as long
//! as their owner holds the handle.

use std::future::Future;

pub struct Task;

impl Task {
    /// Spawn `future` on the current runtime and return its owning handle.
    pub fn start_droppable<F>(future: F) -> TaskHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        TaskHandle {
            abort_handle: tokio::spawn(future).abort_handle(),
        }
    }
}

#[derive(Debug)]
pub struct TaskHandle {
    abort_handle: tokio::task::AbortHandle,
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}
