//! Hyla dashboard client core
//!
//! Reactive state behind the fleet map and the alert timeline. Rendering is
//! left to the host; it feeds selections and viewport events in and reads
//! state back through signals.

pub mod app;
pub mod connection;
pub mod dataflow;
pub mod marker;
pub mod timeline;
pub mod vessel_map;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use app::{Dashboard, DashboardServices};
