//! Typed event channel feeding Actor loops
//!
//! A Relay is the sending half of an unbounded channel. The receiving half
//! is consumed by exactly one Actor loop.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
#[cfg(debug_assertions)]
use std::sync::{Arc, OnceLock};

/// Sending side of an event stream consumed by an Actor.
///
/// # Event-Source Naming Convention
///
/// Relays are named after what happened, `{source}_{event}_relay`:
/// - `vessel_selected_relay` - the parent view picked (or cleared) a vessel
/// - `zoom_changed_relay` - the map viewport finished a zoom
/// - `play_pressed_relay` - the user pressed the slideshow play button
///
/// In debug builds a relay must always be sent from the same source
/// location; a second emitter panics.
///
/// # Examples
///
/// ```ignore
/// let (container_resized_relay, mut container_resized_stream) = relay::<()>();
/// container_resized_relay.send(());
/// assert_eq!(container_resized_stream.next().await, Some(()));
/// ```
#[derive(Clone, Debug)]
pub struct Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    sender: UnboundedSender<T>,
    #[cfg(debug_assertions)]
    emit_location: Arc<OnceLock<&'static std::panic::Location<'static>>>,
}

/// Relay sent from a second source location (debug builds only)
#[cfg(debug_assertions)]
#[derive(Debug, Clone)]
pub struct MultipleEmitters {
    pub previous: &'static std::panic::Location<'static>,
    pub current: &'static std::panic::Location<'static>,
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (
            Relay {
                sender,
                #[cfg(debug_assertions)]
                emit_location: Arc::new(OnceLock::new()),
            },
            receiver,
        )
    }

    /// The first sender claims the relay; any other location is rejected.
    #[cfg(debug_assertions)]
    #[track_caller]
    fn check_single_source(&self) -> Result<(), MultipleEmitters> {
        let caller = std::panic::Location::caller();
        let previous = *self.emit_location.get_or_init(|| caller);
        if previous == caller {
            Ok(())
        } else {
            Err(MultipleEmitters {
                previous,
                current: caller,
            })
        }
    }

    /// Send an event. Events sent after the consumer is gone are dropped.
    #[track_caller]
    pub fn send(&self, value: T) {
        #[cfg(debug_assertions)]
        if let Err(error) = self.check_single_source() {
            panic!("{:?}", error);
        }

        let _ = self.sender.unbounded_send(value);
    }
}

pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Clone + Send + Sync + 'static,
{
    Relay::new()
}
