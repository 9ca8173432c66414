//! Map viewport and container collaborators
//!
//! The map engine and the DOM resize observer live outside this crate. The
//! dashboard talks to them only through [`MapViewport`] and
//! [`ResizeObserver`], and owns every registration it makes through guard
//! types that release the registration when dropped.

use crate::dataflow::Relay;
use shared::LatLon;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Zoom used when flying to a selected vessel.
pub const SELECTED_VESSEL_ZOOM: f64 = 15.0;
pub const FLY_TO_DURATION: Duration = Duration::from_millis(1_500);
/// View restored when nothing (or nothing locatable) is selected.
pub const DEFAULT_CENTER: LatLon = LatLon::ORIGIN;
pub const DEFAULT_ZOOM: f64 = 2.0;

/// Selector of the element hosting the map.
pub const MAP_CONTAINER: &str = ".map-card";

pub type ZoomListener = Arc<dyn Fn() + Send + Sync>;
pub type ResizeListener = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The map engine as seen by the dashboard.
pub trait MapViewport: Send + Sync {
    fn zoom(&self) -> f64;
    /// Register `listener` for zoom-end notifications.
    fn on_zoom_change(&self, listener: ZoomListener) -> ListenerId;
    fn off_zoom_change(&self, id: ListenerId);
    /// Animated pan and zoom; `duration` is a hint for the animation.
    fn pan_zoom_to(&self, target: LatLon, zoom: f64, duration: Duration);
    fn reset_view(&self, center: LatLon, zoom: f64);
    /// Drop cached container size and recompute layout.
    fn invalidate_layout(&self);
}

/// Container resize notifications.
pub trait ResizeObserver: Send + Sync {
    /// Start observing `container`. `None` when the container does not exist.
    fn observe_resize(&self, container: &str, listener: ResizeListener) -> Option<Unobserve>;
}

/// Shared reference to the attached map viewport.
#[derive(Clone)]
pub struct ViewportHandle(Arc<dyn MapViewport>);

impl ViewportHandle {
    pub fn new(viewport: Arc<dyn MapViewport>) -> Self {
        Self(viewport)
    }
}

impl std::ops::Deref for ViewportHandle {
    type Target = dyn MapViewport;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for ViewportHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ViewportHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ViewportHandle")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Command issued to the viewport after a selection change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewCommand {
    PanZoomTo {
        target: LatLon,
        zoom: f64,
        duration: Duration,
    },
    ResetView {
        center: LatLon,
        zoom: f64,
    },
}

impl ViewCommand {
    /// Fly to a locatable selection, otherwise fall back to the world view.
    pub fn for_selection(position: Option<LatLon>) -> Self {
        match position {
            Some(target) => ViewCommand::PanZoomTo {
                target,
                zoom: SELECTED_VESSEL_ZOOM,
                duration: FLY_TO_DURATION,
            },
            None => ViewCommand::ResetView {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
            },
        }
    }

    pub fn apply(&self, viewport: &dyn MapViewport) {
        match *self {
            ViewCommand::PanZoomTo { target, zoom, duration } => {
                viewport.pan_zoom_to(target, zoom, duration)
            }
            ViewCommand::ResetView { center, zoom } => viewport.reset_view(center, zoom),
        }
    }
}

/// Zoom notification tagged with the registration that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomNotification {
    pub generation: u64,
    pub is_selected: bool,
}

/// Live zoom listener registration; unregisters itself on drop.
///
/// The selection flag is captured when registering, so a flag change means
/// dropping this subscription and registering a new one.
pub struct ZoomSubscription {
    viewport: ViewportHandle,
    listener_id: ListenerId,
    generation: u64,
}

impl ZoomSubscription {
    pub fn register(
        viewport: &ViewportHandle,
        generation: u64,
        is_selected: bool,
        zoom_changed_relay: Relay<ZoomNotification>,
    ) -> Self {
        let listener: ZoomListener = Arc::new(move || {
            zoom_changed_relay.send(ZoomNotification {
                generation,
                is_selected,
            });
        });
        let listener_id = viewport.on_zoom_change(listener);
        log::debug!("Zoom listener {listener_id:?} registered (selected: {is_selected})");

        Self {
            viewport: viewport.clone(),
            listener_id,
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for ZoomSubscription {
    fn drop(&mut self) {
        self.viewport.off_zoom_change(self.listener_id);
        log::debug!("Zoom listener {:?} unregistered", self.listener_id);
    }
}

/// Active resize observation; stops observing when dropped.
pub struct Unobserve {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Unobserve {
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unobserve(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Unobserve {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Unobserve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unobserve")
            .field("active", &self.release.is_some())
            .finish()
    }
}
