//! Vessel map: tracked vessels, marker geometry and viewport sync
//!
//! Keeps the external map viewport in step with the selected vessel and the
//! map container size, and derives the selected marker from the zoom level.

use crate::connection::FleetApi;
use crate::dataflow::{Actor, ActorVec, Relay, relay};
use crate::marker::{INITIAL_MARKER_ZOOM, MarkerGeometry, VesselMarker, size_for};
use crate::viewport::{
    MAP_CONTAINER, MapViewport, ResizeListener, ResizeObserver, Unobserve, ViewCommand,
    ViewportHandle, ZoomNotification, ZoomSubscription,
};
use futures::channel::mpsc::UnboundedReceiver;
use futures::{StreamExt, select};
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, Signal, SignalExt};
use shared::{LatLon, VesselSnapshot};
use std::sync::Arc;

/// Options the map engine is created with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapOptions {
    pub initial_center: LatLon,
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// North-west and south-east corners the view may not leave.
    pub max_bounds: [LatLon; 2],
    pub max_bounds_viscosity: f64,
}

pub const MAP_OPTIONS: MapOptions = MapOptions {
    initial_center: LatLon::ORIGIN,
    initial_zoom: 6.0,
    min_zoom: 1.5,
    max_zoom: 15.0,
    max_bounds: [
        LatLon { lat: 90.0, lon: -180.0 },
        LatLon { lat: -90.0, lon: 180.0 },
    ],
    max_bounds_viscosity: 8.0,
};

impl Default for MapOptions {
    fn default() -> Self {
        MAP_OPTIONS
    }
}

/// Map domain with Actor+Relay architecture
#[derive(Clone, Debug)]
pub struct VesselMap {
    /// Tracked vessels, loaded once on creation
    pub vessels: ActorVec<VesselSnapshot>,
    /// Attached map engine, if any
    pub viewport: Actor<Option<ViewportHandle>>,
    pub marker_geometry: Actor<MarkerGeometry>,
    /// Last command issued to the viewport
    pub view_command: Actor<Option<ViewCommand>>,
    /// Number of layout invalidations forwarded to the viewport
    pub layout_invalidations: Actor<usize>,

    selected_vessel: Actor<Option<VesselSnapshot>>,
    resize_observation: Mutable<Option<Unobserve>>,

    viewport_attached_relay: Relay<ViewportHandle>,
    viewport_detached_relay: Relay<()>,
}

impl VesselMap {
    pub fn new(
        selected_vessel: &Actor<Option<VesselSnapshot>>,
        api: Arc<dyn FleetApi>,
        resize_observer: &dyn ResizeObserver,
    ) -> Self {
        let (viewport_attached_relay, viewport_attached_stream) = relay::<ViewportHandle>();
        let (viewport_detached_relay, viewport_detached_stream) = relay::<()>();
        let (container_resized_relay, container_resized_stream) = relay::<()>();

        let vessels = Self::create_vessels_actor(api);
        let viewport =
            Self::create_viewport_actor(viewport_attached_stream, viewport_detached_stream);
        let marker_geometry = Self::create_marker_geometry_actor(selected_vessel, &viewport);
        let view_command = Self::create_view_command_actor(selected_vessel, &viewport);
        let layout_invalidations =
            Self::create_layout_actor(&viewport, container_resized_stream);

        let listener: ResizeListener = Arc::new(move || container_resized_relay.send(()));
        let observation = resize_observer.observe_resize(MAP_CONTAINER, listener);
        if observation.is_none() {
            log::warn!("Map container '{MAP_CONTAINER}' not found, layout will not follow resizes");
        }

        Self {
            vessels,
            viewport,
            marker_geometry,
            view_command,
            layout_invalidations,
            selected_vessel: selected_vessel.clone(),
            resize_observation: Mutable::new(observation),
            viewport_attached_relay,
            viewport_detached_relay,
        }
    }

    fn create_vessels_actor(api: Arc<dyn FleetApi>) -> ActorVec<VesselSnapshot> {
        ActorVec::new(vec![], move |vessels| async move {
            match api.fetch_tracked_vessels().await {
                Ok(fetched) => {
                    log::info!("Loaded {} tracked vessels", fetched.len());
                    vessels.replace_cloned(fetched);
                }
                Err(error) => log::error!("Failed to fetch tracked vessels: {error}"),
            }
        })
    }

    fn create_viewport_actor(
        mut viewport_attached_stream: UnboundedReceiver<ViewportHandle>,
        mut viewport_detached_stream: UnboundedReceiver<()>,
    ) -> Actor<Option<ViewportHandle>> {
        Actor::new(None, move |state| async move {
            loop {
                select! {
                    attached = viewport_attached_stream.next() => match attached {
                        Some(viewport) => {
                            log::debug!("Map viewport attached");
                            state.set_neq(Some(viewport));
                        }
                        None => break,
                    },
                    detached = viewport_detached_stream.next() => match detached {
                        Some(()) => {
                            log::debug!("Map viewport detached");
                            state.set_neq(None);
                        }
                        None => break,
                    },
                }
            }
        })
    }

    /// Marker geometry following the viewport zoom.
    ///
    /// One zoom listener is registered at a time, carrying the selection
    /// flag it was registered with. Any selection or viewport change drops
    /// it and registers a fresh one under a new generation; notifications
    /// from older generations are ignored.
    fn create_marker_geometry_actor(
        selected_vessel: &Actor<Option<VesselSnapshot>>,
        viewport: &Actor<Option<ViewportHandle>>,
    ) -> Actor<MarkerGeometry> {
        let mut is_selected_stream = selected_vessel
            .signal_ref(|vessel| vessel.is_some())
            .to_stream()
            .fuse();
        let mut viewport_stream = viewport.signal().to_stream().fuse();

        Actor::new(size_for(INITIAL_MARKER_ZOOM, false), move |state| async move {
            let (zoom_changed_relay, mut zoom_changed_stream) = relay::<ZoomNotification>();
            let mut is_selected = false;
            let mut viewport: Option<ViewportHandle> = None;
            let mut subscription: Option<ZoomSubscription> = None;
            let mut generation = 0u64;

            loop {
                select! {
                    selected = is_selected_stream.next() => match selected {
                        Some(selected) => is_selected = selected,
                        None => break,
                    },
                    attached = viewport_stream.next() => match attached {
                        Some(attached) => viewport = attached,
                        None => break,
                    },
                    notification = zoom_changed_stream.next() => {
                        let Some(notification) = notification else { break };
                        let current = subscription
                            .as_ref()
                            .is_some_and(|active| active.generation() == notification.generation);
                        match (&viewport, current) {
                            (Some(viewport), true) => {
                                state.set_neq(size_for(viewport.zoom(), notification.is_selected));
                            }
                            _ => log::debug!(
                                "Stale zoom notification (generation {}) ignored",
                                notification.generation
                            ),
                        }
                        continue;
                    },
                };

                // Unregister before registering the replacement.
                subscription = None;
                if let Some(viewport) = &viewport {
                    generation += 1;
                    subscription = Some(ZoomSubscription::register(
                        viewport,
                        generation,
                        is_selected,
                        zoom_changed_relay.clone(),
                    ));
                    state.set_neq(size_for(viewport.zoom(), is_selected));
                }
            }
        })
    }

    /// Recenter on every selection change, and on attach.
    fn create_view_command_actor(
        selected_vessel: &Actor<Option<VesselSnapshot>>,
        viewport: &Actor<Option<ViewportHandle>>,
    ) -> Actor<Option<ViewCommand>> {
        let mut targets = map_ref! {
            let vessel = selected_vessel.signal(),
            let attached = viewport.signal() =>
            (vessel.as_ref().and_then(VesselSnapshot::position), attached.clone())
        }
        .to_stream();

        Actor::new(None, move |state| async move {
            while let Some((position, viewport)) = targets.next().await {
                let Some(viewport) = viewport else {
                    log::debug!("No map viewport, recentering skipped");
                    continue;
                };
                let command = ViewCommand::for_selection(position);
                log::debug!("Recentering map: {command:?}");
                command.apply(&*viewport);
                state.set(Some(command));
            }
        })
    }

    fn create_layout_actor(
        viewport: &Actor<Option<ViewportHandle>>,
        mut container_resized_stream: UnboundedReceiver<()>,
    ) -> Actor<usize> {
        let mut viewport_stream = viewport.signal().to_stream().fuse();

        Actor::new(0, move |state| async move {
            let mut viewport: Option<ViewportHandle> = None;
            loop {
                select! {
                    attached = viewport_stream.next() => match attached {
                        Some(attached) => viewport = attached,
                        None => break,
                    },
                    resized = container_resized_stream.next() => match resized {
                        Some(()) => match &viewport {
                            Some(viewport) => {
                                viewport.invalidate_layout();
                                state.replace_with(|count| *count + 1);
                            }
                            None => log::debug!("Map container resized before viewport attached"),
                        },
                        None => break,
                    },
                }
            }
        })
    }

    pub fn attach_viewport(&self, viewport: Arc<dyn MapViewport>) {
        self.viewport_attached_relay.send(ViewportHandle::new(viewport));
    }

    pub fn detach_viewport(&self) {
        self.viewport_detached_relay.send(());
    }

    /// The selected vessel's marker, `None` without a locatable selection.
    pub fn selected_marker_signal(&self) -> impl Signal<Item = Option<VesselMarker>> + use<> {
        map_ref! {
            let vessel = self.selected_vessel.signal(),
            let geometry = self.marker_geometry.signal() =>
            vessel
                .as_ref()
                .and_then(|vessel| VesselMarker::for_vessel(vessel, *geometry))
        }
        .dedupe_cloned()
    }

    /// Stop following the container and release the viewport.
    ///
    /// Detaching drops the zoom listener registration.
    pub fn teardown(&self) {
        if let Some(observation) = self.resize_observation.replace(None) {
            observation.unobserve();
            log::debug!("Stopped observing '{MAP_CONTAINER}'");
        }
        self.detach_viewport();
    }
}
