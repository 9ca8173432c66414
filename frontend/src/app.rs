//! HylaDashboard - self-contained Actor+Relay composition root
//!
//! Owns the selected vessel and wires it into the map and the timeline.
//! Dropping the last clone of the dashboard cancels every actor, timer and
//! poller it started.

use crate::connection::{EventFeed, FleetApi};
use crate::dataflow::{Actor, Relay, relay};
use crate::timeline::EventTimeline;
use crate::vessel_map::VesselMap;
use crate::viewport::{MapViewport, ResizeObserver};
use futures::StreamExt;
use futures_signals::signal::{Signal, SignalExt};
use shared::{DashboardConfig, TimelineEvent, VesselSnapshot};
use std::sync::Arc;

/// External collaborators the dashboard runs against.
#[derive(Clone)]
pub struct DashboardServices {
    pub fleet_api: Arc<dyn FleetApi>,
    pub event_feed: Arc<dyn EventFeed>,
    pub resize_observer: Arc<dyn ResizeObserver>,
}

/// Self-contained Hyla dashboard
#[derive(Clone, Debug)]
pub struct Dashboard {
    /// Vessel picked in the fleet list, shared by map and timeline
    pub selected_vessel: Actor<Option<VesselSnapshot>>,

    /// Tracked vessels, marker geometry and viewport sync
    pub map: VesselMap,

    /// Polled events, vessel alerts and slideshow
    pub timeline: EventTimeline,

    vessel_selected_relay: Relay<Option<VesselSnapshot>>,
}

impl Dashboard {
    /// Must be called from inside a tokio runtime.
    pub fn new(
        services: DashboardServices,
        config: &DashboardConfig,
        initial_events: Vec<TimelineEvent>,
    ) -> Self {
        let (vessel_selected_relay, mut vessel_selected_stream) =
            relay::<Option<VesselSnapshot>>();

        let selected_vessel = Actor::new(None, move |state| async move {
            while let Some(vessel) = vessel_selected_stream.next().await {
                match &vessel {
                    Some(vessel) => {
                        log::info!("Vessel selected: {}", vessel.name().unwrap_or("<unnamed>"))
                    }
                    None => log::info!("Vessel selection cleared"),
                }
                state.set_neq(vessel);
            }
        });

        let map = VesselMap::new(
            &selected_vessel,
            services.fleet_api.clone(),
            services.resize_observer.as_ref(),
        );
        let timeline = EventTimeline::new(
            &selected_vessel,
            services.fleet_api,
            services.event_feed,
            initial_events,
            &config.timeline,
        );

        Self {
            selected_vessel,
            map,
            timeline,
            vessel_selected_relay,
        }
    }

    pub fn select_vessel(&self, vessel: Option<VesselSnapshot>) {
        self.vessel_selected_relay.send(vessel);
    }

    pub fn attach_viewport(&self, viewport: Arc<dyn MapViewport>) {
        self.map.attach_viewport(viewport);
    }

    /// Voyage panel of the selected vessel, `None` without a selection.
    pub fn voyage_details_signal(&self) -> impl Signal<Item = Option<VoyageDetails>> + use<> {
        self.selected_vessel
            .signal_ref(|vessel| vessel.as_ref().map(VoyageDetails::for_vessel))
    }

    /// Release external registrations, stop playback and polling.
    pub fn teardown(&self) {
        self.timeline.slideshow.stop();
        self.timeline.teardown();
        self.map.teardown();
        log::debug!("Dashboard torn down");
    }
}

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Debug, PartialEq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// Voyage details shown next to the map for the selected vessel.
#[derive(Clone, Debug, PartialEq)]
pub struct VoyageDetails {
    pub rows: Vec<DetailRow>,
}

impl VoyageDetails {
    pub fn for_vessel(vessel: &VesselSnapshot) -> Self {
        let field = |value: Option<&String>| {
            value
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };
        let destination = field(vessel.ais.destination.as_ref());
        let eta = field(vessel.ais.eta.as_ref());

        // Arrival port, duration and cargo are not part of the AIS feed.
        let rows = [
            ("Departure Port", destination),
            ("Arrival Port", NOT_AVAILABLE.to_string()),
            ("Arrival Date", eta.clone()),
            ("Actual Arrival Date", eta),
            ("Voyage Duration", NOT_AVAILABLE.to_string()),
            ("Cargo Type", NOT_AVAILABLE.to_string()),
            ("Quantity", NOT_AVAILABLE.to_string()),
            ("Unit", NOT_AVAILABLE.to_string()),
        ]
        .into_iter()
        .map(|(label, value)| DetailRow { label, value })
        .collect();

        Self { rows }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}
