//! Alert timeline: event store, vessel alerts and slideshow playback
//!
//! The event sequence is polled on a fixed cadence and merged by id. The
//! alert list follows the selected vessel. The slideshow cursor moves over
//! the event sequence and highlights the matching alert row.

pub mod alerts;
pub mod events;
pub mod slideshow;

use crate::connection::{EventFeed, FleetApi};
use crate::dataflow::{Actor, ActorVec, Relay, relay};
use alerts::{AlertRow, NO_ALERTS_MESSAGE, alert_rows, alerts_for_vessel};
use events::TimelineEvents;
use futures::channel::mpsc::UnboundedReceiver;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt, select};
use futures_signals::map_ref;
use futures_signals::signal::{Signal, SignalExt};
use shared::{AlertRecord, TimelineEvent, TimelineSection, VesselSnapshot};
use slideshow::Slideshow;
use std::sync::Arc;
use tokio::time::{Instant, interval_at};

/// Timeline domain with Actor+Relay architecture
#[derive(Clone, Debug)]
pub struct EventTimeline {
    /// Seeded events plus every new event observed by the poller
    pub events: Actor<TimelineEvents>,
    /// Alerts of the selected vessel, replaced on each selection
    pub alerts: ActorVec<AlertRecord>,
    pub slideshow: Slideshow,
    teardown_requested_relay: Relay<()>,
}

impl EventTimeline {
    pub fn new(
        selected_vessel: &Actor<Option<VesselSnapshot>>,
        api: Arc<dyn FleetApi>,
        event_feed: Arc<dyn EventFeed>,
        initial_events: Vec<TimelineEvent>,
        config: &TimelineSection,
    ) -> Self {
        let (teardown_requested_relay, teardown_requested_stream) = relay();
        let events = Self::create_events_actor(
            event_feed,
            initial_events,
            config,
            teardown_requested_stream,
        );
        let alerts = Self::create_alerts_actor(selected_vessel, api);
        let slideshow = Slideshow::new(&events, config.slideshow_interval());

        Self {
            events,
            alerts,
            slideshow,
            teardown_requested_relay,
        }
    }

    /// Stop polling. Polls still in flight are dropped; events stay readable.
    pub fn teardown(&self) {
        self.teardown_requested_relay.send(());
    }

    /// Event store that owns the poller.
    ///
    /// A tick never waits for earlier polls unless `single_flight_polls` is
    /// set; results are appended in the order they arrive.
    fn create_events_actor(
        event_feed: Arc<dyn EventFeed>,
        initial_events: Vec<TimelineEvent>,
        config: &TimelineSection,
        mut teardown_requested_stream: UnboundedReceiver<()>,
    ) -> Actor<TimelineEvents> {
        let poll_interval = config.poll_interval();
        let single_flight = config.single_flight_polls;

        Actor::new(TimelineEvents::seeded(initial_events), move |state| async move {
            let mut ticker = interval_at(Instant::now() + poll_interval, poll_interval);
            let mut in_flight = FuturesUnordered::new();

            loop {
                select! {
                    _ = ticker.tick().fuse() => {
                        if single_flight && !in_flight.is_empty() {
                            log::debug!("Previous timeline poll still running, tick skipped");
                            continue;
                        }
                        in_flight.push(fetch_candidate(event_feed.clone()));
                    }
                    candidate = in_flight.select_next_some() => {
                        let Some(event) = candidate else { continue };
                        if state.lock_ref().contains(&event.id) {
                            log::debug!("Timeline event '{}' already known", event.id);
                            continue;
                        }
                        log::info!("Timeline event '{}' appended: {}", event.id, event.title);
                        state.lock_mut().append(event);
                    }
                    _ = teardown_requested_stream.next() => {
                        log::debug!("Timeline polling stopped");
                        break;
                    }
                }
            }
        })
    }

    /// Alert list following the selected vessel.
    ///
    /// Clearing the selection keeps the previous list. A fetch failure keeps
    /// it too. Fetches run one at a time and the newest selection wins.
    fn create_alerts_actor(
        selected_vessel: &Actor<Option<VesselSnapshot>>,
        api: Arc<dyn FleetApi>,
    ) -> ActorVec<AlertRecord> {
        let mut selected_vessel_stream = selected_vessel.signal().to_stream();

        ActorVec::new(vec![], move |alerts| async move {
            while let Some(selected) = selected_vessel_stream.next().await {
                let Some(vessel_name) = selected.as_ref().and_then(VesselSnapshot::name) else {
                    log::debug!("No named vessel selected, keeping {} alerts", alerts.len());
                    continue;
                };

                match api.fetch_alerts().await {
                    Ok(feed) => {
                        let matching = alerts_for_vessel(feed, vessel_name);
                        log::info!("{} alerts for {vessel_name}", matching.len());
                        alerts.replace_cloned(matching);
                    }
                    Err(error) => {
                        log::error!("Failed to fetch alerts for {vessel_name}: {error}");
                    }
                }
            }
        })
    }

    /// Alert rows with the slideshow cursor highlighted.
    pub fn alert_rows_signal(&self) -> impl Signal<Item = Vec<AlertRow>> + use<> {
        map_ref! {
            let alerts = self.alerts.signal(),
            let cursor = self.slideshow.state.signal_ref(|state| state.current_index) =>
            alert_rows(alerts, *cursor)
        }
    }

    /// Placeholder text while the selected vessel has no alerts.
    pub fn empty_state_signal(&self) -> impl Signal<Item = Option<&'static str>> + use<> {
        self.alerts
            .signal()
            .map(|alerts| alerts.is_empty().then_some(NO_ALERTS_MESSAGE))
            .dedupe()
    }

    /// Event under the slideshow cursor, `None` while the sequence is empty.
    pub fn current_event_signal(&self) -> impl Signal<Item = Option<TimelineEvent>> + use<> {
        map_ref! {
            let events = self.events.signal(),
            let cursor = self.slideshow.state.signal_ref(|state| state.current_index) =>
            events.get(*cursor).cloned()
        }
        .dedupe_cloned()
    }
}

async fn fetch_candidate(event_feed: Arc<dyn EventFeed>) -> Option<TimelineEvent> {
    match event_feed.fetch_new_event().await {
        Ok(candidate) => candidate,
        Err(error) => {
            log::error!("Failed to poll timeline events: {error}");
            None
        }
    }
}
