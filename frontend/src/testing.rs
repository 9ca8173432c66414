//! Collaborator fakes for actor tests
//!
//! Every external collaborator of the dashboard has a scripted or recording
//! stand-in here, driven synchronously from the test body.

use crate::connection::{EventFeed, FetchError, FleetApi};
use crate::viewport::{
    ListenerId, MapViewport, ResizeListener, ResizeObserver, Unobserve, ViewCommand, ZoomListener,
};
use async_trait::async_trait;
use shared::{AisReport, AlertRecord, LatLon, TimelineEvent, VesselFilterKey, VesselSnapshot};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn vessel(name: &str, lat: f64, lon: f64) -> VesselSnapshot {
    VesselSnapshot::new(AisReport {
        name: Some(name.to_string()),
        imo: Some("9312456".to_string()),
        latitude: Some(lat),
        longitude: Some(lon),
        heading: Some(90.0),
        ..Default::default()
    })
}

pub fn unlocated_vessel(name: &str) -> VesselSnapshot {
    VesselSnapshot::new(AisReport {
        name: Some(name.to_string()),
        ..Default::default()
    })
}

pub fn alert(id: &str, vessels: &str, geofence: &str) -> AlertRecord {
    AlertRecord {
        id: id.to_string(),
        vessel_selected: VesselFilterKey::Text(vessels.to_string()),
        geofence: geofence.to_string(),
        from_date: Some("2024-05-01T08:00:00Z".to_string()),
        to_date: Some("2024-05-01T10:00:00Z".to_string()),
        message: format!("{geofence} crossed"),
    }
}

pub fn event(id: &str, title: &str) -> TimelineEvent {
    TimelineEvent::new(id, title, "2024-05-01", format!("{title} reported"))
}

// ===== VIEWPORT =====

#[derive(Default)]
struct ViewportState {
    zoom: f64,
    next_listener_id: u64,
    listeners: Vec<(ListenerId, ZoomListener)>,
    commands: Vec<ViewCommand>,
    layout_invalidations: usize,
}

/// Map viewport that records every command it receives.
#[derive(Default)]
pub struct RecordingViewport {
    state: Mutex<ViewportState>,
}

impl RecordingViewport {
    pub fn new(zoom: f64) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ViewportState {
                zoom,
                ..Default::default()
            }),
        })
    }

    /// Finish a zoom gesture at `zoom` and notify listeners.
    pub fn zoom_to(&self, zoom: f64) {
        let listeners: Vec<ZoomListener> = {
            let mut state = self.state.lock().unwrap();
            state.zoom = zoom;
            state
                .listeners
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect()
        };
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().unwrap().listeners.len()
    }

    pub fn commands(&self) -> Vec<ViewCommand> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn last_command(&self) -> Option<ViewCommand> {
        self.state.lock().unwrap().commands.last().copied()
    }

    pub fn layout_invalidations(&self) -> usize {
        self.state.lock().unwrap().layout_invalidations
    }
}

impl MapViewport for RecordingViewport {
    fn zoom(&self) -> f64 {
        self.state.lock().unwrap().zoom
    }

    fn on_zoom_change(&self, listener: ZoomListener) -> ListenerId {
        let mut state = self.state.lock().unwrap();
        state.next_listener_id += 1;
        let id = ListenerId(state.next_listener_id);
        state.listeners.push((id, listener));
        id
    }

    fn off_zoom_change(&self, id: ListenerId) {
        self.state
            .lock()
            .unwrap()
            .listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }

    // Commands are only recorded; tests finish the animation with `zoom_to`.
    fn pan_zoom_to(&self, target: LatLon, zoom: f64, duration: Duration) {
        self.state.lock().unwrap().commands.push(ViewCommand::PanZoomTo {
            target,
            zoom,
            duration,
        });
    }

    fn reset_view(&self, center: LatLon, zoom: f64) {
        self.state
            .lock()
            .unwrap()
            .commands
            .push(ViewCommand::ResetView { center, zoom });
    }

    fn invalidate_layout(&self) {
        self.state.lock().unwrap().layout_invalidations += 1;
    }
}

// ===== RESIZE OBSERVER =====

#[derive(Default)]
struct ResizeState {
    container_present: bool,
    next_id: u64,
    listeners: Vec<(u64, ResizeListener)>,
}

pub struct RecordingResizeObserver {
    state: Arc<Mutex<ResizeState>>,
}

impl RecordingResizeObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(Mutex::new(ResizeState {
                container_present: true,
                ..Default::default()
            })),
        })
    }

    /// Observer for a page where the map container was never rendered.
    pub fn without_container() -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(Mutex::new(ResizeState::default())),
        })
    }

    pub fn resize(&self) {
        let listeners: Vec<ResizeListener> = self
            .state
            .lock()
            .unwrap()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn observation_count(&self) -> usize {
        self.state.lock().unwrap().listeners.len()
    }
}

impl ResizeObserver for RecordingResizeObserver {
    fn observe_resize(&self, _container: &str, listener: ResizeListener) -> Option<Unobserve> {
        let mut state = self.state.lock().unwrap();
        if !state.container_present {
            return None;
        }
        state.next_id += 1;
        let id = state.next_id;
        state.listeners.push((id, listener));

        let shared_state = self.state.clone();
        Some(Unobserve::new(move || {
            shared_state
                .lock()
                .unwrap()
                .listeners
                .retain(|(listener_id, _)| *listener_id != id);
        }))
    }
}

// ===== FLEET API =====

#[derive(Default)]
struct FleetScript {
    vessels: Option<Result<Vec<VesselSnapshot>, String>>,
    alerts: Option<Result<Vec<AlertRecord>, String>>,
}

/// Fleet API answering from a script; unscripted endpoints return empty lists.
#[derive(Default)]
pub struct ScriptedFleetApi {
    script: Mutex<FleetScript>,
    vessel_fetches: AtomicUsize,
    alert_fetches: AtomicUsize,
}

impl ScriptedFleetApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_vessels(&self, vessels: Vec<VesselSnapshot>) {
        self.script.lock().unwrap().vessels = Some(Ok(vessels));
    }

    pub fn fail_vessels(&self, message: &str) {
        self.script.lock().unwrap().vessels = Some(Err(message.to_string()));
    }

    pub fn set_alerts(&self, alerts: Vec<AlertRecord>) {
        self.script.lock().unwrap().alerts = Some(Ok(alerts));
    }

    pub fn fail_alerts(&self, message: &str) {
        self.script.lock().unwrap().alerts = Some(Err(message.to_string()));
    }

    pub fn vessel_fetches(&self) -> usize {
        self.vessel_fetches.load(Ordering::SeqCst)
    }

    pub fn alert_fetches(&self) -> usize {
        self.alert_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FleetApi for ScriptedFleetApi {
    async fn fetch_tracked_vessels(&self) -> Result<Vec<VesselSnapshot>, FetchError> {
        self.vessel_fetches.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().vessels.clone() {
            Some(Ok(vessels)) => Ok(vessels),
            Some(Err(message)) => Err(FetchError::Unavailable(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_alerts(&self) -> Result<Vec<AlertRecord>, FetchError> {
        self.alert_fetches.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().alerts.clone() {
            Some(Ok(alerts)) => Ok(alerts),
            Some(Err(message)) => Err(FetchError::Unavailable(message)),
            None => Ok(Vec::new()),
        }
    }
}

// ===== EVENT FEED =====

type ScriptedPoll = (Duration, Result<Option<TimelineEvent>, String>);

/// Event feed replaying scripted answers, each after its own latency.
/// Once the script runs out every poll answers `None`.
#[derive(Default)]
pub struct ScriptedEventFeed {
    answers: Mutex<VecDeque<ScriptedPoll>>,
    polls: AtomicUsize,
}

impl ScriptedEventFeed {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn answer(&self, event: Option<TimelineEvent>) {
        self.answer_after(Duration::ZERO, event);
    }

    pub fn answer_after(&self, latency: Duration, event: Option<TimelineEvent>) {
        self.answers.lock().unwrap().push_back((latency, Ok(event)));
    }

    pub fn fail(&self, message: &str) {
        self.answers
            .lock()
            .unwrap()
            .push_back((Duration::ZERO, Err(message.to_string())));
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventFeed for ScriptedEventFeed {
    async fn fetch_new_event(&self) -> Result<Option<TimelineEvent>, FetchError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.answers.lock().unwrap().pop_front();
        let Some((latency, answer)) = next else {
            return Ok(None);
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        answer.map_err(FetchError::Unavailable)
    }
}
