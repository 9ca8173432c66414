use crate::headless::{FixedContainer, LogViewport};
use anyhow::{Result, bail};
use frontend::connection::{AlertEventFeed, FleetApi, HttpFleetApi};
use frontend::{Dashboard, DashboardServices};
use futures::StreamExt;
use shared::{DashboardConfig, VesselSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// How long `watch` waits for the tracked vessel list before giving up on
/// a vessel lookup.
const VESSEL_LOAD_TIMEOUT: Duration = Duration::from_secs(15);

pub struct WatchOptions {
    pub config: DashboardConfig,
    /// Vessel to select once the fleet is loaded
    pub vessel: Option<String>,
    pub duration: Duration,
}

#[derive(Debug, Default, PartialEq)]
pub struct WatchReport {
    pub vessels: usize,
    pub events: usize,
    pub alerts: usize,
}

/// Vessel whose name matches `name`, ignoring case and padding.
pub fn find_vessel<'a>(vessels: &'a [VesselSnapshot], name: &str) -> Option<&'a VesselSnapshot> {
    let name = name.trim();
    vessels.iter().find(|vessel| {
        vessel
            .name()
            .is_some_and(|vessel_name| vessel_name.eq_ignore_ascii_case(name))
    })
}

/// Run the dashboard headless against the configured API for `duration`.
pub async fn run_watch(options: WatchOptions) -> Result<WatchReport> {
    println!("🚢 Hyla fleet monitor");
    println!("API: {}", options.config.api.base_url);

    let fleet_api: Arc<dyn FleetApi> =
        Arc::new(HttpFleetApi::new(options.config.api.base_url.clone()));
    let services = DashboardServices {
        fleet_api: fleet_api.clone(),
        event_feed: Arc::new(AlertEventFeed::new(fleet_api)),
        resize_observer: Arc::new(FixedContainer),
    };
    let dashboard = Dashboard::new(services, &options.config, Vec::new());
    dashboard.attach_viewport(Arc::new(LogViewport::default()));

    if let Some(name) = &options.vessel {
        let loaded = timeout(
            VESSEL_LOAD_TIMEOUT.min(options.duration),
            dashboard
                .map
                .vessels
                .to_stream()
                .filter(|vessels| futures::future::ready(!vessels.is_empty()))
                .next(),
        )
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

        let Some(vessel) = find_vessel(&loaded, name) else {
            dashboard.teardown();
            bail!("Vessel '{name}' not found among {} tracked vessels", loaded.len());
        };
        dashboard.select_vessel(Some(vessel.clone()));
    }

    let mut events = dashboard.timeline.events.to_stream();
    let watching = async {
        while let Some(snapshot) = events.next().await {
            if let Some(latest) = snapshot.iter().last() {
                println!("[{}] {}: {}", latest.date, latest.title, latest.description);
            }
        }
    };
    let _ = timeout(options.duration, watching).await;

    let vessels = dashboard.map.vessels.to_stream().next().await;
    let events = dashboard.timeline.events.to_stream().next().await;
    let alerts = dashboard.timeline.alerts.to_stream().next().await;
    let report = WatchReport {
        vessels: vessels.map_or(0, |vessels| vessels.len()),
        events: events.map_or(0, |events| events.len()),
        alerts: alerts.map_or(0, |alerts| alerts.len()),
    };
    dashboard.teardown();
    sleep(Duration::from_millis(10)).await;

    println!(
        "Watched {} vessels, {} timeline events, {} alerts for the selection",
        report.vessels, report.events, report.alerts
    );
    Ok(report)
}
