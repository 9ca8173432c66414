//! Alert filtering and timeline rows

use shared::AlertRecord;

pub const NO_ALERTS_MESSAGE: &str = "No alerts for the selected vessel.";

/// Alerts whose vessel filter key contains `vessel_name`, feed order kept.
pub fn alerts_for_vessel(alerts: Vec<AlertRecord>, vessel_name: &str) -> Vec<AlertRecord> {
    alerts
        .into_iter()
        .filter(|alert| alert.concerns_vessel(vessel_name))
        .collect()
}

/// One alert as rendered in the timeline strip.
#[derive(Clone, Debug, PartialEq)]
pub struct AlertRow {
    pub title: String,
    pub date: String,
    /// Row under the slideshow cursor is drawn fully opaque.
    pub highlighted: bool,
}

impl AlertRow {
    pub fn opacity(&self) -> f32 {
        if self.highlighted { 1.0 } else { 0.5 }
    }
}

pub fn alert_rows(alerts: &[AlertRecord], cursor: usize) -> Vec<AlertRow> {
    alerts
        .iter()
        .enumerate()
        .map(|(index, alert)| AlertRow {
            title: alert.geofence.clone(),
            date: alert.to_date.clone().unwrap_or_default(),
            highlighted: index == cursor,
        })
        .collect()
}
