use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ===== GEOGRAPHY =====

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const ORIGIN: LatLon = LatLon { lat: 0.0, lon: 0.0 };

    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and inside the geographic ranges (±90 latitude, ±180 longitude).
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

// ===== VESSELS =====

/// One tracked vessel as served by `/api/get-tracked-vessels`.
///
/// Snapshots are immutable; a refresh replaces the whole collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VesselSnapshot {
    #[serde(rename = "AIS")]
    pub ais: AisReport,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub struct AisReport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub imo: Option<String>,
    #[serde(default)]
    pub callsign: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Degrees, 0..360 when reported.
    #[serde(default)]
    pub heading: Option<f64>,
    /// Opaque ETA string, rendered as-is.
    #[serde(default)]
    pub eta: Option<String>,
}

impl VesselSnapshot {
    pub fn new(ais: AisReport) -> Self {
        Self { ais }
    }

    /// Name used as the alert filter key. Blank names count as missing.
    pub fn name(&self) -> Option<&str> {
        self.ais
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Position, only when both coordinates are present and valid.
    ///
    /// Latitude or longitude 0 is a real position here, unlike a plain
    /// truthiness check on the raw fields.
    pub fn position(&self) -> Option<LatLon> {
        let position = LatLon::new(self.ais.latitude?, self.ais.longitude?);
        position.is_valid().then_some(position)
    }

    /// Heading normalised to `0..360`; absent or unusable headings yield `None`.
    pub fn heading(&self) -> Option<f64> {
        self.ais
            .heading
            .filter(|heading| heading.is_finite() && (0.0..360.0).contains(heading))
    }
}

// ===== ALERTS =====

/// Which vessels an alert concerns.
///
/// The backend stores either a single text field or a list of names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum VesselFilterKey {
    Names(Vec<String>),
    Text(String),
}

impl VesselFilterKey {
    /// Membership for a list key, substring for a text key.
    pub fn contains(&self, vessel_name: &str) -> bool {
        match self {
            VesselFilterKey::Names(names) => names.iter().any(|name| name == vessel_name),
            VesselFilterKey::Text(text) => text.contains(vessel_name),
        }
    }
}

impl Default for VesselFilterKey {
    fn default() -> Self {
        VesselFilterKey::Names(Vec::new())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub vessel_selected: VesselFilterKey,
    #[serde(default)]
    pub geofence: String,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl AlertRecord {
    pub fn concerns_vessel(&self, vessel_name: &str) -> bool {
        self.vessel_selected.contains(vessel_name)
    }
}

// ===== TIMELINE =====

pub type EventId = String;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub id: EventId,
    pub title: String,
    pub date: String,
    pub description: String,
}

impl TimelineEvent {
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: date.into(),
            description: description.into(),
        }
    }
}

impl From<&AlertRecord> for TimelineEvent {
    fn from(alert: &AlertRecord) -> Self {
        Self {
            id: alert.id.clone(),
            title: alert.geofence.clone(),
            date: alert.to_date.clone().unwrap_or_default(),
            description: alert.message.clone(),
        }
    }
}

// ===== PERSISTED RECORDS =====

/// Satellite pull intervals editable in the `AisSatPull` collection.
///
/// Both intervals are required and expressed in milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AisSatPull {
    pub sat0: u64,
    pub sat1: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AisSatPull {
    pub fn new(sat0: u64, sat1: u64) -> Self {
        let now = Utc::now();
        Self {
            sat0,
            sat1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace both intervals and re-stamp `updated_at`.
    pub fn update(&mut self, sat0: u64, sat1: u64) {
        self.sat0 = sat0;
        self.sat1 = sat1;
        self.updated_at = Utc::now();
    }
}

// ===== CONFIG TYPES =====

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse dashboard config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize dashboard config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid dashboard config: {0}")]
    Invalid(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiSection,
    pub timeline: TimelineSection,
}

impl DashboardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeline.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "timeline.poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.timeline.slideshow_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "timeline.slideshow_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TimelineSection {
    pub poll_interval_ms: u64,
    pub slideshow_interval_ms: u64,
    /// Skip a poll tick while the previous fetch is still in flight.
    pub single_flight_polls: bool,
}

impl TimelineSection {
    /// Poll cadence, never zero.
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Slideshow cadence, never zero.
    pub fn slideshow_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.slideshow_interval_ms.max(1))
    }
}

impl Default for TimelineSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5_000,
            slideshow_interval_ms: 2_000,
            single_flight_polls: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vessel_snapshot_reads_uppercase_ais_payload() {
        let payload = r#"{
            "AIS": {
                "NAME": "NORDIC STAR",
                "IMO": "9312456",
                "CALLSIGN": "5BCD2",
                "DESTINATION": "ROTTERDAM",
                "LATITUDE": 12.5,
                "LONGITUDE": 45.2,
                "HEADING": 87,
                "ETA": "2024-05-02T10:00:00Z"
            }
        }"#;

        let vessel: VesselSnapshot = serde_json::from_str(payload).unwrap();
        assert_eq!(vessel.name(), Some("NORDIC STAR"));
        assert_eq!(vessel.position(), Some(LatLon::new(12.5, 45.2)));
        assert_eq!(vessel.heading(), Some(87.0));
        assert_eq!(vessel.ais.eta.as_deref(), Some("2024-05-02T10:00:00Z"));
    }

    #[test]
    fn test_missing_or_out_of_range_coordinates_have_no_position() {
        let no_longitude = VesselSnapshot::new(AisReport {
            latitude: Some(10.0),
            ..Default::default()
        });
        assert_eq!(no_longitude.position(), None);

        let out_of_range = VesselSnapshot::new(AisReport {
            latitude: Some(91.0),
            longitude: Some(10.0),
            ..Default::default()
        });
        assert_eq!(out_of_range.position(), None);

        let equator = VesselSnapshot::new(AisReport {
            latitude: Some(0.0),
            longitude: Some(0.0),
            ..Default::default()
        });
        assert_eq!(equator.position(), Some(LatLon::ORIGIN));
    }

    #[test]
    fn test_unusable_heading_is_dropped() {
        let vessel = VesselSnapshot::new(AisReport {
            heading: Some(511.0),
            ..Default::default()
        });
        assert_eq!(vessel.heading(), None);
    }

    #[test]
    fn test_blank_vessel_name_counts_as_missing() {
        let vessel = VesselSnapshot::new(AisReport {
            name: Some("   ".to_string()),
            ..Default::default()
        });
        assert_eq!(vessel.name(), None);
    }

    #[test]
    fn test_filter_key_accepts_text_and_lists() {
        let alert: AlertRecord = serde_json::from_str(
            r#"{
                "_id": "a1",
                "vesselSelected": "NORDIC STAR, BALTIC WIND",
                "geofence": "Port A",
                "toDate": "2024-05-01"
            }"#,
        )
        .unwrap();
        assert!(alert.concerns_vessel("BALTIC WIND"));
        assert!(!alert.concerns_vessel("OCEAN PRIDE"));

        let alert: AlertRecord = serde_json::from_str(
            r#"{"id": "a2", "vesselSelected": ["NORDIC STAR"], "geofence": "Port B"}"#,
        )
        .unwrap();
        assert!(alert.concerns_vessel("NORDIC STAR"));
        assert!(!alert.concerns_vessel("NORDIC"));
    }

    #[test]
    fn test_alert_converts_to_timeline_event() {
        let alert = AlertRecord {
            id: "a7".to_string(),
            vessel_selected: VesselFilterKey::Text("NORDIC STAR".to_string()),
            geofence: "Suez North".to_string(),
            from_date: Some("2024-05-01".to_string()),
            to_date: Some("2024-05-02".to_string()),
            message: "Entered geofence".to_string(),
        };
        let event = TimelineEvent::from(&alert);
        assert_eq!(event, TimelineEvent::new("a7", "Suez North", "2024-05-02", "Entered geofence"));
    }

    #[test]
    fn test_ais_sat_pull_uses_camel_case_timestamps() {
        let mut record = AisSatPull::new(900_000, 28_800_000);
        assert_eq!(record.created_at, record.updated_at);

        record.update(60_000, 120_000);
        assert_eq!((record.sat0, record.sat1), (60_000, 120_000));
        assert!(record.updated_at >= record.created_at);

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(serde_json::from_str::<AisSatPull>(r#"{"sat0": 1}"#).is_err());
    }

    #[test]
    fn test_dashboard_config_fills_missing_sections() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [api]
            base_url = "https://fleet.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://fleet.example.com");
        assert_eq!(config.timeline, TimelineSection::default());

        let rendered = config.to_toml_string().unwrap();
        assert_eq!(DashboardConfig::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn test_dashboard_config_rejects_zero_intervals() {
        let result = DashboardConfig::from_toml_str(
            r#"
            [timeline]
            poll_interval_ms = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_timeline_intervals_never_reach_zero() {
        let timeline = TimelineSection {
            poll_interval_ms: 0,
            ..TimelineSection::default()
        };
        assert_eq!(timeline.poll_interval(), std::time::Duration::from_millis(1));
        assert_eq!(timeline.slideshow_interval(), std::time::Duration::from_secs(2));
    }
}
