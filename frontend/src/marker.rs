//! Vessel marker presentation
//!
//! Marker size and icon variant follow the map zoom through a fixed bracket
//! table; the selected vessel is drawn half again as large.

use shared::{LatLon, VesselSnapshot};
use std::fmt;

const SELECTED_SIZE_MULTIPLIER: f64 = 1.5;

/// Zoom the marker geometry is computed for before the viewport reports one.
pub const INITIAL_MARKER_ZOOM: f64 = 5.0;

/// Icon drawn for every variant.
// Variants were meant to get their own artwork; all of them share this one.
pub const SHIP_ICON_URL: &str = "/ship-popup.png";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerVariant {
    Point,
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl MarkerVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerVariant::Point => "point",
            MarkerVariant::Small => "small",
            MarkerVariant::Medium => "medium",
            MarkerVariant::Large => "large",
            MarkerVariant::ExtraLarge => "extra-large",
        }
    }

    pub fn icon_url(&self) -> &'static str {
        SHIP_ICON_URL
    }
}

impl fmt::Display for MarkerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered marker size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerGeometry {
    pub width: f64,
    pub height: f64,
    pub variant: MarkerVariant,
}

struct ZoomBracket {
    /// Applies when zoom is strictly above this value.
    above: f64,
    width: f64,
    height: f64,
    variant: MarkerVariant,
}

const fn bracket(above: f64, width: f64, height: f64, variant: MarkerVariant) -> ZoomBracket {
    ZoomBracket {
        above,
        width,
        height,
        variant,
    }
}

// Ordered from the most zoomed-in bracket down.
const ZOOM_BRACKETS: [ZoomBracket; 11] = [
    bracket(23.0, 50.0, 120.0, MarkerVariant::ExtraLarge),
    bracket(15.0, 40.0, 100.0, MarkerVariant::Large),
    bracket(14.75, 40.0, 90.0, MarkerVariant::Medium),
    bracket(13.75, 30.0, 70.0, MarkerVariant::Medium),
    bracket(12.75, 20.0, 50.0, MarkerVariant::Small),
    bracket(11.5, 20.0, 35.0, MarkerVariant::Small),
    bracket(10.75, 15.0, 30.0, MarkerVariant::Small),
    bracket(9.75, 15.0, 30.0, MarkerVariant::Small),
    bracket(8.75, 10.0, 20.0, MarkerVariant::Small),
    bracket(7.0, 10.0, 20.0, MarkerVariant::Small),
    bracket(6.0, 10.0, 15.0, MarkerVariant::Small),
];

const FALLBACK_BRACKET: ZoomBracket = bracket(f64::NEG_INFINITY, 5.0, 10.0, MarkerVariant::Point);

/// Marker geometry for `zoom`, scaled up when the vessel is selected.
///
/// Total over all inputs: anything at or below the lowest threshold,
/// including NaN, resolves to the point-sized fallback.
pub fn size_for(zoom: f64, is_selected: bool) -> MarkerGeometry {
    let bracket = ZOOM_BRACKETS
        .iter()
        .find(|bracket| zoom > bracket.above)
        .unwrap_or(&FALLBACK_BRACKET);
    let multiplier = if is_selected { SELECTED_SIZE_MULTIPLIER } else { 1.0 };

    MarkerGeometry {
        width: bracket.width * multiplier,
        height: bracket.height * multiplier,
        variant: bracket.variant,
    }
}

/// The selected vessel as drawn on the map.
#[derive(Clone, Debug, PartialEq)]
pub struct VesselMarker {
    pub position: LatLon,
    pub rotation_degrees: f64,
    pub geometry: MarkerGeometry,
    pub popup: String,
}

impl VesselMarker {
    /// `None` when the vessel has no usable position.
    pub fn for_vessel(vessel: &VesselSnapshot, geometry: MarkerGeometry) -> Option<Self> {
        Some(Self {
            position: vessel.position()?,
            rotation_degrees: vessel.heading().unwrap_or(0.0),
            geometry,
            popup: popup_text(vessel),
        })
    }
}

pub fn popup_text(vessel: &VesselSnapshot) -> String {
    let heading = vessel
        .ais
        .heading
        .map(|heading| heading.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "Name: {}\nIMO: {}\nHeading: {}",
        vessel.name().unwrap_or("No name"),
        vessel.ais.imo.as_deref().unwrap_or("N/A"),
        heading,
    )
}
