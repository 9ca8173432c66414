//! Stand-ins for the browser map and page when running without a UI

use frontend::vessel_map::MAP_OPTIONS;
use frontend::viewport::{
    ListenerId, MapViewport, ResizeListener, ResizeObserver, Unobserve, ZoomListener,
};
use shared::LatLon;
use std::sync::Mutex;
use std::time::Duration;

struct ViewportState {
    zoom: f64,
    next_listener_id: u64,
    listeners: Vec<(ListenerId, ZoomListener)>,
}

/// Map viewport that logs every command and jumps to its target at once.
///
/// A jump ends like a real zoom animation would: zoom listeners are told
/// the new zoom level.
pub struct LogViewport {
    state: Mutex<ViewportState>,
}

impl Default for LogViewport {
    fn default() -> Self {
        Self {
            state: Mutex::new(ViewportState {
                zoom: MAP_OPTIONS.initial_zoom,
                next_listener_id: 0,
                listeners: Vec::new(),
            }),
        }
    }
}

impl LogViewport {
    fn finish_zoom(&self, zoom: f64) {
        let listeners: Vec<ZoomListener> = match self.state.lock() {
            Ok(mut state) => {
                state.zoom = zoom.clamp(MAP_OPTIONS.min_zoom, MAP_OPTIONS.max_zoom);
                state
                    .listeners
                    .iter()
                    .map(|(_, listener)| listener.clone())
                    .collect()
            }
            Err(_) => return,
        };
        for listener in listeners {
            listener();
        }
    }
}

impl MapViewport for LogViewport {
    fn zoom(&self) -> f64 {
        self.state
            .lock()
            .map(|state| state.zoom)
            .unwrap_or(MAP_OPTIONS.initial_zoom)
    }

    fn on_zoom_change(&self, listener: ZoomListener) -> ListenerId {
        let Ok(mut state) = self.state.lock() else {
            return ListenerId(0);
        };
        state.next_listener_id += 1;
        let id = ListenerId(state.next_listener_id);
        state.listeners.push((id, listener));
        id
    }

    fn off_zoom_change(&self, id: ListenerId) {
        if let Ok(mut state) = self.state.lock() {
            state.listeners.retain(|(listener_id, _)| *listener_id != id);
        }
    }

    fn pan_zoom_to(&self, target: LatLon, zoom: f64, duration: Duration) {
        log::info!(
            "🗺️ Fly to {:.4}, {:.4} at zoom {zoom} ({:.1}s)",
            target.lat,
            target.lon,
            duration.as_secs_f64()
        );
        self.finish_zoom(zoom);
    }

    fn reset_view(&self, center: LatLon, zoom: f64) {
        log::info!("🗺️ Reset view to {:.1}, {:.1} at zoom {zoom}", center.lat, center.lon);
        self.finish_zoom(zoom);
    }

    fn invalidate_layout(&self) {
        log::debug!("Map layout invalidated");
    }
}

/// Page without a resizable map container; observation never fires.
pub struct FixedContainer;

impl ResizeObserver for FixedContainer {
    fn observe_resize(&self, container: &str, _listener: ResizeListener) -> Option<Unobserve> {
        log::debug!("Observing fixed-size container '{container}'");
        let container = container.to_string();
        Some(Unobserve::new(move || {
            log::debug!("Stopped observing '{container}'");
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_jumps_notify_zoom_listeners_within_bounds() {
        let viewport = LogViewport::default();
        assert_eq!(viewport.zoom(), 6.0);

        let notified = Arc::new(AtomicUsize::new(0));
        let id = viewport.on_zoom_change({
            let notified = notified.clone();
            Arc::new(move || {
                notified.fetch_add(1, Ordering::SeqCst);
            })
        });

        viewport.pan_zoom_to(LatLon::new(12.5, 45.2), 15.0, Duration::from_millis(1_500));
        assert_eq!(viewport.zoom(), 15.0);
        viewport.reset_view(LatLon::ORIGIN, 0.5);
        assert_eq!(viewport.zoom(), 1.5);
        assert_eq!(notified.load(Ordering::SeqCst), 2);

        viewport.off_zoom_change(id);
        viewport.reset_view(LatLon::ORIGIN, 2.0);
        assert_eq!(notified.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fixed_container_is_observable() {
        let observation = FixedContainer.observe_resize(".map-card", Arc::new(|| {}));
        assert!(observation.is_some());
    }
}
