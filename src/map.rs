use crate::types::Coords;

pub const DEFAULT_ZOOM: u8 = 13;
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

/// Handle to a marker previously added to a [`MapWidget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerId(pub usize);

/// The map widget the controller draws on. Clicks flow the other way:
/// the host feeds them into `App::map_clicked`.
pub trait MapWidget {
    fn init(&mut self, center: Coords, zoom: u8);
    fn add_tile_layer(&mut self, url: &str, attribution: &str);
    fn add_marker(&mut self, coords: Coords) -> MarkerId;
    fn set_popup_content(&mut self, marker: MarkerId, text: &str);
    fn open_popup(&mut self, marker: MarkerId);
    fn set_view(&mut self, center: Coords, zoom: u8, animate: bool);
}

/// One-shot position lookup. `None` means denied or unavailable.
pub trait Geolocator {
    fn current_position(&mut self) -> Option<Coords>;
}

/// The form/list surface the controller talks to.
pub trait Ui {
    fn show_form(&mut self);
    fn hide_form(&mut self);
    fn render_row(&mut self, line: &str);
    fn alert(&mut self, message: &str);
}

/// Map stand-in for headless runs: keeps marker state, reports view
/// changes through tracing instead of drawing tiles.
#[derive(Debug, Default)]
pub struct LogMap {
    markers: Vec<(Coords, String)>,
}

impl LogMap {
    pub fn markers(&self) -> &[(Coords, String)] {
        &self.markers
    }
}

impl MapWidget for LogMap {
    fn init(&mut self, center: Coords, zoom: u8) {
        tracing::info!(lat = center.lat, lon = center.lon, zoom, "map ready");
    }

    fn add_tile_layer(&mut self, url: &str, _attribution: &str) {
        tracing::debug!(url, "tile layer added");
    }

    fn add_marker(&mut self, coords: Coords) -> MarkerId {
        self.markers.push((coords, String::new()));
        MarkerId(self.markers.len() - 1)
    }

    fn set_popup_content(&mut self, marker: MarkerId, text: &str) {
        if let Some(entry) = self.markers.get_mut(marker.0) {
            entry.1 = text.to_string();
        }
    }

    fn open_popup(&mut self, marker: MarkerId) {
        if let Some((coords, text)) = self.markers.get(marker.0) {
            tracing::info!(lat = coords.lat, lon = coords.lon, popup = %text, "marker");
        }
    }

    fn set_view(&mut self, center: Coords, zoom: u8, animate: bool) {
        tracing::info!(
            lat = center.lat,
            lon = center.lon,
            zoom,
            animate,
            "map view moved"
        );
    }
}

/// Geolocator that always answers with a known position, for hosts that
/// get the location from somewhere other than a positioning device.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coords);

impl Geolocator for FixedPosition {
    fn current_position(&mut self) -> Option<Coords> {
        Some(self.0)
    }
}

/// Console UI: list rows on stdout, alerts on stderr.
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl Ui for ConsoleUi {
    fn show_form(&mut self) {
        tracing::debug!("form opened");
    }

    fn hide_form(&mut self) {
        tracing::debug!("form cleared and hidden");
    }

    fn render_row(&mut self, line: &str) {
        println!("{line}");
    }

    fn alert(&mut self, message: &str) {
        eprintln!("! {message}");
    }
}
