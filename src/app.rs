use crate::dlog;
use crate::error::Error;
use crate::map::{DEFAULT_ZOOM, Geolocator, MapWidget, TILE_ATTRIBUTION, TILE_URL, Ui};
use crate::store::{BlobStore, WorkoutStore};
use crate::types::{Coords, Workout};
use chrono::Local;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    AwaitingLocation,
    MapReady,
    FormOpen { coords: Coords },
    Idle,
}

/// Which variant the form has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Running,
    Cycling,
}

/// Raw form fields as submitted. The variant-specific field may be absent;
/// that counts as a validation failure on that field.
#[derive(Debug, Clone, Copy)]
pub struct FormInput {
    pub kind: FormKind,
    pub distance_km: f64,
    pub duration_min: f64,
    pub cadence_spm: Option<f64>,
    pub elevation_gain_m: Option<f64>,
}

/// View controller: owns the store and the collaborator handles, and keeps
/// the in-memory list, the rendered rows, and the map markers in step.
/// One controller per map instance; no shared globals.
pub struct App<M, G, B, U> {
    map: M,
    geo: G,
    blob: B,
    ui: U,
    store: WorkoutStore,
    phase: Phase,
}

impl<M, G, B, U> App<M, G, B, U>
where
    M: MapWidget,
    G: Geolocator,
    B: BlobStore,
    U: Ui,
{
    pub fn new(map: M, geo: G, blob: B, ui: U) -> Self {
        Self {
            map,
            geo,
            blob,
            ui,
            store: WorkoutStore::default(),
            phase: Phase::AwaitingLocation,
        }
    }

    /// Acquire a position, set up the map around it, then load and render
    /// any history persisted by earlier sessions.
    ///
    /// A denied position request alerts the user and leaves the map
    /// unrendered; the controller stays in `AwaitingLocation`.
    pub fn init(&mut self) -> Result<(), Error> {
        let Some(coords) = self.geo.current_position() else {
            self.ui.alert("Could not get your position");
            return Err(Error::GeolocationDenied);
        };

        self.map.init(coords, DEFAULT_ZOOM);
        self.map.add_tile_layer(TILE_URL, TILE_ATTRIBUTION);

        let here = self.map.add_marker(coords);
        self.map.set_popup_content(here, "You are here");
        self.map.open_popup(here);

        self.store = WorkoutStore::load(&self.blob)?;
        for workout in self.store.iter() {
            Self::render(&mut self.map, &mut self.ui, workout);
        }
        dlog!("initialized with {} stored workouts", self.store.len());

        self.phase = Phase::MapReady;
        Ok(())
    }

    /// A click on the map opens the form at the clicked spot. Clicking
    /// again while the form is open just moves the pending location.
    pub fn map_clicked(&mut self, coords: Coords) {
        if self.phase == Phase::AwaitingLocation {
            dlog!("map click ignored, no map yet");
            return;
        }
        self.ui.show_form();
        self.phase = Phase::FormOpen { coords };
    }

    /// Submit the open form: validate per selected variant, append, render
    /// marker and row, clear the form, persist.
    ///
    /// Invalid input alerts the user and leaves the form open with the
    /// store untouched.
    pub fn submit_form(&mut self, input: &FormInput) -> Result<(), Error> {
        let Phase::FormOpen { coords } = self.phase else {
            dlog!("submit ignored, form not open");
            return Ok(());
        };

        let workout = match build_workout(coords, input) {
            Ok(w) => w,
            Err(e) => {
                self.ui.alert(&format!("Inputs have to be positive numbers ({e})"));
                return Err(e);
            }
        };

        tracing::info!(
            kind = workout.kind_name(),
            id = %workout.id,
            distance_km = workout.distance_km,
            duration_min = workout.duration_min,
            "workout recorded"
        );

        Self::render(&mut self.map, &mut self.ui, &workout);
        self.store.push(workout);

        self.ui.hide_form();
        self.phase = Phase::Idle;

        self.store.save(&mut self.blob)
    }

    /// Close the form without recording anything.
    pub fn cancel_form(&mut self) {
        if matches!(self.phase, Phase::FormOpen { .. }) {
            self.ui.hide_form();
            self.phase = Phase::Idle;
        }
    }

    /// A click on a list row pans the map to that workout. Unknown ids are
    /// ignored (the row may belong to a cleared session).
    pub fn row_clicked(&mut self, id: &str) {
        let Some(workout) = self.store.find(id) else {
            dlog!("row click with unknown id={id}");
            return;
        };
        let coords = workout.coords;
        self.map.set_view(coords, DEFAULT_ZOOM, true);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    fn render(map: &mut M, ui: &mut U, workout: &Workout) {
        let marker = map.add_marker(workout.coords);
        map.set_popup_content(marker, &workout.popup_text());
        map.open_popup(marker);
        ui.render_row(&workout.summary_line());
    }
}

fn build_workout(coords: Coords, input: &FormInput) -> Result<Workout, Error> {
    let now = Local::now();
    match input.kind {
        FormKind::Running => {
            let cadence = input
                .cadence_spm
                .ok_or(Error::Validation { field: "cadence" })?;
            Workout::running(coords, input.distance_km, input.duration_min, cadence, now)
        }
        FormKind::Cycling => {
            let elevation = input.elevation_gain_m.ok_or(Error::Validation {
                field: "elevation gain",
            })?;
            Workout::cycling(
                coords,
                input.distance_km,
                input.duration_min,
                elevation,
                now,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{FixedPosition, MarkerId};
    use crate::store::{MemoryBlobStore, STORAGE_KEY};
    use crate::types::Kind;

    /// Map double that records every call.
    #[derive(Debug, Default)]
    struct TestMap {
        initialized: bool,
        tile_layers: Vec<String>,
        markers: Vec<(Coords, String)>,
        opened: Vec<usize>,
        views: Vec<(Coords, u8, bool)>,
    }

    impl MapWidget for TestMap {
        fn init(&mut self, _center: Coords, _zoom: u8) {
            self.initialized = true;
        }

        fn add_tile_layer(&mut self, url: &str, _attribution: &str) {
            self.tile_layers.push(url.to_string());
        }

        fn add_marker(&mut self, coords: Coords) -> MarkerId {
            self.markers.push((coords, String::new()));
            MarkerId(self.markers.len() - 1)
        }

        fn set_popup_content(&mut self, marker: MarkerId, text: &str) {
            self.markers[marker.0].1 = text.to_string();
        }

        fn open_popup(&mut self, marker: MarkerId) {
            self.opened.push(marker.0);
        }

        fn set_view(&mut self, center: Coords, zoom: u8, animate: bool) {
            self.views.push((center, zoom, animate));
        }
    }

    struct NoFix;

    impl Geolocator for NoFix {
        fn current_position(&mut self) -> Option<Coords> {
            None
        }
    }

    #[derive(Debug, Default)]
    struct TestUi {
        form_visible: bool,
        rows: Vec<String>,
        alerts: Vec<String>,
    }

    impl Ui for TestUi {
        fn show_form(&mut self) {
            self.form_visible = true;
        }

        fn hide_form(&mut self) {
            self.form_visible = false;
        }

        fn render_row(&mut self, line: &str) {
            self.rows.push(line.to_string());
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    const HOME: Coords = Coords {
        lat: 24.09,
        lon: 32.9,
    };

    fn app() -> App<TestMap, FixedPosition, MemoryBlobStore, TestUi> {
        App::new(
            TestMap::default(),
            FixedPosition(HOME),
            MemoryBlobStore::default(),
            TestUi::default(),
        )
    }

    fn running_input() -> FormInput {
        FormInput {
            kind: FormKind::Running,
            distance_km: 5.0,
            duration_min: 25.0,
            cadence_spm: Some(150.0),
            elevation_gain_m: None,
        }
    }

    #[test]
    fn denied_geolocation_alerts_and_leaves_map_unrendered() {
        let mut app = App::new(
            TestMap::default(),
            NoFix,
            MemoryBlobStore::default(),
            TestUi::default(),
        );

        let err = app.init().unwrap_err();
        assert!(matches!(err, Error::GeolocationDenied));
        assert!(!app.map.initialized);
        assert_eq!(app.ui.alerts, vec!["Could not get your position"]);
        assert_eq!(app.phase(), Phase::AwaitingLocation);

        // No map, so clicks go nowhere.
        app.map_clicked(HOME);
        assert_eq!(app.phase(), Phase::AwaitingLocation);
        assert!(!app.ui.form_visible);
    }

    #[test]
    fn init_sets_up_map_and_current_position_marker() {
        let mut app = app();
        app.init().unwrap();

        assert!(app.map.initialized);
        assert_eq!(app.map.tile_layers.len(), 1);
        assert_eq!(app.map.markers.len(), 1);
        assert_eq!(app.map.markers[0].1, "You are here");
        assert_eq!(app.phase(), Phase::MapReady);
    }

    #[test]
    fn submit_appends_renders_and_persists() {
        let click = Coords {
            lat: 24.1,
            lon: 32.95,
        };

        let mut app = app();
        app.init().unwrap();
        app.map_clicked(click);
        assert!(app.ui.form_visible);

        app.submit_form(&running_input()).unwrap();

        assert_eq!(app.store().len(), 1);
        let workout = app.store().iter().next().unwrap();
        assert_eq!(workout.coords, click);
        assert!(matches!(workout.kind, Kind::Running { .. }));

        // One marker for the position, one for the workout.
        assert_eq!(app.map.markers.len(), 2);
        assert!(app.map.markers[1].1.contains("Running on"));
        assert_eq!(app.ui.rows.len(), 1);
        assert!(!app.ui.form_visible);
        assert_eq!(app.phase(), Phase::Idle);

        assert!(app.blob.get_item(STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn invalid_distance_alerts_and_keeps_form_open() {
        let mut app = app();
        app.init().unwrap();
        app.map_clicked(HOME);

        let mut input = running_input();
        input.distance_km = -1.0;

        let err = app.submit_form(&input).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "distance" }));
        assert!(app.store().is_empty());
        assert_eq!(app.ui.alerts.len(), 1);
        assert!(app.ui.form_visible);
        assert!(matches!(app.phase(), Phase::FormOpen { .. }));
        assert!(app.blob.get_item(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn cycling_without_elevation_fails_on_elevation() {
        let mut app = app();
        app.init().unwrap();
        app.map_clicked(HOME);

        let input = FormInput {
            kind: FormKind::Cycling,
            distance_km: 30.0,
            duration_min: 90.0,
            cadence_spm: Some(150.0),
            elevation_gain_m: None,
        };

        let err = app.submit_form(&input).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                field: "elevation gain"
            }
        ));
        assert!(app.store().is_empty());
    }

    #[test]
    fn row_click_pans_to_the_workout() {
        let click = Coords {
            lat: 24.2,
            lon: 33.0,
        };

        let mut app = app();
        app.init().unwrap();
        app.map_clicked(click);
        app.submit_form(&running_input()).unwrap();

        let id = app.store().iter().next().unwrap().id.clone();
        app.row_clicked(&id);

        assert_eq!(app.map.views.len(), 1);
        let (center, zoom, animate) = app.map.views[0];
        assert_eq!(center, click);
        assert_eq!(zoom, DEFAULT_ZOOM);
        assert!(animate);
    }

    #[test]
    fn row_click_with_unknown_id_is_a_noop() {
        let mut app = app();
        app.init().unwrap();
        app.row_clicked("no-such-id");
        assert!(app.map.views.is_empty());
    }

    #[test]
    fn cancel_closes_the_form_without_recording() {
        let mut app = app();
        app.init().unwrap();
        app.map_clicked(HOME);
        app.cancel_form();

        assert!(!app.ui.form_visible);
        assert_eq!(app.phase(), Phase::Idle);
        assert!(app.store().is_empty());
    }

    #[test]
    fn reclick_moves_the_pending_location() {
        let first = Coords { lat: 1.0, lon: 1.0 };
        let second = Coords { lat: 2.0, lon: 2.0 };

        let mut app = app();
        app.init().unwrap();
        app.map_clicked(first);
        app.map_clicked(second);

        assert_eq!(app.phase(), Phase::FormOpen { coords: second });
    }

    #[test]
    fn history_is_rerendered_on_the_next_session() {
        let mut blob = MemoryBlobStore::default();
        {
            let mut app = App::new(
                TestMap::default(),
                FixedPosition(HOME),
                blob,
                TestUi::default(),
            );
            app.init().unwrap();
            app.map_clicked(HOME);
            app.submit_form(&running_input()).unwrap();
            blob = app.blob;
        }

        let mut next = App::new(
            TestMap::default(),
            FixedPosition(HOME),
            blob,
            TestUi::default(),
        );
        next.init().unwrap();

        assert_eq!(next.store().len(), 1);
        assert_eq!(next.ui.rows.len(), 1);
        // Position marker plus the reloaded workout marker.
        assert_eq!(next.map.markers.len(), 2);
    }
}
