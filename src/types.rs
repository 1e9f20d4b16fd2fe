use crate::error::Error;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub lon: f64,
}

/// Variant payload plus its derived metric, computed once at construction.
///
/// The `type` tag is persisted with every record so a reloaded workout comes
/// back as a proper variant, not a bag of plain fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Kind {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_kmh: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub coords: Coords,
    pub distance_km: f64,
    pub duration_min: f64,
    pub recorded_at: DateTime<Local>,
    pub description: String,
    #[serde(flatten)]
    pub kind: Kind,
}

// min/km
pub fn pace_min_per_km(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

// km/h
pub fn speed_kmh(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

impl Workout {
    pub fn running(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
        recorded_at: DateTime<Local>,
    ) -> Result<Self, Error> {
        positive_finite("distance", distance_km)?;
        positive_finite("duration", duration_min)?;
        positive_finite("cadence", cadence_spm)?;

        let kind = Kind::Running {
            cadence_spm,
            pace_min_per_km: pace_min_per_km(distance_km, duration_min),
        };
        Ok(Self::assemble(
            coords,
            distance_km,
            duration_min,
            kind,
            recorded_at,
        ))
    }

    pub fn cycling(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
        recorded_at: DateTime<Local>,
    ) -> Result<Self, Error> {
        positive_finite("distance", distance_km)?;
        positive_finite("duration", duration_min)?;
        positive_finite("elevation gain", elevation_gain_m)?;

        let kind = Kind::Cycling {
            elevation_gain_m,
            speed_kmh: speed_kmh(distance_km, duration_min),
        };
        Ok(Self::assemble(
            coords,
            distance_km,
            duration_min,
            kind,
            recorded_at,
        ))
    }

    fn assemble(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        kind: Kind,
        recorded_at: DateTime<Local>,
    ) -> Self {
        let label = match kind {
            Kind::Running { .. } => "Running",
            Kind::Cycling { .. } => "Cycling",
        };
        let description = format!("{label} on {}", recorded_at.format("%B %-d"));

        Self {
            id: id_from_timestamp(recorded_at),
            coords,
            distance_km,
            duration_min,
            recorded_at,
            description,
            kind,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            Kind::Running { .. } => "running",
            Kind::Cycling { .. } => "cycling",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self.kind {
            Kind::Running { .. } => "🏃‍♂️",
            Kind::Cycling { .. } => "🚴‍♂️",
        }
    }

    /// Text shown in the marker popup on the map.
    pub fn popup_text(&self) -> String {
        format!("{} {}", self.emoji(), self.description)
    }

    /// One-line list entry: description, shared fields, variant fields.
    pub fn summary_line(&self) -> String {
        let head = format!(
            "{} {}: {} km, {} min",
            self.emoji(),
            self.description,
            self.distance_km,
            self.duration_min
        );
        match self.kind {
            Kind::Running {
                cadence_spm,
                pace_min_per_km,
            } => format!("{head}, {pace_min_per_km:.2} min/km, {cadence_spm} spm"),
            Kind::Cycling {
                elevation_gain_m,
                speed_kmh,
            } => format!("{head}, {speed_kmh:.2} km/h, {elevation_gain_m} m"),
        }
    }
}

fn positive_finite(field: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Validation { field })
    }
}

/// Identity is derived from the creation timestamp: the last 10 decimal
/// digits of the epoch-millisecond count.
fn id_from_timestamp(at: DateTime<Local>) -> String {
    let ms = at.timestamp_millis().unsigned_abs().to_string();
    let cut = ms.len().saturating_sub(10);
    ms[cut..].to_string()
}
