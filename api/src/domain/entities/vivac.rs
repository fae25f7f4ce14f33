//! Vivac point domain entity and geo filtering
//!
//! A vivac point is a user-submitted geo-tagged rest/camp spot. The geo
//! filter is two-phase: a padded bounding box pre-filter (done in SQL by the
//! repository) followed by a precise Haversine refinement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// One degree of latitude in kilometers (also one degree of longitude at the
/// equator)
pub const KM_PER_DEGREE: f64 = 111.0;

/// Unique identifier for a vivac point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VivacId(pub Uuid);

impl VivacId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VivacId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for VivacId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for VivacId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $text)),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_uppercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("Unknown ", stringify!($name), ": {}"), s)),
                }
            }
        }
    };
}

string_enum! {
    /// How hard the spot is to reach
    AccessDifficulty {
        Easy => "EASY",
        Moderate => "MODERATE",
        Hard => "HARD",
    }
}

string_enum! {
    /// Notable surroundings of the spot
    Environment {
        Path => "PATH",
        Bridge => "BRIDGE",
        WaterSource => "WATER_SOURCE",
        Cave => "CAVE",
        Shelter => "SHELTER",
        TreeArea => "TREE_AREA",
        RockWall => "ROCK_WALL",
        Viewpoint => "VIEWPOINT",
        Ruins => "RUINS",
    }
}

string_enum! {
    /// How isolated the spot is
    Privacity {
        UrbanNear => "URBAN_NEAR",
        SemiRemote => "SEMI_REMOTE",
        Remote => "REMOTE",
        Wild => "WILD",
    }
}

string_enum! {
    /// Ground surface at the spot
    TerrainType {
        Grass => "GRASS",
        Rocky => "ROCKY",
        Sand => "SAND",
        Gravel => "GRAVEL",
        Dirt => "DIRT",
    }
}

/// A user-submitted geo-tagged camp spot
#[derive(Debug, Clone, Serialize)]
pub struct VivacPoint {
    pub id: VivacId,
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<i32>,
    pub access_difficulty: AccessDifficulty,
    pub environment: Option<Environment>,
    pub privacity: Option<Privacity>,
    pub terrain_type: Option<TerrainType>,
    pub photo_urls: Vec<String>,
    pub pet_friendly: bool,
    pub avg_rating: Option<f64>,
    pub review_count: i32,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a new vivac point
#[derive(Debug, Clone)]
pub struct NewVivac {
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<i32>,
    pub access_difficulty: AccessDifficulty,
    pub environment: Option<Environment>,
    pub privacity: Option<Privacity>,
    pub terrain_type: Option<TerrainType>,
    pub photo_urls: Vec<String>,
    pub pet_friendly: bool,
    pub created_by: UserId,
}

/// Partial update to a vivac point
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVivac {
    pub name: Option<String>,
    pub description: Option<String>,
    pub elevation: Option<i32>,
    pub access_difficulty: Option<AccessDifficulty>,
    pub environment: Option<Environment>,
    pub privacity: Option<Privacity>,
    pub terrain_type: Option<TerrainType>,
    pub pet_friendly: Option<bool>,
}

/// Listing filters; the geo part is resolved in two phases
#[derive(Debug, Clone, Default)]
pub struct VivacFilter {
    pub privacity: Option<Privacity>,
    pub access_difficulty: Option<AccessDifficulty>,
    pub min_elevation: Option<i32>,
    pub max_elevation: Option<i32>,
    pub geo: Option<GeoFilter>,
}

/// Circle filter: center in decimal degrees, radius in kilometers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFilter {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

/// Rectangular pre-filter derived from a [`GeoFilter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoFilter {
    /// Compute the padded bounding box for the SQL pre-filter.
    ///
    /// The radius is padded by sqrt(2) so the box can never exclude a point
    /// that the precise Haversine pass would keep.
    pub fn bounding_box(&self) -> BoundingBox {
        let padded_km = self.radius_km * std::f64::consts::SQRT_2;
        let delta_lat = padded_km / KM_PER_DEGREE;
        let delta_lon = padded_km / (KM_PER_DEGREE * self.lat.to_radians().cos());

        BoundingBox {
            min_lat: self.lat - delta_lat,
            max_lat: self.lat + delta_lat,
            min_lon: self.lon - delta_lon,
            max_lon: self.lon + delta_lon,
        }
    }

    /// Precise pass: is the point within the circle?
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        haversine_km(self.lat, self.lon, lat, lon) <= self.radius_km
    }
}

/// Great-circle distance in kilometers between two coordinate pairs
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Validate a coordinate pair
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("Latitude out of range: {}", lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("Longitude out of range: {}", lon));
    }
    Ok(())
}
