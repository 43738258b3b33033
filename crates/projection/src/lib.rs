//! Coordinate reference system transformations.
//!
//! Implements the map projections used by raster grids from scratch, without
//! binding to PROJ. A [`Projection`] converts between geographic coordinates
//! (longitude/latitude in degrees) and the projected plane of a grid:
//!
//! - `project`: lon/lat → x/y
//! - `unproject`: x/y → lon/lat
//!
//! Definitions are accepted as proj4-style strings (`+proj=utm +zone=29`) or
//! EPSG codes (`EPSG:32629`), see [`Projection::from_definition`].

pub mod error;
pub mod lambert;
pub mod mercator;
pub mod transverse_mercator;

pub use error::{ProjectionError, Result};
pub use lambert::LambertConformal;
pub use transverse_mercator::TransverseMercator;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A supported coordinate reference system.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Projection {
    /// Plain longitude/latitude in degrees (identity transform).
    #[default]
    Geographic,
    /// Spherical Web Mercator (EPSG:3857).
    WebMercator,
    /// Transverse Mercator on WGS84, UTM zones included.
    TransverseMercator(TransverseMercator),
    /// Lambert Conformal Conic (spherical).
    LambertConformal(LambertConformal),
}

impl Projection {
    /// Resolve an optional definition, falling back to geographic coordinates.
    pub fn from_optional(definition: Option<&str>) -> Result<Self> {
        match definition {
            Some(def) => Self::from_definition(def),
            None => Ok(Self::Geographic),
        }
    }

    /// Parse a projection definition.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326", "CRS:84" (geographic)
    /// - "EPSG:3857" (Web Mercator)
    /// - "EPSG:32629" / "EPSG:32729" (UTM north / south)
    /// - "+proj=longlat +ellps=WGS84 +datum=WGS84"
    /// - "+proj=utm +zone=29 [+south]"
    /// - "+proj=tmerc +lon_0=-3 +k_0=0.9996 +x_0=500000"
    /// - "+proj=lcc +lat_1=38.5 +lat_2=38.5 +lat_0=38.5 +lon_0=-97.5"
    pub fn from_definition(definition: &str) -> Result<Self> {
        let trimmed = definition.trim();
        if trimmed.is_empty() {
            return Ok(Self::Geographic);
        }

        let upper = trimmed.to_uppercase();
        if let Some(code) = upper.strip_prefix("EPSG:") {
            return Self::from_epsg(code, trimmed);
        }
        if upper == "CRS:84" {
            return Ok(Self::Geographic);
        }

        let params = parse_proj4(trimmed);
        let proj = params
            .get("proj")
            .and_then(|v| v.as_deref())
            .ok_or_else(|| ProjectionError::invalid_parameter("proj", "missing +proj"))?;

        match proj {
            "longlat" | "latlong" | "lonlat" | "latlon" => Ok(Self::Geographic),
            "merc" | "webmerc" => Ok(Self::WebMercator),
            "utm" => {
                let zone: u8 = required(&params, "zone")?;
                if !(1..=60).contains(&zone) {
                    return Err(ProjectionError::invalid_parameter(
                        "zone",
                        format!("{} is outside 1-60", zone),
                    ));
                }
                let south = params.contains_key("south");
                Ok(Self::TransverseMercator(TransverseMercator::utm(zone, south)))
            }
            "tmerc" => {
                let k0 = match optional::<f64>(&params, "k_0")? {
                    Some(k) => k,
                    None => optional(&params, "k")?.unwrap_or(1.0),
                };
                Ok(Self::TransverseMercator(TransverseMercator::new(
                    optional(&params, "lon_0")?.unwrap_or(0.0),
                    optional(&params, "lat_0")?.unwrap_or(0.0),
                    k0,
                    optional(&params, "x_0")?.unwrap_or(0.0),
                    optional(&params, "y_0")?.unwrap_or(0.0),
                )))
            }
            "lcc" => {
                let lat1: f64 = required(&params, "lat_1")?;
                let lat2 = optional(&params, "lat_2")?.unwrap_or(lat1);
                Ok(Self::LambertConformal(LambertConformal::new(
                    optional(&params, "lat_0")?.unwrap_or(lat1),
                    optional(&params, "lon_0")?.unwrap_or(0.0),
                    lat1,
                    lat2,
                    optional(&params, "x_0")?.unwrap_or(0.0),
                    optional(&params, "y_0")?.unwrap_or(0.0),
                )))
            }
            _ => Err(ProjectionError::unsupported(trimmed)),
        }
    }

    fn from_epsg(code: &str, original: &str) -> Result<Self> {
        let number: u32 = code
            .trim()
            .parse()
            .map_err(|_| ProjectionError::unsupported(original))?;

        match number {
            4326 | 4258 | 4269 => Ok(Self::Geographic),
            3857 | 900913 => Ok(Self::WebMercator),
            32601..=32660 => Ok(Self::TransverseMercator(TransverseMercator::utm(
                (number - 32600) as u8,
                false,
            ))),
            32701..=32760 => Ok(Self::TransverseMercator(TransverseMercator::utm(
                (number - 32700) as u8,
                true,
            ))),
            _ => Err(ProjectionError::unsupported(original)),
        }
    }

    /// Check if this is a geographic (lon/lat) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Self::Geographic)
    }

    /// Geographic (degrees) → projected coordinates.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Self::Geographic => (lon, lat),
            Self::WebMercator => mercator::project(lon, lat),
            Self::TransverseMercator(tm) => tm.project(lon, lat),
            Self::LambertConformal(lcc) => lcc.project(lon, lat),
        }
    }

    /// Projected coordinates → geographic (degrees).
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Self::Geographic => (x, y),
            Self::WebMercator => mercator::unproject(x, y),
            Self::TransverseMercator(tm) => tm.unproject(x, y),
            Self::LambertConformal(lcc) => lcc.unproject(x, y),
        }
    }

    /// Central meridian in degrees, for projections that have one.
    pub fn central_meridian(&self) -> Option<f64> {
        match self {
            Self::Geographic | Self::WebMercator => None,
            Self::TransverseMercator(tm) => Some(tm.lon0),
            Self::LambertConformal(lcc) => Some(lcc.lon0.to_degrees()),
        }
    }

    /// Angle in degrees between grid north and true north at a point.
    ///
    /// Zero for cylindrical projections whose meridians are vertical lines.
    pub fn convergence(&self, lon: f64, lat: f64) -> f64 {
        match self {
            Self::Geographic | Self::WebMercator => 0.0,
            Self::TransverseMercator(tm) => tm.convergence(lon, lat),
            Self::LambertConformal(lcc) => lcc.convergence(lon),
        }
    }
}

impl FromStr for Projection {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_definition(s)
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geographic => write!(f, "+proj=longlat +datum=WGS84"),
            Self::WebMercator => write!(f, "EPSG:3857"),
            Self::TransverseMercator(tm) => write!(
                f,
                "+proj=tmerc +lat_0={} +lon_0={} +k_0={} +x_0={} +y_0={}",
                tm.lat0, tm.lon0, tm.k0, tm.false_easting, tm.false_northing
            ),
            Self::LambertConformal(lcc) => write!(
                f,
                "+proj=lcc +lat_1={} +lat_2={} +lat_0={} +lon_0={} +x_0={} +y_0={}",
                lcc.lat1.to_degrees(),
                lcc.lat2.to_degrees(),
                lcc.lat0.to_degrees(),
                lcc.lon0.to_degrees(),
                lcc.false_easting,
                lcc.false_northing
            ),
        }
    }
}

/// Split "+key=value +flag" tokens into a map (flags map to `None`).
fn parse_proj4(definition: &str) -> HashMap<String, Option<String>> {
    definition
        .split_whitespace()
        .filter_map(|token| {
            let token = token.trim_start_matches('+');
            if token.is_empty() {
                return None;
            }
            match token.split_once('=') {
                Some((key, value)) => Some((key.to_lowercase(), Some(value.to_string()))),
                None => Some((token.to_lowercase(), None)),
            }
        })
        .collect()
}

fn optional<T: FromStr>(params: &HashMap<String, Option<String>>, key: &str) -> Result<Option<T>> {
    match params.get(key).and_then(|v| v.as_deref()) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ProjectionError::invalid_parameter(key, format!("cannot parse '{}'", raw))),
        None => Ok(None),
    }
}

fn required<T: FromStr>(params: &HashMap<String, Option<String>>, key: &str) -> Result<T> {
    optional(params, key)?
        .ok_or_else(|| ProjectionError::invalid_parameter(key, "required parameter is missing"))
}
