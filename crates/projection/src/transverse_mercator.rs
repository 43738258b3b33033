//! Transverse Mercator projection on the WGS84 ellipsoid, including UTM zones.
//!
//! Series expansions follow the USGS formulation (Snyder, "Map Projections -
//! A Working Manual", pp. 60-64), accurate to well below a meter within a few
//! degrees of the central meridian.

/// WGS84 semi-major axis (meters).
const SEMI_MAJOR_AXIS: f64 = 6378137.0;
/// WGS84 flattening.
const FLATTENING: f64 = 1.0 / 298.257223563;
/// UTM scale factor on the central meridian.
const UTM_SCALE_FACTOR: f64 = 0.9996;
/// UTM false easting (meters).
const UTM_FALSE_EASTING: f64 = 500000.0;
/// UTM false northing in the southern hemisphere (meters).
const UTM_SOUTH_FALSE_NORTHING: f64 = 10000000.0;

/// Transverse Mercator projection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TransverseMercator {
    /// Central meridian in degrees
    pub lon0: f64,
    /// Latitude of origin in degrees
    pub lat0: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    /// Meridional distance at the latitude of origin
    m0: f64,
}

impl TransverseMercator {
    /// Create a Transverse Mercator projection.
    pub fn new(lon0: f64, lat0: f64, k0: f64, false_easting: f64, false_northing: f64) -> Self {
        Self {
            lon0,
            lat0,
            k0,
            false_easting,
            false_northing,
            m0: meridional_distance(lat0.to_radians()),
        }
    }

    /// UTM zone (1-60), northern or southern hemisphere.
    pub fn utm(zone: u8, south: bool) -> Self {
        let lon0 = -183.0 + 6.0 * zone as f64;
        let false_northing = if south { UTM_SOUTH_FALSE_NORTHING } else { 0.0 };
        Self::new(lon0, 0.0, UTM_SCALE_FACTOR, UTM_FALSE_EASTING, false_northing)
    }

    /// Project geographic coordinates (degrees) to projected meters.
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let e2 = eccentricity_squared();
        let ep2 = e2 / (1.0 - e2);

        let lat = lat_deg.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let tan_lat = lat.tan();

        let n = SEMI_MAJOR_AXIS / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let t = tan_lat * tan_lat;
        let c = ep2 * cos_lat * cos_lat;
        let a = (lon_deg - self.lon0).to_radians() * cos_lat;
        let m = meridional_distance(lat);

        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        let a6 = a5 * a;

        let x = self.k0
            * n
            * (a + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0);

        let y = self.k0
            * (m - self.m0
                + n * tan_lat
                    * (a2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

        (x + self.false_easting, y + self.false_northing)
    }

    /// Convert projected meters back to geographic coordinates (degrees).
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let e2 = eccentricity_squared();
        let ep2 = e2 / (1.0 - e2);
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        let m = self.m0 + (y - self.false_northing) / self.k0;
        let mu = m / (SEMI_MAJOR_AXIS * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

        let sqrt_1_e2 = (1.0 - e2).sqrt();
        let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);
        let e1_2 = e1 * e1;
        let e1_3 = e1_2 * e1;
        let e1_4 = e1_3 * e1;

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let tan_phi1 = phi1.tan();
        let c1 = ep2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let denom = 1.0 - e2 * sin_phi1 * sin_phi1;
        let n1 = SEMI_MAJOR_AXIS / denom.sqrt();
        let r1 = SEMI_MAJOR_AXIS * (1.0 - e2) / denom.powf(1.5);
        let d = (x - self.false_easting) / (n1 * self.k0);

        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d3 * d;
        let d5 = d4 * d;
        let d6 = d5 * d;

        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lon = (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d5
                / 120.0)
            / cos_phi1;

        (self.lon0 + lon.to_degrees(), lat.to_degrees())
    }

    /// Meridian convergence (degrees): angle between grid north and true north.
    pub fn convergence(&self, lon_deg: f64, lat_deg: f64) -> f64 {
        let dlon = (lon_deg - self.lon0).to_radians();
        (dlon.tan() * lat_deg.to_radians().sin()).atan().to_degrees()
    }
}

fn eccentricity_squared() -> f64 {
    FLATTENING * (2.0 - FLATTENING)
}

/// Distance along the meridian from the equator to `lat` (radians).
fn meridional_distance(lat: f64) -> f64 {
    let e2 = eccentricity_squared();
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    SEMI_MAJOR_AXIS
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}
