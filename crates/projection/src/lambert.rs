//! Lambert Conformal Conic projection.
//!
//! Spherical form of the projection. It maps a cone tangent or secant to the
//! Earth's surface onto a flat plane, which keeps meridians straight and
//! converging towards the pole.
//!
//! The projection parameters are:
//! - Latitude of origin (lat_0)
//! - Central meridian (lon_0)
//! - Standard parallel(s): lat_1 and lat_2 (equal for a tangent cone)
//! - False easting / northing in meters

use std::f64::consts::FRAC_PI_4;

/// Mean Earth radius used by the spherical form (meters).
const EARTH_RADIUS: f64 = 6371229.0;

/// Lambert Conformal Conic projection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertConformal {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub lat1: f64,
    /// Second standard parallel in radians
    pub lat2: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the latitude of origin
    rho0: f64,
}

impl LambertConformal {
    /// Create a Lambert Conformal projection.
    ///
    /// # Arguments
    /// * `lat0_deg` - Latitude of origin (degrees)
    /// * `lon0_deg` - Central meridian (degrees)
    /// * `lat1_deg` - First standard parallel (degrees)
    /// * `lat2_deg` - Second standard parallel (degrees)
    /// * `false_easting` - Added to every projected x (meters)
    /// * `false_northing` - Added to every projected y (meters)
    pub fn new(
        lat0_deg: f64,
        lon0_deg: f64,
        lat1_deg: f64,
        lat2_deg: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let lat0 = lat0_deg.to_radians();
        let lon0 = lon0_deg.to_radians();
        let lat1 = lat1_deg.to_radians();
        let lat2 = lat2_deg.to_radians();

        let n = if (lat1 - lat2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            lat1.sin()
        } else {
            let ln_ratio = (lat1.cos() / lat2.cos()).ln();
            let tan_ratio = ((FRAC_PI_4 + lat2 / 2.0).tan() / (FRAC_PI_4 + lat1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        let f = (lat1.cos() * (FRAC_PI_4 + lat1 / 2.0).tan().powf(n)) / n;
        let rho0 = EARTH_RADIUS * f / (FRAC_PI_4 + lat0 / 2.0).tan().powf(n);

        Self {
            lon0,
            lat0,
            lat1,
            lat2,
            false_easting,
            false_northing,
            n,
            f,
            rho0,
        }
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    /// Project geographic coordinates (degrees) to projected meters.
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let theta = self.n * normalize_radians(lon_deg.to_radians() - self.lon0);
        let rho = EARTH_RADIUS * self.f / (FRAC_PI_4 + lat / 2.0).tan().powf(self.n);

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();

        (x + self.false_easting, y + self.false_northing)
    }

    /// Convert projected meters back to geographic coordinates (degrees).
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x - self.false_easting;
        let dy = self.rho0 - (y - self.false_northing);

        let sign = self.n.signum();
        let rho = sign * (x * x + dy * dy).sqrt();
        let theta = (sign * x).atan2(sign * dy);

        let lat = 2.0 * (EARTH_RADIUS * self.f / rho).powf(1.0 / self.n).atan()
            - std::f64::consts::FRAC_PI_2;
        let lon = self.lon0 + theta / self.n;

        (normalize_radians(lon).to_degrees(), lat.to_degrees())
    }

    /// Angle (degrees) between grid north and true north at a point.
    pub fn convergence(&self, lon_deg: f64) -> f64 {
        (self.n * normalize_radians(lon_deg.to_radians() - self.lon0)).to_degrees()
    }
}

/// Normalize an angle difference to [-π, π].
fn normalize_radians(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conus() -> LambertConformal {
        LambertConformal::new(38.5, -97.5, 38.5, 38.5, 0.0, 0.0)
    }

    #[test]
    fn test_origin_projects_to_false_origin() {
        let proj = LambertConformal::new(38.5, -97.5, 38.5, 38.5, 1000.0, 2000.0);
        let (x, y) = proj.project(-97.5, 38.5);
        assert!((x - 1000.0).abs() < 1e-6, "x should be false easting, got {}", x);
        assert!((y - 2000.0).abs() < 1e-6, "y should be false northing, got {}", y);
    }

    #[test]
    fn test_roundtrip() {
        let proj = conus();
        for &(lon, lat) in &[(-94.5, 39.0), (-122.7, 21.1), (-70.0, 50.0)] {
            let (x, y) = proj.project(lon, lat);
            let (rlon, rlat) = proj.unproject(x, y);
            assert!((rlon - lon).abs() < 1e-8, "lon roundtrip failed: {} vs {}", lon, rlon);
            assert!((rlat - lat).abs() < 1e-8, "lat roundtrip failed: {} vs {}", lat, rlat);
        }
    }

    #[test]
    fn test_secant_cone_roundtrip() {
        let proj = LambertConformal::new(40.0, 10.0, 35.0, 45.0, 0.0, 0.0);
        let (x, y) = proj.project(12.0, 42.0);
        let (lon, lat) = proj.unproject(x, y);
        assert!((lon - 12.0).abs() < 1e-8);
        assert!((lat - 42.0).abs() < 1e-8);
    }

    #[test]
    fn test_convergence_zero_on_central_meridian() {
        let proj = conus();
        assert!(proj.convergence(-97.5).abs() < 1e-12);
        assert!(proj.convergence(-90.0) > 0.0);
        assert!(proj.convergence(-105.0) < 0.0);
    }
}
