//! # Spatial Reference Systems
//!
//! The three reference systems the compiler moves features between.
//!
//! ## Pipeline
//! ```text
//! Mercator (EPSG:3857) ─┐                      ┌─ Mercator (EPSG:3857)
//!                       ├─► Geographic (WGS84) ├─► Geocentric (ECEF)
//! Geocentric (ECEF)  ───┘    lon/lat degrees   └─► Geographic
//! ```
//! Every conversion pivots through geographic coordinates.
//!
//! ## Table of Contents
//! 1. SpatialReference — SRS variants and parsing
//! 2. WGS84 ellipsoid (geodetic ↔ ECEF)
//! 3. Spherical mercator
//! 4. Local tangent frames

use glam::{DMat3, DVec3};
use std::fmt;
use std::str::FromStr;

use crate::error::{FeatureError, Result};

// ============================================================================
// 1. SpatialReference — SRS variants and parsing
// ============================================================================

/// A spatial reference system understood by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpatialReference {
    /// WGS84 longitude/latitude in degrees, height in metres (EPSG:4326)
    Geographic,
    /// WGS84 earth-centred earth-fixed metres (EPSG:4978)
    Geocentric,
    /// Spherical web mercator metres (EPSG:3857)
    Mercator,
}

impl SpatialReference {
    /// Canonical short name
    pub fn name(&self) -> &'static str {
        match self {
            SpatialReference::Geographic => "wgs84",
            SpatialReference::Geocentric => "geocentric",
            SpatialReference::Mercator => "spherical-mercator",
        }
    }

    /// The purely geographic (lon/lat) SRS underlying this one
    pub fn geographic(&self) -> SpatialReference {
        SpatialReference::Geographic
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, SpatialReference::Geographic)
    }

    pub fn is_geocentric(&self) -> bool {
        matches!(self, SpatialReference::Geocentric)
    }

    /// Convert a coordinate in this SRS to geographic (lon, lat, height).
    pub fn to_geographic(&self, coord: DVec3) -> Result<DVec3> {
        self.check_finite(coord, SpatialReference::Geographic)?;
        match self {
            SpatialReference::Geographic => Ok(coord),
            SpatialReference::Geocentric => Ok(ecef_to_geodetic(coord)),
            SpatialReference::Mercator => Ok(mercator_to_geodetic(coord)),
        }
    }

    /// Convert a geographic (lon, lat, height) coordinate into this SRS.
    pub fn from_geographic(&self, coord: DVec3) -> Result<DVec3> {
        SpatialReference::Geographic.check_finite(coord, *self)?;
        if coord.y.abs() > 90.0 {
            return Err(FeatureError::Reprojection {
                from: SpatialReference::Geographic.name(),
                to: self.name(),
                reason: format!("latitude {} is outside [-90, 90]", coord.y),
            });
        }
        match self {
            SpatialReference::Geographic => Ok(coord),
            SpatialReference::Geocentric => Ok(geodetic_to_ecef(coord)),
            SpatialReference::Mercator => Ok(geodetic_to_mercator(coord)),
        }
    }

    /// Transform a coordinate from this SRS into `to`.
    pub fn transform(&self, coord: DVec3, to: &SpatialReference) -> Result<DVec3> {
        if self == to {
            self.check_finite(coord, *to)?;
            return Ok(coord);
        }
        to.from_geographic(self.to_geographic(coord)?)
    }

    fn check_finite(&self, coord: DVec3, to: SpatialReference) -> Result<()> {
        if coord.is_finite() {
            Ok(())
        } else {
            Err(FeatureError::Reprojection {
                from: self.name(),
                to: to.name(),
                reason: format!("non-finite coordinate {coord}"),
            })
        }
    }
}

impl fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpatialReference {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "wgs84" | "epsg:4326" | "geographic" | "latlong" => Ok(SpatialReference::Geographic),
            "geocentric" | "ecef" | "epsg:4978" => Ok(SpatialReference::Geocentric),
            "spherical-mercator" | "mercator" | "epsg:3857" | "epsg:900913" => {
                Ok(SpatialReference::Mercator)
            }
            other => Err(FeatureError::UnknownSrs(other.to_string())),
        }
    }
}

// ============================================================================
// 2. WGS84 ellipsoid (geodetic ↔ ECEF)
// ============================================================================

/// WGS84 semi-major axis in metres
pub const WGS84_SEMI_MAJOR: f64 = 6_378_137.0;
/// WGS84 flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

const WGS84_ECC_SQ: f64 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);
const WGS84_SEMI_MINOR: f64 = WGS84_SEMI_MAJOR * (1.0 - WGS84_FLATTENING);

/// Geodetic (lon°, lat°, h m) → ECEF metres
pub fn geodetic_to_ecef(geo: DVec3) -> DVec3 {
    let (sin_lat, cos_lat) = geo.y.to_radians().sin_cos();
    let (sin_lon, cos_lon) = geo.x.to_radians().sin_cos();
    let n = WGS84_SEMI_MAJOR / (1.0 - WGS84_ECC_SQ * sin_lat * sin_lat).sqrt();
    DVec3::new(
        (n + geo.z) * cos_lat * cos_lon,
        (n + geo.z) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_ECC_SQ) + geo.z) * sin_lat,
    )
}

/// ECEF metres → geodetic (lon°, lat°, h m), fixed-point iteration on latitude
pub fn ecef_to_geodetic(ecef: DVec3) -> DVec3 {
    let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();
    let lon = ecef.y.atan2(ecef.x);

    // Polar axis: latitude is ±90 and the iteration below divides by cos(lat)
    if p < 1e-9 {
        let lat = if ecef.z >= 0.0 { 90.0 } else { -90.0 };
        return DVec3::new(0.0, lat, ecef.z.abs() - WGS84_SEMI_MINOR);
    }

    let mut lat = ecef.z.atan2(p * (1.0 - WGS84_ECC_SQ));
    let mut height = 0.0;
    for _ in 0..16 {
        let sin_lat = lat.sin();
        let n = WGS84_SEMI_MAJOR / (1.0 - WGS84_ECC_SQ * sin_lat * sin_lat).sqrt();
        height = p / lat.cos() - n;
        let next = ecef.z.atan2(p * (1.0 - WGS84_ECC_SQ * n / (n + height)));
        let converged = (next - lat).abs() < 1e-14;
        lat = next;
        if converged {
            break;
        }
    }

    DVec3::new(lon.to_degrees(), lat.to_degrees(), height)
}

// ============================================================================
// 3. Spherical mercator
// ============================================================================

/// Latitude limit of the square web-mercator world
pub const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

fn geodetic_to_mercator(geo: DVec3) -> DVec3 {
    let lat = geo.y.clamp(-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE);
    let x = WGS84_SEMI_MAJOR * geo.x.to_radians();
    let y = WGS84_SEMI_MAJOR * (std::f64::consts::FRAC_PI_4 + lat.to_radians() * 0.5).tan().ln();
    DVec3::new(x, y, geo.z)
}

fn mercator_to_geodetic(merc: DVec3) -> DVec3 {
    let lon = (merc.x / WGS84_SEMI_MAJOR).to_degrees();
    let lat = (2.0 * (merc.y / WGS84_SEMI_MAJOR).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    DVec3::new(lon, lat, merc.z)
}

// ============================================================================
// 4. Local tangent frames
// ============================================================================

/// East-north-up axes at a geodetic position, expressed in ECEF.
///
/// Columns are (east, north, up); the matrix is orthonormal so its transpose
/// is its inverse.
pub fn enu_rotation(lon_deg: f64, lat_deg: f64) -> DMat3 {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    let east = DVec3::new(-sin_lon, cos_lon, 0.0);
    let north = DVec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let up = DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
    DMat3::from_cols(east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_srs_aliases() {
        assert_eq!("EPSG:4326".parse::<SpatialReference>().unwrap(), SpatialReference::Geographic);
        assert_eq!("ecef".parse::<SpatialReference>().unwrap(), SpatialReference::Geocentric);
        assert_eq!(" epsg:3857 ".parse::<SpatialReference>().unwrap(), SpatialReference::Mercator);
        assert!("wgs84".parse::<SpatialReference>().unwrap().is_geographic());
        assert!(!SpatialReference::Mercator.is_geographic());
        assert!(matches!(
            "epsg:32644".parse::<SpatialReference>(),
            Err(FeatureError::UnknownSrs(_))
        ));
    }

    #[test]
    fn test_geodetic_ecef_known_points() {
        let equator = geodetic_to_ecef(DVec3::new(0.0, 0.0, 0.0));
        assert!(equator.abs_diff_eq(DVec3::new(WGS84_SEMI_MAJOR, 0.0, 0.0), 1e-6));

        let pole = geodetic_to_ecef(DVec3::new(0.0, 90.0, 0.0));
        assert!((pole.z - WGS84_SEMI_MINOR).abs() < 1e-6);
        assert!(pole.x.abs() < 1e-6);
    }

    #[test]
    fn test_geocentric_round_trip() {
        let geo = DVec3::new(81.5, 25.25, 1200.0);
        let ecef = SpatialReference::Geographic
            .transform(geo, &SpatialReference::Geocentric)
            .unwrap();
        let back = SpatialReference::Geocentric
            .transform(ecef, &SpatialReference::Geographic)
            .unwrap();
        assert!((back.x - geo.x).abs() < 1e-9);
        assert!((back.y - geo.y).abs() < 1e-9);
        assert!((back.z - geo.z).abs() < 1e-4);
    }

    #[test]
    fn test_polar_axis_to_geodetic() {
        let geo = ecef_to_geodetic(DVec3::new(0.0, 0.0, -WGS84_SEMI_MINOR - 10.0));
        assert_eq!(geo.y, -90.0);
        assert!((geo.z - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_mercator_round_trip_and_clamp() {
        let geo = DVec3::new(-122.4, 37.8, 0.0);
        let merc = SpatialReference::Geographic
            .transform(geo, &SpatialReference::Mercator)
            .unwrap();
        let back = SpatialReference::Mercator
            .transform(merc, &SpatialReference::Geographic)
            .unwrap();
        assert!(back.abs_diff_eq(geo, 1e-9));

        let clamped = SpatialReference::Geographic
            .transform(DVec3::new(0.0, 90.0, 0.0), &SpatialReference::Mercator)
            .unwrap();
        assert!(clamped.y.is_finite());
    }

    #[test]
    fn test_rejects_bad_input() {
        let nan = SpatialReference::Geographic
            .transform(DVec3::new(f64::NAN, 0.0, 0.0), &SpatialReference::Geocentric);
        assert!(matches!(nan, Err(FeatureError::Reprojection { .. })));

        let beyond_pole = SpatialReference::Geographic
            .transform(DVec3::new(0.0, 91.0, 0.0), &SpatialReference::Geocentric);
        assert!(beyond_pole.is_err());
    }

    #[test]
    fn test_enu_rotation_is_orthonormal() {
        let r = enu_rotation(30.0, 45.0);
        let product = r.transpose() * r;
        assert!(product.abs_diff_eq(DMat3::IDENTITY, 1e-12));
        // Up axis matches the ellipsoid normal direction at that point
        let up = r.z_axis;
        assert!((up.length() - 1.0).abs() < 1e-12);
    }
}
