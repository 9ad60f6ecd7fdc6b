//! Physical constants and regional parameters

/// Default P-wave velocity (km/s)
pub const DEFAULT_P_VELOCITY_KMS: f64 = 6.0;

/// Default S-wave velocity (km/s)
pub const DEFAULT_S_VELOCITY_KMS: f64 = 3.5;

/// Seed PS interval assigned to a newly added station (seconds)
pub const DEFAULT_PS_INTERVAL_S: f64 = 5.0;

/// Approximate ground distance per degree of longitude at the operating
/// region's mid-latitude (km)
pub const KM_PER_DEGREE_LON: f64 = 88.8;

/// Approximate ground distance per degree of latitude (km)
pub const KM_PER_DEGREE_LAT: f64 = 111.0;

/// Operating region center, latitude (degrees)
pub const REGION_CENTER_LAT: f64 = 36.5;

/// Operating region center, longitude (degrees)
pub const REGION_CENTER_LON: f64 = 127.5;

/// Number of stations a solve requires
pub const STATION_COUNT: usize = 3;
