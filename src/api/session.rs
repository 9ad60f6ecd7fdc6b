//! Survey session: owns the station list and drives the location pipeline
//!
//! All mutation lives here. The session hands the algorithm layer immutable
//! snapshots and the algorithm layer hands back fresh values, so every
//! `locate` call reflects exactly the stations and velocities of that
//! moment. Nothing is cached across calls.

use log::{debug, warn};

use crate::algorithms::projection::PlanarFrame;
use crate::algorithms::travel_time::TravelTimeModel;
use crate::algorithms::trilateration::EpicenterSolver;
use crate::api::types::EpicenterEstimate;
use crate::core::{GeoPosition, PlanarPoint, RangeCircle, Station, STATION_COUNT};
use crate::utils::config::{ConfigError, SurveyConfig};
use crate::validation::error::LocationError;
use crate::validation::geometry::{assess_geometry, GeometryQuality};

/// A session-scoped survey: up to three stations, the travel-time model,
/// and the projection frame the solve runs in
#[derive(Debug, Clone)]
pub struct SurveySession {
    model: TravelTimeModel,
    frame: PlanarFrame,
    solver: EpicenterSolver,
    stations: Vec<Station>,
    default_interval_s: f64,
}

impl Default for SurveySession {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveySession {
    /// Session with the stock regional parameters.
    pub fn new() -> Self {
        let config = SurveyConfig::default();
        Self {
            model: TravelTimeModel::default(),
            frame: PlanarFrame::default(),
            solver: EpicenterSolver::default(),
            stations: Vec::with_capacity(STATION_COUNT),
            default_interval_s: config.default_interval_s,
        }
    }

    /// Build a session from a validated configuration.
    pub fn from_config(config: &SurveyConfig) -> Result<Self, ConfigError> {
        let validation = config.validate();
        if !validation.is_valid {
            return Err(validation.errors.into_iter().next().unwrap_or(
                ConfigError::InvalidParameter {
                    parameter: "config".to_string(),
                    value: "invalid".to_string(),
                    reason: "configuration validation failed".to_string(),
                },
            ));
        }

        let model = TravelTimeModel::new(config.p_velocity_kms, config.s_velocity_kms).map_err(
            |e| ConfigError::InvalidParameter {
                parameter: "p_velocity_kms".to_string(),
                value: config.p_velocity_kms.to_string(),
                reason: e.to_string(),
            },
        )?;

        Ok(Self {
            model,
            frame: PlanarFrame::new(config.frame.km_per_degree_lon, config.frame.km_per_degree_lat),
            solver: EpicenterSolver {
                max_iterations: config.solver.max_iterations,
                convergence_tolerance: config.solver.convergence_tolerance,
                initial_damping: config.solver.initial_damping,
            },
            stations: Vec::with_capacity(STATION_COUNT),
            default_interval_s: config.default_interval_s,
        })
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station_capacity(&self) -> usize {
        STATION_COUNT
    }

    pub fn model(&self) -> &TravelTimeModel {
        &self.model
    }

    pub fn frame(&self) -> &PlanarFrame {
        &self.frame
    }

    /// Register a station at the given coordinate, seeded with the default
    /// PS interval. Returns its index.
    ///
    /// A station whose latitude exactly duplicates a registered one is
    /// rejected; a map click on an existing marker must not spawn a twin.
    pub fn add_station(&mut self, lat: f64, lon: f64) -> Result<usize, LocationError> {
        if self.stations.len() >= STATION_COUNT {
            return Err(LocationError::SessionFull {
                capacity: STATION_COUNT,
            });
        }
        if self.stations.iter().any(|s| s.position.lat == lat) {
            return Err(LocationError::DuplicateStation { lat });
        }

        self.stations.push(Station::new(
            GeoPosition { lat, lon },
            self.default_interval_s,
        ));
        Ok(self.stations.len() - 1)
    }

    /// Replace one station's PS interval reading.
    pub fn set_interval(&mut self, index: usize, ps_interval_s: f64) -> Result<(), LocationError> {
        let len = self.stations.len();
        match self.stations.get_mut(index) {
            Some(station) => {
                station.ps_interval_s = ps_interval_s;
                Ok(())
            }
            None => Err(LocationError::StationIndex { index, len }),
        }
    }

    /// Replace the propagation velocities.
    ///
    /// Every derived range changes with the model, since ranges are
    /// computed from the stored intervals at the point of use.
    pub fn set_velocities(
        &mut self,
        p_velocity_kms: f64,
        s_velocity_kms: f64,
    ) -> Result<(), LocationError> {
        if p_velocity_kms <= 0.0 || s_velocity_kms <= 0.0 || p_velocity_kms <= s_velocity_kms {
            return Err(LocationError::InvalidVelocities {
                p_velocity_kms,
                s_velocity_kms,
            });
        }
        self.model = TravelTimeModel::new(p_velocity_kms, s_velocity_kms)?;
        Ok(())
    }

    /// Current per-station hypocentral ranges (km), derived from the stored
    /// intervals through the current model.
    pub fn station_ranges(&self) -> Vec<f64> {
        self.stations
            .iter()
            .map(|s| self.model.range_from_interval(s.ps_interval_s))
            .collect()
    }

    /// Drop every registered station.
    pub fn clear(&mut self) {
        self.stations.clear();
    }

    /// Run the full pipeline: derive ranges, project, solve, project back.
    ///
    /// Requires exactly three registered stations. Geometry problems are
    /// logged and the solve is attempted anyway; its outcome is carried in
    /// the `converged` flag of the estimate.
    pub fn locate(&self) -> Result<EpicenterEstimate, LocationError> {
        if self.stations.len() != STATION_COUNT {
            return Err(LocationError::StationCount {
                found: self.stations.len(),
            });
        }

        let sites: [PlanarPoint; 3] = [
            self.frame.to_planar(self.stations[0].position),
            self.frame.to_planar(self.stations[1].position),
            self.frame.to_planar(self.stations[2].position),
        ];

        match assess_geometry(&sites) {
            GeometryQuality::WellSpread => {}
            quality => warn!("station layout is {:?}, expect a weak solution", quality),
        }

        let circles: Vec<RangeCircle> = self
            .stations
            .iter()
            .zip(sites.iter())
            .map(|(station, &site)| {
                RangeCircle::new(site, self.model.range_from_interval(station.ps_interval_s))
            })
            .collect();

        let fix = self.solver.solve(&circles)?;
        let position = self.frame.to_geodetic(fix.point);
        debug!(
            "locate: lat {:.4}, lon {:.4}, converged {}",
            position.lat, position.lon, fix.converged
        );

        Ok(EpicenterEstimate {
            position,
            converged: fix.converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_station_seeds_default_interval() {
        let mut session = SurveySession::new();
        let index = session.add_station(36.0, 127.0).unwrap();
        assert_eq!(index, 0);
        assert_eq!(session.stations()[0].ps_interval_s, 5.0);
    }

    #[test]
    fn test_capacity_is_three() {
        let mut session = SurveySession::new();
        session.add_station(36.0, 127.0).unwrap();
        session.add_station(36.5, 127.5).unwrap();
        session.add_station(37.0, 128.0).unwrap();
        let err = session.add_station(37.5, 128.5).unwrap_err();
        assert_eq!(err, LocationError::SessionFull { capacity: 3 });
    }

    #[test]
    fn test_duplicate_latitude_rejected() {
        let mut session = SurveySession::new();
        session.add_station(36.0, 127.0).unwrap();
        let err = session.add_station(36.0, 128.0).unwrap_err();
        assert_eq!(err, LocationError::DuplicateStation { lat: 36.0 });
        assert_eq!(session.stations().len(), 1);
    }

    #[test]
    fn test_set_interval_bounds() {
        let mut session = SurveySession::new();
        session.add_station(36.0, 127.0).unwrap();
        session.set_interval(0, 7.5).unwrap();
        assert_eq!(session.stations()[0].ps_interval_s, 7.5);

        let err = session.set_interval(1, 3.0).unwrap_err();
        assert_eq!(err, LocationError::StationIndex { index: 1, len: 1 });
    }

    #[test]
    fn test_ranges_follow_velocity_change() {
        let mut session = SurveySession::new();
        session.add_station(36.0, 127.0).unwrap();

        // default model: 5.0 s * 8.4 km/s
        assert!((session.station_ranges()[0] - 42.0).abs() < 1e-12);

        // 8.0 * 4.0 / 4.0 = 8.0 km/s of factor
        session.set_velocities(8.0, 4.0).unwrap();
        assert!((session.station_ranges()[0] - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_velocity_pairs_rejected() {
        let mut session = SurveySession::new();
        assert!(matches!(
            session.set_velocities(3.5, 6.0),
            Err(LocationError::InvalidVelocities { .. })
        ));
        assert!(matches!(
            session.set_velocities(6.0, 6.0),
            Err(LocationError::InvalidVelocities { .. })
        ));
        assert!(matches!(
            session.set_velocities(-6.0, 3.5),
            Err(LocationError::InvalidVelocities { .. })
        ));
        // model untouched after rejections
        assert_eq!(session.model().p_velocity_kms(), 6.0);
    }

    #[test]
    fn test_clear_resets_station_list() {
        let mut session = SurveySession::new();
        session.add_station(36.0, 127.0).unwrap();
        session.add_station(36.5, 127.5).unwrap();
        session.clear();
        assert!(session.stations().is_empty());
        // the slot at the old latitude is free again
        session.add_station(36.0, 127.0).unwrap();
    }

    #[test]
    fn test_locate_requires_three_stations() {
        let mut session = SurveySession::new();
        session.add_station(36.0, 127.0).unwrap();
        let err = session.locate().unwrap_err();
        assert_eq!(err, LocationError::StationCount { found: 1 });
    }

    #[test]
    fn test_locate_recovers_synthetic_epicenter() {
        let mut session = SurveySession::new();
        let stations = [(36.0, 127.0), (36.8, 128.2), (37.2, 126.8)];
        for &(lat, lon) in &stations {
            session.add_station(lat, lon).unwrap();
        }

        // intervals consistent with a source at 36.5 N, 127.5 E
        let truth = GeoPosition { lat: 36.5, lon: 127.5 };
        let frame = *session.frame();
        let factor = session.model().conversion_factor();
        let source = frame.to_planar(truth);
        for (i, &(lat, lon)) in stations.iter().enumerate() {
            let site = frame.to_planar(GeoPosition { lat, lon });
            session
                .set_interval(i, site.distance_to(&source) / factor)
                .unwrap();
        }

        let estimate = session.locate().unwrap();
        assert!(estimate.converged);
        assert!((estimate.position.lat - 36.5).abs() < 1e-6);
        assert!((estimate.position.lon - 127.5).abs() < 1e-6);
    }

    #[test]
    fn test_locate_does_not_cache() {
        let mut session = SurveySession::new();
        for &(lat, lon) in &[(36.0, 127.0), (36.8, 128.2), (37.2, 126.8)] {
            session.add_station(lat, lon).unwrap();
        }

        let first = session.locate().unwrap();
        session.set_interval(0, 12.0).unwrap();
        let second = session.locate().unwrap();
        assert_ne!(first.position, second.position);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = SurveyConfig {
            p_velocity_kms: 3.5,
            s_velocity_kms: 6.0,
            ..SurveyConfig::default()
        };
        assert!(SurveySession::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_applies_parameters() {
        let mut config = SurveyConfig::default();
        config.p_velocity_kms = 6.5;
        config.s_velocity_kms = 3.6;
        config.default_interval_s = 4.0;

        let mut session = SurveySession::from_config(&config).unwrap();
        assert_eq!(session.model().p_velocity_kms(), 6.5);
        session.add_station(36.0, 127.0).unwrap();
        assert_eq!(session.stations()[0].ps_interval_s, 4.0);
    }
}
