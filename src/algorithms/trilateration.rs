//! Three-circle trilateration by damped least squares
//!
//! Measurement noise means the three range circles generally enclose a
//! small region instead of meeting at a point. The solver therefore
//! minimizes the sum of squared range residuals
//! `sum_i (dist(p, center_i) - radius_i)^2` with a Levenberg-Marquardt
//! iteration over the two planar unknowns, starting from the centroid of
//! the station positions. The problem is 3 equations in 2 unknowns, small
//! enough that fixed-size matrices cover it entirely.

use log::{debug, trace, warn};
use nalgebra::{Matrix2, Matrix3x2, Vector2, Vector3};

use crate::core::{PlanarPoint, RangeCircle, STATION_COUNT};
use crate::validation::error::LocationError;

/// A residual direction is undefined on top of a station; guesses this
/// close to a center get nudged off it (km)
const CENTER_EPS_KM: f64 = 1e-9;

/// Offset applied to a guess that coincides with a station (km)
const GUESS_NUDGE_KM: f64 = 1e-3;

/// Damping bounds; blowing past the upper bound means no acceptable step
/// exists and the solve is abandoned
const MIN_DAMPING: f64 = 1e-12;
const MAX_DAMPING: f64 = 1e10;

/// Iterative least-squares epicenter solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpicenterSolver {
    /// Iteration cap before the solve is declared non-converged
    pub max_iterations: usize,
    /// Threshold on gradient norm, step norm, and cost decrease
    pub convergence_tolerance: f64,
    /// Starting Levenberg-Marquardt damping factor
    pub initial_damping: f64,
}

impl Default for EpicenterSolver {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            convergence_tolerance: 1e-8,
            initial_damping: 1e-3,
        }
    }
}

/// Outcome of one solve attempt.
///
/// `converged == false` marks an iteration-cap or numerical breakdown; the
/// point carried alongside is then the last iterate and must not be read as
/// a location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarFix {
    pub point: PlanarPoint,
    pub converged: bool,
    /// Final sum of squared range residuals (km^2)
    pub cost: f64,
    pub iterations: usize,
}

impl EpicenterSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimize the summed squared range residuals over the three circles.
    ///
    /// Exactly three circles are required; any other count is a caller
    /// contract error. Radii are taken verbatim, including zero and
    /// negative targets, whose residuals are algebraically well defined.
    /// One attempt per invocation; the solver holds no state across calls.
    pub fn solve(&self, circles: &[RangeCircle]) -> Result<PlanarFix, LocationError> {
        if circles.len() != STATION_COUNT {
            return Err(LocationError::StationCount {
                found: circles.len(),
            });
        }

        let mut estimate = initial_guess(circles);
        let mut lambda = self.initial_damping;
        let mut converged = false;
        let mut iterations = 0;

        let (mut residuals, mut jacobian) = residuals_and_jacobian(circles, &estimate);
        let mut cost = residuals.norm_squared();

        for iteration in 1..=self.max_iterations {
            let gradient = jacobian.transpose() * residuals;
            if gradient.norm() < self.convergence_tolerance {
                converged = true;
                break;
            }

            let normal = jacobian.transpose() * jacobian;
            let mut damped = normal;
            for i in 0..2 {
                damped[(i, i)] += lambda * (1.0 + normal[(i, i)]);
            }

            let step = match damped.try_inverse() {
                Some(inverse) => inverse * gradient,
                None => {
                    warn!("singular normal equations at iteration {}", iteration);
                    break;
                }
            };

            let candidate = estimate - step;
            let (candidate_residuals, candidate_jacobian) =
                residuals_and_jacobian(circles, &candidate);
            let candidate_cost = candidate_residuals.norm_squared();

            trace!(
                "iteration {}: cost {:.6e} -> {:.6e}, lambda {:.1e}",
                iteration,
                cost,
                candidate_cost,
                lambda
            );

            if candidate_cost <= cost {
                let decrease = cost - candidate_cost;
                estimate = candidate;
                residuals = candidate_residuals;
                jacobian = candidate_jacobian;
                cost = candidate_cost;
                iterations = iteration;
                lambda = (lambda * 0.1).max(MIN_DAMPING);

                if step.norm() < self.convergence_tolerance
                    || decrease < self.convergence_tolerance * self.convergence_tolerance
                {
                    converged = true;
                    break;
                }
            } else {
                lambda *= 10.0;
                iterations = iteration;
                if lambda > MAX_DAMPING {
                    warn!("damping exhausted without an acceptable step");
                    break;
                }
            }
        }

        if converged {
            debug!(
                "solve converged after {} iterations, cost {:.6e}",
                iterations, cost
            );
        } else {
            warn!(
                "solve did not converge within {} iterations, cost {:.6e}",
                self.max_iterations, cost
            );
        }

        Ok(PlanarFix {
            point: PlanarPoint::new(estimate.x, estimate.y),
            converged,
            cost,
            iterations,
        })
    }
}

/// Centroid of the three station positions, the standard starting point:
/// the objective is well behaved near the circles' mutual region and the
/// centroid sits inside or near it.
fn initial_guess(circles: &[RangeCircle]) -> Vector2<f64> {
    let mut guess = Vector2::zeros();
    for circle in circles {
        guess.x += circle.center.x_km;
        guess.y += circle.center.y_km;
    }
    guess /= circles.len() as f64;

    let on_center = circles.iter().any(|circle| {
        let center = Vector2::new(circle.center.x_km, circle.center.y_km);
        (guess - center).norm() < CENTER_EPS_KM
    });
    if on_center {
        guess.x += GUESS_NUDGE_KM;
    }
    guess
}

fn residuals_and_jacobian(
    circles: &[RangeCircle],
    estimate: &Vector2<f64>,
) -> (Vector3<f64>, Matrix3x2<f64>) {
    let mut residuals = Vector3::zeros();
    let mut jacobian = Matrix3x2::zeros();

    for (i, circle) in circles.iter().enumerate() {
        let dx = estimate.x - circle.center.x_km;
        let dy = estimate.y - circle.center.y_km;
        let distance = (dx * dx + dy * dy).sqrt();

        residuals[i] = distance - circle.radius_km;
        if distance > CENTER_EPS_KM {
            jacobian[(i, 0)] = dx / distance;
            jacobian[(i, 1)] = dy / distance;
        }
    }

    (residuals, jacobian)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circles_from(centers: &[(f64, f64); 3], radii: &[f64; 3]) -> Vec<RangeCircle> {
        centers
            .iter()
            .zip(radii.iter())
            .map(|(&(x, y), &r)| RangeCircle::new(PlanarPoint::new(x, y), r))
            .collect()
    }

    fn objective(circles: &[RangeCircle], x: f64, y: f64) -> f64 {
        let point = PlanarPoint::new(x, y);
        circles
            .iter()
            .map(|c| {
                let r = point.distance_to(&c.center) - c.radius_km;
                r * r
            })
            .sum()
    }

    #[test]
    fn test_exact_intersection_recovered() {
        // circles drawn around (30, 40) intersect there exactly
        let centers = [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0)];
        let target = PlanarPoint::new(30.0, 40.0);
        let radii = [
            target.distance_to(&PlanarPoint::new(0.0, 0.0)),
            target.distance_to(&PlanarPoint::new(100.0, 0.0)),
            target.distance_to(&PlanarPoint::new(0.0, 100.0)),
        ];
        let circles = circles_from(&centers, &radii);

        let fix = EpicenterSolver::default().solve(&circles).unwrap();
        assert!(fix.converged);
        assert!((fix.point.x_km - 30.0).abs() < 1e-6);
        assert!((fix.point.y_km - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_station_order_does_not_matter() {
        let centers = [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0)];
        let target = PlanarPoint::new(30.0, 40.0);
        let radii: Vec<f64> = centers
            .iter()
            .map(|&(x, y)| target.distance_to(&PlanarPoint::new(x, y)))
            .collect();
        let base: Vec<RangeCircle> = centers
            .iter()
            .zip(radii.iter())
            .map(|(&(x, y), &r)| RangeCircle::new(PlanarPoint::new(x, y), r))
            .collect();

        let orderings = [
            vec![base[0], base[1], base[2]],
            vec![base[1], base[2], base[0]],
            vec![base[2], base[0], base[1]],
        ];
        for circles in &orderings {
            let fix = EpicenterSolver::default().solve(circles).unwrap();
            assert!(fix.converged);
            assert!((fix.point.x_km - 30.0).abs() < 1e-6);
            assert!((fix.point.y_km - 40.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_compromise_matches_grid_search() {
        // circles of radius 50*sqrt(2) around the three corner stations
        let radius = 50.0 * 2.0f64.sqrt();
        let circles = circles_from(
            &[(0.0, 0.0), (100.0, 0.0), (0.0, 100.0)],
            &[radius, radius, radius],
        );

        let fix = EpicenterSolver::default().solve(&circles).unwrap();
        assert!(fix.converged);

        // brute-force reference over the station domain
        let mut best = (0.0, 0.0, f64::INFINITY);
        let mut x = 0.0;
        while x <= 100.0 {
            let mut y = 0.0;
            while y <= 100.0 {
                let e = objective(&circles, x, y);
                if e < best.2 {
                    best = (x, y, e);
                }
                y += 0.5;
            }
            x += 0.5;
        }

        let returned = objective(&circles, fix.point.x_km, fix.point.y_km);
        assert!(returned <= best.2 + 1e-6);
        assert!((fix.point.x_km - best.0).abs() <= 0.5);
        assert!((fix.point.y_km - best.1).abs() <= 0.5);
    }

    #[test]
    fn test_disjoint_far_circles_still_converge() {
        // tiny circles nowhere near each other: no intersection exists, the
        // least-squares compromise is still a convergent solve
        let circles = circles_from(&[(0.0, 0.0), (1000.0, 0.0), (0.0, 1000.0)], &[1.0, 1.0, 1.0]);
        let fix = EpicenterSolver::default().solve(&circles).unwrap();
        assert!(fix.converged);
        assert!(fix.point.x_km > 0.0 && fix.point.x_km < 1000.0);
        assert!(fix.point.y_km > 0.0 && fix.point.y_km < 1000.0);

        // no worse than the starting centroid
        let centroid_cost = objective(&circles, 1000.0 / 3.0, 1000.0 / 3.0);
        assert!(fix.cost <= centroid_cost);
    }

    #[test]
    fn test_coincident_stations_land_on_circle() {
        let center = PlanarPoint::new(10.0, 20.0);
        let circles = vec![
            RangeCircle::new(center, 5.0),
            RangeCircle::new(center, 5.0),
            RangeCircle::new(center, 5.0),
        ];
        let fix = EpicenterSolver::default().solve(&circles).unwrap();
        assert!(fix.converged);
        assert!((fix.point.distance_to(&center) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_radius_accepted() {
        // malformed operator input reaches the optimizer verbatim; the
        // residual against a negative target is well defined and pulls the
        // estimate toward the centers
        let circles = circles_from(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], &[-5.0, -5.0, -5.0]);
        let fix = EpicenterSolver::default().solve(&circles).unwrap();
        assert!(fix.converged);
        assert!(fix.cost.is_finite());
    }

    #[test]
    fn test_collinear_stations_settle_on_axis() {
        let circles = circles_from(&[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)], &[58.31, 30.0, 58.31]);
        let fix = EpicenterSolver::default().solve(&circles).unwrap();
        // the mirror ambiguity collapses the search onto the station line;
        // the solve still terminates cleanly with a finite compromise
        assert!(fix.converged);
        assert!(fix.point.x_km.is_finite() && fix.point.y_km.is_finite());
        assert!(fix.cost.is_finite());
    }

    #[test]
    fn test_wrong_station_count_rejected() {
        let two = circles_from(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)], &[1.0, 1.0, 1.0]);
        let err = EpicenterSolver::default().solve(&two[..2]).unwrap_err();
        assert_eq!(err, LocationError::StationCount { found: 2 });

        let mut four = two.clone();
        four.push(RangeCircle::new(PlanarPoint::new(2.0, 2.0), 1.0));
        let err = EpicenterSolver::default().solve(&four).unwrap_err();
        assert_eq!(err, LocationError::StationCount { found: 4 });
    }

    #[test]
    fn test_solver_is_stateless_across_calls() {
        let solver = EpicenterSolver::default();
        let circles = circles_from(&[(0.0, 0.0), (100.0, 0.0), (0.0, 100.0)], &[70.0, 70.0, 70.0]);
        let first = solver.solve(&circles).unwrap();
        let second = solver.solve(&circles).unwrap();
        assert_eq!(first, second);
    }
}
