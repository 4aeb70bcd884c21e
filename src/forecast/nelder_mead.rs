//! Bounded Nelder–Mead simplex minimization
//!
//! Derivative-free and fully deterministic: the same start point and
//! objective always walk the same simplex. Vertices are projected back into
//! the box after every move, which is enough for the small, smooth objectives
//! the smoothing models produce.

use thiserror::Error;

/// Tuning knobs for [`minimize`]
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Offset of the initial simplex vertices from the start point
    pub initial_step: f64,
    /// Relative spread of vertex values at which the search stops
    pub f_tolerance: f64,
    /// Simplex diameter at which the search stops
    pub x_tolerance: f64,
    pub max_iterations: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            initial_step: 0.1,
            f_tolerance: 1e-10,
            x_tolerance: 1e-8,
            max_iterations: 5_000,
        }
    }
}

/// Best point found
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("objective is not finite anywhere on the simplex")]
    NonFinite,

    #[error("no convergence after {0} iterations")]
    NoConvergence(usize),
}

type Vertex = (Vec<f64>, f64);

/// Minimize `objective` inside the box `bounds`, starting from `start`
///
/// `start` and `bounds` must have the same length.
pub fn minimize<F>(
    mut objective: F,
    start: &[f64],
    bounds: &[(f64, f64)],
    options: &Options,
) -> Result<Minimum, OptimizeError>
where
    F: FnMut(&[f64]) -> f64,
{
    let n = start.len();
    let project = |point: &mut Vec<f64>| {
        for (x, (lo, hi)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(*lo, *hi);
        }
    };

    let mut origin = start.to_vec();
    project(&mut origin);

    let mut simplex: Vec<Vertex> = Vec::with_capacity(n + 1);
    let origin_value = objective(&origin);
    simplex.push((origin.clone(), origin_value));
    for i in 0..n {
        let mut vertex = origin.clone();
        // Step inward when the start sits on the upper bound
        if vertex[i] + options.initial_step <= bounds[i].1 {
            vertex[i] += options.initial_step;
        } else {
            vertex[i] -= options.initial_step;
        }
        project(&mut vertex);
        let value = objective(&vertex);
        simplex.push((vertex, value));
    }

    for iteration in 0..options.max_iterations {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

        let best = simplex[0].1;
        let worst = simplex[n].1;
        if !best.is_finite() {
            return Err(OptimizeError::NonFinite);
        }
        if (worst - best).abs() <= options.f_tolerance * (1.0 + best.abs())
            || diameter(&simplex) <= options.x_tolerance
        {
            return Ok(Minimum {
                point: simplex[0].0.clone(),
                value: best,
                iterations: iteration,
            });
        }

        let worst_point = simplex[n].0.clone();
        let centroid: Vec<f64> = (0..n)
            .map(|j| simplex[..n].iter().map(|(p, _)| p[j]).sum::<f64>() / n as f64)
            .collect();
        let along = |coefficient: f64| {
            let mut point: Vec<f64> = centroid
                .iter()
                .zip(&worst_point)
                .map(|(c, w)| c + coefficient * (c - w))
                .collect();
            project(&mut point);
            point
        };

        let reflected = along(1.0);
        let reflected_value = objective(&reflected);

        if reflected_value < best {
            let expanded = along(2.0);
            let expanded_value = objective(&expanded);
            simplex[n] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
        } else if reflected_value < simplex[n - 1].1 {
            simplex[n] = (reflected, reflected_value);
        } else {
            let contracted = if reflected_value < worst {
                along(0.5)
            } else {
                along(-0.5)
            };
            let contracted_value = objective(&contracted);

            if contracted_value < reflected_value.min(worst) {
                simplex[n] = (contracted, contracted_value);
            } else {
                let best_point = simplex[0].0.clone();
                for vertex in simplex.iter_mut().skip(1) {
                    let mut shrunk: Vec<f64> = best_point
                        .iter()
                        .zip(&vertex.0)
                        .map(|(b, p)| b + 0.5 * (p - b))
                        .collect();
                    project(&mut shrunk);
                    let value = objective(&shrunk);
                    *vertex = (shrunk, value);
                }
            }
        }
    }

    Err(OptimizeError::NoConvergence(options.max_iterations))
}

/// Largest coordinate distance from the best vertex to any other
fn diameter(simplex: &[Vertex]) -> f64 {
    let best = &simplex[0].0;
    simplex[1..]
        .iter()
        .flat_map(|(p, _)| p.iter().zip(best).map(|(a, b)| (a - b).abs()))
        .fold(0.0, f64::max)
}
