//! Derivative-free minimization and numerical curvature.

/// Outcome of a Nelder-Mead run.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best vertex of the final simplex.
    pub optimal_point: Vec<f64>,
    /// Objective value at `optimal_point`.
    pub optimal_value: f64,
    /// Simplex updates performed, counting the final convergence check.
    pub iterations: usize,
    /// Whether the simplex collapsed below the tolerance.
    pub converged: bool,
}

/// Nelder-Mead tuning.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    pub max_iter: usize,
    /// Stop once the spread of vertex values, or the simplex radius, falls
    /// below this.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrink coefficient.
    pub sigma: f64,
    /// Relative size of the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// A simplex vertex with its cached objective value.
#[derive(Debug, Clone)]
struct Vertex {
    point: Vec<f64>,
    value: f64,
}

/// Minimize `objective` starting from `initial`.
///
/// Every trial point is clamped into `bounds` when given. The search stops
/// when the simplex collapses (converged) or after `config.max_iter`
/// iterations (not converged); the best vertex is returned either way. An
/// empty `initial` returns a non-converged result with a `NaN` value.
///
/// # Example
/// ```
/// use ticker_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: Vec::new(),
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let evaluate = |point: Vec<f64>| {
        let point = clamp(point, bounds);
        let value = objective(&point);
        Vertex { point, value }
    };

    let mut simplex: Vec<Vertex> = std::iter::once(initial.to_vec())
        .chain((0..n).map(|i| {
            let mut point = initial.to_vec();
            point[i] += match initial[i].abs() {
                a if a > 1e-10 => config.initial_step * a,
                _ => config.initial_step,
            };
            point
        }))
        .map(evaluate)
        .collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;
        simplex.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal));

        let best = simplex[0].value;
        let second_worst = simplex[n - 1].value;
        let worst = simplex[n].value;

        let centroid = centroid(&simplex[..n]);
        let radius = simplex
            .iter()
            .map(|v| distance(&v.point, &centroid))
            .fold(0.0, f64::max);
        if worst - best < config.tolerance || radius < config.tolerance {
            converged = true;
            break;
        }

        let reflected = evaluate(blend(&centroid, &simplex[n].point, -config.alpha));

        if reflected.value < best {
            let expanded = evaluate(blend(&centroid, &reflected.point, config.gamma));
            simplex[n] = if expanded.value < reflected.value {
                expanded
            } else {
                reflected
            };
            continue;
        }
        if reflected.value < second_worst {
            simplex[n] = reflected;
            continue;
        }

        // Contract toward the better of the worst vertex and its reflection.
        let outside = reflected.value < worst;
        let target = if outside {
            &reflected.point
        } else {
            &simplex[n].point
        };
        let contracted = evaluate(blend(&centroid, target, config.rho));
        let accepted = if outside {
            contracted.value <= reflected.value
        } else {
            contracted.value < worst
        };
        if accepted {
            simplex[n] = contracted;
            continue;
        }

        let anchor = simplex[0].point.clone();
        for vertex in simplex.iter_mut().skip(1) {
            let shrunk = blend(&anchor, &vertex.point, config.sigma);
            *vertex = evaluate(shrunk);
        }
    }

    let best = simplex
        .into_iter()
        .min_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(Vertex {
            point: initial.to_vec(),
            value: f64::NAN,
        });

    NelderMeadResult {
        optimal_point: best.point,
        optimal_value: best.value,
        iterations,
        converged,
    }
}

/// `origin + t * (point - origin)`.
fn blend(origin: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point)
        .map(|(o, p)| o + t * (p - o))
        .collect()
}

/// Mean of the given vertices.
fn centroid(vertices: &[Vertex]) -> Vec<f64> {
    let dim = vertices[0].point.len();
    let count = vertices.len() as f64;
    (0..dim)
        .map(|j| vertices.iter().map(|v| v.point[j]).sum::<f64>() / count)
        .collect()
}

fn clamp(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(bounds) = bounds {
        for (x, (lo, hi)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(*lo, *hi);
        }
    }
    point
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Central finite-difference Hessian of `objective` at `point`.
///
/// The step for each coordinate scales with its magnitude. Non-finite
/// evaluations propagate as NaN entries.
pub fn numerical_hessian<F>(objective: F, point: &[f64]) -> Vec<Vec<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let n = point.len();
    let steps: Vec<f64> = point
        .iter()
        .map(|&x| 1e-4 * x.abs().max(1.0))
        .collect();
    let f0 = objective(point);
    let mut hessian = vec![vec![0.0; n]; n];
    let mut x = point.to_vec();

    for i in 0..n {
        let hi = steps[i];

        x[i] = point[i] + hi;
        let f_plus = objective(&x);
        x[i] = point[i] - hi;
        let f_minus = objective(&x);
        x[i] = point[i];
        hessian[i][i] = (f_plus - 2.0 * f0 + f_minus) / (hi * hi);

        for j in (i + 1)..n {
            let hj = steps[j];
            let mut corner = |si: f64, sj: f64| {
                x[i] = point[i] + si * hi;
                x[j] = point[j] + sj * hj;
                let value = objective(&x);
                x[i] = point[i];
                x[j] = point[j];
                value
            };
            let f_pp = corner(1.0, 1.0);
            let f_pm = corner(1.0, -1.0);
            let f_mp = corner(-1.0, 1.0);
            let f_mm = corner(-1.0, -1.0);
            let value = (f_pp - f_pm - f_mp + f_mm) / (4.0 * hi * hj);
            hessian[i][j] = value;
            hessian[j][i] = value;
        }
    }

    hessian
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn finds_quadratic_minimum() {
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2) + 4.0,
            &[0.0, 0.0],
            None,
            NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(result.optimal_point[1], -1.0, epsilon = 1e-3);
        assert_relative_eq!(result.optimal_value, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn follows_rosenbrock_valley() {
        let result = nelder_mead(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2),
            &[-1.2, 1.0],
            None,
            NelderMeadConfig {
                max_iter: 5000,
                tolerance: 1e-12,
                ..Default::default()
            },
        );

        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(result.optimal_point[1], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn respects_bounds() {
        // Unconstrained minimum at 5 lies outside the box
        let bounds = [(-0.99, 0.99)];
        let result = nelder_mead(
            |x| (x[0] - 5.0).powi(2),
            &[0.1],
            Some(&bounds),
            NelderMeadConfig::default(),
        );

        assert!(result.optimal_point[0] <= 0.99);
        assert_relative_eq!(result.optimal_point[0], 0.99, epsilon = 1e-6);
    }

    #[test]
    fn recovers_ar1_coefficient_from_css() {
        // y_t = 0.6 * y_{t-1} + e_t with a deterministic shock sequence
        let mut data = vec![1.0];
        for t in 1..120 {
            let shock = ((t * 7919) % 13) as f64 / 13.0 - 0.5;
            data.push(0.6 * data[t - 1] + shock);
        }

        let css = |params: &[f64]| {
            data.windows(2)
                .map(|w| (w[1] - params[0] * w[0]).powi(2))
                .sum::<f64>()
        };

        let result = nelder_mead(css, &[0.1], Some(&[(-0.99, 0.99)]), NelderMeadConfig::default());

        assert!(result.converged);
        assert!(result.optimal_point[0] > 0.4 && result.optimal_point[0] < 0.8);
    }

    #[test]
    fn empty_start_is_not_converged() {
        let result = nelder_mead(|_| 0.0, &[], None, NelderMeadConfig::default());
        assert!(!result.converged);
        assert!(result.optimal_point.is_empty());
        assert!(result.optimal_value.is_nan());
    }

    #[test]
    fn iteration_budget_is_reported() {
        let result = nelder_mead(
            |x| (x[0] - 1.0).powi(2) + (x[1] - 2.0).powi(2) + (x[2] - 3.0).powi(2),
            &[10.0, -10.0, 10.0],
            None,
            NelderMeadConfig {
                max_iter: 4,
                ..Default::default()
            },
        );
        assert!(!result.converged);
        assert_eq!(result.iterations, 4);
    }

    #[test]
    fn penalized_region_is_avoided() {
        // Invalid points score f64::MAX, as in the model objective
        let result = nelder_mead(
            |x| if x[0] < 0.0 { f64::MAX } else { (x[0] - 0.5).powi(2) },
            &[0.2],
            None,
            NelderMeadConfig::default(),
        );
        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 0.5, epsilon = 1e-3);
    }

    #[test]
    fn numerical_hessian_quadratic() {
        // f(x, y) = 3x^2 + 2xy + y^2 has Hessian [[6, 2], [2, 2]]
        let h = numerical_hessian(
            |x| 3.0 * x[0] * x[0] + 2.0 * x[0] * x[1] + x[1] * x[1],
            &[0.5, -1.0],
        );

        assert_relative_eq!(h[0][0], 6.0, epsilon = 1e-4);
        assert_relative_eq!(h[0][1], 2.0, epsilon = 1e-4);
        assert_relative_eq!(h[1][0], 2.0, epsilon = 1e-4);
        assert_relative_eq!(h[1][1], 2.0, epsilon = 1e-4);
    }

    #[test]
    fn numerical_hessian_empty_point() {
        let h = numerical_hessian(|_| 1.0, &[]);
        assert!(h.is_empty());
    }
}
