//! Direct least-squares ellipse fitting (Fitzgibbon, Pilu & Fisher, 1999).

use nalgebra::{DMatrix, Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Geometric ellipse: center, semi-axes and rotation (radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: [f64; 2],
    pub semi_axes: [f64; 2],
    pub angle: f64,
}

impl Ellipse {
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.semi_axes[0] * self.semi_axes[1]
    }

    pub fn is_valid(&self) -> bool {
        self.semi_axes.iter().all(|a| a.is_finite() && *a > 0.0)
            && self.center.iter().all(|c| c.is_finite())
    }
}

/// Fit an ellipse to at least six points.
///
/// Returns `None` when there are too few points or the fitted conic is not a
/// proper ellipse.
pub fn fit_ellipse(points: &[[f64; 2]]) -> Option<Ellipse> {
    let n = points.len();
    if n < 6 {
        return None;
    }

    // Shift to the centroid and scale to a mean radius of √2
    let (mx, my) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    let (mx, my) = (mx / n as f64, my / n as f64);
    let mean_dist = points
        .iter()
        .map(|p| ((p[0] - mx).powi(2) + (p[1] - my).powi(2)).sqrt())
        .sum::<f64>()
        / n as f64;
    let scale = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        return None;
    };

    // Design matrix rows [x², xy, y², x, y, 1]
    let mut d = DMatrix::<f64>::zeros(n, 6);
    for (i, p) in points.iter().enumerate() {
        let x = (p[0] - mx) * scale;
        let y = (p[1] - my) * scale;
        d[(i, 0)] = x * x;
        d[(i, 1)] = x * y;
        d[(i, 2)] = y * y;
        d[(i, 3)] = x;
        d[(i, 4)] = y;
        d[(i, 5)] = 1.0;
    }
    let s = d.transpose() * &d;
    let s11: Matrix3<f64> = s.fixed_view::<3, 3>(0, 0).into_owned();
    let s12: Matrix3<f64> = s.fixed_view::<3, 3>(0, 3).into_owned();
    let s22: Matrix3<f64> = s.fixed_view::<3, 3>(3, 3).into_owned();

    let s22_inv = s22.try_inverse()?;
    let m = s11 - s12 * s22_inv * s12.transpose();

    // C1 = [[0,0,2],[0,-1,0],[2,0,0]] enforces 4AC - B² > 0
    let c1_inv = Matrix3::new(0.0, 0.0, 0.5, 0.0, -1.0, 0.0, 0.5, 0.0, 0.0);
    let a1 = constrained_eigenvector(&(c1_inv * m))?;
    let a2 = -s22_inv * s12.transpose() * a1;

    let conic = denormalize([a1[0], a1[1], a1[2], a2[0], a2[1], a2[2]], mx, my, scale);
    let ellipse = conic_to_ellipse(conic)?;
    ellipse.is_valid().then_some(ellipse)
}

/// Eigenvector of the reduced system that satisfies the ellipse constraint.
fn constrained_eigenvector(system: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let a = system;
    let trace = a.trace();
    let minors = a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)]
        + a[(0, 0)] * a[(2, 2)] - a[(0, 2)] * a[(2, 0)]
        + a[(1, 1)] * a[(2, 2)] - a[(1, 2)] * a[(2, 1)];
    let det = a.determinant();

    let mut best: Option<(f64, Vector3<f64>)> = None;
    for ev in cubic_real_roots(-trace, minors, -det) {
        let Some(v) = null_vector(&(system - Matrix3::identity() * ev)) else {
            continue;
        };
        if 4.0 * v[0] * v[2] - v[1] * v[1] <= 0.0 {
            continue;
        }
        if best.as_ref().is_none_or(|(b, _)| ev.abs() < *b) {
            best = Some((ev.abs(), v));
        }
    }
    best.map(|(_, v)| v)
}

/// Null vector of a rank-2 3×3 matrix: the largest row of its adjugate.
fn null_vector(m: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let r0 = Vector3::new(m[(0, 0)], m[(0, 1)], m[(0, 2)]);
    let r1 = Vector3::new(m[(1, 0)], m[(1, 1)], m[(1, 2)]);
    let r2 = Vector3::new(m[(2, 0)], m[(2, 1)], m[(2, 2)]);
    let candidates = [r1.cross(&r2), r0.cross(&r2), r0.cross(&r1)];

    let best = candidates
        .iter()
        .copied()
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;
    let norm = best.norm();
    (norm > 1e-15).then(|| best / norm)
}

/// Real roots of x³ + b x² + c x + d = 0.
fn cubic_real_roots(b: f64, c: f64, d: f64) -> Vec<f64> {
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;
    let shift = -b / 3.0;
    let disc = -4.0 * p * p * p - 27.0 * q * q;

    if disc >= 0.0 {
        let r = (-p / 3.0).max(0.0).sqrt();
        let cos_arg = if r < 1e-15 {
            0.0
        } else {
            (-q / (2.0 * r * r * r)).clamp(-1.0, 1.0)
        };
        let theta = cos_arg.acos();
        (0..3)
            .map(|k| {
                2.0 * r * ((theta + 2.0 * std::f64::consts::PI * k as f64) / 3.0).cos() + shift
            })
            .collect()
    } else {
        let sqrt_disc = (q * q / 4.0 + p * p * p / 27.0).sqrt();
        let u = (-q / 2.0 + sqrt_disc).cbrt();
        let v = (-q / 2.0 - sqrt_disc).cbrt();
        vec![u + v + shift]
    }
}

/// Map conic coefficients fitted on x' = s(x - mx), y' = s(y - my) back to
/// image coordinates.
fn denormalize(c: [f64; 6], mx: f64, my: f64, s: f64) -> [f64; 6] {
    let [a, b, cc, d, e, f] = c;
    let s2 = s * s;
    [
        a * s2,
        b * s2,
        cc * s2,
        -2.0 * a * s2 * mx - b * s2 * my + d * s,
        -b * s2 * mx - 2.0 * cc * s2 * my + e * s,
        a * s2 * mx * mx + b * s2 * mx * my + cc * s2 * my * my - d * s * mx - e * s * my + f,
    ]
}

fn conic_to_ellipse([a, b, c, d, e, f]: [f64; 6]) -> Option<Ellipse> {
    let denom = 4.0 * a * c - b * b;
    if denom <= 0.0 {
        return None;
    }
    let cx = (b * e - 2.0 * c * d) / denom;
    let cy = (b * d - 2.0 * a * e) / denom;

    let angle = if (a - c).abs() < 1e-15 && b.abs() < 1e-15 {
        0.0
    } else {
        0.5 * b.atan2(a - c)
    };

    let sum = a + c;
    let diff = ((a - c).powi(2) + b * b).sqrt();
    let lambda1 = (sum + diff) / 2.0;
    let lambda2 = (sum - diff) / 2.0;

    // Conic value at the center
    let f0 = a * cx * cx + b * cx * cy + c * cy * cy + d * cx + e * cy + f;
    if f0.abs() < 1e-15 {
        return None;
    }
    let a_sq = -f0 / lambda1;
    let b_sq = -f0 / lambda2;
    if a_sq <= 0.0 || b_sq <= 0.0 {
        return None;
    }

    Some(Ellipse {
        center: [cx, cy],
        semi_axes: [a_sq.sqrt(), b_sq.sqrt()],
        angle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(cx: f64, cy: f64, a: f64, b: f64, angle: f64, n: usize) -> Vec<[f64; 2]> {
        let (sin, cos) = angle.sin_cos();
        (0..n)
            .map(|i| {
                let t = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                let (px, py) = (a * t.cos(), b * t.sin());
                [cx + cos * px - sin * py, cy + sin * px + cos * py]
            })
            .collect()
    }

    #[test]
    fn test_too_few_points() {
        assert!(fit_ellipse(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).is_none());
    }

    #[test]
    fn test_exact_rotated_ellipse() {
        let pts = sample(100.0, 80.0, 30.0, 15.0, 0.3, 50);
        let e = fit_ellipse(&pts).expect("fit should succeed");
        assert_relative_eq!(e.center[0], 100.0, epsilon = 1e-6);
        assert_relative_eq!(e.center[1], 80.0, epsilon = 1e-6);
        assert_relative_eq!(e.area(), std::f64::consts::PI * 30.0 * 15.0, epsilon = 1e-4);
    }

    #[test]
    fn test_circle_fit_area() {
        let pts = sample(60.0, 60.0, 25.0, 25.0, 0.0, 36);
        let e = fit_ellipse(&pts).expect("fit should succeed");
        assert_relative_eq!(e.semi_axes[0], 25.0, epsilon = 1e-6);
        assert_relative_eq!(e.semi_axes[1], 25.0, epsilon = 1e-6);
    }
}
