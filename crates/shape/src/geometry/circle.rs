use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: [f64; 2],
    pub radius: f64,
}

impl Circle {
    fn from_point(p: [f64; 2]) -> Self {
        Self { center: p, radius: 0.0 }
    }

    fn from_diameter(a: [f64; 2], b: [f64; 2]) -> Self {
        let center = [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0];
        Self { center, radius: distance(a, b) / 2.0 }
    }

    /// Circumcircle of three points; collinear triples fall back to the
    /// circle over their most distant pair.
    fn from_triangle(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Self {
        let (bx, by) = (b[0] - a[0], b[1] - a[1]);
        let (cx, cy) = (c[0] - a[0], c[1] - a[1]);
        let d = 2.0 * (bx * cy - by * cx);
        if d.abs() < EPS {
            let candidates = [
                Self::from_diameter(a, b),
                Self::from_diameter(a, c),
                Self::from_diameter(b, c),
            ];
            return candidates
                .into_iter()
                .fold(candidates[0], |best, c| if c.radius > best.radius { c } else { best });
        }
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        Self {
            center: [a[0] + ux, a[1] + uy],
            radius: (ux * ux + uy * uy).sqrt(),
        }
    }

    pub fn contains(&self, p: [f64; 2]) -> bool {
        distance(self.center, p) <= self.radius + EPS * self.radius.max(1.0)
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

/// Smallest circle enclosing every point. `None` for an empty slice.
pub fn min_enclosing_circle(points: &[[f64; 2]]) -> Option<Circle> {
    let first = *points.first()?;
    let mut circle = Circle::from_point(first);

    for i in 1..points.len() {
        if circle.contains(points[i]) {
            continue;
        }
        circle = Circle::from_point(points[i]);
        for j in 0..i {
            if circle.contains(points[j]) {
                continue;
            }
            circle = Circle::from_diameter(points[i], points[j]);
            for k in 0..j {
                if !circle.contains(points[k]) {
                    circle = Circle::from_triangle(points[i], points[j], points[k]);
                }
            }
        }
    }

    Some(circle)
}
