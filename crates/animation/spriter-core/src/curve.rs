//! Keyframe easing curves.
//!
//! Every keyframe owns a [`Curve`] remapping its normalized progress before
//! the linear payload tween runs. `quadratic`..`quintic` are 1-D easing
//! polynomials built from nested lerps with the control scalars as interior
//! points between the implicit endpoints 0 and 1; `bezier` is a genuine 2-D
//! unit cubic bezier solved for the parameter whose x matches the input.

use crate::json::{load_float, load_string};
use crate::math::lerp;

pub fn interpolate_linear(a: f64, b: f64, t: f64) -> f64 {
    lerp(a, b, t)
}

pub fn interpolate_quadratic(a: f64, b: f64, c: f64, t: f64) -> f64 {
    lerp(lerp(a, b, t), lerp(b, c, t), t)
}

pub fn interpolate_cubic(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    lerp(
        interpolate_quadratic(a, b, c, t),
        interpolate_quadratic(b, c, d, t),
        t,
    )
}

pub fn interpolate_quartic(a: f64, b: f64, c: f64, d: f64, e: f64, t: f64) -> f64 {
    lerp(
        interpolate_cubic(a, b, c, d, t),
        interpolate_cubic(b, c, d, e, t),
        t,
    )
}

pub fn interpolate_quintic(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64, t: f64) -> f64 {
    lerp(
        interpolate_quartic(a, b, c, d, e, t),
        interpolate_quartic(b, c, d, e, f, t),
        t,
    )
}

#[inline]
fn sample_curve(a: f64, b: f64, c: f64, t: f64) -> f64 {
    ((a * t + b) * t + c) * t
}

#[inline]
fn sample_curve_derivative_x(ax: f64, bx: f64, cx: f64, t: f64) -> f64 {
    (3.0 * ax * t + 2.0 * bx) * t + cx
}

/// Find the bezier parameter whose x-coordinate matches `x`: a few Newton
/// iterations first, falling back to bisection where the derivative is too
/// flat for Newton to converge.
fn solve_curve_x(ax: f64, bx: f64, cx: f64, x: f64, epsilon: f64) -> f64 {
    let mut t2 = x;
    for _ in 0..8 {
        let x2 = sample_curve(ax, bx, cx, t2) - x;
        if x2.abs() < epsilon {
            return t2;
        }
        let d2 = sample_curve_derivative_x(ax, bx, cx, t2);
        if d2.abs() < epsilon {
            break;
        }
        t2 = t2 - x2 / d2;
    }

    let mut t0 = 0.0;
    let mut t1 = 1.0;
    t2 = x;

    if t2 < t0 {
        return t0;
    }
    if t2 > t1 {
        return t1;
    }

    while t0 < t1 {
        let x2 = sample_curve(ax, bx, cx, t2);
        if (x2 - x).abs() < epsilon {
            return t2;
        }
        if x > x2 {
            t0 = t2;
        } else {
            t1 = t2;
        }
        t2 = (t1 - t0) * 0.5 + t0;
    }

    t2
}

/// 2-D cubic bezier easing on the unit square: `(x1,y1)`/`(x2,y2)` are the
/// interior control points, `t` is the time axis input.
pub fn interpolate_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    let duration = 1.0;
    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;
    let epsilon = 1.0 / (200.0 * duration);

    sample_curve(ay, by, cy, solve_curve_x(ax, bx, cx, t, epsilon))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurveType {
    /// Hold the first keyframe's value until the very last instant.
    Instant,
    #[default]
    Linear,
    Quadratic,
    Cubic,
    Quartic,
    Quintic,
    Bezier,
}

impl CurveType {
    fn parse(tag: &str) -> CurveType {
        match tag {
            "instant" => CurveType::Instant,
            "linear" => CurveType::Linear,
            "quadratic" => CurveType::Quadratic,
            "cubic" => CurveType::Cubic,
            "quartic" => CurveType::Quartic,
            "quintic" => CurveType::Quintic,
            "bezier" => CurveType::Bezier,
            other => {
                log::warn!("unknown curve_type {other:?}, falling back to linear");
                CurveType::Linear
            }
        }
    }
}

/// Per-keyframe curve: kind tag plus up to four control scalars.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Curve {
    pub curve_type: CurveType,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
}

impl Curve {
    pub fn load(json: &serde_json::Value) -> Curve {
        Curve {
            curve_type: CurveType::parse(&load_string(json, "curve_type", "linear")),
            c1: load_float(json, "c1", 0.0),
            c2: load_float(json, "c2", 0.0),
            c3: load_float(json, "c3", 0.0),
            c4: load_float(json, "c4", 0.0),
        }
    }

    /// Remap normalized progress `t` through this curve.
    pub fn evaluate(&self, t: f64) -> f64 {
        match self.curve_type {
            CurveType::Instant => 0.0,
            CurveType::Linear => t,
            CurveType::Quadratic => interpolate_quadratic(0.0, self.c1, 1.0, t),
            CurveType::Cubic => interpolate_cubic(0.0, self.c1, self.c2, 1.0, t),
            CurveType::Quartic => interpolate_quartic(0.0, self.c1, self.c2, self.c3, 1.0, t),
            CurveType::Quintic => {
                interpolate_quintic(0.0, self.c1, self.c2, self.c3, self.c4, 1.0, t)
            }
            CurveType::Bezier => interpolate_bezier(self.c1, self.c2, self.c3, self.c4, t),
        }
    }
}
