use spriter_core::curve::{
    interpolate_bezier, interpolate_cubic, interpolate_linear, interpolate_quadratic, Curve,
    CurveType,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn curve(curve_type: CurveType, c1: f64, c2: f64, c3: f64, c4: f64) -> Curve {
    Curve {
        curve_type,
        c1,
        c2,
        c3,
        c4,
    }
}

/// it should hit 0 at t=0 and 1 at t=1 for every kind except instant
#[test]
fn endpoints() {
    let curves = [
        curve(CurveType::Linear, 0.0, 0.0, 0.0, 0.0),
        curve(CurveType::Quadratic, 0.3, 0.0, 0.0, 0.0),
        curve(CurveType::Cubic, 0.1, 0.8, 0.0, 0.0),
        curve(CurveType::Quartic, 0.2, 0.5, 0.9, 0.0),
        curve(CurveType::Quintic, 0.1, 0.3, 0.6, 0.9),
        curve(CurveType::Bezier, 0.25, 0.1, 0.25, 1.0),
    ];
    for c in &curves {
        approx(c.evaluate(0.0), 0.0, 1e-9);
        approx(c.evaluate(1.0), 1.0, 1e-9);
    }
}

/// it should snap to the first keyframe for the whole interval when instant
#[test]
fn instant_always_zero() {
    let c = curve(CurveType::Instant, 0.4, 0.2, 0.0, 0.0);
    for t in [0.0, 0.1, 0.5, 0.99, 1.0] {
        approx(c.evaluate(t), 0.0, 1e-12);
    }
}

/// it should pass t through unchanged when linear
#[test]
fn linear_identity() {
    let c = curve(CurveType::Linear, 0.0, 0.0, 0.0, 0.0);
    for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
        approx(c.evaluate(t), t, 1e-12);
    }
}

/// it should evaluate the nested-lerp easing polynomials
#[test]
fn nested_lerp_values() {
    approx(interpolate_linear(2.0, 6.0, 0.25), 3.0, 1e-12);
    // quadratic through (0, c1, 1) at the midpoint is 0.25 + c1/2
    approx(interpolate_quadratic(0.0, 0.5, 1.0, 0.5), 0.5, 1e-12);
    approx(interpolate_quadratic(0.0, 0.0, 1.0, 0.5), 0.25, 1e-12);
    // cubic with symmetric controls is symmetric about the midpoint
    let lo = interpolate_cubic(0.0, 0.2, 0.8, 1.0, 0.25);
    let hi = interpolate_cubic(0.0, 0.2, 0.8, 1.0, 0.75);
    approx(lo + hi, 1.0, 1e-12);
}

/// it should reduce to the identity when the bezier control points lie on
/// the diagonal
#[test]
fn bezier_identity_controls() {
    for t in [0.1, 0.3, 0.5, 0.7, 0.9] {
        // tolerance bounded by the solver's epsilon, 1/(200*duration)
        approx(interpolate_bezier(0.25, 0.25, 0.75, 0.75, t), t, 5e-3);
    }
}

/// it should survive near-zero-derivative regions via the bisection fallback
#[test]
fn bezier_flat_derivative_fallback() {
    // x(t) = t^3 has zero derivative at the origin; Newton from small x
    // diverges and the bisection path must take over.
    for t in [0.001, 0.01, 0.3, 0.9] {
        approx(interpolate_bezier(0.0, 0.0, 0.0, 0.0, t), t, 1e-2);
    }
}

/// it should stay monotonic for an ease-in-out bezier
#[test]
fn bezier_monotonic() {
    let mut prev = 0.0;
    for i in 1..=20 {
        let t = i as f64 / 20.0;
        let eased = interpolate_bezier(0.42, 0.0, 0.58, 1.0, t);
        assert!(
            eased >= prev - 1e-9,
            "not monotonic at t={t}: {eased} < {prev}"
        );
        prev = eased;
    }
    // ease-in-out is below the diagonal early and above it late
    assert!(interpolate_bezier(0.42, 0.0, 0.58, 1.0, 0.2) < 0.2);
    assert!(interpolate_bezier(0.42, 0.0, 0.58, 1.0, 0.8) > 0.8);
}

/// it should fall back to linear for an unknown curve_type tag
#[test]
fn unknown_curve_type_loads_linear() {
    let c = Curve::load(&serde_json::json!({ "curve_type": "wobble", "c1": 0.5 }));
    assert_eq!(c.curve_type, CurveType::Linear);
    approx(c.evaluate(0.5), 0.5, 1e-12);
}

/// it should load control scalars with defaults
#[test]
fn curve_load_defaults() {
    let c = Curve::load(&serde_json::json!({}));
    assert_eq!(c.curve_type, CurveType::Linear);
    approx(c.c1, 0.0, 1e-12);

    let c = Curve::load(&serde_json::json!({
        "curve_type": "quartic", "c1": 0.1, "c2": 0.2, "c3": 0.3
    }));
    assert_eq!(c.curve_type, CurveType::Quartic);
    approx(c.c3, 0.3, 1e-12);
    approx(c.c4, 0.0, 1e-12);
}
