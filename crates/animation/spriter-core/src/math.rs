//! 2D affine algebra for poses.
//!
//! A [`Space`] is the position/rotation/scale triple every bone and object
//! carries, in parent-relative (local) or world form. `combine`/`extract`
//! compose and decompose spaces through the bone hierarchy; `tween` blends
//! two spaces with a spin-directed angular interpolation.
//!
//! Angles are stored in radians; degrees exist only as a load/display view.
//! All math runs on f64, matching the precision the authoring tools bake
//! their keyframes with.

use std::f64::consts::PI;

use serde::Serialize;

use crate::json::load_float;

/// Wrap `num` into the half-open range `[min, max)`.
pub fn wrap(num: f64, min: f64, max: f64) -> f64 {
    if min < max {
        if num < min {
            max - ((min - num) % (max - min))
        } else {
            min + ((num - min) % (max - min))
        }
    } else if min == max {
        min
    } else {
        num
    }
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + ((b - a) * t)
}

/// Map any radian value into `(-PI, PI]`.
pub fn wrap_angle_radians(angle: f64) -> f64 {
    if angle <= 0.0 {
        ((angle - PI) % (2.0 * PI)) + PI
    } else {
        ((angle + PI) % (2.0 * PI)) - PI
    }
}

/// Angular tween honoring the authored spin direction.
///
/// `spin == 0` holds at `a`; `spin > 0` forces a counter-clockwise sweep
/// (adds a full turn to `b` when it lies behind `a`); `spin < 0` forces a
/// clockwise sweep. The result is wrapped into `(-PI, PI]`.
pub fn tween_angle_radians(a: f64, mut b: f64, t: f64, spin: i32) -> f64 {
    if spin == 0 {
        return a;
    } else if spin > 0 {
        if b < a {
            b += 2.0 * PI;
        }
    } else if b > a {
        b -= 2.0 * PI;
    }

    wrap_angle_radians(lerp(a, b, t))
}

/// Angle in radians with a degree view for the JSON `angle` field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Angle {
    pub rad: f64,
}

impl Angle {
    pub fn new(rad: f64) -> Self {
        Self { rad }
    }

    #[inline]
    pub fn deg(&self) -> f64 {
        self.rad * 180.0 / PI
    }

    #[inline]
    pub fn set_deg(&mut self, deg: f64) {
        self.rad = deg * PI / 180.0;
    }

    #[inline]
    pub fn cos(&self) -> f64 {
        self.rad.cos()
    }

    #[inline]
    pub fn sin(&self) -> f64 {
        self.rad.sin()
    }

    pub fn add(a: Angle, b: Angle) -> Angle {
        Angle::new(wrap_angle_radians(a.rad + b.rad))
    }

    pub fn tween(a: Angle, b: Angle, t: f64, spin: i32) -> Angle {
        Angle::new(tween_angle_radians(a.rad, b.rad, t, spin))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };
    pub const ONE: Vector = Vector { x: 1.0, y: 1.0 };
    /// Default sprite pivot: bottom-left in Spriter's y-up convention.
    pub const DEFAULT_PIVOT: Vector = Vector { x: 0.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(a: Vector, b: Vector) -> Vector {
        Vector::new(a.x + b.x, a.y + b.y)
    }

    pub fn tween(a: Vector, b: Vector, t: f64) -> Vector {
        Vector::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
    }
}

/// Position/rotation/scale triple. Scale may be negative on either axis
/// (mirroring); an odd number of mirrored axes flips the handedness used
/// when composing rotations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Space {
    pub position: Vector,
    pub rotation: Angle,
    pub scale: Vector,
}

impl Default for Space {
    fn default() -> Self {
        Self::identity()
    }
}

impl Space {
    pub fn identity() -> Space {
        Space {
            position: Vector::ZERO,
            rotation: Angle::default(),
            scale: Vector::ONE,
        }
    }

    /// Read `x`, `y`, `angle` (degrees), `scale_x`, `scale_y` with their
    /// documented defaults.
    pub fn load(json: &serde_json::Value) -> Space {
        let mut space = Space::identity();
        space.position.x = load_float(json, "x", 0.0);
        space.position.y = load_float(json, "y", 0.0);
        space.rotation.set_deg(load_float(json, "angle", 0.0));
        space.scale.x = load_float(json, "scale_x", 1.0);
        space.scale.y = load_float(json, "scale_y", 1.0);
        space
    }

    pub fn approx_eq(a: &Space, b: &Space, epsilon: f64) -> bool {
        (a.position.x - b.position.x).abs() <= epsilon
            && (a.position.y - b.position.y).abs() <= epsilon
            && (a.rotation.rad - b.rotation.rad).abs() <= epsilon
            && (a.scale.x - b.scale.x).abs() <= epsilon
            && (a.scale.y - b.scale.y).abs() <= epsilon
    }

    /// Translate in place by `(x, y)` expressed in this space's own frame.
    pub fn translate(&mut self, x: f64, y: f64) {
        let x = x * self.scale.x;
        let y = y * self.scale.y;
        let c = self.rotation.cos();
        let s = self.rotation.sin();
        self.position.x += c * x - s * y;
        self.position.y += s * x + c * y;
    }

    pub fn rotate(&mut self, rad: f64) {
        self.rotation.rad = wrap_angle_radians(self.rotation.rad + rad);
    }

    pub fn scale_by(&mut self, x: f64, y: f64) {
        self.scale.x *= x;
        self.scale.y *= y;
    }

    pub fn invert(space: &Space) -> Space {
        let inv_scale_x = 1.0 / space.scale.x;
        let inv_scale_y = 1.0 / space.scale.y;
        let inv_rotation = -space.rotation.rad;
        let c = inv_rotation.cos();
        let s = inv_rotation.sin();
        let x = -space.position.x;
        let y = -space.position.y;
        Space {
            position: Vector::new((c * x - s * y) * inv_scale_x, (s * x + c * y) * inv_scale_y),
            rotation: Angle::new(inv_rotation),
            scale: Vector::new(inv_scale_x, inv_scale_y),
        }
    }

    /// World transform of `b` expressed in `a`'s frame.
    ///
    /// When `a` mirrors exactly one axis (`scale.x * scale.y < 0`) the
    /// child's rotation is subtracted instead of added; nested mirrored
    /// bones rotate the wrong way without this.
    pub fn combine(a: &Space, b: &Space) -> Space {
        let x = b.position.x * a.scale.x;
        let y = b.position.y * a.scale.y;
        let c = a.rotation.cos();
        let s = a.rotation.sin();
        let rotation = if (a.scale.x * a.scale.y) < 0.0 {
            wrap_angle_radians(a.rotation.rad - b.rotation.rad)
        } else {
            wrap_angle_radians(b.rotation.rad + a.rotation.rad)
        };
        Space {
            position: Vector::new(c * x - s * y + a.position.x, s * x + c * y + a.position.y),
            rotation: Angle::new(rotation),
            scale: Vector::new(b.scale.x * a.scale.x, b.scale.y * a.scale.y),
        }
    }

    /// Inverse of [`Space::combine`]: recover `b` given the composed world
    /// space `ab` and the parent world space `a`, honoring the same
    /// handedness flip.
    pub fn extract(ab: &Space, a: &Space) -> Space {
        let rotation = if (a.scale.x * a.scale.y) < 0.0 {
            wrap_angle_radians(a.rotation.rad - ab.rotation.rad)
        } else {
            wrap_angle_radians(ab.rotation.rad - a.rotation.rad)
        };
        let x = ab.position.x - a.position.x;
        let y = ab.position.y - a.position.y;
        let c = (-a.rotation.rad).cos();
        let s = (-a.rotation.rad).sin();
        Space {
            position: Vector::new((c * x - s * y) / a.scale.x, (s * x + c * y) / a.scale.y),
            rotation: Angle::new(rotation),
            scale: Vector::new(ab.scale.x / a.scale.x, ab.scale.y / a.scale.y),
        }
    }

    /// Map a point from this space's frame into the parent frame.
    pub fn transform(space: &Space, v: Vector) -> Vector {
        let x = v.x * space.scale.x;
        let y = v.y * space.scale.y;
        let c = space.rotation.cos();
        let s = space.rotation.sin();
        Vector::new(c * x - s * y + space.position.x, s * x + c * y + space.position.y)
    }

    /// Map a point from the parent frame back into this space's frame.
    pub fn untransform(space: &Space, v: Vector) -> Vector {
        let x = v.x - space.position.x;
        let y = v.y - space.position.y;
        let c = (-space.rotation.rad).cos();
        let s = (-space.rotation.rad).sin();
        Vector::new((c * x - s * y) / space.scale.x, (s * x + c * y) / space.scale.y)
    }

    pub fn tween(a: &Space, b: &Space, t: f64, spin: i32) -> Space {
        Space {
            position: Vector::tween(a.position, b.position, t),
            rotation: Angle::tween(a.rotation, b.rotation, t, spin),
            scale: Vector::tween(a.scale, b.scale, t),
        }
    }
}
