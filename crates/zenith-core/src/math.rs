//! Vector type alias, orientation basis, and degenerate-magnitude guards.

use nalgebra::Vector3;

/// Three-component vector in arena units (uu, uu/s, rad/s).
pub type Vec3 = Vector3<f32>;

/// Magnitudes below this are treated as zero.
///
/// Every normalisation in the reward engine goes through [`direction`],
/// which short-circuits on this threshold instead of dividing by a
/// near-zero length.
pub const EPSILON: f32 = 1e-6;

/// Unit vector along `v`, or `None` when `|v| < EPSILON`.
pub fn direction(v: &Vec3) -> Option<Vec3> {
    let n = v.norm();
    if n < EPSILON {
        None
    } else {
        Some(v / n)
    }
}

/// Length of the `(x, y)` projection.
pub fn horizontal_norm(v: &Vec3) -> f32 {
    v.xy().norm()
}

/// Pitch, yaw and roll in radians.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct EulerAngles {
    /// Nose-up rotation; negative when the nose points down or the car is
    /// rotated backwards.
    pub pitch: f32,
    /// Heading in the ground plane, measured from `+x` toward `+y`.
    pub yaw: f32,
    /// Rotation about the forward axis.
    pub roll: f32,
}

/// Orthonormal car/ball basis.
///
/// Stored as three column vectors rather than a matrix so detectors can read
/// `up.z` (upside-down checks) or `forward` (facing checks) directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    /// Nose direction.
    pub forward: Vec3,
    /// Second basis column, the lateral axis in the game's left-handed
    /// naming: it equals `up × forward`, which points to the driver's left
    /// in this right-handed frame (`+y` at identity).
    pub right: Vec3,
    /// Roof direction.
    pub up: Vec3,
}

impl Orientation {
    /// Identity basis: facing `+x`, roof toward `+z`.
    pub fn identity() -> Self {
        Self {
            forward: Vec3::new(1.0, 0.0, 0.0),
            right: Vec3::new(0.0, 1.0, 0.0),
            up: Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Build the basis for the given Euler angles.
    pub fn from_euler(pitch: f32, yaw: f32, roll: f32) -> Self {
        let (sp, cp) = pitch.sin_cos();
        let (sy, cy) = yaw.sin_cos();
        let (sr, cr) = roll.sin_cos();

        Self {
            forward: Vec3::new(cp * cy, cp * sy, sp),
            right: Vec3::new(cy * sp * sr - cr * sy, sy * sp * sr + cr * cy, -cp * sr),
            up: Vec3::new(-cr * cy * sp - sr * sy, -cr * sy * sp + sr * cy, cp * cr),
        }
    }

    /// Recover `(pitch, yaw, roll)` from the basis.
    pub fn euler_angles(&self) -> EulerAngles {
        let f = &self.forward;
        EulerAngles {
            pitch: f.z.atan2(horizontal_norm(f)),
            yaw: f.y.atan2(f.x),
            roll: (-self.right.z).atan2(self.up.z),
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}
