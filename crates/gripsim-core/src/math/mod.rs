// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides the small set of mathematics primitives the simulator needs.
//!
//! All angular functions in this module operate in **radians** by default, unless
//! explicitly specified otherwise (e.g., `degrees_to_radians`).

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{PI, TAU};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;
/// The factor to convert radians to degrees (180.0 / PI).
pub const RAD_TO_DEG: f32 = 180.0 / PI;

// --- Declare Sub-Modules ---

pub mod pose;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::pose::Pose2;
pub use self::vector::{DofVector, Vec2};

// --- Utility Functions ---

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use gripsim_core::math::{degrees_to_radians, PI};
/// assert!((degrees_to_radians(180.0) - PI).abs() < 1e-6);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Converts an angle from radians to degrees.
#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * RAD_TO_DEG
}

/// Wraps a relative angle into `[-PI, PI]`.
///
/// The magnitude is first reduced modulo a full turn while keeping its sign,
/// then folded across the half turn.
///
/// # Examples
///
/// ```
/// use gripsim_core::math::{normalize_angle, PI};
/// assert!((normalize_angle(1.5 * PI) + 0.5 * PI).abs() < 1e-5);
/// assert!((normalize_angle(-4.5 * PI) + 0.5 * PI).abs() < 1e-5);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.signum() * (angle.abs() % TAU);
    if wrapped.abs() < PI {
        wrapped
    } else {
        wrapped - wrapped.signum() * TAU
    }
}

/// Rotates a 2D vector given as `[x, y]` by `angle` radians.
#[inline]
pub fn rotate_2d(vec: [f32; 2], angle: f32) -> [f32; 2] {
    let (si, co) = angle.sin_cos();
    [co * vec[0] - si * vec[1], si * vec[0] + co * vec[1]]
}

/// Performs an approximate equality comparison between two floats with a custom tolerance.
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Performs an approximate equality comparison using the module's default [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle_keeps_small_angles() {
        assert!(approx_eq(normalize_angle(0.25), 0.25));
        assert!(approx_eq(normalize_angle(-0.25), -0.25));
        assert_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn test_normalize_angle_folds_past_half_turn() {
        assert!(approx_eq(normalize_angle(PI + 0.5), -PI + 0.5));
        assert!(approx_eq(normalize_angle(-PI - 0.5), PI - 0.5));
        assert!(approx_eq(normalize_angle(TAU + 0.1), 0.1));
    }

    #[test]
    fn test_rotate_2d_quarter_turn() {
        let r = rotate_2d([1.0, 0.0], PI / 2.0);
        assert!(approx_eq(r[0], 0.0));
        assert!(approx_eq(r[1], 1.0));
    }

    #[test]
    fn test_degree_round_trip() {
        assert!(approx_eq(radians_to_degrees(degrees_to_radians(70.0)), 70.0));
    }
}
