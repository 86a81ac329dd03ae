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

//! Provides the 2D vector and the 4-component DoF vector used in control space.

use serde::{Deserialize, Serialize};

use super::EPSILON;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

// --- Vec2 ---

/// A 2-dimensional vector with `f32` components.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
}

impl Vec2 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// The unit vector pointing along the positive X-axis.
    pub const X: Self = Self { x: 1.0, y: 0.0 };
    /// The unit vector pointing along the positive Y-axis.
    pub const Y: Self = Self { x: 0.0, y: 1.0 };

    /// Creates a new `Vec2` with the specified components.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculates the squared length (magnitude) of the vector.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    /// Calculates the length (magnitude) of the vector.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a normalized version of the vector with a length of 1.
    /// If the vector's length is near zero, it returns `Vec2::ZERO`.
    #[inline]
    pub fn normalize(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > EPSILON * EPSILON {
            *self * (1.0 / len_sq.sqrt())
        } else {
            Self::ZERO
        }
    }

    /// Calculates the dot product of this vector and another.
    #[inline]
    pub fn dot(&self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Returns the vector rotated counter-clockwise by `angle` radians.
    #[inline]
    pub fn rotate(&self, angle: f32) -> Self {
        let (si, co) = angle.sin_cos();
        Self::new(co * self.x - si * self.y, si * self.x + co * self.y)
    }

    /// Returns the components as an `[x, y]` array.
    #[inline]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(value: [f32; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl approx::AbsDiffEq for Vec2 {
    type Epsilon = f32;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

// --- DofVector ---

/// A direction in control space: `[dx, dy, drot, dgrip]`.
///
/// No magnitude invariant is enforced; the zero vector is a valid placeholder.
/// Serialized as a plain 4-element array to match the model wire format.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct DofVector {
    /// Translation along the gripper's local X axis.
    pub dx: f32,
    /// Translation along the gripper's local Y axis.
    pub dy: f32,
    /// Rotation of the gripper.
    pub drot: f32,
    /// Opening/closing of the fingers.
    pub dgrip: f32,
}

impl DofVector {
    /// Number of components of a DoF vector.
    pub const DIM: usize = 4;

    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Pure local X translation.
    pub const TRANSLATE_X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    /// Pure local Y translation.
    pub const TRANSLATE_Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    /// Pure rotation.
    pub const ROTATE: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    /// Pure grip.
    pub const GRIP: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new `DofVector` from its four components.
    #[inline]
    pub const fn new(dx: f32, dy: f32, drot: f32, dgrip: f32) -> Self {
        Self { dx, dy, drot, dgrip }
    }

    /// Returns the components as an array.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.dx, self.dy, self.drot, self.dgrip]
    }

    /// Returns the translational part as a `Vec2`.
    #[inline]
    pub const fn translation(&self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }

    /// Squared Euclidean distance to another vector.
    #[inline]
    pub fn distance_squared(&self, other: &Self) -> f32 {
        (*self - *other).length_squared()
    }

    /// Calculates the squared length (magnitude) of the vector.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.to_array().iter().map(|c| c * c).sum()
    }

    /// Index of the component with the largest magnitude (first one on ties).
    pub fn largest_component_index(&self) -> usize {
        let c = self.to_array();
        (1..Self::DIM).fold(0, |best, i| if c[i].abs() > c[best].abs() { i } else { best })
    }

    /// Returns `true` when every component is exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<[f32; 4]> for DofVector {
    fn from(value: [f32; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

impl From<DofVector> for [f32; 4] {
    fn from(value: DofVector) -> Self {
        value.to_array()
    }
}

impl Add for DofVector {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            self.dx + rhs.dx,
            self.dy + rhs.dy,
            self.drot + rhs.drot,
            self.dgrip + rhs.dgrip,
        )
    }
}

impl AddAssign for DofVector {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for DofVector {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(
            self.dx - rhs.dx,
            self.dy - rhs.dy,
            self.drot - rhs.drot,
            self.dgrip - rhs.dgrip,
        )
    }
}

impl SubAssign for DofVector {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for DofVector {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(
            self.dx * rhs,
            self.dy * rhs,
            self.drot * rhs,
            self.dgrip * rhs,
        )
    }
}

impl Neg for DofVector {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        self * -1.0
    }
}

impl Index<usize> for DofVector {
    type Output = f32;
    /// # Panics
    /// Panics if `index` is not between 0 and 3.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.dx,
            1 => &self.dy,
            2 => &self.drot,
            3 => &self.dgrip,
            _ => panic!("Index out of bounds for DofVector"),
        }
    }
}

impl IndexMut<usize> for DofVector {
    /// # Panics
    /// Panics if `index` is not between 0 and 3.
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.dx,
            1 => &mut self.dy,
            2 => &mut self.drot,
            3 => &mut self.dgrip,
            _ => panic!("Index out of bounds for DofVector"),
        }
    }
}

impl approx::AbsDiffEq for DofVector {
    type Epsilon = f32;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

/// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, PI};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_vec2_ops() {
        let v1 = Vec2::new(1.0, 2.0);
        let v2 = Vec2::new(3.0, 4.0);
        assert_eq!(v1 + v2, Vec2::new(4.0, 6.0));
        assert_eq!(v2 - v1, Vec2::new(2.0, 2.0));
        assert_eq!(v1 * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-v1, Vec2::new(-1.0, -2.0));
        assert!(approx_eq(v2.length(), 5.0));
    }

    #[test]
    fn test_vec2_rotate() {
        assert_abs_diff_eq!(Vec2::X.rotate(PI / 2.0), Vec2::Y);
        assert_abs_diff_eq!(Vec2::new(1.0, 1.0).rotate(PI), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_vec2_normalize_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        assert_abs_diff_eq!(Vec2::new(0.0, 3.0).normalize(), Vec2::Y);
    }

    #[test]
    fn test_dof_vector_arithmetic() {
        let a = DofVector::new(1.0, 2.0, 3.0, 4.0);
        let b = DofVector::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(a + b, DofVector::new(1.5, 2.5, 3.5, 4.5));
        assert_eq!(a - b, DofVector::new(0.5, 1.5, 2.5, 3.5));
        assert_eq!(-a, DofVector::new(-1.0, -2.0, -3.0, -4.0));
        assert_eq!(a * 2.0, DofVector::new(2.0, 4.0, 6.0, 8.0));

        let mut c = a;
        c += b;
        c -= a;
        assert_eq!(c, b);
    }

    #[test]
    fn test_dof_vector_distance() {
        let a = DofVector::new(1.0, 0.0, 0.0, 0.0);
        let b = DofVector::new(0.0, 1.0, 0.0, 0.0);
        assert!(approx_eq(a.distance_squared(&b), 2.0));
        assert!(approx_eq(a.distance_squared(&-a), 4.0));
    }

    #[test]
    fn test_largest_component_index() {
        assert_eq!(DofVector::new(0.1, -0.9, 0.5, 0.0).largest_component_index(), 1);
        // First index wins on ties.
        assert_eq!(DofVector::new(0.5, -0.5, 0.5, 0.0).largest_component_index(), 0);
        assert_eq!(DofVector::ZERO.largest_component_index(), 0);
    }

    #[test]
    fn test_dof_vector_index() {
        let mut v = DofVector::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(v[2], 7.0);
        v[3] = 1.0;
        assert_eq!(v.dgrip, 1.0);
    }

    #[test]
    fn test_dof_vector_serializes_as_array() {
        let v = DofVector::new(1.0, 0.0, -1.0, 0.5);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[1.0,0.0,-1.0,0.5]");
        let back: DofVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
