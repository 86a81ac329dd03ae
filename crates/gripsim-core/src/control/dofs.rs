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

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::DofVector;

/// Number of DoF slots delivered by the model and tracked by the controller.
pub const DOF_COUNT: usize = 4;

/// Eigenvalues reported alongside a [`DofSet`], one per slot.
pub type EigVals = [f32; DOF_COUNT];

/// The four control directions currently offered by the model.
///
/// Entries are never reordered; a model response replaces the whole set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DofSet(pub [DofVector; DOF_COUNT]);

impl DofSet {
    /// The hard-coded set used before the first model response arrives.
    ///
    /// The last slot is zero so that it does not attract continuity matching.
    pub fn initial() -> Self {
        let diag = 0.5 / 0.5_f32.sqrt();
        Self([
            DofVector::ROTATE,
            DofVector::new(diag, diag, 0.8, 0.0),
            DofVector::TRANSLATE_Y,
            DofVector::ZERO,
        ])
    }

    /// Returns the DoF stored in slot `index`, if any.
    pub fn get(&self, index: usize) -> Option<&DofVector> {
        self.0.get(index)
    }

    /// Iterates over the four slots in order.
    pub fn iter(&self) -> std::slice::Iter<'_, DofVector> {
        self.0.iter()
    }
}

impl Default for DofSet {
    fn default() -> Self {
        Self::initial()
    }
}

impl Index<usize> for DofSet {
    type Output = DofVector;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Reasons a list of indices cannot form a [`ChosenDofs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChosenDofsError {
    /// At least one adaptive axis is required.
    #[error("at least one DoF must be chosen")]
    Empty,
    /// More indices than there are DoF slots.
    #[error("cannot choose {0} DoFs out of {DOF_COUNT}")]
    TooMany(usize),
    /// An index does not address a DoF slot.
    #[error("DoF index {0} is out of range")]
    OutOfRange(usize),
    /// The same slot was chosen twice.
    #[error("DoF index {0} is chosen more than once")]
    Duplicate(usize),
}

/// The DoF slots bound to the adaptive axes, in axis order.
///
/// Holds between one and four distinct indices in `[0, DOF_COUNT)`. The type
/// cannot be constructed in any other shape.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChosenDofs {
    indices: [usize; DOF_COUNT],
    len: usize,
}

impl ChosenDofs {
    /// Validates `indices` and builds a selection from them.
    pub fn new(indices: &[usize]) -> Result<Self, ChosenDofsError> {
        if indices.is_empty() {
            return Err(ChosenDofsError::Empty);
        }
        if indices.len() > DOF_COUNT {
            return Err(ChosenDofsError::TooMany(indices.len()));
        }
        let mut slots = [0; DOF_COUNT];
        for (i, &index) in indices.iter().enumerate() {
            if index >= DOF_COUNT {
                return Err(ChosenDofsError::OutOfRange(index));
            }
            if indices[..i].contains(&index) {
                return Err(ChosenDofsError::Duplicate(index));
            }
            slots[i] = index;
        }
        Ok(Self {
            indices: slots,
            len: indices.len(),
        })
    }

    /// The canonical selection `[0, 1, .., n)`. `n` is clamped into `1..=DOF_COUNT`.
    pub fn canonical(n: usize) -> Self {
        let len = n.clamp(1, DOF_COUNT);
        let mut indices = [0; DOF_COUNT];
        for (axis, slot) in indices.iter_mut().enumerate().take(len) {
            *slot = axis;
        }
        Self { indices, len }
    }

    /// Number of adaptive axes this selection drives.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; a selection holds at least one index.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The chosen slot indices in axis order.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices[..self.len]
    }

    /// Slot bound to adaptive axis `axis`, if that axis is active.
    #[inline]
    pub fn get(&self, axis: usize) -> Option<usize> {
        self.as_slice().get(axis).copied()
    }

    /// Returns `true` if slot `index` is bound to any axis.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.as_slice().contains(&index)
    }

    /// Adaptive axis bound to slot `index`, if any.
    pub fn axis_of(&self, index: usize) -> Option<usize> {
        self.as_slice().iter().position(|&i| i == index)
    }

    /// Returns `true` if this is the canonical selection for its length.
    pub fn is_canonical(&self) -> bool {
        self.as_slice().iter().enumerate().all(|(axis, &i)| axis == i)
    }

    /// Moves every axis on to a different slot.
    ///
    /// Axes are advanced in order; each one steps cyclically to the next slot not
    /// currently chosen (the set already reflects the axes advanced before it).
    /// When all four slots are chosen there is no free slot, so every axis steps
    /// by exactly one instead.
    pub fn rotated(&self) -> Self {
        let mut next = *self;
        if self.len == DOF_COUNT {
            for slot in next.indices.iter_mut() {
                *slot = (*slot + 1) % DOF_COUNT;
            }
            return next;
        }
        for axis in 0..next.len {
            let mut candidate = next.indices[axis];
            while next.contains(candidate) {
                candidate = (candidate + 1) % DOF_COUNT;
            }
            next.indices[axis] = candidate;
        }
        next
    }
}

impl Default for ChosenDofs {
    fn default() -> Self {
        Self::canonical(2)
    }
}

impl fmt::Debug for ChosenDofs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl TryFrom<Vec<usize>> for ChosenDofs {
    type Error = ChosenDofsError;

    fn try_from(value: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ChosenDofs> for Vec<usize> {
    fn from(value: ChosenDofs) -> Self {
        value.as_slice().to_vec()
    }
}

impl Serialize for ChosenDofs {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ChosenDofs {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let indices = Vec::<usize>::deserialize(deserializer)?;
        Self::new(&indices).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_distinct(chosen: &ChosenDofs) {
        let s = chosen.as_slice();
        for i in 0..s.len() {
            assert!(s[i] < DOF_COUNT);
            assert!(!s[i + 1..].contains(&s[i]), "duplicate in {chosen:?}");
        }
    }

    #[test]
    fn test_new_rejects_invalid_selections() {
        assert_eq!(ChosenDofs::new(&[]), Err(ChosenDofsError::Empty));
        assert_eq!(
            ChosenDofs::new(&[0, 1, 2, 3, 0]),
            Err(ChosenDofsError::TooMany(5))
        );
        assert_eq!(ChosenDofs::new(&[4]), Err(ChosenDofsError::OutOfRange(4)));
        assert_eq!(
            ChosenDofs::new(&[1, 2, 1]),
            Err(ChosenDofsError::Duplicate(1))
        );
        assert_eq!(ChosenDofs::new(&[3, 1]).unwrap().as_slice(), &[3, 1]);
    }

    #[test]
    fn test_canonical_is_clamped() {
        assert_eq!(ChosenDofs::canonical(0).as_slice(), &[0]);
        assert_eq!(ChosenDofs::canonical(3).as_slice(), &[0, 1, 2]);
        assert_eq!(ChosenDofs::canonical(9).as_slice(), &[0, 1, 2, 3]);
        assert!(ChosenDofs::canonical(2).is_canonical());
        assert!(!ChosenDofs::new(&[1, 0]).unwrap().is_canonical());
        assert_eq!(ChosenDofs::canonical(2), ChosenDofs::new(&[0, 1]).unwrap());
    }

    #[test]
    fn test_rotation_single_axis_cycles_all_slots() {
        let mut chosen = ChosenDofs::canonical(1);
        let mut seen = Vec::new();
        for _ in 0..4 {
            chosen = chosen.rotated();
            seen.push(chosen.as_slice()[0]);
        }
        assert_eq!(seen, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_rotation_two_axes() {
        let chosen = ChosenDofs::canonical(2).rotated();
        // Axis 0 skips the slot held by axis 1, axis 1 skips the new slot of axis 0.
        assert_eq!(chosen.as_slice(), &[2, 3]);
        assert_eq!(chosen.rotated().as_slice(), &[0, 1]);
    }

    #[test]
    fn test_rotation_four_axes_relabels() {
        let chosen = ChosenDofs::new(&[2, 0, 3, 1]).unwrap().rotated();
        assert_eq!(chosen.as_slice(), &[3, 1, 0, 2]);
    }

    #[test]
    fn test_rotation_never_duplicates() {
        let mut starts: Vec<Vec<usize>> = Vec::new();
        for a in 0..4 {
            starts.push(vec![a]);
            for b in (0..4).filter(|&b| b != a) {
                starts.push(vec![a, b]);
                for c in (0..4).filter(|&c| c != a && c != b) {
                    starts.push(vec![a, b, c]);
                    let d = 6 - a - b - c;
                    starts.push(vec![a, b, c, d]);
                }
            }
        }
        for start in starts {
            let mut chosen = ChosenDofs::new(&start).unwrap();
            for _ in 0..10 {
                chosen = chosen.rotated();
                assert_distinct(&chosen);
                assert_eq!(chosen.len(), start.len());
            }
        }
    }

    #[test]
    fn test_serde_validates() {
        let chosen: ChosenDofs = serde_json::from_str("[2,0]").unwrap();
        assert_eq!(chosen.as_slice(), &[2, 0]);
        assert!(serde_json::from_str::<ChosenDofs>("[1,1]").is_err());
        assert_eq!(serde_json::to_string(&chosen).unwrap(), "[2,0]");
    }

    #[test]
    fn test_initial_dof_set() {
        let set = DofSet::initial();
        assert_eq!(set[0], DofVector::ROTATE);
        assert!((set[1].dx - 0.5_f32.sqrt()).abs() < 1e-6);
        assert!(set[3].is_zero());
    }
}
