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

//! Continuity matching between the DoFs the user is driving and a new DoF set.
//!
//! Model eigenvectors come back in arbitrary order and with arbitrary sign. The
//! matcher finds the assignment of new DoFs to the chosen axes that moves the
//! axes the least, and resolves the sign of each new vector.

use gripsim_core::control::{
    ChosenDofs, ControlConfig, DofSet, SignPolicy, TrackingMode, DOF_COUNT,
};
use gripsim_core::math::DofVector;

/// Result of matching a new DoF set against the current one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    /// Bindings to use from now on. Unchanged outside [`TrackingMode::Track`].
    pub chosen: ChosenDofs,
    /// The new DoF set with signs resolved, in the order the model sent it.
    pub dofs: DofSet,
    /// The best assignment found, regardless of tracking mode.
    pub assignment: ChosenDofs,
    /// Summed squared distance of the best assignment.
    pub cost: f32,
}

/// Best squared distance between an old vector and `new` or `-new`, with the sign
/// that achieves it. `+1` wins ties.
#[inline]
fn signed_distance(old: &DofVector, new: &DofVector) -> (f32, f32) {
    let plus = old.distance_squared(new);
    let minus = old.distance_squared(&-*new);
    if minus < plus {
        (minus, -1.0)
    } else {
        (plus, 1.0)
    }
}

/// Every ordered selection of `k` distinct indices out of `DOF_COUNT`, in
/// lexicographic order.
///
/// For `k = 2` this yields `[0,1], [0,2], [0,3], [1,0], .., [3,2]`. `k` is clamped
/// into `1..=DOF_COUNT`.
pub fn ordered_selections(k: usize) -> Vec<ChosenDofs> {
    let k = k.clamp(1, DOF_COUNT);
    let mut out = Vec::new();
    let mut digits = vec![0usize; k];
    loop {
        if let Ok(selection) = ChosenDofs::new(&digits) {
            out.push(selection);
        }
        // Odometer increment, last digit fastest.
        let mut pos = k;
        loop {
            if pos == 0 {
                return out;
            }
            pos -= 1;
            digits[pos] += 1;
            if digits[pos] < DOF_COUNT {
                break;
            }
            digits[pos] = 0;
        }
    }
}

/// Matches `new_set` against the DoFs currently bound in `old_chosen`.
///
/// The winning assignment minimizes the summed squared distance between each
/// chosen old vector and its new counterpart (each compared with either sign);
/// the first minimum in lexicographic order wins. Signs are then resolved
/// according to `config.sign_policy`. Entries of the new set keep their positions.
pub fn match_dofs(
    old_chosen: &ChosenDofs,
    old_set: &DofSet,
    new_set: &DofSet,
    config: &ControlConfig,
) -> MatchOutcome {
    // 1. Distance and sign from every chosen old DoF to every new DoF.
    let table: Vec<[(f32, f32); DOF_COUNT]> = old_chosen
        .as_slice()
        .iter()
        .map(|&old| {
            let mut row = [(0.0, 1.0); DOF_COUNT];
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = signed_distance(&old_set[old], &new_set[j]);
            }
            row
        })
        .collect();

    // 2. Cheapest ordered assignment, first one on ties.
    let mut best: Option<(ChosenDofs, f32)> = None;
    for candidate in ordered_selections(old_chosen.len()) {
        let cost: f32 = candidate
            .as_slice()
            .iter()
            .enumerate()
            .map(|(axis, &j)| table[axis][j].0)
            .sum();
        if best.map_or(true, |(_, c)| cost < c) {
            best = Some((candidate, cost));
        }
    }
    let (assignment, cost) = best.unwrap_or((*old_chosen, 0.0));

    // 3. Re-bind only when tracking.
    let chosen = match config.tracking_mode {
        TrackingMode::Track => assignment,
        TrackingMode::HoldIdle => *old_chosen,
    };

    // 4. Resolve signs.
    let mut dofs = *new_set;
    match config.sign_policy {
        SignPolicy::KeepOrientation => {
            for (axis, &j) in assignment.as_slice().iter().enumerate() {
                dofs.0[j] = dofs.0[j] * table[axis][j].1;
            }
        }
        SignPolicy::LargestComponent => {
            for dof in dofs.0.iter_mut() {
                if dof[dof.largest_component_index()] < 0.0 {
                    *dof = -*dof;
                }
            }
        }
    }

    log::trace!("DoF match {:?} -> {:?} (cost {cost:.4})", old_chosen, assignment);
    MatchOutcome {
        chosen,
        dofs,
        assignment,
        cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn config(tracking_mode: TrackingMode, sign_policy: SignPolicy) -> ControlConfig {
        ControlConfig {
            tracking_mode,
            sign_policy,
            ..ControlConfig::default()
        }
    }

    #[test]
    fn test_selection_counts_and_order() {
        assert_eq!(ordered_selections(1).len(), 4);
        assert_eq!(ordered_selections(2).len(), 12);
        assert_eq!(ordered_selections(3).len(), 24);
        assert_eq!(ordered_selections(4).len(), 24);
        let pairs: Vec<Vec<usize>> = ordered_selections(2).into_iter().map(Vec::from).collect();
        assert_eq!(pairs[0], vec![0, 1]);
        assert_eq!(pairs[1], vec![0, 2]);
        assert_eq!(pairs[3], vec![1, 0]);
        assert_eq!(pairs[11], vec![3, 2]);
    }

    #[test]
    fn test_permuted_set_is_tracked() {
        let old = DofSet::initial();
        let new = DofSet([old[2], old[3], old[0], old[1]]);
        let chosen = ChosenDofs::canonical(2);
        let out = match_dofs(
            &chosen,
            &old,
            &new,
            &config(TrackingMode::Track, SignPolicy::KeepOrientation),
        );
        assert_eq!(out.chosen.as_slice(), &[2, 3]);
        assert_abs_diff_eq!(out.cost, 0.0);
        assert_eq!(out.dofs, new);
    }

    #[test]
    fn test_hold_idle_keeps_bindings() {
        let old = DofSet::initial();
        let new = DofSet([old[2], old[3], old[0], old[1]]);
        let chosen = ChosenDofs::canonical(2);
        let out = match_dofs(
            &chosen,
            &old,
            &new,
            &config(TrackingMode::HoldIdle, SignPolicy::KeepOrientation),
        );
        assert_eq!(out.chosen, chosen);
        assert_eq!(out.assignment.as_slice(), &[2, 3]);
    }

    #[test]
    fn test_keep_orientation_flips_negated_response() {
        let old = DofSet([
            DofVector::new(1.0, 0.0, 0.0, 0.0),
            DofVector::new(0.0, 1.0, 0.0, 0.0),
            DofVector::new(0.0, 0.0, 1.0, 0.0),
            DofVector::new(0.0, 0.0, 0.0, 1.0),
        ]);
        let flipped = DofSet(old.0.map(|d| -d));
        let chosen = ChosenDofs::canonical(2);
        let out = match_dofs(
            &chosen,
            &old,
            &flipped,
            &config(TrackingMode::Track, SignPolicy::KeepOrientation),
        );
        assert_eq!(out.chosen, chosen);
        assert_abs_diff_eq!(out.cost, 0.0);
        assert_eq!(out.dofs[0], old[0]);
        assert_eq!(out.dofs[1], old[1]);
        // Unmatched entries keep the sign the model sent.
        assert_eq!(out.dofs[2], flipped[2]);
    }

    #[test]
    fn test_largest_component_policy() {
        let old = DofSet::initial();
        let new = DofSet([
            DofVector::new(0.1, -0.9, 0.0, 0.0),
            DofVector::new(0.5, 0.2, 0.0, 0.0),
            DofVector::new(-0.3, 0.3, 0.0, 0.0),
            DofVector::ZERO,
        ]);
        let out = match_dofs(
            &ChosenDofs::canonical(1),
            &old,
            &new,
            &config(TrackingMode::Track, SignPolicy::LargestComponent),
        );
        assert_eq!(out.dofs[0], DofVector::new(-0.1, 0.9, 0.0, 0.0));
        assert_eq!(out.dofs[1], new[1]);
        // First component wins the tie and is flipped to positive.
        assert_eq!(out.dofs[2], DofVector::new(0.3, -0.3, 0.0, 0.0));
        assert_eq!(out.dofs[3], DofVector::ZERO);
    }

    #[test]
    fn test_ties_pick_first_selection() {
        let zero = DofSet([DofVector::ZERO; 4]);
        let out = match_dofs(
            &ChosenDofs::new(&[3, 2]).unwrap(),
            &zero,
            &zero,
            &config(TrackingMode::Track, SignPolicy::KeepOrientation),
        );
        assert_eq!(out.chosen.as_slice(), &[0, 1]);
    }
}
