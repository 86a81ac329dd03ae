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

//! Property checks for the DoF matcher against exhaustive search.

use gripsim_control::{match_dofs, ordered_selections};
use gripsim_core::control::{ChosenDofs, ControlConfig, DofSet, SignPolicy, TrackingMode};
use gripsim_core::math::DofVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_dof(rng: &mut StdRng) -> DofVector {
    DofVector::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    )
}

fn random_set(rng: &mut StdRng) -> DofSet {
    DofSet([
        random_dof(rng),
        random_dof(rng),
        random_dof(rng),
        random_dof(rng),
    ])
}

fn random_chosen(rng: &mut StdRng, n: usize) -> ChosenDofs {
    let all = ordered_selections(n);
    all[rng.gen_range(0..all.len())]
}

fn track(sign_policy: SignPolicy) -> ControlConfig {
    ControlConfig {
        tracking_mode: TrackingMode::Track,
        sign_policy,
        ..ControlConfig::default()
    }
}

/// Brute force over every injective map from chosen axes to new slots.
fn brute_force_cost(chosen: &ChosenDofs, old: &DofSet, new: &DofSet) -> f32 {
    let n = chosen.len();
    let mut best = f32::INFINITY;
    for a in 0..4 {
        for b in 0..4 {
            for c in 0..4 {
                let pick = [a, b, c];
                let pick = &pick[..n];
                if (0..n).any(|i| pick[..i].contains(&pick[i])) {
                    continue;
                }
                let cost: f32 = chosen
                    .as_slice()
                    .iter()
                    .zip(pick)
                    .map(|(&o, &j)| {
                        let plus = old[o].distance_squared(&new[j]);
                        let minus = old[o].distance_squared(&-new[j]);
                        plus.min(minus)
                    })
                    .sum();
                best = best.min(cost);
            }
        }
    }
    best
}

#[test]
fn matcher_is_optimal_against_brute_force() {
    let mut rng = StdRng::seed_from_u64(7);
    for n in 1..=3 {
        for _ in 0..200 {
            let old = random_set(&mut rng);
            let new = random_set(&mut rng);
            let chosen = random_chosen(&mut rng, n);
            let out = match_dofs(&chosen, &old, &new, &track(SignPolicy::KeepOrientation));
            let expected = brute_force_cost(&chosen, &old, &new);
            assert!(
                (out.cost - expected).abs() < 1e-4,
                "n={n}: matcher cost {} vs brute force {expected}",
                out.cost
            );
            assert_eq!(out.chosen.len(), n);
        }
    }
}

#[test]
fn keep_orientation_never_points_away() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let old = random_set(&mut rng);
        let new = random_set(&mut rng);
        let chosen = random_chosen(&mut rng, 2);
        let out = match_dofs(&chosen, &old, &new, &track(SignPolicy::KeepOrientation));
        for (axis, &j) in out.assignment.as_slice().iter().enumerate() {
            let prev = old[chosen.as_slice()[axis]];
            let kept = prev.distance_squared(&out.dofs[j]);
            let flipped = prev.distance_squared(&-out.dofs[j]);
            assert!(kept <= flipped + 1e-6);
        }
    }
}

#[test]
fn largest_component_is_never_negative() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..200 {
        let old = random_set(&mut rng);
        let new = random_set(&mut rng);
        let chosen = random_chosen(&mut rng, 1);
        let out = match_dofs(&chosen, &old, &new, &track(SignPolicy::LargestComponent));
        for dof in out.dofs.iter() {
            assert!(dof[dof.largest_component_index()] >= 0.0);
        }
    }
}

#[test]
fn sign_flipped_identical_response_keeps_directions() {
    let mut rng = StdRng::seed_from_u64(17);
    for n in 1..=3 {
        let old = random_set(&mut rng);
        let flipped = DofSet(old.0.map(|d| -d));
        let chosen = random_chosen(&mut rng, n);
        let out = match_dofs(&chosen, &old, &flipped, &track(SignPolicy::KeepOrientation));
        assert!(out.cost.abs() < 1e-6);
        assert_eq!(out.chosen, chosen);
        for &slot in chosen.as_slice() {
            assert!(out.dofs[slot].distance_squared(&old[slot]) < 1e-10);
        }
    }
}

#[test]
fn entries_are_never_reordered() {
    let mut rng = StdRng::seed_from_u64(19);
    let old = random_set(&mut rng);
    let new = random_set(&mut rng);
    let out = match_dofs(
        &ChosenDofs::canonical(2),
        &old,
        &new,
        &track(SignPolicy::KeepOrientation),
    );
    for j in 0..4 {
        let same = out.dofs[j] == new[j] || out.dofs[j] == -new[j];
        assert!(same, "slot {j} was replaced");
    }
}
