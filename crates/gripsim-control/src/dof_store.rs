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

//! Storage for the adaptive DoFs and the rules that rotate the chosen ones.

use std::time::{Duration, Instant};

use gripsim_core::control::{ChosenDofs, DofSet, EigVals};

/// The controller's view of the model output and the user's axis bindings.
///
/// Single writer: the tick thread.
#[derive(Debug, Clone)]
pub struct DofStore {
    dofs: DofSet,
    eig_vals: EigVals,
    chosen: ChosenDofs,
    reset_pending: bool,
    last_reset: Instant,
    idle_threshold: Duration,
}

impl DofStore {
    /// Creates a store with the initial DoF set and canonical bindings for
    /// `axis_count` axes.
    pub fn new(axis_count: usize, idle_threshold: Duration, now: Instant) -> Self {
        Self {
            dofs: DofSet::initial(),
            eig_vals: [0.0; 4],
            chosen: ChosenDofs::canonical(axis_count),
            reset_pending: false,
            last_reset: now,
            idle_threshold,
        }
    }

    /// Current DoF set.
    pub fn dofs(&self) -> &DofSet {
        &self.dofs
    }

    /// Eigenvalues of the current DoF set.
    pub fn eig_vals(&self) -> &EigVals {
        &self.eig_vals
    }

    /// Current bindings of the adaptive axes.
    pub fn chosen(&self) -> &ChosenDofs {
        &self.chosen
    }

    /// Number of adaptive axes.
    pub fn axis_count(&self) -> usize {
        self.chosen.len()
    }

    /// Whether the next rotation returns to the canonical bindings.
    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Idle time before an automatic rotation.
    pub fn idle_threshold(&self) -> Duration {
        self.idle_threshold
    }

    /// Changes the idle time before an automatic rotation.
    pub fn set_idle_threshold(&mut self, threshold: Duration) {
        self.idle_threshold = threshold;
    }

    /// Rotates the chosen DoFs if `force` is set or the idle timer expired.
    ///
    /// A pending reset returns to the canonical bindings instead, unless they are
    /// already in place and the rotation was not forced. Returns `true` if a
    /// rotation was due (the timer restarts in that case).
    pub fn rotate_chosen(&mut self, force: bool, now: Instant) -> bool {
        if !force && now.saturating_duration_since(self.last_reset) < self.idle_threshold {
            return false;
        }
        self.last_reset = now;

        if self.reset_pending {
            self.reset_pending = false;
            let canonical = ChosenDofs::canonical(self.chosen.len());
            if force || self.chosen != canonical {
                log::debug!("Chosen DoFs reset {:?} -> {:?}", self.chosen, canonical);
                self.chosen = canonical;
                return true;
            }
        }

        let next = self.chosen.rotated();
        log::debug!("Chosen DoFs rotated {:?} -> {:?}", self.chosen, next);
        self.chosen = next;
        true
    }

    /// Records adaptive input: restarts the idle timer and schedules a reset.
    pub fn mark_active(&mut self, now: Instant) {
        self.last_reset = now;
        self.reset_pending = true;
    }

    /// Returns to the canonical bindings immediately.
    pub fn reset_canonical(&mut self, now: Instant) {
        self.reset_pending = true;
        self.rotate_chosen(true, now);
    }

    /// Cancels any pending reset and moves on to the next DoFs immediately.
    pub fn advance(&mut self, now: Instant) {
        self.reset_pending = false;
        self.rotate_chosen(true, now);
    }

    /// Changes the number of adaptive axes. Any change resets to canonical bindings.
    pub fn set_axis_count(&mut self, axis_count: usize, now: Instant) {
        let canonical = ChosenDofs::canonical(axis_count);
        if canonical.len() == self.chosen.len() {
            return;
        }
        log::debug!(
            "Adaptive axis count changed {} -> {}",
            self.chosen.len(),
            canonical.len()
        );
        self.chosen = canonical;
        self.reset_pending = true;
        self.rotate_chosen(true, now);
    }

    /// Replaces the DoF set and eigenvalues, and optionally the bindings.
    pub fn replace(&mut self, dofs: DofSet, eig_vals: EigVals, chosen: Option<ChosenDofs>) {
        self.dofs = dofs;
        self.eig_vals = eig_vals;
        if let Some(chosen) = chosen {
            self.chosen = chosen;
        }
    }
}
