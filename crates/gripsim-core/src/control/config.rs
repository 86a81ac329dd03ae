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

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::math::DofVector;

/// How new model responses affect the chosen DoFs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
    /// Re-bind the adaptive axes to the best-matching new DoFs.
    #[default]
    Track,
    /// Keep the bindings and only accept responses while the user is idle.
    HoldIdle,
}

/// How the sign ambiguity of model eigenvectors is resolved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignPolicy {
    /// Flip new vectors so they point the same way as the ones they replace.
    #[default]
    KeepOrientation,
    /// Flip every new vector so its largest-magnitude component is non-negative.
    LargestComponent,
}

/// Settings of the adaptive controller, read once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Whether the model-driven adaptive axes are used at all.
    pub adaptive_enabled: bool,
    /// Response application policy.
    pub tracking_mode: TrackingMode,
    /// Rotate the chosen DoFs when the user stays idle.
    pub auto_switch: bool,
    /// Sign resolution for incoming DoFs.
    pub sign_policy: SignPolicy,
    /// Number of adaptive axes (1-4).
    pub axis_count: usize,
    /// Idle time before the chosen DoFs rotate, in milliseconds.
    pub idle_threshold_ms: u64,
}

impl ControlConfig {
    /// Idle time before the chosen DoFs rotate.
    pub fn idle_threshold(&self) -> Duration {
        Duration::from_millis(self.idle_threshold_ms)
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            adaptive_enabled: true,
            tracking_mode: TrackingMode::Track,
            auto_switch: true,
            sign_policy: SignPolicy::KeepOrientation,
            axis_count: 2,
            idle_threshold_ms: 5000,
        }
    }
}

/// Per-axis scaling from unit input to physical speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// `[px/s, px/s, deg/s, finger motor m/s]`.
    pub per_dim: [f32; 4],
}

impl SpeedConfig {
    /// Clamps the translational part to the unit circle and scales each axis.
    pub fn scale(&self, mut velocity: DofVector) -> DofVector {
        let xy = velocity.translation();
        let norm_sq = xy.length_squared();
        if norm_sq > 1.0 {
            let norm = norm_sq.sqrt();
            velocity.dx /= norm;
            velocity.dy /= norm;
        }
        DofVector::new(
            velocity.dx * self.per_dim[0],
            velocity.dy * self.per_dim[1],
            velocity.drot * self.per_dim[2],
            velocity.dgrip * self.per_dim[3],
        )
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            per_dim: [50.0, 50.0, 70.0, 0.05],
        }
    }
}
