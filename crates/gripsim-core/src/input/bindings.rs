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

use serde::{Deserialize, Serialize};

/// A pair of keys driving one axis in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisButtons {
    /// Key adding the axis direction.
    pub positive: String,
    /// Key subtracting the axis direction.
    pub negative: String,
}

impl AxisButtons {
    /// Creates a key pair.
    pub fn new(positive: impl Into<String>, negative: impl Into<String>) -> Self {
        Self {
            positive: positive.into(),
            negative: negative.into(),
        }
    }

    /// Returns `true` if `key` belongs to this pair.
    pub fn contains(&self, key: &str) -> bool {
        self.positive == key || self.negative == key
    }
}

/// Keyboard layout for the adaptive and the fixed axes.
///
/// Standard axes are, in order: translate X, translate Y, rotate, grip. Two layouts
/// drive them simultaneously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Keys for adaptive axes 1 to 4.
    pub adaptive: [AxisButtons; 4],
    /// Two alternative layouts for the standard axes.
    pub standard: [[AxisButtons; 4]; 2],
}

impl KeyBindings {
    /// Returns `true` if `key` drives any axis.
    pub fn is_bound(&self, key: &str) -> bool {
        self.adaptive.iter().any(|a| a.contains(key))
            || self.standard.iter().flatten().any(|a| a.contains(key))
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            adaptive: [
                AxisButtons::new("w", "s"),
                AxisButtons::new("d", "a"),
                AxisButtons::new("z", "x"),
                AxisButtons::new("c", "v"),
            ],
            standard: [
                [
                    AxisButtons::new("ArrowUp", "ArrowDown"),
                    AxisButtons::new("ArrowRight", "ArrowLeft"),
                    AxisButtons::new("0", "Control"),
                    AxisButtons::new("3", "1"),
                ],
                [
                    AxisButtons::new("i", "k"),
                    AxisButtons::new("l", "j"),
                    AxisButtons::new("o", "u"),
                    AxisButtons::new("m", "n"),
                ],
            ],
        }
    }
}
