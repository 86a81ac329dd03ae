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

/// Discrete commands triggered by special keys or gamepad buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Stop the simulation loop.
    Stop,
    /// Show or hide the DoF overlay.
    ToggleHud,
    /// Rebuild the scene.
    Restart,
    /// Log the current gripper state.
    PrintState,
    /// Return the adaptive axes to the canonical DoFs.
    ResetDofs,
    /// Move the adaptive axes on to the next DoFs.
    AdvanceDofs,
    /// Start or stop recording.
    ToggleRecording,
}

impl Command {
    /// Gamepad button restarting the simulation.
    pub const RESTART_BUTTON: usize = 3;
    /// Gamepad button toggling recording.
    pub const RECORD_BUTTON: usize = 9;

    /// Maps a key name to its command, if it has one.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(Self::Stop),
            "h" => Some(Self::ToggleHud),
            "r" => Some(Self::Restart),
            "p" => Some(Self::PrintState),
            "q" => Some(Self::ResetDofs),
            "e" => Some(Self::AdvanceDofs),
            _ => None,
        }
    }

    /// Maps a gamepad button index to its command, if it has one.
    pub fn from_button(button: usize) -> Option<Self> {
        match button {
            Self::RESTART_BUTTON => Some(Self::Restart),
            Self::RECORD_BUTTON => Some(Self::ToggleRecording),
            _ => None,
        }
    }
}
