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

use std::collections::BTreeSet;

/// The set of keys currently held down.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyboardState {
    held: BTreeSet<String>,
}

impl KeyboardState {
    /// Marks `key` as held. Returns `true` if it was not held before.
    pub fn press(&mut self, key: impl Into<String>) -> bool {
        self.held.insert(key.into())
    }

    /// Marks `key` as released.
    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Returns `true` if `key` is held.
    #[inline]
    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// Iterates over the held keys in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.held.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_clear() {
        let mut keys = KeyboardState::default();
        assert!(keys.press("w"));
        assert!(!keys.press("w"));
        keys.press("ArrowUp");
        assert!(keys.is_held("w"));
        keys.release("w");
        assert!(!keys.is_held("w"));
        keys.clear();
        assert_eq!(keys.iter().count(), 0);
    }
}
