// Copyright 2025 Fernando Borretti
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

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::types::card_state::CardState;

/// An in-memory record of every card state computed in this process. The
/// scheduler consults it before the state store, so a rating is visible to
/// later scheduling decisions even when writing it to the store failed or has
/// not finished.
#[derive(Default)]
pub struct StateCache {
    changes: HashMap<String, CardState>,
}

impl StateCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a card's latest state, replacing any earlier one.
    pub fn insert(&mut self, word: &str, state: CardState) {
        self.changes.insert(word.to_string(), state);
    }

    pub fn get(&self, word: &str) -> Option<&CardState> {
        self.changes.get(word)
    }

    /// Overlays the cached states on top of a snapshot from the store.
    pub fn overlay(
        &self,
        mut states: BTreeMap<String, CardState>,
    ) -> BTreeMap<String, CardState> {
        for (word, state) in &self.changes {
            states.insert(word.clone(), state.clone());
        }
        states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn test_overlay_prefers_cache() {
        let now = Timestamp::now();
        let stored = CardState::new(now);
        let cached = CardState {
            total_reviews: 3,
            ..CardState::new(now)
        };
        let mut cache = StateCache::new();
        cache.insert("猫", cached.clone());

        let mut snapshot = BTreeMap::new();
        snapshot.insert("猫".to_string(), stored.clone());
        snapshot.insert("狗".to_string(), stored.clone());

        let merged = cache.overlay(snapshot);
        assert_eq!(merged.get("猫"), Some(&cached));
        assert_eq!(merged.get("狗"), Some(&stored));
    }
}
