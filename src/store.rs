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

use crate::error::Fallible;
use crate::types::card::VocabularyCard;
use crate::types::card_state::CardState;

/// Where scheduling state lives. Each `put_state` must replace the stored
/// state for that word atomically.
pub trait StateStore {
    fn get_state(&self, word: &str) -> Fallible<Option<CardState>>;

    fn put_state(&mut self, word: &str, state: &CardState) -> Fallible<()>;

    fn list_all_states(&self) -> Fallible<BTreeMap<String, CardState>>;
}

impl<T: StateStore + ?Sized> StateStore for &mut T {
    fn get_state(&self, word: &str) -> Fallible<Option<CardState>> {
        (**self).get_state(word)
    }

    fn put_state(&mut self, word: &str, state: &CardState) -> Fallible<()> {
        (**self).put_state(word, state)
    }

    fn list_all_states(&self) -> Fallible<BTreeMap<String, CardState>> {
        (**self).list_all_states()
    }
}

/// Where vocabulary comes from: a fixed base deck plus the learner's own
/// words.
pub trait ContentSource {
    fn base_deck(&self) -> Fallible<Vec<VocabularyCard>>;

    fn custom_deck(&self) -> Fallible<Vec<VocabularyCard>>;

    /// Append a word to the custom deck. Returns false, and changes nothing,
    /// if the word is already in the custom deck.
    fn add_word(&mut self, card: VocabularyCard) -> Fallible<bool>;
}

/// Keeps everything in memory.
#[derive(Default)]
pub struct MemoryStore {
    base: Vec<VocabularyCard>,
    custom: Vec<VocabularyCard>,
    states: HashMap<String, CardState>,
}

impl MemoryStore {
    pub fn new(base: Vec<VocabularyCard>) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }
}

impl StateStore for MemoryStore {
    fn get_state(&self, word: &str) -> Fallible<Option<CardState>> {
        Ok(self.states.get(word).cloned())
    }

    fn put_state(&mut self, word: &str, state: &CardState) -> Fallible<()> {
        self.states.insert(word.to_string(), state.clone());
        Ok(())
    }

    fn list_all_states(&self) -> Fallible<BTreeMap<String, CardState>> {
        Ok(self
            .states
            .iter()
            .map(|(word, state)| (word.clone(), state.clone()))
            .collect())
    }
}

impl ContentSource for MemoryStore {
    fn base_deck(&self) -> Fallible<Vec<VocabularyCard>> {
        Ok(self.base.clone())
    }

    fn custom_deck(&self) -> Fallible<Vec<VocabularyCard>> {
        Ok(self.custom.clone())
    }

    fn add_word(&mut self, card: VocabularyCard) -> Fallible<bool> {
        if self.custom.iter().any(|c| c.key() == card.key()) {
            return Ok(false);
        }
        self.custom.push(card);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn test_add_word_is_idempotent() -> Fallible<()> {
        let mut store = MemoryStore::default();
        assert!(store.add_word(VocabularyCard::new("猫", "māo", "cat", ""))?);
        assert!(!store.add_word(VocabularyCard::new("猫", "mao", "kitty", ""))?);
        let custom = store.custom_deck()?;
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].definition, "cat");
        Ok(())
    }

    #[test]
    fn test_states() -> Fallible<()> {
        let mut store = MemoryStore::default();
        assert!(store.get_state("猫")?.is_none());
        let state = CardState::new(Timestamp::now());
        store.put_state("猫", &state)?;
        assert_eq!(store.get_state("猫")?, Some(state.clone()));
        let all = store.list_all_states()?;
        assert_eq!(all.len(), 1);
        assert_eq!(all.get("猫"), Some(&state));
        Ok(())
    }
}
