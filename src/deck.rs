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

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::VocabularyCard;
use crate::types::card_state::CardState;
use crate::types::timestamp::Timestamp;

/// The default number of cards in a session.
pub const DEFAULT_DAILY_GOAL: usize = 20;

const BUNDLED_DECK: &str = include_str!("data/hsk1.toml");

#[derive(Deserialize)]
struct DeckFile {
    cards: Vec<VocabularyCard>,
}

/// Parse a deck from TOML: an array of `[[cards]]` tables.
pub fn parse_deck(source: &str) -> Fallible<Vec<VocabularyCard>> {
    let file: DeckFile = toml::from_str(source)?;
    let mut cards = Vec::with_capacity(file.cards.len());
    for card in file.cards {
        let card = VocabularyCard::new(card.chinese, card.pinyin, card.definition, card.example);
        if card.chinese.is_empty() {
            return fail("deck contains a card with no Chinese text.");
        }
        cards.push(card);
    }
    Ok(cards)
}

/// The HSK 1 deck shipped with the binary.
pub fn bundled_deck() -> Fallible<Vec<VocabularyCard>> {
    parse_deck(BUNDLED_DECK)
}

pub fn load_deck(path: &Path) -> Fallible<Vec<VocabularyCard>> {
    if !path.exists() {
        return fail(format!("deck file {} does not exist.", path.display()));
    }
    parse_deck(&read_to_string(path)?)
}

/// Concatenate the base and custom decks, keeping the first card for each
/// word.
pub fn merge_decks(base: &[VocabularyCard], custom: &[VocabularyCard]) -> Vec<VocabularyCard> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::with_capacity(base.len() + custom.len());
    for card in base.iter().chain(custom.iter()) {
        if seen.insert(card.key()) {
            merged.push(card.clone());
        }
    }
    merged
}

/// Select the cards for a review session.
///
/// Due cards take precedence, oldest due first. Only when nothing is due are
/// never-reviewed cards offered, in deck order. Either list is truncated to
/// `daily_goal`.
pub fn build_session_deck<F>(
    base: &[VocabularyCard],
    custom: &[VocabularyCard],
    lookup: F,
    now: Timestamp,
    daily_goal: usize,
) -> Vec<VocabularyCard>
where
    F: Fn(&str) -> Option<CardState>,
{
    let mut due: Vec<(Timestamp, VocabularyCard)> = Vec::new();
    let mut new: Vec<VocabularyCard> = Vec::new();
    for card in merge_decks(base, custom) {
        match lookup(card.key()) {
            None => new.push(card),
            Some(state) if state.is_new() => new.push(card),
            Some(state) => {
                if state.is_due(now) {
                    due.push((state.due_at, card));
                }
            }
        }
    }
    if due.is_empty() {
        new.truncate(daily_goal);
        return new;
    }
    // Stable, so cards due at the same instant keep deck order.
    due.sort_by_key(|(due_at, _)| *due_at);
    due.into_iter()
        .take(daily_goal)
        .map(|(_, card)| card)
        .collect()
}
