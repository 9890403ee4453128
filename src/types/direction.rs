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

use serde::Deserialize;
use serde::Serialize;

use crate::types::card::VocabularyCard;

/// Which way round cards are asked.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CardType {
    #[default]
    ChineseEnglish,
    EnglishChinese,
    /// Pick a direction per presentation.
    Both,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    ChineseToEnglish,
    EnglishToChinese,
}

impl Direction {
    /// Choose the direction for one presentation of a card. For
    /// `CardType::Both` the choice is a hash of the word and the presentation
    /// index, so it varies between presentations but is reproducible.
    pub fn choose(card_type: CardType, card: &VocabularyCard, presentation: u64) -> Direction {
        match card_type {
            CardType::ChineseEnglish => Direction::ChineseToEnglish,
            CardType::EnglishChinese => Direction::EnglishToChinese,
            CardType::Both => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(card.chinese.as_bytes());
                hasher.update(&presentation.to_le_bytes());
                if hasher.finalize().as_bytes()[0] & 1 == 0 {
                    Direction::ChineseToEnglish
                } else {
                    Direction::EnglishToChinese
                }
            }
        }
    }
}

/// The text shown for a card in a given direction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Prompt {
    pub question: String,
    /// Shown alongside the question. Empty when asking for the Chinese.
    pub hint: String,
    pub answer: String,
}

impl Prompt {
    pub fn new(card: &VocabularyCard, direction: Direction) -> Self {
        match direction {
            Direction::ChineseToEnglish => Self {
                question: card.chinese.clone(),
                hint: card.pinyin.clone(),
                answer: card.definition.clone(),
            },
            Direction::EnglishToChinese => Self {
                question: card.definition.clone(),
                hint: String::new(),
                answer: format!("{} ({})", card.chinese, card.pinyin),
            },
        }
    }
}
