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

use std::collections::HashMap;

use crate::types::card::VocabularyCard;

/// Whether the character is a CJK unified ideograph.
pub fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// A piece of an example sentence.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Segment {
    /// Anything that is not a Chinese character: punctuation, Latin text.
    Text(String),
    /// A Chinese word, or a single character when no word matched.
    Word { text: String, known: bool },
}

/// Looks up words from the base and custom decks.
pub struct Dictionary {
    entries: HashMap<String, VocabularyCard>,
    /// Length in characters of the longest entry.
    longest: usize,
}

impl Dictionary {
    /// Build from cards. When a word appears more than once, the first card
    /// wins.
    pub fn new<'a>(cards: impl IntoIterator<Item = &'a VocabularyCard>) -> Self {
        let mut entries: HashMap<String, VocabularyCard> = HashMap::new();
        for card in cards {
            entries
                .entry(card.chinese.clone())
                .or_insert_with(|| card.clone());
        }
        let longest = entries
            .keys()
            .map(|word| word.chars().count())
            .max()
            .unwrap_or(1)
            .max(1);
        Self { entries, longest }
    }

    pub fn lookup(&self, word: &str) -> Option<&VocabularyCard> {
        self.entries.get(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split text into words by greedy longest match.
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let chars: Vec<char> = text.chars().collect();
        let mut segments = Vec::new();
        let mut plain = String::new();
        let mut i = 0;
        while i < chars.len() {
            if !is_cjk(chars[i]) {
                plain.push(chars[i]);
                i += 1;
                continue;
            }
            if !plain.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut plain)));
            }
            let max = self.longest.min(chars.len() - i);
            let matched = (1..=max).rev().find_map(|len| {
                let candidate: String = chars[i..i + len].iter().collect();
                self.entries.contains_key(&candidate).then_some((candidate, len))
            });
            match matched {
                Some((word, len)) => {
                    segments.push(Segment::Word {
                        text: word,
                        known: true,
                    });
                    i += len;
                }
                None => {
                    segments.push(Segment::Word {
                        text: chars[i].to_string(),
                        known: false,
                    });
                    i += 1;
                }
            }
        }
        if !plain.is_empty() {
            segments.push(Segment::Text(plain));
        }
        segments
    }

    /// The known words of a text, in order of first appearance.
    pub fn glossary(&self, text: &str) -> Vec<&VocabularyCard> {
        let mut seen: Vec<&VocabularyCard> = Vec::new();
        for segment in self.segment(text) {
            if let Segment::Word { text, known: true } = segment {
                if let Some(card) = self.lookup(&text) {
                    if !seen.iter().any(|c| c.chinese == card.chinese) {
                        seen.push(card);
                    }
                }
            }
        }
        seen
    }
}
