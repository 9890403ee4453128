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

/// A vocabulary card. The Chinese text is the card's identity within a deck.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct VocabularyCard {
    pub chinese: String,
    #[serde(default)]
    pub pinyin: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example: String,
}

impl VocabularyCard {
    pub fn new(
        chinese: impl Into<String>,
        pinyin: impl Into<String>,
        definition: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            chinese: chinese.into().trim().to_string(),
            pinyin: pinyin.into().trim().to_string(),
            definition: definition.into().trim().to_string(),
            example: example.into().trim().to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.chinese
    }
}
