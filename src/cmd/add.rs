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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::store::ContentSource;
use crate::types::card::VocabularyCard;

pub fn add_word(
    directory: Option<String>,
    chinese: String,
    pinyin: String,
    definition: String,
    example: Option<String>,
) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let card = VocabularyCard::new(chinese, pinyin, definition, example.unwrap_or_default());
    let key = card.key().to_string();
    if coll.add_word(card)? {
        println!("Added {key}.");
    } else {
        println!("{key} is already in your custom words.");
    }
    Ok(())
}
