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

use serde::Serialize;

use crate::collection::Collection;
use crate::db::SessionRecord;
use crate::error::Fallible;
use crate::progress::Profile;
use crate::store::ContentSource;
use crate::types::card::VocabularyCard;
use crate::types::card_state::CardState;

pub fn export_collection(directory: Option<String>) -> Fallible<()> {
    let coll: Collection = Collection::new(directory)?;
    let export: Export = get_export(&coll)?;
    let json: String = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    cards: Vec<CardExport>,
    custom_words: Vec<VocabularyCard>,
    sessions: Vec<SessionRecord>,
    profile: Profile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardExport {
    chinese: String,
    pinyin: String,
    definition: String,
    state: Option<CardState>,
}

fn get_export(coll: &Collection) -> Fallible<Export> {
    let states = coll.states()?;
    let cards: Vec<CardExport> = coll
        .all_cards()?
        .into_iter()
        .map(|card| CardExport {
            state: states.get(card.key()).cloned(),
            chinese: card.chinese,
            pinyin: card.pinyin,
            definition: card.definition,
        })
        .collect();
    Ok(Export {
        cards,
        custom_words: coll.custom_deck()?,
        sessions: coll.db.sessions()?,
        profile: coll.db.profile()?,
    })
}
