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
use std::env::current_dir;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::db::Database;
use crate::deck::bundled_deck;
use crate::deck::load_deck;
use crate::deck::merge_decks;
use crate::dictionary::Dictionary;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::ContentSource;
use crate::store::StateStore;
use crate::types::card::VocabularyCard;
use crate::types::card_state::CardState;

pub const DATABASE_FILE: &str = "biteling.db";

/// A learner's collection: a directory holding the configuration and the
/// database.
pub struct Collection {
    pub directory: PathBuf,
    pub config: Config,
    pub db: Database,
    pub base_deck: Vec<VocabularyCard>,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?;

        let db_path: PathBuf = directory.join(DATABASE_FILE);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let db: Database = Database::new(db_path)?;

        let base_deck = {
            log::debug!("Loading deck...");
            let start = Instant::now();
            let cards = match &config.base_deck {
                Some(path) => load_deck(path)?,
                None => bundled_deck()?,
            };
            let duration = start.elapsed().as_millis();
            log::debug!("Deck of {} cards loaded in {duration}ms.", cards.len());
            cards
        };

        Ok(Self {
            directory,
            config,
            db,
            base_deck,
        })
    }

    /// Every distinct card, base deck first.
    pub fn all_cards(&self) -> Fallible<Vec<VocabularyCard>> {
        Ok(merge_decks(&self.base_deck, &self.db.custom_words()?))
    }

    pub fn dictionary(&self) -> Fallible<Dictionary> {
        Ok(Dictionary::new(&self.all_cards()?))
    }

    pub fn states(&self) -> Fallible<BTreeMap<String, CardState>> {
        self.db.list_all_states()
    }
}

impl ContentSource for Collection {
    fn base_deck(&self) -> Fallible<Vec<VocabularyCard>> {
        Ok(self.base_deck.clone())
    }

    fn custom_deck(&self) -> Fallible<Vec<VocabularyCard>> {
        self.db.custom_words()
    }

    fn add_word(&mut self, card: VocabularyCard) -> Fallible<bool> {
        if card.chinese.is_empty() {
            return fail("a word needs its Chinese text.");
        }
        self.db.insert_custom_word(&card)
    }
}
