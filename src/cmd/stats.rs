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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::progress::current_level;
use crate::progress::mastered_count;
use crate::store::ContentSource;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_collection_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let stats = get_stats(&coll, Timestamp::now())?;
    match format {
        StatsFormat::Text => {
            println!("Words:          {}", stats.word_count);
            println!("  new:          {}", stats.new_count);
            println!("  learning:     {}", stats.learning_count);
            println!("  mastered:     {}", stats.mastered_count);
            println!("Due now:        {}", stats.due_count);
            println!("Custom words:   {}", stats.custom_word_count);
            println!("Sessions:       {}", stats.session_count);
            println!("Rewards:        {}", stats.rewards);
            println!("Streak:         {} days", stats.streak);
            println!("Level:          HSK {}", stats.level);
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{stats_json}");
        }
    }
    Ok(())
}

#[derive(Serialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    word_count: usize,
    new_count: usize,
    learning_count: usize,
    mastered_count: usize,
    due_count: usize,
    custom_word_count: usize,
    session_count: usize,
    rewards: u64,
    streak: u32,
    level: u8,
}

fn get_stats(coll: &Collection, now: Timestamp) -> Fallible<Stats> {
    let cards = coll.all_cards()?;
    let states = coll.states()?;
    let mut new_count = 0;
    let mut learning_count = 0;
    let mut due_count = 0;
    for card in cards.iter() {
        match states.get(card.key()) {
            Some(state) if !state.is_new() => {
                if !state.is_mastered() {
                    learning_count += 1;
                }
                if state.is_due(now) {
                    due_count += 1;
                }
            }
            _ => new_count += 1,
        }
    }
    let mastered = mastered_count(&states);
    let profile = coll.db.profile()?;
    Ok(Stats {
        word_count: cards.len(),
        new_count,
        learning_count,
        mastered_count: mastered,
        due_count,
        custom_word_count: coll.custom_deck()?.len(),
        session_count: coll.db.sessions()?.len(),
        rewards: profile.rewards,
        streak: profile.streak,
        level: current_level(mastered),
    })
}
