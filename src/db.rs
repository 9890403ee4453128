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

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;
use rusqlite::types::Type;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::progress::Profile;
use crate::session::SessionSummary;
use crate::store::StateStore;
use crate::types::card::VocabularyCard;
use crate::types::card_state::CardState;
use crate::types::date::Date;
use crate::types::timestamp::Timestamp;

/// Sessions older than the most recent this many are discarded.
const SESSION_HISTORY: usize = 50;

pub struct Database {
    conn: Connection,
}

/// A finished review session.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    #[serde(flatten)]
    pub summary: SessionSummary,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {database_path}.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// The learner's words, in the order they were added.
    pub fn custom_words(&self) -> Fallible<Vec<VocabularyCard>> {
        let sql = "select chinese, pinyin, definition, example from custom_words order by position;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(VocabularyCard {
                chinese: row.get(0)?,
                pinyin: row.get(1)?,
                definition: row.get(2)?,
                example: row.get(3)?,
            });
        }
        Ok(cards)
    }

    /// Add a word to the custom deck. Returns false if it was already there.
    pub fn insert_custom_word(&mut self, card: &VocabularyCard) -> Fallible<bool> {
        let sql = "insert or ignore into custom_words (chinese, pinyin, definition, example) values (?, ?, ?, ?);";
        let inserted = self.conn.execute(
            sql,
            (&card.chinese, &card.pinyin, &card.definition, &card.example),
        )?;
        Ok(inserted > 0)
    }

    /// Save a finished session, discarding the oldest beyond the history
    /// limit.
    pub fn save_session(
        &mut self,
        started_at: Timestamp,
        ended_at: Timestamp,
        summary: SessionSummary,
    ) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "insert into sessions (started_at, ended_at, cards_reviewed, rewards_earned, mastered_this_session) values (?, ?, ?, ?, ?);",
            (
                started_at,
                ended_at,
                summary.cards_reviewed,
                summary.rewards_earned,
                summary.mastered_this_session,
            ),
        )?;
        tx.execute(
            "delete from sessions where session_id not in (select session_id from sessions order by session_id desc limit ?);",
            [SESSION_HISTORY as i64],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Saved sessions, oldest first.
    pub fn sessions(&self) -> Fallible<Vec<SessionRecord>> {
        let sql = "select started_at, ended_at, cards_reviewed, rewards_earned, mastered_this_session from sessions order by session_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next()? {
            sessions.push(SessionRecord {
                started_at: row.get(0)?,
                ended_at: row.get(1)?,
                summary: SessionSummary {
                    cards_reviewed: row.get(2)?,
                    rewards_earned: row.get(3)?,
                    mastered_this_session: row.get(4)?,
                },
            });
        }
        Ok(sessions)
    }

    pub fn profile(&self) -> Fallible<Profile> {
        let sql = "select rewards, streak, last_goal_date from profile where profile_id = 1;";
        let profile = self
            .conn
            .query_row(sql, [], |row| {
                let last_goal_date: Option<Date> = row.get(2)?;
                Ok(Profile {
                    rewards: from_sql_int(row, 0)?,
                    streak: row.get(1)?,
                    last_goal_date,
                })
            })
            .optional()?;
        Ok(profile.unwrap_or_default())
    }

    pub fn save_profile(&mut self, profile: &Profile) -> Fallible<()> {
        let sql = "insert into profile (profile_id, rewards, streak, last_goal_date) values (1, ?, ?, ?) on conflict (profile_id) do update set rewards = excluded.rewards, streak = excluded.streak, last_goal_date = excluded.last_goal_date;";
        self.conn.execute(
            sql,
            (
                to_sql_int(profile.rewards, "rewards")?,
                profile.streak,
                profile.last_goal_date,
            ),
        )?;
        Ok(())
    }
}

impl StateStore for Database {
    fn get_state(&self, word: &str) -> Fallible<Option<CardState>> {
        let sql = "select interval_minutes, due_at, ease_factor, total_reviews, lapse_count, success_count, mastery_level, last_reviewed_at from card_states where word = ?;";
        let state = self
            .conn
            .query_row(sql, [word], |row| state_from_row(row, 0))
            .optional()?;
        Ok(state)
    }

    fn put_state(&mut self, word: &str, state: &CardState) -> Fallible<()> {
        let sql = "insert into card_states (word, interval_minutes, due_at, ease_factor, total_reviews, lapse_count, success_count, mastery_level, last_reviewed_at) values (?, ?, ?, ?, ?, ?, ?, ?, ?) on conflict (word) do update set interval_minutes = excluded.interval_minutes, due_at = excluded.due_at, ease_factor = excluded.ease_factor, total_reviews = excluded.total_reviews, lapse_count = excluded.lapse_count, success_count = excluded.success_count, mastery_level = excluded.mastery_level, last_reviewed_at = excluded.last_reviewed_at;";
        self.conn.execute(
            sql,
            (
                word,
                to_sql_int(state.interval_minutes, "interval")?,
                state.due_at,
                state.ease_factor,
                state.total_reviews,
                state.lapse_count,
                state.success_count,
                state.mastery_level,
                state.last_reviewed_at,
            ),
        )?;
        Ok(())
    }

    fn list_all_states(&self) -> Fallible<BTreeMap<String, CardState>> {
        let sql = "select word, interval_minutes, due_at, ease_factor, total_reviews, lapse_count, success_count, mastery_level, last_reviewed_at from card_states;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut states = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let word: String = row.get(0)?;
            states.insert(word, state_from_row(row, 1)?);
        }
        Ok(states)
    }
}

/// Read a card state from the row, starting at column `offset`.
fn state_from_row(row: &Row, offset: usize) -> rusqlite::Result<CardState> {
    Ok(CardState {
        interval_minutes: from_sql_int(row, offset)?,
        due_at: row.get(offset + 1)?,
        ease_factor: row.get(offset + 2)?,
        total_reviews: row.get(offset + 3)?,
        lapse_count: row.get(offset + 4)?,
        success_count: row.get(offset + 5)?,
        mastery_level: row.get(offset + 6)?,
        last_reviewed_at: row.get(offset + 7)?,
    })
}

/// SQLite integers are signed.
fn to_sql_int(value: u64, what: &str) -> Fallible<i64> {
    i64::try_from(value)
        .map_err(|_| ErrorReport::new(format!("{what} is too large to store: {value}")))
}

fn from_sql_int(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["card_states"], |row| row.get(0))?;
    Ok(count > 0)
}
