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

use crate::cache::StateCache;
use crate::clock::Clock;
use crate::config::Config;
use crate::deck::build_session_deck;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::ReviewError;
use crate::schedule::apply_rating;
use crate::session::Presentation;
use crate::session::ReviewSession;
use crate::session::SessionProgress;
use crate::session::SessionSummary;
use crate::store::StateStore;
use crate::types::card::VocabularyCard;
use crate::types::card_state::CardState;
use crate::types::rating::Rating;

/// The result of rating a card.
#[derive(Debug)]
pub struct RateOutcome {
    pub word: String,
    pub previous: CardState,
    pub updated: CardState,
    pub progress: SessionProgress,
    /// Set when the new state could not be written to the store. The rating
    /// still counts for the rest of this process; the caller decides whether
    /// to retry or tell the learner.
    pub persistence_warning: Option<ErrorReport>,
}

/// Drives review sessions against a state store.
pub struct Scheduler<S: StateStore, C: Clock> {
    store: S,
    clock: C,
    config: Config,
    cache: StateCache,
}

impl<S: StateStore, C: Clock> Scheduler<S, C> {
    pub fn new(store: S, clock: C, config: Config) -> Self {
        Self {
            store,
            clock,
            config,
            cache: StateCache::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// A word's current state: what this process last computed, else what
    /// the store has.
    pub fn state_of(&self, word: &str) -> Fallible<Option<CardState>> {
        if let Some(state) = self.cache.get(word) {
            return Ok(Some(state.clone()));
        }
        self.store.get_state(word)
    }

    pub fn all_states(&self) -> Fallible<BTreeMap<String, CardState>> {
        Ok(self.cache.overlay(self.store.list_all_states()?))
    }

    pub fn build_session_deck(
        &self,
        base: &[VocabularyCard],
        custom: &[VocabularyCard],
    ) -> Fallible<Vec<VocabularyCard>> {
        let states = self.all_states()?;
        let now = self.clock.now();
        let deck = build_session_deck(
            base,
            custom,
            |word| states.get(word).cloned(),
            now,
            self.config.daily_goal,
        );
        log::debug!(
            "Session deck: {} cards out of {} known states.",
            deck.len(),
            states.len()
        );
        Ok(deck)
    }

    pub fn start_session(&self, deck: Vec<VocabularyCard>) -> ReviewSession {
        ReviewSession::new(
            deck,
            self.config.card_type,
            self.config.requeue_offset,
            self.config.reward_per_card,
            self.clock.now(),
        )
    }

    pub fn present_next(&self, session: &mut ReviewSession) -> Presentation {
        session.present_next()
    }

    /// Rate the presented card: compute its new state, remember it, write it
    /// to the store, and advance the session.
    pub fn rate_card(
        &mut self,
        session: &mut ReviewSession,
        rating: Rating,
    ) -> Result<RateOutcome, ReviewError> {
        let word = match session.current() {
            Some(presented) => presented.card.chinese.clone(),
            None if session.is_finished() => {
                return Err(ReviewError::IllegalState("the session is finished"));
            }
            None => return Err(ReviewError::IllegalState("no card is being presented")),
        };
        let now = self.clock.now();
        let previous = self
            .state_of(&word)
            .map_err(ReviewError::Persistence)?
            .unwrap_or_else(|| CardState::new(now));
        let updated = apply_rating(&previous, rating, now, &self.config.intervals);
        log::debug!(
            "{word} {rating} interval={}m ease={:.2} mastery={} due={}",
            updated.interval_minutes,
            updated.ease_factor,
            updated.mastery_level,
            updated.due_at
        );

        session.record_rating(rating, &previous, &updated)?;
        self.cache.insert(&word, updated.clone());
        let persistence_warning = match self.store.put_state(&word, &updated) {
            Ok(()) => None,
            Err(e) => {
                log::warn!("Failed to save the state of {word}: {e}");
                Some(e)
            }
        };

        Ok(RateOutcome {
            word,
            previous,
            updated,
            progress: session.progress(),
            persistence_warning,
        })
    }

    pub fn session_summary(&self, session: &ReviewSession) -> SessionSummary {
        session.summary()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;
    use crate::types::timestamp::Timestamp;

    fn start() -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap())
    }

    fn card(chinese: &str) -> VocabularyCard {
        VocabularyCard::new(chinese, "", "", "")
    }

    /// A store whose writes always fail.
    #[derive(Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
    }

    impl StateStore for ReadOnlyStore {
        fn get_state(&self, word: &str) -> Fallible<Option<CardState>> {
            self.inner.get_state(word)
        }

        fn put_state(&mut self, _word: &str, _state: &CardState) -> Fallible<()> {
            Err(ErrorReport::new("store is read-only"))
        }

        fn list_all_states(&self) -> Fallible<BTreeMap<String, CardState>> {
            self.inner.list_all_states()
        }
    }

    /// A store whose reads always fail. Counts attempted writes.
    #[derive(Default)]
    struct UnreadableStore {
        writes: usize,
    }

    impl StateStore for UnreadableStore {
        fn get_state(&self, _word: &str) -> Fallible<Option<CardState>> {
            Err(ErrorReport::new("disk unreadable"))
        }

        fn put_state(&mut self, _word: &str, _state: &CardState) -> Fallible<()> {
            self.writes += 1;
            Ok(())
        }

        fn list_all_states(&self) -> Fallible<BTreeMap<String, CardState>> {
            Err(ErrorReport::new("disk unreadable"))
        }
    }

    fn presented_word(session: &mut ReviewSession) -> String {
        match session.present_next() {
            Presentation::Card(presented) => presented.card.chinese,
            Presentation::Finished(_) => panic!("session finished early"),
        }
    }

    #[test]
    fn test_rating_is_persisted() -> Fallible<()> {
        let clock = ManualClock::new(start());
        let mut scheduler = Scheduler::new(MemoryStore::default(), &clock, Config::default());
        let deck = scheduler.build_session_deck(&[card("猫")], &[])?;
        let mut session = scheduler.start_session(deck);
        let outcome = scheduler.rate_card(&mut session, Rating::Good)?;
        assert_eq!(outcome.updated.interval_minutes, 1440);
        assert!(outcome.persistence_warning.is_none());
        assert!(outcome.progress.finished);
        let stored = scheduler.store().get_state("猫")?;
        assert_eq!(stored, Some(outcome.updated));
        Ok(())
    }

    #[test]
    fn test_again_then_good() -> Fallible<()> {
        let clock = ManualClock::new(start());
        let mut scheduler = Scheduler::new(MemoryStore::default(), &clock, Config::default());
        let deck = scheduler.build_session_deck(&[card("一"), card("二")], &[])?;
        let mut session = scheduler.start_session(deck);

        assert_eq!(presented_word(&mut session), "一");
        let outcome = scheduler.rate_card(&mut session, Rating::Again)?;
        assert_eq!(outcome.progress.cards_reviewed, 0);
        assert_eq!(outcome.progress.rewards_earned, 0);
        assert_eq!(outcome.updated.lapse_count, 1);

        clock.advance_minutes(1);
        assert_eq!(presented_word(&mut session), "一");
        let outcome = scheduler.rate_card(&mut session, Rating::Good)?;
        assert_eq!(outcome.previous.lapse_count, 1);
        assert_eq!(outcome.updated.total_reviews, 2);
        assert_eq!(outcome.progress.cards_reviewed, 1);
        assert_eq!(outcome.progress.rewards_earned, 1);

        assert_eq!(presented_word(&mut session), "二");
        scheduler.rate_card(&mut session, Rating::Good)?;
        assert!(session.is_finished());
        let summary = scheduler.session_summary(&session);
        assert_eq!(summary.cards_reviewed, 2);
        Ok(())
    }

    #[test]
    fn test_failed_write_is_a_warning() -> Fallible<()> {
        let clock = ManualClock::new(start());
        let mut scheduler = Scheduler::new(ReadOnlyStore::default(), &clock, Config::default());
        let mut session = scheduler.start_session(vec![card("猫"), card("狗")]);
        let outcome = scheduler.rate_card(&mut session, Rating::Good)?;
        assert!(outcome.persistence_warning.is_some());
        assert_eq!(outcome.progress.cards_reviewed, 1);

        // The rating is still visible to later scheduling.
        let state = scheduler.state_of("猫")?.unwrap();
        assert_eq!(state.total_reviews, 1);
        clock.advance_minutes(2 * 1440);
        let deck = scheduler.build_session_deck(&[card("猫"), card("狗")], &[])?;
        let words: Vec<&str> = deck.iter().map(|c| c.key()).collect();
        assert_eq!(words, vec!["猫"]);
        Ok(())
    }

    #[test]
    fn test_failed_read_is_a_persistence_error() -> Fallible<()> {
        let clock = ManualClock::new(start());
        let mut scheduler = Scheduler::new(UnreadableStore::default(), &clock, Config::default());
        let mut session = scheduler.start_session(vec![card("猫"), card("狗")]);

        let err = scheduler.rate_card(&mut session, Rating::Good).unwrap_err();
        match err {
            ReviewError::Persistence(report) => assert_eq!(report.message(), "disk unreadable"),
            other => panic!("expected a persistence error, got {other:?}"),
        }
        // The same card is still on screen and nothing was counted.
        let current = session.current().map(|presented| presented.card.chinese.as_str());
        assert_eq!(current, Some("猫"));
        assert_eq!(session.summary(), SessionSummary::default());
        // Nothing was cached or written.
        assert!(scheduler.state_of("猫").is_err());
        assert_eq!(scheduler.store().writes, 0);
        Ok(())
    }

    #[test]
    fn test_rate_without_presented_card() -> Fallible<()> {
        let clock = ManualClock::new(start());
        let mut scheduler = Scheduler::new(MemoryStore::default(), &clock, Config::default());
        let mut session = scheduler.start_session(vec![card("一"), card("二")]);
        scheduler.rate_card(&mut session, Rating::Good)?;
        let err = scheduler.rate_card(&mut session, Rating::Good).unwrap_err();
        assert!(matches!(err, ReviewError::IllegalState("no card is being presented")));
        // Nothing was written for the second card.
        assert!(scheduler.store().get_state("二")?.is_none());
        Ok(())
    }

    #[test]
    fn test_empty_session() -> Fallible<()> {
        let clock = ManualClock::new(start());
        let mut scheduler = Scheduler::new(MemoryStore::default(), &clock, Config::default());
        let deck = scheduler.build_session_deck(&[], &[])?;
        assert!(deck.is_empty());
        let mut session = scheduler.start_session(deck);
        match scheduler.present_next(&mut session) {
            Presentation::Finished(summary) => assert_eq!(summary, SessionSummary::default()),
            Presentation::Card(_) => panic!("expected a finished session"),
        }
        let err = scheduler.rate_card(&mut session, Rating::Good).unwrap_err();
        assert!(matches!(err, ReviewError::IllegalState("the session is finished")));
        Ok(())
    }
}
