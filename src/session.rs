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

use std::collections::VecDeque;

use serde::Serialize;

use crate::error::ReviewError;
use crate::types::card::VocabularyCard;
use crate::types::card_state::CardState;
use crate::types::direction::CardType;
use crate::types::direction::Direction;
use crate::types::direction::Prompt;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

/// How many other cards a card rated `again` waits behind, at most.
pub const DEFAULT_REQUEUE_OFFSET: usize = 3;

/// Where a presented card came from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Origin {
    Deck,
    Requeue,
}

/// A card on screen, waiting for a rating. Revealing the answer is up to
/// the presentation layer and does not change the session.
#[derive(Clone, PartialEq, Debug)]
pub struct PresentedCard {
    pub card: VocabularyCard,
    pub direction: Direction,
    pub origin: Origin,
}

impl PresentedCard {
    pub fn prompt(&self) -> Prompt {
        Prompt::new(&self.card, self.direction)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub cards_reviewed: u32,
    pub rewards_earned: u32,
    pub mastered_this_session: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    pub cards_reviewed: u32,
    pub rewards_earned: u32,
    pub mastered_this_session: u32,
    /// Deck cards presented so far. Re-presentations are not counted.
    pub position: usize,
    pub deck_len: usize,
    /// Cards waiting to be seen again.
    pub requeued: usize,
    pub finished: bool,
}

impl SessionProgress {
    /// Progress through the session deck, in `[0, 100]`.
    pub fn percent(&self) -> u8 {
        if self.deck_len == 0 {
            return 100;
        }
        ((self.position * 100) / self.deck_len).min(100) as u8
    }
}

pub enum Presentation {
    Card(PresentedCard),
    Finished(SessionSummary),
}

#[derive(Clone, Debug)]
enum Phase {
    /// The previous card was rated and the next one has not been pulled.
    Pending,
    Presenting(PresentedCard),
    Finished,
}

/// One review session. Created by the scheduler, owned by whoever drives
/// the session, and passed back into every call.
pub struct ReviewSession {
    deck: Vec<VocabularyCard>,
    requeue: VecDeque<VocabularyCard>,
    cursor: usize,
    phase: Phase,
    summary: SessionSummary,
    card_type: CardType,
    requeue_offset: usize,
    reward_per_card: u32,
    presentations: u64,
    started_at: Timestamp,
}

impl ReviewSession {
    pub fn new(
        deck: Vec<VocabularyCard>,
        card_type: CardType,
        requeue_offset: usize,
        reward_per_card: u32,
        started_at: Timestamp,
    ) -> Self {
        let mut session = Self {
            deck,
            requeue: VecDeque::new(),
            cursor: 0,
            phase: Phase::Pending,
            summary: SessionSummary::default(),
            card_type,
            requeue_offset,
            reward_per_card,
            presentations: 0,
            started_at,
        };
        session.pull();
        session
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn deck(&self) -> &[VocabularyCard] {
        &self.deck
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// The card being presented, if any.
    pub fn current(&self) -> Option<&PresentedCard> {
        match &self.phase {
            Phase::Presenting(presented) => Some(presented),
            _ => None,
        }
    }

    /// Show the next card. Idempotent while a card is awaiting its rating.
    pub fn present_next(&mut self) -> Presentation {
        if let Phase::Pending = self.phase {
            self.pull();
        }
        match &self.phase {
            Phase::Presenting(presented) => Presentation::Card(presented.clone()),
            _ => Presentation::Finished(self.summary),
        }
    }

    /// Record the rating of the presented card. `previous` and `updated` are
    /// its scheduling state before and after the rating.
    pub fn record_rating(
        &mut self,
        rating: Rating,
        previous: &CardState,
        updated: &CardState,
    ) -> Result<(), ReviewError> {
        let presented = match &self.phase {
            Phase::Presenting(presented) => presented.clone(),
            Phase::Pending => return Err(ReviewError::IllegalState("no card is being presented")),
            Phase::Finished => return Err(ReviewError::IllegalState("the session is finished")),
        };
        if rating == Rating::Again {
            let position = self.requeue_offset.min(self.requeue.len());
            self.requeue.insert(position, presented.card);
        } else {
            self.summary.cards_reviewed += 1;
            self.summary.rewards_earned = self
                .summary
                .rewards_earned
                .saturating_add(self.reward_per_card);
            if !previous.is_mastered() && updated.is_mastered() {
                self.summary.mastered_this_session += 1;
            }
        }
        self.phase = if self.is_exhausted() {
            Phase::Finished
        } else {
            Phase::Pending
        };
        Ok(())
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            cards_reviewed: self.summary.cards_reviewed,
            rewards_earned: self.summary.rewards_earned,
            mastered_this_session: self.summary.mastered_this_session,
            position: self.cursor,
            deck_len: self.deck.len(),
            requeued: self.requeue.len(),
            finished: self.is_finished(),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.requeue.is_empty() && self.cursor >= self.deck.len()
    }

    /// Move the next card on screen: re-queued cards first, then the deck.
    fn pull(&mut self) {
        let next = if let Some(card) = self.requeue.pop_front() {
            Some((card, Origin::Requeue))
        } else if let Some(card) = self.deck.get(self.cursor) {
            self.cursor += 1;
            Some((card.clone(), Origin::Deck))
        } else {
            None
        };
        self.phase = match next {
            Some((card, origin)) => {
                let direction = Direction::choose(self.card_type, &card, self.presentations);
                self.presentations += 1;
                Phase::Presenting(PresentedCard {
                    card,
                    direction,
                    origin,
                })
            }
            None => Phase::Finished,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::card_state::MAX_MASTERY;

    fn card(chinese: &str) -> VocabularyCard {
        VocabularyCard::new(chinese, "", "", "")
    }

    fn session(words: &[&str]) -> ReviewSession {
        let deck = words.iter().map(|w| card(w)).collect();
        ReviewSession::new(
            deck,
            CardType::ChineseEnglish,
            DEFAULT_REQUEUE_OFFSET,
            1,
            Timestamp::now(),
        )
    }

    fn state(mastery_level: u8) -> CardState {
        CardState {
            mastery_level,
            ..CardState::new(Timestamp::now())
        }
    }

    fn current_word(session: &mut ReviewSession) -> String {
        match session.present_next() {
            Presentation::Card(presented) => presented.card.chinese,
            Presentation::Finished(_) => "<finished>".to_string(),
        }
    }

    fn rate(session: &mut ReviewSession, rating: Rating) {
        session.record_rating(rating, &state(0), &state(1)).unwrap();
    }

    #[test]
    fn test_empty_session_is_finished() {
        let mut session = session(&[]);
        assert!(session.is_finished());
        match session.present_next() {
            Presentation::Finished(summary) => assert_eq!(summary, SessionSummary::default()),
            Presentation::Card(_) => panic!("expected a finished session"),
        }
        let err = session
            .record_rating(Rating::Good, &state(0), &state(1))
            .unwrap_err();
        assert!(matches!(err, ReviewError::IllegalState(_)));
    }

    #[test]
    fn test_present_next_is_idempotent() {
        let mut session = session(&["一", "二"]);
        assert_eq!(current_word(&mut session), "一");
        assert_eq!(current_word(&mut session), "一");
        assert_eq!(session.progress().position, 1);
    }

    #[test]
    fn test_rating_without_presented_card() {
        let mut session = session(&["一", "二"]);
        rate(&mut session, Rating::Good);
        let err = session
            .record_rating(Rating::Good, &state(0), &state(1))
            .unwrap_err();
        assert!(matches!(err, ReviewError::IllegalState("no card is being presented")));
    }

    #[test]
    fn test_walk_through_deck() {
        let mut session = session(&["一", "二", "三"]);
        for word in ["一", "二", "三"] {
            assert_eq!(current_word(&mut session), word);
            rate(&mut session, Rating::Good);
        }
        assert!(session.is_finished());
        assert_eq!(session.summary().cards_reviewed, 3);
        assert_eq!(session.summary().rewards_earned, 3);
        let err = session
            .record_rating(Rating::Good, &state(0), &state(1))
            .unwrap_err();
        assert!(matches!(err, ReviewError::IllegalState("the session is finished")));
    }

    #[test]
    fn test_rewards_saturate() {
        let deck = vec![card("一"), card("二"), card("三")];
        let mut session = ReviewSession::new(
            deck,
            CardType::ChineseEnglish,
            DEFAULT_REQUEUE_OFFSET,
            u32::MAX,
            Timestamp::now(),
        );
        for word in ["一", "二", "三"] {
            assert_eq!(current_word(&mut session), word);
            rate(&mut session, Rating::Good);
        }
        assert_eq!(session.summary().cards_reviewed, 3);
        assert_eq!(session.summary().rewards_earned, u32::MAX);
    }

    #[test]
    fn test_again_is_requeued_without_reward() {
        let mut session = session(&["一", "二"]);
        assert_eq!(current_word(&mut session), "一");
        rate(&mut session, Rating::Again);
        assert_eq!(session.summary().cards_reviewed, 0);
        assert_eq!(session.summary().rewards_earned, 0);
        assert!(!session.is_finished());

        // The re-queued card comes back before the rest of the deck.
        match session.present_next() {
            Presentation::Card(presented) => {
                assert_eq!(presented.card.chinese, "一");
                assert_eq!(presented.origin, Origin::Requeue);
            }
            Presentation::Finished(_) => panic!("expected a card"),
        }
        rate(&mut session, Rating::Good);
        assert_eq!(session.summary().cards_reviewed, 1);
        assert_eq!(session.summary().rewards_earned, 1);

        assert_eq!(current_word(&mut session), "二");
        rate(&mut session, Rating::Good);
        assert!(session.is_finished());
    }

    #[test]
    fn test_again_with_empty_buffer_comes_straight_back() {
        let mut session = session(&["a", "b", "c"]);
        assert_eq!(current_word(&mut session), "a");
        rate(&mut session, Rating::Again);
        // The buffer is served before the deck.
        assert_eq!(current_word(&mut session), "a");
        rate(&mut session, Rating::Again);
        assert_eq!(current_word(&mut session), "a");
        rate(&mut session, Rating::Good);
        assert_eq!(session.progress().requeued, 0);

        assert_eq!(current_word(&mut session), "b");
        rate(&mut session, Rating::Again);
        assert_eq!(current_word(&mut session), "b");
        rate(&mut session, Rating::Good);
        assert_eq!(session.progress().position, 2);
    }

    #[test]
    fn test_requeue_inserts_behind_three() {
        let mut session = session(&["x"]);
        session.requeue.extend(["p", "q", "r", "s"].iter().map(|w| card(w)));
        assert_eq!(current_word(&mut session), "x");
        rate(&mut session, Rating::Again);
        let order: Vec<&str> = session.requeue.iter().map(|c| c.key()).collect();
        assert_eq!(order, vec!["p", "q", "r", "x", "s"]);

        let mut session = self::session(&["x"]);
        session.requeue.extend(["p"].iter().map(|w| card(w)));
        rate(&mut session, Rating::Again);
        let order: Vec<&str> = session.requeue.iter().map(|c| c.key()).collect();
        assert_eq!(order, vec!["p", "x"]);
    }

    #[test]
    fn test_mastered_counted_on_transition_only() {
        let mut session = session(&["一", "二"]);
        session
            .record_rating(Rating::Good, &state(MAX_MASTERY - 1), &state(MAX_MASTERY))
            .unwrap();
        assert_eq!(session.summary().mastered_this_session, 1);
        current_word(&mut session);
        session
            .record_rating(Rating::Easy, &state(MAX_MASTERY), &state(MAX_MASTERY))
            .unwrap();
        assert_eq!(session.summary().mastered_this_session, 1);
    }

    #[test]
    fn test_hard_and_easy_earn_rewards() {
        let mut session = session(&["一", "二"]);
        rate(&mut session, Rating::Hard);
        current_word(&mut session);
        rate(&mut session, Rating::Easy);
        assert_eq!(session.summary().rewards_earned, 2);
    }

    #[test]
    fn test_progress_percent() {
        let mut session = session(&["一", "二", "三", "四"]);
        assert_eq!(session.progress().percent(), 25);
        rate(&mut session, Rating::Good);
        current_word(&mut session);
        assert_eq!(session.progress().percent(), 50);
        assert_eq!(self::session(&[]).progress().percent(), 100);
    }
}
