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

use crate::types::timestamp::Timestamp;

/// The ease factor of a card that has never been rated.
pub const INITIAL_EASE: f64 = 2.5;

/// The ease factor never drops below this.
pub const MIN_EASE: f64 = 1.3;

/// The mastery level at which a word counts as mastered.
pub const MAX_MASTERY: u8 = 4;

/// Scheduling information for a single word.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    /// Minutes between the last review and the due time. Zero means the card
    /// has never been successfully reviewed.
    pub interval_minutes: u64,
    /// When the card becomes eligible for review.
    pub due_at: Timestamp,
    /// Multiplier applied to the interval on a successful review.
    pub ease_factor: f64,
    /// Number of ratings of any kind.
    pub total_reviews: u32,
    /// Number of `again` ratings.
    pub lapse_count: u32,
    /// Number of `good` and `easy` ratings.
    pub success_count: u32,
    /// In `[0, 4]`.
    pub mastery_level: u8,
    pub last_reviewed_at: Option<Timestamp>,
}

impl CardState {
    /// The state of a word that has never been rated.
    pub fn new(now: Timestamp) -> Self {
        Self {
            interval_minutes: 0,
            due_at: now,
            ease_factor: INITIAL_EASE,
            total_reviews: 0,
            lapse_count: 0,
            success_count: 0,
            mastery_level: 0,
            last_reviewed_at: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.total_reviews == 0
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        !self.is_new() && self.due_at <= now
    }

    pub fn is_mastered(&self) -> bool {
        self.mastery_level >= MAX_MASTERY
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn ts(minute: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap())
    }

    #[test]
    fn test_new_state_is_not_due() {
        let state = CardState::new(ts(0));
        assert!(state.is_new());
        assert!(!state.is_due(ts(30)));
        assert_eq!(state.ease_factor, INITIAL_EASE);
    }

    #[test]
    fn test_due() {
        let state = CardState {
            total_reviews: 1,
            due_at: ts(10),
            ..CardState::new(ts(0))
        };
        assert!(!state.is_due(ts(9)));
        assert!(state.is_due(ts(10)));
        assert!(state.is_due(ts(11)));
    }

    #[test]
    fn test_json_roundtrip() {
        let state = CardState {
            interval_minutes: 3600,
            due_at: ts(42),
            ease_factor: 2.35,
            total_reviews: 7,
            lapse_count: 2,
            success_count: 4,
            mastery_level: 3,
            last_reviewed_at: Some(ts(1)),
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"intervalMinutes\":3600"));
        let back: CardState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
