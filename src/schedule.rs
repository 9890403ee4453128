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

use crate::types::card_state::CardState;
use crate::types::card_state::MAX_MASTERY;
use crate::types::card_state::MIN_EASE;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

/// Ease lost on an `again` rating.
const AGAIN_EASE_PENALTY: f64 = 0.2;

/// Ease lost on a `hard` rating.
const HARD_EASE_PENALTY: f64 = 0.15;

/// Ease gained on an `easy` rating.
const EASY_EASE_BONUS: f64 = 0.15;

/// Interval growth on a `hard` rating.
const HARD_MULTIPLIER: f64 = 1.2;

/// Extra interval growth on an `easy` rating, on top of the ease factor.
const EASY_MULTIPLIER: f64 = 1.3;

/// Base intervals, in minutes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Intervals {
    /// The interval after a lapse.
    pub again: u64,
    /// The minimum interval after a `hard` rating.
    pub hard: u64,
    /// The first interval after a `good` rating.
    pub good: u64,
    /// The first interval after an `easy` rating.
    pub easy: u64,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            again: 1,
            hard: 10,
            good: 1440,
            easy: 4320,
        }
    }
}

fn scale(minutes: u64, factor: f64) -> u64 {
    // Float to int casts saturate, so this cannot wrap.
    (minutes as f64 * factor).round() as u64
}

/// The interval a card would get if rated now.
pub fn next_interval(state: &CardState, rating: Rating, intervals: &Intervals) -> u64 {
    let interval = state.interval_minutes;
    match rating {
        Rating::Again => intervals.again,
        Rating::Hard => intervals.hard.max(scale(interval, HARD_MULTIPLIER)),
        Rating::Good => {
            if interval == 0 {
                intervals.good
            } else {
                scale(interval, state.ease_factor)
            }
        }
        Rating::Easy => {
            if interval == 0 {
                intervals.easy
            } else {
                scale(interval, state.ease_factor * EASY_MULTIPLIER)
            }
        }
    }
}

/// Apply a rating to a card's state, returning the new state.
pub fn apply_rating(
    state: &CardState,
    rating: Rating,
    now: Timestamp,
    intervals: &Intervals,
) -> CardState {
    let interval_minutes = next_interval(state, rating, intervals);
    let mut next = state.clone();
    match rating {
        Rating::Again => {
            next.ease_factor = (state.ease_factor - AGAIN_EASE_PENALTY).max(MIN_EASE);
            next.lapse_count += 1;
            next.mastery_level = state.mastery_level.saturating_sub(1);
        }
        Rating::Hard => {
            next.ease_factor = (state.ease_factor - HARD_EASE_PENALTY).max(MIN_EASE);
        }
        Rating::Good => {
            next.ease_factor = state.ease_factor.max(MIN_EASE);
            next.success_count += 1;
            next.mastery_level = state.mastery_level.saturating_add(1).min(MAX_MASTERY);
        }
        Rating::Easy => {
            next.ease_factor = (state.ease_factor + EASY_EASE_BONUS).max(MIN_EASE);
            next.success_count += 1;
            next.mastery_level = state.mastery_level.saturating_add(1).min(MAX_MASTERY);
        }
    }
    next.interval_minutes = interval_minutes;
    next.total_reviews += 1;
    next.last_reviewed_at = Some(now);
    next.due_at = now.plus_minutes(interval_minutes);
    next
}

/// A short human label for an interval, as shown on rating buttons.
pub fn format_interval(minutes: u64) -> String {
    if minutes == 0 {
        "<1m".to_string()
    } else if minutes < 60 {
        format!("{minutes}m")
    } else if minutes < 1440 {
        format!("{}h", (minutes as f64 / 60.0).round() as u64)
    } else {
        format!("{}d", (minutes as f64 / 1440.0).round() as u64)
    }
}

/// Button labels for every rating of a card, in rating order.
pub fn preview(state: &CardState, intervals: &Intervals) -> Vec<(Rating, String)> {
    Rating::ALL
        .iter()
        .map(|rating| {
            let minutes = next_interval(state, *rating, intervals);
            (*rating, format_interval(minutes))
        })
        .collect()
}
