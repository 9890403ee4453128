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

use serde::Serialize;

use crate::session::SessionSummary;
use crate::types::card_state::CardState;
use crate::types::date::Date;

/// Cumulative vocabulary size for each HSK level.
pub const HSK_VOCABULARY: [(u8, usize); 6] = [
    (1, 150),
    (2, 300),
    (3, 600),
    (4, 1200),
    (5, 2500),
    (6, 5000),
];

/// Long-term learner data, updated at the end of every session.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Rewards accumulated over all sessions.
    pub rewards: u64,
    /// Consecutive days on which the daily goal was met.
    pub streak: u32,
    /// The last day the daily goal was met.
    pub last_goal_date: Option<Date>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelStatus {
    Completed,
    Active,
    Locked,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u8,
    pub status: LevelStatus,
    /// Mastered words counted towards this level.
    pub mastered: usize,
    /// Words introduced at this level.
    pub size: usize,
}

pub fn mastered_count(states: &BTreeMap<String, CardState>) -> usize {
    states.values().filter(|state| state.is_mastered()).count()
}

/// Progress through every HSK level, given the number of mastered words.
/// A level is completed once the cumulative vocabulary up to it is mastered,
/// and accessible once the previous level is completed.
pub fn roadmap(mastered: usize) -> Vec<LevelProgress> {
    let mut previous = 0;
    let mut levels = Vec::with_capacity(HSK_VOCABULARY.len());
    for (level, cumulative) in HSK_VOCABULARY {
        let size = cumulative - previous;
        let status = if mastered >= cumulative {
            LevelStatus::Completed
        } else if mastered >= previous {
            LevelStatus::Active
        } else {
            LevelStatus::Locked
        };
        levels.push(LevelProgress {
            level,
            status,
            mastered: mastered.saturating_sub(previous).min(size),
            size,
        });
        previous = cumulative;
    }
    levels
}

/// The level the learner is working on: the first one not completed.
pub fn current_level(mastered: usize) -> u8 {
    roadmap(mastered)
        .iter()
        .find(|level| level.status != LevelStatus::Completed)
        .map(|level| level.level)
        .unwrap_or(HSK_VOCABULARY[HSK_VOCABULARY.len() - 1].0)
}

/// Fold a finished session into the profile. The streak grows when the daily
/// goal is met on the day after the last time it was met, restarts at one
/// after a gap, and is left alone if the goal was already met today.
pub fn record_session(
    profile: &Profile,
    summary: &SessionSummary,
    daily_goal: usize,
    today: Date,
) -> Profile {
    let mut next = profile.clone();
    next.rewards += u64::from(summary.rewards_earned);
    if summary.cards_reviewed as usize >= daily_goal {
        match profile.last_goal_date {
            Some(last) if last == today => {}
            Some(last) if Some(last) == today.pred() => {
                next.streak += 1;
                next.last_goal_date = Some(today);
            }
            _ => {
                next.streak = 1;
                next.last_goal_date = Some(today);
            }
        }
    }
    next
}

/// A closing message for the session summary screen.
pub fn encouragement(streak: u32, cards_reviewed: u32, daily_goal: usize) -> String {
    if streak >= 7 {
        format!("Amazing! You've maintained a {streak}-day streak! Keep the momentum going!")
    } else if streak >= 3 {
        format!("Great job! {streak} days in a row. You're building a strong habit!")
    } else if cards_reviewed as usize >= daily_goal {
        "Perfect! You've completed your daily goal. Come back tomorrow!".to_string()
    } else {
        "Good progress! Keep reviewing to maintain your streak.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::card_state::MAX_MASTERY;
    use crate::types::timestamp::Timestamp;

    fn date(day: u32) -> Date {
        Date::new(NaiveDate::from_ymd_opt(2025, 6, day).unwrap())
    }

    fn summary(cards_reviewed: u32) -> SessionSummary {
        SessionSummary {
            cards_reviewed,
            rewards_earned: cards_reviewed,
            mastered_this_session: 0,
        }
    }

    #[test]
    fn test_mastered_count() {
        let now = Timestamp::now();
        let mut states = BTreeMap::new();
        states.insert("一".to_string(), CardState::new(now));
        states.insert(
            "二".to_string(),
            CardState {
                mastery_level: MAX_MASTERY,
                ..CardState::new(now)
            },
        );
        assert_eq!(mastered_count(&states), 1);
    }

    #[test]
    fn test_roadmap_beginner() {
        let levels = roadmap(0);
        assert_eq!(levels[0].status, LevelStatus::Active);
        assert_eq!(levels[0].size, 150);
        assert!(levels[1..].iter().all(|l| l.status == LevelStatus::Locked));
        assert_eq!(current_level(0), 1);
    }

    #[test]
    fn test_roadmap_partway() {
        let levels = roadmap(400);
        assert_eq!(levels[0].status, LevelStatus::Completed);
        assert_eq!(levels[1].status, LevelStatus::Completed);
        assert_eq!(levels[2].status, LevelStatus::Active);
        assert_eq!(levels[2].mastered, 100);
        assert_eq!(levels[2].size, 300);
        assert_eq!(levels[3].status, LevelStatus::Locked);
        assert_eq!(levels[3].mastered, 0);
        assert_eq!(current_level(400), 3);
        assert_eq!(current_level(150), 2);
        assert_eq!(current_level(149), 1);
    }

    #[test]
    fn test_everything_mastered() {
        assert!(roadmap(6000).iter().all(|l| l.status == LevelStatus::Completed));
        assert_eq!(current_level(6000), 6);
    }

    #[test]
    fn test_rewards_always_accumulate() {
        let profile = record_session(&Profile::default(), &summary(3), 20, date(1));
        assert_eq!(profile.rewards, 3);
        assert_eq!(profile.streak, 0);
        assert_eq!(profile.last_goal_date, None);
    }

    #[test]
    fn test_streak() {
        let day1 = record_session(&Profile::default(), &summary(20), 20, date(1));
        assert_eq!(day1.streak, 1);
        let again = record_session(&day1, &summary(20), 20, date(1));
        assert_eq!(again.streak, 1);
        assert_eq!(again.rewards, 40);
        let day2 = record_session(&again, &summary(25), 20, date(2));
        assert_eq!(day2.streak, 2);
        assert_eq!(day2.last_goal_date, Some(date(2)));
        let day5 = record_session(&day2, &summary(20), 20, date(5));
        assert_eq!(day5.streak, 1);
    }

    #[test]
    fn test_encouragement() {
        assert!(encouragement(7, 0, 20).contains("7-day streak"));
        assert!(encouragement(3, 0, 20).contains("3 days in a row"));
        assert!(encouragement(0, 20, 20).contains("daily goal"));
        assert!(encouragement(0, 5, 20).starts_with("Good progress"));
    }
}
