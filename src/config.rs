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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::deck::DEFAULT_DAILY_GOAL;
use crate::error::Fallible;
use crate::error::fail;
use crate::schedule::Intervals;
use crate::session::DEFAULT_REQUEUE_OFFSET;
use crate::types::direction::CardType;

pub const CONFIG_FILE: &str = "biteling.toml";

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Maximum number of cards in a session.
    pub daily_goal: usize,
    /// Reward earned for every card not rated `again`.
    pub reward_per_card: u32,
    /// How many re-queued cards a lapsed card waits behind, at most.
    pub requeue_offset: usize,
    pub card_type: CardType,
    pub intervals: Intervals,
    /// A TOML deck to use instead of the bundled one. Relative paths are
    /// resolved against the collection directory.
    pub base_deck: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daily_goal: DEFAULT_DAILY_GOAL,
            reward_per_card: 1,
            requeue_offset: DEFAULT_REQUEUE_OFFSET,
            card_type: CardType::default(),
            intervals: Intervals::default(),
            base_deck: None,
        }
    }
}

impl Config {
    pub fn parse(source: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `biteling.toml` from the directory, or use the defaults if there
    /// is none.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE}, using defaults.");
            return Ok(Self::default());
        }
        let mut config = Self::parse(&read_to_string(&path)?)?;
        if let Some(deck) = &config.base_deck {
            if deck.is_relative() {
                config.base_deck = Some(directory.join(deck));
            }
        }
        Ok(config)
    }

    fn validate(&self) -> Fallible<()> {
        if self.daily_goal == 0 {
            return fail("daily_goal must be at least 1.");
        }
        if self.intervals.good == 0 || self.intervals.easy == 0 {
            return fail("the good and easy intervals must be at least one minute.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() -> Fallible<()> {
        assert_eq!(Config::parse("")?, Config::default());
        Ok(())
    }

    #[test]
    fn test_parse() -> Fallible<()> {
        let source = r#"
daily_goal = 10
card_type = "both"

[intervals]
good = 720
"#;
        let config = Config::parse(source)?;
        assert_eq!(config.daily_goal, 10);
        assert_eq!(config.card_type, CardType::Both);
        assert_eq!(config.intervals.good, 720);
        assert_eq!(config.intervals.again, 1);
        assert_eq!(config.requeue_offset, 3);
        Ok(())
    }

    #[test]
    fn test_invalid() {
        assert!(Config::parse("daily_goal = 0").is_err());
        assert!(Config::parse("card_type = \"sideways\"").is_err());
        assert!(Config::parse("colour = \"red\"").is_err());
        assert!(Config::parse("[intervals]\ngood = 0").is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        assert_eq!(Config::load(dir.path())?, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_resolves_deck_path() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(CONFIG_FILE), "base_deck = \"words.toml\"\n")?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.base_deck, Some(dir.path().join("words.toml")));
        Ok(())
    }
}
