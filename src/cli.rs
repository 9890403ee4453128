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

use clap::Parser;

use crate::cmd::add::add_word;
use crate::cmd::check::check_collection;
use crate::cmd::drill::drill_collection;
use crate::cmd::export::export_collection;
use crate::cmd::roadmap::print_roadmap;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_collection_stats;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Review the cards due today in the terminal.
    Drill {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Add a word to the custom deck.
    Add {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// The word in Chinese characters.
        #[arg(long)]
        chinese: String,
        #[arg(long)]
        pinyin: String,
        /// The English meaning.
        #[arg(long)]
        definition: String,
        /// An example sentence using the word.
        #[arg(long)]
        example: Option<String>,
    },
    /// Print collection statistics.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Show progress through the HSK levels.
    Roadmap {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Export the collection as JSON.
    Export {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Check that the configuration and decks are valid.
    Check {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill { directory } => drill_collection(directory),
        Command::Add {
            directory,
            chinese,
            pinyin,
            definition,
            example,
        } => add_word(directory, chinese, pinyin, definition, example),
        Command::Stats { directory, format } => print_collection_stats(directory, format),
        Command::Roadmap { directory } => print_roadmap(directory),
        Command::Export { directory } => export_collection(directory),
        Command::Check { directory } => check_collection(directory),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Command::try_parse_from([
            "biteling",
            "add",
            "deck",
            "--chinese",
            "猫",
            "--pinyin",
            "māo",
            "--definition",
            "cat",
        ])
        .unwrap();
        match cli {
            Command::Add {
                directory, example, ..
            } => {
                assert_eq!(directory.as_deref(), Some("deck"));
                assert_eq!(example, None);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_stats_format() {
        let cli = Command::try_parse_from(["biteling", "stats", "--format", "json"]).unwrap();
        match cli {
            Command::Stats { directory, format } => {
                assert_eq!(directory, None);
                assert_eq!(format, StatsFormat::Json);
            }
            _ => panic!("expected stats"),
        }
    }
}
