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

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::collection::Collection;
use crate::dictionary::Dictionary;
use crate::error::Fallible;
use crate::progress::current_level;
use crate::progress::encouragement;
use crate::progress::mastered_count;
use crate::progress::record_session;
use crate::schedule::preview;
use crate::scheduler::Scheduler;
use crate::session::Presentation;
use crate::session::ReviewSession;
use crate::session::SessionSummary;
use crate::store::ContentSource;
use crate::store::StateStore;
use crate::types::card_state::CardState;
use crate::types::card_state::MAX_MASTERY;
use crate::types::rating::Rating;

pub fn drill_collection(directory: Option<String>) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let mut input = stdin().lock();
    let mut output = stdout().lock();
    run_drill(&mut coll, &SystemClock, &mut input, &mut output)?;
    Ok(())
}

/// Run one review session over the given input and output. Returns the
/// summary if the session was completed, or `None` if there was nothing to
/// review or the learner quit.
pub fn run_drill<C: Clock, R: BufRead, W: Write>(
    coll: &mut Collection,
    clock: &C,
    input: &mut R,
    output: &mut W,
) -> Fallible<Option<SessionSummary>> {
    let base = coll.base_deck()?;
    let custom = coll.custom_deck()?;
    let dictionary = Dictionary::new(base.iter().chain(custom.iter()));
    let config = coll.config.clone();

    let session = {
        let mut scheduler = Scheduler::new(&mut coll.db, clock, config.clone());
        let deck = scheduler.build_session_deck(&base, &custom)?;
        if deck.is_empty() {
            writeln!(
                output,
                "No cards due for review! Come back later or add more words."
            )?;
            return Ok(None);
        }
        writeln!(output, "{} cards to review.", deck.len())?;
        let mut session = scheduler.start_session(deck);
        if !review(&mut scheduler, &mut session, &dictionary, input, output)? {
            writeln!(output, "Session abandoned. Ratings so far are saved.")?;
            return Ok(None);
        }
        session
    };

    let summary = session.summary();
    let ended_at = clock.now();
    log::debug!("Session completed");
    coll.db.save_session(session.started_at(), ended_at, summary)?;
    let profile = record_session(
        &coll.db.profile()?,
        &summary,
        config.daily_goal,
        ended_at.local_date(),
    );
    coll.db.save_profile(&profile)?;
    let mastered = mastered_count(&coll.states()?);

    writeln!(output)?;
    writeln!(output, "Session Completed")?;
    writeln!(output, "Cards reviewed: {}", summary.cards_reviewed)?;
    writeln!(output, "Rewards earned: {}", summary.rewards_earned)?;
    writeln!(output, "Mastered this session: {}", summary.mastered_this_session)?;
    writeln!(output, "Streak: {} days", profile.streak)?;
    writeln!(output, "Level: HSK {}", current_level(mastered))?;
    writeln!(
        output,
        "{}",
        encouragement(profile.streak, summary.cards_reviewed, config.daily_goal)
    )?;
    Ok(Some(summary))
}

/// Present cards until the session finishes. Returns false if the learner
/// quit early.
fn review<S: StateStore, C: Clock, R: BufRead, W: Write>(
    scheduler: &mut Scheduler<S, C>,
    session: &mut ReviewSession,
    dictionary: &Dictionary,
    input: &mut R,
    output: &mut W,
) -> Fallible<bool> {
    loop {
        let presented = match scheduler.present_next(session) {
            Presentation::Card(presented) => presented,
            Presentation::Finished(_) => return Ok(true),
        };
        let card = &presented.card;
        let prompt = presented.prompt();
        let state = match scheduler.state_of(&card.chinese)? {
            Some(state) => state,
            None => CardState::new(session.started_at()),
        };
        let progress = session.progress();

        writeln!(output)?;
        writeln!(
            output,
            "[{}/{}] {}  {}",
            progress.position,
            progress.deck_len,
            mastery_dots(state.mastery_level),
            prompt.question
        )?;
        if !prompt.hint.is_empty() {
            writeln!(output, "{}", prompt.hint)?;
        }
        writeln!(output, "[press enter to reveal, q to quit]")?;
        match read_line(input)? {
            Some(line) if line != "q" => {}
            _ => return Ok(false),
        }

        writeln!(output, "=> {}", prompt.answer)?;
        if !card.example.is_empty() {
            writeln!(output, "{}", card.example)?;
            for entry in dictionary.glossary(&card.example) {
                if entry.chinese != card.chinese {
                    writeln!(
                        output,
                        "  {} ({}): {}",
                        entry.chinese, entry.pinyin, entry.definition
                    )?;
                }
            }
        }
        let labels: Vec<String> = preview(&state, &scheduler.config().intervals)
            .into_iter()
            .map(|(rating, label)| format!("{} {rating} ({label})", rating.key()))
            .collect();
        writeln!(output, "{}", labels.join("  "))?;

        let rating = loop {
            let line = match read_line(input)? {
                Some(line) if line != "q" => line,
                _ => return Ok(false),
            };
            match line.parse::<Rating>() {
                Ok(rating) => break rating,
                Err(e) => writeln!(output, "{e}")?,
            }
        };
        let outcome = scheduler.rate_card(session, rating)?;
        if let Some(warning) = outcome.persistence_warning {
            writeln!(
                output,
                "warning: progress for {} was not saved: {warning}",
                outcome.word
            )?;
        }
    }
}

fn mastery_dots(level: u8) -> String {
    let filled = level.min(MAX_MASTERY) as usize;
    let empty = MAX_MASTERY as usize - filled;
    format!("{}{}", "●".repeat(filled), "○".repeat(empty))
}

/// Read a trimmed line, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
