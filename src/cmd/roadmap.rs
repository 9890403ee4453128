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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::progress::LevelProgress;
use crate::progress::LevelStatus;
use crate::progress::mastered_count;
use crate::progress::roadmap;

pub fn print_roadmap(directory: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let mastered = mastered_count(&coll.states()?);
    println!("{mastered} words mastered.");
    for level in roadmap(mastered) {
        println!("{}", format_level(&level));
    }
    Ok(())
}

fn format_level(level: &LevelProgress) -> String {
    let marker = match level.status {
        LevelStatus::Completed => "✓",
        LevelStatus::Active => "▶",
        LevelStatus::Locked => "🔒",
    };
    format!(
        "{marker} HSK {}  {}/{}",
        level.level, level.mastered, level.size
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_level() {
        let levels = roadmap(200);
        assert_eq!(format_level(&levels[0]), "✓ HSK 1  150/150");
        assert_eq!(format_level(&levels[1]), "▶ HSK 2  50/150");
        assert_eq!(format_level(&levels[2]), "🔒 HSK 3  0/300");
    }
}
