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

use tempfile::TempDir;
use tempfile::tempdir;

use crate::error::Fallible;

/// An empty collection directory, removed when the handle is dropped.
pub fn create_tmp_collection() -> Fallible<TempDir> {
    let dir = tempdir()?;
    Ok(dir)
}

/// A collection directory with a `biteling.toml`.
pub fn create_tmp_collection_with_config(config: &str) -> Fallible<TempDir> {
    let dir = create_tmp_collection()?;
    std::fs::write(dir.path().join(crate::config::CONFIG_FILE), config)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_collection_with_config() -> Fallible<()> {
        let dir = create_tmp_collection_with_config("daily_goal = 5\n")?;
        assert!(dir.path().join("biteling.toml").exists());
        Ok(())
    }
}
