use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;

use super::{Difficulty, PassageText};

static PASSAGE_DIR: Dir = include_dir!("src/passages");

#[derive(Debug, Clone, Deserialize)]
struct RawPassage {
    text: String,
    author: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// The embedded corpus the provider falls back to whenever the remote
/// service is unavailable or disabled.
#[derive(Debug)]
pub struct BuiltinPassages {
    entries: Vec<PassageText>,
}

impl BuiltinPassages {
    pub fn load() -> Self {
        let file = PASSAGE_DIR
            .get_file("passages.json")
            .expect("Passage corpus not found");

        let raw: Vec<RawPassage> = serde_json::from_str(
            file.contents_utf8()
                .expect("Unable to interpret corpus as a string"),
        )
        .expect("Unable to deserialize passage corpus");

        let entries = raw
            .into_iter()
            .map(|p| {
                let length = p.text.chars().count();
                PassageText {
                    difficulty: Difficulty::from_length(length),
                    text: p.text,
                    author: p.author,
                    length,
                    tags: p.tags,
                }
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Random passage, preferring the requested difficulty band. Falls back
    /// to the whole corpus when no entry matches, so a pick always succeeds.
    pub fn pick(&self, difficulty: Option<Difficulty>) -> PassageText {
        let rng = &mut rand::thread_rng();

        let matching: Vec<&PassageText> = match difficulty {
            Some(wanted) => self
                .entries
                .iter()
                .filter(|p| p.difficulty == wanted)
                .collect(),
            None => self.entries.iter().collect(),
        };

        let pool = if matching.is_empty() {
            self.entries.iter().collect()
        } else {
            matching
        };

        (*pool
            .choose(rng)
            .expect("Passage corpus must not be empty"))
        .clone()
    }
}
