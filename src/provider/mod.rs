pub mod cache;
pub mod fallback;
#[cfg(feature = "network")]
pub mod quotable;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use self::cache::ProviderCache;
use self::fallback::BuiltinPassages;
#[cfg(feature = "network")]
use self::quotable::QuotableClient;

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    strum_macros::Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Length buckets used both for classifying builtin passages and for
    /// labeling remote quotes fetched without an explicit difficulty.
    pub fn from_length(length: usize) -> Self {
        if length <= 80 {
            Difficulty::Easy
        } else if length <= 150 {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }
}

/// a finished passage ready to be typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageText {
    pub text: String,
    pub author: String,
    pub length: usize,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
}

/// Supplies passages to the session engine. Infallible by contract: any
/// acquisition failure must resolve to a locally available passage, never
/// an error.
pub trait PassageProvider {
    fn fetch_passage(&mut self, difficulty: Option<Difficulty>) -> PassageText;
}

/// Production provider: TTL cache in front of the remote quote service,
/// with the embedded corpus as the always-available floor.
#[derive(Debug)]
pub struct TextProvider {
    cache: ProviderCache,
    builtin: BuiltinPassages,
    #[cfg(feature = "network")]
    remote: Option<QuotableClient>,
}

impl TextProvider {
    pub fn new(offline: bool) -> Self {
        Self::with_cache(offline, ProviderCache::default())
    }

    /// The cache is injected so its TTL/size policy stays a caller decision.
    pub fn with_cache(offline: bool, cache: ProviderCache) -> Self {
        #[cfg(not(feature = "network"))]
        let _ = offline;
        Self {
            cache,
            builtin: BuiltinPassages::load(),
            #[cfg(feature = "network")]
            remote: if offline { None } else { QuotableClient::new() },
        }
    }
}

impl PassageProvider for TextProvider {
    fn fetch_passage(&mut self, difficulty: Option<Difficulty>) -> PassageText {
        let key = cache_key(difficulty);
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }

        #[cfg(feature = "network")]
        if let Some(client) = &self.remote {
            if let Ok(passage) = client.fetch(difficulty) {
                self.cache.insert(key, passage.clone());
                return passage;
            }
            // remote failure falls through to the builtin corpus
        }

        self.builtin.pick(difficulty)
    }
}

fn cache_key(difficulty: Option<Difficulty>) -> String {
    match difficulty {
        Some(d) => d.to_string().to_lowercase(),
        None => "any".to_string(),
    }
}
