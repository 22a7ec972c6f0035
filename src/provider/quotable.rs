use serde::Deserialize;
use std::time::Duration;

use super::{Difficulty, PassageText};

const BASE_URL: &str = "https://api.quotable.io";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    content: String,
    author: String,
    length: usize,
    #[serde(default)]
    tags: Vec<String>,
}

/// Blocking client for the quotable random-quote endpoint. Errors are the
/// caller's cue to fall back to the builtin corpus, never to surface.
#[derive(Debug)]
pub struct QuotableClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl QuotableClient {
    pub fn new() -> Option<Self> {
        Self::with_base_url(BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Option<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .ok()?;
        Some(Self { http, base_url })
    }

    pub fn fetch(&self, difficulty: Option<Difficulty>) -> Result<PassageText, reqwest::Error> {
        let (min_length, max_length, tags) = difficulty_params(difficulty);

        let mut request = self.http.get(format!("{}/random", self.base_url)).query(&[
            ("minLength", min_length.to_string()),
            ("maxLength", max_length.to_string()),
        ]);
        if let Some(tags) = tags {
            request = request.query(&[("tags", tags)]);
        }

        let quote: QuoteResponse = request.send()?.error_for_status()?.json()?;

        let text = format!("{} - {}", quote.content, quote.author);
        Ok(PassageText {
            length: text.chars().count(),
            text,
            author: quote.author,
            difficulty: difficulty.unwrap_or_else(|| Difficulty::from_length(quote.length)),
            tags: quote.tags,
        })
    }
}

/// Query parameters per difficulty band: quote length bounds plus topic
/// tags that skew toward simpler or denser prose.
fn difficulty_params(difficulty: Option<Difficulty>) -> (usize, usize, Option<&'static str>) {
    match difficulty {
        Some(Difficulty::Easy) => (30, 80, Some("inspirational|motivational")),
        Some(Difficulty::Medium) => (80, 150, Some("wisdom|famous-quotes")),
        Some(Difficulty::Hard) => (150, 300, Some("literature|philosophy")),
        None => (60, 180, None),
    }
}
