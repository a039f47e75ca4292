//! Google Books API client
//!
//! Queries the volumes search endpoint, filters candidates to the working
//! language, ranks them by title/author similarity and maps the best match
//! into the book shape. Network and API failures are surfaced as errors
//! here; the resolver collapses them to "not found".

use crate::db::books::NewBook;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";
const USER_AGENT: &str = concat!("libris/", env!("CARGO_PKG_VERSION"));
const MAX_RESULTS: u32 = 10;
const LANGUAGE: &str = "en";

/// Google Books client errors
#[derive(Debug, Error)]
pub enum BooksApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Volumes search response
#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

/// One candidate volume
#[derive(Debug, Deserialize)]
struct Volume {
    id: String,
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    description: Option<String>,
    language: Option<String>,
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

/// Similarity score between two strings, 0-3 with 3 being exact match
fn string_match_score(candidate: &str, query: &str) -> u32 {
    if candidate.is_empty() || query.is_empty() {
        return 0;
    }

    let candidate = candidate.to_lowercase();
    let query = query.to_lowercase();

    if candidate == query {
        3 // exact match
    } else if candidate.contains(&query) {
        2 // candidate contains query
    } else if query.contains(&candidate) {
        1 // query contains candidate
    } else {
        0 // unrelated
    }
}

/// Best author score across all of a candidate's authors
fn author_match_score(candidate_authors: &[String], query_author: &str) -> u32 {
    let mut best = 0;
    for author in candidate_authors {
        let score = string_match_score(author, query_author);
        if score > best {
            best = score;
        }
        if score == 3 {
            break;
        }
    }
    best
}

/// Combined rank for one candidate: title weighted double over author
fn candidate_score(volume: &Volume, query_title: &str, query_author: &str) -> u32 {
    let title = volume.volume_info.title.as_deref().unwrap_or("");
    let title_score = string_match_score(title, query_title);

    let author_score = if query_author.is_empty() {
        0
    } else {
        let authors = volume.volume_info.authors.as_deref().unwrap_or(&[]);
        author_match_score(authors, query_author)
    };

    title_score * 2 + author_score
}

fn volume_to_book(volume: Volume) -> NewBook {
    let info = volume.volume_info;
    let image_links = info.image_links;

    NewBook {
        external_id: volume.id,
        title: info.title.unwrap_or_default(),
        authors: info.authors.unwrap_or_default(),
        description: info.description.unwrap_or_default(),
        thumbnail: image_links
            .as_ref()
            .and_then(|l| l.thumbnail.clone())
            .unwrap_or_default(),
        small_thumbnail: image_links
            .and_then(|l| l.small_thumbnail)
            .unwrap_or_default(),
    }
}

/// Google Books API client
pub struct GoogleBooksClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GoogleBooksClient {
    pub fn new(timeout: Duration) -> Result<Self, BooksApiError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Client pointed at an alternate endpoint (tests use a local mock)
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, BooksApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| BooksApiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a (title, authors) query to the best-matching volume.
    ///
    /// Returns None when the API yields no usable candidate: zero results,
    /// or nothing left after the language filter.
    pub async fn resolve(
        &self,
        title: &str,
        authors: &[String],
    ) -> Result<Option<NewBook>, BooksApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        // Primary author narrows the search when available
        let primary_author = authors
            .iter()
            .map(|a| a.trim())
            .find(|a| !a.is_empty())
            .unwrap_or("");

        let query = if primary_author.is_empty() {
            format!("intitle:{}", title)
        } else {
            format!("intitle:{} inauthor:{}", title, primary_author)
        };

        let url = format!("{}/volumes", self.base_url);
        tracing::debug!(title = %title, author = %primary_author, "Querying Google Books API");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("orderBy", "relevance"),
                ("printType", "books"),
                ("maxResults", &MAX_RESULTS.to_string()),
                ("langRestrict", LANGUAGE),
            ])
            .send()
            .await
            .map_err(|e| BooksApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(BooksApiError::Api(status.as_u16(), error_text));
        }

        let volumes: VolumesResponse = response
            .json()
            .await
            .map_err(|e| BooksApiError::Parse(e.to_string()))?;

        if volumes.items.is_empty() {
            return Ok(None);
        }

        // Language filter, then rank. Sorting is stable so ties keep the
        // API's relevance ordering.
        let mut candidates: Vec<Volume> = volumes
            .items
            .into_iter()
            .filter(|v| v.volume_info.language.as_deref() == Some(LANGUAGE))
            .collect();

        if candidates.is_empty() {
            return Ok(None);
        }

        candidates.sort_by(|a, b| {
            candidate_score(b, title, primary_author)
                .cmp(&candidate_score(a, title, primary_author))
        });

        let top = candidates.remove(0);
        tracing::info!(
            external_id = %top.id,
            title = %top.volume_info.title.as_deref().unwrap_or("(untitled)"),
            "Resolved book from Google Books"
        );

        Ok(Some(volume_to_book(top)))
    }
}
