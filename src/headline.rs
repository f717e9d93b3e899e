//! # Headline Records
//! Immutable input unit of the coverage pipeline.
//!
//! Records are validated when they are built: a headline with an empty title
//! or source is rejected here, so clustering never has to deal with one.

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("headline has an empty title (source: {source_name})")]
    EmptyTitle { source_name: String },
    #[error("headline '{title}' has an empty source")]
    EmptySource { title: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredHeadline")]
pub struct HeadlineRecord {
    pub title: String,
    /// Outlet name, matched exactly against the source registry.
    pub source: String,
    pub published_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl HeadlineRecord {
    /// Validate and normalize a headline. `published_at = None` means "now".
    pub fn new(
        title: &str,
        source: &str,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Self, IngestError> {
        let title = normalize_text(title);
        let source = source.trim().to_string();
        if title.is_empty() {
            return Err(IngestError::EmptyTitle {
                source_name: source,
            });
        }
        if source.is_empty() {
            return Err(IngestError::EmptySource { title });
        }
        Ok(Self {
            title,
            source,
            published_at: published_at.unwrap_or_else(Utc::now),
            url: None,
            description: None,
            content: None,
            image_url: None,
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let d = normalize_text(&description.into());
        self.description = (!d.is_empty()).then_some(d);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// Serialized shape of a record; deserializing goes back through `HeadlineRecord::new`.
#[derive(Deserialize)]
struct StoredHeadline {
    title: String,
    source: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

impl TryFrom<StoredHeadline> for HeadlineRecord {
    type Error = IngestError;

    fn try_from(raw: StoredHeadline) -> Result<Self, Self::Error> {
        let mut rec = HeadlineRecord::new(&raw.title, &raw.source, Some(raw.published_at))?;
        rec.url = raw.url;
        if let Some(d) = raw.description {
            rec = rec.with_description(d);
        }
        rec.content = raw.content;
        rec.image_url = raw.image_url;
        Ok(rec)
    }
}

/// Decode entities, strip markup tags (`<` followed by a letter), collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[A-Za-z][^>]*>").expect("tag regex"));
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    re_ws.replace_all(&out, " ").trim().to_string()
}
