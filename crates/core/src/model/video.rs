use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VideoError {
    #[error("video url cannot be empty")]
    EmptyUrl,

    #[error("video url is not an absolute URL: {0}")]
    InvalidUrl(String),
}

/// A single external learning resource attached to a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    url: String,
    title: String,
}

/// Unvalidated video entry as authored in catalog content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoDraft {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

impl VideoDraft {
    #[must_use]
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    /// Validate the draft into a `Video`.
    ///
    /// The URL is stored exactly as authored (trimmed) because it is part of
    /// the persisted progress key.
    ///
    /// # Errors
    ///
    /// Returns `VideoError` if the URL is blank or does not parse.
    pub fn validate(self) -> Result<Video, VideoError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(VideoError::EmptyUrl);
        }
        if Url::parse(url).is_err() {
            return Err(VideoError::InvalidUrl(url.to_owned()));
        }
        Ok(Video {
            url: url.to_owned(),
            title: self.title.trim().to_owned(),
        })
    }
}

impl Video {
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Read-only mapping from topic name to its ordered video list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    topics: HashMap<String, Vec<Video>>,
}

impl Catalog {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from authored drafts.
    ///
    /// Entries with an invalid URL, or repeating a URL already listed for the
    /// same topic, are skipped with a warning; the first occurrence wins.
    #[must_use]
    pub fn from_drafts<I, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, V)>,
        V: IntoIterator<Item = VideoDraft>,
    {
        let mut topics: HashMap<String, Vec<Video>> = HashMap::new();
        for (topic, drafts) in entries {
            let topic = topic.trim().to_owned();
            let videos = topics.entry(topic.clone()).or_default();
            let mut seen: HashSet<String> = videos.iter().map(|v| v.url.clone()).collect();
            for draft in drafts {
                match draft.validate() {
                    Ok(video) if seen.insert(video.url.clone()) => videos.push(video),
                    Ok(video) => {
                        warn!(topic = %topic, url = %video.url, "skipping duplicate catalog video");
                    }
                    Err(err) => {
                        warn!(topic = %topic, error = %err, "skipping invalid catalog video");
                    }
                }
            }
        }
        Self { topics }
    }

    /// Videos for a topic; a topic without an entry has none.
    #[must_use]
    pub fn videos(&self, topic_name: &str) -> &[Video] {
        self.topics.get(topic_name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn total_videos(&self) -> usize {
        self.topics.values().map(Vec::len).sum()
    }
}
