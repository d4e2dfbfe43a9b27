use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::video::Video;

const SEPARATOR: char = '_';
const ESCAPE: char = '\\';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressKeyError {
    #[error("progress key has no topic/url separator: {0:?}")]
    MissingSeparator(String),

    #[error("progress key ends inside an escape sequence: {0:?}")]
    DanglingEscape(String),
}

/// Identifies one video of one topic in the progress record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgressKey {
    topic: String,
    video_url: String,
}

impl ProgressKey {
    #[must_use]
    pub fn new(topic: impl Into<String>, video_url: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            video_url: video_url.into(),
        }
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    /// Persisted string form: the topic with `\` and `_` escaped, a `_`, then
    /// the URL verbatim.
    ///
    /// Topics free of `_` and `\` encode as plain `topic_url`.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.topic.len() + self.video_url.len() + 1);
        for ch in self.topic.chars() {
            if ch == SEPARATOR || ch == ESCAPE {
                out.push(ESCAPE);
            }
            out.push(ch);
        }
        out.push(SEPARATOR);
        out.push_str(&self.video_url);
        out
    }

    /// Parse the persisted string form, splitting at the first unescaped `_`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressKeyError` when no separator is present or the topic
    /// part ends with a lone escape character.
    pub fn decode(raw: &str) -> Result<Self, ProgressKeyError> {
        let mut topic = String::new();
        let mut chars = raw.char_indices();
        while let Some((idx, ch)) = chars.next() {
            match ch {
                ESCAPE => match chars.next() {
                    Some((_, escaped)) => topic.push(escaped),
                    None => return Err(ProgressKeyError::DanglingEscape(raw.to_owned())),
                },
                SEPARATOR => {
                    let url = &raw[idx + SEPARATOR.len_utf8()..];
                    return Ok(Self::new(topic, url));
                }
                other => topic.push(other),
            }
        }
        Err(ProgressKeyError::MissingSeparator(raw.to_owned()))
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Per-video completion state; the only durable progress data.
///
/// A missing key means "not completed". Mutation goes through
/// [`ProgressRecord::with_completion`], which returns a new record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, bool>", from = "BTreeMap<String, bool>")]
pub struct ProgressRecord {
    entries: BTreeMap<ProgressKey, bool>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn get(&self, key: &ProgressKey) -> Option<bool> {
        self.entries.get(key).copied()
    }

    #[must_use]
    pub fn is_completed(&self, topic: &str, video_url: &str) -> bool {
        self.get(&ProgressKey::new(topic, video_url))
            .unwrap_or(false)
    }

    /// Returns a copy of this record with a single key set.
    #[must_use]
    pub fn with_completion(&self, topic: &str, video_url: &str, completed: bool) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(ProgressKey::new(topic, video_url), completed);
        Self { entries }
    }

    /// Number of `videos` marked complete under `topic`.
    #[must_use]
    pub fn completed_count(&self, topic: &str, videos: &[Video]) -> usize {
        videos
            .iter()
            .filter(|video| self.is_completed(topic, video.url()))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProgressKey, bool)> {
        self.entries.iter().map(|(key, done)| (key, *done))
    }
}

impl FromIterator<(ProgressKey, bool)> for ProgressRecord {
    fn from_iter<T: IntoIterator<Item = (ProgressKey, bool)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<ProgressRecord> for BTreeMap<String, bool> {
    fn from(record: ProgressRecord) -> Self {
        record
            .entries
            .into_iter()
            .map(|(key, done)| (key.encode(), done))
            .collect()
    }
}

impl From<BTreeMap<String, bool>> for ProgressRecord {
    fn from(raw: BTreeMap<String, bool>) -> Self {
        raw.into_iter()
            .filter_map(|(key, done)| match ProgressKey::decode(&key) {
                Ok(key) => Some((key, done)),
                Err(err) => {
                    warn!(error = %err, "dropping undecodable progress key");
                    None
                }
            })
            .collect()
    }
}
