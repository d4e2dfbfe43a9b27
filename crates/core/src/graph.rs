//! Prerequisite roadmap: topics, directed edges and the hover policy that
//! decides how they are emphasised.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::model::{ColorToken, Position, Topic, TopicError, TopicId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GraphError {
    #[error("topic {id} is invalid: {source}")]
    InvalidTopic { id: TopicId, source: TopicError },

    #[error("duplicate topic id {0}")]
    DuplicateTopicId(TopicId),

    #[error("duplicate topic name {0:?}")]
    DuplicateTopicName(String),

    #[error("edge {from} -> {to} references unknown topic {missing}")]
    DanglingEdge {
        from: TopicId,
        to: TopicId,
        missing: TopicId,
    },
}

//
// ─── CONFIGURATION ─────────────────────────────────────────────────────────────
//

/// Directed prerequisite relationship: `from` should be learned before `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct Edge {
    pub from: TopicId,
    pub to: TopicId,
}

impl Edge {
    #[must_use]
    pub fn new(from: TopicId, to: TopicId) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn touches(&self, id: TopicId) -> bool {
        self.from == id || self.to == id
    }
}

/// Topic as authored in roadmap configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicConfig {
    pub id: u64,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub color: String,
}

/// Authored roadmap definition, validated by [`Roadmap::from_config`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoadmapConfig {
    pub topics: Vec<TopicConfig>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// How edges pointing at unknown topics are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Reject the roadmap with `GraphError::DanglingEdge`.
    Strict,
    /// Drop the edge, log it and keep it in `Roadmap::rejected_edges`.
    Lenient,
}

impl Default for ValidationMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

//
// ─── ROADMAP ───────────────────────────────────────────────────────────────────
//

/// Fixed set of topics and prerequisite edges, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Roadmap {
    topics: Vec<Topic>,
    edges: Vec<Edge>,
    rejected: Vec<Edge>,
}

impl Roadmap {
    /// Validate topics and edges into a roadmap.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::DuplicateTopicId` / `DuplicateTopicName` for
    /// repeated topics, and `GraphError::DanglingEdge` for an edge to an
    /// unknown topic when `mode` is `Strict`.
    pub fn new(
        topics: Vec<Topic>,
        edges: Vec<Edge>,
        mode: ValidationMode,
    ) -> Result<Self, GraphError> {
        let mut ids = HashSet::with_capacity(topics.len());
        let mut names = HashSet::with_capacity(topics.len());
        for topic in &topics {
            if !ids.insert(topic.id()) {
                return Err(GraphError::DuplicateTopicId(topic.id()));
            }
            if !names.insert(topic.name()) {
                return Err(GraphError::DuplicateTopicName(topic.name().to_owned()));
            }
        }

        let mut kept = Vec::with_capacity(edges.len());
        let mut rejected = Vec::new();
        for edge in edges {
            let missing = [edge.from, edge.to].into_iter().find(|id| !ids.contains(id));
            match (missing, mode) {
                (None, _) => kept.push(edge),
                (Some(missing), ValidationMode::Strict) => {
                    return Err(GraphError::DanglingEdge {
                        from: edge.from,
                        to: edge.to,
                        missing,
                    });
                }
                (Some(missing), ValidationMode::Lenient) => {
                    warn!(from = %edge.from, to = %edge.to, %missing, "skipping roadmap edge to unknown topic");
                    rejected.push(edge);
                }
            }
        }

        Ok(Self {
            topics,
            edges: kept,
            rejected,
        })
    }

    /// Build a roadmap from authored configuration.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvalidTopic` if a topic fails validation, plus
    /// everything [`Roadmap::new`] reports.
    pub fn from_config(config: RoadmapConfig, mode: ValidationMode) -> Result<Self, GraphError> {
        let topics = config
            .topics
            .into_iter()
            .map(|raw| {
                let id = TopicId::new(raw.id);
                let build = || {
                    Topic::new(
                        id,
                        raw.name,
                        Position::new(raw.x, raw.y)?,
                        ColorToken::new(raw.color)?,
                    )
                };
                build().map_err(|source| GraphError::InvalidTopic { id, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(topics, config.edges, mode)
    }

    /// The machine-learning prerequisites roadmap shipped with the tracker.
    #[must_use]
    pub fn prerequisites() -> Self {
        let topic = |id: u64, name: &'static str, x: f32, y: f32, color: &'static str| {
            Topic::from_static(id, name, Position::from_static(x, y), color)
        };
        let edge = |from: u64, to: u64| Edge::new(TopicId::new(from), TopicId::new(to));
        Self {
            topics: vec![
                topic(1, "Linear Algebra", 25.0, 30.0, "#10b981"),
                topic(2, "Calculus", 50.0, 30.0, "#10b981"),
                topic(3, "Probability and Statistics", 75.0, 30.0, "#10b981"),
                topic(4, "Matrices", 25.0, 50.0, "#34d399"),
                topic(5, "Python", 50.0, 50.0, "#34d399"),
            ],
            edges: vec![edge(1, 4), edge(2, 4), edge(3, 4), edge(4, 5)],
            rejected: Vec::new(),
        }
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Edges that passed validation; only these are drawn.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges dropped by lenient validation.
    #[must_use]
    pub fn rejected_edges(&self) -> &[Edge] {
        &self.rejected
    }

    #[must_use]
    pub fn topic(&self, id: TopicId) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id() == id)
    }

    #[must_use]
    pub fn topic_by_name(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.name() == name)
    }
}

//
// ─── HOVER POLICY ──────────────────────────────────────────────────────────────
//

/// Highlight class of an edge; mapped to a color by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeTone {
    /// Nothing is hovered.
    Default,
    /// The edge touches the hovered topic.
    Active,
    /// Another topic is hovered.
    Inactive,
}

impl EdgeTone {
    #[must_use]
    pub fn for_edge(edge: &Edge, hovered: Option<TopicId>) -> Self {
        match hovered {
            None => Self::Default,
            Some(id) if edge.touches(id) => Self::Active,
            Some(_) => Self::Inactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEmphasis {
    Full,
    Dimmed,
}

impl NodeEmphasis {
    /// Only the hovered topic stays full while another topic is hovered.
    #[must_use]
    pub fn for_node(id: TopicId, hovered: Option<TopicId>) -> Self {
        match hovered {
            Some(h) if h != id => Self::Dimmed,
            _ => Self::Full,
        }
    }

    #[must_use]
    pub fn opacity(self) -> f32 {
        match self {
            Self::Full => 1.0,
            Self::Dimmed => 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Roadmap {
        let topic = |id: u64, name: &str| TopicConfig {
            id,
            name: name.to_owned(),
            x: 10.0 * id as f32,
            y: 50.0,
            color: "#10b981".to_owned(),
        };
        Roadmap::from_config(
            RoadmapConfig {
                topics: vec![topic(1, "A"), topic(2, "B"), topic(3, "C")],
                edges: vec![
                    Edge::new(TopicId::new(1), TopicId::new(2)),
                    Edge::new(TopicId::new(2), TopicId::new(3)),
                ],
            },
            ValidationMode::Strict,
        )
        .unwrap()
    }

    #[test]
    fn prerequisites_roadmap_is_consistent() {
        let roadmap = Roadmap::prerequisites();
        assert_eq!(roadmap.topics().len(), 5);
        assert_eq!(roadmap.edges().len(), 4);
        assert!(roadmap.rejected_edges().is_empty());
        let revalidated = Roadmap::new(
            roadmap.topics().to_vec(),
            roadmap.edges().to_vec(),
            ValidationMode::Strict,
        )
        .unwrap();
        assert_eq!(revalidated, roadmap);
        for topic in roadmap.topics() {
            let p = topic.position();
            assert!(Position::new(p.x(), p.y()).is_ok(), "{} out of range", topic.name());
            assert!(ColorToken::new(topic.color().as_str()).is_ok());
        }
    }

    #[test]
    fn hovering_middle_topic_activates_both_edges() {
        let roadmap = abc();
        let tones: Vec<EdgeTone> = roadmap
            .edges()
            .iter()
            .map(|edge| EdgeTone::for_edge(edge, Some(TopicId::new(2))))
            .collect();
        assert_eq!(tones, vec![EdgeTone::Active, EdgeTone::Active]);
    }

    #[test]
    fn hovering_leaf_dims_unrelated_edge() {
        let roadmap = abc();
        let tones: Vec<EdgeTone> = roadmap
            .edges()
            .iter()
            .map(|edge| EdgeTone::for_edge(edge, Some(TopicId::new(1))))
            .collect();
        assert_eq!(tones, vec![EdgeTone::Active, EdgeTone::Inactive]);
    }

    #[test]
    fn no_hover_uses_default_tone() {
        let roadmap = abc();
        assert!(roadmap
            .edges()
            .iter()
            .all(|edge| EdgeTone::for_edge(edge, None) == EdgeTone::Default));
    }

    #[test]
    fn hover_dims_every_other_node() {
        let hovered = Some(TopicId::new(1));
        assert_eq!(NodeEmphasis::for_node(TopicId::new(1), hovered), NodeEmphasis::Full);
        assert_eq!(NodeEmphasis::for_node(TopicId::new(2), hovered), NodeEmphasis::Dimmed);
        assert_eq!(NodeEmphasis::for_node(TopicId::new(3), hovered), NodeEmphasis::Dimmed);
        assert_eq!(NodeEmphasis::for_node(TopicId::new(3), None), NodeEmphasis::Full);
        assert!((NodeEmphasis::Dimmed.opacity() - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn strict_mode_rejects_dangling_edge() {
        let roadmap = Roadmap::prerequisites();
        let err = Roadmap::new(
            roadmap.topics().to_vec(),
            vec![Edge::new(TopicId::new(1), TopicId::new(99))],
            ValidationMode::Strict,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingEdge {
                from: TopicId::new(1),
                to: TopicId::new(99),
                missing: TopicId::new(99),
            }
        );
    }

    #[test]
    fn lenient_mode_skips_dangling_edge() {
        let base = Roadmap::prerequisites();
        let mut edges = base.edges().to_vec();
        edges.push(Edge::new(TopicId::new(99), TopicId::new(5)));
        let roadmap =
            Roadmap::new(base.topics().to_vec(), edges, ValidationMode::Lenient).unwrap();
        assert_eq!(roadmap.edges().len(), 4);
        assert_eq!(
            roadmap.rejected_edges(),
            &[Edge::new(TopicId::new(99), TopicId::new(5))]
        );
    }

    #[test]
    fn duplicate_topics_are_always_errors() {
        let base = Roadmap::prerequisites();
        let mut topics = base.topics().to_vec();
        topics.push(base.topics()[0].clone());
        let err = Roadmap::new(topics, Vec::new(), ValidationMode::Lenient).unwrap_err();
        assert_eq!(err, GraphError::DuplicateTopicId(TopicId::new(1)));
    }

    #[test]
    fn config_deserializes_from_json() {
        let raw = r##"{
            "topics": [
                {"id": 1, "name": "A", "x": 10, "y": 10, "color": "#fff"},
                {"id": 2, "name": "B", "x": 20, "y": 10, "color": "#fff"}
            ],
            "edges": [{"from": 1, "to": 2}]
        }"##;
        let config: RoadmapConfig = serde_json::from_str(raw).unwrap();
        let roadmap = Roadmap::from_config(config, ValidationMode::Strict).unwrap();
        assert_eq!(roadmap.edges(), &[Edge::new(TopicId::new(1), TopicId::new(2))]);
        assert_eq!(roadmap.topic_by_name("B").map(Topic::id), Some(TopicId::new(2)));
    }

    #[test]
    fn invalid_topic_reports_its_id() {
        let config = RoadmapConfig {
            topics: vec![TopicConfig {
                id: 8,
                name: "Far".into(),
                x: 150.0,
                y: 10.0,
                color: "#fff".into(),
            }],
            edges: Vec::new(),
        };
        let err = Roadmap::from_config(config, ValidationMode::Lenient).unwrap_err();
        assert!(matches!(err, GraphError::InvalidTopic { id, .. } if id == TopicId::new(8)));
    }
}
