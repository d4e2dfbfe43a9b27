use roadmap_core::model::{ColorToken, Position, Theme, TopicId};
use roadmap_core::{EdgeTone, LayoutMode, NodeEmphasis, Percent};

/// Render-ready state of the whole roadmap, derived on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapView {
    pub layout: LayoutMode,
    pub hint: &'static str,
    pub theme: Theme,
    pub intro_visible: bool,
    pub overall: Percent,
    /// Topics in roadmap order; the mobile list renders them top to bottom.
    pub nodes: Vec<NodeView>,
    /// Only edges between known topics; empty in the mobile layout.
    pub edges: Vec<EdgeView>,
    pub selected: Option<TopicId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: TopicId,
    pub name: String,
    pub position: Position,
    pub color: ColorToken,
    pub completed: usize,
    pub total: usize,
    pub percent: Percent,
    pub emphasis: NodeEmphasis,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeView {
    pub from: TopicId,
    pub to: TopicId,
    pub from_position: Position,
    pub to_position: Position,
    pub tone: EdgeTone,
    pub color: ColorToken,
}

/// Contents of the topic dialog: its videos with completion flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDetail {
    pub id: TopicId,
    pub name: String,
    pub percent: Percent,
    pub videos: Vec<VideoRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRow {
    pub url: String,
    pub title: String,
    pub completed: bool,
}

impl RoadmapView {
    #[must_use]
    pub fn node(&self, id: TopicId) -> Option<&NodeView> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
