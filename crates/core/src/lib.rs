#![forbid(unsafe_code)]

pub mod aggregate;
pub mod graph;
pub mod layout;
pub mod model;
pub mod palette;

pub use aggregate::{
    overall_progress, topic_progress, Percent, RoadmapProgress, TopicProgress,
};
pub use graph::{
    Edge, EdgeTone, GraphError, NodeEmphasis, Roadmap, RoadmapConfig, TopicConfig, ValidationMode,
};
pub use layout::{LayoutMode, MOBILE_BREAKPOINT_PX};
