use crate::graph::{Edge, EdgeTone};
use crate::model::{ColorToken, Theme, TopicId};

// (light, dark)
const ACTIVE: (&str, &str) = ("#3b82f6", "#60a5fa");
const INACTIVE: (&str, &str) = ("#e5e7eb", "#333333");
const DEFAULT: (&str, &str) = ("#d1d5db", "#4B5563");

/// Color token for an edge tone under the given theme.
#[must_use]
pub fn edge_color(tone: EdgeTone, theme: Theme) -> ColorToken {
    let (light, dark) = match tone {
        EdgeTone::Active => ACTIVE,
        EdgeTone::Inactive => INACTIVE,
        EdgeTone::Default => DEFAULT,
    };
    ColorToken::from_static(if theme.is_dark() { dark } else { light })
}

/// Edge color for the current hover target and theme.
#[must_use]
pub fn neighbors_color(edge: &Edge, hovered: Option<TopicId>, theme: Theme) -> ColorToken {
    edge_color(EdgeTone::for_edge(edge, hovered), theme)
}
