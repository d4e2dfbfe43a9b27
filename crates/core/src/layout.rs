/// Viewport widths below this many pixels use the mobile list layout.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Positioned graph with hover highlighting.
    #[default]
    Desktop,
    /// Ordered topic list; hover is not tracked.
    Mobile,
}

impl LayoutMode {
    #[must_use]
    pub fn for_width(viewport_width: u32) -> Self {
        if viewport_width < MOBILE_BREAKPOINT_PX {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    #[must_use]
    pub fn supports_hover(self) -> bool {
        matches!(self, Self::Desktop)
    }

    /// Short instruction shown above the roadmap.
    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Self::Desktop => "Follow the numbered path to master ML prerequisites",
            Self::Mobile => "Follow the sequence to master prerequisites",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_is_exclusive_for_mobile() {
        assert_eq!(LayoutMode::for_width(767), LayoutMode::Mobile);
        assert_eq!(LayoutMode::for_width(768), LayoutMode::Desktop);
        assert_eq!(LayoutMode::for_width(0), LayoutMode::Mobile);
    }

    #[test]
    fn only_desktop_tracks_hover() {
        assert!(LayoutMode::Desktop.supports_hover());
        assert!(!LayoutMode::Mobile.supports_hover());
    }
}
