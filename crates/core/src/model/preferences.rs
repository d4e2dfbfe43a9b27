/// Color theme, persisted as the `"true"`/`"false"` dark-mode flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Anything other than the literal `"true"` reads as light mode.
    #[must_use]
    pub fn from_flag(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("true") => Self::Dark,
            _ => Self::Light,
        }
    }

    #[must_use]
    pub fn as_flag(self) -> &'static str {
        match self {
            Self::Light => "false",
            Self::Dark => "true",
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// First-visit introduction state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IntroState {
    /// Never recorded; the learner has not seen the introduction yet.
    #[default]
    Unknown,
    Shown,
    Dismissed,
}

impl IntroState {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("shown") => Self::Shown,
            Some("dismissed") => Self::Dismissed,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Shown => "shown",
            Self::Dismissed => "dismissed",
        }
    }

    /// The introduction is visible until explicitly dismissed.
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Dismissed)
    }
}
