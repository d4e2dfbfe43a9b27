use thiserror::Error;

use crate::model::ids::TopicId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic name cannot be empty")]
    EmptyName,

    #[error("layout coordinate {axis} = {value} is outside 0..=100")]
    PositionOutOfRange { axis: char, value: f32 },

    #[error("color token cannot be empty")]
    EmptyColor,
}

//
// ─── LAYOUT ────────────────────────────────────────────────────────────────────
//

/// Node position as percentages of the roadmap bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// # Errors
    ///
    /// Returns `TopicError::PositionOutOfRange` if either axis is not a finite
    /// value in `0..=100`.
    pub fn new(x: f32, y: f32) -> Result<Self, TopicError> {
        check_axis('x', x)?;
        check_axis('y', y)?;
        Ok(Self { x, y })
    }

    /// Position for built-in coordinates known to be in range.
    pub(crate) const fn from_static(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }
}

fn check_axis(axis: char, value: f32) -> Result<(), TopicError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(TopicError::PositionOutOfRange { axis, value })
    }
}

/// Opaque style reference handed through to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorToken(String);

impl ColorToken {
    /// # Errors
    ///
    /// Returns `TopicError::EmptyColor` for a blank token.
    pub fn new(value: impl Into<String>) -> Result<Self, TopicError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TopicError::EmptyColor);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Token for palette constants known to be valid.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ColorToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// A named node of the prerequisite roadmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    id: TopicId,
    name: String,
    position: Position,
    color: ColorToken,
}

impl Topic {
    /// # Errors
    ///
    /// Returns `TopicError::EmptyName` if the name is blank after trimming.
    pub fn new(
        id: TopicId,
        name: impl Into<String>,
        position: Position,
        color: ColorToken,
    ) -> Result<Self, TopicError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TopicError::EmptyName);
        }
        Ok(Self {
            id,
            name: trimmed.to_owned(),
            position,
            color,
        })
    }

    /// Topic for built-in definitions known to be valid.
    pub(crate) fn from_static(
        id: u64,
        name: &'static str,
        position: Position,
        color: &'static str,
    ) -> Self {
        Self {
            id: TopicId::new(id),
            name: name.to_owned(),
            position,
            color: ColorToken::from_static(color),
        }
    }

    #[must_use]
    pub fn id(&self) -> TopicId {
        self.id
    }

    /// Catalog key and first half of every progress key for this topic.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn color(&self) -> &ColorToken {
        &self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_accepts_bounds() {
        assert!(Position::new(0.0, 100.0).is_ok());
    }

    #[test]
    fn position_rejects_out_of_range_and_nan() {
        assert_eq!(
            Position::new(101.0, 5.0),
            Err(TopicError::PositionOutOfRange {
                axis: 'x',
                value: 101.0
            })
        );
        assert!(matches!(
            Position::new(5.0, f32::NAN),
            Err(TopicError::PositionOutOfRange { axis: 'y', .. })
        ));
    }

    #[test]
    fn topic_name_is_trimmed() {
        let topic = Topic::new(
            TopicId::new(1),
            "  Calculus ",
            Position::new(50.0, 30.0).unwrap(),
            ColorToken::new("#10b981").unwrap(),
        )
        .unwrap();
        assert_eq!(topic.name(), "Calculus");
    }

    #[test]
    fn topic_rejects_blank_name() {
        let err = Topic::new(
            TopicId::new(1),
            "   ",
            Position::new(50.0, 30.0).unwrap(),
            ColorToken::new("#10b981").unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, TopicError::EmptyName);
    }
}
