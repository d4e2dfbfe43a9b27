//! Completion percentages derived from the progress record.
//!
//! Everything here is a pure function of its inputs; callers recompute on
//! demand instead of caching percentages next to the record.

use std::fmt;

use crate::graph::Roadmap;
use crate::model::{Catalog, ProgressRecord, Topic, TopicId};

/// Whole-number completion percentage, always in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percent(u8);

impl Percent {
    pub const ZERO: Self = Self(0);
    pub const FULL: Self = Self(100);

    /// `completed / total` as a percentage, rounded half up.
    ///
    /// A zero `total` yields 0; `completed` is clamped to `total`.
    #[must_use]
    pub fn from_ratio(completed: usize, total: usize) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let completed = completed.min(total);
        let rounded = (200 * completed + total) / (2 * total);
        Self(u8::try_from(rounded).unwrap_or(100))
    }

    // clamped to 0..=100 before the cast
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_fraction(fraction: f64) -> Self {
        let scaled = (fraction * 100.0).round().clamp(0.0, 100.0);
        Self(scaled as u8)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Completion percentage of one topic.
#[must_use]
pub fn topic_progress(topic_name: &str, record: &ProgressRecord, catalog: &Catalog) -> Percent {
    let videos = catalog.videos(topic_name);
    Percent::from_ratio(record.completed_count(topic_name, videos), videos.len())
}

/// Mean completion over all `topics`.
///
/// Topics without videos add 0 to the sum but still count towards the
/// number of topics.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn overall_progress(topics: &[Topic], record: &ProgressRecord, catalog: &Catalog) -> Percent {
    if record.is_empty() || topics.is_empty() {
        return Percent::ZERO;
    }
    let sum: f64 = topics
        .iter()
        .map(|topic| {
            let videos = catalog.videos(topic.name());
            if videos.is_empty() {
                return 0.0;
            }
            record.completed_count(topic.name(), videos) as f64 / videos.len() as f64
        })
        .sum();
    let mean = sum / topics.len() as f64;
    Percent::from_fraction(mean)
}

/// Per-topic breakdown used by list and graph views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicProgress {
    pub topic_id: TopicId,
    pub completed: usize,
    pub total: usize,
    pub percent: Percent,
}

impl TopicProgress {
    #[must_use]
    pub fn compute(topic: &Topic, record: &ProgressRecord, catalog: &Catalog) -> Self {
        let videos = catalog.videos(topic.name());
        let completed = record.completed_count(topic.name(), videos);
        Self {
            topic_id: topic.id(),
            completed,
            total: videos.len(),
            percent: Percent::from_ratio(completed, videos.len()),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Progress of every topic in roadmap order, plus the overall figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapProgress {
    pub topics: Vec<TopicProgress>,
    pub overall: Percent,
}

impl RoadmapProgress {
    #[must_use]
    pub fn compute(roadmap: &Roadmap, record: &ProgressRecord, catalog: &Catalog) -> Self {
        Self {
            topics: roadmap
                .topics()
                .iter()
                .map(|topic| TopicProgress::compute(topic, record, catalog))
                .collect(),
            overall: overall_progress(roadmap.topics(), record, catalog),
        }
    }

    #[must_use]
    pub fn topic(&self, id: TopicId) -> Option<&TopicProgress> {
        self.topics.iter().find(|entry| entry.topic_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{RoadmapConfig, TopicConfig, ValidationMode};
    use crate::model::VideoDraft;
    use proptest::prelude::*;

    fn two_topic_roadmap() -> Roadmap {
        let topic = |id: u64, name: &str| TopicConfig {
            id,
            name: name.to_owned(),
            x: 25.0,
            y: 30.0,
            color: "#10b981".to_owned(),
        };
        Roadmap::from_config(
            RoadmapConfig {
                topics: vec![topic(1, "Linear Algebra"), topic(2, "Calculus")],
                edges: Vec::new(),
            },
            ValidationMode::Strict,
        )
        .unwrap()
    }

    fn scenario_catalog() -> Catalog {
        Catalog::from_drafts([
            (
                "Linear Algebra".to_string(),
                vec![
                    VideoDraft::new("https://youtu.be/v1", "Vectors"),
                    VideoDraft::new("https://youtu.be/v2", "Spans"),
                ],
            ),
            (
                "Calculus".to_string(),
                vec![VideoDraft::new("https://youtu.be/v3", "Limits")],
            ),
        ])
    }

    fn numbered_catalog(topic: &str, count: usize) -> Catalog {
        Catalog::from_drafts([(
            topic.to_string(),
            (0..count)
                .map(|i| VideoDraft::new(format!("https://youtu.be/{i}"), format!("Part {i}")))
                .collect::<Vec<_>>(),
        )])
    }

    #[test]
    fn linear_algebra_scenario() {
        let roadmap = two_topic_roadmap();
        let catalog = scenario_catalog();
        let record =
            ProgressRecord::new().with_completion("Linear Algebra", "https://youtu.be/v1", true);

        assert_eq!(topic_progress("Linear Algebra", &record, &catalog).value(), 50);
        assert_eq!(topic_progress("Calculus", &record, &catalog).value(), 0);
        assert_eq!(overall_progress(roadmap.topics(), &record, &catalog).value(), 25);
    }

    #[test]
    fn empty_record_is_zero_overall() {
        let roadmap = two_topic_roadmap();
        let catalog = scenario_catalog();
        assert_eq!(
            overall_progress(roadmap.topics(), &ProgressRecord::new(), &catalog),
            Percent::ZERO
        );
    }

    #[test]
    fn fast_path_matches_general_formula() {
        // a record holding only `false` entries takes the general path
        let roadmap = two_topic_roadmap();
        let catalog = scenario_catalog();
        let record =
            ProgressRecord::new().with_completion("Calculus", "https://youtu.be/v3", false);
        assert_eq!(
            overall_progress(roadmap.topics(), &record, &catalog),
            overall_progress(roadmap.topics(), &ProgressRecord::new(), &catalog)
        );
    }

    #[test]
    fn everything_complete_is_full() {
        let roadmap = two_topic_roadmap();
        let catalog = scenario_catalog();
        let record = ProgressRecord::new()
            .with_completion("Linear Algebra", "https://youtu.be/v1", true)
            .with_completion("Linear Algebra", "https://youtu.be/v2", true)
            .with_completion("Calculus", "https://youtu.be/v3", true);
        assert_eq!(overall_progress(roadmap.topics(), &record, &catalog), Percent::FULL);
        let summary = RoadmapProgress::compute(&roadmap, &record, &catalog);
        assert!(summary.topics.iter().all(TopicProgress::is_complete));
    }

    #[test]
    fn empty_topics_still_count_in_denominator() {
        let roadmap = Roadmap::prerequisites();
        let catalog = numbered_catalog("Python", 1);
        let record = ProgressRecord::new().with_completion("Python", "https://youtu.be/0", true);
        // 1 of 5 topics complete
        assert_eq!(overall_progress(roadmap.topics(), &record, &catalog).value(), 20);
    }

    #[test]
    fn missing_catalog_entry_is_zero() {
        let record = ProgressRecord::new().with_completion("Matrices", "https://youtu.be/m", true);
        assert_eq!(topic_progress("Matrices", &record, &Catalog::empty()), Percent::ZERO);
    }

    #[test]
    fn stale_keys_are_ignored() {
        let catalog = numbered_catalog("Python", 2);
        let record = ProgressRecord::new()
            .with_completion("Removed Topic", "https://youtu.be/0", true)
            .with_completion("Python", "https://youtu.be/9", true);
        assert_eq!(topic_progress("Python", &record, &catalog), Percent::ZERO);
    }

    #[test]
    fn ratio_rounds_half_up() {
        assert_eq!(Percent::from_ratio(1, 8).value(), 13);
        assert_eq!(Percent::from_ratio(1, 3).value(), 33);
        assert_eq!(Percent::from_ratio(2, 3).value(), 67);
        assert_eq!(Percent::from_ratio(5, 0), Percent::ZERO);
        assert_eq!(Percent::from_ratio(7, 3), Percent::FULL);
    }

    #[test]
    fn summary_lookup_by_topic() {
        let roadmap = two_topic_roadmap();
        let catalog = scenario_catalog();
        let record =
            ProgressRecord::new().with_completion("Linear Algebra", "https://youtu.be/v2", true);
        let summary = RoadmapProgress::compute(&roadmap, &record, &catalog);
        let entry = summary.topic(TopicId::new(1)).unwrap();
        assert_eq!((entry.completed, entry.total), (1, 2));
        assert_eq!(summary.overall.to_string(), "25%");
    }

    proptest! {
        #[test]
        fn topic_progress_is_bounded(total in 0usize..40, marks in proptest::collection::vec(any::<bool>(), 0..40)) {
            let catalog = numbered_catalog("Topic", total);
            let record: ProgressRecord = marks
                .iter()
                .enumerate()
                .fold(ProgressRecord::new(), |acc, (i, done)| {
                    acc.with_completion("Topic", &format!("https://youtu.be/{i}"), *done)
                });
            let percent = topic_progress("Topic", &record, &catalog).value();
            prop_assert!(percent <= 100);
            if total == 0 {
                prop_assert_eq!(percent, 0);
            }
        }

        #[test]
        fn marking_another_video_never_decreases(total in 1usize..30, done in 0usize..30, extra in 0usize..30) {
            let catalog = numbered_catalog("Topic", total);
            let record = (0..done.min(total)).fold(ProgressRecord::new(), |acc, i| {
                acc.with_completion("Topic", &format!("https://youtu.be/{i}"), true)
            });
            let before = topic_progress("Topic", &record, &catalog);
            let more = record.with_completion("Topic", &format!("https://youtu.be/{}", extra % total), true);
            prop_assert!(topic_progress("Topic", &more, &catalog) >= before);
        }
    }
}
