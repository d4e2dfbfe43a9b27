//! Interaction state of the roadmap page and dispatch of learner actions.

use roadmap_core::model::{Catalog, IntroState, ProgressRecord, Theme, TopicId};
use roadmap_core::palette::neighbors_color;
use roadmap_core::{
    EdgeTone, LayoutMode, NodeEmphasis, Percent, Roadmap, RoadmapProgress, overall_progress, topic_progress,
};
use tracing::{debug, info, warn};

use crate::preferences_service::PreferencesService;
use crate::progress_store::ProgressStore;
use crate::view::{EdgeView, NodeView, RoadmapView, TopicDetail, VideoRow};

/// Learner or lifecycle event handled by [`RoadmapController::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoadmapIntent {
    SelectTopic(TopicId),
    CloseTopic,
    PointerEnter(TopicId),
    PointerLeave,
    Resize { width: u32 },
    ToggleTheme,
    DismissIntro,
    SetVideoCompleted {
        topic: String,
        video_url: String,
        completed: bool,
    },
    /// Re-read progress written by another process; last writer wins.
    ReloadProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    /// Nothing changed, e.g. hovering in the mobile layout or an unknown id.
    Ignored,
    /// Transient or preference state changed.
    Changed,
    Progress(ProgressUpdate),
}

/// Figures re-aggregated after a completion toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub topic_id: TopicId,
    pub topic_percent: Percent,
    pub overall: Percent,
    /// False when the write failed; the in-memory record still holds the
    /// change for this session.
    pub persisted: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct UiState {
    selected: Option<TopicId>,
    hovered: Option<TopicId>,
    layout: LayoutMode,
    theme: Theme,
    intro: IntroState,
}

/// Owns the roadmap content, the progress record and all transient UI
/// state. Every mutation goes through [`RoadmapController::dispatch`].
pub struct RoadmapController {
    roadmap: Roadmap,
    catalog: Catalog,
    progress: ProgressStore,
    preferences: PreferencesService,
    record: ProgressRecord,
    ui: UiState,
}

impl RoadmapController {
    /// Load persisted state and derive the initial layout from the viewport.
    ///
    /// A first visit (intro state `Unknown`) is recorded as `Shown`.
    pub async fn initialize(
        roadmap: Roadmap,
        catalog: Catalog,
        progress: ProgressStore,
        preferences: PreferencesService,
        viewport_width: u32,
    ) -> Self {
        let record = progress.load().await;
        let theme = preferences.load_theme().await;
        let mut intro = preferences.load_intro().await;
        if intro == IntroState::Unknown {
            intro = IntroState::Shown;
            if let Err(err) = preferences.save_intro(intro).await {
                warn!(error = %err, "could not record intro as shown");
            }
        }
        let layout = LayoutMode::for_width(viewport_width);
        info!(
            entries = record.len(),
            ?theme,
            ?layout,
            ?intro,
            "roadmap controller initialized"
        );

        Self {
            roadmap,
            catalog,
            progress,
            preferences,
            record,
            ui: UiState {
                selected: None,
                hovered: None,
                layout,
                theme,
                intro,
            },
        }
    }

    /// Apply one intent. Failures to persist are logged, never returned.
    pub async fn dispatch(&mut self, intent: RoadmapIntent) -> IntentOutcome {
        debug!(?intent, "dispatch");
        match intent {
            RoadmapIntent::SelectTopic(id) => {
                if self.roadmap.topic(id).is_none() {
                    return IntentOutcome::Ignored;
                }
                self.ui.selected = Some(id);
                IntentOutcome::Changed
            }
            RoadmapIntent::CloseTopic => {
                if self.ui.selected.take().is_some() {
                    IntentOutcome::Changed
                } else {
                    IntentOutcome::Ignored
                }
            }
            RoadmapIntent::PointerEnter(id) => {
                if !self.ui.layout.supports_hover() || self.roadmap.topic(id).is_none() {
                    return IntentOutcome::Ignored;
                }
                self.ui.hovered = Some(id);
                IntentOutcome::Changed
            }
            RoadmapIntent::PointerLeave => {
                if self.ui.hovered.take().is_some() {
                    IntentOutcome::Changed
                } else {
                    IntentOutcome::Ignored
                }
            }
            RoadmapIntent::Resize { width } => self.resize(width),
            RoadmapIntent::ToggleTheme => {
                self.ui.theme = self.ui.theme.toggled();
                if let Err(err) = self.preferences.save_theme(self.ui.theme).await {
                    warn!(error = %err, "theme preference not saved");
                }
                IntentOutcome::Changed
            }
            RoadmapIntent::DismissIntro => {
                if self.ui.intro == IntroState::Dismissed {
                    return IntentOutcome::Ignored;
                }
                self.ui.intro = IntroState::Dismissed;
                if let Err(err) = self.preferences.save_intro(self.ui.intro).await {
                    warn!(error = %err, "intro dismissal not saved");
                }
                IntentOutcome::Changed
            }
            RoadmapIntent::SetVideoCompleted {
                topic,
                video_url,
                completed,
            } => self.set_video_completed(&topic, &video_url, completed).await,
            RoadmapIntent::ReloadProgress => {
                let reloaded = match self.progress.try_load().await {
                    Ok(record) => record,
                    Err(err) => {
                        warn!(error = %err, "progress reload failed, keeping in-memory state");
                        return IntentOutcome::Ignored;
                    }
                };
                if reloaded == self.record {
                    return IntentOutcome::Ignored;
                }
                self.record = reloaded;
                IntentOutcome::Changed
            }
        }
    }

    fn resize(&mut self, width: u32) -> IntentOutcome {
        let layout = LayoutMode::for_width(width);
        if layout == self.ui.layout {
            return IntentOutcome::Ignored;
        }
        self.ui.layout = layout;
        if !layout.supports_hover() {
            self.ui.hovered = None;
        }
        IntentOutcome::Changed
    }

    async fn set_video_completed(
        &mut self,
        topic: &str,
        video_url: &str,
        completed: bool,
    ) -> IntentOutcome {
        let Some(topic_id) = self.roadmap.topic_by_name(topic).map(|t| t.id()) else {
            warn!(topic, "completion toggle for unknown topic");
            return IntentOutcome::Ignored;
        };
        if !self
            .catalog
            .videos(topic)
            .iter()
            .any(|video| video.url() == video_url)
        {
            warn!(topic, video_url, "completion toggle for video outside the catalog");
            return IntentOutcome::Ignored;
        }

        self.record = self.record.with_completion(topic, video_url, completed);
        let persisted = match self.progress.save(&self.record).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "progress not saved, keeping in-memory state");
                false
            }
        };

        IntentOutcome::Progress(ProgressUpdate {
            topic_id,
            topic_percent: topic_progress(topic, &self.record, &self.catalog),
            overall: self.overall(),
            persisted,
        })
    }

    #[must_use]
    pub fn roadmap(&self) -> &Roadmap {
        &self.roadmap
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    #[must_use]
    pub fn selected(&self) -> Option<TopicId> {
        self.ui.selected
    }

    #[must_use]
    pub fn hovered(&self) -> Option<TopicId> {
        self.ui.hovered
    }

    #[must_use]
    pub fn layout(&self) -> LayoutMode {
        self.ui.layout
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.ui.theme
    }

    #[must_use]
    pub fn intro(&self) -> IntroState {
        self.ui.intro
    }

    #[must_use]
    pub fn overall(&self) -> Percent {
        overall_progress(self.roadmap.topics(), &self.record, &self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> RoadmapProgress {
        RoadmapProgress::compute(&self.roadmap, &self.record, &self.catalog)
    }

    /// Derive the full render state from the current inputs.
    #[must_use]
    pub fn snapshot(&self) -> RoadmapView {
        let progress = self.progress();
        let hovered = self.ui.hovered;

        let nodes = self
            .roadmap
            .topics()
            .iter()
            .zip(&progress.topics)
            .map(|(topic, entry)| NodeView {
                id: topic.id(),
                name: topic.name().to_owned(),
                position: topic.position(),
                color: topic.color().clone(),
                completed: entry.completed,
                total: entry.total,
                percent: entry.percent,
                emphasis: NodeEmphasis::for_node(topic.id(), hovered),
                selected: self.ui.selected == Some(topic.id()),
            })
            .collect();

        let edges = if self.ui.layout == LayoutMode::Desktop {
            self.edge_views()
        } else {
            Vec::new()
        };

        RoadmapView {
            layout: self.ui.layout,
            hint: self.ui.layout.hint(),
            theme: self.ui.theme,
            intro_visible: self.ui.intro.is_visible(),
            overall: progress.overall,
            nodes,
            edges,
            selected: self.ui.selected,
        }
    }

    fn edge_views(&self) -> Vec<EdgeView> {
        self.roadmap
            .edges()
            .iter()
            .filter_map(|edge| {
                let from = self.roadmap.topic(edge.from)?;
                let to = self.roadmap.topic(edge.to)?;
                Some(EdgeView {
                    from: edge.from,
                    to: edge.to,
                    from_position: from.position(),
                    to_position: to.position(),
                    tone: EdgeTone::for_edge(edge, self.ui.hovered),
                    color: neighbors_color(edge, self.ui.hovered, self.ui.theme),
                })
            })
            .collect()
    }

    /// Videos of a topic with their completion flags.
    #[must_use]
    pub fn topic_detail(&self, id: TopicId) -> Option<TopicDetail> {
        let topic = self.roadmap.topic(id)?;
        let videos = self
            .catalog
            .videos(topic.name())
            .iter()
            .map(|video| VideoRow {
                url: video.url().to_owned(),
                title: video.title().to_owned(),
                completed: self.record.is_completed(topic.name(), video.url()),
            })
            .collect();
        Some(TopicDetail {
            id,
            name: topic.name().to_owned(),
            percent: topic_progress(topic.name(), &self.record, &self.catalog),
            videos,
        })
    }

    /// Detail of the selected topic, if any.
    #[must_use]
    pub fn selected_detail(&self) -> Option<TopicDetail> {
        self.ui.selected.and_then(|id| self.topic_detail(id))
    }
}
