mod ids;
mod preferences;
mod progress;
mod topic;
mod video;

pub use ids::{ParseIdError, TopicId};
pub use preferences::{IntroState, Theme};
pub use progress::{ProgressKey, ProgressKeyError, ProgressRecord};
pub use topic::{ColorToken, Position, Topic, TopicError};
pub use video::{Catalog, Video, VideoDraft, VideoError};
