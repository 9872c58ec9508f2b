pub mod entry;
pub mod lab_score;
pub mod score_override;
pub mod stat;
pub mod validation;

pub use entry::Entry;
pub use lab_score::LabScore;
pub use score_override::ScoreOverride;
pub use stat::StatResult;
