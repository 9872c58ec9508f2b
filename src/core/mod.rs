pub mod grader;
pub mod scoring;
pub mod stats;

pub use grader::{Grader, ScoringPolicy};
pub use scoring::{CourseScores, course_scores};
pub use stats::{DetailedStats, LabStats, StatsAggregator};
