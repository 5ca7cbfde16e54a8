pub mod actions;
pub mod grading;
pub mod payload;
pub mod types;

pub use actions::{decode_actions, ActionCode, ActionDecoder, RecommendedAction};
pub use grading::{assemble, parse_grading, parse_repair, AssessmentResult, Grading, RepairRecommendation};
pub use types::{parse_date, AssessmentRecord, Condition, Product};
