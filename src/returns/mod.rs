pub mod clock;
pub mod eligibility;
pub mod options;
pub mod wardrobing;

pub use clock::{Clock, SystemClock};
pub use eligibility::{EligibilityChecker, EligibilityReport, NonReturnableReason};
pub use options::{DropOffOption, DROP_OFF_OPTIONS};
pub use wardrobing::{CustomerHistory, WardrobingAssessment, WardrobingDetector};
