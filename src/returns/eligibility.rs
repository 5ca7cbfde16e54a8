use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::debug;

use crate::{
    assessment::types::AssessmentRecord,
    config::Config,
    returns::{
        clock::{Clock, SystemClock},
        options::{DropOffOption, DROP_OFF_OPTIONS},
    },
};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Why an item cannot be returned. Both may apply at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NonReturnableReason {
    /// Salvage grade or flagged as not eligible for resale
    IneligibleCondition,
    OutsideReturnWindow,
}

impl NonReturnableReason {
    pub fn message(&self, window_days: i64) -> String {
        match self {
            NonReturnableReason::IneligibleCondition => {
                "Based on the condition of the product, this item does not meet the requirements \
                 for a return. We require item condition of at least \"Used - Good\" or higher."
                    .to_string()
            }
            NonReturnableReason::OutsideReturnWindow => format!(
                "This item was received more than {} days ago and is outside the return window.",
                window_days
            ),
        }
    }
}

/// Outcome of evaluating one assessment record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityReport {
    pub eligible_for_resale: bool,
    pub no_repairs_needed: bool,
    pub within_return_window: bool,
    pub days_since_received: i64,
    pub window_days: i64,
    /// Informational only, never blocks a return
    pub wardrobing_suspected: bool,
    pub reasons: Vec<NonReturnableReason>,
}

impl EligibilityReport {
    pub fn is_non_returnable(&self) -> bool {
        !self.reasons.is_empty()
    }

    pub fn has_reason(&self, reason: NonReturnableReason) -> bool {
        self.reasons.contains(&reason)
    }

    /// Drop-off options to offer; none when the item cannot be returned
    pub fn drop_off_options(&self) -> &'static [DropOffOption] {
        if self.is_non_returnable() {
            &[]
        } else {
            &DROP_OFF_OPTIONS
        }
    }

    /// Checklist lines as shown on the assessment summary
    pub fn checklist(&self) -> Vec<(String, bool)> {
        vec![
            ("Eligible to return".to_string(), self.eligible_for_resale),
            ("No repairs/refurbishments needed".to_string(), self.no_repairs_needed),
            (
                format!("Within {} days of purchase", self.window_days),
                self.within_return_window,
            ),
        ]
    }
}

pub struct EligibilityChecker<C: Clock = SystemClock> {
    clock: C,
    window_days: i64,
}

impl EligibilityChecker<SystemClock> {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(SystemClock, config.returns.window_days)
    }
}

impl<C: Clock> EligibilityChecker<C> {
    pub fn with_clock(clock: C, window_days: i64) -> Self {
        Self { clock, window_days }
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    /// Whole days between now and midnight of the received date, rounded up.
    ///
    /// The difference is absolute, so a received date in the future counts
    /// the same as one in the past.
    pub fn days_since_received(&self, received: NaiveDate) -> i64 {
        let received_at = received.and_time(NaiveTime::MIN);
        let elapsed_ms = (self.clock.now() - received_at).num_milliseconds().abs();
        (elapsed_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }

    pub fn within_return_window(&self, received: NaiveDate) -> bool {
        self.days_since_received(received) <= self.window_days
    }

    /// Check if an item can be returned
    ///
    /// An item is non-returnable if any of:
    /// 1. It is graded Salvage
    /// 2. It is not eligible for resale
    /// 3. It was received outside the return window
    pub fn evaluate(&self, record: &AssessmentRecord) -> EligibilityReport {
        let days_since_received = self.days_since_received(record.received_date);
        let within_return_window = days_since_received <= self.window_days;

        let mut reasons = Vec::new();
        if record.condition.is_salvage() || !record.eligible_for_resale {
            reasons.push(NonReturnableReason::IneligibleCondition);
        }
        if !within_return_window {
            reasons.push(NonReturnableReason::OutsideReturnWindow);
        }

        debug!(
            "Evaluated {} item received {}: {} days ago, reasons={:?}",
            record.condition, record.received_date, days_since_received, reasons
        );

        EligibilityReport {
            eligible_for_resale: record.eligible_for_resale,
            no_repairs_needed: !record.repairs_needed,
            within_return_window,
            days_since_received,
            window_days: self.window_days,
            wardrobing_suspected: record.is_wardrobing,
            reasons,
        }
    }

    pub fn is_non_returnable(&self, record: &AssessmentRecord) -> bool {
        self.evaluate(record).is_non_returnable()
    }

    /// Get a one-line eligibility summary
    pub fn get_eligibility_reason(&self, record: &AssessmentRecord) -> String {
        let report = self.evaluate(record);

        match (
            report.has_reason(NonReturnableReason::IneligibleCondition),
            report.has_reason(NonReturnableReason::OutsideReturnWindow),
        ) {
            (false, false) => "Eligible for return".to_string(),
            (true, false) if record.condition.is_salvage() => {
                "Not returnable: item graded Salvage".to_string()
            }
            (true, false) => "Not returnable: item is not eligible for resale".to_string(),
            (false, true) => format!(
                "Not returnable: received {} days ago (window is {} days)",
                report.days_since_received, self.window_days
            ),
            (true, true) => format!(
                "Not returnable: ineligible condition and received {} days ago",
                report.days_since_received
            ),
        }
    }
}
