use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assessment::actions::{ActionDecoder, RecommendedAction};
use crate::assessment::types::{AssessmentRecord, Condition, Product};
use crate::error::{Result, ReturnError};

const UPSTREAM_ERROR_PREFIX: &str = "Error:";

/// Parsed `"<condition>,<value>"` grading result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grading {
    pub condition: Condition,
    pub estimated_value: f64,
}

/// Parsed `"YES,<explanation>"` / `"NO,<explanation>"` repair result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairRecommendation {
    pub needed: bool,
    pub explanation: String,
}

fn check_upstream(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if let Some(details) = trimmed.strip_prefix(UPSTREAM_ERROR_PREFIX) {
        return Err(ReturnError::Upstream(details.trim().to_string()));
    }
    Ok(trimmed)
}

pub fn parse_grading(raw: &str) -> Result<Grading> {
    let text = check_upstream(raw)?;

    let (condition, value) = text
        .rsplit_once(',')
        .ok_or_else(|| ReturnError::InvalidGrading(text.to_string()))?;

    let condition = condition.trim();
    if condition.is_empty() {
        return Err(ReturnError::InvalidGrading(text.to_string()));
    }

    let estimated_value: f64 = value
        .trim()
        .trim_start_matches('$')
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| ReturnError::InvalidGrading(text.to_string()))?;

    Ok(Grading {
        condition: condition.into(),
        estimated_value,
    })
}

pub fn parse_repair(raw: &str) -> Result<RepairRecommendation> {
    let text = check_upstream(raw)?;

    let (verdict, explanation) = match text.split_once(',') {
        Some((verdict, explanation)) => (verdict.trim(), explanation.trim()),
        None => (text, ""),
    };

    let needed = match verdict.to_ascii_uppercase().as_str() {
        "YES" => true,
        "NO" => false,
        _ => return Err(ReturnError::InvalidGrading(text.to_string())),
    };

    Ok(RepairRecommendation {
        needed,
        explanation: explanation.to_string(),
    })
}

/// Everything the assessment service produced for one product
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentResult {
    pub record: AssessmentRecord,
    pub actions: Vec<RecommendedAction>,
    pub repair: Option<RepairRecommendation>,
}

impl AssessmentResult {
    pub fn apply_to(&self, product: &mut Product) {
        product.apply_assessment(&self.record);
        product.action_options = Some(self.actions.clone());
        product.recommended_repair = self
            .repair
            .as_ref()
            .filter(|r| r.needed)
            .map(|r| r.explanation.clone());
    }
}

/// Combine the raw grading, action and repair strings into an assessment
pub fn assemble(
    decoder: &ActionDecoder,
    grading: &str,
    actions: Option<&str>,
    repair: Option<&str>,
    received_date: NaiveDate,
    eligible_for_resale: bool,
) -> Result<AssessmentResult> {
    let grading = parse_grading(grading)?;
    let action_raw = actions.unwrap_or_default().trim().to_string();
    let decoded = decoder.decode(&action_raw)?;
    let repair = repair.map(parse_repair).transpose()?;

    let mut record = AssessmentRecord::new(grading.condition, grading.estimated_value, received_date)?;
    record.eligible_for_resale = eligible_for_resale;
    record.repairs_needed = repair.as_ref().map(|r| r.needed).unwrap_or(false);
    record.recommended_action_raw = action_raw;

    debug!(
        "Assembled assessment: condition={}, value={}, actions={}",
        record.condition,
        record.estimated_refund_value,
        decoded.len()
    );

    Ok(AssessmentResult {
        record,
        actions: decoded,
        repair,
    })
}
