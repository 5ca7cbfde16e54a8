use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assessment::actions::RecommendedAction;
use crate::error::{Result, ReturnError};

/// Condition grade assigned by the assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    New,
    UsedLikeNew,
    UsedGood,
    UsedFair,
    /// Worst grade; always disqualifies a return
    Salvage,
    /// Grade text we don't recognize, kept verbatim
    Other(String),
}

impl Condition {
    pub fn is_salvage(&self) -> bool {
        matches!(self, Condition::Salvage)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::New => write!(f, "New"),
            Condition::UsedLikeNew => write!(f, "Used-Like New"),
            Condition::UsedGood => write!(f, "Used-Good"),
            Condition::UsedFair => write!(f, "Used-Fair"),
            Condition::Salvage => write!(f, "Salvage"),
            Condition::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl std::str::FromStr for Condition {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // "Used - Like New", "Used-Like New" and "used like new" all match
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Ok(match key.as_str() {
            "new" => Condition::New,
            "usedlikenew" | "likenew" => Condition::UsedLikeNew,
            "usedgood" | "good" => Condition::UsedGood,
            "usedfair" | "fair" => Condition::UsedFair,
            "salvage" => Condition::Salvage,
            _ => Condition::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(condition) => condition,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Condition {
    fn from(value: &str) -> Self {
        Condition::from(value.to_string())
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        value.to_string()
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| ReturnError::InvalidDate(format!("'{}': {}", raw, e)))
}

/// Product carried through the return flow and encoded into the QR tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub id: String,
    pub price: f64,
    pub ordered: NaiveDate,
    pub received: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_refund_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligible_for_resale: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repairs_needed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_repair: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_wardrobing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_options: Option<Vec<RecommendedAction>>,
}

impl Product {
    pub fn new(name: &str, id: &str, price: f64, ordered: NaiveDate, received: NaiveDate) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            price,
            ordered,
            received,
            condition: None,
            estimated_refund_value: None,
            eligible_for_resale: None,
            repairs_needed: None,
            recommended_action: None,
            recommended_repair: None,
            is_wardrobing: None,
            action_options: None,
        }
    }

    /// Copy assessment results onto the product
    pub fn apply_assessment(&mut self, record: &AssessmentRecord) {
        self.condition = Some(record.condition.clone());
        self.estimated_refund_value = Some(record.estimated_refund_value);
        self.eligible_for_resale = Some(record.eligible_for_resale);
        self.repairs_needed = Some(record.repairs_needed);
        self.is_wardrobing = Some(record.is_wardrobing);
        self.recommended_action = Some(record.recommended_action_raw.clone());
    }

    pub fn is_assessed(&self) -> bool {
        self.condition.is_some()
    }
}

/// One assessed product instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAssessmentRecord")]
pub struct AssessmentRecord {
    pub condition: Condition,
    pub estimated_refund_value: f64,
    pub eligible_for_resale: bool,
    pub repairs_needed: bool,
    pub is_wardrobing: bool,
    pub received_date: NaiveDate,
    #[serde(default)]
    pub recommended_action_raw: String,
}

impl AssessmentRecord {
    /// Resale-eligible record with no repairs, no wardrobing signal and no actions
    pub fn new(condition: Condition, estimated_refund_value: f64, received_date: NaiveDate) -> Result<Self> {
        let record = Self {
            condition,
            estimated_refund_value,
            eligible_for_resale: true,
            repairs_needed: false,
            is_wardrobing: false,
            received_date,
            recommended_action_raw: String::new(),
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<()> {
        if self.estimated_refund_value.is_nan() || self.estimated_refund_value < 0.0 {
            return Err(ReturnError::NegativeRefund(self.estimated_refund_value));
        }
        Ok(())
    }
}

/// Wire shape of a record before the refund invariant is checked
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssessmentRecord {
    condition: Condition,
    estimated_refund_value: f64,
    eligible_for_resale: bool,
    repairs_needed: bool,
    is_wardrobing: bool,
    received_date: NaiveDate,
    #[serde(default)]
    recommended_action_raw: String,
}

impl TryFrom<RawAssessmentRecord> for AssessmentRecord {
    type Error = ReturnError;

    fn try_from(raw: RawAssessmentRecord) -> Result<Self> {
        let record = Self {
            condition: raw.condition,
            estimated_refund_value: raw.estimated_refund_value,
            eligible_for_resale: raw.eligible_for_resale,
            repairs_needed: raw.repairs_needed,
            is_wardrobing: raw.is_wardrobing,
            received_date: raw.received_date,
            recommended_action_raw: raw.recommended_action_raw,
        };
        record.validate()?;
        Ok(record)
    }
}

impl TryFrom<&Product> for AssessmentRecord {
    type Error = ReturnError;

    fn try_from(product: &Product) -> Result<Self> {
        let record = Self {
            condition: product
                .condition
                .clone()
                .ok_or(ReturnError::MissingField("condition"))?,
            estimated_refund_value: product
                .estimated_refund_value
                .ok_or(ReturnError::MissingField("estimatedRefundValue"))?,
            // an unset flag reads as "not eligible", same as the app did
            eligible_for_resale: product.eligible_for_resale.unwrap_or(false),
            repairs_needed: product.repairs_needed.unwrap_or(false),
            is_wardrobing: product.is_wardrobing.unwrap_or(false),
            received_date: product.received,
            recommended_action_raw: product.recommended_action.clone().unwrap_or_default(),
        };
        record.validate()?;
        Ok(record)
    }
}
