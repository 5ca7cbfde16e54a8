use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::UnknownCodePolicy;
use crate::error::{Result, ReturnError};

/// Disposition the assessment can recommend for a returned item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionCode {
    #[serde(rename = "Resell to online platform")]
    ResellOnline,
    #[serde(rename = "Auction to marketplace")]
    Auction,
    #[serde(rename = "Go to SALE section")]
    SaleSection,
    #[serde(rename = "Send to recycle")]
    Recycle,
    #[serde(rename = "Send to landfill")]
    Landfill,
}

impl ActionCode {
    pub const ALL: [ActionCode; 5] = [
        ActionCode::ResellOnline,
        ActionCode::Auction,
        ActionCode::SaleSection,
        ActionCode::Recycle,
        ActionCode::Landfill,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ActionCode::ResellOnline),
            2 => Some(ActionCode::Auction),
            3 => Some(ActionCode::SaleSection),
            4 => Some(ActionCode::Recycle),
            5 => Some(ActionCode::Landfill),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ActionCode::ResellOnline => 1,
            ActionCode::Auction => 2,
            ActionCode::SaleSection => 3,
            ActionCode::Recycle => 4,
            ActionCode::Landfill => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionCode::ResellOnline => "Resell to online platform",
            ActionCode::Auction => "Auction to marketplace",
            ActionCode::SaleSection => "Go to SALE section",
            ActionCode::Recycle => "Send to recycle",
            ActionCode::Landfill => "Send to landfill",
        }
    }
}

impl std::fmt::Display for ActionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Decoded entry of a recommended-action list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedAction {
    #[serde(rename = "action")]
    pub code: ActionCode,
    pub value: f64,
}

impl RecommendedAction {
    pub fn new(code: ActionCode, value: f64) -> Self {
        Self { code, value }
    }

    pub fn label(&self) -> &'static str {
        self.code.label()
    }
}

/// Decoder for `"<code>,<value>|<code>,<value>|..."` action lists
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionDecoder {
    policy: UnknownCodePolicy,
}

impl ActionDecoder {
    pub fn new(policy: UnknownCodePolicy) -> Self {
        Self { policy }
    }

    /// Decode an action list, preserving segment order.
    ///
    /// Empty segments (a trailing `|`) are ignored, so blank input or bare
    /// pipes decode to an empty list, with a warning. Malformed segments and non-finite values are errors;
    /// unknown codes follow the configured policy.
    pub fn decode(&self, raw: &str) -> Result<Vec<RecommendedAction>> {
        let mut actions = Vec::new();

        for segment in raw.split('|').map(str::trim) {
            if segment.is_empty() {
                continue;
            }

            let (code_raw, value_raw) = segment
                .split_once(',')
                .ok_or_else(|| ReturnError::MalformedSegment(segment.to_string()))?;
            let (code_raw, value_raw) = (code_raw.trim(), value_raw.trim());

            let code: i64 = code_raw.parse().map_err(|_| ReturnError::InvalidActionCode {
                segment: segment.to_string(),
                code: code_raw.to_string(),
            })?;

            let value: f64 = value_raw
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .ok_or_else(|| ReturnError::InvalidActionValue {
                    segment: segment.to_string(),
                    value: value_raw.to_string(),
                })?;

            match ActionCode::from_code(code) {
                Some(action) => actions.push(RecommendedAction::new(action, value)),
                None => match self.policy {
                    UnknownCodePolicy::Reject => return Err(ReturnError::UnknownActionCode(code)),
                    UnknownCodePolicy::Skip => {
                        warn!("Skipping unknown action code {} in segment '{}'", code, segment);
                    }
                },
            }
        }

        if actions.is_empty() {
            warn!("No recommended actions in '{}'", raw.trim());
        } else {
            debug!("Decoded {} recommended actions", actions.len());
        }
        Ok(actions)
    }
}

/// Decode with the default (rejecting) policy
pub fn decode_actions(raw: &str) -> Result<Vec<RecommendedAction>> {
    ActionDecoder::default().decode(raw)
}
