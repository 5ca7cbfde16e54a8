use tracing::{debug, warn};

use crate::assessment::actions::{ActionCode, ActionDecoder, RecommendedAction};
use crate::assessment::types::Product;
use crate::error::Result;

/// Options offered at the counter when a scanned tag carries none
pub fn default_action_options() -> Vec<RecommendedAction> {
    vec![
        RecommendedAction::new(ActionCode::ResellOnline, 140.0),
        RecommendedAction::new(ActionCode::Auction, 125.0),
        RecommendedAction::new(ActionCode::SaleSection, 75.0),
        RecommendedAction::new(ActionCode::Landfill, 0.0),
    ]
}

/// Serialize a product into the compact JSON carried by the QR tag
pub fn encode(product: &Product) -> Result<String> {
    Ok(serde_json::to_string(product)?)
}

/// Parse a QR tag back into a product
pub fn decode(text: &str) -> Result<Product> {
    let product: Product = serde_json::from_str(text.trim())?;
    debug!("Decoded tag for product {} ({})", product.name, product.id);
    Ok(product)
}

/// Decode a scanned tag and make sure it carries action options.
///
/// Options on the tag win; otherwise the raw recommended-action list is
/// decoded; otherwise the counter defaults are used. Only the JSON itself
/// must be valid: an undecodable action string falls back to the defaults.
pub fn scan(text: &str, decoder: &ActionDecoder) -> Result<Product> {
    let mut product = decode(text)?;

    let has_options = product
        .action_options
        .as_ref()
        .map(|options| !options.is_empty())
        .unwrap_or(false);

    if !has_options {
        let decoded = match product.recommended_action.as_deref() {
            Some(raw) => decoder.decode(raw).unwrap_or_else(|e| {
                warn!("Could not decode recommended actions on tag {}: {}", product.id, e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        if decoded.is_empty() {
            warn!("Tag for {} has no recommended actions, using defaults", product.id);
            product.action_options = Some(default_action_options());
        } else {
            product.action_options = Some(decoded);
        }
    }

    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::types::{parse_date, Condition};
    use crate::error::ReturnError;

    fn sample_product() -> Product {
        let mut product = Product::new(
            "Product C",
            "789",
            299.99,
            parse_date("2025-03-05").unwrap(),
            parse_date("2025-03-07").unwrap(),
        );
        product.condition = Some(Condition::UsedGood);
        product.estimated_refund_value = Some(120.0);
        product.eligible_for_resale = Some(true);
        product
    }

    #[test]
    fn test_encode_uses_camel_case() {
        let text = encode(&sample_product()).unwrap();
        assert!(text.contains("\"estimatedRefundValue\":120.0"));
        assert!(text.contains("\"received\":\"2025-03-07\""));
        assert!(text.contains("\"condition\":\"Used-Good\""));
        assert!(!text.contains("recommendedRepair"));
        assert_eq!(decode(&text).unwrap(), sample_product());
    }

    #[test]
    fn test_decode_app_payload() {
        let text = r#"{"name":"Product A","id":"123","price":99.99,"ordered":"2025-03-05",
            "received":"2025-03-05","condition":"Used - Like New","estimatedRefundValue":99,
            "eligibleForResale":true,"repairsNeeded":false,"recommendedAction":"1,90|2,70"}"#;
        let product = decode(text).unwrap();
        assert_eq!(product.condition, Some(Condition::UsedLikeNew));
        assert_eq!(product.recommended_action.as_deref(), Some("1,90|2,70"));
    }

    #[test]
    fn test_decode_garbage_is_error() {
        assert!(matches!(decode("not json"), Err(ReturnError::JsonError(_))));
        assert!(matches!(decode("{\"name\":\"x\"}"), Err(ReturnError::JsonError(_))));
    }

    #[test]
    fn test_scan_falls_back_to_defaults() {
        let text = encode(&sample_product()).unwrap();
        let product = scan(&text, &ActionDecoder::default()).unwrap();
        let options = product.action_options.unwrap();
        assert_eq!(options, default_action_options());
        assert_eq!(options[0].label(), "Resell to online platform");
    }

    #[test]
    fn test_scan_decodes_raw_actions() {
        let mut product = sample_product();
        product.recommended_action = Some("3,75|5,0".to_string());
        let scanned = scan(&encode(&product).unwrap(), &ActionDecoder::default()).unwrap();
        let options = scanned.action_options.unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].code, ActionCode::SaleSection);
    }

    #[test]
    fn test_scan_tolerates_placeholder_actions() {
        let text = r#"{"name":"Product A","id":"123","price":99.99,"ordered":"2025-03-05",
            "received":"2025-03-05","condition":"New","estimatedRefundValue":90,
            "eligibleForResale":true,"repairsNeeded":false,"recommendedAction":"HELLO"}"#;
        let product = scan(text, &ActionDecoder::default()).unwrap();
        assert_eq!(product.recommended_action.as_deref(), Some("HELLO"));
        assert_eq!(product.action_options, Some(default_action_options()));
    }

    #[test]
    fn test_scan_unknown_code_uses_defaults() {
        let mut product = sample_product();
        product.recommended_action = Some("9,10".to_string());
        let scanned = scan(&encode(&product).unwrap(), &ActionDecoder::default()).unwrap();
        assert_eq!(scanned.action_options, Some(default_action_options()));
    }

    #[test]
    fn test_scan_keeps_existing_options() {
        let mut product = sample_product();
        product.recommended_action = Some("1,1".to_string());
        product.action_options = Some(vec![RecommendedAction::new(ActionCode::Recycle, 4.0)]);
        let scanned = scan(&encode(&product).unwrap(), &ActionDecoder::default()).unwrap();
        assert_eq!(
            scanned.action_options,
            Some(vec![RecommendedAction::new(ActionCode::Recycle, 4.0)])
        );
    }
}
