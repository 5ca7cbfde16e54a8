use tracing::{debug, info};

use crate::{
    assessment::{actions::RecommendedAction, grading::AssessmentResult, types::Product},
    error::{Result, ReturnError},
    returns::options::{find_drop_off, DropOffOption},
};

/// State of one customer or counter return flow.
///
/// Holds the product being returned plus the choices made so far. Passed
/// explicitly to whatever needs it; dropped when the flow ends.
#[derive(Debug, Default)]
pub struct ReturnSession {
    product: Option<Product>,
    selected_action: Option<RecommendedAction>,
    drop_off: Option<&'static DropOffOption>,
}

impl ReturnSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over with a new product
    pub fn select_product(&mut self, product: Product) {
        info!("Selected product {} ({})", product.name, product.id);
        self.product = Some(product);
        self.selected_action = None;
        self.drop_off = None;
    }

    pub fn current(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn apply_assessment(&mut self, result: &AssessmentResult) -> Result<&Product> {
        let product = self.product.as_mut().ok_or(ReturnError::NoProductSelected)?;
        result.apply_to(product);
        debug!("Applied assessment to {}", product.id);
        Ok(product)
    }

    /// Pick one of the product's action options by position
    pub fn select_action(&mut self, index: usize) -> Result<&RecommendedAction> {
        let product = self.product.as_ref().ok_or(ReturnError::NoProductSelected)?;
        let options = product.action_options.as_deref().unwrap_or_default();

        let action = options.get(index).cloned().ok_or_else(|| {
            ReturnError::InvalidSelection(format!(
                "action #{} (product has {} options)",
                index + 1,
                options.len()
            ))
        })?;

        info!("Selected action '{}' for {}", action.label(), product.id);
        Ok(self.selected_action.insert(action))
    }

    pub fn selected_action(&self) -> Option<&RecommendedAction> {
        self.selected_action.as_ref()
    }

    pub fn select_drop_off(&mut self, id: &str) -> Result<&'static DropOffOption> {
        if self.product.is_none() {
            return Err(ReturnError::NoProductSelected);
        }
        let option = find_drop_off(id)
            .ok_or_else(|| ReturnError::InvalidSelection(format!("drop-off '{}'", id)))?;
        self.drop_off = Some(option);
        Ok(option)
    }

    pub fn drop_off(&self) -> Option<&'static DropOffOption> {
        self.drop_off
    }

    /// End the flow, handing back the product if there was one
    pub fn finish(&mut self) -> Option<Product> {
        self.selected_action = None;
        self.drop_off = None;
        self.product.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{actions::ActionDecoder, grading::assemble, types::parse_date};

    fn product() -> Product {
        let date = parse_date("2025-03-05").unwrap();
        Product::new("Product A", "123", 99.99, date, date)
    }

    fn result() -> AssessmentResult {
        assemble(
            &ActionDecoder::default(),
            "Used - Good,80",
            Some("1,140|3,75|5,0"),
            None,
            parse_date("2025-03-05").unwrap(),
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_assessment_requires_product() {
        let mut session = ReturnSession::new();
        assert!(matches!(
            session.apply_assessment(&result()),
            Err(ReturnError::NoProductSelected)
        ));
        assert!(matches!(session.select_action(0), Err(ReturnError::NoProductSelected)));
    }

    #[test]
    fn test_full_flow() {
        let mut session = ReturnSession::new();
        session.select_product(product());
        assert!(!session.current().unwrap().is_assessed());

        let assessed = session.apply_assessment(&result()).unwrap();
        assert!(assessed.is_assessed());

        let action = session.select_action(1).unwrap();
        assert_eq!(action.label(), "Go to SALE section");
        assert_eq!(action.value, 75.0);

        assert!(matches!(session.select_action(3), Err(ReturnError::InvalidSelection(_))));
        assert_eq!(session.selected_action().map(|a| a.value), Some(75.0));

        assert_eq!(session.select_drop_off("staples").unwrap().name, "Staples");
        assert!(session.select_drop_off("ups").is_err());

        let finished = session.finish().unwrap();
        assert_eq!(finished.id, "123");
        assert!(session.current().is_none());
        assert!(session.drop_off().is_none());
    }

    #[test]
    fn test_selecting_new_product_resets_choices() {
        let mut session = ReturnSession::new();
        session.select_product(product());
        session.apply_assessment(&result()).unwrap();
        session.select_action(0).unwrap();

        session.select_product(product());
        assert!(session.selected_action().is_none());
        assert!(session.current().unwrap().action_options.is_none());
    }
}
