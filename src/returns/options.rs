use serde::Serialize;

/// Carrier or store where a returnable item can be dropped off
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropOffOption {
    pub id: &'static str,
    pub name: &'static str,
    /// Fee in dollars, `None` when free
    pub fee: Option<f64>,
}

impl DropOffOption {
    pub fn price_label(&self) -> String {
        match self.fee {
            Some(fee) => format!("${:.2}", fee),
            None => "FREE".to_string(),
        }
    }
}

pub static DROP_OFF_OPTIONS: [DropOffOption; 3] = [
    DropOffOption {
        id: "canada-post",
        name: "Canada Post Drop-off",
        fee: Some(19.99),
    },
    DropOffOption {
        id: "staples",
        name: "Staples",
        fee: None,
    },
    DropOffOption {
        id: "purolator",
        name: "Purolator",
        fee: None,
    },
];

pub fn find_drop_off(id: &str) -> Option<&'static DropOffOption> {
    DROP_OFF_OPTIONS.iter().find(|option| option.id == id)
}
