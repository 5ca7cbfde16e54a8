use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use tracing::{debug, info};

use crate::{
    config::WardrobingConfig,
    error::{Result, ReturnError},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Paypal,
    Crypto,
}

/// Purchase and return history of one customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerHistory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub ip: String,
    pub amount_returned: f64,
    pub amount_bought: f64,
    pub products_bought: u32,
    pub products_returned: u32,
    #[serde(default)]
    pub num_failed_attempts: u32,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl CustomerHistory {
    /// Share of purchase volume that came back, or 0 with no purchases
    pub fn return_rate(&self) -> f64 {
        if self.products_bought == 0 || self.amount_bought <= 0.0 {
            return 0.0;
        }
        (self.products_returned as f64 * self.amount_returned)
            / (self.products_bought as f64 * self.amount_bought)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "signal", content = "value", rename_all = "snake_case")]
pub enum WardrobingSignal {
    HighReturnAmount(f64),
    RepeatedFailedAttempts(u32),
    HighReturnRate(f64),
    HighRiskIp(Ipv4Addr),
}

impl std::fmt::Display for WardrobingSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WardrobingSignal::HighReturnAmount(amount) => write!(f, "High return amount (${:.2})", amount),
            WardrobingSignal::RepeatedFailedAttempts(n) => write!(f, "{} failed attempts", n),
            WardrobingSignal::HighReturnRate(rate) => write!(f, "Return rate {:.0}%", rate * 100.0),
            WardrobingSignal::HighRiskIp(ip) => write!(f, "IP {} in high-risk range", ip),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardrobingAssessment {
    pub suspected: bool,
    pub return_rate: f64,
    pub signals: Vec<WardrobingSignal>,
}

/// Rule-based check for buy-use-return abuse
pub struct WardrobingDetector {
    config: WardrobingConfig,
    ranges: Vec<(Ipv4Addr, Ipv4Addr)>,
}

impl WardrobingDetector {
    pub fn new(config: &WardrobingConfig) -> Result<Self> {
        let ranges = config
            .high_risk_ranges
            .iter()
            .map(|range| range.bounds().map_err(|e| ReturnError::Config(e.to_string())))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config: config.clone(),
            ranges,
        })
    }

    pub fn is_high_risk_ip(&self, ip: Ipv4Addr) -> bool {
        self.ranges.iter().any(|(start, end)| *start <= ip && ip <= *end)
    }

    /// Flag a customer when any signal fires:
    /// 1. Returned amount above the limit
    /// 2. Too many failed attempts
    /// 3. Return rate above the limit
    /// 4. IP inside a high-risk range
    pub fn assess(&self, history: &CustomerHistory) -> Result<WardrobingAssessment> {
        let ip: Ipv4Addr = history
            .ip
            .trim()
            .parse()
            .map_err(|_| ReturnError::InvalidIp(history.ip.clone()))?;

        let return_rate = history.return_rate();
        let mut signals = Vec::new();

        if history.amount_returned > self.config.max_amount {
            signals.push(WardrobingSignal::HighReturnAmount(history.amount_returned));
        }
        if history.num_failed_attempts > self.config.max_failed_attempts {
            signals.push(WardrobingSignal::RepeatedFailedAttempts(history.num_failed_attempts));
        }
        if return_rate > self.config.max_return_rate {
            signals.push(WardrobingSignal::HighReturnRate(return_rate));
        }
        if self.is_high_risk_ip(ip) {
            signals.push(WardrobingSignal::HighRiskIp(ip));
        }

        let suspected = !signals.is_empty();
        if suspected {
            info!("Wardrobing suspected for {}: {} signal(s)", ip, signals.len());
        } else {
            debug!("No wardrobing signals for {} (return rate {:.3})", ip, return_rate);
        }

        Ok(WardrobingAssessment {
            suspected,
            return_rate,
            signals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> WardrobingDetector {
        WardrobingDetector::new(&WardrobingConfig::default()).unwrap()
    }

    fn history(ip: &str) -> CustomerHistory {
        CustomerHistory {
            name: Some("John Doe".to_string()),
            email: None,
            ip: ip.to_string(),
            amount_returned: 10.0,
            amount_bought: 200.0,
            products_bought: 5,
            products_returned: 1,
            num_failed_attempts: 0,
            payment_method: PaymentMethod::CreditCard,
        }
    }

    #[test]
    fn test_return_rate() {
        assert!((history("8.8.8.8").return_rate() - 0.01).abs() < 1e-12);

        let mut none_bought = history("8.8.8.8");
        none_bought.products_bought = 0;
        assert_eq!(none_bought.return_rate(), 0.0);
    }

    #[test]
    fn test_clean_customer() {
        let result = detector().assess(&history("8.8.8.8")).unwrap();
        assert!(!result.suspected);
        assert!(result.signals.is_empty());
    }

    #[test]
    fn test_high_risk_ip() {
        let result = detector().assess(&history("45.134.56.0")).unwrap();
        assert!(result.suspected);
        assert_eq!(
            result.signals,
            vec![WardrobingSignal::HighRiskIp(Ipv4Addr::new(45, 134, 56, 0))]
        );
        assert!(detector().is_high_risk_ip(Ipv4Addr::new(203, 0, 113, 255)));
        assert!(!detector().is_high_risk_ip(Ipv4Addr::new(203, 0, 114, 0)));
    }

    #[test]
    fn test_thresholds_are_strict() {
        let mut customer = history("8.8.8.8");
        customer.amount_bought = 10_000.0;
        customer.amount_returned = 1000.0;
        customer.num_failed_attempts = 3;
        assert!(!detector().assess(&customer).unwrap().suspected);

        customer.amount_returned = 1000.01;
        customer.num_failed_attempts = 4;
        let result = detector().assess(&customer).unwrap();
        assert!(result.signals.contains(&WardrobingSignal::HighReturnAmount(1000.01)));
        assert!(result.signals.contains(&WardrobingSignal::RepeatedFailedAttempts(4)));
    }

    #[test]
    fn test_return_rate_threshold_is_strict() {
        let mut customer = history("8.8.8.8");
        customer.products_bought = 10;
        customer.products_returned = 7;
        customer.amount_bought = 100.0;
        customer.amount_returned = 100.0;
        let result = detector().assess(&customer).unwrap();
        assert_eq!(result.return_rate, 0.7);
        assert!(!result.suspected);

        customer.products_returned = 8;
        let result = detector().assess(&customer).unwrap();
        assert!(result.suspected);
        assert_eq!(result.signals, vec![WardrobingSignal::HighReturnRate(0.8)]);
    }

    #[test]
    fn test_high_return_rate() {
        let mut customer = history("8.8.8.8");
        customer.products_bought = 2;
        customer.products_returned = 2;
        customer.amount_bought = 100.0;
        customer.amount_returned = 90.0;
        let result = detector().assess(&customer).unwrap();
        assert_eq!(result.signals, vec![WardrobingSignal::HighReturnRate(0.9)]);
    }

    #[test]
    fn test_invalid_ip() {
        assert!(matches!(
            detector().assess(&history("999.1.1.1")),
            Err(ReturnError::InvalidIp(_))
        ));
    }

    #[test]
    fn test_history_from_json() {
        let customer: CustomerHistory = serde_json::from_str(
            r#"{"ip":"10.0.0.1","amountReturned":10,"amountBought":200,
                "productsBought":5,"productsReturned":1,"paymentMethod":"paypal"}"#,
        )
        .unwrap();
        assert_eq!(customer.payment_method, PaymentMethod::Paypal);
        assert_eq!(customer.num_failed_attempts, 0);
    }
}
