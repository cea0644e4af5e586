//! Desk views
//!
//! Each desk is a small form plus a deterministic formula. Computing a desk
//! never touches the network; asking the advisor is a separate, optional step.

mod fx;
mod investment;
mod macro_strategy;
mod risk;
mod trade;

pub use fx::FxDealingDesk;
pub use investment::InvestmentDesk;
pub use macro_strategy::MacroStrategyDesk;
pub use risk::RiskManagementDesk;
pub use trade::TradeFinanceDesk;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::advisor::{AdvisoryRequest, AdvisoryResponse, Advisor, MacroScenario};
use crate::error::AdvisorError;
use crate::navigation::Desk;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Text,
}

/// One form input of a desk.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub default: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn number(name: &'static str, label: &'static str, default: &'static str) -> Self {
        Self {
            name,
            label,
            default,
            kind: FieldKind::Number,
        }
    }

    pub const fn text(name: &'static str, label: &'static str, default: &'static str) -> Self {
        Self {
            name,
            label,
            default,
            kind: FieldKind::Text,
        }
    }
}

/// Raw form fields as submitted.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DeskInput {
    fields: HashMap<String, String>,
}

/// JSON bodies may send numbers and booleans; they are kept as their text.
impl<'de> Deserialize<'de> for DeskInput {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, Value>::deserialize(deserializer)?;
        let mut fields = HashMap::with_capacity(raw.len());

        for (name, value) in raw {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                other => {
                    return Err(de::Error::custom(format!(
                        "field '{}' must be a string, number or boolean, got {}",
                        name, other
                    )))
                }
            };
            fields.insert(name, text);
        }

        Ok(Self { fields })
    }
}

impl DeskInput {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn raw(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Value to show in the form: what the user typed, else the default.
    pub fn display_value(&self, spec: &FieldSpec) -> String {
        self.raw(spec.name).unwrap_or(spec.default).to_string()
    }

    /// Parse a numeric field; accepts `,` grouping. Missing -> default.
    pub fn number(&self, spec: &FieldSpec) -> Result<f64> {
        let raw = self.raw(spec.name).unwrap_or(spec.default);
        let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();

        cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                AdvisorError::InvalidInput(format!("{}: '{}' không phải là số hợp lệ", spec.label, raw))
            })
    }

    pub fn non_negative(&self, spec: &FieldSpec) -> Result<f64> {
        let value = self.number(spec)?;
        if value < 0.0 {
            return Err(AdvisorError::InvalidInput(format!(
                "{}: giá trị không được âm",
                spec.label
            )));
        }
        Ok(value)
    }

    pub fn text(&self, spec: &FieldSpec) -> String {
        self.display_value(spec)
    }

    /// Whether the user ticked "ask the AI advisor".
    pub fn ask_ai(&self) -> bool {
        self.raw("ask_ai")
            .map(|v| matches!(v.to_lowercase().as_str(), "on" | "true" | "1" | "yes"))
            .unwrap_or(false)
    }
}

/// A computed figure shown on the desk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Which advisory variant a desk hands its results to.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvisoryCall {
    General(AdvisoryRequest),
    Macro(MacroScenario),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeskOutcome {
    pub metrics: Vec<Metric>,
    /// Results pre-formatted for the advisor.
    pub context_data: String,
    pub advisory: AdvisoryCall,
}

/// Result of one render pass of a desk.
#[derive(Debug, Clone, Serialize)]
pub struct DeskReport {
    pub desk: Desk,
    pub metrics: Vec<Metric>,
    pub advice: Option<AdvisoryResponse>,
}

/// A business desk: form fields and formula.
pub trait DeskView: Send + Sync {
    fn desk(&self) -> Desk;
    fn description(&self) -> &'static str;
    fn fields(&self) -> &'static [FieldSpec];
    fn compute(&self, input: &DeskInput) -> Result<DeskOutcome>;
}

/// Desk lookup by navigation selection
pub struct DeskRegistry {
    desks: HashMap<Desk, Arc<dyn DeskView>>,
}

impl DeskRegistry {
    pub fn new() -> Self {
        Self {
            desks: HashMap::new(),
        }
    }

    pub fn register(&mut self, view: Arc<dyn DeskView>) {
        self.desks.insert(view.desk(), view);
    }

    pub fn get(&self, desk: Desk) -> Option<Arc<dyn DeskView>> {
        self.desks.get(&desk).cloned()
    }

    pub fn require(&self, desk: Desk) -> Result<Arc<dyn DeskView>> {
        self.get(desk)
            .ok_or_else(|| AdvisorError::UnknownDesk(desk.slug().to_string()))
    }

    /// Registered desks in sidebar order.
    pub fn list(&self) -> Vec<Desk> {
        Desk::ALL
            .into_iter()
            .filter(|d| self.desks.contains_key(d))
            .collect()
    }
}

impl Default for DeskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with all five desks.
pub fn create_default_registry() -> DeskRegistry {
    let mut registry = DeskRegistry::new();

    registry.register(Arc::new(FxDealingDesk));
    registry.register(Arc::new(RiskManagementDesk));
    registry.register(Arc::new(TradeFinanceDesk));
    registry.register(Arc::new(InvestmentDesk));
    registry.register(Arc::new(MacroStrategyDesk));

    registry
}

/// Compute a desk and, when requested, ask the advisor about the result.
pub async fn run_desk(view: &dyn DeskView, input: &DeskInput, advisor: &Advisor) -> Result<DeskReport> {
    let outcome = view.compute(input)?;

    let advice = if input.ask_ai() {
        info!(desk = view.desk().slug(), "Requesting advisory");
        let response = match &outcome.advisory {
            AdvisoryCall::General(request) => advisor.ask_request(request).await,
            AdvisoryCall::Macro(scenario) => advisor.ask_macro_advisor(scenario).await,
        };
        Some(response)
    } else {
        None
    };

    Ok(DeskReport {
        desk: view.desk(),
        metrics: outcome.metrics,
        advice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::testing::StubModel;

    const AMOUNT: FieldSpec = FieldSpec::number("amount", "Số tiền", "1,000");

    #[test]
    fn test_number_parsing() {
        let input = DeskInput::default();
        assert_eq!(input.number(&AMOUNT).unwrap(), 1000.0);

        let input = DeskInput::default().with("amount", " 2,500.5 ");
        assert_eq!(input.number(&AMOUNT).unwrap(), 2500.5);

        let input = DeskInput::default().with("amount", "abc");
        assert!(matches!(input.number(&AMOUNT), Err(AdvisorError::InvalidInput(_))));

        let input = DeskInput::default().with("amount", "-5");
        assert!(input.non_negative(&AMOUNT).is_err());

        let input = DeskInput::default().with("amount", "inf");
        assert!(input.number(&AMOUNT).is_err());
    }

    #[test]
    fn test_json_numbers_and_bools_are_accepted() {
        let input: DeskInput = serde_json::from_value(serde_json::json!({
            "amount": 2500,
            "rate": 24000.5,
            "ask_ai": true,
            "note": null,
            "label": "x"
        }))
        .unwrap();

        assert_eq!(input.number(&AMOUNT).unwrap(), 2500.0);
        assert_eq!(input.raw("rate"), Some("24000.5"));
        assert!(input.ask_ai());
        assert_eq!(input.raw("note"), None);
        assert_eq!(input.raw("label"), Some("x"));

        let nested = serde_json::from_value::<DeskInput>(serde_json::json!({ "amount": [1, 2] }));
        assert!(nested.is_err());
    }

    #[test]
    fn test_ask_ai_flag() {
        assert!(!DeskInput::default().ask_ai());
        assert!(DeskInput::default().with("ask_ai", "on").ask_ai());
        assert!(!DeskInput::default().with("ask_ai", "off").ask_ai());
    }

    #[test]
    fn test_registry_has_every_desk() {
        let registry = create_default_registry();
        assert_eq!(registry.list(), Desk::ALL.to_vec());
        for desk in Desk::ALL {
            let view = registry.require(desk).unwrap();
            assert_eq!(view.desk(), desk);
            assert!(!view.fields().is_empty());
            // defaults alone must produce a result
            assert!(view.compute(&DeskInput::default()).is_ok());
        }
    }

    #[tokio::test]
    async fn test_run_desk_skips_advisor_unless_asked() {
        let stub = Arc::new(StubModel::answering("Khuyến nghị"));
        let advisor = Advisor::new(stub.clone());

        let report = run_desk(&FxDealingDesk, &DeskInput::default(), &advisor)
            .await
            .unwrap();
        assert!(report.advice.is_none());
        assert_eq!(stub.calls(), 0);

        let input = DeskInput::default().with("ask_ai", "on");
        let report = run_desk(&FxDealingDesk, &input, &advisor).await.unwrap();
        assert_eq!(report.advice.unwrap().text(), "Khuyến nghị");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_macro_desk_goes_through_macro_advisor() {
        let stub = Arc::new(StubModel::answering("Báo cáo"));
        let advisor = Advisor::new(stub.clone());

        let input = DeskInput::default()
            .with("rate", "22,727.27")
            .with("shock_percent", "10")
            .with("ask_ai", "on");
        run_desk(&MacroStrategyDesk, &input, &advisor).await.unwrap();

        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].contains("mất giá: 10% "));
        assert!(prompts[0].contains("25,000 VND/USD"));
    }
}
