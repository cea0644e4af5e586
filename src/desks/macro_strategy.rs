use crate::advisor::format::{format_percent, format_rate, format_vnd_billions, group_thousands};
use crate::advisor::MacroScenario;
use crate::error::AdvisorError;
use crate::navigation::Desk;
use crate::Result;

use super::{AdvisoryCall, DeskInput, DeskOutcome, DeskView, FieldSpec, Metric};

const FOREIGN_DEBT: FieldSpec = FieldSpec::number("foreign_debt", "Nợ nước ngoài (triệu USD)", "50,000");
const RATE: FieldSpec = FieldSpec::number("rate", "Tỷ giá hiện tại (VND/USD)", "24,000");
const SHOCK: FieldSpec = FieldSpec::number("shock_percent", "Mức mất giá của VND (%)", "10");

const FIELDS: &[FieldSpec] = &[FOREIGN_DEBT, RATE, SHOCK];

/// Exchange-rate shock on USD-denominated public debt.
pub struct MacroStrategyDesk;

impl DeskView for MacroStrategyDesk {
    fn desk(&self) -> Desk {
        Desk::Macro
    }

    fn description(&self) -> &'static str {
        "Mô phỏng cú sốc tỷ giá: nợ nước ngoài quy đổi tăng thêm bao nhiêu khi VND mất giá."
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn compute(&self, input: &DeskInput) -> Result<DeskOutcome> {
        let debt_musd = input.non_negative(&FOREIGN_DEBT)?;
        let rate = input.non_negative(&RATE)?;
        let shock = input.number(&SHOCK)?;

        if shock <= -100.0 {
            return Err(AdvisorError::InvalidInput(format!(
                "{}: phải lớn hơn -100%",
                SHOCK.label
            )));
        }

        let new_rate = rate * (1.0 + shock / 100.0);
        // million USD × VND/USD = million VND; /1000 -> billion VND
        let debt_increase = debt_musd * (new_rate - rate) / 1000.0;

        if !new_rate.is_finite() || !debt_increase.is_finite() {
            return Err(AdvisorError::InvalidInput(
                "Kết quả vượt quá giới hạn tính toán, hãy giảm nợ, tỷ giá hoặc mức mất giá".to_string(),
            ));
        }

        let scenario = MacroScenario {
            debt_increase,
            shock_percent: shock,
            new_rate,
        };

        let metrics = vec![
            Metric::new("Tỷ giá sau cú sốc", format_rate(new_rate)),
            Metric::new("Nợ công tăng thêm", format_vnd_billions(debt_increase)),
        ];

        let context_data = format!(
            "Nợ nước ngoài: {} triệu USD; tỷ giá: {} -> {}; mất giá: {}; nợ công tăng thêm: {}.",
            group_thousands(debt_musd),
            format_rate(rate),
            format_rate(new_rate),
            format_percent(shock),
            format_vnd_billions(debt_increase),
        );

        Ok(DeskOutcome {
            metrics,
            context_data,
            advisory: AdvisoryCall::Macro(scenario),
        })
    }
}
