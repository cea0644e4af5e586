use crate::advisor::format::{format_percent, group_decimal, group_thousands};
use crate::advisor::AdvisoryRequest;
use crate::error::AdvisorError;
use crate::navigation::Desk;
use crate::Result;

use super::{AdvisoryCall, DeskInput, DeskOutcome, DeskView, FieldSpec, Metric};

const EXPOSURE: FieldSpec = FieldSpec::number("exposure", "Dư nợ tại thời điểm vỡ nợ - EAD (tỷ VND)", "1,000");
const PD: FieldSpec = FieldSpec::number("pd_percent", "Xác suất vỡ nợ - PD (%)", "2");
const LGD: FieldSpec = FieldSpec::number("lgd_percent", "Tỷ lệ tổn thất khi vỡ nợ - LGD (%)", "45");

const FIELDS: &[FieldSpec] = &[EXPOSURE, PD, LGD];

/// Minimum capital held against the exposure.
const CAPITAL_RATIO: f64 = 0.08;

pub struct RiskManagementDesk;

fn percent_in_range(input: &DeskInput, spec: &FieldSpec) -> Result<f64> {
    let value = input.number(spec)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(AdvisorError::InvalidInput(format!(
            "{}: phải nằm trong khoảng 0-100",
            spec.label
        )));
    }
    Ok(value)
}

impl DeskView for RiskManagementDesk {
    fn desk(&self) -> Desk {
        Desk::Risk
    }

    fn description(&self) -> &'static str {
        "Ước tính tổn thất dự kiến (EL = EAD × PD × LGD) và vốn tối thiểu cho một khoản cấp tín dụng."
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn compute(&self, input: &DeskInput) -> Result<DeskOutcome> {
        let exposure = input.non_negative(&EXPOSURE)?;
        let pd = percent_in_range(input, &PD)?;
        let lgd = percent_in_range(input, &LGD)?;

        let expected_loss = exposure * (pd / 100.0) * (lgd / 100.0);
        let capital = exposure * CAPITAL_RATIO;

        let metrics = vec![
            Metric::new("Tổn thất dự kiến (EL)", format!("{} tỷ VND", group_decimal(expected_loss, 2))),
            Metric::new("Vốn tối thiểu (8% EAD)", format!("{} tỷ VND", group_decimal(capital, 2))),
        ];

        let context_data = format!(
            "EAD: {} tỷ VND; PD: {}; LGD: {}; tổn thất dự kiến: {} tỷ VND; vốn tối thiểu: {} tỷ VND.",
            group_thousands(exposure),
            format_percent(pd),
            format_percent(lgd),
            group_decimal(expected_loss, 2),
            group_decimal(capital, 2),
        );

        Ok(DeskOutcome {
            metrics,
            advisory: AdvisoryCall::General(AdvisoryRequest::new(
                "Giám đốc Quản trị Rủi ro (CRO) của ngân hàng",
                context_data.clone(),
                "Đánh giá mức độ rủi ro tín dụng của khoản vay và đề xuất biện pháp giảm thiểu rủi ro.",
            )),
            context_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_loss() {
        let input = DeskInput::default()
            .with("exposure", "1,000")
            .with("pd_percent", "2")
            .with("lgd_percent", "45");
        let outcome = RiskManagementDesk.compute(&input).unwrap();

        assert_eq!(outcome.metrics[0].value, "9.00 tỷ VND");
        assert_eq!(outcome.metrics[1].value, "80.00 tỷ VND");
        assert!(outcome.context_data.contains("PD: 2%"));
        assert!(outcome.context_data.contains("LGD: 45%"));
    }

    #[test]
    fn test_percent_bounds() {
        let input = DeskInput::default().with("pd_percent", "120");
        assert!(RiskManagementDesk.compute(&input).is_err());
    }
}
