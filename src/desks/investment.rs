use crate::advisor::format::{format_percent, group_decimal, group_thousands};
use crate::advisor::AdvisoryRequest;
use crate::error::AdvisorError;
use crate::navigation::Desk;
use crate::Result;

use super::{AdvisoryCall, DeskInput, DeskOutcome, DeskView, FieldSpec, Metric};

const PRINCIPAL: FieldSpec = FieldSpec::number("principal", "Vốn đầu tư ban đầu (triệu VND)", "100");
const RATE: FieldSpec = FieldSpec::number("annual_return", "Lợi suất kỳ vọng (%/năm)", "8");
const YEARS: FieldSpec = FieldSpec::number("years", "Số năm nắm giữ", "5");

const FIELDS: &[FieldSpec] = &[PRINCIPAL, RATE, YEARS];

/// Compound growth of a lump sum.
pub struct InvestmentDesk;

impl DeskView for InvestmentDesk {
    fn desk(&self) -> Desk {
        Desk::Investment
    }

    fn description(&self) -> &'static str {
        "Giá trị tương lai của khoản đầu tư với lãi kép hằng năm."
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn compute(&self, input: &DeskInput) -> Result<DeskOutcome> {
        let principal = input.non_negative(&PRINCIPAL)?;
        let rate = input.number(&RATE)?;
        let years = input.non_negative(&YEARS)?;

        if rate <= -100.0 {
            return Err(AdvisorError::InvalidInput(format!(
                "{}: phải lớn hơn -100%",
                RATE.label
            )));
        }

        let future_value = principal * (1.0 + rate / 100.0).powf(years);
        if !future_value.is_finite() {
            return Err(AdvisorError::InvalidInput(
                "Giá trị tương lai vượt quá giới hạn tính toán, hãy giảm lợi suất hoặc số năm".to_string(),
            ));
        }
        let gain = future_value - principal;

        let metrics = vec![
            Metric::new("Giá trị tương lai", format!("{} triệu VND", group_decimal(future_value, 2))),
            Metric::new("Lãi/lỗ", format!("{} triệu VND", group_decimal(gain, 2))),
        ];

        let context_data = format!(
            "Vốn ban đầu: {} triệu VND; lợi suất kỳ vọng: {}/năm; thời gian: {} năm; \
             giá trị tương lai: {} triệu VND.",
            group_thousands(principal),
            format_percent(rate),
            group_decimal(years, 1).trim_end_matches(".0"),
            group_decimal(future_value, 2),
        );

        Ok(DeskOutcome {
            metrics,
            advisory: AdvisoryCall::General(AdvisoryRequest::new(
                "Giám đốc Đầu tư của một quỹ đầu tư",
                context_data.clone(),
                "Đánh giá rủi ro của kế hoạch đầu tư này và khuyến nghị cách phân bổ danh mục.",
            )),
            context_data,
        })
    }
}
