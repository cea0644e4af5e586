use crate::advisor::format::{format_percent, group_decimal, group_thousands};
use crate::advisor::AdvisoryRequest;
use crate::navigation::Desk;
use crate::Result;

use super::{AdvisoryCall, DeskInput, DeskOutcome, DeskView, FieldSpec, Metric};

const LC_VALUE: FieldSpec = FieldSpec::number("lc_value", "Giá trị L/C (USD)", "500,000");
const FEE_RATE: FieldSpec = FieldSpec::number("fee_rate", "Phí phát hành (%/năm)", "1.5");
const TENOR: FieldSpec = FieldSpec::number("tenor_days", "Thời hạn (ngày)", "90");
const COUNTRY: FieldSpec = FieldSpec::text("country", "Quốc gia đối tác", "Trung Quốc");

const FIELDS: &[FieldSpec] = &[LC_VALUE, FEE_RATE, TENOR, COUNTRY];

/// Money-market day count.
const DAY_BASIS: f64 = 360.0;

pub struct TradeFinanceDesk;

impl DeskView for TradeFinanceDesk {
    fn desk(&self) -> Desk {
        Desk::Trade
    }

    fn description(&self) -> &'static str {
        "Tính phí phát hành thư tín dụng (L/C) cho hợp đồng nhập khẩu."
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn compute(&self, input: &DeskInput) -> Result<DeskOutcome> {
        let value = input.non_negative(&LC_VALUE)?;
        let fee_rate = input.non_negative(&FEE_RATE)?;
        let tenor = input.non_negative(&TENOR)?;
        let country = input.text(&COUNTRY);

        let fee = value * (fee_rate / 100.0) * tenor / DAY_BASIS;

        let metrics = vec![
            Metric::new("Phí L/C", format!("{} USD", group_decimal(fee, 2))),
            Metric::new("Thời hạn", format!("{} ngày", group_thousands(tenor))),
        ];

        let context_data = format!(
            "L/C trị giá {} USD, phí {}/năm, thời hạn {} ngày, đối tác tại {}; phí phải thu: {} USD.",
            group_thousands(value),
            format_percent(fee_rate),
            group_thousands(tenor),
            country,
            group_decimal(fee, 2),
        );

        Ok(DeskOutcome {
            metrics,
            advisory: AdvisoryCall::General(AdvisoryRequest::new(
                "Chuyên gia Tài trợ Thương mại của ngân hàng",
                context_data.clone(),
                format!(
                    "Đánh giá rủi ro của thư tín dụng với đối tác tại {} và khuyến nghị điều kiện thanh toán phù hợp.",
                    country
                ),
            )),
            context_data,
        })
    }
}
