use crate::advisor::format::group_thousands;
use crate::advisor::AdvisoryRequest;
use crate::error::AdvisorError;
use crate::navigation::Desk;
use crate::Result;

use super::{AdvisoryCall, DeskInput, DeskOutcome, DeskView, FieldSpec, Metric};

const AMOUNT: FieldSpec = FieldSpec::number("amount", "Số tiền giao dịch (USD)", "1,000,000");
const BID: FieldSpec = FieldSpec::number("bid", "Tỷ giá mua vào (VND/USD)", "25,100");
const ASK: FieldSpec = FieldSpec::number("ask", "Tỷ giá bán ra (VND/USD)", "25,400");

const FIELDS: &[FieldSpec] = &[AMOUNT, BID, ASK];

/// Spot USD/VND dealing: the desk buys at bid and earns the spread.
pub struct FxDealingDesk;

impl DeskView for FxDealingDesk {
    fn desk(&self) -> Desk {
        Desk::Fx
    }

    fn description(&self) -> &'static str {
        "Mua bán USD giao ngay với khách hàng doanh nghiệp, lợi nhuận từ chênh lệch tỷ giá mua/bán."
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn compute(&self, input: &DeskInput) -> Result<DeskOutcome> {
        let amount = input.non_negative(&AMOUNT)?;
        let bid = input.non_negative(&BID)?;
        let ask = input.non_negative(&ASK)?;

        if bid > ask {
            return Err(AdvisorError::InvalidInput(
                "Tỷ giá mua vào không được cao hơn tỷ giá bán ra".to_string(),
            ));
        }

        let spread = ask - bid;
        let customer_vnd = amount * bid;
        let desk_pnl = amount * spread;

        let metrics = vec![
            Metric::new("Chênh lệch mua/bán", format!("{} VND/USD", group_thousands(spread))),
            Metric::new("Khách hàng nhận", format!("{} VND", group_thousands(customer_vnd))),
            Metric::new("Lợi nhuận của bàn", format!("{} VND", group_thousands(desk_pnl))),
        ];

        let context_data = format!(
            "Số tiền: {} USD; tỷ giá mua: {} VND/USD; tỷ giá bán: {} VND/USD; \
             chênh lệch: {} VND/USD; lợi nhuận dự kiến: {} VND.",
            group_thousands(amount),
            group_thousands(bid),
            group_thousands(ask),
            group_thousands(spread),
            group_thousands(desk_pnl),
        );

        Ok(DeskOutcome {
            metrics,
            advisory: AdvisoryCall::General(AdvisoryRequest::new(
                "Trưởng phòng Kinh doanh Ngoại hối của một ngân hàng thương mại",
                context_data.clone(),
                "Đánh giá rủi ro tỷ giá của giao dịch này và khuyến nghị có nên phòng ngừa rủi ro (hedging) hay không.",
            )),
            context_data,
        })
    }
}
