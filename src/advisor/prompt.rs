//! Prompt templates for advisory calls
//!
//! Both builders are pure: the same input always yields the same prompt.

use serde::{Deserialize, Serialize};

use super::format::{format_percent, format_rate, format_vnd_billions};

/// Response style every desk advisor is asked to follow.
pub const RESPONSE_STYLE: &str =
    "Trả lời ngắn gọn trong 3-4 câu, nêu rủi ro trước tiên, sau đó đưa ra khuyến nghị chuyên nghiệp.";

pub const MACRO_PERSONA: &str = "Cố vấn Kinh tế cấp cao của Chính phủ";

/// Persona, pre-formatted situation data, and the question for the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisoryRequest {
    pub role: String,
    pub context_data: String,
    pub task: String,
}

impl AdvisoryRequest {
    pub fn new(
        role: impl Into<String>,
        context_data: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            context_data: context_data.into(),
            task: task.into(),
        }
    }
}

/// Exchange-rate shock scenario for the macro strategy desk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MacroScenario {
    /// Additional public debt burden, billions of VND.
    pub debt_increase: f64,
    /// Depreciation of the dong, percent.
    pub shock_percent: f64,
    /// Post-shock exchange rate, VND per USD.
    pub new_rate: f64,
}

pub fn build_advisory_prompt(request: &AdvisoryRequest) -> String {
    format!(
        "Bạn là {role}.\n\
         Dữ liệu tình huống:\n{context}\n\n\
         Nhiệm vụ: {task}\n\n\
         Yêu cầu: {style}",
        role = request.role,
        context = request.context_data,
        task = request.task,
        style = RESPONSE_STYLE,
    )
}

pub fn build_macro_prompt(scenario: &MacroScenario) -> String {
    format!(
        "Bạn là {persona}.\n\
         Tình huống: đồng Việt Nam mất giá: {shock} so với USD, tỷ giá mới là {rate}.\n\
         Gánh nặng nợ công tăng thêm: {debt}.\n\n\
         Hãy viết một báo cáo ngắn gửi Chính phủ gồm đúng 3 gạch đầu dòng lớn:\n\
         - Lạm phát nhập khẩu\n\
         - Giá xăng dầu\n\
         - Áp lực thuế\n\
         Mỗi ý nêu tác động và một khuyến nghị chính sách cụ thể.",
        persona = MACRO_PERSONA,
        shock = format_percent(scenario.shock_percent),
        rate = format_rate(scenario.new_rate),
        debt = format_vnd_billions(scenario.debt_increase),
    )
}
