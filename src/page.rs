//! Page chrome
//!
//! Page metadata, the CSS theme, and the HTML template for a desk page.

use askama::Template;

use crate::desks::{DeskInput, DeskView, FieldKind, Metric};
use crate::navigation::{nav_items, Desk, NavItem};
use crate::Result;

#[derive(Debug, Clone, Copy)]
pub struct PageMeta {
    pub title: &'static str,
    pub icon: &'static str,
    pub subtitle: &'static str,
    pub wide_layout: bool,
}

pub const PAGE_META: PageMeta = PageMeta {
    title: "Mô phỏng Nghiệp vụ Ngân hàng",
    icon: "🏦",
    subtitle: "Năm bàn nghiệp vụ với cố vấn AI",
    wide_layout: true,
};

pub const THEME_CSS: &str = r#"
:root { --navy: #0b2545; --gold: #c9a227; --bg: #f4f6fa; --card: #ffffff; --muted: #5c6b7a; }
* { box-sizing: border-box; }
body { margin: 0; font-family: "Segoe UI", Roboto, Helvetica, Arial, sans-serif; background: var(--bg); color: #1b2733; }
.app { display: flex; min-height: 100vh; }
.sidebar { width: 280px; background: var(--navy); color: #fff; padding: 24px 18px; }
.sidebar h2 { font-size: 1.05rem; color: var(--gold); margin-top: 0; }
.sidebar label { display: block; padding: 10px 12px; margin: 4px 0; border-radius: 8px; cursor: pointer; }
.sidebar label.selected { background: rgba(201, 162, 39, 0.18); border-left: 3px solid var(--gold); }
.sidebar input[type=radio] { margin-right: 8px; }
.main { flex: 1; padding: 32px 40px; }
.main.narrow { max-width: 760px; }
.header h1 { margin: 0; color: var(--navy); }
.header p { color: var(--muted); margin-top: 4px; }
.card { background: var(--card); border-radius: 12px; padding: 20px 24px; margin-top: 20px; box-shadow: 0 2px 8px rgba(11, 37, 69, 0.08); }
.field { margin-bottom: 14px; }
.field label { display: block; font-weight: 600; margin-bottom: 4px; }
.field input[type=text] { width: 100%; max-width: 360px; padding: 8px 10px; border: 1px solid #c8d1dc; border-radius: 6px; }
button { background: var(--navy); color: #fff; border: 0; padding: 10px 20px; border-radius: 6px; cursor: pointer; }
button:hover { background: #13315c; }
.metrics { display: flex; flex-wrap: wrap; gap: 16px; }
.metric { flex: 1 1 200px; border-left: 4px solid var(--gold); padding: 8px 14px; }
.metric .label { color: var(--muted); font-size: 0.9rem; }
.metric .value { font-size: 1.35rem; font-weight: 700; color: var(--navy); }
.advice { white-space: pre-wrap; line-height: 1.55; }
.error { background: #fdecea; color: #8a1c12; border-radius: 8px; padding: 12px 16px; margin-top: 20px; }
"#;

/// A form input as rendered.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub numeric: bool,
}

#[derive(Template)]
#[template(path = "desk.html")]
pub struct DeskPage {
    pub meta: PageMeta,
    pub css: &'static str,
    pub nav: Vec<NavItem>,
    pub desk_slug: &'static str,
    pub desk_label: &'static str,
    pub desk_icon: &'static str,
    pub description: &'static str,
    pub fields: Vec<FieldView>,
    pub ask_ai: bool,
    pub metrics: Vec<Metric>,
    pub advice: Option<String>,
    pub error: Option<String>,
}

impl DeskPage {
    /// Page for one desk; the form shows the submitted values (or defaults).
    pub fn new(view: &dyn DeskView, input: &DeskInput) -> Self {
        let desk: Desk = view.desk();

        let fields = view
            .fields()
            .iter()
            .map(|spec| FieldView {
                name: spec.name,
                label: spec.label,
                value: input.display_value(spec),
                numeric: spec.kind == FieldKind::Number,
            })
            .collect();

        Self {
            meta: PAGE_META,
            css: THEME_CSS,
            nav: nav_items(desk),
            desk_slug: desk.slug(),
            desk_label: desk.label(),
            desk_icon: desk.icon(),
            description: view.description(),
            fields,
            ask_ai: input.ask_ai(),
            metrics: Vec::new(),
            advice: None,
            error: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_advice(mut self, advice: Option<String>) -> Self {
        self.advice = advice;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn to_html(&self) -> Result<String> {
        Ok(self.render()?)
    }
}
