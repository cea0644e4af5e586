//! Sidebar navigation
//!
//! Exactly one desk is selected per request. Anything that is not one of the
//! five desks selects the first one.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Desk {
    #[default]
    Fx,
    Risk,
    Trade,
    Investment,
    Macro,
}

impl Desk {
    /// Sidebar order.
    pub const ALL: [Desk; 5] = [
        Desk::Fx,
        Desk::Risk,
        Desk::Trade,
        Desk::Investment,
        Desk::Macro,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Desk::Fx => "fx",
            Desk::Risk => "risk",
            Desk::Trade => "trade",
            Desk::Investment => "investment",
            Desk::Macro => "macro",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Desk::Fx => "Kinh doanh Ngoại hối",
            Desk::Risk => "Quản trị Rủi ro",
            Desk::Trade => "Tài trợ Thương mại",
            Desk::Investment => "Đầu tư",
            Desk::Macro => "Chiến lược Vĩ mô",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Desk::Fx => "💱",
            Desk::Risk => "🛡️",
            Desk::Trade => "🚢",
            Desk::Investment => "📈",
            Desk::Macro => "🏛️",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Desk> {
        let slug = slug.trim().to_lowercase();
        Desk::ALL.into_iter().find(|d| d.slug() == slug)
    }

    pub fn from_label(label: &str) -> Option<Desk> {
        let label = label.trim();
        Desk::ALL.into_iter().find(|d| d.label() == label)
    }

    /// Resolve a selector value (slug or label); default when missing or unknown.
    pub fn select(selection: Option<&str>) -> Desk {
        selection
            .and_then(|s| Desk::from_slug(s).or_else(|| Desk::from_label(s)))
            .unwrap_or_default()
    }
}

impl fmt::Display for Desk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

/// One sidebar entry as rendered.
#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub slug: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub selected: bool,
}

/// Sidebar entries with exactly one of them selected.
pub fn nav_items(current: Desk) -> Vec<NavItem> {
    Desk::ALL
        .into_iter()
        .map(|d| NavItem {
            slug: d.slug(),
            label: d.label(),
            icon: d.icon(),
            selected: d == current,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first() {
        assert_eq!(Desk::default(), Desk::ALL[0]);
        assert_eq!(Desk::select(None), Desk::Fx);
        assert_eq!(Desk::select(Some("nonsense")), Desk::Fx);
    }

    #[test]
    fn test_select_by_slug_and_label() {
        for desk in Desk::ALL {
            assert_eq!(Desk::select(Some(desk.slug())), desk);
            assert_eq!(Desk::select(Some(desk.label())), desk);
        }
        assert_eq!(Desk::select(Some(" MACRO ")), Desk::Macro);
    }

    #[test]
    fn test_exactly_one_selected() {
        for desk in Desk::ALL {
            let items = nav_items(desk);
            assert_eq!(items.len(), 5);
            let selected: Vec<_> = items.iter().filter(|i| i.selected).collect();
            assert_eq!(selected.len(), 1);
            assert_eq!(selected[0].slug, desk.slug());
        }
    }
}
