//! UI selection state.
//!
//! The engine never holds this; a front end owns one [`Session`] and
//! passes the selections into the query functions.

use serde::{Deserialize, Serialize};

use crate::model::PolicyArea;
use crate::timeline::{ViewMode, QUARTER_COUNT};

/// Countries that can be compared side by side.
pub const MAX_COMPARE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Overview,
    Compare,
    Alliance,
    Analytics,
}

/// Policy area filter of the overview panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaSelection {
    #[default]
    All,
    Area(PolicyArea),
}

impl AreaSelection {
    pub fn includes(&self, area: PolicyArea) -> bool {
        match self {
            AreaSelection::All => true,
            AreaSelection::Area(selected) => *selected == area,
        }
    }
}

/// Result of toggling a country in the compare set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareToggle {
    Added,
    Removed,
    /// The set is already full.
    Refused,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub view: View,
    pub selected_country: Option<String>,
    pub selected_alliance: Option<String>,
    compare: Vec<String>,
    pub area: AreaSelection,
    pub map_mode: ViewMode,
    map_quarter: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            view: View::default(),
            selected_country: None,
            selected_alliance: None,
            compare: Vec::new(),
            area: AreaSelection::default(),
            map_mode: ViewMode::default(),
            map_quarter: QUARTER_COUNT - 1,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch views. Leaving the alliance view clears the selected alliance.
    pub fn switch_view(&mut self, view: View) {
        self.view = view;
        if view != View::Alliance {
            self.selected_alliance = None;
        }
    }

    /// Select a country and jump to its overview.
    pub fn select_country(&mut self, country: impl Into<String>) {
        self.view = View::Overview;
        self.selected_alliance = None;
        self.selected_country = Some(country.into());
    }

    pub fn clear_country(&mut self) {
        self.selected_country = None;
    }

    /// Select an alliance (switching to the alliance view), or clear it with `None`.
    pub fn select_alliance(&mut self, alliance: Option<String>) {
        if alliance.is_some() {
            self.view = View::Alliance;
        }
        self.selected_alliance = alliance;
    }

    /// Add `country` to the compare set, or remove it when already present.
    pub fn toggle_compare(&mut self, country: &str) -> CompareToggle {
        if let Some(pos) = self.compare.iter().position(|c| c == country) {
            self.compare.remove(pos);
            CompareToggle::Removed
        } else if self.compare.len() < MAX_COMPARE {
            self.compare.push(country.to_string());
            CompareToggle::Added
        } else {
            CompareToggle::Refused
        }
    }

    pub fn compare_set(&self) -> &[String] {
        &self.compare
    }

    /// The compared pair, once two countries are selected.
    pub fn compare_pair(&self) -> Option<(&str, &str)> {
        match self.compare.as_slice() {
            [a, b] => Some((a.as_str(), b.as_str())),
            _ => None,
        }
    }

    pub fn clear_compare(&mut self) {
        self.compare.clear();
    }

    pub fn select_area(&mut self, area: AreaSelection) {
        self.area = area;
    }

    pub fn map_quarter(&self) -> usize {
        self.map_quarter
    }

    /// Move the map time slider; clamped to the last quarter.
    pub fn set_map_quarter(&mut self, quarter: usize) {
        self.map_quarter = quarter.min(QUARTER_COUNT - 1);
    }
}
