use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::compare::{ComparisonOutcome, Registry};

/// Interactive state for the comparison selector.
pub struct SelectorState {
    registry: Registry,
    pub filter: String,
    pub cursor: usize,
    /// Entity names in selection order; column order follows pick order.
    selected: Vec<String>,
    matcher: SkimMatcherV2,
}

impl SelectorState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            filter: String::new(),
            cursor: 0,
            selected: Vec::new(),
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Entity names matching the current filter, best match first.
    pub fn visible(&self) -> Vec<String> {
        if self.filter.is_empty() {
            return self.registry.names().iter().map(|n| n.to_string()).collect();
        }

        let mut scored: Vec<(i64, String)> = self
            .registry
            .names()
            .iter()
            .filter_map(|name| {
                self.matcher
                    .fuzzy_match(name, &self.filter)
                    .map(|score| (score, name.to_string()))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        scored.into_iter().map(|(_, name)| name).collect()
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let count = self.visible().len();
        if count > 0 && self.cursor + 1 < count {
            self.cursor += 1;
        }
    }

    pub fn toggle_current(&mut self) {
        let visible = self.visible();
        let Some(name) = visible.get(self.cursor) else {
            return;
        };
        if let Some(position) = self.selected.iter().position(|s| s == name) {
            self.selected.remove(position);
        } else {
            self.selected.push(name.clone());
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.iter().any(|s| s == name)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.clamp_cursor();
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let count = self.visible().len();
        if count == 0 {
            self.cursor = 0;
        } else if self.cursor >= count {
            self.cursor = count - 1;
        }
    }

    pub fn outcome(&self) -> ComparisonOutcome {
        let selection: Vec<&str> = self.selected.iter().map(String::as_str).collect();
        self.registry.compare(&selection)
    }
}
