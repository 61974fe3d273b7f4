//! Skills showcase: search, category filter and statistics.

use std::collections::BTreeMap;

/// Delay between typing in the search box and filtering.
pub const SEARCH_DEBOUNCE_MS: f64 = 300.0;
/// Delay between successive category icon pulses.
pub const STAGGER_STEP_MS: u32 = 200;
/// Category filter value matching every category.
pub const ALL_CATEGORIES: &str = "all";

/// One skill card as read from the page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillEntry {
    /// Visible heading text
    pub name: String,
    /// `data-skill` attribute, if any
    pub data_skill: Option<String>,
    /// `data-category` of the enclosing category
    pub category: String,
    /// `data-level`, if any
    pub level: Option<u32>,
}

impl SkillEntry {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_data_skill(mut self, data_skill: impl Into<String>) -> Self {
        self.data_skill = Some(data_skill.into());
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Check if the skill matches a search query.
    ///
    /// The query is compared case-insensitively by substring against the
    /// name and the `data-skill` attribute. An empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self
                .data_skill
                .as_deref()
                .map(|s| s.to_lowercase().contains(&query))
                .unwrap_or(false)
    }

    /// Check if the skill belongs to `filter` (or `filter` is `"all"`).
    pub fn matches_category(&self, filter: &str) -> bool {
        filter == ALL_CATEGORIES || self.category == filter
    }
}

/// Visibility of skills and their categories after filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterResult {
    /// One flag per input skill, in input order
    pub visible: Vec<bool>,
    /// Categories that keep at least one visible skill
    pub visible_categories: Vec<String>,
    /// Categories with every skill filtered out
    pub hidden_categories: Vec<String>,
}

impl FilterResult {
    fn from_flags(skills: &[SkillEntry], visible: Vec<bool>) -> Self {
        let mut by_category: BTreeMap<&str, bool> = BTreeMap::new();
        for (skill, shown) in skills.iter().zip(&visible) {
            *by_category.entry(skill.category.as_str()).or_insert(false) |= *shown;
        }

        let (shown, hidden): (Vec<_>, Vec<_>) = by_category.into_iter().partition(|(_, v)| *v);
        Self {
            visible,
            visible_categories: shown.into_iter().map(|(c, _)| c.to_string()).collect(),
            hidden_categories: hidden.into_iter().map(|(c, _)| c.to_string()).collect(),
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }
}

/// Apply a search query to the skills.
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::{filter_by_search, SkillEntry};
///
/// let skills = [
///     SkillEntry::new("React", "frontend"),
///     SkillEntry::new("PostgreSQL", "backend").with_data_skill("sql"),
/// ];
/// let result = filter_by_search(&skills, "SQL");
/// assert_eq!(result.visible, vec![false, true]);
/// assert_eq!(result.hidden_categories, vec!["frontend"]);
/// ```
pub fn filter_by_search(skills: &[SkillEntry], query: &str) -> FilterResult {
    let visible = skills.iter().map(|s| s.matches_query(query)).collect();
    FilterResult::from_flags(skills, visible)
}

/// Apply a category filter button to the skills.
pub fn filter_by_category(skills: &[SkillEntry], filter: &str) -> FilterResult {
    let visible = skills.iter().map(|s| s.matches_category(filter)).collect();
    FilterResult::from_flags(skills, visible)
}

/// Rounded average level per category, for categories with at least one leveled skill.
pub fn skill_statistics(skills: &[SkillEntry]) -> BTreeMap<String, u32> {
    let mut totals: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for skill in skills {
        if let Some(level) = skill.level {
            let entry = totals.entry(skill.category.as_str()).or_insert((0, 0));
            entry.0 += level as u64;
            entry.1 += 1;
        }
    }
    totals
        .into_iter()
        .map(|(category, (sum, count))| {
            let average = (sum as f64 / count as f64).round() as u32;
            (category.to_string(), average)
        })
        .collect()
}

/// Start delay of the `index`-th staggered reveal.
#[inline]
pub fn stagger_delay_ms(index: usize) -> u32 {
    (index as u32).saturating_mul(STAGGER_STEP_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<SkillEntry> {
        vec![
            SkillEntry::new("React", "frontend").with_level(90),
            SkillEntry::new("Vue", "frontend").with_level(75),
            SkillEntry::new("Python", "backend")
                .with_data_skill("django")
                .with_level(95),
            SkillEntry::new("AWS", "cloud"),
        ]
    }

    #[test]
    fn test_empty_query_shows_all() {
        let result = filter_by_search(&catalog(), "   ");
        assert_eq!(result.visible_count(), 4);
        assert!(result.hidden_categories.is_empty());
    }

    #[test]
    fn test_search_matches_name_and_data() {
        let skills = catalog();
        assert_eq!(
            filter_by_search(&skills, "REA").visible,
            vec![true, false, false, false]
        );
        let result = filter_by_search(&skills, "djan");
        assert_eq!(result.visible, vec![false, false, true, false]);
        assert_eq!(result.visible_categories, vec!["backend"]);
        assert_eq!(result.hidden_categories, vec!["cloud", "frontend"]);
    }

    #[test]
    fn test_category_filter() {
        let skills = catalog();
        let result = filter_by_category(&skills, "frontend");
        assert_eq!(result.visible, vec![true, true, false, false]);

        let all = filter_by_category(&skills, ALL_CATEGORIES);
        assert_eq!(all.visible_count(), 4);
    }

    #[test]
    fn test_statistics() {
        let stats = skill_statistics(&catalog());
        assert_eq!(stats.get("frontend"), Some(&83)); // 82.5 rounds up
        assert_eq!(stats.get("backend"), Some(&95));
        assert_eq!(stats.get("cloud"), None);
    }

    #[test]
    fn test_stagger() {
        assert_eq!(stagger_delay_ms(0), 0);
        assert_eq!(stagger_delay_ms(3), 600);
    }
}
