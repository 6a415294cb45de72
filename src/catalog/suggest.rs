use serde::{Deserialize, Serialize};

const MAX_SUGGESTIONS: usize = 8;

/// One category in the suggestion index: a slug, a display name and
/// the keyword synonyms a shopper might type for it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeywordEntry {
    pub slug: String,
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered keyword-to-category index backing search-box autocomplete.
/// Entry order is significant: suggestions come back in first-match
/// order, not ranked by relevance.
#[derive(Debug, Clone)]
pub struct KeywordIndex {
    entries: Vec<KeywordEntry>,
}

impl KeywordIndex {
    pub fn new(entries: Vec<KeywordEntry>) -> Self {
        KeywordIndex { entries }
    }

    /// Category display names whose keyword list contains a
    /// case-insensitive substring match of `input`, deduplicated and
    /// capped at 8. Blank input yields nothing.
    pub fn suggest(&self, input: &str) -> Vec<String> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut suggestions: Vec<String> = Vec::new();
        for entry in &self.entries {
            if suggestions.len() == MAX_SUGGESTIONS {
                break;
            }
            let hit = entry
                .keywords
                .iter()
                .any(|keyword| keyword.to_lowercase().contains(&needle));
            if hit && !suggestions.contains(&entry.name) {
                suggestions.push(entry.name.clone());
            }
        }
        suggestions
    }

    /// Resolve a display name back to its category slug.
    pub fn slug_for_name(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.slug.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> KeywordIndex {
        KeywordIndex::new(vec![
            KeywordEntry {
                slug: "tv".to_string(),
                name: "TV".to_string(),
                keywords: vec!["tv".to_string(), "led tv".to_string(), "oled".to_string()],
            },
            KeywordEntry {
                slug: "led-lights".to_string(),
                name: "LED Lights".to_string(),
                keywords: vec!["led lights".to_string(), "bulbs".to_string()],
            },
            KeywordEntry {
                slug: "chimney".to_string(),
                name: "Chimney".to_string(),
                keywords: vec!["chimney".to_string(), "exhaust".to_string()],
            },
        ])
    }

    #[test]
    fn substring_match_returns_names_in_index_order() {
        assert_eq!(index().suggest("led"), vec!["TV", "LED Lights"]);
    }

    #[test]
    fn blank_input_yields_no_suggestions() {
        assert!(index().suggest("").is_empty());
        assert!(index().suggest("   ").is_empty());
    }

    #[test]
    fn match_is_case_insensitive() {
        assert_eq!(index().suggest("OLED"), vec!["TV"]);
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(index().suggest("washing machine").is_empty());
    }

    #[test]
    fn results_are_capped_at_eight() {
        let entries = (0..12)
            .map(|i| KeywordEntry {
                slug: format!("cat-{i}"),
                name: format!("Category {i}"),
                keywords: vec!["gadget".to_string()],
            })
            .collect();
        let index = KeywordIndex::new(entries);
        assert_eq!(index.suggest("gadget").len(), 8);
    }

    #[test]
    fn name_resolves_back_to_slug() {
        assert_eq!(index().slug_for_name("Chimney"), Some("chimney"));
        assert_eq!(index().slug_for_name("Unknown"), None);
    }
}
