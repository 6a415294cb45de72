use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One piece of a filter-guide paragraph: either plain prose or a
/// toggleable tag embedded in it. The JSON shape is a bare string for
/// prose and `{"filter": "..."}` for a tag, so `Tag` must be tried
/// first by the untagged deserializer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Segment {
    Tag { filter: String },
    Prose(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterGroup {
    #[serde(rename = "groupTitle")]
    pub group_title: String,
    pub content: Vec<Segment>,
}

/// Per-category guided-filter dictionary: category display name to a
/// list of groups of prose with inline tags. A category without an
/// entry simply has no guide.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FilterGuide {
    categories: BTreeMap<String, Vec<FilterGroup>>,
}

impl FilterGuide {
    pub fn groups(&self, category_name: &str) -> &[FilterGroup] {
        self.categories
            .get(category_name)
            .map(|groups| groups.as_slice())
            .unwrap_or(&[])
    }

    /// All distinct tags a category's guide offers, in document order.
    pub fn tags_for(&self, category_name: &str) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::new();
        for group in self.groups(category_name) {
            for segment in &group.content {
                if let Segment::Tag { filter } = segment {
                    if !tags.contains(&filter.as_str()) {
                        tags.push(filter);
                    }
                }
            }
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide() -> FilterGuide {
        serde_json::from_str(
            r#"{
                "Chimney": [
                    {
                        "groupTitle": "Filter Type",
                        "content": [
                            "For heavy cooking, a ",
                            { "filter": "Baffle Filter" },
                            " is most durable. Or choose ",
                            { "filter": "Filterless (Auto-Clean)" },
                            "."
                        ]
                    },
                    {
                        "groupTitle": "Installation",
                        "content": [
                            "A ",
                            { "filter": "Ducted" },
                            " chimney vents outside."
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn prose_and_tags_keep_document_order() {
        let guide = guide();
        let groups = guide.groups("Chimney");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group_title, "Filter Type");
        assert_eq!(
            groups[0].content[1],
            Segment::Tag {
                filter: "Baffle Filter".to_string()
            }
        );
        assert_eq!(
            groups[0].content[0],
            Segment::Prose("For heavy cooking, a ".to_string())
        );
    }

    #[test]
    fn unknown_category_renders_nothing() {
        assert!(guide().groups("Toaster").is_empty());
        assert!(guide().tags_for("Toaster").is_empty());
    }

    #[test]
    fn tags_are_collected_across_groups() {
        assert_eq!(
            guide().tags_for("Chimney"),
            vec!["Baffle Filter", "Filterless (Auto-Clean)", "Ducted"]
        );
    }

    #[test]
    fn shipped_data_file_parses() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("data")
            .join("filter_guide.json");
        let raw = std::fs::read_to_string(path).unwrap();
        let guide: FilterGuide = serde_json::from_str(&raw).unwrap();
        assert!(guide.tags_for("Chimney").contains(&"Baffle Filter"));
        assert!(!guide.groups("TV").is_empty());
    }
}
