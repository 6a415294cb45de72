//! The catalog layer: keyword suggestions, per-category filter guides,
//! the search/filter/sort pipeline and the smart-pick decision table.
//! Everything here is deterministic and store-agnostic; the lookup
//! tables are plain data files so they can be edited without touching
//! code.

mod filter_guide;
mod search;
mod smart_pick;
mod suggest;

pub use filter_guide::{FilterGroup, FilterGuide, Segment};
pub use search::{apply_filters, paginate, SearchFilters, SortKey, PAGE_SIZE};
pub use smart_pick::{recommend, Maintenance, SmartPickFacets, Usage, GENERIC_PROMPT};
pub use suggest::{KeywordEntry, KeywordIndex};

use std::path::Path;

use anyhow::Context;

/// Static lookup tables loaded once at startup.
pub struct CatalogData {
    pub keywords: KeywordIndex,
    pub filter_guide: FilterGuide,
}

impl CatalogData {
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let keywords_path = dir.join("keyword_index.json");
        let keywords = std::fs::read_to_string(&keywords_path)
            .with_context(|| format!("Failed to read {}", keywords_path.display()))?;
        let keywords: Vec<KeywordEntry> =
            serde_json::from_str(&keywords).context("Failed to parse keyword_index.json")?;

        let guide_path = dir.join("filter_guide.json");
        let guide = std::fs::read_to_string(&guide_path)
            .with_context(|| format!("Failed to read {}", guide_path.display()))?;
        let filter_guide: FilterGuide =
            serde_json::from_str(&guide).context("Failed to parse filter_guide.json")?;

        Ok(CatalogData {
            keywords: KeywordIndex::new(keywords),
            filter_guide,
        })
    }
}
