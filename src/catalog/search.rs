use chrono::{Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::RequestError;
use crate::models::Article;

/// Fixed result-page size; `total pages = ceil(count / PAGE_SIZE)`.
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    /// Raw view count descending. `most_liked` is the legacy wire name
    /// for the same ordering.
    #[serde(alias = "most_liked")]
    MostViewed,
}

impl SortKey {
    /// Wire-string form of the sort key. Unknown values are a
    /// validation failure, not a malformed request.
    pub fn parse(value: &str) -> Result<Self, RequestError> {
        match value {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "most_viewed" | "most_liked" => Ok(SortKey::MostViewed),
            _ => Err(RequestError::Validation("Unknown sort key")),
        }
    }
}

/// The in-memory stage of the search pipeline: everything the store
/// query cannot express natively (price ceiling, age window, sort).
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub price_ceiling: Option<f64>,
    pub age_window_months: Option<u32>,
    pub sort: SortKey,
}

/// Filter and sort an already-fetched article set. Articles without a
/// price always pass the price ceiling: article-level price is rarely
/// populated, and absence is not a disqualifier. Sorting is stable, so
/// ties keep the store's fetch order.
pub fn apply_filters(
    mut articles: Vec<Article>,
    filters: &SearchFilters,
    now: NaiveDateTime,
) -> Vec<Article> {
    if let Some(ceiling) = filters.price_ceiling {
        articles.retain(|article| article.price.map_or(true, |price| price <= ceiling));
    }

    if let Some(months) = filters.age_window_months {
        if let Some(cutoff) = now.checked_sub_months(Months::new(months)) {
            articles.retain(|article| article.created_at > cutoff);
        }
    }

    match filters.sort {
        SortKey::Newest => articles.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => articles.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::MostViewed => articles.sort_by(|a, b| b.views.cmp(&a.views)),
    }

    articles
}

/// Slice out a 1-based page of `PAGE_SIZE` items and report the total
/// page count. An out-of-range page is empty, not an error.
pub fn paginate<T>(items: &[T], page: usize) -> (&[T], usize) {
    let total_pages = (items.len() + PAGE_SIZE - 1) / PAGE_SIZE;
    let page = page.max(1);
    let start = (page - 1).saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return (&[], total_pages);
    }
    let end = (start + PAGE_SIZE).min(items.len());
    (&items[start..end], total_pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleStatus;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn article(id: i64, days_ago: i64, views: i64, price: Option<f64>) -> Article {
        Article {
            id,
            title: format!("Article {id}"),
            slug: format!("article-{id}"),
            content: String::new(),
            excerpt: None,
            featured_image: None,
            author: None,
            status: ArticleStatus::Published,
            views,
            price,
            category_id: None,
            category_name: None,
            tags: Vec::new(),
            created_at: now() - chrono::Duration::days(days_ago),
            updated_at: now() - chrono::Duration::days(days_ago),
        }
    }

    #[test]
    fn no_filters_is_identity_up_to_sort() {
        let input = vec![article(1, 3, 0, None), article(2, 1, 0, None)];
        let out = apply_filters(input, &SearchFilters::default(), now());
        assert_eq!(out.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn price_ceiling_drops_expensive_and_passes_absent() {
        let input = vec![
            article(1, 1, 0, Some(25_000.0)),
            article(2, 2, 0, Some(9_000.0)),
            article(3, 3, 0, None),
        ];
        let filters = SearchFilters {
            price_ceiling: Some(10_000.0),
            ..Default::default()
        };
        let out = apply_filters(input, &filters, now());
        assert_eq!(out.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn age_window_keeps_recent_articles_only() {
        let input = vec![
            article(1, 10, 0, None),
            article(2, 200, 0, None),
            article(3, 400, 0, None),
        ];
        let filters = SearchFilters {
            age_window_months: Some(6),
            ..Default::default()
        };
        let out = apply_filters(input, &filters, now());
        assert_eq!(out.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn newest_and_oldest_are_exact_reverses_without_ties() {
        let input = vec![
            article(1, 5, 0, None),
            article(2, 1, 0, None),
            article(3, 9, 0, None),
        ];
        let newest = apply_filters(
            input.clone(),
            &SearchFilters {
                sort: SortKey::Newest,
                ..Default::default()
            },
            now(),
        );
        let oldest = apply_filters(
            input,
            &SearchFilters {
                sort: SortKey::Oldest,
                ..Default::default()
            },
            now(),
        );
        let mut reversed: Vec<i64> = oldest.iter().map(|a| a.id).collect();
        reversed.reverse();
        assert_eq!(newest.iter().map(|a| a.id).collect::<Vec<_>>(), reversed);
    }

    #[test]
    fn most_viewed_sorts_by_view_count_and_keeps_fetch_order_on_ties() {
        let input = vec![
            article(1, 1, 50, None),
            article(2, 2, 120, None),
            article(3, 3, 50, None),
        ];
        let out = apply_filters(
            input,
            &SearchFilters {
                sort: SortKey::MostViewed,
                ..Default::default()
            },
            now(),
        );
        assert_eq!(out.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2, 1, 3]);
    }

    #[test]
    fn legacy_most_liked_alias_still_parses() {
        let key: SortKey = serde_json::from_str(r#""most_liked""#).unwrap();
        assert_eq!(key, SortKey::MostViewed);
        assert_eq!(SortKey::parse("most_liked").unwrap(), SortKey::MostViewed);
    }

    #[test]
    fn unknown_sort_key_is_a_validation_failure() {
        assert!(matches!(
            SortKey::parse("bogus"),
            Err(RequestError::Validation(_))
        ));
    }

    #[test]
    fn concatenated_pages_reproduce_the_whole_list() {
        let items: Vec<i64> = (0..47).collect();
        let (_, total_pages) = paginate(&items, 1);
        assert_eq!(total_pages, 3);

        let mut collected = Vec::new();
        for page in 1..=total_pages {
            let (slice, _) = paginate(&items, page);
            collected.extend_from_slice(slice);
        }
        assert_eq!(collected, items);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let items: Vec<i64> = (0..5).collect();
        let (slice, total_pages) = paginate(&items, 4);
        assert!(slice.is_empty());
        assert_eq!(total_pages, 1);
    }

    #[test]
    fn empty_input_has_zero_pages() {
        let items: Vec<i64> = Vec::new();
        let (slice, total_pages) = paginate(&items, 1);
        assert!(slice.is_empty());
        assert_eq!(total_pages, 0);
    }
}
