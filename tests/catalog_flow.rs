use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use apnilist::catalog::{apply_filters, SearchFilters, SortKey};
use apnilist::data_formats::{CommentRequest, UpdateProductRequest};
use apnilist::db_helpers::{
    add_comment_to_article_in_db, add_to_wishlist_in_db, get_price_history_in_db,
    get_ranked_products_in_db, get_smart_pick_in_db, get_top_sales_for_category_in_db,
    increment_article_views_in_db, replace_article_products_in_db,
    search_published_articles_in_db, update_product_in_db, upsert_smart_pick_in_db,
};
use apnilist::errors::RequestError;

/// One shared in-memory database; more connections would each get
/// their own empty store.
async fn setup_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

async fn seed_user(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, 'hash')")
        .bind(username)
        .bind(format!("{username}@example.com"))
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

async fn seed_article(pool: &SqlitePool, slug: &str, category_slug: &str, tags: &[&str]) -> i64 {
    let category_id =
        sqlx::query_scalar::<sqlx::Sqlite, i64>("SELECT id FROM categories WHERE slug = ?")
            .bind(category_slug)
            .fetch_one(pool)
            .await
            .unwrap();
    let article_id = sqlx::query(
        "INSERT INTO articles (title, slug, content, category_id, status)
         VALUES (?, ?, 'body', ?, 'published')",
    )
    .bind(slug)
    .bind(slug)
    .bind(category_id)
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid();

    for tag in tags {
        let tag_id = sqlx::query_scalar::<sqlx::Sqlite, i64>(
            "INSERT INTO tags (name) VALUES (?)
             ON CONFLICT (name) DO UPDATE SET name = excluded.name
             RETURNING id",
        )
        .bind(tag)
        .fetch_one(pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO article_tags (article_id, tag_id) VALUES (?, ?)")
            .bind(article_id)
            .bind(tag_id)
            .execute(pool)
            .await
            .unwrap();
    }
    article_id
}

async fn seed_product(pool: &SqlitePool, slug: &str, price: f64) -> i64 {
    sqlx::query("INSERT INTO products (title, slug, price) VALUES (?, ?, ?)")
        .bind(slug)
        .bind(slug)
        .bind(price)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

#[tokio::test]
async fn search_narrows_by_category_and_tag_overlap() {
    let pool = setup_pool().await;
    seed_article(&pool, "best-chimneys", "chimney", &["Baffle Filter", "Ducted"]).await;
    seed_article(&pool, "best-filterless", "chimney", &["Filterless (Auto-Clean)"]).await;
    seed_article(&pool, "best-tvs", "tv", &["4K"]).await;

    let all_chimney = search_published_articles_in_db(&pool, Some("chimney"), &[])
        .await
        .unwrap();
    assert_eq!(all_chimney.len(), 2);

    let baffle_only = search_published_articles_in_db(
        &pool,
        Some("chimney"),
        &["Baffle Filter".to_string(), "No Such Tag".to_string()],
    )
    .await
    .unwrap();
    assert_eq!(baffle_only.len(), 1);
    assert_eq!(baffle_only[0].slug, "best-chimneys");

    // unknown category matches nothing
    let none = search_published_articles_in_db(&pool, Some("toaster"), &[])
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn drafts_stay_out_of_search_results() {
    let pool = setup_pool().await;
    seed_article(&pool, "published-one", "chimney", &[]).await;
    sqlx::query(
        "INSERT INTO articles (title, slug, content, status) VALUES ('d', 'draft-one', 'b', 'draft')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let results = search_published_articles_in_db(&pool, None, &[]).await.unwrap();
    let slugs: Vec<&str> = results.iter().map(|a| a.slug.as_str()).collect();
    assert_eq!(slugs, vec!["published-one"]);
}

#[tokio::test]
async fn fetched_articles_flow_through_the_sort_stage() {
    let pool = setup_pool().await;
    seed_article(&pool, "first", "chimney", &[]).await;
    let second = seed_article(&pool, "second", "chimney", &[]).await;
    sqlx::query("UPDATE articles SET views = 99 WHERE id = ?")
        .bind(second)
        .execute(&pool)
        .await
        .unwrap();

    let articles = search_published_articles_in_db(&pool, None, &[]).await.unwrap();
    let sorted = apply_filters(
        articles,
        &SearchFilters {
            sort: SortKey::MostViewed,
            ..Default::default()
        },
        chrono::Utc::now().naive_utc(),
    );
    assert_eq!(sorted[0].slug, "second");
}

#[tokio::test]
async fn replacing_products_reassigns_contiguous_ranks() {
    let pool = setup_pool().await;
    seed_article(&pool, "top-10", "chimney", &[]).await;
    let a = seed_product(&pool, "elica-90", 12999.0).await;
    let b = seed_product(&pool, "faber-60", 9999.0).await;
    let c = seed_product(&pool, "glen-6062", 7999.0).await;

    replace_article_products_in_db(&pool, "top-10", &[a, b, c])
        .await
        .unwrap();
    // a second save fully replaces the first, ranks starting over at 1
    let ranked = replace_article_products_in_db(&pool, "top-10", &[c, a])
        .await
        .unwrap();

    let ranks: Vec<i64> = ranked.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2]);
    assert_eq!(ranked[0].product.slug, "glen-6062");
    assert_eq!(ranked[1].product.slug, "elica-90");

    let unknown = replace_article_products_in_db(&pool, "top-10", &[a, 9999]).await;
    assert!(matches!(unknown, Err(RequestError::Validation(_))));
    // the failed save left the previous list untouched
    let article_id = sqlx::query_scalar::<sqlx::Sqlite, i64>(
        "SELECT id FROM articles WHERE slug = 'top-10'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let kept = get_ranked_products_in_db(&pool, article_id).await.unwrap();
    assert_eq!(kept.len(), 2);
}

#[tokio::test]
async fn view_counter_increments_in_place() {
    let pool = setup_pool().await;
    let article_id = seed_article(&pool, "top-10", "chimney", &[]).await;

    increment_article_views_in_db(&pool, "top-10").await.unwrap();
    increment_article_views_in_db(&pool, "top-10").await.unwrap();

    let views = sqlx::query_scalar::<sqlx::Sqlite, i64>("SELECT views FROM articles WHERE id = ?")
        .bind(article_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(views, 2);
}

#[tokio::test]
async fn smart_pick_save_keeps_one_row_per_article() {
    let pool = setup_pool().await;
    let article_id = seed_article(&pool, "top-10", "chimney", &[]).await;

    upsert_smart_pick_in_db(&pool, "top-10", "first take").await.unwrap();
    upsert_smart_pick_in_db(&pool, "top-10", "second take").await.unwrap();

    let count = sqlx::query_scalar::<sqlx::Sqlite, i64>(
        "SELECT COUNT(*) FROM smart_picks WHERE article_id = ?",
    )
    .bind(article_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
    assert_eq!(
        get_smart_pick_in_db(&pool, article_id).await.unwrap().as_deref(),
        Some("second take")
    );
}

#[tokio::test]
async fn comment_replies_stop_at_one_level() {
    let pool = setup_pool().await;
    seed_article(&pool, "top-10", "chimney", &[]).await;
    let user_id = seed_user(&pool, "ravi").await;

    let top = add_comment_to_article_in_db(
        &pool,
        user_id,
        "top-10",
        &CommentRequest {
            body: "Great list".to_string(),
            parent_comment_id: None,
        },
    )
    .await
    .unwrap();

    let reply = add_comment_to_article_in_db(
        &pool,
        user_id,
        "top-10",
        &CommentRequest {
            body: "Agreed".to_string(),
            parent_comment_id: Some(top.id),
        },
    )
    .await
    .unwrap();

    let nested = add_comment_to_article_in_db(
        &pool,
        user_id,
        "top-10",
        &CommentRequest {
            body: "Too deep".to_string(),
            parent_comment_id: Some(reply.id),
        },
    )
    .await;
    assert!(matches!(nested, Err(RequestError::Validation(_))));
}

#[tokio::test]
async fn wishlist_rejects_duplicates() {
    let pool = setup_pool().await;
    let user_id = seed_user(&pool, "ravi").await;
    let product_id = seed_product(&pool, "elica-90", 12999.0).await;

    add_to_wishlist_in_db(&pool, user_id, product_id).await.unwrap();
    let duplicate = add_to_wishlist_in_db(&pool, user_id, product_id).await;
    assert!(matches!(duplicate, Err(RequestError::Validation(_))));

    let missing = add_to_wishlist_in_db(&pool, user_id, 404).await;
    assert!(matches!(missing, Err(RequestError::NotFound(_))));
}

#[tokio::test]
async fn top_sales_returns_the_best_five_smallest_first() {
    let pool = setup_pool().await;
    let category_id =
        sqlx::query_scalar::<sqlx::Sqlite, i64>("SELECT id FROM categories WHERE slug = 'chimney'")
            .fetch_one(&pool)
            .await
            .unwrap();

    for (model, count) in [
        ("Elica 90cm", 620),
        ("Faber 60cm", 410),
        ("Glen 6062", 380),
        ("Hindware Nadia", 290),
        ("Inalsa Classica", 150),
        ("Sunflame Rapid", 90),
    ] {
        sqlx::query("INSERT INTO top_sales (category_id, model_name, sales_count) VALUES (?, ?, ?)")
            .bind(category_id)
            .bind(model)
            .bind(count)
            .execute(&pool)
            .await
            .unwrap();
    }

    let sales = get_top_sales_for_category_in_db(&pool, category_id).await.unwrap();
    let counts: Vec<i64> = sales.iter().map(|s| s.sales_count).collect();
    // sixth-place model is cut, the surviving five come back ascending
    assert_eq!(counts, vec![150, 290, 380, 410, 620]);
    assert_eq!(sales[0].model_name, "Inalsa Classica");

    let other_category = get_top_sales_for_category_in_db(&pool, category_id + 1)
        .await
        .unwrap();
    assert!(other_category.is_empty());
}

#[tokio::test]
async fn price_updates_record_history_in_the_same_save() {
    let pool = setup_pool().await;
    let product_id = seed_product(&pool, "elica-90", 12999.0).await;

    let request = UpdateProductRequest {
        price: Some(10999.0),
        ..Default::default()
    };
    let updated = update_product_in_db(&pool, "elica-90", request).await.unwrap();
    assert_eq!(updated.price, 10999.0);

    let history = get_price_history_in_db(&pool, product_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].old_price, 12999.0);
    assert_eq!(history[0].new_price, 10999.0);

    // saving the same price again adds nothing
    let request = UpdateProductRequest {
        price: Some(10999.0),
        ..Default::default()
    };
    update_product_in_db(&pool, "elica-90", request).await.unwrap();
    let history = get_price_history_in_db(&pool, product_id).await.unwrap();
    assert_eq!(history.len(), 1);
}
