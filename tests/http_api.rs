use std::time::Duration;

use apnilist::{get_random_free_port, make_router, run_app};

/// Boots the real server on a free port against a throwaway database
/// file and runs one end-to-end pass over the public surface.
#[tokio::test]
async fn public_api_round_trip() {
    std::env::set_var("JWT_SECRET", "integration-test-secret");
    let db_path = std::env::temp_dir().join(format!("apnilist-test-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&db_path);
    std::env::set_var("DATABASE_URL", format!("sqlite://{}", db_path.display()));

    let (port, addr) = get_random_free_port();
    tokio::spawn(run_app(make_router(), addr));

    let client = reqwest::Client::new();
    let base = format!("http://localhost:{port}");

    let mut alive = false;
    for _ in 0..50 {
        if let Ok(response) = client.get(format!("{base}/check_health")).send().await {
            if response.status().is_success() {
                alive = true;
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(alive, "server did not come up");

    // register, then authenticate with the returned token
    let response = client
        .post(format!("{base}/api/users"))
        .json(&serde_json::json!({
            "user": {
                "username": "ravi",
                "email": "ravi@example.com",
                "password": "a-long-password"
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let token = body["user"]["token"].as_str().unwrap().to_string();

    let response = client
        .get(format!("{base}/api/user"))
        .header("Authorization", format!("Token {token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["username"], "ravi");

    // a short password is rejected before the store is touched
    let response = client
        .post(format!("{base}/api/users"))
        .json(&serde_json::json!({
            "user": { "username": "x", "email": "x@example.com", "password": "short" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // seeded categories are served, fallback bucket excluded
    let response = client
        .get(format!("{base}/api/categories"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let names: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Chimney"));

    // keyword suggestions come from the shipped index
    let response = client
        .get(format!("{base}/api/suggestions?q=led"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["suggestions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s == "TV"));

    // the filter guide is resolved by category slug
    let response = client
        .get(format!("{base}/api/categories/chimney/filter-guide"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["category"], "Chimney");
    assert!(!body["groups"].as_array().unwrap().is_empty());

    // empty store still answers the search with an empty page
    let response = client
        .get(format!("{base}/api/articles?category=chimney&sort=most_liked"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["articlesCount"], 0);
    assert_eq!(body["totalPages"], 0);

    let response = client
        .get(format!("{base}/api/articles/no-such-article"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    // unknown sort keys and facet values are 422s with the standard
    // error body, not bare 400 rejections
    let response = client
        .get(format!("{base}/api/articles?sort=bogus"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["errors"]["body"].is_array());

    let response = client
        .get(format!(
            "{base}/api/articles/no-such-article/smart-pick?usage=extreme"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // wishlist requires a token, and a plain user cannot reach the CMS
    let response = client
        .get(format!("{base}/api/wishlist"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("{base}/api/admin/articles"))
        .header("Authorization", format!("Token {token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}
