use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::item::{ItemService, MemoryItemStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes::{self, ServerState};

struct TestApp {
    base_url: String,
}

/// Boot the full router on an ephemeral port with a fresh in-memory store, so
/// every test runs against an isolated, empty resource space.
async fn start_server() -> anyhow::Result<TestApp> {
    let state = ServerState { items: Arc::new(ItemService::new(Arc::new(MemoryItemStore::new()))) };
    let app: Router = routes::build_router(CorsLayer::very_permissive(), state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create_item(app: &TestApp, name: &str, description: Option<&str>) -> anyhow::Result<serde_json::Value> {
    let res = client()
        .post(format!("{}/api/items", app.base_url))
        .json(&json!({"name": name, "description": description}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    Ok(res.json().await?)
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn create_then_list_in_creation_order() -> anyhow::Result<()> {
    let app = start_server().await?;

    let first = create_item(&app, "Item 1", Some("Description 1")).await?;
    assert_eq!(first["processed"], false);
    assert!(first["id"].is_i64());
    create_item(&app, "Item 2", Some("Description 2")).await?;

    let res = client().get(format!("{}/api/items", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let items = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Item 1");
    assert_eq!(items[1]["name"], "Item 2");
    Ok(())
}

#[tokio::test]
async fn get_missing_item_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/api/items/999", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn get_returns_created_item() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create_item(&app, "Test Item", Some("Test Description")).await?;
    let id = created["id"].as_i64().unwrap();

    let res = client().get(format!("{}/api/items/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "Test Item");
    assert_eq!(body["description"], "Test Description");
    assert_eq!(body["processed"], false);
    Ok(())
}

#[tokio::test]
async fn toggle_flips_and_restores() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create_item(&app, "toggle me", None).await?;
    let id = created["id"].as_i64().unwrap();

    let res = client()
        .post(format!("{}/api/items/{}/toggle-processed", app.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["processed"], true);

    let res = client()
        .post(format!("{}/api/items/{}/toggle-processed", app.base_url, id))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["processed"], false);

    let res = client()
        .post(format!("{}/api/items/999/toggle-processed", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_changes_fields_but_not_processed() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create_item(&app, "before", Some("old")).await?;
    let id = created["id"].as_i64().unwrap();

    // Flip processed first, then make sure PUT leaves it alone.
    client()
        .post(format!("{}/api/items/{}/toggle-processed", app.base_url, id))
        .send()
        .await?;

    let res = client()
        .put(format!("{}/api/items/{}", app.base_url, id))
        .json(&json!({"name": "after", "description": "new"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "after");
    assert_eq!(body["description"], "new");
    assert_eq!(body["processed"], true);

    let res = client()
        .put(format!("{}/api/items/999", app.base_url))
        .json(&json!({"name": "nobody", "description": null}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_then_404_on_repeat() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create_item(&app, "short lived", None).await?;
    let id = created["id"].as_i64().unwrap();

    let res = client().delete(format!("{}/api/items/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = client().get(format!("{}/api/items/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = client().delete(format!("{}/api/items/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn count_and_exists() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = client().get(format!("{}/api/items/count", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<u64>().await?, 0);

    let created = create_item(&app, "counted", None).await?;
    let id = created["id"].as_i64().unwrap();

    let res = client().get(format!("{}/api/items/count", app.base_url)).send().await?;
    assert_eq!(res.json::<u64>().await?, 1);

    let res = client().get(format!("{}/api/items/{}/exists", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<bool>().await?, true);

    let res = client().get(format!("{}/api/items/999/exists", app.base_url)).send().await?;
    assert_eq!(res.json::<bool>().await?, false);
    Ok(())
}

#[tokio::test]
async fn search_by_name_fragment() -> anyhow::Result<()> {
    let app = start_server().await?;
    create_item(&app, "Blue Widget", None).await?;
    create_item(&app, "red widget", None).await?;
    create_item(&app, "gadget", None).await?;

    let res = client()
        .get(format!("{}/api/items/search", app.base_url))
        .query(&[("name", "WIDGET")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let hits = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(hits.len(), 2);

    // No match is an empty 200, not a 404.
    let res = client()
        .get(format!("{}/api/items/search", app.base_url))
        .query(&[("name", "missing")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.json::<Vec<serde_json::Value>>().await?.is_empty());

    // Missing query parameter is rejected by the extractor.
    let res = client().get(format!("{}/api/items/search", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn description_is_optional() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/api/items", app.base_url))
        .json(&json!({"name": "bare"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["description"].is_null());
    Ok(())
}

#[tokio::test]
async fn unparseable_id_is_client_error() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/api/items/not-a-number", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}
