use super::*;
use axum::{http::StatusCode, routing::get, Json, Router};
use tokio::net::TcpListener;

async fn spawn_breed_server(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn external_source_yields_remote_names() {
    let app = Router::new().route(
        "/breeds",
        get(|| async { Json(serde_json::json!([{"name": "Bengal"}, {"name": "Sphynx"}])) }),
    );
    let base = spawn_breed_server(app).await.expect("spawn server");
    let source = CatApiBreedSource::with_base_url(base);

    let names = resolve_breed_options(&source).await;
    assert_eq!(names, vec!["Bengal".to_string(), "Sphynx".to_string()]);
}

#[tokio::test]
async fn server_failure_degrades_to_fallback() {
    let app = Router::new().route(
        "/breeds",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "catalog exploded") }),
    );
    let base = spawn_breed_server(app).await.expect("spawn server");
    let source = CatApiBreedSource::with_base_url(base);

    let names = resolve_breed_options(&source).await;
    assert_eq!(names.len(), 12);
    assert_eq!(names, FALLBACK_BREEDS.map(String::from).to_vec());
}

#[tokio::test]
async fn malformed_body_degrades_to_fallback() {
    let app = Router::new().route(
        "/breeds",
        get(|| async { Json(serde_json::json!({"unexpected": "shape"})) }),
    );
    let base = spawn_breed_server(app).await.expect("spawn server");
    let source = CatApiBreedSource::with_base_url(base);

    let names = resolve_breed_options(&source).await;
    assert_eq!(names.len(), 12);
    assert_eq!(names[0], "Abyssinian");
}

#[tokio::test]
async fn unreachable_host_degrades_to_fallback() {
    let source = CatApiBreedSource::with_base_url("http://127.0.0.1:9");

    let names = resolve_breed_options(&source).await;
    assert_eq!(names.len(), 12);
    assert_eq!(names[11], "Sphynx");
}
