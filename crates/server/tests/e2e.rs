mod support;

use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;

use support::{cleanup, test_config};

struct TestApp {
    base_url: String,
    cfg: configs::AppConfig,
}

async fn start_server(auth_required: bool) -> anyhow::Result<TestApp> {
    let cfg = test_config(auth_required);
    let app = server::startup::build_app(&cfg).await?;

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, cfg })
}

fn client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder().build()?)
}

#[tokio::test]
async fn e2e_concurrent_submissions_all_persist() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let client = client()?;

    let mut handles = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = format!("{}/api/formulario", app.base_url);
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({"name": format!("user {i}"), "email": format!("u{i}@example.com"), "message": "hola"}))
                .send()
                .await
                .map(|r| r.status())
        }));
    }
    for h in handles {
        assert_eq!(h.await??, HttpStatusCode::CREATED);
    }

    let list: serde_json::Value = client
        .get(format!("{}/api/formularios?format=json", app.base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(list.as_array().map(Vec::len), Some(20));
    cleanup(&app.cfg).await;
    Ok(())
}

#[tokio::test]
async fn e2e_login_then_submit() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let client = client()?;
    let creds = json!({"username": "alice", "password": "pw1"});

    let res = client.post(format!("{}/api/register", app.base_url)).json(&creds).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = client.post(format!("{}/api/login", app.base_url)).json(&creds).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    let token = body["token"].as_str().unwrap_or_default().to_string();

    let res = client
        .post(format!("{}/api/formulario", app.base_url))
        .bearer_auth(&token)
        .json(&json!({"name": "Ana", "email": "ana@example.com", "message": "hola"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    // CORS preflight for the gated endpoint passes without a token
    let res = client
        .request(reqwest::Method::OPTIONS, format!("{}/api/formulario", app.base_url))
        .header("origin", "http://example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization,content-type")
        .send()
        .await?;
    assert!(res.status().is_success());
    assert_eq!(
        res.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some("*")
    );
    cleanup(&app.cfg).await;
    Ok(())
}

#[tokio::test]
async fn e2e_shutdown_drains_and_persists() -> anyhow::Result<()> {
    let cfg = test_config(false);
    let app = server::startup::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let serving = tokio::spawn(server::startup::serve_until(listener, app, async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::builder().pool_max_idle_per_host(0).build()?;
    let res = client
        .post(format!("{base_url}/api/formulario"))
        .json(&json!({"name": "Ana", "email": "ana@example.com", "message": "hola"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let _ = stop_tx.send(());
    tokio::time::timeout(std::time::Duration::from_secs(5), serving).await???;

    let raw = tokio::fs::read_to_string(cfg.storage.records_path()).await?;
    let stored: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(stored.as_array().map(Vec::len), Some(1));

    let mut entries = tokio::fs::read_dir(&cfg.storage.data_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        assert!(!entry.file_name().to_string_lossy().ends_with(".tmp"));
    }
    cleanup(&cfg).await;
    Ok(())
}
