use super::*;
use axum::{
    extract::{Query, State},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use shared::error::FetchError;
use std::collections::{HashMap, HashSet};
use tokio::{net::TcpListener, sync::Mutex};

const TOTAL_PAGES: u32 = 3;
const PAGE_SIZE: u32 = 2;

#[derive(Clone)]
struct ProviderState {
    server_url: String,
    failing_pages: Arc<HashSet<u32>>,
    user_agents: Arc<Mutex<Vec<String>>>,
}

async fn list_characters(
    State(state): State<ProviderState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    if let Some(agent) = headers.get(USER_AGENT).and_then(|v| v.to_str().ok()) {
        state.user_agents.lock().await.push(agent.to_string());
    }

    let page: u32 = query
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    if state.failing_pages.contains(&page) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    if page == 0 || page > TOTAL_PAGES {
        return Err(StatusCode::NOT_FOUND);
    }

    let link = |p: u32| format!("{}/api/character?page={p}", state.server_url);
    let next = (page < TOTAL_PAGES).then(|| link(page + 1));
    let prev = (page > 1).then(|| link(page - 1));
    let results: Vec<Value> = (1..=PAGE_SIZE)
        .map(|offset| {
            let id = (page - 1) * PAGE_SIZE + offset;
            let kind = if id % 2 == 0 { Value::Null } else { json!("Clone") };
            json!({
                "id": id,
                "name": format!("character-{id}"),
                "status": "Alive",
                "species": "Human",
                "type": kind,
                "gender": "unknown",
                "image": format!("{}/avatar/{id}.jpeg", state.server_url),
                "episode": []
            })
        })
        .collect();

    let total = TOTAL_PAGES * PAGE_SIZE;
    Ok(Json(json!({
        "info": {
            "count": total,
            "pages": TOTAL_PAGES,
            "next": next,
            "prev": prev
        },
        "results": results
    })))
}

async fn garbled_characters() -> &'static str {
    "{\"info\": {\"next\": null, \"prev\": null}, \"results\": [{\"id\": 1}]}"
}

async fn spawn_provider(failing_pages: &[u32]) -> anyhow::Result<(String, ProviderState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ProviderState {
        server_url: format!("http://{addr}"),
        failing_pages: Arc::new(failing_pages.iter().copied().collect()),
        user_agents: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api/character", get(list_characters))
        .route("/garbled/character", get(garbled_characters))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((state.server_url.clone(), state))
}

fn settings_for(base_url: String) -> ClientSettings {
    ClientSettings {
        base_url,
        ..ClientSettings::default()
    }
}

fn ids(snapshot: &ControllerSnapshot) -> Vec<i64> {
    snapshot.records.iter().map(|r| r.id().0).collect()
}

#[tokio::test]
async fn walks_provider_pages_forward_and_back() {
    let (server_url, _state) = spawn_provider(&[]).await.expect("spawn provider");
    let controller =
        controller_from_settings(&settings_for(format!("{server_url}/api"))).expect("controller");

    controller.load_first().await;
    let first = controller.snapshot().await;
    assert_eq!(ids(&first), vec![1, 2]);
    assert!(first.has_next());
    assert!(!first.has_previous());
    assert_eq!(first.records[0].record_type(), Some("Clone"));
    assert_eq!(first.records[1].record_type(), None);
    assert_eq!(first.total_count, Some(6));

    controller.load_next().await;
    let second = controller.snapshot().await;
    assert_eq!(ids(&second), vec![3, 4]);
    assert!(second.has_next());
    assert!(second.has_previous());

    controller.load_next().await;
    let last = controller.snapshot().await;
    assert_eq!(ids(&last), vec![5, 6]);
    assert!(!last.has_next());

    controller.load_next().await;
    assert_eq!(controller.snapshot().await, last);

    controller.load_previous().await;
    assert_eq!(ids(&controller.snapshot().await), vec![3, 4]);
}

#[tokio::test]
async fn server_error_during_pagination_keeps_current_page() {
    let (server_url, _state) = spawn_provider(&[2]).await.expect("spawn provider");
    let controller =
        controller_from_settings(&settings_for(format!("{server_url}/api"))).expect("controller");

    controller.load_first().await;
    let before = controller.snapshot().await;
    controller.load_next().await;

    let after = controller.snapshot().await;
    assert_eq!(after.records, before.records);
    assert_eq!(after.links, before.links);
    assert!(!after.is_loading);
    assert_eq!(
        after.error_message.as_deref(),
        Some(PAGINATION_FAILED_MESSAGE)
    );
    assert_eq!(controller.last_error().await, Some(FetchError::HttpError(500)));
}

#[tokio::test]
async fn undecodable_body_reports_initial_load_failure() {
    let (server_url, _state) = spawn_provider(&[]).await.expect("spawn provider");
    let controller = controller_from_settings(&settings_for(format!("{server_url}/garbled")))
        .expect("controller");

    controller.load_first().await;

    let snapshot = controller.snapshot().await;
    assert!(snapshot.records.is_empty());
    assert_eq!(
        snapshot.error_message.as_deref(),
        Some(INITIAL_LOAD_FAILED_MESSAGE)
    );
    assert!(matches!(
        controller.last_error().await,
        Some(FetchError::DecodingError(_))
    ));
}

#[tokio::test]
async fn missing_collection_is_http_not_found() {
    let (server_url, _state) = spawn_provider(&[]).await.expect("spawn provider");
    let mut settings = settings_for(format!("{server_url}/api"));
    settings.collection_path = "location".into();
    let controller = controller_from_settings(&settings).expect("controller");

    controller.load_first().await;

    assert_eq!(controller.last_error().await, Some(FetchError::HttpError(404)));
}

#[tokio::test]
async fn unreachable_provider_is_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let controller =
        controller_from_settings(&settings_for(format!("http://{addr}/api"))).expect("controller");
    controller.load_first().await;

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.is_loading);
    assert_eq!(
        snapshot.error_message.as_deref(),
        Some(INITIAL_LOAD_FAILED_MESSAGE)
    );
    assert!(matches!(
        controller.last_error().await,
        Some(FetchError::Transport(_))
    ));
}

#[tokio::test]
async fn configured_user_agent_is_sent() {
    let (server_url, state) = spawn_provider(&[]).await.expect("spawn provider");
    let mut settings = settings_for(format!("{server_url}/api"));
    settings.user_agent = Some("pager-test/0.1".into());
    let controller = controller_from_settings(&settings).expect("controller");

    controller.load_first().await;

    assert_eq!(
        state.user_agents.lock().await.clone(),
        vec!["pager-test/0.1".to_string()]
    );
}

#[test]
fn invalid_base_url_is_rejected_up_front() {
    let err = controller_from_settings(&settings_for("not a url".into()))
        .err()
        .expect("must fail");
    assert!(err.to_string().contains("invalid base url"), "{err}");
}
