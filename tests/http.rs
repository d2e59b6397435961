use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use fish_tracker::{
    Config, Dispatch, FishCatalogLoader, Page, ToggleCaughtHandler, ToggleOutcome, UiError,
    dispatch_click,
    dom::{Document, NodeId},
    notify::{FAILURE_TEXT, NotificationBanner, WARNING_TEXT},
    ui::{Layout, mount_collection_card, mount_layout},
};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Stand-in for both the application backend and the reference catalog.
#[derive(Clone, Default)]
struct Backend {
    caught: Arc<Mutex<HashSet<(String, String)>>>,
    catalog: Arc<Mutex<Vec<Value>>>,
    catalog_down: Arc<AtomicBool>,
}

impl Backend {
    fn set_catalog(&self, entries: Vec<Value>) {
        *self.catalog.lock().unwrap() = entries;
    }
}

async fn toggle_fish(
    State(backend): State<Backend>,
    Path((user_id, fish_id)): Path<(String, String)>,
) -> Response {
    match user_id.as_str() {
        "500" => return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "garbled" => return Json(json!({ "fish": { "caught": "yes" } })).into_response(),
        _ => {}
    }

    let mut caught = backend.caught.lock().unwrap();
    let key = (user_id, fish_id.clone());
    let is_caught = if caught.remove(&key) {
        false
    } else {
        caught.insert(key);
        true
    };
    Json(json!({ "fish": { "id": fish_id, "is_caught": is_caught } })).into_response()
}

async fn fish_detail(Path(fish_id): Path<String>) -> Response {
    if fish_id == "13" {
        return (StatusCode::NOT_FOUND, "no such fish").into_response();
    }
    Json(json!({
        "fish": {
            "id": fish_id,
            "name": { "name-USen": format!("fish {fish_id}") },
            "icon_uri": format!("https://example.test/icons/fish/{fish_id}"),
            "catchphrase": format!("I caught fish {fish_id}!"),
        }
    }))
    .into_response()
}

async fn catalog_all(State(backend): State<Backend>) -> Response {
    if backend.catalog_down.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "down").into_response();
    }
    Json(Value::Array(backend.catalog.lock().unwrap().clone())).into_response()
}

async fn catalog_one(State(backend): State<Backend>, Path(id): Path<u32>) -> Response {
    let catalog = backend.catalog.lock().unwrap();
    match catalog.iter().find(|entry| entry["id"] == json!(id)) {
        Some(entry) => Json(entry.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn catalog_entry(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "file-name": name.to_lowercase(),
        "name": { "name-USen": name, "name-EUde": name },
        "icon_uri": format!("https://example.test/icons/fish/{id}"),
        "image_uri": format!("https://example.test/images/fish/{id}"),
        "catch-phrase": format!("I caught a {name}!"),
    })
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/users/:user_id/fish/:fish_id", patch(toggle_fish))
        .route("/api/fish/:fish_id", get(fish_detail))
        .route("/catalog/fish", get(catalog_all))
        .route("/catalog/fish/:id", get(catalog_one))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend stopped");
    });
    (format!("http://{addr}"), backend)
}

struct Harness {
    page: Page,
    layout: Layout,
    backend: Backend,
    toggles: ToggleCaughtHandler,
}

impl Harness {
    async fn new() -> Self {
        let (base_url, backend) = spawn_backend().await;
        let mut document = Document::new();
        let layout = mount_layout(&mut document);
        let config = Config::new(base_url.clone(), format!("{base_url}/catalog"));
        let page = Page::from_config(&config, document).unwrap();
        let toggles = ToggleCaughtHandler::register(page.clone(), layout.collection);
        Self {
            page,
            layout,
            backend,
            toggles,
        }
    }

    async fn card(&self, user_id: &str, fish_attr: &str, caught: bool) -> NodeId {
        let mut doc = self.page.document.lock().await;
        mount_collection_card(&mut doc, self.layout.collection, user_id, fish_attr, "Koi", caught)
    }

    async fn click(&self, target: NodeId) -> Result<ToggleOutcome, UiError> {
        match dispatch_click(&self.toggles, target).await {
            Dispatch::Toggling { event, task } => {
                assert!(event.default_prevented());
                task.await.unwrap()
            }
            other => panic!("click was not routed to the toggle handler: {other:?}"),
        }
    }

    async fn banner(&self) -> Option<(String, String)> {
        let doc = self.page.document.lock().await;
        let banner = NotificationBanner::resolve(&doc).unwrap();
        let container = doc.get_element_by_id("message-container").unwrap();
        assert!(doc.children(container).len() <= 1);
        banner.current(&doc).map(|node| {
            (
                doc.attr(node, "class").unwrap_or_default().to_string(),
                doc.text_content(node),
            )
        })
    }
}

#[tokio::test]
async fn toggle_marks_fish_caught_and_shows_catchphrase() {
    let harness = Harness::new().await;
    let control = harness.card("8989", "fish-42", false).await;

    let outcome = harness.click(control).await.unwrap();
    assert_eq!(
        outcome,
        ToggleOutcome::Caught {
            catchphrase: "I caught fish 42!".to_string()
        }
    );

    {
        let doc = harness.page.document.lock().await;
        assert!(doc.is_hidden(control));
        let parent = doc.parent(control).unwrap();
        let appended = *doc.children(parent).last().unwrap();
        assert_ne!(appended, control);
        assert_eq!(doc.text_content(appended), "Uncaught");
        assert!(doc.has_class(appended, "btn-danger"));
        assert_eq!(doc.attr(appended, "href"), Some("/fish/42"));
    }

    let (class, text) = harness.banner().await.unwrap();
    assert!(class.contains("alert-success"));
    assert!(text.contains("I caught fish 42!"));
}

#[tokio::test]
async fn toggling_back_shows_warning() {
    let harness = Harness::new().await;
    let control = harness.card("8989", "fish-7", false).await;
    harness.click(control).await.unwrap();

    let uncaught_button = {
        let doc = harness.page.document.lock().await;
        let parent = doc.parent(control).unwrap();
        *doc.children(parent).last().unwrap()
    };
    let outcome = harness.click(uncaught_button).await.unwrap();
    assert_eq!(outcome, ToggleOutcome::Uncaught);

    {
        let doc = harness.page.document.lock().await;
        assert!(doc.is_hidden(uncaught_button));
        let parent = doc.parent(control).unwrap();
        let appended = *doc.children(parent).last().unwrap();
        assert_eq!(doc.text_content(appended), "Caught!");
        assert!(doc.has_class(appended, "btn-success"));
    }

    let (class, text) = harness.banner().await.unwrap();
    assert!(class.contains("alert-warning"));
    assert!(text.starts_with(WARNING_TEXT));
}

#[tokio::test]
async fn hidden_control_is_not_clickable_again() {
    let harness = Harness::new().await;
    let control = harness.card("8989", "fish-3", false).await;
    harness.click(control).await.unwrap();

    assert!(matches!(
        dispatch_click(&harness.toggles, control).await,
        Dispatch::Ignored(_)
    ));
}

#[tokio::test]
async fn ids_with_path_characters_stay_in_their_segment() {
    let harness = Harness::new().await;
    let control = harness.card("2/fish/9#", "fish-42", false).await;

    let outcome = harness.click(control).await.unwrap();
    assert!(matches!(outcome, ToggleOutcome::Caught { .. }));

    let caught = harness.backend.caught.lock().unwrap();
    assert!(caught.contains(&("2/fish/9#".to_string(), "42".to_string())));
    assert!(!caught.contains(&("2".to_string(), "9".to_string())));
    assert_eq!(caught.len(), 1);
}

#[tokio::test]
async fn server_error_keeps_control_visible() {
    let harness = Harness::new().await;
    let control = harness.card("500", "fish-42", false).await;

    let err = harness.click(control).await.unwrap_err();
    assert!(matches!(err, UiError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));

    {
        let doc = harness.page.document.lock().await;
        assert!(!doc.is_hidden(control));
        let parent = doc.parent(control).unwrap();
        assert_eq!(doc.children(parent).len(), 2);
    }

    let (class, text) = harness.banner().await.unwrap();
    assert!(class.contains("alert-danger"));
    assert!(text.starts_with(FAILURE_TEXT));
}

#[tokio::test]
async fn malformed_toggle_response_is_reported() {
    let harness = Harness::new().await;
    let control = harness.card("garbled", "fish-42", false).await;

    let err = harness.click(control).await.unwrap_err();
    assert!(matches!(err, UiError::MalformedResponse { .. }));
    assert!(err.is_network());

    let doc = harness.page.document.lock().await;
    assert!(!doc.is_hidden(control));
}

#[tokio::test]
async fn catchphrase_failure_keeps_swapped_control() {
    let harness = Harness::new().await;
    let control = harness.card("8989", "fish-13", false).await;

    let err = harness.click(control).await.unwrap_err();
    assert!(matches!(err, UiError::Status { status, .. } if status == StatusCode::NOT_FOUND));

    {
        let doc = harness.page.document.lock().await;
        assert!(doc.is_hidden(control));
        let parent = doc.parent(control).unwrap();
        let appended = *doc.children(parent).last().unwrap();
        assert_eq!(doc.text_content(appended), "Uncaught");
    }

    let (class, _) = harness.banner().await.unwrap();
    assert!(class.contains("alert-danger"));
}

#[tokio::test]
async fn missing_card_attributes_surface_as_failure() {
    let harness = Harness::new().await;
    let control = {
        let mut doc = harness.page.document.lock().await;
        let card = doc.create_element("div");
        doc.add_class(card, "card");
        let button = doc.create_element("a");
        doc.add_class(button, "btn");
        doc.append_child(card, button);
        doc.append_child(harness.layout.collection, card);
        button
    };

    let err = harness.click(control).await.unwrap_err();
    assert!(matches!(err, UiError::MissingAttribute { .. }));
    assert!(!err.is_network());

    let (class, _) = harness.banner().await.unwrap();
    assert!(class.contains("alert-danger"));
}

#[tokio::test]
async fn concurrent_clicks_resolve_independently() {
    let harness = Harness::new().await;
    let first = harness.card("8989", "fish-1", false).await;
    let second = harness.card("8989", "fish-2", true).await;
    harness
        .backend
        .caught
        .lock()
        .unwrap()
        .insert(("8989".to_string(), "2".to_string()));

    let Dispatch::Toggling {
        task: first_task, ..
    } = dispatch_click(&harness.toggles, first).await
    else {
        panic!("first click not handled");
    };
    let Dispatch::Toggling {
        task: second_task, ..
    } = dispatch_click(&harness.toggles, second).await
    else {
        panic!("second click not handled");
    };

    assert!(matches!(first_task.await.unwrap(), Ok(ToggleOutcome::Caught { .. })));
    assert_eq!(second_task.await.unwrap().unwrap(), ToggleOutcome::Uncaught);

    let doc = harness.page.document.lock().await;
    assert!(doc.is_hidden(first));
    assert!(doc.is_hidden(second));
    let container = doc.get_element_by_id("message-container").unwrap();
    assert_eq!(doc.children(container).len(), 1);
}

#[tokio::test]
async fn close_button_dismisses_banner() {
    let harness = Harness::new().await;
    let control = harness.card("8989", "fish-5", false).await;
    harness.click(control).await.unwrap();

    let close = {
        let doc = harness.page.document.lock().await;
        let container = doc.get_element_by_id("message-container").unwrap();
        doc.descendants_with_class(container, "close")[0]
    };
    assert!(matches!(
        dispatch_click(&harness.toggles, close).await,
        Dispatch::Dismissed(_)
    ));
    assert!(harness.banner().await.is_none());
}

#[tokio::test]
async fn catalog_load_renders_and_replaces_grid() {
    let harness = Harness::new().await;
    let loader = FishCatalogLoader::new(harness.page.clone());

    harness
        .backend
        .set_catalog(vec![catalog_entry(1, "Anchovy"), catalog_entry(2, "Barreleye")]);
    assert_eq!(loader.load().await.unwrap(), 2);

    {
        let doc = harness.page.document.lock().await;
        let cards = doc.children(harness.layout.grid);
        assert_eq!(cards.len(), 2);
        assert!(doc.text_content(cards[0]).contains("Anchovy"));
        assert!(doc.text_content(cards[1]).contains("Barreleye"));
        assert!(doc.get_element_by_id("fish-1").is_some());
        assert!(doc.get_element_by_id("fish-2").is_some());
    }

    harness.backend.set_catalog(vec![catalog_entry(3, "Betta")]);
    assert_eq!(loader.load().await.unwrap(), 1);

    let doc = harness.page.document.lock().await;
    assert_eq!(doc.children(harness.layout.grid).len(), 1);
    assert!(doc.get_element_by_id("fish-1").is_none());
    assert!(doc.get_element_by_id("fish-3").is_some());
}

#[tokio::test]
async fn catalog_failure_keeps_previous_cards() {
    let harness = Harness::new().await;
    let loader = FishCatalogLoader::new(harness.page.clone());
    harness.backend.set_catalog(vec![catalog_entry(1, "Anchovy")]);
    loader.load().await.unwrap();

    harness.backend.catalog_down.store(true, Ordering::SeqCst);
    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, UiError::Status { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE));

    {
        let doc = harness.page.document.lock().await;
        assert_eq!(doc.children(harness.layout.grid).len(), 1);
    }
    let (class, _) = harness.banner().await.unwrap();
    assert!(class.contains("alert-danger"));
}

#[tokio::test]
async fn get_fish_leaves_page_untouched() {
    let harness = Harness::new().await;
    harness.backend.set_catalog(vec![catalog_entry(4, "Carp")]);
    let loader = FishCatalogLoader::new(harness.page.clone());

    let before = {
        let doc = harness.page.document.lock().await;
        doc.to_html(doc.body())
    };
    let fish = loader.get_fish(4).await.unwrap();
    assert_eq!(fish.name.display(), "Carp");
    assert_eq!(fish.catch_phrase.as_deref(), Some("I caught a Carp!"));

    let doc = harness.page.document.lock().await;
    assert_eq!(doc.to_html(doc.body()), before);
}

#[tokio::test]
async fn unknown_target_is_ignored() {
    let harness = Harness::new().await;
    let dispatch = dispatch_click(&harness.toggles, harness.layout.grid).await;
    assert!(matches!(dispatch, Dispatch::Ignored(_)));
    assert!(!dispatch.event().default_prevented());
}

#[tokio::test]
async fn only_routed_clicks_are_default_prevented() {
    let harness = Harness::new().await;
    let control = harness.card("8989", "fish-11", false).await;

    let dispatch = dispatch_click(&harness.toggles, control).await;
    assert!(dispatch.event().default_prevented());
    assert_eq!(dispatch.event().target(), control);
    let Dispatch::Toggling { task, .. } = dispatch else {
        panic!("toggle click was not routed");
    };
    assert!(task.await.unwrap().is_ok());

    let outside = {
        let mut doc = harness.page.document.lock().await;
        let grid = harness.layout.grid;
        mount_collection_card(&mut doc, grid, "8989", "fish-12", "Carp", false)
    };
    let ignored = dispatch_click(&harness.toggles, outside).await;
    assert!(matches!(ignored, Dispatch::Ignored(_)));
    assert!(!ignored.event().default_prevented());
}
