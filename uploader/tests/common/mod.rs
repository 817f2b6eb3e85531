// Not every helper is used in every test, so we allow dead code
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::put,
    Extension, Router,
};
use backend::{
    issuance::{CorsPolicy, IssuanceEndpoint},
    media_storage::{mock::MockUrlIssuer, KeyDeriver},
    routes,
    types::Environment,
};
use tokio::net::TcpListener;

/// Stored object: content type and bytes
type StoredObject = (String, Bytes);

/// Object store stand-in that enforces the content type bound into the write URL
#[derive(Clone, Default)]
pub struct FakeObjectStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl FakeObjectStore {
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    fn router(self) -> Router {
        Router::new()
            .route("/{*key}", put(put_object).get(get_object))
            .with_state(self)
    }
}

async fn put_object(
    State(store): State<FakeObjectStore>,
    Path(key): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if params.get("op").map(String::as_str) != Some("put")
        || params.get("content-type").map(String::as_str) != Some(content_type)
    {
        return StatusCode::FORBIDDEN;
    }

    store
        .objects
        .lock()
        .unwrap()
        .insert(key, (content_type.to_string(), body));
    StatusCode::OK
}

async fn get_object(
    State(store): State<FakeObjectStore>,
    Path(key): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if params.get("op").map(String::as_str) != Some("get") {
        return StatusCode::FORBIDDEN.into_response();
    }

    match store.objects.lock().unwrap().get(&key) {
        Some((content_type, content)) => {
            ([(CONTENT_TYPE, content_type.clone())], content.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serves `router` on an ephemeral local port, returning its base URL
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A running issuance backend and the object store its URLs point at
pub struct TestStack {
    pub functions_root: String,
    pub store_url: String,
    pub store: FakeObjectStore,
    pub url_issuer: Arc<MockUrlIssuer>,
}

impl TestStack {
    pub async fn start() -> Self {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .try_init()
            .ok();

        let store = FakeObjectStore::default();
        let store_url = serve(store.clone().router()).await;

        let url_issuer = Arc::new(MockUrlIssuer::new(store_url.clone()));
        let issuance_endpoint = Arc::new(IssuanceEndpoint::new(
            KeyDeriver::default(),
            url_issuer.clone(),
            CorsPolicy::new("*").unwrap(),
        ));

        let router: Router = routes::handler()
            .layer(Extension(Environment::Development {
                presign_expiry_override: None,
            }))
            .layer(Extension(issuance_endpoint))
            .into();
        let backend_url = serve(router).await;

        Self {
            functions_root: format!("{backend_url}/"),
            store_url,
            store,
            url_issuer,
        }
    }
}
