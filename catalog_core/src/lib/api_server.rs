use std::{
    net::{SocketAddr, TcpListener},
    path::Path,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use axum::{
    error_handling::HandleErrorLayer,
    extract::{rejection::JsonRejection, Path as UrlPath},
    routing, BoxError, Extension, Json, Router,
};
use catalog_storage::CatalogDatabase;
use catalog_types::{CatalogError, ErrorResponse, Product, ProductDraft};
use hyper::{server::conn::Http, StatusCode};
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;
use tower::ServiceBuilder;
use tracing::{error, info};

use crate::{tls::load_tls_acceptor, Error};

/// HTTP/1 header read deadline, applied to both listeners.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);
/// Deadline for producing a full response.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// The routing table shared by the plain and TLS listeners. Built once,
/// before either listener starts.
pub fn router(db: CatalogDatabase) -> Router {
    let products = Router::new()
        .route("/products", routing::post(create_product))
        .route("/products/:name", routing::get(get_product));

    Router::new()
        .nest("/v1", products)
        .layer(Extension(db))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_deadline_error))
                .timeout(WRITE_TIMEOUT),
        )
}

pub async fn start_api_server(
    listener: SocketAddr,
    router: Router,
) -> Result<(SocketAddr, JoinHandle<Result<(), CatalogError>>), Error> {
    let listener = TcpListener::bind(&listener)?;
    listener.set_nonblocking(true)?;
    let bound_addr = listener.local_addr()?;

    let (tx, rx) = tokio::sync::oneshot::channel();

    info!(target: "catalog-core", "Starting API Server");
    let handle = tokio::spawn(async move {
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .http1_header_read_timeout(READ_TIMEOUT)
            .serve(router.into_make_service());

        let _ = tx.send(());

        server.await.map_err(Into::into)
    });

    let _ = rx.await;
    info!(target: "catalog-core", "API Server started at: {}", bound_addr);

    Ok((bound_addr, handle))
}

pub async fn start_tls_server(
    listener: SocketAddr,
    cert_path: &Path,
    key_path: &Path,
    router: Router,
) -> Result<(SocketAddr, JoinHandle<Result<(), CatalogError>>), Error> {
    let acceptor = load_tls_acceptor(cert_path, key_path)?;

    let listener = tokio::net::TcpListener::bind(&listener).await?;
    let bound_addr = listener.local_addr()?;

    info!(target: "catalog-core", "Starting TLS API Server");
    let handle = tokio::spawn(serve_tls(listener, acceptor, router));
    info!(target: "catalog-core", "TLS API Server started at: {}", bound_addr);

    Ok((bound_addr, handle))
}

async fn serve_tls(
    listener: tokio::net::TcpListener,
    acceptor: TlsAcceptor,
    router: Router,
) -> Result<(), CatalogError> {
    loop {
        let (stream, client_addr) = listener.accept().await?;
        let acceptor = acceptor.clone();
        let router = router.clone();

        tokio::spawn(async move {
            let stream = match acceptor.accept(stream).await {
                Ok(stream) => stream,
                Err(e) => {
                    error!(
                        target: "catalog-core",
                        "TLS handshake with {} failed: {}", client_addr, e
                    );
                    return;
                }
            };

            if let Err(e) = Http::new()
                .http1_header_read_timeout(READ_TIMEOUT)
                .serve_connection(stream, router)
                .await
            {
                error!(
                    target: "catalog-core",
                    "Error serving connection from {}: {}", client_addr, e
                );
            }
        });
    }
}

async fn create_product(
    Extension(state): Extension<CatalogDatabase>,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> Result<Json<Product>, (StatusCode, Json<ErrorResponse>)> {
    let Json(draft) = payload.map_err(|e| bad_request(e.to_string()))?;

    if let Err(e) = draft.validate() {
        return Err(bad_request(e.to_string()));
    }

    let product = draft.into_product(now_millis());

    match state.create(&product.name, &product) {
        Ok(None) => {
            info!(target: "catalog-core", "Register product `{}` success", product.name);
            Ok(Json(product))
        }
        Ok(Some(_)) => Err(bad_request(format!(
            "product {} already exists",
            product.name
        ))),
        Err(e) => {
            error!(target: "catalog-core", "store failure: {}", e);
            Err(internal_error())
        }
    }
}

async fn get_product(
    UrlPath(name): UrlPath<String>,
    Extension(state): Extension<CatalogDatabase>,
) -> Result<Json<Product>, (StatusCode, Json<ErrorResponse>)> {
    info!(target: "catalog-core", "Get product `{}`", name);

    match state.get::<Product>(&name) {
        Ok(Some(product)) => Ok(Json(product)),
        Ok(None) => Err(not_found(format!("product {name} not found"))),
        Err(e) => {
            error!(target: "catalog-core", "store failure: {}", e);
            Err(internal_error())
        }
    }
}

async fn handle_deadline_error(err: BoxError) -> (StatusCode, Json<ErrorResponse>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse {
                error: "response deadline exceeded".to_string(),
            }),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("unhandled internal error: {err}"),
            }),
        )
    }
}

fn bad_request(error: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

fn not_found(error: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error }))
}

fn internal_error() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal storage failure".to_string(),
        }),
    )
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_millis() as u64
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use hyper::Request;
    use tower::ServiceExt;

    use super::*;

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            username: "alice".to_string(),
            name: name.to_string(),
            category: "tools".to_string(),
            price: 100,
            description: "a widget".to_string(),
        }
    }

    async fn register_raw(app: &Router, body: Vec<u8>) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/products")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body())
            .await
            .unwrap()
            .to_vec();
        (status, body)
    }

    async fn register(app: &Router, draft: &ProductDraft) -> (StatusCode, Vec<u8>) {
        register_raw(app, serde_json::to_vec(draft).unwrap()).await
    }

    async fn fetch(app: &Router, name: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/products/{name}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body())
            .await
            .unwrap()
            .to_vec();
        (status, body)
    }

    #[tokio::test]
    async fn register_then_fetch() {
        let app = router(CatalogDatabase::in_memory());

        let (status, body) = register(&app, &draft("widget")).await;
        assert_eq!(status, StatusCode::OK);
        let created: Product = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.username, "alice");
        assert_eq!(created.name, "widget");
        assert_eq!(created.category, "tools");
        assert_eq!(created.price, 100);
        assert_eq!(created.description, "a widget");
        assert_ne!(created.created_at, 0);

        let (status, body) = fetch(&app, "widget").await;
        assert_eq!(status, StatusCode::OK);
        let fetched: Product = serde_json::from_slice(&body).unwrap();
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_and_original_kept() {
        let app = router(CatalogDatabase::in_memory());

        let (status, _) = register(&app, &draft("widget")).await;
        assert_eq!(status, StatusCode::OK);

        let mut second = draft("widget");
        second.price = 999;
        let (status, body) = register(&app, &second).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(payload.error.contains("widget"));

        let (status, body) = fetch(&app, "widget").await;
        assert_eq!(status, StatusCode::OK);
        let fetched: Product = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched.price, 100);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let app = router(CatalogDatabase::in_memory());

        let (status, body) = fetch(&app, "unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(payload.error.contains("unknown"));
    }

    #[tokio::test]
    async fn invalid_drafts_are_rejected() {
        let app = router(CatalogDatabase::in_memory());

        let mut empty_category = draft("widget");
        empty_category.category.clear();
        let (status, body) = register(&app, &empty_category).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(payload.error.contains("category"));

        let mut zero_price = draft("widget");
        zero_price.price = 0;
        let (status, _) = register(&app, &zero_price).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = register_raw(&app, b"{\"username\":\"alice\"}".to_vec()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = fetch(&app, "widget").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn concurrent_registrations_with_distinct_names() {
        let app = router(CatalogDatabase::in_memory());

        let mut handles = Vec::new();
        for i in 0..8 {
            let app = app.clone();
            handles.push(tokio::spawn(async move {
                let response = app
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/v1/products")
                            .header("content-type", "application/json")
                            .body(Body::from(
                                serde_json::to_vec(&draft(&format!("product-{i}"))).unwrap(),
                            ))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::OK);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..8 {
            let (status, body) = fetch(&app, &format!("product-{i}")).await;
            assert_eq!(status, StatusCode::OK);
            let fetched: Product = serde_json::from_slice(&body).unwrap();
            assert_eq!(fetched.name, format!("product-{i}"));
        }
    }
}
