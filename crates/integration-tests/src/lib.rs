//! Integration tests for the Chavoya storefront.
//!
//! Each test starts a stub catalog feed server and a storefront on ephemeral
//! localhost ports, then talks to the storefront over real HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p chavoya-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    http::{StatusCode, header},
    routing::{MethodRouter, get},
};
use chavoya_storefront::config::{CatalogApiConfig, HeroConfig, StorefrontConfig};
use chavoya_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Canned answer of one feed endpoint.
#[derive(Debug, Clone)]
pub struct FeedReply {
    pub status: StatusCode,
    pub body: String,
}

impl FeedReply {
    /// `200 OK` with `{"response": payload}`.
    #[must_use]
    pub fn ok(payload: Value) -> Self {
        Self::raw(StatusCode::OK, json!({ "response": payload }).to_string())
    }

    /// Arbitrary status and body.
    #[must_use]
    pub fn raw(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Answers for the three feeds.
#[derive(Debug, Clone)]
pub struct FeedReplies {
    pub categories: FeedReply,
    pub products: FeedReply,
    pub brands: FeedReply,
}

impl Default for FeedReplies {
    /// A small hydraulic catalog: two categories, two brands, three products.
    fn default() -> Self {
        Self {
            categories: FeedReply::ok(json!([{ "Nombre": "Bombas" }, { "Nombre": "Válvulas" }])),
            brands: FeedReply::ok(json!([{ "Nombre": "Parker" }, { "Nombre": "Vickers" }])),
            products: FeedReply::ok(json!([
                {
                    "id_page": 1,
                    "Nombre": "Bomba de engranes PGP",
                    "Marca": "Parker",
                    "Categoria": "Bombas",
                    "Descripcion": "Bomba de engranes de alto rendimiento",
                    "Dimensiones": "20 x 15 x 12 cm",
                    "Peso": 4.5,
                    "Precio": 1250,
                    "Imagen": "https://cdn.chavoya.mx/pgp.jpg",
                    "Ficha": "https://cdn.chavoya.mx/pgp.pdf"
                },
                {
                    "id_page": "2",
                    "Nombre": "Válvula direccional D1VW",
                    "Marca": "Parker",
                    "Categoria": "Válvulas",
                    "Descripcion": "",
                    "Precio": 0,
                    "Imagen": "https://cdn.chavoya.mx/d1vw.jpg",
                    "Ficha": ""
                },
                {
                    "id_page": "3",
                    "Nombre": "Bomba de paletas V10",
                    "Marca": "Vickers",
                    "Categoria": "Bombas",
                    "Precio": "389.999",
                    "Imagen": "https://cdn.chavoya.mx/v10.jpg"
                }
            ])),
        }
    }
}

/// Running stub of the catalog feed API.
pub struct FeedServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl FeedServer {
    /// Start serving `replies` on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(replies: FeedReplies) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));

        let router = Router::new()
            .route("/api/categoriasProductos", reply(replies.categories, &hits))
            .route("/api/productos", reply(replies.products, &hits))
            .route("/api/marca", reply(replies.brands, &hits));

        let addr = serve(router).await;
        Self { addr, hits }
    }

    /// Base URL to configure the storefront with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Total feed requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn reply(reply: FeedReply, hits: &Arc<AtomicUsize>) -> MethodRouter {
    let hits = Arc::clone(hits);
    get(move || {
        hits.fetch_add(1, Ordering::SeqCst);
        let reply = reply.clone();
        async move {
            (
                reply.status,
                [(header::CONTENT_TYPE, "application/json")],
                reply.body,
            )
        }
    })
}

/// Running storefront.
pub struct Storefront {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl Storefront {
    /// Start a storefront reading its catalog from `feeds`.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be configured or bound.
    pub async fn start(feeds: &FeedServer) -> Self {
        let catalog = CatalogApiConfig::with_base_url(&feeds.base_url())
            .expect("stub feed URL is valid");

        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            catalog,
            quote_phone: chavoya_core::quote::DEFAULT_PHONE.to_string(),
            hero: HeroConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(config).expect("storefront state builds");
        let addr = serve(chavoya_storefront::app(state)).await;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("HTTP client builds");

        Self { addr, client }
    }

    /// Start a feed stub with `replies` and a storefront reading from it.
    pub async fn with_feeds(replies: FeedReplies) -> (FeedServer, Self) {
        let feeds = FeedServer::start(replies).await;
        let storefront = Self::start(&feeds).await;
        (feeds, storefront)
    }

    /// Absolute URL for `path_and_query`.
    #[must_use]
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{path_and_query}", self.addr)
    }

    /// GET `path_and_query`, returning status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn get(&self, path_and_query: &str) -> (reqwest::StatusCode, String) {
        let response = self
            .client
            .get(self.url(path_and_query))
            .send()
            .await
            .expect("storefront request succeeds");
        let status = response.status();
        let body = response.text().await.expect("storefront body is text");
        (status, body)
    }
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port binds");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    addr
}
