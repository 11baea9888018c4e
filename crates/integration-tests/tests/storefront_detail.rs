//! End-to-end tests for the product detail overlay.

use axum::http::StatusCode as StubStatus;
use chavoya_integration_tests::{FeedReplies, FeedReply, Storefront};
use reqwest::StatusCode;
use serde_json::json;

fn with_products(products: serde_json::Value) -> FeedReplies {
    FeedReplies {
        products: FeedReply::ok(products),
        ..FeedReplies::default()
    }
}

#[tokio::test]
async fn test_quick_view_full_product() {
    let (_feeds, storefront) = Storefront::with_feeds(FeedReplies::default()).await;

    let (status, body) = storefront.get("/products/1/quick-view").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Bomba de engranes PGP"));
    assert!(body.contains("Descripción: Bomba de engranes de alto rendimiento"));
    assert!(body.contains("Dimensiones: 20 x 15 x 12 cm"));
    assert!(body.contains("Peso: 4.5"));
    assert!(body.contains("USD $1250.00"));
    assert!(body.contains(r#"href="https://cdn.chavoya.mx/pgp.pdf""#));
    assert!(body.contains("Contactar via WhatsApp"));
}

#[tokio::test]
async fn test_quick_view_fallbacks() {
    let (_feeds, storefront) = Storefront::with_feeds(FeedReplies::default()).await;

    let (status, body) = storefront.get("/products/2/quick-view").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Sin descripcion disponible"));
    assert!(body.contains("No Disponible"));
    assert!(body.contains("Ficha técnica no disponible"));
    assert!(!body.contains("Dimensiones:"));
}

#[tokio::test]
async fn test_quick_view_null_text_fields() {
    let replies = with_products(json!([{
        "id_page": "77",
        "Nombre": "Cilindro hidráulico",
        "Marca": null,
        "Categoria": null,
        "Descripcion": null,
        "Dimensiones": null,
        "Peso": null,
        "Precio": null,
        "Imagen": null,
        "Ficha": null
    }]));
    let (_feeds, storefront) = Storefront::with_feeds(replies).await;

    let (status, body) = storefront.get("/products/77/quick-view").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Cilindro hidráulico"));
    assert!(body.contains("Sin descripcion disponible"));
    assert!(body.contains("Ficha técnica no disponible"));
    assert!(body.contains("No Disponible"));
}

#[tokio::test]
async fn test_quick_view_product_without_id() {
    let replies = with_products(json!([
        { "id_page": "1", "Nombre": "Bomba de engranes PGP" },
        { "Nombre": "Manguera sin clave", "Descripcion": "Manguera de alta presión" }
    ]));
    let (_feeds, storefront) = Storefront::with_feeds(replies).await;

    let (status, body) = storefront.get("/products/item-1/quick-view").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Manguera sin clave"));
    assert!(body.contains("Descripción: Manguera de alta presión"));
}

#[tokio::test]
async fn test_quick_view_close_keeps_filters() {
    let (_feeds, storefront) = Storefront::with_feeds(FeedReplies::default()).await;

    let (_, body) = storefront
        .get("/products/3/quick-view?brand=Vickers&tab=marca")
        .await;

    assert!(body.contains(r#"href="/products?brand=Vickers&amp;tab=marca""#));
    assert!(body.contains(r#"hx-get="/products/catalog?brand=Vickers&amp;tab=marca""#));
}

#[tokio::test]
async fn test_quick_view_unknown_product_is_not_found() {
    let (_feeds, storefront) = Storefront::with_feeds(FeedReplies::default()).await;

    let (status, _) = storefront.get("/products/999/quick-view").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quick_view_feed_failure_is_bad_gateway() {
    let replies = FeedReplies {
        products: FeedReply::raw(StubStatus::INTERNAL_SERVER_ERROR, "down"),
        ..FeedReplies::default()
    };
    let (_feeds, storefront) = Storefront::with_feeds(replies).await;

    let (status, body) = storefront.get("/products/1/quick-view").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, "Catalog service unavailable");
}
