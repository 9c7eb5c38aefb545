mod achievements;
mod checkout;
mod gacha;
mod handlers;

use std::{net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use axum::{
  Router,
  routing::{get, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{prelude::*, state::AppState};

pub fn routes(app: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(handlers::health))
    .route("/api/users/me", get(handlers::me))
    .route("/api/flags/flag-first-wishlist", get(handlers::flag_wishlist))
    .route("/api/categories", get(handlers::categories))
    .route("/api/products", get(handlers::products))
    .route("/api/products/product/{id}", get(handlers::product))
    .route("/api/orders/my-orders", get(handlers::my_orders))
    .route("/api/orders/order-items/{id}", get(handlers::order_items))
    .route("/api/coupons/owned", get(handlers::owned_coupons))
    .route("/api/badges", get(handlers::badges))
    .route("/api/badges/unlocked", get(handlers::unlocked_badges))
    .route("/api/badges/locked", get(handlers::locked_badges))
    .route("/api/achievements/available", get(achievements::available))
    .route("/api/achievements/unlocked", get(achievements::unlocked))
    .route("/api/achievements/claimed", get(achievements::claimed))
    .route(
      "/api/achievements/claim/{id}",
      get(achievements::claim).post(achievements::claim),
    )
    .route("/api/gacha/single", get(gacha::single))
    .route("/api/gacha/ten", get(gacha::ten))
    .route("/api/gacha/roll/{count}", get(gacha::roll))
    .route("/api/checkout", post(checkout::checkout))
    .layer(
      ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
          .allow_origin(Any)
          .allow_methods(Any)
          .allow_headers(Any),
      ),
    )
    .with_state(app)
}

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "http"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(100)
        .finish()
        .context("Failed to build rate limiter config")?,
    );

    let limiter = governor_conf.limiter().clone();

    let addr = SocketAddr::from(([0, 0, 0, 0], app.config.port));
    let router = routes(app)
      .layer(GovernorLayer::new(governor_conf))
      .into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP Server listening on {addr}");

    let limiter = async {
      loop {
        tokio::time::sleep(Duration::from_secs(60)).await;
        limiter.retain_recent();
      }
    };

    let server = async {
      axum::serve(listener, router).await.context("Axum server error")
    };

    tokio::select! {
      result = server => {
        match &result {
          Ok(_) => info!("Server stopped gracefully"),
          Err(err) => error!("Server stopped with error: {err}"),
        }
        result
      }
      _ = limiter => {
        error!("Rate limiter cleaner stopped unexpectedly!");
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
  };
  use tower::ServiceExt;

  use super::*;
  use crate::{
    entity::{CouponType, Rarity},
    state::Config,
    sv::testing::*,
  };

  async fn app() -> (Arc<AppState>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config =
      Config { seed_dir: dir.path().to_path_buf(), ..Config::default() };
    let app = AppState::with_db(setup_test_db().await, config).await.unwrap();
    (Arc::new(app), dir)
  }

  async fn call(
    app: &Arc<AppState>,
    method: &str,
    uri: &str,
    body: Option<json::Value>,
  ) -> (StatusCode, json::Value) {
    let req = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(body) => req
        .header("content-type", "application/json")
        .body(Body::from(body.to_string())),
      None => req.body(Body::empty()),
    }
    .unwrap();

    let res = routes(app.clone()).oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = json::from_slice(&bytes).unwrap_or_else(|_| {
      json::Value::String(String::from_utf8_lossy(&bytes).into())
    });
    (status, body)
  }

  #[tokio::test]
  async fn test_health_and_default_user() {
    let (app, _dir) = app().await;

    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let (status, body) = call(&app, "GET", "/api/users/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gems"], 1000);
    assert_eq!(body["level"], "standard");
  }

  #[tokio::test]
  async fn test_error_bodies() {
    let (app, _dir) = app().await;

    let (status, body) =
      call(&app, "GET", "/api/products/product/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "PRODUCT_NOT_FOUND");

    let (status, body) = call(&app, "GET", "/api/gacha/single", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "EMPTY_RARITY_TIER");

    let (status, body) =
      call(&app, "POST", "/api/achievements/claim/5", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ACHIEVEMENT_NOT_CLAIMABLE");

    let (status, body) = call(&app, "GET", "/api/gacha/roll/3", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ROLL_COUNT");

    let req = json::json!({ "paymentMethod": "card", "items": [] });
    let (status, body) = call(&app, "POST", "/api/checkout", Some(req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
  }

  #[tokio::test]
  async fn test_checkout_and_orders() {
    let (app, _dir) = app().await;
    product(&app.db, 1, 12.5, 4).await;
    coupon(&app.db, 2, Rarity::Common, CouponType::Percentage, 10).await;
    give_coupon(&app.db, 1, 2, 1).await;

    let req = json::json!({
      "paymentMethod": "paypal",
      "items": [{ "productId": 1, "quantity": 2 }],
      "couponId": 2,
    });
    let (status, body) = call(&app, "POST", "/api/checkout", Some(req)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["order"]["subtotal"], 25.0);
    assert_eq!(body["order"]["discount"], 2.5);
    assert_eq!(body["order"]["total"], 22.5);
    assert_eq!(body["order"]["currency"], "EUR");
    assert_eq!(body["order"]["couponId"], 2);

    let (_, orders) = call(&app, "GET", "/api/orders/my-orders", None).await;
    let id = orders[0]["id"].as_i64().unwrap();
    assert_eq!(body["order"]["orderId"], format!("ord_{id}"));

    let uri = format!("/api/orders/order-items/{id}");
    let (status, lines) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lines[0]["quantity"], 2);
    assert_eq!(lines[0]["product"]["stock"], 2);

    let (_, owned) = call(&app, "GET", "/api/coupons/owned", None).await;
    assert_eq!(owned[0]["quantity"], 0);
  }
}
