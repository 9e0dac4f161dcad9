//! JSON API surface: router, handlers and the response envelope.
//!
//! Every response body is an object with a `success` flag; failures add
//! a `message` and the status code reflects the error kind: 404 for a
//! missing entity, 400 for bad input, 401 for a missing admin session,
//! 500 for anything unanticipated.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;
use validator::Validate;

use crate::auth::{self, CredentialVerifier, CurrentAdmin, RequireAdmin};
use crate::checkout::{CheckoutCoordinator, CustomerInfo};
use crate::domain::{CartLine, ProductDraft, ProductPatch};
use crate::store::{CartStore, CartView, OrderLedger, ProductCatalog};
use crate::StoreError;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ProductCatalog>,
    pub carts: Arc<CartStore>,
    pub ledger: Arc<OrderLedger>,
    pub checkout: Arc<CheckoutCoordinator>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/products", get(storefront_products))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/cart", get(view_cart))
        .route("/api/cart/add", post(add_to_cart))
        .route("/api/cart/remove", post(remove_from_cart))
        .route("/api/checkout", post(checkout))
        .route("/api/orders", get(list_orders))
        .route("/api/orders/recent", get(recent_orders))
        .route("/api/orders/:id/status", put(update_order_status))
        .route("/admin/api/products", get(admin_products))
        .route("/admin/api/products/add", post(add_product))
        .route("/admin/api/products/update/:id", put(update_product))
        .route("/admin/api/products/delete/:id", delete(delete_product))
        .with_state(state)
}

// =============================================================================
// Error envelope
// =============================================================================

/// Error wrapper choosing the HTTP status from the error kind.
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StoreError::ProductNotFound | StoreError::OrderNotFound => StatusCode::NOT_FOUND,
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::Unauthorized => StatusCode::UNAUTHORIZED,
            StoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Internal detail goes to the log, not the client.
        let message = if let StoreError::Internal(detail) = &self.0 {
            tracing::error!(error = %detail, "request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

type ApiResult = std::result::Result<Json<Value>, ApiError>;

/// Decode a JSON body into a typed request, reporting malformed input
/// through the envelope instead of a framework rejection.
fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| StoreError::Validation(e.to_string()).into())
}

fn validated<T: Validate>(value: T) -> Result<T, ApiError> {
    value
        .validate()
        .map_err(|e| StoreError::Validation(e.to_string()))?;
    Ok(value)
}

fn session_error(err: tower_sessions::session::Error) -> ApiError {
    auth::session_error(err).into()
}

fn cart_payload(view: CartView) -> Json<Value> {
    Json(json!({
        "success": true,
        "cart": view.lines,
        "total": view.total,
        "count": view.count,
    }))
}

// =============================================================================
// Storefront
// =============================================================================

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "neonmart" }))
}

async fn storefront_products(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "success": true, "products": state.catalog.list() }))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Value>,
) -> ApiResult {
    let req: LoginRequest = decode(body)?;
    if !state.credentials.verify(&req.username, &req.password) {
        tracing::warn!(username = %req.username, "rejected admin login");
        return Err(StoreError::Unauthorized.into());
    }
    session
        .insert(
            auth::keys::CURRENT_ADMIN,
            CurrentAdmin {
                username: req.username,
            },
        )
        .await
        .map_err(session_error)?;
    Ok(Json(json!({ "success": true })))
}

async fn logout(session: Session) -> ApiResult {
    session
        .remove::<CurrentAdmin>(auth::keys::CURRENT_ADMIN)
        .await
        .map_err(session_error)?;
    Ok(Json(json!({ "success": true })))
}

// =============================================================================
// Cart
// =============================================================================

async fn view_cart(State(state): State<AppState>, session: Session) -> ApiResult {
    let visitor = auth::visitor_id(&session).await?;
    Ok(cart_payload(state.carts.view(visitor)))
}

#[derive(Debug, Deserialize)]
struct AddToCartRequest {
    product_id: u32,
    #[serde(default = "default_quantity")]
    quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Value>,
) -> ApiResult {
    let req: AddToCartRequest = decode(body)?;
    if req.quantity < 1 {
        return Err(StoreError::validation("quantity must be at least 1").into());
    }
    let quantity = u32::try_from(req.quantity)
        .map_err(|_| StoreError::validation("quantity is too large"))?;

    // Snapshot from the live catalog at add time.
    let product = state.catalog.get(req.product_id)?;
    let visitor = auth::visitor_id(&session).await?;
    state.carts.add(visitor, CartLine::snapshot(&product, quantity));
    Ok(cart_payload(state.carts.view(visitor)))
}

#[derive(Debug, Deserialize)]
struct RemoveFromCartRequest {
    product_id: u32,
}

async fn remove_from_cart(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Value>,
) -> ApiResult {
    let req: RemoveFromCartRequest = decode(body)?;
    let visitor = auth::visitor_id(&session).await?;
    state.carts.remove(visitor, req.product_id);
    Ok(cart_payload(state.carts.view(visitor)))
}

// =============================================================================
// Checkout
// =============================================================================

#[derive(Debug, Default, Deserialize, Validate)]
struct CheckoutRequest {
    customer_name: Option<String>,
    #[validate(email(message = "invalid email address"))]
    customer_email: Option<String>,
}

async fn checkout(
    State(state): State<AppState>,
    session: Session,
    body: Option<Json<Value>>,
) -> ApiResult {
    let req: CheckoutRequest = match body {
        Some(Json(value)) => validated(decode(value)?)?,
        None => CheckoutRequest::default(),
    };
    let visitor = auth::visitor_id(&session).await?;
    let order = state.checkout.checkout(
        visitor,
        CustomerInfo {
            name: req.customer_name,
            email: req.customer_email,
        },
    )?;
    Ok(Json(json!({ "success": true, "order": order })))
}

// =============================================================================
// Orders (admin)
// =============================================================================

async fn list_orders(RequireAdmin(_): RequireAdmin, State(state): State<AppState>) -> ApiResult {
    Ok(Json(json!({ "success": true, "orders": state.ledger.list() })))
}

const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
struct RecentParams {
    limit: Option<usize>,
}

async fn recent_orders(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> ApiResult {
    let orders = state.ledger.recent(params.limit.unwrap_or(DEFAULT_RECENT_LIMIT));
    Ok(Json(json!({ "success": true, "orders": orders })))
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: String,
}

async fn update_order_status(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(body): Json<Value>,
) -> ApiResult {
    let req: StatusRequest = decode(body)?;
    let order = state.ledger.update_status(id, req.status)?;
    tracing::info!(order_id = order.id, status = %order.status, "order status updated");
    Ok(Json(json!({ "success": true, "order": order })))
}

// =============================================================================
// Products (admin)
// =============================================================================

async fn admin_products(RequireAdmin(_): RequireAdmin, State(state): State<AppState>) -> ApiResult {
    Ok(Json(json!({ "success": true, "products": state.catalog.list() })))
}

async fn add_product(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult {
    let draft: ProductDraft = validated(decode(body)?)?;
    let product = state.catalog.create(draft);
    tracing::info!(product_id = product.id, name = %product.name, "product created");
    Ok(Json(json!({ "success": true, "product": product })))
}

async fn update_product(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(body): Json<Value>,
) -> ApiResult {
    let patch: ProductPatch = validated(decode(body)?)?;
    let product = state.catalog.update(id, patch)?;
    Ok(Json(json!({ "success": true, "product": product })))
}

async fn delete_product(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult {
    state.catalog.delete(id);
    tracing::info!(product_id = id, "product deleted");
    Ok(Json(json!({ "success": true })))
}
