//! Gateway HTTP Routes
//!
//! The eight resource endpoints, as thin handlers over the shared
//! [`Gateway`] core. Each handler picks its static resource declaration
//! and delegates; the error type carries its own response mapping.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::gateway::{Gateway, GatewayError, CUSTOMERS, PRODUCTS};

// ==================
// Shared State
// ==================

/// Gateway state shared across handlers
#[derive(Clone)]
pub struct GatewayState {
    pub gateway: Gateway,
}

impl GatewayState {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

// ==================
// Response Types
// ==================

/// Fixed confirmation message body for update/delete
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================
// Routes
// ==================

pub fn gateway_routes(state: GatewayState) -> Router {
    Router::new()
        // Customers
        .route(
            "/clientes",
            get(list_customers_handler).post(create_customer_handler),
        )
        .route(
            "/clientes/:id",
            put(update_customer_handler).delete(delete_customer_handler),
        )
        // Products
        .route(
            "/produtos",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/produtos/:id",
            put(update_product_handler).delete(delete_product_handler),
        )
        .with_state(state)
}

// ==================
// Customer Handlers
// ==================

async fn list_customers_handler(
    State(state): State<GatewayState>,
) -> Result<Json<Value>, GatewayError> {
    let rows = state.gateway.list(&CUSTOMERS).await?;
    Ok(Json(rows_to_array(rows)))
}

async fn create_customer_handler(
    State(state): State<GatewayState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, GatewayError> {
    let record = state.gateway.create(&CUSTOMERS, &body).await?;
    Ok(Json(Value::Object(record)))
}

async fn update_customer_handler(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<MessageResponse>, GatewayError> {
    let message = state.gateway.update(&CUSTOMERS, &id, &body).await?;
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

async fn delete_customer_handler(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, GatewayError> {
    let message = state.gateway.delete(&CUSTOMERS, &id).await?;
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

// ==================
// Product Handlers
// ==================

async fn list_products_handler(
    State(state): State<GatewayState>,
) -> Result<Json<Value>, GatewayError> {
    let rows = state.gateway.list(&PRODUCTS).await?;
    Ok(Json(rows_to_array(rows)))
}

async fn create_product_handler(
    State(state): State<GatewayState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, GatewayError> {
    let record = state.gateway.create(&PRODUCTS, &body).await?;
    Ok(Json(Value::Object(record)))
}

async fn update_product_handler(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<MessageResponse>, GatewayError> {
    let message = state.gateway.update(&PRODUCTS, &id, &body).await?;
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

async fn delete_product_handler(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, GatewayError> {
    let message = state.gateway.delete(&PRODUCTS, &id).await?;
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

// ==================
// Helpers
// ==================

/// Row maps come back verbatim as a JSON array of records.
fn rows_to_array(rows: Vec<serde_json::Map<String, Value>>) -> Value {
    Value::Array(rows.into_iter().map(Value::Object).collect())
}
