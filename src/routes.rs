use crate::error::AppError;
use crate::provider::CreatedInvoice;
use crate::State;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::http::{StatusCode, Uri};
use axum::{Extension, Json};
use log::info;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub amount: Option<u64>, // satoshis
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub memo: Option<String>,
}

/// Creates an invoice with the configured provider and records it as pending.
///
/// The provider call and the insert are not atomic: if the insert fails the
/// provider-side invoice still exists.
pub(crate) async fn create_invoice_impl(
    state: &State,
    req: CreateInvoiceRequest,
) -> Result<CreatedInvoice, AppError> {
    let amount = match req.amount {
        None => return Err(AppError::Validation("Missing amount parameter".to_string())),
        Some(0) => return Err(AppError::Validation("Amount must be positive".to_string())),
        Some(amount) if i64::try_from(amount).is_err() => {
            return Err(AppError::Validation(format!("Amount {amount} is too large")))
        }
        Some(amount) => amount,
    };

    let invoice = state.provider.create_invoice(amount, req.memo.clone()).await?;
    let saved = state.store.save_invoice(&invoice, amount, req.memo).await?;
    info!("Created invoice {} for {amount} sats", saved.payment_hash);

    Ok(invoice)
}

pub async fn create_invoice(
    Extension(state): Extension<State>,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let invoice = create_invoice_impl(&state, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "invoice": invoice,
        })),
    ))
}

pub async fn list_invoices(Extension(state): Extension<State>) -> Result<Json<Value>, AppError> {
    let invoices = state.store.list_all_invoices().await?;
    Ok(Json(json!({
        "success": true,
        "invoices": invoices,
    })))
}

pub async fn list_invoices_by_task(
    task_id: Result<Path<i32>, PathRejection>,
    Extension(state): Extension<State>,
) -> Result<Json<Value>, AppError> {
    let Path(task_id) = task_id.map_err(|e| AppError::Validation(e.body_text()))?;
    let invoices = state.store.list_invoices_by_task(task_id).await?;
    Ok(Json(json!({
        "success": true,
        "invoices": invoices,
    })))
}

/// Tasks created by the user with the given id.
pub async fn list_tasks_by_user(
    user_id: Result<Path<i32>, PathRejection>,
    Extension(state): Extension<State>,
) -> Result<Json<Value>, AppError> {
    let Path(user_id) = user_id.map_err(|e| AppError::Validation(e.body_text()))?;
    let tasks = state.store.list_tasks_by_user(user_id).await?;
    Ok(Json(json!({
        "success": true,
        "tasks": tasks,
    })))
}

/// Fallback route handler that returns a 404 Not Found response
/// when a request is made to a non-existent route.
pub async fn fallback(uri: Uri) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("No route for {}", uri))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    /// Fabricate a status: pass response without checking provider or store connectivity
    pub fn new_ok() -> Self {
        Self {
            status: String::from("pass"),
            version: String::from(env!("CARGO_PKG_VERSION")),
        }
    }
}

/// IETF draft RFC for HTTP API Health Checks:
/// https://datatracker.ietf.org/doc/html/draft-inadarei-api-health-check
pub async fn health_check() -> Result<Json<HealthResponse>, (StatusCode, String)> {
    Ok(Json(HealthResponse::new_ok()))
}

pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
    }
}
