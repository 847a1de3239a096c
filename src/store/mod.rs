use async_trait::async_trait;
use serde_json::Value;

use crate::models::invoice::Invoice;
use crate::provider::CreatedInvoice;

pub mod error;
pub mod postgres;
pub mod postgrest;

pub use self::error::StoreError;
pub use self::postgres::PgStore;
pub use self::postgrest::PostgrestStore;

#[cfg(test)]
use mockall::automock;

/// Every backend reports failures as a [`StoreError`], whether the transport
/// failed or the store itself rejected the request.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Inserts a pending invoice row for a freshly created provider invoice.
    async fn save_invoice(
        &self,
        invoice: &CreatedInvoice,
        amount: u64,
        memo: Option<String>,
    ) -> Result<Invoice, StoreError>;

    async fn list_all_invoices(&self) -> Result<Vec<Invoice>, StoreError>;

    async fn list_invoices_by_task(&self, task_id: i32) -> Result<Vec<Invoice>, StoreError>;

    /// Task rows belong to another system and are passed through untouched.
    async fn list_tasks_by_user(&self, user_id: i32) -> Result<Vec<Value>, StoreError>;
}
