use async_trait::async_trait;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use serde_json::Value;

use super::{Storage, StoreError};
use crate::models::invoice::{Invoice, NewInvoice};
use crate::models::task::Task;
use crate::provider::CreatedInvoice;

/// Same tables as [`super::PostgrestStore`], through a direct connection pool.
#[derive(Clone)]
pub struct PgStore {
    db_pool: Pool<ConnectionManager<PgConnection>>,
}

impl PgStore {
    pub fn new(pg_url: &str) -> Result<PgStore, StoreError> {
        let manager = ConnectionManager::<PgConnection>::new(pg_url);
        let db_pool = Pool::builder()
            .max_size(10)
            .test_on_check_out(true)
            .build(manager)?;

        Ok(PgStore { db_pool })
    }
}

#[async_trait]
impl Storage for PgStore {
    async fn save_invoice(
        &self,
        invoice: &CreatedInvoice,
        amount: u64,
        memo: Option<String>,
    ) -> Result<Invoice, StoreError> {
        let amount = i64::try_from(amount).map_err(|_| StoreError::AmountOutOfRange(amount))?;
        let mut conn = self.db_pool.get()?;

        let new_invoice = NewInvoice::pending(invoice, amount, memo);
        Ok(new_invoice.insert(&mut conn)?)
    }

    async fn list_all_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        let mut conn = self.db_pool.get()?;
        Ok(Invoice::get_invoices(&mut conn)?)
    }

    async fn list_invoices_by_task(&self, task_id: i32) -> Result<Vec<Invoice>, StoreError> {
        let mut conn = self.db_pool.get()?;
        Ok(Invoice::get_by_task_id(&mut conn, task_id)?)
    }

    async fn list_tasks_by_user(&self, user_id: i32) -> Result<Vec<Value>, StoreError> {
        let mut conn = self.db_pool.get()?;
        Task::get_by_creator(&mut conn, user_id)?
            .into_iter()
            .map(|task| serde_json::to_value(task).map_err(StoreError::from))
            .collect()
    }
}
