use crate::models::schema::invoices;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::provider::CreatedInvoice;

#[derive(
    QueryableByName, Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = invoices)]
pub struct Invoice {
    pub id: i32,
    pub payment_hash: String,
    pub bolt11: String,
    pub amount: i64,
    #[serde(default)]
    pub memo: Option<String>,
    pub status: String,
    #[serde(default)]
    pub task_id: Option<i32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Invoice {
    pub fn get_invoices(conn: &mut PgConnection) -> anyhow::Result<Vec<Invoice>> {
        Ok(invoices::table.load::<Self>(conn)?)
    }

    pub fn get_by_task_id(conn: &mut PgConnection, task_id: i32) -> anyhow::Result<Vec<Invoice>> {
        Ok(invoices::table
            .filter(invoices::task_id.eq(task_id))
            .load::<Invoice>(conn)?)
    }
}

#[derive(Insertable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = invoices)]
pub struct NewInvoice {
    pub payment_hash: String,
    pub bolt11: String,
    pub amount: i64,
    pub memo: Option<String>,
    pub status: String,
}

impl NewInvoice {
    /// The row recorded for a freshly created provider invoice. The encoded
    /// payment request is what ends up in `bolt11`.
    pub fn pending(invoice: &CreatedInvoice, amount: i64, memo: Option<String>) -> Self {
        Self {
            payment_hash: invoice.payment_hash.clone(),
            bolt11: invoice.payment_request.clone(),
            amount,
            memo,
            status: InvoiceStatus::Pending.to_string(),
        }
    }

    pub fn insert(&self, conn: &mut PgConnection) -> anyhow::Result<Invoice> {
        diesel::insert_into(invoices::table)
            .values(self)
            .get_result::<Invoice>(conn)
            .map_err(|e| e.into())
    }
}

/// Only `pending` is ever written here; other values come from whatever
/// settles invoices and are read back as plain strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvoiceStatus {
    /// The invoice is waiting for payment.
    Pending,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
        }
    }
}
