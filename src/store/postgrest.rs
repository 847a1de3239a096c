use async_trait::async_trait;
use log::{debug, error};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::{Storage, StoreError};
use crate::models::invoice::{Invoice, NewInvoice};
use crate::provider::CreatedInvoice;

/// Client for the REST interface of a managed Postgres (Supabase / PostgREST).
#[derive(Clone)]
pub struct PostgrestStore {
    api_key: String,
    rest_url: Url,
    reqwest_client: reqwest::Client,
}

impl PostgrestStore {
    pub fn new(project_url: &str, api_key: &str) -> Result<PostgrestStore, StoreError> {
        let rest_url = Url::parse(&format!("{}/rest/v1/", project_url.trim_end_matches('/')))?;

        Ok(PostgrestStore {
            api_key: api_key.to_string(),
            rest_url,
            reqwest_client: reqwest::Client::builder().build()?,
        })
    }

    pub(crate) fn select_url(
        &self,
        table: &str,
        filter: Option<(&str, String)>,
    ) -> Result<Url, StoreError> {
        let mut url = self.rest_url.join(table)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if let Some((column, value)) = filter {
                query.append_pair(column, &format!("eq.{value}"));
            }
        }
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn select<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, StoreError> {
        debug!("GET {url}");
        let response = self.authorized(self.reqwest_client.get(url)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_rows(status, &body)
    }
}

/// Turns a REST response into rows, mapping the store's error envelope to
/// [`StoreError::Store`].
pub(crate) fn decode_rows<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<Vec<T>, StoreError> {
    if !status.is_success() {
        let err = StoreError::from_envelope(status.as_u16(), body);
        error!("{err}");
        return Err(err);
    }
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl Storage for PostgrestStore {
    async fn save_invoice(
        &self,
        invoice: &CreatedInvoice,
        amount: u64,
        memo: Option<String>,
    ) -> Result<Invoice, StoreError> {
        let amount = i64::try_from(amount).map_err(|_| StoreError::AmountOutOfRange(amount))?;
        let row = NewInvoice::pending(invoice, amount, memo);

        let url = self.rest_url.join("invoices")?;
        debug!("POST {url}");
        let response = self
            .authorized(self.reqwest_client.post(url))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        decode_rows::<Invoice>(status, &body)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Store {
                code: status.as_u16().to_string(),
                message: "insert returned no rows".to_string(),
            })
    }

    async fn list_all_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        self.select(self.select_url("invoices", None)?).await
    }

    async fn list_invoices_by_task(&self, task_id: i32) -> Result<Vec<Invoice>, StoreError> {
        self.select(self.select_url("invoices", Some(("task_id", task_id.to_string())))?)
            .await
    }

    async fn list_tasks_by_user(&self, user_id: i32) -> Result<Vec<Value>, StoreError> {
        self.select(self.select_url("tasks", Some(("created_by", user_id.to_string())))?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PostgrestStore {
        PostgrestStore::new("https://project.supabase.co/", "anon-key").unwrap()
    }

    #[test]
    fn select_all_url() {
        let url = store().select_url("invoices", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://project.supabase.co/rest/v1/invoices?select=*"
        );
    }

    #[test]
    fn select_filtered_by_equality() {
        let url = store()
            .select_url("tasks", Some(("created_by", "7".to_string())))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://project.supabase.co/rest/v1/tasks?select=*&created_by=eq.7"
        );
    }

    #[test]
    fn empty_array_is_no_rows() {
        let rows: Vec<Invoice> = decode_rows(StatusCode::OK, "[]").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn inserted_row_is_decoded() {
        let body = r#"[{"id":1,"payment_hash":"abc123","bolt11":"abc123","amount":1000,
            "memo":"coffee","status":"pending","task_id":null,
            "created_at":"2024-11-20T10:00:00.123456+00:00"}]"#;
        let rows: Vec<Invoice> = decode_rows(StatusCode::CREATED, body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bolt11, "abc123");
        assert_eq!(rows[0].memo.as_deref(), Some("coffee"));
        assert!(rows[0].created_at.is_some());
    }

    #[test]
    fn task_rows_keep_every_column() {
        let body = r#"[{"id":3,"created_by":7,"title":"Fix bike","reward":500,"status":"open",
            "created_at":"2024-11-20T10:00:00.123456"}]"#;
        let rows: Vec<Value> = decode_rows(StatusCode::OK, body).unwrap();
        assert_eq!(
            rows,
            vec![serde_json::json!({
                "id": 3,
                "created_by": 7,
                "title": "Fix bike",
                "reward": 500,
                "status": "open",
                "created_at": "2024-11-20T10:00:00.123456",
            })]
        );
    }

    #[test]
    fn error_envelope_becomes_store_error() {
        let body = r#"{"code":"PGRST205","details":null,"hint":null,"message":"Could not find the table"}"#;
        let res: Result<Vec<Value>, _> = decode_rows(StatusCode::NOT_FOUND, body);
        match res {
            Err(StoreError::Store { code, .. }) => assert_eq!(code, "PGRST205"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn garbage_success_body_is_a_decode_error() {
        let res: Result<Vec<Value>, _> = decode_rows(StatusCode::OK, "<html>");
        assert!(matches!(res, Err(StoreError::Decode(_))));
    }
}
