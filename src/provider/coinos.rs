use async_trait::async_trait;
use log::{debug, error};
use reqwest::StatusCode;
use serde_json::{json, Value};
use url::Url;

use super::{str_field, CreatedInvoice, InvoiceProvider, ProviderError};

pub const DEFAULT_COINOS_API_URL: &str = "https://coinos.io/api/invoice";

#[derive(Clone)]
pub struct CoinosClient {
    api_token: String,
    invoice_url: Url,
    webhook_url: Option<String>,
    reqwest_client: reqwest::Client,
}

impl CoinosClient {
    pub fn new(
        invoice_url: &str,
        api_token: &str,
        webhook_url: Option<String>,
    ) -> Result<CoinosClient, ProviderError> {
        Ok(CoinosClient {
            api_token: api_token.to_string(),
            invoice_url: Url::parse(invoice_url)?,
            webhook_url,
            reqwest_client: reqwest::Client::builder().build()?,
        })
    }
}

pub(crate) fn invoice_payload(amount: u64, webhook_url: Option<&str>) -> Value {
    let mut invoice = json!({
        "amount": amount,
        "type": "lightning",
    });
    if let Some(webhook) = webhook_url {
        invoice["webhook"] = json!(webhook);
    }
    json!({ "invoice": invoice })
}

/// Coinos only returns a `hash`, so it stands in for both the payment hash
/// and the payment request.
pub(crate) fn parse_invoice_response(
    status: StatusCode,
    body: &str,
) -> Result<CreatedInvoice, ProviderError> {
    if status != StatusCode::OK {
        return Err(ProviderError::UnexpectedStatus {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let response: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("{e}: {body}")))?;
    let hash = str_field(&response, "hash")?;

    Ok(CreatedInvoice {
        payment_hash: hash.clone(),
        payment_request: hash,
    })
}

#[async_trait]
impl InvoiceProvider for CoinosClient {
    // coinos has no memo field on lightning invoices
    async fn create_invoice(
        &self,
        amount: u64,
        _memo: Option<String>,
    ) -> Result<CreatedInvoice, ProviderError> {
        debug!("POST {} amount={amount}", self.invoice_url);

        let response = self
            .reqwest_client
            .post(self.invoice_url.clone())
            .bearer_auth(&self.api_token)
            .json(&invoice_payload(amount, self.webhook_url.as_deref()))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        parse_invoice_response(status, &body).map_err(|e| {
            error!("coinos invoice creation failed: {e}");
            e
        })
    }
}
