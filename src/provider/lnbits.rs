use async_trait::async_trait;
use log::{debug, error};
use reqwest::StatusCode;
use serde_json::{json, Value};
use url::Url;

use super::{str_field, CreatedInvoice, InvoiceProvider, ProviderError};

#[derive(Clone)]
pub struct LnbitsClient {
    api_key: String,
    payments_url: Url,
    reqwest_client: reqwest::Client,
}

impl LnbitsClient {
    /// `api_url` is the wallet API root, e.g. `https://legend.lnbits.com/api/v1`.
    pub fn new(api_url: &str, api_key: &str) -> Result<LnbitsClient, ProviderError> {
        let payments_url = Url::parse(&format!("{}/payments", api_url.trim_end_matches('/')))?;

        Ok(LnbitsClient {
            api_key: api_key.to_string(),
            payments_url,
            reqwest_client: reqwest::Client::builder().build()?,
        })
    }
}

pub(crate) fn invoice_payload(amount: u64, memo: Option<&str>) -> Value {
    json!({
        "out": false,
        "amount": amount,
        "memo": memo,
        "unit": "sat",
    })
}

/// LNbits answers a created invoice with 201 and nothing else counts as success.
pub(crate) fn parse_invoice_response(
    status: StatusCode,
    body: &str,
) -> Result<CreatedInvoice, ProviderError> {
    if status != StatusCode::CREATED {
        return Err(ProviderError::UnexpectedStatus {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let response: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("{e}: {body}")))?;

    Ok(CreatedInvoice {
        payment_hash: str_field(&response, "payment_hash")?,
        payment_request: str_field(&response, "payment_request")?,
    })
}

#[async_trait]
impl InvoiceProvider for LnbitsClient {
    async fn create_invoice(
        &self,
        amount: u64,
        memo: Option<String>,
    ) -> Result<CreatedInvoice, ProviderError> {
        debug!("POST {} amount={amount}", self.payments_url);

        let response = self
            .reqwest_client
            .post(self.payments_url.clone())
            .header("X-Api-Key", &self.api_key)
            .json(&invoice_payload(amount, memo.as_deref()))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        parse_invoice_response(status, &body).map_err(|e| {
            error!("lnbits invoice creation failed: {e}");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_an_incoming_sat_invoice() {
        let payload = invoice_payload(1000, Some("coffee"));
        assert_eq!(
            payload,
            json!({"out": false, "amount": 1000, "memo": "coffee", "unit": "sat"})
        );
    }

    #[test]
    fn created_response_maps_fields_directly() {
        let body = r#"{"payment_hash":"ff00","payment_request":"lnbc10u1p..","checking_id":"ff00"}"#;
        let invoice = parse_invoice_response(StatusCode::CREATED, body).unwrap();
        assert_eq!(
            invoice,
            CreatedInvoice {
                payment_hash: "ff00".to_string(),
                payment_request: "lnbc10u1p..".to_string(),
            }
        );
    }

    #[test]
    fn ok_is_not_created() {
        let body = r#"{"payment_hash":"ff00","payment_request":"lnbc10u1p.."}"#;
        match parse_invoice_response(StatusCode::OK, body) {
            Err(ProviderError::UnexpectedStatus { status, body: raw }) => {
                assert_eq!(status, 200);
                assert_eq!(raw, body);
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[test]
    fn missing_payment_request_is_malformed() {
        let res = parse_invoice_response(StatusCode::CREATED, r#"{"payment_hash":"ff00"}"#);
        assert!(matches!(res, Err(ProviderError::MalformedResponse(_))));
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = LnbitsClient::new("https://lnbits.example/api/v1/", "key").unwrap();
        assert_eq!(
            client.payments_url.as_str(),
            "https://lnbits.example/api/v1/payments"
        );
    }
}
