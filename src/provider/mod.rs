use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod coinos;
pub mod error;
pub mod lnbits;

pub use self::coinos::CoinosClient;
pub use self::error::ProviderError;
pub use self::lnbits::LnbitsClient;

#[cfg(test)]
use mockall::automock;

/// The common shape every provider response is normalized into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedInvoice {
    pub payment_hash: String,
    pub payment_request: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderKind {
    Lnbits,
    Coinos,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lnbits => write!(f, "lnbits"),
            Self::Coinos => write!(f, "coinos"),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait InvoiceProvider: Send + Sync {
    async fn create_invoice(
        &self,
        amount: u64,
        memo: Option<String>,
    ) -> Result<CreatedInvoice, ProviderError>;
}

/// Reads a required string field out of a provider response body.
pub(crate) fn str_field(body: &serde_json::Value, field: &str) -> Result<String, ProviderError> {
    body[field]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ProviderError::MalformedResponse(format!("missing `{field}` in {body}")))
}
