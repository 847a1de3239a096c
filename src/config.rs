use anyhow::anyhow;
use clap::Parser;
use std::sync::Arc;

use crate::provider::coinos::DEFAULT_COINOS_API_URL;
use crate::provider::{CoinosClient, InvoiceProvider, LnbitsClient, ProviderKind};
use crate::store::{PgStore, PostgrestStore, Storage};

#[derive(Parser, Debug, Clone)]
#[command(version, author, about)]
/// Issues Lightning invoices through LNbits or Coinos and records them for tasks.
pub struct Config {
    /// Bind address for the webserver
    #[clap(default_value_t = String::from("0.0.0.0"), long, env = "INVOICE_BIND")]
    pub bind: String,

    /// Port for the webserver
    #[clap(default_value_t = 5000, long, env = "PORT")]
    pub port: u16,

    /// Invoice provider to create invoices with
    #[clap(value_enum, default_value_t = ProviderKind::Lnbits, long, env = "INVOICE_PROVIDER")]
    pub provider: ProviderKind,

    /// LNbits wallet API root (e.g. https://legend.lnbits.com/api/v1)
    #[clap(long, env = "LNBITS_API_URL")]
    pub lnbits_api_url: Option<String>,

    /// LNbits invoice/read key
    #[clap(long, env = "LNBITS_API_KEY")]
    pub lnbits_api_key: Option<String>,

    /// Coinos invoice endpoint
    #[clap(default_value_t = String::from(DEFAULT_COINOS_API_URL), long, env = "COINOS_API_URL")]
    pub coinos_api_url: String,

    /// Coinos bearer token
    #[clap(long, env = "COINOS_API_TOKEN")]
    pub coinos_api_token: Option<String>,

    /// Callback Coinos should hit when an invoice is paid
    #[clap(long, env = "COINOS_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Supabase project URL (e.g. https://xyz.supabase.co)
    #[clap(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Supabase API key
    #[clap(long, env = "SUPABASE_KEY")]
    pub supabase_key: Option<String>,

    /// Postgres connection string, used instead of Supabase when set
    #[clap(long, env = "DATABASE_URL")]
    pub pg_url: Option<String>,
}

impl Config {
    pub fn invoice_provider(&self) -> anyhow::Result<Arc<dyn InvoiceProvider>> {
        match self.provider {
            ProviderKind::Lnbits => {
                let (Some(url), Some(key)) = (&self.lnbits_api_url, &self.lnbits_api_key) else {
                    return Err(anyhow!(
                        "LNBITS_API_URL and LNBITS_API_KEY are required for the lnbits provider"
                    ));
                };
                Ok(Arc::new(LnbitsClient::new(url, key)?))
            }
            ProviderKind::Coinos => {
                let token = self.coinos_api_token.as_ref().ok_or(anyhow!(
                    "COINOS_API_TOKEN is required for the coinos provider"
                ))?;
                Ok(Arc::new(CoinosClient::new(
                    &self.coinos_api_url,
                    token,
                    self.webhook_url.clone(),
                )?))
            }
        }
    }

    pub fn storage(&self) -> anyhow::Result<Arc<dyn Storage>> {
        match (&self.supabase_url, &self.supabase_key, &self.pg_url) {
            (Some(url), Some(key), None) => Ok(Arc::new(PostgrestStore::new(url, key)?)),
            (None, None, Some(pg_url)) => Ok(Arc::new(PgStore::new(pg_url)?)),
            (_, _, Some(_)) => Err(anyhow!(
                "Configure either SUPABASE_URL/SUPABASE_KEY or DATABASE_URL, not both"
            )),
            _ => Err(anyhow!(
                "SUPABASE_URL and SUPABASE_KEY (or DATABASE_URL) are required"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn config() -> Config {
        Config {
            bind: "127.0.0.1".to_string(),
            port: 5000,
            provider: ProviderKind::Lnbits,
            lnbits_api_url: None,
            lnbits_api_key: None,
            coinos_api_url: DEFAULT_COINOS_API_URL.to_string(),
            coinos_api_token: None,
            webhook_url: None,
            supabase_url: None,
            supabase_key: None,
            pg_url: None,
        }
    }

    // read from the declared arguments, so env vars of the test host can't leak in
    fn default_of(arg: &str) -> Vec<String> {
        Config::command()
            .get_arguments()
            .find(|a| a.get_id() == arg)
            .map(|a| {
                a.get_default_values()
                    .iter()
                    .map(|v| v.to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn defaults() {
        assert_eq!(default_of("port"), ["5000"]);
        assert_eq!(default_of("provider"), ["lnbits"]);
        assert_eq!(default_of("coinos_api_url"), [DEFAULT_COINOS_API_URL]);
    }

    #[test]
    fn coinos_requires_a_token() {
        let config = Config {
            provider: ProviderKind::Coinos,
            ..config()
        };
        assert!(config.invoice_provider().is_err());
    }

    #[test]
    fn lnbits_requires_credentials() {
        assert!(config().invoice_provider().is_err());
    }

    #[test]
    fn lnbits_with_credentials_builds() {
        let config = Config {
            lnbits_api_url: Some("https://lnbits.example/api/v1".to_string()),
            lnbits_api_key: Some("key".to_string()),
            ..config()
        };
        assert!(config.invoice_provider().is_ok());
    }

    #[test]
    fn both_stores_is_rejected() {
        let config = Config {
            supabase_url: Some("https://xyz.supabase.co".to_string()),
            supabase_key: Some("key".to_string()),
            pg_url: Some("postgres://localhost/tasks".to_string()),
            ..config()
        };
        assert!(config.storage().is_err());
    }

    #[test]
    fn no_store_is_rejected() {
        assert!(config().storage().is_err());
    }

    #[test]
    fn supabase_store_builds() {
        let config = Config {
            supabase_url: Some("https://xyz.supabase.co".to_string()),
            supabase_key: Some("key".to_string()),
            ..config()
        };
        assert!(config.storage().is_ok());
    }
}
