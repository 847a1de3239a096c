use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store error {code}: {message}")]
    Store { code: String, message: String },

    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("store url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("DB connection error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("DB error: {0}")]
    Query(#[from] anyhow::Error),

    #[error("amount {0} does not fit in a row")]
    AmountOutOfRange(u64),
}

/// Error body the REST interface returns alongside a non-2xx status.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl StoreError {
    pub(crate) fn from_envelope(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let mut message = envelope.message;
                if let Some(details) = envelope.details {
                    message = format!("{message} ({details})");
                }
                if let Some(hint) = envelope.hint {
                    message = format!("{message} hint: {hint}");
                }
                StoreError::Store {
                    code: envelope.code.unwrap_or_else(|| status.to_string()),
                    message,
                }
            }
            Err(_) => StoreError::Store {
                code: status.to_string(),
                message: body.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_code_and_message_are_kept() {
        let body = r#"{"code":"23502","details":null,"hint":null,"message":"null value in column \"amount\""}"#;
        match StoreError::from_envelope(400, body) {
            StoreError::Store { code, message } => {
                assert_eq!(code, "23502");
                assert_eq!(message, "null value in column \"amount\"");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn details_and_hint_are_appended() {
        let body = r#"{"code":"42P01","details":"d","hint":"h","message":"m"}"#;
        let err = StoreError::from_envelope(404, body);
        assert_eq!(err.to_string(), "store error 42P01: m (d) hint: h");
    }

    #[test]
    fn non_envelope_body_falls_back_to_status() {
        let err = StoreError::from_envelope(503, "upstream unavailable");
        assert_eq!(err.to_string(), "store error 503: upstream unavailable");
    }
}
