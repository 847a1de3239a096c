#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Error creating invoice: {status}, {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Unexpected invoice response: {0}")]
    MalformedResponse(String),

    #[error("reqwest error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
}
