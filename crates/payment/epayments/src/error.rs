use thiserror::Error;

#[derive(Error, Debug)]
pub enum EPaymentsError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Authorization failed: {0}")]
    Auth(String),
    #[error("Gateway error: {}", first_message(.messages))]
    Gateway { messages: Vec<String> },
    #[error("Error processing request: empty gateway response")]
    NoResponse,
    #[error("Could not get a link to pay")]
    MissingRedirectUrl,
    #[error("Operation {operation_id} does not match: {reason}")]
    ValidationMismatch { operation_id: i64, reason: String },
    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl EPaymentsError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, EPaymentsError::Transport(err) if err.is_timeout())
    }
}

fn first_message(messages: &[String]) -> &str {
    messages
        .first()
        .map(String::as_str)
        .unwrap_or("unknown error")
}
