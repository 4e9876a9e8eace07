use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("could not reach the server: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not signed in")]
    NotSignedIn,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 4xx: the server understood and refused (bad credentials, duplicate email, stale token).
    pub fn is_client_rejection(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Build a `Rejected` error from a raw response body. Prefers a JSON `message` field.
    pub(crate) fn rejected(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "no details".to_string()
                } else {
                    trimmed.chars().take(200).collect()
                }
            });
        Self::Rejected { status, message }
    }
}
