use serde::{Deserialize, Serialize};

/// Error body the server attaches to rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// Extracts the server-supplied error message from a response body, if the
/// body is JSON and actually carries one.
pub fn server_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body).ok()?.error
}
