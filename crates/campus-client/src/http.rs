//! Response handling shared by every backend call.
//!
//! Any non-2xx status, 429 included, becomes [`ClientError::Api`] carrying
//! the body; the engine reports it as a retryable network failure. A 2xx
//! body that is not the expected JSON becomes [`ClientError::Parse`].

use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Pass a 2xx response through; turn anything else into [`ClientError::Api`].
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    Err(ClientError::Api {
        status: status.as_u16(),
        message: resp.text().await.unwrap_or_default(),
    })
}

/// Check the status, then decode the body as `T`.
pub async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let body = check_response(resp).await?.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
}
