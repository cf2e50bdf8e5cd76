//! Request execution shared by both clients.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Builds and sends `request` through `client`, decoding a JSON body.
///
/// Non-2xx responses become [`ApiError::Status`] carrying the server's
/// message field. No retries are attempted.
pub(crate) async fn send_json<T: DeserializeOwned>(
    client: &Client,
    service: &'static str,
    endpoint: &str,
    request: RequestBuilder,
) -> Result<T, ApiError> {
    let request = request
        .build()
        .map_err(|e| ApiError::InvalidRequest(format!("{endpoint}: {e}")))?;

    tracing::debug!(%service, method = %request.method(), url = %request.url(), "API request");

    let response = client
        .execute(request)
        .await
        .map_err(|e| transport(service, &e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<failed to read body>"));
        let err = ApiError::from_status(service, status.as_u16(), &body);
        tracing::warn!(%service, %endpoint, status = status.as_u16(), "API request rejected");
        return Err(err);
    }

    let body = response
        .text()
        .await
        .map_err(|e| transport(service, &e))?;

    serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        endpoint: String::from(endpoint),
        reason: e.to_string(),
    })
}

fn transport(service: &'static str, err: &reqwest::Error) -> ApiError {
    ApiError::Transport {
        service,
        reason: err.to_string(),
    }
}
