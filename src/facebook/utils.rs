#[derive(Debug, thiserror::Error)]
#[error("{status_code} status code: {body}")]
pub struct ServerError {
    pub status_code: u16,
    /// Graph API error body, kept for logging.
    pub body: String,
}

/// Turn a non-2xx response into a [`ServerError`], passing 2xx responses through.
pub async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, ServerError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(ServerError {
            status_code: status.as_u16(),
            body,
        });
    }
    Ok(res)
}
