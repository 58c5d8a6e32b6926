use std::time::Duration;

use crate::error::RefreshTokenError;
use crate::tidal_rs::types::TidalTokenResponse;

pub const TIDAL_TOKEN_URL: &str = "https://auth.tidal.com/v1/oauth2/token";

const TIDAL_SCOPE: &str = "r_usr w_usr";

fn refresh_params<'a>(
    client_id: &'a str,
    client_secret: Option<&'a str>,
    refresh_token: &'a str,
) -> Vec<(&'static str, &'a str)> {
    let mut params = vec![
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", client_id),
        ("scope", TIDAL_SCOPE),
    ];
    if let Some(secret) = client_secret {
        params.push(("client_secret", secret));
    }
    params
}

/// Exchange a refresh token for a fresh access token.
///
/// Device-flow clients have no secret; confidential clients pass one.
pub async fn refresh_access_token(
    client: &reqwest::Client,
    client_id: &str,
    client_secret: Option<&str>,
    refresh_token: &str,
) -> Result<TidalTokenResponse, RefreshTokenError> {
    let response = client
        .post(TIDAL_TOKEN_URL)
        .form(&refresh_params(client_id, client_secret, refresh_token))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(RefreshTokenError::FailedToSendRequest)?;

    if !response.status().is_success() {
        return Err(RefreshTokenError::InvalidRefreshToken {
            reason: response
                .text()
                .await
                .unwrap_or("Failed to get error text".to_string()),
        });
    }

    response
        .json()
        .await
        .map_err(RefreshTokenError::FailedToParseResponse)
}
