use anyhow::{Context, Result};
use async_trait::async_trait;
use lambda_runtime::tracing;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{Config, Credentials};

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MusicApi: Send + Sync {
    async fn request_token(&self, credentials: &Credentials) -> Result<AccessToken>;
    async fn user_playlists(&self, token: &AccessToken, user: &str) -> Result<Value>;
    async fn playlist_tracks(&self, token: &AccessToken, playlist_id: &str) -> Result<Value>;
}

pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token_url: String,
}

impl SpotifyClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.clone(),
        }
    }

    async fn get_json(&self, token: &AccessToken, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.api_url, path);
        let data = self
            .http
            .get(&url)
            .bearer_auth(token.as_str())
            .header("accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(serde_json::from_slice(&data)?)
    }
}

#[async_trait]
impl MusicApi for SpotifyClient {
    async fn request_token(&self, credentials: &Credentials) -> Result<AccessToken> {
        let resp: TokenResponse = self
            .http
            .post(&self.token_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        tracing::info!("obtained spotify access token");

        Ok(AccessToken::new(resp.access_token))
    }

    async fn user_playlists(&self, token: &AccessToken, user: &str) -> Result<Value> {
        self.get_json(token, &format!("/users/{user}/playlists"))
            .await
            .with_context(|| format!("listing playlists of user '{user}'"))
    }

    async fn playlist_tracks(&self, token: &AccessToken, playlist_id: &str) -> Result<Value> {
        self.get_json(token, &format!("/playlists/{playlist_id}/tracks"))
            .await
            .with_context(|| format!("fetching tracks of playlist '{playlist_id}'"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> SpotifyClient {
        let config = Config {
            api_url: format!("{}/v1", server.uri()),
            token_url: format!("{}/api/token", server.uri()),
            ..Config::default()
        };
        SpotifyClient::new(Client::new(), &config)
    }

    fn credentials() -> Credentials {
        Credentials {
            client_id: "abc".to_string(),
            client_secret: "xyz".to_string(),
        }
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AccessToken::new("secret-token");

        assert_eq!(format!("{token:?}"), "AccessToken(<redacted>)");
        assert_eq!(token.as_str(), "secret-token");
    }

    #[test]
    fn api_url_trailing_slash_is_trimmed() {
        let config = Config {
            api_url: "http://localhost:9000/v1/".to_string(),
            ..Config::default()
        };
        let client = SpotifyClient::new(Client::new(), &config);

        assert_eq!(client.api_url, "http://localhost:9000/v1");
        assert_eq!(client.token_url, "https://accounts.spotify.com/api/token");
    }

    #[test]
    fn token_response_ignores_extra_fields() {
        let resp: TokenResponse = serde_json::from_str(
            r#"{"access_token":"tok","token_type":"Bearer","expires_in":3600}"#,
        )
        .unwrap();

        assert_eq!(resp.access_token, "tok");
    }

    #[tokio::test]
    async fn token_request_uses_client_credentials_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(header("authorization", "Basic YWJjOnh5eg=="))
            .and(body_string("grant_type=client_credentials"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "tok", "token_type": "Bearer"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let token = client_for(&server).request_token(&credentials()).await.unwrap();

        assert_eq!(token.as_str(), "tok");
    }

    #[tokio::test]
    async fn rejected_credentials_are_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_client"})))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client_for(&server).request_token(&credentials()).await.is_err());
    }

    #[tokio::test]
    async fn playlist_tracks_sends_bearer_token() {
        let server = MockServer::start().await;
        let payload = json!({"items": [{"track": {"name": "Song A"}}]});
        Mock::given(method("GET"))
            .and(path("/v1/playlists/3OK8UdRoB6IfDEa1pNJTQE/tracks"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let tracks = client_for(&server)
            .playlist_tracks(&AccessToken::new("tok"), "3OK8UdRoB6IfDEa1pNJTQE")
            .await
            .unwrap();

        assert_eq!(tracks, payload);
    }

    #[tokio::test]
    async fn user_playlists_hits_user_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/spotify/playlists"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let playlists = client_for(&server)
            .user_playlists(&AccessToken::new("tok"), "spotify")
            .await
            .unwrap();

        assert_eq!(playlists, json!({"items": []}));
    }

    #[tokio::test]
    async fn server_error_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/playlists/abc/tracks"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .playlist_tracks(&AccessToken::new("tok"), "abc")
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("503"));
    }
}
