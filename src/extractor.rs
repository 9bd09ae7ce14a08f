use anyhow::{Context, Result};
use chrono::Utc;
use lambda_runtime::tracing;

use crate::config::Config;
use crate::key;
use crate::s3::ObjectStore;
use crate::spotify::MusicApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub size: usize,
}

pub struct Extractor<'a> {
    config: &'a Config,
    api: &'a dyn MusicApi,
    store: &'a dyn ObjectStore,
}

impl<'a> Extractor<'a> {
    pub fn new(config: &'a Config, api: &'a dyn MusicApi, store: &'a dyn ObjectStore) -> Self {
        Self { config, api, store }
    }

    pub async fn run(&self) -> Result<StoredObject> {
        let token = self
            .api
            .request_token(&self.config.credentials)
            .await
            .context("requesting access token")?;

        if let Some(user) = &self.config.warm_up_user {
            self.api.user_playlists(&token, user).await?;
            tracing::info!("listed playlists of user {user}");
        }

        let playlist_id = self.config.playlist_id()?;
        let tracks = self.api.playlist_tracks(&token, playlist_id).await?;
        if tracks.get("next").is_some_and(|next| !next.is_null()) {
            tracing::warn!("playlist {playlist_id} is paginated, storing first page only");
        }

        let body = serde_json::to_string(&tracks)?.into_bytes();
        let size = body.len();
        tracing::info!("fetched tracks of playlist {playlist_id} :: {size} bytes");

        let key = key::object_key(&self.config.key_prefix, key::unique_timestamp(Utc::now()));
        let bucket = &self.config.bucket;
        self.store
            .put_object(bucket, &key, body)
            .await
            .with_context(|| format!("uploading {key} to s3 bucket {bucket}"))?;
        tracing::info!("uploaded {key} to s3 bucket {bucket}");

        Ok(StoredObject {
            bucket: bucket.clone(),
            key,
            size,
        })
    }
}
