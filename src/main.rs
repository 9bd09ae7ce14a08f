use aws_config::BehaviorVersion;
use lambda_runtime::{run, service_fn, tracing, Error, LambdaEvent};
use reqwest::Client as HttpClient;

mod config;
mod extractor;
mod key;
mod s3;
mod spotify;

use config::Config;
use extractor::Extractor;
use s3::S3Store;
use spotify::SpotifyClient;

struct ClientHandler {
    config: Config,
    spotify: SpotifyClient,
    s3: S3Store,
}

async fn handler(
    clients: &ClientHandler,
    _event: LambdaEvent<serde_json::Value>,
) -> Result<(), Error> {
    let extractor = Extractor::new(&clients.config, &clients.spotify, &clients.s3);
    let stored = extractor.run().await?;
    tracing::info!(
        "extracted playlist :: s3://{}/{} :: {} bytes",
        stored.bucket,
        stored.key,
        stored.size
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env();
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let clients = ClientHandler {
        spotify: SpotifyClient::new(HttpClient::new(), &config),
        s3: S3Store::new(&aws_config),
        config,
    };

    run(service_fn(|event| handler(&clients, event))).await?;

    Ok(())
}
