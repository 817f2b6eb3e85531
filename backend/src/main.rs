use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use backend::{
    issuance::{CorsPolicy, IssuanceEndpoint},
    media_storage::{KeyDeriver, MediaStorage},
    server,
    types::Environment,
};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();

    // Configure logging format based on environment
    // Use JSON format for staging/production (Datadog), regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
        }
        Environment::Development { .. } => {
            fmt().with_env_filter(EnvFilter::from_default_env()).init();
        }
    }

    // One S3 client for the lifetime of the process, shared by every request
    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let media_storage = Arc::new(MediaStorage::new(
        s3_client,
        environment.s3_bucket(),
        environment.issuance_policy(),
    ));

    let issuance_endpoint = Arc::new(IssuanceEndpoint::new(
        KeyDeriver::default(),
        media_storage,
        CorsPolicy::new(&environment.allowed_origin())?,
    ));

    server::start(environment, issuance_endpoint).await
}
