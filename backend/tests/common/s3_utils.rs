use std::sync::Arc;

use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{BehaviorVersion, Region},
    Client as S3Client,
};
use backend::media_storage::{IssuancePolicy, MediaStorage};

pub const TEST_BUCKET: &str = "direct-uploads-test";

/// S3 client with static credentials; presigning needs no network access
pub fn offline_s3_client() -> Arc<S3Client> {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
            None,
            None,
            "test",
        ))
        .build();

    Arc::new(S3Client::from_conf(config))
}

pub fn offline_media_storage(policy: IssuancePolicy) -> Arc<MediaStorage> {
    Arc::new(MediaStorage::new(
        offline_s3_client(),
        TEST_BUCKET.to_string(),
        policy,
    ))
}
