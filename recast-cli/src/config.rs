//! Mapping from parsed CLI arguments to the core configuration.

use crate::cli::RunArgs;
use recast_core::{CoreConfig, PublishMode};

/// Builds the read-only core configuration for one run.
#[must_use]
pub fn build_core_config(args: &RunArgs) -> CoreConfig {
    let mut config = CoreConfig::new(args.input_root.clone(), args.output_root.clone());

    if let Some(extensions) = &args.extensions {
        config.allowed_extensions = extensions.iter().map(|e| e.to_lowercase()).collect();
    }
    config.concurrency = args.jobs;
    config.encode_webm = !args.no_webm;
    config.encode_mp4 = !args.no_mp4;
    config.generate_thumbnails = !args.no_thumbnails;
    config.export_metadata = args.metadata;
    config.audio_codec = args.audio_codec.clone();
    config.encoder_bin = args.encoder.clone();
    config.prober_bin = args.prober.clone();
    config.bucket = args.bucket.clone();

    config.publish = if args.upload {
        PublishMode::Remote
    } else if args.mirror_to.is_some() {
        PublishMode::Mirror
    } else {
        PublishMode::Disabled
    };
    config.mirror_root = args.mirror_to.clone();
    config.store_endpoint = args.store_endpoint.clone();
    config.store_token = args.store_token.clone();

    config
}
