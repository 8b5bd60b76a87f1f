use thiserror::Error;

/// Conditions that end a run.
///
/// Anything recoverable (a failed request, an empty search) is logged where it
/// happens and never reaches this type.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No API key found. Provide via --api-key, {env_var} env var, or ~/.skinscope/config.toml")]
    MissingCredential { env_var: String },

    #[error("api_key_command failed (exit {code}): {stderr}")]
    CredentialCommand { code: i32, stderr: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No videos collected after deduplication; nothing to analyze")]
    NoVideos,
}
