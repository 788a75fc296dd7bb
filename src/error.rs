use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Countbook.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains. Nothing in the launch
/// resolution chain is fatal: the coordinator absorbs every one of these and
/// degrades to the plain-app decision.
#[derive(Debug, Error)]
pub enum CountbookError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Persisted store ─────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Remote feature flag ─────────────────────────────────────────────
    #[error("remote config: {0}")]
    RemoteConfig(#[from] RemoteConfigError),

    // ── Attribution / metrics ───────────────────────────────────────────
    #[error("attribution: {0}")]
    Attribution(#[from] AttributionError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Persisted store errors ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ─── Remote feature flag errors ─────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RemoteConfigError {
    #[error("remote config unreachable: {0}")]
    Unreachable(String),

    #[error("remote config body malformed: {0}")]
    MalformedBody(String),

    #[error("remote config key {0} missing or not a boolean")]
    MissingKey(String),
}

// ─── Attribution / metrics errors ───────────────────────────────────────────

/// Failures of the single metrics request. Each condition is distinct so the
/// caller (and the logs) can tell a dead network from a bad payload.
#[derive(Debug, Error)]
pub enum AttributionError {
    #[error("metrics request failed: {0}")]
    Network(String),

    #[error("metrics response body was empty")]
    EmptyBody,

    #[error("metrics response was not valid JSON: {0}")]
    MalformedJson(String),

    #[error("metrics response is missing the URL field")]
    MissingUrl,
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, CountbookError>;
