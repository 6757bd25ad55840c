use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `QRStudio`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum StudioError {
    // ── Client-side validation ──────────────────────────────────────────
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    // ── Collaborator transport ──────────────────────────────────────────
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    // ── Superseded in-flight preview request ────────────────────────────
    //
    // Always suppressed: never surfaced to the user, never logged as a
    // failure.
    #[error("preview request superseded")]
    Canceled,

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StudioError {
    /// Whether this error represents a superseded preview request.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

// ─── Validation errors ───────────────────────────────────────────────────────

/// Client-side rejection of a file selection. Non-fatal: it blocks the
/// action and carries a user-facing reason, nothing more.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("no file selected")]
    NoFile,

    #[error("unsupported file type for {kind}: {filename}")]
    UnsupportedType { kind: String, filename: String },

    #[error("unreadable image: {0}")]
    UnreadableImage(String),
}

// ─── Transport errors ───────────────────────────────────────────────────────

/// Non-2xx or network failure on a collaborator call. Terminal at the UI
/// boundary: there is no retry logic in this layer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("{endpoint} returned {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("unexpected response from {endpoint}: {message}")]
    UnexpectedResponse { endpoint: String, message: String },
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

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, StudioError>;
