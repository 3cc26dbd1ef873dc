//! Version stamp derived from source-control history.
//!
//! The stamp is embedded into the compiled extension as two preprocessor
//! definitions so the artifact can report where it came from. It is
//! best-effort: building from a tarball without history yields the
//! `"Unknown"` sentinel for both fields instead of failing the build.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

mod source_control;

pub use source_control::{GitCli, QueryError, SourceControl};

/// Value used for both fields when no real stamp could be derived.
pub const UNKNOWN: &str = "Unknown";

static COMMIT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]+$").expect("commit id pattern is valid")
});

static COMMIT_TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}.*$")
        .expect("commit timestamp pattern is valid")
});

/// Whether `s` is one or more lowercase hex digits and nothing else.
pub fn is_commit_id(s: &str) -> bool {
    COMMIT_ID_RE.is_match(s)
}

/// Whether `s` starts with `YYYY-MM-DD HH:MM:SS`; trailing text such as a UTC
/// offset is allowed.
pub fn is_commit_timestamp(s: &str) -> bool {
    COMMIT_TIMESTAMP_RE.is_match(s)
}

/// Why a real stamp could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StampError {
    #[error("source control unavailable: {0}")]
    SourceControlUnavailable(#[from] QueryError),

    #[error("malformed {field} from source control: `{value}`")]
    MalformedMetadata { field: &'static str, value: String },
}

/// Provenance record: commit identifier and commit timestamp.
///
/// Either both fields are validated values or both are [`UNKNOWN`]; the
/// fields are private so no other combination can be built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BuildInfo {
    commit_id: String,
    commit_timestamp: String,
}

impl BuildInfo {
    /// Build a record from raw values, validating both.
    pub fn new(
        commit_id: impl Into<String>,
        commit_timestamp: impl Into<String>,
    ) -> Result<Self, StampError> {
        let commit_id = commit_id.into();
        let commit_timestamp = commit_timestamp.into();

        let id_ok = is_commit_id(&commit_id);
        let time_ok = is_commit_timestamp(&commit_timestamp);

        if !id_ok {
            return Err(StampError::MalformedMetadata {
                field: "commit id",
                value: commit_id,
            });
        }
        if !time_ok {
            return Err(StampError::MalformedMetadata {
                field: "commit timestamp",
                value: commit_timestamp,
            });
        }

        Ok(BuildInfo {
            commit_id,
            commit_timestamp,
        })
    }

    /// The sentinel record.
    pub fn unknown() -> Self {
        BuildInfo {
            commit_id: UNKNOWN.to_string(),
            commit_timestamp: UNKNOWN.to_string(),
        }
    }

    pub fn commit_id(&self) -> &str {
        &self.commit_id
    }

    pub fn commit_timestamp(&self) -> &str {
        &self.commit_timestamp
    }

    /// Whether this is a real stamp rather than the sentinel.
    pub fn is_known(&self) -> bool {
        self.commit_id != UNKNOWN
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{} ({})", self.commit_id, self.commit_timestamp)
        } else {
            write!(f, "{}", UNKNOWN)
        }
    }
}

/// Derives a [`BuildInfo`] from a source-control backend.
#[derive(Debug, Clone)]
pub struct VersionResolver<S> {
    backend: S,
}

impl<S: SourceControl> VersionResolver<S> {
    pub fn new(backend: S) -> Self {
        VersionResolver { backend }
    }

    /// Query the backend once for each field and validate the answers.
    pub fn resolve_checked(&self) -> Result<BuildInfo, StampError> {
        let commit_id = self.backend.short_commit_id()?;
        let commit_timestamp = self.backend.commit_timestamp()?;
        BuildInfo::new(commit_id, commit_timestamp)
    }

    /// Like [`resolve_checked`](Self::resolve_checked), but any failure
    /// degrades to [`BuildInfo::unknown`].
    pub fn resolve(&self) -> BuildInfo {
        match self.resolve_checked() {
            Ok(info) => {
                tracing::debug!("Resolved build info: {}", info);
                info
            }
            Err(e) => {
                tracing::warn!("Version stamp unavailable, using `{}`: {}", UNKNOWN, e);
                BuildInfo::unknown()
            }
        }
    }
}
