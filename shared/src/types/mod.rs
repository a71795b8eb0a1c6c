//! Core types used throughout the pipeline board

pub mod deal;

pub use deal::{Deal, DealAssociation, DealsPage, DictionaryEntry, StageDefinition};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::errors::SharedError;

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Process identifier for any binary in the workspace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// Command line board client
    Cli,
    /// Board web server (typically singleton)
    WebServer,
}

impl ProcessId {
    /// Initialize the global process ID for the CLI
    pub fn init_cli() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Cli)
    }

    /// Initialize the global process ID for the web server
    pub fn init_webserver() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::WebServer)
    }

    /// Get the global process ID, falling back to the CLI identity when
    /// nothing was initialized (library use, tests)
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Cli)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Cli => write!(f, "pipeline"),
            ProcessId::WebServer => write!(f, "webserver"),
        }
    }
}

/// Sort modes available inside a lane
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOption {
    #[default]
    #[serde(rename = "probability")]
    Probability,
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "expectedCloseAt")]
    ExpectedCloseAt,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Probability => "probability",
            SortOption::CreatedAt => "createdAt",
            SortOption::ExpectedCloseAt => "expectedCloseAt",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOption {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "probability" => Ok(SortOption::Probability),
            "createdat" | "created_at" | "created" => Ok(SortOption::CreatedAt),
            "expectedcloseat" | "expected_close_at" | "expected" => Ok(SortOption::ExpectedCloseAt),
            _ => Err(SharedError::UnknownSortOption { input: s.to_string() }),
        }
    }
}

/// Organizational scope the cached queries belong to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeVersion(pub u64);

impl fmt::Display for ScopeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cache key for the deals query: scope version plus resource tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub scope: ScopeVersion,
    pub resource: &'static str,
}

impl QueryKey {
    pub const PIPELINE_DEALS: &'static str = "customers:deals:pipeline";

    /// Key for the pipeline deals query under the given scope
    pub fn pipeline_deals(scope: ScopeVersion) -> Self {
        Self {
            scope,
            resource: Self::PIPELINE_DEALS,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:scope:{}", self.resource, self.scope)
    }
}

/// Notice levels for transient banners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient user-facing notice (flash message)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}
