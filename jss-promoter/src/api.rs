use thiserror::Error;
use xml_tree_core::ParseError;

use crate::identifier::Identifier;
use crate::resource::ResourceType;

/// Operations the promoter needs from one server.
///
/// `create` and `delete` return `None` when the session does not write
/// (read-only mode).
pub trait ResourceApi {
    /// Identifiers of every object of `kind`, in ascending order.
    fn list(&mut self, kind: ResourceType) -> Result<Vec<Identifier>, ApiError>;

    /// Raw XML representation of one object.
    fn get(&mut self, kind: ResourceType, id: &Identifier) -> Result<String, ApiError>;

    /// Create a new object from an XML document.
    fn create(
        &mut self,
        kind: ResourceType,
        document: &str,
    ) -> Result<Option<Identifier>, ApiError>;

    /// Delete one object.
    fn delete(
        &mut self,
        kind: ResourceType,
        id: &Identifier,
    ) -> Result<Option<Identifier>, ApiError>;
}

/// Failures reported by a [`ResourceApi`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server already holds an equivalent object.
    #[error("conflict (HTTP {status}): {message}")]
    Conflict { status: u16, message: String },
    #[error("authentication rejected by {url}")]
    Unauthorized { url: String },
    #[error("HTTP {status} from {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },
    #[error("unreadable response from {url}: {source}")]
    InvalidResponse { url: String, source: ParseError },
    #[error("response from {url} carried no object id")]
    MissingId { url: String },
    #[error("invalid server url {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl ApiError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }
}
