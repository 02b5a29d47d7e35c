use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// Addresses a single object on the server, either by numeric id or by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
    Id(u64),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("object identifier must not be empty")]
pub struct EmptyIdentifier;

impl Identifier {
    /// Values that parse as an integer are ids; anything else non-empty is a name.
    pub fn parse(raw: &str) -> Result<Self, EmptyIdentifier> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmptyIdentifier);
        }
        Ok(match trimmed.parse::<u64>() {
            Ok(id) => Identifier::Id(id),
            Err(_) => Identifier::Name(trimmed.to_string()),
        })
    }

    /// URL segment selecting how the server looks the object up.
    pub fn lookup_key(&self) -> &'static str {
        match self {
            Identifier::Id(_) => "id",
            Identifier::Name(_) => "name",
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Id(id) => write!(f, "{id}"),
            Identifier::Name(name) => write!(f, "{name}"),
        }
    }
}
