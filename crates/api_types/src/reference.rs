use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Deserializer, Serialize, de};

/// Opaque identifier of a server record.
///
/// The API is not consistent about id types: most records use strings, some
/// older endpoints send integers. Both deserialize into the same value.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

struct IdVisitor;

impl de::Visitor<'_> for IdVisitor {
    type Value = Id;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Id, E> {
        Ok(Id(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Id, E> {
        Ok(Id(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Id, E> {
        Ok(Id(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Id, E> {
        Ok(Id(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }
}

/// Records that can be referenced by id.
pub trait Identified {
    fn id(&self) -> &Id;

    /// Human readable label, if the record carries one.
    fn label(&self) -> Option<&str> {
        None
    }
}

/// A foreign-key reference as sent by the API: either the bare id or the
/// populated record.
///
/// ```rust
/// use api_types::{Reference, account::AccountSummary};
///
/// let bare: Reference<AccountSummary> = serde_json::from_str(r#""acc-1""#).unwrap();
/// let full: Reference<AccountSummary> =
///     serde_json::from_str(r#"{"_id": "acc-1", "name": "Cash"}"#).unwrap();
/// assert_eq!(bare.id(), full.id());
/// assert_eq!(full.label(), Some("Cash"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Id(Id),
    Embedded(T),
}

impl<T: Identified> Reference<T> {
    pub fn id(&self) -> &Id {
        match self {
            Self::Id(id) => id,
            Self::Embedded(record) => record.id(),
        }
    }

    pub fn embedded(&self) -> Option<&T> {
        match self {
            Self::Id(_) => None,
            Self::Embedded(record) => Some(record),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.embedded().and_then(Identified::label)
    }

    /// Collapses the reference into its id, dropping any embedded payload.
    pub fn into_id(self) -> Id {
        match self {
            Self::Id(id) => id,
            Self::Embedded(record) => record.id().clone(),
        }
    }
}

impl<T> From<Id> for Reference<T> {
    fn from(value: Id) -> Self {
        Self::Id(value)
    }
}
