//! Typed entity projection

use crate::error::Result;
use crate::types::JsonValue;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Result of projecting a response body onto a model type
#[derive(Debug, Clone, PartialEq)]
pub enum Entity<T> {
    /// The body was a single record
    One(T),
    /// The body was a collection (`value` array)
    Many(Vec<T>),
}

impl<T> Entity<T> {
    /// Flatten into a list
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(entity) => vec![entity],
            Self::Many(entities) => entities,
        }
    }

    /// The single record, if the body was not a collection
    pub fn into_one(self) -> Option<T> {
        match self {
            Self::One(entity) => Some(entity),
            Self::Many(_) => None,
        }
    }

    /// Check if the body was a collection
    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// Number of records
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(entities) => entities.len(),
        }
    }

    /// Check for an empty collection
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Materialize one raw record as `T`
///
/// `T = JsonValue` returns the record unchanged.
pub fn deserialize_entity<T: DeserializeOwned>(raw: &JsonValue) -> Result<T> {
    Ok(<T as Deserialize>::deserialize(raw)?)
}
