//! Error types for the Classbook core crate.

use thiserror::Error;

use crate::models::common::{Collection, EntityId};

/// Top-level error type for all Classbook core operations.
#[derive(Debug, Error)]
pub enum ClassbookError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("failed to fetch {collection}{}: {message}", id_suffix(.id))]
    Fetch {
        collection: Collection,
        id: Option<EntityId>,
        message: String,
    },

    #[error("failed to modify {collection}{}: {message}", id_suffix(.id))]
    Mutation {
        collection: Collection,
        id: Option<EntityId>,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ClassbookError {
    pub fn fetch(collection: Collection, id: Option<EntityId>, message: impl Into<String>) -> Self {
        Self::Fetch {
            collection,
            id,
            message: message.into(),
        }
    }

    pub fn mutation(
        collection: Collection,
        id: Option<EntityId>,
        message: impl Into<String>,
    ) -> Self {
        Self::Mutation {
            collection,
            id,
            message: message.into(),
        }
    }

    /// The collection a fetch or mutation failure refers to.
    pub fn collection(&self) -> Option<Collection> {
        match self {
            Self::Fetch { collection, .. } | Self::Mutation { collection, .. } => Some(*collection),
            _ => None,
        }
    }
}

fn id_suffix(id: &Option<EntityId>) -> String {
    id.map(|id| format!("/{id}")).unwrap_or_default()
}

/// A convenience Result alias that defaults to [`ClassbookError`].
pub type Result<T> = std::result::Result<T, ClassbookError>;
