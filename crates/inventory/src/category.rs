use serde::{Deserialize, Serialize};

use stockroom_core::{CategoryId, DomainError, DomainResult};

/// A named grouping of products, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

/// Input for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }

    /// Trim fields and reject a blank name. A blank description becomes `None`.
    pub fn normalized(self) -> DomainResult<Self> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("category name is required"));
        }
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            name: name.to_string(),
            description,
        })
    }
}
