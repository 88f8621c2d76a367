use derive_alias::derive_alias;
use serde::{Deserialize, Serialize};

derive_alias! {
    derive_common => #[derive(Default, Clone, Debug, PartialEq, Eq, PartialOrd, Ord,
        Serialize, Deserialize)]
}

derive_common! {
/// A registered product. Immutable once stored; `name` is the unique key.
pub struct Product {
    pub username: String,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub description: String,
    /// Unix milliseconds, stamped by the server on registration.
    #[serde(rename = "createdAt")]
    pub created_at: u64,
}
}

derive_common! {
/// A candidate product as submitted by a client, before the server stamps
/// the creation timestamp.
pub struct ProductDraft {
    pub username: String,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub description: String,
}
}

derive_common! {
pub struct ErrorResponse {
    pub error: String,
}
}

impl ProductDraft {
    /// Every field is required: strings must be non-empty and the price
    /// non-zero, matching required-binding semantics where a zero value
    /// fails validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() {
            return Err(ValidationError::Required("username"));
        }
        if self.name.is_empty() {
            return Err(ValidationError::Required("name"));
        }
        if self.category.is_empty() {
            return Err(ValidationError::Required("category"));
        }
        if self.price == 0 {
            return Err(ValidationError::Required("price"));
        }
        if self.description.is_empty() {
            return Err(ValidationError::Required("description"));
        }
        Ok(())
    }

    pub fn into_product(self, created_at: u64) -> Product {
        Product {
            username: self.username,
            name: self.name,
            category: self.category,
            price: self.price,
            description: self.description,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field `{0}` is required")]
    Required(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("An api server error occurred {0}")]
    ApiServer(#[from] hyper::Error),
    #[error("A listener error occurred {0}")]
    Listener(#[from] std::io::Error),
}
