//! Managed restaurant (store) types.

use serde::{Deserialize, Serialize};

use crate::{ComandaError, Result};

/// The restaurant managed by the signed-in user, `GET /managed-restaurant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedRestaurant {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub manager_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Input for `PUT /profile` — the store-profile editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreProfileInput {
    pub name: String,
    pub description: Option<String>,
}

impl StoreProfileInput {
    /// Local validation, applied before any cache or network activity.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ComandaError::Validation(
                "store name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Input for `POST /restaurants` — restaurant sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRestaurant {
    pub restaurant_name: String,
    pub manager_name: String,
    pub email: String,
    pub phone: String,
}

impl NewRestaurant {
    /// Local validation, applied before any network activity.
    pub fn validate(&self) -> Result<()> {
        if self.restaurant_name.trim().is_empty() {
            return Err(ComandaError::Validation(
                "restaurant name must not be empty".into(),
            ));
        }
        if self.manager_name.trim().is_empty() {
            return Err(ComandaError::Validation(
                "manager name must not be empty".into(),
            ));
        }
        if !self.email.contains('@') {
            return Err(ComandaError::Validation(format!(
                "invalid email: {}",
                self.email
            )));
        }
        Ok(())
    }
}
