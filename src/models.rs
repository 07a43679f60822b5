//! Backend resource shapes. Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Serialize};

use crate::types::LocalId;

/// A branch (sucursal) of the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Local {
    pub local_id: LocalId,
    pub local_name: String,
    #[serde(default)]
    pub local_code: Option<String>,
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub is_active: bool,
    /// Backend timestamp, passed through untouched.
    pub created_at: String,
}

/// Body of `POST /locales`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalCreateDto {
    pub local_name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body of `PUT /locales/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalUpdateDto {
    pub local_id: LocalId,
    pub local_name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_active: bool,
}

impl LocalUpdateDto {
    /// Apply edited fields to an existing branch, keeping its id and
    /// current active flag.
    #[must_use]
    pub fn for_local(local: &Local, changes: LocalCreateDto) -> Self {
        Self {
            local_id: local.local_id,
            local_name: changes.local_name,
            address: changes.address,
            phone: changes.phone,
            is_active: local.is_active,
        }
    }
}
