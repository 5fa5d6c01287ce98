//! Wire-facing payload records.

use serde::{Deserialize, Serialize};

/// A provisioned user account, serialized with the service's PascalCase
/// field names. Optional fields are omitted from the payload when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_service_field_names() {
        let mut user = User::new("user@test.com");
        user.first_name = Some("Ada".to_string());
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"Email": "user@test.com", "FirstName": "Ada"})
        );
    }
}
