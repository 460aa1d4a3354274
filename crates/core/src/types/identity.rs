//! The authenticated principal.

use serde::{Deserialize, Serialize};

use crate::types::email::{Email, EmailError};
use crate::types::id::UserId;
use crate::types::role::Role;

/// Errors raised by the external-payload validation boundary.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// A field the contract requires is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The email field is present but not a valid address.
    #[error("invalid email in payload: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The role field is present but not a recognized role.
    #[error("unknown role in payload: {0}")]
    UnknownRole(String),

    /// The payload is not a JSON object.
    #[error("payload is not an object")]
    NotAnObject,
}

/// The authenticated principal's profile and role as known to the client.
///
/// Owned by the session; created only by [`Identity::from_payload`] after a
/// successful auth exchange, replaced wholesale on re-login, and cleared on
/// logout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Opaque identifier issued by the remote API.
    pub id: UserId,
    /// The principal's email address.
    pub email: Email,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Phone number.
    #[serde(default)]
    pub phone: String,
    /// Authorization role; `None` when the remote API supplied none.
    #[serde(default)]
    pub role: Option<Role>,
    /// Whether the principal must change their password before using the site.
    #[serde(default)]
    pub must_change_password: bool,
}

impl Identity {
    /// Validate an untyped external payload into a typed `Identity`.
    ///
    /// This is the only construction path from external JSON. The expected
    /// shape is `{id, email, name, address, phone, role,
    /// mustChangePassword}`; `id` and `email` are required, the rest default
    /// to empty/absent.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when the payload is not an object, when a
    /// required field is missing or empty, when the email does not parse, or
    /// when a role string is present but unrecognized.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self, PayloadError> {
        let obj = payload.as_object().ok_or(PayloadError::NotAnObject)?;

        let field = |name: &'static str| -> Option<&str> {
            obj.get(name).and_then(serde_json::Value::as_str)
        };

        let id = field("id")
            .filter(|s| !s.is_empty())
            .ok_or(PayloadError::MissingField("id"))?;

        let email = field("email").ok_or(PayloadError::MissingField("email"))?;
        let email = Email::parse(email)?;

        let role = match field("role") {
            None => None,
            Some("") => None,
            Some(raw) => Some(
                Role::parse(raw).ok_or_else(|| PayloadError::UnknownRole(raw.to_owned()))?,
            ),
        };

        let must_change_password = obj
            .get("mustChangePassword")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        Ok(Self {
            id: UserId::new(id),
            email,
            name: field("name").unwrap_or_default().to_owned(),
            address: field("address").unwrap_or_default().to_owned(),
            phone: field("phone").unwrap_or_default().to_owned(),
            role,
            must_change_password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_payload_parses() {
        let payload = json!({
            "id": "usr_1",
            "email": "vet@wagtail.example",
            "name": "Dana",
            "address": "1 Paw Lane",
            "phone": "555-0100",
            "role": "veterinarian",
            "mustChangePassword": true,
        });

        let identity = Identity::from_payload(&payload).expect("valid payload");
        assert_eq!(identity.id.as_str(), "usr_1");
        assert_eq!(identity.role, Some(Role::Veterinarian));
        assert!(identity.must_change_password);
    }

    #[test]
    fn minimal_payload_defaults_optional_fields() {
        let payload = json!({ "id": "usr_2", "email": "a@b.c" });

        let identity = Identity::from_payload(&payload).expect("valid payload");
        assert_eq!(identity.name, "");
        assert_eq!(identity.address, "");
        assert_eq!(identity.phone, "");
        assert_eq!(identity.role, None);
        assert!(!identity.must_change_password);
    }

    #[test]
    fn missing_id_is_rejected() {
        let payload = json!({ "email": "a@b.c" });
        assert!(matches!(
            Identity::from_payload(&payload),
            Err(PayloadError::MissingField("id"))
        ));

        let payload = json!({ "id": "", "email": "a@b.c" });
        assert!(matches!(
            Identity::from_payload(&payload),
            Err(PayloadError::MissingField("id"))
        ));
    }

    #[test]
    fn missing_email_is_rejected() {
        let payload = json!({ "id": "usr_3" });
        assert!(matches!(
            Identity::from_payload(&payload),
            Err(PayloadError::MissingField("email"))
        ));
    }

    #[test]
    fn unknown_role_is_a_distinct_error() {
        let payload = json!({ "id": "usr_4", "email": "a@b.c", "role": "janitor" });
        assert!(matches!(
            Identity::from_payload(&payload),
            Err(PayloadError::UnknownRole(r)) if r == "janitor"
        ));
    }

    #[test]
    fn empty_role_is_absent() {
        let payload = json!({ "id": "usr_5", "email": "a@b.c", "role": "" });
        let identity = Identity::from_payload(&payload).expect("valid payload");
        assert_eq!(identity.role, None);
    }

    #[test]
    fn role_is_parsed_case_insensitively() {
        let payload = json!({ "id": "usr_6", "email": "a@b.c", "role": "ADMIN" });
        let identity = Identity::from_payload(&payload).expect("valid payload");
        assert_eq!(identity.role, Some(Role::Admin));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(matches!(
            Identity::from_payload(&json!("nope")),
            Err(PayloadError::NotAnObject)
        ));
    }
}
