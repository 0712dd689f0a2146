// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

/// The components of a user's real name (RFC 7643 § 4.1.1)
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct Email {
    pub value: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub schemas: Vec<String>,

    pub user_name: String,

    pub active: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<Email>,

    /// An identifier for the resource as defined by the provisioning client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl CreateUserRequest {
    pub fn new(
        user_name: String,
        email: String,
        given_name: String,
        family_name: String,
        external_id: Option<String>,
    ) -> Self {
        Self {
            schemas: vec![
                String::from(USER_URN),
                String::from(ENTERPRISE_USER_URN),
                String::from(TENANT_USER_URN),
            ],
            user_name,
            active: Some(true),
            name: Some(Name {
                given_name: Some(given_name),
                family_name: Some(family_name),
            }),
            emails: vec![Email { value: email, primary: Some(true) }],
            external_id,
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    pub user_name: String,

    #[serde(default)]
    pub active: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<Email>,

    /// An identifier for the resource as defined by the provisioning client
    // This is an OPTIONAL attribute, so skip serializing it if it's null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl User {
    /// The primary email value, falling back to the first one listed
    pub fn primary_email(&self) -> Option<&str> {
        self.emails
            .iter()
            .find(|email| email.primary == Some(true))
            .or_else(|| self.emails.first())
            .map(|email| email.value.as_str())
    }
}

impl Resource for User {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn resource_type() -> ResourceType {
        ResourceType::User
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_create_user_request_wire_shape() {
        let request = CreateUserRequest::new(
            String::from("dschrute"),
            String::from("dschrute@dundermifflin.com"),
            String::from("Dwight"),
            String::from("Schrute"),
            None,
        );

        let serialized = serde_json::to_value(&request).unwrap();
        assert_eq!(
            serialized,
            serde_json::json!({
                "schemas": [USER_URN, ENTERPRISE_USER_URN, TENANT_USER_URN],
                "userName": "dschrute",
                "active": true,
                "name": {
                    "givenName": "Dwight",
                    "familyName": "Schrute",
                },
                "emails": [
                    { "value": "dschrute@dundermifflin.com", "primary": true }
                ],
            })
        );
    }

    #[test]
    fn test_primary_email_fallback() {
        let mut user = User {
            id: String::from("u1"),
            user_name: String::from("jhalpert"),
            active: true,
            name: None,
            emails: vec![
                Email { value: String::from("a@example.com"), primary: None },
                Email {
                    value: String::from("b@example.com"),
                    primary: Some(true),
                },
            ],
            external_id: None,
        };

        assert_eq!(user.primary_email(), Some("b@example.com"));

        user.emails.truncate(1);
        assert_eq!(user.primary_email(), Some("a@example.com"));

        user.emails.clear();
        assert_eq!(user.primary_email(), None);
    }
}
