// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct GroupMember {
    /// The id of the member resource
    pub value: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// The resource type of the member ("User" or "Group")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub member_type: Option<String>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[serde(default)]
    pub schemas: Vec<String>,

    pub display_name: String,

    /// An identifier for the resource as defined by the provisioning client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default, skip_serializing_if = "skip_serializing_list")]
    pub members: Option<Vec<GroupMember>>,
}

impl CreateGroupRequest {
    pub fn new(
        display_name: String,
        external_id: Option<String>,
        member_ids: Vec<String>,
    ) -> Self {
        let members = (!member_ids.is_empty()).then(|| {
            member_ids
                .into_iter()
                .map(|value| GroupMember {
                    value,
                    display: None,
                    member_type: None,
                })
                .collect()
        });

        Self {
            schemas: vec![String::from(GROUP_URN)],
            display_name,
            external_id,
            members,
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,

    pub display_name: String,

    // This is an OPTIONAL attribute, so skip serializing it if it's null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default, skip_serializing_if = "skip_serializing_list")]
    pub members: Option<Vec<GroupMember>>,
}

impl Resource for Group {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn resource_type() -> ResourceType {
        ResourceType::Group
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_create_group_request_wire_shape() {
        let request = CreateGroupRequest::new(
            String::from("Sales Reps"),
            Some(String::from("sales_reps")),
            vec![String::from("u1"), String::from("u2")],
        );

        let serialized = serde_json::to_value(&request).unwrap();
        assert_eq!(
            serialized,
            serde_json::json!({
                "schemas": [GROUP_URN],
                "displayName": "Sales Reps",
                "externalId": "sales_reps",
                "members": [
                    { "value": "u1" },
                    { "value": "u2" }
                ],
            })
        );
    }

    #[test]
    fn test_empty_members_not_serialized() {
        let request =
            CreateGroupRequest::new(String::from("Sales Reps"), None, vec![]);

        let serialized = serde_json::to_value(&request).unwrap();
        assert!(serialized.get("members").is_none());
        assert!(serialized.get("externalId").is_none());
    }
}
