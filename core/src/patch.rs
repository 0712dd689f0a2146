// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

#[derive(Debug)]
pub enum PatchRequestError {
    Invalid(String),
    Unsupported(String),
}

impl PatchRequestError {
    pub fn detail(self) -> String {
        match self {
            PatchRequestError::Invalid(detail) => detail,
            PatchRequestError::Unsupported(detail) => detail,
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug)]
#[serde(tag = "op")]
pub enum PatchOp {
    #[serde(rename = "replace")]
    Replace { path: Option<String>, value: serde_json::Value },
    #[serde(rename = "add")]
    Add { path: Option<String>, value: serde_json::Value },
    #[serde(rename = "remove")]
    Remove { path: String },
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
pub struct PatchRequest {
    schemas: Vec<String>,

    #[serde(rename = "Operations")]
    operations: Vec<PatchOp>,
}

impl PatchRequest {
    /// The request an operator sends to add members to an existing group
    pub fn add_group_members(member_ids: &[String]) -> Self {
        let members: Vec<serde_json::Value> = member_ids
            .iter()
            .map(|id| serde_json::json!({ "value": id }))
            .collect();

        Self {
            schemas: vec![String::from(PATCHOP_URN)],
            operations: vec![PatchOp::Add {
                path: Some(String::from("members")),
                value: serde_json::Value::Array(members),
            }],
        }
    }

    /// Ensure that the parsed `PatchRequest` contains the expected schema
    /// field.
    fn validate_schema(&self) -> Result<(), PatchRequestError> {
        match matches!(&self.schemas[..], [val] if val == PATCHOP_URN) {
            true => Ok(()),
            false => Err(PatchRequestError::Invalid(format!(
                "invalid patch schema {:?}",
                self.schemas
            ))),
        }
    }

    /// For the given `PatchRequest` attempt to return a new stored group
    /// after applying a series of `PatchOp`s to the original object.
    pub fn apply_group_ops(
        &self,
        stored_group: &StoredParts<Group>,
    ) -> Result<StoredParts<Group>, PatchRequestError> {
        self.validate_schema()?;
        let mut updated_group = stored_group.clone();

        for patch_op in &self.operations {
            match patch_op {
                PatchOp::Add { path, value } => apply_group_add_op(
                    path.as_deref(),
                    value,
                    &mut updated_group,
                )?,
                PatchOp::Replace { path, value } => apply_group_replace_op(
                    path.as_deref(),
                    value,
                    &mut updated_group,
                )?,
                PatchOp::Remove { .. } => {
                    return Err(PatchRequestError::Unsupported(
                        "the remove op is not supported for groups"
                            .to_string(),
                    ));
                }
            }
        }

        Ok(updated_group)
    }
}

#[derive(Debug, Deserialize)]
struct PatchMember {
    value: String,

    #[serde(default)]
    display: Option<String>,
}

fn parse_patch_members(
    value: &serde_json::Value,
) -> Result<Vec<PatchMember>, PatchRequestError> {
    serde_json::from_value(value.clone()).map_err(|_| {
        PatchRequestError::Invalid(
            "members in a group patch require a value field".to_string(),
        )
    })
}

fn apply_group_add_op(
    path: Option<&str>,
    value: &serde_json::Value,
    group: &mut StoredParts<Group>,
) -> Result<(), PatchRequestError> {
    let Some(_path) = path.filter(|p| p.eq_ignore_ascii_case("members")) else {
        return Err(PatchRequestError::Invalid(
            "group add op must provide members as the path".to_string(),
        ));
    };

    for member in parse_patch_members(value)? {
        let members = group.resource.members.get_or_insert_default();

        // Adding an existing member again is a no-op
        if members.iter().any(|existing| existing.value == member.value) {
            continue;
        }

        members.push(GroupMember {
            value: member.value,
            display: member.display,
            member_type: Some(ResourceType::User.to_string()),
        });
    }

    Ok(())
}

fn apply_group_replace_op(
    path: Option<&str>,
    value: &serde_json::Value,
    group: &mut StoredParts<Group>,
) -> Result<(), PatchRequestError> {
    let Some(_path) = path.filter(|p| p.eq_ignore_ascii_case("members")) else {
        return Err(PatchRequestError::Unsupported(
            "only replacing a groups members path is supported".to_string(),
        ));
    };

    let new_members: Vec<GroupMember> = parse_patch_members(value)?
        .into_iter()
        .map(|member| GroupMember {
            value: member.value,
            display: member.display,
            member_type: Some(ResourceType::User.to_string()),
        })
        .collect();

    group.resource.members = (!new_members.is_empty()).then_some(new_members);

    Ok(())
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn stored_group(members: Option<Vec<GroupMember>>) -> StoredParts<Group> {
        StoredParts {
            resource: Group {
                id: String::from("abf4dd94-a4c0-4f67-89c9-76b03340cb9b"),
                display_name: String::from("Sales Reps"),
                external_id: None,
                members,
            },
            meta: StoredMeta {
                created: Utc::now(),
                last_modified: Utc::now(),
                version: String::from("W/unimplemented"),
            },
        }
    }

    #[test]
    fn test_add_group_members_wire_shape() {
        let request = PatchRequest::add_group_members(&[
            String::from("u1"),
            String::from("u2"),
        ]);

        let serialized = serde_json::to_value(&request).unwrap();
        assert_eq!(
            serialized,
            json!({
              "schemas": [
                "urn:ietf:params:scim:api:messages:2.0:PatchOp"
              ],
              "Operations": [
                {
                  "op": "add",
                  "path": "members",
                  "value": [
                    { "value": "u1" },
                    { "value": "u2" }
                  ]
                }
              ]
            })
        );
    }

    #[test]
    fn test_apply_add_op_appends_without_duplicating() {
        let group = stored_group(Some(vec![GroupMember {
            value: String::from("u1"),
            display: None,
            member_type: Some(String::from("User")),
        }]));

        let request = PatchRequest::add_group_members(&[
            String::from("u1"),
            String::from("u2"),
        ]);

        let updated = request.apply_group_ops(&group).unwrap();
        let members = updated.resource.members.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].value, "u1");
        assert_eq!(members[1].value, "u2");
    }

    #[test]
    fn test_parse_group_members_replace_op() {
        let json = json!({
          "schemas": [
            "urn:ietf:params:scim:api:messages:2.0:PatchOp"
          ],
          "Operations": [
            {
              "op": "replace",
              "path": "members",
              "value": [
                {
                  "value": "abf4dd94-a4c0-4f67-89c9-76b03340cb9b",
                  "display": "dakota@example.com"
                }
              ]
            }
          ]
        });

        let request: PatchRequest = serde_json::from_value(json).unwrap();

        let updated = request.apply_group_ops(&stored_group(None)).unwrap();
        let members = updated.resource.members.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].display.as_deref(), Some("dakota@example.com"));
    }

    #[test]
    fn test_wrong_schema_rejected() {
        let json = json!({
          "schemas": [
            "urn:ietf:params:scim:api:messages:2.0:BulkRequest"
          ],
          "Operations": [
            {
              "op": "add",
              "path": "members",
              "value": []
            }
          ]
        });

        let request: PatchRequest = serde_json::from_value(json).unwrap();
        assert!(request.apply_group_ops(&stored_group(None)).is_err());
    }

    #[test]
    fn test_remove_op_unsupported() {
        let json = json!({
          "schemas": [
            "urn:ietf:params:scim:api:messages:2.0:PatchOp"
          ],
          "Operations": [
            {
              "op": "remove",
              "path": "members"
            }
          ]
        });

        let request: PatchRequest = serde_json::from_value(json).unwrap();
        assert!(matches!(
            request.apply_group_ops(&stored_group(None)),
            Err(PatchRequestError::Unsupported(_)),
        ));
    }
}
