// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Write;

use anyhow::Context;
use clap::ValueEnum;

use scimtool_core::Group;
use scimtool_core::ListResponse;
use scimtool_core::Meta;
use scimtool_core::ResourceType;
use scimtool_core::User;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// Format user details for display
pub fn format_user(user: &User) -> String {
    let name = user.name.as_ref();

    format!(
        "Username: {}\nID: {}\nName: {} {}\nStatus: {}\nEmail: {}",
        user.user_name,
        user.id,
        name.and_then(|n| n.given_name.as_deref()).unwrap_or("N/A"),
        name.and_then(|n| n.family_name.as_deref()).unwrap_or("N/A"),
        if user.active { "active" } else { "inactive" },
        user.primary_email().unwrap_or("N/A"),
    )
}

/// Format group details for display
pub fn format_group(group: &Group, meta: Option<&Meta>) -> String {
    let last_modified = meta
        .and_then(|m| m.last_modified)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| String::from("N/A"));

    format!(
        "Display Name: {}\nID: {}\nLast Modified: {}\nExternal ID: {}",
        group.display_name,
        group.id,
        last_modified,
        group.external_id.as_deref().unwrap_or("N/A"),
    )
}

/// Format one raw resource from a list page for display
pub fn format_raw_resource(
    resource_type: ResourceType,
    obj: &serde_json::Map<String, serde_json::Value>,
) -> anyhow::Result<String> {
    let value = serde_json::Value::Object(obj.clone());

    match resource_type {
        ResourceType::User => {
            let user: User = serde_json::from_value(value)
                .context("parsing a listed user")?;
            Ok(format_user(&user))
        }

        ResourceType::Group => {
            let meta: Option<Meta> = obj
                .get("meta")
                .and_then(|m| serde_json::from_value(m.clone()).ok());
            let group: Group = serde_json::from_value(value)
                .context("parsing a listed group")?;
            Ok(format_group(&group, meta.as_ref()))
        }
    }
}

/// Stream a pretty listing: the collection total from the first page as a
/// header, then each resource as it is retrieved.
pub fn write_pretty_listing<W: Write>(
    out: &mut W,
    resource_type: ResourceType,
    pages: impl IntoIterator<Item = anyhow::Result<ListResponse>>,
) -> anyhow::Result<()> {
    let mut first = true;

    for page in pages {
        let page = page?;

        if first {
            writeln!(
                out,
                "Total {} found: {}",
                resource_type.endpoint(),
                page.total_results,
            )?;
            first = false;
        }

        for obj in &page.resources {
            writeln!(out, "{}", format_raw_resource(resource_type, obj)?)?;
            writeln!(out, "{}", "-".repeat(40))?;
        }
    }

    if first {
        writeln!(out, "Total {} found: 0", resource_type.endpoint())?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use scimtool_core::{Email, LISTRESPONSE_URN, Name};

    #[test]
    fn test_format_user_with_missing_attributes() {
        let user = User {
            id: String::from("u1"),
            user_name: String::from("dschrute"),
            active: true,
            name: Some(Name {
                given_name: Some(String::from("Dwight")),
                family_name: None,
            }),
            emails: vec![Email {
                value: String::from("dschrute@dundermifflin.com"),
                primary: Some(true),
            }],
            external_id: None,
        };

        let formatted = format_user(&user);
        assert!(formatted.contains("Username: dschrute"));
        assert!(formatted.contains("Name: Dwight N/A"));
        assert!(formatted.contains("Email: dschrute@dundermifflin.com"));
    }

    fn user_obj(
        id: &str,
        user_name: &str,
    ) -> serde_json::Map<String, serde_json::Value> {
        serde_json::json!({
            "id": id,
            "userName": user_name,
            "active": true,
        })
        .as_object()
        .expect("an object")
        .clone()
    }

    #[test]
    fn test_pretty_listing_reports_total_up_front() {
        let pages = vec![
            Ok(ListResponse {
                schemas: vec![String::from(LISTRESPONSE_URN)],
                total_results: 3,
                start_index: Some(1),
                items_per_page: Some(2),
                resources: vec![
                    user_obj("u1", "mscott"),
                    user_obj("u2", "jhalpert"),
                ],
            }),
            Ok(ListResponse {
                schemas: vec![String::from(LISTRESPONSE_URN)],
                total_results: 3,
                start_index: Some(3),
                items_per_page: Some(1),
                resources: vec![user_obj("u3", "pbeesly")],
            }),
        ];

        let mut out = Vec::new();
        write_pretty_listing(&mut out, ResourceType::User, pages).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Total Users found: 3\n"));
        assert_eq!(text.matches("Username:").count(), 3);
    }

    #[test]
    fn test_pretty_listing_of_nothing() {
        let mut out = Vec::new();
        write_pretty_listing(&mut out, ResourceType::Group, vec![]).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Total Groups found: 0\n"
        );
    }

    #[test]
    fn test_format_group_without_meta() {
        let group = Group {
            id: String::from("g1"),
            display_name: String::from("Sales Reps"),
            external_id: Some(String::from("sales_reps")),
            members: None,
        };

        let formatted = format_group(&group, None);
        assert!(formatted.contains("Display Name: Sales Reps"));
        assert!(formatted.contains("Last Modified: N/A"));
        assert!(formatted.contains("External ID: sales_reps"));
    }
}
