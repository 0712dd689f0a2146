// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::str::FromStr;

use super::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResourceType {
    User,
    Group,
}

impl ResourceType {
    pub fn urn(&self) -> &'static str {
        match self {
            ResourceType::User => USER_URN,
            ResourceType::Group => GROUP_URN,
        }
    }

    /// The collection endpoint path segment, relative to the SCIM base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            ResourceType::User => "Users",
            ResourceType::Group => "Groups",
        }
    }
}

// We match case exact here.
//
// RFC 7644
//
// resourceType
//     The name of the resource type of the resource.  This
impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::User => write!(f, "User"),
            ResourceType::Group => write!(f, "Group"),
        }
    }
}

impl FromStr for ResourceType {
    type Err = String;

    // Accept both the singular resource type name and the plural endpoint
    // form that operators type on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("user") || s.eq_ignore_ascii_case("users") {
            Ok(ResourceType::User)
        } else if s.eq_ignore_ascii_case("group")
            || s.eq_ignore_ascii_case("groups")
        {
            Ok(ResourceType::Group)
        } else {
            Err(format!("unknown resource type {s}"))
        }
    }
}

pub trait Resource: std::fmt::Debug + Serialize {
    fn id(&self) -> String;

    fn resource_type() -> ResourceType;

    fn schema() -> String {
        String::from(Self::resource_type().urn())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_resource_type_from_str() {
        for s in ["Users", "users", "User", "USER"] {
            assert_eq!(s.parse::<ResourceType>().unwrap(), ResourceType::User);
        }

        for s in ["Groups", "groups", "Group"] {
            assert_eq!(s.parse::<ResourceType>().unwrap(), ResourceType::Group);
        }

        assert!("Robots".parse::<ResourceType>().is_err());
    }
}
