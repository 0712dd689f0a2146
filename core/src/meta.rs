// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

// Everything except resourceType is optional when parsing: real providers
// vary in which meta sub-attributes they return.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Clone, Debug)]
pub struct StoredMeta {
    pub created: DateTime<Utc>,

    pub last_modified: DateTime<Utc>,

    pub version: String,
}

#[derive(Clone, Debug)]
pub struct StoredParts<R> {
    pub resource: R,
    pub meta: StoredMeta,
}
