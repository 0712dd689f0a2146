// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub const ERROR_URN: &str = "urn:ietf:params:scim:api:messages:2.0:Error";
pub const GROUP_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
pub const LISTRESPONSE_URN: &str =
    "urn:ietf:params:scim:api:messages:2.0:ListResponse";
pub const PATCHOP_URN: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";
pub const USER_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

// Extension schemas asserted on user creation. The tenant extension is
// specific to the platform this tool talks to.
pub const ENTERPRISE_USER_URN: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";
pub const TENANT_USER_URN: &str =
    "urn:ietf:params:scim:schemas:extension:tenant:2.0:User";
