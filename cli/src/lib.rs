// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CRUD operations against a SCIM v2 provider: a bearer-authenticated
//! blocking client, a paginated collection walker, and output formatting.

pub mod client;
pub mod output;
pub mod walker;
