// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::DateTime;
use chrono::Utc;
use dropshot::Body;
use http::Response;
use http::StatusCode;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

mod group;
mod meta;
mod pagination;
mod patch;
mod resource;
mod response;
mod store;
mod urn;
mod user;
mod utils;

pub use group::*;
pub use meta::*;
pub use pagination::*;
pub use patch::*;
pub use resource::*;
pub use response::*;
pub use store::*;
pub use urn::*;
pub use user::*;
pub use utils::*;
