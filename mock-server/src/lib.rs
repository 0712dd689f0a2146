// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A SCIM v2 provider server backed by an in-memory tenant, for exercising
//! the CLI against something that behaves like the real service.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use dropshot::ApiDescription;
use dropshot::Body;
use dropshot::ConfigDropshot;
use dropshot::HttpError;
use dropshot::HttpServer;
use dropshot::Path;
use dropshot::Query;
use dropshot::RequestContext;
use dropshot::TypedBody;
use dropshot::endpoint;
use http::Response;
use http::StatusCode;
use schemars::JsonSchema;
use serde::Deserialize;
use slog::Drain;
use slog::o;

use scimtool_core::Error;
use scimtool_core::PageParams;
use scimtool_core::TenantStore;

mod groups;
mod users;

pub use groups::*;
pub use users::*;

pub struct ServerContext {
    pub store: TenantStore,

    /// When set, every request must carry this bearer token
    bearer: Option<String>,
}

/// Reject the request with a SCIM 401 document unless it carries the bearer
/// token the server requires.
pub(crate) fn reject_unauthorized(
    rqctx: &RequestContext<Arc<ServerContext>>,
) -> Result<Option<Response<Body>>, HttpError> {
    let Some(expected) = &rqctx.context().bearer else {
        return Ok(None);
    };

    let header = rqctx
        .request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match header {
        Some(value) if value == format!("Bearer {expected}") => Ok(None),
        _ => {
            let response = Error::unauthorized()
                .to_http_response()
                .map_err(HttpError::from)?;
            Ok(Some(response))
        }
    }
}

pub fn api() -> ApiDescription<Arc<ServerContext>> {
    let mut api = ApiDescription::new();

    api.register(list_users).unwrap();
    api.register(get_user).unwrap();
    api.register(create_user).unwrap();
    api.register(delete_user).unwrap();

    api.register(list_groups).unwrap();
    api.register(get_group).unwrap();
    api.register(create_group).unwrap();
    api.register(delete_group).unwrap();
    api.register(patch_group).unwrap();

    api
}

pub fn create_http_server(
    bind_addr: Option<SocketAddr>,
    bearer: Option<String>,
) -> anyhow::Result<HttpServer<Arc<ServerContext>>> {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let log = slog::Logger::root(drain, o!("component" => "scim-mock-server"));

    let config = ConfigDropshot {
        // Fall back to an ephemeral port, which tests rely on
        bind_address: bind_addr
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 0))),
        default_request_body_max_bytes: 8192,
        ..Default::default()
    };

    let context =
        Arc::new(ServerContext { store: TenantStore::new(), bearer });

    dropshot::ServerBuilder::new(api(), context, log)
        .config(config)
        .start()
        .map_err(|e| anyhow!("starting server failed: {e}"))
}
