// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

#[endpoint {
    method = GET,
    path = "/v2/Groups"
}]
pub async fn list_groups(
    rqctx: RequestContext<Arc<ServerContext>>,
    query_params: Query<PageParams>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(response) = reject_unauthorized(&rqctx)? {
        return Ok(response);
    }

    let result: Result<Response<Body>, http::Error> =
        match apictx.store.list_groups(query_params.into_inner()) {
            Ok(response) => response.to_http_response(),
            Err(error) => error.to_http_response(),
        };

    result.map_err(HttpError::from)
}

#[derive(Deserialize, JsonSchema)]
pub struct GroupPathParam {
    group_id: String,
}

#[endpoint {
    method = GET,
    path = "/v2/Groups/{group_id}"
}]
pub async fn get_group(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<GroupPathParam>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(response) = reject_unauthorized(&rqctx)? {
        return Ok(response);
    }
    let path_param = path_param.into_inner();

    let result: Result<Response<Body>, http::Error> =
        match apictx.store.get_group(&path_param.group_id) {
            Ok(response) => response.to_http_response(StatusCode::OK),
            Err(error) => error.to_http_response(),
        };

    result.map_err(HttpError::from)
}

#[endpoint {
    method = POST,
    path = "/v2/Groups",
}]
pub async fn create_group(
    rqctx: RequestContext<Arc<ServerContext>>,
    body: TypedBody<scimtool_core::CreateGroupRequest>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(response) = reject_unauthorized(&rqctx)? {
        return Ok(response);
    }
    let request = body.into_inner();

    let result: Result<Response<Body>, http::Error> =
        match apictx.store.create_group(request) {
            Ok(response) => response.to_http_response(StatusCode::CREATED),
            Err(error) => error.to_http_response(),
        };

    result.map_err(HttpError::from)
}

#[endpoint {
    method = DELETE,
    path = "/v2/Groups/{group_id}"
}]
pub async fn delete_group(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<GroupPathParam>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(response) = reject_unauthorized(&rqctx)? {
        return Ok(response);
    }
    let path_param = path_param.into_inner();

    let result: Result<Response<Body>, http::Error> =
        match apictx.store.delete_group(&path_param.group_id) {
            Ok(()) => scimtool_core::deleted_http_response(),
            Err(error) => error.to_http_response(),
        };

    result.map_err(HttpError::from)
}

#[endpoint {
    method = PATCH,
    path = "/v2/Groups/{group_id}"
}]
pub async fn patch_group(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<GroupPathParam>,
    body: TypedBody<scimtool_core::PatchRequest>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(response) = reject_unauthorized(&rqctx)? {
        return Ok(response);
    }
    let path_param = path_param.into_inner();

    let result: Result<Response<Body>, http::Error> = match apictx
        .store
        .patch_group(&path_param.group_id, body.into_inner())
    {
        Ok(response) => response.to_http_response(StatusCode::OK),
        Err(error) => error.to_http_response(),
    };

    result.map_err(HttpError::from)
}
