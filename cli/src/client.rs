// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::Context;
use anyhow::anyhow;
use anyhow::bail;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;

use scimtool_core::CreateGroupRequest;
use scimtool_core::CreateUserRequest;
use scimtool_core::Group;
use scimtool_core::ListResponse;
use scimtool_core::PageParams;
use scimtool_core::PatchRequest;
use scimtool_core::Resource;
use scimtool_core::ResourceType;
use scimtool_core::SingleResourceResponse;
use scimtool_core::User;

pub const SCIM_MEDIA_TYPE: &str = "application/scim+json;charset=utf-8";

/// A blocking client for one SCIM tenant, authenticating every request with
/// the operator's bearer token.
pub struct ScimClient {
    url: String,
    client: Client,
}

impl ScimClient {
    pub fn new_with_bearer_auth(
        url: String,
        bearer: String,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(SCIM_MEDIA_TYPE));

        let mut auth = HeaderValue::from_str(&format!("Bearer {bearer}"))
            .context("bearer token is not a valid header value")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("building HTTP client")?;

        Ok(Self { url: url.trim_end_matches('/').to_string(), client })
    }

    /// Fetch one page of a collection
    pub fn get_page(
        &self,
        resource_type: ResourceType,
        page: PageParams,
    ) -> anyhow::Result<ListResponse> {
        let endpoint = resource_type.endpoint();

        let result = self
            .client
            .get(format!("{}/{}", self.url, endpoint))
            .query(&page)
            .send()
            .with_context(|| format!("GET /{endpoint} failed"))?;

        if result.status() != StatusCode::OK {
            return Err(response_error(result)
                .context(format!("listing {endpoint} failed")));
        }

        result.json().context("parsing ListResponse")
    }

    /// Delete a single resource by id
    pub fn delete(
        &self,
        resource_type: ResourceType,
        id: &str,
    ) -> anyhow::Result<()> {
        let endpoint = resource_type.endpoint();

        let result = self
            .client
            .delete(format!("{}/{}/{}", self.url, endpoint, id))
            .send()
            .with_context(|| format!("DELETE /{endpoint}/{id} failed"))?;

        // RFC 7644 § 3.6: a successful DELETE comes back as 204, but some
        // providers answer 200.
        if !result.status().is_success() {
            return Err(response_error(result)
                .context(format!("deleting {endpoint}/{id} failed")));
        }

        Ok(())
    }

    pub fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> anyhow::Result<User> {
        self.post_resource(request)
    }

    pub fn create_group(
        &self,
        request: &CreateGroupRequest,
    ) -> anyhow::Result<Group> {
        self.post_resource(request)
    }

    /// Add a user to an existing group via a SCIM PATCH operation
    pub fn add_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> anyhow::Result<()> {
        let request = PatchRequest::add_group_members(&[user_id.to_string()]);

        let result = self
            .client
            .patch(format!("{}/Groups/{}", self.url, group_id))
            .header(CONTENT_TYPE, SCIM_MEDIA_TYPE)
            .json(&request)
            .send()
            .with_context(|| format!("PATCH /Groups/{group_id} failed"))?;

        if !result.status().is_success() {
            return Err(response_error(result).context(format!(
                "adding user {user_id} to group {group_id} failed"
            )));
        }

        Ok(())
    }

    fn post_resource<B, R>(&self, request: &B) -> anyhow::Result<R>
    where
        B: Serialize,
        R: Resource + DeserializeOwned,
    {
        let endpoint = R::resource_type().endpoint();

        let result = self
            .client
            .post(format!("{}/{}", self.url, endpoint))
            .header(CONTENT_TYPE, SCIM_MEDIA_TYPE)
            .json(request)
            .send()
            .with_context(|| format!("POST /{endpoint} failed"))?;

        // RFC 7644 § 3.3:
        // When the service provider successfully creates the new resource, an
        // HTTP response SHALL be returned with HTTP status code 201 (Created).
        if result.status() != StatusCode::CREATED {
            return Err(response_error(result)
                .context(format!("creating a {} failed", R::resource_type())));
        }

        self.result_as_resource(result)
    }

    fn result_as_resource<R>(
        &self,
        result: reqwest::blocking::Response,
    ) -> anyhow::Result<R>
    where
        R: Resource + DeserializeOwned,
    {
        let response: SingleResourceResponse =
            result.json().context("parsing resource envelope")?;

        if !response.resource.schemas.contains(&R::schema()) {
            bail!("response does not contain {} schema", R::resource_type());
        }

        serde_json::from_value(serde_json::Value::Object(
            response.resource.resource,
        ))
        .context("parsing resource attributes")
    }
}

/// Surface the status code and response body to the operator
fn response_error(result: reqwest::blocking::Response) -> anyhow::Error {
    let status = result.status();
    let body = result
        .text()
        .unwrap_or_else(|_| String::from("<unreadable body>"));

    anyhow!("server returned {status}: {body}")
}
