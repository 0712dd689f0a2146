// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::de::DeserializeOwned;

use super::*;

/// The generic response used to return a list of resources
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
pub struct ListResponse {
    pub schemas: Vec<String>,

    #[serde(rename = "totalResults")]
    pub total_results: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "startIndex")]
    pub start_index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "itemsPerPage")]
    pub items_per_page: Option<usize>,

    #[serde(default, rename = "Resources")]
    pub resources: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl ListResponse {
    /// Wrap one page of stored resources in the SCIM list envelope.
    /// `total_results` is the size of the whole collection, not the page.
    pub fn from_page<R>(
        page: Vec<StoredParts<R>>,
        total_results: usize,
        start_index: usize,
    ) -> Result<Self, Error>
    where
        R: Resource,
    {
        let schemas = vec![String::from(LISTRESPONSE_URN)];

        let resources = page
            .into_iter()
            .map(|StoredParts { resource, meta }| {
                SingleResourceResponse::from_resource(resource, meta)
            })
            .collect::<Result<Vec<_>, Error>>()?
            .into_iter()
            .map(serialize_resource_to_object)
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(ListResponse {
            schemas,
            total_results,
            start_index: Some(start_index),
            items_per_page: Some(resources.len()),
            resources,
        })
    }

    /// Convert the raw resource objects in this page into typed resources
    pub fn typed_resources<R>(&self) -> Result<Vec<R>, serde_json::Error>
    where
        R: Resource + DeserializeOwned,
    {
        self.resources
            .iter()
            .map(|obj| {
                serde_json::from_value(serde_json::Value::Object(obj.clone()))
            })
            .collect()
    }

    pub fn to_http_response(self) -> Result<Response<Body>, http::Error> {
        match serde_json::to_string(&self) {
            Ok(serialized) => Response::builder()
                .status(200)
                .header("Content-Type", "application/json")
                .body(serialized.into()),

            Err(e) => serialization_failed_response(e),
        }
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug)]
pub struct ResourceInner {
    #[serde(flatten)]
    pub resource: serde_json::Map<String, serde_json::Value>,

    pub schemas: Vec<String>,
}

/// The generic response used to return a single resource
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
pub struct SingleResourceResponse {
    #[serde(flatten)]
    pub resource: ResourceInner,

    pub meta: Meta,
}

impl SingleResourceResponse {
    pub fn from_resource<R>(
        resource: R,
        meta: StoredMeta,
    ) -> Result<Self, Error>
    where
        R: Resource,
    {
        // We have a strongly typed `Resource` but the envelope carries a
        // dynamic object, so that providers can attach attributes this crate
        // does not model.
        let obj = serialize_resource_to_object(resource)?;

        let resource =
            ResourceInner { resource: obj, schemas: vec![R::schema()] };

        Ok(SingleResourceResponse {
            resource,
            meta: Meta {
                resource_type: R::resource_type().to_string(),
                created: Some(meta.created),
                last_modified: Some(meta.last_modified),
                version: Some(meta.version),
                location: None,
            },
        })
    }

    pub fn to_http_response(
        self,
        status_code: StatusCode,
    ) -> Result<Response<Body>, http::Error> {
        match serde_json::to_string(&self) {
            Ok(serialized) => Response::builder()
                .status(status_code)
                .header("Content-Type", "application/json")
                .body(serialized.into()),

            Err(e) => serialization_failed_response(e),
        }
    }
}

/// The SCIM error types specified in RFC 7644, section 3.12
// RFC 7644, section 3.12:  HTTP Status and Error Response Handling
#[derive(Deserialize, Serialize, JsonSchema, Debug, PartialEq)]
pub enum ErrorType {
    #[serde(rename = "invalidSyntax")]
    InvalidSyntax,

    #[serde(rename = "invalidValue")]
    InvalidValue,

    #[serde(rename = "uniqueness")]
    Uniqueness,
}

/// The SCIM error format is specified in RFC 7644, section 3.12
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
pub struct Error {
    pub schemas: Vec<String>,

    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "scimType")]
    pub error_type: Option<ErrorType>,

    pub detail: String,
}

impl Error {
    fn new(
        status: StatusCode,
        error_type: Option<ErrorType>,
        detail: String,
    ) -> Self {
        Self {
            schemas: vec![String::from(ERROR_URN)],
            status: status.as_str().to_string(),
            error_type,
            detail,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            None,
            String::from("Authorization failed"),
        )
    }

    pub fn invalid_syntax(detail: String) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            Some(ErrorType::InvalidSyntax),
            detail,
        )
    }

    pub fn invalid_value(detail: String) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            Some(ErrorType::InvalidValue),
            detail,
        )
    }

    pub fn not_found(id: String) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            None,
            format!("Resource {id} not found"),
        )
    }

    pub fn conflict(identifier: String) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            Some(ErrorType::Uniqueness),
            format!("Resource matching {identifier} exists already"),
        )
    }

    pub fn internal_error(detail: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, None, detail)
    }

    pub fn status(&self) -> Result<u16, std::num::ParseIntError> {
        self.status.parse()
    }

    pub fn to_http_response(self) -> Result<Response<Body>, http::Error> {
        let status = match self.status() {
            Ok(status) => status,

            Err(e) => {
                return Response::builder()
                    .status(500)
                    .header("Content-Type", "application/json")
                    .body(
                        serde_json::json!(
                            {
                            "schemas": [ERROR_URN],
                            "status": 500,
                            "detail": format!("parsing {} as u16 failed: {e}", self.status),
                            }
                        )
                        .to_string()
                        .into(),
                    );
            }
        };

        match serde_json::to_string(&self) {
            Ok(serialized) => Response::builder()
                .status(status)
                .header("Content-Type", "application/json")
                .body(serialized.into()),

            Err(e) => serialization_failed_response(e),
        }
    }
}

pub fn deleted_http_response() -> Result<Response<Body>, http::Error> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Content-Type", "application/json")
        .body(Body::empty())
}

fn serialization_failed_response(
    e: serde_json::Error,
) -> Result<Response<Body>, http::Error> {
    Response::builder()
        .status(500)
        .header("Content-Type", "application/json")
        .body(
            serde_json::json!(
                {
                "schemas": [ERROR_URN],
                "status": 500,
                "detail": format!("serializing response failed: {e}"),
                }
            )
            .to_string()
            .into(),
        )
}

/// Convert a `Resource` to a more dynamic `serde_json::Map`
fn serialize_resource_to_object<R>(
    resource: R,
) -> Result<serde_json::Map<String, serde_json::Value>, Error>
where
    R: Serialize + std::fmt::Debug,
{
    let value = match serde_json::to_value(&resource) {
        Ok(value) => value,
        Err(e) => {
            return Err(Error::internal_error(format!(
                "failed to serialize resource {resource:?} to JSON: {e}"
            )));
        }
    };

    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(Error::internal_error(format!(
            "resource {resource:?} is not a JSON object"
        ))),
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;

    use super::*;
    use crate::User;

    fn stored_user(id: &str, user_name: &str) -> StoredParts<User> {
        StoredParts {
            resource: User {
                id: id.to_string(),
                user_name: user_name.to_string(),
                active: true,
                name: None,
                emails: vec![],
                external_id: None,
            },
            meta: StoredMeta {
                created: Utc::now(),
                last_modified: Utc::now(),
                version: String::from("W/unimplemented"),
            },
        }
    }

    #[test]
    fn test_list_response_round_trip() {
        let page = vec![stored_user("1", "dschrute"), stored_user("2", "jhalpert")];

        let response = ListResponse::from_page(page, 5, 1).unwrap();
        assert_eq!(response.total_results, 5);
        assert_eq!(response.items_per_page, Some(2));
        assert_eq!(response.start_index, Some(1));

        let users: Vec<User> = response.typed_resources().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].user_name, "dschrute");
        assert_eq!(users[1].user_name, "jhalpert");
    }

    #[test]
    fn test_error_document_shape() {
        let error = Error::conflict(String::from("userName dschrute"));
        assert_eq!(error.status().unwrap(), 409);
        assert_eq!(error.error_type, Some(ErrorType::Uniqueness));

        let serialized = serde_json::to_value(&error).unwrap();
        assert_eq!(serialized["schemas"][0], ERROR_URN);
        assert_eq!(serialized["scimType"], "uniqueness");
    }
}
