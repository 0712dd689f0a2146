// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Page size used when a list request does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Clone, Default)]
struct TenantState {
    users: BTreeMap<String, StoredParts<User>>,
    groups: BTreeMap<String, StoredParts<Group>>,
}

impl TenantState {
    /// Validate a requested group member against the tenant, filling in the
    /// member's resource type.
    fn validate_member(
        &self,
        member: &GroupMember,
    ) -> Result<GroupMember, Error> {
        if self.groups.contains_key(&member.value) {
            // don't support nested groups for now.
            return Err(Error::invalid_value(
                "nested groups not supported".to_string(),
            ));
        }

        // Find the user this member refers to, or 404
        if !self.users.contains_key(&member.value) {
            return Err(Error::not_found(member.value.clone()));
        }

        Ok(GroupMember {
            member_type: Some(ResourceType::User.to_string()),
            ..member.clone()
        })
    }
}

fn page_of<R: Clone>(
    all: &BTreeMap<String, StoredParts<R>>,
    page: &PageParams,
) -> (Vec<StoredParts<R>>, usize, usize) {
    let total_results = all.len();
    let start_index = page.start_index();
    let count = page.count(DEFAULT_PAGE_SIZE);

    let items =
        all.values().skip(start_index - 1).take(count).cloned().collect();

    (items, total_results, start_index)
}

fn new_stored_meta() -> StoredMeta {
    StoredMeta {
        created: Utc::now(),
        last_modified: Utc::now(),
        version: String::from("W/unimplemented"),
    }
}

/// A non-optimized in-memory tenant, holding the users and groups that the
/// mock provider server serves.
pub struct TenantStore {
    state: Mutex<TenantState>,
}

impl Default for TenantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TenantStore {
    pub fn new() -> Self {
        Self { state: Mutex::new(TenantState::default()) }
    }

    pub fn list_users(&self, page: PageParams) -> Result<ListResponse, Error> {
        let state = self.state.lock().unwrap();
        let (items, total_results, start_index) = page_of(&state.users, &page);
        ListResponse::from_page(items, total_results, start_index)
    }

    pub fn get_user(
        &self,
        user_id: &str,
    ) -> Result<SingleResourceResponse, Error> {
        let state = self.state.lock().unwrap();

        let StoredParts { resource, meta } = state
            .users
            .get(user_id)
            .ok_or(Error::not_found(user_id.to_string()))?
            .clone();

        SingleResourceResponse::from_resource(resource, meta)
    }

    pub fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<SingleResourceResponse, Error> {
        let mut state = self.state.lock().unwrap();

        // userName is meant to be unique within the tenant
        if state.users.values().any(|stored_part| {
            stored_part.resource.user_name == request.user_name
        }) {
            return Err(Error::conflict(format!(
                "userName {}",
                request.user_name
            )));
        }

        let id = Uuid::new_v4().to_string();

        let new_user = StoredParts {
            resource: User {
                id: id.clone(),
                user_name: request.user_name,
                active: request.active.unwrap_or(true),
                name: request.name,
                emails: request.emails,
                external_id: request.external_id,
            },
            meta: new_stored_meta(),
        };

        let existing = state.users.insert(id, new_user.clone());
        assert!(existing.is_none());

        SingleResourceResponse::from_resource(new_user.resource, new_user.meta)
    }

    pub fn delete_user(&self, user_id: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();

        state
            .users
            .remove(user_id)
            .map(|_| ())
            .ok_or(Error::not_found(user_id.to_string()))
    }

    pub fn list_groups(
        &self,
        page: PageParams,
    ) -> Result<ListResponse, Error> {
        let state = self.state.lock().unwrap();
        let (items, total_results, start_index) =
            page_of(&state.groups, &page);
        ListResponse::from_page(items, total_results, start_index)
    }

    pub fn get_group(
        &self,
        group_id: &str,
    ) -> Result<SingleResourceResponse, Error> {
        let state = self.state.lock().unwrap();

        let StoredParts { resource, meta } = state
            .groups
            .get(group_id)
            .ok_or(Error::not_found(group_id.to_string()))?
            .clone();

        SingleResourceResponse::from_resource(resource, meta)
    }

    pub fn create_group(
        &self,
        request: CreateGroupRequest,
    ) -> Result<SingleResourceResponse, Error> {
        let mut state = self.state.lock().unwrap();

        // Make sure that display name is unique
        if state.groups.values().any(|stored_part| {
            stored_part.resource.display_name == request.display_name
        }) {
            return Err(Error::conflict(format!(
                "displayName {}",
                request.display_name
            )));
        }

        let CreateGroupRequest { schemas: _, display_name, external_id, mut members } =
            request;

        // Validate the members arg, and return filled in fields
        if let Some(members) = &mut members {
            for member in members {
                *member = state.validate_member(member)?;
            }
        }

        let id = Uuid::new_v4().to_string();

        let new_group = StoredParts {
            resource: Group { id: id.clone(), display_name, external_id, members },
            meta: new_stored_meta(),
        };

        let existing = state.groups.insert(id, new_group.clone());
        assert!(existing.is_none());

        SingleResourceResponse::from_resource(
            new_group.resource,
            new_group.meta,
        )
    }

    pub fn delete_group(&self, group_id: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();

        state
            .groups
            .remove(group_id)
            .map(|_| ())
            .ok_or(Error::not_found(group_id.to_string()))
    }

    pub fn patch_group(
        &self,
        group_id: &str,
        request: PatchRequest,
    ) -> Result<SingleResourceResponse, Error> {
        let mut state = self.state.lock().unwrap();

        let stored_group = state
            .groups
            .get(group_id)
            .ok_or(Error::not_found(group_id.to_string()))?;

        let mut updated_group = request
            .apply_group_ops(stored_group)
            .map_err(|e| Error::invalid_syntax(e.detail()))?;

        // Any members the patch introduced have to exist in the tenant
        if let Some(members) = &mut updated_group.resource.members {
            for member in members {
                *member = state.validate_member(member)?;
            }
        }

        updated_group.meta.last_modified = Utc::now();

        let response = SingleResourceResponse::from_resource(
            updated_group.resource.clone(),
            updated_group.meta.clone(),
        )?;

        state.groups.insert(group_id.to_string(), updated_group);

        Ok(response)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn user_request(user_name: &str) -> CreateUserRequest {
        CreateUserRequest::new(
            user_name.to_string(),
            format!("{user_name}@dundermifflin.com"),
            String::from("Test"),
            String::from("User"),
            None,
        )
    }

    fn seed_users(store: &TenantStore, n: usize) -> Vec<String> {
        (0..n)
            .map(|i| {
                let response =
                    store.create_user(user_request(&format!("user{i:03}"))).unwrap();
                let user: User = serde_json::from_value(
                    serde_json::Value::Object(response.resource.resource),
                )
                .unwrap();
                user.id
            })
            .collect()
    }

    #[test]
    fn test_pagination_covers_the_whole_collection() {
        let store = TenantStore::new();
        let mut created = seed_users(&store, 25);
        created.sort();

        // 25 items at page size 10 should come back as pages of 10, 10, 5
        let mut seen: Vec<String> = Vec::new();
        let mut start_index = 1;
        loop {
            let page = store
                .list_users(PageParams::new(start_index, 10))
                .unwrap();

            assert_eq!(page.total_results, 25);
            assert_eq!(page.start_index, Some(start_index));

            let users: Vec<User> = page.typed_resources().unwrap();
            match start_index {
                1 | 11 => assert_eq!(users.len(), 10),
                21 => assert_eq!(users.len(), 5),
                _ => panic!("unexpected start index {start_index}"),
            }

            seen.extend(users.iter().map(|u| u.id.clone()));

            if seen.len() >= page.total_results {
                break;
            }

            start_index += users.len();
        }

        // no duplicates and no gaps
        seen.sort();
        assert_eq!(seen, created);
    }

    #[test]
    fn test_empty_page_past_the_end() {
        let store = TenantStore::new();
        seed_users(&store, 3);

        let page = store.list_users(PageParams::new(4, 10)).unwrap();
        assert_eq!(page.total_results, 3);
        assert_eq!(page.items_per_page, Some(0));
        assert!(page.resources.is_empty());
    }

    #[test]
    fn test_duplicate_user_name_conflicts() {
        let store = TenantStore::new();
        store.create_user(user_request("dschrute")).unwrap();

        let error = store.create_user(user_request("dschrute")).unwrap_err();
        assert_eq!(error.status().unwrap(), 409);
        assert_eq!(error.error_type, Some(ErrorType::Uniqueness));
    }

    #[test]
    fn test_delete_removes_from_listing() {
        let store = TenantStore::new();
        let ids = seed_users(&store, 2);

        store.delete_user(&ids[0]).unwrap();

        let page = store.list_users(PageParams::default()).unwrap();
        let users: Vec<User> = page.typed_resources().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, ids[1]);

        // A second delete of the same id is a 404
        let error = store.delete_user(&ids[0]).unwrap_err();
        assert_eq!(error.status().unwrap(), 404);
    }

    #[test]
    fn test_group_members_must_exist() {
        let store = TenantStore::new();
        let ids = seed_users(&store, 1);

        let error = store
            .create_group(CreateGroupRequest::new(
                String::from("Sales Reps"),
                None,
                vec![String::from("nonexistent")],
            ))
            .unwrap_err();
        assert_eq!(error.status().unwrap(), 404);

        let response = store
            .create_group(CreateGroupRequest::new(
                String::from("Sales Reps"),
                None,
                ids.clone(),
            ))
            .unwrap();

        let group: Group = serde_json::from_value(
            serde_json::Value::Object(response.resource.resource),
        )
        .unwrap();

        let members = group.members.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].value, ids[0]);
        assert_eq!(members[0].member_type.as_deref(), Some("User"));
    }

    #[test]
    fn test_patch_group_adds_member() {
        let store = TenantStore::new();
        let ids = seed_users(&store, 2);

        let response = store
            .create_group(CreateGroupRequest::new(
                String::from("Sales Reps"),
                None,
                vec![ids[0].clone()],
            ))
            .unwrap();

        let group: Group = serde_json::from_value(
            serde_json::Value::Object(response.resource.resource),
        )
        .unwrap();

        let patched = store
            .patch_group(
                &group.id,
                PatchRequest::add_group_members(&[ids[1].clone()]),
            )
            .unwrap();

        let patched: Group = serde_json::from_value(
            serde_json::Value::Object(patched.resource.resource),
        )
        .unwrap();

        let members = patched.members.unwrap();
        assert_eq!(members.len(), 2);

        // An unknown member id in the patch is a 404
        let error = store
            .patch_group(
                &group.id,
                PatchRequest::add_group_members(&[String::from("zzz")]),
            )
            .unwrap_err();
        assert_eq!(error.status().unwrap(), 404);
    }
}
