// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use slog::Logger;
use slog::debug;
use slog::info;
use slog::warn;

use scimtool_core::LISTRESPONSE_URN;
use scimtool_core::ListResponse;
use scimtool_core::PageParams;
use scimtool_core::ResourceType;

use crate::client::ScimClient;

/// Walks a SCIM collection one page at a time, pausing between fetches to
/// respect the provider's rate limits.
///
/// The walk starts at index 1 and advances by the server-reported page size
/// until the cumulative number of items reaches `totalResults`, or a page
/// comes back short or empty. A failed page fetch ends the walk: a broken
/// page cannot be trusted.
pub struct CollectionWalker<'a> {
    client: &'a ScimClient,
    resource_type: ResourceType,
    page_size: usize,
    delay: Duration,
    log: Logger,

    next_index: usize,
    retrieved: usize,
    done: bool,
}

impl<'a> CollectionWalker<'a> {
    pub fn new(
        client: &'a ScimClient,
        resource_type: ResourceType,
        page_size: usize,
        delay: Duration,
        log: Logger,
    ) -> Self {
        Self {
            client,
            resource_type,
            page_size,
            delay,
            log,
            next_index: 1,
            retrieved: 0,
            done: false,
        }
    }

    /// Drain the walk into a single combined `ListResponse`
    pub fn collect_all(self) -> anyhow::Result<ListResponse> {
        let mut total_results = 0;
        let mut resources = Vec::new();

        for page in self {
            let page = page?;
            total_results = page.total_results;
            resources.extend(page.resources);
        }

        Ok(ListResponse {
            schemas: vec![String::from(LISTRESPONSE_URN)],
            total_results,
            start_index: Some(1),
            items_per_page: Some(resources.len()),
            resources,
        })
    }
}

impl Iterator for CollectionWalker<'_> {
    type Item = anyhow::Result<ListResponse>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.retrieved > 0 && !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let page = match self.client.get_page(
            self.resource_type,
            PageParams::new(self.next_index, self.page_size),
        ) {
            Ok(page) => page,

            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        let got = page.resources.len();
        self.retrieved += got;

        debug!(
            self.log, "fetched page";
            "start_index" => self.next_index,
            "items" => got,
            "total" => page.total_results,
        );

        // Advance by the server-reported page size, falling back to the
        // number of items that actually came back. Never advance by zero, a
        // misbehaving server must not wedge the walk.
        self.next_index +=
            page.items_per_page.filter(|n| *n > 0).unwrap_or(got.max(1));

        if got == 0 || got < self.page_size || self.retrieved >= page.total_results
        {
            self.done = true;
        }

        Some(Ok(page))
    }
}

/// The per-id outcome of a bulk delete
#[derive(Debug, Default)]
pub struct DeleteSummary {
    pub results: BTreeMap<String, bool>,
}

impl DeleteSummary {
    pub fn deleted(&self) -> usize {
        self.results.values().filter(|success| **success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.deleted()
    }
}

/// Delete every listed id, pausing between calls. A failed delete is
/// reported and the loop continues with the next item.
pub fn delete_resources(
    client: &ScimClient,
    resource_type: ResourceType,
    ids: &[String],
    delay: Duration,
    log: &Logger,
) -> DeleteSummary {
    let mut summary = DeleteSummary::default();
    let total = ids.len();

    for (i, id) in ids.iter().enumerate() {
        info!(
            log,
            "deleting {} {}/{}", resource_type, i + 1, total;
            "id" => id.as_str(),
        );

        let success = match client.delete(resource_type, id) {
            Ok(()) => true,

            Err(e) => {
                warn!(log, "failed to delete {id}: {e:#}");
                false
            }
        };

        summary.results.insert(id.clone(), success);

        // Don't sleep after the last request
        if i + 1 < total && !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    summary
}

/// Pull the server-assigned ids out of a page of raw resources. An object
/// without a string `id` cannot be acted on and is skipped with a warning.
pub fn resource_ids(
    resources: &[serde_json::Map<String, serde_json::Value>],
    log: &Logger,
) -> Vec<String> {
    resources
        .iter()
        .filter_map(|obj| match obj.get("id").and_then(|v| v.as_str()) {
            Some(id) => Some(String::from(id)),

            None => {
                warn!(log, "listed resource has no usable id, skipping");
                None
            }
        })
        .collect()
}
