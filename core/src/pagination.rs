// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

/// Pagination query parameters (RFC 7644 § 3.4.2.4)
#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl PageParams {
    pub fn new(start_index: usize, count: usize) -> Self {
        Self { start_index: Some(start_index), count: Some(count) }
    }

    // RFC 7644 § 3.4.2.4:
    // The 1-based index of the first query result. A value less than 1 SHALL
    // be interpreted as 1.
    pub fn start_index(&self) -> usize {
        self.start_index.unwrap_or(1).max(1)
    }

    /// The requested page size, or the provider's default when absent
    pub fn count(&self, provider_default: usize) -> usize {
        self.count.unwrap_or(provider_default)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_start_index_normalization() {
        assert_eq!(PageParams::default().start_index(), 1);
        assert_eq!(PageParams::new(0, 10).start_index(), 1);
        assert_eq!(PageParams::new(11, 10).start_index(), 11);
    }

    #[test]
    fn test_query_string_shape() {
        let page = PageParams::new(11, 10);
        let qs = serde_json::to_value(page).unwrap();
        assert_eq!(
            qs,
            serde_json::json!({ "startIndex": 11, "count": 10 })
        );
    }
}
