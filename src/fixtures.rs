//! Request data for boards and organizations.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::HarnessResult;
use crate::json::JsonPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFixture {
    pub name: String,
    pub default_lists: bool,
}

impl BoardFixture {
    /// A board the service fills with its default lists.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_lists: true,
        }
    }

    pub fn default_lists(mut self, default_lists: bool) -> Self {
        self.default_lists = default_lists;
        self
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("defaultLists", self.default_lists.to_string()),
        ]
    }
}

/// Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationFixture {
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub website: Option<String>,
}

impl OrganizationFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        self.fields()
            .into_iter()
            .filter_map(|(param, value)| value.map(|v| (param, v.to_string())))
            .collect()
    }

    /// Asserts every field set on the fixture is echoed back in `json`.
    pub fn expect_matches(&self, json: &JsonPath) -> HarnessResult<()> {
        for (param, value) in self.fields() {
            if let Some(expected) = value {
                json.expect_str(param, expected)?;
            }
        }
        Ok(())
    }

    fn fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("displayName", self.display_name.as_deref()),
            ("name", self.name.as_deref()),
            ("desc", self.desc.as_deref()),
            ("website", self.website.as_deref()),
        ]
    }
}

/// Lowercase `prefix_xxxxx` name for namespaces shared with other runs.
pub fn unique_name(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(1);

    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let seed = time::OffsetDateTime::now_utc().unix_timestamp_nanos() as u64;
    let generator = block_id::BlockId::new(block_id::Alphabet::alphanumeric(), 1234, 6);
    let suffix = generator
        .encode_string(seed.wrapping_add(seq))
        .unwrap_or_else(|| format!("{:x}{}", seed, seq));

    format!("{}_{}", prefix, suffix.to_lowercase())
}
