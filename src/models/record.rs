// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection records and resource types.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// One workout/sleep/recovery entry, kept as opaque JSON.
///
/// The fetcher never looks inside a record; shaping is downstream's problem.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// One page of a paginated collection response.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionPage {
    /// Records in server order
    #[serde(default)]
    pub records: Vec<Record>,
    /// Cursor for the next page; absent (or null) on the last page
    #[serde(default)]
    pub next_token: Option<String>,
}

/// The three paginated collection types in the v2 developer API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Workouts,
    Sleep,
    Recovery,
}

impl Resource {
    /// Endpoint path under the developer API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Workouts => "activity/workout",
            Resource::Sleep => "activity/sleep",
            Resource::Recovery => "recovery",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Workouts => "workouts",
            Resource::Sleep => "sleep",
            Resource::Recovery => "recovery",
        };
        f.write_str(name)
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "workouts" => Ok(Resource::Workouts),
            "sleep" => Ok(Resource::Sleep),
            "recovery" => Ok(Resource::Recovery),
            other => Err(format!(
                "unknown resource '{}' (expected workouts, sleep or recovery)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::Workouts.path(), "activity/workout");
        assert_eq!(Resource::Sleep.path(), "activity/sleep");
        assert_eq!(Resource::Recovery.path(), "recovery");
    }

    #[test]
    fn test_resource_from_str_round_trip() {
        for resource in [Resource::Workouts, Resource::Sleep, Resource::Recovery] {
            assert_eq!(resource.to_string().parse::<Resource>(), Ok(resource));
        }
        assert!("cycles".parse::<Resource>().is_err());
    }

    #[test]
    fn test_collection_page_null_next_token() {
        let page: CollectionPage =
            serde_json::from_str(r#"{"records": [{"id": 2}], "next_token": null}"#).unwrap();
        assert_eq!(page.records.len(), 1);
        assert!(page.next_token.is_none());
    }

    #[test]
    fn test_collection_page_missing_fields() {
        // A page without records or cursor still parses (empty, final page)
        let page: CollectionPage = serde_json::from_str("{}").unwrap();
        assert!(page.records.is_empty());
        assert!(page.next_token.is_none());
    }
}
