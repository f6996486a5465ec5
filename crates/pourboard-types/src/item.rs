//! The tally item and its counters.
//!
//! An [`Item`] is one row on the board (a wine) with two non-negative
//! pour counters. Items are never physically removed; `active = false`
//! hides them from the tally view while keeping them for administration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ItemId;

/// Selects one of the two counters on an [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Counter {
    /// Pours served by the glass.
    Glass,
    /// Whole bottles served.
    Bottle,
}

impl Counter {
    /// The wire and column name of this counter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Glass => "glass",
            Self::Bottle => "bottle",
        }
    }
}

impl core::fmt::Display for Counter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tally entry.
///
/// Serialized in camelCase: `{id, name, glass, bottle, active, lastUpdated}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Item {
    /// Stable identifier, assigned at creation.
    pub id: ItemId,
    /// Display name, unique across active and inactive items.
    pub name: String,
    /// Glass pour count. Never negative.
    #[ts(type = "number")]
    pub glass: i64,
    /// Bottle count. Never negative.
    #[ts(type = "number")]
    pub bottle: i64,
    /// `false` once the item has been soft-deleted.
    pub active: bool,
    /// Timestamp of the most recent mutation.
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

impl Item {
    /// Create a fresh, active item with both counters at zero.
    pub fn new(name: ItemName, now: DateTime<Utc>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into_inner(),
            glass: 0,
            bottle: 0,
            active: true,
            last_updated: now,
        }
    }

    /// Current value of the selected counter.
    pub const fn count(&self, counter: Counter) -> i64 {
        match counter {
            Counter::Glass => self.glass,
            Counter::Bottle => self.bottle,
        }
    }

    /// Mutable access to the selected counter.
    pub fn count_mut(&mut self, counter: Counter) -> &mut i64 {
        match counter {
            Counter::Glass => &mut self.glass,
            Counter::Bottle => &mut self.bottle,
        }
    }
}

/// A validated item name: trimmed and non-empty.
///
/// Uniqueness is a store concern; this type only guarantees shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemName(String);

impl ItemName {
    /// Trim `raw` and accept it if anything is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ItemName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        let name = ItemName::parse("  Malbec \n");
        assert_eq!(name.as_ref().map(ItemName::as_str), Some("Malbec"));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(ItemName::parse("").is_none());
        assert!(ItemName::parse("   \t").is_none());
    }

    #[test]
    fn new_item_starts_at_zero_and_active() {
        let Some(name) = ItemName::parse("Rosé") else {
            panic!("valid name rejected");
        };
        let item = Item::new(name, Utc::now());
        assert_eq!(item.glass, 0);
        assert_eq!(item.bottle, 0);
        assert!(item.active);
        assert_eq!(item.name, "Rosé");
    }

    #[test]
    fn item_uses_camel_case_on_the_wire() {
        let Some(name) = ItemName::parse("Merlot") else {
            panic!("valid name rejected");
        };
        let mut item = Item::new(name, Utc::now());
        *item.count_mut(Counter::Bottle) = 3;

        let json = serde_json::to_value(&item).unwrap_or_default();
        assert_eq!(json["bottle"], 3);
        assert_eq!(json["glass"], 0);
        assert_eq!(json["active"], true);
        assert!(json.get("lastUpdated").is_some());
        assert!(json.get("last_updated").is_none());
    }

    #[test]
    fn counter_selector_is_lowercase() {
        let parsed: Result<Counter, _> = serde_json::from_str("\"glass\"");
        assert_eq!(parsed.ok(), Some(Counter::Glass));
        assert!(serde_json::from_str::<Counter>("\"magnum\"").is_err());
        assert_eq!(Counter::Bottle.to_string(), "bottle");
    }
}
