//! In-process item store.
//!
//! Backs the test suites and `STORE=memory` demo runs. All operations
//! take the lock once, so each one is atomic with respect to the others,
//! matching what the `PostgreSQL` backend gets from single statements.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use pourboard_types::{Counter, DEFAULT_ITEM_NAMES, Item, ItemId, ItemName};
use tokio::sync::RwLock;

use crate::error::DbError;
use crate::store::{DeltaOutcome, SeedOutcome};

/// Shared in-memory item collection.
///
/// Cloning is cheap; all clones see the same items.
#[derive(Clone, Default)]
pub struct MemoryItemStore {
    items: Arc<RwLock<BTreeMap<ItemId, Item>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while set, every operation fails with
    /// [`DbError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(DbError::Unavailable)
        } else {
            Ok(())
        }
    }

    pub(crate) async fn ensure_seeded(&self) -> Result<SeedOutcome, DbError> {
        self.check_available()?;
        let mut items = self.items.write().await;
        if items.is_empty() {
            let now = Utc::now();
            for name in DEFAULT_ITEM_NAMES.iter().filter_map(|n| ItemName::parse(n)) {
                let item = Item::new(name, now);
                items.insert(item.id, item);
            }
            return Ok(SeedOutcome::Seeded(items.len()));
        }
        let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
        Ok(SeedOutcome::Existing {
            total,
            backfilled: 0,
        })
    }

    pub(crate) async fn list_active(&self) -> Result<Vec<Item>, DbError> {
        self.check_available()?;
        let items = self.items.read().await;
        Ok(sorted_by_name(items.values().filter(|item| item.active)))
    }

    pub(crate) async fn list_all(&self) -> Result<Vec<Item>, DbError> {
        self.check_available()?;
        let items = self.items.read().await;
        Ok(sorted_by_name(items.values()))
    }

    pub(crate) async fn get(&self, id: ItemId) -> Result<Option<Item>, DbError> {
        self.check_available()?;
        Ok(self.items.read().await.get(&id).cloned())
    }

    pub(crate) async fn find_by_name(
        &self,
        name: &ItemName,
        excluding: Option<ItemId>,
    ) -> Result<Option<Item>, DbError> {
        self.check_available()?;
        let items = self.items.read().await;
        Ok(find_named(&items, name, excluding).cloned())
    }

    pub(crate) async fn insert(&self, name: ItemName) -> Result<Item, DbError> {
        self.check_available()?;
        let mut items = self.items.write().await;
        if find_named(&items, &name, None).is_some() {
            return Err(DbError::DuplicateName(name.into_inner()));
        }
        let item = Item::new(name, Utc::now());
        items.insert(item.id, item.clone());
        Ok(item)
    }

    pub(crate) async fn reset_active(&self) -> Result<u64, DbError> {
        self.check_available()?;
        let now = Utc::now();
        let mut touched: u64 = 0;
        for item in self.items.write().await.values_mut().filter(|item| item.active) {
            item.glass = 0;
            item.bottle = 0;
            item.last_updated = now;
            touched = touched.saturating_add(1);
        }
        Ok(touched)
    }

    pub(crate) async fn rename(&self, id: ItemId, name: ItemName) -> Result<Option<Item>, DbError> {
        self.check_available()?;
        let mut items = self.items.write().await;
        if find_named(&items, &name, Some(id)).is_some() {
            return Err(DbError::DuplicateName(name.into_inner()));
        }
        Ok(items.get_mut(&id).map(|item| {
            item.name = name.into_inner();
            item.last_updated = Utc::now();
            item.clone()
        }))
    }

    pub(crate) async fn set_active(&self, id: ItemId, active: bool) -> Result<Option<Item>, DbError> {
        self.check_available()?;
        Ok(self.items.write().await.get_mut(&id).map(|item| {
            item.active = active;
            item.last_updated = Utc::now();
            item.clone()
        }))
    }

    pub(crate) async fn apply_delta(
        &self,
        id: ItemId,
        counter: Counter,
        delta: i64,
    ) -> Result<DeltaOutcome, DbError> {
        self.check_available()?;
        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(&id) else {
            return Ok(DeltaOutcome::NotFound);
        };

        match item.count(counter).checked_add(delta) {
            Some(next) if next >= 0 => {
                *item.count_mut(counter) = next;
                item.last_updated = Utc::now();
                Ok(DeltaOutcome::Applied(item.clone()))
            }
            _ => Ok(DeltaOutcome::Rejected(item.clone())),
        }
    }
}

fn find_named<'a>(
    items: &'a BTreeMap<ItemId, Item>,
    name: &ItemName,
    excluding: Option<ItemId>,
) -> Option<&'a Item> {
    items
        .values()
        .find(|item| item.name == name.as_str() && Some(item.id) != excluding)
}

/// Byte-wise name order, the same order `COLLATE "C"` gives in `PostgreSQL`.
fn sorted_by_name<'a>(items: impl Iterator<Item = &'a Item>) -> Vec<Item> {
    let mut sorted: Vec<Item> = items.cloned().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::store::ItemStore;

    fn name(raw: &str) -> ItemName {
        ItemName::parse(raw).unwrap()
    }

    async fn seeded() -> ItemStore {
        let store = ItemStore::from(MemoryItemStore::new());
        let outcome = store.ensure_seeded().await.ok();
        assert_eq!(outcome, Some(SeedOutcome::Seeded(DEFAULT_ITEM_NAMES.len())));
        store
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = seeded().await;
        let again = store.ensure_seeded().await.ok();
        assert_eq!(
            again,
            Some(SeedOutcome::Existing {
                total: 10,
                backfilled: 0
            })
        );
        let all = store.list_all().await.unwrap_or_default();
        assert_eq!(all.len(), 10);
        assert!(all.iter().all(|i| i.active && i.glass == 0 && i.bottle == 0));
    }

    #[tokio::test]
    async fn lists_are_sorted_by_name() {
        let store = seeded().await;
        let names: Vec<String> = store
            .list_active()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|i| i.name)
            .collect();
        let mut expected = names.clone();
        expected.sort();
        assert_eq!(names, expected);
        assert_eq!(names.first().map(String::as_str), Some("Bonarda"));
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected_even_when_inactive() {
        let store = seeded().await;
        let merlot = store.find_by_name(&name("Merlot"), None).await.ok().flatten();
        let Some(merlot) = merlot else {
            panic!("seed item missing");
        };
        let _ = store.set_active(merlot.id, false).await;

        let result = store.insert(name("Merlot")).await;
        assert!(matches!(result, Err(DbError::DuplicateName(n)) if n == "Merlot"));
        assert_eq!(store.list_all().await.unwrap_or_default().len(), 10);
    }

    #[tokio::test]
    async fn names_are_case_sensitive() {
        let store = seeded().await;
        assert!(store.insert(name("merlot")).await.is_ok());
    }

    #[tokio::test]
    async fn delta_never_goes_below_zero() {
        let store = seeded().await;
        let Some(first) = store.list_active().await.unwrap_or_default().into_iter().next() else {
            panic!("empty seed");
        };

        let outcome = store.apply_delta(first.id, Counter::Glass, -1).await.ok();
        assert!(matches!(outcome, Some(DeltaOutcome::Rejected(ref i)) if i.glass == 0));

        let outcome = store.apply_delta(first.id, Counter::Glass, 1).await.ok();
        assert!(matches!(outcome, Some(DeltaOutcome::Applied(ref i)) if i.glass == 1));

        let outcome = store.apply_delta(first.id, Counter::Glass, -2).await.ok();
        assert!(matches!(outcome, Some(DeltaOutcome::Rejected(ref i)) if i.glass == 1));

        let outcome = store.apply_delta(first.id, Counter::Bottle, i64::MAX).await.ok();
        assert!(matches!(outcome, Some(DeltaOutcome::Applied(_))));
        let outcome = store.apply_delta(first.id, Counter::Bottle, 1).await.ok();
        assert!(matches!(outcome, Some(DeltaOutcome::Rejected(_))));
    }

    #[tokio::test]
    async fn delta_on_unknown_item_is_not_found() {
        let store = seeded().await;
        let outcome = store.apply_delta(ItemId::new(), Counter::Bottle, 1).await.ok();
        assert_eq!(outcome, Some(DeltaOutcome::NotFound));
    }

    #[tokio::test]
    async fn reset_skips_inactive_items() {
        let store = seeded().await;
        let items = store.list_active().await.unwrap_or_default();
        let (Some(kept), Some(retired)) = (items.first(), items.get(1)) else {
            panic!("seed too small");
        };
        let _ = store.apply_delta(kept.id, Counter::Glass, 1).await;
        let _ = store.apply_delta(retired.id, Counter::Bottle, 1).await;
        let _ = store.set_active(retired.id, false).await;

        let touched = store.reset_active().await.ok();
        assert_eq!(touched, Some(9));

        let kept = store.get(kept.id).await.ok().flatten();
        assert_eq!(kept.map(|i| i.glass), Some(0));
        let retired = store.get(retired.id).await.ok().flatten();
        assert_eq!(retired.map(|i| i.bottle), Some(1));
    }

    #[tokio::test]
    async fn rename_rejects_names_held_by_others() {
        let store = seeded().await;
        let items = store.list_all().await.unwrap_or_default();
        let (Some(x), Some(y)) = (items.first(), items.get(1)) else {
            panic!("seed too small");
        };

        let result = store.rename(x.id, name(&y.name)).await;
        assert!(matches!(result, Err(DbError::DuplicateName(_))));

        // Renaming to its own current name is allowed.
        let same = store.rename(x.id, name(&x.name)).await.ok().flatten();
        assert_eq!(same.map(|i| i.name), Some(x.name.clone()));

        let missing = store.rename(ItemId::new(), name("Nuevo")).await.ok();
        assert_eq!(missing, Some(None));
    }

    #[tokio::test]
    async fn outage_surfaces_as_unavailable() {
        let memory = MemoryItemStore::new();
        let store = ItemStore::from(memory.clone());
        memory.set_unavailable(true);
        assert!(matches!(store.list_active().await, Err(DbError::Unavailable)));
        memory.set_unavailable(false);
        assert!(store.list_active().await.is_ok());
    }
}
