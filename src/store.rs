use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

/// In-memory table with service-assigned numeric primary keys.
///
/// Each service owns exactly one of these; nothing is shared across
/// processes, so the only synchronization needed is within a single
/// service's concurrent request handlers.
pub struct Table<T> {
    rows: DashMap<i64, T>,
    next_id: AtomicI64,
}

impl<T: Clone> Table<T> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Allocate the next id and insert the row built from it.
    pub fn insert_with(&self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    pub fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).map(|r| r.value().clone())
    }

    /// All rows, ordered by id.
    pub fn list(&self) -> Vec<T> {
        let mut rows: Vec<(i64, T)> = self
            .rows
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows.into_iter().map(|(_, row)| row).collect()
    }

    /// Apply `mutate` to the row in place; returns the updated row,
    /// or None when the id has no record.
    pub fn update(&self, id: i64, mutate: impl FnOnce(&mut T)) -> Option<T> {
        let mut entry = self.rows.get_mut(&id)?;
        mutate(entry.value_mut());
        Some(entry.value().clone())
    }

    pub fn remove(&self, id: i64) -> Option<T> {
        self.rows.remove(&id).map(|(_, row)| row)
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows
            .iter()
            .find(|e| pred(e.value()))
            .map(|e| e.value().clone())
    }

    /// Matching rows, ordered by id.
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<(i64, T)> = self
            .rows
            .iter()
            .filter(|e| pred(e.value()))
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows.into_iter().map(|(_, row)| row).collect()
    }
}

impl<T: Clone> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    struct Row {
        id: i64,
        name: String,
    }

    #[test]
    fn ids_are_assigned_sequentially_from_one() {
        let table = Table::new();
        let a = table.insert_with(|id| Row { id, name: "a".into() });
        let b = table.insert_with(|id| Row { id, name: "b".into() });
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn list_is_ordered_by_id() {
        let table = Table::new();
        for name in ["x", "y", "z"] {
            table.insert_with(|id| Row { id, name: name.into() });
        }
        let ids: Vec<i64> = table.list().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn update_missing_row_returns_none() {
        let table: Table<Row> = Table::new();
        assert!(table.update(42, |r| r.name = "n".into()).is_none());
    }

    #[test]
    fn remove_then_get_returns_none() {
        let table = Table::new();
        let row = table.insert_with(|id| Row { id, name: "a".into() });
        assert!(table.remove(row.id).is_some());
        assert!(table.get(row.id).is_none());
    }
}
