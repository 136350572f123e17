use std::collections::HashMap;

use anyhow::Result;
use habit_domain::HabitList;
use parking_lot::RwLock;

use crate::adapter::{Scope, StorageAdapter};

/// In-memory store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct SessionStore {
    lists: RwLock<HashMap<Scope, HabitList>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lists.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.read().is_empty()
    }
}

impl StorageAdapter for SessionStore {
    fn load(&self, scope: &Scope) -> Result<Option<HabitList>> {
        Ok(self.lists.read().get(scope).cloned())
    }

    fn save(&self, scope: &Scope, list: &HabitList) -> Result<()> {
        self.lists.write().insert(scope.clone(), list.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_are_isolated() {
        let store = SessionStore::new();
        let mut list = HabitList::new();
        list.add("Run").unwrap();

        let user = Scope::User("ana@example.com".into());
        let session = Scope::Session("ana@example.com".into());
        store.save(&user, &list).unwrap();

        assert_eq!(store.load(&user).unwrap().map(|l| l.len()), Some(1));
        assert!(store.load(&session).unwrap().is_none());
        assert_eq!(store.len(), 1);
    }
}
