//! In-memory `UserStore` adapter.
//!
//! The directory's data store proper is an external collaborator reached
//! through the [`UserStore`] port; this adapter keeps the rows in process
//! memory for serving demos and tests. Ordering and predicate semantics
//! match the port contract: `created_at` descending, case-insensitive
//! substring search on `name`, exact role match.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use directory_model::{Role, User, UserId};

use crate::domain::{UserFilter, UserStore, UserStoreError};

/// `UserStore` implementation over an in-process row set.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given rows.
    pub fn with_users(rows: Vec<User>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Create a store pre-populated with demo directory members.
    ///
    /// Row ages are staggered one minute apart so listings have a stable
    /// newest-first order.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let seed: [(&str, &str, Role, bool); 10] = [
            ("John Doe", "john@x.com", Role::Admin, true),
            ("Jane Smith", "jane@x.com", Role::Viewer, false),
            ("Aisha Rahman", "aisha@x.com", Role::Editor, true),
            ("Tanvir Hasan", "tanvir@x.com", Role::Viewer, true),
            ("Michael Chen", "michael@x.com", Role::Admin, true),
            ("Sarah Johnson", "sarah@x.com", Role::Editor, true),
            ("David Kim", "david@x.com", Role::Viewer, false),
            ("Emily Davis", "emily@x.com", Role::Editor, true),
            ("Robert Wilson", "robert@x.com", Role::Viewer, true),
            ("Lisa Anderson", "lisa@x.com", Role::Admin, false),
        ];
        let rows = seed
            .iter()
            .enumerate()
            .filter_map(|(index, (name, email, role, active))| {
                User::new(
                    UserId::random(),
                    *name,
                    *email,
                    *role,
                    *active,
                    now - Duration::minutes(index as i64),
                )
                .ok()
            })
            .collect();
        Self::with_users(rows)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>, UserStoreError> {
        self.rows
            .lock()
            .map_err(|_| UserStoreError::connection("user store lock poisoned"))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_page(
        &self,
        filter: &UserFilter,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<User>, UserStoreError> {
        let rows = self.lock()?;
        let mut matching: Vec<User> = rows
            .iter()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(matching
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, UserStoreError> {
        let rows = self.lock()?;
        Ok(rows.iter().filter(|user| filter.matches(user)).count() as u64)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let rows = self.lock()?;
        Ok(rows.iter().find(|user| user.id() == id).cloned())
    }

    async fn set_active(
        &self,
        id: &UserId,
        active: bool,
    ) -> Result<Option<User>, UserStoreError> {
        let mut rows = self.lock()?;
        let Some(row) = rows.iter_mut().find(|user| user.id() == id) else {
            return Ok(None);
        };
        *row = row.clone().with_active(active);
        Ok(Some(row.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user_at(name: &str, role: Role, minutes_ago: i64) -> User {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid timestamp");
        User::new(
            UserId::random(),
            name,
            format!("{}@x.com", name.to_lowercase().replace(' ', ".")),
            role,
            true,
            base - Duration::minutes(minutes_ago),
        )
        .expect("valid user")
    }

    fn store() -> InMemoryUserStore {
        InMemoryUserStore::with_users(vec![
            user_at("Oldest Entry", Role::Viewer, 30),
            user_at("Middle Entry", Role::Editor, 20),
            user_at("Newest Entry", Role::Viewer, 10),
        ])
    }

    #[tokio::test]
    async fn find_page_orders_newest_first() {
        let names: Vec<String> = store()
            .find_page(&UserFilter::default(), 0, 10)
            .await
            .expect("find_page succeeds")
            .iter()
            .map(|user| user.name().to_owned())
            .collect();
        assert_eq!(names, vec!["Newest Entry", "Middle Entry", "Oldest Entry"]);
    }

    #[tokio::test]
    async fn find_page_applies_skip_and_limit_after_filtering() {
        let filter = UserFilter::new(None, Some(Role::Viewer));
        let window = store()
            .find_page(&filter, 1, 1)
            .await
            .expect("find_page succeeds");
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].name(), "Oldest Entry");
    }

    #[tokio::test]
    async fn count_reflects_the_predicate_not_the_window() {
        let filter = UserFilter::new(None, Some(Role::Viewer));
        let total = store().count(&filter).await.expect("count succeeds");
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn set_active_returns_none_for_unknown_id() {
        let updated = store()
            .set_active(&UserId::random(), false)
            .await
            .expect("set_active succeeds");
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn set_active_overwrites_only_the_flag() {
        let store = store();
        let target = store
            .find_page(&UserFilter::default(), 0, 1)
            .await
            .expect("find_page succeeds")
            .first()
            .cloned()
            .expect("row present");

        let updated = store
            .set_active(target.id(), false)
            .await
            .expect("set_active succeeds")
            .expect("row updated");
        assert!(!updated.active());
        assert_eq!(updated.name(), target.name());
        assert_eq!(updated.created_at(), target.created_at());
    }

    #[test]
    fn seeded_store_contains_the_demo_roster() {
        let store = InMemoryUserStore::seeded();
        let rows = store.rows.lock().expect("store lock");
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().any(|user| user.name() == "Tanvir Hasan"));
    }
}
