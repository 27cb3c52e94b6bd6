//! 内存仓储
//!
//! 写操作串行化；读取返回拥有所有权的快照

use async_trait::async_trait;
use marginiq_domain_core::Entity;
use marginiq_errors::AppResult;
use marginiq_ports::{Mutation, Repository};
use tokio::sync::RwLock;

pub struct InMemoryRepository<T> {
    items: RwLock<Vec<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl<T> Repository<T, T::Id> for InMemoryRepository<T>
where
    T: Entity + Clone + Send + Sync + 'static,
    T::Id: Send + Sync,
{
    async fn find_by_id(&self, id: &T::Id) -> AppResult<Option<T>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id() == id).cloned())
    }

    async fn save(&self, entity: T) -> AppResult<()> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|item| item.id() == entity.id()) {
            Some(slot) => *slot = entity,
            None => items.push(entity),
        }
        Ok(())
    }

    async fn modify(&self, id: &T::Id, mutation: Mutation<T>) -> AppResult<Option<T>> {
        let mut items = self.items.write().await;
        let Some(slot) = items.iter_mut().find(|item| item.id() == id) else {
            return Ok(None);
        };

        // 在副本上修改，失败时原值不变
        let mut draft = slot.clone();
        mutation(&mut draft)?;
        *slot = draft.clone();
        Ok(Some(draft))
    }

    async fn find_all(&self) -> AppResult<Vec<T>> {
        Ok(self.items.read().await.clone())
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.items.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marginiq_errors::AppError;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        label: &'static str,
    }

    impl Entity for Item {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    fn repo() -> InMemoryRepository<Item> {
        InMemoryRepository::new(vec![
            Item { id: 1, label: "a" },
            Item { id: 2, label: "b" },
        ])
    }

    #[tokio::test]
    async fn test_find_and_count() {
        let repo = repo();
        assert_eq!(repo.find_by_id(&2).await.unwrap().unwrap().label, "b");
        assert!(repo.find_by_id(&9).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_save_upserts_in_place() {
        let repo = repo();
        repo.save(Item { id: 1, label: "z" }).await.unwrap();
        repo.save(Item { id: 3, label: "c" }).await.unwrap();

        let labels: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, vec!["z", "b", "c"]);
    }

    #[tokio::test]
    async fn test_modify_returns_updated_copy() {
        let repo = repo();
        let updated = repo
            .modify(&2, Box::new(|item: &mut Item| {
                item.label = "bb";
                Ok(())
            }))
            .await
            .unwrap();
        assert_eq!(updated.unwrap().label, "bb");
        assert_eq!(repo.find_by_id(&2).await.unwrap().unwrap().label, "bb");
    }

    #[tokio::test]
    async fn test_failed_modify_leaves_value_untouched() {
        let repo = repo();
        let result = repo
            .modify(&1, Box::new(|item: &mut Item| {
                item.label = "half-written";
                Err(AppError::validation("nope"))
            }))
            .await;
        assert!(result.is_err());
        assert_eq!(repo.find_by_id(&1).await.unwrap().unwrap().label, "a");
    }

    #[tokio::test]
    async fn test_modify_missing_is_none() {
        let repo = repo();
        let result = repo.modify(&42, Box::new(|_: &mut Item| Ok(()))).await;
        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let repo = repo();
        let mut snapshot = repo.find_all().await.unwrap();
        snapshot.clear();
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
