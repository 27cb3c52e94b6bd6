//! Repository trait 定义

use async_trait::async_trait;
use marginiq_errors::AppResult;

/// 原地修改闭包；返回错误时放弃修改
pub type Mutation<T> = Box<dyn FnOnce(&mut T) -> AppResult<()> + Send>;

/// 基础 Repository trait
#[async_trait]
pub trait Repository<T, ID>: Send + Sync
where
    T: Send + 'static,
    ID: Sync,
{
    /// 根据 ID 查找
    async fn find_by_id(&self, id: &ID) -> AppResult<Option<T>>;

    /// 保存实体（存在则覆盖）
    async fn save(&self, entity: T) -> AppResult<()>;

    /// 原子地修改实体，返回修改后的副本；实体不存在时返回 `None`
    async fn modify(&self, id: &ID, mutation: Mutation<T>) -> AppResult<Option<T>>;

    /// 当前全部实体的快照
    async fn find_all(&self) -> AppResult<Vec<T>>;

    /// 统计总数
    async fn count(&self) -> AppResult<usize>;
}
