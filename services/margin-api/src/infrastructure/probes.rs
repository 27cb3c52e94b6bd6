//! 就绪探针

use std::sync::Arc;

use async_trait::async_trait;
use marginiq_bootstrap::ReadinessProbe;
use marginiq_ports::Repository;

/// 仓储可读即视为就绪
pub struct RepositoryProbe<T, ID>
where
    T: Send + 'static,
    ID: Sync,
{
    name: &'static str,
    repository: Arc<dyn Repository<T, ID>>,
}

impl<T, ID> RepositoryProbe<T, ID>
where
    T: Send + 'static,
    ID: Sync,
{
    pub fn new(name: &'static str, repository: Arc<dyn Repository<T, ID>>) -> Self {
        Self { name, repository }
    }
}

#[async_trait]
impl<T, ID> ReadinessProbe for RepositoryProbe<T, ID>
where
    T: Send + 'static,
    ID: Send + Sync + 'static,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn check(&self) -> Result<(), String> {
        self.repository
            .count()
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
