use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::model::book::{Book, BookDraft, Catalog};
use crate::domain::model::id::BookId;
use crate::domain::store::BookStore;

#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("store lock poisoned")]
    Poisoned,
}

/// 操作ごとの擬似遅延。既定値はlist 500ms、get・add 400ms。
/// テストではzero()を使う。
#[derive(Debug, Clone, Copy)]
pub struct Latency {
    pub list: Duration,
    pub get: Duration,
    pub add: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            list: Duration::from_millis(500),
            get: Duration::from_millis(400),
            add: Duration::from_millis(400),
        }
    }
}

impl Latency {
    pub fn zero() -> Self {
        Self {
            list: Duration::ZERO,
            get: Duration::ZERO,
            add: Duration::ZERO,
        }
    }
}

/// インメモリのBookStore実装。RESTバックエンドへの往復をsleepで擬似する。
/// ロックは遅延経過後の1ステップ内でのみ保持し、awaitをまたがない。
pub struct MemoryBookStore {
    catalog: Mutex<Catalog>,
    latency: Latency,
}

impl MemoryBookStore {
    /// 固定シード3冊で初期化する。
    pub fn new(latency: Latency) -> Self {
        Self::with_catalog(Catalog::seeded(), latency)
    }

    pub fn with_catalog(catalog: Catalog, latency: Latency) -> Self {
        Self {
            catalog: Mutex::new(catalog),
            latency,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Catalog>, MemoryStoreError> {
        self.catalog.lock().map_err(|_| MemoryStoreError::Poisoned)
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    type Error = MemoryStoreError;

    async fn list_books(&self) -> Result<Vec<Book>, Self::Error> {
        tokio::time::sleep(self.latency.list).await;
        let catalog = self.lock()?;
        tracing::debug!(count = catalog.len(), "list_books");
        Ok(catalog.books().to_vec())
    }

    async fn get_book(&self, id: BookId) -> Result<Book, Self::Error> {
        tokio::time::sleep(self.latency.get).await;
        let catalog = self.lock()?;
        tracing::debug!(%id, "get_book");
        Ok(catalog.get(id)?.clone())
    }

    async fn add_book(&self, draft: BookDraft) -> Result<Book, Self::Error> {
        tokio::time::sleep(self.latency.add).await;
        let mut catalog = self.lock()?;
        let book = catalog.insert(draft)?;
        tracing::debug!(id = %book.book_id, title = %book.title, "add_book");
        Ok(book)
    }
}
