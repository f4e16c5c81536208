use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::model::book::{Book, BookDraft};
use crate::domain::model::id::BookId;
use crate::domain::store::BookStore;

use super::error::FormError;

/// Loadが失敗したときの汎用メッセージ。
pub const LOAD_FAILED: &str = "Failed to load books";
/// Addの失敗がメッセージを持たないときのフォールバック。
pub const ADD_FALLBACK: &str = "Failed to add book";
/// Searchの失敗がメッセージを持たないときのフォールバック。
pub const SEARCH_FALLBACK: &str = "Book not found";

/// UI側のタイミング設定。成功メッセージはこの時間の後に自動で消える。
#[derive(Debug, Clone, Copy)]
pub struct UiTiming {
    pub success_clear: Duration,
}

impl Default for UiTiming {
    fn default() -> Self {
        Self {
            success_clear: Duration::from_secs(5),
        }
    }
}

impl UiTiming {
    pub fn instant() -> Self {
        Self {
            success_clear: Duration::ZERO,
        }
    }
}

/// 登録フォームの入力値。priceはテキストのまま保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub price: String,
}

impl BookForm {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// 画面状態。Submit・Search・Loadのメッセージ枠は互いに独立で、干渉しない。
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub books: Vec<Book>,
    pub loading: bool,
    pub form: BookForm,
    pub search_id: String,
    pub searched_book: Option<Book>,
    pub submitting: bool,
    pub searching: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    pub search_error: Option<String>,
}

/// View Controller。ストア操作を起動し、結果とエラーを画面状態へ反映する。
///
/// ハンドラは&selfで動き、状態は共有ロックの内側に置く。実行中の操作は
/// 自分の操作のフラグだけを立てるため、SubmitとSearchは同時に進行できる。
/// ロックガードはawaitをまたいで保持しない。
pub struct RegistryController<S: BookStore> {
    store: S,
    state: Arc<RwLock<UiState>>,
    timing: UiTiming,
}

impl<S: BookStore> RegistryController<S> {
    pub fn new(store: S, timing: UiTiming) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(UiState::default())),
            timing,
        }
    }

    /// 現在の画面状態のスナップショット。
    pub fn state(&self) -> UiState {
        self.read(|s| s.clone())
    }

    pub fn set_form(&self, title: &str, author: &str, price: &str) {
        self.write(|s| {
            s.form = BookForm {
                title: title.into(),
                author: author.into(),
                price: price.into(),
            };
        });
    }

    pub fn set_search_id(&self, id: &str) {
        self.write(|s| s.search_id = id.trim().to_string());
    }

    /// 初期表示のLoad。一覧を取得して表示に反映する。失敗時は汎用メッセージ。
    /// リトライはしない。
    pub async fn load(&self) {
        self.write(|s| s.loading = true);
        let result = self.store.list_books().await;
        self.write(|s| {
            match result {
                Ok(books) => s.books = books,
                Err(e) => {
                    tracing::warn!(error = %e, "load failed");
                    s.error = Some(LOAD_FAILED.to_string());
                }
            }
            s.loading = false;
        });
    }

    /// Submit。クライアント側検証に通った場合だけストアを呼ぶ。
    /// 成功時は確認メッセージを出してフォームを消し、一覧を再取得する。
    pub async fn submit(&self) {
        self.write(|s| {
            s.error = None;
            s.success = None;
        });

        let form = self.read(|s| s.form.clone());
        if let Err(e) = validate_form(&form) {
            self.write(|s| s.error = Some(e.to_string()));
            return;
        }

        self.write(|s| s.submitting = true);
        let draft = BookDraft {
            title: form.title,
            author: form.author,
            price: form.price,
        };
        match self.store.add_book(draft).await {
            Ok(book) => {
                tracing::info!(id = %book.book_id, title = %book.title, "book added");
                self.write(|s| {
                    s.success = Some(format!(
                        "Book \"{}\" added successfully with ID: {}",
                        book.title, book.book_id
                    ));
                    s.form.clear();
                });
                self.load().await;
                self.schedule_success_clear();
            }
            Err(e) => {
                self.write(|s| s.error = Some(display_or(e, ADD_FALLBACK)));
            }
        }
        self.write(|s| s.submitting = false);
    }

    /// Search。IDが空なら呼ばずに拒否する。ストアは整数IDしか受けないため、
    /// 数値でないIDも呼び出し前に同じ文言で拒否する。
    pub async fn search(&self) {
        self.write(|s| {
            s.search_error = None;
            s.searched_book = None;
        });

        let raw = self.read(|s| s.search_id.clone());
        if raw.is_empty() {
            self.write(|s| s.search_error = Some(FormError::MissingSearchId.to_string()));
            return;
        }
        let id = match raw.parse::<u32>() {
            Ok(n) => BookId::new(n),
            Err(_) => {
                self.write(|s| s.search_error = Some(format!("Book with ID {raw} not found")));
                return;
            }
        };

        self.write(|s| s.searching = true);
        let result = self.store.get_book(id).await;
        self.write(|s| {
            match result {
                Ok(book) => s.searched_book = Some(book),
                Err(e) => s.search_error = Some(display_or(e, SEARCH_FALLBACK)),
            }
            s.searching = false;
        });
    }

    // --- private ---

    /// 成功メッセージの自動消去タイマー。キャンセルはせず、必ず走りきる。
    fn schedule_success_clear(&self) {
        let state = Arc::clone(&self.state);
        let delay = self.timing.success_clear;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut guard = match state.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.success = None;
        });
    }

    fn read<T>(&self, f: impl FnOnce(&UiState) -> T) -> T {
        match self.state.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    fn write<T>(&self, f: impl FnOnce(&mut UiState) -> T) -> T {
        match self.state.write() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

/// 検証順は固定。全フィールドの存在、次に価格が正の数値。最初の失敗で打ち切る。
fn validate_form(form: &BookForm) -> Result<(), FormError> {
    if form.title.is_empty() || form.author.is_empty() || form.price.is_empty() {
        return Err(FormError::MissingFields);
    }
    match form.price.trim().parse::<f64>() {
        Ok(p) if p.is_finite() && p > 0.0 => Ok(()),
        _ => Err(FormError::NonPositivePrice),
    }
}

/// Displayの文字列を返す。空ならフォールバックを使う。
fn display_or(e: impl std::fmt::Display, fallback: &str) -> String {
    let msg = e.to_string();
    if msg.is_empty() {
        fallback.to_string()
    } else {
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory_store::{Latency, MemoryBookStore};

    fn controller() -> RegistryController<MemoryBookStore> {
        RegistryController::new(MemoryBookStore::new(Latency::zero()), UiTiming::default())
    }

    #[tokio::test]
    async fn load_populates_books_and_clears_loading() {
        let c = controller();
        c.load().await;

        let state = c.state();
        assert_eq!(state.books.len(), 3);
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn submit_rejects_missing_fields_before_store_call() {
        let c = controller();
        c.load().await;
        c.set_form("", "Author", "10");
        c.submit().await;

        let state = c.state();
        assert_eq!(state.error.as_deref(), Some("All fields are required"));
        assert!(state.success.is_none());
        // ストアは呼ばれていない
        c.load().await;
        assert_eq!(c.state().books.len(), 3);
    }

    #[tokio::test]
    async fn submit_rejects_non_positive_price_before_store_call() {
        let c = controller();
        c.load().await;

        for price in ["-5", "0", "abc"] {
            c.set_form("X", "Y", price);
            c.submit().await;
            assert_eq!(
                c.state().error.as_deref(),
                Some("Price must be a positive number")
            );
        }

        c.load().await;
        assert_eq!(c.state().books.len(), 3);
    }

    #[tokio::test]
    async fn missing_fields_check_wins_over_price_check() {
        let c = controller();
        c.set_form("", "Author", "-5");
        c.submit().await;
        assert_eq!(c.state().error.as_deref(), Some("All fields are required"));
    }

    #[tokio::test]
    async fn submit_success_confirms_clears_form_and_refreshes() {
        let c = controller();
        c.load().await;
        c.set_form("X", "Y", "10.50");
        c.submit().await;

        let state = c.state();
        assert_eq!(
            state.success.as_deref(),
            Some("Book \"X\" added successfully with ID: 4")
        );
        assert_eq!(state.form, BookForm::default());
        assert_eq!(state.books.len(), 4);
        assert!(!state.submitting);
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn success_message_clears_after_configured_delay() {
        let c = RegistryController::new(
            MemoryBookStore::new(Latency::zero()),
            UiTiming::default(),
        );
        c.set_form("X", "Y", "10");
        c.submit().await;
        assert!(c.state().success.is_some());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(c.state().success.is_none());
    }

    #[tokio::test]
    async fn search_requires_an_id() {
        let c = controller();
        c.set_search_id("");
        c.search().await;
        assert_eq!(
            c.state().search_error.as_deref(),
            Some("Please enter a book ID")
        );
    }

    #[tokio::test]
    async fn search_rejects_non_numeric_id_before_store_call() {
        let c = controller();
        c.set_search_id("abc");
        c.search().await;
        assert_eq!(
            c.state().search_error.as_deref(),
            Some("Book with ID abc not found")
        );
    }

    #[tokio::test]
    async fn search_finds_seeded_book() {
        let c = controller();
        c.set_search_id("2");
        c.search().await;

        let state = c.state();
        let book = state.searched_book.expect("book should be found");
        assert_eq!(book.title, "Effective Java");
        assert!(state.search_error.is_none());
        assert!(!state.searching);
    }

    #[tokio::test]
    async fn search_unknown_id_shows_store_message() {
        let c = controller();
        c.set_search_id("99");
        c.search().await;
        assert_eq!(
            c.state().search_error.as_deref(),
            Some("Book with ID 99 not found")
        );
    }

    #[tokio::test]
    async fn submit_and_search_messages_are_independent() {
        let c = controller();
        c.set_form("", "", "");
        c.submit().await;
        c.set_search_id("");
        c.search().await;

        let state = c.state();
        assert_eq!(state.error.as_deref(), Some("All fields are required"));
        assert_eq!(
            state.search_error.as_deref(),
            Some("Please enter a book ID")
        );
    }

    // --- 失敗するストアでのLoad・フォールバック文言 ---

    #[derive(Debug, thiserror::Error)]
    #[error("")]
    struct SilentError;

    struct FailingStore;

    #[async_trait::async_trait]
    impl BookStore for FailingStore {
        type Error = SilentError;

        async fn list_books(&self) -> Result<Vec<Book>, Self::Error> {
            Err(SilentError)
        }

        async fn get_book(&self, _id: BookId) -> Result<Book, Self::Error> {
            Err(SilentError)
        }

        async fn add_book(&self, _draft: BookDraft) -> Result<Book, Self::Error> {
            Err(SilentError)
        }
    }

    #[tokio::test]
    async fn load_failure_shows_generic_message() {
        let c = RegistryController::new(FailingStore, UiTiming::default());
        c.load().await;

        let state = c.state();
        assert_eq!(state.error.as_deref(), Some("Failed to load books"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn messageless_failures_fall_back_to_generic_strings() {
        let c = RegistryController::new(FailingStore, UiTiming::default());

        c.set_form("X", "Y", "10");
        c.submit().await;
        assert_eq!(c.state().error.as_deref(), Some("Failed to add book"));

        c.set_search_id("1");
        c.search().await;
        assert_eq!(c.state().search_error.as_deref(), Some("Book not found"));
    }
}
