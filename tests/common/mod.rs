//! Shared test harness for integration tests.

#![allow(dead_code)]

use book_registry::application::controller::{RegistryController, UiTiming};
use book_registry::domain::model::book::BookDraft;
use book_registry::infra::memory_store::{Latency, MemoryBookStore};

/// シード3冊のタイトル（登録順）。
pub const SEED_TITLES: [&str; 3] = ["Spring Boot in Action", "Effective Java", "Clean Code"];

/// 遅延ゼロのシード済みストア。
pub fn instant_store() -> MemoryBookStore {
    MemoryBookStore::new(Latency::zero())
}

/// 遅延ゼロのストアを持つController。
pub fn instant_controller() -> RegistryController<MemoryBookStore> {
    RegistryController::new(instant_store(), UiTiming::default())
}

pub fn draft(title: &str, author: &str, price: &str) -> BookDraft {
    BookDraft {
        title: title.into(),
        author: author.into(),
        price: price.into(),
    }
}

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
