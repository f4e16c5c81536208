use serde::{Deserialize, Serialize};

use super::id::BookId;
use crate::domain::error::DomainError;

/// 登録リクエスト。priceはフォーム入力のままテキストで受け取る。
#[derive(Debug, Clone)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub price: String,
}

/// 書籍レコード。REST表現（bookId / title / author / price）と同じ形で
/// シリアライズされる。通貨記号や小数2桁表示はプレゼンテーション側の責務。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub price: f64,
}

/// Catalog。書籍列と採番カウンタを持つ集約ルート。登録はここを経由する。
/// 列の順序は登録順。カウンタは増えるだけで、再利用されない。
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
    next_id: u32,
}

impl Catalog {
    /// 空のCatalog。採番は1から。
    pub fn new() -> Self {
        Self {
            books: Vec::new(),
            next_id: 1,
        }
    }

    /// 固定3冊でシードしたCatalog。カウンタは最大シードIDの次から始まる。
    pub fn seeded() -> Self {
        let books = vec![
            Book {
                book_id: BookId::new(1),
                title: "Spring Boot in Action".into(),
                author: "Craig Walls".into(),
                price: 1299.00,
            },
            Book {
                book_id: BookId::new(2),
                title: "Effective Java".into(),
                author: "Joshua Bloch".into(),
                price: 1499.00,
            },
            Book {
                book_id: BookId::new(3),
                title: "Clean Code".into(),
                author: "Robert C. Martin".into(),
                price: 1350.00,
            },
        ];
        Self { books, next_id: 4 }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// ID一致の先頭レコードを返す。IDは一意なので曖昧さはない。
    pub fn get(&self, id: BookId) -> Result<&Book, DomainError> {
        self.books
            .iter()
            .find(|b| b.book_id == id)
            .ok_or(DomainError::NotFound(id))
    }

    /// 登録。フィールドの存在、priceの数値・正値を検証してから採番して末尾に追加する。
    pub fn insert(&mut self, draft: BookDraft) -> Result<Book, DomainError> {
        if draft.title.is_empty() || draft.author.is_empty() || draft.price.is_empty() {
            return Err(DomainError::MissingFields);
        }

        let price: f64 = draft
            .price
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidPrice)?;
        if !price.is_finite() || price <= 0.0 {
            return Err(DomainError::InvalidPrice);
        }

        let book = Book {
            book_id: BookId::new(self.next_id),
            title: draft.title,
            author: draft.author,
            price,
        };
        self.next_id += 1;
        self.books.push(book.clone());
        Ok(book)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
