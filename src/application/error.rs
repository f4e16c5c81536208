/// クライアント側バリデーション失敗。Displayが画面表示の文言そのもの。
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Price must be a positive number")]
    NonPositivePrice,

    #[error("Please enter a book ID")]
    MissingSearchId,
}
