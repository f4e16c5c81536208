use super::model::id::BookId;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Book with ID {0} not found")]
    NotFound(BookId),

    #[error("All fields are required")]
    MissingFields,

    #[error("Price must be a positive number")]
    InvalidPrice,
}
