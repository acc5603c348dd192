use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("ISBN exists with different metadata: {isbn}")]
    Conflict { isbn: String },

    #[error("no book with isbn: {isbn}")]
    NotFound { isbn: String },

    #[error("inventory error: {0}")]
    Inventory(libris_inventory::InventoryError),
}

impl From<libris_inventory::InventoryError> for CatalogError {
    fn from(err: libris_inventory::InventoryError) -> Self {
        use libris_inventory::InventoryError;
        match err {
            InventoryError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            InventoryError::Conflict { isbn } => Self::Conflict { isbn },
            other => Self::Inventory(other),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
