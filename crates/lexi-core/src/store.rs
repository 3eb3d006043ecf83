use lexi_types::{Card, CardId};

/// Card persistence, keyed by card identity
#[async_trait::async_trait]
pub trait CardStore: Send + Sync {
    /// Persist a new card. Fails with `AlreadyExists` if its identity is taken.
    async fn create(&self, card: &Card) -> Result<CardId, StoreError>;

    /// Overwrite a card created earlier. Fails with `NotFound` otherwise.
    async fn update(&self, card: &Card) -> Result<(), StoreError>;

    async fn get(&self, id: &CardId) -> Result<Card, StoreError>;

    async fn delete(&self, id: &CardId) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<Card>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("already exists")]
    AlreadyExists,

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("internal error: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap an unexpected lower-level failure, keeping it as the source.
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        StoreError::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::io;

    use super::*;

    #[test]
    fn internal_error_keeps_its_cause() {
        let err = StoreError::internal(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));

        assert_eq!(err.to_string(), "internal error: denied");
        let source = err.source().expect("source kept");
        let io_err = source.downcast_ref::<io::Error>().expect("io error");
        assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
    }
}
