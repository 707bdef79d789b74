/// Error types shared across the clinic service crates.
///
/// `RedisStore` classifies connection failures with these before degrading;
/// service-specific errors live in each service crate.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("redis unavailable, degrading gracefully")]
    RedisUnavailable,
}
