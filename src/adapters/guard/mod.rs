//! Idempotency guard adapters.
//!
//! The Redis guard is the production implementation; the in-memory guard
//! serves tests and single-node development.

mod in_memory;
mod redis;

pub use in_memory::InMemoryIdempotencyGuard;
pub use redis::RedisIdempotencyGuard;
