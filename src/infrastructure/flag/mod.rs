//! Non-SQL backends for the sale flag.
//!
//! The default backend is [`crate::infrastructure::persistence::PgSaleFlagStore`];
//! [`RedisSaleFlagStore`] is selected with `FLAG_STORE=redis`.

mod redis_flag_store;

pub use redis_flag_store::RedisSaleFlagStore;
