// src/storage/mod.rs
pub mod mock;
pub mod postgres;
pub mod sink;
pub mod traits;

pub use mock::MockAuditStore;
pub use postgres::PostgresAuditStore;
pub use sink::{AuditSink, BackgroundAuditSink, NoopAuditSink};
pub use traits::{AuditRecord, AuditStore};
