//! Notification Outbox
//!
//! Repositories insert notification intents in the same transaction as the
//! state change they describe (see `db::repository::notification`); the
//! worker here drains undispatched rows afterwards. A dispatch failure is
//! logged and retried on the next sweep; it never touches the primary
//! mutation, which is already committed.

mod worker;

pub use worker::OutboxWorker;
