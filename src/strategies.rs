//! Built-in reference strategies.
//!
//! The arbitration engine only needs the [`Strategy`](crate::strategy::Strategy)
//! contract, but the default configurations have to run *something*. These
//! two small strategies cover the common signals:
//!
//! - `exception-type` (exception.rs): groups by exception type plus a
//!   normalized exception value.
//! - `message` (message.rs): groups by the log message with volatile
//!   fragments (numbers, hex ids, uuids) templated out, so "timeout after
//!   31s" and "timeout after 7s" land in the same bucket.
//!
//! Both emit under the `default` variant; richer strategies (stacktrace
//! component extraction and friends) plug in through the same trait.

#[path = "strategies/exception.rs"]
mod exception;
#[path = "strategies/message.rs"]
mod message;

pub use exception::ExceptionTypeStrategy;
pub use message::MessageStrategy;
