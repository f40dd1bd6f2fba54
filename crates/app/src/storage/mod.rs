//! Device-local storage
//!
//! Collections are stored as whole JSON blobs under fixed keys and replaced
//! on every write.

mod errors;
mod json;
mod sqlite;
mod store;
mod writer;

pub use errors::StorageError;
pub use json::{encode, load};
pub use sqlite::SqliteKeyValueStore;
pub use store::*;
pub use writer::SnapshotWriter;

/// Cart lines
pub const CART_KEY: &str = "cart";

/// Orders, newest first
pub const ORDERS_KEY: &str = "orders";

/// Local copy of the signed-in session
pub const USER_KEY: &str = "user";

/// Identity provider's own persisted session
pub const AUTH_TOKEN_KEY: &str = "auth-token";
