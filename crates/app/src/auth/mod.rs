//! Authentication

mod errors;
mod models;
mod provider;
mod session;
pub mod supabase;

pub use errors::*;
pub use models::*;
pub use provider::*;
pub use session::*;
pub use supabase::{SupabaseClient, SupabaseConfig};
