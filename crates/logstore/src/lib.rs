//! Draftsmith run log storage adapters.
//!
//! Implements the [`pipeline::RunLogStore`] port twice:
//!
//! - [`SupabaseLogStore`] writes rows to a Supabase table through PostgREST.
//! - [`MemoryLogStore`] keeps entries in process, for local runs and tests.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Table layout,
//! headers and row decoding stay here; the [`pipeline`] crate never sees them.

pub mod memory;
pub mod supabase;

pub use memory::MemoryLogStore;
pub use supabase::{SupabaseConfig, SupabaseLogStore, DEFAULT_TABLE};
