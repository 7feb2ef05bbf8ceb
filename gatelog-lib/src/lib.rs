//! Data-access layer for the gatelog entry tracker.
//!
//! Everything here talks to a remote hosted record store speaking the
//! PostgREST wire protocol (Supabase and compatibles). The store owns the
//! data; this crate owns the typed view of it: [`Entry`] rows, the
//! [`RecordStore`] client, and the [`StoreConfig`] read from the
//! environment at startup.

pub mod config;
pub mod store;

mod error;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use store::{Entry, RecordStore};
