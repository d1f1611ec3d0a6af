//! CookCraft Client Library
//!
//! Network collaborators for the CookCraft app: Supabase auth, RPC and
//! storage, the prediction service and the recipe cache. Exposed for the
//! `cookcraft` binary and for integration tests.

pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod supabase;
