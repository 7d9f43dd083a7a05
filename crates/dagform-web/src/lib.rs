//! dagform-web: HTTP surface for the causal dependency form.
//! Provides:
//!   - The single-page form (user info → variables → pairwise dependency questions)
//!   - JSON endpoints driving a per-session dependency graph
//!   - Save of the finished graph to the configured results sink

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
