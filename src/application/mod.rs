//! Application layer orchestrating pricing and persistence.
//!
//! This module defines the `ProposalService`, the single entry point the CLI
//! (or any other front end) uses to quote, save and manage proposals.

pub mod service;
