//! Output adapters: CSV listings, text quotes and the formatting they share.

pub mod csv;
pub mod format;
pub mod quote;
