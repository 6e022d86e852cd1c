//! URL handling module for Thread-Harvest
//!
//! This module validates caller-supplied thread URLs and maps page indices
//! to page URLs and back.

mod paging;
mod validate;

// Re-export main functions
pub use paging::{count_after_word, page_url, trailing_page_number};
pub use validate::parse_base_url;
