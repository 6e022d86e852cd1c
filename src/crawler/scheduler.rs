//! Page planning and pacing for a crawl
//!
//! This module handles:
//! - Building the fixed sequence of page indices to fetch (stride and cap)
//! - Splitting that sequence into batches sized by the concurrency limit
//! - Drawing the randomized pause between batches

use rand::Rng;
use std::time::Duration;

/// Builds the ordered page indices to fetch
///
/// Starts at 1, steps by `stride`, stops at `total_pages`, and keeps at most
/// `cap` entries. A stride of zero is treated as 1.
///
/// # Examples
///
/// ```
/// use thread_harvest::crawler::page_sequence;
///
/// assert_eq!(page_sequence(10, 3, None), vec![1, 4, 7, 10]);
/// assert_eq!(page_sequence(10, 3, Some(2)), vec![1, 4]);
/// ```
pub fn page_sequence(total_pages: u32, stride: u32, cap: Option<u32>) -> Vec<u32> {
    let stride = stride.max(1) as usize;
    let cap = cap.map_or(usize::MAX, |cap| cap as usize);

    (1..=total_pages).step_by(stride).take(cap).collect()
}

/// Splits the page sequence into consecutive batches of `size` pages
///
/// Order is preserved; the last batch may be shorter.
pub fn batches(pages: &[u32], size: usize) -> impl Iterator<Item = &[u32]> {
    pages.chunks(size.max(1))
}

/// Draws a pause uniformly from `base*(1-variation/2)` to `base*(1+variation/2)`
///
/// The result is rounded to whole milliseconds.
pub fn jittered_delay<R: Rng + ?Sized>(base_ms: u64, variation: f64, rng: &mut R) -> Duration {
    let factor = 1.0 - variation / 2.0 + rng.gen::<f64>() * variation;
    let millis = (base_ms as f64 * factor).round().max(0.0);
    Duration::from_millis(millis as u64)
}
