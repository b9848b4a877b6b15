//! Link importance ("PageRank") of a closed corpus of cross-referencing pages.
//!
//! Two independent estimators run on the same [`LinkGraph`]:
//! [`page_rank::sampled`] walks the random-surfer chain and counts visits,
//! [`page_rank::iterated`] relaxes the rank recurrence to its fixed point.

pub mod error;
pub use self::error::Error;
mod graph;
pub use self::graph::*;
mod common;
pub use self::common::*;

pub mod page_rank;
pub use self::page_rank::{iterated::iterate, sampled::sample, transition_model};
