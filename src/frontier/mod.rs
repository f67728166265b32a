//! Frontier module: the set of accounts still to be visited
//!
//! This module contains:
//! - The `Frontier` trait with atomic draw/offer semantics
//! - A durable SQLite-backed set and an in-memory set
//! - Seeding from the configured seed list and from confirmed accounts

mod memory;
mod seed;
mod sqlite;
mod traits;

pub use memory::MemoryFrontier;
pub use seed::{load_seeds, parse_seed_list, reseed_from_confirmed, seed_frontier};
pub use sqlite::SqliteFrontier;
pub use traits::{Frontier, FrontierError, FrontierResult};
