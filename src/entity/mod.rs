pub mod affiliate;
pub mod free_id;
pub mod product;
pub mod purchase;
pub mod snapshot;

pub use affiliate::Rank;
