pub mod product;
pub mod project;
pub mod purchase;
pub mod report;
pub mod roster;
#[cfg(test)]
pub mod test_utils;

pub use product::Product;
pub use project::Project;
pub use purchase::Purchase;
pub use report::Report;
pub use roster::Roster;
