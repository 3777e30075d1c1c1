//! CLI command handlers, one per file.

mod all;
mod directory;
mod each;
mod load;
mod navbar;

pub use all::run_all;
pub use directory::run_directory;
pub use each::run_each;
pub use load::run_load;
pub use navbar::run_navbar;
