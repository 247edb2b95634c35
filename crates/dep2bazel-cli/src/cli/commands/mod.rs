//! CLI command handlers, one per file.

mod convert;
mod name;
mod remap;
mod resolve;

pub use convert::{run_convert, ConvertOptions};
pub use name::run_name;
pub use remap::run_remap;
pub use resolve::run_resolve;
