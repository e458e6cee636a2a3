mod read_package;
mod store_dir;
mod write_package;

pub use read_package::*;
pub use store_dir::*;
pub use write_package::*;
