mod identity_binder;
mod in_memory_directory;
mod user_directory;

pub use identity_binder::*;
pub use in_memory_directory::*;
pub use user_directory::*;
