mod command_handle;
mod page_handle;
mod status_handle;

pub use command_handle::*;
pub use page_handle::*;
pub use status_handle::*;
