mod detection_status;
mod time_range;

pub use detection_status::*;
pub use time_range::*;
