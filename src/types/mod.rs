mod definitions;
mod format;
mod misc;

pub use definitions::*;
pub use format::*;
pub use misc::*;
