pub mod shutdown;
pub mod utills;

pub use shutdown::*;
pub use utills::*;
