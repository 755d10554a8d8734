mod tables;
mod utils;

pub use tables::*;
pub use utils::*;
