pub mod line;
pub mod record;

pub use line::*;
pub use record::*;
