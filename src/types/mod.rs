pub mod gps;
pub mod schema;
pub mod sensor;

pub use gps::*;
pub use schema::*;
pub use sensor::*;
