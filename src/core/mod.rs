pub mod constant;

mod error;
pub use error::Error;
