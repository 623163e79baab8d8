pub mod errors;
pub mod generation;

pub use generation::{Pipeline, ResponseShape};
