pub mod constants;
pub mod direction;
pub mod error;
pub mod loft;
pub mod math;
pub mod terrain;
pub mod types;
