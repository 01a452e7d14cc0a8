pub mod error;
pub mod passes;
pub mod position;
