pub mod engine;
pub mod simplify;
pub mod summary;
