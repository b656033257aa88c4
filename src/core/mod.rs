pub mod currency;
pub mod entry;
pub mod error;
pub mod expense;
pub mod money;
pub mod payment;
pub mod user;
