pub mod balance;
pub mod extract;
