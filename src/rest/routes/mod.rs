pub mod habit;
pub mod health;
