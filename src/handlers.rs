pub mod errors;
pub mod health;
pub mod leagues;
pub mod matches;
pub mod teams;
