pub mod errors;
pub mod fields;

pub mod database;
pub mod server;
pub mod services;
