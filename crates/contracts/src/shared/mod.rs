pub mod logger;
pub mod phone;
