pub mod config;
pub mod portal;
