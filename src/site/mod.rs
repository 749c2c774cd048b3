// src/site/mod.rs
pub mod client;
pub mod models;
