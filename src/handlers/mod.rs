// src/handlers/mod.rs
pub mod chat;
pub mod status;
