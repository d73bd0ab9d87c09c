// src/agent/mod.rs
pub mod concierge_agent;
pub mod conversation_store;
pub mod tool_executor;
pub mod transcript;
