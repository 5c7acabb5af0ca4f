// src/services/mod.rs
pub mod content_service;
pub mod decor_generator;

pub use content_service::{ContentModel, ContentRequestor, GeminiModel};
