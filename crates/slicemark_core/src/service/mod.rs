//! Core use-case services.
//!
//! # Responsibility
//! - Turn engine calls into whole-document read-modify-write cycles.
//! - Keep host adapters decoupled from storage keys and document shapes.

pub mod canvas_service;
pub mod mark_service;
pub mod tab_service;
