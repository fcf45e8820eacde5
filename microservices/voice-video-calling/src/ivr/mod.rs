//! IVR Engine
//!
//! Interactive Voice Response system with multi-level menus,
//! DTMF/speech recognition, TTS, and database integration.

mod flow;
mod nodes;
mod engine;

#[cfg(test)]
mod tests;

pub use engine::IvrEngine;
