//! The tutor pipeline: prompt template, image marker handling, reply
//! resolution, and the per-turn prompt processor.

pub mod marker;
pub mod processor;
pub mod prompt;
pub mod reply;
