//! Interactive terminal tutor.
//!
//! A readline loop over one in-memory session: questions go through the
//! prompt processor, answers are rendered as terminal markdown with
//! highlighted code, and slash commands cover history and export.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
