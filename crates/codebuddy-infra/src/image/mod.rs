//! Image search backends.

pub mod pexels;
