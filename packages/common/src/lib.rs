//! Shared types for the AsciiDork playground.
//!
//! - [`ConversionOutcome`]: the decoded result of one conversion attempt
//! - [`RenderState`]: the only state a presentation layer observes
//! - [`Converter`] / [`EngineSlot`]: the late-bound conversion engine

pub mod command;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod render;
pub mod result;

pub use command::*;
pub use engine::*;
pub use error::*;
pub use outcome::*;
pub use render::*;
pub use result::*;
