//! Request normalization and prompt assembly for `/analyze`.

mod normalizer;
pub mod prompt;
mod types;

pub use normalizer::{PromptAssembler, decode_image};
pub use prompt::build_prompt;
pub use types::*;
