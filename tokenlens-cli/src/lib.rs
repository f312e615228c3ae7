//! Terminal rendering for tokenlens analyses.

pub mod render;

pub use render::{confidence_bar, display_token, Renderer, Report};
