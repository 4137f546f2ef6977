//! UI Renderer Trait
//!
//! Defines the interface that all frontends must implement.

use anyhow::Result;

use super::types::AppView;

/// Trait that all UI renderers must implement
///
/// Keeps the terminal layer away from the orchestration logic; tests render
/// into memory through the same interface.
pub trait UiRenderer {
    /// Render one frame
    fn render(&mut self, view: &AppView) -> Result<()>;
}
