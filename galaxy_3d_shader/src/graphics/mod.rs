/// Graphics module - the narrow interface to the rendering backend

pub mod graphics;

pub use graphics::*;

// Mock graphics backend for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics;
