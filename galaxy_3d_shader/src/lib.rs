/*!
# Galaxy 3D Shader

Shader source preprocessing and variation caching for the Galaxy 3D engine.

A shader is authored as one combined file declaring both `void VS(` and
`void PS(` entry points. Loading it resolves `#include`s (recording each
included file as a hot-reload dependency), derives vertex-only and
pixel-only source text, and serves define-specialized variations from
per-stage caches. Compilation is delegated to a [`Graphics`](galaxy3d::graphics::Graphics)
backend.

## Architecture

- **shader**: define canonicalization, include resolver, stage splitter, variation cache
- **resource**: `Shader` and `ShaderVariation` resources, `ResourceCache` with hot reload
- **graphics**: compile backend traits
- **io**: file providers (in-memory, directory)
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics;
pub mod io;
pub mod shader;
pub mod resource;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Compile backend sub-module
    pub mod graphics {
        pub use crate::graphics::*;
    }

    // File provider sub-module
    pub mod io {
        pub use crate::io::*;
    }

    // Preprocessing sub-module
    pub mod shader {
        pub use crate::shader::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }
}
