/// Derive per-stage source text from a combined shader file.
///
/// The combined file declares both entry points as `void VS(` and `void PS(`.
/// Each derived source keeps the full text (so compiler line numbers still
/// match the authored file) and turns the other stage's entry point and
/// everything after it into an inert block comment. Pure text replacement:
/// a missing entry point is simply not replaced.

use crate::graphics::ShaderStage;

const VS_ENTRY: &str = "void VS(";
const PS_ENTRY: &str = "void PS(";

/// Target shading-language convention for stage entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderDialect {
    /// Single `main` entry point per stage; vertex attributes only exist in
    /// the vertex stage (GLSL)
    Glsl,
    /// Distinct `VS`/`PS` entry points supported by the compiler target (HLSL)
    Hlsl,
}

impl ShaderDialect {
    /// Entry point name of `stage` in the derived source
    pub fn entry_point(&self, stage: ShaderStage) -> &'static str {
        match (self, stage) {
            (ShaderDialect::Glsl, _) => "main",
            (ShaderDialect::Hlsl, ShaderStage::Vertex) => "VS",
            (ShaderDialect::Hlsl, ShaderStage::Pixel) => "PS",
        }
    }
}

impl Default for ShaderDialect {
    fn default() -> Self {
        if cfg!(feature = "opengl") {
            ShaderDialect::Glsl
        } else {
            ShaderDialect::Hlsl
        }
    }
}

/// Vertex and pixel source derived from one combined file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSources {
    pub vertex: String,
    pub pixel: String,
}

impl StageSources {
    /// Source for `stage`
    pub fn get(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Pixel => &self.pixel,
        }
    }

    /// Combined length of both sources in bytes
    pub fn total_len(&self) -> usize {
        self.vertex.len() + self.pixel.len()
    }
}

/// Split combined source into vertex-only and pixel-only text
pub fn split_stages(combined: &str, dialect: ShaderDialect) -> StageSources {
    match dialect {
        ShaderDialect::Glsl => {
            let mut vertex = combined
                .replace(VS_ENTRY, "void main(")
                .replace(PS_ENTRY, "/* void PS(");
            vertex.push_str("*/\n");

            let pixel = combined
                .replace("attribute ", "// attribute ")
                .replace(VS_ENTRY, "/* void VS(")
                .replace(PS_ENTRY, "*/\nvoid main(");

            StageSources { vertex, pixel }
        }
        ShaderDialect::Hlsl => {
            let mut vertex = combined.replace(PS_ENTRY, "/* void PS(");
            vertex.push_str("*/\n");

            let pixel = combined
                .replace(VS_ENTRY, "/* void VS(")
                .replace(PS_ENTRY, "*/\nvoid PS(");

            StageSources { vertex, pixel }
        }
    }
}

#[cfg(test)]
#[path = "stage_splitter_tests.rs"]
mod tests;
