//! Integration tests for shader loading and variations through the public API
//!
//! A counting graphics backend stands in for a real compiler.
//! No GPU required.
//!
//! Run with: cargo test --test shader_integration_tests

use std::sync::{Arc, Mutex};
use galaxy_3d_shader::galaxy3d::Error;
use galaxy_3d_shader::galaxy3d::graphics::{GpuShader, Graphics, ShaderDesc, ShaderStage};
use galaxy_3d_shader::galaxy3d::io::MemoryFileSystem;
use galaxy_3d_shader::galaxy3d::resource::{ResourceCache, Shader, ShaderVariation, SharedResource};
use galaxy_3d_shader::galaxy3d::shader::{ShaderConfig, ShaderDialect};

// ============================================================================
// TEST GRAPHICS
// ============================================================================

struct TestGpuShader;

impl GpuShader for TestGpuShader {}

/// (name, entry point, defines) of every compile request
#[derive(Default)]
struct TestGraphics {
    compiles: Mutex<Vec<(String, String, Vec<String>)>>,
}

impl Graphics for TestGraphics {
    fn is_available(&self) -> bool {
        true
    }

    fn compile_shader(&self, desc: &ShaderDesc) -> galaxy_3d_shader::galaxy3d::Result<Arc<dyn GpuShader>> {
        self.compiles.lock().unwrap().push((
            desc.name.to_string(),
            desc.entry_point.to_string(),
            desc.defines.iter().map(|d| d.to_string()).collect(),
        ));

        if desc.source.contains("#error") {
            return Err(Error::ShaderCompileFailed {
                name: desc.name.to_string(),
                output: "#error directive".to_string(),
            });
        }

        Ok(Arc::new(TestGpuShader))
    }
}

const LIT_SOLID: &str = "\
#include \"Common/Uniforms.glsl\"
#include \"Common/Transform.glsl\"

attribute vec4 iPos;
attribute vec3 iNormal;
varying vec3 vNormal;

void VS()
{
    gl_Position = GetClipPos(iPos);
    vNormal = iNormal;
}

void PS()
{
    gl_FragColor = cMatDiffColor * max(dot(vNormal, cLightDir), 0.0);
}
";

fn setup(dialect: ShaderDialect) -> (Arc<TestGraphics>, ResourceCache) {
    let (graphics, cache, _files) = setup_with_files(dialect);
    (graphics, cache)
}

fn setup_with_files(dialect: ShaderDialect) -> (Arc<TestGraphics>, ResourceCache, Arc<MemoryFileSystem>) {
    let files = Arc::new(MemoryFileSystem::from_files([
        ("Shaders/LitSolid.glsl", LIT_SOLID),
        ("Shaders/Common/Uniforms.glsl", "uniform vec4 cMatDiffColor;\nuniform vec3 cLightDir;"),
        ("Shaders/Common/Transform.glsl", "#include \"Uniforms.glsl\"\nvec4 GetClipPos(vec4 p) { return p; }"),
    ]));
    let graphics = Arc::new(TestGraphics::default());
    let cache = ResourceCache::with_config(
        files.clone(),
        Some(graphics.clone()),
        ShaderConfig { dialect, ..ShaderConfig::default() },
    );
    Shader::register_object(&cache);
    (graphics, cache, files)
}

fn load(cache: &ResourceCache) -> SharedResource {
    cache.get_resource(Shader::TYPE_NAME, "Shaders/LitSolid.glsl").unwrap()
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn test_integration_glsl_stage_sources() {
    let (_graphics, cache) = setup(ShaderDialect::Glsl);
    let resource = load(&cache);
    let guard = resource.lock().unwrap();
    let shader = guard.as_shader().unwrap();

    // Includes are flattened in place, nested ones relative to their own file
    assert_eq!(shader.vertex_source().matches("uniform vec4 cMatDiffColor;").count(), 2);
    assert!(shader.vertex_source().contains("vec4 GetClipPos"));

    assert!(shader.vertex_source().contains("void main()"));
    assert!(shader.vertex_source().contains("/* void PS()"));
    assert!(shader.pixel_source().contains("// attribute vec4 iPos;"));
    assert!(shader.pixel_source().contains("/* void VS()"));
    assert!(shader.pixel_source().contains("*/\nvoid main()"));
}

#[test]
fn test_integration_dependencies_recorded() {
    let (_graphics, cache) = setup(ShaderDialect::Glsl);
    load(&cache);
    let id = cache.resource_id(Shader::TYPE_NAME, "Shaders/LitSolid.glsl").unwrap();

    assert_eq!(
        cache.dependencies().dependencies_of(id),
        vec!["Shaders/Common/Transform.glsl", "Shaders/Common/Uniforms.glsl"]
    );
}

#[test]
fn test_integration_prepare_variations() {
    let (graphics, cache) = setup(ShaderDialect::Hlsl);
    let resource = load(&cache);
    let mut guard = resource.lock().unwrap();
    let shader = guard.as_shader_mut().unwrap();

    let vs = shader.prepare_variation(ShaderStage::Vertex, "  SKINNED   NUMVERTEXLIGHTS=4 ").unwrap();
    let ps = shader.prepare_variation(ShaderStage::Pixel, "DIFFMAP").unwrap();
    let vs_again = shader.get_variation(ShaderStage::Vertex, "SKINNED NUMVERTEXLIGHTS=4");

    assert!(Arc::ptr_eq(&vs, &vs_again));
    assert_eq!(vs.name(), "Shaders/LitSolid_SKINNED_NUMVERTEXLIGHTS=4");
    assert_eq!(ps.name(), "Shaders/LitSolid_DIFFMAP");

    let compiles = graphics.compiles.lock().unwrap();
    assert_eq!(compiles.len(), 2);
    assert_eq!(compiles[0].1, "VS");
    assert_eq!(compiles[0].2, vec!["SKINNED", "NUMVERTEXLIGHTS=4"]);
    assert_eq!(compiles[1].1, "PS");
}

#[test]
fn test_integration_compile_failure_until_fixed() {
    let (graphics, cache, files) = setup_with_files(ShaderDialect::Glsl);
    files.insert_text("Shaders/Broken.glsl", "void VS() { }\nvoid PS()\n{\n#error todo\n}\n");
    let resource = cache.get_resource(Shader::TYPE_NAME, "Shaders/Broken.glsl").unwrap();

    {
        let mut guard = resource.lock().unwrap();
        let shader = guard.as_shader_mut().unwrap();

        assert!(matches!(
            shader.prepare_variation(ShaderStage::Vertex, ""),
            Err(Error::ShaderCompileFailed { .. })
        ));
        // Not retried while the source is unchanged
        assert!(shader.prepare_variation(ShaderStage::Vertex, "").is_err());
    }
    assert_eq!(graphics.compiles.lock().unwrap().len(), 1);

    files.insert_text("Shaders/Broken.glsl", "void VS() { }\nvoid PS() { }\n");
    let results = cache.file_changed("Shaders/Broken.glsl");
    assert!(results.iter().all(|(_, result)| result.is_ok()));

    let mut guard = resource.lock().unwrap();
    let variation = guard.as_shader_mut().unwrap()
        .prepare_variation(ShaderStage::Vertex, "")
        .unwrap();
    assert!(variation.is_compiled());
    assert_eq!(graphics.compiles.lock().unwrap().len(), 2);
    assert_eq!(graphics.compiles.lock().unwrap()[1].1, "main");
}

#[test]
fn test_integration_memory_accounting() {
    let (_graphics, cache) = setup(ShaderDialect::Hlsl);
    let resource = load(&cache);
    let id = cache.resource_id(Shader::TYPE_NAME, "Shaders/LitSolid.glsl").unwrap();
    let loaded = cache.memory_use(id);

    {
        let mut guard = resource.lock().unwrap();
        let shader = guard.as_shader_mut().unwrap();
        let base = std::mem::size_of::<Shader>() as u64;
        assert_eq!(loaded, base + (shader.vertex_source().len() + shader.pixel_source().len()) as u64);

        shader.get_variation(ShaderStage::Vertex, "A");
    }

    assert_eq!(cache.memory_use(id), loaded + std::mem::size_of::<ShaderVariation>() as u64);
    assert_eq!(cache.total_memory_use(), cache.memory_use(id));
}
