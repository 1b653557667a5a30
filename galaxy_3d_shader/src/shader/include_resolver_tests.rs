//! Unit tests for include flattening

use super::*;
use crate::io::MemoryFileSystem;
use crate::resource::DependencyMap;
use slotmap::SlotMap;

fn owner_id() -> ResourceId {
    let mut sm = SlotMap::<ResourceId, ()>::with_key();
    sm.insert(())
}

fn flatten_file(
    fs: &MemoryFileSystem,
    deps: &DependencyMap,
    owner: ResourceId,
    name: &str,
) -> Result<String> {
    let source = fs.open(name)?;
    IncludeResolver::new(owner, name, fs, deps).flatten(&source)
}

// ============================================================================
// DIRECTIVE PARSING
// ============================================================================

#[test]
fn test_parse_include_forms() {
    assert_eq!(parse_include_directive("#include \"Common.glsl\""), Some("Common.glsl"));
    assert_eq!(parse_include_directive("#include <Common.glsl>"), Some("Common.glsl"));
    assert_eq!(parse_include_directive("#include Common.glsl"), Some("Common.glsl"));
    assert_eq!(parse_include_directive("#include\t\"Lib/Fog.glsl\"  "), Some("Lib/Fog.glsl"));
}

#[test]
fn test_parse_non_directives() {
    assert_eq!(parse_include_directive("#included_thing"), None);
    assert_eq!(parse_include_directive("  #include \"Indented.glsl\""), None);
    assert_eq!(parse_include_directive("// #include \"Commented.glsl\""), None);
    assert_eq!(parse_include_directive("uniform vec4 cColor;"), None);
}

// ============================================================================
// FLATTENING
// ============================================================================

#[test]
fn test_flatten_without_includes() {
    let fs = MemoryFileSystem::from_files([("Shaders/Plain.glsl", "line1\nline2")]);
    let deps = DependencyMap::new();
    let owner = owner_id();

    let code = flatten_file(&fs, &deps, owner, "Shaders/Plain.glsl").unwrap();

    assert_eq!(code, "line1\nline2\n\n");
    assert!(deps.dependencies_of(owner).is_empty());
}

#[test]
fn test_flatten_inlines_include_in_place() {
    let fs = MemoryFileSystem::from_files([
        ("Shaders/Main.glsl", "#include \"Inc.glsl\"\nX"),
        ("Shaders/Inc.glsl", "Y"),
    ]);
    let deps = DependencyMap::new();
    let owner = owner_id();

    let code = flatten_file(&fs, &deps, owner, "Shaders/Main.glsl").unwrap();

    assert_eq!(code, "Y\n\nX\n\n");
    assert_eq!(deps.dependencies_of(owner), vec!["Shaders/Inc.glsl"]);
    assert_eq!(deps.dependents("Shaders/Inc.glsl"), vec![owner]);
}

#[test]
fn test_flatten_resolves_relative_to_including_file() {
    let fs = MemoryFileSystem::from_files([
        ("Shaders/Main.glsl", "#include \"Lib/Lighting.glsl\"\nmain"),
        ("Shaders/Lib/Lighting.glsl", "#include <Fog.glsl>\nlighting"),
        ("Shaders/Lib/Fog.glsl", "fog"),
    ]);
    let deps = DependencyMap::new();
    let owner = owner_id();

    let code = flatten_file(&fs, &deps, owner, "Shaders/Main.glsl").unwrap();

    assert_eq!(code, "fog\n\nlighting\n\nmain\n\n");
    assert_eq!(
        deps.dependencies_of(owner),
        vec!["Shaders/Lib/Fog.glsl", "Shaders/Lib/Lighting.glsl"]
    );
}

#[test]
fn test_flatten_repeated_include_is_expanded_each_time() {
    let fs = MemoryFileSystem::from_files([
        ("Shaders/Main.glsl", "#include \"Inc.glsl\"\n#include \"Inc.glsl\""),
        ("Shaders/Inc.glsl", "Y"),
    ]);
    let deps = DependencyMap::new();
    let owner = owner_id();

    let code = flatten_file(&fs, &deps, owner, "Shaders/Main.glsl").unwrap();

    assert_eq!(code, "Y\n\nY\n\n\n");
    assert_eq!(deps.dependencies_of(owner), vec!["Shaders/Inc.glsl"]);
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_missing_include_fails() {
    let fs = MemoryFileSystem::from_files([("Shaders/Main.glsl", "#include \"Missing.glsl\"\nX")]);
    let deps = DependencyMap::new();

    let err = flatten_file(&fs, &deps, owner_id(), "Shaders/Main.glsl").unwrap_err();

    match err {
        Error::IncludeNotFound { include, from } => {
            assert_eq!(include, "Shaders/Missing.glsl");
            assert_eq!(from, "Shaders/Main.glsl");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_nested_include_fails() {
    let fs = MemoryFileSystem::from_files([
        ("Shaders/Main.glsl", "#include \"A.glsl\""),
        ("Shaders/A.glsl", "#include \"B.glsl\""),
        ("Shaders/B.glsl", "#include \"Gone.glsl\""),
    ]);
    let deps = DependencyMap::new();

    let err = flatten_file(&fs, &deps, owner_id(), "Shaders/Main.glsl").unwrap_err();

    assert!(matches!(
        err,
        Error::IncludeNotFound { ref include, ref from }
            if include == "Shaders/Gone.glsl" && from == "Shaders/B.glsl"
    ));
}

#[test]
fn test_cyclic_include_hits_depth_limit() {
    let fs = MemoryFileSystem::from_files([
        ("Shaders/Ping.glsl", "#include \"Pong.glsl\""),
        ("Shaders/Pong.glsl", "#include \"Ping.glsl\""),
    ]);
    let deps = DependencyMap::new();
    let owner = owner_id();

    let source = fs.open("Shaders/Ping.glsl").unwrap();
    let err = IncludeResolver::new(owner, "Shaders/Ping.glsl", &fs, &deps)
        .with_max_depth(4)
        .flatten(&source)
        .unwrap_err();

    assert!(matches!(err, Error::IncludeDepthExceeded { depth: 4, .. }));
}

#[test]
fn test_depth_limit_allows_exact_depth() {
    let fs = MemoryFileSystem::from_files([
        ("Shaders/Main.glsl", "#include \"A.glsl\""),
        ("Shaders/A.glsl", "#include \"B.glsl\""),
        ("Shaders/B.glsl", "b"),
    ]);
    let deps = DependencyMap::new();
    let owner = owner_id();

    let source = fs.open("Shaders/Main.glsl").unwrap();
    let resolver = IncludeResolver::new(owner, "Shaders/Main.glsl", &fs, &deps);

    assert!(resolver.with_max_depth(2).flatten(&source).is_ok());

    let resolver = IncludeResolver::new(owner, "Shaders/Main.glsl", &fs, &deps);
    assert!(matches!(
        resolver.with_max_depth(1).flatten(&source),
        Err(Error::IncludeDepthExceeded { .. })
    ));
}

#[test]
fn test_non_utf8_source_fails() {
    let fs = MemoryFileSystem::new();
    fs.insert("Shaders/Main.glsl", "#include \"Bad.glsl\"".as_bytes().to_vec());
    fs.insert("Shaders/Bad.glsl", vec![0xff, 0xfe, 0x00]);
    let deps = DependencyMap::new();

    let err = flatten_file(&fs, &deps, owner_id(), "Shaders/Main.glsl").unwrap_err();

    assert!(matches!(err, Error::InvalidSource { .. }));
}

#[test]
fn test_default_max_depth() {
    assert_eq!(DEFAULT_MAX_INCLUDE_DEPTH, 64);
}
