/// Recursive `#include` expansion for shader sources.
///
/// Include targets resolve relative to the directory of the file containing
/// the directive. Every file read while flattening (other than the shader's
/// own file) is registered as a reload dependency of the owning resource.

use crate::error::{Error, Result};
use crate::io::{FileProvider, FileStream, parent_path};
use crate::resource::{DependencyTracker, ResourceId};

/// Default nesting limit for include chains
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

const INCLUDE_DIRECTIVE: &str = "#include";

/// Extract the target of an `#include` line
///
/// Accepts `#include "name"`, `#include <name>` and `#include name`.
/// Returns `None` for any other line.
pub fn parse_include_directive(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(INCLUDE_DIRECTIVE)?;

    // "#included_thing" is not a directive
    if let Some(c) = rest.chars().next() {
        if !(c.is_whitespace() || c == '"' || c == '<') {
            return None;
        }
    }

    Some(
        rest.trim()
            .trim_matches(|c| c == '"' || c == '<' || c == '>')
            .trim(),
    )
}

/// Flattens a shader source and all of its includes into one string
pub struct IncludeResolver<'a> {
    owner: ResourceId,
    owner_name: &'a str,
    files: &'a dyn FileProvider,
    dependencies: &'a dyn DependencyTracker,
    max_depth: usize,
}

impl<'a> IncludeResolver<'a> {
    /// Create a resolver for the resource `owner` named `owner_name`
    pub fn new(
        owner: ResourceId,
        owner_name: &'a str,
        files: &'a dyn FileProvider,
        dependencies: &'a dyn DependencyTracker,
    ) -> Self {
        Self {
            owner,
            owner_name,
            files,
            dependencies,
            max_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }

    /// Override the include nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand `source` and everything it includes
    ///
    /// Lines are copied verbatim, each followed by `\n`; every file (the root
    /// included) is followed by one blank separator line.
    ///
    /// # Errors
    ///
    /// - `Error::IncludeNotFound` if any include, at any depth, cannot be opened
    /// - `Error::IncludeDepthExceeded` if nesting exceeds the limit
    /// - `Error::InvalidSource` if a file is not UTF-8
    pub fn flatten(&self, source: &FileStream) -> Result<String> {
        let mut code = String::with_capacity(source.len() + 1);
        self.process_source(&mut code, source, 0)?;
        Ok(code)
    }

    fn process_source(&self, code: &mut String, source: &FileStream, depth: usize) -> Result<()> {
        // Store dependencies for includes so the owner reloads when any of them changes
        if source.name() != self.owner_name {
            self.dependencies.register_dependency(self.owner, source.name());
        }

        let text = source.text()
            .map_err(|e| crate::engine_err!("galaxy3d::IncludeResolver", e))?;

        for line in text.lines() {
            let Some(include) = parse_include_directive(line) else {
                code.push_str(line);
                code.push('\n');
                continue;
            };

            let include_name = format!("{}{}", parent_path(source.name()), include);

            if depth + 1 > self.max_depth {
                crate::engine_bail!("galaxy3d::IncludeResolver", Error::IncludeDepthExceeded {
                    include: include_name,
                    depth: self.max_depth,
                });
            }

            let include_file = self.files.open(&include_name)
                .map_err(|_| crate::engine_err!("galaxy3d::IncludeResolver", Error::IncludeNotFound {
                    include: include_name.clone(),
                    from: source.name().to_string(),
                }))?;

            crate::engine_trace!("galaxy3d::IncludeResolver",
                "'{}' includes '{}'", source.name(), include_name);

            self.process_source(code, &include_file, depth + 1)?;
        }

        // Blank line between files
        code.push('\n');

        Ok(())
    }
}

#[cfg(test)]
#[path = "include_resolver_tests.rs"]
mod tests;
