//! Template loading with a compiled-program cache.
//!
//! A template `name` lives at `<template_dir>/<name>.<source_extension>`.
//! When caching is enabled its compiled form is written next to it as
//! `<name>.<compiled_extension>` and reused while it is at least as new as
//! the source. Compiled programs are also kept in memory per path.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::{
    ast::Program,
    compiler::compile_str,
    parser::ParseError,
};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Directory template names are resolved against
    pub template_dir: PathBuf,
    /// Read and write compiled programs on disk
    pub cache_enabled: bool,
    /// Extension of template sources, without the dot
    pub source_extension: String,
    /// Extension of compiled programs, without the dot
    pub compiled_extension: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            template_dir: PathBuf::from("./"),
            cache_enabled: true,
            source_extension: "html".to_string(),
            compiled_extension: "ctpl".to_string(),
        }
    }
}

impl EngineOptions {
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_extensions(mut self, source: &str, compiled: &str) -> Self {
        self.source_extension = source.to_string();
        self.compiled_extension = compiled.to_string();
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Error: template \"{0}\" not found")]
    NotFound(String),

    #[error("Error: {template}, {source}")]
    Compile {
        template: String,
        #[source]
        source: ParseError,
    },

    #[error("Error: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub struct TemplateEngine {
    options: EngineOptions,
    programs: HashMap<PathBuf, Arc<Program>>,
}

impl TemplateEngine {
    pub fn new(options: EngineOptions) -> Self {
        TemplateEngine {
            options,
            programs: HashMap::new(),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn source_path(&self, name: &str) -> PathBuf {
        self.options
            .template_dir
            .join(format!("{}.{}", name, self.options.source_extension))
    }

    pub fn compiled_path(&self, name: &str) -> PathBuf {
        self.options
            .template_dir
            .join(format!("{}.{}", name, self.options.compiled_extension))
    }

    /// Compiles a template source string without touching any cache.
    pub fn compile_str(&self, source: &str) -> Result<Program, ParseError> {
        compile_str(source)
    }

    /// Returns the compiled program for template `name`.
    ///
    /// Uses, in order: a fresh compiled file on disk, the in-memory program
    /// for the source path, and finally a new compilation of the source.
    pub fn compile(&mut self, name: &str) -> Result<Arc<Program>, EngineError> {
        let source_path = self.source_path(name);
        let compiled_path = self.compiled_path(name);

        if self.options.cache_enabled && compiled_path.exists() {
            if let Some(program) = self.load_fresh_compiled(&source_path, &compiled_path) {
                let program = Arc::new(program);
                self.programs.insert(source_path, Arc::clone(&program));
                return Ok(program);
            }
        }

        if !source_path.exists() {
            return Err(EngineError::NotFound(name.to_string()));
        }

        if let Some(program) = self.programs.get(&source_path) {
            debug!(template = name, "memory cache hit");
            return Ok(Arc::clone(program));
        }

        let source = fs::read_to_string(&source_path).map_err(|source| EngineError::Io {
            path: source_path.clone(),
            source,
        })?;
        let program = compile_str(&source).map_err(|source| EngineError::Compile {
            template: format!("{}.{}", name, self.options.source_extension),
            source,
        })?;
        debug!(template = name, items = program.items.len(), "compiled from source");

        if self.options.cache_enabled {
            self.store_compiled(&compiled_path, &program);
        }

        let program = Arc::new(program);
        self.programs.insert(source_path, Arc::clone(&program));
        Ok(program)
    }

    /// Drops every in-memory program.
    pub fn clear_memory_cache(&mut self) {
        self.programs.clear();
    }

    /// Loads the compiled file when it is at least as new as the source (or
    /// the source is gone). Unreadable or stale files yield `None`.
    fn load_fresh_compiled(&self, source_path: &Path, compiled_path: &Path) -> Option<Program> {
        if let Some(source_time) = modified(source_path) {
            let compiled_time = modified(compiled_path)?;
            if compiled_time < source_time {
                debug!(path = %compiled_path.display(), "compiled program is stale");
                return None;
            }
        }

        let json = match fs::read_to_string(compiled_path) {
            Ok(json) => json,
            Err(e) => {
                warn!(path = %compiled_path.display(), error = %e, "cannot read compiled program");
                return None;
            }
        };

        match Program::from_json_str(&json) {
            Ok(program) => {
                debug!(path = %compiled_path.display(), "disk cache hit");
                Some(program)
            }
            Err(e) => {
                warn!(path = %compiled_path.display(), error = %e, "ignoring undecodable compiled program");
                None
            }
        }
    }

    fn store_compiled(&self, compiled_path: &Path, program: &Program) {
        let written = program
            .to_json_string()
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(compiled_path, json).map_err(|e| e.to_string()));

        if let Err(e) = written {
            warn!(path = %compiled_path.display(), error = %e, "cannot write compiled program");
        }
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
