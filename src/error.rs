//! Errors produced while loading shader programs.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// The two programmable stages a [`ShaderProgram`](crate::abs::ShaderProgram) is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    /// The tag diagnostics for this stage carry.
    pub fn tag(self) -> &'static str {
        match self {
            StageKind::Vertex => "VERTEX",
            StageKind::Fragment => "FRAGMENT",
        }
    }

    /// The OpenGL enum naming this stage.
    pub fn gl_enum(self) -> u32 {
        match self {
            StageKind::Vertex => glow::VERTEX_SHADER,
            StageKind::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single problem found while turning shader files into a program.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: StageKind, log: String },
    #[error("PROGRAM failed to link:\n{log}")]
    Link { log: String },
    #[error("graphics backend error: {0}")]
    Backend(String),
    #[error("program was not loaded from files and cannot be reloaded")]
    NotReloadable,
}

impl ShaderError {
    /// Short tag naming the phase the error came from.
    pub fn tag(&self) -> &'static str {
        match self {
            ShaderError::FileRead { .. } => "FILE",
            ShaderError::Compile { stage, .. } => stage.tag(),
            ShaderError::Link { .. } | ShaderError::NotReloadable => "PROGRAM",
            ShaderError::Backend(_) => "BACKEND",
        }
    }
}

/// Every diagnostic a strict load ran into.
#[derive(Debug, Error)]
#[error("shader program failed to load: {}", summary(.diagnostics))]
pub struct LoadError {
    diagnostics: Vec<ShaderError>,
}

fn summary(diagnostics: &[ShaderError]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl LoadError {
    pub(crate) fn new(diagnostics: Vec<ShaderError>) -> Self {
        debug_assert!(!diagnostics.is_empty());
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[ShaderError] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<ShaderError> {
        self.diagnostics
    }
}

impl From<ShaderError> for LoadError {
    fn from(error: ShaderError) -> Self {
        Self::new(vec![error])
    }
}
