//! Shader sources and where they are read from.
//!
//! [`FileReader`] abstracts over the filesystem so programs can be built from disk
//! ([`FsReader`]), from text generated at runtime ([`MemoryReader`]) or from files
//! embedded in the binary ([`include_dir::Dir`], see [`BUILTIN_SHADERS`]).

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use include_dir::{Dir, include_dir};

use crate::error::ShaderError;

/// The shaders shipped with the crate, embedded at compile time.
pub static BUILTIN_SHADERS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/shaders");

/// Reads whole text files.
pub trait FileReader {
    fn read_text(&self, path: &Path) -> io::Result<String>;
}

impl<T: FileReader + ?Sized> FileReader for &T {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        (**self).read_text(path)
    }
}

/// Reads from the filesystem, optionally relative to a root directory.
#[derive(Debug, Clone, Default)]
pub struct FsReader {
    root: Option<PathBuf>,
}

impl FsReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths against `root`. Absolute paths are used as is.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl FileReader for FsReader {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        match &self.root {
            Some(root) => std::fs::read_to_string(root.join(path)),
            None => std::fs::read_to_string(path),
        }
    }
}

/// An in-memory set of files.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: HashMap<PathBuf, String>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    pub fn with(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }
}

impl FileReader for MemoryReader {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path.display()))
        })
    }
}

impl FileReader for Dir<'_> {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        let file = self.get_file(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no embedded file: {}", path.display()),
            )
        })?;
        file.contents_utf8().map(str::to_string).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("embedded file is not UTF-8: {}", path.display()),
            )
        })
    }
}

/// The text of a vertex and a fragment shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    vertex: String,
    fragment: String,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Reads both files, reporting every file that could not be read.
    pub fn read(
        reader: &impl FileReader,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<Self, Vec<ShaderError>> {
        let (source, errors) = Self::read_lenient(reader, vertex_path, fragment_path);
        if errors.is_empty() {
            Ok(source)
        } else {
            Err(errors)
        }
    }

    /// Reads both files. A file that could not be read is left empty and its error
    /// is returned alongside.
    pub fn read_lenient(
        reader: &impl FileReader,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> (Self, Vec<ShaderError>) {
        let mut errors = Vec::new();
        let mut read = |path: &Path| {
            reader.read_text(path).unwrap_or_else(|source| {
                errors.push(ShaderError::FileRead {
                    path: path.to_path_buf(),
                    source,
                });
                String::new()
            })
        };
        let vertex = read(vertex_path);
        let fragment = read(fragment_path);
        (Self { vertex, fragment }, errors)
    }

    pub fn vertex(&self) -> &str {
        &self.vertex
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}
