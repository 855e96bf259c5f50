//! OpenGL Shaders
//!
//! This module defines the [`ShaderStage`] and [`ShaderProgram`] structs for managing
//! OpenGL shaders. A program is built from a vertex and a fragment stage; the stages
//! are deleted as soon as the link has been attempted.
//!
//! Two load policies are offered. The strict entry points ([`ShaderProgram::load`],
//! [`ShaderProgram::from_sources`]) return every diagnostic as a [`LoadError`] and
//! never hand out a broken program. The lenient ones
//! ([`ShaderProgram::load_lenient`], [`ShaderProgram::from_sources_lenient`]) always
//! return the program together with its diagnostics; reporting them is left to the
//! caller, the library only logs them at debug level.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, warn};
use serde::Deserialize;

use super::{FileReader, GraphicsBackend, ShaderSource, Uniform};
use crate::error::{LoadError, ShaderError, StageKind};

/// Info logs are cut to this many bytes.
pub const INFO_LOG_LIMIT: usize = 1024;

fn truncate_log(mut log: String) -> String {
    if log.len() > INFO_LOG_LIMIT {
        let mut end = INFO_LOG_LIMIT;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    log
}

/// How a load reacts to diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Any diagnostic fails the load.
    #[default]
    Strict,
    /// The program is always returned together with its diagnostics.
    Lenient,
}

/// Represents an individual compiled OpenGL shader stage.
///
/// The stage object is deleted when this value is dropped.
pub struct ShaderStage<B: GraphicsBackend> {
    gl: Arc<B>,
    id: B::Shader,
    kind: StageKind,
}

impl<B: GraphicsBackend> ShaderStage<B> {
    /// Creates a stage and submits `source` to the compiler.
    ///
    /// Only failing to create the stage object is an error here; use [`check`](Self::check)
    /// for the compile status.
    pub fn compile(gl: &Arc<B>, kind: StageKind, source: &str) -> Result<Self, ShaderError> {
        let id = gl.create_shader(kind).map_err(ShaderError::Backend)?;
        let stage = Self {
            gl: Arc::clone(gl),
            id,
            kind,
        };
        gl.shader_source(id, source);
        gl.compile_shader(id);
        Ok(stage)
    }

    /// Returns the compiler's log if compilation failed.
    pub fn check(&self) -> Result<(), ShaderError> {
        if self.gl.shader_compile_status(self.id) {
            return Ok(());
        }
        Err(ShaderError::Compile {
            stage: self.kind,
            log: truncate_log(self.gl.shader_info_log(self.id)),
        })
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn handle(&self) -> B::Shader {
        self.id
    }
}

impl<B: GraphicsBackend> Drop for ShaderStage<B> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// A program returned by a lenient load, with whatever went wrong building it.
#[must_use]
pub struct Loaded<B: GraphicsBackend> {
    pub program: ShaderProgram<B>,
    pub diagnostics: Vec<ShaderError>,
}

impl<B: GraphicsBackend> Loaded<B> {
    fn new(program: ShaderProgram<B>, diagnostics: Vec<ShaderError>) -> Self {
        log_diagnostics(&diagnostics);
        Self {
            program,
            diagnostics,
        }
    }

    /// `true` when the program was built without any diagnostic.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

fn log_diagnostics(diagnostics: &[ShaderError]) {
    for diagnostic in diagnostics {
        debug!("[{}] {}", diagnostic.tag(), diagnostic);
    }
}

#[derive(Debug, Clone)]
struct SourcePaths {
    vertex: PathBuf,
    fragment: PathBuf,
}

/// Represents an OpenGL shader program linked from a vertex and a fragment stage.
///
/// The program object is deleted when this value is dropped.
pub struct ShaderProgram<B: GraphicsBackend> {
    gl: Arc<B>,
    id: B::Program,
    paths: Option<SourcePaths>,
}

impl<B: GraphicsBackend> ShaderProgram<B> {
    /// Reads, compiles and links a program, failing on any diagnostic.
    ///
    /// Unreadable files fail the load before anything is submitted to the backend.
    pub fn load(
        gl: &Arc<B>,
        reader: &impl FileReader,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, LoadError> {
        let (vertex_path, fragment_path) = (vertex_path.as_ref(), fragment_path.as_ref());
        let source =
            ShaderSource::read(reader, vertex_path, fragment_path).map_err(LoadError::new)?;
        let mut program = Self::from_sources(gl, &source)?;
        program.paths = Some(SourcePaths {
            vertex: vertex_path.to_path_buf(),
            fragment: fragment_path.to_path_buf(),
        });
        Ok(program)
    }

    /// Reads, compiles and links a program, returning it whatever happens.
    ///
    /// An unreadable file is reported and compiled as empty text. Only failing to
    /// create a backend object is an error.
    pub fn load_lenient(
        gl: &Arc<B>,
        reader: &impl FileReader,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Loaded<B>, ShaderError> {
        let (vertex_path, fragment_path) = (vertex_path.as_ref(), fragment_path.as_ref());
        let (source, diagnostics) =
            ShaderSource::read_lenient(reader, vertex_path, fragment_path);
        let mut loaded = Self::build_lenient(gl, &source, diagnostics)?;
        loaded.program.paths = Some(SourcePaths {
            vertex: vertex_path.to_path_buf(),
            fragment: fragment_path.to_path_buf(),
        });
        Ok(loaded)
    }

    /// Loads with the given policy. A strict load has no diagnostics on success.
    pub fn load_with(
        policy: LoadPolicy,
        gl: &Arc<B>,
        reader: &impl FileReader,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Loaded<B>, LoadError> {
        match policy {
            LoadPolicy::Strict => Ok(Loaded {
                program: Self::load(gl, reader, vertex_path, fragment_path)?,
                diagnostics: Vec::new(),
            }),
            LoadPolicy::Lenient => {
                Ok(Self::load_lenient(gl, reader, vertex_path, fragment_path)?)
            }
        }
    }

    /// Compiles and links in-memory sources, failing on any diagnostic.
    pub fn from_sources(gl: &Arc<B>, source: &ShaderSource) -> Result<Self, LoadError> {
        let mut diagnostics = Vec::new();
        match Self::build(gl, source, &mut diagnostics) {
            Ok(program) if diagnostics.is_empty() => Ok(program),
            Ok(_) => Err(LoadError::new(diagnostics)),
            Err(e) => {
                diagnostics.push(e);
                Err(LoadError::new(diagnostics))
            }
        }
    }

    /// Compiles and links in-memory sources, returning the program whatever happens.
    pub fn from_sources_lenient(
        gl: &Arc<B>,
        source: &ShaderSource,
    ) -> Result<Loaded<B>, ShaderError> {
        Self::build_lenient(gl, source, Vec::new())
    }

    fn build_lenient(
        gl: &Arc<B>,
        source: &ShaderSource,
        mut diagnostics: Vec<ShaderError>,
    ) -> Result<Loaded<B>, ShaderError> {
        match Self::build(gl, source, &mut diagnostics) {
            Ok(program) => Ok(Loaded::new(program, diagnostics)),
            Err(e) => {
                log_diagnostics(&diagnostics);
                Err(e)
            }
        }
    }

    /// Compiles both stages and links them. Compile and link failures are pushed to
    /// `diagnostics` and do not stop the build.
    fn build(
        gl: &Arc<B>,
        source: &ShaderSource,
        diagnostics: &mut Vec<ShaderError>,
    ) -> Result<Self, ShaderError> {
        let vertex = ShaderStage::compile(gl, StageKind::Vertex, source.vertex())?;
        Self::record(vertex.check(), vertex.kind(), diagnostics);
        let fragment = ShaderStage::compile(gl, StageKind::Fragment, source.fragment())?;
        Self::record(fragment.check(), fragment.kind(), diagnostics);

        let id = gl.create_program().map_err(ShaderError::Backend)?;
        let program = Self {
            gl: Arc::clone(gl),
            id,
            paths: None,
        };

        gl.attach_shader(id, vertex.handle());
        gl.attach_shader(id, fragment.handle());
        gl.link_program(id);

        if gl.program_link_status(id) {
            debug!("Linked shader program {id:?}");
        } else {
            diagnostics.push(ShaderError::Link {
                log: truncate_log(gl.program_info_log(id)),
            });
        }

        gl.detach_shader(id, vertex.handle());
        gl.detach_shader(id, fragment.handle());

        Ok(program)
    }

    fn record(result: Result<(), ShaderError>, kind: StageKind, diagnostics: &mut Vec<ShaderError>) {
        match result {
            Ok(()) => debug!("Compiled {kind} shader"),
            Err(e) => diagnostics.push(e),
        }
    }

    /// Re-reads the files this program was loaded from and rebuilds it strictly.
    ///
    /// On success the old program is deleted and replaced; it has to be activated
    /// again. On failure the current program is kept.
    pub fn reload(&mut self, reader: &impl FileReader) -> Result<(), LoadError> {
        let Some(paths) = self.paths.clone() else {
            return Err(ShaderError::NotReloadable.into());
        };
        match Self::load(&self.gl, reader, &paths.vertex, &paths.fragment) {
            Ok(fresh) => {
                debug!("Reloaded shader program from {:?}", paths.vertex);
                *self = fresh;
                Ok(())
            }
            Err(e) => {
                warn!("Keeping previous shader program: {e}");
                Err(e)
            }
        }
    }

    /// Binds the shader program for use.
    pub fn activate(&self) {
        self.gl.use_program(Some(self.id));
    }

    /// Sets a uniform variable in the shader program.
    ///
    /// Names that are not active uniforms of this program are ignored. On OpenGL 3.3
    /// the program has to be [active](Self::activate) for the value to land.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        if let Some(location) = self.gl.uniform_location(self.id, name) {
            value.apply(&*self.gl, &location);
        }
    }

    /// Asks the backend whether the last link succeeded.
    pub fn is_linked(&self) -> bool {
        self.gl.program_link_status(self.id)
    }

    /// The raw program handle, for calls made directly against the backend.
    pub fn handle(&self) -> B::Program {
        self.id
    }
}

impl<B: GraphicsBackend> Drop for ShaderProgram<B> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}

/// Builds a [`ShaderProgram`] from `<dir>/vert.glsl` and `<dir>/frag.glsl`, embedded
/// with `include_str!` relative to the invoking file. Evaluates to
/// `Result<ShaderProgram<_>, LoadError>`.
#[macro_export]
macro_rules! shader_program {
    ($gl:expr, $dir:literal) => {
        $crate::abs::ShaderProgram::from_sources(
            &$gl,
            &$crate::abs::ShaderSource::new(
                include_str!(concat!($dir, "/vert.glsl")),
                include_str!(concat!($dir, "/frag.glsl")),
            ),
        )
    };
}
