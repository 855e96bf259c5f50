//! Shader manifests.
//!
//! A manifest is a JSON file naming a set of shader programs, the policy to load them
//! with and initial values for their uniforms:
//!
//! ```json
//! {
//!   "policy": "lenient",
//!   "programs": {
//!     "uniform": {
//!       "vertex": "uniform/vert.glsl",
//!       "fragment": "uniform/frag.glsl",
//!       "uniforms": { "tint": [0.0, 1.0, 0.0, 1.0], "useTint": true }
//!     }
//!   }
//! }
//! ```
//!
//! Shader paths are resolved by the [`FileReader`] the manifest is loaded with,
//! normally one rooted at the manifest's directory.

use std::{io, path::Path, path::PathBuf, sync::Arc};

use glam::{Mat4, Vec2, Vec3, Vec4};
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    abs::{BUILTIN_SHADERS, FileReader, GraphicsBackend, LoadPolicy, Loaded, ShaderProgram, Uniform},
    error::LoadError,
};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A uniform value as written in a manifest.
///
/// JSON booleans map to `bool` and bare numbers to `float`, whether or not they carry
/// a fraction. Arrays of 2, 3, 4 and 16 numbers map to vectors and a column-major
/// matrix. `int` uniforms and samplers have to be spelled `{ "int": 0 }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawUniformValue")]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct IntForm {
    int: i32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUniformValue {
    Bool(bool),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
    Int(IntForm),
}

impl From<RawUniformValue> for UniformValue {
    fn from(raw: RawUniformValue) -> Self {
        match raw {
            RawUniformValue::Bool(v) => UniformValue::Bool(v),
            RawUniformValue::Float(v) => UniformValue::Float(v),
            RawUniformValue::Vec2(v) => UniformValue::Vec2(v),
            RawUniformValue::Vec3(v) => UniformValue::Vec3(v),
            RawUniformValue::Vec4(v) => UniformValue::Vec4(v),
            RawUniformValue::Mat4(v) => UniformValue::Mat4(v),
            RawUniformValue::Int(IntForm { int }) => UniformValue::Int(int),
        }
    }
}

impl Uniform for UniformValue {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation) {
        match self {
            UniformValue::Bool(v) => v.apply(gl, location),
            UniformValue::Int(v) => v.apply(gl, location),
            UniformValue::Float(v) => v.apply(gl, location),
            UniformValue::Vec2(v) => Vec2::from_array(*v).apply(gl, location),
            UniformValue::Vec3(v) => Vec3::from_array(*v).apply(gl, location),
            UniformValue::Vec4(v) => Vec4::from_array(*v).apply(gl, location),
            UniformValue::Mat4(v) => Mat4::from_cols_array(v).apply(gl, location),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramEntry {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
    #[serde(default)]
    pub uniforms: IndexMap<String, UniformValue>,
}

impl ProgramEntry {
    /// Loads the program and, if it linked, writes its initial uniforms.
    ///
    /// Writing uniforms leaves the program active. A lenient load that failed to link
    /// is returned untouched.
    pub fn load<B: GraphicsBackend>(
        &self,
        policy: LoadPolicy,
        gl: &Arc<B>,
        reader: &impl FileReader,
    ) -> Result<Loaded<B>, LoadError> {
        let loaded = ShaderProgram::load_with(policy, gl, reader, &self.vertex, &self.fragment)?;
        if !self.uniforms.is_empty() && loaded.program.is_linked() {
            loaded.program.activate();
            for (name, value) in &self.uniforms {
                loaded.program.set_uniform(name, value);
            }
        }
        Ok(loaded)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub policy: LoadPolicy,
    pub programs: IndexMap<String, ProgramEntry>,
}

impl Manifest {
    pub fn from_json(s: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn read(reader: &impl FileReader, path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = reader.read_text(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// The manifest describing [`BUILTIN_SHADERS`].
    pub fn builtin() -> Result<Self, ManifestError> {
        Self::read(&BUILTIN_SHADERS, "manifest.json")
    }

    /// Loads every program in manifest order.
    pub fn load_all<B: GraphicsBackend>(
        &self,
        policy: LoadPolicy,
        gl: &Arc<B>,
        reader: &impl FileReader,
    ) -> IndexMap<String, Result<Loaded<B>, LoadError>> {
        self.programs
            .iter()
            .map(|(name, entry)| (name.clone(), entry.load(policy, gl, reader)))
            .collect()
    }
}
