//! This module contains the OpenGL-facing components of the crate,
//! including the backend capability, shader sources, shader programs and uniforms.

pub mod backend;
#[cfg(test)]
pub(crate) mod mock;
pub mod shader;
pub mod source;
pub mod uniform;

pub use backend::*;
pub use shader::*;
pub use source::*;
pub use uniform::*;
