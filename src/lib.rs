//! Shader program loading for OpenGL 3.3 core contexts.
//!
//! The crate wraps the "read two GLSL files, compile them, link them, set
//! uniforms" routine every OpenGL program starts with. The graphics API is
//! reached only through the [`GraphicsBackend`](abs::GraphicsBackend)
//! capability, implemented for [`glow::Context`], and files only through the
//! [`FileReader`](abs::FileReader) capability.
//!
//! Problems never abort the host. A strict load hands every diagnostic back
//! as a [`LoadError`]; a lenient load returns the program anyway and logs
//! what went wrong.

pub mod abs;
pub mod error;
pub mod manifest;

pub use abs::*;
pub use error::*;
pub use manifest::*;
