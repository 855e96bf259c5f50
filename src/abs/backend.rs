//! The graphics backend capability.
//!
//! [`GraphicsBackend`] is the narrow slice of the OpenGL 3.3 core API that shader
//! programs need. It is implemented for [`glow::Context`]; tests use an in-process
//! recording backend instead.

use std::fmt::Debug;

use glow::HasContext;

use crate::error::StageKind;

/// The OpenGL calls needed to build shader programs and feed them uniforms.
///
/// Handles are plain copyable identifiers; ownership of the objects behind them
/// is tracked by [`ShaderStage`](super::ShaderStage) and
/// [`ShaderProgram`](super::ShaderProgram).
///
/// The "current program" slot is global backend state: [`use_program`](Self::use_program)
/// replaces whatever program was current before.
pub trait GraphicsBackend {
    type Shader: Copy + Debug;
    type Program: Copy + Debug + PartialEq;
    type UniformLocation: Debug;

    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);

    /// Looks up an active uniform. `None` when the program has no active uniform
    /// with that name.
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;

    fn uniform_1_i32(&self, location: &Self::UniformLocation, x: i32);
    fn uniform_1_f32(&self, location: &Self::UniformLocation, x: f32);
    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32);
    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32);
    fn uniform_4_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32, w: f32);
    fn uniform_3_i32(&self, location: &Self::UniformLocation, x: i32, y: i32, z: i32);
    fn uniform_3_f32_slice(&self, location: &Self::UniformLocation, values: &[f32]);
    /// Column-major 4x4 matrix.
    fn uniform_matrix_4_f32_slice(&self, location: &Self::UniformLocation, values: &[f32]);
}

// Every method below requires the context to be current on the calling thread.
impl GraphicsBackend for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, kind.gl_enum()) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn uniform_1_i32(&self, location: &Self::UniformLocation, x: i32) {
        unsafe { HasContext::uniform_1_i32(self, Some(location), x) }
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, x: f32) {
        unsafe { HasContext::uniform_1_f32(self, Some(location), x) }
    }

    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32) {
        unsafe { HasContext::uniform_2_f32(self, Some(location), x, y) }
    }

    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32) {
        unsafe { HasContext::uniform_3_f32(self, Some(location), x, y, z) }
    }

    fn uniform_4_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        unsafe { HasContext::uniform_4_f32(self, Some(location), x, y, z, w) }
    }

    fn uniform_3_i32(&self, location: &Self::UniformLocation, x: i32, y: i32, z: i32) {
        unsafe { HasContext::uniform_3_i32(self, Some(location), x, y, z) }
    }

    fn uniform_3_f32_slice(&self, location: &Self::UniformLocation, values: &[f32]) {
        unsafe { HasContext::uniform_3_f32_slice(self, Some(location), values) }
    }

    fn uniform_matrix_4_f32_slice(&self, location: &Self::UniformLocation, values: &[f32]) {
        unsafe { HasContext::uniform_matrix_4_f32_slice(self, Some(location), false, values) }
    }
}
