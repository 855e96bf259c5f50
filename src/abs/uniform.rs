//! Values that can be written to shader uniforms.

use glam::{IVec3, Mat4, Vec2, Vec3, Vec4};

use super::GraphicsBackend;

/// A value that can be written to a uniform variable.
///
/// The location has already been looked up by the caller; implementations only pick
/// the matching `glUniform*` call.
pub trait Uniform {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation);
}

impl Uniform for bool {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation) {
        gl.uniform_1_i32(location, *self as i32);
    }
}

impl Uniform for i32 {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation) {
        gl.uniform_1_i32(location, *self);
    }
}

impl Uniform for f32 {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation) {
        gl.uniform_1_f32(location, *self);
    }
}

impl Uniform for Vec2 {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation) {
        gl.uniform_2_f32(location, self.x, self.y);
    }
}

impl Uniform for Vec3 {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation) {
        gl.uniform_3_f32(location, self.x, self.y, self.z);
    }
}

impl Uniform for IVec3 {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation) {
        gl.uniform_3_i32(location, self.x, self.y, self.z);
    }
}

impl Uniform for Vec4 {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation) {
        gl.uniform_4_f32(location, self.x, self.y, self.z, self.w);
    }
}

impl Uniform for Mat4 {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation) {
        gl.uniform_matrix_4_f32_slice(location, &self.to_cols_array());
    }
}

impl<const N: usize> Uniform for [Vec3; N] {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation) {
        let mut data = Vec::with_capacity(N * 3);
        for vec in self.iter() {
            data.extend_from_slice(&vec.to_array());
        }
        gl.uniform_3_f32_slice(location, &data);
    }
}

impl<T: Uniform + ?Sized> Uniform for &T {
    fn apply<B: GraphicsBackend>(&self, gl: &B, location: &B::UniformLocation) {
        (**self).apply(gl, location);
    }
}
