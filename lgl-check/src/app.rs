//! SDL2 and OpenGL context management.
//!
//! This module defines the [`GlContext`] struct which owns a hidden SDL2 window and
//! the OpenGL 3.3 core context created for it. Nothing is ever drawn to the window.

use std::sync::Arc;

use glow::HasContext;
use log::info;

/// A current OpenGL context backed by a hidden window.
pub struct GlContext {
    // Declared first so the loader is dropped before the context it points into.
    pub gl: Arc<glow::Context>,
    _gl_context: sdl2::video::GLContext,
    _window: sdl2::video::Window,
    _video_subsystem: sdl2::VideoSubsystem,
    _sdl: sdl2::Sdl,
}

impl GlContext {
    /// Creates a hidden window and makes its OpenGL 3.3 core context current.
    pub fn hidden(title: &str) -> Result<Self, String> {
        let sdl = sdl2::init()?;
        let video_subsystem = sdl.video()?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);

        let window = video_subsystem
            .window(title, 1, 1)
            .opengl()
            .hidden()
            .build()
            .map_err(|e| e.to_string())?;
        let gl_context = window.gl_create_context()?;
        window.gl_make_current(&gl_context)?;

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        info!("Using OpenGL {}", unsafe {
            gl.get_parameter_string(glow::VERSION)
        });

        Ok(Self {
            gl: Arc::new(gl),
            _gl_context: gl_context,
            _window: window,
            _video_subsystem: video_subsystem,
            _sdl: sdl,
        })
    }
}
