//! A recording, in-process [`GraphicsBackend`] for tests.
//!
//! The "compiler" only understands enough GLSL to accept well-formed sources and to
//! reject the usual typos: an empty source, a missing `#version` line, unbalanced
//! braces and a statement missing its semicolon before `}`. Uniforms are discovered
//! from `uniform <type> <name>;` declarations.

use std::{cell::RefCell, collections::HashMap};

use super::GraphicsBackend;
use crate::error::StageKind;

#[derive(Debug, Clone, PartialEq)]
pub enum MockValue {
    Int(Vec<i32>),
    Float(Vec<f32>),
}

#[derive(Debug)]
struct MockShader {
    kind: StageKind,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct MockProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<(String, Option<MockValue>)>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, MockShader>,
    programs: HashMap<u32, MockProgram>,
    deleted_shaders: Vec<u32>,
    deleted_programs: Vec<u32>,
    current: Option<u32>,
    calls: usize,
    invalid_operations: usize,
    fail_create_program: bool,
}

#[derive(Debug, Default)]
pub struct MockBackend {
    state: RefCell<State>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLocation {
    program: u32,
    index: usize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `create_program` call fail.
    pub fn fail_program_creation(&self) {
        self.state.borrow_mut().fail_create_program = true;
    }

    /// Number of backend calls made so far.
    pub fn calls(&self) -> usize {
        self.state.borrow().calls
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn deleted_shaders(&self) -> Vec<u32> {
        self.state.borrow().deleted_shaders.clone()
    }

    pub fn deleted_programs(&self) -> Vec<u32> {
        self.state.borrow().deleted_programs.clone()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().current
    }

    pub fn is_linked(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    /// Reads back the value last written to a uniform.
    pub fn uniform(&self, program: u32, name: &str) -> Option<MockValue> {
        let state = self.state.borrow();
        let program = state.programs.get(&program)?;
        program
            .uniforms
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.clone())
    }

    pub fn uniform_names(&self, program: u32) -> Vec<String> {
        let state = self.state.borrow();
        state
            .programs
            .get(&program)
            .map(|p| p.uniforms.iter().map(|(n, _)| n.clone()).collect())
            .unwrap_or_default()
    }

    fn tick(&self) -> std::cell::RefMut<'_, State> {
        let mut state = self.state.borrow_mut();
        state.calls += 1;
        state
    }

    /// Number of calls GL would have rejected with `GL_INVALID_OPERATION`.
    pub fn invalid_operations(&self) -> usize {
        self.state.borrow().invalid_operations
    }

    // glUniform* writes to the current program; a location from any other program
    // is rejected.
    fn write(&self, location: &MockLocation, value: MockValue) {
        let mut state = self.tick();
        if state.current != Some(location.program) {
            state.invalid_operations += 1;
            return;
        }
        let program = state
            .programs
            .get_mut(&location.program)
            .expect("uniform location of a deleted program");
        program.uniforms[location.index].1 = Some(value);
    }
}

fn check_glsl(source: &str) -> Result<(), String> {
    let trimmed = source.trim_start();
    if trimmed.is_empty() {
        return Err("0:1(1): error: syntax error, unexpected end of file".to_string());
    }
    if !trimmed.starts_with("#version") {
        return Err("0:1(1): error: missing #version directive".to_string());
    }

    let mut depth = 0i32;
    let mut previous = None;
    for (line_no, line) in source.lines().enumerate() {
        for c in line.chars() {
            match c {
                '{' => depth += 1,
                '}' => {
                    if !matches!(previous, Some(';' | '{' | '}')) {
                        return Err(format!(
                            "0:{}(1): error: syntax error, unexpected '}}', expecting ';'",
                            line_no + 1
                        ));
                    }
                    depth -= 1;
                    if depth < 0 {
                        return Err(format!("0:{}(1): error: unmatched '}}'", line_no + 1));
                    }
                }
                _ => {}
            }
            if !c.is_whitespace() {
                previous = Some(c);
            }
        }
    }
    if depth != 0 {
        return Err("0:1(1): error: syntax error, unexpected end of file".to_string());
    }
    Ok(())
}

fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .split(';')
        .filter_map(|statement| {
            let mut words = statement.split_whitespace();
            while let Some(word) = words.next() {
                if word == "uniform" {
                    let _ty = words.next()?;
                    return words.next().map(|name| name.to_string());
                }
            }
            None
        })
        .collect()
}

impl GraphicsBackend for MockBackend {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = MockLocation;

    fn create_shader(&self, kind: StageKind) -> Result<u32, String> {
        let mut state = self.tick();
        state.next_id += 1;
        let id = state.next_id;
        state.shaders.insert(
            id,
            MockShader {
                kind,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut state = self.tick();
        let shader = state.shaders.get_mut(&shader).expect("source for a deleted shader");
        shader.source = source.to_string();
    }

    fn compile_shader(&self, shader: u32) {
        let mut state = self.tick();
        let shader = state.shaders.get_mut(&shader).expect("compiling a deleted shader");
        match check_glsl(&shader.source) {
            Ok(()) => {
                shader.compiled = true;
                shader.log.clear();
            }
            Err(log) => {
                shader.compiled = false;
                shader.log = log;
            }
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.tick().shaders.get(&shader).is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.tick()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.tick();
        assert!(
            state.shaders.remove(&shader).is_some(),
            "shader {shader} deleted twice"
        );
        state.deleted_shaders.push(shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.tick();
        if state.fail_create_program {
            return Err("out of memory".to_string());
        }
        state.next_id += 1;
        let id = state.next_id;
        state.programs.insert(id, MockProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.tick();
        let program = state.programs.get_mut(&program).expect("attach to a deleted program");
        program.attached.push(shader);
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut state = self.tick();
        let program = state.programs.get_mut(&program).expect("detach from a deleted program");
        program.attached.retain(|&s| s != shader);
    }

    fn link_program(&self, program: u32) {
        let mut state = self.tick();
        let attached = state.programs[&program].attached.clone();

        let mut log = Vec::new();
        let mut uniforms = Vec::new();
        let mut kinds = Vec::new();
        for id in &attached {
            let shader = &state.shaders[id];
            if !shader.compiled {
                log.push(format!("error: {} shader {id} is not compiled", shader.kind));
            }
            kinds.push(shader.kind);
            for name in declared_uniforms(&shader.source) {
                if !uniforms.contains(&name) {
                    uniforms.push(name);
                }
            }
        }
        for kind in [StageKind::Vertex, StageKind::Fragment] {
            if !kinds.contains(&kind) {
                log.push(format!("error: no {kind} shader attached"));
            }
        }

        let program = state.programs.get_mut(&program).expect("linking a deleted program");
        program.linked = log.is_empty();
        program.log = log.join("\n");
        program.uniforms = if program.linked {
            uniforms.into_iter().map(|name| (name, None)).collect()
        } else {
            Vec::new()
        };
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.tick().programs.get(&program).is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.tick()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.tick();
        assert!(
            state.programs.remove(&program).is_some(),
            "program {program} deleted twice"
        );
        state.deleted_programs.push(program);
        if state.current == Some(program) {
            state.current = None;
        }
    }

    fn use_program(&self, program: Option<u32>) {
        let mut state = self.tick();
        if let Some(id) = program {
            if !state.programs.get(&id).is_some_and(|p| p.linked) {
                state.invalid_operations += 1;
                return;
            }
        }
        state.current = program;
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<MockLocation> {
        let state = self.tick();
        let index = state
            .programs
            .get(&program)?
            .uniforms
            .iter()
            .position(|(n, _)| n == name)?;
        Some(MockLocation { program, index })
    }

    fn uniform_1_i32(&self, location: &MockLocation, x: i32) {
        self.write(location, MockValue::Int(vec![x]));
    }

    fn uniform_1_f32(&self, location: &MockLocation, x: f32) {
        self.write(location, MockValue::Float(vec![x]));
    }

    fn uniform_2_f32(&self, location: &MockLocation, x: f32, y: f32) {
        self.write(location, MockValue::Float(vec![x, y]));
    }

    fn uniform_3_f32(&self, location: &MockLocation, x: f32, y: f32, z: f32) {
        self.write(location, MockValue::Float(vec![x, y, z]));
    }

    fn uniform_4_f32(&self, location: &MockLocation, x: f32, y: f32, z: f32, w: f32) {
        self.write(location, MockValue::Float(vec![x, y, z, w]));
    }

    fn uniform_3_i32(&self, location: &MockLocation, x: i32, y: i32, z: i32) {
        self.write(location, MockValue::Int(vec![x, y, z]));
    }

    fn uniform_3_f32_slice(&self, location: &MockLocation, values: &[f32]) {
        self.write(location, MockValue::Float(values.to_vec()));
    }

    fn uniform_matrix_4_f32_slice(&self, location: &MockLocation, values: &[f32]) {
        self.write(location, MockValue::Float(values.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_glsl() {
        assert!(check_glsl("#version 330 core\nvoid main(){gl_Position=vec4(0.0);}").is_ok());
        assert!(check_glsl("").is_err());
        assert!(check_glsl("void main(){}").is_err());
        assert!(check_glsl("#version 330 core\nvoid main(){FragColor=vec4(1.0)}").is_err());
        assert!(check_glsl("#version 330 core\nvoid main(){x=1;").is_err());
    }

    #[test]
    fn test_declared_uniforms() {
        let source = "#version 330 core\nuniform vec4 ourColor;\nuniform sampler2D texture1;\nout vec4 FragColor;";
        assert_eq!(declared_uniforms(source), vec!["ourColor", "texture1"]);
    }
}
