//! A [`ShaderBackend`] that needs no GPU.
//!
//! "Compiling" runs a tiny line checker that knows just enough GLSL for the test shaders:
//! every statement line must end in `;`, `{` or `}`, and there must be a `main`.
//! Linking needs exactly one compiled vertex and one compiled fragment shader.
//! Attributes are whatever the vertex source declares with `attribute` or `in`.

#![allow(dead_code)] // not every test file uses every helper

use std::{cell::RefCell, collections::BTreeMap, io::Write as _, path::PathBuf};

use tri_glow::{ShaderBackend, ShaderStage};

#[derive(Debug)]
struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct FakeProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    attributes: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    out_of_objects: bool,
    next_id: u32,
    shaders: BTreeMap<u32, FakeShader>,
    programs: BTreeMap<u32, FakeProgram>,
}

#[derive(Debug, Default)]
pub struct FakeGl {
    state: RefCell<State>,
}

impl FakeGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// From now on, refuse to create shader and program objects.
    pub fn run_out_of_objects(&self) {
        self.state.borrow_mut().out_of_objects = true;
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    /// The full text handed to the shader, preamble included.
    pub fn source_of(&self, shader: u32) -> Option<String> {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|shader| shader.source.clone())
    }
}

fn check_syntax(source: &str) -> Result<(), String> {
    let mut errors = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line = line.trim();
        let ok = line.is_empty()
            || line.starts_with('#')
            || line.starts_with("//")
            || line.ends_with(';')
            || line.ends_with('{')
            || line.ends_with('}');
        if !ok {
            errors.push(format!(
                "0:{}: error: syntax error, unexpected end of line, expecting ';'",
                index + 1
            ));
        }
    }
    if !source.contains("void main") {
        errors.push("0:0: error: missing main function".to_owned());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("\n"))
    }
}

fn declared_attributes(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("attribute ") || line.starts_with("in "))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(ToOwned::to_owned)
        .collect()
}

impl ShaderBackend for FakeGl {
    type Shader = u32;
    type Program = u32;

    fn create_shader_object(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if state.out_of_objects {
            return Err("out of shader objects".to_owned());
        }
        state.next_id += 1;
        let id = state.next_id;
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        Ok(id)
    }

    fn set_shader_source(&self, shader: u32, sources: &[&str]) {
        if let Some(shader) = self.state.borrow_mut().shaders.get_mut(&shader) {
            shader.source = sources.concat();
        }
    }

    fn compile(&self, shader: u32) {
        if let Some(shader) = self.state.borrow_mut().shaders.get_mut(&shader) {
            match check_syntax(&shader.source) {
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
    }

    fn compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|shader| shader.compiled)
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        let attached = state
            .programs
            .values()
            .any(|program| program.attached.contains(&shader));
        assert!(!attached, "deleting shader {shader} while still attached");
        state.shaders.remove(&shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if state.out_of_objects {
            return Err("out of program objects".to_owned());
        }
        state.next_id += 1;
        let id = state.next_id;
        state.programs.insert(id, FakeProgram::default());
        Ok(id)
    }

    fn attach(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.shaders.contains_key(&shader),
            "attaching unknown shader {shader}"
        );
        if let Some(program) = state.programs.get_mut(&program) {
            program.attached.push(shader);
        }
    }

    fn detach(&self, program: u32, shader: u32) {
        if let Some(program) = self.state.borrow_mut().programs.get_mut(&program) {
            program.attached.retain(|&attached| attached != shader);
        }
    }

    fn link(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let State {
            shaders, programs, ..
        } = &mut *state;
        let Some(program) = programs.get_mut(&program) else {
            return;
        };

        let attached: Vec<&FakeShader> = program
            .attached
            .iter()
            .filter_map(|id| shaders.get(id))
            .collect();
        let count = |stage: ShaderStage| attached.iter().filter(|s| s.stage == stage).count();

        program.log.clear();
        if attached.iter().any(|shader| !shader.compiled) {
            program.log = "error: attached shader is not compiled".to_owned();
        } else if count(ShaderStage::Vertex) != 1 {
            program.log = "error: exactly one vertex shader must be attached".to_owned();
        } else if count(ShaderStage::Fragment) != 1 {
            program.log = "error: exactly one fragment shader must be attached".to_owned();
        }

        program.linked = program.log.is_empty();
        program.attributes = if program.linked {
            attached
                .iter()
                .filter(|shader| shader.stage == ShaderStage::Vertex)
                .flat_map(|shader| declared_attributes(&shader.source))
                .collect()
        } else {
            Vec::new()
        };
    }

    fn link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|program| program.linked)
    }

    fn delete_program(&self, program: u32) {
        self.state.borrow_mut().programs.remove(&program);
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let program = state.programs.get(&program)?;
        let index = program.attributes.iter().position(|a| a == name)?;
        u32::try_from(index).ok()
    }

    fn is_shader(&self, shader: u32) -> bool {
        self.state.borrow().shaders.contains_key(&shader)
    }

    fn is_program(&self, program: u32) -> bool {
        self.state.borrow().programs.contains_key(&program)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|shader| shader.log.clone())
            .unwrap_or_default()
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|program| program.log.clone())
            .unwrap_or_default()
    }
}

// ----------------------------------------------------------------------------

pub const VERTEX_SOURCE: &str = "\
attribute vec2 coord2d;
void main(void) {
  gl_Position = vec4(coord2d, 0.0, 1.0);
}
";

pub const FRAGMENT_SOURCE: &str = "\
#ifdef GLES2
precision mediump float;
#endif
void main(void) {
  gl_FragColor = vec4(0.0, 0.0, 1.0, 1.0);
}
";

/// Same as [`VERTEX_SOURCE`], minus one semicolon.
pub const BROKEN_VERTEX_SOURCE: &str = "\
attribute vec2 coord2d;
void main(void) {
  gl_Position = vec4(coord2d, 0.0, 1.0)
}
";

/// Compiles and links, but names its input something else.
pub const NO_COORD2D_VERTEX_SOURCE: &str = "\
attribute vec2 position;
void main(void) {
  gl_Position = vec4(position, 0.0, 1.0);
}
";

/// Shader files on disk for the duration of a test.
pub struct ShaderDir {
    dir: tempfile::TempDir,
}

impl ShaderDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
