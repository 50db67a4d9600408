#![allow(unsafe_code)]

use glow::HasContext as _;

/// One programmable stage of the pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// The matching `GL_*_SHADER` enum.
    pub fn gl_enum(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// A backend object, tagged with its kind when it is created.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GlObject<S, P> {
    Shader(S),
    Program(P),
}

/// The calls the shader pipeline makes on the graphics backend.
///
/// Implemented for [`glow::Context`]. All calls must be made on the thread that owns the
/// current context.
pub trait ShaderBackend {
    type Shader: Copy + std::fmt::Debug;
    type Program: Copy + std::fmt::Debug;

    /// # Errors
    /// If the backend cannot allocate a new shader object.
    fn create_shader_object(&self, stage: ShaderStage) -> Result<Self::Shader, String>;

    /// Replace the source of `shader` with the concatenation of `sources`.
    fn set_shader_source(&self, shader: Self::Shader, sources: &[&str]);

    fn compile(&self, shader: Self::Shader);

    fn compile_status(&self, shader: Self::Shader) -> bool;

    fn delete_shader(&self, shader: Self::Shader);

    /// # Errors
    /// If the backend cannot allocate a new program object.
    fn create_program(&self) -> Result<Self::Program, String>;

    fn attach(&self, program: Self::Program, shader: Self::Shader);

    fn detach(&self, program: Self::Program, shader: Self::Shader);

    fn link(&self, program: Self::Program);

    fn link_status(&self, program: Self::Program) -> bool;

    fn delete_program(&self, program: Self::Program);

    /// `None` if the linked program has no active attribute called `name`.
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;

    fn is_shader(&self, shader: Self::Shader) -> bool;

    fn is_program(&self, program: Self::Program) -> bool;

    fn shader_info_log(&self, shader: Self::Shader) -> String;

    fn program_info_log(&self, program: Self::Program) -> String;
}

impl ShaderBackend for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;

    fn create_shader_object(&self, stage: ShaderStage) -> Result<glow::Shader, String> {
        unsafe { self.create_shader(stage.gl_enum()) }
    }

    fn set_shader_source(&self, shader: glow::Shader, sources: &[&str]) {
        // glow takes a single string, so the parts are joined here.
        unsafe { self.shader_source(shader, &sources.concat()) }
    }

    fn compile(&self, shader: glow::Shader) {
        unsafe { self.compile_shader(shader) }
    }

    fn compile_status(&self, shader: glow::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn delete_shader(&self, shader: glow::Shader) {
        unsafe { glow::HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { glow::HasContext::create_program(self) }
    }

    fn attach(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { self.attach_shader(program, shader) }
    }

    fn detach(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { self.detach_shader(program, shader) }
    }

    fn link(&self, program: glow::Program) {
        unsafe { self.link_program(program) }
    }

    fn link_status(&self, program: glow::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { glow::HasContext::delete_program(self, program) }
    }

    fn attrib_location(&self, program: glow::Program, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program, name) }
    }

    fn is_shader(&self, shader: glow::Shader) -> bool {
        unsafe { glow::HasContext::is_shader(self, shader) }
    }

    fn is_program(&self, program: glow::Program) -> bool {
        unsafe { glow::HasContext::is_program(self, program) }
    }

    fn shader_info_log(&self, shader: glow::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }
}
