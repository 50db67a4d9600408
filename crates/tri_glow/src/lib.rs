//! Load, compile and link the shaders of a single-triangle renderer, using [`glow`](https://github.com/grovesNL/glow).
//!
//! The core is [`ShaderPipeline`]: it reads the vertex and fragment sources with [`load_text`],
//! compiles them with [`compile_shader`] (prefixing the [`TargetPlatform`] preamble), links them
//! with [`link_program`] and looks up the `coord2d` attribute. All of it is written against
//! [`ShaderBackend`], which is implemented for [`glow::Context`].
//!
//! [`TriangleSession`] then owns the resulting program and vertex buffer and draws a frame.

#![expect(clippy::undocumented_unsafe_blocks)]

mod backend;
mod error;
mod pipeline;
pub mod session;
mod shader;
mod source;
mod target;

pub use glow;

pub use backend::{GlObject, ShaderBackend, ShaderStage};
pub use error::{CompileError, IoError, LinkError, SetupError};
pub use pipeline::{PipelineState, ShaderPipeline, build_program};
pub use session::{SessionError, TriangleSession};
pub use shader::{COORD2D, CompiledShader, LinkedProgram, compile_shader, fetch_log, link_program};
pub use source::{SourceBuffer, load_text};
pub use target::{ParseTargetError, ShaderVersion, TargetPlatform};

/// Check for OpenGL error and report it using `log::error`.
///
/// Only active in debug builds!
///
/// ``` no_run
/// # let glow_context = todo!();
/// use tri_glow::check_for_gl_error;
/// check_for_gl_error!(glow_context);
/// check_for_gl_error!(glow_context, "during painting");
/// ```
#[macro_export]
macro_rules! check_for_gl_error {
    ($gl: expr) => {{
        if cfg!(debug_assertions) {
            $crate::check_for_gl_error_impl($gl, file!(), line!(), "")
        }
    }};
    ($gl: expr, $context: literal) => {{
        if cfg!(debug_assertions) {
            $crate::check_for_gl_error_impl($gl, file!(), line!(), $context)
        }
    }};
}

#[doc(hidden)]
pub fn check_for_gl_error_impl(gl: &glow::Context, file: &str, line: u32, context: &str) {
    use glow::HasContext as _;
    #[expect(unsafe_code)]
    let error_code = unsafe { gl.get_error() };
    if error_code != glow::NO_ERROR {
        let error_str = match error_code {
            glow::INVALID_ENUM => "GL_INVALID_ENUM",
            glow::INVALID_VALUE => "GL_INVALID_VALUE",
            glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
            glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
            glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
            glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
            glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
            glow::CONTEXT_LOST => "GL_CONTEXT_LOST",
            _ => "<unknown>",
        };

        if context.is_empty() {
            log::error!("GL error, at {file}:{line}: {error_str} (0x{error_code:X})");
        } else {
            log::error!("GL error, at {file}:{line} ({context}): {error_str} (0x{error_code:X})");
        }
    }
}
