use std::path::Path;

use crate::{
    LinkError, LinkedProgram, SetupError, ShaderBackend, ShaderStage, TargetPlatform,
    compile_shader, link_program, load_text,
};

/// Where a [`ShaderPipeline`] is in its single run from files to a usable program.
///
/// `Ready` and `Failed` are terminal. Nothing is retried: once `Failed`, the caller is expected
/// to give up on rendering.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Unloaded,
    SourceLoaded,
    Compiled,
    Linked,
    Ready,
    Failed,
}

impl PipelineState {
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unloaded, Self::SourceLoaded)
                | (Self::SourceLoaded, Self::Compiled)
                | (Self::Compiled, Self::Linked)
                | (Self::Linked, Self::Ready)
                | (
                    Self::Unloaded | Self::SourceLoaded | Self::Compiled | Self::Linked,
                    Self::Failed
                )
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// Loads, compiles and links the vertex/fragment pair, tracking [`PipelineState`] as it goes.
pub struct ShaderPipeline<'gl, B: ShaderBackend + ?Sized> {
    gl: &'gl B,
    target: TargetPlatform,
    state: PipelineState,
}

impl<'gl, B: ShaderBackend + ?Sized> ShaderPipeline<'gl, B> {
    pub fn new(gl: &'gl B, target: TargetPlatform) -> Self {
        Self {
            gl,
            target,
            state: PipelineState::Unloaded,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn target(&self) -> TargetPlatform {
        self.target
    }

    /// Run the whole pipeline once.
    ///
    /// Both files are read before anything is compiled. Every backend object created on the way
    /// is deleted again on failure, and the shader objects are deleted on success too:
    /// only the returned program stays alive.
    ///
    /// # Errors
    /// The first error hit, after which the pipeline is in [`PipelineState::Failed`].
    pub fn build(
        &mut self,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<LinkedProgram<B::Program>, SetupError> {
        debug_assert_eq!(
            self.state,
            PipelineState::Unloaded,
            "a shader pipeline is only built once"
        );

        let vertex_source = load_text(vertex_path).map_err(|err| self.fail(err))?;
        let fragment_source = load_text(fragment_path).map_err(|err| self.fail(err))?;
        self.advance(PipelineState::SourceLoaded);

        let vertex = compile_shader(self.gl, self.target, vertex_source, ShaderStage::Vertex)
            .map_err(|err| self.fail(err))?;
        let fragment =
            match compile_shader(self.gl, self.target, fragment_source, ShaderStage::Fragment) {
                Ok(fragment) => fragment,
                Err(err) => {
                    self.gl.delete_shader(vertex.raw);
                    return Err(self.fail(err));
                }
            };
        self.advance(PipelineState::Compiled);

        match link_program(self.gl, vertex, fragment) {
            Ok(program) => {
                self.advance(PipelineState::Linked);
                self.advance(PipelineState::Ready);
                Ok(program)
            }
            Err(err @ LinkError::MissingAttribute { .. }) => {
                self.advance(PipelineState::Linked);
                Err(self.fail(err))
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "bad shader pipeline transition {:?} -> {next:?}",
            self.state
        );
        log::debug!("Shader pipeline: {:?} -> {next:?}", self.state);
        self.state = next;
    }

    fn fail(&mut self, err: impl Into<SetupError>) -> SetupError {
        self.advance(PipelineState::Failed);
        err.into()
    }
}

/// Build a program from the two shader files in one go.
///
/// # Errors
/// See [`ShaderPipeline::build`].
pub fn build_program<B: ShaderBackend + ?Sized>(
    gl: &B,
    target: TargetPlatform,
    vertex_path: &Path,
    fragment_path: &Path,
) -> Result<LinkedProgram<B::Program>, SetupError> {
    ShaderPipeline::new(gl, target).build(vertex_path, fragment_path)
}
