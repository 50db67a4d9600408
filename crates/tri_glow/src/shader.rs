use crate::{
    CompileError, GlObject, LinkError, ShaderBackend, ShaderStage, SourceBuffer, TargetPlatform,
};

/// The per-vertex input every program must declare.
pub const COORD2D: &str = "coord2d";

/// A shader object that compiled successfully.
///
/// Consumed by [`link_program`], which deletes it.
#[derive(Debug, PartialEq, Eq)]
pub struct CompiledShader<S> {
    pub raw: S,
    pub stage: ShaderStage,
}

/// A linked program, ready to draw with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinkedProgram<P> {
    pub raw: P,

    /// Location of the [`COORD2D`] attribute.
    pub coord2d: u32,
}

/// Compile `source` as a `stage` shader, with the `target` preamble in front of it.
///
/// The source buffer is consumed. On failure the info log is reported together with the
/// path of the source file, and the shader object is deleted.
///
/// # Errors
/// [`CompileError::Failed`] if the backend rejects the source.
pub fn compile_shader<B: ShaderBackend + ?Sized>(
    gl: &B,
    target: TargetPlatform,
    source: SourceBuffer,
    stage: ShaderStage,
) -> Result<CompiledShader<B::Shader>, CompileError> {
    let path = source.path().to_owned();

    let shader = gl
        .create_shader_object(stage)
        .map_err(|log| CompileError::Failed {
            path: path.clone(),
            stage,
            log,
        })?;

    gl.set_shader_source(shader, &[target.preamble(), &*source.text()]);
    drop(source);

    gl.compile(shader);

    if gl.compile_status(shader) {
        log::debug!("Compiled {stage} shader {}", path.display());
        Ok(CompiledShader { raw: shader, stage })
    } else {
        let log = fetch_log(gl, GlObject::Shader(shader)).unwrap_or_default();
        log::error!("{}: {log}", path.display());
        gl.delete_shader(shader);
        Err(CompileError::Failed { path, stage, log })
    }
}

/// Link a vertex and a fragment shader into a program and look up [`COORD2D`].
///
/// Stages are not checked here; a mismatched pair is left for the backend to refuse.
///
/// Both shaders are detached and deleted afterwards, whatever the outcome.
/// On failure the program is deleted too.
///
/// # Errors
/// [`LinkError::Failed`] if the backend refuses to link,
/// [`LinkError::MissingAttribute`] if the program has no active `coord2d` attribute.
pub fn link_program<B: ShaderBackend + ?Sized>(
    gl: &B,
    vertex: CompiledShader<B::Shader>,
    fragment: CompiledShader<B::Shader>,
) -> Result<LinkedProgram<B::Program>, LinkError> {
    let shaders = [vertex.raw, fragment.raw];
    let delete_shaders = |program: Option<B::Program>| {
        for shader in shaders {
            if let Some(program) = program {
                gl.detach(program, shader);
            }
            gl.delete_shader(shader);
        }
    };

    let program = match gl.create_program() {
        Ok(program) => program,
        Err(log) => {
            log::error!("glCreateProgram: {log}");
            delete_shaders(None);
            return Err(LinkError::Failed { log });
        }
    };

    for shader in shaders {
        gl.attach(program, shader);
    }
    gl.link(program);
    let linked = gl.link_status(program);

    let result = if linked {
        match gl.attrib_location(program, COORD2D) {
            Some(coord2d) => Ok(LinkedProgram {
                raw: program,
                coord2d,
            }),
            None => {
                log::error!("Could not bind attribute {COORD2D}");
                Err(LinkError::MissingAttribute {
                    name: COORD2D.to_owned(),
                })
            }
        }
    } else {
        let log = fetch_log(gl, GlObject::Program(program)).unwrap_or_default();
        log::error!("glLinkProgram: {log}");
        Err(LinkError::Failed { log })
    };

    delete_shaders(Some(program));
    if result.is_err() {
        gl.delete_program(program);
    }
    result
}

/// Fetch the info log of a shader or a program.
///
/// The handle is checked against the backend before the log is read, so a handle that has
/// already been deleted is reported instead of read.
///
/// # Errors
/// [`CompileError::InvalidObject`] if the backend does not recognise the object.
pub fn fetch_log<B: ShaderBackend + ?Sized>(
    gl: &B,
    object: GlObject<B::Shader, B::Program>,
) -> Result<String, CompileError> {
    match object {
        GlObject::Shader(shader) if gl.is_shader(shader) => Ok(gl.shader_info_log(shader)),
        GlObject::Program(program) if gl.is_program(program) => {
            Ok(gl.program_info_log(program))
        }
        _ => {
            log::error!("fetch_log: {object:?} is not a shader or a program");
            Err(CompileError::InvalidObject)
        }
    }
}
