use std::path::PathBuf;

use crate::ShaderStage;

/// Failure to read a shader source file.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to determine the size of {}: {source}", path.display())]
    Seek {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl IoError {
    /// The file that could not be loaded.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Open { path, .. } | Self::Seek { path, .. } | Self::Read { path, .. } => path,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The backend rejected the source. `log` is the info log of the failed shader.
    #[error("failed to compile {stage} shader {}:\n{log}", path.display())]
    Failed {
        path: PathBuf,
        stage: ShaderStage,
        log: String,
    },

    /// The handle given to log retrieval is neither a live shader nor a live program.
    #[error("not a shader or a program")]
    InvalidObject,
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("failed to link program:\n{log}")]
    Failed { log: String },

    #[error("could not bind attribute {name:?}")]
    MissingAttribute { name: String },
}

/// Everything that can go wrong between reading the shader files and having a program ready
/// to draw with. All of these are fatal.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Link(#[from] LinkError),
}

impl SetupError {
    /// Process exit code for this failure. Every variant of the taxonomy gets its own code.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Io(IoError::Open { .. }) => 10,
            Self::Io(IoError::Seek { .. }) => 11,
            Self::Io(IoError::Read { .. }) => 12,
            Self::Compile(CompileError::Failed { .. }) => 20,
            Self::Compile(CompileError::InvalidObject) => 21,
            Self::Link(LinkError::Failed { .. }) => 30,
            Self::Link(LinkError::MissingAttribute { .. }) => 31,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io(kind: fn(PathBuf, std::io::Error) -> IoError) -> SetupError {
        SetupError::Io(kind(
            PathBuf::from("triangle.v.glsl"),
            std::io::Error::other("boom"),
        ))
    }

    #[test]
    fn exit_codes_are_distinct_and_non_zero() {
        let errors = [
            io(|path, source| IoError::Open { path, source }),
            io(|path, source| IoError::Seek { path, source }),
            io(|path, source| IoError::Read { path, source }),
            SetupError::Compile(CompileError::Failed {
                path: PathBuf::from("triangle.f.glsl"),
                stage: ShaderStage::Fragment,
                log: "0:1: error".to_owned(),
            }),
            SetupError::Compile(CompileError::InvalidObject),
            SetupError::Link(LinkError::Failed {
                log: String::new(),
            }),
            SetupError::Link(LinkError::MissingAttribute {
                name: "coord2d".to_owned(),
            }),
        ];

        let mut codes: Vec<u8> = errors.iter().map(SetupError::exit_code).collect();
        assert!(codes.iter().all(|&code| code != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn messages_name_the_file() {
        let err = io(|path, source| IoError::Open { path, source });
        assert_eq!(err.to_string(), "failed to open triangle.v.glsl: boom");

        let err = CompileError::Failed {
            path: PathBuf::from("triangle.f.glsl"),
            stage: ShaderStage::Fragment,
            log: "0:3: error: syntax error".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to compile fragment shader triangle.f.glsl:\n0:3: error: syntax error"
        );
    }
}
