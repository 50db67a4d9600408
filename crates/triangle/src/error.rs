/// Everything that can stop the triangle from showing up.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("winit event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create the window: {0}")]
    Os(#[from] winit::error::OsError),

    #[error("glutin error: {0}")]
    Glutin(#[from] glutin::error::Error),

    /// Could not find a GL config that works with the window.
    #[error("found no glutin configs matching the template: {0}")]
    NoGlutinConfigs(String),

    #[error("failed to get the window handle: {0}")]
    WindowHandle(#[from] raw_window_handle::HandleError),

    #[error(transparent)]
    Setup(#[from] tri_glow::SetupError),

    #[error(transparent)]
    Session(#[from] tri_glow::SessionError),
}

impl AppError {
    /// Process exit code. Shader setup failures each have their own, the rest share `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Setup(err) => err.exit_code(),
            Self::EventLoop(_)
            | Self::Os(_)
            | Self::Glutin(_)
            | Self::NoGlutinConfigs(_)
            | Self::WindowHandle(_)
            | Self::Session(_) => 1,
        }
    }
}

pub type Result<T = (), E = AppError> = std::result::Result<T, E>;
