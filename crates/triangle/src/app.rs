#![allow(unsafe_code)]

use tri_glow::{ShaderPipeline, TargetPlatform, TriangleSession};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::WindowId,
};

use crate::{AppError, AppOptions, GlutinWindowContext, error::Result};

/// Open the window and draw the triangle until it is closed.
///
/// # Errors
/// The first fatal error, which includes any failure to load, compile or link the shaders.
pub fn run(options: AppOptions) -> Result {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = TriangleApp::new(options);

    log::trace!("Entering the winit event loop (run_app)…");
    event_loop.run_app(&mut app)?;
    log::debug!("triangle window closed");

    app.return_result
}

/// What happens once a frame has been presented.
#[derive(Debug)]
enum AfterFrame {
    /// Draw again as soon as the platform lets us.
    NextFrame,
    Exit(AppError),
}

impl AfterFrame {
    fn from_swap(result: glutin::error::Result<()>) -> Self {
        match result {
            Ok(()) => Self::NextFrame,
            Err(err) => Self::Exit(err.into()),
        }
    }
}

struct Running {
    // The session owns GL objects, so it goes before the context.
    session: TriangleSession,
    gl: glow::Context,
    gl_window: GlutinWindowContext,
}

struct TriangleApp {
    options: AppOptions,
    running: Option<Running>,
    return_result: Result,
}

impl TriangleApp {
    fn new(options: AppOptions) -> Self {
        Self {
            options,
            running: None,
            return_result: Ok(()),
        }
    }

    fn init_run_state(&self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let (gl_window, gl) = GlutinWindowContext::new(event_loop, &self.options)?;

        let target = self.options.target.unwrap_or_else(|| {
            let target = TargetPlatform::detect(&gl);
            log::debug!("Detected {target} GL, shader preamble {:?}", target.preamble());
            target
        });

        let mut pipeline = ShaderPipeline::new(&gl, target);
        let program =
            pipeline.build(&self.options.vertex_shader, &self.options.fragment_shader)?;
        let session = TriangleSession::new(&gl, program)?;

        Ok(Running {
            session,
            gl,
            gl_window,
        })
    }

    fn exit_with(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        log::error!("Exiting because of error: {err}");
        self.return_result = Err(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for TriangleApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.init_run_state(event_loop) {
            Ok(running) => {
                running.gl_window.window().request_redraw();
                self.running = Some(running);
            }
            Err(err) => self.exit_with(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = &mut self.running else {
            return;
        };

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::debug!("Received {event:?}, exiting");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                running.gl_window.resize(physical_size);
                let width = i32::try_from(physical_size.width).unwrap_or(i32::MAX);
                let height = i32::try_from(physical_size.height).unwrap_or(i32::MAX);
                unsafe {
                    use glow::HasContext as _;
                    running.gl.viewport(0, 0, width, height);
                }
                running.gl_window.window().request_redraw();
            }

            WindowEvent::RedrawRequested => {
                running.session.paint(&running.gl, self.options.clear_color);
                match AfterFrame::from_swap(running.gl_window.swap_buffers()) {
                    AfterFrame::NextFrame => running.gl_window.window().request_redraw(),
                    AfterFrame::Exit(err) => self.exit_with(event_loop, err),
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut running) = self.running.take() {
            log::debug!("Destroying the triangle session");
            running.session.destroy(&running.gl);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_presented_frame_asks_for_the_next() {
        for _ in 0..3 {
            assert!(matches!(AfterFrame::from_swap(Ok(())), AfterFrame::NextFrame));
        }
    }

    #[test]
    fn failed_swap_exits() {
        let err = glutin::error::Error::from(glutin::error::ErrorKind::ContextLost);
        let AfterFrame::Exit(err) = AfterFrame::from_swap(Err(err)) else {
            panic!("a failed swap must stop the loop");
        };
        assert!(matches!(err, AppError::Glutin(_)), "{err:?}");
        assert_eq!(err.exit_code(), 1);
    }
}
