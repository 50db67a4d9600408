#![allow(unsafe_code)]

use std::num::NonZeroU32;

use glutin::prelude::*;
use raw_window_handle::{HasDisplayHandle as _, HasWindowHandle as _, RawWindowHandle};
use winit::event_loop::ActiveEventLoop;

use crate::{AppError, AppOptions, error::Result};

/// The window, together with the GL context and surface we draw into it with.
///
/// The creation flow is the one from `eframe`, cut down to a single window. The display is
/// created by hand so that an empty config list is an error rather than a panic.
pub struct GlutinWindowContext {
    // Surface and context are dropped before the window they belong to.
    gl_surface: glutin::surface::Surface<glutin::surface::WindowSurface>,
    gl_context: glutin::context::PossiblyCurrentContext,
    window: winit::window::Window,
}

impl GlutinWindowContext {
    /// Create the window, make a GL context current on it, and load the GL functions.
    ///
    /// # Errors
    /// If any step of the window or context creation fails.
    pub fn new(
        event_loop: &ActiveEventLoop,
        options: &AppOptions,
    ) -> Result<(Self, glow::Context)> {
        let [width, height] = options.inner_size;
        let window_attributes = winit::window::Window::default_attributes()
            .with_title(options.title.clone())
            .with_resizable(true)
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        // WGL needs the window before the display. Elsewhere the config picks the visual first.
        let early_window = if cfg!(target_os = "windows") {
            Some(event_loop.create_window(window_attributes.clone())?)
        } else {
            None
        };
        let early_window_handle = match &early_window {
            Some(window) => Some(window.window_handle()?.as_raw()),
            None => None,
        };

        let gl_display = unsafe {
            glutin::display::Display::new(
                event_loop.display_handle()?.as_raw(),
                display_preference(early_window_handle),
            )?
        };
        log::debug!(
            "successfully created GL Display with version: {} and supported features: {:?}",
            gl_display.version_string(),
            gl_display.supported_features()
        );

        let mut config_template_builder = glutin::config::ConfigTemplateBuilder::new()
            .prefer_hardware_accelerated(None)
            .with_depth_size(0)
            .with_stencil_size(0)
            .with_transparency(false);
        if let Some(raw_window_handle) = early_window_handle {
            config_template_builder =
                config_template_builder.compatible_with_native_window(raw_window_handle);
        }
        log::debug!("trying to find a glutin config matching: {config_template_builder:?}");

        let template_description = format!("{config_template_builder:?}");
        let configs = unsafe { gl_display.find_configs(config_template_builder.build())? };
        let gl_config = first_config(configs, &template_description)?;
        log::debug!("using the first matching config: {gl_config:?}");

        let window = match early_window {
            Some(window) => window,
            None => glutin_winit::finalize_window(event_loop, window_attributes, &gl_config)?,
        };
        let raw_window_handle = window.window_handle()?.as_raw();

        // If the default context cannot be created, try GLES.
        let context_attributes =
            glutin::context::ContextAttributesBuilder::new().build(Some(raw_window_handle));
        let fallback_context_attributes = glutin::context::ContextAttributesBuilder::new()
            .with_context_api(glutin::context::ContextApi::Gles(None))
            .build(Some(raw_window_handle));

        let not_current_gl_context =
            match unsafe { gl_display.create_context(&gl_config, &context_attributes) } {
                Ok(it) => it,
                Err(err) => {
                    log::warn!(
                        "Failed to create context using default context attributes {context_attributes:?} due to error: {err}"
                    );
                    log::debug!(
                        "Retrying with fallback context attributes: {fallback_context_attributes:?}"
                    );
                    unsafe { gl_display.create_context(&gl_config, &fallback_context_attributes)? }
                }
            };

        let (width_px, height_px): (u32, u32) = window.inner_size().into();
        let surface_attributes =
            glutin::surface::SurfaceAttributesBuilder::<glutin::surface::WindowSurface>::new()
                .build(
                    raw_window_handle,
                    NonZeroU32::new(width_px).unwrap_or(NonZeroU32::MIN),
                    NonZeroU32::new(height_px).unwrap_or(NonZeroU32::MIN),
                );

        log::trace!("creating surface with attributes: {surface_attributes:?}");
        let gl_surface =
            unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes)? };
        let gl_context = not_current_gl_context.make_current(&gl_surface)?;

        // Not having vsync is not worth failing over.
        let swap_interval = if options.vsync {
            glutin::surface::SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            glutin::surface::SwapInterval::DontWait
        };
        if let Err(err) = gl_surface.set_swap_interval(&gl_context, swap_interval) {
            log::warn!("Failed to set swap interval due to error: {err}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s| gl_display.get_proc_address(s))
        };

        Ok((
            Self {
                gl_surface,
                gl_context,
                window,
            },
            gl,
        ))
    }

    pub fn window(&self) -> &winit::window::Window {
        &self.window
    }

    pub fn resize(&self, physical_size: winit::dpi::PhysicalSize<u32>) {
        // A minimized window reports a zero size. Keep the surface as it is.
        let (Some(width), Some(height)) = (
            NonZeroU32::new(physical_size.width),
            NonZeroU32::new(physical_size.height),
        ) else {
            return;
        };
        self.gl_surface.resize(&self.gl_context, width, height);
    }

    /// # Errors
    /// If the platform fails to present the frame.
    pub fn swap_buffers(&self) -> glutin::error::Result<()> {
        self.gl_surface.swap_buffers(&self.gl_context)
    }
}

/// Prefer the native GL API and fall back to EGL where both exist.
#[cfg_attr(
    not(target_os = "windows"),
    expect(unused_variables, reason = "only WGL uses the window handle")
)]
fn display_preference(
    raw_window_handle: Option<RawWindowHandle>,
) -> glutin::display::DisplayApiPreference {
    #[cfg(target_os = "windows")]
    let preference = glutin::display::DisplayApiPreference::WglThenEgl(raw_window_handle);
    #[cfg(target_os = "macos")]
    let preference = glutin::display::DisplayApiPreference::Cgl;
    #[cfg(target_os = "android")]
    let preference = glutin::display::DisplayApiPreference::Egl;
    #[cfg(all(
        unix,
        not(any(target_os = "macos", target_os = "ios", target_os = "android"))
    ))]
    let preference = glutin::display::DisplayApiPreference::GlxThenEgl(Box::new(
        winit::platform::x11::register_xlib_error_hook,
    ));

    preference
}

/// The first config the display offers for the template.
fn first_config<C>(mut configs: impl Iterator<Item = C>, template: &str) -> Result<C> {
    configs
        .next()
        .ok_or_else(|| AppError::NoGlutinConfigs(template.to_owned()))
}
