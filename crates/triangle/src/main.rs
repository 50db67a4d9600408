//! Opens a window and draws a blue triangle, using shaders read from
//! `triangle.v.glsl` and `triangle.f.glsl`.
//!
//! Any failure to load, compile or link the shaders ends the process with its own exit code.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release
#![expect(clippy::undocumented_unsafe_blocks)]

mod app;
mod error;
mod glutin_context;
mod options;

use std::process::ExitCode;

use error::AppError;
use glutin_context::GlutinWindowContext;
use options::AppOptions;

fn main() -> ExitCode {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let options = AppOptions::from_env();
    log::debug!("Starting with {options:?}");

    match app::run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
