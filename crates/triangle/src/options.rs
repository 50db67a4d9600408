use std::path::{Path, PathBuf};

use tri_glow::TargetPlatform;

pub const VERTEX_SHADER_FILE: &str = "triangle.v.glsl";
pub const FRAGMENT_SHADER_FILE: &str = "triangle.f.glsl";

/// Directory the shader files are read from, instead of the working directory.
pub const SHADER_DIR_ENV: &str = "TRIANGLE_SHADER_DIR";

/// `desktop` or `embedded`. Overrides what the GL context reports.
pub const TARGET_ENV: &str = "TRIANGLE_TARGET";

/// `0`/`false`/`off` to disable vsync.
pub const VSYNC_ENV: &str = "TRIANGLE_VSYNC";

/// Everything about the window and the shaders that can be configured.
#[derive(Clone, Debug, PartialEq)]
pub struct AppOptions {
    pub title: String,

    /// Logical size of the window.
    pub inner_size: [u32; 2],

    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,

    /// Colour the window is cleared to before drawing, RGBA.
    pub clear_color: [f32; 4],

    /// Which shader preamble to use. `None` means: ask the GL context.
    pub target: Option<TargetPlatform>,

    pub vsync: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            title: "Triangle".to_owned(),
            inner_size: [640, 480],
            vertex_shader: PathBuf::from(VERTEX_SHADER_FILE),
            fragment_shader: PathBuf::from(FRAGMENT_SHADER_FILE),
            clear_color: [1.0, 1.0, 1.0, 1.0],
            target: None,
            vsync: true,
        }
    }
}

impl AppOptions {
    /// The defaults, with overrides from `TRIANGLE_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by name. Values that cannot be parsed are logged and ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(SHADER_DIR_ENV) {
            self = self.with_shader_dir(dir);
        }

        if let Some(target) = lookup(TARGET_ENV) {
            match target.parse() {
                Ok(target) => self.target = Some(target),
                Err(err) => log::warn!("Ignoring {TARGET_ENV}: {err}"),
            }
        }

        if let Some(vsync) = lookup(VSYNC_ENV) {
            match parse_bool(&vsync) {
                Some(vsync) => self.vsync = vsync,
                None => log::warn!("Ignoring {VSYNC_ENV}: expected a boolean, got {vsync:?}"),
            }
        }

        self
    }

    /// Read both shader files from `dir`.
    #[must_use]
    pub fn with_shader_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.vertex_shader = dir.as_ref().join(VERTEX_SHADER_FILE);
        self.fragment_shader = dir.as_ref().join(FRAGMENT_SHADER_FILE);
        self
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn defaults_read_from_working_directory() {
        let options = AppOptions::default().with_overrides(env(&[]));
        assert_eq!(options, AppOptions::default());
        assert_eq!(options.vertex_shader, Path::new("triangle.v.glsl"));
        assert_eq!(options.fragment_shader, Path::new("triangle.f.glsl"));
        assert_eq!(options.inner_size, [640, 480]);
        assert_eq!(options.target, None);
    }

    #[test]
    fn env_overrides() {
        let options = AppOptions::default().with_overrides(env(&[
            (SHADER_DIR_ENV, "shaders"),
            (TARGET_ENV, "embedded"),
            (VSYNC_ENV, "off"),
        ]));
        assert_eq!(options.vertex_shader, Path::new("shaders").join("triangle.v.glsl"));
        assert_eq!(options.fragment_shader, Path::new("shaders").join("triangle.f.glsl"));
        assert_eq!(options.target, Some(TargetPlatform::Embedded));
        assert!(!options.vsync);
    }

    #[test]
    fn bad_values_are_ignored() {
        let options = AppOptions {
            target: Some(TargetPlatform::Desktop),
            ..Default::default()
        }
        .with_overrides(env(&[(TARGET_ENV, "metal"), (VSYNC_ENV, "maybe")]));
        assert_eq!(options.target, Some(TargetPlatform::Desktop));
        assert!(options.vsync);
    }

    #[test]
    fn shader_dir() {
        let options = AppOptions::default().with_shader_dir("/opt/shaders");
        assert_eq!(options.vertex_shader, Path::new("/opt/shaders/triangle.v.glsl"));
        assert_eq!(options.fragment_shader, Path::new("/opt/shaders/triangle.f.glsl"));
    }
}
