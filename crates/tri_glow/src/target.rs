#![allow(unsafe_code)]

/// Which flavour of GLSL the shaders are compiled as.
///
/// This picks the preamble that goes on top of every shader source.
/// It is decided once at startup and then passed to every compile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TargetPlatform {
    /// Desktop OpenGL, GLSL 1.20.
    #[default]
    Desktop,

    /// OpenGL ES 2 / WebGL1, GLSL ES 1.00.
    Embedded,
}

impl TargetPlatform {
    /// The platform implied by the compilation target, for when there is no context to ask.
    pub fn for_build_target() -> Self {
        if cfg!(any(
            target_os = "android",
            target_os = "ios",
            target_arch = "wasm32"
        )) {
            Self::Embedded
        } else {
            Self::Desktop
        }
    }

    /// Ask the current context which shading language it speaks.
    pub fn detect(gl: &glow::Context) -> Self {
        let target = if ShaderVersion::get(gl).is_embedded() {
            Self::Embedded
        } else {
            Self::Desktop
        };
        log::debug!("Shader target: {target:?}");
        target
    }

    /// Goes on top of the shader.
    pub fn preamble(self) -> &'static str {
        match self {
            Self::Desktop => "#version 120\n",
            Self::Embedded => "#version 100\n#define GLES2\n",
        }
    }
}

impl std::fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Desktop => f.write_str("desktop"),
            Self::Embedded => f.write_str("embedded"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown target platform {0:?}, expected \"desktop\" or \"embedded\"")]
pub struct ParseTargetError(String);

impl std::str::FromStr for TargetPlatform {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" | "gl" => Ok(Self::Desktop),
            "embedded" | "es" | "gles" => Ok(Self::Embedded),
            _ => Err(ParseTargetError(s.to_owned())),
        }
    }
}

// ----------------------------------------------------------------------------

/// Helper for parsing and interpreting the OpenGL shading language version string.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShaderVersion {
    Gl120,

    /// OpenGL 1.4 or later
    Gl140,

    /// e.g. WebGL1
    Es100,

    /// e.g. WebGL2
    Es300,
}

impl ShaderVersion {
    pub fn get(gl: &glow::Context) -> Self {
        use glow::HasContext as _;
        let shading_lang_string =
            unsafe { gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION) };
        let shader_version = Self::parse(&shading_lang_string);
        log::debug!("Shader version: {shader_version:?} ({shading_lang_string:?}).");
        shader_version
    }

    /// Unparseable strings are treated as the oldest desktop version.
    #[inline]
    pub fn parse(glsl_ver: &str) -> Self {
        let Some(start) = glsl_ver.find(|c| char::is_ascii_digit(&c)) else {
            return Self::Gl120;
        };
        let es = glsl_ver[..start].contains(" ES ");
        let ver = glsl_ver[start..]
            .split_once(' ')
            .map_or(&glsl_ver[start..], |x| x.0);
        let mut parts = ver
            .splitn(3, '.')
            .map(|x| x.parse::<u8>().unwrap_or_default());
        let maj = parts.next().unwrap_or_default();
        let min = parts.next().unwrap_or_default();
        if es {
            if maj >= 3 {
                Self::Es300
            } else {
                Self::Es100
            }
        } else if maj > 1 || (maj == 1 && min >= 40) {
            Self::Gl140
        } else {
            Self::Gl120
        }
    }

    pub fn is_embedded(&self) -> bool {
        match self {
            Self::Gl120 | Self::Gl140 => false,
            Self::Es100 | Self::Es300 => true,
        }
    }
}

#[test]
fn test_shader_version() {
    use ShaderVersion::{Es100, Es300, Gl120, Gl140};
    for (s, v) in [
        ("1.2 OpenGL foo bar", Gl120),
        ("3.0", Gl140),
        ("0.0", Gl120),
        ("4.60 NVIDIA", Gl140),
        ("OpenGL ES GLSL 3.00 (WebGL2)", Es300),
        ("OpenGL ES GLSL 1.00 (WebGL)", Es100),
        ("OpenGL ES GLSL ES 1.00 foo bar", Es100),
        ("WebGL GLSL ES 3.00 foo bar", Es300),
        ("WebGL GLSL ES 1.0 foo bar", Es100),
        ("", Gl120),
        ("no digits here", Gl120),
    ] {
        assert_eq!(ShaderVersion::parse(s), v, "{s:?}");
    }
}

#[test]
fn test_preamble() {
    assert_eq!(TargetPlatform::Desktop.preamble(), "#version 120\n");
    assert_eq!(
        TargetPlatform::Embedded.preamble(),
        "#version 100\n#define GLES2\n"
    );
    for target in [TargetPlatform::Desktop, TargetPlatform::Embedded] {
        assert!(target.preamble().ends_with('\n'));
    }
}

#[test]
fn test_parse_target() {
    assert_eq!("desktop".parse(), Ok(TargetPlatform::Desktop));
    assert_eq!(" Embedded ".parse(), Ok(TargetPlatform::Embedded));
    assert_eq!("gles".parse(), Ok(TargetPlatform::Embedded));
    assert!("vulkan".parse::<TargetPlatform>().is_err());

    for target in [TargetPlatform::Desktop, TargetPlatform::Embedded] {
        assert_eq!(target.to_string().parse(), Ok(target));
    }
}
