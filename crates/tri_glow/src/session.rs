#![allow(unsafe_code)]

use glow::HasContext as _;

use crate::{LinkedProgram, check_for_gl_error};

/// Two triangles sharing an edge, as `(x, y)` pairs in clip space.
pub const TRIANGLE_VERTICES: [f32; 12] = [
    0.0, 0.8, //
    -0.8, -0.5, //
    0.8, -0.5, //
    -0.8, -0.5, //
    0.0, -0.9, //
    0.8, -0.5, //
];

const COMPONENTS_PER_VERTEX: i32 = 2;

#[derive(Debug, thiserror::Error)]
#[error("failed to create the vertex buffer: {0}")]
pub struct SessionError(String);

// ----------------------------------------------------------------------------

/// How the vertex buffer feeds an attribute.
#[derive(Debug)]
struct BufferInfo {
    location: u32,
    vector_size: i32,
    data_type: u32, // GL_FLOAT
    normalized: bool,
    stride: i32,
    offset: i32,
}

// ----------------------------------------------------------------------------

/// Everything the render loop needs to draw the triangle each frame.
///
/// This struct must be destroyed with [`TriangleSession::destroy`] before dropping, to ensure
/// OpenGL objects have been properly deleted and are not leaked.
pub struct TriangleSession {
    program: glow::Program,
    coord2d: BufferInfo,
    vertex_buffer: glow::Buffer,
    vertex_count: i32,

    destroyed: bool,
}

impl TriangleSession {
    /// Take ownership of `program` and upload the vertex data.
    ///
    /// # Errors
    /// If the vertex buffer cannot be created. The program is deleted in that case.
    pub fn new(
        gl: &glow::Context,
        program: LinkedProgram<glow::Program>,
    ) -> Result<Self, SessionError> {
        let vertex_buffer = match unsafe { gl.create_buffer() } {
            Ok(buffer) => buffer,
            Err(err) => {
                unsafe { gl.delete_program(program.raw) };
                return Err(SessionError(err));
            }
        };

        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&TRIANGLE_VERTICES),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        check_for_gl_error!(gl, "upload vertices");

        let vertex_count = (TRIANGLE_VERTICES.len() as i32) / COMPONENTS_PER_VERTEX;
        log::debug!(
            "Uploaded {vertex_count} vertices, coord2d at location {}",
            program.coord2d
        );

        Ok(Self {
            program: program.raw,
            coord2d: BufferInfo {
                location: program.coord2d,
                vector_size: COMPONENTS_PER_VERTEX,
                data_type: glow::FLOAT,
                normalized: false,
                stride: 0,
                offset: 0,
            },
            vertex_buffer,
            vertex_count,
            destroyed: false,
        })
    }

    pub fn program(&self) -> glow::Program {
        self.program
    }

    /// Location of the `coord2d` attribute in [`Self::program`].
    pub fn coord2d(&self) -> u32 {
        self.coord2d.location
    }

    /// Clear the framebuffer and draw the triangle.
    pub fn paint(&self, gl: &glow::Context, clear_color: [f32; 4]) {
        self.assert_not_destroyed();

        let [r, g, b, a] = clear_color;
        let attribute = &self.coord2d;
        unsafe {
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT);

            gl.use_program(Some(self.program));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vertex_buffer));
            gl.enable_vertex_attrib_array(attribute.location);
            gl.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.vector_size,
                attribute.data_type,
                attribute.normalized,
                attribute.stride,
                attribute.offset,
            );

            gl.draw_arrays(glow::TRIANGLES, 0, self.vertex_count);

            gl.disable_vertex_attrib_array(attribute.location);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        check_for_gl_error!(gl, "paint");
    }

    /// This function must be called before the session is dropped, as it owns OpenGL objects
    /// that should be deleted.
    pub fn destroy(&mut self, gl: &glow::Context) {
        if !self.destroyed {
            unsafe {
                gl.delete_program(self.program);
                gl.delete_buffer(self.vertex_buffer);
            }
            self.destroyed = true;
        }
    }

    fn assert_not_destroyed(&self) {
        assert!(!self.destroyed, "the triangle session has already been destroyed!");
    }
}

impl Drop for TriangleSession {
    fn drop(&mut self) {
        if !self.destroyed {
            log::warn!(
                "You forgot to call destroy() on the triangle session. OpenGL objects will leak!"
            );
        }
    }
}

#[test]
fn test_vertex_data() {
    assert_eq!(TRIANGLE_VERTICES.len() % COMPONENTS_PER_VERTEX as usize, 0);
    assert!(TRIANGLE_VERTICES.iter().all(|c| (-1.0..=1.0).contains(c)));

    let bytes: &[u8] = bytemuck::cast_slice(&TRIANGLE_VERTICES);
    assert_eq!(bytes.len(), TRIANGLE_VERTICES.len() * std::mem::size_of::<f32>());
}
