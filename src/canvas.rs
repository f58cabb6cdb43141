use std::io;
use std::io::Write;
use std::fs::File;
use std::path::Path;

use crate::color::Color;

/// A canvas for drawing pixels.
///
/// The render driver fills one `Color` per pixel; once rendering finishes the
/// canvas serializes itself as an ASCII PPM (P3) image.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector in row order.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Builds a canvas from an already-rendered pixel buffer.
    ///
    /// The buffer length must be `width * height`; anything else is a logic
    /// error in the caller.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>)
        -> Canvas {
        assert_eq!(pixels.len(), width * height);
        Canvas { width, height, pixels }
    }

    /// Saves the canvas to a PPM (P3) file.
    ///
    /// The header is `P3`, the dimensions and the maximum channel value 255;
    /// after that, every pixel becomes one `r g b` line. Channels are clamped
    /// to [0, 1] and scaled by 255 with truncation.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        let mut out = io::BufWriter::new(file);

        writeln!(&mut out, "P3")?;
        writeln!(&mut out, "{} {}", self.width, self.height)?;
        writeln!(&mut out, "255")?;

        for pixel in self.pixels.iter() {
            let (r, g, b) = Self::to_bytes(pixel);
            writeln!(&mut out, "{} {} {}", r, g, b)?;
        }

        out.flush()
    }

    fn to_bytes(pixel: &Color) -> (u8, u8, u8) {
        let scale = |channel: f64| (255.0 * channel.clamp(0.0, 1.0)) as u8;
        (scale(pixel.r), scale(pixel.g), scale(pixel.b))
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `y` is the row of the pixel and `x`
    /// the column, both zero-indexed.
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// Returns `None` for out-of-bounds locations.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }
}

/* Tests */

#[test]
fn write_and_read_pixel() {
    let purple = Color::rgb(1.0, 0.0, 1.0);
    let mut canvas = Canvas::new(8, 8);

    canvas.write_pixel(4, 2, &purple);
    assert_eq!(canvas.read_pixel(4, 2), Some(purple));
    assert_eq!(canvas.read_pixel(0, 0), Some(Color::black()));
}

#[test]
fn out_of_bounds_access_is_harmless() {
    let mut canvas = Canvas::new(4, 4);

    canvas.write_pixel(10, 10, &Color::white());
    assert_eq!(canvas.read_pixel(10, 10), None);
}

#[test]
fn channel_scaling_truncates() {
    let (r, g, b) = Canvas::to_bytes(&Color::rgb(0.999, 0.5, -0.5));

    assert_eq!(r, 254);
    assert_eq!(g, 127);
    assert_eq!(b, 0);
}

#[test]
fn saved_ppm_has_expected_layout() {
    let mut canvas = Canvas::new(2, 1);
    canvas.write_pixel(0, 0, &Color::red());
    canvas.write_pixel(1, 0, &Color::blue());

    let dir = std::env::temp_dir();
    let path = dir.join("prism_tracer_canvas_test.ppm");
    canvas.save(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "P3\n2 1\n255\n255 0 0\n0 0 255\n");

    std::fs::remove_file(&path).ok();
}
