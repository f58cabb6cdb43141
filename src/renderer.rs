use std::sync::atomic::{ AtomicUsize, Ordering };
use std::thread;
use std::time::{ Duration, Instant };

use log::{ debug, info };

use crate::canvas::Canvas;
use crate::color::Color;
use crate::intersect::find_closest_intersection;
use crate::lighting::LightResolver;
use crate::material::RayTracer;
use crate::ray::Ray;
use crate::scene::Scene;

const PROGRESS_POLL: Duration = Duration::from_millis(100);

/// Figures gathered over one render pass.
#[derive(Clone, Debug)]
pub struct RenderStats {
    pub width: usize,
    pub height: usize,
    pub samples: u32,
    pub max_depth: u32,
    pub rays_cast: usize,
    pub elapsed: Duration,
}

impl RenderStats {
    pub fn pixels_per_second(&self) -> f64 {
        (self.width * self.height) as f64 / self.elapsed.as_secs_f64()
    }

    pub fn rays_per_second(&self) -> f64 {
        self.rays_cast as f64 / self.elapsed.as_secs_f64()
    }

    /// Prints the post-render summary block on stderr.
    pub fn print_summary(&self) {
        let total_pixels = self.width * self.height;

        eprintln!("===== Render Statistics =====");
        eprintln!("Resolution: {}x{} ({} pixels)",
            self.width, self.height, total_pixels);
        eprintln!("Samples per pixel: {} ({} rays per pixel)",
            self.samples, self.samples * self.samples);
        eprintln!("Maximum ray depth: {}", self.max_depth);
        eprintln!("Total rays cast: {}", self.rays_cast);
        eprintln!("Total render time: {:.3}s", self.elapsed.as_secs_f64());
        eprintln!("Performance: {:.2} pixels/sec", self.pixels_per_second());
        eprintln!("Ray throughput: {:.0} rays/sec", self.rays_per_second());
        eprintln!("=============================");
    }
}

/// The render driver.
///
/// Owns the scene for the duration of a render and implements [`RayTracer`]
/// so materials can recurse back into `trace_ray` for their secondary rays.
pub struct Renderer {
    scene: Scene,
    samples: u32,
    max_depth: u32,
    background: Color,
}

impl Renderer {
    pub fn new(scene: Scene, samples: u32, max_depth: u32) -> Renderer {
        Renderer {
            scene,
            samples,
            max_depth,
            background: Color::blue(),
        }
    }

    /// Renders the whole image, returning the canvas and timing figures.
    ///
    /// Rows are split evenly across all available hardware threads; each
    /// worker writes into its own disjoint slice of the pixel buffer. The
    /// calling thread polls an atomic pixel counter and reports percentage
    /// progress on stderr until the workers finish.
    pub fn render(&self) -> (Canvas, RenderStats) {
        let width = self.scene.camera.width();
        let height = self.scene.camera.height();
        let total_pixels = width * height;

        let threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let rows_per_thread = (height + threads - 1) / threads;

        info!("rendering {}x{} with {} samples on {} threads",
            width, height, self.samples, threads);

        let start = Instant::now();
        let pixels_done = AtomicUsize::new(0);
        let rays_cast = AtomicUsize::new(0);
        let mut pixels = vec![Color::black(); total_pixels];

        thread::scope(|scope| {
            // Degenerate resolutions leave the buffer empty; chunk size
            // must still be nonzero.
            let band_size = (rows_per_thread * width).max(1);
            for (i, band) in pixels.chunks_mut(band_size).enumerate() {
                let pixels_done = &pixels_done;
                let rays_cast = &rays_cast;

                scope.spawn(move || {
                    let start_row = i * rows_per_thread;

                    for (offset, row) in band.chunks_mut(width).enumerate() {
                        let y = start_row + offset;
                        for (x, pixel) in row.iter_mut().enumerate() {
                            *pixel = self.render_pixel(x, y, rays_cast);
                            pixels_done.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }

            while pixels_done.load(Ordering::Relaxed) < total_pixels {
                let percent =
                    100 * pixels_done.load(Ordering::Relaxed) / total_pixels;
                eprint!("\rProgress: {}%", percent);
                thread::sleep(PROGRESS_POLL);
            }
        });
        eprintln!("\rProgress: 100%");

        let stats = RenderStats {
            width,
            height,
            samples: self.samples,
            max_depth: self.max_depth,
            rays_cast: rays_cast.load(Ordering::Relaxed),
            elapsed: start.elapsed(),
        };

        debug!("render finished in {:.3}s", stats.elapsed.as_secs_f64());

        (Canvas::from_pixels(width, height, pixels), stats)
    }

    /// Renders one pixel, averaging a `samples`-squared stratified grid of
    /// sub-pixel rays when supersampling is on.
    fn render_pixel(&self, x: usize, y: usize, rays_cast: &AtomicUsize)
        -> Color {
        let width = self.scene.camera.width();
        let height = self.scene.camera.height();

        if self.samples > 1 {
            let mut color = Color::black();

            for s in 0..self.samples {
                for t in 0..self.samples {
                    let u = (x as f64
                        + (s as f64 + 0.5) / self.samples as f64)
                        / (width - 1) as f64;
                    let v = (y as f64
                        + (t as f64 + 0.5) / self.samples as f64)
                        / (height - 1) as f64;

                    let ray = self.scene.camera.ray(u, v);
                    color = color + self.trace_ray(&ray, 0);
                    rays_cast.fetch_add(1, Ordering::Relaxed);
                }
            }

            color * (1.0 / (self.samples * self.samples) as f64)
        } else {
            let u = x as f64 / (width - 1) as f64;
            let v = y as f64 / (height - 1) as f64;

            let ray = self.scene.camera.ray(u, v);
            rays_cast.fetch_add(1, Ordering::Relaxed);
            self.trace_ray(&ray, 0)
        }
    }

    /// Traces one ray through the scene.
    ///
    /// Returns the background color once `depth` reaches the bound or when
    /// nothing is hit; otherwise the material interaction is modulated
    /// componentwise by the light coefficient at the hit point.
    pub fn trace_ray(&self, ray: &Ray, depth: u32) -> Color {
        if depth >= self.max_depth {
            return self.background;
        }

        match find_closest_intersection(&self.scene.primitives, ray) {
            Some((primitive, info)) => {
                let resolver = LightResolver::new(
                    &self.scene.lights,
                    &self.scene.primitives,
                    self.scene.camera.origin,
                );
                let light = resolver.compute_light(info.hit_point, primitive);
                let interaction = primitive.material
                    .compute_interaction(ray, &info, self, depth);

                Color::hadamard(&interaction, &light)
            }
            None => self.background,
        }
    }
}

impl RayTracer for Renderer {
    fn trace(&self, ray: &Ray, depth: u32) -> Color {
        self.trace_ray(ray, depth)
    }
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::material::Material;
    use crate::shape::{ Primitive, ShapeKind };
    use crate::transform::Transform;
    use crate::vector::{ Point3D, Vector3D };

    fn tiny_scene(primitives: Vec<Primitive>) -> Scene {
        Scene {
            camera: Camera::new(
                Point3D::origin(),
                3,
                3,
                90.0,
                Vector3D::zero()
            ),
            primitives,
            lights: vec![],
        }
    }

    fn big_sphere() -> Primitive {
        Primitive::new(
            ShapeKind::sphere(Point3D::origin(), 2.0),
            Transform::at(Vector3D::new(0.0, 0.0, -10.0)),
            Material::matte(Color::white())
        )
    }

    #[test]
    fn empty_scene_renders_background() {
        let renderer = Renderer::new(tiny_scene(vec![]), 1, 5);
        let (canvas, stats) = renderer.render();

        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(canvas.read_pixel(x, y), Some(Color::blue()));
            }
        }
        assert_eq!(stats.rays_cast, 9);
    }

    #[test]
    fn zero_depth_always_background() {
        let renderer = Renderer::new(tiny_scene(vec![big_sphere()]), 1, 0);
        let (canvas, _) = renderer.render();

        assert_eq!(canvas.read_pixel(1, 1), Some(Color::blue()));
    }

    #[test]
    fn matte_hit_is_ambient_lit() {
        let renderer = Renderer::new(tiny_scene(vec![big_sphere()]), 1, 5);

        // No lights declared: the coefficient is the 0.1 ambient floor.
        let ray = Ray::new(
            Point3D::origin(),
            Vector3D::new(0.0, 0.0, -1.0)
        );
        let c = renderer.trace_ray(&ray, 0);

        assert_eq!(c, Color::rgb(0.1, 0.1, 0.1));
    }

    #[test]
    fn supersampling_counts_extra_rays() {
        let renderer = Renderer::new(tiny_scene(vec![]), 2, 5);
        let (canvas, stats) = renderer.render();

        assert_eq!(stats.rays_cast, 9 * 4);
        assert_eq!(canvas.read_pixel(0, 0), Some(Color::blue()));
    }

    #[test]
    fn rendering_twice_is_pixel_identical() {
        // A mirror over a matte floor exercises secondary rays; with one
        // sample per pixel nothing stochastic runs, so two renders of the
        // same scene must agree exactly.
        let scene = || tiny_scene(vec![
            Primitive::new(
                ShapeKind::sphere(Point3D::origin(), 2.0),
                Transform::at(Vector3D::new(0.0, 0.0, -10.0)),
                Material::Mirror {
                    color: Color::red(),
                    reflectivity: 0.9,
                }
            ),
            Primitive::new(
                ShapeKind::plane(crate::shape::Axis::Y, -3.0),
                Transform::default(),
                Material::matte(Color::white())
            ),
        ]);

        let (first, _) = Renderer::new(scene(), 1, 5).render();
        let (second, _) = Renderer::new(scene(), 1, 5).render();

        assert_eq!(first, second);
    }

    #[test]
    fn stats_throughput_is_consistent() {
        let renderer = Renderer::new(tiny_scene(vec![]), 1, 5);
        let (_, stats) = renderer.render();

        assert!(stats.pixels_per_second() > 0.0);
        assert!(stats.rays_per_second() >= stats.pixels_per_second());
    }
}
