use crate::ray::Ray;
use crate::vector::{ Point3D, Vector3D };

/// The rectangle in space that pixels are projected through.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Screen {
    pub origin: Point3D,
    pub bottom_side: Vector3D,
    pub left_side: Vector3D,
}

/// A pinhole camera.
///
/// The camera owns its screen rectangle and rebuilds it whenever position,
/// rotation, field of view or resolution change. Rotation is stored in
/// degrees, as scene files give it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub origin: Point3D,
    pub screen: Screen,
    width: usize,
    height: usize,
    rotation: Vector3D,
    field_of_view: f64,
}

impl Camera {
    pub fn new(origin: Point3D, width: usize, height: usize,
               field_of_view: f64, rotation: Vector3D) -> Camera {
        let mut camera = Camera {
            origin,
            screen: Default::default(),
            width,
            height,
            rotation,
            field_of_view,
        };
        camera.update_screen_orientation();
        camera
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rotation(&self) -> Vector3D {
        self.rotation
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn set_position(&mut self, position: Point3D) {
        self.origin = position;
        self.update_screen_orientation();
    }

    pub fn set_rotation(&mut self, rotation: Vector3D) {
        self.rotation = rotation;
        self.update_screen_orientation();
    }

    pub fn set_field_of_view(&mut self, fov: f64) {
        self.field_of_view = fov;
        self.update_screen_orientation();
    }

    pub fn set_resolution(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.update_screen_orientation();
    }

    /// Applies the camera rotation to a view-space vector.
    ///
    /// Angles are in degrees; the Z component spins first, then X, then Y.
    fn rotate_view(&self, vector: Vector3D) -> Vector3D {
        let x = self.rotation.x.to_radians();
        let y = self.rotation.y.to_radians();
        let z = self.rotation.z.to_radians();

        let (sz, cz) = z.sin_cos();
        let x1 = vector.x * cz - vector.y * sz;
        let y1 = vector.x * sz + vector.y * cz;
        let z1 = vector.z;

        let (sx, cx) = x.sin_cos();
        let x2 = x1 * cx + z1 * sx;
        let y2 = y1;
        let z2 = -x1 * sx + z1 * cx;

        let (sy, cy) = y.sin_cos();
        Vector3D::new(x2, y2 * cy - z2 * sy, y2 * sy + z2 * cy)
    }

    /// Rebuilds the screen rectangle from the current FOV and rotation.
    fn update_screen_orientation(&mut self) {
        let fov_radians = self.field_of_view.to_radians();
        let aspect_ratio = self.width as f64 / self.height as f64;
        let half_height = (fov_radians / 2.0).tan();
        let half_width = aspect_ratio * half_height;

        let horizontal =
            self.rotate_view(Vector3D::new(2.0 * half_width, 0.0, 0.0));
        let vertical =
            self.rotate_view(Vector3D::new(0.0, 2.0 * half_height, 0.0));
        let forward = self.rotate_view(Vector3D::new(0.0, 0.0, -1.0));

        self.screen = Screen {
            origin: self.origin + forward,
            bottom_side: horizontal,
            left_side: vertical,
        };
    }

    /// The primary ray through normalized screen coordinates u, v in [0, 1].
    ///
    /// (0, 0) is the top-left pixel; v grows downward while the screen's
    /// vertical axis points up, hence the flip.
    pub fn ray(&self, u: f64, v: f64) -> Ray {
        let screen_u = 2.0 * u - 1.0;
        let screen_v = 1.0 - 2.0 * v;

        let target = self.screen.origin
            + self.screen.bottom_side * screen_u
            + self.screen.left_side * screen_v;

        Ray::new(self.origin, (target - self.origin).normalize())
    }
}

/* Tests */

#[cfg(test)]
fn square_camera() -> Camera {
    Camera::new(Point3D::origin(), 100, 100, 90.0, Vector3D::zero())
}

#[test]
fn center_ray_points_forward() {
    let c = square_camera();
    let r = c.ray(0.5, 0.5);

    assert_eq!(r.origin, Point3D::origin());
    assert_eq!(r.direction, Vector3D::new(0.0, 0.0, -1.0));
}

#[test]
fn screen_built_from_fov() {
    let c = square_camera();

    // 90 degree FOV: half height is tan(45) = 1.
    assert_eq!(c.screen.origin, Point3D::new(0.0, 0.0, -1.0));
    assert_eq!(c.screen.bottom_side, Vector3D::new(2.0, 0.0, 0.0));
    assert_eq!(c.screen.left_side, Vector3D::new(0.0, 2.0, 0.0));
}

#[test]
fn left_edge_ray_tilts_left() {
    let c = square_camera();
    let r = c.ray(0.0, 0.5);

    assert!(r.direction.x < 0.0);
    assert!(crate::feq(r.direction.y, 0.0));
}

#[test]
fn top_of_image_looks_up() {
    let c = square_camera();
    let r = c.ray(0.5, 0.0);

    assert!(r.direction.y > 0.0);
}

#[test]
fn rotation_turns_view() {
    let mut c = square_camera();
    c.set_rotation(Vector3D::new(90.0, 0.0, 0.0));

    let r = c.ray(0.5, 0.5);
    assert_eq!(r.direction, Vector3D::new(-1.0, 0.0, 0.0));
}

#[test]
fn setters_rebuild_screen() {
    let mut c = square_camera();
    let before = c.screen;

    c.set_field_of_view(60.0);
    assert_ne!(c.screen, before);

    c.set_position(Point3D::new(0.0, 0.0, 5.0));
    assert_eq!(c.screen.origin, Point3D::new(0.0, 0.0, 4.0));
}

#[test]
fn widescreen_aspect_stretches_horizontal() {
    let c = Camera::new(
        Point3D::origin(),
        200,
        100,
        90.0,
        Vector3D::zero()
    );

    assert_eq!(c.screen.bottom_side, Vector3D::new(4.0, 0.0, 0.0));
    assert_eq!(c.screen.left_side, Vector3D::new(0.0, 2.0, 0.0));
}
