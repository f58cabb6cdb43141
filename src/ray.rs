use crate::vector::{ Point3D, Vector3D };

/// A ray with an origin point and a direction vector.
///
/// The direction is not required to be normalized on construction; the
/// transform pipeline renormalizes directions where the intersection math
/// relies on unit length.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Point3D,
    pub direction: Vector3D,
}

impl Ray {
    pub fn new(origin: Point3D, direction: Vector3D) -> Ray {
        Ray { origin, direction }
    }

    /// The point along the ray at parameter `t`.
    pub fn at(&self, t: f64) -> Point3D {
        self.origin + (self.direction * t)
    }

    /// A ray with the same direction, originating slightly further along it.
    ///
    /// Secondary rays (shadow, reflection, refraction) start offset from the
    /// hit point so they do not re-intersect the surface they left.
    pub fn offset(&self, amount: f64) -> Ray {
        Ray {
            origin: self.origin + (self.direction * amount),
            direction: self.direction,
        }
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
                Point3D::new(2.0, 3.0, 4.0),
                Vector3D::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.at(0.0), Point3D::new(2.0, 3.0, 4.0));
    assert_eq!(r.at(1.0), Point3D::new(3.0, 3.0, 4.0));
    assert_eq!(r.at(-1.0), Point3D::new(1.0, 3.0, 4.0));
    assert_eq!(r.at(2.5), Point3D::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_offset() {
    let r = Ray::new(
                Point3D::new(1.0, 2.0, 3.0),
                Vector3D::new(0.0, 1.0, 0.0)
            );
    let o = r.offset(0.001);

    assert_eq!(o.origin, Point3D::new(1.0, 2.001, 3.0));
    assert_eq!(o.direction, r.direction);
}
