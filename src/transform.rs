use crate::ray::Ray;
use crate::vector::{ Point3D, Vector3D };

/// The affine transform attached to a primitive.
///
/// `translation` and `position` are both additive offsets; they are kept as
/// separate fields because scene files may specify a shape's placement through
/// either (or both). `rotation` holds Euler angles in radians about the X, Y
/// and Z axes.
///
/// Transforms are immutable once a scene is built, so primitives can be shared
/// freely across render threads.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Transform {
    pub translation: Vector3D,
    pub rotation: Vector3D,
    pub position: Vector3D,
}

fn rotate_x(v: Vector3D, angle: f64) -> Vector3D {
    let (sin, cos) = angle.sin_cos();
    Vector3D {
        x: v.x,
        y: v.y * cos - v.z * sin,
        z: v.y * sin + v.z * cos,
    }
}

fn rotate_y(v: Vector3D, angle: f64) -> Vector3D {
    let (sin, cos) = angle.sin_cos();
    Vector3D {
        x: v.x * cos + v.z * sin,
        y: v.y,
        z: -v.x * sin + v.z * cos,
    }
}

fn rotate_z(v: Vector3D, angle: f64) -> Vector3D {
    let (sin, cos) = angle.sin_cos();
    Vector3D {
        x: v.x * cos - v.y * sin,
        y: v.x * sin + v.y * cos,
        z: v.z,
    }
}

impl Transform {
    pub fn new(translation: Vector3D, rotation: Vector3D, position: Vector3D)
        -> Transform {
        Transform { translation, rotation, position }
    }

    pub fn at(position: Vector3D) -> Transform {
        Transform { position, ..Default::default() }
    }

    /// Rotates a direction from local space into world space.
    ///
    /// Applies the Z rotation first, then Y, then X.
    pub fn rotate(&self, v: Vector3D) -> Vector3D {
        let v = rotate_z(v, self.rotation.z);
        let v = rotate_y(v, self.rotation.y);
        rotate_x(v, self.rotation.x)
    }

    /// Rotates a direction from world space into local space.
    ///
    /// Inverse of `rotate`: negated angles applied X first, then Y, then Z.
    pub fn rotate_inverse(&self, v: Vector3D) -> Vector3D {
        let v = rotate_x(v, -self.rotation.x);
        let v = rotate_y(v, -self.rotation.y);
        rotate_z(v, -self.rotation.z)
    }

    /// Maps a local-space point into world space.
    pub fn apply(&self, p: Point3D) -> Point3D {
        let rotated = self.rotate(p.to_vector());
        Point3D::origin() + rotated + self.translation + self.position
    }

    /// Maps a world-space point back into local space.
    pub fn reverse(&self, p: Point3D) -> Point3D {
        let shifted = (p - self.translation - self.position).to_vector();
        Point3D::origin() + self.rotate_inverse(shifted)
    }

    /// Maps a world-space ray into this transform's local space.
    ///
    /// Both origin and direction are inverse-rotated; the direction is
    /// renormalized afterwards unless it is the zero vector.
    pub fn transform_ray(&self, ray: &Ray) -> Ray {
        let origin = self.reverse(ray.origin);
        let direction = self.rotate_inverse(ray.direction);

        let direction = if direction.length() == 0.0 {
            direction
        } else {
            direction.normalize()
        };

        Ray { origin, direction }
    }
}

/* Tests */

#[cfg(test)]
use std::f64::consts::{ PI, FRAC_PI_2 };

#[test]
fn identity_transform() {
    let t = Transform::default();
    let p = Point3D::new(1.0, 2.0, 3.0);

    assert_eq!(t.apply(p), p);
    assert_eq!(t.reverse(p), p);
}

#[test]
fn translate_point() {
    let t = Transform::new(
        Vector3D::new(1.0, 0.0, 0.0),
        Vector3D::zero(),
        Vector3D::new(0.0, 2.0, 0.0)
    );
    let p = Point3D::new(0.0, 0.0, 3.0);

    assert_eq!(t.apply(p), Point3D::new(1.0, 2.0, 3.0));
    assert_eq!(t.reverse(t.apply(p)), p);
}

#[test]
fn rotate_quarter_turn_z() {
    let t = Transform::new(
        Vector3D::zero(),
        Vector3D::new(0.0, 0.0, FRAC_PI_2),
        Vector3D::zero()
    );
    let p = Point3D::new(1.0, 0.0, 0.0);

    assert_eq!(t.apply(p), Point3D::new(0.0, 1.0, 0.0));
}

#[test]
fn rotation_order_is_z_y_x() {
    let t = Transform::new(
        Vector3D::zero(),
        Vector3D::new(FRAC_PI_2, FRAC_PI_2, 0.0),
        Vector3D::zero()
    );

    // Y spin first maps +X to -Z, then the X spin leaves -Z on +Y's plane.
    let v = t.rotate(Vector3D::new(1.0, 0.0, 0.0));

    assert_eq!(v, Vector3D::new(0.0, 1.0, 0.0));
}

#[test]
fn rotate_inverse_undoes_rotate() {
    let t = Transform::new(
        Vector3D::zero(),
        Vector3D::new(0.3, -1.1, PI / 3.0),
        Vector3D::zero()
    );
    let v = Vector3D::new(1.0, 2.0, 3.0);

    assert_eq!(t.rotate_inverse(t.rotate(v)), v);
}

#[test]
fn transform_ray_translates_origin_only() {
    let t = Transform::at(Vector3D::new(3.0, 4.0, 5.0));
    let r = Ray::new(
        Point3D::new(1.0, 2.0, 3.0),
        Vector3D::new(0.0, 1.0, 0.0)
    );
    let local = t.transform_ray(&r);

    assert_eq!(local.origin, Point3D::new(-2.0, -2.0, -2.0));
    assert_eq!(local.direction, Vector3D::new(0.0, 1.0, 0.0));
}

#[test]
fn transform_ray_renormalizes_direction() {
    let t = Transform::default();
    let r = Ray::new(
        Point3D::origin(),
        Vector3D::new(0.0, 3.0, 0.0)
    );
    let local = t.transform_ray(&r);

    assert_eq!(local.direction, Vector3D::new(0.0, 1.0, 0.0));
}

#[test]
fn transform_ray_keeps_zero_direction() {
    let t = Transform::default();
    let r = Ray::new(Point3D::origin(), Vector3D::zero());
    let local = t.transform_ray(&r);

    assert_eq!(local.direction, Vector3D::zero());
}
