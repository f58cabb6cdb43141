use std::ops::{ Add, Sub, Neg, Mul, Div };

use crate::feq;

/// A 3D vector with double-precision components.
///
/// Vectors are plain values; every operation returns a new vector. Colors in
/// scene files are normalized into [`crate::color::Color`], not stored here.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Vector3D {
    fn eq(&self, other: &Vector3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl Vector3D {
    pub fn new(x: f64, y: f64, z: f64) -> Vector3D {
        Vector3D { x, y, z }
    }

    pub fn zero() -> Vector3D {
        Default::default()
    }

    pub fn length(&self) -> f64 {
        f64::sqrt(
            self.x.powi(2)
            + self.y.powi(2)
            + self.z.powi(2)
        )
    }

    /// Normalizes this vector to unit length.
    ///
    /// A zero-length vector normalizes to the zero vector rather than NaN;
    /// degenerate directions stay degenerate and are caught by the epsilon
    /// guards in the intersection code.
    pub fn normalize(&self) -> Vector3D {
        let len = self.length();
        if len == 0.0 {
            return Vector3D::zero();
        }

        Vector3D {
            x: self.x / len,
            y: self.y / len,
            z: self.z / len,
        }
    }

    pub fn dot(&self, other: &Vector3D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3D) -> Vector3D {
        Vector3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Reflects a vector across a normal.
    pub fn reflect(&self, normal: &Vector3D) -> Vector3D {
        *self - (*normal * 2.0 * self.dot(normal))
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<f64> for Vector3D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

impl Mul<Vector3D> for f64 {
    type Output = Vector3D;

    fn mul(self, other: Vector3D) -> Vector3D {
        other * self
    }
}

/// Componentwise vector product.
impl Mul for Vector3D {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }
}

impl Div<f64> for Vector3D {
    type Output = Self;

    fn div(self, other: f64) -> Self {
        Self {
            x: self.x / other,
            y: self.y / other,
            z: self.z / other,
        }
    }
}

/// Componentwise vector quotient.
impl Div for Vector3D {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        Self {
            x: self.x / other.x,
            y: self.y / other.y,
            z: self.z / other.z,
        }
    }
}

/// A point in 3D space.
///
/// Kept distinct from [`Vector3D`] so that the type system enforces the
/// point/vector algebra: point − point = vector, point ± vector = point.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Point3D {
    fn eq(&self, other: &Point3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Point3D {
        Point3D { x, y, z }
    }

    pub fn origin() -> Point3D {
        Default::default()
    }

    pub fn to_vector(&self) -> Vector3D {
        Vector3D { x: self.x, y: self.y, z: self.z }
    }
}

impl Add<Vector3D> for Point3D {
    type Output = Point3D;

    fn add(self, other: Vector3D) -> Point3D {
        Point3D {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub<Vector3D> for Point3D {
    type Output = Point3D;

    fn sub(self, other: Vector3D) -> Point3D {
        Point3D {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Sub for Point3D {
    type Output = Vector3D;

    fn sub(self, other: Point3D) -> Vector3D {
        Vector3D {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

/* Tests */

#[test]
fn add_vectors() {
    let a1 = Vector3D::new(3.0, -2.0, 5.0);
    let a2 = Vector3D::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Vector3D::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_points() {
    let p1 = Point3D::new(3.0, 2.0, 1.0);
    let p2 = Point3D::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Vector3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn sub_vector_from_point() {
    let p = Point3D::new(3.0, 2.0, 1.0);
    let v = Vector3D::new(5.0, 6.0, 7.0);

    assert_eq!(p - v, Point3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_vector() {
    let a = Vector3D::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Vector3D::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_scalar() {
    let a = Vector3D::new(1.0, -2.0, 3.0);

    assert_eq!(a * 3.5, Vector3D::new(3.5, -7.0, 10.5));
    assert_eq!(3.5 * a, Vector3D::new(3.5, -7.0, 10.5));
}

#[test]
fn div_scalar() {
    let a = Vector3D::new(1.0, -2.0, 3.0);

    assert_eq!(a / 2.0, Vector3D::new(0.5, -1.0, 1.5));
}

#[test]
fn mul_componentwise() {
    let a = Vector3D::new(1.0, 2.0, 3.0);
    let b = Vector3D::new(2.0, 3.0, 4.0);

    assert_eq!(a * b, Vector3D::new(2.0, 6.0, 12.0));
}

#[test]
fn magnitude() {
    let v = Vector3D::new(1.0, 2.0, 3.0);

    assert_eq!(v.length(), f64::sqrt(14.0));
    assert_eq!((-v).length(), f64::sqrt(14.0));
}

#[test]
fn normalize_clean() {
    let v = Vector3D::new(4.0, 0.0, 0.0);

    assert_eq!(v.normalize(), Vector3D::new(1.0, 0.0, 0.0));
}

#[test]
fn normalize_dirty() {
    let v = Vector3D::new(1.0, 2.0, 3.0);
    let e = Vector3D::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v.normalize(), e);
}

#[test]
fn normalize_zero_stays_zero() {
    let v = Vector3D::zero();

    assert_eq!(v.normalize(), Vector3D::zero());
}

#[test]
fn dot_vectors() {
    let a = Vector3D::new(1.0, 2.0, 3.0);
    let b = Vector3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Vector3D::new(1.0, 2.0, 3.0);
    let b = Vector3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Vector3D::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Vector3D::new(1.0, -2.0, 1.0));
}

#[test]
fn reflect_45() {
    let v = Vector3D::new(1.0, -1.0, 0.0);
    let n = Vector3D::new(0.0, 1.0, 0.0);
    let r = v.reflect(&n);

    assert_eq!(r, Vector3D::new(1.0, 1.0, 0.0));
}
