use crate::consts::{ PARALLEL_EPSILON, AXIS_EPSILON, TRIANGLE_EPSILON };
use crate::material::Material;
use crate::ray::Ray;
use crate::transform::Transform;
use crate::vector::{ Point3D, Vector3D };

/// The axis a degenerate plane is perpendicular to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// The geometry of a primitive, in its local coordinate frame.
///
/// Every variant is a closed-form surface; intersections are computed
/// analytically against a local-space ray. The `Plane` variant is the one
/// degenerate shape: it carries no local frame at all and is always tested
/// against the world-space ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShapeKind {
    Sphere {
        center: Point3D,
        radius: f64,
    },

    /// An axis-aligned infinite plane at `offset` along `axis`.
    Plane {
        axis: Axis,
        offset: f64,
    },

    Cube {
        center: Point3D,
        side: f64,
    },

    /// A cylinder around `axis` starting at `center`. A non-positive height
    /// makes it infinite (no caps).
    Cylinder {
        center: Point3D,
        axis: Vector3D,
        radius: f64,
        height: f64,
    },

    /// A cone whose base disk sits at `base`, apex along `direction`.
    /// `height == -1.0` means infinite (apex at the base point, opening along
    /// `direction`); a positive `cut_height` truncates the cone with a top
    /// disk.
    Cone {
        base: Point3D,
        radius: f64,
        height: f64,
        direction: Vector3D,
        cut_height: f64,
    },

    /// A triangle with vertices relative to its centroid; the centroid itself
    /// lives in the owning transform's position.
    Triangle {
        v1: Point3D,
        v2: Point3D,
        v3: Point3D,
    },
}

impl ShapeKind {
    pub fn sphere(center: Point3D, radius: f64) -> ShapeKind {
        ShapeKind::Sphere { center, radius }
    }

    pub fn plane(axis: Axis, offset: f64) -> ShapeKind {
        ShapeKind::Plane { axis, offset }
    }

    pub fn cube(center: Point3D, side: f64) -> ShapeKind {
        ShapeKind::Cube { center, side }
    }

    /// Creates a cylinder, normalizing the axis. A near-zero axis falls back
    /// to +Y.
    pub fn cylinder(center: Point3D, axis: Vector3D, radius: f64, height: f64)
        -> ShapeKind {
        let axis = if axis.length() < 0.001 {
            Vector3D::new(0.0, 1.0, 0.0)
        } else {
            axis.normalize()
        };

        ShapeKind::Cylinder { center, axis, radius, height }
    }

    /// Creates a cone, normalizing the apex direction. Pass `height == -1.0`
    /// for an infinite cone and a negative `cut_height` for an uncut one.
    pub fn cone(base: Point3D, radius: f64, height: f64,
                direction: Vector3D, cut_height: f64) -> ShapeKind {
        ShapeKind::Cone {
            base,
            radius,
            height,
            direction: direction.normalize(),
            cut_height,
        }
    }
}

/// A renderable object: local geometry, a placement transform and a material.
#[derive(Clone, Debug)]
pub struct Primitive {
    pub kind: ShapeKind,
    pub transform: Transform,
    pub material: Material,
}

impl Primitive {
    pub fn new(kind: ShapeKind, transform: Transform, material: Material)
        -> Primitive {
        Primitive { kind, transform, material }
    }

    /// Builds a triangle primitive from world-space vertices.
    ///
    /// Vertices are re-centered around their centroid, which becomes the
    /// transform position; rotating the triangle then spins it in place.
    pub fn triangle(w1: Point3D, w2: Point3D, w3: Point3D, material: Material)
        -> Primitive {
        let centroid = Vector3D::new(
            (w1.x + w2.x + w3.x) / 3.0,
            (w1.y + w2.y + w3.y) / 3.0,
            (w1.z + w2.z + w3.z) / 3.0,
        );
        let c = Point3D::new(centroid.x, centroid.y, centroid.z);

        Primitive {
            kind: ShapeKind::Triangle {
                v1: Point3D::origin() + (w1 - c),
                v2: Point3D::origin() + (w2 - c),
                v3: Point3D::origin() + (w3 - c),
            },
            transform: Transform::at(centroid),
            material,
        }
    }

    /// Closest intersection distance along `ray`, if any.
    ///
    /// The ray is mapped into the primitive's local frame first, except for
    /// planes which are tested in world space directly.
    pub fn hits(&self, ray: &Ray) -> Option<f64> {
        if let ShapeKind::Plane { axis, offset } = self.kind {
            return plane_hits(axis, offset, ray);
        }

        let local = self.transform.transform_ray(ray);
        match self.kind {
            ShapeKind::Sphere { center, radius } =>
                sphere_hits(center, radius, &local),
            ShapeKind::Cube { center, side } =>
                cube_hits(center, side, &local),
            ShapeKind::Cylinder { center, axis, radius, height } =>
                cylinder_hits(center, axis, radius, height, &local),
            ShapeKind::Cone { base, radius, height, direction, cut_height } =>
                cone_hits(base, radius, height, direction, cut_height, &local),
            ShapeKind::Triangle { v1, v2, v3 } =>
                triangle_hits(v1, v2, v3, &local),
            ShapeKind::Plane { .. } => unreachable!(),
        }
    }

    /// Outward surface normal at a world-space point on the primitive.
    pub fn normal_at(&self, point: Point3D) -> Vector3D {
        if let ShapeKind::Plane { axis, .. } = self.kind {
            return plane_normal(axis);
        }

        let local_point = self.transform.reverse(point);
        let local_normal = match self.kind {
            ShapeKind::Sphere { center, .. } =>
                sphere_normal(center, local_point),
            ShapeKind::Cube { center, side } =>
                cube_normal(center, side, local_point),
            ShapeKind::Cylinder { center, axis, radius: _, height } =>
                cylinder_normal(center, axis, height, local_point),
            ShapeKind::Cone { base, radius, height, direction, cut_height } =>
                cone_normal(base, radius, height, direction, cut_height,
                    local_point),
            ShapeKind::Triangle { v1, v2, v3 } =>
                triangle_normal(v1, v2, v3),
            ShapeKind::Plane { .. } => unreachable!(),
        };

        self.transform.rotate(local_normal)
    }
}

fn sphere_hits(center: Point3D, radius: f64, ray: &Ray) -> Option<f64> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.dot(&oc) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t1 = (-b - discriminant.sqrt()) / (2.0 * a);
    let t2 = (-b + discriminant.sqrt()) / (2.0 * a);

    if t1 > 0.0 {
        Some(t1)
    } else if t2 > 0.0 {
        Some(t2)
    } else {
        None
    }
}

fn sphere_normal(center: Point3D, point: Point3D) -> Vector3D {
    (point - center).normalize()
}

fn plane_hits(axis: Axis, offset: f64, ray: &Ray) -> Option<f64> {
    let (dir, origin) = match axis {
        Axis::X => (ray.direction.x, ray.origin.x),
        Axis::Y => (ray.direction.y, ray.origin.y),
        Axis::Z => (ray.direction.z, ray.origin.z),
    };

    if dir.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (offset - origin) / dir;
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

fn plane_normal(axis: Axis) -> Vector3D {
    match axis {
        Axis::X => Vector3D::new(1.0, 0.0, 0.0),
        Axis::Y => Vector3D::new(0.0, 1.0, 0.0),
        Axis::Z => Vector3D::new(0.0, 0.0, 1.0),
    }
}

fn cube_hits(center: Point3D, side: f64, ray: &Ray) -> Option<f64> {
    let half = side / 2.0;
    let min = Point3D::new(center.x - half, center.y - half, center.z - half);
    let max = Point3D::new(center.x + half, center.y + half, center.z + half);

    let mut tx1 = (min.x - ray.origin.x) / ray.direction.x;
    let mut tx2 = (max.x - ray.origin.x) / ray.direction.x;
    let mut ty1 = (min.y - ray.origin.y) / ray.direction.y;
    let mut ty2 = (max.y - ray.origin.y) / ray.direction.y;
    let mut tz1 = (min.z - ray.origin.z) / ray.direction.z;
    let mut tz2 = (max.z - ray.origin.z) / ray.direction.z;

    if tx1 > tx2 { std::mem::swap(&mut tx1, &mut tx2); }
    if ty1 > ty2 { std::mem::swap(&mut ty1, &mut ty2); }
    if tz1 > tz2 { std::mem::swap(&mut tz1, &mut tz2); }

    let tmin = tx1.max(ty1).max(tz1);
    let tmax = tx2.min(ty2).min(tz2);

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    // Origin inside the box: the entry point is behind us, use the exit.
    if tmin < 0.0 {
        Some(tmax)
    } else {
        Some(tmin)
    }
}

fn cube_normal(center: Point3D, side: f64, point: Point3D) -> Vector3D {
    let half = side / 2.0;
    let dir = point - center;

    if (dir.x.abs() - half).abs() < PARALLEL_EPSILON {
        return Vector3D::new(if dir.x > 0.0 { 1.0 } else { -1.0 }, 0.0, 0.0);
    }
    if (dir.y.abs() - half).abs() < PARALLEL_EPSILON {
        return Vector3D::new(0.0, if dir.y > 0.0 { 1.0 } else { -1.0 }, 0.0);
    }
    if (dir.z.abs() - half).abs() < PARALLEL_EPSILON {
        return Vector3D::new(0.0, 0.0, if dir.z > 0.0 { 1.0 } else { -1.0 });
    }

    dir.normalize()
}

struct CylinderHit {
    t: f64,
}

fn cylinder_side_hit(center: Point3D, axis: Vector3D, radius: f64,
                     height: f64, limited: bool, ray: &Ray)
    -> Option<CylinderHit> {
    // Split both the origin offset and the direction into components parallel
    // and perpendicular to the axis; the side intersection only involves the
    // perpendicular parts.
    let oc = ray.origin - center;
    let oc_perp = oc - axis * oc.dot(&axis);
    let dir_perp = ray.direction - axis * ray.direction.dot(&axis);

    let a = dir_perp.dot(&dir_perp);
    if a.abs() < PARALLEL_EPSILON {
        // Parallel to the axis: grazing the surface or travelling inside
        // never counts as a side hit.
        return None;
    }

    let b = 2.0 * oc_perp.dot(&dir_perp);
    let c = oc_perp.dot(&oc_perp) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    let t = if t1 > PARALLEL_EPSILON {
        t1
    } else if t2 > PARALLEL_EPSILON {
        t2
    } else {
        return None;
    };

    if limited {
        let projection = (ray.at(t) - center).dot(&axis);
        if projection < -PARALLEL_EPSILON || projection > height + PARALLEL_EPSILON {
            return None;
        }
    }

    Some(CylinderHit { t })
}

fn cylinder_cap_hit(cap_center: Point3D, axis: Vector3D, radius: f64,
                    ray: &Ray) -> Option<CylinderHit> {
    let denom = ray.direction.dot(&axis);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let oc = ray.origin - cap_center;
    let t = -oc.dot(&axis) / denom;
    if t < PARALLEL_EPSILON {
        return None;
    }

    let v = ray.at(t) - cap_center;
    let radial = v - axis * v.dot(&axis);
    if radial.length() <= radius + PARALLEL_EPSILON {
        Some(CylinderHit { t })
    } else {
        None
    }
}

fn cylinder_hits(center: Point3D, axis: Vector3D, radius: f64, height: f64,
                 ray: &Ray) -> Option<f64> {
    let limited = height > 0.0;

    let side = cylinder_side_hit(center, axis, radius, height, limited, ray);
    let (bottom, top) = if limited {
        let top_center = center + axis * height;
        (cylinder_cap_hit(center, axis, radius, ray),
         cylinder_cap_hit(top_center, axis, radius, ray))
    } else {
        (None, None)
    };

    [side, bottom, top]
        .iter()
        .flatten()
        .map(|hit| hit.t)
        .fold(None, |best, t| match best {
            Some(b) if b <= t => Some(b),
            _ => Some(t),
        })
}

fn cylinder_normal(center: Point3D, axis: Vector3D, height: f64,
                   point: Point3D) -> Vector3D {
    let limited = height > 0.0;

    if limited {
        let dist_to_base = (point - center).dot(&axis);
        if dist_to_base.abs() < PARALLEL_EPSILON {
            return -axis;
        }

        let top_center = center + axis * height;
        let dist_to_top = (point - top_center).dot(&axis);
        if dist_to_top.abs() < PARALLEL_EPSILON {
            return axis;
        }
    }

    let cp = point - center;
    let circle_center = center + axis * cp.dot(&axis);
    let normal = point - circle_center;

    if normal.length() < PARALLEL_EPSILON {
        // Point sits on the axis; any perpendicular direction works.
        let fallback = if axis.x.abs() < 0.9 {
            Vector3D::new(1.0, 0.0, 0.0)
        } else {
            Vector3D::new(0.0, 1.0, 0.0)
        };
        return axis.cross(&fallback).normalize();
    }

    normal.normalize()
}

fn cone_is_on_base(base: Point3D, radius: f64, height: f64,
                   direction: Vector3D, point: Point3D) -> bool {
    if height == -1.0 {
        return false;
    }

    let to_point = point - base;
    let along = to_point.dot(&direction);
    if along.abs() > AXIS_EPSILON {
        return false;
    }

    (to_point - direction * along).length() <= radius
}

fn cone_top_radius(radius: f64, height: f64, cut_height: f64) -> f64 {
    if cut_height <= 0.0 {
        0.0
    } else {
        radius * (1.0 - cut_height / height)
    }
}

fn cone_is_on_top(base: Point3D, radius: f64, height: f64,
                  direction: Vector3D, cut_height: f64, point: Point3D)
    -> bool {
    if height == -1.0 || cut_height <= 0.0 {
        return false;
    }

    let top_center = base + direction * cut_height;
    let to_point = point - top_center;
    let along = to_point.dot(&direction);
    if along.abs() > AXIS_EPSILON {
        return false;
    }

    let top_radius = cone_top_radius(radius, height, cut_height);
    (to_point - direction * along).length() <= top_radius
}

fn cone_hits(base: Point3D, radius: f64, height: f64, direction: Vector3D,
             cut_height: f64, ray: &Ray) -> Option<f64> {
    let mut t_bottom = None;
    let mut t_top = None;

    if height != -1.0 {
        // Base disk.
        let denom = ray.direction.dot(&-direction);
        if denom.abs() > AXIS_EPSILON {
            let oc = ray.origin - base;
            let t = -oc.dot(&-direction) / denom;
            if t > 0.0 && cone_is_on_base(base, radius, height, direction,
                                          ray.at(t)) {
                t_bottom = Some(t);
            }
        }

        // Top disk, present only on cut cones.
        if cut_height > 0.0 {
            let top_center = base + direction * cut_height;
            let denom = ray.direction.dot(&direction);
            if denom.abs() > AXIS_EPSILON {
                let oc = ray.origin - top_center;
                let t = -oc.dot(&direction) / denom;
                if t > 0.0 && cone_is_on_top(base, radius, height, direction,
                                             cut_height, ray.at(t)) {
                    t_top = Some(t);
                }
            }
        }
    }

    // Lateral surface: quadratic in the apex frame. For infinite cones the
    // apex coincides with the base point and the cone opens along `direction`.
    let mut t_surface = None;
    {
        let apex = if height == -1.0 {
            base
        } else {
            base + direction * height
        };
        let axis = -direction;
        let oc = ray.origin - apex;

        let alpha = if height == -1.0 {
            radius.atan()
        } else {
            radius.atan2(height)
        };
        let cos_a2 = alpha.cos().powi(2);

        let dir_axis = ray.direction.dot(&axis);
        let oc_axis = oc.dot(&axis);
        let a = dir_axis * dir_axis
            - cos_a2 * ray.direction.dot(&ray.direction);
        let b = 2.0 * (dir_axis * oc_axis - cos_a2 * ray.direction.dot(&oc));
        let c = oc_axis * oc_axis - cos_a2 * oc.dot(&oc);

        let discriminant = b * b - 4.0 * a * c;
        if discriminant >= 0.0 {
            let sqrt_disc = discriminant.sqrt();
            let h_max = if cut_height > 0.0 { cut_height } else { height };

            let check = |t: f64, current: Option<f64>| -> Option<f64> {
                if t <= 0.0 {
                    return current;
                }
                if let Some(cur) = current {
                    if t >= cur {
                        return current;
                    }
                }

                // Reject lateral roots outside the cone's height range.
                let h = (ray.at(t) - base).dot(&direction);
                if h >= 0.0 && (height == -1.0 || h <= h_max) {
                    Some(t)
                } else {
                    current
                }
            };

            let t1 = (-b - sqrt_disc) / (2.0 * a);
            let t2 = (-b + sqrt_disc) / (2.0 * a);
            t_surface = check(t1, t_surface);
            t_surface = check(t2, t_surface);
        }
    }

    [t_bottom, t_surface, t_top]
        .iter()
        .flatten()
        .fold(None, |best, &t| match best {
            Some(b) if b <= t => Some(b),
            _ => Some(t),
        })
}

fn cone_normal(base: Point3D, radius: f64, height: f64, direction: Vector3D,
               cut_height: f64, point: Point3D) -> Vector3D {
    if cut_height > 0.0
        && cone_is_on_top(base, radius, height, direction, cut_height, point) {
        return direction;
    }
    if cone_is_on_base(base, radius, height, direction, point) {
        return -direction;
    }

    let to_point = point - base;
    let along = to_point.dot(&direction);
    let radial = to_point - direction * along;

    if radial.length() < AXIS_EPSILON {
        // On the axis itself; pick any perpendicular.
        return if direction.x.abs() > direction.y.abs() {
            Vector3D::new(direction.z, 0.0, -direction.x).normalize()
        } else {
            Vector3D::new(0.0, direction.z, -direction.y).normalize()
        };
    }

    let max_height = if cut_height > 0.0 { cut_height } else { height };
    let theta = if height == -1.0 {
        radius.atan()
    } else {
        radius.atan2(max_height)
    };

    let normal = radial.normalize() * theta.cos() + direction * theta.sin();
    normal.normalize()
}

fn triangle_hits(v1: Point3D, v2: Point3D, v3: Point3D, ray: &Ray)
    -> Option<f64> {
    let edge1 = v2 - v1;
    let edge2 = v3 - v1;

    let pvec = ray.direction.cross(&edge2);
    let det = edge1.dot(&pvec);
    if det.abs() < TRIANGLE_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray.origin - v1;

    let u = tvec.dot(&pvec) * inv_det;
    if u < 0.0 || u > 1.0 {
        return None;
    }

    let qvec = tvec.cross(&edge1);
    let v = ray.direction.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(&qvec) * inv_det;
    if t > TRIANGLE_EPSILON {
        Some(t)
    } else {
        None
    }
}

fn triangle_normal(v1: Point3D, v2: Point3D, v3: Point3D) -> Vector3D {
    let edge1 = v2 - v1;
    let edge2 = v3 - v1;
    let normal = edge1.cross(&edge2);

    if normal.length() > 0.0 {
        normal.normalize()
    } else {
        normal
    }
}

/* Tests */

#[cfg(test)]
use crate::feq;

#[cfg(test)]
fn plain(kind: ShapeKind) -> Primitive {
    Primitive::new(kind, Transform::default(), Material::default())
}

#[test]
fn sphere_hit_from_outside() {
    let s = plain(ShapeKind::sphere(Point3D::origin(), 1.0));
    let r = Ray::new(
        Point3D::new(0.0, 0.0, -5.0),
        Vector3D::new(0.0, 0.0, 1.0)
    );

    assert!(feq(s.hits(&r).unwrap(), 4.0));
}

#[test]
fn sphere_hit_from_inside_takes_far_root() {
    let s = plain(ShapeKind::sphere(Point3D::origin(), 1.0));
    let r = Ray::new(Point3D::origin(), Vector3D::new(0.0, 0.0, 1.0));

    assert!(feq(s.hits(&r).unwrap(), 1.0));
}

#[test]
fn sphere_behind_ray_misses() {
    let s = plain(ShapeKind::sphere(Point3D::origin(), 1.0));
    let r = Ray::new(
        Point3D::new(0.0, 0.0, 5.0),
        Vector3D::new(0.0, 0.0, 1.0)
    );

    assert_eq!(s.hits(&r), None);
}

#[test]
fn sphere_positioned_by_transform() {
    let s = Primitive::new(
        ShapeKind::sphere(Point3D::origin(), 1.0),
        Transform::at(Vector3D::new(0.0, 0.0, 10.0)),
        Material::default()
    );
    let r = Ray::new(
        Point3D::new(0.0, 0.0, 0.0),
        Vector3D::new(0.0, 0.0, 1.0)
    );

    assert!(feq(s.hits(&r).unwrap(), 9.0));
}

#[test]
fn sphere_normal_points_outward() {
    let s = plain(ShapeKind::sphere(Point3D::origin(), 1.0));

    let n = s.normal_at(Point3D::new(1.0, 0.0, 0.0));
    assert_eq!(n, Vector3D::new(1.0, 0.0, 0.0));
}

#[test]
fn plane_hit_and_parallel_miss() {
    let p = plain(ShapeKind::plane(Axis::Y, -2.0));

    let down = Ray::new(
        Point3D::new(0.0, 3.0, 0.0),
        Vector3D::new(0.0, -1.0, 0.0)
    );
    assert!(feq(p.hits(&down).unwrap(), 5.0));

    let along = Ray::new(
        Point3D::new(0.0, 3.0, 0.0),
        Vector3D::new(1.0, 0.0, 0.0)
    );
    assert_eq!(p.hits(&along), None);
}

#[test]
fn plane_normal_is_axis() {
    let p = plain(ShapeKind::plane(Axis::Z, 1.0));

    assert_eq!(p.normal_at(Point3D::origin()), Vector3D::new(0.0, 0.0, 1.0));
}

#[test]
fn cube_hit_from_outside() {
    let c = plain(ShapeKind::cube(Point3D::origin(), 2.0));
    let r = Ray::new(
        Point3D::new(0.0, 0.0, -5.0),
        Vector3D::new(0.0, 0.0, 1.0)
    );

    assert!(feq(c.hits(&r).unwrap(), 4.0));
}

#[test]
fn cube_hit_from_inside_returns_exit() {
    let c = plain(ShapeKind::cube(Point3D::origin(), 2.0));
    let r = Ray::new(Point3D::origin(), Vector3D::new(0.0, 0.0, 1.0));

    assert!(feq(c.hits(&r).unwrap(), 1.0));
}

#[test]
fn cube_miss() {
    let c = plain(ShapeKind::cube(Point3D::origin(), 2.0));
    let r = Ray::new(
        Point3D::new(0.0, 5.0, -5.0),
        Vector3D::new(0.0, 0.0, 1.0)
    );

    assert_eq!(c.hits(&r), None);
}

#[test]
fn cube_face_normals() {
    let c = plain(ShapeKind::cube(Point3D::origin(), 2.0));

    assert_eq!(
        c.normal_at(Point3D::new(1.0, 0.3, 0.2)),
        Vector3D::new(1.0, 0.0, 0.0)
    );
    assert_eq!(
        c.normal_at(Point3D::new(0.3, -1.0, 0.2)),
        Vector3D::new(0.0, -1.0, 0.0)
    );
}

#[test]
fn cylinder_side_hit_and_normal() {
    let c = plain(ShapeKind::cylinder(
        Point3D::origin(),
        Vector3D::new(0.0, 1.0, 0.0),
        1.0,
        4.0
    ));
    let r = Ray::new(
        Point3D::new(-5.0, 2.0, 0.0),
        Vector3D::new(1.0, 0.0, 0.0)
    );

    assert!(feq(c.hits(&r).unwrap(), 4.0));
    assert_eq!(
        c.normal_at(Point3D::new(-1.0, 2.0, 0.0)),
        Vector3D::new(-1.0, 0.0, 0.0)
    );
}

#[test]
fn cylinder_cap_hit_and_normal() {
    let c = plain(ShapeKind::cylinder(
        Point3D::origin(),
        Vector3D::new(0.0, 1.0, 0.0),
        1.0,
        4.0
    ));
    let r = Ray::new(
        Point3D::new(0.5, 10.0, 0.0),
        Vector3D::new(0.0, -1.0, 0.0)
    );

    assert!(feq(c.hits(&r).unwrap(), 6.0));
    assert_eq!(
        c.normal_at(Point3D::new(0.5, 4.0, 0.0)),
        Vector3D::new(0.0, 1.0, 0.0)
    );
}

#[test]
fn cylinder_parallel_inside_misses_side() {
    let c = plain(ShapeKind::cylinder(
        Point3D::origin(),
        Vector3D::new(0.0, 1.0, 0.0),
        1.0,
        0.0
    ));
    let r = Ray::new(
        Point3D::new(0.5, 0.0, 0.0),
        Vector3D::new(0.0, 1.0, 0.0)
    );

    assert_eq!(c.hits(&r), None);
}

#[test]
fn cylinder_above_caps_misses() {
    let c = plain(ShapeKind::cylinder(
        Point3D::origin(),
        Vector3D::new(0.0, 1.0, 0.0),
        1.0,
        4.0
    ));
    let r = Ray::new(
        Point3D::new(-5.0, 6.0, 0.0),
        Vector3D::new(1.0, 0.0, 0.0)
    );

    assert_eq!(c.hits(&r), None);
}

#[test]
fn cone_base_hit_from_below() {
    let c = plain(ShapeKind::cone(
        Point3D::origin(),
        2.0,
        4.0,
        Vector3D::new(0.0, 1.0, 0.0),
        -1.0
    ));
    let r = Ray::new(
        Point3D::new(1.0, -2.0, 0.0),
        Vector3D::new(0.0, 1.0, 0.0)
    );

    let t = c.hits(&r).unwrap();
    assert!(t > 0.0);
    assert!(feq(t, 2.0));
}

#[test]
fn cone_lateral_hit() {
    let c = plain(ShapeKind::cone(
        Point3D::origin(),
        2.0,
        4.0,
        Vector3D::new(0.0, 1.0, 0.0),
        -1.0
    ));
    // At y = 2 the cone's cross-section has radius 1.
    let r = Ray::new(
        Point3D::new(-5.0, 2.0, 0.0),
        Vector3D::new(1.0, 0.0, 0.0)
    );

    assert!(feq(c.hits(&r).unwrap(), 4.0));
}

#[test]
fn cone_above_apex_misses() {
    let c = plain(ShapeKind::cone(
        Point3D::origin(),
        2.0,
        4.0,
        Vector3D::new(0.0, 1.0, 0.0),
        -1.0
    ));
    let r = Ray::new(
        Point3D::new(-5.0, 5.0, 0.0),
        Vector3D::new(1.0, 0.0, 0.0)
    );

    assert_eq!(c.hits(&r), None);
}

#[test]
fn cut_cone_top_disk_hit() {
    let c = plain(ShapeKind::cone(
        Point3D::origin(),
        2.0,
        4.0,
        Vector3D::new(0.0, 1.0, 0.0),
        2.0
    ));
    // Top disk at y = 2 has radius 1; aim inside it.
    let r = Ray::new(
        Point3D::new(0.5, 10.0, 0.0),
        Vector3D::new(0.0, -1.0, 0.0)
    );

    assert!(feq(c.hits(&r).unwrap(), 8.0));
    assert_eq!(
        c.normal_at(Point3D::new(0.5, 2.0, 0.0)),
        Vector3D::new(0.0, 1.0, 0.0)
    );
}

#[test]
fn cone_base_normal_points_down() {
    let c = plain(ShapeKind::cone(
        Point3D::origin(),
        2.0,
        4.0,
        Vector3D::new(0.0, 1.0, 0.0),
        -1.0
    ));

    assert_eq!(
        c.normal_at(Point3D::new(1.0, 0.0, 0.0)),
        Vector3D::new(0.0, -1.0, 0.0)
    );
}

#[test]
fn triangle_hit_inside() {
    let t = Primitive::triangle(
        Point3D::new(-1.0, 0.0, 0.0),
        Point3D::new(1.0, 0.0, 0.0),
        Point3D::new(0.0, 1.0, 0.0),
        Material::default()
    );
    let r = Ray::new(
        Point3D::new(0.0, 0.25, -5.0),
        Vector3D::new(0.0, 0.0, 1.0)
    );

    assert!(feq(t.hits(&r).unwrap(), 5.0));
}

#[test]
fn triangle_miss_outside_edges() {
    let t = Primitive::triangle(
        Point3D::new(-1.0, 0.0, 0.0),
        Point3D::new(1.0, 0.0, 0.0),
        Point3D::new(0.0, 1.0, 0.0),
        Material::default()
    );
    let r = Ray::new(
        Point3D::new(2.0, 0.25, -5.0),
        Vector3D::new(0.0, 0.0, 1.0)
    );

    assert_eq!(t.hits(&r), None);
}

#[test]
fn triangle_vertices_recentered_on_centroid() {
    let t = Primitive::triangle(
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(3.0, 0.0, 0.0),
        Point3D::new(0.0, 3.0, 0.0),
        Material::default()
    );

    assert_eq!(t.transform.position, Vector3D::new(1.0, 1.0, 0.0));
    if let ShapeKind::Triangle { v1, .. } = t.kind {
        assert_eq!(v1, Point3D::new(-1.0, -1.0, 0.0));
    } else {
        panic!("expected triangle kind");
    }
}

#[test]
fn triangle_normal_from_winding() {
    let t = Primitive::triangle(
        Point3D::new(-1.0, 0.0, 0.0),
        Point3D::new(1.0, 0.0, 0.0),
        Point3D::new(0.0, 1.0, 0.0),
        Material::default()
    );

    assert_eq!(
        t.normal_at(Point3D::new(0.0, 0.25, 0.0)),
        Vector3D::new(0.0, 0.0, 1.0)
    );
}
