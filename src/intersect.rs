use crate::ray::Ray;
use crate::shape::Primitive;
use crate::vector::{ Point3D, Vector3D };

/// Everything shading needs to know about a ray-primitive hit.
///
/// The stored normal always opposes the incident ray; `front_face` records
/// whether the ray struck the outside of the surface (so refractive materials
/// know which way they are crossing the boundary).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntersectionInfo {
    pub hit_point: Point3D,
    pub normal: Vector3D,
    pub front_face: bool,
    pub t: f64,
}

/// Finds the closest primitive hit by `ray`, if any.
///
/// Only strictly positive distances count; ties go to the earlier primitive.
pub fn find_closest_intersection<'a>(primitives: &'a [Primitive], ray: &Ray)
    -> Option<(&'a Primitive, IntersectionInfo)> {
    let mut closest: Option<(&Primitive, f64)> = None;

    for primitive in primitives {
        if let Some(t) = primitive.hits(ray) {
            if t > 0.0 && closest.map_or(true, |(_, best)| t < best) {
                closest = Some((primitive, t));
            }
        }
    }

    closest.map(|(primitive, t)| {
        let hit_point = ray.at(t);
        let outward_normal = primitive.normal_at(hit_point);
        let front_face = ray.direction.dot(&outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        (primitive, IntersectionInfo { hit_point, normal, front_face, t })
    })
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feq;
    use crate::material::Material;
    use crate::shape::ShapeKind;
    use crate::transform::Transform;

    fn sphere_at(z: f64) -> Primitive {
        Primitive::new(
            ShapeKind::sphere(Point3D::origin(), 1.0),
            Transform::at(Vector3D::new(0.0, 0.0, z)),
            Material::default()
        )
    }

    #[test]
    fn closest_of_two_spheres_wins() {
        let primitives = vec![sphere_at(10.0), sphere_at(5.0)];
        let ray = Ray::new(Point3D::origin(), Vector3D::new(0.0, 0.0, 1.0));

        let (hit_prim, info) =
            find_closest_intersection(&primitives, &ray).unwrap();

        assert!(feq(info.t, 4.0));
        assert!(std::ptr::eq(hit_prim, &primitives[1]));
    }

    #[test]
    fn empty_scene_misses() {
        let ray = Ray::new(Point3D::origin(), Vector3D::new(0.0, 0.0, 1.0));

        assert!(find_closest_intersection(&[], &ray).is_none());
    }

    #[test]
    fn front_face_hit_keeps_outward_normal() {
        let primitives = vec![sphere_at(5.0)];
        let ray = Ray::new(Point3D::origin(), Vector3D::new(0.0, 0.0, 1.0));

        let (_, info) = find_closest_intersection(&primitives, &ray).unwrap();

        assert!(info.front_face);
        assert_eq!(info.normal, Vector3D::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn back_face_hit_flips_normal() {
        // Ray starts inside the sphere; the far surface is a back-face hit.
        let primitives = vec![sphere_at(0.0)];
        let ray = Ray::new(Point3D::origin(), Vector3D::new(0.0, 0.0, 1.0));

        let (_, info) = find_closest_intersection(&primitives, &ray).unwrap();

        assert!(!info.front_face);
        assert_eq!(info.normal, Vector3D::new(0.0, 0.0, -1.0));
        assert_eq!(info.hit_point, Point3D::new(0.0, 0.0, 1.0));
    }
}
