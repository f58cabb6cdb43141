use rand::Rng;

use crate::color::Color;
use crate::consts::RAY_OFFSET;
use crate::intersect::IntersectionInfo;
use crate::ray::Ray;
use crate::vector::Vector3D;

/// Recursion seam for material shading.
///
/// Reflective and refractive materials cast secondary rays; they do so through
/// this trait rather than calling back into a captured closure, so the render
/// driver stays the single owner of the scene. `depth` is the number of
/// bounces already taken.
pub trait RayTracer {
    fn trace(&self, ray: &Ray, depth: u32) -> Color;
}

/// Transparent materials stop recursing on their own past this many bounces,
/// independently of the driver's global depth limit.
const TRANSPARENT_DEPTH_LIMIT: u32 = 4;

/// Surface appearance of a primitive.
///
/// Each variant implements `compute_interaction`, which turns an incident ray
/// and its hit record into a color, recursing through the given tracer for
/// reflection and refraction rays.
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Flat diffuse surface; the illumination resolver does all the work.
    Matte {
        color: Color,
    },

    /// Specular reflector with an angle-dependent reflectivity boost.
    Mirror {
        color: Color,
        reflectivity: f64,
    },

    /// Reflector with roughness-controlled scatter of the reflection ray.
    Metal {
        color: Color,
        roughness: f64,
        reflectivity: f64,
    },

    /// Dielectric with Fresnel-blended reflection and refraction.
    Glass {
        color: Color,
        transparency: f64,
        reflectivity: f64,
        refraction_index: f64,
    },

    /// Like glass, with a boosted Fresnel term and a dispersion tint.
    Diamond {
        color: Color,
        transparency: f64,
        reflectivity: f64,
        refraction_index: f64,
        dispersion: f64,
    },

    /// Refraction only; reflects solely on total internal reflection.
    Translucent {
        color: Color,
        transparency: f64,
        refraction_index: f64,
    },

    /// Weighted mean of the interactions of its parts.
    Composite {
        color: Color,
        parts: Vec<(f64, Material)>,
    },
}

/// The fallback material is a red matte, applied to primitives whose scene
/// record omits one.
impl Default for Material {
    fn default() -> Material {
        Material::Matte { color: Color::red() }
    }
}

impl Material {
    pub fn matte(color: Color) -> Material {
        Material::Matte { color }
    }

    /// The material's base color.
    pub fn color(&self) -> Color {
        match self {
            Material::Matte { color }
            | Material::Mirror { color, .. }
            | Material::Metal { color, .. }
            | Material::Glass { color, .. }
            | Material::Diamond { color, .. }
            | Material::Translucent { color, .. }
            | Material::Composite { color, .. } => *color,
        }
    }

    pub fn reflectivity(&self) -> f64 {
        match self {
            Material::Mirror { reflectivity, .. }
            | Material::Metal { reflectivity, .. }
            | Material::Glass { reflectivity, .. }
            | Material::Diamond { reflectivity, .. } => *reflectivity,
            _ => 0.0,
        }
    }

    pub fn transparency(&self) -> f64 {
        match self {
            Material::Glass { transparency, .. }
            | Material::Diamond { transparency, .. }
            | Material::Translucent { transparency, .. } => *transparency,
            _ => 0.0,
        }
    }

    pub fn refraction_index(&self) -> f64 {
        match self {
            Material::Glass { refraction_index, .. }
            | Material::Diamond { refraction_index, .. }
            | Material::Translucent { refraction_index, .. } =>
                *refraction_index,
            _ => 1.0,
        }
    }

    /// Computes the color this surface contributes for an incident ray.
    pub fn compute_interaction(&self, incident: &Ray, hit: &IntersectionInfo,
                               tracer: &dyn RayTracer, depth: u32) -> Color {
        match self {
            Material::Matte { color } => *color,
            Material::Mirror { color, reflectivity } =>
                mirror_interaction(*color, *reflectivity, incident, hit,
                    tracer, depth),
            Material::Metal { color, roughness, reflectivity } =>
                metal_interaction(*color, *roughness, *reflectivity, incident,
                    hit, tracer, depth),
            Material::Glass { color, transparency, reflectivity: _,
                              refraction_index } =>
                glass_interaction(*color, *transparency, *refraction_index,
                    incident, hit, tracer, depth),
            Material::Diamond { color, transparency, reflectivity: _,
                                refraction_index, dispersion } =>
                diamond_interaction(*color, *transparency, *refraction_index,
                    *dispersion, incident, hit, tracer, depth),
            Material::Translucent { color, transparency, refraction_index } =>
                translucent_interaction(*color, *transparency,
                    *refraction_index, incident, hit, tracer, depth),
            Material::Composite { color, parts } =>
                composite_interaction(*color, parts, incident, hit, tracer,
                    depth),
        }
    }
}

/// Schlick's approximation of the Fresnel reflectance between two media.
fn schlick_fresnel(cos_theta: f64, eta_i: f64, eta_t: f64) -> f64 {
    let r0 = ((eta_i - eta_t) / (eta_i + eta_t)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}

/// Casts a secondary ray from the hit point, offset to escape the surface.
fn secondary_ray(hit: &IntersectionInfo, direction: Vector3D) -> Ray {
    Ray::new(hit.hit_point, direction).offset(RAY_OFFSET)
}

fn mirror_interaction(color: Color, reflectivity: f64, incident: &Ray,
                      hit: &IntersectionInfo, tracer: &dyn RayTracer,
                      depth: u32) -> Color {
    let unit = incident.direction.normalize();
    let reflection_dir = unit.reflect(&hit.normal).normalize();
    let reflection_ray = secondary_ray(hit, reflection_dir);
    let reflection_color = tracer.trace(&reflection_ray, depth + 1);

    // Boost reflectivity toward 1.0 at glancing angles.
    let cos_theta = unit.dot(&hit.normal).abs();
    let fresnel = if cos_theta < 0.9 {
        reflectivity + (1.0 - reflectivity) * (1.0 - cos_theta).powi(3)
    } else {
        reflectivity
    };

    color * (1.0 - fresnel) + reflection_color * fresnel
}

fn random_unit_vector() -> Vector3D {
    let mut rng = rand::thread_rng();
    loop {
        let v = Vector3D::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if v.length() < 1.0 {
            return v.normalize();
        }
    }
}

fn metal_interaction(color: Color, roughness: f64, reflectivity: f64,
                     incident: &Ray, hit: &IntersectionInfo,
                     tracer: &dyn RayTracer, depth: u32) -> Color {
    let unit = incident.direction.normalize();
    let mut reflection_dir = unit.reflect(&hit.normal).normalize();

    if roughness > 0.0 {
        reflection_dir =
            (reflection_dir + random_unit_vector() * roughness).normalize();
    }

    let reflection_ray = secondary_ray(hit, reflection_dir);
    let reflection_color = tracer.trace(&reflection_ray, depth + 1);

    color * (1.0 - reflectivity) + reflection_color * reflectivity
}

fn glass_interaction(color: Color, transparency: f64, refraction_index: f64,
                     incident: &Ray, hit: &IntersectionInfo,
                     tracer: &dyn RayTracer, depth: u32) -> Color {
    if depth >= TRANSPARENT_DEPTH_LIMIT {
        return color;
    }

    let unit = incident.direction.normalize();
    let normal = hit.normal;

    let (eta_i, eta_t) = if hit.front_face {
        (1.0, refraction_index)
    } else {
        (refraction_index, 1.0)
    };
    let ratio = eta_i / eta_t;

    // The hit normal always opposes the ray, so the raw cosine is negative
    // at every real hit; its magnitude feeds the Fresnel term.
    let cos_raw = normal.dot(&unit);
    let cos_theta = cos_raw.abs();
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let cannot_refract = ratio * sin_theta > 1.0;

    let reflection_dir = (unit - normal * (2.0 * cos_raw)).normalize();
    let reflection_ray = secondary_ray(hit, reflection_dir);
    let reflection_color = tracer.trace(&reflection_ray, depth + 1);

    let fresnel = schlick_fresnel(cos_theta, eta_i, eta_t);

    let refraction_color = if cannot_refract {
        reflection_color
    } else {
        let cos_refracted =
            (1.0 - ratio * ratio * (1.0 - cos_theta * cos_theta)).sqrt();
        let normal_component = if cos_raw < 0.0 {
            ratio * cos_theta + cos_refracted
        } else {
            ratio * cos_theta - cos_refracted
        };
        let refraction_dir =
            (unit * ratio + normal * normal_component).normalize();
        let refraction_ray = secondary_ray(hit, refraction_dir);
        tracer.trace(&refraction_ray, depth + 1)
    };

    let blend = reflection_color * fresnel + refraction_color * (1.0 - fresnel);
    color * (1.0 - transparency) + blend * transparency
}

fn diamond_interaction(color: Color, transparency: f64, refraction_index: f64,
                       dispersion: f64, incident: &Ray,
                       hit: &IntersectionInfo, tracer: &dyn RayTracer,
                       depth: u32) -> Color {
    if depth >= TRANSPARENT_DEPTH_LIMIT {
        return color;
    }

    let unit = incident.direction.normalize();
    let normal = hit.normal;

    let (eta_i, eta_t) = if hit.front_face {
        (1.0, refraction_index)
    } else {
        (refraction_index, 1.0)
    };
    let ratio = eta_i / eta_t;

    let cos_theta = (-unit.dot(&normal)).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

    let reflection_dir = unit.reflect(&normal).normalize();
    let reflection_ray = secondary_ray(hit, reflection_dir);
    let reflection_color = tracer.trace(&reflection_ray, depth + 1);

    // Exaggerated Fresnel gives the sparkle.
    let fresnel =
        (schlick_fresnel(cos_theta, eta_i, eta_t) * 1.5).min(1.0);

    if ratio * sin_theta > 1.0 {
        return reflection_color;
    }

    let cos_refracted =
        (1.0 - ratio * ratio * (1.0 - cos_theta * cos_theta)).sqrt();
    let refraction_dir =
        (unit * ratio + normal * (ratio * cos_theta - cos_refracted))
            .normalize();
    let refraction_ray = secondary_ray(hit, refraction_dir);
    let refraction_color = tracer.trace(&refraction_ray, depth + 1);

    let mut result =
        reflection_color * fresnel + refraction_color * (1.0 - fresnel);

    // Shallow bounces get a per-channel tint approximating dispersion.
    if depth < 2 {
        let disperse = sin_theta * dispersion;
        result.r *= 1.0 + disperse;
        result.b *= 1.0 - disperse * 0.5;
        result = Color::rgb(
            result.r.min(1.0),
            result.g.min(1.0),
            result.b.min(1.0),
        );
    }

    color * (1.0 - transparency) + result * transparency
}

fn translucent_interaction(color: Color, transparency: f64,
                           refraction_index: f64, incident: &Ray,
                           hit: &IntersectionInfo, tracer: &dyn RayTracer,
                           depth: u32) -> Color {
    let unit = incident.direction.normalize();
    let normal = hit.normal;

    let (eta_i, eta_t) = if hit.front_face {
        (1.0, refraction_index)
    } else {
        (refraction_index, 1.0)
    };
    let ratio = eta_i / eta_t;

    let cos_theta = (-unit.dot(&normal)).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

    let traced = if ratio * sin_theta > 1.0 {
        let reflection_dir = unit.reflect(&normal).normalize();
        let reflection_ray = secondary_ray(hit, reflection_dir);
        tracer.trace(&reflection_ray, depth + 1)
    } else {
        let cos_refracted =
            (1.0 - ratio * ratio * (1.0 - cos_theta * cos_theta)).sqrt();
        let refraction_dir =
            (unit * ratio + normal * (ratio * cos_theta - cos_refracted))
                .normalize();
        let refraction_ray = secondary_ray(hit, refraction_dir);
        tracer.trace(&refraction_ray, depth + 1)
    };

    color * (1.0 - transparency) + traced * transparency
}

fn composite_interaction(color: Color, parts: &[(f64, Material)],
                         incident: &Ray, hit: &IntersectionInfo,
                         tracer: &dyn RayTracer, depth: u32) -> Color {
    let mut result = Color::black();
    let mut total_weight = 0.0;

    for (weight, material) in parts {
        result = result
            + material.compute_interaction(incident, hit, tracer, depth)
                * *weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        result * (1.0 / total_weight)
    } else {
        color
    }
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Point3D;
    use std::cell::Cell;

    struct ConstantTracer {
        result: Color,
        calls: Cell<u32>,
    }

    impl ConstantTracer {
        fn white() -> ConstantTracer {
            ConstantTracer { result: Color::white(), calls: Cell::new(0) }
        }
    }

    impl RayTracer for ConstantTracer {
        fn trace(&self, _ray: &Ray, _depth: u32) -> Color {
            self.calls.set(self.calls.get() + 1);
            self.result
        }
    }

    fn head_on_hit() -> (Ray, IntersectionInfo) {
        let incident = Ray::new(
            Point3D::new(0.0, 0.0, -5.0),
            Vector3D::new(0.0, 0.0, 1.0)
        );
        let hit = IntersectionInfo {
            hit_point: Point3D::origin(),
            normal: Vector3D::new(0.0, 0.0, -1.0),
            front_face: true,
            t: 5.0,
        };
        (incident, hit)
    }

    #[test]
    fn matte_returns_base_color() {
        let m = Material::matte(Color::rgb(0.2, 0.4, 0.6));
        let tracer = ConstantTracer::white();
        let (incident, hit) = head_on_hit();

        let c = m.compute_interaction(&incident, &hit, &tracer, 0);
        assert_eq!(c, Color::rgb(0.2, 0.4, 0.6));
        assert_eq!(tracer.calls.get(), 0);
    }

    #[test]
    fn mirror_blends_reflection_head_on() {
        let m = Material::Mirror { color: Color::red(), reflectivity: 0.9 };
        let tracer = ConstantTracer::white();
        let (incident, hit) = head_on_hit();

        // Head-on: no glancing boost, plain 0.9 blend with white.
        let c = m.compute_interaction(&incident, &hit, &tracer, 0);
        assert_eq!(c, Color::rgb(1.0, 0.9, 0.9));
        assert_eq!(tracer.calls.get(), 1);
    }

    #[test]
    fn mirror_fully_reflective_at_grazing() {
        let m = Material::Mirror { color: Color::red(), reflectivity: 0.9 };
        let tracer = ConstantTracer::white();
        let incident = Ray::new(
            Point3D::new(-5.0, 0.0, 0.0),
            Vector3D::new(1.0, 0.0, 0.0)
        );
        let hit = IntersectionInfo {
            hit_point: Point3D::origin(),
            normal: Vector3D::new(0.0, 0.0, -1.0),
            front_face: true,
            t: 5.0,
        };

        let c = m.compute_interaction(&incident, &hit, &tracer, 0);
        assert_eq!(c, Color::white());
    }

    #[test]
    fn metal_smooth_blend() {
        let m = Material::Metal {
            color: Color::black(),
            roughness: 0.0,
            reflectivity: 0.8,
        };
        let tracer = ConstantTracer::white();
        let (incident, hit) = head_on_hit();

        let c = m.compute_interaction(&incident, &hit, &tracer, 0);
        assert_eq!(c, Color::rgb(0.8, 0.8, 0.8));
    }

    #[test]
    fn schlick_head_on_is_analytic_r0() {
        // cos = 1 kills the quintic term, leaving r0 = ((1-1.5)/(1+1.5))^2.
        assert!(crate::feq(schlick_fresnel(1.0, 1.0, 1.5), 0.04));
    }

    #[test]
    fn glass_blend_stays_between_base_and_traced() {
        let base = Color::rgb(0.2, 0.2, 0.2);
        let m = Material::Glass {
            color: base,
            transparency: 0.5,
            reflectivity: 0.1,
            refraction_index: 1.5,
        };
        let tracer = ConstantTracer {
            result: Color::rgb(0.8, 0.8, 0.8),
            calls: Cell::new(0),
        };
        let (incident, hit) = head_on_hit();

        // Head-on, both secondary rays return 0.8, so the Fresnel blend is
        // 0.8 regardless of its weight and the result is the transparency
        // mix 0.5 * 0.2 + 0.5 * 0.8.
        let c = m.compute_interaction(&incident, &hit, &tracer, 0);
        assert_eq!(c, Color::rgb(0.5, 0.5, 0.5));

        for channel in [c.r, c.g, c.b].iter() {
            assert!(*channel >= base.r && *channel <= tracer.result.r);
            assert!(*channel >= 0.0 && *channel <= 1.0);
        }
    }

    #[test]
    fn glass_stops_at_depth_limit() {
        let m = Material::Glass {
            color: Color::rgb(0.1, 0.2, 0.3),
            transparency: 0.9,
            reflectivity: 0.1,
            refraction_index: 1.5,
        };
        let tracer = ConstantTracer::white();
        let (incident, hit) = head_on_hit();

        let c = m.compute_interaction(&incident, &hit, &tracer, 4);
        assert_eq!(c, Color::rgb(0.1, 0.2, 0.3));
        assert_eq!(tracer.calls.get(), 0);
    }

    #[test]
    fn glass_traces_reflection_and_refraction() {
        let m = Material::Glass {
            color: Color::black(),
            transparency: 1.0,
            reflectivity: 0.1,
            refraction_index: 1.5,
        };
        let tracer = ConstantTracer::white();
        let (incident, hit) = head_on_hit();

        // Both branches trace; with an all-white tracer the Fresnel blend
        // collapses back to white.
        let c = m.compute_interaction(&incident, &hit, &tracer, 0);
        assert_eq!(c, Color::white());
        assert_eq!(tracer.calls.get(), 2);
    }

    #[test]
    fn diamond_stops_at_depth_limit() {
        let m = Material::Diamond {
            color: Color::rgb(0.9, 0.9, 1.0),
            transparency: 0.95,
            reflectivity: 0.2,
            refraction_index: 2.42,
            dispersion: 0.044,
        };
        let tracer = ConstantTracer::white();
        let (incident, hit) = head_on_hit();

        let c = m.compute_interaction(&incident, &hit, &tracer, 4);
        assert_eq!(c, Color::rgb(0.9, 0.9, 1.0));
        assert_eq!(tracer.calls.get(), 0);
    }

    #[test]
    fn translucent_blends_refraction() {
        let m = Material::Translucent {
            color: Color::red(),
            transparency: 0.3,
            refraction_index: 1.2,
        };
        let tracer = ConstantTracer::white();
        let (incident, hit) = head_on_hit();

        let c = m.compute_interaction(&incident, &hit, &tracer, 0);
        assert_eq!(c, Color::rgb(1.0, 0.3, 0.3));
        assert_eq!(tracer.calls.get(), 1);
    }

    #[test]
    fn translucent_reflects_on_total_internal_reflection() {
        let m = Material::Translucent {
            color: Color::red(),
            transparency: 0.3,
            refraction_index: 1.2,
        };
        let tracer = ConstantTracer::white();

        // Exiting the medium at a steep angle: ratio 1.2, sin_theta close
        // to 1, so ratio * sin_theta > 1.
        let incident = Ray::new(
            Point3D::new(-5.0, 0.0, 0.0),
            Vector3D::new(1.0, 0.05, 0.0).normalize()
        );
        let hit = IntersectionInfo {
            hit_point: Point3D::origin(),
            normal: Vector3D::new(0.0, -1.0, 0.0),
            front_face: false,
            t: 5.0,
        };

        let c = m.compute_interaction(&incident, &hit, &tracer, 0);
        assert_eq!(c, Color::rgb(1.0, 0.3, 0.3));
        assert_eq!(tracer.calls.get(), 1);
    }

    #[test]
    fn composite_weighted_mean() {
        let m = Material::Composite {
            color: Color::black(),
            parts: vec![
                (1.0, Material::matte(Color::white())),
                (3.0, Material::matte(Color::black())),
            ],
        };
        let tracer = ConstantTracer::white();
        let (incident, hit) = head_on_hit();

        let c = m.compute_interaction(&incident, &hit, &tracer, 0);
        assert_eq!(c, Color::rgb(0.25, 0.25, 0.25));
    }

    #[test]
    fn composite_without_parts_falls_back_to_base() {
        let m = Material::Composite {
            color: Color::rgb(0.5, 0.5, 0.0),
            parts: vec![],
        };
        let tracer = ConstantTracer::white();
        let (incident, hit) = head_on_hit();

        let c = m.compute_interaction(&incident, &hit, &tracer, 0);
        assert_eq!(c, Color::rgb(0.5, 0.5, 0.0));
    }

    #[test]
    fn default_material_is_red_matte() {
        assert_eq!(Material::default().color(), Color::red());
    }
}
