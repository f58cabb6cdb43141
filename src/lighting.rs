use crate::color::Color;
use crate::consts::{ RAY_OFFSET, SPECULAR_STRENGTH, SHININESS };
use crate::light::{ Light, ShadingModel };
use crate::ray::Ray;
use crate::shape::Primitive;
use crate::vector::{ Point3D, Vector3D };

/// Resolves the direct light arriving at surface points.
///
/// Borrows the scene's lights and primitives for the duration of a render;
/// the result of `compute_light` is a per-channel coefficient that the driver
/// multiplies into the material interaction color.
pub struct LightResolver<'a> {
    lights: &'a [Light],
    primitives: &'a [Primitive],
    camera_position: Point3D,
}

impl<'a> LightResolver<'a> {
    pub fn new(lights: &'a [Light], primitives: &'a [Primitive],
               camera_position: Point3D) -> LightResolver<'a> {
        LightResolver { lights, primitives, camera_position }
    }

    /// Total light coefficient at a hit point on a primitive.
    ///
    /// Starts from a constant ambient floor, then accumulates each light's
    /// diffuse (and, for Phong lights, specular) contribution scaled by a
    /// hard shadow factor. Channels are clamped to [0, 1].
    pub fn compute_light(&self, hit_point: Point3D, primitive: &Primitive)
        -> Color {
        let normal = primitive.normal_at(hit_point);
        let view_dir = (self.camera_position - hit_point).normalize();

        // Unconditional floor, on top of any declared ambient lights.
        let mut total = Color::rgb(0.1, 0.1, 0.1);

        for light in self.lights {
            if let Light::Ambient { intensity, .. } = light {
                total = total + Color::rgb(*intensity, *intensity, *intensity);
                continue;
            }

            let light_dir = match light {
                Light::Directional { direction, .. } => -*direction,
                Light::Point { origin, .. } => (*origin - hit_point).normalize(),
                Light::Ambient { .. } => unreachable!(),
            };

            let intensity = match light {
                Light::Point { origin, .. } =>
                    light.intensity_at((*origin - hit_point).length()),
                _ => light.intensity(),
            };

            let dot = normal.dot(&light_dir).max(0.0);
            let shadow = self.compute_shadow(hit_point, light);
            let diffuse = intensity * dot * shadow;

            let mut contribution = Color::rgb(diffuse, diffuse, diffuse);

            if light.shading_model() == ShadingModel::Phong {
                let reflect_dir =
                    (normal * (2.0 * normal.dot(&light_dir)) - light_dir)
                        .normalize();
                let spec_angle = reflect_dir.dot(&view_dir).max(0.0);
                let specular = SPECULAR_STRENGTH
                    * spec_angle.powi(SHININESS)
                    * intensity
                    * shadow;

                contribution =
                    contribution + Color::rgb(specular, specular, specular);
            }

            total = total + contribution;
        }

        total.clamp()
    }

    /// Hard shadow factor for one light at one point: 0.0 occluded, 1.0 lit.
    pub fn compute_shadow(&self, hit_point: Point3D, light: &Light) -> f64 {
        let (light_dir, max_dist) = match light {
            Light::Directional { direction, .. } =>
                (-*direction, f64::INFINITY),
            _ => {
                let to_light = light_origin(light) - hit_point;
                (to_light.normalize(), to_light.length())
            }
        };

        let shadow_ray = Ray::new(
            hit_point + light_dir * RAY_OFFSET,
            light_dir
        );

        for primitive in self.primitives {
            if let Some(t) = primitive.hits(&shadow_ray) {
                if t > 0.0 && t < max_dist {
                    return 0.0;
                }
            }
        }

        1.0
    }
}

fn light_origin(light: &Light) -> Point3D {
    match light {
        Light::Ambient { origin, .. } | Light::Point { origin, .. } => *origin,
        Light::Directional { .. } => Point3D::origin(),
    }
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feq;
    use crate::material::Material;
    use crate::shape::ShapeKind;
    use crate::transform::Transform;

    fn floor_plane() -> Primitive {
        Primitive::new(
            ShapeKind::plane(crate::shape::Axis::Y, 0.0),
            Transform::default(),
            Material::default()
        )
    }

    fn sphere_at(x: f64, y: f64, z: f64) -> Primitive {
        Primitive::new(
            ShapeKind::sphere(Point3D::origin(), 1.0),
            Transform::at(Vector3D::new(x, y, z)),
            Material::default()
        )
    }

    #[test]
    fn no_lights_gives_ambient_floor() {
        let primitives = vec![floor_plane()];
        let resolver = LightResolver::new(
            &[],
            &primitives,
            Point3D::new(0.0, 5.0, 0.0)
        );

        let c = resolver.compute_light(Point3D::origin(), &primitives[0]);
        assert_eq!(c, Color::rgb(0.1, 0.1, 0.1));
    }

    #[test]
    fn ambient_light_adds_on_top_of_floor() {
        let primitives = vec![floor_plane()];
        let lights = vec![
            Light::ambient(Point3D::origin(), 0.3, ShadingModel::None),
        ];
        let resolver = LightResolver::new(
            &lights,
            &primitives,
            Point3D::new(0.0, 5.0, 0.0)
        );

        let c = resolver.compute_light(Point3D::origin(), &primitives[0]);
        assert_eq!(c, Color::rgb(0.4, 0.4, 0.4));
    }

    #[test]
    fn directional_light_full_diffuse_head_on() {
        let primitives = vec![floor_plane()];
        let lights = vec![
            Light::directional(
                Vector3D::new(0.0, -1.0, 0.0),
                0.6,
                ShadingModel::None
            ),
        ];
        let resolver = LightResolver::new(
            &lights,
            &primitives,
            Point3D::new(0.0, 5.0, 0.0)
        );

        // Light shines straight down onto the up-facing plane.
        let c = resolver.compute_light(Point3D::origin(), &primitives[0]);
        assert_eq!(c, Color::rgb(0.7, 0.7, 0.7));
    }

    #[test]
    fn phong_adds_specular_highlight() {
        let primitives = vec![floor_plane()];
        let diffuse_only = vec![
            Light::directional(
                Vector3D::new(0.0, -1.0, 0.0),
                0.6,
                ShadingModel::None
            ),
        ];
        let phong = vec![
            Light::directional(
                Vector3D::new(0.0, -1.0, 0.0),
                0.6,
                ShadingModel::Phong
            ),
        ];

        // Camera straight above: the reflected light direction lines up with
        // the view direction, so the highlight is at full strength.
        let camera = Point3D::new(0.0, 5.0, 0.0);
        let flat = LightResolver::new(&diffuse_only, &primitives, camera)
            .compute_light(Point3D::origin(), &primitives[0]);
        let shiny = LightResolver::new(&phong, &primitives, camera)
            .compute_light(Point3D::origin(), &primitives[0]);

        assert!(shiny.r > flat.r);
        assert!(feq(shiny.r - flat.r, 0.5 * 0.6));
    }

    #[test]
    fn occluder_blocks_point_light() {
        // Light overhead at y=5, occluding sphere at y=2.5 between the
        // origin and the light.
        let light = Light::point(
            Point3D::new(0.0, 5.0, 0.0),
            1.0,
            0.0,
            ShadingModel::None
        );

        let occluded = vec![floor_plane(), sphere_at(0.0, 2.5, 0.0)];
        let clear = vec![floor_plane()];

        let resolver = LightResolver::new(
            std::slice::from_ref(&light),
            &occluded,
            Point3D::new(0.0, 5.0, 0.0)
        );
        assert!(feq(resolver.compute_shadow(Point3D::origin(), &light), 0.0));

        let resolver = LightResolver::new(
            std::slice::from_ref(&light),
            &clear,
            Point3D::new(0.0, 5.0, 0.0)
        );
        assert!(feq(resolver.compute_shadow(Point3D::origin(), &light), 1.0));
    }

    #[test]
    fn occluder_beyond_point_light_does_not_shadow() {
        let light = Light::point(
            Point3D::new(0.0, 5.0, 0.0),
            1.0,
            0.0,
            ShadingModel::None
        );
        // Sphere above the light, outside the shadow segment.
        let primitives = vec![sphere_at(0.0, 8.0, 0.0)];

        let resolver = LightResolver::new(
            std::slice::from_ref(&light),
            &primitives,
            Point3D::new(0.0, 5.0, 0.0)
        );

        assert!(feq(resolver.compute_shadow(Point3D::origin(), &light), 1.0));
    }

    #[test]
    fn point_light_attenuation_dims_diffuse() {
        let primitives = vec![floor_plane()];
        let lights = vec![
            Light::point(
                Point3D::new(0.0, 10.0, 0.0),
                1.0,
                0.01,
                ShadingModel::None
            ),
        ];
        let resolver = LightResolver::new(
            &lights,
            &primitives,
            Point3D::new(0.0, 5.0, 0.0)
        );

        // Distance 10: intensity 1 / (1 + 0.01 * 100) = 0.5.
        let c = resolver.compute_light(Point3D::origin(), &primitives[0]);
        assert_eq!(c, Color::rgb(0.6, 0.6, 0.6));
    }

    #[test]
    fn channels_clamped_to_one() {
        let primitives = vec![floor_plane()];
        let lights = vec![
            Light::ambient(Point3D::origin(), 5.0, ShadingModel::None),
        ];
        let resolver = LightResolver::new(
            &lights,
            &primitives,
            Point3D::new(0.0, 5.0, 0.0)
        );

        let c = resolver.compute_light(Point3D::origin(), &primitives[0]);
        assert_eq!(c, Color::white());
    }
}
