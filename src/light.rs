use crate::vector::{ Point3D, Vector3D };

/// How a light contributes to local shading.
///
/// `None` gives diffuse-only shading; `Phong` adds a specular highlight.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShadingModel {
    None,
    Phong,
}

impl ShadingModel {
    /// Maps the scene file's integer selector (0 = NONE, 1 = PHONG).
    pub fn from_selector(selector: i64) -> ShadingModel {
        match selector {
            1 => ShadingModel::Phong,
            _ => ShadingModel::None,
        }
    }
}

/// A light source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Light {
    /// Uniform illumination with no direction and no shadows.
    Ambient {
        origin: Point3D,
        intensity: f64,
        shading: ShadingModel,
    },

    /// Parallel rays from an infinitely distant source.
    Directional {
        direction: Vector3D,
        intensity: f64,
        shading: ShadingModel,
    },

    /// Omnidirectional source with distance falloff.
    Point {
        origin: Point3D,
        intensity: f64,
        attenuation: f64,
        shading: ShadingModel,
    },
}

impl Light {
    pub fn ambient(origin: Point3D, intensity: f64, shading: ShadingModel)
        -> Light {
        Light::Ambient { origin, intensity, shading }
    }

    pub fn directional(direction: Vector3D, intensity: f64,
                       shading: ShadingModel) -> Light {
        Light::Directional {
            direction: direction.normalize(),
            intensity,
            shading,
        }
    }

    pub fn point(origin: Point3D, intensity: f64, attenuation: f64,
                 shading: ShadingModel) -> Light {
        Light::Point { origin, intensity, attenuation, shading }
    }

    pub fn intensity(&self) -> f64 {
        match self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. } => *intensity,
        }
    }

    /// Effective intensity at a given distance from the source.
    ///
    /// Only point lights fall off; they attenuate as
    /// `intensity / (1 + attenuation * distance^2)`.
    pub fn intensity_at(&self, distance: f64) -> f64 {
        match self {
            Light::Point { intensity, attenuation, .. } =>
                intensity / (1.0 + attenuation * distance * distance),
            _ => self.intensity(),
        }
    }

    pub fn shading_model(&self) -> ShadingModel {
        match self {
            Light::Ambient { shading, .. }
            | Light::Directional { shading, .. }
            | Light::Point { shading, .. } => *shading,
        }
    }
}

/* Tests */

#[test]
fn shading_selector_mapping() {
    assert_eq!(ShadingModel::from_selector(0), ShadingModel::None);
    assert_eq!(ShadingModel::from_selector(1), ShadingModel::Phong);
    assert_eq!(ShadingModel::from_selector(7), ShadingModel::None);
}

#[test]
fn directional_light_normalizes_direction() {
    let l = Light::directional(
        Vector3D::new(0.0, -2.0, 0.0),
        1.0,
        ShadingModel::None
    );

    if let Light::Directional { direction, .. } = l {
        assert_eq!(direction, Vector3D::new(0.0, -1.0, 0.0));
    } else {
        panic!("expected directional light");
    }
}

#[test]
fn point_light_attenuates_with_distance() {
    let l = Light::point(Point3D::origin(), 1.0, 0.01, ShadingModel::None);

    assert!(crate::feq(l.intensity_at(0.0), 1.0));
    assert!(crate::feq(l.intensity_at(10.0), 0.5));
}

#[test]
fn non_point_lights_do_not_attenuate() {
    let l = Light::directional(
        Vector3D::new(0.0, -1.0, 0.0),
        0.8,
        ShadingModel::None
    );

    assert!(crate::feq(l.intensity_at(1000.0), 0.8));
}
