use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::camera::Camera;
use crate::color::Color;
use crate::consts::{ DEFAULT_FOV, DEFAULT_HEIGHT, DEFAULT_WIDTH };
use crate::error::{ Result, SceneError };
use crate::light::{ Light, ShadingModel };
use crate::material::Material;
use crate::obj;
use crate::registry::{ MaterialRegistry, MaterialSettings };
use crate::shape::{ Axis, Primitive, ShapeKind };
use crate::transform::Transform;
use crate::vector::{ Point3D, Vector3D };

/// A fully built scene, immutable once loading completes.
pub struct Scene {
    pub camera: Camera,
    pub primitives: Vec<Primitive>,
    pub lights: Vec<Light>,
}

impl Scene {
    /// Loads and validates a scene description file.
    pub fn load(path: &Path, registry: &MaterialRegistry) -> Result<Scene> {
        debug!("loading scene from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Scene::from_json(&contents, registry)
    }

    /// Builds a scene from JSON text.
    pub fn from_json(text: &str, registry: &MaterialRegistry)
        -> Result<Scene> {
        let json: SceneJson = serde_json::from_str(text)?;

        let camera = json.camera.build();
        let mut primitives = json.primitives.build(registry)?;
        for object in &json.objects {
            primitives.extend(object.build(registry)?);
        }
        let lights = json.lights.build();

        debug!("scene loaded: {} primitives, {} lights",
            primitives.len(), lights.len());

        Ok(Scene { camera, primitives, lights })
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SceneJson {
    camera: CameraJson,
    primitives: PrimitivesJson,
    objects: Vec<ObjectJson>,
    lights: LightsJson,
}

/// An `{x, y, z}` record; omitted components are zero.
#[derive(Copy, Clone, Deserialize, Default)]
#[serde(default)]
struct XyzJson {
    x: f64,
    y: f64,
    z: f64,
}

impl XyzJson {
    fn to_point(self) -> Point3D {
        Point3D::new(self.x, self.y, self.z)
    }

    fn to_vector(self) -> Vector3D {
        Vector3D::new(self.x, self.y, self.z)
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct CameraJson {
    position: XyzJson,
    rotation: XyzJson,
    resolution: ResolutionJson,
    field_of_view: f64,
}

impl Default for CameraJson {
    fn default() -> CameraJson {
        CameraJson {
            position: Default::default(),
            rotation: Default::default(),
            resolution: Default::default(),
            field_of_view: DEFAULT_FOV,
        }
    }
}

impl CameraJson {
    fn build(&self) -> Camera {
        Camera::new(
            self.position.to_point(),
            self.resolution.width,
            self.resolution.height,
            self.field_of_view,
            self.rotation.to_vector()
        )
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct ResolutionJson {
    width: usize,
    height: usize,
}

impl Default for ResolutionJson {
    fn default() -> ResolutionJson {
        ResolutionJson { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT }
    }
}

/// Primitives grouped by pluralized type key.
#[derive(Deserialize, Default)]
#[serde(default)]
struct PrimitivesJson {
    spheres: Vec<SphereJson>,
    planes: Vec<PlaneJson>,
    cubes: Vec<CubeJson>,
    cylinders: Vec<CylinderJson>,
    cones: Vec<ConeJson>,
    triangles: Vec<TriangleJson>,
}

impl PrimitivesJson {
    fn build(&self, registry: &MaterialRegistry) -> Result<Vec<Primitive>> {
        let mut primitives = Vec::new();

        for sphere in &self.spheres {
            primitives.push(sphere.build(registry)?);
        }
        for plane in &self.planes {
            primitives.push(plane.build(registry)?);
        }
        for cube in &self.cubes {
            primitives.push(cube.build(registry)?);
        }
        for cylinder in &self.cylinders {
            primitives.push(cylinder.build(registry)?);
        }
        for cone in &self.cones {
            primitives.push(cone.build(registry)?);
        }
        for triangle in &self.triangles {
            primitives.push(triangle.build(registry)?);
        }

        Ok(primitives)
    }
}

/// Fields every primitive record shares: an optional material sub-record, an
/// optional flat 8-bit color shorthand, and optional extra transforms.
#[derive(Deserialize, Default)]
#[serde(default)]
struct SurfaceJson {
    material: Option<MaterialSettings>,
    color: Option<FlatColorJson>,
    transforms: TransformsJson,
}

impl SurfaceJson {
    fn material(&self, registry: &MaterialRegistry) -> Result<Material> {
        match (&self.material, &self.color) {
            (Some(settings), _) => registry.create_from_settings(settings),
            (None, Some(color)) => Ok(Material::matte(color.to_color())),
            (None, None) => Ok(Material::default()),
        }
    }

    fn transform_at(&self, position: Vector3D) -> Transform {
        Transform::new(
            self.transforms.translation.to_vector(),
            self.transforms.rotation_radians(),
            position
        )
    }
}

/// A flat color on the primitive itself; omitted channels are zero.
#[derive(Copy, Clone, Deserialize, Default)]
#[serde(default)]
struct FlatColorJson {
    r: u8,
    g: u8,
    b: u8,
}

impl FlatColorJson {
    fn to_color(self) -> Color {
        Color::rgb8(self.r, self.g, self.b)
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TransformsJson {
    translation: XyzJson,
    rotation: XyzJson,
}

impl TransformsJson {
    /// Scene files give rotation in degrees.
    fn rotation_radians(&self) -> Vector3D {
        Vector3D::new(
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians()
        )
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SphereJson {
    x: f64,
    y: f64,
    z: f64,
    r: f64,
    #[serde(flatten)]
    surface: SurfaceJson,
}

impl SphereJson {
    fn build(&self, registry: &MaterialRegistry) -> Result<Primitive> {
        Ok(Primitive::new(
            ShapeKind::sphere(Point3D::origin(), self.r),
            self.surface.transform_at(Vector3D::new(self.x, self.y, self.z)),
            self.surface.material(registry)?
        ))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PlaneJson {
    axis: String,
    position: f64,
    #[serde(flatten)]
    surface: SurfaceJson,
}

impl PlaneJson {
    fn build(&self, registry: &MaterialRegistry) -> Result<Primitive> {
        let axis = match self.axis.as_str() {
            "X" => Axis::X,
            "Y" => Axis::Y,
            "Z" => Axis::Z,
            other => {
                return Err(SceneError::invalid_field(
                    "plane.axis",
                    &format!("{:?} is not X, Y or Z", other)
                ));
            }
        };

        Ok(Primitive::new(
            ShapeKind::plane(axis, self.position),
            Transform::default(),
            self.surface.material(registry)?
        ))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CubeJson {
    x: f64,
    y: f64,
    z: f64,
    side: f64,
    #[serde(flatten)]
    surface: SurfaceJson,
}

impl CubeJson {
    fn build(&self, registry: &MaterialRegistry) -> Result<Primitive> {
        Ok(Primitive::new(
            ShapeKind::cube(Point3D::origin(), self.side),
            self.surface.transform_at(Vector3D::new(self.x, self.y, self.z)),
            self.surface.material(registry)?
        ))
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct CylinderJson {
    x: f64,
    y: f64,
    z: f64,
    axis: Option<XyzJson>,
    r: f64,
    /// Zero or negative means infinite.
    height: f64,
    #[serde(flatten)]
    surface: SurfaceJson,
}

impl Default for CylinderJson {
    fn default() -> CylinderJson {
        CylinderJson {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            axis: None,
            r: 1.0,
            height: 0.0,
            surface: Default::default(),
        }
    }
}

impl CylinderJson {
    fn build(&self, registry: &MaterialRegistry) -> Result<Primitive> {
        let axis = match self.axis {
            Some(axis) => axis.to_vector(),
            None => Vector3D::new(0.0, 1.0, 0.0),
        };

        Ok(Primitive::new(
            ShapeKind::cylinder(Point3D::origin(), axis, self.r, self.height),
            self.surface.transform_at(Vector3D::new(self.x, self.y, self.z)),
            self.surface.material(registry)?
        ))
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct ConeJson {
    x: f64,
    y: f64,
    z: f64,
    r: f64,
    /// Negative means infinite.
    h: f64,
    dx: f64,
    dy: f64,
    dz: f64,
    cut_height: Option<f64>,
    #[serde(flatten)]
    surface: SurfaceJson,
}

impl Default for ConeJson {
    fn default() -> ConeJson {
        ConeJson {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            r: 1.0,
            h: -1.0,
            dx: 0.0,
            dy: 1.0,
            dz: 0.0,
            cut_height: None,
            surface: Default::default(),
        }
    }
}

impl ConeJson {
    fn build(&self, registry: &MaterialRegistry) -> Result<Primitive> {
        if let Some(cut) = self.cut_height {
            if cut <= 0.0 || (self.h >= 0.0 && cut >= self.h) {
                return Err(SceneError::invalid_field(
                    "cone.cut_height",
                    "must be greater than 0 and less than the cone height"
                ));
            }
        }

        Ok(Primitive::new(
            ShapeKind::cone(
                Point3D::origin(),
                self.r,
                self.h,
                Vector3D::new(self.dx, self.dy, self.dz),
                self.cut_height.unwrap_or(-1.0)
            ),
            self.surface.transform_at(Vector3D::new(self.x, self.y, self.z)),
            self.surface.material(registry)?
        ))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TriangleJson {
    vertices: Vec<XyzJson>,
    #[serde(flatten)]
    surface: SurfaceJson,
}

impl TriangleJson {
    fn build(&self, registry: &MaterialRegistry) -> Result<Primitive> {
        if self.vertices.len() != 3 {
            return Err(SceneError::invalid_field(
                "triangle.vertices",
                "exactly three vertices are required"
            ));
        }

        let mut primitive = Primitive::triangle(
            self.vertices[0].to_point(),
            self.vertices[1].to_point(),
            self.vertices[2].to_point(),
            self.surface.material(registry)?
        );

        // The centroid stays the pivot; extra transforms layer on top.
        primitive.transform.translation =
            self.transforms().translation.to_vector();
        primitive.transform.rotation = self.transforms().rotation_radians();

        Ok(primitive)
    }

    fn transforms(&self) -> &TransformsJson {
        &self.surface.transforms
    }
}

/// An external OBJ mesh reference.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ObjectJson {
    file: Option<String>,
    position: XyzJson,
    material: Option<MaterialSettings>,
}

impl ObjectJson {
    fn build(&self, registry: &MaterialRegistry) -> Result<Vec<Primitive>> {
        let file = self.file.as_deref().ok_or_else(|| {
            SceneError::invalid_field("object.file", "missing mesh file path")
        })?;

        let material = match &self.material {
            Some(settings) => registry.create_from_settings(settings)?,
            None => Material::default(),
        };

        obj::load_mesh(Path::new(file), self.position.to_vector(), &material)
    }
}

/// Lights grouped by type name.
#[derive(Deserialize, Default)]
#[serde(default)]
struct LightsJson {
    ambient: Vec<LightJson>,
    directional: Vec<LightJson>,
    point: Vec<LightJson>,
}

impl LightsJson {
    fn build(&self) -> Vec<Light> {
        let mut lights = Vec::new();

        for light in &self.ambient {
            lights.push(Light::ambient(
                light.xyz.to_point(),
                light.intensity,
                light.shading()
            ));
        }
        for light in &self.directional {
            lights.push(Light::directional(
                light.xyz.to_vector(),
                light.intensity,
                light.shading()
            ));
        }
        for light in &self.point {
            lights.push(Light::point(
                light.xyz.to_point(),
                light.intensity,
                light.attenuation,
                light.shading()
            ));
        }

        lights
    }
}

/// One light record. `x`, `y`, `z` are a position for ambient and point
/// lights and a direction for directional lights.
#[derive(Deserialize)]
#[serde(default)]
struct LightJson {
    #[serde(flatten)]
    xyz: XyzJson,
    intensity: f64,
    attenuation: f64,
    shading_model: i64,
}

impl Default for LightJson {
    fn default() -> LightJson {
        LightJson {
            xyz: Default::default(),
            intensity: 1.0,
            attenuation: 0.01,
            shading_model: 0,
        }
    }
}

impl LightJson {
    fn shading(&self) -> ShadingModel {
        ShadingModel::from_selector(self.shading_model)
    }
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<Scene> {
        Scene::from_json(text, &MaterialRegistry::with_defaults())
    }

    #[test]
    fn empty_scene_gets_camera_defaults() {
        let scene = load("{}").unwrap();

        assert_eq!(scene.camera.width(), 1920);
        assert_eq!(scene.camera.height(), 1080);
        assert!(crate::feq(scene.camera.field_of_view(), 72.0));
        assert!(scene.primitives.is_empty());
        assert!(scene.lights.is_empty());
    }

    #[test]
    fn sphere_with_flat_color() {
        let scene = load(r#"{
            "primitives": {
                "spheres": [
                    { "x": 0, "y": 0, "z": -5, "r": 2,
                      "color": { "r": 255, "g": 0, "b": 0 } }
                ]
            }
        }"#).unwrap();

        assert_eq!(scene.primitives.len(), 1);
        let primitive = &scene.primitives[0];
        assert_eq!(
            primitive.transform.position,
            Vector3D::new(0.0, 0.0, -5.0)
        );
        assert_eq!(
            primitive.material,
            Material::Matte { color: Color::red() }
        );
        assert!(matches!(
            primitive.kind,
            ShapeKind::Sphere { radius, .. } if crate::feq(radius, 2.0)
        ));
    }

    #[test]
    fn plane_axis_is_validated() {
        let result = load(r#"{
            "primitives": { "planes": [{ "axis": "W", "position": 0 }] }
        }"#);

        assert!(matches!(result, Err(SceneError::InvalidField { .. })));
    }

    #[test]
    fn cone_cut_height_must_be_below_height() {
        let result = load(r#"{
            "primitives": {
                "cones": [{ "r": 2, "h": 4, "dy": 1, "cut_height": 5 }]
            }
        }"#);

        assert!(matches!(result, Err(SceneError::InvalidField { .. })));
    }

    #[test]
    fn primitive_without_material_gets_red_matte() {
        let scene = load(r#"{
            "primitives": { "cubes": [{ "side": 1 }] }
        }"#).unwrap();

        assert_eq!(scene.primitives[0].material, Material::default());
    }

    #[test]
    fn rotation_converts_to_radians() {
        let scene = load(r#"{
            "primitives": {
                "cubes": [
                    { "side": 1,
                      "transforms": {
                          "rotation": { "x": 0, "y": 90, "z": 0 } } }
                ]
            }
        }"#).unwrap();

        let rotation = scene.primitives[0].transform.rotation;
        assert!(crate::feq(rotation.y, std::f64::consts::FRAC_PI_2));
    }

    #[test]
    fn lights_of_every_kind_load() {
        let scene = load(r#"{
            "lights": {
                "ambient": [{ "intensity": 0.2 }],
                "directional": [
                    { "x": 0, "y": -1, "z": 0, "intensity": 0.7,
                      "shading_model": 1 }
                ],
                "point": [
                    { "x": 0, "y": 5, "z": 0, "intensity": 1.0,
                      "attenuation": 0.05 }
                ]
            }
        }"#).unwrap();

        assert_eq!(scene.lights.len(), 3);
        assert!(matches!(scene.lights[0], Light::Ambient { .. }));
        assert!(matches!(
            scene.lights[1],
            Light::Directional { shading: ShadingModel::Phong, .. }
        ));
        assert!(matches!(
            scene.lights[2],
            Light::Point { attenuation, .. } if crate::feq(attenuation, 0.05)
        ));
    }

    #[test]
    fn triangle_needs_three_vertices() {
        let result = load(r#"{
            "primitives": {
                "triangles": [
                    { "vertices": [{ "x": 0 }, { "x": 1 }] }
                ]
            }
        }"#);

        assert!(matches!(result, Err(SceneError::InvalidField { .. })));
    }

    #[test]
    fn unknown_material_type_fails_loading() {
        let result = load(r#"{
            "primitives": {
                "spheres": [
                    { "r": 1, "material": { "type": "chrome" } }
                ]
            }
        }"#);

        assert!(matches!(result, Err(SceneError::UnknownMaterial(_))));
    }

    #[test]
    fn malformed_json_is_a_scene_error() {
        assert!(matches!(
            load("{ not json"),
            Err(SceneError::MalformedScene(_))
        ));
    }
}
