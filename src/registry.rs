use std::collections::BTreeMap;

use serde::Deserialize;

use crate::color::Color;
use crate::error::{ Result, SceneError };
use crate::material::Material;

fn max_channel() -> u8 {
    255
}

fn unit_weight() -> f64 {
    1.0
}

/// An 8-bit color record from a scene file. Omitted channels are white.
#[derive(Copy, Clone, Debug, Deserialize)]
pub struct ColorSettings {
    #[serde(default = "max_channel")]
    pub r: u8,
    #[serde(default = "max_channel")]
    pub g: u8,
    #[serde(default = "max_channel")]
    pub b: u8,
}

impl ColorSettings {
    pub fn to_color(&self) -> Color {
        Color::rgb8(self.r, self.g, self.b)
    }
}

/// One weighted entry in a composite material's part list.
#[derive(Clone, Debug, Deserialize)]
pub struct CompositePart {
    #[serde(default = "unit_weight")]
    pub weight: f64,
    #[serde(flatten)]
    pub settings: MaterialSettings,
}

/// The material sub-record of a primitive in a scene file.
///
/// All fields are optional; each material kind falls back to its own defaults
/// for whatever the record leaves out.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MaterialSettings {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub color: Option<ColorSettings>,
    pub reflectivity: Option<f64>,
    pub roughness: Option<f64>,
    pub transparency: Option<f64>,
    pub refraction_index: Option<f64>,
    pub dispersion: Option<f64>,
    pub materials: Vec<CompositePart>,
}

impl MaterialSettings {
    /// The record's base color, defaulting to white like an omitted channel.
    pub fn base_color(&self) -> Color {
        match self.color {
            Some(settings) => settings.to_color(),
            None => Color::white(),
        }
    }
}

type Creator = fn(&MaterialRegistry, &MaterialSettings) -> Result<Material>;

/// Maps material type names from scene files to constructors.
///
/// Built once at load time and passed by reference into the scene loader;
/// there is no global registration state, so tests can build registries with
/// whatever subset they want.
pub struct MaterialRegistry {
    creators: BTreeMap<String, Creator>,
}

impl MaterialRegistry {
    /// An empty registry. Useful only as a base for custom registration.
    pub fn new() -> MaterialRegistry {
        MaterialRegistry { creators: BTreeMap::new() }
    }

    /// A registry with every built-in material kind registered.
    pub fn with_defaults() -> MaterialRegistry {
        let mut registry = MaterialRegistry::new();
        registry.register("matte", create_matte);
        registry.register("mirror", create_mirror);
        registry.register("metal", create_metal);
        registry.register("glass", create_glass);
        registry.register("diamond", create_diamond);
        registry.register("translucent", create_translucent);
        registry.register("composite", create_composite);
        registry
    }

    pub fn register(&mut self, name: &str, creator: Creator) {
        self.creators.insert(name.into(), creator);
    }

    /// Builds a material from its type name and settings record.
    pub fn create(&self, name: &str, settings: &MaterialSettings)
        -> Result<Material> {
        match self.creators.get(name) {
            Some(creator) => creator(self, settings),
            None => Err(SceneError::UnknownMaterial(name.into())),
        }
    }

    /// Builds a material from a full settings record; a missing `type` field
    /// means matte.
    pub fn create_from_settings(&self, settings: &MaterialSettings)
        -> Result<Material> {
        let name = settings.kind.as_deref().unwrap_or("matte");
        self.create(name, settings)
    }
}

impl Default for MaterialRegistry {
    fn default() -> MaterialRegistry {
        MaterialRegistry::with_defaults()
    }
}

fn create_matte(_: &MaterialRegistry, settings: &MaterialSettings)
    -> Result<Material> {
    Ok(Material::Matte { color: settings.base_color() })
}

fn create_mirror(_: &MaterialRegistry, settings: &MaterialSettings)
    -> Result<Material> {
    Ok(Material::Mirror {
        color: settings.base_color(),
        reflectivity: settings.reflectivity.unwrap_or(0.9),
    })
}

fn create_metal(_: &MaterialRegistry, settings: &MaterialSettings)
    -> Result<Material> {
    Ok(Material::Metal {
        color: settings.base_color(),
        roughness: settings.roughness.unwrap_or(0.1),
        reflectivity: settings.reflectivity.unwrap_or(0.8),
    })
}

fn create_glass(_: &MaterialRegistry, settings: &MaterialSettings)
    -> Result<Material> {
    Ok(Material::Glass {
        color: settings.base_color(),
        transparency: settings.transparency.unwrap_or(0.9),
        reflectivity: settings.reflectivity.unwrap_or(0.1),
        refraction_index: settings.refraction_index.unwrap_or(1.5),
    })
}

fn create_diamond(_: &MaterialRegistry, settings: &MaterialSettings)
    -> Result<Material> {
    Ok(Material::Diamond {
        color: settings.base_color(),
        transparency: settings.transparency.unwrap_or(0.95),
        reflectivity: settings.reflectivity.unwrap_or(0.2),
        refraction_index: settings.refraction_index.unwrap_or(2.42),
        dispersion: settings.dispersion.unwrap_or(0.044),
    })
}

fn create_translucent(_: &MaterialRegistry, settings: &MaterialSettings)
    -> Result<Material> {
    Ok(Material::Translucent {
        color: settings.base_color(),
        transparency: settings.transparency.unwrap_or(0.3),
        refraction_index: settings.refraction_index.unwrap_or(1.2),
    })
}

fn create_composite(registry: &MaterialRegistry, settings: &MaterialSettings)
    -> Result<Material> {
    let mut parts = Vec::with_capacity(settings.materials.len());

    for part in &settings.materials {
        let material = registry.create_from_settings(&part.settings)?;
        parts.push((part.weight, material));
    }

    Ok(Material::Composite { color: settings.base_color(), parts })
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_from(json: &str) -> MaterialSettings {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn unknown_material_is_an_error() {
        let registry = MaterialRegistry::with_defaults();
        let result = registry.create("chrome", &MaterialSettings::default());

        assert!(matches!(result, Err(SceneError::UnknownMaterial(_))));
    }

    #[test]
    fn missing_type_means_matte() {
        let registry = MaterialRegistry::with_defaults();
        let settings =
            settings_from(r#"{ "color": { "r": 255, "g": 0, "b": 0 } }"#);

        let material = registry.create_from_settings(&settings).unwrap();
        assert_eq!(material, Material::Matte { color: Color::red() });
    }

    #[test]
    fn omitted_color_is_white() {
        let registry = MaterialRegistry::with_defaults();
        let settings = settings_from(r#"{ "type": "matte" }"#);

        let material = registry.create_from_settings(&settings).unwrap();
        assert_eq!(material.color(), Color::white());
    }

    #[test]
    fn glass_defaults() {
        let registry = MaterialRegistry::with_defaults();
        let settings = settings_from(r#"{ "type": "glass" }"#);

        let material = registry.create_from_settings(&settings).unwrap();
        assert_eq!(material, Material::Glass {
            color: Color::white(),
            transparency: 0.9,
            reflectivity: 0.1,
            refraction_index: 1.5,
        });
    }

    #[test]
    fn diamond_defaults() {
        let registry = MaterialRegistry::with_defaults();
        let settings = settings_from(r#"{ "type": "diamond" }"#);

        let material = registry.create_from_settings(&settings).unwrap();
        assert_eq!(material, Material::Diamond {
            color: Color::white(),
            transparency: 0.95,
            reflectivity: 0.2,
            refraction_index: 2.42,
            dispersion: 0.044,
        });
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let registry = MaterialRegistry::with_defaults();
        let settings = settings_from(
            r#"{ "type": "metal", "roughness": 0.0, "reflectivity": 1.0 }"#
        );

        let material = registry.create_from_settings(&settings).unwrap();
        assert_eq!(material, Material::Metal {
            color: Color::white(),
            roughness: 0.0,
            reflectivity: 1.0,
        });
    }

    #[test]
    fn composite_builds_weighted_parts() {
        let registry = MaterialRegistry::with_defaults();
        let settings = settings_from(r#"{
            "type": "composite",
            "materials": [
                { "type": "mirror", "weight": 2.0 },
                { "type": "glass" }
            ]
        }"#);

        let material = registry.create_from_settings(&settings).unwrap();
        match material {
            Material::Composite { parts, .. } => {
                assert_eq!(parts.len(), 2);
                assert!(crate::feq(parts[0].0, 2.0));
                assert!(matches!(parts[0].1, Material::Mirror { .. }));
                assert!(crate::feq(parts[1].0, 1.0));
                assert!(matches!(parts[1].1, Material::Glass { .. }));
            }
            other => panic!("expected composite, got {:?}", other),
        }
    }

    #[test]
    fn composite_nested_in_composite() {
        let registry = MaterialRegistry::with_defaults();
        let settings = settings_from(r#"{
            "type": "composite",
            "materials": [
                { "type": "composite", "materials": [{ "type": "matte" }] }
            ]
        }"#);

        assert!(registry.create_from_settings(&settings).is_ok());
    }
}
