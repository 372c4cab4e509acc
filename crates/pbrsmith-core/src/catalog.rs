//! Static material catalog.
//!
//! Maps material keys to their generation parameters: prompt, negative
//! prompt, and metallic/roughness base values. A flat immutable table is
//! all this needs; unknown keys resolve to the designated default entry so
//! callers can pass free-form keys.

/// Generation parameters for one material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    /// Catalog key.
    pub key: &'static str,
    /// Base prompt describing the surface.
    pub prompt: &'static str,
    /// Negative prompt steering the backend away from unwanted styles.
    pub negative_prompt: &'static str,
    /// Metallic base factor in [0, 1].
    pub metallic: f64,
    /// Roughness base factor in [0, 1].
    pub roughness: f64,
}

/// Negative prompt shared by all catalog entries.
const NEGATIVE_PROMPT: &str = "pixel art, cartoon, illustration, painting, drawing, sketch, \
     low quality, blurry, noisy, artifacts, text, watermark, logo, signature";

const HULL_PLATING_PROMPT: &str = "spaceship hull plating, weathered grey metal plates, rivets, \
     industrial design, seamless tileable texture, worn steel panels, space vessel exterior";

const MATERIALS: &[MaterialParams] = &[
    MaterialParams {
        key: "tech_panel",
        prompt: "futuristic spaceship tech panel, metallic blue panels, glowing circuits, \
             clean geometric design, seamless tileable texture, high tech interface, \
             brushed metal finish",
        negative_prompt: NEGATIVE_PROMPT,
        metallic: 0.8,
        roughness: 0.3,
    },
    MaterialParams {
        key: "hull_plating",
        prompt: HULL_PLATING_PROMPT,
        negative_prompt: NEGATIVE_PROMPT,
        metallic: 0.9,
        roughness: 0.4,
    },
    MaterialParams {
        key: "control_system",
        prompt: "spaceship control system interface, metallic orange accent panels, \
             digital displays, buttons and switches, seamless tileable texture, \
             command center design",
        negative_prompt: NEGATIVE_PROMPT,
        metallic: 0.7,
        roughness: 0.2,
    },
    MaterialParams {
        key: "energy_conduit",
        prompt: "spaceship energy conduit, metallic green power channels, glowing energy \
             lines, technical patterns, seamless tileable texture, power distribution \
             system",
        negative_prompt: NEGATIVE_PROMPT,
        metallic: 0.8,
        roughness: 0.3,
    },
    MaterialParams {
        key: "floor",
        prompt: "spaceship floor plating, dark grey metal grating, anti-slip texture, \
             industrial flooring, seamless tileable texture, worn metal walkway",
        negative_prompt: NEGATIVE_PROMPT,
        metallic: 0.6,
        roughness: 0.7,
    },
    MaterialParams {
        key: "ceiling",
        prompt: "spaceship ceiling panels, clean white metal tiles, ventilation grilles, \
             overhead lighting strips, seamless tileable texture, sterile interior \
             design",
        negative_prompt: NEGATIVE_PROMPT,
        metallic: 0.9,
        roughness: 0.1,
    },
];

/// Fallback entry for keys not in the catalog.
const DEFAULT_MATERIAL: MaterialParams = MaterialParams {
    key: "default",
    prompt: HULL_PLATING_PROMPT,
    negative_prompt: NEGATIVE_PROMPT,
    metallic: 0.8,
    roughness: 0.4,
};

/// All catalog entries, in generation order.
pub fn all() -> &'static [MaterialParams] {
    MATERIALS
}

/// Resolve a key to its parameters, falling back to the default entry.
pub fn resolve(key: &str) -> MaterialParams {
    MATERIALS
        .iter()
        .copied()
        .find(|m| m.key == key)
        .unwrap_or(DEFAULT_MATERIAL)
}

/// The designated default entry.
pub fn default_entry() -> MaterialParams {
    DEFAULT_MATERIAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_the_six_reference_materials() {
        let keys: Vec<&str> = all().iter().map(|m| m.key).collect();
        assert_eq!(
            keys,
            [
                "tech_panel",
                "hull_plating",
                "control_system",
                "energy_conduit",
                "floor",
                "ceiling"
            ]
        );
    }

    #[test]
    fn test_base_values_in_unit_range() {
        for material in all() {
            assert!((0.0..=1.0).contains(&material.metallic), "{}", material.key);
            assert!(
                (0.0..=1.0).contains(&material.roughness),
                "{}",
                material.key
            );
            assert!(!material.prompt.is_empty());
            assert!(!material.negative_prompt.is_empty());
        }
    }

    #[test]
    fn test_resolve_known_key() {
        let floor = resolve("floor");
        assert_eq!(floor.key, "floor");
        assert_eq!(floor.metallic, 0.6);
        assert_eq!(floor.roughness, 0.7);
    }

    #[test]
    fn test_unknown_key_falls_back_to_default() {
        let material = resolve("kitchen_sink");
        assert_eq!(material, default_entry());
        assert_eq!(material.metallic, 0.8);
        assert_eq!(material.roughness, 0.4);
        assert!(material.prompt.contains("hull plating"));
    }
}
