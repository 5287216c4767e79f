//! Substance definitions and registry

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reactions::{MAX_REACTIONS, Reaction};

/// Largest accepted `spread_rate`
pub const MAX_SPREAD_RATE: u32 = 4096;

/// Built-in substance IDs
pub struct SubstanceId;

impl SubstanceId {
    pub const AIR: u16 = 0;
    pub const WATER: u16 = 1;
    pub const SALT: u16 = 2;
    pub const CARBON_DIOXIDE: u16 = 3;
    pub const METHANE: u16 = 4;
    pub const AMMONIA: u16 = 5;
    pub const NITRIC_ACID: u16 = 6;
    pub const MAGNESIUM: u16 = 7;
    pub const HYDROGEN: u16 = 8;
    pub const SODIUM_HYPOCHLORITE: u16 = 9;
    pub const HYDROGEN_CHLORIDE: u16 = 10;
    pub const SODIUM_NITRATE: u16 = 11;
    pub const AMMONIUM_NITRATE: u16 = 12;
    pub const MAGNESIUM_OXIDE: u16 = 13;
    pub const UREA: u16 = 14;
    pub const AMMONIUM_HYDROXIDE: u16 = 15;
}

/// Definition of a substance's properties
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubstanceDef {
    pub id: u16,
    pub name: String,

    /// Display color (RGBA), opaque to the engine
    pub color: [u8; 4],

    /// Positive sinks, negative rises, zero never moves on its own
    pub density: i32,

    /// Farthest lateral offset tried when spreading
    #[serde(default)]
    pub spread_rate: u32,

    /// Checked in order, first match wins
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Default for SubstanceDef {
    fn default() -> Self {
        Self {
            id: 0,
            name: "unknown".to_string(),
            color: [255, 0, 255, 255], // Magenta for missing substances
            density: 0,
            spread_rate: 0,
            reactions: Vec::new(),
        }
    }
}

/// Reasons a substance table is rejected
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("substance table is empty")]
    Empty,

    #[error("substance at position {index} has id {id}; ids must match their table position")]
    IdMismatch { index: usize, id: u16 },

    #[error("air (id 0) must have density 0, found {density}")]
    AirDensity { density: i32 },

    #[error("substance table has no substance besides air")]
    NothingPaintable,

    #[error(
        "substance {id} ({name}) has spread rate {spread_rate}, at most {max} allowed",
        max = MAX_SPREAD_RATE
    )]
    SpreadRate {
        id: u16,
        name: String,
        spread_rate: u32,
    },

    #[error(
        "substance {id} ({name}) defines {count} reactions, at most {max} allowed",
        max = MAX_REACTIONS
    )]
    TooManyReactions { id: u16, name: String, count: usize },

    #[error("substance {id} ({name}) reaction #{index} references unknown substance id {unknown}")]
    UnknownSubstance {
        id: u16,
        name: String,
        index: usize,
        unknown: u16,
    },

    #[error("failed to parse substance table")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to read substance table {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Registry of all substances
#[derive(Clone, Debug)]
pub struct Substances {
    substances: Vec<SubstanceDef>,
}

impl Substances {
    /// Built-in chemistry table
    pub fn new() -> Self {
        Self {
            substances: default_table(),
        }
    }

    /// Build a registry from definitions, rejecting inconsistent tables
    pub fn from_defs(substances: Vec<SubstanceDef>) -> Result<Self, RegistryError> {
        let registry = Self { substances };
        registry.validate()?;
        Ok(registry)
    }

    /// Parse a RON list of substance definitions
    pub fn from_ron_str(source: &str) -> Result<Self, RegistryError> {
        let defs: Vec<SubstanceDef> = ron::from_str(source)?;
        Self::from_defs(defs)
    }

    /// Load a RON substance table from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_ron_str(&source)?;
        log::info!(
            "Loaded {} substances from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Serialize the table in the format accepted by [`Substances::from_ron_str`]
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(&self.substances, ron::ser::PrettyConfig::default())
    }

    /// Check ids, spread rates and reaction references
    pub fn validate(&self) -> Result<(), RegistryError> {
        let air = self.substances.first().ok_or(RegistryError::Empty)?;
        if air.density != 0 {
            return Err(RegistryError::AirDensity {
                density: air.density,
            });
        }
        if self.substances.len() < 2 {
            return Err(RegistryError::NothingPaintable);
        }

        for (index, def) in self.substances.iter().enumerate() {
            if def.id as usize != index {
                return Err(RegistryError::IdMismatch { index, id: def.id });
            }

            if def.spread_rate > MAX_SPREAD_RATE {
                return Err(RegistryError::SpreadRate {
                    id: def.id,
                    name: def.name.clone(),
                    spread_rate: def.spread_rate,
                });
            }

            if def.reactions.len() > MAX_REACTIONS {
                return Err(RegistryError::TooManyReactions {
                    id: def.id,
                    name: def.name.clone(),
                    count: def.reactions.len(),
                });
            }

            for (reaction_index, reaction) in def.reactions.iter().enumerate() {
                if let Some(unknown) = reaction
                    .referenced_ids()
                    .into_iter()
                    .find(|id| !self.contains(*id))
                {
                    return Err(RegistryError::UnknownSubstance {
                        id: def.id,
                        name: def.name.clone(),
                        index: reaction_index,
                        unknown,
                    });
                }
            }
        }

        Ok(())
    }

    /// Get substance definition by ID
    pub fn get(&self, id: u16) -> &SubstanceDef {
        self.substances
            .get(id as usize)
            .unwrap_or(&self.substances[0])
    }

    pub fn contains(&self, id: u16) -> bool {
        (id as usize) < self.substances.len()
    }

    pub fn density(&self, id: u16) -> i32 {
        self.get(id).density
    }

    pub fn spread_rate(&self, id: u16) -> u32 {
        self.get(id).spread_rate
    }

    pub fn reactions(&self, id: u16) -> &[Reaction] {
        &self.get(id).reactions
    }

    pub fn name(&self, id: u16) -> &str {
        &self.get(id).name
    }

    /// Get color for a substance
    pub fn color(&self, id: u16) -> [u8; 4] {
        self.get(id).color
    }

    pub fn len(&self) -> usize {
        self.substances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubstanceDef> {
        self.substances.iter()
    }
}

impl Default for Substances {
    fn default() -> Self {
        Self::new()
    }
}

fn substance(
    id: u16,
    name: &str,
    color: [u8; 4],
    density: i32,
    spread_rate: u32,
    reactions: Vec<Reaction>,
) -> SubstanceDef {
    SubstanceDef {
        id,
        name: name.to_string(),
        color,
        density,
        spread_rate,
        reactions,
    }
}

fn default_table() -> Vec<SubstanceDef> {
    use crate::SubstanceId as S;

    vec![
        substance(S::AIR, "Air (g)", [255, 255, 255, 255], 0, 0, vec![]),
        substance(S::WATER, "H2O (l)", [0, 121, 241, 255], 997, 10, vec![]),
        // Salt water electrolysis: bleach below, hydrogen bubbles off
        substance(
            S::SALT,
            "NaCl (s)",
            [211, 176, 131, 255],
            2160,
            0,
            vec![Reaction::new(S::WATER, S::SODIUM_HYPOCHLORITE, S::HYDROGEN)],
        ),
        substance(S::CARBON_DIOXIDE, "CO2 (g)", [80, 80, 80, 255], -1, 30, vec![]),
        substance(
            S::METHANE,
            "CH4 (g)",
            [255, 161, 0, 255],
            -4,
            30,
            vec![Reaction::new(S::WATER, S::HYDROGEN, S::CARBON_DIOXIDE)],
        ),
        substance(
            S::AMMONIA,
            "NH3 (g)",
            [230, 41, 55, 255],
            -3,
            30,
            vec![
                Reaction::new(S::WATER, S::AMMONIUM_HYDROXIDE, S::AMMONIUM_HYDROXIDE),
                Reaction::new(S::CARBON_DIOXIDE, S::WATER, S::UREA),
            ],
        ),
        substance(
            S::NITRIC_ACID,
            "HNO3 (l)",
            [200, 122, 255, 255],
            1513,
            10,
            vec![
                Reaction::new(S::SALT, S::HYDROGEN_CHLORIDE, S::SODIUM_NITRATE),
                Reaction::new(S::AMMONIA, S::HYDROGEN, S::AMMONIUM_NITRATE),
            ],
        ),
        substance(
            S::MAGNESIUM,
            "Mg (s)",
            [130, 130, 130, 255],
            1738,
            0,
            vec![Reaction::new(S::WATER, S::HYDROGEN, S::MAGNESIUM_OXIDE)],
        ),
        substance(S::HYDROGEN, "H2 (g)", [255, 109, 194, 255], -5, 30, vec![]),
        substance(
            S::SODIUM_HYPOCHLORITE,
            "NaOCl (l)",
            [255, 203, 0, 255],
            1110,
            10,
            vec![],
        ),
        substance(
            S::HYDROGEN_CHLORIDE,
            "HCl (g)",
            [0, 228, 48, 255],
            -2,
            30,
            vec![],
        ),
        substance(
            S::SODIUM_NITRATE,
            "NaNO3 (s)",
            [127, 106, 79, 255],
            2260,
            0,
            vec![],
        ),
        substance(
            S::AMMONIUM_NITRATE,
            "NH4NO3 (s)",
            [0, 158, 47, 255],
            1730,
            0,
            vec![],
        ),
        substance(
            S::MAGNESIUM_OXIDE,
            "MgO (s)",
            [255, 0, 255, 255],
            3580,
            0,
            vec![],
        ),
        substance(S::UREA, "NH2CONH2 (s)", [200, 200, 200, 255], 1335, 0, vec![]),
        substance(
            S::AMMONIUM_HYDROXIDE,
            "NH4OH (aq)",
            [135, 60, 190, 255],
            900,
            10,
            vec![],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_table_is_valid() {
        let substances = Substances::new();
        substances.validate().expect("built-in table must validate");
        assert_eq!(substances.len(), 16);
    }

    #[test]
    fn test_air_is_inert() {
        let substances = Substances::new();
        assert_eq!(substances.density(SubstanceId::AIR), 0);
        assert_eq!(substances.spread_rate(SubstanceId::AIR), 0);
        assert!(substances.reactions(SubstanceId::AIR).is_empty());
    }

    #[test]
    fn test_gases_have_negative_density() {
        let substances = Substances::new();
        for id in [
            SubstanceId::CARBON_DIOXIDE,
            SubstanceId::METHANE,
            SubstanceId::AMMONIA,
            SubstanceId::HYDROGEN,
            SubstanceId::HYDROGEN_CHLORIDE,
        ] {
            assert!(substances.density(id) < 0, "{} should rise", substances.name(id));
        }
    }

    #[test]
    fn test_reactions_keep_table_order() {
        let substances = Substances::new();
        let reactions = substances.reactions(SubstanceId::NITRIC_ACID);
        assert_eq!(reactions.len(), 2);
        assert_eq!(reactions[0].reactant, SubstanceId::SALT);
        assert_eq!(reactions[1].reactant, SubstanceId::AMMONIA);
    }

    #[test]
    fn test_unknown_id_falls_back_to_air() {
        let substances = Substances::new();
        assert_eq!(substances.get(999).id, SubstanceId::AIR);
        assert!(!substances.contains(999));
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(matches!(
            Substances::from_defs(vec![]),
            Err(RegistryError::Empty)
        ));
    }

    #[test]
    fn test_rejects_unknown_reactant() {
        let mut defs = default_table();
        defs[SubstanceId::SALT as usize].reactions = vec![Reaction::new(42, 1, 1)];

        match Substances::from_defs(defs) {
            Err(RegistryError::UnknownSubstance { id, unknown, .. }) => {
                assert_eq!(id, SubstanceId::SALT);
                assert_eq!(unknown, 42);
            }
            other => panic!("expected UnknownSubstance, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_product() {
        let mut defs = default_table();
        defs[SubstanceId::MAGNESIUM as usize].reactions =
            vec![Reaction::new(SubstanceId::WATER, SubstanceId::HYDROGEN, 16)];

        assert!(matches!(
            Substances::from_defs(defs),
            Err(RegistryError::UnknownSubstance { unknown: 16, .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_order_ids() {
        let mut defs = default_table();
        defs.swap(1, 2);

        assert!(matches!(
            Substances::from_defs(defs),
            Err(RegistryError::IdMismatch { index: 1, id: 2 })
        ));
    }

    #[test]
    fn test_rejects_dense_air() {
        let mut defs = default_table();
        defs[0].density = 1;

        assert!(matches!(
            Substances::from_defs(defs),
            Err(RegistryError::AirDensity { density: 1 })
        ));
    }

    #[test]
    fn test_rejects_air_only_table() {
        let defs = vec![default_table().remove(0)];

        assert!(matches!(
            Substances::from_defs(defs),
            Err(RegistryError::NothingPaintable)
        ));
    }

    #[test]
    fn test_rejects_huge_spread_rate() {
        let mut defs = default_table();
        defs[SubstanceId::WATER as usize].spread_rate = i32::MAX as u32;

        assert!(matches!(
            Substances::from_defs(defs),
            Err(RegistryError::SpreadRate { id: SubstanceId::WATER, .. })
        ));

        let mut defs = default_table();
        defs[SubstanceId::WATER as usize].spread_rate = MAX_SPREAD_RATE;
        assert!(Substances::from_defs(defs).is_ok());
    }

    #[test]
    fn test_rejects_too_many_reactions() {
        let mut defs = default_table();
        defs[SubstanceId::WATER as usize].reactions =
            vec![Reaction::new(SubstanceId::SALT, SubstanceId::WATER, SubstanceId::WATER); 4];

        assert!(matches!(
            Substances::from_defs(defs),
            Err(RegistryError::TooManyReactions { count: 4, .. })
        ));
    }

    #[test]
    fn test_ron_table_matches_built_in() {
        let substances = Substances::new();
        let ron = substances.to_ron_string().unwrap();
        assert!(ron.contains("NaCl (s)"));

        let reloaded = Substances::from_ron_str(&ron).unwrap();
        assert_eq!(reloaded.len(), substances.len());
        assert_eq!(
            reloaded.reactions(SubstanceId::AMMONIA),
            substances.reactions(SubstanceId::AMMONIA)
        );
    }

    #[test]
    fn test_ron_defaults_for_optional_fields() {
        let source = r#"[
            (id: 0, name: "Void", color: (0, 0, 0, 255), density: 0),
            (id: 1, name: "Dust", color: (90, 90, 90, 255), density: 3, spread_rate: 1),
        ]"#;

        let substances = Substances::from_ron_str(source).unwrap();
        assert_eq!(substances.len(), 2);
        assert_eq!(substances.spread_rate(0), 0);
        assert!(substances.reactions(1).is_empty());
    }

    #[test]
    fn test_ron_parse_error() {
        assert!(matches!(
            Substances::from_ron_str("not a table"),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let ron = Substances::new().to_ron_string().unwrap();
        file.write_all(ron.as_bytes()).unwrap();

        let substances = Substances::from_file(file.path()).unwrap();
        assert_eq!(substances.name(SubstanceId::UREA), "NH2CONH2 (s)");
    }

    #[test]
    fn test_from_missing_file() {
        assert!(matches!(
            Substances::from_file("/nonexistent/substances.ron"),
            Err(RegistryError::Io { .. })
        ));
    }
}
