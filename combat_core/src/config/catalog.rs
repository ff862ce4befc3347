//! Content catalog loading

use super::ConfigError;
use crate::catalog::Catalog;
use std::path::Path;
use tracing::warn;

/// Load the item and skill catalog from a TOML file
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let catalog: Catalog = super::load_toml(path)?;
    catalog.validate()?;
    Ok(catalog)
}

/// Load the item and skill catalog from a TOML string
pub fn parse_catalog(content: &str) -> Result<Catalog, ConfigError> {
    let catalog: Catalog = super::parse_toml(content)?;
    catalog.validate()?;
    Ok(catalog)
}

/// Get the built-in catalog
pub fn default_catalog() -> Catalog {
    let toml = include_str!("../../config/catalog.toml");
    parse_catalog(toml).unwrap_or_else(|err| {
        warn!(%err, "built-in catalog failed to load");
        Catalog::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Effect, ItemBehavior};
    use crate::types::{IdAllocator, ModifierTarget, Proficiency};

    #[test]
    fn test_default_catalog_loads() {
        // Parse directly so a broken file fails loudly here
        let catalog = parse_catalog(include_str!("../../config/catalog.toml")).unwrap();
        assert!(catalog.item("longsword").is_some());
        assert!(catalog.item("all_seeing_eye").is_some());
        assert!(catalog.skill("blizzard").is_some());
        assert!(catalog.skill("libra").is_some());
    }

    #[test]
    fn test_default_items() {
        let catalog = default_catalog();
        let mut ids = IdAllocator::new();

        let potion = catalog.create_item("health_potion", &mut ids).unwrap();
        assert!(potion.consumable);
        assert!(matches!(
            potion.effect(),
            Some(Effect::Heal {
                proficiency: Proficiency::Potions,
                ..
            })
        ));

        let ring = catalog.create_item("ring_of_strength", &mut ids).unwrap();
        match ring.behavior {
            ItemBehavior::Equippable { modifier, .. } => {
                assert_eq!(modifier.target, ModifierTarget::Strength)
            }
            other => panic!("unexpected behavior {other:?}"),
        }
    }

    #[test]
    fn test_unknown_key() {
        let catalog = default_catalog();
        let mut ids = IdAllocator::new();
        assert!(matches!(
            catalog.create_item("excalibur", &mut ids),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_useable_equippable() {
        let toml = r#"
[items.cursed_ring]
kind = "artifact"
call = "ring"
name = "Cursed Ring"
effect = { kind = "strike" }
equip = { target = "armor", factor = 1.5 }
"#;
        assert!(matches!(
            parse_catalog(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
