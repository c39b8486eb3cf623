//! Static content lookups.
//!
//! The catalog is immutable after load and shared by every session without
//! locks. [`CatalogOracle`] is the read seam; [`Catalog`] is the map-backed
//! implementation the content crate builds from [`CatalogData`].

use std::collections::HashMap;

use super::{
    CharacterId, CharacterTemplate, EquipmentDescriptor, EquipmentId, ItemDefinition, ItemId,
    MoveDefinition, MoveId, MovePool,
};
use crate::error::{BattleError, ErrorSeverity};

/// Read-only access to moves, characters, equipment and items.
pub trait CatalogOracle: Send + Sync {
    fn move_definition(&self, id: &MoveId) -> Option<&MoveDefinition>;

    fn character(&self, id: &CharacterId) -> Option<&CharacterTemplate>;

    fn equipment(&self, id: &EquipmentId) -> Option<&EquipmentDescriptor>;

    fn item(&self, id: &ItemId) -> Option<&ItemDefinition>;

    fn move_pool(&self) -> &MovePool;
}

/// Flat catalog as stored in content files.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CatalogData {
    pub moves: Vec<MoveDefinition>,
    pub characters: Vec<CharacterTemplate>,
    pub equipment: Vec<EquipmentDescriptor>,
    pub items: Vec<ItemDefinition>,
    pub move_pool: MovePool,
}

/// Reasons a catalog fails cross-reference validation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate move id '{0}'")]
    DuplicateMove(MoveId),

    #[error("duplicate character id '{0}'")]
    DuplicateCharacter(CharacterId),

    #[error("duplicate equipment id '{0}'")]
    DuplicateEquipment(EquipmentId),

    #[error("duplicate item id '{0}'")]
    DuplicateItem(ItemId),

    #[error("character '{character}' references unknown special move '{special}'")]
    UnknownSpecialMove {
        character: CharacterId,
        special: MoveId,
    },

    #[error("move pool references unknown move '{0}'")]
    UnknownPoolMove(MoveId),
}

impl BattleError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use CatalogError::*;
        match self {
            DuplicateMove(_) => "CATALOG_DUPLICATE_MOVE",
            DuplicateCharacter(_) => "CATALOG_DUPLICATE_CHARACTER",
            DuplicateEquipment(_) => "CATALOG_DUPLICATE_EQUIPMENT",
            DuplicateItem(_) => "CATALOG_DUPLICATE_ITEM",
            UnknownSpecialMove { .. } => "CATALOG_UNKNOWN_SPECIAL_MOVE",
            UnknownPoolMove(_) => "CATALOG_UNKNOWN_POOL_MOVE",
        }
    }
}

/// Hash-map backed catalog.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    moves: HashMap<MoveId, MoveDefinition>,
    characters: HashMap<CharacterId, CharacterTemplate>,
    equipment: HashMap<EquipmentId, EquipmentDescriptor>,
    items: HashMap<ItemId, ItemDefinition>,
    move_pool: MovePool,
}

impl Catalog {
    /// Indexes the data and checks every cross reference.
    pub fn from_data(data: CatalogData) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            move_pool: data.move_pool,
            ..Self::default()
        };

        for definition in data.moves {
            if catalog.moves.contains_key(&definition.id) {
                return Err(CatalogError::DuplicateMove(definition.id));
            }
            catalog.moves.insert(definition.id.clone(), definition);
        }
        for template in data.characters {
            if catalog.characters.contains_key(&template.id) {
                return Err(CatalogError::DuplicateCharacter(template.id));
            }
            if !catalog.moves.contains_key(&template.special_move) {
                return Err(CatalogError::UnknownSpecialMove {
                    character: template.id,
                    special: template.special_move,
                });
            }
            catalog.characters.insert(template.id.clone(), template);
        }
        for descriptor in data.equipment {
            if catalog.equipment.contains_key(&descriptor.id) {
                return Err(CatalogError::DuplicateEquipment(descriptor.id));
            }
            catalog.equipment.insert(descriptor.id.clone(), descriptor);
        }
        for item in data.items {
            if catalog.items.contains_key(&item.id) {
                return Err(CatalogError::DuplicateItem(item.id));
            }
            catalog.items.insert(item.id.clone(), item);
        }

        let pool = &catalog.move_pool;
        if let Some(missing) = pool
            .low
            .iter()
            .chain(&pool.mid)
            .chain(&pool.high)
            .find(|id| !catalog.moves.contains_key(*id))
        {
            return Err(CatalogError::UnknownPoolMove(missing.clone()));
        }

        Ok(catalog)
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn characters(&self) -> impl Iterator<Item = &CharacterTemplate> {
        self.characters.values()
    }
}

impl CatalogOracle for Catalog {
    fn move_definition(&self, id: &MoveId) -> Option<&MoveDefinition> {
        self.moves.get(id)
    }

    fn character(&self, id: &CharacterId) -> Option<&CharacterTemplate> {
        self.characters.get(id)
    }

    fn equipment(&self, id: &EquipmentId) -> Option<&EquipmentDescriptor> {
        self.equipment.get(id)
    }

    fn item(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    fn move_pool(&self) -> &MovePool {
        &self.move_pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str, special: &str) -> CharacterTemplate {
        CharacterTemplate {
            id: id.into(),
            name: id.to_uppercase(),
            icon: String::new(),
            base_hp: 500,
            special_move: special.into(),
            ability: None,
        }
    }

    #[test]
    fn indexes_valid_data() {
        let catalog = Catalog::from_data(CatalogData {
            moves: vec![MoveDefinition::new("blast", "Blast", 90)],
            characters: vec![template("hero", "blast")],
            move_pool: MovePool {
                low: vec!["blast".into()],
                ..MovePool::default()
            },
            ..CatalogData::default()
        })
        .expect("catalog should validate");

        assert_eq!(catalog.move_count(), 1);
        assert!(catalog.character(&"hero".into()).is_some());
        assert!(catalog.move_definition(&"missing".into()).is_none());
    }

    #[test]
    fn rejects_dangling_special_move() {
        let err = Catalog::from_data(CatalogData {
            characters: vec![template("hero", "blast")],
            ..CatalogData::default()
        })
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownSpecialMove { .. }));
        assert_eq!(err.error_code(), "CATALOG_UNKNOWN_SPECIAL_MOVE");
    }

    #[test]
    fn rejects_duplicate_moves() {
        let err = Catalog::from_data(CatalogData {
            moves: vec![
                MoveDefinition::new("blast", "Blast", 90),
                MoveDefinition::new("blast", "Blast again", 10),
            ],
            ..CatalogData::default()
        })
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateMove("blast".into()));
    }

    #[test]
    fn rejects_unknown_pool_entries() {
        let err = Catalog::from_data(CatalogData {
            move_pool: MovePool {
                high: vec!["ghost".into()],
                ..MovePool::default()
            },
            ..CatalogData::default()
        })
        .unwrap_err();
        assert_eq!(err, CatalogError::UnknownPoolMove("ghost".into()));
    }
}
