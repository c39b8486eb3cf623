//! Shared fixtures for unit tests.

use crate::config::BattleConfig;
use crate::env::{
    BattleEnv, Catalog, CatalogData, CharacterBuild, CharacterTemplate, EquipmentDescriptor,
    EquipmentEffect, ItemDefinition, ItemEffect, MoveDefinition, MoveEffect, MovePool, Rarity,
    SequenceRng,
};
use crate::state::{BuffStat, Combatant, Inventory, Owner, StatusKind};

/// Every chance roll below 99% fails.
pub const NO_LUCK: &[f64] = &[0.99];

pub struct Fixture {
    pub catalog: Catalog,
    pub config: BattleConfig,
    pub rng: SequenceRng,
}

impl Fixture {
    pub fn new(units: &[f64]) -> Self {
        Self {
            catalog: catalog(),
            config: BattleConfig::default(),
            rng: SequenceRng::from_units(units),
        }
    }

    pub fn env(&self) -> BattleEnv<'_> {
        BattleEnv::new(&self.catalog, &self.rng, &self.config)
    }

    pub fn build(&self, stat_percent: f64, tier: [&str; 2]) -> CharacterBuild {
        CharacterBuild::new("hero", 1, stat_percent, tier.map(Into::into))
    }

    pub fn combatant(&self, build: CharacterBuild) -> Combatant {
        self.owned(Owner::Ai, build, Inventory::default())
    }

    pub fn owned(&self, owner: Owner, build: CharacterBuild, inventory: Inventory) -> Combatant {
        Combatant::from_build(&self.env(), owner, &build, inventory).expect("fixture build")
    }

    /// Level 1, ST 50: 400 HP, 50 energy, moves `[blast, jab, mend]`.
    pub fn hero(&self) -> Combatant {
        self.combatant(self.build(50.0, ["jab", "mend"]))
    }
}

fn equipment(id: &str, rarity: Rarity, effect: EquipmentEffect) -> EquipmentDescriptor {
    EquipmentDescriptor {
        id: id.into(),
        name: id.to_owned(),
        rarity,
        effect,
    }
}

fn item(id: &str, effect: ItemEffect) -> ItemDefinition {
    ItemDefinition {
        id: id.into(),
        name: id.to_owned(),
        effect,
    }
}

pub fn catalog() -> Catalog {
    Catalog::from_data(CatalogData {
        moves: vec![
            MoveDefinition::new("blast", "Blast", 90),
            MoveDefinition::new("jab", "Jab", 30),
            MoveDefinition::new("smash", "Smash", 50),
            MoveDefinition::new("mend", "Mend", -50),
            MoveDefinition::new("focus", "Focus", 0)
                .with_cost(10)
                .with_effect(MoveEffect::SelfBuff {
                    stat: BuffStat::Attack,
                    multiplier: 1.5,
                    turns: 3,
                }),
            MoveDefinition::new("ember", "Ember", 20).with_effect(MoveEffect::Inflict {
                kind: StatusKind::Burn,
                turns: 3,
                chance: 1.0,
            }),
            MoveDefinition::new("nova", "Nova", 200).with_cost(100),
        ],
        characters: vec![CharacterTemplate {
            id: "hero".into(),
            name: "Hero".into(),
            icon: String::new(),
            base_hp: 500,
            special_move: "blast".into(),
            ability: None,
        }],
        equipment: vec![
            equipment("drop", Rarity::Common, EquipmentEffect::MedDrop { heal_fraction: 0.5 }),
            equipment("siphon", Rarity::Common, EquipmentEffect::Siphon { energy: 5 }),
            equipment("veil", Rarity::Rare, EquipmentEffect::Evasion { dodge_chance: 0.5 }),
            equipment("mirror", Rarity::Rare, EquipmentEffect::Reflect { fraction: 0.5 }),
            equipment(
                "recycler",
                Rarity::Rare,
                EquipmentEffect::Recycler {
                    refund_fraction: 0.5,
                },
            ),
            equipment("phoenix", Rarity::Legendary, EquipmentEffect::Phoenix { energy: 30 }),
            equipment(
                "converter",
                Rarity::Legendary,
                EquipmentEffect::Converter { fraction: 0.5 },
            ),
        ],
        items: vec![
            item("potion", ItemEffect::Heal { amount: 100 }),
            item("tonic", ItemEffect::Energy { amount: 30 }),
            item(
                "rage",
                ItemEffect::Buff {
                    stat: BuffStat::Attack,
                    multiplier: 2.0,
                    turns: 2,
                },
            ),
            item("salve", ItemEffect::Cleanse),
        ],
        move_pool: MovePool {
            low: vec!["jab".into(), "mend".into()],
            mid: vec!["jab".into(), "ember".into()],
            high: vec!["nova".into(), "focus".into()],
        },
    })
    .expect("fixture catalog")
}
