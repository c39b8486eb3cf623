//! Stage 6 and HP writes.
//!
//! Every HP loss in a battle goes through [`inflict`] so the auto-revive hook
//! sees it, whether it comes from a hit, a reflect, or a status tick.

use crate::env::EquipmentEffect;
use crate::events::{BattleEvent, CombatantRef};
use crate::state::{Activation, Combatant};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hit {
    pub absorbed: u32,
    pub hp_damage: u32,
}

/// Drains the shield first, then HP.
pub fn strike(
    target: &mut Combatant,
    target_ref: CombatantRef,
    amount: u32,
    events: &mut Vec<BattleEvent>,
) -> Hit {
    let absorbed = amount.min(target.shield);
    target.shield -= absorbed;
    let hp_damage = inflict(target, target_ref, amount - absorbed, events);
    Hit {
        absorbed,
        hp_damage,
    }
}

/// Removes HP directly and fires auto-revive if it reaches zero.
///
/// Returns the HP actually removed.
pub fn inflict(
    target: &mut Combatant,
    target_ref: CombatantRef,
    amount: u32,
    events: &mut Vec<BattleEvent>,
) -> u32 {
    let lost = target.lose_hp(amount);
    if target.is_down() {
        revive(target, target_ref, events);
    }
    lost
}

fn revive(target: &mut Combatant, target_ref: CombatantRef, events: &mut Vec<BattleEvent>) {
    let is_phoenix = |e: &EquipmentEffect| matches!(e, EquipmentEffect::Phoenix { .. });
    let Some(fired) = target.loadout.consume(Activation::Available, is_phoenix) else {
        return;
    };
    let energy = match fired.descriptor.effect {
        EquipmentEffect::Phoenix { energy } => energy,
        _ => 0,
    };
    target.revive(energy);
    tracing::debug!(combatant = ?target_ref, "auto-revive fired");
    events.push(BattleEvent::EquipmentTriggered {
        actor: target_ref,
        slot: fired.slot,
        equipment: fired.descriptor.id,
        amount: target.hp(),
    });
    events.push(BattleEvent::Revived {
        actor: target_ref,
        hp: target.hp(),
        energy: target.energy(),
    });
}
