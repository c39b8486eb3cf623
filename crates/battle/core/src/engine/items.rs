//! Inventory item use. Consumes the turn.

use crate::engine::ActionError;
use crate::env::{BattleEnv, ItemEffect, ItemId};
use crate::events::{BattleEvent, CombatantRef};
use crate::state::Combatant;

pub fn use_item(
    env: &BattleEnv<'_>,
    user: &mut Combatant,
    actor: CombatantRef,
    id: &ItemId,
    events: &mut Vec<BattleEvent>,
) -> Result<(), ActionError> {
    let definition = env
        .catalog()
        .item(id)
        .ok_or_else(|| ActionError::UnknownItem(id.clone()))?;
    if !user.inventory.take(id) {
        return Err(ActionError::ItemNotOwned(id.clone()));
    }
    user.record_item_use(id);

    let mut follow_up = Vec::new();
    let (hp, energy) = match definition.effect {
        ItemEffect::Heal { amount } => {
            let healed = user.restore_hp(amount);
            user.tally.healing_done += healed as u64;
            (healed, 0)
        }
        ItemEffect::Energy { amount } => (0, user.gain_energy(amount)),
        ItemEffect::Buff {
            stat,
            multiplier,
            turns,
        } => {
            if user.buffs.apply(stat, multiplier, turns) {
                follow_up.push(BattleEvent::BuffApplied {
                    target: actor,
                    stat,
                    multiplier,
                    turns,
                });
            }
            (0, 0)
        }
        ItemEffect::Cleanse => {
            for kind in user.status.clear() {
                follow_up.push(BattleEvent::StatusExpired {
                    target: actor,
                    kind,
                });
            }
            (0, 0)
        }
    };

    events.push(BattleEvent::ItemUsed {
        actor,
        item: id.clone(),
        hp,
        energy,
    });
    events.extend(follow_up);
    Ok(())
}
