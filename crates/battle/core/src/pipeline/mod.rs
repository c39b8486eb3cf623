//! Ability / equipment modifier pipeline.
//!
//! A move resolves through a fixed list of stages:
//!
//! 1. energy cost (attacker reductions), validated before any mutation
//! 2. base magnitude from the formula library
//! 3. critical roll
//! 4. attacker conditional bonuses
//! 5. defender mitigations (a dodge stops the chain here)
//! 6. shield absorption, then HP
//! 7. attacker side effects of the landed hit
//! 8. equipment hooks
//!
//! Heal moves replace stages 2 to 8 with the heal path in [`support`].
//! One-shot triggers consult and set their flag in the same step, so a stage
//! never fires twice in one battle.
mod aftermath;
mod defense;
mod energy;
mod equipment;
mod offense;
mod support;
pub mod vitals;

pub use defense::Mitigation;
pub use energy::{ensure_affordable, quote};
pub use offense::{base_damage, crit_chance};
pub use vitals::Hit;

use crate::config::{BattleConfig, StatusConfig};
use crate::engine::ActionError;
use crate::env::{BattleEnv, Dice, MoveDefinition, MoveKind};
use crate::events::{ActionReport, BattleEvent, CombatantRef, ResolvedAction};
use crate::state::{Combatant, StatusKind};

/// The acting and receiving combatants of one move.
pub struct Participants<'s> {
    pub attacker: &'s mut Combatant,
    pub attacker_ref: CombatantRef,
    pub defender: &'s mut Combatant,
    pub defender_ref: CombatantRef,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoveResolution {
    pub report: ActionReport,
    /// Side effects in the order they happened.
    pub events: Vec<BattleEvent>,
}

/// Resolves the move at `index` of the attacker's moveset.
///
/// Fails without touching either combatant when the move does not exist or
/// is unaffordable.
pub fn resolve_move(
    env: &BattleEnv<'_>,
    dice: &mut Dice<'_>,
    mut p: Participants<'_>,
    index: usize,
) -> Result<MoveResolution, ActionError> {
    let config = env.config();
    let (definition, is_special) = p.attacker.move_at(index, env.catalog())?;
    let cost = energy::quote(p.attacker, definition, is_special, &config.energy);
    energy::ensure_affordable(p.attacker, cost)?;

    p.attacker.drain_energy(cost);
    let mut report = ActionReport::new(
        p.attacker_ref,
        p.defender_ref,
        ResolvedAction::Move {
            index,
            id: definition.id.clone(),
        },
    );
    report.energy_spent = cost;
    let mut events = Vec::new();

    match definition.kind() {
        MoveKind::Damage => {
            strike(config, dice, &mut p, definition, is_special, &mut report, &mut events);
            if report.dodged {
                return Ok(MoveResolution { report, events });
            }
        }
        MoveKind::Heal => {
            support::heal(&mut p, definition, is_special, &mut report, &mut events);
        }
        MoveKind::Support => {}
    }

    if let Some(effect) = definition.effect.as_ref() {
        support::apply_effect(&config.status, dice, &mut p, effect, &mut events);
    }
    equipment::refund(p.attacker, p.attacker_ref, cost, &mut report, &mut events);

    tracing::debug!(
        attacker = ?p.attacker_ref,
        defender = ?p.defender_ref,
        index,
        damage = report.damage,
        healed = report.healed,
        critical = report.critical,
        "move resolved"
    );
    Ok(MoveResolution { report, events })
}

/// Stages 2 to 8 of a damaging move.
fn strike(
    config: &BattleConfig,
    dice: &mut Dice<'_>,
    p: &mut Participants<'_>,
    definition: &MoveDefinition,
    is_special: bool,
    report: &mut ActionReport,
    events: &mut Vec<BattleEvent>,
) {
    let base = offense::base_damage(p.attacker, definition, is_special);
    let (amount, critical) = offense::roll_critical(config, dice, p.attacker, p.defender, base);
    report.critical = critical;
    let raw = offense::apply_bonuses(p.attacker, amount, is_special);

    let mitigation = defense::mitigate(dice, p.defender, p.defender_ref, raw, events);
    report.blocked = mitigation.blocked;
    if mitigation.dodged {
        report.dodged = true;
        return;
    }

    let landed = mitigation.damage;
    report.damage = landed;
    let hit = vitals::strike(p.defender, p.defender_ref, landed, events);
    report.absorbed_by_shield = hit.absorbed;
    report.hp_damage = hit.hp_damage;
    p.attacker.tally.damage_dealt += (hit.absorbed + hit.hp_damage) as u64;

    if landed > 0 {
        aftermath::apply(&config.status, dice, p, landed, report, events);
        equipment::after_hit(p, landed, report, events);
    }
}

/// Applies `kind` to the defender on the attacker's behalf; zero `turns`
/// uses the kind's default.
pub(crate) fn inflict_status(
    config: &StatusConfig,
    p: &mut Participants<'_>,
    kind: StatusKind,
    turns: u32,
    events: &mut Vec<BattleEvent>,
) {
    let turns = if turns == 0 {
        kind.default_turns(config)
    } else {
        turns
    };
    if let Some(effect) = p.defender.status.apply(kind, turns, p.attacker_ref) {
        events.push(BattleEvent::StatusApplied {
            target: p.defender_ref,
            kind,
            remaining_turns: effect.remaining_turns,
            stacks: effect.stacks,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::AbilityDescriptor;
    use crate::state::{BuffStat, Side};
    use crate::testing::{Fixture, NO_LUCK};

    const A: CombatantRef = CombatantRef::Side(Side::A);
    const B: CombatantRef = CombatantRef::Side(Side::B);

    fn run(
        fixture: &Fixture,
        attacker: &mut Combatant,
        defender: &mut Combatant,
        index: usize,
    ) -> Result<MoveResolution, ActionError> {
        let env = fixture.env();
        let mut dice = env.dice(0, 0);
        resolve_move(
            &env,
            &mut dice,
            Participants {
                attacker,
                attacker_ref: A,
                defender,
                defender_ref: B,
            },
            index,
        )
    }

    #[test]
    fn special_move_reference_scenario() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.hero();
        let mut b = fixture.hero();

        let out = run(&fixture, &mut a, &mut b, 0).unwrap();
        assert_eq!(out.report.damage, 99);
        assert_eq!(b.hp(), 400 - 99);
        assert_eq!(a.energy(), 10);
        assert!(!out.report.critical);
    }

    #[test]
    fn shield_absorbs_before_hp() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.combatant(fixture.build(100.0, ["smash", "jab"]));
        let mut b = fixture.hero();
        b.shield = 30;

        let out = run(&fixture, &mut a, &mut b, 1).unwrap();
        assert_eq!(out.report.damage, 50);
        assert_eq!(out.report.absorbed_by_shield, 30);
        assert_eq!(b.shield, 0);
        assert_eq!(b.hp(), 400 - 20);
    }

    #[test]
    fn unaffordable_move_leaves_everything_untouched() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.hero();
        a.set_energy(10);
        let mut b = fixture.hero();
        let (before_a, before_b) = (a.clone(), b.clone());

        let err = run(&fixture, &mut a, &mut b, 0).unwrap_err();
        assert_eq!(
            err,
            ActionError::InsufficientEnergy {
                required: 40,
                available: 10
            }
        );
        assert_eq!(a, before_a);
        assert_eq!(b, before_b);
        assert_eq!(fixture.rng.draws(), 0);
    }

    #[test]
    fn invalid_index_is_rejected() {
        let fixture = Fixture::new(NO_LUCK);
        let (mut a, mut b) = (fixture.hero(), fixture.hero());
        assert_eq!(
            run(&fixture, &mut a, &mut b, 3).unwrap_err(),
            ActionError::InvalidMove(3)
        );
    }

    #[test]
    fn crit_doubles_then_applies_crit_bonus() {
        let fixture = Fixture::new(&[0.0]);
        let mut a = fixture.hero();
        a.ability = Some(AbilityDescriptor {
            crit_damage_bonus: 0.5,
            ..AbilityDescriptor::default()
        });
        let mut b = fixture.hero();

        // jab: 30 * 0.8 = 24, crit 48, bonus 72
        let out = run(&fixture, &mut a, &mut b, 1).unwrap();
        assert!(out.report.critical);
        assert_eq!(out.report.damage, 72);
    }

    #[test]
    fn first_attack_bonus_fires_once() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.hero();
        a.ability = Some(AbilityDescriptor {
            first_attack_bonus: 0.5,
            ..AbilityDescriptor::default()
        });
        let mut b = fixture.hero();

        assert_eq!(run(&fixture, &mut a, &mut b, 1).unwrap().report.damage, 36);
        assert_eq!(run(&fixture, &mut a, &mut b, 1).unwrap().report.damage, 24);
    }

    #[test]
    fn first_hit_reduction_fires_once() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.hero();
        let mut b = fixture.hero();
        b.ability = Some(AbilityDescriptor {
            first_hit_reduction: 0.5,
            ..AbilityDescriptor::default()
        });

        assert_eq!(run(&fixture, &mut a, &mut b, 1).unwrap().report.damage, 12);
        assert_eq!(run(&fixture, &mut a, &mut b, 1).unwrap().report.damage, 24);
    }

    #[test]
    fn block_pool_depletes_before_shield() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.hero();
        let mut b = fixture.hero();
        b.ability_state.damage_block_remaining = 10;
        b.shield = 5;

        let out = run(&fixture, &mut a, &mut b, 1).unwrap();
        assert_eq!(out.report.blocked, 10);
        assert_eq!(out.report.damage, 14);
        assert_eq!(out.report.absorbed_by_shield, 5);
        assert_eq!(b.hp(), 400 - 9);
        assert_eq!(b.ability_state.damage_block_remaining, 0);
    }

    #[test]
    fn defense_buff_divides_incoming() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.hero();
        let mut b = fixture.hero();
        b.buffs.apply(BuffStat::Defense, 2.0, 2);

        assert_eq!(run(&fixture, &mut a, &mut b, 1).unwrap().report.damage, 12);
    }

    #[test]
    fn dodge_short_circuits_everything_after_it() {
        // crit roll fails, dodge roll succeeds
        let fixture = Fixture::new(&[0.99, 0.1]);
        let mut a = fixture.hero();
        a.ability = Some(AbilityDescriptor {
            lifesteal: 1.0,
            burn_chance: 1.0,
            ..AbilityDescriptor::default()
        });
        a.set_hp(100);
        let mut b = fixture.hero();
        b.ability = Some(AbilityDescriptor {
            dodge_chance: 0.5,
            ..AbilityDescriptor::default()
        });

        let out = run(&fixture, &mut a, &mut b, 1).unwrap();
        assert!(out.report.dodged);
        assert_eq!(out.report.damage, 0);
        assert_eq!(b.hp(), b.max_hp());
        assert_eq!(a.hp(), 100);
        assert!(b.status.is_empty());
    }

    #[test]
    fn armed_evasion_is_consumed_by_the_next_hit() {
        // crit and evasion rolls both fail
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.hero();
        let mut b = fixture.combatant(fixture.build(50.0, ["jab", "mend"]).with_equipment(1, "veil"));
        b.loadout.arm(1).unwrap();

        let out = run(&fixture, &mut a, &mut b, 1).unwrap();
        assert!(!out.report.dodged);
        assert!(out.events.iter().any(|e| matches!(
            e,
            BattleEvent::EquipmentTriggered { actor, slot: 1, .. } if *actor == B
        )));
        assert_eq!(b.loadout.arm(1), Err(ActionError::AlreadyUsed(1)));
    }

    #[test]
    fn lifesteal_and_status_rolls_follow_a_landed_hit() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.hero();
        a.ability = Some(AbilityDescriptor {
            lifesteal: 0.5,
            energy_steal: 5,
            burn_chance: 1.0,
            ..AbilityDescriptor::default()
        });
        a.set_hp(100);
        let mut b = fixture.hero();
        b.shield = 10;

        let out = run(&fixture, &mut a, &mut b, 1).unwrap();
        // lifesteal reads the pre-shield amount
        assert_eq!(out.report.healed, 12);
        assert_eq!(a.hp(), 112);
        assert_eq!(b.energy(), 45);
        assert_eq!(a.energy(), 50 - 20 + 5);
        assert_eq!(b.status.get(StatusKind::Burn).unwrap().source, A);
    }

    #[test]
    fn med_drop_heals_once() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.combatant(fixture.build(50.0, ["jab", "mend"]).with_equipment(0, "drop"));
        a.set_hp(100);
        let mut b = fixture.hero();

        run(&fixture, &mut a, &mut b, 1).unwrap();
        assert_eq!(a.hp(), 112);
        run(&fixture, &mut a, &mut b, 1).unwrap();
        assert_eq!(a.hp(), 112);
    }

    #[test]
    fn siphon_drains_on_every_hit() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.combatant(fixture.build(50.0, ["jab", "mend"]).with_equipment(0, "siphon"));
        let mut b = fixture.hero();

        run(&fixture, &mut a, &mut b, 1).unwrap();
        run(&fixture, &mut a, &mut b, 1).unwrap();
        assert_eq!(b.energy(), 40);
        assert_eq!(a.energy(), 50 - 40 + 10);
    }

    #[test]
    fn armed_reflect_hits_back_once() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.hero();
        let mut b = fixture.combatant(fixture.build(50.0, ["jab", "mend"]).with_equipment(1, "mirror"));
        b.loadout.arm(1).unwrap();

        let first = run(&fixture, &mut a, &mut b, 1).unwrap();
        assert_eq!(first.report.reflected, 12);
        assert_eq!(a.hp(), 400 - 12);

        let second = run(&fixture, &mut a, &mut b, 1).unwrap();
        assert_eq!(second.report.reflected, 0);
        assert_eq!(a.hp(), 400 - 12);
        assert_eq!(a.tally.damage_dealt, 48);
        assert_eq!(b.tally.damage_dealt, 12);
    }

    #[test]
    fn phoenix_revives_once() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.hero();
        let mut b = fixture.combatant(fixture.build(50.0, ["jab", "mend"]).with_equipment(2, "phoenix"));
        b.set_hp(10);

        let out = run(&fixture, &mut a, &mut b, 1).unwrap();
        assert_eq!(b.hp(), b.max_hp());
        assert_eq!(b.energy(), 30);
        assert!(out.events.iter().any(|e| matches!(e, BattleEvent::Revived { .. })));

        b.set_hp(10);
        run(&fixture, &mut a, &mut b, 1).unwrap();
        assert!(b.is_down());
    }

    #[test]
    fn recycler_refunds_the_armed_move() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.combatant(fixture.build(50.0, ["jab", "mend"]).with_equipment(1, "recycler"));
        a.loadout.arm(1).unwrap();
        let mut b = fixture.hero();

        let out = run(&fixture, &mut a, &mut b, 0).unwrap();
        assert_eq!(out.report.energy_refunded, 20);
        assert_eq!(a.energy(), 50 - 40 + 20);
    }

    #[test]
    fn heal_applies_bonus_and_conversion() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.combatant(fixture.build(50.0, ["jab", "mend"]).with_equipment(2, "converter"));
        a.ability = Some(AbilityDescriptor {
            heal_bonus: 0.25,
            ..AbilityDescriptor::default()
        });
        a.set_hp(100);
        let mut b = fixture.hero();

        // mend: 50 * 0.8 = 40, bonus 50
        let out = run(&fixture, &mut a, &mut b, 2).unwrap();
        assert_eq!(out.report.healed, 50);
        assert_eq!(a.hp(), 150);
        assert_eq!(a.energy(), 50 - 20 + 25);
        assert_eq!(b.hp(), b.max_hp());
        assert_eq!(fixture.rng.draws(), 0);
    }

    #[test]
    fn support_move_buffs_the_user() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.combatant(fixture.build(50.0, ["focus", "jab"]));
        let mut b = fixture.hero();

        let out = run(&fixture, &mut a, &mut b, 1).unwrap();
        assert_eq!(out.report.damage, 0);
        assert_eq!(a.buffs.multiplier(BuffStat::Attack), 1.5);
        assert_eq!(a.energy(), 40);

        // jab: 24 * 1.5
        assert_eq!(run(&fixture, &mut a, &mut b, 2).unwrap().report.damage, 36);
    }

    #[test]
    fn tier_cost_reduction_skips_the_special() {
        let fixture = Fixture::new(NO_LUCK);
        let mut a = fixture.hero();
        a.ability = Some(AbilityDescriptor {
            tier_energy_cost_reduction: 0.5,
            ..AbilityDescriptor::default()
        });
        let env = fixture.env();
        let (special, _) = a.move_at(0, env.catalog()).unwrap();
        let (tier, _) = a.move_at(1, env.catalog()).unwrap();
        assert_eq!(quote(&a, special, true, &env.config().energy), 40);
        assert_eq!(quote(&a, tier, false, &env.config().energy), 10);
    }
}
