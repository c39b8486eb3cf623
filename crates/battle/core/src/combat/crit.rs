//! Critical hit roll.

use crate::env::Dice;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CritRoll {
    pub damage: u32,
    pub is_critical: bool,
}

/// One Bernoulli trial with `chance`; success scales `base_damage` by
/// `multiplier`. Ability crit-damage bonuses are applied by the caller.
pub fn critical_roll(base_damage: u32, chance: f64, multiplier: f64, dice: &mut Dice<'_>) -> CritRoll {
    if dice.chance(chance) {
        let scaled = (base_damage as f64 * multiplier).round();
        CritRoll {
            damage: scaled.clamp(0.0, u32::MAX as f64) as u32,
            is_critical: true,
        }
    } else {
        CritRoll {
            damage: base_damage,
            is_critical: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SequenceRng;

    #[test]
    fn success_doubles_damage() {
        let rng = SequenceRng::from_units(&[0.05]);
        let mut dice = Dice::new(&rng, 0, 0);
        let roll = critical_roll(40, 0.1, 2.0, &mut dice);
        assert_eq!(
            roll,
            CritRoll {
                damage: 80,
                is_critical: true
            }
        );
    }

    #[test]
    fn failure_keeps_base() {
        let rng = SequenceRng::from_units(&[0.5]);
        let mut dice = Dice::new(&rng, 0, 0);
        let roll = critical_roll(40, 0.1, 2.0, &mut dice);
        assert!(!roll.is_critical);
        assert_eq!(roll.damage, 40);
    }

    #[test]
    fn identical_draws_give_identical_rolls() {
        let rng = crate::env::PcgRng;
        let mut a = Dice::new(&rng, 99, 3);
        let mut b = Dice::new(&rng, 99, 3);
        assert_eq!(
            critical_roll(55, 0.5, 2.0, &mut a),
            critical_roll(55, 0.5, 2.0, &mut b)
        );
    }
}
