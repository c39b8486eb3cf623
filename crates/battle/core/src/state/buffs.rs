//! Timed stat multipliers, at most one per stat.

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BuffStat {
    /// Multiplies outgoing damage.
    Attack,
    /// Divides incoming damage.
    Defense,
    /// Multiplies critical chance.
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buff {
    pub multiplier: f64,
    pub remaining_turns: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buffs {
    attack: Option<Buff>,
    defense: Option<Buff>,
    critical: Option<Buff>,
}

impl Buffs {
    const ORDER: [BuffStat; 3] = [BuffStat::Attack, BuffStat::Defense, BuffStat::Critical];

    fn slot(&self, stat: BuffStat) -> &Option<Buff> {
        match stat {
            BuffStat::Attack => &self.attack,
            BuffStat::Defense => &self.defense,
            BuffStat::Critical => &self.critical,
        }
    }

    fn slot_mut(&mut self, stat: BuffStat) -> &mut Option<Buff> {
        match stat {
            BuffStat::Attack => &mut self.attack,
            BuffStat::Defense => &mut self.defense,
            BuffStat::Critical => &mut self.critical,
        }
    }

    pub fn get(&self, stat: BuffStat) -> Option<Buff> {
        *self.slot(stat)
    }

    pub fn is_active(&self, stat: BuffStat) -> bool {
        self.slot(stat).is_some()
    }

    /// Active multiplier for `stat`, `1.0` when none.
    pub fn multiplier(&self, stat: BuffStat) -> f64 {
        self.slot(stat).map_or(1.0, |buff| buff.multiplier)
    }

    /// Replaces any existing buff on `stat`. Non-positive multipliers and
    /// zero durations are ignored.
    pub fn apply(&mut self, stat: BuffStat, multiplier: f64, turns: u32) -> bool {
        if turns == 0 || multiplier <= 0.0 {
            return false;
        }
        *self.slot_mut(stat) = Some(Buff {
            multiplier,
            remaining_turns: turns,
        });
        true
    }

    /// Counts every buff down by one turn and returns the stats that expired.
    pub fn tick(&mut self) -> Vec<BuffStat> {
        let mut expired = Vec::new();
        for stat in Self::ORDER {
            let slot = self.slot_mut(stat);
            let Some(buff) = slot.as_mut() else {
                continue;
            };
            buff.remaining_turns = buff.remaining_turns.saturating_sub(1);
            if buff.remaining_turns == 0 {
                *slot = None;
                expired.push(stat);
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reapplying_replaces() {
        let mut buffs = Buffs::default();
        buffs.apply(BuffStat::Attack, 1.5, 3);
        buffs.apply(BuffStat::Attack, 1.2, 1);
        assert_eq!(buffs.multiplier(BuffStat::Attack), 1.2);
        assert_eq!(buffs.get(BuffStat::Attack).unwrap().remaining_turns, 1);
    }

    #[test]
    fn tick_expires_in_stat_order() {
        let mut buffs = Buffs::default();
        buffs.apply(BuffStat::Critical, 2.0, 1);
        buffs.apply(BuffStat::Defense, 1.5, 2);
        buffs.apply(BuffStat::Attack, 1.5, 1);

        assert_eq!(buffs.tick(), vec![BuffStat::Attack, BuffStat::Critical]);
        assert_eq!(buffs.multiplier(BuffStat::Attack), 1.0);
        assert!(buffs.is_active(BuffStat::Defense));
        assert_eq!(buffs.tick(), vec![BuffStat::Defense]);
    }
}
