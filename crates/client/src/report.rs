//! Renders session events and outcomes for the terminal.
use std::io::{self, Write};

use battle_core::{BattleEvent, CombatantRef, ResolvedAction, SessionOutcome, Winner};
use battle_runtime::Event;

/// Output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per notable event, then the outcome
    #[default]
    Summary,
    /// Every bus event as a JSON line
    Json,
}

pub struct Reporter<W> {
    format: OutputFormat,
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn event(&mut self, event: &Event) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, event)?;
                writeln!(self.out)?;
            }
            OutputFormat::Summary => {
                let line = match event {
                    Event::Duel(inner) | Event::Raid(inner) => describe(&inner.event),
                    Event::Lifecycle(_) => None,
                };
                if let Some(line) = line {
                    writeln!(self.out, "{line}")?;
                }
            }
        }
        Ok(())
    }

    pub fn outcome(&mut self, outcome: &SessionOutcome) -> anyhow::Result<()> {
        // In JSON mode the outcome already went out inside `SessionEnded`.
        if self.format == OutputFormat::Json {
            return Ok(());
        }

        let winner = match outcome.winner {
            Some(Winner::Side(side)) => format!("side {side}"),
            Some(Winner::Raiders) => "the raiders".to_owned(),
            Some(Winner::Boss) => "the boss".to_owned(),
            None => "nobody".to_owned(),
        };
        writeln!(
            self.out,
            "{} ({}): {winner} won by {} after {} turns",
            outcome.session, outcome.mode, outcome.reason, outcome.turns
        )?;
        for row in &outcome.ranking {
            writeln!(self.out, "  #{} {:<12} {:>6} damage", row.rank, label(row.participant), row.damage)?;
        }
        for grant in &outcome.rewards {
            write!(self.out, "  reward {}: {} currency", grant.account, grant.currency)?;
            for (item, count) in &grant.items {
                write!(self.out, ", {count}x {item}")?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn label(combatant: CombatantRef) -> String {
    match combatant {
        CombatantRef::Side(side) => format!("side {side}"),
        CombatantRef::Raider(account) => format!("raider {}", account.0),
        CombatantRef::Boss => "boss".to_owned(),
    }
}

/// One human-readable line for events worth narrating.
fn describe(event: &BattleEvent) -> Option<String> {
    let line = match event {
        BattleEvent::ActionResolved(report) => {
            let actor = label(report.actor);
            let target = label(report.target);
            match &report.action {
                ResolvedAction::Pass => format!("{actor} passes"),
                ResolvedAction::TimedOut => format!("{actor} ran out of time"),
                ResolvedAction::Move { id, .. } if report.dodged => {
                    format!("{actor} uses {id}; {target} dodges")
                }
                ResolvedAction::Move { id, .. } if report.healed > 0 && report.damage == 0 => {
                    format!("{actor} uses {id}, healing {}", report.healed)
                }
                ResolvedAction::Move { id, .. } => {
                    let crit = if report.critical { " (critical)" } else { "" };
                    format!("{actor} uses {id} on {target} for {} damage{crit}", report.damage)
                }
            }
        }
        BattleEvent::StatusApplied {
            target,
            kind,
            remaining_turns,
            ..
        } => format!("{} suffers {kind} for {remaining_turns} turns", label(*target)),
        BattleEvent::StatusTicked { actor, damage, heal } if *damage > 0 || *heal > 0 => {
            format!("{} status: -{damage} / +{heal} hp", label(*actor))
        }
        BattleEvent::TurnSkipped { actor, cause } => {
            format!("{} loses the turn to {cause}", label(*actor))
        }
        BattleEvent::ItemUsed { actor, item, hp, energy } => {
            format!("{} uses {item} (+{hp} hp, +{energy} energy)", label(*actor))
        }
        BattleEvent::Revived { actor, hp, .. } => format!("{} revives with {hp} hp", label(*actor)),
        BattleEvent::Joined { raider } => format!("raider {} joins", raider.0),
        BattleEvent::Eliminated { actor, reason } => {
            format!("{} is out ({reason})", label(*actor))
        }
        _ => return None,
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{
        AccountId, ActionReport, DamageRank, EndReason, RewardGrant, SessionId, SessionMode, Side,
    };
    use battle_runtime::SessionEvent;

    fn outcome() -> SessionOutcome {
        SessionOutcome {
            session: SessionId(4),
            mode: SessionMode::Duel,
            winner: Some(Winner::Side(Side::B)),
            reason: EndReason::Knockout,
            turns: 9,
            ranking: vec![DamageRank {
                rank: 1,
                participant: CombatantRef::Side(Side::B),
                account: Some(AccountId(2)),
                damage: 310,
            }],
            rewards: vec![RewardGrant {
                account: AccountId(2),
                currency: 100,
                items: Vec::new(),
            }],
            consumed: Vec::new(),
        }
    }

    #[test]
    fn summary_narrates_moves_and_outcome() {
        let mut report = ActionReport::new(
            CombatantRef::Side(Side::A),
            CombatantRef::Side(Side::B),
            ResolvedAction::Move {
                index: 0,
                id: "slash".into(),
            },
        );
        report.damage = 42;
        report.critical = true;
        let event = Event::Duel(SessionEvent {
            session: SessionId(4),
            event: BattleEvent::ActionResolved(report),
        });

        let mut reporter = Reporter::new(OutputFormat::Summary, Vec::new());
        reporter.event(&event).unwrap();
        reporter.outcome(&outcome()).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("side A uses slash on side B for 42 damage (critical)")
        );
        assert_eq!(
            lines.next(),
            Some("session#4 (duel): side B won by knockout after 9 turns")
        );
        assert!(text.contains("reward account#2: 100 currency"));
    }

    #[test]
    fn json_writes_one_line_per_event() {
        let event = Event::Raid(SessionEvent {
            session: SessionId(1),
            event: BattleEvent::Joined {
                raider: AccountId(7),
            },
        });

        let mut reporter = Reporter::new(OutputFormat::Json, Vec::new());
        reporter.event(&event).unwrap();
        reporter.outcome(&outcome()).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();

        assert_eq!(text.lines().count(), 1);
        let parsed: Event = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed, event);
    }
}
