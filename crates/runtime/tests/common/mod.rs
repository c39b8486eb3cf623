#![allow(dead_code)]

use std::time::Duration;

use battle_content::ContentFactory;
use battle_core::{AccountId, BattleConfig, CharacterBuild, SessionId};
use battle_runtime::{
    AccountRecord, Arena, Event, InMemoryDirectory, LifecycleEvent, RecordingSink, RuntimeConfig,
};
use tokio::sync::broadcast;

pub const ALICE: AccountId = AccountId(1);
pub const BOB: AccountId = AccountId(2);
pub const CAROL: AccountId = AccountId(3);

pub fn sturdy(character: &str) -> CharacterBuild {
    CharacterBuild::new(character, 10, 90.0, ["slash".into(), "mend".into()])
}

/// A weak boss whose moves never inflict skip statuses.
pub fn weak_boss() -> CharacterBuild {
    CharacterBuild::new("ronin", 1, 10.0, ["jab".into(), "slash".into()])
}

pub fn directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_account(ALICE, AccountRecord::default().with_character(sturdy("aegis")))
        .with_account(BOB, AccountRecord::default().with_character(sturdy("seraph")))
        .with_account(CAROL, AccountRecord::default().with_character(sturdy("pyra")))
}

pub fn runtime_config(seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        turn_delay: Duration::from_millis(10),
        action_timeout: Duration::from_secs(60),
        selection_timeout: Duration::from_secs(120),
        raid_sweep_interval: Duration::from_secs(1),
        seed: Some(seed),
        ..RuntimeConfig::default()
    }
}

pub fn arena(seed: u64, sink: RecordingSink) -> Arena {
    arena_with(seed, sink, |_| {})
}

/// Like [`arena`], with the bundled combat tuning adjusted by `tune`.
pub fn arena_with(seed: u64, sink: RecordingSink, tune: impl FnOnce(&mut BattleConfig)) -> Arena {
    let factory = ContentFactory::bundled();
    let mut battle_config = factory.load_config().unwrap();
    tune(&mut battle_config);
    Arena::builder()
        .config(runtime_config(seed))
        .catalog(factory.load_catalog().unwrap())
        .battle_config(battle_config)
        .directory(directory())
        .outcome_sink(sink)
        .build()
        .unwrap()
}

/// Waits for the settlement notice of `session`.
pub async fn settled(rx: &mut broadcast::Receiver<Event>, session: SessionId) -> LifecycleEvent {
    loop {
        match rx.recv().await {
            Ok(Event::Lifecycle(event @ LifecycleEvent::SessionSettled { .. }))
                if event.session() == session =>
            {
                return event;
            }
            Ok(_) => continue,
            Err(err) => panic!("lifecycle stream ended: {err}"),
        }
    }
}
