use battle_client::{BuildArgs, ClientConfig, OutputFormat, Reporter, load_arena, run_duel, run_raid};
use battle_core::{AccountId, EndReason, SessionMode};
use battle_runtime::{AccountRecord, InMemoryDirectory};

fn sturdy() -> BuildArgs {
    BuildArgs {
        level: 10,
        stat: 90.0,
        moves: vec!["slash".into(), "mend".into()],
    }
}

fn config(seed: u64) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.runtime.seed = Some(seed);
    config
}

#[tokio::test(start_paused = true)]
async fn duel_runs_to_an_outcome() {
    let arena = load_arena(&config(3), InMemoryDirectory::new()).unwrap();
    let mut reporter = Reporter::new(OutputFormat::Summary, Vec::new());

    let outcome = run_duel(
        &arena,
        sturdy().build("pyra").unwrap(),
        sturdy().build("volt").unwrap(),
        &mut reporter,
    )
    .await
    .unwrap();

    assert_eq!(outcome.mode, SessionMode::Duel);
    assert!(outcome.winner.is_some());
    let text = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(text.contains(" uses "));
}

#[tokio::test(start_paused = true)]
async fn raid_autopilot_plays_until_the_raid_ends() {
    let build = sturdy();
    let party = vec![
        (AccountId(1), "aegis".to_owned()),
        (AccountId(2), "seraph".to_owned()),
    ];
    let mut directory = InMemoryDirectory::new();
    for (account, character) in &party {
        directory = directory.with_account(
            *account,
            AccountRecord::default().with_character(build.build(character).unwrap()),
        );
    }
    let boss = BuildArgs {
        level: 1,
        stat: 10.0,
        moves: vec!["jab".into(), "slash".into()],
    }
    .build("ronin")
    .unwrap();

    let arena = load_arena(&config(11), directory).unwrap();
    let mut reporter = Reporter::new(OutputFormat::Json, Vec::new());
    let outcome = run_raid(&arena, &boss, &party, 11, 5_000, &mut reporter)
        .await
        .unwrap();

    assert_eq!(outcome.mode, SessionMode::Raid);
    assert!(matches!(
        outcome.reason,
        EndReason::BossDefeated | EndReason::AllEliminated
    ));
    let text = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(text.lines().count() > 2);
    assert!(arena.live_sessions().await.is_empty());
}
