//! End-to-end window module tests: full runs through the orchestrator with
//! the collaborator modules registered.

use kardia_types::{
    ActorId, AnalysisResults, ModuleReport, Outcome, Severity, WindowCell,
};

use crate::analyser::Analyser;
use crate::analysis::Analysis;
use crate::data::{actions, statuses, GameData};
use crate::downtime::Downtime;
use crate::evaluate::{
    ExpectedActionsEvaluator, ExpectedGcdCountEvaluator, RaidBuffOverwriteEvaluator,
    SeverityTiers, TrackedAction,
};
use crate::event::Event;
use crate::gcd::GlobalCooldown;
use crate::pull::{Actor, Pull};

use super::{
    ActionWindowConfig, ActionWindowModule, BuffWindowConfig, BuffWindowModule,
    EndOfWindowPolicy, RaidBuffWindowModule, ReopenPolicy,
};

const PLAYER: ActorId = ActorId(1);
const ALLY: ActorId = ActorId(2);
const BOSS: ActorId = ActorId(100);

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn pull() -> Pull {
    let start = chrono::NaiveDateTime::parse_from_str("2026-03-01 21:00:00", "%Y-%m-%d %H:%M:%S")
        .expect("valid datetime");
    Pull::new(
        start,
        300_000,
        vec![
            Actor::player(PLAYER, "Aria Vale", "ravager"),
            Actor::player(ALLY, "Bren Koda", "ravager"),
            Actor::enemy(BOSS, "Voidgate Sentinel"),
        ],
    )
}

/// Run a window module together with the collaborators it depends on.
/// The window module is registered first: dependency resolution has to
/// reorder it behind the collaborators.
fn run_with(module: Box<dyn Analyser>, events: Vec<Event>) -> AnalysisResults {
    let modules: Vec<Box<dyn Analyser>> = vec![
        module,
        Box::new(GlobalCooldown::new(PLAYER)),
        Box::new(Downtime::new(vec![statuses::VOIDWALL])),
    ];
    Analysis::new(pull(), GameData::new(), modules)
        .expect("graph resolves")
        .run(events)
        .expect("run succeeds")
}

fn report<'a>(results: &'a AnalysisResults, handle: &str) -> &'a ModuleReport {
    results.report(handle).expect("module report present")
}

fn strike_evaluator(expected: u32, tiers: SeverityTiers) -> ExpectedActionsEvaluator {
    ExpectedActionsEvaluator::new(
        vec![TrackedAction {
            action: actions::STRIKE,
            expected_per_window: expected,
        }],
        "strike.png",
        "Fit every expected cast inside the window.",
        tiers,
    )
}

fn keen_edge_module(evaluators: Vec<Box<dyn crate::evaluate::Evaluator>>) -> Box<BuffWindowModule> {
    Box::new(BuffWindowModule::new(
        BuffWindowConfig::new("keen_edge", PLAYER, statuses::KEEN_EDGE),
        evaluators,
    ))
}

// ═══════════════════════════════════════════════════════════════════════════
// Buff Windows
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missed_buff_window_action_count() {
    // A 20s buff opens at t=1000; three of four expected casts land inside,
    // the fourth at t=21500 after the window closed at t=21000. Shortfall
    // must be exactly 1.
    let module = keen_edge_module(vec![Box::new(strike_evaluator(
        4,
        SeverityTiers::new([(1, Severity::Medium)]),
    ))]);
    let events = vec![
        Event::status_apply(1_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
        Event::action(1_200, PLAYER, BOSS, actions::STRIKE),
        Event::action(3_200, PLAYER, BOSS, actions::STRIKE),
        Event::action(5_200, PLAYER, BOSS, actions::STRIKE),
        Event::status_remove(21_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
        Event::action(21_500, PLAYER, BOSS, actions::STRIKE),
        Event::complete(22_000),
    ];

    let results = run_with(module, events);
    let report = report(&results, "keen_edge");

    let table = report.table.as_ref().expect("window table");
    assert_eq!(table.columns, vec!["Strike"]);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].start, 1_000);
    assert_eq!(table.rows[0].end, 21_000);
    assert_eq!(
        table.rows[0].cells,
        vec![WindowCell::Count {
            actual: 3,
            expected: 4,
            outcome: Outcome::Under,
        }]
    );

    assert_eq!(report.suggestions.len(), 1);
    assert_eq!(report.suggestions[0].severity, Severity::Medium);
    assert!(report.suggestions[0].why.contains("1 expected cast missing"));
}

#[test]
fn test_zero_action_window_is_still_reported() {
    let module = keen_edge_module(vec![Box::new(strike_evaluator(
        2,
        SeverityTiers::new([(1, Severity::Minor)]),
    ))]);
    let events = vec![
        Event::status_apply(1_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
        Event::status_remove(11_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
    ];

    let results = run_with(module, events);
    let table = report(&results, "keen_edge").table.as_ref().expect("table");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(
        table.rows[0].cells,
        vec![WindowCell::Count {
            actual: 0,
            expected: 2,
            outcome: Outcome::Under,
        }]
    );
}

#[test]
fn test_open_window_force_closes_at_pull_end() {
    let module = keen_edge_module(vec![Box::new(strike_evaluator(
        1,
        SeverityTiers::new([(1, Severity::Minor)]),
    ))]);
    let events = vec![
        Event::status_apply(290_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
        Event::action(291_000, PLAYER, BOSS, actions::STRIKE),
    ];

    let results = run_with(module, events);
    let table = report(&results, "keen_edge").table.as_ref().expect("table");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].end, 300_000);
}

#[test]
fn test_same_timestamp_close_counts_action_inside() {
    let module = keen_edge_module(vec![Box::new(strike_evaluator(
        1,
        SeverityTiers::new([(1, Severity::Minor)]),
    ))]);
    let events = vec![
        Event::status_apply(1_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
        // Removal dispatched before the same-timestamp cast.
        Event::status_remove(5_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
        Event::action(5_000, PLAYER, BOSS, actions::STRIKE),
    ];

    let results = run_with(module, events);
    let table = report(&results, "keen_edge").table.as_ref().expect("table");
    assert_eq!(
        table.rows[0].cells,
        vec![WindowCell::Count {
            actual: 1,
            expected: 1,
            outcome: Outcome::Met,
        }]
    );
}

#[test]
fn test_strict_close_counts_action_outside() {
    let mut config = BuffWindowConfig::new("keen_edge", PLAYER, statuses::KEEN_EDGE);
    config.end_policy = EndOfWindowPolicy::Strict;
    let module = Box::new(BuffWindowModule::new(
        config,
        vec![Box::new(strike_evaluator(
            1,
            SeverityTiers::new([(1, Severity::Minor)]),
        ))],
    ));
    let events = vec![
        Event::status_apply(1_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
        Event::status_remove(5_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
        Event::action(5_000, PLAYER, BOSS, actions::STRIKE),
    ];

    let results = run_with(module, events);
    let table = report(&results, "keen_edge").table.as_ref().expect("table");
    assert_eq!(
        table.rows[0].cells,
        vec![WindowCell::Count {
            actual: 0,
            expected: 1,
            outcome: Outcome::Under,
        }]
    );
}

#[test]
fn test_window_overlapping_invulnerability_is_flagged() {
    let module = keen_edge_module(vec![Box::new(strike_evaluator(
        1,
        SeverityTiers::new([(1, Severity::Minor)]),
    ))]);
    let events = vec![
        Event::status_apply(1_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
        Event::status_apply(5_000, BOSS, BOSS, statuses::VOIDWALL),
        Event::action(6_000, PLAYER, BOSS, actions::STRIKE),
        Event::status_remove(8_000, BOSS, BOSS, statuses::VOIDWALL),
        Event::status_remove(21_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
    ];

    let results = run_with(module, events);
    let table = report(&results, "keen_edge").table.as_ref().expect("table");
    assert!(table.rows[0].in_downtime);
}

#[test]
fn test_gcd_checklist_full_window_passes() {
    let gcd_evaluator = ExpectedGcdCountEvaluator::new(
        "Keep Keen Edge windows full",
        "Use every global cooldown opportunity while Keen Edge is up.",
        90.0,
        "keen_edge.png",
        "Keep pressing GCDs during Keen Edge.",
        SeverityTiers::new([(1, Severity::Minor)]),
    );
    let module = keen_edge_module(vec![Box::new(gcd_evaluator)]);

    // Eight strikes, 2.5s apart, filling the 20s window exactly.
    let mut events = vec![Event::status_apply(1_000, PLAYER, PLAYER, statuses::KEEN_EDGE)];
    for i in 0..8 {
        events.push(Event::action(1_000 + i * 2_500, PLAYER, BOSS, actions::STRIKE));
    }
    events.push(Event::status_remove(21_000, PLAYER, PLAYER, statuses::KEEN_EDGE));

    let results = run_with(module, events);
    let report = report(&results, "keen_edge");
    assert_eq!(report.checklist.len(), 1);
    assert!((report.checklist[0].percent() - 100.0).abs() < 0.001);
    assert!(report.checklist[0].passed());
    assert!(report.suggestions.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// Raid Buff Windows
// ═══════════════════════════════════════════════════════════════════════════

fn overwrite_module() -> Box<RaidBuffWindowModule> {
    Box::new(RaidBuffWindowModule::new(
        BuffWindowConfig::new("battle_cry", PLAYER, statuses::BATTLE_FERVOR),
        vec![Box::new(RaidBuffOverwriteEvaluator::new(
            "battle_cry.png",
            SeverityTiers::new([(1, Severity::Major)]),
        ))],
    ))
}

#[test]
fn test_overwrite_precedence_you_overwrote() {
    // The ally applied to the shared target at t=5000; the analysed player
    // applied at t=5100, inside the ally's 20s duration. The verdict is
    // "you overwrote", not "they overwrote".
    let events = vec![
        Event::status_apply(5_000, ALLY, ALLY, statuses::BATTLE_FERVOR),
        Event::status_apply(5_100, PLAYER, ALLY, statuses::BATTLE_FERVOR),
        Event::status_remove(25_100, PLAYER, ALLY, statuses::BATTLE_FERVOR),
    ];

    let results = run_with(overwrite_module(), events);
    let report = report(&results, "battle_cry");
    let table = report.table.as_ref().expect("table");
    assert_eq!(
        table.rows[0].cells,
        vec![WindowCell::Note {
            text: "Overwrote Bren Koda's Battle Fervor".to_string(),
        }]
    );
    assert_eq!(report.suggestions.len(), 1);
    assert_eq!(report.suggestions[0].severity, Severity::Major);
}

#[test]
fn test_raid_buff_window_closes_on_first_removal() {
    let events = vec![
        Event::status_apply(5_000, PLAYER, PLAYER, statuses::BATTLE_FERVOR),
        Event::status_apply(5_000, PLAYER, ALLY, statuses::BATTLE_FERVOR),
        // First removal (from either target) closes the window.
        Event::status_remove(10_000, PLAYER, ALLY, statuses::BATTLE_FERVOR),
        Event::status_remove(10_200, PLAYER, PLAYER, statuses::BATTLE_FERVOR),
    ];

    let results = run_with(overwrite_module(), events);
    let table = report(&results, "battle_cry").table.as_ref().expect("table");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].start, 5_000);
    assert_eq!(table.rows[0].end, 10_000);
}

// ═══════════════════════════════════════════════════════════════════════════
// Action Windows
// ═══════════════════════════════════════════════════════════════════════════

fn onslaught_module(reopen: ReopenPolicy) -> Box<ActionWindowModule> {
    let mut config = ActionWindowConfig::new("onslaught", PLAYER, actions::ONSLAUGHT);
    config.max_duration_ms = Some(10_000);
    config.reopen = reopen;
    Box::new(ActionWindowModule::new(
        config,
        vec![Box::new(strike_evaluator(
            1,
            SeverityTiers::new([(1, Severity::Minor)]),
        ))],
    ))
}

#[test]
fn test_duration_bounded_window_closes_retroactively() {
    let events = vec![
        Event::action(1_000, PLAYER, BOSS, actions::ONSLAUGHT),
        Event::action(5_000, PLAYER, BOSS, actions::STRIKE),
        // Past the deadline: closes the window at 11000, stays outside it.
        Event::action(16_000, PLAYER, BOSS, actions::STRIKE),
    ];

    let results = run_with(onslaught_module(ReopenPolicy::Extend), events);
    let table = report(&results, "onslaught").table.as_ref().expect("table");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].end, 11_000);
    assert_eq!(
        table.rows[0].cells,
        vec![WindowCell::Count {
            actual: 1,
            expected: 1,
            outcome: Outcome::Met,
        }]
    );
}

#[test]
fn test_reopen_extend_pushes_deadline_out() {
    let events = vec![
        Event::action(1_000, PLAYER, BOSS, actions::ONSLAUGHT),
        Event::action(5_000, PLAYER, BOSS, actions::ONSLAUGHT),
        Event::action(16_000, PLAYER, BOSS, actions::STRIKE),
    ];
    let results = run_with(onslaught_module(ReopenPolicy::Extend), events);
    let table = report(&results, "onslaught").table.as_ref().expect("table");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].end, 15_000);
}

#[test]
fn test_reopen_ignore_keeps_original_deadline() {
    let events = vec![
        Event::action(1_000, PLAYER, BOSS, actions::ONSLAUGHT),
        Event::action(5_000, PLAYER, BOSS, actions::ONSLAUGHT),
        Event::action(16_000, PLAYER, BOSS, actions::STRIKE),
    ];
    let results = run_with(onslaught_module(ReopenPolicy::Ignore), events);
    let table = report(&results, "onslaught").table.as_ref().expect("table");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].end, 11_000);
}

// ═══════════════════════════════════════════════════════════════════════════
// Determinism
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_replaying_the_same_stream_yields_identical_results() {
    let events = || {
        vec![
            Event::status_apply(1_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
            Event::action(1_200, PLAYER, BOSS, actions::STRIKE),
            Event::action(3_700, PLAYER, BOSS, actions::STRIKE),
            Event::status_apply(5_000, BOSS, BOSS, statuses::VOIDWALL),
            Event::status_remove(9_000, BOSS, BOSS, statuses::VOIDWALL),
            Event::status_remove(21_000, PLAYER, PLAYER, statuses::KEEN_EDGE),
            Event::complete(22_000),
        ]
    };
    let module = || {
        keen_edge_module(vec![Box::new(strike_evaluator(
            4,
            SeverityTiers::new([(1, Severity::Medium)]),
        ))])
    };

    let first = run_with(module(), events());
    let second = run_with(module(), events());
    assert_eq!(first, second);
}
