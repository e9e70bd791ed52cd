//! Integration tests for round-robin fixture generation and team enrolment.

use chrono::NaiveDate;
use std::collections::HashSet;
use tournament_manager::{
    EngineError, MatchOutcome, MemoryStore, Progress, Team, TournamentContext, TournamentEngine,
    TournamentFormat,
};

fn engine_with_teams(n: usize) -> (TournamentEngine<MemoryStore>, TournamentContext, Vec<Team>) {
    let mut engine = TournamentEngine::with_seed(MemoryStore::new(), 7);
    let date = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
    let ctx = engine
        .create_tournament("League", TournamentFormat::RoundRobin, date)
        .unwrap();
    let teams = (0..n)
        .map(|i| engine.add_team(&ctx, &format!("Team {i}")).unwrap())
        .collect();
    (engine, ctx, teams)
}

#[test]
fn every_pair_plays_exactly_once() {
    for n in 2..=8 {
        let (mut engine, ctx, teams) = engine_with_teams(n);
        let matches = engine.generate_fixtures(&ctx).unwrap();

        assert_eq!(matches.len(), n * (n - 1) / 2);
        let pairs: HashSet<_> = matches
            .iter()
            .map(|m| {
                assert_ne!(m.team_1, m.team_2);
                if m.team_1 < m.team_2 {
                    (m.team_1, m.team_2)
                } else {
                    (m.team_2, m.team_1)
                }
            })
            .collect();
        assert_eq!(pairs.len(), matches.len());
        for m in &matches {
            assert!(teams.iter().any(|t| t.id == m.team_1));
            assert!(teams.iter().any(|t| t.id == m.team_2));
            assert_eq!(m.outcome, MatchOutcome::Pending);
            assert_eq!(m.winner, None);
        }
    }
}

#[test]
fn rounds_are_sequence_numbers_in_input_order() {
    let (mut engine, ctx, teams) = engine_with_teams(3);
    engine.generate_fixtures(&ctx).unwrap();

    let fixtures = engine.fixtures(&ctx);
    let rounds: Vec<u32> = fixtures.iter().map(|m| m.round).collect();
    assert_eq!(rounds, vec![1, 2, 3]);
    let pairs: Vec<_> = fixtures.iter().map(|m| (m.team_1, m.team_2)).collect();
    assert_eq!(
        pairs,
        vec![
            (teams[0].id, teams[1].id),
            (teams[0].id, teams[2].id),
            (teams[1].id, teams[2].id)
        ]
    );
}

#[test]
fn generating_twice_is_rejected() {
    let (mut engine, ctx, _) = engine_with_teams(4);
    engine.generate_fixtures(&ctx).unwrap();

    assert!(matches!(
        engine.generate_fixtures(&ctx),
        Err(EngineError::AlreadyGenerated)
    ));
    assert_eq!(engine.fixtures(&ctx).len(), 6);
}

#[test]
fn needs_at_least_two_teams() {
    let (mut engine, ctx, _) = engine_with_teams(1);
    assert_eq!(
        engine.generate_fixtures(&ctx),
        Err(EngineError::InvalidTeamCount { found: 1 })
    );
    assert!(engine.fixtures(&ctx).is_empty());
    assert!(engine.standings(&ctx).is_empty());
}

#[test]
fn generation_creates_zeroed_standings_for_every_team() {
    let (mut engine, ctx, teams) = engine_with_teams(4);
    engine.generate_fixtures(&ctx).unwrap();

    let rows = engine.standings(&ctx);
    assert_eq!(rows.len(), 4);
    for (row, team) in rows.iter().zip(&teams) {
        assert_eq!(row.team_id, team.id);
        assert_eq!(row.team_name, team.name);
        assert_eq!(
            (row.games_played, row.wins, row.losses, row.draws, row.points),
            (0, 0, 0, 0, 0)
        );
    }
}

#[test]
fn round_robin_results_do_not_progress_a_bracket() {
    let (mut engine, ctx, _) = engine_with_teams(2);
    let matches = engine.generate_fixtures(&ctx).unwrap();

    let progress = engine
        .record_result(&ctx, matches[0].id, MatchOutcome::Team1Win)
        .unwrap();
    assert_eq!(progress, Progress::NotKnockout);
    assert_eq!(engine.fixtures(&ctx).len(), 1);
}

#[test]
fn knockout_context_on_a_league_does_not_start_a_bracket() {
    let (mut engine, ctx, _) = engine_with_teams(4);
    let matches = engine.generate_fixtures(&ctx).unwrap();
    let mislabelled = TournamentContext {
        format: TournamentFormat::Knockout,
        ..ctx
    };

    for m in &matches {
        let progress = engine
            .record_result(&mislabelled, m.id, MatchOutcome::Team1Win)
            .unwrap();
        assert_eq!(progress, Progress::NotKnockout);
    }
    assert_eq!(engine.fixtures(&ctx).len(), 6);
    assert_eq!(engine.tournament(&ctx).unwrap().champion(), None);
}

#[test]
fn roster_is_frozen_once_fixtures_exist() {
    let (mut engine, ctx, _) = engine_with_teams(2);
    engine.generate_fixtures(&ctx).unwrap();
    assert_eq!(engine.add_team(&ctx, "Latecomers"), Err(EngineError::RosterFrozen));
}

#[test]
fn team_names_are_trimmed_and_unique() {
    let (mut engine, ctx, _) = engine_with_teams(0);
    let team = engine.add_team(&ctx, "  Rovers ").unwrap();
    assert_eq!(team.name, "Rovers");
    assert_eq!(engine.add_team(&ctx, "ROVERS"), Err(EngineError::DuplicateTeamName));
    assert_eq!(engine.add_team(&ctx, "   "), Err(EngineError::EmptyName));
}

#[test]
fn csv_import_adds_all_or_nothing() {
    let (mut engine, ctx, _) = engine_with_teams(0);
    let teams = engine
        .import_teams(&ctx, "name\nLions\nTigers\nBears\n".as_bytes())
        .unwrap();
    assert_eq!(teams.len(), 3);

    let result = engine.import_teams(&ctx, "name\nWolves\nlions\n".as_bytes());
    assert_eq!(result, Err(EngineError::DuplicateTeamName));
    assert_eq!(engine.teams(&ctx).unwrap().len(), 3);
}
