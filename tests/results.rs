//! Integration tests for result recording: standings deltas, write-once outcomes, atomicity.

use chrono::NaiveDate;
use tournament_manager::{
    record_result, EngineError, GameMatch, MatchOutcome, MemoryStore, NewMatch, StandingsRow,
    Storage, Team, TeamId, Tournament, TournamentContext, TournamentEngine, TournamentFormat,
};
use uuid::Uuid;

fn league(n: usize) -> (TournamentEngine<MemoryStore>, TournamentContext, Vec<GameMatch>) {
    let mut engine = TournamentEngine::new(MemoryStore::new());
    let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    let ctx = engine
        .create_tournament("League", TournamentFormat::RoundRobin, date)
        .unwrap();
    for i in 0..n {
        engine.add_team(&ctx, &format!("Team {i}")).unwrap();
    }
    let matches = engine.generate_fixtures(&ctx).unwrap();
    (engine, ctx, matches)
}

fn row(engine: &TournamentEngine<MemoryStore>, ctx: &TournamentContext, team: TeamId) -> StandingsRow {
    engine
        .standings(ctx)
        .into_iter()
        .find(|r| r.team_id == team)
        .unwrap()
}

fn counters(r: &StandingsRow) -> (u32, u32, u32, u32, u32) {
    (r.games_played, r.wins, r.losses, r.draws, r.points)
}

#[test]
fn team1_win_updates_both_rows() {
    let (mut engine, ctx, matches) = league(2);
    let m = &matches[0];

    engine
        .record_result(&ctx, m.id, MatchOutcome::Team1Win)
        .unwrap();

    assert_eq!(counters(&row(&engine, &ctx, m.team_1)), (1, 1, 0, 0, 3));
    assert_eq!(counters(&row(&engine, &ctx, m.team_2)), (1, 0, 1, 0, 0));
    let stored = &engine.fixtures(&ctx)[0];
    assert_eq!(stored.outcome, MatchOutcome::Team1Win);
    assert_eq!(stored.winner, Some(m.team_1));
}

#[test]
fn team2_win_records_team2_as_winner() {
    let (mut engine, ctx, matches) = league(2);
    let m = &matches[0];

    engine
        .record_result(&ctx, m.id, MatchOutcome::Team2Win)
        .unwrap();

    assert_eq!(counters(&row(&engine, &ctx, m.team_2)), (1, 1, 0, 0, 3));
    assert_eq!(counters(&row(&engine, &ctx, m.team_1)), (1, 0, 1, 0, 0));
    assert_eq!(engine.fixtures(&ctx)[0].winner, Some(m.team_2));
}

#[test]
fn draw_gives_both_teams_a_point() {
    let (mut engine, ctx, matches) = league(2);
    let m = &matches[0];

    engine.record_result(&ctx, m.id, MatchOutcome::Draw).unwrap();

    assert_eq!(counters(&row(&engine, &ctx, m.team_1)), (1, 0, 0, 1, 1));
    assert_eq!(counters(&row(&engine, &ctx, m.team_2)), (1, 0, 0, 1, 1));
    let stored = &engine.fixtures(&ctx)[0];
    assert_eq!(stored.outcome, MatchOutcome::Draw);
    assert_eq!(stored.winner, None);
}

#[test]
fn outcomes_are_write_once() {
    let (mut engine, ctx, matches) = league(2);
    let m = &matches[0];
    engine
        .record_result(&ctx, m.id, MatchOutcome::Team1Win)
        .unwrap();
    let before = engine.standings(&ctx);

    assert_eq!(
        engine.record_result(&ctx, m.id, MatchOutcome::Team2Win),
        Err(EngineError::AlreadyResolved(m.id))
    );
    assert_eq!(
        engine.record_result(&ctx, m.id, MatchOutcome::Team1Win),
        Err(EngineError::AlreadyResolved(m.id))
    );
    assert_eq!(engine.standings(&ctx), before);
    assert_eq!(engine.fixtures(&ctx)[0].outcome, MatchOutcome::Team1Win);
}

#[test]
fn unknown_match_is_not_found() {
    let (mut engine, ctx, _) = league(3);
    let missing = Uuid::new_v4();
    assert_eq!(
        engine.record_result(&ctx, missing, MatchOutcome::Draw),
        Err(EngineError::MatchNotFound(missing))
    );
}

#[test]
fn match_of_another_tournament_is_not_found() {
    let (mut engine, ctx, matches) = league(2);
    let date = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();
    let other = engine
        .create_tournament("Other", TournamentFormat::RoundRobin, date)
        .unwrap();

    assert_eq!(
        engine.record_result(&other, matches[0].id, MatchOutcome::Draw),
        Err(EngineError::MatchNotFound(matches[0].id))
    );
    assert!(engine.fixtures(&ctx)[0].is_pending());
}

#[test]
fn pending_is_not_a_result() {
    let (mut engine, ctx, matches) = league(2);
    assert_eq!(
        engine.record_result(&ctx, matches[0].id, MatchOutcome::Pending),
        Err(EngineError::InvalidOutcome)
    );
    assert!(engine.standings(&ctx).iter().all(|r| r.games_played == 0));
}

#[test]
fn failed_recording_leaves_no_partial_update() {
    // Team 2 has no standings row, so its increment fails after team 1's succeeded.
    let mut store = MemoryStore::new();
    let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    let tournament = Tournament::new("Broken", TournamentFormat::RoundRobin, date).unwrap();
    let tid = tournament.id;
    store.insert_tournament(tournament).unwrap();
    let a = Team::new(tid, "A");
    let b = Team::new(tid, "B");
    let (a_id, b_id) = (a.id, b.id);
    store.insert_team(a).unwrap();
    store.insert_team(b).unwrap();
    store.upsert_standings_row(tid, a_id).unwrap();
    let ids = store
        .create_matches(tid, &[NewMatch { round: 1, team_1: a_id, team_2: b_id }])
        .unwrap();

    let result = record_result(&mut store, tid, ids[0], MatchOutcome::Team1Win);

    assert_eq!(result, Err(EngineError::TeamNotFound(b_id)));
    assert!(store.get_match(ids[0]).unwrap().is_pending());
    assert_eq!(store.list_standings(tid)[0].points, 0);
    assert_eq!(store.list_standings(tid)[0].games_played, 0);
}

#[test]
fn points_and_games_stay_consistent_over_a_full_league() {
    let (mut engine, ctx, matches) = league(5);
    let outcomes = [MatchOutcome::Team1Win, MatchOutcome::Draw, MatchOutcome::Team2Win];
    for (m, outcome) in matches.iter().zip(outcomes.iter().cycle()) {
        engine.record_result(&ctx, m.id, *outcome).unwrap();
    }

    let rows = engine.standings(&ctx);
    assert_eq!(rows.iter().map(|r| r.games_played).sum::<u32>(), 20);
    for r in &rows {
        assert_eq!(r.games_played, 4);
        assert_eq!(r.points, 3 * r.wins + r.draws);
        assert_eq!(r.games_played, r.wins + r.losses + r.draws);
    }
}
