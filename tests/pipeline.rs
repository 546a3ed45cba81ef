use crown_meta::analysis::role::Role;
use crown_meta::api::models::{
    LeagueItemDto, LeagueListDto, LeagueTier, MatchDto, MatchInfo, MatchMetadata, ParticipantDto,
    RANKED_SOLO_QUEUE_ID,
};
use crown_meta::api::RankedApi;
use crown_meta::pipeline::{CollectOptions, Collector};
use crown_meta::snapshot::{Snapshot, SnapshotStore};
use crown_meta::AppError;
use indicatif::ProgressBar;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// In-memory ladder and match history.
#[derive(Default)]
struct MockApi {
    leagues: HashMap<LeagueTier, LeagueListDto>,
    failing_leagues: HashSet<LeagueTier>,
    forbidden_leagues: HashSet<LeagueTier>,
    match_ids: HashMap<String, Vec<String>>,
    matches: HashMap<String, MatchDto>,
    forbidden_players: HashSet<String>,
    broken_players: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl MockApi {
    fn with_league(mut self, tier: LeagueTier, players: &[(&str, i32)]) -> Self {
        self.leagues.insert(
            tier,
            LeagueListDto {
                league_id: String::new(),
                tier: tier.label().to_uppercase(),
                queue: "RANKED_SOLO_5x5".to_string(),
                entries: players
                    .iter()
                    .map(|(puuid, lp)| LeagueItemDto {
                        puuid: puuid.to_string(),
                        league_points: *lp,
                        rank: "I".to_string(),
                        wins: 0,
                        losses: 0,
                    })
                    .collect(),
            },
        );
        self
    }

    fn with_game(mut self, puuid: &str, match_id: &str, queue_id: i32, champion: &str, position: &str) -> Self {
        self.match_ids
            .entry(puuid.to_string())
            .or_default()
            .push(match_id.to_string());
        self.matches.insert(
            match_id.to_string(),
            game(match_id, queue_id, puuid, champion, position),
        );
        self
    }

    /// Lists a match id whose detail endpoint answers 404.
    fn with_missing_game(mut self, puuid: &str, match_id: &str) -> Self {
        self.match_ids
            .entry(puuid.to_string())
            .or_default()
            .push(match_id.to_string());
        self
    }

    fn players_queried(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| c.strip_prefix("ids:").map(str::to_string))
            .collect()
    }
}

impl RankedApi for MockApi {
    fn get_league(&self, tier: LeagueTier) -> Result<Option<LeagueListDto>, AppError> {
        self.calls.borrow_mut().push(format!("league:{}", tier.label()));
        if self.forbidden_leagues.contains(&tier) {
            return Err(AppError::Unauthorized {
                status: 403,
                message: "Forbidden".to_string(),
            });
        }
        if self.failing_leagues.contains(&tier) {
            return Err(AppError::Http {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(self.leagues.get(&tier).cloned())
    }

    fn get_match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError> {
        self.calls.borrow_mut().push(format!("ids:{}", puuid));
        if self.forbidden_players.contains(puuid) {
            return Err(AppError::Unauthorized {
                status: 403,
                message: "Forbidden".to_string(),
            });
        }
        if self.broken_players.contains(puuid) {
            return Err(AppError::Http {
                status: 500,
                message: "boom".to_string(),
            });
        }
        let mut ids = self.match_ids.get(puuid).cloned().unwrap_or_default();
        ids.truncate(count);
        Ok(ids)
    }

    fn get_match(&self, match_id: &str) -> Result<MatchDto, AppError> {
        self.calls.borrow_mut().push(format!("match:{}", match_id));
        self.matches
            .get(match_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(match_id.to_string()))
    }
}

fn game(match_id: &str, queue_id: i32, puuid: &str, champion: &str, position: &str) -> MatchDto {
    MatchDto {
        metadata: MatchMetadata {
            match_id: match_id.to_string(),
            participants: vec![puuid.to_string(), "someone-else".to_string()],
        },
        info: MatchInfo {
            queue_id,
            game_duration: 1700,
            participants: vec![
                ParticipantDto {
                    puuid: "someone-else".to_string(),
                    champion_name: "Garen".to_string(),
                    team_position: "TOP".to_string(),
                    ..Default::default()
                },
                ParticipantDto {
                    puuid: puuid.to_string(),
                    champion_name: champion.to_string(),
                    individual_position: position.to_string(),
                    ..Default::default()
                },
            ],
        },
    }
}

fn options(player_count: usize) -> CollectOptions {
    CollectOptions {
        player_count,
        match_count: 20,
    }
}

fn count_of(snapshot: &Snapshot, champion: &str, role: Role) -> Option<usize> {
    snapshot
        .results
        .iter()
        .find(|s| s.champion_name == champion && s.role == Some(role))
        .map(|s| s.count)
}

#[test]
fn top_players_are_picked_across_tiers_by_league_points() {
    let api = MockApi::default()
        .with_league(LeagueTier::Challenger, &[("c100", 100), ("c80", 80)])
        .with_league(LeagueTier::Grandmaster, &[("g90", 90)])
        .with_game("c100", "M1", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE")
        .with_game("g90", "M2", RANKED_SOLO_QUEUE_ID, "Jinx", "BOTTOM")
        .with_game("c80", "M3", RANKED_SOLO_QUEUE_ID, "Lee Sin", "JUNGLE");

    let report = Collector::new(&api, options(2)).collect(&[]).expect("collect");

    assert_eq!(api.players_queried(), vec!["c100", "g90"]);
    assert_eq!(report.leaderboard_size, 3);
    assert_eq!(report.players_selected, 2);
    assert_eq!(report.snapshot.total_players_analyzed, 2);
    assert_eq!(count_of(&report.snapshot, "Lee Sin", Role::Jungle), None);
}

#[test]
fn three_mid_ahri_games_count_three() {
    let api = MockApi::default()
        .with_league(LeagueTier::Challenger, &[("p1", 1000)])
        .with_game("p1", "M1", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE")
        .with_game("p1", "M2", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE")
        .with_game("p1", "M3", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE");

    let report = Collector::new(&api, options(100)).collect(&[]).expect("collect");

    assert_eq!(report.snapshot.results.len(), 1);
    assert_eq!(count_of(&report.snapshot, "Ahri", Role::Mid), Some(3));
    assert_eq!(report.snapshot.results[0].champion_id, 0);
}

#[test]
fn missing_match_is_skipped_without_error() {
    let mut api = MockApi::default().with_league(LeagueTier::Challenger, &[("p1", 1000)]);
    for i in 0..20 {
        let id = format!("M{}", i);
        api = if i == 7 {
            api.with_missing_game("p1", &id)
        } else {
            api.with_game("p1", &id, RANKED_SOLO_QUEUE_ID, "Thresh", "UTILITY")
        };
    }

    let report = Collector::new(&api, options(100)).collect(&[]).expect("collect");

    assert_eq!(count_of(&report.snapshot, "Thresh", Role::Support), Some(19));
    assert_eq!(report.players_failed, 0);
    assert_eq!(report.snapshot.total_players_analyzed, 1);
}

#[test]
fn rejected_key_aborts_the_run_and_writes_nothing() {
    let players: Vec<(String, i32)> = (0..100).map(|i| (format!("p{:03}", i), 2000 - i)).collect();
    let ladder: Vec<(&str, i32)> = players.iter().map(|(p, lp)| (p.as_str(), *lp)).collect();

    let mut api = MockApi::default().with_league(LeagueTier::Challenger, &ladder);
    for (puuid, _) in &players {
        api = api.with_game(puuid, &format!("{}-M1", puuid), RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE");
    }
    api.forbidden_players.insert("p004".to_string());

    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SnapshotStore::new(dir.path());

    let err = Collector::new(&api, options(100))
        .run(&store)
        .expect_err("403 must abort");

    assert!(matches!(err, AppError::Unauthorized { status: 403, .. }));
    assert_eq!(api.players_queried().len(), 5);
    assert!(store.list().expect("list").is_empty());
    assert!(!dir.path().join("latest.json").exists());
}

#[test]
fn failing_player_is_skipped_and_others_still_count() {
    let mut api = MockApi::default()
        .with_league(LeagueTier::Challenger, &[("p1", 300), ("p2", 200), ("p3", 100)])
        .with_game("p1", "A", RANKED_SOLO_QUEUE_ID, "Jinx", "BOTTOM")
        .with_game("p2", "B", RANKED_SOLO_QUEUE_ID, "Jinx", "BOTTOM")
        .with_game("p3", "C", RANKED_SOLO_QUEUE_ID, "Jinx", "BOTTOM");
    api.broken_players.insert("p2".to_string());

    let report = Collector::new(&api, options(100)).collect(&[]).expect("collect");

    assert_eq!(report.players_failed, 1);
    assert_eq!(report.snapshot.total_players_analyzed, 2);
    assert_eq!(count_of(&report.snapshot, "Jinx", Role::Adc), Some(2));
}

#[test]
fn unavailable_tiers_are_skipped() {
    let mut api = MockApi::default()
        .with_league(LeagueTier::Master, &[("m1", 10)])
        .with_game("m1", "A", RANKED_SOLO_QUEUE_ID, "Nami", "UTILITY");
    api.failing_leagues.insert(LeagueTier::Grandmaster);

    let report = Collector::new(&api, options(100)).collect(&[]).expect("collect");

    assert_eq!(report.leaderboard_size, 1);
    assert_eq!(count_of(&report.snapshot, "Nami", Role::Support), Some(1));
}

#[test]
fn rejected_key_on_the_ladder_aborts_before_any_player_is_queried() {
    let mut api = MockApi::default()
        .with_league(LeagueTier::Challenger, &[("p1", 300)])
        .with_league(LeagueTier::Master, &[("m1", 10)])
        .with_game("p1", "A", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE");
    api.forbidden_leagues.insert(LeagueTier::Grandmaster);

    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SnapshotStore::new(dir.path());

    let err = Collector::new(&api, options(100))
        .run(&store)
        .expect_err("403 on the ladder must abort");

    assert!(matches!(err, AppError::Unauthorized { status: 403, .. }));
    assert!(api.players_queried().is_empty());
    assert!(!api.calls.borrow().iter().any(|c| c == "league:Master"));
    assert!(store.list().expect("list").is_empty());
}

#[test]
fn progress_lines_are_written_when_the_bar_is_hidden() {
    let mut api = MockApi::default()
        .with_league(
            LeagueTier::Challenger,
            &[("p1aaaaaaaaa", 300), ("p2bbbbbbbbb", 200), ("p3ccccccccc", 100)],
        )
        .with_game("p1aaaaaaaaa", "A", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE")
        .with_game("p2bbbbbbbbb", "B", 440, "Ahri", "MIDDLE");
    api.failing_leagues.insert(LeagueTier::Master);
    api.broken_players.insert("p3ccccccccc".to_string());
    let lines = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&lines);

    let report = Collector::new(&api, options(100))
        .with_progress(ProgressBar::hidden())
        .with_output(move |line: &str| sink.borrow_mut().push(line.to_string()))
        .collect(&[])
        .expect("collect");

    assert_eq!(report.players_failed, 1);
    let lines = lines.borrow();
    assert_eq!(
        *lines,
        vec![
            "  ✓ 3 Challenger players found".to_string(),
            "  ✓ p1aaaaaa...: Ahri mid (1x)".to_string(),
            "  ⚠ No ranked champions found for p2bbbbbb...".to_string(),
        ]
    );
}

#[test]
fn empty_ladder_is_an_error() {
    let api = MockApi::default();
    let err = Collector::new(&api, options(100)).collect(&[]).expect_err("no players");
    assert!(matches!(err, AppError::NoLeaderboardData));
}

#[test]
fn counts_sum_to_qualifying_games_only() {
    let api = MockApi::default()
        .with_league(LeagueTier::Challenger, &[("p1", 300), ("p2", 200)])
        .with_game("p1", "A", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE")
        .with_game("p1", "B", 440, "Ahri", "MIDDLE")
        .with_game("p1", "C", RANKED_SOLO_QUEUE_ID, "Vi", "JUNGLE")
        .with_game("p2", "D", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE")
        .with_game("p2", "E", 450, "Teemo", "TOP");

    let report = Collector::new(&api, options(100)).collect(&[]).expect("collect");

    let total: usize = report.snapshot.results.iter().map(|s| s.count).sum();
    assert_eq!(total, 3);
    assert_eq!(count_of(&report.snapshot, "Ahri", Role::Mid), Some(2));
    assert_eq!(count_of(&report.snapshot, "Teemo", Role::Top), None);
}

#[test]
fn player_with_only_other_queues_is_not_counted_as_analyzed() {
    let api = MockApi::default()
        .with_league(LeagueTier::Challenger, &[("p1", 300), ("p2", 200)])
        .with_game("p1", "A", 440, "Ahri", "MIDDLE")
        .with_game("p2", "B", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE");

    let report = Collector::new(&api, options(100)).collect(&[]).expect("collect");

    assert_eq!(report.snapshot.total_players_analyzed, 1);
    assert_eq!(report.players_failed, 0);
}

#[test]
fn new_run_adds_a_snapshot_and_reports_trend_against_previous() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SnapshotStore::new(dir.path());

    let first = MockApi::default()
        .with_league(LeagueTier::Challenger, &[("p1", 300)])
        .with_game("p1", "A", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE")
        .with_game("p1", "B", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE");
    let (_, first_path) = Collector::new(&first, options(100)).run(&store).expect("first run");
    let first_contents = std::fs::read_to_string(&first_path).expect("read first");

    std::thread::sleep(std::time::Duration::from_millis(5));

    let second = MockApi::default()
        .with_league(LeagueTier::Challenger, &[("p1", 300)])
        .with_game("p1", "A", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE")
        .with_game("p1", "B", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE")
        .with_game("p1", "C", RANKED_SOLO_QUEUE_ID, "Ahri", "MIDDLE")
        .with_game("p1", "D", RANKED_SOLO_QUEUE_ID, "Zed", "MIDDLE");
    let (report, _) = Collector::new(&second, options(100)).run(&store).expect("second run");

    let ahri = &report.snapshot.results[0];
    assert_eq!(ahri.champion_name, "Ahri");
    assert_eq!(ahri.average_historical_count, Some(2.0));
    assert_eq!(ahri.trend_percentage, Some(50.0));
    assert_eq!(report.snapshot.results[1].trend_percentage, None);

    assert_eq!(store.list().expect("list").len(), 2);
    assert_eq!(std::fs::read_to_string(&first_path).expect("reread"), first_contents);
}
