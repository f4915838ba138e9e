//! End-to-end: play a short career through the public API.

use rap_career_sim::career::actions::{Action, Outcome};
use rap_career_sim::career::logic::next_week;
use rap_career_sim::career::metrics::{
    level_progress, level_progress_between, market_trend_impact, platform_streams_total,
    song_streams_total, total_followers, total_revenue, total_streams, weekly_growth,
};
use rap_career_sim::career::save;
use rap_career_sim::career::state::{GameState, PerformanceType, Platform, Song, SongId};
use rap_career_sim::career::trends::{MarketTrend, TrendKind};
use rap_career_sim::format::format_number;
use rap_career_sim::monetization::{commit, FakePurchaseStore, PurchaseProvider, RequestStatus};
use rap_career_sim::rng::SimpleRng;
use rap_career_sim::{BalanceConfig, GameError, Session};

fn record(session: &mut Session, title: &str) -> SongId {
    match session
        .dispatch(Action::RecordSong {
            title: title.into(),
            featuring: Vec::new(),
            cover_art: None,
        })
        .unwrap()
    {
        Outcome::SongRecorded { song_id, .. } => song_id,
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn ten_week_career() {
    let mut session = Session::with_seed(GameState::new("Integration"), 2024, BalanceConfig::default());

    let first = record(&mut session, "Intro");
    let second = record(&mut session, "Outro");
    session.dispatch(Action::ReleaseSong { song_id: first }).unwrap();
    session
        .dispatch(Action::CreatePost {
            platform: Platform::Instagram,
            content: "out now".into(),
        })
        .unwrap();
    session
        .dispatch(Action::UploadVideo {
            platform: Platform::YouTube,
            title: "Intro (Official Video)".into(),
            song_id: Some(first),
        })
        .unwrap();

    let mut last_total = 0;
    for week in 2..=11 {
        match session.advance_week().unwrap() {
            Outcome::WeekAdvanced(summary) => assert_eq!(summary.week, week),
            other => panic!("unexpected outcome {:?}", other),
        }
        let state = session.state();
        assert_eq!(state.current_week, week);
        assert_eq!(state.stats.energy, state.stats.max_energy);
        let total = total_streams(state);
        assert!(total >= last_total);
        last_total = total;
    }

    let state = session.state();
    assert_eq!(state.history.len(), 10);
    assert!(state.song(first).unwrap().streams > 0);
    assert_eq!(state.song(second).unwrap().streams, 0);
    assert_eq!(
        total_streams(state),
        song_streams_total(state).max(platform_streams_total(state))
    );
    assert!(total_revenue(state) > 0.0);
    assert!(weekly_growth(state).is_some());
    let progress = level_progress(state);
    assert!((0.0..=100.0).contains(&progress));
}

#[test]
fn one_song_at_week_ten() {
    let mut state = GameState::new("Scenario");
    state.current_week = 10;
    state.songs.push(Song {
        id: SongId(1),
        title: "Only One".into(),
        streams: 1_000,
        released: true,
        release_week: Some(2),
        performance: PerformanceType::Normal,
        performance_week: None,
        featuring: Vec::new(),
        cover_art: None,
        quality: 55,
        last_week_streams: 0,
    });
    state.next_id = 2;

    for seed in 0..32 {
        let (next, _) = next_week(&state, &mut SimpleRng::new(seed), &BalanceConfig::default());
        assert_eq!(next.current_week, 11);
        let song = &next.songs[0];
        assert!(song.streams >= 1_000);
        assert!(matches!(
            song.performance,
            PerformanceType::Normal
                | PerformanceType::Viral
                | PerformanceType::Flop
                | PerformanceType::Comeback
        ));
    }
}

#[test]
fn trend_lifecycle_through_weeks() {
    let balance = BalanceConfig {
        trend_spawn_chance: 0.0,
        ..BalanceConfig::default()
    };
    let mut state = GameState::new("Trendy");
    state.current_week = 4;
    state.trends.push(MarketTrend {
        id: 900,
        kind: TrendKind::Rising,
        platforms: vec![Platform::Spotify, Platform::TikTok],
        impact: 0.25,
        start_week: 5,
        duration: 3,
    });
    let mut session = Session::with_seed(state, 1, balance);

    for week in 5..=7 {
        session.advance_week().unwrap();
        let state = session.state();
        let impact = market_trend_impact(&state.trends, week);
        assert_eq!(impact[&Platform::Spotify], 0.25);
        assert_eq!(impact[&Platform::Twitter], 0.0);
    }
    session.advance_week().unwrap();
    let state = session.state();
    assert_eq!(state.current_week, 8);
    assert!(state.trends.is_empty());
    assert_eq!(state.past_trends.iter().map(|t| t.id).collect::<Vec<_>>(), vec![900]);
}

#[test]
fn stale_advance_changes_nothing() {
    let mut session = Session::with_seed(GameState::new("Twice"), 5, BalanceConfig::default());
    session.advance_week().unwrap();
    let before = session.state().clone();
    let err = session.dispatch(Action::AdvanceWeek { from_week: 1 }).unwrap_err();
    assert_eq!(err, GameError::StaleWeek { requested: 1, current: 2 });
    assert_eq!(session.state(), &before);
}

#[test]
fn saved_career_resumes_identically() {
    let mut session = Session::with_seed(GameState::new("Saver"), 11, BalanceConfig::default());
    let id = record(&mut session, "Keeper");
    session.dispatch(Action::ReleaseSong { song_id: id }).unwrap();
    for _ in 0..4 {
        session.advance_week().unwrap();
    }

    let json = save::to_json(session.state()).unwrap();
    let restored = save::from_json(&json).unwrap();
    assert_eq!(&restored, session.state());
    assert_eq!(total_followers(&restored), total_followers(session.state()));
}

#[test]
fn tuned_balance_from_json() {
    let balance = BalanceConfig::from_json(
        r#"{"viral_base_chance": 2.0, "trend_spawn_chance": 0.0, "record_energy": 0}"#,
    )
    .unwrap();
    let mut session = Session::with_seed(GameState::new("Tuned"), 3, balance);
    let id = record(&mut session, "Guaranteed Hit");
    assert_eq!(session.state().stats.energy, 100);
    session.dispatch(Action::ReleaseSong { song_id: id }).unwrap();
    session.advance_week().unwrap();
    assert_eq!(session.state().song(id).unwrap().performance, PerformanceType::Viral);
}

#[test]
fn purchase_lands_in_state() {
    let mut store = FakePurchaseStore::new(SimpleRng::new(8)).with_latency(0.0);
    store.initialize().unwrap();
    let ticket = store.request_purchase("cash_large").unwrap();
    let mut session = Session::with_seed(GameState::new("Buyer"), 1, BalanceConfig::default());
    match store.poll(ticket).unwrap() {
        RequestStatus::Ready(reward) => session.commit_reward(&reward).unwrap(),
        other => panic!("unexpected status {:?}", other),
    }
    assert_eq!(session.state().stats.wealth, 31_000.0);

    let mut plain = GameState::new("Direct");
    store.initialize().unwrap();
    let t = store.request_purchase("energy_max").unwrap();
    if let RequestStatus::Ready(reward) = store.poll(t).unwrap() {
        commit(&reward, &mut plain).unwrap();
    }
    assert_eq!(plain.stats.max_energy, 120);
}

#[test]
fn display_guards() {
    assert_eq!(format_number(0.0), "0");
    assert_eq!(format_number(f64::NAN), "0");
    assert_eq!(level_progress_between(500.0, 1_000.0, 1_000.0), 0.0);
}
