use pacetrack::{
    PaceTrackError, RecoveryKind, RunAssessment, RunConfig, SeriesProgress, SessionEvent, Tier,
    TrainingSession,
};
use std::time::{Duration, Instant};

/// Integration tests driving complete coaching scenarios through the
/// session facade.

fn at(t0: Instant, seconds: u64) -> Instant {
    t0 + Duration::from_secs(seconds)
}

fn assessment(tier: Tier) -> RunAssessment {
    RunAssessment {
        distance_m: 480.0,
        speed_kmh: 9.6,
        vma_percent_achieved: 80.0,
        tier,
    }
}

/// Drain a pending recovery through 1 Hz ticks, returning every event seen.
fn run_out_recovery(session: &mut TrainingSession, t0: Instant, mut clock: u64) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while session.in_recovery() {
        clock += 1;
        events.extend(session.tick_at(at(t0, clock)));
    }
    events
}

#[test]
fn test_two_by_two_series_progression() {
    let t0 = Instant::now();
    let mut session = TrainingSession::new(RunConfig::default());
    session.create_series(2, 2, 30.0, 90.0).unwrap();
    assert_eq!(session.series_progress(), SeriesProgress { series: 1, rep: 1 });

    // Run 1 validates into a between-reps recovery of 30 s
    let event = session.validate_performance(Some(assessment(Tier::Good))).unwrap();
    assert_eq!(event, None);
    assert_eq!(session.recovery_kind(), Some(RecoveryKind::Rep));
    assert_eq!(session.recovery_remaining_s(), Some(30.0));

    let events = run_out_recovery(&mut session, t0, 0);
    assert!(events.contains(&SessionEvent::RecoveryComplete {
        kind: RecoveryKind::Rep
    }));
    assert_eq!(session.series_progress(), SeriesProgress { series: 1, rep: 2 });

    // Run 2 crosses the series boundary: 90 s recovery
    session.validate_performance(Some(assessment(Tier::Fair))).unwrap();
    assert_eq!(session.recovery_kind(), Some(RecoveryKind::Series));
    assert_eq!(session.recovery_remaining_s(), Some(90.0));
    run_out_recovery(&mut session, t0, 100);
    assert_eq!(session.series_progress(), SeriesProgress { series: 2, rep: 1 });

    // Run 3 back to a rep recovery
    session.validate_performance(Some(assessment(Tier::Good))).unwrap();
    assert_eq!(session.recovery_kind(), Some(RecoveryKind::Rep));
    run_out_recovery(&mut session, t0, 300);
    assert_eq!(session.series_progress(), SeriesProgress { series: 2, rep: 2 });

    // Final position reached but run 4 still unvalidated
    assert!(session.is_series_complete());
    assert!(!session.is_series_fully_validated());

    // Run 4 is terminal: completion signal, no recovery
    let event = session.validate_performance(Some(assessment(Tier::Excellent))).unwrap();
    assert_eq!(event, Some(SessionEvent::SeriesComplete));
    assert!(!session.in_recovery());
    assert!(session.is_series_fully_validated());
    assert_eq!(session.performance_history().len(), 4);
}

#[test]
fn test_series_rejects_zero_counts() {
    let mut session = TrainingSession::new(RunConfig::default());
    assert!(matches!(
        session.create_series(0, 2, 30.0, 90.0),
        Err(PaceTrackError::InvalidSeriesConfig { .. })
    ));
    assert!(!session.is_series_active());
}

#[test]
fn test_marked_runs_feed_performance_history() {
    let t0 = Instant::now();
    let mut session = TrainingSession::new(RunConfig::default());
    session.create_series(1, 2, 20.0, 60.0).unwrap();

    // Rep 1: two on-target laps
    session.start_at(t0);
    session.mark_at(at(t0, 75));
    session.mark_at(at(t0, 150));
    session.validate_performance(None).unwrap();
    session.skip_recovery().unwrap();

    // Rep 2: one slow lap (200 m in 100 s = 7.2 km/h)
    session.start_at(at(t0, 200));
    session.mark_at(at(t0, 300));
    let event = session.validate_performance(None).unwrap();
    assert_eq!(event, Some(SessionEvent::SeriesComplete));

    let history = session.performance_history();
    assert_eq!(history.len(), 2);
    assert_eq!((history[0].series, history[0].rep), (1, 1));
    assert!((history[0].speed_kmh - 9.6).abs() < 1e-9);
    assert_eq!(history[0].tier, Tier::Excellent);
    assert_eq!((history[1].series, history[1].rep), (1, 2));
    assert!((history[1].speed_kmh - 7.2).abs() < 1e-9);
    assert_eq!(history[1].tier, Tier::Poor);

    let distribution = session.performance_tier_distribution();
    assert_eq!(distribution.excellent, 1);
    assert_eq!(distribution.poor, 1);
}

#[test]
fn test_pause_resume_accounts_running_time_only() {
    let t0 = Instant::now();
    let mut session = TrainingSession::new(RunConfig::default());

    session.start_at(t0);
    session.pause_or_resume_at(at(t0, 5));
    session.pause_or_resume_at(at(t0, 8));
    let snapshot = session.timer_snapshot_at(at(t0, 10));

    // 5 s running + 3 s paused + 2 s running: elapsed is 7 s, not 10 s
    assert_eq!(snapshot.elapsed_seconds, 7.0);
    assert_eq!(snapshot.remaining_seconds, 173.0);
}

#[test]
fn test_undo_after_single_mark_restores_pre_mark_state() {
    let t0 = Instant::now();
    let mut session = TrainingSession::new(RunConfig::default());

    session.start_at(t0);
    session.mark_at(at(t0, 70));
    assert!(session.undo_last());

    assert!(session.laps().is_empty());
    assert_eq!(session.current_tier(), None);
    assert!(session.speed_summary().is_none());

    // Next mark spans from the run start again
    let lap = session.mark_at(at(t0, 75)).unwrap();
    assert_eq!(lap.lap_number, 1);
    assert_eq!(lap.duration_seconds, 75.0);
}

#[test]
fn test_recovery_warning_fires_once_near_the_end() {
    let t0 = Instant::now();
    let mut session = TrainingSession::new(RunConfig::default());
    session.create_series(2, 1, 30.0, 20.0).unwrap();
    session.validate_performance(Some(assessment(Tier::Good))).unwrap();
    assert_eq!(session.recovery_kind(), Some(RecoveryKind::Series));

    let mut warnings = 0;
    let mut clock = 0;
    while session.in_recovery() {
        clock += 1;
        for event in session.tick_at(at(t0, clock)) {
            if matches!(event, SessionEvent::RecoveryWarning { .. }) {
                warnings += 1;
                // Warning lands when the countdown crosses 15 s
                assert_eq!(session.recovery_remaining_s(), Some(15.0));
            }
        }
    }
    assert_eq!(warnings, 1);
}

#[test]
fn test_run_auto_stops_at_configured_duration() {
    let t0 = Instant::now();
    let config = RunConfig {
        duration_minutes: 1.0,
        ..RunConfig::default()
    };
    let mut session = TrainingSession::new(config);

    session.start_at(t0);
    assert_eq!(session.tick_at(at(t0, 30)), vec![]);
    let events = session.tick_at(at(t0, 61));
    assert_eq!(events, vec![SessionEvent::RunAutoStopped]);

    let snapshot = session.timer_snapshot_at(at(t0, 90));
    assert_eq!(snapshot.elapsed_seconds, 60.0);
    assert_eq!(snapshot.remaining_seconds, 0.0);
    assert!(!snapshot.is_running);

    // Marks after the run finished are ignored
    assert!(session.mark_at(at(t0, 62)).is_none());
}

#[test]
fn test_cancel_series_discards_structure_and_recovery() {
    let t0 = Instant::now();
    let mut session = TrainingSession::new(RunConfig::default());
    session.create_series(3, 3, 30.0, 90.0).unwrap();
    session.start_at(t0);
    session.mark_at(at(t0, 75));
    session.validate_performance(None).unwrap();
    assert!(session.in_recovery());

    session.cancel_series();
    assert!(!session.is_series_active());
    assert!(!session.in_recovery());
    assert!(session.performance_history().is_empty());
    // Stale ticks after cancellation do nothing
    assert_eq!(session.tick_at(at(t0, 120)), vec![]);
}

#[test]
fn test_recovery_holds_run_controls() {
    let t0 = Instant::now();
    let mut session = TrainingSession::new(RunConfig::default());
    session.create_series(1, 2, 30.0, 30.0).unwrap();
    session.start_at(t0);
    session.mark_at(at(t0, 75));
    session.validate_performance(None).unwrap();

    // Start and mark are held while the countdown runs
    session.start_at(at(t0, 80));
    assert!(!session.timer_snapshot_at(at(t0, 81)).is_running);
    assert!(session.mark_at(at(t0, 82)).is_none());

    session.skip_recovery().unwrap();
    session.start_at(at(t0, 90));
    assert!(session.timer_snapshot_at(at(t0, 91)).is_running);
}
