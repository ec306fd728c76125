use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use docsim_engine::{AnalysisKind, EngineEvent, EngineHandle, SimulationSettings};

fn fast_settings() -> SimulationSettings {
    SimulationSettings {
        tick_interval: Duration::from_millis(5),
        increment_min: 20,
        increment_max: 40,
        analysis_duration: Duration::from_millis(20),
        ..SimulationSettings::default()
    }
}

fn drain_until<F>(engine: &EngineHandle, deadline: Duration, mut done: F) -> Vec<EngineEvent>
where
    F: FnMut(&EngineEvent) -> bool,
{
    let start = Instant::now();
    let mut events = Vec::new();
    while start.elapsed() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(10)) {
            let stop = done(&event);
            events.push(event);
            if stop {
                break;
            }
        }
    }
    events
}

#[test]
fn uploads_complete_then_analysis_reports_method() {
    let engine = EngineHandle::new(fast_settings()).expect("engine");
    for id in 1..=3 {
        engine.start_upload(id, format!("sop-{id}.pdf"));
    }

    let mut finished = BTreeSet::new();
    drain_until(&engine, Duration::from_secs(5), |event| {
        if let EngineEvent::UploadFinished {
            file_id,
            result: Ok(()),
        } = event
        {
            finished.insert(*file_id);
        }
        finished.len() == 3
    });
    assert_eq!(finished, BTreeSet::from([1, 2, 3]));

    engine.run_analysis(1, AnalysisKind::Enhanced);
    let events = drain_until(&engine, Duration::from_secs(5), |event| {
        matches!(event, EngineEvent::AnalysisFinished { .. })
    });
    assert_eq!(
        events.last(),
        Some(&EngineEvent::AnalysisFinished {
            run: 1,
            result: Ok(AnalysisKind::Enhanced)
        })
    );
}

#[test]
fn analysis_fault_surfaces_as_error() {
    let settings = SimulationSettings {
        analysis_fault: Some("injected".to_string()),
        ..fast_settings()
    };
    let engine = EngineHandle::new(settings).expect("engine");
    engine.run_analysis(5, AnalysisKind::Semantic);
    let events = drain_until(&engine, Duration::from_secs(5), |event| {
        matches!(event, EngineEvent::AnalysisFinished { .. })
    });
    assert_eq!(
        events.last(),
        Some(&EngineEvent::AnalysisFinished {
            run: 5,
            result: Err("injected".to_string())
        })
    );
}

#[test]
fn cancelled_upload_goes_quiet() {
    let settings = SimulationSettings {
        tick_interval: Duration::from_millis(20),
        increment_min: 1,
        increment_max: 1,
        ..fast_settings()
    };
    let engine = EngineHandle::new(settings).expect("engine");
    engine.start_upload(11, "slow.pdf");
    drain_until(&engine, Duration::from_secs(2), |event| {
        matches!(event, EngineEvent::Progress(_))
    });
    engine.cancel_upload(11);

    // Commands are processed in order, so the task is gone once a later command lands.
    let start = Instant::now();
    while engine.active_uploads() > 0 && start.elapsed() < Duration::from_secs(2) {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(engine.active_uploads(), 0);

    // At most one tick can already be past its cancellation check.
    std::thread::sleep(Duration::from_millis(50));
    while engine.try_recv().is_some() {}
    std::thread::sleep(Duration::from_millis(100));
    assert!(engine.try_recv().is_none());
}
