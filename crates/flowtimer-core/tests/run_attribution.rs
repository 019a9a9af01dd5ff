//! End-to-end runs through engine, effect router, and database.
//!
//! Drives the countdown tick by tick the way the CLI driver does and
//! verifies that attribution lands in the task store.

use flowtimer_core::{
    AttributionPolicy, Database, EffectRouter, Flow, FlowEngine, NotifyKind, Phase, Step,
    TaskRecord,
};

fn pomodoro_flow() -> Flow {
    Flow::new(vec![
        Step::Loop {
            count: 2,
            children: vec![
                Step::Timer { minutes: 1 },
                Step::Notification {
                    kind: NotifyKind::Sound,
                },
            ],
        },
    ])
}

fn drive_to_completion(engine: &mut FlowEngine, router: &EffectRouter<'_>) -> u64 {
    let mut ticks = 0;
    loop {
        ticks += 1;
        if let Some(event) = engine.tick() {
            router.handle(&event);
            return ticks;
        }
    }
}

#[test]
fn completed_run_lands_in_the_task_total() {
    let db = Database::open_memory().unwrap();
    let task = TaskRecord::new("deep work");
    db.create_task(&task).unwrap();

    let router = EffectRouter::new(AttributionPolicy::Seconds).with_task_store(&db);
    let mut engine = FlowEngine::new();
    engine
        .start(&pomodoro_flow(), Some(task.id.clone()))
        .unwrap();
    assert_eq!(engine.total_secs(), 120);

    let ticks = drive_to_completion(&mut engine, &router);
    assert_eq!(ticks, 120);
    assert_eq!(engine.phase(), Phase::Idle);

    let loaded = db.get_task(&task.id).unwrap().unwrap();
    assert_eq!(loaded.total_secs, 120);

    let stats = db.stats().unwrap();
    assert_eq!(stats.completed_runs, 1);
    assert_eq!(stats.manual_stops, 0);
}

#[test]
fn manual_stop_attributes_elapsed_only() {
    let db = Database::open_memory().unwrap();
    let task = TaskRecord::new("deep work");
    db.create_task(&task).unwrap();

    let router = EffectRouter::new(AttributionPolicy::Seconds).with_task_store(&db);
    let mut engine = FlowEngine::new();
    engine
        .start(&pomodoro_flow(), Some(task.id.clone()))
        .unwrap();

    for _ in 0..30 {
        assert!(engine.tick().is_none());
    }
    let event = engine.stop().unwrap();
    router.handle(&event);

    let loaded = db.get_task(&task.id).unwrap().unwrap();
    assert_eq!(loaded.total_secs, 30);

    let stats = db.stats().unwrap();
    assert_eq!(stats.completed_runs, 0);
    assert_eq!(stats.manual_stops, 1);
}

#[test]
fn minute_floor_policy_floors_the_recorded_amount() {
    let db = Database::open_memory().unwrap();
    let task = TaskRecord::new("deep work");
    db.create_task(&task).unwrap();

    let router = EffectRouter::new(AttributionPolicy::MinuteFloor).with_task_store(&db);
    let mut engine = FlowEngine::new();
    engine
        .start(&pomodoro_flow(), Some(task.id.clone()))
        .unwrap();

    for _ in 0..90 {
        engine.tick();
    }
    router.handle(&engine.stop().unwrap());

    let loaded = db.get_task(&task.id).unwrap().unwrap();
    assert_eq!(loaded.total_secs, 60);
}

#[test]
fn run_without_a_selected_task_records_nothing() {
    let db = Database::open_memory().unwrap();
    let task = TaskRecord::new("bystander");
    db.create_task(&task).unwrap();

    let router = EffectRouter::new(AttributionPolicy::Seconds).with_task_store(&db);
    let mut engine = FlowEngine::new();
    engine.start(&pomodoro_flow(), None).unwrap();
    drive_to_completion(&mut engine, &router);

    assert_eq!(db.get_task(&task.id).unwrap().unwrap().total_secs, 0);
    assert_eq!(db.stats().unwrap().total_tracked_secs, 0);
}

#[test]
fn pause_and_resume_do_not_disturb_attribution() {
    let db = Database::open_memory().unwrap();
    let task = TaskRecord::new("deep work");
    db.create_task(&task).unwrap();

    let router = EffectRouter::new(AttributionPolicy::Seconds).with_task_store(&db);
    let mut engine = FlowEngine::new();
    engine
        .start(&pomodoro_flow(), Some(task.id.clone()))
        .unwrap();

    for _ in 0..10 {
        engine.tick();
    }
    engine.pause().unwrap();
    assert_eq!(engine.remaining_secs(), 110);
    engine.resume().unwrap();

    let ticks = drive_to_completion(&mut engine, &router);
    assert_eq!(ticks, 110);
    assert_eq!(db.get_task(&task.id).unwrap().unwrap().total_secs, 120);
}
