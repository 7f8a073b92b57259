mod common;

use std::collections::VecDeque;

use common::*;
use embassy_time::Duration;
use lxx_agenda_common::*;
use lxx_agenda_graphics::SIGNAL_WINDOW;

fn full_frames(world: &World) -> usize {
    world
        .frames
        .iter()
        .filter(|f| f.mode == RefreshMode::Full)
        .count()
}

fn assert_slept(world: &World) {
    assert!(world.slept);
    assert!(world.hibernated);
    assert_eq!(world.armed, Some(Duration::from_secs(30 * 60)));
    assert_eq!(world.events.last().map(String::as_str), Some("sleep"));
}

#[test]
fn scenario_a_both_feeds_render_full_frame() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.pubsub.deliveries = vec![
        direct(Trigger::AfterReady(200), "calendar/hall/events", SCHEDULE),
        direct(Trigger::AfterReady(700), "calendar/hall/weather", WEATHER),
    ];

    let outcome = run(&mut ctx, &config());

    assert_eq!(outcome.error, None);
    assert_eq!(outcome.stage, CycleStage::Sleep);
    assert_eq!(outcome.connectivity, ConnectivityState::Subscribed);
    let arrival = outcome.arrival.unwrap();
    assert!(arrival.is_complete());
    assert_eq!(arrival.elapsed, Duration::from_millis(700));

    let world = world.borrow();
    // 加载提示 + 最终画面
    assert_eq!(outcome.full_refreshes, 2);
    assert_eq!(outcome.partial_refreshes, 0);
    assert_eq!(full_frames(&world), 2);
    for frame in &world.frames {
        assert_eq!(frame.window, PageWindow::FULL_SCREEN);
        assert_eq!(frame.pages, 3);
        assert!(frame.inked);
    }
    assert!(world.events.contains(&String::from("mqtt:disconnect")));
    assert!(world.events.contains(&String::from("wifi:disconnect")));
    assert_slept(&world);
}

#[test]
fn scenario_b_no_network_only_clears_indicator() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.wifi.connect_after_ms = None;

    let outcome = run(&mut ctx, &config());

    assert_eq!(outcome.error, Some(SystemError::NetworkUnavailable));
    assert_eq!(outcome.stage, CycleStage::NetworkAssociate);
    assert_eq!(outcome.full_refreshes, 0);
    assert_eq!(outcome.partial_refreshes, 1);
    assert!(outcome.arrival.is_none());

    let world = world.borrow();
    assert_eq!(world.frames.len(), 1);
    let frame = &world.frames[0];
    assert_eq!(frame.mode, RefreshMode::Partial);
    assert_eq!(frame.window, SIGNAL_WINDOW);
    // 60 次 500 ms 轮询
    assert_eq!(world.now_ms(), 30_000);
    assert!(!world.events.iter().any(|e| e.starts_with("sntp")));
    assert!(!world.events.iter().any(|e| e.starts_with("mqtt:connect")));
    assert_slept(&world);
}

#[test]
fn scenario_c_no_data_shows_timeout_screen() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());

    let outcome = run(&mut ctx, &config());

    assert_eq!(outcome.error, Some(SystemError::DataTimeout));
    assert_eq!(outcome.stage, CycleStage::AwaitData);
    let arrival = outcome.arrival.unwrap();
    assert!(arrival.is_empty());
    assert_eq!(arrival.elapsed, Duration::from_secs(60));
    assert_eq!(outcome.full_refreshes, 2);
    assert_eq!(outcome.partial_refreshes, 0);

    let world = world.borrow();
    assert_eq!(full_frames(&world), 2);
    assert_slept(&world);
}

#[test]
fn partial_data_still_renders() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.pubsub.deliveries = vec![direct(
        Trigger::AfterReady(3_000),
        "calendar/hall/weather",
        WEATHER,
    )];

    let outcome = run(&mut ctx, &config());

    assert_eq!(outcome.error, None);
    assert_eq!(outcome.stage, CycleStage::Sleep);
    let arrival = outcome.arrival.unwrap();
    assert!(arrival.is_partial());
    assert!(arrival.weather);
    assert_eq!(arrival.elapsed, Duration::from_secs(60));
    assert_eq!(outcome.full_refreshes, 2);
}

#[test]
fn unparseable_feed_is_not_an_error() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.pubsub.deliveries = vec![
        direct(Trigger::AfterReady(100), "calendar/hall/events", "not json at all"),
        direct(Trigger::AfterReady(100), "calendar/hall/weather", WEATHER),
    ];

    let outcome = run(&mut ctx, &config());
    assert_eq!(outcome.error, None);
    assert_eq!(outcome.full_refreshes, 2);
}

#[test]
fn missing_private_key_fails_after_loading_indicator() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.credentials.private_key = Some(Vec::new());

    let outcome = run(&mut ctx, &config());

    assert_eq!(
        outcome.error,
        Some(SystemError::CredentialMissing(CredentialKind::PrivateKey))
    );
    assert_eq!(outcome.stage, CycleStage::CertificateLoad);
    assert_eq!(outcome.full_refreshes, 2);
    assert_eq!(outcome.partial_refreshes, 0);

    let world = world.borrow();
    assert!(!world.events.iter().any(|e| e.starts_with("mqtt:connect")));
    assert_slept(&world);
}

#[test]
fn unreadable_trust_anchor_is_reported() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.credentials.trust_anchor = None;

    let outcome = run(&mut ctx, &config());
    assert_eq!(
        outcome.error,
        Some(SystemError::CredentialMissing(CredentialKind::TrustAnchor))
    );
}

#[test]
fn time_sync_gives_up_after_ten_attempts() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.sntp.answers = VecDeque::from([Ok(0)]);

    let outcome = run(&mut ctx, &config());

    assert_eq!(outcome.error, Some(SystemError::TimeSyncFailed));
    assert_eq!(outcome.stage, CycleStage::TimeSync);
    assert_eq!(outcome.full_refreshes, 2);

    let world = world.borrow();
    assert_eq!(world.events.iter().filter(|e| *e == "sntp").count(), 10);
    // 1.5 s 关联 + 9 次 1 s 间隔
    assert_eq!(world.now_ms(), 1_500 + 9_000);
}

#[test]
fn time_sync_retries_until_clock_is_valid() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.sntp.answers = VecDeque::from([Err(()), Ok(12), Ok(NOW)]);
    ctx.pubsub.deliveries = vec![
        direct(Trigger::AfterReady(0), "calendar/hall/events", SCHEDULE),
        direct(Trigger::AfterReady(0), "calendar/hall/weather", WEATHER),
    ];

    let outcome = run(&mut ctx, &config());
    assert_eq!(outcome.error, None);

    let world = world.borrow();
    let (_, ready) = world
        .published
        .iter()
        .find(|(topic, _)| topic == "calendar/hall/status")
        .unwrap();
    let ready: serde_json::Value = serde_json::from_slice(ready).unwrap();
    assert_eq!(ready["status"], "ready");
    assert_eq!(ready["timestamp"], NOW);
}

#[test]
fn rejected_connection_is_terminal() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.pubsub.refuse_connect = true;

    let outcome = run(&mut ctx, &config());

    assert_eq!(outcome.error, Some(SystemError::SecureConnectFailed));
    assert_eq!(outcome.stage, CycleStage::SecureConnect);
    assert_eq!(outcome.connectivity, ConnectivityState::Associated);
    assert!(!world.borrow().events.iter().any(|e| e == "mqtt:disconnect"));
}

#[test]
fn unacknowledged_subscription_is_terminal() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.pubsub.refuse_subscribe = Some(String::from("calendar/hall/weather"));

    let outcome = run(&mut ctx, &config());

    assert_eq!(outcome.error, Some(SystemError::SubscribeFailed));
    assert_eq!(outcome.stage, CycleStage::Subscribe);
    assert!(
        !world
            .borrow()
            .events
            .iter()
            .any(|e| e == "publish:calendar/hall/status")
    );
}

#[test]
fn subscriptions_precede_ready_announcement() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.pubsub.deliveries = vec![
        direct(Trigger::AfterReady(0), "calendar/hall/events", SCHEDULE),
        direct(Trigger::AfterReady(0), "calendar/hall/weather", WEATHER),
    ];

    run(&mut ctx, &config());

    let world = world.borrow();
    let relevant: Vec<&str> = world
        .events
        .iter()
        .filter(|e| e.starts_with("subscribe:") || e.starts_with("publish:"))
        .map(String::as_str)
        .collect();
    assert_eq!(
        relevant,
        [
            "subscribe:$aws/things/hall/shadow/update/delta",
            "subscribe:$aws/things/hall/shadow/get/accepted",
            "subscribe:calendar/hall/events",
            "subscribe:calendar/hall/weather",
            "publish:$aws/things/hall/shadow/get",
            "publish:calendar/hall/status",
        ]
    );

    let (_, get_payload) = &world.published[0];
    assert!(get_payload.is_empty());
}

#[test]
fn persisted_shadow_state_completes_without_waiting() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.pubsub.shadow_response = Some(format!(
        r#"{{"state":{{"desired":{{"weather":{WEATHER},"calendar":{SCHEDULE}}}}},"version":3}}"#
    ));

    let outcome = run(&mut ctx, &config());

    assert_eq!(outcome.error, None);
    let arrival = outcome.arrival.unwrap();
    assert!(arrival.is_complete());
    assert_eq!(arrival.elapsed, Duration::from_millis(0));
}

#[test]
fn cleared_shadow_fields_do_not_end_the_wait() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.pubsub.shadow_response =
        Some(String::from(r#"{"state":{"desired":{"weather":null,"calendar":null}}}"#));
    ctx.pubsub.deliveries = vec![direct(
        Trigger::AfterReady(2_500),
        "calendar/hall/events",
        SCHEDULE,
    )];

    let outcome = run(&mut ctx, &config());

    assert_eq!(outcome.error, None);
    let arrival = outcome.arrival.unwrap();
    assert!(arrival.schedule);
    assert!(!arrival.weather);
    assert_eq!(arrival.elapsed, Duration::from_secs(60));
}

#[test]
fn shadow_delta_and_direct_topics_combine() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.pubsub.deliveries = vec![
        direct(
            Trigger::AfterReady(400),
            "$aws/things/hall/shadow/update/delta",
            &format!(r#"{{"state":{{"desired":{{"weather":{WEATHER}}}}}}}"#),
        ),
        direct(Trigger::AfterReady(1_200), "calendar/hall/events", SCHEDULE),
    ];

    let outcome = run(&mut ctx, &config());

    let arrival = outcome.arrival.unwrap();
    assert!(arrival.is_complete());
    assert_eq!(arrival.elapsed, Duration::from_millis(1_200));
}

#[test]
fn data_published_during_settle_is_kept() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.pubsub.deliveries = vec![
        direct(Trigger::Immediately, "calendar/hall/events", SCHEDULE),
        direct(Trigger::Immediately, "calendar/hall/weather", WEATHER),
    ];

    let outcome = run(&mut ctx, &config());
    assert_eq!(outcome.error, None);
    assert_eq!(outcome.arrival.unwrap().elapsed, Duration::from_millis(0));
}

#[test]
fn publish_failures_do_not_abort_cycle() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.pubsub.refuse_publish = true;
    ctx.pubsub.deliveries = vec![
        direct(Trigger::Immediately, "calendar/hall/events", SCHEDULE),
        direct(Trigger::Immediately, "calendar/hall/weather", WEATHER),
    ];

    let outcome = run(&mut ctx, &config());
    assert_eq!(outcome.error, None);
    assert_eq!(outcome.stage, CycleStage::Sleep);
}

#[test]
fn invalid_config_behaves_like_missing_network() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    let mut config = config();
    config.network_config.wifi_ssid.clear();

    let outcome = run(&mut ctx, &config);

    assert_eq!(outcome.error, Some(SystemError::InvalidConfig("wifi ssid")));
    assert_eq!(outcome.full_refreshes, 0);
    assert_eq!(outcome.partial_refreshes, 1);
    let world = world.borrow();
    assert!(!world.events.iter().any(|e| e.starts_with("wifi:connect")));
    assert_slept(&world);
}

#[test]
fn panel_failure_still_sleeps() {
    let world = Shared::default();
    let mut ctx = healthy_context(world.clone());
    ctx.epd.fail = true;

    let outcome = run(&mut ctx, &config());

    assert_eq!(outcome.error, Some(SystemError::DisplayError));
    assert_eq!(outcome.stage, CycleStage::DisplayLoadingIndicator);
    assert_slept(&world.borrow());
}

#[test]
fn core_main_platform_init_builds_fresh_context() {
    let ctx = embassy_futures::block_on(<MockPlatform as PlatformTrait>::init());
    assert_eq!(ctx.wifi.rssi, -45);
    assert!(ctx.pubsub.deliveries.is_empty());
}
