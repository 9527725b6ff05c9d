// tests/aggregator_tests.rs
use anyhow::anyhow;
use health_aggregator::config::{parse_config, AggregatorConfig, ProbeConfig};
use health_aggregator::health::{collect_results, FailureCause};
use health_aggregator::probe::HttpProbe;
use health_aggregator::{check_all, CheckResult, HealthAggregator, Target};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn targets(ids: &[&str]) -> Vec<Target> {
    ids.iter().map(|id| Target::from(*id)).collect()
}

#[tokio::test]
async fn test_empty_targets_never_invoke_check() {
    let calls = Arc::new(Mutex::new(0usize));
    let counter = calls.clone();

    let verdict = check_all(
        Vec::new(),
        move |_| {
            *counter.lock().unwrap() += 1;
            async { Ok::<_, anyhow::Error>(CheckResult::new(500, "")) }
        },
        Duration::from_secs(1),
    )
    .await
    .unwrap();

    assert!(verdict);
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_each_target_checked_exactly_once() {
    let seen: Arc<Mutex<HashMap<Target, usize>>> = Arc::default();
    let recorder = seen.clone();

    let verdict = check_all(
        targets(&["http://t1", "http://t2"]),
        move |target| {
            *recorder.lock().unwrap().entry(target).or_default() += 1;
            async { Ok::<_, anyhow::Error>(CheckResult::new(200, "ok")) }
        },
        Duration::from_secs(1),
    )
    .await
    .unwrap();

    assert!(verdict);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen.get(&Target::from("http://t1")), Some(&1));
    assert_eq!(seen.get(&Target::from("http://t2")), Some(&1));
}

#[tokio::test]
async fn test_unhealthy_result_is_a_false_verdict() {
    let verdict = check_all(
        targets(&["up", "down"]),
        |target| async move {
            let status = if target.as_str() == "up" { 200 } else { 500 };
            Ok::<_, anyhow::Error>(CheckResult::new(status, "body"))
        },
        Duration::from_secs(1),
    )
    .await
    .unwrap();

    assert!(!verdict);
}

#[tokio::test]
async fn test_failing_check_fails_the_batch() {
    let failure = check_all(
        targets(&["t1", "t2"]),
        |target| async move {
            if target.as_str() == "t1" {
                Err(anyhow!("connection reset"))
            } else {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(CheckResult::new(200, "ok"))
            }
        },
        Duration::from_secs(1),
    )
    .await
    .unwrap_err();

    assert_eq!(failure.target, Target::from("t1"));
    assert!(matches!(failure.cause, FailureCause::Check(_)));
}

#[tokio::test]
async fn test_deadline_fails_the_slow_target() {
    let started = Instant::now();

    let failure = check_all(
        targets(&["fast", "slow"]),
        |target| async move {
            if target.as_str() == "slow" {
                tokio::time::sleep(Duration::from_secs(10)).await;
            }
            Ok::<_, anyhow::Error>(CheckResult::new(200, "ok"))
        },
        Duration::from_millis(100),
    )
    .await
    .unwrap_err();

    assert_eq!(failure.target, Target::from("slow"));
    assert!(failure.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_checks_run_concurrently() {
    let delay = Duration::from_millis(200);
    let ids: Vec<String> = (0..5).map(|i| format!("svc-{}", i)).collect();
    let batch: Vec<Target> = ids.into_iter().map(Target::from).collect();

    let started = Instant::now();
    let verdict = check_all(
        batch,
        move |_| async move {
            tokio::time::sleep(delay).await;
            Ok::<_, anyhow::Error>(CheckResult::new(200, "ok"))
        },
        Duration::from_secs(5),
    )
    .await
    .unwrap();
    let elapsed = started.elapsed();

    assert!(verdict);
    assert!(elapsed >= delay);
    // serial execution would take five times the delay
    assert!(elapsed < delay * 3, "took {:?}", elapsed);
}

#[tokio::test]
async fn test_collect_results_pairs_targets_with_results() {
    let results = collect_results(
        targets(&["a", "b"]),
        |target| async move { Ok::<_, anyhow::Error>(CheckResult::new(200, target.to_string())) },
        Duration::from_secs(1),
    )
    .await
    .unwrap();

    assert_eq!(
        results,
        vec![
            (Target::from("a"), CheckResult::new(200, "a")),
            (Target::from("b"), CheckResult::new(200, "b")),
        ]
    );
}

#[tokio::test]
async fn test_aggregator_with_http_probe() {
    let mut healthy = mockito::Server::new_async().await;
    let mut degraded = mockito::Server::new_async().await;

    healthy
        .mock("GET", "/health")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;
    degraded
        .mock("GET", "/health")
        .with_status(503)
        .with_body("overloaded")
        .create_async()
        .await;

    let probe = Arc::new(
        HttpProbe::new(ProbeConfig {
            path: Some("/health".to_string()),
            ..ProbeConfig::default()
        })
        .unwrap(),
    );
    let aggregator = HealthAggregator::new(AggregatorConfig::default());

    let all_up = aggregator
        .check_all_with_probe(vec![Target::from(healthy.url())], probe.clone())
        .await
        .unwrap();
    assert!(all_up);

    let mixed = aggregator
        .check_all_with_probe(
            vec![Target::from(healthy.url()), Target::from(degraded.url())],
            probe.clone(),
        )
        .await
        .unwrap();
    assert!(!mixed);

    let unreachable = aggregator
        .check_all_with_probe(
            vec![Target::from(healthy.url()), Target::from("http://127.0.0.1:1")],
            probe,
        )
        .await
        .unwrap_err();
    assert_eq!(unreachable.target, Target::from("http://127.0.0.1:1"));
}

#[tokio::test]
async fn test_check_config_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("ok")
        .expect(1)
        .create_async()
        .await;

    let config = parse_config(
        &format!(
            "targets:\n  - {}\naggregator:\n  timeout_secs: 18446744073709551615\nprobe:\n  path: /health\n",
            server.url()
        ),
        true,
    )
    .unwrap();

    let verdict = HealthAggregator::check_config(&config).await.unwrap();
    assert!(verdict);
    mock.assert_async().await;
}
