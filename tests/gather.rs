use std::time::{Duration, Instant};

use gatherwait::{Config, Error, Gather, Task, gather};

fn fast_gather(time_unit: Duration) -> Gather {
    Gather::new(Config::default().with_time_unit(time_unit))
}

fn is_sorted(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

const BOUNDS: [f64; 5] = [0.5, 1.0, 2.5, 5.0, 10.0];

#[tokio::test(flavor = "multi_thread")]
async fn wait_n_returns_sorted_values_within_bound() {
    let gather = fast_gather(Duration::from_millis(1));

    for bound in BOUNDS {
        for n in [1, 5, 20] {
            let delays = gather.wait_n(n, bound).await;
            assert_eq!(delays.len(), n, "There should be exactly {n} delays");
            assert!(
                delays.iter().all(|d| (0.0..=bound).contains(d)),
                "Every delay should be within [0, {bound}]: {delays:?}"
            );
            assert!(is_sorted(&delays), "Delays should be ascending: {delays:?}");
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn wait_n_with_zero_count_is_empty() {
    let delays = fast_gather(Duration::from_millis(1)).wait_n(0, 10.0).await;
    assert!(delays.is_empty(), "No delays should be produced for n = 0");
}

#[tokio::test(flavor = "multi_thread")]
async fn wait_n_with_zero_bound_yields_zeros() {
    // Zero bound means zero suspension, so the default one second unit is fine.
    let delays = gather::wait_n(5, 0.0).await;
    assert_eq!(delays, vec![0.0; 5], "A zero bound should only produce zeros");
}

#[tokio::test(flavor = "multi_thread")]
async fn wait_random_treats_negative_bound_as_zero() {
    let delay = gather::wait_random(-3.0).await;
    assert_eq!(delay, 0.0, "A negative bound should collapse to zero");

    let delay = gather::wait_random(f64::NAN).await;
    assert_eq!(delay, 0.0, "A NaN bound should collapse to zero");
}

#[tokio::test(flavor = "multi_thread")]
async fn sorting_gathered_delays_is_idempotent() {
    let delays = fast_gather(Duration::from_millis(1)).wait_n(15, 10.0).await;
    let mut resorted = delays.clone();
    resorted.sort_by(f64::total_cmp);
    assert_eq!(delays, resorted, "Sorting again should not change the order");
}

#[tokio::test(flavor = "multi_thread")]
async fn wait_n_suspends_concurrently() {
    let time_unit = Duration::from_millis(10);
    let gather = fast_gather(time_unit);

    let start = Instant::now();
    let delays = gather.wait_n(20, 10.0).await;
    let elapsed = start.elapsed();

    let longest = time_unit.mul_f64(*delays.last().unwrap());
    assert!(
        elapsed + Duration::from_millis(1) >= longest,
        "Gathering should wait for the longest delay ({longest:?}), took {elapsed:?}"
    );
    // Run one after another, twenty delays of up to 100ms would average ~1s.
    assert!(
        elapsed < Duration::from_millis(600),
        "Delays should overlap, took {elapsed:?}"
    );
}

#[test]
fn measure_time_reports_average_per_delay() {
    let gather = fast_gather(Duration::from_millis(1));

    let average = gather.measure_time(5, 10.0);
    assert!(
        average <= Duration::from_millis(10),
        "Average should not exceed the longest possible delay, got {average:?}"
    );

    assert_eq!(
        gather.measure_time(0, 10.0),
        Duration::ZERO,
        "Measuring zero delays should report zero"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn task_wait_n_matches_wait_n_contract() {
    let gather = fast_gather(Duration::from_millis(1));

    for bound in BOUNDS {
        let delays = gather.task_wait_n(10, bound).await;
        assert_eq!(delays.len(), 10, "There should be exactly 10 delays");
        assert!(
            delays.iter().all(|d| (0.0..=bound).contains(d)),
            "Every delay should be within [0, {bound}]: {delays:?}"
        );
        assert!(is_sorted(&delays), "Delays should be ascending: {delays:?}");
    }

    let none = gather.task_wait_n(0, 10.0).await;
    assert!(none.is_empty(), "No delays should be produced for n = 0");

    let zeros = gather::task_wait_n(5, 0.0).await;
    assert_eq!(zeros, vec![0.0; 5], "A zero bound should only produce zeros");
}

#[tokio::test(flavor = "multi_thread")]
async fn gather_tasks_returns_sorted_values() {
    let gather = fast_gather(Duration::from_millis(1));

    let tasks: Vec<_> = (0..6).map(|_| gather.task_wait_random(2.5)).collect();
    let delays = gather::gather_tasks(tasks).await.unwrap();
    assert_eq!(delays.len(), 6, "Every task should contribute a delay");
    assert!(
        delays.iter().all(|d| (0.0..=2.5).contains(d)),
        "Every delay should be within [0, 2.5]: {delays:?}"
    );
    assert!(is_sorted(&delays), "Delays should be ascending: {delays:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn gather_tasks_fails_when_one_task_is_canceled() {
    let gather = fast_gather(Duration::from_millis(1));

    let tasks: Vec<_> = (0..6).map(|_| gather.task_wait_random(10.0)).collect();
    let handles: Vec<_> = tasks.iter().map(Task::handle).collect();
    handles[3].cancel();

    let result = gather::gather_tasks(tasks).await;
    assert!(
        matches!(result, Err(Error::Canceled)),
        "A canceled task should fail the whole gather, got {result:?}"
    );
    for (i, handle) in handles.iter().enumerate() {
        if i == 3 {
            assert!(handle.is_canceled(), "Task 3 should be canceled");
        } else {
            assert!(handle.is_completed(), "Task {i} should still run to completion");
        }
    }
}

#[test]
fn gather_runs_on_smol() {
    let gather = fast_gather(Duration::from_millis(1));
    let delays = smol::block_on(gather.task_wait_n(8, 2.5));
    assert_eq!(delays.len(), 8, "Gathering should work outside tokio");
    assert!(is_sorted(&delays), "Delays should be ascending: {delays:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn delay_tasks_can_be_spawned() {
    let gather = fast_gather(Duration::from_millis(1));

    let handles: Vec<_> = (0..4)
        .map(|_| tokio::spawn(gather.task_wait_random(10.0)))
        .collect();

    for handle in handles {
        let delay = handle.await.unwrap().unwrap();
        assert!((0.0..=10.0).contains(&delay), "Spawned delay out of range: {delay}");
    }
}
