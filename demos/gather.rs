use std::time::Duration;

use gatherwait::{Config, Gather, config::DEFAULT_MAX_DELAY, gather};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Ten milliseconds per unit keeps the demo short.
    let gather = Gather::new(Config::default().with_time_unit(Duration::from_millis(10)));

    println!("wait_random: {}", gather.wait_random(DEFAULT_MAX_DELAY).await);
    println!("wait_n(5): {:?}", gather.wait_n(5, DEFAULT_MAX_DELAY).await);

    let task = gather.task_wait_random(DEFAULT_MAX_DELAY);
    let handle = task.handle();
    handle.cancel();
    println!("canceled task: {:?}", task.await);

    println!(
        "task_wait_n(5): {:?}",
        gather.task_wait_n(5, DEFAULT_MAX_DELAY).await
    );

    let tasks: Vec<_> = (0..5)
        .map(|_| gather.task_wait_random(DEFAULT_MAX_DELAY))
        .collect();
    tasks[0].handle().cancel();
    match gather::gather_tasks(tasks).await {
        Ok(delays) => println!("gather_tasks(5): {delays:?}"),
        Err(e) => eprintln!("gather_tasks failed: {e}"),
    }

    let average = tokio::task::spawn_blocking(move || gather.measure_time(50, DEFAULT_MAX_DELAY))
        .await
        .unwrap();
    println!("measure_time(50): {average:?} per delay");
}
