use futures::StreamExt;
use gatherwait::{Comprehension, Config};
use macro_rules_attribute::apply;
use smol_macros::main;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[apply(main!)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let comprehension = Comprehension::new(Config::default().with_tick(Duration::from_millis(100)));

    let mut generator = comprehension.async_generator();
    while let Some(value) = generator.next().await {
        println!("Generated {value:.3}");
    }

    println!("Comprehension: {:?}", comprehension.async_comprehension().await);

    // Four drains of ten ticks each finish in about one second, not four.
    let runtime = comprehension.measure_runtime().await;
    println!("Four parallel comprehensions took {runtime:?}");
}
