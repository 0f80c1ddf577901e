use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use sectorwatch_market_data::{NoPacing, Pacer};

use crate::breadth::BreadthCalculator;
use crate::test_support::MockGateway;

#[derive(Default)]
struct CountingPacer {
    waits: AtomicUsize,
}

#[async_trait]
impl Pacer for CountingPacer {
    async fn wait(&self) {
        self.waits.fetch_add(1, Ordering::SeqCst);
    }
}

fn symbols(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("S{}", i)).collect()
}

#[tokio::test]
async fn test_seven_of_ten_sampled_six_above() {
    let mut gateway = MockGateway::new();
    for (i, symbol) in symbols(7).iter().enumerate() {
        let close = if i < 6 { 110.0 } else { 90.0 };
        gateway = gateway.with_sample(symbol, close, 100.0);
    }
    // S7 fails outright, S8 and S9 return nothing
    gateway.fail_samples_for.insert("S7".to_string());
    let calculator = BreadthCalculator::new(Arc::new(gateway), Arc::new(NoPacing), 200);

    let summary = calculator.compute_breadth("Energy", &symbols(10)).await;

    assert_eq!(summary.sampled, 7);
    assert_eq!(summary.above, 6);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.market_breadth_pct(), Some(85.7));
}

#[tokio::test]
async fn test_every_call_is_paced() {
    let gateway = MockGateway::new().with_sample("S0", 1.0, 2.0);
    let pacer = Arc::new(CountingPacer::default());
    let calculator = BreadthCalculator::new(Arc::new(gateway), pacer.clone(), 200);

    calculator.compute_breadth("Energy", &symbols(4)).await;

    assert_eq!(pacer.waits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_unusable_sample_is_excluded() {
    let gateway = MockGateway::new()
        .with_sample("S0", 10.0, 0.0)
        .with_sample("S1", 10.0, 5.0);
    let calculator = BreadthCalculator::new(Arc::new(gateway), Arc::new(NoPacing), 200);

    let summary = calculator.compute_breadth("Energy", &symbols(2)).await;

    assert_eq!(summary.sampled, 1);
    assert_eq!(summary.market_breadth_pct(), Some(100.0));
}

#[tokio::test]
async fn test_no_samples_means_no_breadth() {
    let calculator = BreadthCalculator::new(Arc::new(MockGateway::new()), Arc::new(NoPacing), 200);

    let summary = calculator.compute_breadth("Energy", &symbols(3)).await;

    assert_eq!(summary.market_breadth_pct(), None);
}
