//! End-to-end scenario runs on the virtual clock.

use pen_core::{PenSpec, PensConfig, Rect, NO_HUMANS_LEFT};
use pen_sim::scenarios::ScenarioId;
use pen_sim::ScenarioRunner;

#[tokio::test]
async fn test_starvation_empties_pens() {
    let result = ScenarioRunner::new(42).run(ScenarioId::Starvation).await.unwrap();
    
    assert!(result.passed, "{:?}", result.failure_reason);
    // Default farm: 3 + 2 humans, one lost per pen per month
    assert_eq!(result.final_population, 0);
    assert_eq!(result.starvations, 5);
    assert_eq!(result.births, 0);
    assert!(result
        .notifications
        .iter()
        .all(|n| n.contains("has died from starvation")));
}

#[tokio::test]
async fn test_feast_ends_with_single_popup() {
    let result = ScenarioRunner::new(7).with_months(2).run(ScenarioId::Feast).await.unwrap();
    
    assert!(result.passed, "{:?}", result.failure_reason);
    assert_eq!(result.eaten, 5);
    assert_eq!(result.resources, 250);
    assert_eq!(result.notifications.iter().filter(|n| *n == NO_HUMANS_LEFT).count(), 1);
}

#[tokio::test]
async fn test_shuttle_conserves_population() {
    let result = ScenarioRunner::new(3).with_months(3).run(ScenarioId::Shuttle).await.unwrap();
    
    assert!(result.passed, "{:?}", result.failure_reason);
    assert!(result.player.pickups > 0);
    assert_eq!(result.player.pickups, result.player.deposits);
}

#[tokio::test]
async fn test_breeding_adds_humans() {
    let result = ScenarioRunner::new(99).run(ScenarioId::Breeding).await.unwrap();
    
    assert!(result.passed, "{:?}", result.failure_reason);
    assert_eq!(result.final_population, result.initial_population + result.births);
}

#[tokio::test]
async fn test_mixed_accounting_over_seeds() {
    for seed in 0..5 {
        let result = ScenarioRunner::new(seed).with_months(6).run(ScenarioId::Mixed).await.unwrap();
        assert!(result.passed, "seed {}: {:?}", seed, result.failure_reason);
    }
}

#[tokio::test]
async fn test_coarse_frame_rate() {
    let result = ScenarioRunner::new(5)
        .with_months(3)
        .with_frames_per_month(3)
        .run(ScenarioId::Starvation)
        .await
        .unwrap();
    
    assert!(result.passed, "{:?}", result.failure_reason);
    assert_eq!(result.starvations, 5);
    assert_eq!(result.final_population, 0);
}

#[tokio::test]
async fn test_custom_config() {
    let config = PensConfig {
        pens: vec![PenSpec {
            title: "Solo".to_string(),
            humans: 1,
            food: 0,
            bounds: Rect::default(),
        }],
        ..PensConfig::default()
    };
    
    let result = ScenarioRunner::new(1)
        .with_months(1)
        .with_config(config)
        .run(ScenarioId::Starvation)
        .await
        .unwrap();
    
    assert!(result.passed, "{:?}", result.failure_reason);
    assert_eq!(result.final_population, 0);
    assert_eq!(
        result.notifications,
        vec!["Human from Solo has died from starvation\nFeed them each month!"]
    );
}
