//! End-to-end tests for the quantity synchronizer over HTTP.
//!
//! The debounce is shortened to keep the suite fast; the real-time waits use
//! [`wait_until`] rather than fixed sleeps where possible.

use std::sync::Arc;
use std::time::Duration;

use ammonader_core::{LineKey, MoneyFormat};
use ammonader_integration_tests::{FakeCartServer, RecordingView, wait_until};
use ammonader_storefront::cart::{
    CartMessages, CartServices, CommitOutcome, ControlState, Direction, QuantityControl,
    QuantitySynchronizer,
};
use ammonader_storefront::config::{QuantitySettings, StorefrontConfig};
use ammonader_storefront::shopify::AjaxCartClient;

const DEBOUNCE: Duration = Duration::from_millis(20);

fn synchronizer(
    server: &FakeCartServer,
    key: &str,
    quantity: u32,
    max: Option<u32>,
) -> (QuantitySynchronizer, Arc<RecordingView>) {
    let config = StorefrontConfig::new(server.base_url().clone());
    let client = Arc::new(AjaxCartClient::new(&config).expect("Failed to create cart client"));
    let view = RecordingView::showing(quantity);
    let services = CartServices::new(MoneyFormat::default(), view.clone(), CartMessages::default());

    let sync = QuantitySynchronizer::new(
        QuantityControl::new(LineKey::from(key), quantity, max),
        client,
        view.clone(),
        services,
        QuantitySettings {
            debounce: DEBOUNCE,
            ..QuantitySettings::default()
        },
    );
    (sync, view)
}

#[tokio::test]
async fn test_rapid_increments_send_one_request() {
    let server = FakeCartServer::start().await;
    server.seed_line("101:a", 101, 3, 15_000);
    let (sync, view) = synchronizer(&server, "101:a", 3, Some(5));

    sync.step(Direction::Increment);
    sync.step(Direction::Increment);

    assert!(wait_until(|| !server.change_calls().is_empty()).await);
    assert!(wait_until(|| !view.state().locked && view.state().item_count.is_some()).await);
    tokio::time::sleep(DEBOUNCE * 3).await;

    assert_eq!(server.change_calls(), vec![("101:a".to_string(), 5)]);
    let state = view.state();
    assert_eq!(state.displayed, "5");
    assert_eq!(state.message, None);
    assert_eq!(state.line_total.as_deref(), Some("LE 750.00"));
    assert_eq!(state.cart_total.as_deref(), Some("LE 750.00"));
    assert_eq!(state.item_count, Some(5));
    assert_eq!(sync.snapshot().confirmed(), 5);
}

#[tokio::test]
async fn test_increment_at_limit_sends_nothing() {
    let server = FakeCartServer::start().await;
    server.seed_line("101:a", 101, 5, 15_000);
    let (sync, view) = synchronizer(&server, "101:a", 5, Some(5));

    sync.step(Direction::Increment);
    tokio::time::sleep(DEBOUNCE * 5).await;

    assert!(server.change_calls().is_empty());
    assert_eq!(view.state().displayed, "5");
    assert_eq!(view.state().message.as_deref(), Some("متاح فقط 5 قطع."));
}

#[tokio::test]
async fn test_typing_zero_empties_cart() {
    let server = FakeCartServer::start().await;
    server.seed_line("101:a", 101, 2, 15_000);
    let (sync, view) = synchronizer(&server, "101:a", 2, None);

    sync.input("0");

    assert!(wait_until(|| view.state().empty_message.is_some()).await);
    let state = view.state();
    assert!(!state.attached);
    assert_eq!(state.empty_message.as_deref(), Some("السلة فارغة"));
    assert_eq!(state.item_count, Some(0));
    assert_eq!(sync.snapshot().state(), ControlState::Removed);
}

#[tokio::test]
async fn test_server_error_reverts() {
    let server = FakeCartServer::start().await;
    server.seed_line("101:a", 101, 3, 15_000);
    server.fail_with(500, None);
    let (sync, view) = synchronizer(&server, "101:a", 3, None);

    sync.input("4");
    sync.cancel_pending();
    let outcome = sync.commit().await;

    assert!(matches!(outcome, CommitOutcome::Reverted { confirmed: 3, .. }));
    let state = view.state();
    assert_eq!(state.displayed, "3");
    assert_eq!(
        state.message.as_deref(),
        Some("حدث خطأ أثناء تحديث السلة. تم استعادة الكمية السابقة.")
    );
    assert!(!state.locked);
    assert_eq!(state.focus_calls, 1);
}

#[tokio::test]
async fn test_over_limit_is_clamped() {
    let server = FakeCartServer::start().await;
    server.seed_line("101:a", 101, 2, 15_000);
    let (sync, view) = synchronizer(&server, "101:a", 2, Some(4));

    sync.input("10");
    sync.cancel_pending();
    let outcome = sync.commit().await;

    assert!(matches!(outcome, CommitOutcome::Confirmed { quantity: 4 }));
    assert_eq!(server.change_calls(), vec![("101:a".to_string(), 4)]);
    assert_eq!(view.state().displayed, "4");
    assert_eq!(view.state().message.as_deref(), Some("متاح فقط 4 قطع."));
}

#[tokio::test]
async fn test_invalid_input_sends_nothing() {
    let server = FakeCartServer::start().await;
    server.seed_line("101:a", 101, 2, 15_000);
    let (sync, view) = synchronizer(&server, "101:a", 2, None);

    sync.input("-1");
    tokio::time::sleep(DEBOUNCE * 5).await;
    sync.input("abc");
    tokio::time::sleep(DEBOUNCE * 5).await;

    assert!(server.change_calls().is_empty());
    assert!(!view.state().locked);
    assert_eq!(sync.snapshot().displayed(), "abc");
}
