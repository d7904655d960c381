use super::*;

use crate::environment::StaticEnvironment;
use crate::model::Anchor;
use crate::persistence::{COMPLETED_KEY, PROGRESS_KEY};
use crate::storage::MemoryStore;

const SETTLE: Duration = Duration::from_millis(900);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn desktop() -> Viewport {
    Viewport {
        width: 1280,
        touch: false,
    }
}

fn phone() -> Viewport {
    Viewport {
        width: 390,
        touch: true,
    }
}

fn mount_at(path: &str) -> TourController<MemoryStore> {
    TourController::mount(Config::default(), MemoryStore::new(), path, desktop())
}

fn seller_env() -> StaticEnvironment {
    StaticEnvironment::with_anchors([
        "seller-shop-header",
        "seller-add-product-button",
        "seller-products-tab",
        "seller-orders-tab",
    ])
}

fn cart_env() -> StaticEnvironment {
    StaticEnvironment::with_anchors(["cart-items", "cart-summary", "checkout-button"])
}

fn marketplace_env() -> StaticEnvironment {
    StaticEnvironment::with_anchors(["marketplace-filters", "marketplace-sort", "product-card"])
}

/// Mounts on the seller dashboard and lets the page tour start.
fn running_seller_tour() -> (TourController<MemoryStore>, StaticEnvironment) {
    let env = seller_env();
    let mut c = mount_at("/seller");
    c.advance_time(SETTLE, &env);
    assert_eq!(c.phase(), Phase::Active);
    assert_eq!(c.mode(), TourMode::Normal);
    (c, env)
}

fn open_add_item_panel(c: &mut TourController<MemoryStore>, env: &mut StaticEnvironment) {
    env.insert("add-product-name");
    c.environment_mutated(env);
    assert_eq!(c.mode(), TourMode::AddItem);
}

fn next_n(c: &mut TourController<MemoryStore>, env: &StaticEnvironment, n: usize) -> Vec<Effect> {
    let mut effects = Vec::new();
    for _ in 0..n {
        effects = c.next(env);
    }
    effects
}

// ── Settling and viability ──

#[test]
fn fresh_mount_settles_then_starts_home_tour() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/");

    assert_eq!(c.phase(), Phase::Settling);
    assert!(!c.is_ready());

    c.advance_time(ms(899), &env);
    assert_eq!(c.phase(), Phase::Settling);

    c.advance_time(ms(1), &env);
    assert_eq!(c.phase(), Phase::Active);
    assert!(c.is_ready());
    assert_eq!(c.mode(), TourMode::Normal);
    assert_eq!(c.step_index(), 0);
    assert_eq!(c.steps().len(), 4);
}

#[test]
fn unresolved_page_anchors_fall_back() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/marketplace");
    c.advance_time(SETTLE, &env);

    assert_eq!(c.phase(), Phase::Active);
    assert_eq!(c.mode(), TourMode::Fallback);
    assert!(c.steps().iter().all(|s| s.anchor == Anchor::Centered));
}

#[test]
fn one_resolved_anchor_is_enough() {
    let env = StaticEnvironment::with_anchors(["marketplace-sort"]);
    let mut c = mount_at("/marketplace");
    c.advance_time(SETTLE, &env);

    assert_eq!(c.mode(), TourMode::Normal);
}

#[test]
fn unrelated_page_gets_fallback_before_completion() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/wishlist");
    c.advance_time(SETTLE, &env);

    assert_eq!(c.mode(), TourMode::Fallback);
}

#[test]
fn disabled_feature_never_runs() {
    let config = Config {
        enabled: false,
        ..Config::default()
    };
    let env = StaticEnvironment::new();
    let mut c = TourController::mount(config, MemoryStore::new(), "/", desktop());
    c.advance_time(ms(10_000), &env);

    assert_eq!(c.phase(), Phase::Idle);
    assert_eq!(c.pending_timers(), 0);
    assert!(!c.is_observing());
}

// ── Navigation ──

#[test]
fn navigation_interrupts_running_tour() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/");
    c.advance_time(SETTLE, &env);
    c.next(&env);

    c.navigate("/cart");

    assert_eq!(c.phase(), Phase::Settling);
    assert!(!c.is_running());
    assert!(!c.is_ready());
    assert_eq!(c.step_index(), 0);
    assert_eq!(c.page(), PageKey::Cart);
}

#[test]
fn navigation_cancels_stale_settle() {
    let env = cart_env();
    let mut c = mount_at("/");
    c.advance_time(ms(500), &env);

    c.navigate("/cart");
    c.advance_time(ms(500), &env);
    assert_eq!(c.phase(), Phase::Settling);

    c.advance_time(ms(400), &env);
    assert_eq!(c.phase(), Phase::Active);
    assert_eq!(c.page(), PageKey::Cart);
    assert_eq!(c.mode(), TourMode::Normal);
}

#[test]
fn navigation_leaves_one_timer_of_each_kind() {
    let mut c = mount_at("/");
    for path in ["/marketplace", "/product/1", "/seller", "/cart"] {
        c.navigate(path);
    }
    assert_eq!(c.pending_timers(), 2);
    assert!(c.is_timer_pending(TimerKind::Settle));
    assert!(c.is_timer_pending(TimerKind::ModePoll));
}

#[test]
fn same_path_navigation_is_ignored() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/");
    c.advance_time(SETTLE, &env);
    c.next(&env);

    c.navigate("/#top");

    assert_eq!(c.phase(), Phase::Active);
    assert_eq!(c.step_index(), 1);
}

// ── Cursor ──

#[test]
fn back_stops_at_first_step() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/");
    c.advance_time(SETTLE, &env);

    c.next(&env);
    c.back();
    c.back();

    assert_eq!(c.step_index(), 0);
    assert!(c.is_running());
}

#[test]
fn controls_are_ignored_when_not_running() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/");

    assert!(c.next(&env).is_empty());
    assert!(c.skip().is_empty());
    c.back();
    assert_eq!(c.phase(), Phase::Settling);
}

// ── Page chain ──

#[test]
fn exhausting_home_navigates_to_marketplace() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/");
    c.advance_time(SETTLE, &env);

    assert!(next_n(&mut c, &env, 3).is_empty());
    assert_eq!(c.step_index(), 3);
    assert!(c.view().is_last_step);

    let effects = c.next(&env);
    assert_eq!(effects, vec![Effect::Navigate("/marketplace".into())]);
    assert!(!c.is_running());
}

#[test]
fn exhausting_marketplace_opens_first_listed_item() {
    let mut env = marketplace_env();
    env.push_item("/product/7");
    env.push_item("/product/9");
    let mut c = mount_at("/marketplace");
    c.advance_time(SETTLE, &env);

    let effects = next_n(&mut c, &env, 4);
    assert_eq!(effects, vec![Effect::Navigate("/product/7".into())]);
}

#[test]
fn empty_marketplace_skips_to_seller_dashboard() {
    let env = marketplace_env();
    let mut c = mount_at("/marketplace");
    c.advance_time(SETTLE, &env);

    let effects = next_n(&mut c, &env, 4);
    assert_eq!(effects, vec![Effect::Navigate("/seller".into())]);
}

#[test]
fn exhausting_fallback_on_unchained_page_stays_put() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/wishlist");
    c.advance_time(SETTLE, &env);

    let effects = next_n(&mut c, &env, 2);
    assert!(effects.is_empty());
    assert_eq!(c.phase(), Phase::Idle);
    assert!(!c.has_completed());
}

#[test]
fn skip_on_ordinary_page_only_stops() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/");
    c.advance_time(SETTLE, &env);

    assert!(c.skip().is_empty());
    assert_eq!(c.phase(), Phase::Idle);
    assert!(!c.has_completed());
    assert!(c.is_observing());
}

// ── Sub-modes ──

#[test]
fn opening_add_item_panel_restarts_at_zero() {
    let (mut c, mut env) = running_seller_tour();
    c.next(&env);
    c.next(&env);
    assert_eq!(c.step_index(), 2);

    open_add_item_panel(&mut c, &mut env);

    assert_eq!(c.phase(), Phase::Active);
    assert_eq!(c.step_index(), 0);
    assert_eq!(c.steps().len(), 4);
}

#[test]
fn poll_detects_panel_without_mutation_notice() {
    let (mut c, mut env) = running_seller_tour();
    env.insert("orders-tab-active");

    c.advance_time(ms(100), &env);

    assert_eq!(c.mode(), TourMode::OrdersManagement);
    assert_eq!(c.step_index(), 0);
}

#[test]
fn panel_open_during_settle_wins_over_page_tour() {
    let mut env = seller_env();
    env.insert("add-product-heading");
    let mut c = mount_at("/seller");

    c.environment_mutated(&env);
    assert_eq!(c.phase(), Phase::Settling);

    c.advance_time(SETTLE, &env);
    assert_eq!(c.mode(), TourMode::AddItem);
    assert!(c.is_running());
}

#[test]
fn closing_panel_returns_to_page_tour() {
    let (mut c, mut env) = running_seller_tour();
    open_add_item_panel(&mut c, &mut env);
    c.next(&env);

    env.remove("add-product-name");
    c.environment_mutated(&env);

    assert_eq!(c.mode(), TourMode::Normal);
    assert_eq!(c.step_index(), 0);
    assert!(c.is_running());
}

#[test]
fn skipping_sub_mode_resumes_page_tour_after_delay() {
    let (mut c, mut env) = running_seller_tour();
    open_add_item_panel(&mut c, &mut env);

    assert!(c.skip().is_empty());
    assert_eq!(c.phase(), Phase::Idle);
    assert_eq!(c.mode(), TourMode::Normal);
    assert!(c.is_timer_pending(TimerKind::ResumeNormal));

    // The panel is still open, but its tour stays dismissed.
    c.advance_time(ms(499), &env);
    assert!(!c.is_running());

    c.advance_time(ms(1), &env);
    assert!(c.is_running());
    assert_eq!(c.mode(), TourMode::Normal);
    assert_eq!(c.step_index(), 0);

    c.advance_time(ms(2_000), &env);
    assert_eq!(c.mode(), TourMode::Normal);
}

#[test]
fn finishing_sub_mode_never_navigates() {
    let (mut c, mut env) = running_seller_tour();
    env.insert("orders-tab-active");
    c.environment_mutated(&env);
    assert_eq!(c.mode(), TourMode::OrdersManagement);

    let effects = next_n(&mut c, &env, 3);

    assert!(effects.is_empty());
    assert_eq!(c.mode(), TourMode::Normal);
    assert!(c.is_timer_pending(TimerKind::ResumeNormal));
}

#[test]
fn dismissed_panel_retriggers_after_reopening() {
    let (mut c, mut env) = running_seller_tour();
    open_add_item_panel(&mut c, &mut env);
    c.skip();

    env.remove("add-product-name");
    c.environment_mutated(&env);
    open_add_item_panel(&mut c, &mut env);

    assert!(c.is_running());
    assert_eq!(c.step_index(), 0);
}

#[test]
fn switching_panels_switches_sub_mode() {
    let (mut c, mut env) = running_seller_tour();
    open_add_item_panel(&mut c, &mut env);
    c.next(&env);

    env.remove("add-product-name");
    env.insert("orders-tab-active");
    c.environment_mutated(&env);

    assert_eq!(c.mode(), TourMode::OrdersManagement);
    assert_eq!(c.step_index(), 0);
}

#[test]
fn resume_is_cancelled_by_navigation() {
    let (mut c, mut env) = running_seller_tour();
    open_add_item_panel(&mut c, &mut env);
    c.skip();

    c.navigate("/cart");

    assert!(!c.is_timer_pending(TimerKind::ResumeNormal));
}

#[test]
fn long_idle_gap_polls_once_more_and_keeps_cadence() {
    let (mut c, mut env) = running_seller_tour();
    env.insert("add-product-name");

    c.advance_time(Duration::from_secs(30 * 24 * 60 * 60), &env);

    assert_eq!(c.mode(), TourMode::AddItem);
    assert_eq!(c.step_index(), 0);
    assert!(c.is_timer_pending(TimerKind::ModePoll));
    assert_eq!(c.pending_timers(), 1);
}

#[test]
fn inspection_failure_keeps_current_mode() {
    let (mut c, mut env) = running_seller_tour();
    c.next(&env);
    env.fail_on("add-product-name");
    env.insert("orders-tab-active");

    c.environment_mutated(&env);
    c.advance_time(ms(1_000), &env);

    assert_eq!(c.mode(), TourMode::Normal);
    assert_eq!(c.step_index(), 1);
}

#[test]
fn panels_are_ignored_off_the_seller_dashboard() {
    let mut env = cart_env();
    env.insert("add-product-name");
    let mut c = mount_at("/cart");
    c.advance_time(SETTLE, &env);
    c.environment_mutated(&env);

    assert_eq!(c.mode(), TourMode::Normal);
}

// ── Completion ──

#[test]
fn finishing_cart_completes_and_persists() {
    let env = cart_env();
    let mut c = mount_at("/cart");
    c.advance_time(SETTLE, &env);

    let effects = next_n(&mut c, &env, 3);

    assert_eq!(effects, vec![Effect::DisconnectObserver]);
    assert_eq!(c.phase(), Phase::Completed);
    assert!(c.has_completed());
    assert!(!c.is_observing());
    assert_eq!(c.pending_timers(), 0);
    assert_eq!(c.store().get_item(COMPLETED_KEY).unwrap().as_deref(), Some("true"));
    assert_eq!(c.store().get_item(PROGRESS_KEY).unwrap(), None);
    assert!(c.last_progress().is_none());
}

#[test]
fn skipping_on_cart_completes() {
    let env = cart_env();
    let mut c = mount_at("/cart");
    c.advance_time(SETTLE, &env);
    c.next(&env);

    assert_eq!(c.skip(), vec![Effect::DisconnectObserver]);
    assert!(c.has_completed());
}

#[test]
fn completed_tour_stays_silent_after_remount() {
    let env = cart_env();
    let mut c = mount_at("/cart");
    c.advance_time(SETTLE, &env);
    next_n(&mut c, &env, 3);

    let store = c.into_store();
    let mut c = TourController::mount(Config::default(), store, "/", desktop());
    assert_eq!(c.phase(), Phase::Completed);
    assert!(!c.is_observing());

    let mut env = seller_env();
    env.insert("add-product-name");
    for path in ["/", "/marketplace", "/product/3", "/seller", "/cart", "/wishlist"] {
        c.navigate(path);
        c.environment_mutated(&env);
        c.advance_time(ms(5_000), &env);
        assert!(!c.is_running(), "{path}");
        assert_eq!(c.phase(), Phase::Completed);
    }
    assert_eq!(c.pending_timers(), 0);
}

// ── Debug reset ──

#[test]
fn reset_requires_debug_flag() {
    let env = cart_env();
    let mut c = mount_at("/cart");
    c.advance_time(SETTLE, &env);
    next_n(&mut c, &env, 3);

    assert!(!c.reset());
    assert_eq!(c.phase(), Phase::Completed);
}

#[test]
fn query_flag_enables_reset() {
    let env = cart_env();
    let mut c = mount_at("/cart?tour_debug=1");
    assert!(c.debug_enabled());
    c.advance_time(SETTLE, &env);
    next_n(&mut c, &env, 3);

    assert!(c.reset());
    assert!(!c.has_completed());
    assert_eq!(c.phase(), Phase::Settling);
    assert!(c.store().is_empty());
    assert!(c.is_observing());

    c.advance_time(SETTLE, &env);
    assert!(c.is_running());
}

#[test]
fn reset_on_unrelated_page_waits_for_navigation() {
    let config = Config {
        debug: true,
        ..Config::default()
    };
    let mut store = MemoryStore::new();
    store.set_item(COMPLETED_KEY, "true").unwrap();
    let env = StaticEnvironment::new();
    let mut c = TourController::mount(config, store, "/wishlist", desktop());

    assert!(c.reset());
    c.advance_time(ms(5_000), &env);
    assert_eq!(c.phase(), Phase::Idle);

    c.navigate("/");
    c.advance_time(SETTLE, &env);
    assert!(c.is_running());
}

// ── Teardown ──

#[test]
fn unmount_cancels_everything() {
    let (mut c, mut env) = running_seller_tour();
    open_add_item_panel(&mut c, &mut env);
    c.skip();

    assert_eq!(c.unmount(), vec![Effect::DisconnectObserver]);
    assert_eq!(c.pending_timers(), 0);
    assert!(!c.is_observing());
    assert!(!c.is_mounted());

    c.navigate("/cart");
    c.environment_mutated(&env);
    c.advance_time(ms(10_000), &env);
    assert!(!c.is_running());
    assert_eq!(c.pending_timers(), 0);
    assert!(c.unmount().is_empty());
}

// ── Persistence ──

#[test]
fn progress_snapshot_tracks_cursor() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/");
    c.advance_time(SETTLE, &env);
    c.next(&env);

    let progress = c.last_progress().unwrap();
    assert_eq!(progress.page, PageKey::Home);
    assert_eq!(progress.step_index, 1);
    assert!(c.store().get_item(PROGRESS_KEY).unwrap().is_some());
}

#[test]
fn unavailable_store_still_runs_the_tour() {
    let env = cart_env();
    let mut c = TourController::mount(Config::default(), MemoryStore::unavailable(), "/cart", desktop());
    c.advance_time(SETTLE, &env);
    assert!(c.is_running());

    next_n(&mut c, &env, 3);
    assert_eq!(c.phase(), Phase::Completed);
}

#[test]
fn completed_flag_is_read_at_mount() {
    let mut store = MemoryStore::new();
    store.set_item(COMPLETED_KEY, "true").unwrap();
    let c = TourController::mount(Config::default(), store, "/", desktop());

    assert!(c.has_completed());
    assert_eq!(c.pending_timers(), 0);
}

// ── Device class ──

#[test]
fn resize_switches_variant_and_keeps_cursor() {
    let env = StaticEnvironment::new();
    let mut c = mount_at("/");
    c.advance_time(SETTLE, &env);
    c.next(&env);

    c.resize(phone());

    assert_eq!(c.device(), DeviceClass::Compact);
    assert_eq!(c.step_index(), 1);
    assert_eq!(c.steps()[1].anchor, Anchor::Candidates("mobile-search-button"));
}

#[test]
fn compact_mount_uses_compact_anchors() {
    let env = StaticEnvironment::with_anchors(["mobile-filter-button"]);
    let mut c = TourController::mount(Config::default(), MemoryStore::new(), "/marketplace", phone());
    c.advance_time(SETTLE, &env);

    assert_eq!(c.mode(), TourMode::Normal);
}
