//! End-to-end tour scenarios driven the way a host would drive them:
//! report navigation, let time pass, press the overlay's buttons, and
//! follow any navigation the controller asks for.

use std::time::Duration;

use tempfile::TempDir;
use tourguide::model::{PageKey, TourMode, Viewport};
use tourguide::persistence::COMPLETED_KEY;
use tourguide::storage::{KeyValueStore, MemoryStore, SqliteStore};
use tourguide::{Config, Effect, Phase, StaticEnvironment, TourController};

const SETTLE: Duration = Duration::from_millis(900);

fn desktop() -> Viewport {
    Viewport {
        width: 1440,
        touch: false,
    }
}

/// Everything the storefront renders across its main pages.
fn storefront() -> StaticEnvironment {
    let mut env = StaticEnvironment::with_anchors([
        "nav-search",
        "home-categories",
        "nav-marketplace",
        "marketplace-filters",
        "marketplace-sort",
        "product-card",
        "product-gallery",
        "product-seller",
        "add-to-cart-button",
        "seller-shop-header",
        "seller-add-product-button",
        "seller-products-tab",
        "seller-orders-tab",
        "cart-items",
        "cart-summary",
        "checkout-button",
    ]);
    env.push_item("/product/12");
    env
}

/// Presses "next" until the current list runs out, following navigation.
fn finish_page<S: KeyValueStore>(c: &mut TourController<S>, env: &StaticEnvironment) -> Vec<Effect> {
    assert!(c.is_running(), "no tour on {}", c.page());
    loop {
        let last = c.view().is_last_step;
        let effects = c.next(env);
        if last {
            for effect in &effects {
                if let Effect::Navigate(path) = effect {
                    c.navigate(path);
                }
            }
            return effects;
        }
    }
}

#[test]
fn first_visit_starts_home_tour_after_settling() {
    let env = storefront();
    let mut c = TourController::mount(Config::default(), MemoryStore::new(), "/", desktop());
    assert!(!c.is_running());

    c.advance_time(SETTLE, &env);

    let view = c.view();
    assert!(view.running);
    assert_eq!(view.mode, TourMode::Normal);
    assert_eq!(view.step_index, 0);
    assert_eq!(view.step_count, 4);
}

#[test]
fn exhausting_home_tour_moves_to_marketplace() {
    let env = storefront();
    let mut c = TourController::mount(Config::default(), MemoryStore::new(), "/", desktop());
    c.advance_time(SETTLE, &env);

    for _ in 0..3 {
        assert!(c.next(&env).is_empty());
    }
    let effects = c.next(&env);

    assert!(!c.is_running());
    assert_eq!(effects, vec![Effect::Navigate("/marketplace".into())]);
}

#[test]
fn add_item_panel_interrupts_seller_tour() {
    let mut env = storefront();
    let mut c = TourController::mount(Config::default(), MemoryStore::new(), "/seller", desktop());
    c.advance_time(SETTLE, &env);
    c.next(&env);
    c.next(&env);

    env.insert("add-product-name");
    c.environment_mutated(&env);

    assert!(c.is_running());
    assert_eq!(c.mode(), TourMode::AddItem);
    assert_eq!(c.step_index(), 0);
}

#[test]
fn whole_journey_ends_in_completion() {
    let env = storefront();
    let mut c = TourController::mount(Config::default(), MemoryStore::new(), "/", desktop());

    let mut visited = Vec::new();
    loop {
        c.advance_time(SETTLE, &env);
        visited.push(c.page());
        let effects = finish_page(&mut c, &env);
        if effects.contains(&Effect::DisconnectObserver) {
            break;
        }
    }

    assert_eq!(
        visited,
        vec![
            PageKey::Home,
            PageKey::Marketplace,
            PageKey::ProductDetail,
            PageKey::SellerDashboard,
            PageKey::Cart,
        ]
    );
    assert_eq!(c.phase(), Phase::Completed);
}

#[test]
fn finishing_cart_survives_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.sqlite");
    let origin = "https://campus.shop";
    let env = storefront();

    {
        let store = SqliteStore::open(&path, origin).unwrap();
        let mut c = TourController::mount(Config::default(), store, "/cart", desktop());
        c.advance_time(SETTLE, &env);
        let effects = finish_page(&mut c, &env);

        assert_eq!(effects, vec![Effect::DisconnectObserver]);
        assert_eq!(c.phase(), Phase::Completed);
        assert_eq!(
            c.store().get_item(COMPLETED_KEY).unwrap().as_deref(),
            Some("true")
        );
    }

    let store = SqliteStore::open(&path, origin).unwrap();
    let mut c = TourController::mount(Config::default(), store, "/", desktop());
    for page in ["/", "/marketplace", "/product/12", "/seller", "/cart", "/wishlist"] {
        c.navigate(page);
        c.advance_time(Duration::from_secs(3), &env);
        assert!(!c.is_running(), "{page}");
    }
}

#[test]
fn other_origins_still_get_the_tour() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.sqlite");
    let env = storefront();

    let mut done = SqliteStore::open(&path, "https://a.test").unwrap();
    done.set_item(COMPLETED_KEY, "true").unwrap();

    let store = SqliteStore::open(&path, "https://b.test").unwrap();
    let mut c = TourController::mount(Config::default(), store, "/", desktop());
    c.advance_time(SETTLE, &env);

    assert!(c.is_running());
}
