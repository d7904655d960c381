//! Step registry and page chain.
//!
//! Pure lookups over static tables: which steps a page shows in a given
//! mode and device class, and which page the tour moves to once a page's
//! steps are exhausted.

use crate::model::{
    Anchor, CART_PATH, DeviceClass, MARKETPLACE_PATH, PageKey, Placement, SELLER_PATH,
    StepDescriptor, TourMode,
};

/// A registry entry. Compact devices may swap the anchor and placement.
#[derive(Clone, Copy)]
struct StepDef {
    anchor: Anchor,
    compact_anchor: Option<Anchor>,
    title: &'static str,
    body: &'static str,
    placement: Placement,
    compact_placement: Option<Placement>,
    interactive: bool,
}

impl StepDef {
    const fn new(anchor: Anchor, title: &'static str, body: &'static str, placement: Placement) -> Self {
        Self {
            anchor,
            compact_anchor: None,
            title,
            body,
            placement,
            compact_placement: None,
            interactive: false,
        }
    }

    const fn compact(mut self, anchor: Anchor, placement: Placement) -> Self {
        self.compact_anchor = Some(anchor);
        self.compact_placement = Some(placement);
        self
    }

    const fn compact_placement(mut self, placement: Placement) -> Self {
        self.compact_placement = Some(placement);
        self
    }

    const fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    fn descriptor(&self, device: DeviceClass) -> StepDescriptor {
        let (anchor, placement) = match device {
            DeviceClass::Standard => (self.anchor, self.placement),
            DeviceClass::Compact => (
                self.compact_anchor.unwrap_or(self.anchor),
                self.compact_placement.unwrap_or(self.placement),
            ),
        };
        StepDescriptor {
            anchor,
            title: self.title,
            body: self.body,
            placement,
            allow_anchor_interaction: self.interactive,
        }
    }
}

use Anchor::{Candidates, Centered};
use Placement::{Bottom, Center, Left, Right, Top};

const HOME: &[StepDef] = &[
    StepDef::new(
        Centered,
        "Welcome to the campus marketplace",
        "Buy and sell textbooks, gear, and more with other students. Here's a quick look around.",
        Center,
    ),
    StepDef::new(
        Candidates("nav-search"),
        "Search listings",
        "Looking for something specific? Search every listing by name or category.",
        Bottom,
    )
    .compact(Candidates("mobile-search-button"), Bottom),
    StepDef::new(
        Candidates("home-categories"),
        "Browse by category",
        "Jump straight into textbooks, electronics, dorm essentials, and more.",
        Top,
    ),
    StepDef::new(
        Candidates("nav-marketplace"),
        "Open the marketplace",
        "Everything for sale lives here. Let's head over.",
        Bottom,
    )
    .compact(Candidates("mobile-menu-button,nav-marketplace"), Bottom)
    .interactive(),
];

const MARKETPLACE: &[StepDef] = &[
    StepDef::new(
        Candidates("marketplace-filters"),
        "Filter results",
        "Narrow listings by category, price, and condition.",
        Right,
    )
    .compact(Candidates("mobile-filter-button"), Bottom),
    StepDef::new(
        Candidates("marketplace-sort"),
        "Sort listings",
        "Show the newest or cheapest items first.",
        Bottom,
    ),
    StepDef::new(
        Candidates("product-card"),
        "Product cards",
        "Each card shows the price, condition, and seller. Tap one to see details.",
        Top,
    ),
    StepDef::new(
        Candidates("wishlist-toggle,product-card"),
        "Save for later",
        "Use the heart to keep items on your wishlist.",
        Left,
    )
    .compact_placement(Top),
];

const PRODUCT_DETAIL: &[StepDef] = &[
    StepDef::new(
        Candidates("product-gallery"),
        "Photos",
        "Swipe through the seller's photos before you buy.",
        Right,
    )
    .compact_placement(Bottom),
    StepDef::new(
        Candidates("product-seller"),
        "Meet the seller",
        "See who is selling and visit their shop.",
        Left,
    )
    .compact_placement(Top),
    StepDef::new(
        Candidates("add-to-cart-button"),
        "Add to cart",
        "Ready to buy? Add the item to your cart.",
        Top,
    )
    .interactive(),
];

const SELLER_DASHBOARD: &[StepDef] = &[
    StepDef::new(
        Candidates("seller-shop-header"),
        "Your shop",
        "This is your storefront. Buyers see your shop name and rating here.",
        Bottom,
    ),
    StepDef::new(
        Candidates("seller-add-product-button"),
        "List an item",
        "Open the add-product form to put something up for sale.",
        Bottom,
    )
    .interactive(),
    StepDef::new(
        Candidates("seller-products-tab"),
        "Manage listings",
        "Edit prices, mark items sold, or remove listings.",
        Bottom,
    ),
    StepDef::new(
        Candidates("seller-orders-tab"),
        "Orders",
        "Track what buyers have ordered and update their status.",
        Bottom,
    )
    .compact(Candidates("seller-orders-tab,seller-menu-button"), Top)
    .interactive(),
];

const ADD_ITEM: &[StepDef] = &[
    StepDef::new(
        Candidates("add-product-name"),
        "Name your item",
        "A clear title helps buyers find it in search.",
        Right,
    )
    .compact_placement(Bottom),
    StepDef::new(
        Candidates("add-product-price,add-product-category"),
        "Price and category",
        "Set a fair price and pick the category it belongs in.",
        Right,
    )
    .compact_placement(Bottom),
    StepDef::new(
        Candidates("add-product-images"),
        "Add photos",
        "Listings with photos sell faster.",
        Top,
    ),
    StepDef::new(
        Candidates("add-product-submit"),
        "Publish",
        "Submit the form and your item goes live.",
        Top,
    )
    .interactive(),
];

const ORDERS_MANAGEMENT: &[StepDef] = &[
    StepDef::new(
        Candidates("orders-list"),
        "Incoming orders",
        "Every order for your items shows up here, newest first.",
        Top,
    ),
    StepDef::new(
        Candidates("order-status-select,orders-list"),
        "Update status",
        "Mark orders as confirmed, shipped, or delivered so buyers know what's happening.",
        Left,
    )
    .compact_placement(Bottom)
    .interactive(),
    StepDef::new(
        Centered,
        "You're all set",
        "Payments arrive through mobile money once the buyer confirms delivery.",
        Center,
    ),
];

const CART: &[StepDef] = &[
    StepDef::new(
        Candidates("cart-items"),
        "Your cart",
        "Review the items you're about to buy and adjust quantities.",
        Right,
    )
    .compact_placement(Bottom),
    StepDef::new(
        Candidates("cart-summary"),
        "Order summary",
        "Totals, including any delivery fee, are calculated here.",
        Left,
    )
    .compact_placement(Top),
    StepDef::new(
        Candidates("checkout-button"),
        "Check out",
        "Pay securely with mobile money. That's the end of the tour!",
        Top,
    )
    .interactive(),
];

const FALLBACK: &[StepDef] = &[
    StepDef::new(
        Centered,
        "Welcome",
        "This page doesn't have a guided tour yet, but you can explore freely.",
        Center,
    ),
    StepDef::new(
        Centered,
        "Need a hand?",
        "Head back to the home page any time to pick the tour up again.",
        Center,
    ),
];

/// The ordered steps for a page in a mode.
///
/// Unknown combinations yield an empty list. Sub-mode lists exist only on
/// pages that host the matching panels; the fallback list is the same
/// everywhere.
pub fn steps(page: PageKey, mode: TourMode, device: DeviceClass) -> Vec<StepDescriptor> {
    table(page, mode)
        .iter()
        .map(|def| def.descriptor(device))
        .collect()
}

fn table(page: PageKey, mode: TourMode) -> &'static [StepDef] {
    match (mode, page) {
        (TourMode::Fallback, _) => FALLBACK,
        (TourMode::Normal, PageKey::Home) => HOME,
        (TourMode::Normal, PageKey::Marketplace) => MARKETPLACE,
        (TourMode::Normal, PageKey::ProductDetail) => PRODUCT_DETAIL,
        (TourMode::Normal, PageKey::SellerDashboard) => SELLER_DASHBOARD,
        (TourMode::Normal, PageKey::Cart) => CART,
        (TourMode::AddItem, PageKey::SellerDashboard) => ADD_ITEM,
        (TourMode::OrdersManagement, PageKey::SellerDashboard) => ORDERS_MANAGEMENT,
        _ => &[],
    }
}

/// Where the tour goes once a page's steps run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// A fixed path.
    Path(&'static str),

    /// The first item rendered on the listing, or `otherwise` when the
    /// listing is empty.
    FirstListedItem { otherwise: &'static str },
}

/// The linear journey across the storefront.
const CHAIN: &[(PageKey, NextPage)] = &[
    (PageKey::Home, NextPage::Path(MARKETPLACE_PATH)),
    (
        PageKey::Marketplace,
        NextPage::FirstListedItem {
            otherwise: SELLER_PATH,
        },
    ),
    (PageKey::ProductDetail, NextPage::Path(SELLER_PATH)),
    (PageKey::SellerDashboard, NextPage::Path(CART_PATH)),
];

/// The page after `page` in the journey, if any. The cart ends it.
pub fn next_page(page: PageKey) -> Option<NextPage> {
    CHAIN
        .iter()
        .find(|(from, _)| *from == page)
        .map(|(_, next)| *next)
}
