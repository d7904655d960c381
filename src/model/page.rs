//! Page identity: where in the storefront the user currently is.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const HOME_PATH: &str = "/";
pub const MARKETPLACE_PATH: &str = "/marketplace";
pub const SELLER_PATH: &str = "/seller";
pub const CART_PATH: &str = "/cart";

/// A storefront page the tour distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKey {
    /// Landing page.
    Home,

    /// Product listing, including search results.
    Marketplace,

    /// A single product's detail page.
    ProductDetail,

    /// The seller's shop management page.
    SellerDashboard,

    Cart,

    Wishlist,

    /// Any page without tour content of its own.
    Other,
}

impl PageKey {
    /// Derives the page key from a location path.
    ///
    /// Trailing slashes and empty segments are ignored, so `/cart/` and
    /// `//cart` both map to [`PageKey::Cart`].
    pub fn from_path(path: &str) -> Self {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        match (segments.next(), segments.next()) {
            (None, _) => Self::Home,
            (Some("marketplace" | "search"), _) => Self::Marketplace,
            (Some("product"), Some(_)) => Self::ProductDetail,
            (Some("seller"), _) => Self::SellerDashboard,
            (Some("cart"), None) => Self::Cart,
            (Some("wishlist"), None) => Self::Wishlist,
            _ => Self::Other,
        }
    }

    /// Pages with a step list of their own. Only these are ever toured
    /// outside of the fallback list.
    pub fn has_dedicated_steps(self) -> bool {
        matches!(
            self,
            Self::Home | Self::Marketplace | Self::ProductDetail | Self::SellerDashboard | Self::Cart
        )
    }

    /// Pages hosting in-page panels that switch the tour into a sub-mode.
    pub fn hosts_sub_panels(self) -> bool {
        matches!(self, Self::SellerDashboard)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Marketplace => "marketplace",
            Self::ProductDetail => "product-detail",
            Self::SellerDashboard => "seller-dashboard",
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A navigation location: path plus optional query string.
///
/// Fragments are dropped on parse; they never affect the tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: Option<String>,
}

impl Location {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.split('#').next().unwrap_or_default();
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (raw, None),
        };
        let path = if path.is_empty() { HOME_PATH } else { path };
        Self {
            path: path.to_string(),
            query: query.filter(|q| !q.is_empty()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn page(&self) -> PageKey {
        PageKey::from_path(&self.path)
    }

    /// Whether the query string switches `name` on.
    ///
    /// A bare `name`, `name=1` and `name=true` all count.
    pub fn query_flag(&self, name: &str) -> bool {
        let Some(query) = &self.query else {
            return false;
        };
        query.split('&').any(|pair| match pair.split_once('=') {
            Some((key, value)) => key == name && matches!(value, "1" | "true"),
            None => pair == name,
        })
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::parse(HOME_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_keys_from_paths() {
        assert_eq!(PageKey::from_path("/"), PageKey::Home);
        assert_eq!(PageKey::from_path(""), PageKey::Home);
        assert_eq!(PageKey::from_path("/marketplace"), PageKey::Marketplace);
        assert_eq!(PageKey::from_path("/search/books"), PageKey::Marketplace);
        assert_eq!(PageKey::from_path("/product/42"), PageKey::ProductDetail);
        assert_eq!(PageKey::from_path("/seller"), PageKey::SellerDashboard);
        assert_eq!(PageKey::from_path("/cart/"), PageKey::Cart);
        assert_eq!(PageKey::from_path("/wishlist"), PageKey::Wishlist);
    }

    #[test]
    fn product_without_id_is_not_a_detail_page() {
        assert_eq!(PageKey::from_path("/product"), PageKey::Other);
        assert_eq!(PageKey::from_path("/cart/checkout"), PageKey::Other);
    }

    #[test]
    fn wishlist_has_no_dedicated_steps() {
        assert!(!PageKey::Wishlist.has_dedicated_steps());
        assert!(!PageKey::Other.has_dedicated_steps());
        assert!(PageKey::Cart.has_dedicated_steps());
    }

    #[test]
    fn location_splits_query_and_fragment() {
        let location = Location::parse("/cart?tour_debug=1#summary");
        assert_eq!(location.path(), "/cart");
        assert_eq!(location.page(), PageKey::Cart);
        assert!(location.query_flag("tour_debug"));
    }

    #[test]
    fn query_flag_requires_truthy_value() {
        assert!(Location::parse("/?tour_debug").query_flag("tour_debug"));
        assert!(Location::parse("/?a=2&tour_debug=true").query_flag("tour_debug"));
        assert!(!Location::parse("/?tour_debug=0").query_flag("tour_debug"));
        assert!(!Location::parse("/?other=1").query_flag("tour_debug"));
        assert!(!Location::parse("/").query_flag("tour_debug"));
    }

    #[test]
    fn empty_location_is_home() {
        assert_eq!(Location::parse("?x=1").path(), "/");
        assert_eq!(Location::default().page(), PageKey::Home);
    }
}
