//! Admin-configured UI content persisted through the store adapter.
//!
//! These values share the cart's persistence contract (best-effort,
//! degrade-to-default) but are otherwise plain data the UI renders.

use serde::{Deserialize, Serialize};
use synergy_core::ProductId;

/// Promotional poster shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealPoster {
    pub image: String,
    pub title: String,
    pub description: String,
    /// Show the poster automatically on first page load.
    pub show_on_load: bool,
}

impl Default for DealPoster {
    fn default() -> Self {
        Self {
            image: "https://images.unsplash.com/photo-1607082348824-0a96f2a4b9da?q=80&w=1920&auto=format&fit=crop"
                .to_string(),
            title: "Mega Sale is Live!".to_string(),
            description: "Enjoy up to 50% OFF on premium gadgets. Limited stock available."
                .to_string(),
            show_on_load: true,
        }
    }
}

/// Featured-product popup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeaturedPopup {
    pub product_id: Option<ProductId>,
    pub show_on_load: bool,
}

/// Category names selected for a home or header section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySelection(pub Vec<String>);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{self, MemoryStore, StateStore, keys};

    #[test]
    fn test_deal_poster_default_round_trip() {
        let store = MemoryStore::new();
        let loaded: DealPoster = store::load_or_default(&store, keys::DEAL_POSTER);
        assert_eq!(loaded, DealPoster::default());

        let custom = DealPoster {
            title: "Eid Sale".to_string(),
            ..DealPoster::default()
        };
        store::save(&store, keys::DEAL_POSTER, &custom);
        let reloaded: DealPoster = store::load_or_default(&store, keys::DEAL_POSTER);
        assert_eq!(reloaded, custom);
    }

    #[test]
    fn test_corrupted_popup_degrades_to_default() {
        let store = MemoryStore::new();
        store.put(keys::FEATURED_POPUP, "oops").unwrap();
        let loaded: FeaturedPopup = store::load_or_default(&store, keys::FEATURED_POPUP);
        assert_eq!(loaded, FeaturedPopup::default());
    }
}
