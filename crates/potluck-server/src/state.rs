use std::sync::Arc;

use potluck_core::RecipeStore;

use crate::settings::ShoppingListCfg;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecipeStore>,
    pub shopping_list: Arc<ShoppingListCfg>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecipeStore>, shopping_list: ShoppingListCfg) -> Self {
        Self {
            store,
            shopping_list: Arc::new(shopping_list),
        }
    }
}
