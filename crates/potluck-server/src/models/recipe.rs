//! Recipe payloads

use potluck_core::{Recipe, RecipeDraft, RecipeIngredient};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{catalog::TagResponse, user::UserResponse};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RecipeIngredientInput {
    /// Catalog ingredient id
    pub id: String,
    #[validate(range(min = 1))]
    pub amount: u32,
}

/// Body of recipe create and update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RecipeRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1))]
    pub text: String,

    /// Minutes
    #[validate(range(min = 1))]
    pub cooking_time: u32,

    /// Tag ids
    #[validate(length(min = 1))]
    pub tags: Vec<String>,

    #[validate(length(min = 1), nested)]
    pub ingredients: Vec<RecipeIngredientInput>,
}

impl From<RecipeRequest> for RecipeDraft {
    fn from(req: RecipeRequest) -> Self {
        RecipeDraft {
            name: req.name,
            text: req.text,
            cooking_time: req.cooking_time,
            tags: req.tags,
            ingredients: req
                .ingredients
                .into_iter()
                .map(|i| RecipeIngredient {
                    ingredient_id: i.id,
                    amount: i.amount,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    pub id: String,
    pub author: UserResponse,
    pub name: String,
    pub text: String,
    pub cooking_time: u32,
    pub tags: Vec<TagResponse>,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    /// RFC 3339 publication time
    pub pub_date: String,
}

/// Compact form returned by the favorite and cart toggles
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeShortResponse {
    pub id: String,
    pub name: String,
    pub cooking_time: u32,
}

impl From<&Recipe> for RecipeShortResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.recipe_id.clone(),
            name: recipe.name.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Query parameters for the recipe list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListParams {
    /// Author user id
    pub author: Option<String>,
    /// Comma-separated tag slugs, any of which may match
    pub tags: Option<String>,
    /// `1` to list only the caller's favorites
    pub is_favorited: Option<String>,
    /// `1` to list only recipes in the caller's cart
    pub is_in_shopping_cart: Option<String>,
}

impl RecipeListParams {
    pub fn tag_slugs(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn favorited_only(&self) -> bool {
        is_set(self.is_favorited.as_deref())
    }

    pub fn in_cart_only(&self) -> bool {
        is_set(self.is_in_shopping_cart.as_deref())
    }
}

fn is_set(flag: Option<&str>) -> bool {
    matches!(flag, Some("1" | "true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RecipeRequest {
        RecipeRequest {
            name: "Pancakes".into(),
            text: "Mix and fry.".into(),
            cooking_time: 15,
            tags: vec!["t1".into()],
            ingredients: vec![RecipeIngredientInput {
                id: "i1".into(),
                amount: 200,
            }],
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut req = request();
        req.ingredients[0].amount = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_lists_rejected() {
        let mut req = request();
        req.tags.clear();
        assert!(req.validate().is_err());

        let mut req = request();
        req.ingredients.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_list_params_parsing() {
        let params = RecipeListParams {
            tags: Some("breakfast, lunch,,".into()),
            is_favorited: Some("1".into()),
            is_in_shopping_cart: Some("0".into()),
            ..Default::default()
        };
        assert_eq!(params.tag_slugs(), vec!["breakfast", "lunch"]);
        assert!(params.favorited_only());
        assert!(!params.in_cart_only());
    }
}
