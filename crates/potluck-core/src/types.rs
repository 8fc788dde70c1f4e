use serde::{Deserialize, Serialize};

/// Fresh record identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time as unix microseconds
pub fn now_micros() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    pub fn into_user(self) -> User {
        User {
            user_id: new_id(),
            email: self.email,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag_id: String,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub slug: String,
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}

impl NewTag {
    pub fn into_tag(self) -> Tag {
        Tag {
            tag_id: new_id(),
            name: self.name,
            color: self.color,
            slug: self.slug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub ingredient_id: String,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

impl NewIngredient {
    pub fn into_ingredient(self) -> Ingredient {
        Ingredient {
            ingredient_id: new_id(),
            name: self.name,
            measurement_unit: self.measurement_unit,
        }
    }
}

/// Per-recipe quantity of one catalog ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient_id: String,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub recipe_id: String,
    pub author_id: String,
    pub name: String,
    pub text: String,
    /// Minutes
    pub cooking_time: u32,
    /// Tag ids, in the order the author listed them
    pub tags: Vec<String>,
    pub ingredients: Vec<RecipeIngredient>,
    /// Unix microseconds
    pub created_at: i64,
}

/// Author-supplied recipe content, shared by create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub cooking_time: u32,
    pub tags: Vec<String>,
    pub ingredients: Vec<RecipeIngredient>,
}

/// One recipe ingredient resolved against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRow {
    pub ingredient_id: String,
    pub name: String,
    pub amount: u32,
    pub measurement_unit: String,
}

/// Filters for recipe listing; every set field narrows the result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author_id: Option<String>,
    /// Any-of match on tag slugs
    pub tag_slugs: Vec<String>,
    pub favorited_by: Option<String>,
    pub in_cart_of: Option<String>,
}
