//! Shopping list aggregation
//!
//! Merges the ingredient rows of every recipe in a user's cart into one list
//! keyed by ingredient name. Lines keep the order in which each name was
//! first seen.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    relation::RelationKind,
    store::RecipeStore,
    types::IngredientRow,
};

pub mod render;

pub use render::render_text;

/// One merged ingredient of the shopping list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedLine {
    pub name: String,
    pub amount: u64,
    pub measurement_unit: String,
}

/// What to do when two rows for the same name carry different units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitPolicy {
    /// Sum anyway; the line keeps the unit of the last row merged into it
    #[default]
    LastSeen,
    /// Fail with `UnitMismatch`
    Strict,
}

/// Insertion-ordered accumulator behind [`aggregate`]
#[derive(Debug, Default)]
pub struct Aggregator {
    policy: UnitPolicy,
    lines: Vec<AggregatedLine>,
    index: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new(policy: UnitPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn push(&mut self, row: IngredientRow) -> Result<()> {
        let Some(slot) = self.index.get(&row.name).copied() else {
            self.index.insert(row.name.clone(), self.lines.len());
            self.lines.push(AggregatedLine {
                name: row.name,
                amount: u64::from(row.amount),
                measurement_unit: row.measurement_unit,
            });
            return Ok(());
        };

        let line = &mut self.lines[slot];
        if self.policy == UnitPolicy::Strict && line.measurement_unit != row.measurement_unit {
            return Err(CoreError::UnitMismatch {
                name: row.name,
                expected: line.measurement_unit.clone(),
                found: row.measurement_unit,
            });
        }
        line.amount += u64::from(row.amount);
        line.measurement_unit = row.measurement_unit;
        Ok(())
    }

    pub fn finish(self) -> Vec<AggregatedLine> {
        self.lines
    }
}

/// Merges the ingredient rows of several recipes
pub fn aggregate<I, R>(recipes: I, policy: UnitPolicy) -> Result<Vec<AggregatedLine>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = IngredientRow>,
{
    let mut aggregator = Aggregator::new(policy);
    for rows in recipes {
        for row in rows {
            aggregator.push(row)?;
        }
    }
    Ok(aggregator.finish())
}

/// Builds the shopping list for `user_id` from the current cart contents.
///
/// Cart recipes are read fresh on every call, in the order they were added.
/// A cart entry whose recipe has vanished is skipped.
pub async fn generate(
    store: &dyn RecipeStore,
    user_id: &str,
    policy: UnitPolicy,
) -> Result<Vec<AggregatedLine>> {
    let recipe_ids = store
        .relation_targets(RelationKind::ShoppingCart, user_id)
        .await?;

    let mut aggregator = Aggregator::new(policy);
    for recipe_id in &recipe_ids {
        let Some(recipe) = store.get_recipe(recipe_id).await? else {
            tracing::warn!(user_id, recipe_id, "cart entry points at a missing recipe");
            continue;
        };
        for row in store.ingredient_rows(&recipe).await? {
            aggregator.push(row)?;
        }
    }

    let lines = aggregator.finish();
    tracing::debug!(
        user_id,
        recipes = recipe_ids.len(),
        lines = lines.len(),
        "shopping list generated"
    );
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        store::MemoryStore,
        types::{Ingredient, NewIngredient, NewUser, Recipe, RecipeIngredient, new_id, now_micros},
    };

    fn row(name: &str, amount: u32, unit: &str) -> IngredientRow {
        IngredientRow {
            ingredient_id: new_id(),
            name: name.to_string(),
            amount,
            measurement_unit: unit.to_string(),
        }
    }

    fn line(name: &str, amount: u64, unit: &str) -> AggregatedLine {
        AggregatedLine {
            name: name.to_string(),
            amount,
            measurement_unit: unit.to_string(),
        }
    }

    #[test]
    fn test_merges_by_name_in_first_seen_order() {
        let recipes = vec![
            vec![row("Flour", 200, "g")],
            vec![row("Flour", 100, "g"), row("Sugar", 50, "g")],
        ];

        let lines = aggregate(recipes, UnitPolicy::LastSeen).unwrap();
        assert_eq!(lines, vec![line("Flour", 300, "g"), line("Sugar", 50, "g")]);
    }

    #[test]
    fn test_empty_input_is_empty_list() {
        let recipes: Vec<Vec<IngredientRow>> = vec![];
        assert!(aggregate(recipes, UnitPolicy::Strict).unwrap().is_empty());
    }

    #[test]
    fn test_amounts_are_conserved_and_names_unique() {
        let recipes = vec![
            vec![row("Egg", 2, "pcs"), row("Milk", 300, "ml"), row("Salt", 1, "g")],
            vec![row("Milk", 200, "ml"), row("Egg", 3, "pcs")],
            vec![row("Butter", 20, "g"), row("Egg", 1, "pcs")],
        ];
        let total: u64 = recipes
            .iter()
            .flatten()
            .map(|r| u64::from(r.amount))
            .sum();

        let lines = aggregate(recipes, UnitPolicy::LastSeen).unwrap();
        assert_eq!(lines.iter().map(|l| l.amount).sum::<u64>(), total);

        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Egg", "Milk", "Salt", "Butter"]);
        assert_eq!(lines[0].amount, 6);
    }

    #[test]
    fn test_last_seen_unit_wins() {
        let recipes = vec![vec![row("Sugar", 1, "cup")], vec![row("Sugar", 50, "g")]];
        let lines = aggregate(recipes, UnitPolicy::LastSeen).unwrap();
        assert_eq!(lines, vec![line("Sugar", 51, "g")]);
    }

    #[test]
    fn test_strict_policy_reports_mismatch() {
        let recipes = vec![vec![row("Sugar", 1, "cup")], vec![row("Sugar", 50, "g")]];
        let err = aggregate(recipes, UnitPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            CoreError::UnitMismatch {
                name: "Sugar".into(),
                expected: "cup".into(),
                found: "g".into(),
            }
        );
    }

    #[test]
    fn test_sum_does_not_overflow_row_width() {
        let recipes = vec![vec![row("Water", u32::MAX, "ml")], vec![row("Water", 1, "ml")]];
        let lines = aggregate(recipes, UnitPolicy::LastSeen).unwrap();
        assert_eq!(lines[0].amount, u64::from(u32::MAX) + 1);
    }

    async fn ingredient(store: &MemoryStore, name: &str, unit: &str) -> Ingredient {
        store
            .insert_ingredient(
                NewIngredient {
                    name: name.into(),
                    measurement_unit: unit.into(),
                }
                .into_ingredient(),
            )
            .await
            .unwrap()
    }

    async fn recipe(store: &MemoryStore, author: &str, items: &[(&Ingredient, u32)]) -> Recipe {
        store
            .insert_recipe(Recipe {
                recipe_id: new_id(),
                author_id: author.to_string(),
                name: "Cake".into(),
                text: "Bake".into(),
                cooking_time: 40,
                tags: vec![],
                ingredients: items
                    .iter()
                    .map(|(i, amount)| RecipeIngredient {
                        ingredient_id: i.ingredient_id.clone(),
                        amount: *amount,
                    })
                    .collect(),
                created_at: now_micros(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_generate_from_cart() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(
                NewUser {
                    email: "anna@example.com".into(),
                    username: "anna".into(),
                    first_name: "Anna".into(),
                    last_name: "Cook".into(),
                }
                .into_user(),
            )
            .await
            .unwrap();
        let flour = ingredient(&store, "Flour", "g").await;
        // Separate catalog record with the same name still merges
        let flour_again = ingredient(&store, "Flour", "g").await;
        let sugar = ingredient(&store, "Sugar", "g").await;

        let a = recipe(&store, &user.user_id, &[(&flour, 200)]).await;
        let b = recipe(&store, &user.user_id, &[(&flour_again, 100), (&sugar, 50)]).await;
        let not_in_cart = recipe(&store, &user.user_id, &[(&sugar, 999)]).await;

        assert!(
            generate(&store, &user.user_id, UnitPolicy::LastSeen)
                .await
                .unwrap()
                .is_empty()
        );

        for r in [&a, &b] {
            store
                .insert_relation(RelationKind::ShoppingCart, &user.user_id, &r.recipe_id)
                .await
                .unwrap();
        }
        store
            .insert_relation(RelationKind::Favorite, &user.user_id, &not_in_cart.recipe_id)
            .await
            .unwrap();

        let first = generate(&store, &user.user_id, UnitPolicy::LastSeen)
            .await
            .unwrap();
        assert_eq!(first, vec![line("Flour", 300, "g"), line("Sugar", 50, "g")]);

        let second = generate(&store, &user.user_id, UnitPolicy::LastSeen)
            .await
            .unwrap();
        assert_eq!(first, second);
    }
}
