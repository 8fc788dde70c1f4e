//! User registration and follow lists

use crate::{
    error::{CoreError, Result},
    relation::RelationKind,
    store::RecipeStore,
    types::{NewUser, User},
};

pub async fn register(store: &dyn RecipeStore, new_user: NewUser) -> Result<User> {
    let new_user = NewUser {
        email: new_user.email.trim().to_lowercase(),
        username: new_user.username.trim().to_string(),
        first_name: new_user.first_name.trim().to_string(),
        last_name: new_user.last_name.trim().to_string(),
    };
    if new_user.username.is_empty() {
        return Err(CoreError::Validation("Username must not be empty!".into()));
    }

    let user = store.insert_user(new_user.into_user()).await?;
    tracing::info!(user_id = %user.user_id, username = %user.username, "user registered");
    Ok(user)
}

/// Users followed by `user_id`, in subscription order
pub async fn subscriptions(store: &dyn RecipeStore, user_id: &str) -> Result<Vec<User>> {
    let ids = store
        .relation_targets(RelationKind::Subscription, user_id)
        .await?;

    let mut users = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(user) = store.get_user(&id).await? {
            users.push(user);
        }
    }
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{relation, store::MemoryStore};

    fn new_user(name: &str) -> NewUser {
        NewUser {
            email: format!(" {}@Example.com ", name),
            username: format!(" {name} "),
            first_name: "First".into(),
            last_name: "Last".into(),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes() {
        let store = MemoryStore::new();
        let user = register(&store, new_user("anna")).await.unwrap();
        assert_eq!(user.email, "anna@example.com");
        assert_eq!(user.username, "anna");

        let err = register(&store, new_user("anna")).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_subscriptions_in_follow_order() {
        let store = MemoryStore::new();
        let anna = register(&store, new_user("anna")).await.unwrap();
        let bob = register(&store, new_user("bob")).await.unwrap();
        let carl = register(&store, new_user("carl")).await.unwrap();

        relation::add(&store, RelationKind::Subscription, &anna.user_id, &carl.user_id)
            .await
            .unwrap();
        relation::add(&store, RelationKind::Subscription, &anna.user_id, &bob.user_id)
            .await
            .unwrap();

        let followed = subscriptions(&store, &anna.user_id).await.unwrap();
        assert_eq!(followed, vec![carl, bob]);
        assert!(subscriptions(&store, "nobody").await.unwrap().is_empty());
    }
}
