//! Ingredient-related API endpoints

use tracing::debug;
use vr_core::domain::ingredient::{Ingredient, IngredientRef};

use crate::error::{ClientError, Result};
use crate::{LIST_PARAMS, Page, VelociraptorClient};

impl VelociraptorClient {
    /// Look up an ingredient by numeric id or by exact name
    pub async fn resolve_ingredient(&self, reference: &IngredientRef) -> Result<Ingredient> {
        match reference {
            IngredientRef::Id(id) => {
                self.get_resource(&format!("/api/v1/ingredients/{}/", id))
                    .await
            }
            IngredientRef::Name(name) => {
                let url = self.url("/api/v1/ingredients/");
                debug!("GET {} name={}", url, name);
                let response = self
                    .client
                    .get(&url)
                    .query(&LIST_PARAMS)
                    .query(&[("name", name.as_str())])
                    .send()
                    .await?;

                let page: Page<Ingredient> = self.handle_response(response).await?;
                page.objects
                    .into_iter()
                    .next()
                    .ok_or_else(|| ClientError::NotFound(format!("ingredient '{}'", name)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn ingredient_json(id: u64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "resource_uri": format!("/api/v1/ingredients/{}/", id),
            "swarms": ["/api/v1/swarms/4/"]
        })
    }

    #[tokio::test]
    async fn test_resolve_by_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/ingredients/3/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(ingredient_json(3, "redis").to_string())
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let ingredient = client
            .resolve_ingredient(&IngredientRef::parse("3"))
            .await
            .unwrap();
        assert_eq!(ingredient.name, "redis");
        assert_eq!(ingredient.swarms, vec!["/api/v1/swarms/4/"]);
    }

    #[tokio::test]
    async fn test_resolve_by_name() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/ingredients/")
            .match_query(Matcher::UrlEncoded("name".into(), "redis".into()))
            .with_status(200)
            .with_body(json!({"objects": [ingredient_json(3, "redis")]}).to_string())
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let ingredient = client
            .resolve_ingredient(&IngredientRef::parse("redis"))
            .await
            .unwrap();
        assert_eq!(ingredient.resource_uri, "/api/v1/ingredients/3/");
    }

    #[tokio::test]
    async fn test_unknown_name_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/ingredients/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"objects": []}).to_string())
            .create_async()
            .await;

        let client = VelociraptorClient::new(server.url()).unwrap();
        let err = client
            .resolve_ingredient(&IngredientRef::parse("nope"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
