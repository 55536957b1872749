use api_types::{
    Id,
    category::{Category, CategoryKind, CategoryNew, CategoryUpdate},
};
use reqwest::Method;
use serde::Serialize;

use crate::{Client, Result, segment};

#[derive(Serialize)]
struct CategoryQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<CategoryKind>,
}

impl Client {
    /// Lists categories, optionally only income or expense ones.
    pub async fn categories_list(&self, kind: Option<CategoryKind>) -> Result<Vec<Category>> {
        let page = self
            .get_page("categories", &CategoryQuery { kind })
            .await?;
        Ok(page.items)
    }

    pub async fn category_create(&self, payload: &CategoryNew) -> Result<Category> {
        self.create("categories", payload).await
    }

    pub async fn category_update(&self, id: &Id, payload: &CategoryUpdate) -> Result<Category> {
        self.send_json(Method::PUT, &format!("categories/{}", segment(id)), payload)
            .await
    }

    pub async fn category_delete(&self, id: &Id) -> Result<()> {
        self.delete(&format!("categories/{}", segment(id))).await
    }
}
