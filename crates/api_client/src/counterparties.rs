use api_types::{
    Id,
    counterparty::{Counterparty, CounterpartyNew},
};
use serde::Serialize;

use crate::{Client, Result, segment};

#[derive(Serialize)]
struct SearchQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
}

impl Client {
    pub async fn counterparties_list(&self, search: Option<&str>) -> Result<Vec<Counterparty>> {
        let page = self
            .get_page("counterparties", &SearchQuery { search })
            .await?;
        Ok(page.items)
    }

    pub async fn counterparty_create(&self, payload: &CounterpartyNew) -> Result<Counterparty> {
        self.create("counterparties", payload).await
    }

    pub async fn counterparty_delete(&self, id: &Id) -> Result<()> {
        self.delete(&format!("counterparties/{}", segment(id))).await
    }
}
