use api_types::{
    Id,
    party::{Party, PartyLedger, PartyNew, PartyType, PartyUpdate},
};
use reqwest::Method;
use serde::Serialize;

use crate::{Client, Result, segment};

#[derive(Serialize)]
struct PartyQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    party_type: Option<PartyType>,
}

impl Client {
    /// Customers, suppliers, or both.
    pub async fn parties_list(&self, party_type: Option<PartyType>) -> Result<Vec<Party>> {
        let page = self
            .get_page("parties", &PartyQuery { party_type })
            .await?;
        Ok(page.items)
    }

    pub async fn party_get(&self, id: &Id) -> Result<Party> {
        self.get(&format!("parties/{}", segment(id))).await
    }

    pub async fn party_create(&self, payload: &PartyNew) -> Result<Party> {
        self.create("parties", payload).await
    }

    pub async fn party_update(&self, id: &Id, payload: &PartyUpdate) -> Result<Party> {
        self.send_json(Method::PUT, &format!("parties/{}", segment(id)), payload)
            .await
    }

    pub async fn party_delete(&self, id: &Id) -> Result<()> {
        self.delete(&format!("parties/{}", segment(id))).await
    }

    pub async fn party_ledger(&self, id: &Id) -> Result<PartyLedger> {
        self.get(&format!("parties/{}/ledger", segment(id))).await
    }
}
