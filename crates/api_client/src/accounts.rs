use api_types::{
    Id,
    account::{Account, AccountNew, AccountUpdate},
};
use reqwest::Method;

use crate::{Client, Result, segment};

impl Client {
    pub async fn accounts_list(&self) -> Result<Vec<Account>> {
        self.get("accounts").await
    }

    pub async fn account_get(&self, id: &Id) -> Result<Account> {
        self.get(&format!("accounts/{}", segment(id))).await
    }

    pub async fn account_create(&self, payload: &AccountNew) -> Result<Account> {
        self.create("accounts", payload).await
    }

    pub async fn account_update(&self, id: &Id, payload: &AccountUpdate) -> Result<Account> {
        self.send_json(Method::PUT, &format!("accounts/{}", segment(id)), payload)
            .await
    }

    pub async fn account_delete(&self, id: &Id) -> Result<()> {
        self.delete(&format!("accounts/{}", segment(id))).await
    }
}
