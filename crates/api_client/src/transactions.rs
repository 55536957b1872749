use api_types::{
    Id, Page,
    transaction::{
        Transaction, TransactionFilter, TransactionNew, TransactionUpdate, TransferCreated,
        TransferNew,
    },
};
use reqwest::Method;

use crate::{Client, ClientError, MAX_PAGE_SIZE, Result, segment};

impl Client {
    /// One page of transactions. `filter.page`/`filter.limit` select the page.
    pub async fn transactions_page(&self, filter: &TransactionFilter) -> Result<Page<Transaction>> {
        self.get_page("transactions", filter).await
    }

    /// Every transaction matching `filter`, fetching pages of `page_size`
    /// (capped at [`MAX_PAGE_SIZE`]) one after the other until the server
    /// reports no more pages. Items are returned in the order served.
    pub async fn transactions_all(
        &self,
        filter: &TransactionFilter,
        page_size: u32,
    ) -> Result<Vec<Transaction>> {
        let limit = page_size.clamp(1, MAX_PAGE_SIZE);
        let mut page = 1;
        let mut all = Vec::new();

        loop {
            let Page { items, pagination } =
                self.transactions_page(&filter.with_page(page, limit)).await?;
            let received = items.len();
            all.extend(items);
            tracing::debug!(
                "fetched transactions page {page}/{} ({received} items)",
                pagination.pages
            );

            if received == 0 || !pagination.has_next() {
                break;
            }
            // Never ask for the same page twice, whatever the server echoes.
            page = pagination.page.max(page) + 1;
        }

        tracing::info!("fetched {} transactions in {page} page(s)", all.len());
        Ok(all)
    }

    pub async fn transaction_get(&self, id: &Id) -> Result<Transaction> {
        self.get(&format!("transactions/{}", segment(id))).await
    }

    pub async fn transaction_create(&self, payload: &TransactionNew) -> Result<Transaction> {
        if payload.amount.is_negative() || payload.amount.is_zero() {
            return Err(ClientError::InvalidRequest(
                "amount must be positive; use the type for direction".to_string(),
            ));
        }
        self.create("transactions", payload).await
    }

    pub async fn transaction_update(
        &self,
        id: &Id,
        payload: &TransactionUpdate,
    ) -> Result<Transaction> {
        self.send_json(
            Method::PUT,
            &format!("transactions/{}", segment(id)),
            payload,
        )
        .await
    }

    pub async fn transaction_delete(&self, id: &Id) -> Result<()> {
        self.delete(&format!("transactions/{}", segment(id))).await
    }

    /// Moves money between two accounts: a debit on `from_account` and a
    /// credit on `to_account`, linked by a transfer id.
    pub async fn transfer_create(&self, payload: &TransferNew) -> Result<TransferCreated> {
        if payload.from_account == payload.to_account {
            return Err(ClientError::InvalidRequest(
                "cannot transfer to the same account".to_string(),
            ));
        }
        if payload.amount.is_negative() || payload.amount.is_zero() {
            return Err(ClientError::InvalidRequest(
                "transfer amount must be positive".to_string(),
            ));
        }
        self.create("transactions/transfer", payload).await
    }
}
