use api_types::{
    Id, Page,
    invoice::{Invoice, InvoiceFilter, InvoiceNew, InvoiceStatus, InvoiceStatusUpdate},
};
use reqwest::Method;

use crate::{Client, Result, segment};

impl Client {
    pub async fn invoices_list(&self, filter: &InvoiceFilter) -> Result<Page<Invoice>> {
        self.get_page("invoices", filter).await
    }

    pub async fn invoice_get(&self, id: &Id) -> Result<Invoice> {
        self.get(&format!("invoices/{}", segment(id))).await
    }

    pub async fn invoice_create(&self, payload: &InvoiceNew) -> Result<Invoice> {
        self.create("invoices", payload).await
    }

    pub async fn invoice_set_status(&self, id: &Id, status: InvoiceStatus) -> Result<Invoice> {
        self.send_json(
            Method::PATCH,
            &format!("invoices/{}/status", segment(id)),
            &InvoiceStatusUpdate { status },
        )
        .await
    }

    pub async fn invoice_delete(&self, id: &Id) -> Result<()> {
        self.delete(&format!("invoices/{}", segment(id))).await
    }
}
