use api_types::{report::ReportSummary, transaction::TransactionFilter};

use crate::{Client, Result};

impl Client {
    /// Server-side totals for the same filter used to list transactions.
    pub async fn report_summary(&self, filter: &TransactionFilter) -> Result<ReportSummary> {
        self.get_with("reports/summary", filter).await
    }
}
