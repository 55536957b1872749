//! CSV export of report rows.

use std::io::Write;

use serde::Serialize;

use crate::{ResultEngine, report::Report};

#[derive(Serialize)]
struct ExportRow<'a> {
    date: String,
    account: &'a str,
    description: &'a str,
    category: &'a str,
    counterparty: &'a str,
    party: &'a str,
    reference: &'a str,
    #[serde(rename = "type")]
    tx_type: &'static str,
    amount: String,
    balance: String,
    id: &'a str,
}

/// Writes one line per report row, in report order, with a header.
/// Amounts are signed and carry no currency code.
pub fn write_csv<W: Write>(report: &Report, writer: W) -> ResultEngine<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in &report.rows {
        csv.serialize(ExportRow {
            date: report.date(row.date),
            account: &row.account,
            description: &row.description,
            category: &row.category,
            counterparty: &row.counterparty,
            party: &row.party,
            reference: &row.reference,
            tx_type: row.tx_type.as_str(),
            amount: row.signed_amount().to_string(),
            balance: row.running_balance.to_string(),
            id: row.id.as_str(),
        })?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use api_types::{
        Id, Money, Reference,
        transaction::{Transaction, TransactionType},
    };
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        directory::{AccountDirectory, CategoryDirectory},
        report::ReportMeta,
    };

    #[test]
    fn writes_header_and_signed_rows() {
        let tx = Transaction {
            id: Id::from("t1"),
            account: Reference::Id(Id::from("a1")),
            amount: Money::new(300),
            tx_type: TransactionType::Debit,
            date: Utc.with_ymd_and_hms(2024, 1, 9, 8, 0, 0).unwrap(),
            description: Some("Bus, ticket".to_string()),
            category: None,
            counterparty: None,
            party: None,
            balance_after_transaction: Some(Money::new(700)),
            transfer_id: None,
            reference: None,
            created_at: None,
        };
        let report = Report::build(
            ReportMeta::new("csv", chrono_tz::UTC),
            &[tx],
            &AccountDirectory::default(),
            &CategoryDirectory::default(),
        )
        .unwrap();

        let mut out = Vec::new();
        write_csv(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("date,account,description,category,counterparty,party,reference,type,amount,balance,id")
        );
        assert_eq!(
            lines.next(),
            Some("2024-01-09,a1,\"Bus, ticket\",Uncategorized,,,,debit,-3.00,7.00,t1")
        );
        assert_eq!(lines.next(), None);
    }
}
