//! Self-contained HTML rendering of a [`Report`], suitable for printing to
//! PDF.

use api_types::{Money, transaction::TransactionType};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::report::Report;

const STYLE: &str = "\
body{font-family:-apple-system,Helvetica,Arial,sans-serif;color:#1f2933;margin:24px;font-size:12px}\
h1{font-size:20px;margin:0 0 4px}\
h2{font-size:14px;margin:24px 0 8px}\
.meta{color:#616e7c;margin:0 0 2px}\
table{width:100%;border-collapse:collapse}\
th,td{padding:4px 6px;border-bottom:1px solid #e4e7eb;text-align:left}\
th{background:#f5f7fa;font-weight:600}\
td.num,th.num{text-align:right;white-space:nowrap}\
.credit{color:#0b7a3e}\
.debit{color:#b42318}\
.summary td{font-weight:600}\
.empty{color:#616e7c;font-style:italic}";

fn amount_class(amount: Money) -> &'static str {
    if amount.is_negative() { "debit" } else { "credit" }
}

/// Renders the report as a complete HTML document.
pub fn render(report: &Report) -> String {
    let meta = &report.meta;
    let generated = meta
        .generated_at
        .with_timezone(&meta.timezone)
        .format("%Y-%m-%d %H:%M %Z")
        .to_string();

    let page = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (meta.title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { (meta.title) }
                @if let Some(org) = &meta.organization {
                    p class="meta" { (org) }
                }
                @if !meta.filter_description.is_empty() {
                    p class="meta" { (meta.filter_description) }
                }
                p class="meta" { "Generated " (generated) }

                (totals_html(report))
                (accounts_html(report))
                (categories_html(report))
                (rows_html(report))
            }
        }
    };
    page.into_string()
}

fn totals_html(report: &Report) -> Markup {
    let totals = &report.totals;
    html! {
        h2 { "Summary" }
        table class="summary" {
            tr {
                th { "Transactions" }
                th class="num" { "Credits" }
                th class="num" { "Debits" }
                th class="num" { "Net" }
            }
            tr {
                td { (totals.count.to_string()) }
                td class="num credit" { (report.money(totals.credits)) }
                td class="num debit" { (report.money(totals.debits)) }
                td class={ "num " (amount_class(totals.net())) } { (report.money(totals.net())) }
            }
        }
    }
}

fn accounts_html(report: &Report) -> Markup {
    html! {
        @if !report.accounts.is_empty() {
            h2 { "Accounts" }
            table {
                tr {
                    th { "Account" }
                    th class="num" { "Opening" }
                    th class="num" { "Credits" }
                    th class="num" { "Debits" }
                    th class="num" { "Closing" }
                }
                @for account in &report.accounts {
                    tr {
                        td { (account.name) }
                        td class="num" { (report.money(account.opening)) }
                        td class="num credit" { (report.money(account.credits)) }
                        td class="num debit" { (report.money(account.debits)) }
                        td class="num" { (report.money(account.closing)) }
                    }
                }
            }
        }
    }
}

fn categories_html(report: &Report) -> Markup {
    html! {
        @if !report.categories.is_empty() {
            h2 { "Categories" }
            table {
                tr {
                    th { "Category" }
                    th class="num" { "Count" }
                    th class="num" { "Credits" }
                    th class="num" { "Debits" }
                    th class="num" { "Net" }
                }
                @for category in &report.categories {
                    tr {
                        td { (category.name) }
                        td class="num" { (category.count.to_string()) }
                        td class="num credit" { (report.money(category.credits)) }
                        td class="num debit" { (report.money(category.debits)) }
                        td class={ "num " (amount_class(category.net())) } { (report.money(category.net())) }
                    }
                }
            }
        }
    }
}

fn rows_html(report: &Report) -> Markup {
    html! {
        h2 { "Transactions" }
        @if report.is_empty() {
            p class="empty" { "No transactions match the selected filters." }
        } @else {
            table {
                tr {
                    th { "Date" }
                    th { "Account" }
                    th { "Description" }
                    th { "Category" }
                    th class="num" { "Amount" }
                    th class="num" { "Balance" }
                }
                @for row in &report.rows {
                    @let class = match row.tx_type {
                        TransactionType::Credit => "credit",
                        TransactionType::Debit => "debit",
                    };
                    tr {
                        td { (report.date(row.date)) }
                        td { (row.account) }
                        td {
                            (row.description)
                            @for extra in [&row.counterparty, &row.party, &row.reference] {
                                @if !extra.is_empty() {
                                    " "
                                    span class="meta" { (extra) }
                                }
                            }
                        }
                        td { (row.category) }
                        td class={ "num " (class) } { (report.money(row.signed_amount())) }
                        td class="num" { (report.money(row.running_balance)) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use api_types::{Id, Reference, transaction::Transaction};
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        directory::{AccountDirectory, CategoryDirectory},
        report::ReportMeta,
    };

    #[test]
    fn renders_rows_with_signed_amounts_and_balances() {
        let tx = Transaction {
            id: Id::from("t1"),
            account: Reference::Id(Id::from("a1")),
            amount: Money::new(1_250),
            tx_type: TransactionType::Debit,
            date: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
            description: Some("Coffee <beans>".to_string()),
            category: None,
            counterparty: None,
            party: None,
            balance_after_transaction: Some(Money::new(8_750)),
            transfer_id: None,
            reference: Some("<script>alert(1)</script>".to_string()),
            created_at: None,
        };
        let mut meta = ReportMeta::new("March & co", chrono_tz::UTC);
        meta.currency = "EUR".to_string();
        let report = Report::build(
            meta,
            &[tx],
            &AccountDirectory::default(),
            &CategoryDirectory::default(),
        )
        .unwrap();

        let html = render(&report);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>March &amp; co</h1>"));
        assert!(html.contains("<td>Coffee &lt;beans&gt; <span class=\"meta\">&lt;script&gt;alert(1)&lt;/script&gt;</span></td>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("-12.50 EUR"));
        assert!(html.contains("87.50 EUR"));
        assert!(html.contains("2024-03-05"));
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn empty_report_says_so() {
        let report = Report::build(
            ReportMeta::new("Nothing", chrono_tz::UTC),
            &[],
            &AccountDirectory::default(),
            &CategoryDirectory::default(),
        )
        .unwrap();
        assert!(render(&report).contains("No transactions match"));
    }
}
