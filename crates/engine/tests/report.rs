use api_types::{Envelope, Money, Page, account::Account, transaction::Transaction};
use engine::{AccountDirectory, CategoryDirectory, Report, ReportMeta, export, html};

/// Two pages of a newest-first listing. Each page carries snapshots computed
/// for that page only.
const PAGE_1: &str = r#"{
  "data": [
    {"_id": "t5", "account": {"_id": "chk", "name": "Checking"}, "amount": 40, "type": "debit",
     "date": "2024-06-05", "description": "Groceries", "category": {"_id": "food", "name": "Food"},
     "balanceAfterTransaction": 1260, "createdAt": "2024-06-05T18:00:00Z"},
    {"_id": "t4", "account": "sav", "amount": "200.00", "type": "credit",
     "date": "2024-06-04", "description": "Top up", "balanceAfterTransaction": 5200},
    {"_id": "t3", "account": {"_id": "chk", "name": "Checking"}, "amount": 100, "type": "debit",
     "date": "2024-06-03", "description": "Transfer to savings",
     "balanceAfterTransaction": 1300}
  ],
  "pagination": {"page": 1, "limit": 3, "total": 5, "pages": 2}
}"#;

const PAGE_2: &str = r#"{
  "data": [
    {"_id": "t2", "account": "chk", "amount": 400, "type": "credit",
     "date": "2024-06-02", "description": "Refund"},
    {"_id": "t1", "account": "chk", "amount": 1000, "type": "credit",
     "date": "2024-06-01", "description": "Salary", "category": "salary",
     "balanceAfterTransaction": 1000}
  ],
  "pagination": {"page": 2, "limit": 3, "total": 5, "pages": 2}
}"#;

const ACCOUNTS: &str = r#"[
  {"_id": "chk", "name": "Checking", "type": "debit", "balance": 1260},
  {"_id": "sav", "name": "Savings", "type": "debit", "balance": 5200}
]"#;

fn fetched() -> Vec<Transaction> {
    [PAGE_1, PAGE_2]
        .into_iter()
        .flat_map(|raw| {
            let envelope: Envelope<Vec<Transaction>> = serde_json::from_str(raw).unwrap();
            Page::from(envelope).items
        })
        .collect()
}

fn build() -> Report {
    let accounts: Vec<Account> = serde_json::from_str(ACCOUNTS).unwrap();
    let mut meta = ReportMeta::new("June statement", engine::parse_timezone("UTC").unwrap());
    meta.currency = "EUR".to_string();
    Report::build(
        meta,
        &fetched(),
        &AccountDirectory::new(accounts),
        &CategoryDirectory::default(),
    )
    .unwrap()
}

#[test]
fn report_orders_rows_and_rebuilds_balances_across_pages() {
    let report = build();

    let ids: Vec<&str> = report.rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2", "t3", "t4", "t5"]);

    // Checking starts from the oldest snapshot (t1: 1000 - 1000 = 0).
    let balances: Vec<i64> = report
        .rows
        .iter()
        .map(|r| r.running_balance.minor() / 100)
        .collect();
    assert_eq!(balances, vec![1000, 1400, 1300, 5200, 1260]);

    let checking = report.accounts.iter().find(|a| a.name == "Checking").unwrap();
    assert_eq!(checking.opening, Money::ZERO);
    assert_eq!(checking.closing, Money::new(126_000));
    assert_eq!(checking.count, 4);

    let savings = report.accounts.iter().find(|a| a.name == "Savings").unwrap();
    assert_eq!(savings.opening, Money::new(500_000));

    assert_eq!(report.totals.credits, Money::new(160_000));
    assert_eq!(report.totals.debits, Money::new(14_000));
}

#[test]
fn report_exports_to_html_and_csv() {
    let report = build();

    let page = html::render(&report);
    assert!(page.contains("June statement"));
    assert!(page.contains("<td>Checking</td>"));
    assert!(page.contains("1260.00 EUR"));

    let mut out = Vec::new();
    export::write_csv(&report, &mut out).unwrap();
    let csv = String::from_utf8(out).unwrap();
    assert_eq!(csv.lines().count(), 6);
    assert!(csv.lines().nth(1).unwrap().starts_with("2024-06-01,Checking,Salary,salary,"));
}
