//! Transaction report: reconstructed rows plus per-account and per-category
//! summaries, ready for rendering.

use std::collections::BTreeMap;

use api_types::{
    Id, Money,
    transaction::{Transaction, TransactionType},
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    EngineError, ResultEngine,
    balance::{self, Reconstruction, accumulate},
    directory::{AccountDirectory, CategoryDirectory},
};

const UNCATEGORIZED: &str = "Uncategorized";

/// Parses an IANA timezone name such as `Europe/Rome`.
pub fn parse_timezone(name: &str) -> ResultEngine<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| EngineError::UnknownTimezone(name.to_string()))
}

/// Header information of a report.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportMeta {
    pub title: String,
    pub organization: Option<String>,
    /// Currency code appended to amounts. May be empty.
    pub currency: String,
    pub timezone: Tz,
    pub generated_at: DateTime<Utc>,
    /// Human description of the filter the rows were fetched with.
    pub filter_description: String,
}

impl ReportMeta {
    pub fn new(title: impl Into<String>, timezone: Tz) -> Self {
        Self {
            title: title.into(),
            organization: None,
            currency: String::new(),
            timezone,
            generated_at: Utc::now(),
            filter_description: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub id: Id,
    pub date: DateTime<Utc>,
    pub account_id: Id,
    pub account: String,
    pub description: String,
    pub category: String,
    pub counterparty: String,
    pub party: String,
    pub reference: String,
    pub tx_type: TransactionType,
    pub amount: Money,
    pub running_balance: Money,
}

impl ReportRow {
    pub fn signed_amount(&self) -> Money {
        balance::signed_delta(self.amount, self.tx_type)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountTotals {
    pub account_id: Id,
    pub name: String,
    pub opening: Money,
    pub credits: Money,
    pub debits: Money,
    pub closing: Money,
    pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryTotals {
    pub name: String,
    pub credits: Money,
    pub debits: Money,
    pub count: usize,
}

impl CategoryTotals {
    pub fn net(&self) -> Money {
        self.credits - self.debits
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub credits: Money,
    pub debits: Money,
    pub count: usize,
}

impl Totals {
    pub fn net(&self) -> Money {
        self.credits - self.debits
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub meta: ReportMeta,
    pub rows: Vec<ReportRow>,
    pub accounts: Vec<AccountTotals>,
    pub categories: Vec<CategoryTotals>,
    pub totals: Totals,
}

impl Report {
    /// Builds the report from every fetched transaction, in fetched order.
    ///
    /// Fails with [`EngineError::Overflow`] when a balance or a total leaves
    /// the range of minor units.
    pub fn build(
        meta: ReportMeta,
        transactions: &[Transaction],
        accounts: &AccountDirectory,
        categories: &CategoryDirectory,
    ) -> ResultEngine<Self> {
        let Reconstruction {
            rows: balanced,
            starting,
            closing,
        } = balance::reconstruct(transactions)?;

        let mut per_account: BTreeMap<Id, AccountTotals> = starting
            .iter()
            .map(|(id, opening)| {
                let totals = AccountTotals {
                    account_id: id.clone(),
                    opening: *opening,
                    closing: closing.get(id).copied().unwrap_or(*opening),
                    ..AccountTotals::default()
                };
                (id.clone(), totals)
            })
            .collect();
        let mut per_category: BTreeMap<String, CategoryTotals> = BTreeMap::new();
        let mut totals = Totals::default();

        let mut rows = Vec::with_capacity(balanced.len());
        for entry in balanced {
            let tx = entry.transaction;
            let account = accounts.name_of(&tx.account);
            let category = match tx.category.as_ref() {
                Some(reference) => categories.name_of(reference),
                None => UNCATEGORIZED.to_string(),
            };

            let account_totals = per_account.entry(tx.account.id().clone()).or_default();
            account_totals.name.clone_from(&account);
            account_totals.count += 1;

            let category_totals =
                per_category
                    .entry(category.clone())
                    .or_insert_with(|| CategoryTotals {
                        name: category.clone(),
                        ..CategoryTotals::default()
                    });
            category_totals.count += 1;
            totals.count += 1;

            match tx.tx_type {
                TransactionType::Credit => {
                    accumulate(&mut account_totals.credits, tx.amount)?;
                    accumulate(&mut category_totals.credits, tx.amount)?;
                    accumulate(&mut totals.credits, tx.amount)?;
                }
                TransactionType::Debit => {
                    accumulate(&mut account_totals.debits, tx.amount)?;
                    accumulate(&mut category_totals.debits, tx.amount)?;
                    accumulate(&mut totals.debits, tx.amount)?;
                }
            }

            rows.push(ReportRow {
                account_id: tx.account.id().clone(),
                account,
                description: tx.description.unwrap_or_default(),
                category,
                counterparty: embedded_name(tx.counterparty.as_ref()),
                party: embedded_name(tx.party.as_ref()),
                reference: tx.reference.unwrap_or_default(),
                tx_type: tx.tx_type,
                amount: tx.amount,
                running_balance: entry.running_balance,
                date: tx.date,
                id: tx.id,
            });
        }

        // `net()` subtracts without checks; make sure it cannot overflow.
        checked_net(&totals.credits, &totals.debits)?;
        for category in per_category.values() {
            checked_net(&category.credits, &category.debits)?;
        }

        let mut accounts: Vec<AccountTotals> = per_account.into_values().collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.account_id.cmp(&b.account_id)));

        let mut categories: Vec<CategoryTotals> = per_category.into_values().collect();
        categories.sort_by(|a, b| {
            volume(b)
                .cmp(&volume(a))
                .then_with(|| a.name.cmp(&b.name))
        });

        tracing::info!(
            "report '{}' built: {} rows, {} accounts",
            meta.title,
            rows.len(),
            accounts.len()
        );

        Ok(Self {
            meta,
            rows,
            accounts,
            categories,
            totals,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Formats an amount with the report currency.
    pub fn money(&self, amount: Money) -> String {
        amount.with_code(&self.meta.currency)
    }

    /// Formats a timestamp as a calendar date in the report timezone.
    pub fn date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.meta.timezone)
            .format("%Y-%m-%d")
            .to_string()
    }
}

fn checked_net(credits: &Money, debits: &Money) -> ResultEngine<Money> {
    credits
        .checked_sub(*debits)
        .ok_or_else(|| EngineError::Overflow(format!("{credits} - {debits}")))
}

fn volume(category: &CategoryTotals) -> i128 {
    i128::from(category.credits.minor()) + i128::from(category.debits.minor())
}

/// Counterparties and parties are not fetched for reports; only the embedded
/// name (or the id) is available.
fn embedded_name<R: api_types::Identified>(
    reference: Option<&api_types::Reference<R>>,
) -> String {
    reference
        .map(|r| {
            r.label()
                .map(ToString::to_string)
                .unwrap_or_else(|| r.id().to_string())
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use api_types::{
        Reference,
        category::{Category, CategoryKind, CategorySummary},
    };
    use chrono::TimeZone;

    use super::*;

    fn tx(id: &str, account: &str, amount: i64, tx_type: TransactionType, day: u32) -> Transaction {
        Transaction {
            id: Id::from(id),
            account: Reference::Id(Id::from(account)),
            amount: Money::new(amount),
            tx_type,
            date: Utc.with_ymd_and_hms(2024, 2, day, 23, 30, 0).unwrap(),
            description: Some(format!("tx {id}")),
            category: None,
            counterparty: None,
            party: None,
            balance_after_transaction: None,
            transfer_id: None,
            reference: None,
            created_at: None,
        }
    }

    #[test]
    fn totals_and_categories() {
        let mut salary = tx("t1", "a", 10_000, TransactionType::Credit, 1);
        salary.category = Some(Reference::Id(Id::from("c1")));
        let mut rent = tx("t2", "a", 4_000, TransactionType::Debit, 2);
        rent.category = Some(Reference::Embedded(CategorySummary {
            id: Id::from("c2"),
            name: Some("Rent".to_string()),
        }));
        let misc = tx("t3", "b", 500, TransactionType::Debit, 3);

        let categories = CategoryDirectory::new([Category {
            id: Id::from("c1"),
            name: "Salary".to_string(),
            kind: CategoryKind::Income,
            color: None,
            parent: None,
        }]);
        let meta = ReportMeta::new("Feb", chrono_tz::UTC);
        let report = Report::build(
            meta,
            &[salary, rent, misc],
            &AccountDirectory::default(),
            &categories,
        )
        .unwrap();

        assert_eq!(report.totals.credits, Money::new(10_000));
        assert_eq!(report.totals.debits, Money::new(4_500));
        assert_eq!(report.totals.net(), Money::new(5_500));
        assert_eq!(report.totals.count, 3);

        let names: Vec<&str> = report.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Salary", "Rent", UNCATEGORIZED]);

        let b = report.accounts.iter().find(|a| a.account_id.as_str() == "b").unwrap();
        assert_eq!((b.opening, b.debits, b.closing), (Money::ZERO, Money::new(500), Money::new(-500)));
        assert_eq!(b.name, "b");
    }

    #[test]
    fn dates_render_in_report_timezone() {
        let meta = ReportMeta::new("tz", parse_timezone("Europe/Rome").unwrap());
        let report = Report::build(
            meta,
            &[tx("t1", "a", 100, TransactionType::Credit, 1)],
            &AccountDirectory::default(),
            &CategoryDirectory::default(),
        )
        .unwrap();
        assert_eq!(report.date(report.rows[0].date), "2024-02-02");
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn totals_that_overflow_are_an_error() {
        // Balances stay in range per account, the debit total does not.
        let mut rows = vec![
            tx("t1", "a", i64::MAX, TransactionType::Debit, 1),
            tx("t2", "b", i64::MAX, TransactionType::Debit, 2),
        ];
        for row in &mut rows {
            row.balance_after_transaction = Some(Money::new(0));
        }
        let result = Report::build(
            ReportMeta::new("huge", chrono_tz::UTC),
            &rows,
            &AccountDirectory::default(),
            &CategoryDirectory::default(),
        );
        assert!(matches!(result, Err(EngineError::Overflow(_))));
    }
}
