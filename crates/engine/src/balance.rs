//! Running balance reconstruction.
//!
//! The server only stamps `balance_after_transaction` on the rows of the page
//! it computed them for. Once several pages of a filtered listing are joined,
//! those snapshots are no longer consistent with one another, so the report
//! rebuilds a running balance per account from a single snapshot:
//!
//! 1. keep the last snapshot seen for each account (in fetched order) with the
//!    amount and type of the transaction that produced it;
//! 2. undo that transaction to get the account's starting balance;
//! 3. sort everything by date, then creation time;
//! 4. walk forward applying each signed amount.
//!
//! Accounts that never carry a snapshot start from zero.
//!
//! Amounts are added with overflow checks; a sum outside the `i64` range of
//! minor units is reported as [`EngineError::Overflow`].

use std::collections::{BTreeMap, HashMap};

use api_types::{
    Id, Money,
    transaction::{Transaction, TransactionType},
};

use crate::{EngineError, ResultEngine};

/// A transaction with the balance of its account right after it.
#[derive(Clone, Debug, PartialEq)]
pub struct BalancedTransaction {
    pub transaction: Transaction,
    pub running_balance: Money,
}

/// Output of [`reconstruct`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconstruction {
    /// Transactions in chronological order.
    pub rows: Vec<BalancedTransaction>,
    /// Balance of every account before its first transaction in `rows`.
    pub starting: BTreeMap<Id, Money>,
    /// Balance of every account after its last transaction in `rows`.
    pub closing: BTreeMap<Id, Money>,
}

/// Effect of a transaction on its account balance.
#[must_use]
pub fn signed_delta(amount: Money, tx_type: TransactionType) -> Money {
    match tx_type {
        TransactionType::Credit => amount,
        TransactionType::Debit => -amount,
    }
}

/// Adds `amount` to `total` in place.
pub(crate) fn accumulate(total: &mut Money, amount: Money) -> ResultEngine<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| EngineError::Overflow(format!("{total} + {amount}")))?;
    Ok(())
}

/// Starting balance of every account that appears in `transactions`.
///
/// The last snapshot seen for an account wins; its transaction is undone to
/// recover the balance before it.
pub fn starting_balances(transactions: &[Transaction]) -> ResultEngine<BTreeMap<Id, Money>> {
    let mut snapshots: HashMap<&Id, (Money, Money)> = HashMap::new();
    let mut accounts: BTreeMap<Id, Money> = BTreeMap::new();

    for tx in transactions {
        let account = tx.account.id();
        accounts.entry(account.clone()).or_insert(Money::ZERO);
        if let Some(snapshot) = tx.balance_after_transaction {
            snapshots.insert(account, (snapshot, signed_delta(tx.amount, tx.tx_type)));
        }
    }

    for (account, start) in accounts.iter_mut() {
        match snapshots.get(account) {
            Some((snapshot, delta)) => {
                *start = snapshot.checked_sub(*delta).ok_or_else(|| {
                    EngineError::Overflow(format!("{snapshot} - {delta} for account {account}"))
                })?;
            }
            None => {
                tracing::debug!("account {account} has no balance snapshot, starting from zero")
            }
        }
    }

    Ok(accounts)
}

/// Orders transactions by date, then creation time. Rows without a creation
/// time sort before rows with one on the same date; remaining ties keep
/// their fetched order.
pub fn sort_chronologically(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Rebuilds the running balance of every account across `transactions`.
///
/// The input order matters only for picking snapshots and for breaking full
/// ties; the result is otherwise independent of it. The function never reads
/// a previously stamped running balance, so running it again on the same
/// input gives the same output.
pub fn reconstruct(transactions: &[Transaction]) -> ResultEngine<Reconstruction> {
    let starting = starting_balances(transactions)?;

    let mut ordered = transactions.to_vec();
    sort_chronologically(&mut ordered);

    let mut running = starting.clone();
    let mut rows = Vec::with_capacity(ordered.len());
    for tx in ordered {
        let balance = running.entry(tx.account.id().clone()).or_insert(Money::ZERO);
        accumulate(balance, signed_delta(tx.amount, tx.tx_type))?;
        rows.push(BalancedTransaction {
            running_balance: *balance,
            transaction: tx,
        });
    }

    tracing::debug!(
        "reconstructed {} rows over {} accounts",
        rows.len(),
        starting.len()
    );

    Ok(Reconstruction {
        rows,
        starting,
        closing: running,
    })
}

#[cfg(test)]
mod tests {
    use api_types::{Reference, transaction::TransactionType::*};
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    use super::*;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap()
    }

    fn tx(
        id: &str,
        account: &str,
        amount: i64,
        tx_type: TransactionType,
        date: DateTime<Utc>,
        snapshot: Option<i64>,
    ) -> Transaction {
        Transaction {
            id: Id::from(id),
            account: Reference::Id(Id::from(account)),
            amount: Money::new(amount),
            tx_type,
            date,
            description: None,
            category: None,
            counterparty: None,
            party: None,
            balance_after_transaction: snapshot.map(Money::new),
            transfer_id: None,
            reference: None,
            created_at: None,
        }
    }

    fn ids(rec: &Reconstruction) -> Vec<&str> {
        rec.rows
            .iter()
            .map(|r| r.transaction.id.as_str())
            .collect()
    }

    fn balances(rec: &Reconstruction) -> Vec<i64> {
        rec.rows.iter().map(|r| r.running_balance.minor()).collect()
    }

    /// Newest-first, the order the server pages in.
    fn sample() -> Vec<Transaction> {
        vec![
            tx("t4", "a", 300, Debit, day(4), Some(1_700)),
            tx("t3", "b", 1_000, Credit, day(3), Some(6_000)),
            tx("t2", "a", 500, Credit, day(2), Some(2_000)),
            tx("t1", "a", 1_000, Credit, day(1), Some(1_500)),
        ]
    }

    #[test]
    fn starting_balance_undoes_last_snapshot() {
        let starts = starting_balances(&sample()).unwrap();
        assert_eq!(starts[&Id::from("a")], Money::new(500));
        assert_eq!(starts[&Id::from("b")], Money::new(5_000));
    }

    #[test]
    fn debit_snapshot_is_added_back() {
        let txs = vec![tx("t1", "a", 250, Debit, day(1), Some(750))];
        assert_eq!(starting_balances(&txs).unwrap()[&Id::from("a")], Money::new(1_000));
    }

    #[test]
    fn walks_forward_in_date_order() {
        let rec = reconstruct(&sample()).unwrap();
        assert_eq!(ids(&rec), vec!["t1", "t2", "t3", "t4"]);
        assert_eq!(balances(&rec), vec![1_500, 2_000, 6_000, 1_700]);
        assert_eq!(rec.closing[&Id::from("a")], Money::new(1_700));
        assert_eq!(rec.closing[&Id::from("b")], Money::new(6_000));
    }

    #[test]
    fn account_without_snapshot_starts_at_zero() {
        let txs = vec![
            tx("t1", "a", 1_000, Credit, day(1), None),
            tx("t2", "a", 400, Debit, day(2), None),
        ];
        let rec = reconstruct(&txs).unwrap();
        assert_eq!(rec.starting[&Id::from("a")], Money::ZERO);
        assert_eq!(balances(&rec), vec![1_000, 600]);
    }

    #[test]
    fn same_date_breaks_ties_on_created_at() {
        let mut late = tx("late", "a", 100, Credit, day(1), None);
        late.created_at = Some(day(1) + chrono::Duration::hours(5));
        let mut early = tx("early", "a", 200, Credit, day(1), None);
        early.created_at = Some(day(1) + chrono::Duration::hours(1));
        let undated = tx("undated", "a", 300, Credit, day(1), None);

        let rec = reconstruct(&[late, early, undated]).unwrap();
        assert_eq!(ids(&rec), vec!["undated", "early", "late"]);
        assert_eq!(balances(&rec), vec![300, 500, 600]);
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(reconstruct(&[]).unwrap(), Reconstruction::default());
    }

    #[test]
    fn huge_amounts_overflow_into_an_error() {
        let txs: Vec<Transaction> = serde_json::from_str(
            r#"[
              {"_id": "t1", "account": "a", "amount": "50000000000000000", "type": "credit", "date": "2024-05-01"},
              {"_id": "t2", "account": "a", "amount": "50000000000000000", "type": "credit", "date": "2024-05-02"}
            ]"#,
        )
        .unwrap();
        assert!(matches!(reconstruct(&txs), Err(EngineError::Overflow(_))));

        let debit = vec![tx("t1", "a", i64::MAX, Debit, day(1), Some(i64::MAX))];
        assert!(matches!(starting_balances(&debit), Err(EngineError::Overflow(_))));
    }

    /// (account, amount, credit, day, created_at hour, snapshot). Account `d`
    /// never carries a snapshot.
    type Row = (usize, i64, bool, u32, Option<i64>, Option<i64>);

    fn rows_strategy() -> impl Strategy<Value = Vec<Row>> {
        prop::collection::vec(
            (
                0usize..4,
                1i64..1_000_000,
                any::<bool>(),
                1u32..5,
                prop::option::of(0i64..3),
                prop::option::of(-1_000_000_000i64..1_000_000_000),
            ),
            0..40,
        )
    }

    fn build(rows: &[Row]) -> Vec<Transaction> {
        rows.iter()
            .enumerate()
            .map(|(idx, (account, amount, credit, d, hour, snapshot))| {
                let account = ["a", "b", "c", "d"][*account];
                let snapshot = if account == "d" { None } else { *snapshot };
                let tx_type = if *credit { Credit } else { Debit };
                let mut t = tx(&format!("t{idx}"), account, *amount, tx_type, day(*d), snapshot);
                t.created_at = (*hour).map(|h| day(*d) + chrono::Duration::hours(h));
                t
            })
            .collect()
    }

    fn position(t: &Transaction) -> usize {
        t.id.as_str()[1..].parse().unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn snapshot_equals_start_plus_its_delta(rows in rows_strategy()) {
            let txs = build(&rows);
            let starts = starting_balances(&txs).unwrap();

            for (account, start) in &starts {
                let last = txs
                    .iter()
                    .filter(|t| t.account.id() == account)
                    .filter(|t| t.balance_after_transaction.is_some())
                    .last();
                match last {
                    Some(last) => {
                        prop_assert_eq!(
                            *start + signed_delta(last.amount, last.tx_type),
                            last.balance_after_transaction.unwrap()
                        );
                    }
                    None => {
                        prop_assert_eq!(*start, Money::ZERO);
                    }
                }
            }
        }

        #[test]
        fn each_row_extends_previous_balance_of_its_account(rows in rows_strategy()) {
            let txs = build(&rows);
            let rec = reconstruct(&txs).unwrap();
            prop_assert_eq!(rec.rows.len(), txs.len());

            let mut last = rec.starting.clone();
            for row in &rec.rows {
                let account = row.transaction.account.id();
                let expected = last[account]
                    + signed_delta(row.transaction.amount, row.transaction.tx_type);
                prop_assert_eq!(row.running_balance, expected);
                last.insert(account.clone(), row.running_balance);
            }
            prop_assert_eq!(&last, &rec.closing);

            for pair in rec.rows.windows(2) {
                let (a, b) = (&pair[0].transaction, &pair[1].transaction);
                let key_a = (a.date, a.created_at);
                let key_b = (b.date, b.created_at);
                prop_assert!(key_a <= key_b);
                if key_a == key_b {
                    prop_assert!(position(a) < position(b));
                }
            }
        }

        #[test]
        fn rerunning_is_idempotent(rows in rows_strategy()) {
            let txs = build(&rows);
            let before = txs.clone();
            let first = reconstruct(&txs).unwrap();
            let second = reconstruct(&txs).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(txs, before);
        }
    }
}
