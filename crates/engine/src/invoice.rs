//! Invoice draft totals and due-date checks.

use api_types::{
    Money,
    invoice::{Invoice, InvoiceItem},
};
use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// `a * b / divisor`, rounded half away from zero.
fn mul_div_round(a: i64, b: i64, divisor: i64) -> i64 {
    let product = i128::from(a) * i128::from(b);
    let divisor = i128::from(divisor);
    let half = divisor / 2;
    let rounded = if product >= 0 {
        (product + half) / divisor
    } else {
        (product - half) / divisor
    };
    i64::try_from(rounded).unwrap_or(if rounded > 0 { i64::MAX } else { i64::MIN })
}

/// Net amount of one line: quantity × unit price.
pub fn line_amount(item: &InvoiceItem) -> Money {
    // Quantity is in hundredths.
    Money::new(mul_div_round(item.quantity.minor(), item.unit_price.minor(), 100))
}

/// Tax of one line; the rate is a percentage in hundredths.
pub fn line_tax(item: &InvoiceItem) -> Money {
    Money::new(mul_div_round(line_amount(item).minor(), item.tax_rate.minor(), 10_000))
}

/// Totals the server will compute for a draft, rounded per line.
pub fn draft_totals(items: &[InvoiceItem]) -> InvoiceTotals {
    let subtotal: Money = items.iter().map(line_amount).sum();
    let tax: Money = items.iter().map(line_tax).sum();
    InvoiceTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

/// An invoice is overdue once its due date has passed, unless it is paid or
/// cancelled. Invoices without a due date never are.
pub fn is_overdue(invoice: &Invoice, now: DateTime<Utc>) -> bool {
    if invoice.status.is_settled() {
        return false;
    }
    invoice.due_date.is_some_and(|due| due < now)
}

#[cfg(test)]
mod tests {
    use api_types::{Id, Reference, invoice::InvoiceStatus};
    use chrono::TimeZone;

    use super::*;

    fn item(quantity: i64, unit_price: i64, tax_rate: i64) -> InvoiceItem {
        InvoiceItem {
            description: "item".to_string(),
            quantity: Money::new(quantity),
            unit_price: Money::new(unit_price),
            tax_rate: Money::new(tax_rate),
        }
    }

    #[test]
    fn totals_round_per_line() {
        // 1.5 × 3.33 = 4.995 → 5.00; 22% of 5.00 = 1.10
        // 2 × 0.99 = 1.98; 5.5% of 1.98 = 0.1089 → 0.11
        let totals = draft_totals(&[item(150, 333, 2_200), item(200, 99, 550)]);
        assert_eq!(totals.subtotal, Money::new(698));
        assert_eq!(totals.tax, Money::new(121));
        assert_eq!(totals.total, Money::new(819));
    }

    #[test]
    fn credit_notes_round_away_from_zero() {
        assert_eq!(line_amount(&item(150, -333, 0)), Money::new(-500));
    }

    #[test]
    fn overdue_ignores_settled_invoices() {
        let due = Utc.with_ymd_and_hms(2024, 4, 30, 0, 0, 0).unwrap();
        let mut invoice = Invoice {
            id: Id::from("i1"),
            number: "2024-001".to_string(),
            party: Reference::Id(Id::from("p1")),
            issue_date: due - chrono::Duration::days(30),
            due_date: Some(due),
            status: InvoiceStatus::Sent,
            items: vec![],
            subtotal: Money::ZERO,
            tax_total: Money::ZERO,
            total: Money::ZERO,
            notes: None,
        };
        let later = due + chrono::Duration::days(1);
        assert!(is_overdue(&invoice, later));
        assert!(!is_overdue(&invoice, due));

        invoice.status = InvoiceStatus::Paid;
        assert!(!is_overdue(&invoice, later));

        invoice.status = InvoiceStatus::Draft;
        invoice.due_date = None;
        assert!(!is_overdue(&invoice, later));
    }
}
