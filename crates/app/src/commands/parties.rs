use api_types::{
    Money,
    invoice::{Invoice, InvoiceFilter},
    party::Party,
};
use chrono::Utc;
use engine::invoice::{draft_totals, is_overdue, line_amount};

use super::Context;
use crate::{
    cli::{InvoicesCommand, PartiesCommand},
    error::Result,
};

pub async fn run(ctx: &Context, command: PartiesCommand) -> Result<()> {
    match command {
        PartiesCommand::List { party_type } => {
            for party in ctx.client.parties_list(party_type.map(Into::into)).await? {
                print_party(ctx, &party);
            }
        }
        PartiesCommand::Show { party } => {
            let id = ctx.party_id(&party).await?;
            let party = ctx.client.party_get(&id).await?;
            print_party(ctx, &party);
            for line in [&party.email, &party.phone, &party.address]
                .into_iter()
                .flatten()
            {
                println!("  {line}");
            }
            println!("  opening balance {}", ctx.money(party.opening_balance));
        }
        PartiesCommand::Ledger { party } => {
            let id = ctx.party_id(&party).await?;
            let ledger = ctx.client.party_ledger(&id).await?;
            println!("{} ({})", ledger.party.name, ledger.party.party_type.as_str());
            ledger_line("Date", "Description", "Debit", "Credit", "Balance");
            ledger_line("", "Opening balance", "", "", &ctx.money(ledger.opening_balance));
            for entry in &ledger.entries {
                ledger_line(
                    &ctx.date(entry.date),
                    entry.description.as_deref().unwrap_or(""),
                    &blank_zero(ctx, entry.debit),
                    &blank_zero(ctx, entry.credit),
                    &ctx.money(entry.balance),
                );
            }
            ledger_line("", "Closing balance", "", "", &ctx.money(ledger.closing_balance));
        }
    }
    Ok(())
}

fn print_party(ctx: &Context, party: &Party) {
    println!(
        "{:<26} {:<28} {:<9} {:>16}",
        party.id.as_str(),
        party.name,
        party.party_type.as_str(),
        ctx.money(party.balance)
    );
}

fn ledger_line(date: &str, description: &str, debit: &str, credit: &str, balance: &str) {
    println!("{date:<10}  {description:<32} {debit:>14} {credit:>14} {balance:>16}");
}

fn blank_zero(ctx: &Context, amount: Money) -> String {
    if amount.is_zero() {
        String::new()
    } else {
        ctx.money(amount)
    }
}

pub async fn invoices(ctx: &Context, command: InvoicesCommand) -> Result<()> {
    match command {
        InvoicesCommand::List { party, status } => {
            let party = match &party {
                Some(input) => Some(ctx.party_id(input).await?),
                None => None,
            };
            let filter = InvoiceFilter {
                party,
                status: status.map(Into::into),
                ..InvoiceFilter::default()
            };
            let page = ctx.client.invoices_list(&filter).await?;
            let now = Utc::now();
            for invoice in &page.items {
                print_invoice(ctx, invoice, now);
            }
            println!("{} invoice(s)", page.pagination.total);
        }
        InvoicesCommand::Show { id } => {
            let invoice = ctx.client.invoice_get(&id).await?;
            print_invoice(ctx, &invoice, Utc::now());
            for item in &invoice.items {
                println!(
                    "  {:<32} {:>8} x {:>12} {:>6}% {:>14}",
                    item.description,
                    item.quantity.to_string(),
                    item.unit_price.to_string(),
                    item.tax_rate.to_string(),
                    ctx.money(line_amount(item))
                );
            }
            let totals = draft_totals(&invoice.items);
            if !invoice.items.is_empty()
                && (totals.total != invoice.total || totals.tax != invoice.tax_total)
            {
                tracing::warn!(
                    "invoice {} totals differ from its lines: {} vs {}",
                    invoice.number,
                    invoice.total,
                    totals.total
                );
            }
            println!("  subtotal {}", ctx.money(invoice.subtotal));
            println!("  tax      {}", ctx.money(invoice.tax_total));
            println!("  total    {}", ctx.money(invoice.total));
            if let Some(notes) = &invoice.notes {
                println!("  {notes}");
            }
        }
        InvoicesCommand::Status { id, status } => {
            let invoice = ctx.client.invoice_set_status(&id, status.into()).await?;
            println!("Invoice {} is now {}", invoice.number, invoice.status.as_str());
        }
    }
    Ok(())
}

fn print_invoice(ctx: &Context, invoice: &Invoice, now: chrono::DateTime<Utc>) {
    let party = invoice
        .party
        .label()
        .unwrap_or(invoice.party.id().as_str());
    let due = invoice.due_date.map(|d| ctx.date(d)).unwrap_or_default();
    let status = if is_overdue(invoice, now) {
        "overdue"
    } else {
        invoice.status.as_str()
    };
    println!(
        "{:<12} {:<24} {:<10} {:<10} {:<9} {:>16}",
        invoice.number,
        party,
        ctx.date(invoice.issue_date),
        due,
        status,
        ctx.money(invoice.total)
    );
}
