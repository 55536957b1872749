use api_types::{
    Money,
    transaction::{TransactionNew, TransferNew},
};
use engine::{CategoryDirectory, balance::signed_delta};

use super::Context;
use crate::{
    cli::{FilterArgs, TransactionArgs, TransactionsCommand, TransferArgs},
    error::{AppError, Result},
};

pub async fn run(ctx: &Context, command: TransactionsCommand) -> Result<()> {
    match command {
        TransactionsCommand::List {
            filter,
            page,
            limit,
        } => list(ctx, &filter, page, limit).await,
        TransactionsCommand::Create(args) => create(ctx, args).await,
        TransactionsCommand::Delete { id } => {
            ctx.client.transaction_delete(&id).await?;
            println!("Deleted transaction {id}");
            Ok(())
        }
    }
}

async fn list(ctx: &Context, args: &FilterArgs, page: u32, limit: u32) -> Result<()> {
    let (state, accounts, categories) = ctx.filter(args).await?;
    let query = state
        .to_query()?
        .with_page(page.max(1), limit.clamp(1, api_client::MAX_PAGE_SIZE));
    let result = ctx.client.transactions_page(&query).await?;

    println!("{}", state.describe(&accounts, &categories));
    for tx in &result.items {
        let balance = tx
            .balance_after_transaction
            .map(|b| ctx.money(b))
            .unwrap_or_default();
        println!(
            "{}  {:<18} {:<30} {:<16} {:>14} {:>16}",
            ctx.date(tx.date),
            accounts.name_of(&tx.account),
            tx.description.as_deref().unwrap_or(""),
            categories.name_of_opt(tx.category.as_ref()),
            ctx.money(signed_delta(tx.amount, tx.tx_type)),
            balance,
        );
    }
    let p = result.pagination;
    println!("Page {} of {} ({} transactions)", p.page, p.pages.max(1), p.total);
    Ok(())
}

async fn create(ctx: &Context, args: TransactionArgs) -> Result<()> {
    let account = ctx.account_id(&args.account).await?;
    let category = match &args.category {
        Some(input) => Some(ctx.category_id(input).await?),
        None => None,
    };
    let counterparty = match &args.counterparty {
        Some(input) => Some(ctx.counterparty_id(input).await?),
        None => None,
    };
    let party = match &args.party {
        Some(input) => Some(ctx.party_id(input).await?),
        None => None,
    };

    let payload = TransactionNew {
        account,
        amount: positive(args.amount)?,
        tx_type: args.tx_type.into(),
        date: ctx.day(args.date),
        description: args.description,
        category,
        counterparty,
        party,
        reference: args.reference,
    };
    let tx = ctx.client.transaction_create(&payload).await?;
    println!(
        "Created transaction {} ({} {})",
        tx.id,
        tx.tx_type.as_str(),
        ctx.money(tx.amount)
    );
    if let Some(balance) = tx.balance_after_transaction {
        println!("Balance after: {}", ctx.money(balance));
    }
    Ok(())
}

pub async fn transfer(ctx: &Context, args: TransferArgs) -> Result<()> {
    let payload = TransferNew {
        from_account: ctx.account_id(&args.from).await?,
        to_account: ctx.account_id(&args.to).await?,
        amount: positive(args.amount)?,
        date: ctx.day(args.date),
        description: args.description,
    };
    let created = ctx.client.transfer_create(&payload).await?;
    println!(
        "Transferred {} from {} to {} (transfer {})",
        ctx.money(payload.amount),
        payload.from_account,
        payload.to_account,
        created.transfer_id
    );
    Ok(())
}

pub async fn summary(ctx: &Context, args: &FilterArgs) -> Result<()> {
    let (state, accounts, categories) = ctx.filter(args).await?;
    let summary = ctx.client.report_summary(&state.to_query()?).await?;

    println!("{}", state.describe(&accounts, &categories));
    println!("Credits:      {:>16}", ctx.money(summary.total_credit));
    println!("Debits:       {:>16}", ctx.money(summary.total_debit));
    println!("Net:          {:>16}", ctx.money(summary.net));
    println!("Transactions: {:>16}", summary.transaction_count);
    print_categories(ctx, &categories, &summary.by_category);
    Ok(())
}

fn print_categories(
    ctx: &Context,
    categories: &CategoryDirectory,
    totals: &[api_types::report::CategoryTotal],
) {
    if totals.is_empty() {
        return;
    }
    println!();
    for total in totals {
        let name = match &total.category {
            Some(category) => categories.name_of(category),
            None => "Uncategorized".to_string(),
        };
        println!("  {name:<24} {:>16} ({})", ctx.money(total.total), total.count);
    }
}

/// Amounts are entered unsigned; the type carries the direction.
fn positive(amount: Money) -> Result<Money> {
    if amount.is_negative() || amount.is_zero() {
        return Err(AppError::Engine(engine::EngineError::InvalidAmount(format!(
            "{amount} must be greater than zero"
        ))));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use api_types::transaction::TransactionType;

    use super::*;

    #[test]
    fn entered_amounts_must_be_positive() {
        assert_eq!(positive(Money::new(1)).unwrap(), Money::new(1));
        assert!(positive(Money::ZERO).is_err());
        assert!(positive(Money::new(-500)).is_err());
        assert_eq!(
            signed_delta(Money::new(500), TransactionType::Debit),
            Money::new(-500)
        );
    }
}
