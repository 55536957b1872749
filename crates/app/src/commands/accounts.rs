use api_types::account::{Account, AccountNew};

use super::Context;
use crate::{cli::AccountsCommand, error::Result};

pub async fn run(ctx: &Context, command: AccountsCommand) -> Result<()> {
    match command {
        AccountsCommand::List => {
            let accounts = ctx.client.accounts_list().await?;
            if accounts.is_empty() {
                println!("No accounts.");
            }
            for account in &accounts {
                print_row(ctx, account);
            }
        }
        AccountsCommand::Show { account } => {
            let id = ctx.account_id(&account).await?;
            let account = ctx.client.account_get(&id).await?;
            print_row(ctx, &account);
            if let Some(description) = &account.description {
                println!("  {description}");
            }
            if let Some(created_at) = account.created_at {
                println!("  created {}", ctx.date(created_at));
            }
        }
        AccountsCommand::Create {
            name,
            account_type,
            balance,
            description,
        } => {
            let payload = AccountNew {
                name,
                account_type: account_type.into(),
                balance,
                currency: Some(ctx.settings.currency.clone()),
                description,
            };
            let account = ctx.client.account_create(&payload).await?;
            println!("Created account {} ({})", account.name, account.id);
        }
        AccountsCommand::Delete { account } => {
            let id = ctx.account_id(&account).await?;
            ctx.client.account_delete(&id).await?;
            println!("Deleted account {id}");
        }
    }
    Ok(())
}

fn print_row(ctx: &Context, account: &Account) {
    let currency = account.currency.as_deref().unwrap_or(&ctx.settings.currency);
    println!(
        "{:<26} {:<24} {:<6} {:>16}{}",
        account.id.as_str(),
        account.name,
        account.account_type.as_str(),
        account.balance.with_code(currency),
        if account.is_active { "" } else { "  (inactive)" }
    );
}
