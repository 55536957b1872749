use api_types::category::CategoryNew;

use super::Context;
use crate::{
    cli::{CategoriesCommand, CounterpartiesCommand, OrgsCommand},
    error::Result,
};

pub async fn categories(ctx: &Context, command: CategoriesCommand) -> Result<()> {
    match command {
        CategoriesCommand::List { kind } => {
            let categories = ctx.client.categories_list(kind.map(Into::into)).await?;
            for category in &categories {
                println!(
                    "{:<26} {:<24} {:<8} {}",
                    category.id.as_str(),
                    category.name,
                    category.kind.as_str(),
                    category.color.as_deref().unwrap_or("")
                );
            }
        }
        CategoriesCommand::Create {
            name,
            kind,
            color,
            parent,
        } => {
            let payload = CategoryNew {
                name,
                kind: kind.into(),
                color,
                parent,
            };
            let category = ctx.client.category_create(&payload).await?;
            println!("Created category {} ({})", category.name, category.id);
        }
        CategoriesCommand::Delete { category } => {
            let id = ctx.category_id(&category).await?;
            ctx.client.category_delete(&id).await?;
            println!("Deleted category {id}");
        }
    }
    Ok(())
}

pub async fn counterparties(ctx: &Context, command: CounterpartiesCommand) -> Result<()> {
    match command {
        CounterpartiesCommand::List { search } => {
            let counterparties = ctx.client.counterparties_list(search.as_deref()).await?;
            for counterparty in &counterparties {
                println!(
                    "{:<26} {:<28} {}",
                    counterparty.id.as_str(),
                    counterparty.name,
                    counterparty.email.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}

pub async fn organizations(ctx: &Context, command: OrgsCommand) -> Result<()> {
    match command {
        OrgsCommand::List => {
            let selected = ctx.client.organization();
            for org in ctx.client.organizations_list().await? {
                let marker = if selected == Some(&org.id) { "*" } else { " " };
                println!(
                    "{marker} {:<26} {:<28} {:<6} {}",
                    org.id.as_str(),
                    org.name,
                    org.currency.as_deref().unwrap_or(""),
                    org.role.map(|r| r.as_str()).unwrap_or("")
                );
            }
        }
        OrgsCommand::Members { id } => {
            for member in ctx.client.organization_members(&id).await? {
                let name = member
                    .user
                    .label()
                    .or(member.email.as_deref())
                    .unwrap_or(member.user.id().as_str());
                println!("{name:<32} {}", member.role.as_str());
            }
        }
    }
    Ok(())
}
