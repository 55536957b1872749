use std::{fs::File, io::Write};

use engine::{Report, ReportMeta, export, html};

use super::Context;
use crate::{
    cli::{ReportArgs, ReportFormat},
    error::Result,
};

/// Fetches every page matching the filter, rebuilds running balances and
/// writes the report.
pub async fn run(ctx: &Context, args: ReportArgs) -> Result<()> {
    let (state, accounts, categories) = ctx.filter(&args.filter).await?;
    let query = state.to_query()?;
    let transactions = ctx
        .client
        .transactions_all(&query, ctx.settings.page_size)
        .await?;

    let mut meta = ReportMeta::new(args.title, ctx.timezone);
    meta.currency = ctx.settings.currency.clone();
    meta.filter_description = state.describe(&accounts, &categories);
    if let Some(id) = ctx.client.organization() {
        meta.organization = Some(ctx.client.organization_get(id).await?.name);
    }

    let report = Report::build(meta, &transactions, &accounts, &categories)?;
    match (args.format, &args.output) {
        (ReportFormat::Html, Some(path)) => {
            tokio::fs::write(path, html::render(&report)).await?;
        }
        (ReportFormat::Html, None) => {
            std::io::stdout().lock().write_all(html::render(&report).as_bytes())?;
        }
        (ReportFormat::Csv, Some(path)) => export::write_csv(&report, File::create(path)?)?,
        (ReportFormat::Csv, None) => export::write_csv(&report, std::io::stdout().lock())?,
    }

    if let Some(path) = &args.output {
        println!(
            "Wrote {} transaction(s) across {} account(s) to {}",
            report.rows.len(),
            report.accounts.len(),
            path.display()
        );
    }
    Ok(())
}
