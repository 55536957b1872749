use super::Context;
use crate::{cli::ImportsCommand, error::Result};

pub async fn run(ctx: &Context, command: ImportsCommand) -> Result<()> {
    match command {
        ImportsCommand::List => {
            for import in ctx.client.imports_list().await? {
                let created = import.created_at.map(|d| ctx.date(d)).unwrap_or_default();
                println!(
                    "{:<26} {:<32} {:<10} {:<10} {:>5}/{:<5} skipped {}",
                    import.id.as_str(),
                    import.file_name,
                    created,
                    import.status.as_str(),
                    import.imported_rows,
                    import.total_rows,
                    import.skipped_rows
                );
                if let Some(error) = &import.error {
                    println!("  {error}");
                }
            }
        }
        ImportsCommand::Upload { account, file } => {
            let account = ctx.account_id(&account).await?;
            let contents = tokio::fs::read(&file).await?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());
            let import = ctx
                .client
                .import_upload(&account, &file_name, contents)
                .await?;
            println!(
                "Import {} for {} is {}",
                import.id,
                import.file_name,
                import.status.as_str()
            );
        }
    }
    Ok(())
}
