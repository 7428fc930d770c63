use anyhow::Result;
use colored::Colorize;

use crate::backup;
use crate::cli::BackupCommands;
use crate::config::Config;

use super::open_conn;

pub async fn dispatch_backup(action: BackupCommands, json_output: bool) -> Result<()> {
    match action {
        BackupCommands::Push => push(json_output).await,
        BackupCommands::Pull => pull(json_output).await,
        BackupCommands::Info => info(json_output).await,
    }
}

async fn push(json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let mut config = Config::load()?;

    let gist = backup::push(&conn, &mut config).await?;

    if json_output {
        println!(
            "{}",
            serde_json::json!({
                "gist_id": gist.id,
                "updated_at": gist.updated_at,
                "size_bytes": gist.size_bytes,
            })
        );
        return Ok(());
    }

    println!("{} Backup pushed to gist {}", "✓".green().bold(), gist.id);
    if let Some(url) = gist.url {
        println!("  {}", url);
    }
    Ok(())
}

async fn pull(json_output: bool) -> Result<()> {
    let mut conn = open_conn()?;
    let config = Config::load()?;

    let counts = backup::pull(&mut conn, &config).await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!("{} Backup restored!", "✓".green().bold());
    println!("  Categories: {}", counts.categories);
    println!("  Assets:     {}", counts.assets);
    println!("  Expenses:   {}", counts.expenses);
    Ok(())
}

async fn info(json_output: bool) -> Result<()> {
    let config = Config::load()?;
    let gist = backup::info(&config).await?;

    if json_output {
        println!(
            "{}",
            serde_json::json!({
                "gist_id": gist.id,
                "updated_at": gist.updated_at,
                "size_bytes": gist.size_bytes,
                "url": gist.url,
            })
        );
        return Ok(());
    }

    println!("{:<14} {}", "Gist:".bold(), gist.id);
    println!("{:<14} {}", "Updated:".bold(), gist.updated_at.to_rfc3339());
    println!("{:<14} {} bytes", "Size:".bold(), gist.size_bytes);
    if let Some(url) = gist.url {
        println!("{:<14} {}", "URL:".bold(), url);
    }
    Ok(())
}
