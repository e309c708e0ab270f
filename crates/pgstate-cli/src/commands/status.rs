//! Status command - connect and show the detected server

use anyhow::Result;
use console::style;
use pgstate_provider::{Provider, PROVIDER_TYPE_NAME};
use std::path::Path;

use super::configured_provider;

pub async fn show(config_path: Option<&Path>) -> Result<()> {
    println!("\n{}", style("pgstate status").cyan().bold());
    println!();

    println!("{}", style("Version").bold().underlined());
    println!("  pgstate-cli:     {}", env!("CARGO_PKG_VERSION"));
    println!("  provider:        {}", PROVIDER_TYPE_NAME);
    println!();

    println!("{}", style("Resources").bold().underlined());
    for name in Provider::new(env!("CARGO_PKG_VERSION")).metadata().resources {
        println!("  • {}", name);
    }
    println!();

    println!("{}", style("Database").bold().underlined());
    let provider = match configured_provider(config_path).await {
        Ok(provider) => provider,
        Err(e) => {
            println!("  Connection:      {}", style(format!("failed - {:#}", e)).red());
            return Ok(());
        }
    };

    let Some(ctx) = provider.context() else {
        println!("  Connection:      {}", style("not configured").yellow());
        return Ok(());
    };

    let pool = ctx.pool();
    match pool.health_check().await {
        Ok(true) => println!("  Connection:      {}", style("connected").green()),
        Ok(false) => println!("  Connection:      {}", style("unhealthy").yellow()),
        Err(e) => println!("  Connection:      {}", style(format!("error - {}", e)).red()),
    }
    println!("  Engine:          {}", ctx.version().engine);
    println!("  Server version:  {}", ctx.version().version);

    let stats = pool.stats();
    println!("  Pool size:       {}", stats.size);
    println!("  Idle:            {}", stats.idle);

    pool.close().await;
    Ok(())
}
