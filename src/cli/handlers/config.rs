//! Config command handler.

use anyhow::Result;

use crate::cli::output::{output_json, print_header, print_kv, OutputMode};
use crate::config::CONFIG_FILE_NAME;
use crate::init::AppContext;

pub fn handle_show(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    if mode == OutputMode::Json {
        output_json(&ctx.config);
        return Ok(());
    }

    let toml = ctx.config.to_toml()?;
    match mode {
        OutputMode::Markdown => println!("```toml\n{}```", toml),
        _ => {
            print_header("Configuration");
            print_kv("Data path", &ctx.data_path.display().to_string());
            print_kv(
                "Config file",
                &ctx.data_path.join(CONFIG_FILE_NAME).display().to_string(),
            );
            print_kv("Telemetry", &ctx.telemetry.path().display().to_string());
            println!("\n{}", toml);
        }
    }
    Ok(())
}
