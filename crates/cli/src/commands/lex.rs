use clap::{Args, Subcommand};
use strata_aws::lex::{LexProvider, LexStatus, SlotTypeVersions};
use strata_provider::wait_for_state;
use tracing::info;

use crate::OutputFormat;
use crate::config::StrataConfig;

#[derive(Args, Debug)]
pub struct LexArgs {
    #[command(subcommand)]
    pub command: LexCommand,
}

#[derive(Subcommand, Debug)]
pub enum LexCommand {
    /// Report whether a slot type exists.
    SlotTypeStatus {
        /// Slot type name.
        name: String,
        /// Poll until the slot type is created.
        #[arg(long)]
        wait: bool,
    },
}

pub async fn run(
    config: &StrataConfig,
    args: &LexArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let provider = LexProvider::new(config.lex_config()).await;
    match &args.command {
        LexCommand::SlotTypeStatus { name, wait: true } => {
            let created = LexStatus::Created.as_str();
            let wait = config.wait.wait_config(created);
            info!(slot_type = %name, timeout = ?wait.timeout, "waiting for slot type");
            let versions = wait_for_state(&provider.status_refresher(name.as_str()), &wait).await?;
            print_status(name, created, versions.as_ref(), format)
        }
        LexCommand::SlotTypeStatus { name, wait: false } => {
            let (versions, state, error) = provider.slot_type_status(name).await.into_parts();
            if let Some(e) = error {
                return Err(anyhow::anyhow!("slot type '{name}' is in state {state}: {e}"));
            }
            print_status(name, &state, versions.as_ref(), format)
        }
    }
}

fn print_status(
    name: &str,
    state: &str,
    versions: Option<&SlotTypeVersions>,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let slot_types = versions.map(|v| v.slot_types.as_slice()).unwrap_or_default();
    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "name": name,
                "state": state,
                "slot_types": slot_types,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            println!("Slot type {name}: {state}");
            for version in slot_types {
                println!(
                    "  version {v} | updated {updated}",
                    v = version.version.as_deref().unwrap_or("-"),
                    updated = version
                        .last_updated_date
                        .map_or_else(|| "-".to_owned(), |d| d.to_rfc3339()),
                );
            }
        }
    }
    Ok(())
}
