use clap::Args;
use strata_aws::lex::{SLOT_TYPE_STATUS, slot_type_status_schema};
use strata_aws::rds::{ORDERABLE_DB_INSTANCE, orderable_db_instance_schema};
use strata_provider::Schema;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Resource type, e.g. `orderable_db_instance`.
    pub resource_type: String,
}

fn schema_for(resource_type: &str) -> Option<Schema> {
    match resource_type {
        ORDERABLE_DB_INSTANCE => Some(orderable_db_instance_schema()),
        SLOT_TYPE_STATUS => Some(slot_type_status_schema()),
        _ => None,
    }
}

pub fn run(args: &SchemaArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let schema = schema_for(&args.resource_type).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown resource type '{}' (supported: {ORDERABLE_DB_INSTANCE}, {SLOT_TYPE_STATUS})",
            args.resource_type
        )
    })?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        OutputFormat::Text => {
            println!("{}:", args.resource_type);
            for (name, attr) in &schema.attributes {
                println!(
                    "  {name:<40} {ty:<14} {mode:<18} {desc}",
                    ty = attr.attribute_type.as_str(),
                    mode = attr.mode.as_str(),
                    desc = attr.description.as_deref().unwrap_or(""),
                );
            }
        }
    }
    Ok(())
}
