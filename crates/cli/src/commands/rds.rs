use clap::{Args, Subcommand};
use strata_aws::rds::{OrderableDbInstance, OrderableDbInstanceCriteria, RdsProvider};

use crate::OutputFormat;
use crate::config::StrataConfig;

#[derive(Args, Debug)]
pub struct RdsArgs {
    #[command(subcommand)]
    pub command: RdsCommand,
}

#[derive(Subcommand, Debug)]
pub enum RdsCommand {
    /// Resolve criteria to exactly one orderable DB instance option.
    OrderableDbInstance(OrderableArgs),
    /// Check that the RDS API is reachable.
    Health,
}

#[derive(Args, Debug)]
pub struct OrderableArgs {
    /// Database engine, e.g. `mysql`.
    #[arg(long)]
    pub engine: String,
    #[arg(long)]
    pub engine_version: Option<String>,
    #[arg(long)]
    pub db_instance_class: Option<String>,
    #[arg(long)]
    pub license_model: Option<String>,
    #[arg(long)]
    pub availability_zone_group: Option<String>,
    /// Storage type; matched exactly after retrieval.
    #[arg(long)]
    pub storage_type: Option<String>,
    /// Restrict to VPC (`true`) or non-VPC (`false`) offerings.
    #[arg(long)]
    pub vpc: Option<bool>,
    /// Preferred instance class. Repeat in order of preference.
    #[arg(long = "preferred-db-instance-class")]
    pub preferred_db_instance_classes: Vec<String>,
}

impl OrderableArgs {
    fn criteria(&self) -> OrderableDbInstanceCriteria {
        OrderableDbInstanceCriteria {
            availability_zone_group: self.availability_zone_group.clone(),
            db_instance_class: self.db_instance_class.clone(),
            engine: self.engine.clone(),
            engine_version: self.engine_version.clone(),
            license_model: self.license_model.clone(),
            storage_type: self.storage_type.clone(),
            preferred_db_instance_classes: self.preferred_db_instance_classes.clone(),
            vpc: self.vpc,
        }
    }
}

pub async fn run(
    config: &StrataConfig,
    args: &RdsArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let provider = RdsProvider::new(config.rds_config()).await?;
    match &args.command {
        RdsCommand::OrderableDbInstance(orderable) => {
            let instance = provider.orderable_db_instance(&orderable.criteria()).await?;
            print_instance(&instance, format)
        }
        RdsCommand::Health => {
            provider.health_check().await?;
            println!("RDS API is reachable in {}.", config.aws.region);
            Ok(())
        }
    }
}

fn print_instance(instance: &OrderableDbInstance, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(instance)?);
        }
        OutputFormat::Text => {
            let o = &instance.option;
            let or_dash = |v: Option<&str>| v.unwrap_or("-").to_owned();
            println!("DB instance class:  {}", o.db_instance_class);
            println!("Engine:             {}", or_dash(o.engine.as_deref()));
            println!("Engine version:     {}", or_dash(o.engine_version.as_deref()));
            println!("License model:      {}", or_dash(o.license_model.as_deref()));
            println!("Storage type:       {}", or_dash(o.storage_type.as_deref()));
            println!("Availability zones: {}", o.availability_zones.join(", "));
            if let (Some(min), Some(max)) = (o.min_storage_size, o.max_storage_size) {
                println!("Storage size:       {min}-{max} GiB");
            }
            if let Some(multi_az) = o.multi_az_capable {
                println!("Multi-AZ capable:   {multi_az}");
            }
            if let Some(vpc) = o.vpc {
                println!("VPC:                {vpc}");
            }
        }
    }
    Ok(())
}
