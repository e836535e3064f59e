use crate::cli::{connect, print_json, GlobalArgs, InitArgs};
use crate::config::Config;
use crate::triage::LabelProvisioner;
use tracing::{info, warn};

pub async fn execute(global: &GlobalArgs, args: InitArgs) -> anyhow::Result<()> {
    let (config, _) = Config::load_or_default(&global.config)?;

    if args.dry_run {
        info!("DRY RUN - labels that would be created:");
        for label in &config.labels {
            println!(
                "  {} (#{})",
                label.name,
                label.color.as_deref().unwrap_or("default")
            );
        }
        return Ok(());
    }

    let client = connect(global, &config)?;
    info!(
        "Creating {} labels on {}",
        config.labels.len(),
        client.repo()
    );

    let report = LabelProvisioner::new(&client)
        .provision(&config.labels)
        .await;
    print_json(&report)?;

    if !report.failed.is_empty() {
        warn!("Failed to create labels: {}", report.failed.join(", "));
        std::process::exit(1);
    }

    Ok(())
}
