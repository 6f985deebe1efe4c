use clap::Parser;
use grafana_alert_tf::{Args, Resource, config, exporter::Exporter, grafana::Grafana};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse config
    let args = Args::parse();
    let config = config::Config::load(&args)?;

    // Fetch the resource
    let grafana = Grafana::new(config.grafana.clone())?;
    let alert = match args.resource {
        Resource::Alert => grafana.get_alert(&args.alert_id).await?,
    };

    // Render and write it out
    let exporter = Exporter::new(config.export_options());

    if args.stdout {
        print!("{}", exporter.render(&alert)?);
    } else {
        exporter.export(&alert)?;
    }

    Ok(())
}
