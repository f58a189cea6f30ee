use anyhow::anyhow;
use clap::Parser;
use flexi_logger::with_thread;
use itertools::Itertools;
use log::{error, info};
use registrar::config::{build_registrars, parse_config};
use registrar::registry::SerializerRegistry;
use registrar::serializer::builtin::builtin_serializer_catalog;
use registrar::types::builtin_type_catalog;

/// Check that every serializer registration in a config file can be built.
#[derive(Parser, Debug)]
#[command(name = "registrar", version)]
struct Args {
    /// Registration config (yaml)
    #[arg(short, long, default_value = "config/registrations.yaml")]
    config: String,
    /// flexi_logger log spec, e.g. "debug" or "info, registrar=debug"
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn run(args: &Args) -> anyhow::Result<()> {
    info!("config path: {}", args.config);
    let app_config = parse_config(&args.config).map_err(|e| anyhow!(e))?;
    let registrars = build_registrars(&app_config, &builtin_type_catalog(), &builtin_serializer_catalog())
        .map_err(|e| anyhow!(e))?;
    let mut registry = SerializerRegistry::with_settings(app_config.context.clone());
    for registrar in &registrars {
        registrar.apply(&mut registry)?;
        info!("registered {} for {}", registrar.serializer_class(), registrar.registered_type());
    }
    info!("{} serializers registered: [{}]", registry.len(), registry.registered_types().iter().join(", "));
    Ok(())
}

fn main() {
    let args = Args::parse();
    flexi_logger::Logger::try_with_str(&args.log_level)
        .unwrap()
        .format(with_thread)
        .start()
        .unwrap();
    if let Err(e) = run(&args) {
        error!("registration failed: {}", e);
        std::process::exit(1);
    } else {
        info!("registration success")
    }
}
