use clap::Parser;
use custody_cli::{
    cli::{Cli, Commands},
    error::CliError,
    logging::init_tracing,
    script::run_wallet,
};
use custody_common::{config::WalletConfig, Identity};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let _guard = match init_tracing(cli.audit_log.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = execute(cli.command) {
        error!("❌ {}", e);
        std::process::exit(1);
    }
}

fn execute(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Init { out, approvers, quorum, deposit } => {
            let approvers = approvers.into_iter().map(Identity::from).collect();
            let config = WalletConfig::new(approvers, quorum, deposit);
            config.validate()?;
            config.save_to_file(&out)?;
            info!("✅ Wallet config written to {}", out.display());
        }
        Commands::Show { config } => {
            let config = WalletConfig::load_from_file(&config)?;
            config.validate()?;
            println!("Quorum: {} of {}", config.quorum, config.approvers.len());
            for (i, approver) in config.approvers.iter().enumerate() {
                println!("  [{}] {}", i, approver);
            }
            println!("Initial deposit: {}", config.initial_deposit);
        }
        Commands::Run { config, script, fail_fast } => {
            let report = run_wallet(&config, &script, fail_fast)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
