//! Entry point: option scanning and subcommand dispatch.

use std::process;

use helio_cli::{cli, commands, keyfile};
use helio_client::client::SubmissionClient;
use helio_client::config::ClientConfig;
use helio_core::keys::Keypair;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(invocation) = cli::parse_invocation(&args) else {
        cli::print_help();
        return;
    };

    if let Err(message) = run(invocation).await {
        eprintln!("❌ {message}");
        process::exit(1);
    }
}

async fn run(inv: cli::Invocation) -> Result<(), String> {
    // Offline commands first; they need no endpoint.
    match inv.command.as_str() {
        "generate" => {
            let path = positional(&inv, 0, "helio generate <FILE>")?;
            return commands::generate(path);
        }
        "address" => {
            let keypair = required_keypair(&inv)?;
            return commands::address(&keypair);
        }
        _ => {}
    }

    let mut config = match cli::flag(&inv.flags, "config") {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read config '{path}': {e}"))?;
            toml::from_str::<ClientConfig>(&text)
                .map_err(|e| format!("invalid config '{path}': {e}"))?
        }
        None => ClientConfig::default(),
    };
    if let Some(endpoint) = cli::flag(&inv.flags, "endpoint") {
        config.endpoint = endpoint.to_string();
    }
    if let Some(level) = cli::flag(&inv.flags, "commitment") {
        config.confirm.target = level.parse()?;
    }

    let client = SubmissionClient::from_config(&config).map_err(|e| e.to_string())?;
    let retry = config.retry;

    match inv.command.as_str() {
        "balance" => {
            let address = positional(&inv, 0, "helio balance <ADDRESS>")?;
            commands::balance(&client, address).await
        }
        "airdrop" => {
            let address = positional(&inv, 0, "helio airdrop <ADDRESS> <AMOUNT>")?;
            let amount = positional(&inv, 1, "helio airdrop <ADDRESS> <AMOUNT>")?;
            commands::airdrop(&client, &retry, address, amount).await
        }
        "transfer" => {
            let to = positional(&inv, 0, "helio transfer <TO> <AMOUNT>")?;
            let amount = positional(&inv, 1, "helio transfer <TO> <AMOUNT>")?;
            let keypair = required_keypair(&inv)?;
            commands::transfer(&client, &retry, &keypair, to, amount).await
        }
        "invoke" => {
            let program = cli::flag(&inv.flags, "program")
                .ok_or("invoke requires --program <ID>")?;
            let accounts = cli::flag_all(&inv.flags, "account");
            let data = cli::flag(&inv.flags, "data");
            let keypair = required_keypair(&inv)?;
            commands::invoke(&client, &retry, &keypair, program, &accounts, data).await
        }
        other => Err(format!("unknown command '{other}' (try --help)")),
    }
}

fn positional<'a>(inv: &'a cli::Invocation, index: usize, usage: &str) -> Result<&'a str, String> {
    inv.positionals
        .get(index)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("usage: {usage}"))
}

fn required_keypair(inv: &cli::Invocation) -> Result<Keypair, String> {
    let path = cli::flag(&inv.flags, "keypair")
        .ok_or("this command requires --keypair <FILE>")?;
    keyfile::load_keypair(path)
}
