//! ANIMA command-line client.

use anima_genesis::{
    cancel_pair, ClientConfig, GuardDecision, LogNavigator, MintError, MintWorkflow, NeuralLink,
    RefreshTrigger, Session, Vault,
};
use anima_rpc::interface::ANIMA_DID;
use anima_rpc::CanisterClient;
use anima_types::{NetworkId, Route, TokenId};
use anima_utils::{LogFormat, SystemClock};
use anima_wallet_core::{ConnectRequest, MemoGenerator, WalletBridge};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "anima", about = "Mint and talk to ANIMA tokens")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "ANIMA_CONFIG")]
    config: Option<PathBuf>,

    /// Replica to talk to: "local" or "ic".
    #[arg(long, env = "ANIMA_NETWORK")]
    network: Option<NetworkId>,

    /// Replica host, overriding the network default.
    #[arg(long, env = "ANIMA_HOST")]
    host: Option<String>,

    /// Backend canister id.
    #[arg(long, env = "ANIMA_CANISTER_ID")]
    canister_id: Option<String>,

    /// Account receiving the mint fee.
    #[arg(long, env = "ANIMA_TREASURY")]
    treasury: Option<String>,

    /// Base URL of the local wallet bridge.
    #[arg(long, env = "ANIMA_WALLET_BRIDGE")]
    wallet_bridge: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ANIMA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ANIMA_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    #[command(flatten)]
    Client(ClientCommand),
    /// Print the backend's Candid interface.
    Interface,
}

/// Commands that talk to the wallet or the backend.
#[derive(clap::Subcommand)]
enum ClientCommand {
    /// Ask the wallet to connect.
    Connect,
    /// Show the connected principal, if any.
    Status,
    /// Disconnect the wallet.
    Disconnect,
    /// Pay the mint fee and mint a new ANIMA. Ctrl-C cancels.
    Mint,
    /// List the ANIMAs owned by the connected principal.
    Vault,
    /// Show one ANIMA.
    Show { token_id: TokenId },
    /// Send one message to an ANIMA and print its reply.
    Chat { token_id: TokenId, message: String },
}

type ClientSession = Session<WalletBridge, CanisterClient>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = cli.config.as_ref().map(|path| (path, ClientConfig::from_toml_file(path)));
    let mut config = match &file_config {
        Some((_, Ok(cfg))) => cfg.clone(),
        _ => ClientConfig::default(),
    };
    apply_overrides(&mut config, &cli);

    let format = config.log_format.parse().unwrap_or(LogFormat::Human);
    anima_utils::init_logging(format, &config.log_level);

    match &file_config {
        Some((path, Ok(_))) => tracing::info!("Loaded config from {}", path.display()),
        Some((path, Err(e))) => tracing::warn!(
            "Failed to load config file {}: {e}, using CLI defaults",
            path.display()
        ),
        None => {}
    }

    match cli.command {
        Command::Interface => print!("{ANIMA_DID}"),
        Command::Client(command) => run_client(command, &config).await?,
    }

    Ok(())
}

async fn run_client(command: ClientCommand, config: &ClientConfig) -> anyhow::Result<()> {
    let session = build_session(config)?;
    session.restore().await;

    match command {
        ClientCommand::Connect => {
            let principal = session.connect().await?;
            println!("Connected as {principal}");
        }
        ClientCommand::Status => match session.identity() {
            Some(principal) => println!("Connected as {principal}"),
            None => println!("Not connected"),
        },
        ClientCommand::Disconnect => {
            session.disconnect().await?;
            println!("Disconnected");
        }
        ClientCommand::Mint => mint(&session, config).await?,
        ClientCommand::Vault => {
            require_identity(&session, Route::Vault)?;
            let owned = Vault::new(&session).owned().await?;
            if owned.is_empty() {
                println!("No ANIMAs yet");
            }
            for anima in owned {
                println!(
                    "#{:<6} {:<16} level {:<3} xp {}",
                    anima.token_id, anima.designation, anima.level, anima.experience
                );
            }
        }
        ClientCommand::Show { token_id } => {
            require_identity(&session, Route::Anima(token_id))?;
            let anima = Vault::new(&session).get(token_id).await?;
            println!("Designation: {}", anima.designation);
            println!("Owner:       {}", anima.owner);
            println!("Level:       {}", anima.level);
            println!("Experience:  {}", anima.experience);
            println!("Created at:  {}", anima.created_at);
        }
        ClientCommand::Chat { token_id, message } => {
            require_identity(&session, Route::NeuralLink(token_id))?;
            let refresh = RefreshTrigger::new();
            let mut link = NeuralLink::open(&session, &SystemClock, &refresh, token_id).await?;
            match link.send(&message).await {
                Some(reply) => {
                    println!("{}: {}", link.anima().designation, reply.content);
                    println!(
                        "level {} xp {}",
                        link.anima().level,
                        link.anima().experience
                    );
                }
                None => match link.error() {
                    Some(error) => anyhow::bail!("{error}"),
                    None => println!("Nothing to send"),
                },
            }
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut ClientConfig, cli: &Cli) {
    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(host) = &cli.host {
        config.host = Some(host.clone());
    }
    if let Some(id) = &cli.canister_id {
        config.canister_id = id.clone();
    }
    if let Some(treasury) = &cli.treasury {
        config.treasury_account = treasury.clone();
    }
    if let Some(url) = &cli.wallet_bridge {
        config.wallet_bridge_url = url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
}

fn build_session(config: &ClientConfig) -> anyhow::Result<ClientSession> {
    let canister_id = config.require_canister_id()?;
    let host = config.host();
    tracing::debug!(network = config.network.as_str(), %host, canister_id, "building session");
    let wallet = WalletBridge::new(config.wallet_bridge_url.clone())?;
    let backend = CanisterClient::new(host.clone(), canister_id)?;
    let connect = ConnectRequest {
        whitelist: vec![canister_id.to_string()],
        host,
    };
    Ok(Session::new(wallet, backend, connect))
}

fn require_identity(session: &ClientSession, route: Route) -> anyhow::Result<()> {
    match session.guard(route) {
        GuardDecision::Render(_) => Ok(()),
        GuardDecision::Wait | GuardDecision::Redirect(_) => {
            anyhow::bail!("Please connect your wallet")
        }
    }
}

async fn mint(session: &ClientSession, config: &ClientConfig) -> anyhow::Result<()> {
    let settings = config.mint_settings()?;
    let memos = MemoGenerator::new();
    let navigator = LogNavigator;
    let (canceller, signal) = cancel_pair();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling mint");
            canceller.cancel();
        }
    });

    let mut flow = MintWorkflow::new(session, &memos, &SystemClock, &navigator, settings, signal);
    println!("{}", flow.state().status_text());

    let mut rx = flow.subscribe();
    let progress = tokio::spawn(async move {
        let mut shown = rx.borrow().state;
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().state;
            if state != shown {
                println!("{}", state.status_text());
                shown = state;
            }
        }
    });

    let result = flow.run().await;
    drop(flow);
    if let Err(e) = progress.await {
        tracing::warn!("Progress reporter stopped abnormally: {e}");
    }

    match result {
        Ok(minted) => {
            println!("Minted {} (#{})", minted.designation, minted.token_id);
            Ok(())
        }
        Err(MintError::Cancelled) => {
            println!("Cancelled");
            Ok(())
        }
        Err(e) => match e.user_message() {
            Some(message) => anyhow::bail!("{message}"),
            None => Err(e.into()),
        },
    }
}
