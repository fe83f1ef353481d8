use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use launchpad::blockchain::keypair::{ApprovalRequest, Approver, AutoApprove, KeypairWallet};
use launchpad::blockchain::types::{TxSignature, LAMPORTS_PER_SOL};
use launchpad::blockchain::wallet::{InjectedWallet, WalletAdapter};
use launchpad::blockchain::RpcEndpoints;
use launchpad::config::loader::load_config_or_default;
use launchpad::observability::init_tracing;
use launchpad::payments::{
    HttpReceiverLookup, OrchestratorSettings, PaymentForm, PaymentView, ReceiverAddressProvider,
    SubmissionOrchestrator, SubmissionOutcome, TriggerResult,
};

#[derive(Parser)]
#[command(name = "launchpad-cli")]
#[command(about = "Pay the launchpad fee from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the receiver wallet configured on the server
    Receiver {
        #[arg(short, long, default_value = "http://127.0.0.1:8080")]
        server: String,
    },
    /// Pay the launch fee from a local keypair
    Pay(PayArgs),
}

#[derive(clap::Args)]
struct PayArgs {
    /// Amount in SOL. Defaults to the configured fee.
    #[arg(short, long)]
    amount: Option<String>,

    /// devnet or mainnet-beta
    #[arg(short, long)]
    network: Option<String>,

    /// Keypair file. Falls back to $LAUNCHPAD_KEYPAIR.
    #[arg(short, long)]
    keypair: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = SigningMode::Auto)]
    signing: SigningMode,

    /// Approve the connection and the signature without prompting
    #[arg(short, long)]
    yes: bool,

    /// Site base URL, e.g. http://127.0.0.1:8080
    #[arg(long)]
    server: Option<String>,

    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SigningMode {
    /// Sign and send in one wallet call when possible
    Auto,
    /// Wallet signs and broadcasts
    Combined,
    /// Wallet signs, the CLI broadcasts
    Separate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing("warn");

    match cli.command {
        Commands::Receiver { server } => {
            let lookup = HttpReceiverLookup::new(api_url(&server), Duration::from_secs(10))?;
            let result = lookup.lookup().await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.ok {
                return Err("receiver wallet not available".into());
            }
        }
        Commands::Pay(args) => pay(args).await?,
    }

    Ok(())
}

fn api_url(server: &str) -> String {
    format!("{}/api/wallet", server.trim_end_matches('/'))
}

async fn pay(args: PayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_or_default(args.config.as_deref())?;

    let receiver_url = match &args.server {
        Some(server) => api_url(server),
        None => config.payment.receiver_url.clone(),
    };
    let success_url = Url::parse(&receiver_url)?.join(&config.payment.success_path)?;

    let mut form = PaymentForm::with_values(
        args.amount.unwrap_or_else(|| config.payment.default_amount.clone()),
        config.payment.default_network,
    );
    if let Some(network) = &args.network {
        form.set_network(network)?;
    }

    let endpoints = RpcEndpoints::from_config(&config.networks)?;

    let approver: Arc<dyn Approver> = if args.yes {
        Arc::new(AutoApprove)
    } else {
        Arc::new(StdinApprover)
    };
    let wallet = match &args.keypair {
        Some(path) => KeypairWallet::from_file(path, approver)?,
        None => KeypairWallet::from_env(approver)?,
    };
    let wallet = match args.signing {
        SigningMode::Separate => wallet,
        SigningMode::Auto | SigningMode::Combined => {
            wallet.with_relay(endpoints.for_network(form.network()))
        }
    };
    let wallet: Arc<dyn InjectedWallet> = Arc::new(wallet);
    let wallet = Arc::new(WalletAdapter::new(Some(wallet)));

    let receiver = Arc::new(HttpReceiverLookup::new(
        receiver_url,
        Duration::from_secs(config.timeouts.request_secs),
    )?);
    let view = Arc::new(ConsoleView { success_url });

    let orchestrator = SubmissionOrchestrator::new(
        receiver,
        wallet,
        endpoints,
        view,
        OrchestratorSettings::from_config(&config.payment),
    )
    .with_form(form);

    let mut status = orchestrator.subscribe();
    let printer = tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let state = status.borrow_and_update().clone();
            println!("{}", state.status_text());
            if state.is_terminal() {
                break;
            }
        }
    });

    let result = orchestrator.submit().await;
    let _ = printer.await;

    match result {
        TriggerResult::Completed(SubmissionOutcome::Confirmed(_)) => Ok(()),
        TriggerResult::Completed(SubmissionOutcome::Rejected(err))
        | TriggerResult::Completed(SubmissionOutcome::Failed(err)) => Err(err.into()),
        TriggerResult::Ignored => Err("a payment is already in progress".into()),
    }
}

/// Prints alerts and the success hand-off.
struct ConsoleView {
    success_url: Url,
}

impl PaymentView for ConsoleView {
    fn alert(&self, message: &str) {
        println!("{}", message);
    }

    fn navigate_to_success(&self, signature: &TxSignature) {
        println!("Continue at {} (tx {})", self.success_url, signature);
    }
}

/// Asks on the terminal, standing in for the wallet popup.
struct StdinApprover;

#[async_trait]
impl Approver for StdinApprover {
    async fn approve(&self, request: &ApprovalRequest) -> bool {
        let prompt = match request {
            ApprovalRequest::Connect { address } => format!("Connect wallet {}?", address),
            ApprovalRequest::SignTransfer { to, minor_units } => format!(
                "Sign transfer of {} SOL ({} lamports) to {}?",
                *minor_units as f64 / LAMPORTS_PER_SOL as f64,
                minor_units,
                to
            ),
        };

        tokio::task::spawn_blocking(move || {
            eprint!("{} [y/N] ", prompt);
            let _ = std::io::stderr().flush();
            let mut answer = String::new();
            if std::io::stdin().lock().read_line(&mut answer).is_err() {
                return false;
            }
            matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
        })
        .await
        .unwrap_or(false)
    }
}
