use clap::{Parser, Subcommand};
use mobile_money_gateway::carrier;
use mobile_money_gateway::config::{Mode, PartialConfig, Settings};
use mobile_money_gateway::gateway::AuthenticatedClient;
use mobile_money_gateway::payments::providers::C2BRequestBuilder;
use mobile_money_gateway::payments::types::C2BRequestInput;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mobile-money", version, about = "Mobile-money payment API client")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the carrier code for a phone number
    Carrier {
        number: String,
        /// Classify for airtime instead of payments
        #[arg(long)]
        airtime: bool,
    },
    /// Send a customer-to-business payment request
    C2b(C2bArgs),
}

#[derive(Debug, clap::Args)]
struct C2bArgs {
    /// Endpoint path, relative to the mode's base URL
    #[arg(long, env = "MOMO_C2B_ENDPOINT")]
    endpoint: String,
    #[arg(long, env = "MOMO_ORGANIZATION_ID")]
    organization_id: String,
    #[arg(long, env = "MOMO_RESULT_URL")]
    result_url: String,
    #[arg(long)]
    service_provider_id: String,
    #[arg(long)]
    merchant_wallet: String,
    #[arg(long)]
    mobile_number: String,
    #[arg(long)]
    amount: String,
    /// Overrides MOMO_MODE
    #[arg(long)]
    mode: Option<String>,
    /// Log request payloads and response bodies
    #[arg(long)]
    debug: bool,
    /// Wait for the access token before sending
    #[arg(long)]
    wait_for_token: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.json_logs);

    match cli.command {
        Command::Carrier { number, airtime } => {
            println!("{}", carrier::classify(&number, airtime));
        }
        Command::C2b(args) => run_c2b(args).await?,
    }

    Ok(())
}

async fn run_c2b(args: C2bArgs) -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    let mut partial = PartialConfig::default();
    if let Some(mode) = args.mode.as_deref() {
        partial = partial.mode(mode.parse::<Mode>()?);
    }
    if args.debug {
        partial = partial.debug(true);
    }

    let client = AuthenticatedClient::from_partial(partial, &settings)?;
    tracing::info!("Mode: {}", client.config().mode);
    tracing::info!("Base URL: {}", client.base_url());

    if args.wait_for_token {
        if let Err(e) = client.ready().await {
            tracing::warn!("Continuing without an access token: {}", e);
        }
    }

    let builder = C2BRequestBuilder::with_client(
        client,
        args.organization_id,
        args.result_url,
        args.endpoint,
    );

    let result = builder
        .request(C2BRequestInput {
            service_provider_id: args.service_provider_id,
            merchant_wallet: args.merchant_wallet,
            mobile_number: args.mobile_number,
            amount: args.amount,
            custom_fields_key_value: None,
        })
        .await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
