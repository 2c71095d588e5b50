use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use env::Env;
use epayments::{Amount, EPayments, Gateway, Language, PaymentRequest};
use eyre::{eyre, Context};
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use the live gateway instead of the sandbox.
    #[arg(long, global = true)]
    live: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Obtain an access token with the configured API user
    Token,
    /// Request a payment page and print the gateway response
    Link(Order),
    /// Print where the buyer should be redirected
    Redirect(Order),
    /// Print an operation as returned by the gateway
    Operation { id: i64 },
    /// Check that an operation is done for the given order
    Check { id: i64, order_number: String },
}

#[derive(Args)]
struct Order {
    #[arg(long)]
    order_number: String,
    #[arg(long)]
    order_name: String,
    /// Order sum, e.g. 10.00
    #[arg(long)]
    amount: Amount,
    #[arg(long, default_value = "USD")]
    currency: String,
    /// 1 - bank card, 2 - ePayments wallet
    #[arg(long)]
    gateway: Option<u8>,
    #[arg(long)]
    language: Option<Language>,
    /// Link lifetime in minutes
    #[arg(long)]
    life_time: Option<u32>,
    #[arg(long)]
    success_url: Option<String>,
    #[arg(long)]
    fail_url: Option<String>,
    #[arg(long)]
    default_url: Option<String>,
}

impl Order {
    fn into_request(self) -> eyre::Result<PaymentRequest> {
        let mut request = PaymentRequest::new(self.order_number, self.order_name, self.amount)
            .with_currency(self.currency);
        if let Some(gateway) = self.gateway {
            request = request.with_gateway(Gateway::try_from(gateway).map_err(|err| eyre!(err))?);
        }
        if let Some(language) = self.language {
            request = request.with_language(language);
        }
        if let Some(minutes) = self.life_time {
            request = request.with_operation_life_time(minutes);
        }
        if let Some(url) = self.success_url {
            request = request.with_success_url(url);
        }
        if let Some(url) = self.fail_url {
            request = request.with_fail_url(url);
        }
        if let Some(url) = self.default_url {
            request = request.with_default_url(url);
        }
        Ok(request)
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let dotenv = dotenv();
    pretty_env_logger::init();
    color_eyre::install()?;
    if let Err(err) = dotenv {
        info!("Failed to load .env file: {}", err);
    }
    let env = Env::from_process().context("Failed to load ePayments configuration")?;

    let mut client = EPayments::from_env(&env);
    if cli.live {
        client.set_test_mode(false);
    }
    info!("Using gateway {}", client.credentials().base_url());

    match cli.command {
        Command::Token => {
            let token = client.request_access_token().await?;
            println!("{}", token.value());
        }
        Command::Link(order) => {
            let request = order.into_request()?;
            let page = client.request_payment_page_url(&request).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Command::Redirect(order) => {
            let request = order.into_request()?;
            let redirect = client.send(&request).await?;
            let (name, value) = redirect.header();
            println!("{} {}: {}", redirect.status(), name, value);
        }
        Command::Operation { id } => {
            let operation = client.get_operation(id).await?;
            println!("{}", serde_json::to_string_pretty(&operation)?);
        }
        Command::Check { id, order_number } => {
            let done = client.check_operation(id, &order_number).await?;
            println!("{}", done);
            if !done {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
