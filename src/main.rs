use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payflow::application::ledger::LedgerService;
use payflow::application::orchestrator::{BuyAirtime, PaymentOrchestrator};
use payflow::application::sink::NotificationService;
use payflow::config::{SagaConfig, SeedData};
use payflow::domain::account::AccountId;
use payflow::domain::ports::NotificationSink;
use payflow::infrastructure::provider::AirtimeGateway;
use payflow::interfaces::api::{
    AccountResponse, BillDto, BillsResponse, ErrorResponse, NotificationDto, PurchaseResponse,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Runs the wallet ledger, payment orchestrator, and notification sink
/// in-process and walks through a purchase scenario.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed accounts and bills from a JSON file instead of the demo set.
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Account to run the scenario against.
    #[arg(long, default_value = "user1")]
    account: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payflow=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let seed = match &cli.seed {
        Some(path) => SeedData::load(path).into_diagnostic()?,
        None => SeedData::demo(),
    };

    let ledger = Arc::new(LedgerService::with_accounts(seed.accounts()));
    let sink = Arc::new(NotificationService::new());
    let orchestrator = PaymentOrchestrator::new(
        ledger.clone(),
        Arc::new(AirtimeGateway::new()),
        sink.clone(),
        SagaConfig::default(),
    );
    orchestrator
        .seed_bills(seed.bills().into_diagnostic()?)
        .await;

    let account = AccountId::new(&cli.account);

    println!("== accounts ==");
    for view in ledger.accounts().await {
        print_json(&AccountResponse::from(view))?;
    }

    println!("== buy airtime: 2000 for 08012345678 ==");
    let request = BuyAirtime {
        account_id: account.clone(),
        phone_number: "08012345678".to_string(),
        amount: 2_000,
        provider: "MTN".to_string(),
    };
    match orchestrator.buy_airtime(request).await {
        Ok(receipt) => print_json(&PurchaseResponse::from(&receipt))?,
        Err(err) => print_json(&ErrorResponse::from_error(&err).1)?,
    }

    println!("== pay first pending bill ==");
    let (bills, _) = orchestrator.bills(&account).await;
    if let Some(bill) = bills.iter().find(|b| !b.is_paid()) {
        match orchestrator.pay_bill(&account, &bill.id).await {
            Ok(receipt) => print_json(&PurchaseResponse::from(&receipt))?,
            Err(err) => print_json(&ErrorResponse::from_error(&err).1)?,
        }

        // Paying the same bill again trips the idempotence guard.
        if let Err(err) = orchestrator.pay_bill(&account, &bill.id).await {
            print_json(&ErrorResponse::from_error(&err).1)?;
        }
    } else {
        println!("no pending bills for {account}");
    }

    println!("== bills ==");
    let (bills, total_pending) = orchestrator.bills(&account).await;
    print_json(&BillsResponse {
        account_id: account.0.clone(),
        bills: bills.iter().map(BillDto::from).collect(),
        total_pending,
    })?;

    println!("== notifications ==");
    let history = sink.history(&account).await.into_diagnostic()?;
    for notification in &history {
        print_json(&NotificationDto::from(notification))?;
    }

    println!("== audit trail ==");
    for record in orchestrator.transactions().await {
        print_json(&record)?;
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}
