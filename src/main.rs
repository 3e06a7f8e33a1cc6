use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;

use claims_triage::config::AppConfig;
use claims_triage::error::AppError;
use claims_triage::server;
use claims_triage::telemetry;
use claims_triage::workflows::claims::memory::{
    MemoryClaimStore, MemoryNotificationHub, MemoryPatternSink, MemoryProfileStore,
    OfflineAnalyzer,
};
use claims_triage::workflows::claims::{
    ClaimCategory, ClaimService, ClaimSubmission, ClaimantHistory, Collaborators, DocumentRef,
    ExplanationBuilder, RuleModel, ScoringEngine,
};

#[derive(Parser, Debug)]
#[command(
    name = "Claims Triage Service",
    about = "Score insurance claims for fraud risk and drive their approval workflow",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a sample claim locally and print the explanation
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Claimed amount
    #[arg(long, default_value_t = 45_000)]
    amount: u64,
    /// Claimant age
    #[arg(long, default_value_t = 34)]
    age: u8,
    /// Policy duration in months
    #[arg(long, default_value_t = 24)]
    policy_duration: u32,
    /// Submission timestamp (RFC 3339; defaults to a weekday morning)
    #[arg(long)]
    submitted_at: Option<DateTime<Utc>>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let claims = Arc::new(MemoryClaimStore::default());
    let service = Arc::new(ClaimService::new(
        claims.clone(),
        Arc::new(MemoryProfileStore::default()),
        Arc::new(MemoryNotificationHub::default()),
        Collaborators {
            model: Arc::new(RuleModel),
            analyzer: Arc::new(OfflineAnalyzer),
            history: claims,
            patterns: Arc::new(MemoryPatternSink::default()),
        },
        config.scoring.clone(),
    ));

    let (router, readiness) = server::app(service);
    server::serve(&config, router, readiness).await
}

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let submitted_at = args.submitted_at.unwrap_or_else(|| {
        "2025-06-03T10:30:00Z"
            .parse()
            .expect("static demo timestamp parses")
    });

    let submission = ClaimSubmission {
        claimant_id: "demo-claimant".to_string(),
        policy_number: "POL-204617".to_string(),
        category: ClaimCategory::Health,
        amount: args.amount,
        description: "Hospitalization following a road accident, invoices attached".to_string(),
        claimant_age: args.age,
        policy_duration_months: args.policy_duration,
        submitted_at,
        documents: vec![DocumentRef {
            name: "hospital-invoice.pdf".to_string(),
            storage_key: "demo/hospital-invoice.pdf".to_string(),
        }],
    };

    let engine = ScoringEngine::new(config.scoring.clone(), Arc::new(RuleModel));
    let assessment = engine.assess(&submission, &ClaimantHistory::default(), None, submitted_at);
    let explanation = ExplanationBuilder::new(config.scoring).build(&assessment, submission.amount);

    println!("fraud score : {} ({})", assessment.score, assessment.tier.label());
    println!("rule score  : {}", assessment.rule_score);
    println!("decision    : {}", explanation.decision.label());
    println!();
    println!("{}", explanation.summary);
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&assessment.factors).expect("factors serialize")
    );

    Ok(())
}
