//! Cradle admin CLI
//!
//! Seed and admin operations for the storefront core: create catalog
//! products, create promo codes, issue session tokens.

use std::process;

use clap::{Args, Parser, Subcommand};
use cradle_app::{
    auth::{PgAuthService, UserUuid},
    database::{self, Db},
    domain::{
        products::{
            PgProductsService, ProductsService,
            models::{NewProduct, ProductUuid},
        },
        promos::{
            Discount, PgPromosService, PromosService,
            models::{NewPromo, PromoUuid},
        },
    },
};
use jiff::Timestamp;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "cradle-app", about = "Cradle admin CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Product(ProductCommand),
    Promo(PromoCommand),
    Session(SessionCommand),
}

#[derive(Debug, Args)]
struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    Create(CreateProductArgs),
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    /// Product display name
    #[arg(long)]
    name: String,

    /// Price in minor currency units
    #[arg(long)]
    price: u64,

    /// Initial stock level
    #[arg(long)]
    stock: u32,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,
}

#[derive(Debug, Args)]
struct PromoCommand {
    #[command(subcommand)]
    command: PromoSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromoSubcommand {
    Create(CreatePromoArgs),
}

#[derive(Debug, Args)]
struct CreatePromoArgs {
    /// Promo code; normalized to uppercase
    #[arg(long)]
    code: String,

    /// Percentage off (0-100); mutually exclusive with --amount
    #[arg(long, conflicts_with = "amount")]
    percentage: Option<u16>,

    /// Fixed amount off in minor units; mutually exclusive with --percentage
    #[arg(long)]
    amount: Option<u64>,

    /// Expiry instant (RFC 3339)
    #[arg(long)]
    expires_at: Timestamp,

    /// Minimum cart subtotal required to apply the promo
    #[arg(long)]
    min_cart_value: Option<u64>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Debug, Args)]
struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    Issue(IssueSessionArgs),
}

#[derive(Debug, Args)]
struct IssueSessionArgs {
    /// User UUID from the identity provider
    #[arg(long)]
    user_uuid: Uuid,

    /// Optional expiry instant (RFC 3339); never expires when omitted
    #[arg(long)]
    expires_at: Option<Timestamp>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Product(ProductCommand {
            command: ProductSubcommand::Create(args),
        }) => create_product(args).await,
        Commands::Promo(PromoCommand {
            command: PromoSubcommand::Create(args),
        }) => create_promo(args).await,
        Commands::Session(SessionCommand {
            command: SessionSubcommand::Issue(args),
        }) => issue_session(args).await,
    }
}

async fn create_product(args: CreateProductArgs) -> Result<(), String> {
    let db = connect(&args.database_url).await?;
    let service = PgProductsService::new(db);

    let product = service
        .create_product(NewProduct {
            uuid: args.uuid.map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            name: args.name,
            price: args.price,
            stock: args.stock,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("name: {}", product.name);
    println!("price: {}", product.price);
    println!("stock: {}", product.stock);

    Ok(())
}

async fn create_promo(args: CreatePromoArgs) -> Result<(), String> {
    let discount = match (args.percentage, args.amount) {
        (Some(percentage), None) if percentage <= 100 => Discount::PercentageOff { percentage },
        (Some(_), None) => return Err("percentage must be between 0 and 100".to_string()),
        (None, Some(amount)) => Discount::AmountOff { amount },
        _ => return Err("exactly one of --percentage or --amount is required".to_string()),
    };

    let db = connect(&args.database_url).await?;
    let service = PgPromosService::new(db);

    let promo = service
        .create_promo(NewPromo {
            uuid: PromoUuid::new(),
            code: args.code,
            discount,
            expires_at: args.expires_at,
            min_cart_value: args.min_cart_value,
        })
        .await
        .map_err(|error| format!("failed to create promo: {error}"))?;

    println!("promo_uuid: {}", promo.uuid);
    println!("code: {}", promo.code);
    println!("expires_at: {}", promo.expires_at);

    Ok(())
}

async fn issue_session(args: IssueSessionArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(pool);

    let issued = service
        .issue_session(UserUuid::from_uuid(args.user_uuid), args.expires_at)
        .await
        .map_err(|error| format!("failed to issue session: {error}"))?;

    println!("user_uuid: {}", issued.session.user_uuid);
    println!("session_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}

async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}
