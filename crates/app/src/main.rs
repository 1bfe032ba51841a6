use std::{error::Error, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use model::{Category, PaymentMethod, Reward, RewardKind, ValidationError, import_settings};
use serde_json::{Value, json};

use crate::storage::{CATEGORIES_KEY, METHODS_KEY, Storage};

mod storage;

/// Default filename for exported settings.
const SETTINGS_FILE: &str = "paywith-settings.json";

#[derive(Parser, Debug)]
#[command(name = "paywith")]
#[command(about = "Pick the payment method with the best reward and move your setup between devices")]
struct Cli {
    /// Storage file (also read from `PAYWITH_STORE`).
    #[arg(long, env = "PAYWITH_STORE", default_value = "./paywith-store.json")]
    store: PathBuf,

    /// Log level for the paywith crates.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank payment methods for an amount and category.
    Best(BestArgs),
    Category(CategoryCli),
    Method(MethodCli),
    Reward(RewardCli),
    /// Write the configuration to a JSON settings file.
    Export(ExportArgs),
    /// Read, validate and store a JSON settings file.
    Import(ImportArgs),
    /// Print the configuration as a compact scan-safe string.
    Encode,
    /// Decode a transport string, validate it and optionally store it.
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct BestArgs {
    #[arg(long)]
    amount: f64,
    #[arg(long)]
    category: String,
}

#[derive(Args, Debug)]
struct CategoryCli {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Add a category with a generated id.
    Add { label: String },
    /// Change a category's label.
    Rename { id: String, label: String },
    /// Remove a category; reward rules lose the reference, nothing else.
    Remove { id: String },
    List,
}

#[derive(Args, Debug)]
struct MethodCli {
    #[command(subcommand)]
    command: MethodCommand,
}

#[derive(Subcommand, Debug)]
enum MethodCommand {
    /// Add a payment method with a generated id and no rewards.
    Add { name: String },
    /// Change a method's name.
    Rename { id: String, name: String },
    /// Remove a method together with its rewards.
    Remove { id: String },
    List,
}

#[derive(Args, Debug)]
struct RewardCli {
    #[command(subcommand)]
    command: RewardCommand,
}

#[derive(Subcommand, Debug)]
enum RewardCommand {
    Add(RewardAddArgs),
    Remove(RewardRemoveArgs),
}

#[derive(Args, Debug)]
struct RewardAddArgs {
    /// Owning method id.
    #[arg(long)]
    method: String,
    /// Reward kind: cashback or points.
    #[arg(long = "type")]
    kind: String,
    /// Flat amount (fixed cashback) or fraction (percentage cashback).
    #[arg(long, default_value_t = 0.0)]
    value: f64,
    /// Treat `value` as a flat amount instead of a fraction.
    #[arg(long)]
    fixed: bool,
    /// Inclusive qualifying threshold.
    #[arg(long, default_value_t = 0.0)]
    min_spend: f64,
    /// Category ids this rule is scoped to; none makes it global.
    #[arg(long = "category")]
    categories: Vec<String>,
    /// Spend per point (points rewards).
    #[arg(long)]
    earn_rate: Option<f64>,
    /// Points per currency unit (points rewards).
    #[arg(long)]
    redemption_rate: Option<f64>,
}

#[derive(Args, Debug)]
struct RewardRemoveArgs {
    #[arg(long)]
    method: String,
    #[arg(long)]
    id: String,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(long, default_value = SETTINGS_FILE)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct ImportArgs {
    file: PathBuf,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    code: String,
    /// Persist the decoded configuration instead of just printing it.
    #[arg(long)]
    save: bool,
}

fn parse_kind(raw: &str) -> Result<RewardKind, String> {
    match raw {
        "cashback" => Ok(RewardKind::Cashback),
        "points" => Ok(RewardKind::Points),
        other => Err(format!("unsupported reward type: {other}")),
    }
}

/// Loads the catalog from storage, re-validating it through the same gate as
/// imported files. Absent or rejected content falls back to the presets.
fn load_catalog(storage: &Storage) -> (Vec<Category>, Vec<PaymentMethod>) {
    if let (Some(categories), Some(methods)) =
        (storage.get(CATEGORIES_KEY), storage.get(METHODS_KEY))
    {
        let raw = json!({
            "version": model::SETTINGS_VERSION,
            "categories": categories,
            "methods": methods,
        });
        match import_settings(&raw) {
            Ok(settings) => return (settings.categories, settings.methods),
            Err(err) => {
                tracing::warn!("stored catalog rejected, using presets: {err}");
            }
        }
    }

    (
        engine::presets::preset_categories(),
        engine::presets::preset_methods(),
    )
}

fn save_catalog(
    storage: &mut Storage,
    categories: &[Category],
    methods: &[PaymentMethod],
) -> Result<(), Box<dyn Error + Send + Sync>> {
    storage.set(CATEGORIES_KEY, serde_json::to_value(categories)?);
    storage.set(METHODS_KEY, serde_json::to_value(methods)?);
    storage.save()?;
    Ok(())
}

fn print_violations(err: &ValidationError) {
    eprintln!("{err}");
    for violation in &err.violations {
        eprintln!("  {violation}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "paywith={level},engine={level},codec={level},model={level}",
            level = cli.log_level
        ))
        .init();

    let mut storage = Storage::open(&cli.store)?;
    let (categories, methods) = load_catalog(&storage);

    match cli.command {
        Command::Best(args) => {
            let amount = if args.amount.is_finite() { args.amount } else { 0.0 };
            let ranked = engine::best(amount, &args.category, &methods);
            if ranked.is_empty() {
                println!("no method yields a reward for this purchase");
                return Ok(());
            }
            for (rank, result) in ranked.iter().enumerate() {
                println!(
                    "{:>2}. {:<24} {:>10.2}  {}",
                    rank + 1,
                    result.method_name,
                    result.value,
                    result.reward_label
                );
            }
        }
        Command::Category(CategoryCli { command }) => match command {
            CategoryCommand::Add { label } => {
                let categories = engine::store::categories::add(&categories, &label)?;
                save_catalog(&mut storage, &categories, &methods)?;
                println!("added category: {label}");
            }
            CategoryCommand::Rename { id, label } => {
                let categories = engine::store::categories::rename(&categories, &id, &label)?;
                save_catalog(&mut storage, &categories, &methods)?;
                println!("renamed category: {id}");
            }
            CategoryCommand::Remove { id } => {
                let (categories, methods) =
                    engine::store::categories::remove(&categories, &methods, &id)?;
                save_catalog(&mut storage, &categories, &methods)?;
                println!("removed category: {id}");
            }
            CategoryCommand::List => {
                for category in &categories {
                    println!("{:<38} {}", category.id, category.label);
                }
            }
        },
        Command::Method(MethodCli { command }) => match command {
            MethodCommand::Add { name } => {
                let methods = engine::store::methods::add(&methods, &name)?;
                save_catalog(&mut storage, &categories, &methods)?;
                println!("added method: {name}");
            }
            MethodCommand::Rename { id, name } => {
                let methods = engine::store::methods::rename(&methods, &id, &name)?;
                save_catalog(&mut storage, &categories, &methods)?;
                println!("renamed method: {id}");
            }
            MethodCommand::Remove { id } => {
                let methods = engine::store::methods::remove(&methods, &id)?;
                save_catalog(&mut storage, &categories, &methods)?;
                println!("removed method: {id}");
            }
            MethodCommand::List => {
                for method in &methods {
                    println!("{:<24} {}", method.id, method.name);
                    for reward in &method.rewards {
                        println!("    {:<38} {}", reward.id, engine::describe(reward));
                    }
                }
            }
        },
        Command::Reward(RewardCli { command }) => match command {
            RewardCommand::Add(args) => {
                let kind = match parse_kind(&args.kind) {
                    Ok(kind) => kind,
                    Err(err) => {
                        eprintln!("{err}");
                        std::process::exit(2);
                    }
                };
                let reward = Reward {
                    id: uuid_string(),
                    kind,
                    value: args.value,
                    is_fixed: args.fixed,
                    min_spend: args.min_spend,
                    categories: args.categories,
                    earn_rate: args.earn_rate,
                    redemption_rate: args.redemption_rate,
                };
                let label = engine::describe(&reward);
                let methods = engine::store::rewards::add(&methods, &args.method, reward)?;
                save_catalog(&mut storage, &categories, &methods)?;
                println!("added reward: {label}");
            }
            RewardCommand::Remove(args) => {
                let methods = engine::store::rewards::remove(&methods, &args.method, &args.id)?;
                save_catalog(&mut storage, &categories, &methods)?;
                println!("removed reward: {}", args.id);
            }
        },
        Command::Export(args) => {
            let settings = model::export_settings(categories, methods);
            let text = serde_json::to_string_pretty(&settings)?;
            std::fs::write(&args.output, text)?;
            println!("exported settings to {}", args.output.display());
        }
        Command::Import(args) => {
            let text = std::fs::read_to_string(&args.file)?;
            let raw: Value = serde_json::from_str(&text)?;
            match import_settings(&raw) {
                Ok(settings) => {
                    save_catalog(&mut storage, &settings.categories, &settings.methods)?;
                    println!(
                        "imported {} categories and {} methods",
                        settings.categories.len(),
                        settings.methods.len()
                    );
                }
                Err(err) => {
                    print_violations(&err);
                    std::process::exit(1);
                }
            }
        }
        Command::Encode => {
            let settings = model::export_settings(categories, methods);
            let encoded = codec::encode(&settings).await?;
            println!("{encoded}");
        }
        Command::Decode(args) => {
            let raw: Value = codec::decode(&args.code).await?;
            match import_settings(&raw) {
                Ok(settings) => {
                    if args.save {
                        save_catalog(&mut storage, &settings.categories, &settings.methods)?;
                        println!(
                            "saved {} categories and {} methods",
                            settings.categories.len(),
                            settings.methods.len()
                        );
                    } else {
                        println!("{}", serde_json::to_string_pretty(&settings)?);
                    }
                }
                Err(err) => {
                    print_violations(&err);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn uuid_string() -> String {
    uuid::Uuid::new_v4().to_string()
}
