//! HexMint CLI
//!
//! Command-line harness for the HexMint ledger. Drives only the public
//! ledger operations against a persisted state file.
//!
//! # Usage
//!
//! ```bash
//! # Create a collection
//! hexmint init --admin <addr> --treasury <addr> --base-uri ipfs://Qm...
//!
//! # Open the claim and mint gates
//! hexmint enable-claiming
//! hexmint enable-minting
//!
//! # Claim a founder token / mint publicly
//! hexmint claim --recipient <addr> --loot 42
//! hexmint mint --payer <addr> --value 0.08
//! ```

use hexmint::registry::MemoryLootRegistry;
use hexmint::storage::{StorageError, StorageResult};
use hexmint::{Address, Coin, HexCode, LedgerConfig, LootId, TokenId, TokenLedger};

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// HexMint - fixed-supply collection ledger
#[derive(Parser)]
#[command(name = "hexmint")]
#[command(version)]
#[command(about = "HexMint collection ledger CLI", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// State file path
    #[arg(short, long, global = true, env = "HEXMINT_STATE", default_value = "hexmint.state")]
    state: PathBuf,

    /// Caller address (defaults to the stored admin for admin commands)
    #[arg(short, long, global = true)]
    caller: Option<Address>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new collection ledger
    Init(InitArgs),

    /// Switch founder claiming on
    EnableClaiming,

    /// Switch founder claiming off
    DisableClaiming,

    /// Switch public minting on
    EnableMinting,

    /// Switch public minting off
    DisableMinting,

    /// Flip the master switch
    Toggle,

    /// Claim a founder token
    Claim(ClaimArgs),

    /// Publicly mint a token
    Mint(MintArgs),

    /// Replace the hex-code grid
    SetHexCodes(SetHexCodesArgs),

    /// Credit an account in the payment ledger (test harness)
    Fund(FundArgs),

    /// Record a loot owner in the stand-in loot registry (test harness)
    SetLootOwner(SetLootOwnerArgs),

    /// Show ledger status
    Status,

    /// Look up the owner of a token
    Owner(OwnerArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Collection name
    #[arg(long, default_value = "HexMint")]
    name: String,

    /// Collection symbol
    #[arg(long, default_value = "HEXM")]
    symbol: String,

    /// Base metadata URI
    #[arg(long, default_value = "")]
    base_uri: String,

    /// Admin address
    #[arg(long)]
    admin: Address,

    /// Treasury address
    #[arg(long)]
    treasury: Address,

    /// Mint price in whole coins (decimal)
    #[arg(long, default_value = "0.08")]
    price: String,

    /// Supply cap
    #[arg(long, default_value = "8000")]
    max_supply: u64,

    /// Claimable sub-range cap
    #[arg(long, default_value = "1000")]
    max_supply_claimable: u64,
}

#[derive(Args)]
struct ClaimArgs {
    /// Recipient address (must own the loot item)
    #[arg(long)]
    recipient: Address,

    /// Loot item ID backing the claim
    #[arg(long)]
    loot: u64,
}

#[derive(Args)]
struct MintArgs {
    /// Paying address
    #[arg(long)]
    payer: Address,

    /// Recipient address (defaults to the payer)
    #[arg(long)]
    recipient: Option<Address>,

    /// Attached payment in whole coins (decimal)
    #[arg(long)]
    value: String,
}

#[derive(Args)]
struct SetHexCodesArgs {
    /// Grid rows, each a comma-separated list of hex codes
    /// (e.g. "1f0d39,ca0048" "386f5b,e16166")
    rows: Vec<String>,
}

#[derive(Args)]
struct FundArgs {
    /// Address to credit
    #[arg(long)]
    address: Address,

    /// Amount in whole coins (decimal)
    #[arg(long)]
    amount: String,
}

#[derive(Args)]
struct SetLootOwnerArgs {
    /// Loot item ID
    #[arg(long)]
    loot: u64,

    /// Owner address
    #[arg(long)]
    owner: Address,
}

#[derive(Args)]
struct OwnerArgs {
    /// Token ID
    token_id: u64,
}

/// Everything the harness persists between invocations: the ledger
/// snapshot plus the pieces the library treats as external (config,
/// admin identity, the stand-in loot registry).
#[derive(Serialize, Deserialize)]
struct HarnessState {
    config: LedgerConfig,
    admin: Address,
    loot: MemoryLootRegistry,
    ledger: hexmint::storage::LedgerState,
}

impl HarnessState {
    fn save(&self, path: &Path) -> StorageResult<()> {
        let data =
            bincode::serialize(self).map_err(|e| StorageError::Serialization(e.to_string()))?;
        std::fs::write(path, data).map_err(|e| StorageError::Io(e.to_string()))
    }

    fn load(path: &Path) -> StorageResult<Self> {
        let data = std::fs::read(path).map_err(|e| StorageError::Io(e.to_string()))?;
        bincode::deserialize(&data).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Commands::Init(args) => run_init(args, &cli.state)?,
        Commands::EnableClaiming => {
            run_op(&cli.state, cli.caller, |ledger, caller| ledger.enable_claiming(&caller))?
        }
        Commands::DisableClaiming => {
            run_op(&cli.state, cli.caller, |ledger, caller| ledger.disable_claiming(&caller))?
        }
        Commands::EnableMinting => {
            run_op(&cli.state, cli.caller, |ledger, caller| ledger.enable_minting(&caller))?
        }
        Commands::DisableMinting => {
            run_op(&cli.state, cli.caller, |ledger, caller| ledger.disable_minting(&caller))?
        }
        Commands::Toggle => {
            run_op(&cli.state, cli.caller, |ledger, caller| ledger.toggle_is_active(&caller))?
        }
        Commands::Claim(args) => run_claim(args, &cli.state)?,
        Commands::Mint(args) => run_mint(args, &cli.state)?,
        Commands::SetHexCodes(args) => run_set_hex_codes(args, &cli.state, cli.caller)?,
        Commands::Fund(args) => run_fund(args, &cli.state)?,
        Commands::SetLootOwner(args) => run_set_loot_owner(args, &cli.state)?,
        Commands::Status => run_status(&cli.state)?,
        Commands::Owner(args) => run_owner(args, &cli.state)?,
    }

    Ok(())
}

fn run_init(args: InitArgs, state_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = LedgerConfig {
        name: args.name,
        symbol: args.symbol,
        base_uri: args.base_uri,
        treasury: args.treasury,
        price: Coin::from_decimal_str(&args.price)?,
        max_supply: args.max_supply,
        max_supply_claimable: args.max_supply_claimable,
    };

    let ledger = TokenLedger::new(config.clone(), args.admin, Box::new(MemoryLootRegistry::new()))?;

    let harness = HarnessState {
        config,
        admin: args.admin,
        loot: MemoryLootRegistry::new(),
        ledger: ledger.snapshot(),
    };
    harness.save(state_path)?;

    info!(path = %state_path.display(), "ledger initialized");
    Ok(())
}

/// Load the harness state, rebuild the ledger, run one operation, and
/// persist the result with any emitted events logged.
fn with_ledger(
    state_path: &Path,
    f: impl FnOnce(&mut TokenLedger, &HarnessState) -> Result<(), Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let harness = HarnessState::load(state_path)?;
    let mut ledger = TokenLedger::from_state(
        harness.config.clone(),
        harness.admin,
        Box::new(harness.loot.clone()),
        harness.ledger.clone(),
    )?;

    f(&mut ledger, &harness)?;

    for event in ledger.take_events() {
        info!(?event, "event");
    }

    let updated = HarnessState {
        config: harness.config,
        admin: harness.admin,
        loot: harness.loot,
        ledger: ledger.snapshot(),
    };
    updated.save(state_path)?;
    Ok(())
}

fn run_op(
    state_path: &Path,
    caller: Option<Address>,
    op: impl FnOnce(&mut TokenLedger, Address) -> hexmint::RegistryResult<()>,
) -> Result<(), Box<dyn std::error::Error>> {
    with_ledger(state_path, |ledger, harness| {
        let caller = caller.unwrap_or(harness.admin);
        op(ledger, caller)?;
        Ok(())
    })
}

fn run_claim(args: ClaimArgs, state_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    with_ledger(state_path, |ledger, _| {
        let token_id = ledger.claim_founder_token(args.recipient, LootId(args.loot))?;
        println!("claimed {} for {}", token_id, args.recipient);
        Ok(())
    })
}

fn run_mint(args: MintArgs, state_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    with_ledger(state_path, |ledger, _| {
        let payment = Coin::from_decimal_str(&args.value)?;
        let recipient = args.recipient.unwrap_or(args.payer);
        let token_id = ledger.mint(&args.payer, recipient, payment)?;
        println!("minted {} for {}", token_id, recipient);
        Ok(())
    })
}

fn run_set_hex_codes(
    args: SetHexCodesArgs,
    state_path: &Path,
    caller: Option<Address>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut grid = Vec::with_capacity(args.rows.len());
    for row in &args.rows {
        let mut cells = Vec::new();
        for cell in row.split(',') {
            let code = HexCode::from_hex(cell.trim())
                .ok_or_else(|| format!("invalid hex code: {cell}"))?;
            cells.push(code);
        }
        grid.push(cells);
    }

    with_ledger(state_path, |ledger, harness| {
        let caller = caller.unwrap_or(harness.admin);
        ledger.set_hex_codes(&caller, grid)?;
        Ok(())
    })
}

fn run_fund(args: FundArgs, state_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    with_ledger(state_path, |ledger, _| {
        let amount = Coin::from_decimal_str(&args.amount)?;
        ledger.bank_mut().credit(&args.address, amount);
        println!("funded {} with {}", args.address, amount);
        Ok(())
    })
}

fn run_set_loot_owner(
    args: SetLootOwnerArgs,
    state_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    // The loot table lives beside the ledger, not inside it
    let mut harness = HarnessState::load(state_path)?;
    harness.loot.set_owner(LootId(args.loot), args.owner);
    harness.save(state_path)?;
    println!("loot-{} owner set to {}", args.loot, args.owner);
    Ok(())
}

fn run_status(state_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let harness = HarnessState::load(state_path)?;
    let ledger = TokenLedger::from_state(
        harness.config.clone(),
        harness.admin,
        Box::new(harness.loot.clone()),
        harness.ledger.clone(),
    )?;

    println!("collection:       {} ({})", harness.config.name, harness.config.symbol);
    println!("admin:            {}", ledger.admin());
    println!("treasury:         {}", ledger.treasury());
    println!("price:            {}", ledger.price());
    println!("active:           {}", ledger.is_active());
    println!("claiming active:  {}", ledger.claiming_active());
    println!("minting active:   {}", ledger.minting_active());
    println!(
        "claimed:          {} / {}",
        ledger.next_founder_token_id(),
        ledger.max_supply_claimable()
    );
    println!(
        "minted:           {} / {}",
        ledger.next_mintable_token_id(),
        ledger.max_supply() - ledger.max_supply_claimable()
    );
    println!("total issued:     {} / {}", ledger.total_issued(), ledger.max_supply());
    println!("treasury balance: {}", ledger.bank().balance_of(ledger.treasury()));
    println!("hex code rows:    {}", ledger.attributes().rows());
    Ok(())
}

fn run_owner(args: OwnerArgs, state_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let harness = HarnessState::load(state_path)?;
    let ledger = TokenLedger::from_state(
        harness.config.clone(),
        harness.admin,
        Box::new(harness.loot.clone()),
        harness.ledger.clone(),
    )?;

    match ledger.owner_of(TokenId(args.token_id)) {
        Some(owner) => println!("{} owned by {}", TokenId(args.token_id), owner),
        None => println!("{} not issued", TokenId(args.token_id)),
    }
    Ok(())
}
