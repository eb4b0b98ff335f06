//! Command line front end for pool quotes and analytics.
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use stellar_amm_data::{
    IndexerPoolSource, InMemoryPoolSource, LoadedPool, MarketDataService, NetworkConfig,
    PoolDataSource, PoolKey, UsdPrices,
};
use stellar_amm_domain::math::constant_product::calculate_k;
use stellar_amm_domain::prelude::*;
use tracing::info;

#[derive(Parser)]
#[command(name = "amm-cli")]
#[command(about = "Constant-product AMM quotes and pool analytics", long_about = None)]
struct Cli {
    /// Read pools from a JSON snapshot instead of the configured indexer
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// USD price of the native asset, used when it is a pool's quote token
    #[arg(long, global = true, default_value = "1")]
    native_usd: Decimal,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    A,
    B,
}

impl From<Side> for PoolSide {
    fn from(side: Side) -> Self {
        match side {
            Side::A => PoolSide::A,
            Side::B => PoolSide::B,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List pools in the snapshot file
    Pools,
    /// Quote a swap through a pool
    Swap {
        /// Pool contract id
        #[arg(short, long)]
        pool: String,

        /// Contract of the token being sold
        #[arg(short, long)]
        from: String,

        /// Amount to sell, as typed (e.g. "1,000.5")
        #[arg(short, long)]
        amount: String,

        /// Pool fee in basis points
        #[arg(long, default_value_t = 30)]
        fee_bps: u32,

        /// Slippage tolerance in basis points
        #[arg(long, default_value_t = 50)]
        slippage_bps: u32,

        /// First token contract in pool registration order, if the source does not declare it
        #[arg(long)]
        token_a: Option<String>,

        /// Second token contract in pool registration order
        #[arg(long)]
        token_b: Option<String>,
    },
    /// Check or complete an add-liquidity pair
    Liquidity {
        /// Pool contract id
        #[arg(short, long)]
        pool: String,

        /// Token A amount, as typed
        #[arg(long)]
        amount_a: Option<String>,

        /// Token B amount, as typed
        #[arg(long)]
        amount_b: Option<String>,

        /// Side the user edited last
        #[arg(long, value_enum, default_value_t = Side::A)]
        edited: Side,

        #[arg(long)]
        token_a: Option<String>,

        #[arg(long)]
        token_b: Option<String>,
    },
    /// Show price, market cap, liquidity and volume of a pool
    Stats {
        /// Pool contract id
        #[arg(short, long)]
        pool: String,

        #[arg(long)]
        token_a: Option<String>,

        #[arg(long)]
        token_b: Option<String>,
    },
    /// Format a number the way pool pages display it
    Format {
        #[arg(allow_hyphen_values = true)]
        value: Decimal,

        /// Format as a percentage change instead of a dollar figure
        #[arg(long)]
        percent: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let usd_prices = UsdPrices {
        native_usd: cli.native_usd,
    };

    if let Commands::Format { value, percent } = &cli.command {
        if *percent {
            println!("{}", format_percent_change(*value));
        } else {
            println!("{}", format_large_number(*value));
        }
        return Ok(());
    }

    match &cli.snapshot {
        Some(path) => {
            let source = InMemoryPoolSource::load(path)
                .await
                .with_context(|| format!("loading snapshot {}", path.display()))?;
            if let Commands::Pools = cli.command {
                for key in source.pool_keys().await {
                    println!("{:<20} {} / {}", key.pool, key.token_a, key.token_b);
                }
                return Ok(());
            }
            let service = MarketDataService::with_usd_prices(Arc::new(source), usd_prices);
            run(&service, &cli.command).await
        }
        None => {
            let config = NetworkConfig::from_env()?;
            info!(network = %config.network, rpc = %config.rpc_url, "Using indexer source");
            let source = IndexerPoolSource::new(&config)?;
            let service = MarketDataService::with_usd_prices(Arc::new(source), usd_prices);
            run(&service, &cli.command).await
        }
    }
}

async fn run<S: PoolDataSource>(service: &MarketDataService<S>, command: &Commands) -> Result<()> {
    match command {
        Commands::Swap {
            pool,
            from,
            amount,
            fee_bps,
            slippage_bps,
            token_a,
            token_b,
        } => {
            let key = pool_key(service, pool, token_a, token_b).await?;
            let loaded = service.load_snapshot(&key).await?;
            let from = ContractRef::from(from.as_str());
            let fee = FeeRate::from_bps(*fee_bps)?;

            let quote = match loaded.quote_swap(&from, amount, fee)? {
                Quote::Ready(quote) => quote,
                other => bail!("{}", other.message().unwrap_or_default()),
            };
            let reserves = loaded.snapshot.directed(&from)?;
            let side_in = loaded
                .snapshot
                .side_of(&from)
                .ok_or_else(|| anyhow!("{from} is not in pool {pool}"))?;
            let token_in = loaded.metadata(side_in);
            let token_out = loaded.metadata(side_in.opposite());

            let sold = Amount::new(quote.amount_in, token_in.descriptor.decimals);
            let out = Amount::new(quote.amount_out, token_out.descriptor.decimals);
            let minimum = Amount::new(
                calculate_minimum_received(quote.amount_out, *slippage_bps),
                token_out.descriptor.decimals,
            );
            println!("Pool:              {}", key.pool);
            println!("Sell:              {} {}", sold.to_display(6)?, token_in.symbol);
            println!("Receive:           {} {}", out.to_display(6)?, token_out.symbol);
            println!("Minimum received:  {} {}", minimum.to_display(6)?, token_out.symbol);
            println!("Fee:               {}%", fee.as_percent());
            if let Quote::Ready(impact) = calculate_price_impact(&reserves, &quote) {
                println!("Price impact:      {}", format_percentage(impact));
            }
        }
        Commands::Liquidity {
            pool,
            amount_a,
            amount_b,
            edited,
            token_a,
            token_b,
        } => {
            let key = pool_key(service, pool, token_a, token_b).await?;
            let loaded = service.load_snapshot(&key).await?;
            let reserves = loaded.snapshot.reserves;
            let edited = PoolSide::from(*edited);

            let check = match (amount_a, amount_b) {
                (Some(a), Some(b)) => {
                    let a = parse_for(&loaded, PoolSide::A, a)?;
                    let b = parse_for(&loaded, PoolSide::B, b)?;
                    reconcile_pair(&reserves, a, b, edited)
                }
                (Some(a), None) => {
                    let a = parse_for(&loaded, PoolSide::A, a)?;
                    quote_add_liquidity(&reserves, PoolSide::A, a).map(LiquidityCheck::Accepted)
                }
                (None, Some(b)) => {
                    let b = parse_for(&loaded, PoolSide::B, b)?;
                    quote_add_liquidity(&reserves, PoolSide::B, b).map(LiquidityCheck::Accepted)
                }
                (None, None) => bail!("provide --amount-a, --amount-b or both"),
            };

            let (quote, note) = match check {
                Quote::Ready(LiquidityCheck::Accepted(quote)) => (quote, None),
                Quote::Ready(LiquidityCheck::NeedsConfirmation { suggested, issue }) => {
                    (suggested, Some(issue))
                }
                other => bail!("{}", other.message().unwrap_or_default()),
            };
            if let Some(issue) = note {
                println!("Note: {issue}");
            }
            print_liquidity(&loaded, &quote)?;
        }
        Commands::Stats {
            pool,
            token_a,
            token_b,
        } => {
            let key = pool_key(service, pool, token_a, token_b).await?;
            let report = service.pool_analytics(&key).await?;
            let analytics = match report.analytics {
                Quote::Ready(analytics) => analytics,
                other => bail!("{}", other.message().unwrap_or_default()),
            };
            let loaded = &report.loaded;
            let base = loaded.metadata(analytics.roles.base);
            let quote = loaded.metadata(analytics.roles.quote);
            // without a USD reference, money figures stay in quote-token units
            let money = |value: Decimal| {
                if report.usd_denominated {
                    format_large_number(value)
                } else {
                    format_in_units(value, &quote.symbol)
                }
            };
            let volume = if analytics.volume_24h_usd.is_synthetic() {
                format!("{} (est.)", money(analytics.volume_24h_usd.value))
            } else {
                money(analytics.volume_24h_usd.value)
            };

            println!("Pool:          {} ({}/{})", analytics.pool, base.symbol, quote.symbol);
            println!("Price:         {} {}", analytics.price.value.normalize(), quote.symbol);
            if report.usd_denominated {
                println!("Price (USD):   {}", format_large_number(analytics.price_usd));
            }
            match analytics.market_cap_usd {
                Some(cap) => println!("Market cap:    {}", money(cap)),
                None => println!("Market cap:    n/a"),
            }
            println!("Liquidity:     {}", money(analytics.liquidity_usd));
            println!("Volume 24h:    {volume}");
            println!("Change 24h:    {}", format_change_metric(&analytics.price_change_24h));
            println!("k:             {}", calculate_k(&loaded.snapshot.reserves));
        }
        Commands::Pools => bail!("listing pools requires --snapshot"),
        Commands::Format { .. } => {}
    }
    Ok(())
}

/// Builds the pool key from flags, falling back to the contracts the source declares.
async fn pool_key<S: PoolDataSource>(
    service: &MarketDataService<S>,
    pool: &str,
    token_a: &Option<String>,
    token_b: &Option<String>,
) -> Result<PoolKey> {
    if let (Some(a), Some(b)) = (token_a, token_b) {
        return Ok(PoolKey::new(pool, ContractRef::from(a.as_str()), ContractRef::from(b.as_str())));
    }
    let reserves = service.source().fetch_reserves(pool).await?;
    match (reserves.token_a, reserves.token_b) {
        (Some(a), Some(b)) => Ok(PoolKey::new(pool, a, b)),
        _ => bail!("pool {pool} does not declare its tokens, pass --token-a and --token-b"),
    }
}

fn parse_for(loaded: &LoadedPool, side: PoolSide, text: &str) -> Result<i128> {
    let decimals = loaded.snapshot.descriptor(side).decimals;
    match parse_amount(text, decimals) {
        Quote::Ready(raw) => Ok(raw),
        other => bail!("{}", other.message().unwrap_or_default()),
    }
}

fn print_liquidity(loaded: &LoadedPool, quote: &LiquidityQuote) -> Result<()> {
    let (amount_a, amount_b) = quote.amounts();
    let a = Amount::new(amount_a, loaded.token_a.descriptor.decimals).to_display(6)?;
    let b = Amount::new(amount_b, loaded.token_b.descriptor.decimals).to_display(6)?;
    println!("Deposit:     {} {}", a, loaded.token_a.symbol);
    println!("             {} {}", b, loaded.token_b.symbol);
    match quote {
        LiquidityQuote::Initial {
            estimated_shares, ..
        } => {
            println!("First deposit sets the price.");
            println!("LP shares:   ~{estimated_shares}");
        }
        LiquidityQuote::Proportional { .. } => {
            if let Quote::Ready(share) = pool_share(&loaded.snapshot.reserves, amount_a) {
                println!("Pool share:  {}", format_percentage(share));
            }
        }
    }
    Ok(())
}
