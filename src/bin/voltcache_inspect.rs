//! VoltCache Inspector
//!
//! Membaca slot file yang ditulis oleh `PriceCache` dan menampilkan isinya.
//!
//! Usage:
//!   cargo run --features cli --bin voltcache_inspect -- --dir <DIR> <COMMAND>
//!
//! Commands:
//! - `keys` - list semua slot di directory
//! - `show` - decode slot sebagai price list atau auth record
//! - `dump` - hex dump payload slot apa adanya

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use voltcache::config::{DEFAULT_AUTH_KEY, DEFAULT_PRICE_KEY};
use voltcache::{decode, AuthData, CurrentPriceData, MmapSlotStore, Price, SlotStore, Timestamp};

#[derive(Parser)]
#[command(name = "voltcache_inspect")]
#[command(about = "Inspect cached electricity price slots")]
struct Args {
    /// Slot storage directory
    #[arg(short, long, default_value = "voltcache")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List slot keys
    Keys,
    /// Decode a slot and print a summary
    Show {
        /// Record kind stored in the slot
        #[arg(short, long, value_enum, default_value = "prices")]
        kind: Kind,
        /// Slot key (defaults to the standard key for the kind)
        #[arg(short = 'k', long)]
        key: Option<String>,
    },
    /// Hex dump a slot payload
    Dump {
        key: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Prices,
    Auth,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("voltcache=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let store = MmapSlotStore::open(&args.dir)?;
    debug!(dir = %store.dir().display(), "inspecting");

    match args.command {
        Command::Keys => list_keys(&store),
        Command::Show { kind, key } => show(&store, kind, key),
        Command::Dump { key } => dump(&store, &key),
    }
}

fn list_keys(store: &MmapSlotStore) -> Result<(), Box<dyn Error>> {
    let keys = store.keys()?;
    if keys.is_empty() {
        println!("(no slots in {})", store.dir().display());
        return Ok(());
    }
    for key in keys {
        let len = store.load(&key)?.map_or(0, |bytes| bytes.len());
        println!("{key:<24} {len:>8} bytes");
    }
    Ok(())
}

fn show(store: &MmapSlotStore, kind: Kind, key: Option<String>) -> Result<(), Box<dyn Error>> {
    let key = key.unwrap_or_else(|| match kind {
        Kind::Prices => DEFAULT_PRICE_KEY.to_string(),
        Kind::Auth => DEFAULT_AUTH_KEY.to_string(),
    });
    let Some(bytes) = store.load(&key)? else {
        println!("slot '{key}' is empty");
        return Ok(());
    };

    match kind {
        Kind::Prices => print_prices(&decode::<CurrentPriceData>(&bytes)?),
        Kind::Auth => print_auth(&decode::<AuthData>(&bytes)?),
    }
    Ok(())
}

fn print_prices(record: &CurrentPriceData) {
    let data = &record.data;
    let now = Timestamp::now();

    println!("Current Price");
    println!("-------------");
    println!("   Period:     {}", data.current_price_period);
    println!("   Price:      {:.2} c/kWh", data.current_price_kwh);
    println!("   Renewables: {:.1}%", data.current_renewable_in_grid);
    println!("   Color:      {}", data.current_price_color);
    println!("   Age:        {:.0}s", now.seconds_since(data.current_price_period));
    println!("   Response:   {}", record.service_response_type);

    print_price_list("Forecast", &data.forecast_prices);
    print_price_list("Previous", &data.previous_prices);

    if let Some(cheapest) = data.cheapest_forecast() {
        println!(
            "\nCheapest forecast: {:.2} c/kWh at {}",
            cheapest.price_kwh, cheapest.period
        );
    }
}

fn print_price_list(title: &str, prices: &[Price]) {
    println!("\n{title} ({} entries)", prices.len());
    for price in prices {
        println!(
            "   {}  {:>7.2} c/kWh  {:>5.1}%  {}",
            price.period, price.price_kwh, price.renewable_in_grid, price.color
        );
    }
}

fn print_auth(record: &AuthData) {
    let data = &record.data;
    println!("Auth");
    println!("----");
    println!("   Name:     {}", data.name);
    println!("   Email:    {}", data.email);
    println!("   Postcode: {}", data.postcode);
    println!("   Success:  {}", record.is_success());
    println!("   Tokens:   id {} bytes, refresh {} bytes", data.id_token.len(), data.refresh_token.len());
}

fn dump(store: &MmapSlotStore, key: &str) -> Result<(), Box<dyn Error>> {
    let Some(bytes) = store.load(key)? else {
        println!("slot '{key}' is empty");
        return Ok(());
    };

    println!("{key}: {} bytes", bytes.len());
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        println!("{:08x}  {:<47}  |{}|", row * 16, hex.join(" "), ascii);
    }
    Ok(())
}
