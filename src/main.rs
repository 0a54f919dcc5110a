// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;

use veni_vici::{
    draw, BanList, BreedCatalog, CatApiClient, Config, DrawOutcome, DrawPolicy,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "draw" {
        // Headless one-shot mode
        run_draw(&args[2..])?;
    } else {
        // UI mode (default)
        run_ui_mode()?;
    }

    Ok(())
}

/// Fetch the breed catalog once. A failure here is terminal for the
/// session: it is reported, and the returned catalog stays empty so
/// discovery remains disabled (no retry).
fn load_catalog(client: &CatApiClient) -> BreedCatalog {
    println!("📚 Loading breed catalog...");
    match client.list_breeds() {
        Ok(breeds) => {
            let catalog = BreedCatalog::from_breeds(&breeds);
            println!("✓ {} breeds loaded", catalog.len());
            catalog
        }
        Err(err) => {
            eprintln!("⚠️  Failed to load breeds: {:#}", err);
            eprintln!("   Discovery will stay disabled for this session.");
            BreedCatalog::empty()
        }
    }
}

fn run_draw(args: &[String]) -> Result<()> {
    println!("🐱 Veni Vici - one-shot draw");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Ban tokens from the command line: draw --ban Persian --ban "3 - 5"
    let mut ban_list = BanList::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--ban" {
            match iter.next() {
                Some(token) => ban_list.toggle(token),
                None => anyhow::bail!("--ban requires a token"),
            }
        } else {
            anyhow::bail!("Unknown argument: {}", arg);
        }
    }

    let config = Config::load()?;
    let client = CatApiClient::new(&config)?;
    let catalog = load_catalog(&client);

    if !ban_list.is_empty() {
        println!("🚫 Ban list: {}", ban_list.tokens().join(", "));
    }

    let policy = DrawPolicy::from_config(&config);
    match draw(&client, &catalog, &ban_list, &policy, &mut rand::thread_rng()) {
        DrawOutcome::Accepted(record) => {
            println!("\n🎉 Found a cat!");
            println!("   Breed:    {}", record.breed);
            println!("   Origin:   {}", record.origin);
            println!("   Lifespan: {} years", record.lifespan);
            println!("   Weight:   {} kg", record.weight);
            println!("   Image:    {}", record.image_url);
        }
        DrawOutcome::NotReady => {
            eprintln!("\n❌ Breed catalog is empty - nothing to draw from.");
            std::process::exit(1);
        }
        DrawOutcome::Exhausted { attempts } => {
            eprintln!(
                "\n❌ No eligible cat found after {} attempts. The ban list may be too broad.",
                attempts
            );
            std::process::exit(1);
        }
        DrawOutcome::Failed { attempts, source } => {
            eprintln!(
                "\n❌ Draw failed after {} attempts: {:#}",
                attempts, source
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    use veni_vici::AppState;

    println!("🖥️  Loading Veni Vici...\n");

    let config = Config::load()?;
    if config.api_key.is_none() {
        println!("ℹ️  No API key configured (CAT_API_KEY) - using the public rate limit.");
    }

    let client = CatApiClient::new(&config)?;
    let catalog = load_catalog(&client);

    println!("Starting UI... (Press 'q' to quit)\n");

    let state = AppState::new(catalog);
    let policy = DrawPolicy::from_config(&config);
    let mut app = ui::App::new(state, policy);
    ui::run_ui(&mut app, &client)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the one-shot mode: veni-vici draw");
    std::process::exit(1);
}
