use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use eventsphere_core::{Catalog, EventRecord, QueryParams, SphereError};
use eventsphere_session::account::SignupOutcome;
use eventsphere_session::checkout::SimulatedGateway;
use eventsphere_session::config::AppConfig;
use eventsphere_session::forms::{LoginForm, SignupForm};
use eventsphere_session::observability::logging::init_logging;
use eventsphere_session::store::JsonFileStore;
use eventsphere_session::Session;

#[derive(Parser)]
#[command(name = "eventsphere")]
#[command(about = "Event discovery catalog with favorites, cart, and simulated checkout")]
#[command(version = "0.1.0")]
struct Cli {
    /// Session storage file (overrides config.toml)
    #[arg(long)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog with optional filters
    Events {
        /// Free-text search over name, venue, location, description, and tags
        #[arg(long, default_value = "")]
        search: String,
        /// Category name, or "All"
        #[arg(long, default_value = "All")]
        category: String,
        /// Price bucket: all, free, under50, 50to100, over100
        #[arg(long, default_value = "all")]
        price: String,
        /// Sort key: date, name, price, popularity
        #[arg(long, default_value = "date")]
        sort: String,
    },
    /// Show full details for one event
    Show { id: u32 },
    /// List the catalog's categories
    Categories,
    /// Manage the favorites list
    Favorites {
        #[command(subcommand)]
        action: FavoritesCmd,
    },
    /// Manage the ticket cart
    Cart {
        #[command(subcommand)]
        action: CartCmd,
    },
    /// Pay for the cart through the simulated gateway
    Checkout,
    /// Sign in (simulated)
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account (simulated)
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        city: String,
        /// Accept the terms of service
        #[arg(long)]
        agree_terms: bool,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand)]
enum FavoritesCmd {
    List,
    Add { id: u32 },
    Remove { id: u32 },
    Clear,
}

#[derive(Subcommand)]
enum CartCmd {
    List,
    Add { id: u32 },
    Remove { id: u32 },
    /// Adjust a line quantity by a signed delta
    Qty { id: u32, delta: i64 },
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();
    init_logging();

    let mut config = AppConfig::load_or_default();
    if let Some(path) = &cli.storage {
        config.storage.path = path.display().to_string();
    }

    let store = Arc::new(JsonFileStore::open(&config.storage.path)?);
    let catalog = Catalog::builtin()?;
    let session = Session::new(catalog, store, &config);

    match cli.command {
        Commands::Events {
            search,
            category,
            price,
            sort,
        } => {
            let params = QueryParams {
                search,
                category,
                price_bucket: price.parse()?,
                sort_key: sort.parse()?,
            };
            let view = session.query(&params);
            for &event in &view {
                print_event_line(&session, event)?;
            }
            println!("{} events found", view.len());
        }
        Commands::Show { id } => {
            let event = session.catalog().get_by_id(id)?;
            print_event_detail(event);
        }
        Commands::Categories => {
            for category in session.catalog().categories() {
                println!("{category}");
            }
        }
        Commands::Favorites { action } => match action {
            FavoritesCmd::List => {
                for event in session.favorites().all()? {
                    print_event_line(&session, &event)?;
                }
                println!("{} favorites", session.favorites().total_count()?);
            }
            FavoritesCmd::Add { id } => {
                let event = session.catalog().get_by_id(id)?.clone();
                if session.favorites().add(&event)? {
                    println!("✅ Added '{}' to favorites", event.name);
                } else {
                    println!("'{}' is already in your favorites", event.name);
                }
            }
            FavoritesCmd::Remove { id } => {
                if session.favorites().remove(id)? {
                    println!("✅ Removed event {id} from favorites");
                } else {
                    println!("Event {id} was not in your favorites");
                }
            }
            FavoritesCmd::Clear => {
                session.favorites().clear()?;
                println!("✅ Favorites cleared");
            }
        },
        Commands::Cart { action } => match action {
            CartCmd::List => print_cart(&session)?,
            CartCmd::Add { id } => {
                let event = session.catalog().get_by_id(id)?.clone();
                match session.cart().add(&event) {
                    Ok(()) => println!("✅ Added '{}' to cart", event.name),
                    Err(SphereError::AlreadyInCart(_)) => println!(
                        "'{}' is already in your cart; adjust its quantity instead",
                        event.name
                    ),
                    Err(err) => return Err(err.into()),
                }
            }
            CartCmd::Remove { id } => {
                if session.cart().remove(id)? {
                    println!("✅ Removed event {id} from cart");
                } else {
                    println!("Event {id} was not in your cart");
                }
            }
            CartCmd::Qty { id, delta } => {
                let quantity = session.cart().adjust_quantity(id, delta)?;
                println!("Quantity for event {id} is now {quantity}");
            }
            CartCmd::Clear => {
                session.cart().clear()?;
                println!("✅ Cart cleared");
            }
        },
        Commands::Checkout => {
            if session.cart().total_items()? == 0 {
                println!("Your cart is empty");
                return Ok(());
            }
            let gateway = SimulatedGateway::new(Duration::from_millis(
                config.simulation.checkout_delay_ms,
            ));
            println!("Processing checkout...");
            let receipt = session.cart().checkout(&gateway).await?;
            println!(
                "✅ Checkout successful: {} tickets for ${:.2} (confirmation {})",
                receipt.item_count, receipt.total, receipt.confirmation
            );
        }
        Commands::Login { email, password } => {
            let form = LoginForm { email, password };
            let errors = form.validate();
            if !errors.is_empty() {
                print_validation_errors(&errors);
                return Ok(());
            }
            let profile = session.account().login(&form).await?;
            println!("✅ Welcome back, {} <{}>", profile.name, profile.email);
        }
        Commands::Signup {
            first_name,
            last_name,
            email,
            phone,
            password,
            city,
            agree_terms,
        } => {
            let form = SignupForm {
                first_name,
                last_name,
                email,
                phone,
                confirm_password: password.clone(),
                password,
                city,
                agree_terms,
            };
            match session.account().signup(&form).await? {
                SignupOutcome::Registered(profile) => {
                    println!("✅ Welcome, {} <{}>", profile.name, profile.email)
                }
                SignupOutcome::Rejected(errors) => print_validation_errors(&errors),
            }
        }
        Commands::Logout => {
            session.account().logout()?;
            println!("✅ Signed out");
        }
        Commands::Whoami => match session.account().current()? {
            Some(profile) => println!("{} <{}>", profile.name, profile.email),
            None => println!("Not signed in"),
        },
    }

    Ok(())
}

fn print_validation_errors(errors: &eventsphere_session::forms::ValidationErrors) {
    println!("Please fix the following and resubmit:");
    for (field, message) in errors.iter() {
        println!("  {field}: {message}");
    }
}

fn print_event_line(session: &Session, event: &EventRecord) -> anyhow::Result<()> {
    let mut badges = String::new();
    if session.favorites().contains(event.id)? {
        badges.push_str(" ♥");
    }
    if session.cart().contains(event.id)? {
        badges.push_str(" 🛒");
    }
    println!(
        "{:>3}. {} — {} {} @ {} ({}) {} [{}% full]{}",
        event.id,
        event.name,
        event.date,
        event.time,
        event.venue,
        event.category,
        event.price,
        event.percent_full(),
        badges
    );
    Ok(())
}

fn print_event_detail(event: &EventRecord) {
    println!("{} ({})", event.name, event.category);
    println!("{} {} @ {}, {}", event.date, event.time, event.venue, event.location);
    println!("Organized by {} — {}", event.organizer, event.price);
    println!();
    println!("{}", event.full_description);
    println!();
    println!(
        "{} of {} registered ({} spots left)",
        event.registered_count,
        event.capacity,
        event.spots_remaining()
    );
    if let Some(rating) = event.rating {
        println!("Rated {:.1}/5 across {} reviews", rating, event.reviews.len());
    }
    if !event.tags.is_empty() {
        println!("Tags: {}", event.tags.join(", "));
    }
}

fn print_cart(session: &Session) -> anyhow::Result<()> {
    let entries = session.cart().entries()?;
    if entries.is_empty() {
        println!("Your cart is empty");
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{:>3}. {} x{} — ${:.2}",
            entry.event.id,
            entry.event.name,
            entry.quantity,
            entry.line_total()
        );
    }
    let summary = session.cart().summary()?;
    println!();
    println!("Subtotal ({} items): ${:.2}", summary.item_count, summary.subtotal);
    println!("Service fee:          ${:.2}", summary.service_fee);
    println!("Processing fee:       ${:.2}", summary.processing_fee);
    println!("Total:                ${:.2}", summary.total);
    Ok(())
}
