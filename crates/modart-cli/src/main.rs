use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use modart_cli::admin::create_admin;
use modart_cli::seeder::{self, SeedConfig};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "modart-cli")]
#[command(about = "Mod'Art CLI - Administrative tools for the Mod'Art API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Full name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake admins, students and events
    Seed {
        /// Number of students to create
        #[arg(short = 's', long, default_value = "50")]
        students: usize,

        /// Number of admins to create
        #[arg(long, default_value = "1")]
        admins: usize,

        /// Number of events to create
        #[arg(long, default_value = "10")]
        events: usize,
    },
    /// Clear all seeded data (keeps accounts outside the seed domain)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => fail("DATABASE_URL must be set"),
    };

    let pool = match modart_db::init_db_pool(&database_url, 5).await {
        Ok(pool) => pool,
        Err(e) => fail(&format!("Failed to connect to database: {}", e)),
    };

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Seed {
            students,
            admins,
            events,
        } => handle_seed(&pool, students, admins, events).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

fn fail(message: &str) -> ! {
    eprintln!("\n❌ {}", message);
    std::process::exit(1);
}

fn prompt(label: &str, value: Option<String>) -> String {
    match value {
        Some(value) => value,
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .unwrap_or_else(|e| fail(&format!("Failed to read {}: {}", label.to_lowercase(), e))),
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let name = prompt("Full name", name);
    let email = prompt("Email address", email);
    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| fail(&format!("Failed to read password: {}", e)))
    });

    match create_admin(pool, &name, &email, &password).await {
        Ok(id) => {
            println!("\n✅ Admin created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", email.trim().to_lowercase());
            println!("   Name: {}", name.trim());
        }
        Err(e) => fail(&format!("Error creating admin: {}", e)),
    }
}

async fn handle_seed(pool: &PgPool, students: usize, admins: usize, events: usize) {
    let config = SeedConfig::new(students)
        .with_admins(admins)
        .with_events(events);

    if let Err(e) = seeder::seed_all(pool, config).await {
        fail(&format!("Error seeding database: {}", e));
    }
}

async fn handle_clear_seed(pool: &PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        fail(&format!("Error clearing seeded data: {}", e));
    }
}
