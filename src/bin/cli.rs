use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use registrar::cli::create_admin;
use registrar::modules::users::model::CreateUserDto;
use registrar_config::DatabaseConfig;
use registrar_db::{init_db_pool, prepare_schema};

#[derive(Parser)]
#[command(name = "registrar-cli")]
#[command(about = "Registrar CLI - Administrative tools for Registrar", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Login (4 to 20 characters)
        #[arg(short = 'l', long)]
        login: Option<String>,

        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 's', long)]
        surname: Option<String>,

        #[arg(long)]
        lastname: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Apply database migrations
    Migrate {
        /// Drop every table first, overriding DATABASE_DROP_ON_START
        #[arg(long)]
        drop: bool,
    },
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::new().with_prompt(label).interact_text()?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&config).await?;

    match cli.command {
        Commands::CreateAdmin {
            login,
            name,
            surname,
            lastname,
            password,
        } => {
            let login = prompt(login, "Login")?;
            let name = prompt(name, "Name")?;
            let surname = prompt(surname, "Surname")?;
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()?,
            };

            let dto = CreateUserDto {
                login,
                password,
                name,
                surname,
                lastname,
            };

            match create_admin(&pool, dto).await {
                Ok(user) => {
                    println!("\n✅ Admin created successfully!");
                    println!("   Id: {}", user.id);
                    println!("   Login: {}", user.login);
                }
                Err(e) => {
                    eprintln!("\n❌ Error creating admin: {}", e.error);
                    std::process::exit(1);
                }
            }
        }
        Commands::Migrate { drop } => {
            prepare_schema(&pool, drop || config.drop_on_start).await?;
            println!("✅ Migrations applied");
        }
    }

    Ok(())
}
