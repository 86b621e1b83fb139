use std::sync::Arc;

use clap::{Parser, Subcommand};
use clientops_session::api::HttpIdentityClient;
use clientops_session::config::{load_config, print_schema};
use clientops_session::error::{NavigationError, SessionError};
use clientops_session::guard::decision::NEXT_PARAM;
use clientops_session::models::Location;
use clientops_session::navigation::Navigator;
use clientops_session::session::Session;
use clientops_session::store::create_token_store;
use clientops_session::utils::logger::init_logging;
use tracing::error;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}", .0.message())]
    Session(#[from] SessionError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

#[derive(Parser, Debug)]
#[command(
    name = "clientops",
    about = "ClientOps console session and route guard",
    arg_required_else_help = true
)]
struct Cli {
    /// Print the configuration JSON schema and exit.
    #[arg(long)]
    schema: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and follow the login route to `next`.
    Login {
        username: String,
        #[arg(env = "CLIENTOPS_PASSWORD", hide_env_values = true)]
        password: String,
        next: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the current user.
    Whoami,
    /// Run the route guard for a path.
    Navigate { path: String },
}

async fn run(command: Command, navigator: &Navigator) -> Result<(), CliError> {
    let session = navigator.session();
    match command {
        Command::Login {
            username,
            password,
            next,
        } => {
            let identity = session.login(&username, &password).await?;
            println!("Logged in as {} ({})", identity.username, identity.role);

            // Back through the login route so an authenticated visit forwards to `next`.
            let login = login_path(navigator, next.as_deref());
            let navigation = navigator.navigate(&login).await?;
            println!("{}", navigation.location);
        }
        Command::Logout => {
            session.logout().await;
            println!("Logged out");
        }
        Command::Whoami => match session.fetch_identity().await? {
            Some(identity) => println!(
                "{} (id {}, role {})",
                identity.username, identity.id, identity.role
            ),
            None => println!("Not logged in"),
        },
        Command::Navigate { path } => {
            let navigation = navigator.navigate(&path).await?;
            if navigation.was_redirected() {
                let hops: Vec<String> = navigation.trail.iter().map(Location::full_path).collect();
                println!("{}", hops.join(" -> "));
            } else {
                println!("{}", navigation.location);
            }
        }
    }
    Ok(())
}

fn login_path(navigator: &Navigator, next: Option<&str>) -> String {
    let login = Location::new(navigator.login_path());
    match next {
        Some(next) => login.with_query(NEXT_PARAM, next).full_path(),
        None => login.full_path(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = match cli.command {
        Some(command) if !cli.schema => command,
        _ => {
            print_schema();
            return;
        }
    };

    let config = load_config();
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let client = match HttpIdentityClient::new(&config.api) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create identity client: {}", e);
            std::process::exit(1);
        }
    };
    let store = create_token_store(&config.token_store);
    let session = Arc::new(Session::restore(store, client).await);
    let navigator = Navigator::new(&config.routes, session);

    if let Err(e) = run(command, &navigator).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
