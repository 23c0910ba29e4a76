pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "carshop-api")]
#[command(about = "Car shop API - cars, customers and users behind a session gate")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default when no command is given)")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides PORT")]
        port: Option<u16>,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,

    #[command(about = "Create a user with the same validation and hashing as POST /users")]
    CreateUser {
        #[arg(long)]
        fullname: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "CARSHOP_USER_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, help = "Grant administrator rights")]
        admin: bool,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            commands::serve::handle(config).await
        }
        Commands::Migrate => commands::migrate::handle(config).await,
        Commands::CreateUser {
            fullname,
            username,
            email,
            password,
            admin,
        } => {
            let body = serde_json::json!({
                "fullname": fullname,
                "username": username,
                "email": email,
                "password": password,
                "is_admin": admin,
            });
            commands::user::handle(config, body).await
        }
    }
}
