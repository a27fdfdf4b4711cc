use clap::{Parser, Subcommand};

/// ordergate — order-processing backend services
#[derive(Parser)]
#[command(name = "ordergate", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API gateway (the single client-facing entry point)
    Gateway {
        /// Port to bind
        #[arg(short, long, env = "PORT", default_value = "8000")]
        port: u16,
    },

    /// Start the auth service (registration, login, token validation)
    Auth {
        #[arg(short, long, env = "PORT", default_value = "8001")]
        port: u16,
    },

    /// Start the customer service
    Customer {
        #[arg(short, long, env = "PORT", default_value = "8002")]
        port: u16,
    },

    /// Start the product service
    Product {
        #[arg(short, long, env = "PORT", default_value = "8003")]
        port: u16,
    },

    /// Start the sales service
    Sales {
        #[arg(short, long, env = "PORT", default_value = "8004")]
        port: u16,
    },

    /// Start the invoice service
    Invoice {
        #[arg(short, long, env = "PORT", default_value = "8005")]
        port: u16,
    },
}
