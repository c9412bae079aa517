use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use log::info;
use topdeck::{
    clients::errors::Result,
    config::ConfigBuilder,
    dashboard::Dashboard,
    proxy,
};

#[derive(Parser)]
#[command(name = "topdeck")]
#[command(version, about = "Proxy Spotify top tracks and render them with a fallback", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the top tracks HTTP proxy
    Serve {
        /// Listen address, overrides TOPDECK_BIND_ADDR
        #[arg(long)]
        bind: Option<SocketAddr>,
        /// Spotify Web API root, overrides TOPDECK_API_BASE_URL
        #[arg(long)]
        api_base_url: Option<String>,
    },
    /// Fetch the song list from a running proxy and print it
    Dashboard {
        /// Proxy endpoint to fetch from
        #[arg(long, default_value = "http://127.0.0.1:3000/api/spotify/top-tracks")]
        endpoint: String,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, api_base_url } => serve(bind, api_base_url).await?,
        Commands::Dashboard { endpoint } => show_dashboard(endpoint).await,
    }
    Ok(())
}

async fn serve(bind: Option<SocketAddr>, api_base_url: Option<String>) -> Result<()> {
    info!("Building config ...");
    let mut builder = ConfigBuilder::new();
    if let Some(addr) = bind {
        builder = builder.bind_addr(addr);
    }
    if let Some(url) = api_base_url {
        builder = builder.api_base_url(url);
    }
    let config = builder.build()?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        "Serving top tracks on http://{}{}",
        listener.local_addr()?,
        proxy::TOP_TRACKS_PATH
    );
    proxy::serve(listener, config.spotify).await
}

async fn show_dashboard(endpoint: String) {
    let mut dashboard = Dashboard::new(endpoint);
    dashboard.refresh().await;
    info!("Song list source: {:?}", dashboard.source());
    print!("{}", dashboard.render());
}
