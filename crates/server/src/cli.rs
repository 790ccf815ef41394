use std::net::SocketAddr;
use std::path::PathBuf;

use adloc_server::ServerConfig;
use clap::Parser;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "adloc")]
#[command(about = "Serves platform searches over a location-prefix index")]
#[command(version)]
pub struct Cli {
	/// TOML configuration file
	#[arg(short, long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Address to listen on (default 127.0.0.1:8080)
	#[arg(long, value_name = "ADDR")]
	pub bind: Option<SocketAddr>,

	/// Directory relative load paths are resolved against
	#[arg(long, value_name = "DIR")]
	pub content_root: Option<PathBuf>,

	/// Index file to load before serving
	#[arg(long, value_name = "PATH")]
	pub index_file: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,
}

impl Cli {
	/// Applies flag overrides on top of `config`.
	pub fn apply(&self, mut config: ServerConfig) -> ServerConfig {
		if let Some(bind) = self.bind {
			config.bind = bind;
		}
		if let Some(root) = &self.content_root {
			config.content_root = root.clone();
		}
		if let Some(file) = &self.index_file {
			config.index_file = Some(file.clone());
		}
		config
	}
}
