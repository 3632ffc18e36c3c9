// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! mountpod - render JuiceFS mount pods and inspect the pods on a node.
//!
//! A thin front end over `mountpod-builder` and `mountpod-kubelet` for
//! operators debugging a node. It performs single actions only; the
//! reconciliation loop lives elsewhere.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use mountpod_builder::{MountPodBuilder, MountSetting};
use mountpod_config::{load_config, KubeletConfig};
use mountpod_kubelet::{KubeletClient, NodePodSource, PodList, TlsPolicy};

mod logging;

/// mountpod - JuiceFS mount pod tooling
#[derive(Parser, Debug)]
#[command(name = "mountpod", version, about, long_about = None)]
struct Args {
	/// Path to the agent configuration file
	#[arg(long, global = true, env = "MOUNTPOD_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the mount pod built for a mount setting as JSON
	Render {
		/// Mount setting file (TOML, or JSON when the extension is .json)
		#[arg(long)]
		setting: PathBuf,
	},
	/// List the pods a node's kubelet reports
	NodePods {
		/// Kubelet host, overriding configuration
		#[arg(long)]
		host: Option<String>,
		/// Kubelet port, overriding configuration
		#[arg(long)]
		port: Option<u16>,
		/// Skip kubelet certificate verification
		#[arg(long)]
		insecure: bool,
	},
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let config = tracing::subscriber::with_default(logging::bootstrap_subscriber(), || {
		load_config(args.config.as_deref())
	})
	.context("failed to load configuration")?;
	logging::init_tracing(&config.logging);
	debug!(?config, "configuration resolved");

	match args.command {
		Command::Render { setting } => {
			let setting = read_setting(&setting)?;
			let pod = MountPodBuilder::new(config.template).build(&setting);
			println!("{}", serde_json::to_string_pretty(&pod)?);
		}
		Command::NodePods {
			host,
			port,
			insecure,
		} => {
			let kubelet = apply_overrides(config.kubelet, host, port, insecure);
			let client = KubeletClient::new(&kubelet.host, kubelet.port, &kubelet.client)
				.context("failed to create kubelet client")?;
			let pods = list_node_pods(&client).await?;
			for line in format_pods(&pods) {
				println!("{line}");
			}
		}
	}

	Ok(())
}

async fn list_node_pods(source: &dyn NodePodSource) -> Result<PodList> {
	let pods = source
		.fetch_running_pods()
		.await
		.context("failed to fetch pods from kubelet")?;
	info!(count = pods.items.len(), "fetched node pods");
	Ok(pods)
}

fn read_setting(path: &Path) -> Result<MountSetting> {
	let content = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read mount setting {}", path.display()))?;
	let setting = if path.extension().is_some_and(|ext| ext == "json") {
		serde_json::from_str(&content)
			.with_context(|| format!("invalid mount setting {}", path.display()))?
	} else {
		toml::from_str(&content)
			.with_context(|| format!("invalid mount setting {}", path.display()))?
	};
	Ok(setting)
}

fn apply_overrides(
	mut kubelet: KubeletConfig,
	host: Option<String>,
	port: Option<u16>,
	insecure: bool,
) -> KubeletConfig {
	if let Some(host) = host {
		kubelet.host = host;
	}
	if let Some(port) = port {
		kubelet.port = port;
	}
	if insecure {
		kubelet.client.tls = TlsPolicy::InsecureSkipVerify;
	}
	kubelet
}

fn format_pods(pods: &PodList) -> Vec<String> {
	pods
		.items
		.iter()
		.map(|pod| {
			let namespace = pod.metadata.namespace.as_deref().unwrap_or("-");
			let name = pod.metadata.name.as_deref().unwrap_or("-");
			let phase = pod
				.status
				.as_ref()
				.and_then(|s| s.phase.as_deref())
				.unwrap_or("Unknown");
			format!("{namespace}/{name}\t{phase}")
		})
		.collect()
}
