//! `remo` - command line client for Nature Remo
//!
//! Cloud commands need an API token (`REMO_TOKEN` or `cloud.token` in the
//! configuration file). `local` commands talk to hubs directly.

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use remo_commander::{
    config::RemoConfig,
    logging::{init_logging, LogConfig},
    models::{Appliance, Device},
    polling::PollOutcome,
    AirConOverrides, CloudClient, DeviceDiscovery, IrSignal, LocalClient, Poller,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "remo")]
#[command(about = "Control Nature Remo devices from the command line")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, env = "REMO_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List appliances, devices or sensors
    List {
        #[command(subcommand)]
        what: Option<ListCommand>,

        /// Only appliances attached to this hub
        #[arg(long)]
        device_id: Option<String>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Control an air conditioner. Unset options keep their current value.
    Aircon {
        #[arg(short = 'a', long)]
        appliance: String,
        #[arg(short = 't', long)]
        temperature: Option<String>,
        #[arg(short = 'm', long)]
        mode: Option<String>,
        #[arg(short = 'v', long)]
        volume: Option<String>,
        #[arg(short = 'd', long)]
        direction: Option<String>,
        #[arg(long)]
        dirh: Option<String>,
        /// Button, e.g. `power-off`
        #[arg(long)]
        button: Option<String>,
    },

    /// Press a light button
    Light {
        #[arg(short = 'a', long)]
        appliance: String,
        #[arg(short = 'b', long)]
        button: String,
    },

    /// Press a TV button
    Tv {
        #[arg(short = 'a', long)]
        appliance: String,
        #[arg(short = 'b', long)]
        button: String,
    },

    /// Send a learned IR signal
    Ir {
        #[arg(short = 's', long)]
        signal: String,
    },

    /// Click a Sesame Bot
    SesameBot {
        #[arg(short = 'a', long)]
        appliance: String,
    },

    /// Talk to hubs on the local network
    Local {
        #[command(subcommand)]
        command: LocalCommand,
    },

    /// Poll appliances until interrupted
    Watch,
}

#[derive(Subcommand, Debug)]
enum ListCommand {
    /// Hubs registered to the account
    Device,
    /// Latest sensor readings per hub
    Sensor,
}

#[derive(Subcommand, Debug)]
enum LocalCommand {
    /// Discover hubs via mDNS
    List {
        /// Scan duration in seconds
        #[arg(short = 't', long)]
        timeout: Option<u64>,
    },

    /// Send raw IR timing data
    #[command(disable_help_flag = true)]
    Send {
        #[arg(short = 'h', long)]
        host: String,
        /// Mark/space durations in microseconds
        #[arg(short = 'd', long, num_args = 1.., value_delimiter = ',', required = true)]
        data: Vec<u32>,
        /// Carrier frequency in kHz
        #[arg(short = 'f', long, allow_negative_numbers = true)]
        freq: Option<i32>,
        #[arg(long, action = ArgAction::Help)]
        help: Option<bool>,
    },

    /// Show the last IR signal a hub captured
    #[command(disable_help_flag = true)]
    Get {
        #[arg(short = 'h', long)]
        host: String,
        #[arg(long, action = ArgAction::Help)]
        help: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = RemoConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(
        LogConfig::from_settings(&config.logging)
            .with_env_overrides()
            .verbose(cli.debug),
    )?;

    match cli.command {
        Command::List {
            what,
            device_id,
            json,
        } => {
            let cloud = CloudClient::new(&config.cloud)?;
            match what {
                None => list_appliances(&cloud, device_id.as_deref(), json).await?,
                Some(ListCommand::Device) => list_devices(&cloud, json).await?,
                Some(ListCommand::Sensor) => list_sensors(&cloud, json).await?,
            }
        }
        Command::Aircon {
            appliance,
            temperature,
            mode,
            volume,
            direction,
            dirh,
            button,
        } => {
            let overrides = AirConOverrides {
                temperature,
                operation_mode: mode,
                air_volume: volume,
                air_direction: direction,
                air_direction_h: dirh,
                button,
            };
            let cloud = CloudClient::new(&config.cloud)?;
            let sent = cloud.apply_aircon_overrides(&appliance, &overrides).await?;
            println!("Air conditioner settings updated");
            println!("{}", serde_json::to_string_pretty(&sent)?);
        }
        Command::Light { appliance, button } => {
            CloudClient::new(&config.cloud)?
                .send_light_button(&appliance, &button)
                .await?;
            println!("Light button '{button}' sent");
        }
        Command::Tv { appliance, button } => {
            CloudClient::new(&config.cloud)?
                .send_tv_button(&appliance, &button)
                .await?;
            println!("TV button '{button}' sent");
        }
        Command::Ir { signal } => {
            CloudClient::new(&config.cloud)?.send_signal(&signal).await?;
            println!("Signal {signal} sent");
        }
        Command::SesameBot { appliance } => {
            CloudClient::new(&config.cloud)?
                .click_sesame_bot(&appliance)
                .await?;
            println!("Sesame Bot clicked");
        }
        Command::Local { command } => run_local(&config, command).await?,
        Command::Watch => watch(&config).await?,
    }

    Ok(())
}

async fn list_appliances(
    cloud: &CloudClient,
    device_id: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let appliances = match device_id {
        Some(id) => cloud.appliances_for_device(id).await?,
        None => cloud.appliances().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&appliances)?);
        return Ok(());
    }

    for appliance in &appliances {
        print_appliance(appliance);
    }
    Ok(())
}

fn print_appliance(appliance: &Appliance) {
    println!(
        "{} [{}] {}",
        appliance.id,
        appliance.appliance_type(),
        appliance.display_name()
    );
    if let Some(settings) = &appliance.settings {
        let s = settings.to_settings();
        println!(
            "    temp={} mode={} vol={} dir={} dirh={} button={}",
            s.temperature,
            s.operation_mode,
            s.air_volume,
            s.air_direction,
            s.air_direction_h,
            s.button
        );
    }
    for button in appliance.buttons() {
        println!("    button: {}", button.name);
    }
    for signal in &appliance.signals {
        println!("    signal: {} {}", signal.id, signal.name);
    }
}

async fn list_devices(cloud: &CloudClient, json: bool) -> anyhow::Result<()> {
    let devices = cloud.devices().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    for device in &devices {
        println!(
            "{} [{}] {} online={} firmware={}",
            device.id,
            device.device_type(),
            device.name,
            device.online_status(),
            device.firmware_version.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn list_sensors(cloud: &CloudClient, json: bool) -> anyhow::Result<()> {
    let devices = cloud.devices().await?;
    if json {
        let readings: Vec<_> = devices
            .iter()
            .map(|d| serde_json::json!({ "device": d.id, "readings": d.sensor_readings() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&readings)?);
        return Ok(());
    }

    for device in &devices {
        print_sensors(device);
    }
    Ok(())
}

fn print_sensors(device: &Device) {
    println!("{} ({})", device.name, device.id);
    for reading in device.sensor_readings() {
        println!("    {}: {}{}", reading.label(), reading.value, reading.unit);
    }
}

async fn run_local(config: &RemoConfig, command: LocalCommand) -> anyhow::Result<()> {
    match command {
        LocalCommand::List { timeout } => {
            let scan = timeout
                .map(Duration::from_secs)
                .unwrap_or(config.discovery.scan_duration);
            let cancel = CancellationToken::new();
            let discovery = DeviceDiscovery::new(&config.discovery);

            // ctrl-c ends the scan early but keeps what already resolved
            let interrupt = tokio::spawn({
                let cancel = cancel.clone();
                async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        cancel.cancel();
                    }
                }
            });
            let devices = discovery.discover(scan, &cancel).await;
            interrupt.abort();
            let devices = devices?;

            if devices.is_empty() {
                println!("No devices found");
            }
            for device in &devices {
                println!(
                    "{} host={} ip={} port={}",
                    device.name, device.host, device.ip_address, device.port
                );
            }
        }
        LocalCommand::Send {
            host, data, freq, ..
        } => {
            let signal = IrSignal::new(freq.unwrap_or(config.local.default_frequency_khz), data);
            let report = LocalClient::new(&config.local)?.send(&host, &signal).await?;
            for warning in &report.warnings {
                eprintln!("warning: {warning}");
            }
            println!("Signal sent to {host}");
        }
        LocalCommand::Get { host, .. } => {
            let signal = LocalClient::new(&config.local)?.receive(&host).await?;
            println!("{}", serde_json::to_string_pretty(&signal)?);
        }
    }
    Ok(())
}

async fn watch(config: &RemoConfig) -> anyhow::Result<()> {
    let cloud = CloudClient::new(&config.cloud)?;
    let poller = Arc::new(Poller::new(config.polling.interval));
    let cancel = CancellationToken::new();

    info!("Polling appliances every {:?}", poller.interval());

    // first refresh right away, the poller takes over after one interval
    match poller.tick(|| cloud.appliances()).await {
        PollOutcome::Completed(appliances) => appliances.iter().for_each(print_appliance),
        PollOutcome::Failed(e) => warn!("Initial refresh failed: {e}"),
        PollOutcome::Skipped | PollOutcome::Cancelled => {}
    }

    let runner = tokio::spawn(Arc::clone(&poller).run(cancel.clone(), move || {
        let cloud = cloud.clone();
        async move {
            let appliances = cloud.appliances().await?;
            appliances.iter().for_each(print_appliance);
            Ok(())
        }
    }));

    tokio::signal::ctrl_c().await?;
    cancel.cancel();
    runner.await?;

    let stats = poller.stats();
    info!(
        "Stopped after {} polls ({} failed, {} skipped)",
        stats.completed + stats.failed,
        stats.failed,
        stats.skipped
    );
    Ok(())
}
