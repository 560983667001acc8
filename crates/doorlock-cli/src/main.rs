//! `doorlock`: runs the access controller against simulated peripherals.
//!
//! # Usage
//!
//! ```bash
//! # Write a starting config file
//! doorlock --print-example-config > doorlock.toml
//!
//! # Keypad and sensors from stdin, host on a real UART
//! doorlock --config doorlock.toml
//!
//! # Everything simulated, override the port
//! doorlock --port /dev/ttyUSB0 --log-level debug
//! ```

mod config;
mod console;
mod port;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use doorlock_controller::AccessController;
use doorlock_hardware::{MockPeripherals, Peripherals};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, DEFAULT_BAUD_RATE, SerialConfig};
use crate::console::Command;
use crate::port::PortLink;

/// Door-lock access controller simulator
#[derive(Parser, Debug)]
#[command(name = "doorlock")]
#[command(version, about)]
struct Args {
    /// Path to config file
    #[arg(short, long, env = "DOORLOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Serial port of the host link, overrides the config file
    #[arg(short, long)]
    port: Option<PathBuf>,

    /// Baud rate used with --port
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    baudrate: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print an example config file and exit
    #[arg(long)]
    print_example_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_example_config {
        print!("{}", toml::to_string(&AppConfig::example())?);
        return Ok(());
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(port) = args.port {
        config.serial = Some(SerialConfig {
            port,
            baudrate: args.baudrate,
        });
    }

    let (mut peripherals, mock) = Peripherals::mock();
    let host_attached = match &config.serial {
        Some(serial) => {
            peripherals.serial = Box::new(PortLink::open(serial)?);
            info!(port = ?serial.port, "Host link on serial port");
            true
        }
        None => {
            info!("No serial port configured, host replies come from the console");
            false
        }
    };

    let mut controller = AccessController::new(config.controller.clone(), peripherals)
        .context("Failed to create access controller")?;
    controller.start();

    run(&mut controller, &mock, &config, host_attached).await
}

async fn run(
    controller: &mut AccessController,
    mock: &MockPeripherals,
    config: &AppConfig,
    host_attached: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut drawn_updates = 0;

    info!(tick_ms = config.tick_ms, "Controller running, type `quit` to exit");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                controller.tick(now_ms);

                for line in mock.serial.take_sent() {
                    println!("-> {line}");
                }
                let updates = mock.display.update_count();
                if updates != drawn_updates {
                    drawn_updates = updates;
                    println!("[{}]", mock.display.lines().join(" | "));
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read console")? {
                    Some(line) => {
                        if !apply(&line, controller, mock, host_attached) {
                            break;
                        }
                    }
                    None => {
                        debug!("Console closed");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    info!(lock_state = %controller.lock_state(), "Controller stopped");
    Ok(())
}

/// Apply one console line. Returns `false` when the loop should stop.
fn apply(
    line: &str,
    controller: &AccessController,
    mock: &MockPeripherals,
    host_attached: bool,
) -> bool {
    let command = match console::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(e) => {
            warn!(error = %e, "Ignoring console input");
            return true;
        }
    };

    let result = match command {
        Command::Keys(keys) => mock.keypad.type_keys(&keys),
        Command::Distance(Some(cm)) => mock.range_finder.set_distance(cm),
        Command::Distance(None) => {
            mock.range_finder.set_no_echo();
            Ok(())
        }
        Command::Door { closed } => {
            mock.door_sensor.set_closed(closed);
            Ok(())
        }
        Command::HostReply(reply) if host_attached => {
            warn!(reply = reply.as_str(), "Host replies come from the serial port");
            Ok(())
        }
        Command::HostReply(reply) => mock.serial.reply(&reply),
        Command::Status => {
            println!(
                "lock={} stage={} door={} distance={}",
                controller.lock_state(),
                controller.stage(),
                if mock.door_sensor.is_closed() { "closed" } else { "open" },
                mock.range_finder.reading(),
            );
            Ok(())
        }
        Command::Quit => return false,
    };

    if let Err(e) = result {
        warn!(error = %e, "Console command failed");
    }
    true
}
