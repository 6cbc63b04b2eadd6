//! Joystick Menu
//!
//! Drives a text menu from a digital joystick wired to the Raspberry Pi
//! GPIO header. The register block is mapped straight from physical
//! memory, so this normally runs as root (or against `/dev/gpiomem`).
//!
//! # Usage
//!
//! ```bash
//! # Run the built-in story
//! sudo joystick-menu run
//!
//! # Use the unprivileged GPIO device (its offset 0 is the GPIO block)
//! joystick-menu --device /dev/gpiomem --base 0 run
//!
//! # Print the current joystick levels once
//! sudo joystick-menu levels
//!
//! # Show the effective configuration
//! joystick-menu --config joystick.toml show-config
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{error, info};
use std::path::PathBuf;

use joystick_menu::hal::{Gpio, PeripheralRegion, PinId};
use joystick_menu::input::Sampler;
use joystick_menu::menu::{SelectionState, Session, SessionConfig, SessionOutcome};
use joystick_menu::render::TerminalPresenter;
use joystick_menu::AppConfig;

/// Joystick Menu
///
/// Text menu selection with a GPIO joystick
#[derive(Parser)]
#[command(name = "joystick-menu")]
#[command(version)]
#[command(about = "Text menu selection with a digital GPIO joystick")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Memory device to map (overrides config)
    #[arg(short, long, global = true)]
    device: Option<PathBuf>,

    /// Physical base address of the GPIO block, e.g. 0x3F200000
    #[arg(short, long, global = true, value_parser = parse_address)]
    base: Option<u64>,

    /// Delay between polls in milliseconds
    #[arg(short, long, global = true)]
    poll_ms: Option<u64>,

    /// Consecutive agreeing samples before a level is accepted
    #[arg(short, long, global = true)]
    threshold: Option<u8>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the menu until a choice is confirmed (default)
    Run {
        /// Give up after this many polls
        #[arg(long)]
        max_ticks: Option<u64>,
    },

    /// Print the current level of each joystick pin
    Levels,

    /// Print the effective configuration as TOML
    ShowConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Run { max_ticks: None }) {
        Commands::Run { max_ticks } => handle_run(&config, max_ticks),
        Commands::Levels => handle_levels(&config),
        Commands::ShowConfig => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(device) = &cli.device {
        config.gpio.device = device.clone();
    }
    if let Some(base) = cli.base {
        config.gpio.base = base;
    }
    if let Some(ms) = cli.poll_ms {
        config.sampler.poll_interval_ms = ms;
    }
    if let Some(threshold) = cli.threshold {
        config.sampler.debounce_threshold = threshold;
    }

    config.validate()?;
    Ok(config)
}

fn parse_address(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", s, e))
}

/// Map the registers and configure the joystick pins as inputs
fn open_gpio(config: &AppConfig) -> Result<Gpio> {
    let gpio_config = &config.gpio;
    let region = PeripheralRegion::acquire(&gpio_config.device, gpio_config.base, gpio_config.length)
        .map_err(|e| {
            error!("GPIO mapping failed: {}", e);
            e
        })
        .with_context(|| {
            format!(
                "cannot map GPIO registers at {:#x} through {}",
                gpio_config.base,
                gpio_config.device.display()
            )
        })?;

    let mut gpio = Gpio::new(region, gpio_config.pins)?;
    gpio.configure_inputs();
    info!(
        "joystick pins configured: x=GPIO{} y=GPIO{} button=GPIO{}",
        gpio.pins().number(PinId::AxisX),
        gpio.pins().number(PinId::AxisY),
        gpio.pins().number(PinId::Button)
    );
    Ok(gpio)
}

fn handle_run(config: &AppConfig, max_ticks: Option<u64>) -> Result<()> {
    let gpio = open_gpio(config)?;

    let story = &config.story;
    let state = SelectionState::new(story.choice_count())?;
    let session_config = SessionConfig {
        poll_interval: config.sampler.poll_interval(),
        max_ticks,
    };
    let sampler = Sampler::new(gpio, config.sampler.debounce_threshold);
    let mut session = Session::new(sampler, state, session_config);
    let mut presenter = TerminalPresenter::stdout(story);

    let outcome = session.run(&mut presenter);
    session.into_source().release();

    match outcome {
        SessionOutcome::Confirmed { index, .. } => {
            presenter.show_outcome(index);
            Ok(())
        }
        SessionOutcome::Abandoned { ticks, .. } => {
            bail!("no selection confirmed after {} polls", ticks)
        }
    }
}

fn handle_levels(config: &AppConfig) -> Result<()> {
    let gpio = open_gpio(config)?;

    println!("{}", "=".repeat(40));
    println!("{}", "Joystick Levels".cyan().bold());
    println!("{}", "=".repeat(40));
    for pin in PinId::ALL {
        let level = gpio.read_level(pin);
        let shown = if level.is_high() {
            level.to_string().green()
        } else {
            level.to_string().yellow()
        };
        println!(
            "  {:<8} GPIO{:<3} {}",
            pin.name(),
            gpio.pins().number(pin),
            shown
        );
    }
    println!("\n  GPLEV0: {:#010x}", gpio.level_word());
    println!("{}", "=".repeat(40));

    gpio.release();
    Ok(())
}
