//! Binary entry point: logging/config bootstrap and subcommand dispatch.

mod cli;
mod error_fmt;
mod replay;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use clap::Parser;
use eyre::{Result, WrapErr};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use weigh_core::mocks::scale_advertisement;
use weigh_core::{SessionUpdate, StabilizerCfg, WeighSession, decoder};

fn main() {
    let code = match run() {
        Ok(()) => 0,
        Err(err) => {
            if JSON_MODE.get().copied().unwrap_or(false) {
                println!("{}", error_fmt::format_error_json(&err));
            } else {
                eprintln!("{}", error_fmt::humanize(&err));
            }
            error_fmt::exit_code_for_error(&err)
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    let _ = JSON_MODE.set(args.json);

    let config = load_config(&args.config)?;
    init_logging(&args, &config.logging)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::Relaxed);
        })
        .wrap_err("failed to install Ctrl-C handler")?;
    }

    match args.cmd {
        Commands::Replay {
            capture,
            settle_limit,
            stats,
        } => {
            let stabilizer: StabilizerCfg = (&config.stabilizer).into();
            let outcome =
                replay::replay_capture(&capture, stabilizer, settle_limit, args.json, &shutdown)?;
            if stats {
                replay::print_counters(&outcome.counters, args.json);
            }
            tracing::info!(records = outcome.records.len(), "replay done");
            Ok(())
        }
        Commands::Decode { blob, local_name } => decode_blob(&blob, local_name.as_deref(), args.json),
        Commands::SelfCheck => self_check(&config, args.json),
    }
}

/// Read and validate the TOML config; a missing file means stock defaults.
fn load_config(path: &Path) -> Result<weigh_config::Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(weigh_config::Config::default());
    }
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let config = toml::from_str::<weigh_config::Config>(&text)
        .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn init_logging(args: &Cli, logging: &weigh_config::Logging) -> Result<()> {
    let level = logging.level.as_deref().unwrap_or(&args.log_level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_owned()));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    if args.json {
        layers.push(fmt::layer().json().with_writer(std::io::stderr).boxed());
    } else {
        layers.push(fmt::layer().with_writer(std::io::stderr).boxed());
    }

    if let Some(file) = logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file must name a file"))?;
        let rotation = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::Rotation::DAILY,
            Some("hourly") => tracing_appender::rolling::Rotation::HOURLY,
            _ => tracing_appender::rolling::Rotation::NEVER,
        };
        let appender = tracing_appender::rolling::RollingFileAppender::new(
            rotation,
            dir.unwrap_or_else(|| Path::new(".")),
            name,
        );
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(layers).with(filter).init();
    Ok(())
}

/// Decode one manufacturer blob from the command line, for field debugging.
fn decode_blob(hex: &str, local_name: Option<&str>, json: bool) -> Result<()> {
    let blob = replay::decode_hex(hex)?;
    let parsed = decoder::parse_company_id_and_payload(&blob);
    let payload = parsed.map(|(_, payload)| payload);
    let candidate = decoder::is_candidate(local_name, payload);
    let weight = parsed.and_then(|(cid, payload)| decoder::decode_weight(cid, payload));

    if json {
        println!(
            "{}",
            serde_json::json!({
                "candidate": candidate,
                "company_id": parsed.map(|(cid, _)| cid),
                "weight_lbs": weight,
            })
        );
    } else if let Some(weight) = weight {
        println!("candidate scale advertisement, weight {weight:.1} lbs");
    } else if candidate {
        println!("candidate device, but no decodable weight in this frame");
    } else {
        println!("not a scale advertisement");
    }
    Ok(())
}

/// Push a synthetic steady burst through the full pipeline and require a
/// settlement under the active configuration.
fn self_check(config: &weigh_config::Config, json: bool) -> Result<()> {
    let stabilizer: StabilizerCfg = (&config.stabilizer).into();
    let mut session = WeighSession::new(stabilizer)?;
    let epoch = Instant::now();

    let mut settled = None;
    for i in 0..40u64 {
        let now = epoch + Duration::from_millis(i * 200);
        if let SessionUpdate::Recorded(weigh_in) =
            session.handle_at(&scale_advertisement(180.0), now)
        {
            settled = Some(weigh_in.weight_lbs);
            break;
        }
    }
    let Some(weight) = settled else {
        eyre::bail!("self-check failed: steady synthetic burst never settled");
    };

    if json {
        println!(
            "{}",
            serde_json::json!({ "event": "self_check", "ok": true, "weight_lbs": weight })
        );
    } else {
        println!("self-check ok: settled {weight:.1} lbs");
    }
    Ok(())
}
