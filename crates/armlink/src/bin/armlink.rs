//! CLI entrypoint for the arm control client.
//!
//! One-shot operator commands against the arm service. The interactive
//! control surface lives in the library (`armlink::ArmConsole`) behind a UI
//! binding; this binary covers scripted and diagnostic use.

#[path = "armlink/cli.rs"]
mod cli;

use clap::Parser;
use tracing::debug;

use armlink::api::{ArmService, HttpArmService};
use armlink::{ArmError, ClientConfig, JointId, LimitKind};

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ClientConfig::load_or_default(&cli.config)?;
    init_logging(config.log_level.as_str());
    debug!(base_url = %config.base_url, "configured");

    let service = HttpArmService::new(&config);
    match cli.command {
        Command::Status => status(&service),
        Command::Acquire { name } => {
            let name = name.unwrap_or_else(|| config.operator.to_string());
            match service.acquire_control(&name) {
                Ok(()) => {
                    println!("control granted to {name}");
                    Ok(())
                }
                Err(ArmError::ControlHeld { holder }) => {
                    println!("control denied: currently held by {holder}");
                    std::process::exit(1);
                }
                Err(err) => Err(err.into()),
            }
        }
        Command::Release => {
            service.release_control()?;
            println!("control released");
            Ok(())
        }
        Command::Move { joint, pos } => {
            let joint = JointId::parse(&joint)?;
            service.set_position(joint, pos)?;
            println!("{joint} -> {pos}");
            Ok(())
        }
        Command::Limit {
            joint,
            limit,
            value,
        } => {
            let joint = JointId::parse(&joint)?;
            let limit = LimitKind::parse(&limit)?;
            service.set_limit(joint, limit, value)?;
            println!("{joint}.{limit} -> {value}");
            Ok(())
        }
        Command::CameraUrl => {
            println!("{}", service.camera_url()?);
            Ok(())
        }
    }
}

fn status(service: &HttpArmService) -> anyhow::Result<()> {
    for joint in JointId::ALL {
        match service.joint_info(joint) {
            Ok(info) => {
                println!("{joint:<10} pos {:>4}  range {}..{}", info.pos, info.min, info.max);
            }
            Err(err) => println!("{joint:<10} unavailable ({err})"),
        }
    }
    Ok(())
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
