use bevy::prelude::Resource;
use clap::Parser;

#[derive(Parser, Debug, Resource, Clone)]
#[command(name = "helm-sim")]
#[command(about = "Headless thruster-allocation flight harness", long_about = None)]
pub struct Args {
    /// Path to a TOML config file
    #[arg(long, default_value = "sim.toml")]
    pub config: String,
    /// Stop after this many ticks (0 = run until killed)
    #[arg(long, default_value_t = 0)]
    pub ticks: u64,
}
