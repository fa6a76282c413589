//! Integration tests for the MotorHUD firmware over SPP.
//!
//! Pair with the HUD first and bind the RFCOMM channel to a serial port.

mod device;
mod protocol;

use clap::Parser;
use colored::Colorize;

use device::{resolve_port, SppClient};
use tests::{print_results, run_all_tests};

#[derive(Parser)]
#[command(name = "integration-tests")]
#[command(about = "SPP integration tests for MotorHUD firmware")]
struct Args {
    /// RFCOMM serial port for the HUD (use "auto" to auto-detect)
    #[arg(short, long, default_value = "auto")]
    port: String,

    /// Baud rate (ignored by RFCOMM, kept for wired bridges)
    #[arg(short, long, default_value = "9600")]
    baud: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let port = resolve_port(&args.port)?;

    println!("{}", "MotorHUD SPP Integration Tests".bold());
    println!("Port: {}", port);
    println!("Baud: {}", args.baud);
    println!();

    println!("Connecting to device...");
    let mut device = SppClient::new(&port, args.baud)?;

    // Let the link settle, then drop anything the bridge sent on connect
    std::thread::sleep(std::time::Duration::from_secs(1));
    device.clear_buffer()?;
    println!("{}", "Connected!".green());

    println!("\nRunning tests...\n");

    let results = run_all_tests(&mut device);
    print_results(&results);

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
