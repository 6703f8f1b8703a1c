use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rfid_tag_rs::rfid::HostCommand;
use rfid_tag_rs::logging::{init_logger_with_level, log_debug, log_error, log_warn};
use rfid_tag_rs::util::{decode_hex, describe_frame, format_hex_compact, pretty_hex};
use rfid_tag_rs::{
    build_read_command, build_write_command, init_logger, log_info, parse_frame,
    parse_read_response, parse_write_response_with, ReadOutcome, RfidReaderHandle, SerialConfig,
    TagRecord, WriteOutcome,
};

#[derive(Parser)]
#[command(name = "rfid-cli")]
#[command(about = "CLI tool for the filament spool RFID reader")]
struct Cli {
    /// Serial port of the reader module
    #[arg(short, long, global = true)]
    port: Option<String>,
    #[arg(short, long, global = true, default_value = "115200")]
    baudrate: u32,
    /// Response timeout in milliseconds
    #[arg(long, global = true, default_value = "1000")]
    timeout_ms: u64,
    /// Accept write acknowledgements that echo the read command code
    #[arg(long, global = true)]
    lenient_write_ack: bool,
    /// Log frame traffic at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the tag on one channel
    Read {
        #[arg(short, long)]
        channel: u8,
    },
    /// Write a JSON record to the tag on one channel
    Write {
        #[arg(short, long)]
        channel: u8,
        #[arg(short, long)]
        record: PathBuf,
    },
    /// Print the read command frame for a channel
    FrameRead {
        #[arg(allow_negative_numbers = true)]
        channel: i64,
    },
    /// Print the write command frame for a channel
    FrameWrite {
        #[arg(allow_negative_numbers = true)]
        channel: i64,
        #[arg(short, long)]
        record: PathBuf,
    },
    /// Decode a captured frame given as hex
    Decode {
        hex: String,
        /// Interpret the frame as a write acknowledgement
        #[arg(long)]
        write: bool,
    },
}

impl Cli {
    fn serial_config(&self) -> SerialConfig {
        SerialConfig {
            baudrate: self.baudrate,
            timeout: Duration::from_millis(self.timeout_ms),
            accept_read_echo_ack: self.lenient_write_ack,
        }
    }

    async fn open(&self) -> Result<RfidReaderHandle<tokio_serial::SerialStream>> {
        let Some(port) = self.port.as_deref() else {
            bail!("--port is required for this command");
        };
        RfidReaderHandle::connect_with_config(port, self.serial_config())
            .await
            .with_context(|| format!("failed to open {port}"))
    }
}

fn load_record(path: &Path) -> Result<TagRecord> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let record: TagRecord = serde_json::from_str(&text)
        .with_context(|| format!("invalid record in {}", path.display()))?;
    record.validate()?;
    Ok(record)
}

fn print_read_outcome(outcome: &ReadOutcome) -> Result<()> {
    match outcome {
        ReadOutcome::TagPresent {
            channel,
            record,
            surplus_bytes,
        } => {
            if *surplus_bytes > 0 {
                log_warn(&format!("ignored {surplus_bytes} byte(s) after the tag record"));
            }
            log_info(&format!(
                "channel {channel}: {} {} v{}",
                record.manufacturer,
                record.material,
                record.version_string()
            ));
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        other => println!("{other:?}"),
    }
    Ok(())
}

fn print_write_outcome(outcome: &WriteOutcome) {
    println!("{outcome:?}");
}

fn decode_captured(bytes: &[u8], write: bool, lenient: bool) -> Result<()> {
    // Try the frame as a host command first, then as a module response.
    let command_error = match HostCommand::decode(bytes) {
        Ok(HostCommand::Read { channel }) => {
            println!("Read {{ channel: {channel} }}");
            return Ok(());
        }
        Ok(HostCommand::Write { channel, record }) => {
            println!("Write {{ channel: {channel} }}");
            println!("{}", serde_json::to_string_pretty(&record)?);
            return Ok(());
        }
        Err(e) => e,
    };

    log_debug(&format!("\n{}", pretty_hex(bytes, 16)));
    decode_response(bytes, write, lenient).with_context(|| {
        format!("frame is neither a command ({command_error}) nor a valid response")
    })
}

fn decode_response(bytes: &[u8], write: bool, lenient: bool) -> Result<()> {
    let frame = parse_frame(bytes, true)?;
    log_info(&describe_frame(&frame));

    if write {
        print_write_outcome(&parse_write_response_with(bytes, lenient)?);
    } else {
        print_read_outcome(&parse_read_response(bytes)?)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        init_logger_with_level("debug");
    } else {
        init_logger();
    }

    match &cli.command {
        Commands::Read { channel } => {
            let mut handle = cli.open().await?;
            let outcome = handle.read_channel(*channel).await?;
            print_read_outcome(&outcome)?;
        }
        Commands::Write { channel, record } => {
            let record = load_record(record)?;
            let mut handle = cli.open().await?;
            let outcome = handle.write_channel(*channel, &record).await?;
            print_write_outcome(&outcome);
            if !matches!(outcome, WriteOutcome::WriteOk { .. }) {
                log_error(&format!("write on channel {channel} was not acknowledged"));
                bail!("write on channel {channel} failed: {outcome:?}");
            }
        }
        Commands::FrameRead { channel } => {
            println!("{}", format_hex_compact(&build_read_command(*channel)?));
        }
        Commands::FrameWrite { channel, record } => {
            let record = load_record(record)?;
            println!("{}", format_hex_compact(&build_write_command(*channel, &record)?));
        }
        Commands::Decode { hex, write } => {
            let bytes = decode_hex(hex)?;
            decode_captured(&bytes, *write, cli.lenient_write_ack)?;
        }
    }

    Ok(())
}
