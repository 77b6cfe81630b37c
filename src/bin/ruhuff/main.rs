use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use console::style;
use indicatif::HumanBytes;
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ruhuff::decoding::{decompress as decompress_frame, inspect, FrameDecoder};
use ruhuff::encoding::FrameCompressor;

mod progress;
use progress::{fmt_ratio, ProgressMonitor};

/// Extension appended to compressed files
const EXTENSION: &str = "rhf";

#[derive(Parser)]
#[command(version, about = "Compress and decompress files with Huffman coding", long_about = None)]
struct Cli {
    /// Log more details, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a frame
    Compress {
        input: PathBuf,
        /// Defaults to the input path with `.rhf` appended
        output: Option<PathBuf>,
        /// Don't append a content checksum
        #[arg(long)]
        no_checksum: bool,
        /// Overwrite the output if it exists
        #[arg(short, long)]
        force: bool,
    },
    /// Decompress a frame
    Decompress {
        input: PathBuf,
        /// Defaults to the input path without `.rhf`, or with `.out` appended
        output: Option<PathBuf>,
        /// Overwrite the output if it exists
        #[arg(short, long)]
        force: bool,
    },
    /// Print the header and code table of a frame
    Info { input: PathBuf },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compress {
            input,
            output,
            no_checksum,
            force,
        } => {
            let output = output.unwrap_or_else(|| with_extension_appended(&input, EXTENSION));
            compress(&input, &output, !no_checksum, force)
        }
        Commands::Decompress {
            input,
            output,
            force,
        } => {
            let output = output.unwrap_or_else(|| decompressed_path(&input));
            decompress(&input, &output, force)
        }
        Commands::Info { input } => print_info(&input),
    }
}

/// Summaries are logged at INFO, so that is the quietest level
fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn init_logging(verbosity: u8) {
    let level = level_filter(verbosity);
    // log lines go through the indicatif layer so they don't tear progress bars
    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .with(level)
        .init();
}

fn compress(input: &Path, output: &Path, checksum: bool, force: bool) -> color_eyre::Result<()> {
    let data = read_input(input, "compressing")?;
    if data.is_empty() {
        bail!("{} is empty, there is nothing to compress", input.display());
    }

    let compressor = FrameCompressor::new().with_checksum(checksum);
    if checksum && !compressor.checksum() {
        debug!("built without the hash feature, no checksum will be written");
    }
    let frame = compressor
        .compress(&data)
        .wrap_err_with(|| format!("failed to compress {}", input.display()))?;
    write_output(output, &frame, force)?;

    info!(
        "{} -> {}: {}",
        input.display(),
        output.display(),
        size_summary(data.len() as u64, frame.len() as u64)
    );
    Ok(())
}

fn decompress(input: &Path, output: &Path, force: bool) -> color_eyre::Result<()> {
    let frame = read_input(input, "decompressing")?;
    let decoder = FrameDecoder::new(&frame)
        .wrap_err_with(|| format!("{} is not a valid frame", input.display()))?;
    debug!(
        "{} symbols, {} payload bytes, checksum: {:?}",
        decoder.header().symbol_count(),
        decoder.payload_size(),
        decoder.stored_checksum()
    );
    let data = decoder
        .decode()
        .wrap_err_with(|| format!("failed to decode {}", input.display()))?;
    write_output(output, &data, force)?;

    info!(
        "{} -> {}: {} decoded",
        input.display(),
        output.display(),
        HumanBytes(data.len() as u64)
    );
    Ok(())
}

fn print_info(input: &Path) -> color_eyre::Result<()> {
    let frame = read_input(input, "reading")?;
    let info = inspect(&frame)
        .wrap_err_with(|| format!("{} is not a valid frame", input.display()))?;
    let header = &info.header;

    println!("{}", style(input.display()).bold());
    println!("  format version:   {}", header.version);
    println!("  symbols:          {}", header.symbol_count());
    println!("  content size:     {}", header.content_size());
    println!("  payload size:     {}", info.payload_size);
    match info.checksum {
        Some(checksum) => println!("  content checksum: 0x{checksum:08X}"),
        None => println!("  content checksum: none"),
    }
    println!(
        "  frame size:       {} ({} of content)",
        frame.len(),
        fmt_ratio(header.content_size(), frame.len() as u64)
    );
    // the payload has to be decoded to know how often each code is used
    match decompress_frame(&frame) {
        Ok(data) => match info.codes.encoded_bits(&data) {
            Some(bits) => println!(
                "  payload bits:     {} ({})",
                bits,
                fmt_bits_per_symbol(bits, data.len() as u64)
            ),
            None => println!("  payload bits:     {}", style("table misses symbols").red()),
        },
        Err(err) => println!("  payload bits:     {}", style(err).red()),
    }

    println!();
    println!("{}", style("symbol  len  code").bold());
    for (symbol, code) in info.codes.iter() {
        println!(
            "{:<6}  {:>3}  {}",
            display_symbol(symbol),
            code.len(),
            style(code).dim()
        );
    }
    Ok(())
}

fn size_summary(original: u64, compressed: u64) -> String {
    format!(
        "{} -> {} ({})",
        HumanBytes(original),
        HumanBytes(compressed),
        fmt_ratio(original, compressed)
    )
}

fn fmt_bits_per_symbol(bits: u64, symbols: u64) -> String {
    if symbols == 0 {
        return "-".to_string();
    }
    format!("{:.3} bits/symbol", bits as f64 / symbols as f64)
}

fn display_symbol(symbol: u8) -> String {
    if symbol.is_ascii_graphic() {
        format!("'{}'", symbol as char)
    } else {
        format!("0x{symbol:02X}")
    }
}

fn read_input(path: &Path, label: &'static str) -> color_eyre::Result<Vec<u8>> {
    let file =
        File::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    let mut monitor = ProgressMonitor::new(BufReader::new(file), size, label);

    let mut data = Vec::with_capacity(size as usize);
    monitor
        .read_to_end(&mut data)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    Ok(data)
}

fn write_output(path: &Path, data: &[u8], force: bool) -> color_eyre::Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }
    let mut file =
        File::create(path).wrap_err_with(|| format!("failed to create {}", path.display()))?;
    file.write_all(data)
        .and_then(|_| file.flush())
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn with_extension_appended(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn decompressed_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == EXTENSION => input.with_extension(""),
        _ => with_extension_appended(input, "out"),
    }
}
