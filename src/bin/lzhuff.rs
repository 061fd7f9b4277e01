use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use lzhuff::{compress_with_diagnostics, decompress, CompressConfig, DiagnosticSinks};

#[derive(Parser, Debug)]
#[command(name = "lzhuff")]
#[command(about = "Compress and decompress files with an LZ77 + Huffman codec")]
#[command(version)]
struct Args {
    /// Input file
    input: PathBuf,

    /// Run in compression mode (pass --compress=false to decompress)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, value_name = "BOOL")]
    compress: bool,

    /// Output file name; defaults derive from the input name
    #[arg(long, value_name = "PATH")]
    name: Option<PathBuf>,

    /// Minimum match size for the LZ77 search
    #[arg(long = "min-match", default_value_t = 4, value_name = "N")]
    min_match: u8,

    /// Maximum match size for the LZ77 search (upper limit is 255)
    #[arg(long = "max-match", default_value_t = 255, value_name = "N")]
    max_match: u64,

    /// Size of the LZ77 search window (upper limit is 65535)
    #[arg(long = "search-size", default_value_t = 4096, value_name = "N")]
    search_size: u64,

    /// Print diagnostic information
    #[arg(long)]
    verbose: bool,

    /// Write a Graphviz rendering of the Huffman tree to this path
    #[arg(long, value_name = "PATH")]
    graphviz: Option<PathBuf>,

    /// Write the LZ77 token sequence as text to this path
    #[arg(long, value_name = "PATH")]
    lz: Option<PathBuf>,

    /// Write a timing profile of the run to this path
    #[arg(long, value_name = "PATH")]
    cpuprofile: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = CompressConfig {
        min_match_len: args.min_match,
        max_match_len: args.max_match.min(255) as u8,
        max_search_len: args.search_size.min(65535) as u16,
    };

    if args.compress {
        run_compress(&args, &config)
    } else {
        run_decompress(&args)
    }
}

fn run_compress(args: &Args, config: &CompressConfig) -> Result<(), Box<dyn std::error::Error>> {
    let output_path = args.name.clone().unwrap_or_else(|| compressed_name(&args.input));

    if args.verbose {
        println!("Compressing {}", args.input.display());
        println!(
            "Config: min-match={}, max-match={}, search-size={}",
            config.min_match_len, config.max_match_len, config.max_search_len
        );
    }

    let input = BufReader::new(File::open(&args.input)?);
    let mut output = BufWriter::new(File::create(&output_path)?);

    let mut tree_file = match &args.graphviz {
        Some(path) => {
            if args.verbose {
                println!("Writing Huffman tree to {}", path.display());
            }
            Some(BufWriter::new(File::create(path)?))
        }
        None => None,
    };
    let mut lz_file = match &args.lz {
        Some(path) => {
            if args.verbose {
                println!("Writing LZ77 token dump to {}", path.display());
            }
            Some(BufWriter::new(File::create(path)?))
        }
        None => None,
    };

    let start = Instant::now();
    let stats = compress_with_diagnostics(
        input,
        &mut output,
        config,
        DiagnosticSinks {
            tree_dot: tree_file.as_mut().map(|f| f as &mut dyn Write),
            token_dump: lz_file.as_mut().map(|f| f as &mut dyn Write),
        },
    )?;
    let elapsed = start.elapsed();

    output.flush()?;
    if let Some(mut f) = tree_file {
        f.flush()?;
    }
    if let Some(mut f) = lz_file {
        f.flush()?;
    }

    if args.verbose {
        println!("Input size (bytes): {}", stats.input_bytes);
        println!("Output size (bytes): {}", stats.output_bytes);
        println!(
            "Tokens: {} ({} back-references, pointer ratio {:.2})",
            stats.tokens,
            stats.back_references,
            stats.pointer_ratio()
        );
        println!("Code table entries: {}", stats.table_entries);
        if stats.output_bytes > 0 {
            println!(
                "Compression ratio: {:.2}",
                stats.input_bytes as f64 / stats.output_bytes as f64
            );
        }
        println!("Time elapsed: {:.2?}", elapsed);
        println!("Wrote {}", output_path.display());
    }

    if let Some(path) = &args.cpuprofile {
        write_profile(path, "compress", elapsed, stats.input_bytes, stats.output_bytes)?;
    }
    Ok(())
}

fn run_decompress(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let output_path = args.name.clone().unwrap_or_else(|| decompressed_name(&args.input));

    if args.verbose {
        println!("Decompressing {}", args.input.display());
    }

    let input_bytes = std::fs::metadata(&args.input)?.len();
    let input = BufReader::new(File::open(&args.input)?);
    let mut output = BufWriter::new(File::create(&output_path)?);

    let start = Instant::now();
    let stats = decompress(input, &mut output)?;
    let elapsed = start.elapsed();
    output.flush()?;

    if args.verbose {
        println!("Output size (bytes): {}", stats.output_bytes);
        println!("Tokens: {}", stats.tokens);
        println!("Time elapsed: {:.2?}", elapsed);
        println!("Wrote {}", output_path.display());
    }

    if let Some(path) = &args.cpuprofile {
        write_profile(path, "decompress", elapsed, input_bytes, stats.output_bytes)?;
    }
    Ok(())
}

/// Default compressed output name: the input name plus `.compressed`
fn compressed_name(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".compressed");
    PathBuf::from(name)
}

/// Default decompressed output name: strip a `.compressed` suffix if
/// present, then append `.decompressed`
fn decompressed_name(input: &Path) -> PathBuf {
    let name = input.to_string_lossy();
    let base = name.strip_suffix(".compressed").unwrap_or(&name);
    PathBuf::from(format!("{}.decompressed", base))
}

fn write_profile(
    path: &Path,
    operation: &str,
    elapsed: Duration,
    input_bytes: u64,
    output_bytes: u64,
) -> std::io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(f, "# lzhuff timing profile")?;
    writeln!(f, "operation: {}", operation)?;
    writeln!(f, "wall_time_us: {}", elapsed.as_micros())?;
    writeln!(f, "input_bytes: {}", input_bytes)?;
    writeln!(f, "output_bytes: {}", output_bytes)?;
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        writeln!(f, "throughput_mb_s: {:.2}", input_bytes as f64 / secs / 1_000_000.0)?;
    }
    f.flush()
}
