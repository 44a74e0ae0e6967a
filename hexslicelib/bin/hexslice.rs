use hexslicelib::{
    AssembleOptions, SearchType, SegmentedView, assemble_from_path_with, build_segmented_view,
    search,
};
use std::env;
use std::path::PathBuf;
use std::process;

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");

    println!(" ----------------------------------------------");
    println!("|  Intel HEX Slice Utility  | v{version}            |");
    println!(" ----------------------------------------------");
    println!("\nUsage:");
    println!("  hexslice info <input>");
    println!("  hexslice records <input>");
    println!("  hexslice slice <input> <start> <end>");
    println!("  hexslice search <input> <pattern> [options]");
    println!("\nOptions:");
    println!("  --verify           Verify record checksums while assembling");
    println!("  --ascii            Treat the search pattern as ASCII text");
    println!("  --regex            Treat the search pattern as a regular expression");
    println!("\nExamples:");
    println!("  hexslice info firmware.hex");
    println!("  hexslice slice firmware.hex 0x00120000 0x0012FFFF");
    println!("  hexslice search firmware.hex DEADBEEF");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    println!();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = &args[1];

    // Dispatch and immediately handle results
    if let Err(e) = run_dispatch(command, &args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_dispatch(cmd: &str, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let options = AssembleOptions {
        verify_checksums: has_flag(args, "--verify"),
    };

    match cmd {
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        "info" => {
            let path = require_input(args, 2)?;
            run_info(&path, options)
        }
        "records" => {
            let path = require_input(args, 2)?;
            run_records(&path, options)
        }
        "slice" => {
            let path = require_input(args, 2)?;

            // Guard: both bounds must be given
            let start_str = args.get(3).ok_or("Missing range start address")?;
            let end_str = args.get(4).ok_or("Missing range end address")?;

            let start = parse_hex_str(start_str)
                .map_err(|_| format!("Invalid start address: {start_str}"))?;
            let end =
                parse_hex_str(end_str).map_err(|_| format!("Invalid end address: {end_str}"))?;

            run_slice(&path, options, start, end)
        }
        "search" => {
            let path = require_input(args, 2)?;
            let pattern = args.get(3).ok_or("Missing search pattern")?;

            let search_type = if has_flag(args, "--regex") {
                SearchType::Regex(pattern.clone())
            } else if has_flag(args, "--ascii") {
                SearchType::Ascii(pattern.clone())
            } else {
                SearchType::Hex(
                    parse_hex_bytes(pattern)
                        .ok_or_else(|| format!("Invalid hex pattern: {pattern}"))?,
                )
            };

            run_search(&path, options, &search_type)
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn run_info(path: &PathBuf, options: AssembleOptions) -> Result<(), Box<dyn std::error::Error>> {
    let seq = assemble_from_path_with(path, options)?;
    let view = build_segmented_view(&seq);

    println!("File Path:    {}", path.display());
    println!("Records:      {}", seq.len());
    println!("Data Bytes:   {}", data_byte_count(&view));
    println!("Segments:     {}", view.segment_count());
    match address_span(&view) {
        Some((min, max)) => {
            println!("Range:        {} - {}", format_addr(min), format_addr(max));
        }
        None => println!("Range:        (no data)"),
    }
    Ok(())
}

fn run_records(path: &PathBuf, options: AssembleOptions) -> Result<(), Box<dyn std::error::Error>> {
    let seq = assemble_from_path_with(path, options)?;

    for (index, record) in seq.iter().enumerate() {
        println!(
            "#{:<4} type=0x{:02X} addr=0x{:04X} len={:<3} {}",
            index + 1,
            record.rtype.code(),
            record.address,
            record.length,
            record.raw
        );
    }
    Ok(())
}

fn run_slice(
    path: &PathBuf,
    options: AssembleOptions,
    start: u32,
    end: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let seq = assemble_from_path_with(path, options)?;
    let view = build_segmented_view(&seq);
    let slice = view.query(start, end)?;

    if slice.record_count() == 0 {
        println!(
            "No data records in {} - {}",
            format_addr(start),
            format_addr(end)
        );
        return Ok(());
    }

    for (base, group) in &slice {
        println!("Segment {}:", format_addr(*base));
        for record in group {
            println!(
                "  {}  {} bytes  {}",
                format_addr(base | u32::from(record.address)),
                record.length,
                record.raw
            );
        }
    }
    Ok(())
}

fn run_search(
    path: &PathBuf,
    options: AssembleOptions,
    search_type: &SearchType,
) -> Result<(), Box<dyn std::error::Error>> {
    let seq = assemble_from_path_with(path, options)?;
    let view = build_segmented_view(&seq);

    let matches = search(&view, search_type);
    if matches.is_empty() {
        println!("No matches");
        return Ok(());
    }

    for addr in matches {
        println!("{}", format_addr(addr));
    }
    Ok(())
}

// =============================== HELPER FUNCTIONS ===============================

fn data_byte_count(view: &SegmentedView) -> usize {
    view.records().map(|record| record.data.len()).sum()
}

/// Lowest and highest absolute data addresses present in the view
fn address_span(view: &SegmentedView) -> Option<(u32, u32)> {
    let mut span: Option<(u32, u32)> = None;
    for (&base, group) in view {
        for record in group {
            let first = base | u32::from(record.address);
            let last = first + record.data.len().saturating_sub(1) as u32;
            span = match span {
                Some((min, max)) => Some((min.min(first), max.max(last))),
                None => Some((first, last)),
            };
        }
    }
    span
}

fn format_addr(addr: u32) -> String {
    let s = format!("{addr:08X}");
    format!("0x{}_{}", &s[0..4], &s[4..8])
}

/// Parse a string as a hex number (with optional 0x prefix)
fn parse_hex_str(s: &str) -> Result<u32, std::num::ParseIntError> {
    let s = s.trim();

    // Handle explicit 0x prefix
    if let Some(hex_str) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u32::from_str_radix(hex_str, 16);
    }

    // Parse as hex without prefix
    u32::from_str_radix(s, 16)
}

/// Parse a string of hex digit pairs (e.g. "DEADBEEF") into bytes
fn parse_hex_bytes(s: &str) -> Option<Vec<u8>> {
    let s = s.trim();
    if s.is_empty() || s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}

/// Validate that the input path argument exists and is a file
fn require_input(args: &[String], index: usize) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path_str = args.get(index).ok_or("Missing input file path")?;
    let path = PathBuf::from(path_str);
    if !path.exists() {
        return Err(format!("File not found: {path_str}").into());
    }
    if !path.is_file() {
        return Err(format!("Path is not a file: {path_str}").into());
    }
    Ok(path)
}

/// Whether a standalone flag is present among the arguments
fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}
