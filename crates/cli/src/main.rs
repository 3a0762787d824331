//! CLI tool for converting KakaoTalk chat exports to JSONL training data.
//!
//! Each output line holds one user/model turn pair in the
//! `{"contents": [{"role", "parts": [{"text"}]}]}` format used for
//! supervised fine-tuning.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use kakao2jsonl_core::{
    process_all_transcripts, process_transcript, write_jsonl_output, ConversionStats,
    SpeakerRoles, DEFAULT_OUTPUT_FILE_NAME,
};

/// Convert a KakaoTalk chat export to JSONL training data.
#[derive(Parser, Debug)]
#[command(name = "kakao2jsonl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// KakaoTalk chat export (.txt)
    #[arg(short, long, required_unless_present = "input_dir", conflicts_with = "input_dir")]
    input: Option<PathBuf>,

    /// Directory of chat exports; every .txt file below it is converted
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Output JSONL path [default: ~/Desktop/output.jsonl]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Speaker name assigned the "user" role
    #[arg(long = "user", value_name = "NAME")]
    user_name: String,

    /// Speaker name assigned the "model" role
    #[arg(long = "model", value_name = "NAME")]
    model_name: String,
}

fn default_output_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join("Desktop").join(DEFAULT_OUTPUT_FILE_NAME),
        None => PathBuf::from(DEFAULT_OUTPUT_FILE_NAME),
    }
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(stats: &ConversionStats, output: &Path) {
    println!("\n[summary]");
    println!("  Messages extracted: {}", stats.messages);
    println!("  Records written: {}", stats.records);
    if stats.skipped_pairs > 0 || stats.dropped_replies > 0 {
        println!(
            "  Malformed: {} pairs skipped, {} replies dropped",
            stats.skipped_pairs, stats.dropped_replies
        );
    }
    if stats.dropped_trailing > 0 {
        println!("  Unpaired trailing messages: {}", stats.dropped_trailing);
    }
    println!("  Output: {:?}", output);
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let output = args.output.unwrap_or_else(default_output_path);
    let roles = SpeakerRoles::new(args.user_name, args.model_name);

    let stats = if let Some(input_dir) = &args.input_dir {
        tracing::info!("Converting transcripts under {:?} -> {:?}", input_dir, output);
        let batch = process_all_transcripts(input_dir, &roles)?;
        write_jsonl_output(batch.records(), &output)?;
        tracing::info!("Converted {} transcripts", batch.transcripts.len());
        batch.stats()
    } else {
        let input = args.input.as_deref().ok_or("--input or --input-dir is required")?;
        tracing::info!("Converting {:?} -> {:?}", input, output);
        let conversion = process_transcript(input, &roles)?;
        write_jsonl_output(&conversion.records, &output)?;
        conversion.stats
    };

    tracing::info!("Done: {} messages processed", stats.messages);
    print_summary(&stats, &output);

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
