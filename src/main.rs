mod archive_extractor;
mod binary_utils;
mod containers;
mod error;
mod formats;
mod graphics;
mod pic_extractor;
mod uncook;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use archive_extractor::ArchiveExtractor;
use containers::blast::{BlastProcess, DEFAULT_BLAST_PATH};
use error::{UncookError, UncookResult};
use graphics::palette::SiblingSearch;

#[derive(Debug, Parser)]
#[command(name = "uncook", about = "Extract and decode cooked EALIB game assets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Unpack one or more EALIB archives, one subdirectory per archive
    Extract {
        /// Archives to unpack
        #[arg(required = true)]
        lib_files: Vec<PathBuf>,
        /// Where to store the extracted entries
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
        /// Path to the external decompressor binary
        #[arg(long, value_name = "FILE", default_value = DEFAULT_BLAST_PATH)]
        blast: PathBuf,
    },
    /// Decode a PIC image to PNG, or inspect its header
    Pic {
        /// The image to decode
        input: PathBuf,
        /// Where to store the decoded PNG
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Print header fields and region sizes instead of decoding
        #[arg(long)]
        discover: bool,
        /// With --discover, emit the header as JSON
        #[arg(long)]
        json: bool,
        /// Run an oxipng pass over the written PNG
        #[arg(long)]
        optimize: bool,
    },
    /// Wrap a raw 11K sample file in a WAV container
    Snd {
        /// The sample file to cook
        input: PathBuf,
        /// Where to store the WAV file
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },
    /// Uncook every recognised file in a directory
    Uncook {
        /// Directory holding the cooked files
        #[arg(short, long, value_name = "DIR")]
        input: PathBuf,
        /// Where to store the uncooked output
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
        /// Run an oxipng pass over written PNGs
        #[arg(long)]
        optimize: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> UncookResult<()> {
    match cli.command {
        Commands::Extract {
            lib_files,
            output,
            blast,
        } => {
            // A missing decompressor is reported before any archive is
            // opened.
            let decompressor = BlastProcess::locate(blast)?;
            let extractor = ArchiveExtractor::new(&decompressor);

            for lib in &lib_files {
                let name = lib.file_name().ok_or_else(|| {
                    UncookError::Format(format!("{}: not an archive path", lib.display()))
                })?;
                let dir = output.join(name);
                fs::create_dir_all(&dir)?;
                extractor.extract(lib, &dir)?;
            }
            Ok(())
        }
        Commands::Pic {
            input,
            output,
            discover,
            json,
            optimize,
        } => {
            if discover {
                return pic_extractor::discover(&input, json);
            }
            let output = output.ok_or_else(|| {
                UncookError::Configuration(
                    "--output is required unless --discover is given".to_string(),
                )
            })?;
            fs::create_dir_all(&output)?;
            let written = pic_extractor::decode_pic(&input, &output, &SiblingSearch, optimize)?;
            println!("{} -> {}", input.display(), written.display());
            Ok(())
        }
        Commands::Snd { input, output } => {
            fs::create_dir_all(&output)?;
            let written = uncook::uncook_snd(&input, &output)?;
            println!("{} -> {}", input.display(), written.display());
            Ok(())
        }
        Commands::Uncook {
            input,
            output,
            optimize,
        } => {
            fs::create_dir_all(&output)?;
            uncook::uncook_dir(&input, &output, optimize)
        }
    }
}
