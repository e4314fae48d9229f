//! postlog CLI
//!
//! Command-line interface for posting files: fixed 24-byte records of
//! (id, date, amount).

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use postlog::{Config, FixedRecord, PostlogError, RecordReader, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

postlog::fixed_record! {
    /// One account posting
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Posting {
        id: i64,
        /// Posting date as YYYYMMDD
        date: i64,
        amount: i64,
    }
}

/// postlog CLI
#[derive(Parser, Debug)]
#[command(name = "postlog")]
#[command(about = "Read, write and append fixed-size posting records")]
#[command(version)]
struct Args {
    /// Record file
    #[arg(short, long, default_value = "postings.bin")]
    path: PathBuf,

    /// When to fsync written records
    #[arg(long, value_enum, default_value = "never")]
    sync: SyncArg,

    /// Records between fsyncs when --sync=every-n
    #[arg(long, default_value = "100")]
    sync_every: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SyncArg {
    Never,
    OnClose,
    EveryN,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write two postings, append a third and print the file
    Demo,

    /// Replace the file with synthetic postings
    Generate {
        /// Number of postings to write
        #[arg(short, long, default_value = "1000")]
        count: u64,
    },

    /// Print postings in file order
    Dump {
        /// Stop after this many postings
        #[arg(short, long)]
        limit: Option<u64>,
    },

    /// Append one posting
    Append {
        #[arg(long)]
        id: i64,

        #[arg(long)]
        date: i64,

        #[arg(long)]
        amount: i64,
    },

    /// Print the posting at an index
    Get {
        /// Zero-based record index
        index: u64,
    },

    /// Show file size, record count and trailing bytes
    Stat,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,postlog=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let sync_strategy = match args.sync {
        SyncArg::Never => SyncStrategy::Never,
        SyncArg::OnClose => SyncStrategy::OnClose,
        SyncArg::EveryN => SyncStrategy::EveryNRecords {
            count: args.sync_every,
        },
    };
    let config = Config::builder().sync_strategy(sync_strategy).build();

    if let Err(e) = run(&args.path, &config, args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(path: &Path, config: &Config, command: Commands) -> postlog::Result<()> {
    match command {
        Commands::Demo => demo(path, config),
        Commands::Generate { count } => generate(path, config, count),
        Commands::Dump { limit } => dump(path, config, limit),
        Commands::Append { id, date, amount } => {
            let mut handle = postlog::open_for_append_with_config(path, config)?;
            postlog::append_one(&mut handle, &Posting { id, date, amount })?;
            postlog::close(handle)?;
            Ok(())
        }
        Commands::Get { index } => {
            let posting: Posting = postlog::read_at_with_config(path, index, config)?;
            print_posting(index, &posting);
            Ok(())
        }
        Commands::Stat => stat(path, config),
    }
}

fn demo(path: &Path, config: &Config) -> postlog::Result<()> {
    tracing::info!("postlog v{} demo on {}", postlog::VERSION, path.display());

    let postings = [
        Posting { id: 1, date: 20240101, amount: 100 },
        Posting { id: 2, date: 20240102, amount: 200 },
    ];
    postlog::write_all_with_config(path, &postings, config)?;

    let mut handle = postlog::open_for_append_with_config(path, config)?;
    postlog::append_one(&mut handle, &Posting { id: 3, date: 20240103, amount: 300 })?;
    postlog::close(handle)?;

    let read: Vec<Posting> = postlog::read_all_with_config(path, config)?;
    for (index, posting) in read.iter().enumerate() {
        print_posting(index as u64, posting);
    }
    println!("Demo complete.");
    Ok(())
}

fn generate(path: &Path, config: &Config, count: u64) -> postlog::Result<()> {
    let count = i64::try_from(count)
        .map_err(|_| PostlogError::Config(format!("count {} exceeds i64::MAX", count)))?;

    let mut writer = postlog::RecordWriter::create_with_config(path, config)?;
    for i in 0..count {
        writer.write(&Posting {
            id: i,
            date: 20240101 + i % 365,
            amount: i.wrapping_mul(123),
        })?;
    }
    let written = writer.finish()?;
    println!("Wrote {} postings to {}", written, path.display());
    Ok(())
}

fn dump(path: &Path, config: &Config, limit: Option<u64>) -> postlog::Result<()> {
    let reader = RecordReader::<Posting>::open_with_config(path, config)?;
    let limit = limit.unwrap_or(u64::MAX);

    let mut index = 0;
    for posting in reader.records() {
        if index >= limit {
            break;
        }
        print_posting(index, &posting?);
        index += 1;
    }
    Ok(())
}

fn stat(path: &Path, config: &Config) -> postlog::Result<()> {
    let reader = RecordReader::<Posting>::open_with_config(path, config)?;
    let count = reader.record_count();
    let trailing = reader.file_len() % Posting::SIZE as u64;

    println!("path:           {}", path.display());
    println!("record size:    {} bytes", Posting::SIZE);
    println!("file size:      {} bytes", reader.file_len());
    println!("records:        {}", count);
    println!("trailing bytes: {}", trailing);
    Ok(())
}

fn print_posting(index: u64, posting: &Posting) {
    println!(
        "#{:<8} id={:<10} date={:<10} amount={}",
        index, posting.id, posting.date, posting.amount
    );
}
