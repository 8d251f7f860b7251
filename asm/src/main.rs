use color_print::cprintln;
use onebpc::report::{self, ReportOptions};
use onebpc::{export, Error, InstructionSet, Severity};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::Level;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

const MIN_WRAP: usize = 40;

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Source file
    source_file: PathBuf,

    /// Listing file
    #[clap(default_value = "compiled.txt")]
    output_file: PathBuf,

    /// Show labels in the listing
    #[clap(long)]
    show_labels: bool,

    /// Least severe note to show: error, warning, comment or info
    #[clap(long)]
    note_level: Option<Severity>,

    /// Put labels and notes on their own lines
    #[clap(long)]
    spread_notes: bool,

    /// Wrap notes at this width (at least 40, implies --spread-notes)
    #[clap(long)]
    word_wrap_limit: Option<usize>,

    /// Prefix every word with its address
    #[clap(long)]
    add_address_numbers: bool,

    /// Show the source text of each word
    #[clap(long)]
    show_token_src: bool,

    /// Show notes attached to tokens by macros and conversions
    #[clap(long)]
    add_token_notes: bool,

    /// Draw 1 as `#` and 0 as `-`
    #[clap(long)]
    use_hashtags: bool,

    /// Recompile whenever the source file changes
    #[clap(long)]
    auto_recompile: bool,

    /// Export the memory block to the MTech workshop data.json
    #[clap(long)]
    export_mtech: bool,

    /// Export target, implies --export-mtech
    #[clap(long)]
    export_path: Option<PathBuf>,

    /// Dump the tokens behind every word
    #[clap(short, long)]
    dump: bool,

    /// Print the instruction table
    #[clap(long)]
    instructions: bool,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[clap(long, default_value_t = Level::WARN)]
    log_level: Level,
}

impl Args {
    fn report_options(&self) -> Result<ReportOptions, Error> {
        if let Some(got) = self.word_wrap_limit.filter(|&w| w < MIN_WRAP) {
            return Err(Error::WrapLimit { min: MIN_WRAP, got });
        }
        Ok(ReportOptions {
            show_labels: self.show_labels,
            note_level: self.note_level,
            spread_notes: self.spread_notes || self.word_wrap_limit.is_some(),
            word_wrap: self.word_wrap_limit,
            address_numbers: self.add_address_numbers,
            token_src: self.show_token_src,
            token_notes: self.add_token_notes,
            hashtags: self.use_hashtags,
        })
    }

    fn export_target(&self) -> Option<PathBuf> {
        match &self.export_path {
            Some(path) => Some(path.clone()),
            None if self.export_mtech => Some(PathBuf::from(export::DEFAULT_EXPORT_PATH)),
            None => None,
        }
    }
}

fn main() -> ExitCode {
    use clap::Parser;

    let args: Args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.print_diag();
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let opts = args.report_options()?;
    let set = InstructionSet::onebpc();
    println!("1bpc Assembler");
    if args.instructions {
        println!("{}", report::instruction_table(&set));
    }

    assemble(args, &opts, &set)?;
    if args.auto_recompile {
        watch(args, &opts, &set)?;
    }
    Ok(())
}

fn assemble(args: &Args, opts: &ReportOptions, set: &InstructionSet) -> Result<(), Error> {
    let start = Instant::now();

    println!("1. Read Source");
    println!("  < {}", args.source_file.display());
    let source = std::fs::read_to_string(&args.source_file)
        .map_err(|e| Error::FileRead(args.source_file.display().to_string(), e))?;

    println!("2. Compile");
    let map = onebpc::compile(&source, set);

    println!("3. Write Listing");
    println!("  > {}", args.output_file.display());
    std::fs::write(&args.output_file, report::render(&map, opts))
        .map_err(|e| Error::FileWrite(args.output_file.display().to_string(), e))?;

    if let Some(target) = args.export_target() {
        println!("4. Export Memory Block");
        println!("  > {}", target.display());
        export::export(&map, &target)?;
    }

    if args.dump {
        println!("{}", report::dump(&map));
        println!("-----+------------------------------------------------------------");
    }

    println!();
    match opts.word_wrap {
        Some(width) => println!("{}", report::summary_wrapped(&map, opts.note_level, width)),
        None => println!("{}", report::csummary(&map, opts.note_level)),
    }
    cprintln!(
        "<green,bold>Finished</> in {:.4} seconds.",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn modified(path: &Path) -> Result<std::time::SystemTime, Error> {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| Error::Watch(path.display().to_string(), e))
}

/// Polls the source's modification time and recompiles on change. Runs
/// until interrupted.
fn watch(args: &Args, opts: &ReportOptions, set: &InstructionSet) -> Result<(), Error> {
    let mut last = modified(&args.source_file)?;
    println!("Watching for changes...");
    loop {
        std::thread::sleep(Duration::from_millis(100));
        let current = modified(&args.source_file)?;
        if current == last {
            continue;
        }
        last = current;
        tracing::debug!("source changed");
        println!("\nSource file changed, recompiling...\n");
        if let Err(e) = assemble(args, opts, set) {
            e.print_diag();
        }
        println!("Watching for changes...");
    }
}
