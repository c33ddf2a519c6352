//! Forge compiler CLI.
//!
//! Command-line interface for parsing and verifying `.fg` programs. There is
//! no codegen or linking backend in this build: `compile` stops after
//! verification, and `link` is a stub that reports the boundary as out of
//! scope (§4.7).

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{generate, Shell};
use forge_compiler::config::{CliConfig, ColorMode, UnicodeMode, VerifierConfig};
use forge_compiler::messages::MessageBuffer;
use forge_compiler::{parser, printer, verifier};
use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(name = "forgec")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Forge compiler front end - parse and verify .fg programs", long_about = None)]
struct Cli {
    /// Enable debug logging (overrides FORGE_DEBUG)
    #[arg(long, global = true)]
    debug: bool,

    /// Whether diagnostic rendering may use ANSI color
    #[arg(long, value_name = "MODE", global = true)]
    color_mode: Option<ColorMode>,

    /// Whether diagnostic rendering may assume a Unicode-capable terminal
    #[arg(long, value_name = "MODE", global = true)]
    unicode_mode: Option<UnicodeMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and verify a .fg source file
    Compile {
        /// Input .fg source file
        source: PathBuf,

        /// Output path for a future codegen backend (accepted, unused)
        #[arg(short, long, value_name = "PATH")]
        output_path: Option<PathBuf>,

        /// Print the parsed AST (debug-print format) before verifying
        #[arg(long)]
        print_ast: bool,

        /// Stop after parsing; skip semantic verification
        #[arg(long)]
        only_parse: bool,

        /// Print the generated IR (accepted for interface parity; always a
        /// no-op, since this build has no codegen backend)
        #[arg(long)]
        print_ir: bool,

        /// Parse and verify without writing any output
        #[arg(short = 'n', long)]
        dry: bool,

        /// Project config file (TOML) overriding the verifier's default
        /// minimum rendered severity
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Link previously compiled object files (not implemented; see §6)
    Link {
        /// Object files to link
        #[arg(required = true)]
        object_files: Vec<PathBuf>,

        /// Output path for the linked artifact
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let mut config = CliConfig::from_env();
    if cli.debug {
        config.debug = true;
    }
    if let Some(mode) = cli.color_mode {
        config.color_mode = mode;
    }
    if let Some(mode) = cli.unicode_mode {
        config.unicode_mode = mode;
    }
    init_logging(&config);

    match cli.command {
        Commands::Compile { source, output_path, print_ast, only_parse, print_ir, dry, config: config_path } => {
            run_compile(&source, output_path.as_deref(), print_ast, only_parse, print_ir, dry, config_path.as_deref(), &config);
        }
        Commands::Link { object_files, output } => {
            run_link(&object_files, &output);
        }
        Commands::Completions { shell } => {
            run_completions(shell);
        }
        Commands::Version => {
            println!("forgec {}", env!("CARGO_PKG_VERSION"));
        }
    }
}

fn init_logging(config: &CliConfig) {
    let filter = if config.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[allow(clippy::too_many_arguments)]
fn run_compile(
    source: &std::path::Path,
    _output_path: Option<&std::path::Path>,
    print_ast: bool,
    only_parse: bool,
    print_ir: bool,
    dry: bool,
    config_path: Option<&std::path::Path>,
    config: &CliConfig,
) {
    let verifier_config = match config_path {
        Some(path) => match VerifierConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => VerifierConfig::new(),
    };
    let text = match fs::read_to_string(source) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", source.display(), e);
            process::exit(1);
        }
    };

    let path: std::rc::Rc<str> = source.display().to_string().into();
    let mut root = match parser::parse(&text, Some(path)) {
        Ok(root) => root,
        Err(e) => {
            let mut messages = MessageBuffer::new();
            match e.range() {
                Some(range) => messages.emit(forge_core::Severity::FatalError, None, Some(range.clone()), e.to_string()),
                None => messages.emit(forge_core::Severity::FatalError, None, None, e.to_string()),
            };
            render_and_exit(&messages, config);
        }
    };

    if print_ast {
        println!("{}", printer::debug_print(&root));
    }

    if only_parse || dry {
        println!("Succeeded.");
        return;
    }

    let messages = verifier::verify(&mut root);
    let color = config.color_mode.resolve(std::io::stderr().is_terminal());
    let mut rendered = String::new();
    messages.render(&mut rendered, verifier_config.minimum_severity(), color).expect("rendering to a String cannot fail");
    eprint!("{rendered}");

    if print_ir {
        eprintln!("note: --print-ir has no effect; this build has no code generator (§6)");
    }

    if messages.has_errors() {
        process::exit(1);
    }
}

fn render_and_exit(messages: &MessageBuffer, config: &CliConfig) -> ! {
    let color = config.color_mode.resolve(std::io::stderr().is_terminal());
    let mut rendered = String::new();
    messages.render(&mut rendered, forge_core::Severity::Note, color).expect("rendering to a String cannot fail");
    eprint!("{rendered}");
    process::exit(1);
}

fn run_link(_object_files: &[PathBuf], _output: &std::path::Path) {
    eprintln!("Error: linking is not implemented by this front-end-only build (§6 Codegen → linking)");
    process::exit(1);
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "forgec", &mut std::io::stdout());
}
