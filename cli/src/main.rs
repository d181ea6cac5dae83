mod test_runner;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use blocklang::builder::build_tree;

const SUBCOMMANDS: &[&str] = &["build", "test", "help"];

#[derive(Parser)]
#[command(name = "blockc", version, about = "Block program tree compiler")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a block listing into its syntax tree
    Build(BuildArgs),

    /// Run .test.blocks fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Block listing file to compile
    file: String,

    /// Parse only, don't print the tree (exit 0 if valid)
    #[arg(long)]
    check: bool,

    /// Dump the flat block sequence instead of the tree
    #[arg(long)]
    blocks: bool,

    /// Dump the tree with debug formatting instead of the indented rendering
    #[arg(long)]
    ast: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.blocks file or a directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // Backwards compatibility: if the first positional arg is not a known
    // subcommand, inject "build" so `blockc file.blocks` works like
    // `blockc build file.blocks`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first_pos) = args.iter().skip(1).find(|a| !a.starts_with('-')) {
        let first_pos = first_pos.clone();
        if !SUBCOMMANDS.contains(&first_pos.as_str()) {
            let pos = args.iter().position(|a| *a == first_pos).unwrap();
            args.insert(pos, "build".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Build(build_args) => do_build(build_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

fn do_build(args: BuildArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    // Read source
    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    // Set up codespan file database
    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.clone(), source.clone());

    // Parse the listing into the flat block sequence
    let parser = blocklang::parser::Parser::new(source, file_id);
    let program = match parser.parse() {
        Ok(p) => p,
        Err(errors) => {
            let writer = StandardStream::stderr(color_choice);
            let config = term::Config::default();
            for error in &errors {
                let diagnostic = error.to_diagnostic();
                let _ =
                    term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
            }
            process::exit(1);
        }
    };

    // --check: parse succeeded, exit
    if args.check {
        eprintln!("ok: {} parsed successfully", args.file);
        return;
    }

    // --blocks: dump the flat sequence
    if args.blocks {
        println!("{:#?}", program.blocks);
        return;
    }

    let tree = build_tree(&program.blocks);

    // --ast: debug dump
    if args.ast {
        println!("{:#?}", tree);
        return;
    }

    print!("{}", tree);
}
