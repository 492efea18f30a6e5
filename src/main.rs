//! Macro tag preprocessor CLI
//!
//! Usage:
//!   minijinja-macro-tags [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>      Config file (TOML format)
//!   --macros-dir <DIR>       Register a directory of macro templates
//!   --macros-file <FILE>     Register a macro template file
//!   -s, --syntax <SYNTAX>    Rewrite only one author syntax
//!   -e, --expand             Expand canonical instructions after rewriting
//!   --check                  Validate only, print nothing on success
//!   -r, --reference          Show the tag syntax reference
//!   -h, --help               Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use minijinja_macro_tags::{Config, MacroEnvironment};

#[derive(Parser)]
#[command(name = "minijinja-macro-tags")]
#[command(about = "Component-style macro tag preprocessor for minijinja templates")]
struct Cli {
    /// Input template file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Config file describing syntaxes and macro sources (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of macro templates to register (repeatable)
    #[arg(long = "macros-dir")]
    macros_dirs: Vec<PathBuf>,

    /// Macro template file to register (repeatable)
    #[arg(long = "macros-file")]
    macros_files: Vec<PathBuf>,

    /// Author syntax to rewrite (overrides the config selection)
    #[arg(short, long, value_enum)]
    syntax: Option<SyntaxChoice>,

    /// Expand canonical instructions using the registered macros
    #[arg(short, long)]
    expand: bool,

    /// Check the input for rewrite errors without printing output
    #[arg(long)]
    check: bool,

    /// Show the tag syntax reference
    #[arg(short, long)]
    reference: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SyntaxChoice {
    /// Bracket tags only: <{ name /}>
    Jinja,
    /// HTML-style tags only: <m:name />
    Html,
    /// Both syntaxes
    All,
}

fn main() {
    let cli = Cli::parse();

    if cli.reference {
        print_reference();
        return;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load config
    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    if let Some(choice) = cli.syntax {
        let (jinja, html) = match choice {
            SyntaxChoice::Jinja => (true, false),
            SyntaxChoice::Html => (false, true),
            SyntaxChoice::All => (true, true),
        };
        config.jinja_syntax = jinja;
        config.html_syntax = html;
    }

    let mut env = match MacroEnvironment::from_config(&config) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Error registering macros: {}", e);
            std::process::exit(1);
        }
    };

    for dir in &cli.macros_dirs {
        if let Err(e) = env.register_directory(dir, None, config.replace) {
            eprintln!("Error registering macro directory '{}': {}", dir.display(), e);
            std::process::exit(1);
        }
    }
    for file in &cli.macros_files {
        if let Err(e) = env.register_file(file, None, config.replace) {
            eprintln!("Error registering macro file '{}': {}", file.display(), e);
            std::process::exit(1);
        }
    }

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let filename = cli
        .input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    let canonical = match env.preprocess(&source) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    };

    if cli.check {
        return;
    }

    let output = if cli.expand {
        env.expand(&canonical)
    } else {
        canonical
    };
    println!("{}", output);
}

fn print_intro() {
    println!(
        r#"Minijinja Macro Tags - Component-style macro calls for templates

USAGE:
    minijinja-macro-tags [OPTIONS] [FILE]
    echo '<template>' | minijinja-macro-tags

OPTIONS:
    -r, --reference    Show the tag syntax reference
    -c, --config       Config file (TOML format)
    --macros-dir       Register a directory of macro templates
    --macros-file      Register a macro template file
    -s, --syntax       Rewrite only one author syntax (jinja, html, all)
    -e, --expand       Expand canonical instructions after rewriting
    --check            Validate only, print nothing on success
    -h, --help         Print help

QUICK START:
    echo '<{{ panel title="Hi" /}}>' | minijinja-macro-tags

This rewrites the tag to canonical macro instructions. Add --expand and a
macro source to compile all the way to native template syntax.
Run --reference for the full syntax reference."#
    );
}

fn print_reference() {
    println!(
        r#"MACRO TAG REFERENCE
===================

BRACKET SYNTAX
--------------
<{{ name args }}>         Open a block tag
<{{ name args /}}>        Self-closing tag
</{{ name }}>             Close a block (name optional: </{{}}>)

HTML SYNTAX
-----------
<m:name args>            Open a block tag
<m:name args />          Self-closing tag
</m:name>                Close a block (name optional: </m:>)

Hyphens in HTML-style names map to underscores: <m:nav-bar /> calls the
macro nav_bar.

ARGUMENTS
---------
Everything between the name and the closing delimiter is kept verbatim.
Closing delimiters inside quoted strings do not end the tag:

    <m:button label="a > b" />

Whitespace separates arguments; on expansion they are joined with commas:

    <{{ button type="button" class="btn" /}}>

becomes a call with type="button", class="btn".

CANONICAL INSTRUCTIONS
----------------------
Rewriting produces engine-neutral instructions:

    {{% load_macro a, b %}}           Import macros a and b
    {{% macro_tag name args %}}       Call a macro
    {{% call_macro_tag name args %}}  Call a macro with a body
    {{% endmacrotag %}}               End the body

A load_macro line for every referenced name is prepended to the output.
Canonical text is a fixed point of the rewrite, so preprocessing twice is
safe.

EXPANSION
---------
With --expand and a macro source (--macros-dir, --macros-file, or a config
file), instructions compile to native syntax:

    {{% load_macro panel %}}          {{% from "widgets.html" import panel %}}
    {{% macro_tag panel title=1 %}}   {{{{ panel(title=1) }}}}
    {{% call_macro_tag panel %}}      {{% call panel() %}}
    {{% endmacrotag %}}               {{% endcall %}}

Macros are found by scanning registered templates for {{% macro name(...) %}}
definitions.

CONFIG FILE (TOML)
------------------
[syntaxes]
jinja = true
html = true

[macros]
extensions = ["html"]
replace = false

[[macros.directories]]
path = "theme/macros"
prefix = "theme"

[[macros.files]]
path = "widgets.html"
alias = "ui.html"

[macros.aliases]
btn = "button""#
    );
}
