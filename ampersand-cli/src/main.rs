//! ampersand CLI
//!
//! Converts a saved copy of the WHATWG named character references page into
//! an espanso match file.

use std::io::{self, Write};
use std::path::PathBuf;

use ampersand_common::warning::{note, set_quiet};
use ampersand_entities::{
    DEFAULT_MARKER_ID, DEFAULT_PREFIX, LegacyPolicy, Options, OutputFormat, convert_file,
    write_atomic,
};
use anyhow::{Context, Result};
use clap::Parser;

/// ampersand — HTML named character references as espanso triggers
#[derive(Parser, Debug)]
#[command(name = "ampersand")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the match file
    ampersand named-characters.html

    # Write the package's match file
    ampersand named-characters.html -o package/html-entities/package.yml

    # Flat JSON object, triggers like &amp;
    ampersand named-characters.html --format json -p '&'

    # Also expand legacy names such as :amp
    ampersand named-characters.html --legacy keep
"#)]
struct Cli {
    /// HTML page containing the named character references table
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: stdout); its directory must exist
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Prefix for each trigger
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Legacy names without ';': skip or keep
    #[arg(long, value_name = "POLICY", default_value_t = LegacyPolicy::Skip)]
    legacy: LegacyPolicy,

    /// Output format: yaml or json
    #[arg(long, value_name = "FORMAT", default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Id of the element holding the table
    #[arg(long, value_name = "ID", default_value = DEFAULT_MARKER_ID)]
    table_id: String,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_quiet(cli.quiet);

    let options = Options {
        prefix: cli.prefix,
        legacy: cli.legacy,
        format: cli.format,
        marker_id: cli.table_id,
    };

    let conversion = convert_file(&cli.input, &options)
        .with_context(|| format!("failed to convert {}", cli.input.display()))?;

    if let Some(output) = &cli.output {
        write_atomic(output, &conversion.rendered)
            .with_context(|| format!("failed to write {}", output.display()))?;
        note("CLI", &format!("Output written to '{}'", output.display()));
    } else {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(conversion.rendered.as_bytes())
            .and_then(|()| stdout.flush())
            .context("failed to write to stdout")?;
    }

    Ok(())
}
