use clap::{Parser, ValueEnum};
use molsketch::prelude::*;
use std::fmt::{self, Display, Formatter};
use std::io::{stderr, stdout, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, Copy, ValueEnum)]
enum InputType {
    #[default]
    Native,
    Molfile,
}
impl From<InputType> for Format {
    fn from(value: InputType) -> Self {
        match value {
            InputType::Native => Format::Native,
            InputType::Molfile => Format::MolFile,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, ValueEnum)]
enum OutputType {
    #[default]
    Smiles,
    Native,
    Molfile,
}
impl Display for OutputType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smiles => f.write_str("smiles"),
            Self::Native => f.write_str("native"),
            Self::Molfile => f.write_str("molfile"),
        }
    }
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Format of the input
    #[arg(short, long, default_value_t = InputType::Native, value_enum)]
    from: InputType,
    /// Format to write
    #[arg(short, long, default_value_t = OutputType::Smiles)]
    to: OutputType,
    /// Read a native reaction instead of a single molecule
    #[arg(short, long)]
    reaction: bool,
    /// Leave out stereo marks
    #[arg(long)]
    no_stereo: bool,
    /// Perceive E/Z on unmarked double bonds too
    #[arg(long)]
    auto_ez: bool,
    /// Title line for molfile output
    #[arg(long, default_value = "")]
    title: String,
    /// File to write to, standard output if not given
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// File to read from, standard input if not given
    input: Option<PathBuf>,
}

fn init_tracing() {
    use tracing_subscriber::filter::*;
    use tracing_subscriber::prelude::*;
    let targets = match std::env::var("RUST_LOG") {
        Ok(var) => var.parse::<Targets>().unwrap_or_else(|e| {
            eprintln!("Ignoring `RUST_LOG={var:?}`: {e}");
            Targets::new().with_default(tracing::Level::ERROR)
        }),
        Err(e) => {
            if e != std::env::VarError::NotPresent {
                eprintln!("Ignoring `RUST_LOG`: {e}");
            }
            Targets::new().with_default(tracing::Level::ERROR)
        }
    };
    let fmt = tracing_subscriber::fmt::layer().with_writer(stderr);
    tracing_subscriber::registry()
        .with(targets)
        .with(fmt)
        .init();
}

fn write_output<O: Display>(path: Option<&Path>, out: O) {
    let res = if let Some(p) = path {
        std::fs::File::create(p).and_then(|mut f| writeln!(f, "{out}"))
    } else {
        writeln!(stdout(), "{out}")
    };
    if let Err(err) = res {
        tracing::error!("{err}");
    }
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let text = match read_input(cli.input.as_deref()) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let cfg = SmilesConfig::new()
        .with_isomeric(!cli.no_stereo)
        .with_auto_ez(cli.auto_ez);

    if cli.reaction {
        let reaction = match parse_native_reaction(&text) {
            Ok(r) => r,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        };
        match cli.to {
            OutputType::Smiles => write_output(cli.out.as_deref(), reaction.to_smiles(cfg).smiles),
            OutputType::Native => write_output(cli.out.as_deref(), reaction),
            OutputType::Molfile => {
                eprintln!("reactions can't be written as {}", cli.to);
                std::process::exit(1);
            }
        }
        return;
    }

    let mol = match parse_molecule(&text, cli.from.into()) {
        Ok(mol) => mol,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    match cli.to {
        OutputType::Smiles => {
            let report = generate_smiles(&mol, cfg);
            for issue in &report.issues {
                eprintln!("warning: {issue}");
            }
            write_output(cli.out.as_deref(), report.smiles);
        }
        OutputType::Native => write_output(cli.out.as_deref(), mol),
        OutputType::Molfile => write_output(cli.out.as_deref(), to_molfile(&mol, &cli.title)),
    }
}
