use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use esnsi::{
    classifiers::{Okato, Sfr, SfrCo},
    cnsi::Document,
    schema::Schema,
};

#[derive(Parser)]
#[command(name = "esnsi")]
#[command(about = "Decode ESNSI classifier exports and report what was loaded")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// OKATO administrative-territorial codes
    Okato { file: PathBuf },
    /// SFR client offices, several offices per area allowed
    Sfr { file: PathBuf },
    /// SFR client offices, one office per area
    SfrCo { file: PathBuf },
    /// Attribute definitions declared by any classifier document
    Schema { file: PathBuf },
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(f))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Okato { file } => {
            let okato = Okato::from_reader(open(&file)?)
                .with_context(|| format!("decoding OKATO from {}", file.display()))?;
            println!("{} ({}) v{} uid={}", okato.name, okato.code, okato.version, okato.uid);
            println!("records:  {}", okato.len());
            println!("codes:    {}", okato.code_index().len());
            println!("codes11:  {}", okato.code11_index().len());
            println!("regions:  {}", okato.region_record_index().len());
        }
        Command::Sfr { file } => {
            let sfr = Sfr::from_reader(open(&file)?)
                .with_context(|| format!("decoding SFR offices from {}", file.display()))?;
            println!("{} ({}) v{} uid={}", sfr.name, sfr.code, sfr.version, sfr.uid);
            println!("offices:  {}", sfr.len());
            println!("okato:    {}", sfr.okato_index().len());
            println!("okato11:  {}", sfr.okato11_index().len());
            println!("okato8:   {}", sfr.okato8_index().len());
            println!("okato5:   {}", sfr.okato5_index().len());
            println!("okato2:   {}", sfr.okato2_index().len());
        }
        Command::SfrCo { file } => {
            let sfr = SfrCo::from_reader(open(&file)?)
                .with_context(|| format!("decoding SFR_CO offices from {}", file.display()))?;
            println!("{} ({}) v{} uid={}", sfr.name, sfr.code, sfr.version, sfr.uid);
            println!("offices:  {}", sfr.len());
            println!("okato:    {}", sfr.okato_index().len());
        }
        Command::Schema { file } => {
            let doc = Document::from_reader(open(&file)?)
                .with_context(|| format!("reading {}", file.display()))?;
            let meta = &doc.meta;
            println!("{} ({}) v{} uid={}", meta.name, meta.code, meta.version, meta.uid);
            println!("records:  {}", doc.records.len());
            let schema = Schema::from_document(&doc);
            for def in schema.iter() {
                println!("  {:<8} {:<40} {}", def.kind.as_str(), def.name, def.reference_id);
            }
        }
    }

    Ok(())
}
