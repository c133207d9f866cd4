//! qail-geo — inspect spatial elements and the SQL they compile to
//!
//! # Usage
//!
//! ```bash
//! # Show what an element stores and how it is wrapped
//! qail-geo describe 'SRID=4326;POINT(1 2)' --extended
//!
//! # Compile a spatial call (dry run)
//! qail-geo call ST_Buffer 'POINT(1 2)' 2 --srid 4326
//!
//! # Evaluate it against PostGIS
//! qail-geo call ST_Area 'POLYGON((0 0,1 0,1 1,0 0))' --execute --database-url postgres://localhost/gis
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use qail_geo::functions::FUNCTIONS;
use qail_geo::prelude::*;
use qail_geo::transpiler::DialectKind;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qail-geo")]
#[command(version)]
#[command(about = "Spatial elements for QAIL expressions", long_about = None)]
#[command(after_help = "EXAMPLES:
    qail-geo describe 'SRID=4326;POINT(1 2)' --extended
    qail-geo describe 0101000020e6100000000000000000f03f0000000000000040 --wkb --extended
    qail-geo call ST_DWithin 'POINT(1 2)' 'wkt:POINT(3 4)' 10 --srid 4326
    qail-geo functions")]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "QAIL_GEO_DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Config file (defaults to ./qail-geo.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EncodingArgs {
    /// Payload is (E)WKB, binary given as hex
    #[arg(long)]
    wkb: bool,

    /// Payload self-describes its SRID (EWKT/EWKB)
    #[arg(short, long)]
    extended: bool,

    /// Explicit SRID (overrides the one in an extended payload)
    #[arg(short, long, allow_hyphen_values = true)]
    srid: Option<i32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an element's data, SRID and constructor
    Describe {
        /// WKT/EWKT text, or hex (E)WKB with --wkb
        payload: String,

        #[command(flatten)]
        encoding: EncodingArgs,

        /// Print the serialized element instead
        #[arg(long)]
        json: bool,
    },
    /// Compile `FUNCTION(element, args...)`
    Call {
        /// Spatial function name (ST_*)
        function: String,

        /// WKT/EWKT text, or hex (E)WKB with --wkb
        payload: String,

        /// Extra arguments: numbers, true/false, wkt:<WKT>, ewkt:<EWKT>, wkb:<hex>, or text
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,

        #[command(flatten)]
        encoding: EncodingArgs,

        /// Placeholder style: named or postgres
        #[arg(short, long)]
        dialect: Option<DialectKind>,

        /// Evaluate against the database
        #[arg(long)]
        execute: bool,
    },
    /// List registered spatial functions
    Functions,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    init_tracing(&cli, &config);

    if let Err(e) = run(&cli, &config).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<GeoConfig> {
    let mut config = match &cli.config {
        Some(path) => GeoConfig::from_path(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => GeoConfig::load()?,
    };
    if cli.database_url.is_some() {
        config.database_url = cli.database_url.clone();
    }
    Ok(config)
}

fn init_tracing(cli: &Cli, config: &GeoConfig) {
    let filter = if cli.verbose {
        EnvFilter::new("qail_geo=debug")
    } else if let Some(directive) = &config.log_filter {
        EnvFilter::new(directive)
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli, config: &GeoConfig) -> Result<()> {
    match &cli.command {
        Commands::Describe {
            payload,
            encoding,
            json,
        } => {
            let element = build_element(payload, encoding, config)?;
            describe(&element, *json)
        }
        Commands::Call {
            function,
            payload,
            args,
            encoding,
            dialect,
            execute,
        } => {
            let element = build_element(payload, encoding, config)?;
            let args = args
                .iter()
                .map(|arg| parse_arg(arg, element.srid()))
                .collect::<Result<Vec<Expr>>>()?;
            let expr = element.call(function, args)?;
            let dialect = dialect.unwrap_or(config.dialect);
            print_compiled(&expr.compile_with(dialect.dialect()));

            if *execute {
                let db = GeoDB::from_config(config).await?;
                let fetched = db.query(expr).fetch_one().await?;
                println!();
                println!("{}", "Result:".green().bold());
                match fetched {
                    Fetched::Value(value) => println!("  {}", value.to_string().white()),
                    Fetched::Geometry(geom) => {
                        println!("  {} {}", "SRID:".dimmed(), geom.srid());
                        println!("  {} {}", "EWKB:".dimmed(), geom.desc().white());
                    }
                }
            }
            Ok(())
        }
        Commands::Functions => {
            show_functions();
            Ok(())
        }
    }
}

fn build_element(payload: &str, encoding: &EncodingArgs, config: &GeoConfig) -> Result<GeometryValue> {
    let srid = match encoding.srid {
        Some(srid) => srid,
        // An extended payload carries its own SRID
        None if encoding.extended => DEFAULT_SRID,
        None => config.default_srid,
    };
    let element = if encoding.wkb {
        GeometryValue::Wkb(WkbElement::with_options(payload, srid, encoding.extended))
    } else {
        GeometryValue::Wkt(WktElement::with_options(payload, srid, encoding.extended)?)
    };
    Ok(element)
}

/// Numbers and booleans become literals; prefixed payloads become elements.
fn parse_arg(arg: &str, srid: i32) -> Result<Expr> {
    if let Some(wkt) = arg.strip_prefix("wkt:") {
        return Ok(WktElement::with_srid(wkt, srid).into());
    }
    if let Some(ewkt) = arg.strip_prefix("ewkt:") {
        return Ok(WktElement::from_ewkt(ewkt)?.into());
    }
    if let Some(hex) = arg.strip_prefix("wkb:") {
        return Ok(WkbElement::with_srid(hex, srid).into());
    }
    let expr = if let Ok(n) = arg.parse::<i64>() {
        Expr::from(n)
    } else if let Ok(f) = arg.parse::<f64>() {
        Expr::from(f)
    } else if arg == "true" {
        Expr::from(true)
    } else if arg == "false" {
        Expr::from(false)
    } else {
        Expr::from(arg)
    };
    Ok(expr)
}

fn describe(element: &GeometryValue, json: bool) -> Result<()> {
    if json {
        let serialized = match element {
            GeometryValue::Wkt(e) => e.dumps()?,
            GeometryValue::Wkb(e) => e.dumps()?,
        };
        println!("{}", serialized);
        return Ok(());
    }

    let kind = match element {
        GeometryValue::Wkt(_) => "WKT",
        GeometryValue::Wkb(_) => "WKB",
    };
    println!("{}", "Spatial Element".cyan().bold());
    println!();
    println!("  {} {}", "Kind:".dimmed(), kind.white());
    println!("  {} {}", "Desc:".dimmed(), element.desc().yellow());
    println!("  {} {}", "SRID:".dimmed(), element.srid());
    println!("  {} {}", "Extended:".dimmed(), element.extended());
    println!("  {} {}", "Constructor:".dimmed(), element.name().cyan());
    println!();
    print_compiled(&element.to_expr().compile());
    Ok(())
}

fn print_compiled(compiled: &Compiled) {
    println!("{}", "Generated SQL:".green().bold());
    println!("  {}", compiled.sql.white());
    if !compiled.params.is_empty() {
        println!();
        println!("{}", "Bindings:".cyan());
        for (name, value) in compiled.params.iter() {
            println!("  {} = {}", name, value.to_string().yellow());
        }
    }
}

fn show_functions() {
    println!("{}", "Registered spatial functions".cyan().bold());
    println!("{}", "Any other ST_* name is callable with an unknown return type.".dimmed());
    println!();

    println!(
        "{:20} {:18} {}",
        "Function".white().bold(),
        "Returns".white().bold(),
        "Description".white().bold()
    );
    println!("{}", "─".repeat(72).dimmed());

    for (name, returns, description) in FUNCTIONS {
        println!(
            "{:20} {:18} {}",
            name.cyan(),
            returns.sql_type().to_string().yellow(),
            description.dimmed()
        );
    }
}
