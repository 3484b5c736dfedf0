//! `claimsync` binary

use std::path::PathBuf;

use claim_cli::OutputFormat;
use clap::{value_parser, Arg, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

fn resource_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("claim")
            .long("claim")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Path to the claim document"),
    )
    .arg(
        Arg::new("composite")
            .long("composite")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Path to the composite resource document"),
    )
    .arg(
        Arg::new("config")
            .long("config")
            .value_parser(value_parser!(PathBuf))
            .help("Sync configuration (TOML or YAML)"),
    )
    .arg(
        Arg::new("output")
            .long("output")
            .short('o')
            .default_value("yaml")
            .value_parser(["yaml", "json"])
            .help("Output format"),
    )
}

fn path<'a>(args: &'a ArgMatches, id: &str) -> anyhow::Result<&'a PathBuf> {
    args.get_one::<PathBuf>(id)
        .ok_or_else(|| anyhow::anyhow!("missing --{id}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Command::new("claimsync")
        .version(claim_sync::VERSION)
        .about("Synchronize claims and composite resources")
        .subcommand_required(true)
        .subcommand(resource_args(
            Command::new("compose").about("Configure a composite resource from its claim"),
        ))
        .subcommand(resource_args(
            Command::new("sync").about("Configure a claim from its composite resource"),
        ));

    let matches = cli.get_matches();
    let Some((name, args)) = matches.subcommand() else {
        return Ok(());
    };

    let config = claim_cli::load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let claim = claim_cli::load_document(path(args, "claim")?)?;
    let composite = claim_cli::load_document(path(args, "composite")?)?;

    let out = match name {
        "compose" => claim_cli::compose(config, claim, composite)?,
        "sync" => claim_cli::sync(config, claim, composite).await?,
        other => anyhow::bail!("unknown command {other}"),
    };

    let format = args
        .get_one::<String>("output")
        .map_or(Ok(OutputFormat::default()), |f| f.parse::<OutputFormat>())?;
    print!("{}", claim_cli::render(&out, format)?);
    Ok(())
}
