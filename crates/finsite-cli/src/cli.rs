use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use finsite_core::offline::Destination;

#[derive(Parser, Debug)]
#[command(name = "finsite", version, about = "SIP calculator, offline cache and lead tools")]
pub struct Cli {
    /// Also write logs to a daily-rotated file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.config/finsite/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project the value of a monthly SIP
    Sip(SipArgs),

    /// Offline cache controller
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Submit a lead-capture form
    Lead(LeadArgs),

    /// Show the market summary
    Market(MarketArgs),
}

#[derive(Args, Debug)]
pub struct SipArgs {
    /// Monthly investment amount (e.g. 5000 or "₹5,000")
    #[arg(long, default_value = "5000")]
    pub amount: String,

    /// Investment duration in years
    #[arg(long, default_value_t = 5)]
    pub years: u32,

    /// Expected annual return in percent
    #[arg(long, default_value_t = 12.0)]
    pub rate: f64,

    /// Skip the calculator's slider bounds (1-30 years, 8-30%)
    #[arg(long)]
    pub unclamped: bool,

    /// Print the unrounded result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Install this cache version and sweep old ones
    Install,

    /// Fetch a URL through the controller
    Fetch(FetchArgs),

    /// List namespaces and their entries
    List,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    pub url: String,

    /// Treat the network as unavailable
    #[arg(long)]
    pub offline: bool,

    /// Declared request destination
    #[arg(long, value_enum, default_value_t = DestinationArg::Unspecified)]
    pub destination: DestinationArg,

    /// Write the response body to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DestinationArg {
    Document,
    Image,
    Font,
    Script,
    Style,
    Unspecified,
}

impl From<DestinationArg> for Destination {
    fn from(arg: DestinationArg) -> Self {
        match arg {
            DestinationArg::Document => Destination::Document,
            DestinationArg::Image => Destination::Image,
            DestinationArg::Font => Destination::Font,
            DestinationArg::Script => Destination::Script,
            DestinationArg::Style => Destination::Style,
            DestinationArg::Unspecified => Destination::Unspecified,
        }
    }
}

#[derive(Args, Debug)]
pub struct LeadArgs {
    /// Form to submit: hero, term-insurance, health-insurance, motor-insurance,
    /// sip-investment, retirement-planning, financial-planning
    pub form: String,

    /// Form field as name=value (repeatable)
    #[arg(long = "field", short = 'f', value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Validate only, do not submit
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))?;
    if name.trim().is_empty() {
        return Err(format!("empty field name in '{}'", raw));
    }
    Ok((name.trim().to_string(), value.to_string()))
}

#[derive(Args, Debug)]
pub struct MarketArgs {
    /// Keep refreshing every five minutes
    #[arg(long)]
    pub watch: bool,

    /// Stop watching after this many updates
    #[arg(long)]
    pub count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("name=Asha Rao").unwrap(),
            ("name".to_string(), "Asha Rao".to_string())
        );
        assert_eq!(parse_field("note=a=b").unwrap().1, "a=b");
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["finsite", "sip", "--amount", "2500", "--years", "10"]).unwrap();
        match cli.command {
            Command::Sip(args) => {
                assert_eq!(args.amount, "2500");
                assert_eq!(args.years, 10);
                assert_eq!(args.rate, 12.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from([
            "finsite",
            "lead",
            "hero",
            "-f",
            "name=Arjun",
            "--field",
            "product=SIP",
        ])
        .unwrap();
        match cli.command {
            Command::Lead(args) => assert_eq!(args.fields.len(), 2),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from([
            "finsite",
            "cache",
            "fetch",
            "https://aadhaarcapital.com/logo.png",
            "--offline",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Cache(CacheCommand::Fetch(ref a)) if a.offline));
    }
}
