mod debug_report;

use placeholdr::{
    ChainLookup, EnvLookup, PlaceholderResolver, PropertiesLookup, replace_placeholders_verbose_with, props,
};
use std::collections::HashMap;
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "PLACEHOLDR_LOG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_tracing(config.verbose);

    let lookup = match build_lookup(&config) {
        Ok(lookup) => lookup,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    match replace_placeholders_verbose_with(&config.input, &config.resolver, &lookup) {
        Ok(report) if config.explain => debug_report::print_report(&report, config.color),
        Ok(report) => print!("{}", report.output),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

struct CliConfig {
    input: String,
    resolver: PlaceholderResolver,
    sets: HashMap<String, String>,
    properties: Vec<String>,
    use_env: bool,
    explain: bool,
    color: bool,
    verbose: u8,
}

struct MarkerArgs {
    prefix: String,
    suffix: String,
    separator: Option<String>,
    strict: bool,
    max_depth: Option<usize>,
}

impl Default for MarkerArgs {
    fn default() -> Self {
        Self {
            prefix: "${".to_string(),
            suffix: "}".to_string(),
            separator: Some(":".to_string()),
            strict: false,
            max_depth: Some(placeholdr::DEFAULT_MAX_DEPTH),
        }
    }
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut markers = MarkerArgs::default();
    let mut sets = props! {};
    let mut properties = Vec::new();
    let mut use_env = true;
    let mut explain = false;
    let mut color = io::stdout().is_terminal();
    let mut verbose = 0u8;
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("placeholdr {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "-v" | "--verbose" => verbose = verbose.saturating_add(1),
            "--color" => color = true,
            "--no-color" => color = false,
            "--explain" => explain = true,
            "--strict" => markers.strict = true,
            "--no-env" => use_env = false,
            "--no-separator" => markers.separator = None,
            "--prefix" => markers.prefix = expect_value(&mut args, "--prefix")?,
            "--suffix" => markers.suffix = expect_value(&mut args, "--suffix")?,
            "--separator" => markers.separator = Some(expect_value(&mut args, "--separator")?),
            "--max-depth" => markers.max_depth = parse_max_depth(&expect_value(&mut args, "--max-depth")?)?,
            "--properties" | "-p" => properties.push(expect_value(&mut args, "--properties")?),
            "--set" | "-s" => {
                let (key, value) = parse_assignment(&expect_value(&mut args, "--set")?)?;
                sets.insert(key, value);
            }
            "--input" | "-i" => {
                let value = expect_value(&mut args, "--input")?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--set=") => {
                let (key, value) = parse_assignment(arg.trim_start_matches("--set="))?;
                sets.insert(key, value);
            }
            _ if arg.starts_with("--input=") => {
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(arg.trim_start_matches("--input=").to_string());
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let resolver =
        PlaceholderResolver::with_options(markers.prefix, markers.suffix, markers.separator, !markers.strict)
            .map_err(|err| format!("error: {err}"))?
            .with_max_depth(markers.max_depth);

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, resolver, sets, properties, use_env, explain, color, verbose })
}

fn expect_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("error: {flag} expects a value"))
}

fn parse_assignment(value: &str) -> Result<(String, String), String> {
    let re = placeholdr::regex!(r"^([^=]+)=(.*)$");
    let caps = re.captures(value).ok_or_else(|| format!("error: invalid --set '{value}' (expected KEY=VALUE)"))?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}

fn parse_max_depth(value: &str) -> Result<Option<usize>, String> {
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    value
        .parse::<usize>()
        .map(Some)
        .map_err(|_| format!("error: invalid --max-depth '{value}' (expected a number or 'none')"))
}

fn build_lookup(config: &CliConfig) -> Result<ChainLookup, String> {
    let mut files = Vec::with_capacity(config.properties.len());
    for path in &config.properties {
        let source =
            std::fs::read_to_string(path).map_err(|err| format!("error: failed to read properties '{path}': {err}"))?;
        let props = PropertiesLookup::parse(&source);
        tracing::debug!(path = %path, entries = props.len(), "loaded properties");
        files.push(props);
    }

    Ok(assemble_lookup(config.sets.clone(), files, config.use_env))
}

/// Precedence: `--set`, then `--properties` files in the order given, then
/// the environment.
fn assemble_lookup(sets: HashMap<String, String>, files: Vec<PropertiesLookup>, use_env: bool) -> ChainLookup {
    let mut chain = ChainLookup::new().with(sets);
    for props in files {
        chain.push(props);
    }
    if use_env {
        chain.push(EnvLookup::new());
    }
    chain
}

fn init_tracing(verbose: u8) {
    let base_filter = match verbose {
        0 => std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string()),
        1 => "placeholdr=debug".to_string(),
        _ => "placeholdr=trace".to_string(),
    };
    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr).compact())
        .init();
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "placeholdr {version}

Resolve ${{name}} placeholders in text.

Usage:
  placeholdr [OPTIONS] [--] <text...>
  placeholdr [OPTIONS] --input <text>
  placeholdr [OPTIONS] < file

Options:
  -i, --input <text>         Text to resolve. If omitted, reads remaining args
                             or stdin when no args are provided.
  -s, --set <KEY=VALUE>      Define a value (repeatable, highest precedence).
  -p, --properties <file>    Read values from a .properties file (repeatable).
  --no-env                   Do not fall back to environment variables.
  --prefix <text>            Placeholder prefix. Default: ${{
  --suffix <text>            Placeholder suffix. Default: }}
  --separator <text>         Key/default separator. Default: :
  --no-separator             Disable inline default values.
  --strict                   Fail on placeholders that cannot be resolved.
  --max-depth <n|none>       Recursion limit. Default: {max_depth}
  --explain                  Print a per-placeholder report instead of the text.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -v, --verbose              Log resolution details to stderr (repeat for more).
                             Otherwise the filter is read from {log_env}.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Resolution failed (circular reference, unresolvable placeholder, depth).
  2  Invalid arguments, unreadable input or properties file.
",
        version = env!("CARGO_PKG_VERSION"),
        max_depth = placeholdr::DEFAULT_MAX_DEPTH,
        log_env = LOG_ENV,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use placeholdr::PlaceholderLookup;

    #[test]
    fn assignment_splits_on_first_equals() {
        assert_eq!(parse_assignment("url=http://h/?a=b").unwrap(), ("url".to_string(), "http://h/?a=b".to_string()));
        assert_eq!(parse_assignment("empty=").unwrap(), ("empty".to_string(), String::new()));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn max_depth_accepts_numbers_and_none() {
        assert_eq!(parse_max_depth("16"), Ok(Some(16)));
        assert_eq!(parse_max_depth("none"), Ok(None));
        assert_eq!(parse_max_depth("NONE"), Ok(None));
        assert!(parse_max_depth("-1").is_err());
        assert!(parse_max_depth("deep").is_err());
    }

    #[test]
    fn sets_override_properties_which_override_each_other_in_order() {
        let first = PropertiesLookup::parse("host=from-first\nport=1\n");
        let second = PropertiesLookup::parse("host=from-second\nport=2\nuser=second\n");
        let chain = assemble_lookup(props! { "host" => "from-set" }, vec![first, second], false);

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.resolve_placeholder("host").as_deref(), Some("from-set"));
        assert_eq!(chain.resolve_placeholder("port").as_deref(), Some("1"));
        assert_eq!(chain.resolve_placeholder("user").as_deref(), Some("second"));
        assert_eq!(chain.resolve_placeholder("PATH"), None);
    }

    #[test]
    fn environment_is_the_last_resort() {
        let chain = assemble_lookup(props! { "PATH" => "overridden" }, Vec::new(), true);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.resolve_placeholder("PATH").as_deref(), Some("overridden"));

        let chain = assemble_lookup(props! {}, Vec::new(), true);
        assert_eq!(chain.resolve_placeholder("PATH"), std::env::var("PATH").ok());
    }
}
