use anyhow::{Context, Result, bail};
use markup_autolink_config::Config;
use markup_autolink_engine::{Outcome, Reconciler, import::from_markdown};
use std::{
    env,
    path::{Path, PathBuf},
    process,
};

#[derive(Debug, PartialEq)]
enum Command {
    Reconcile { file: PathBuf, check: bool },
    /// Writes the default config to `--config` or the default location.
    InitConfig,
}

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    command: Command,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--check] [--config PATH] <file.md>\n       {program} --init-config [--config PATH]"
    )
}

fn parse_args(args: &[String]) -> Result<Args> {
    let program = args.first().map_or("markup-autolink-cli", String::as_str);
    let mut check = false;
    let mut init_config = false;
    let mut config = None;
    let mut file = None;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--check" => check = true,
            "--init-config" => init_config = true,
            "--config" => {
                let path = rest
                    .next()
                    .with_context(|| format!("--config needs a path\n{}", usage(program)))?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{}", usage(program)),
            path if file.is_none() => file = Some(PathBuf::from(path)),
            _ => bail!("{}", usage(program)),
        }
    }

    let command = match (init_config, file) {
        (true, None) if !check => Command::InitConfig,
        (true, _) => bail!("--init-config takes no file or --check\n{}", usage(program)),
        (false, file) => Command::Reconcile {
            file: file.with_context(|| usage(program))?,
            check,
        },
    };
    Ok(Args { config, command })
}

fn resolve_config_path(path: &Path) -> PathBuf {
    Config::expand_path(path).unwrap_or_else(|| path.to_path_buf())
}

/// Config from `--config`, else the default location, else built-in defaults.
fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let loaded = match path {
        Some(path) => {
            let path = resolve_config_path(path);
            log::info!("Config path: {}", path.display());
            Some(
                Config::load_from_path(&path)?
                    .with_context(|| format!("config file {} not found", path.display()))?,
            )
        }
        None => {
            log::info!("Config path: {}", Config::config_path().display());
            Config::load()?
        }
    };
    Ok(loaded.unwrap_or_default())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    let (file, check) = match args.command {
        Command::InitConfig => {
            let path = args
                .config
                .as_ref()
                .map_or_else(Config::config_path, |path| resolve_config_path(path));
            Config::default().save_to_path(&path)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(());
        }
        Command::Reconcile { file, check } => (file, check),
    };

    let config = load_config(args.config.as_ref())?;
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let doc = from_markdown(&content);
    log::info!("Loaded {} ({} bytes of text)", file.display(), doc.len());

    let outcome = Reconciler::new(config.options()).reconcile_all(&doc);
    let changed = outcome.is_changed();
    match &outcome {
        Outcome::Unchanged => println!("{doc}"),
        Outcome::Changed {
            document,
            operations,
        } => {
            println!("{document}");
            println!("operations:");
            for op in operations {
                println!("  {op}");
            }
        }
    }

    if check && changed {
        log::warn!(
            "{} has {} mark(s) out of step with its text",
            file.display(),
            outcome.operations().len()
        );
        process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_file_and_flags() {
        let parsed = parse_args(&args(&["cli", "--check", "--config", "c.toml", "doc.md"])).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("c.toml")));
        assert_eq!(
            parsed.command,
            Command::Reconcile {
                file: PathBuf::from("doc.md"),
                check: true,
            }
        );
    }

    #[test]
    fn init_config_needs_no_file() {
        let parsed = parse_args(&args(&["cli", "--init-config", "--config", "c.toml"])).unwrap();
        assert_eq!(parsed.command, Command::InitConfig);
        assert!(parse_args(&args(&["cli", "--init-config", "doc.md"])).is_err());
        assert!(parse_args(&args(&["cli", "--init-config", "--check"])).is_err());
    }

    #[test]
    fn file_is_required() {
        let err = parse_args(&args(&["cli", "--check"])).unwrap_err();
        assert!(err.to_string().starts_with("Usage: cli"));
    }

    #[test]
    fn rejects_unknown_flags_and_extra_files() {
        assert!(parse_args(&args(&["cli", "--verbose", "doc.md"])).is_err());
        assert!(parse_args(&args(&["cli", "a.md", "b.md"])).is_err());
        assert!(parse_args(&args(&["cli", "doc.md", "--config"])).is_err());
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = std::env::temp_dir().join("markup-autolink-cli-test-missing");
        let err = load_config(Some(&dir.join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
