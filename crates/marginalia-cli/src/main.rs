use anyhow::{Context, Result, bail};
use marginalia_config::Config;
use marginalia_engine::anchoring::locate;
use marginalia_engine::{AnchorRecord, Engine, Reconciled, inner_markup, parse};
use std::{env, path::PathBuf, process};

const USAGE: &str = "\
Usage:
  {bin} resolve <page.html> [anchors.json]
  {bin} capture <page.html> <text> [occurrence]
  {bin} init";

enum Command {
    Resolve {
        page: PathBuf,
        anchors: Option<PathBuf>,
    },
    Capture {
        page: PathBuf,
        text: String,
        occurrence: usize,
    },
    Init,
}

impl Command {
    fn from_args(args: &[String]) -> Result<Self> {
        match args {
            [cmd, page] if cmd == "resolve" => Ok(Command::Resolve {
                page: PathBuf::from(page),
                anchors: None,
            }),
            [cmd, page, anchors] if cmd == "resolve" => Ok(Command::Resolve {
                page: PathBuf::from(page),
                anchors: Some(PathBuf::from(anchors)),
            }),
            [cmd, page, text] if cmd == "capture" => Ok(Command::Capture {
                page: PathBuf::from(page),
                text: text.clone(),
                occurrence: 0,
            }),
            [cmd, page, text, occurrence] if cmd == "capture" => Ok(Command::Capture {
                page: PathBuf::from(page),
                text: text.clone(),
                occurrence: occurrence
                    .parse()
                    .with_context(|| format!("occurrence must be a number, got {occurrence:?}"))?,
            }),
            [cmd] if cmd == "init" => Ok(Command::Init),
            _ => bail!("unrecognized arguments"),
        }
    }
}

/// Highlight every record on the page. Returns the new markup and one
/// summary line per record.
fn resolve_page(engine: &Engine, page: &str, records: &[AnchorRecord]) -> Result<(String, Vec<String>)> {
    let mut doc = parse(page).context("failed to parse page")?;
    let root = doc.root();
    let results = engine.reconcile(&mut doc, root, records, None);
    let summary = results
        .iter()
        .zip(records)
        .map(|(result, record)| summary_line(result, record))
        .collect();
    Ok((inner_markup(&doc, root), summary))
}

fn summary_line(result: &Reconciled, record: &AnchorRecord) -> String {
    match &result.highlight {
        Some(highlight) => format!(
            "#{} {:?}: {} marker(s), highlight {}",
            result.index,
            record.text(),
            highlight.markers.len(),
            highlight.id
        ),
        None => format!("#{} {:?}: not found", result.index, record.text()),
    }
}

/// Record the `occurrence`th match of `text` on the page.
fn capture_on_page(engine: &Engine, page: &str, text: &str, occurrence: usize) -> Result<AnchorRecord> {
    let doc = parse(page).context("failed to parse page")?;
    let root = doc.root();
    let found = locate(&doc, root, text, engine.config());
    let Some(&range) = found.get(occurrence) else {
        bail!(
            "{text:?} occurs {} time(s) on the page; occurrence {occurrence} requested",
            found.len()
        );
    };
    Ok(engine.capture(&doc, root, range)?)
}

/// Write `config` to the default location unless a file is already there.
fn init_config(config: &Config) -> Result<PathBuf> {
    let path = Config::config_path();
    if path.exists() {
        bail!("config file already exists at {}", path.display());
    }
    config
        .save()
        .with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(path)
}

fn run(command: Command, config: Config) -> Result<()> {
    let engine = Engine::new(config.engine);
    match command {
        Command::Resolve { page, anchors } => {
            let Some(anchors) = anchors.or(config.anchors_path) else {
                bail!(
                    "no anchors file given and none configured in {}",
                    Config::config_path().display()
                );
            };
            let page_src = std::fs::read_to_string(&page)
                .with_context(|| format!("failed to read page {}", page.display()))?;
            let anchors_src = std::fs::read_to_string(&anchors)
                .with_context(|| format!("failed to read anchors {}", anchors.display()))?;
            let records: Vec<AnchorRecord> = serde_json::from_str(&anchors_src)
                .with_context(|| format!("failed to parse anchors {}", anchors.display()))?;

            let (markup, summary) = resolve_page(&engine, &page_src, &records)?;
            println!("{markup}");
            for line in summary {
                eprintln!("{line}");
            }
        }
        Command::Capture {
            page,
            text,
            occurrence,
        } => {
            let page_src = std::fs::read_to_string(&page)
                .with_context(|| format!("failed to read page {}", page.display()))?;
            let record = capture_on_page(&engine, &page_src, &text, occurrence)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Init => {
            let path = init_config(&Config::default())?;
            log::info!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let bin = args.first().map_or("marginalia-cli", String::as_str);

    let command = match Command::from_args(args.get(1..).unwrap_or(&[])) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", USAGE.replace("{bin}", bin));
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(Some(config)) => {
            log::info!("Using config from {}", Config::config_path().display());
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    run(command, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parses_commands() {
        assert!(matches!(
            Command::from_args(&args(&["resolve", "p.html"])),
            Ok(Command::Resolve { anchors: None, .. })
        ));
        assert!(matches!(
            Command::from_args(&args(&["capture", "p.html", "some text", "2"])),
            Ok(Command::Capture { occurrence: 2, .. })
        ));
        assert!(Command::from_args(&args(&["capture", "p.html", "t", "x"])).is_err());
        assert!(matches!(
            Command::from_args(&args(&["init"])),
            Ok(Command::Init)
        ));
        assert!(Command::from_args(&args(&["init", "extra"])).is_err());
        assert!(Command::from_args(&args(&["frobnicate"])).is_err());
    }

    #[test]
    fn test_capture_then_resolve_round_trip() {
        let page = "<p>The same words.</p><p>The same words again.</p>";
        let engine = Engine::default();

        let record = capture_on_page(&engine, page, "the same words", 1).unwrap();
        let (markup, summary) = resolve_page(&engine, page, &[record]).unwrap();

        assert!(markup.starts_with("<p>The same words.</p><p><mark"));
        assert!(markup.ends_with("The same words</mark> again.</p>"));
        assert_eq!(summary.len(), 1);
        assert!(summary[0].starts_with("#0 \"The same words\": 1 marker(s)"));
    }

    #[test]
    fn test_init_writes_defaults_once() {
        let home = TempDir::new().unwrap();
        unsafe {
            std::env::set_var("HOME", home.path());
        }

        let path = init_config(&Config::default()).unwrap();

        assert!(path.starts_with(home.path()));
        assert_eq!(
            Config::load_from_path(&path).unwrap(),
            Some(Config::default())
        );
        assert!(init_config(&Config::default()).is_err());
    }

    #[test]
    fn test_missing_occurrence_is_an_error() {
        let engine = Engine::default();
        let err = capture_on_page(&engine, "<p>only once</p>", "only once", 3).unwrap_err();
        assert!(err.to_string().contains("occurs 1 time(s)"));
    }

    #[test]
    fn test_unresolved_records_are_reported() {
        let engine = Engine::default();
        let records = [AnchorRecord::new("absent text", "", "")];
        let (markup, summary) = resolve_page(&engine, "<p>present</p>", &records).unwrap();
        assert_eq!(markup, "<p>present</p>");
        assert_eq!(summary, vec!["#0 \"absent text\": not found".to_string()]);
    }
}
