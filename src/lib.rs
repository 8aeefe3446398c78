pub mod config;
pub mod generator;
pub mod scanner;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::config::{CONFIG_FILE_NAME, Config};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Build {
        config: Option<String>,
    },
    Watch {
        config: Option<String>,
        poll: bool,
        poll_interval_ms: u64,
    },
    Init,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    pub message: String,
}

pub fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Build { config } => run_build(config),
        Command::Watch {
            config,
            poll,
            poll_interval_ms,
        } => run_watch(config, poll, poll_interval_ms),
        Command::Init => run_init(),
        Command::Help => {
            print_help();
            Ok(())
        }
    }
}

pub fn run_from_env() -> Result<(), CliError> {
    let command = parse_args(env::args().skip(1))?;
    run(command)
}

pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();

    match args.first().map(String::as_str) {
        None => parse_watch_args(&[]),
        Some("build") => parse_build_args(&args[1..]),
        Some("watch") => parse_watch_args(&args[1..]),
        Some("init") => parse_init_args(&args[1..]),
        Some("-h") | Some("--help") | Some("help") => Ok(Command::Help),
        Some(flag) if flag.starts_with('-') => parse_watch_args(&args),
        Some(other) => Err(CliError {
            message: format!("unknown command: {}", other),
        }),
    }
}

fn parse_build_args(args: &[String]) -> Result<Command, CliError> {
    let mut config = None;
    let mut idx = 0;

    while idx < args.len() {
        match args[idx].as_str() {
            "--config" | "-c" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "build requires a value for --config".to_string(),
                    });
                }
                config = Some(args[idx].clone());
            }
            other => {
                return Err(CliError {
                    message: format!("unknown build argument: {}", other),
                });
            }
        }
        idx += 1;
    }

    Ok(Command::Build { config })
}

fn parse_watch_args(args: &[String]) -> Result<Command, CliError> {
    let mut config = None;
    let mut poll = false;
    let mut poll_interval_ms = 500;
    let mut idx = 0;

    while idx < args.len() {
        match args[idx].as_str() {
            "--config" | "-c" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "watch requires a value for --config".to_string(),
                    });
                }
                config = Some(args[idx].clone());
            }
            "--poll" => {
                poll = true;
            }
            "--poll-interval" => {
                idx += 1;
                if idx >= args.len() {
                    return Err(CliError {
                        message: "watch requires a value for --poll-interval".to_string(),
                    });
                }
                poll = true;
                poll_interval_ms = parse_u64_arg(&args[idx], "--poll-interval")?;
            }
            other => {
                return Err(CliError {
                    message: format!("unknown watch argument: {}", other),
                });
            }
        }
        idx += 1;
    }

    Ok(Command::Watch {
        config,
        poll,
        poll_interval_ms,
    })
}

fn parse_init_args(args: &[String]) -> Result<Command, CliError> {
    if let Some(extra) = args.first() {
        return Err(CliError {
            message: format!("init takes no arguments, got: {}", extra),
        });
    }
    Ok(Command::Init)
}

fn parse_u64_arg(value: &str, flag: &str) -> Result<u64, CliError> {
    value.parse::<u64>().map_err(|_| CliError {
        message: format!("{} requires a positive integer, got: {}", flag, value),
    })
}

fn run_build(config_path: Option<String>) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    build_bundle(&config)
}

fn run_watch(
    config_path: Option<String>,
    poll: bool,
    poll_interval_ms: u64,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let source_dir = PathBuf::from(&config.content.source_dir);

    build_bundle(&config)?;

    let (tx, rx) = channel();
    let mut watcher: Box<dyn notify::Watcher> = if poll {
        Box::new(
            notify::PollWatcher::new(
                tx,
                notify::Config::default()
                    .with_poll_interval(Duration::from_millis(poll_interval_ms)),
            )
            .map_err(|err| CliError {
                message: format!("failed to start poll watcher: {}", err),
            })?,
        )
    } else {
        Box::new(notify::recommended_watcher(tx).map_err(|err| CliError {
            message: format!("failed to start watcher: {}", err),
        })?)
    };

    watcher
        .watch(&source_dir, notify::RecursiveMode::Recursive)
        .map_err(|err| CliError {
            message: format!("failed to watch {}: {}", source_dir.display(), err),
        })?;

    if poll {
        eprintln!(
            "watching {} for changes (polling, press Ctrl+C to stop)...",
            source_dir.display()
        );
    } else {
        eprintln!(
            "watching {} for changes (press Ctrl+C to stop)...",
            source_dir.display()
        );
    }

    let mut last_event = Instant::now();
    loop {
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(event_result) => {
                let event = match event_result {
                    Ok(event) => event,
                    Err(err) => {
                        eprintln!("watch error: {}", err);
                        continue;
                    }
                };
                if should_ignore_event(&event, &config) {
                    continue;
                }
                if last_event.elapsed() < Duration::from_millis(200) {
                    continue;
                }
                last_event = Instant::now();
                eprintln!("change detected, rebuilding...");
                if let Err(err) = build_bundle(&config) {
                    eprintln!("build failed: {}", err.message);
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
            Err(_) => break,
        }
    }

    Ok(())
}

fn run_init() -> Result<(), CliError> {
    let config = config::default_config();
    let text = toml::to_string_pretty(&config).map_err(|err| CliError {
        message: format!("failed to serialize default config: {}", err),
    })?;
    fs::write(CONFIG_FILE_NAME, text).map_err(|err| CliError {
        message: format!("failed to write {}: {}", CONFIG_FILE_NAME, err),
    })?;
    eprintln!("wrote {}", CONFIG_FILE_NAME);
    Ok(())
}

fn load_config(config_path: Option<&str>) -> Result<Config, CliError> {
    let path = Path::new(config_path.unwrap_or(CONFIG_FILE_NAME));
    if !path.exists() {
        return Err(CliError {
            message: format!(
                "no config found at {}; run `blacksquare init` to create one",
                path.display()
            ),
        });
    }
    config::load(path).map_err(|err| CliError {
        message: err.message,
    })
}

fn build_bundle(config: &Config) -> Result<(), CliError> {
    let source_dir = Path::new(&config.content.source_dir);
    let text = scanner::read_text_from_dir(source_dir, &config.content.file_extension);
    let classes = scanner::collect_classes(&text);
    let css = generator::assemble(&classes, config);

    if !source_dir.exists() {
        fs::create_dir_all(source_dir).map_err(|err| CliError {
            message: format!(
                "failed to create source directory {}: {}",
                source_dir.display(),
                err
            ),
        })?;
    }
    let out_path = source_dir.join(&config.content.output_file);
    fs::write(&out_path, css).map_err(|err| CliError {
        message: format!("failed to write output {}: {}", out_path.display(), err),
    })?;
    eprintln!("wrote {} ({} classes)", out_path.display(), classes.len());
    Ok(())
}

fn should_ignore_event(event: &notify::Event, config: &Config) -> bool {
    if event.paths.is_empty() {
        return false;
    }
    event.paths.iter().all(|path| {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("");
        !file_name.contains(&config.content.file_extension)
            || file_name == config.content.output_file
    })
}

fn print_help() {
    println!("blacksquare - utility-first CSS generator");
    println!();
    println!("USAGE:");
    println!("  blacksquare [watch] [--config <file>] [--poll] [--poll-interval <ms>]");
    println!("  blacksquare build [--config <file>]");
    println!("  blacksquare init");
    println!();
    println!("COMMANDS:");
    println!("  watch    generate the stylesheet and regenerate on source changes (default)");
    println!("  build    generate the stylesheet once and exit");
    println!(
        "  init     write a default {} to the working directory",
        CONFIG_FILE_NAME
    );
    println!();
    println!("OPTIONS:");
    println!(
        "  --config, -c <file>   config file (default: {})",
        CONFIG_FILE_NAME
    );
    println!("  --poll                use a polling watcher instead of OS events");
    println!("  --poll-interval <ms>  polling interval in milliseconds (default: 500)");
}

#[cfg(test)]
mod tests {
    use super::{Command, build_bundle, load_config, parse_args, should_ignore_event};
    use crate::config::{Config, Content};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn no_args_defaults_to_watch() {
        let command = parse_args(Vec::new()).expect("parse should succeed");
        assert_eq!(
            command,
            Command::Watch {
                config: None,
                poll: false,
                poll_interval_ms: 500,
            }
        );
    }

    #[test]
    fn leading_flags_belong_to_watch() {
        let command = parse_args(vec!["--config".to_string(), "my.toml".to_string()])
            .expect("parse should succeed");
        assert_eq!(
            command,
            Command::Watch {
                config: Some("my.toml".to_string()),
                poll: false,
                poll_interval_ms: 500,
            }
        );
    }

    #[test]
    fn parse_build_supports_config_flag() {
        let command = parse_args(vec![
            "build".to_string(),
            "-c".to_string(),
            "other.toml".to_string(),
        ])
        .expect("parse should succeed");
        assert_eq!(
            command,
            Command::Build {
                config: Some("other.toml".to_string()),
            }
        );
    }

    #[test]
    fn parse_watch_supports_poll_interval() {
        let command = parse_args(vec![
            "watch".to_string(),
            "--poll-interval".to_string(),
            "100".to_string(),
        ])
        .expect("parse should succeed");
        assert_eq!(
            command,
            Command::Watch {
                config: None,
                poll: true,
                poll_interval_ms: 100,
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_command() {
        let err = parse_args(vec!["frobnicate".to_string()]).expect_err("parse should fail");
        assert!(err.message.contains("unknown command"));
    }

    #[test]
    fn parse_rejects_init_arguments() {
        let err = parse_args(vec!["init".to_string(), "extra".to_string()])
            .expect_err("parse should fail");
        assert!(err.message.contains("init takes no arguments"));
    }

    #[test]
    fn missing_config_suggests_init() {
        let path = temp_path("blacksquare_missing").join("nope.toml");
        let err =
            load_config(Some(path.to_str().expect("utf-8 path"))).expect_err("load should fail");
        assert!(err.message.contains("blacksquare init"), "{}", err.message);
    }

    #[test]
    fn build_bundle_writes_root_styles_for_empty_sources() {
        let base = temp_path("blacksquare_build");
        let _ = fs::create_dir_all(&base);
        let config = Config {
            content: Content {
                source_dir: base.to_str().expect("utf-8 path").to_string(),
                file_extension: ".jsx".to_string(),
                output_file: "out.css".to_string(),
            },
            ..crate::config::default_config()
        };

        build_bundle(&config).expect("build should succeed");
        let css = fs::read_to_string(base.join("out.css")).expect("output should exist");
        assert!(css.starts_with(":root{"));
        assert!(css.ends_with('}'));
        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn build_bundle_compiles_discovered_classes() {
        let base = temp_path("blacksquare_build_classes");
        let _ = fs::create_dir_all(&base);
        let _ = fs::write(
            base.join("app.jsx"),
            r#"<div className="oo-margin ee-padding_2 unrelated">hi</div>"#,
        );
        let config = Config {
            content: Content {
                source_dir: base.to_str().expect("utf-8 path").to_string(),
                file_extension: ".jsx".to_string(),
                output_file: "out.css".to_string(),
            },
            ..crate::config::default_config()
        };

        build_bundle(&config).expect("build should succeed");
        let css = fs::read_to_string(base.join("out.css")).expect("output should exist");
        assert!(css.contains(".oo-margin {margin:calc(var(--oo-margin));}"));
        assert!(css.contains(".ee-padding_2{padding:2rem}"));
        assert!(!css.contains("unrelated"));
        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn events_outside_extension_are_ignored() {
        let config = crate::config::default_config();
        let mut event = notify::Event::new(notify::EventKind::Any);
        event.paths.push(PathBuf::from("src/app.jsx"));
        assert!(!should_ignore_event(&event, &config));

        let mut css_event = notify::Event::new(notify::EventKind::Any);
        css_event.paths.push(PathBuf::from("src/blacksquare.css"));
        assert!(should_ignore_event(&css_event, &config));

        let mut other = notify::Event::new(notify::EventKind::Any);
        other.paths.push(PathBuf::from("src/readme.md"));
        assert!(should_ignore_event(&other, &config));
    }

    fn temp_path(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{}_{}", prefix, nanos))
    }
}
