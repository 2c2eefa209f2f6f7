use std::sync::mpsc;
use std::{env, path::PathBuf, process, thread};

use sysmark::{
    BenchmarkEngine, BenchmarkKey, Catalog, CatalogConfig, ChannelReporter, ResultStore,
    StoreConfig, SysmarkError,
};

struct CliConfig {
    data_dir: PathBuf,
    quick: bool,
    command: String,
    key: Option<String>,
}

impl CliConfig {
    fn help() -> &'static str {
        "sysmark - system benchmark suite\n\
         \n\
         usage: sysmark [--data-dir DIR] [--quick] <command> [key]\n\
         \n\
         commands:\n\
         \x20 list             list benchmark keys\n\
         \x20 run <key>        run one benchmark and save the result\n\
         \x20 history <key>    print saved runs with trend annotations\n\
         \x20 latest           print the last saved result per key\n\
         \x20 delete <key>     delete a key's entire history\n\
         \n\
         The data directory defaults to ./data, or SYSMARK_DATA_DIR when set.\n\
         --quick runs reduced workloads (smoke-test sizing, not comparable\n\
         with standard results)."
    }

    fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut data_dir = env::var("SYSMARK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let mut quick = false;
        let mut positional = Vec::new();
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match *arg {
                "--data-dir" => {
                    let value = iter.next().ok_or("--data-dir requires a value")?;
                    data_dir = PathBuf::from(value);
                }
                "--quick" => quick = true,
                flag if flag.starts_with("--") => {
                    return Err(format!("unknown flag {flag}"));
                }
                value => positional.push(value.to_string()),
            }
        }
        let mut positional = positional.into_iter();
        let command = positional.next().ok_or("missing command")?;
        Ok(Self {
            data_dir,
            quick,
            command,
            key: positional.next(),
        })
    }

    fn require_key(&self) -> Result<BenchmarkKey, String> {
        let key = self
            .key
            .as_deref()
            .ok_or_else(|| format!("{} requires a benchmark key", self.command))?;
        BenchmarkKey::parse(key).map_err(|e| e.to_string())
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CliConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let config = match CliConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("{}", CliConfig::help());
            process::exit(2);
        }
    };

    if let Err(err) = run_command(&config) {
        eprintln!("command failed: {err}");
        process::exit(1);
    }
}

fn build_engine(config: &CliConfig) -> BenchmarkEngine {
    let catalog_config = if config.quick {
        CatalogConfig::quick(env::temp_dir())
    } else {
        CatalogConfig::standard(env::temp_dir())
    };
    let store = ResultStore::new(StoreConfig::new(&config.data_dir));
    BenchmarkEngine::new(Catalog::new(catalog_config), store)
}

fn run_command(config: &CliConfig) -> Result<(), String> {
    match config.command.as_str() {
        "list" => {
            for key in BenchmarkEngine::list_benchmark_keys() {
                println!("{key:<18}{}", key.label());
            }
            Ok(())
        }
        "run" => {
            let key = config.require_key()?;
            let engine = build_engine(config);
            run_benchmark(&engine, key).map_err(|e| e.to_string())
        }
        "history" => {
            let key = config.require_key()?;
            let engine = build_engine(config);
            print_history(&engine, key);
            Ok(())
        }
        "latest" => {
            let engine = build_engine(config);
            let latest = engine.latest();
            if latest.is_empty() {
                println!("no saved results");
                return Ok(());
            }
            for (key, entry) in latest {
                println!(
                    "{key:<18}{:.2} {}  ({})",
                    entry.result.primary_metric, entry.result.unit, entry.timestamp
                );
            }
            Ok(())
        }
        "delete" => {
            let key = config.require_key()?;
            let engine = build_engine(config);
            engine.delete_history(key).map_err(|e| e.to_string())?;
            println!("[OK] History for {key} deleted");
            Ok(())
        }
        other => Err(format!("unknown command {other}")),
    }
}

fn run_benchmark(engine: &BenchmarkEngine, key: BenchmarkKey) -> Result<(), SysmarkError> {
    // Drain progress on a separate thread so lines appear as they are
    // emitted, in order, while the benchmark blocks this one.
    let (reporter, rx) = ChannelReporter::new();
    let printer = spawn_printer(rx);
    let outcome = engine.run(key, &reporter);
    drop(reporter);
    let _ = printer.join();
    let result = outcome?;
    println!(
        "{}: {:.2} {}",
        key.label(),
        result.primary_metric,
        result.unit
    );
    for (name, value) in &result.extra {
        println!("  {name}: {value:.2}");
    }
    Ok(())
}

fn spawn_printer(rx: mpsc::Receiver<String>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in rx {
            println!("{line}");
        }
    })
}

fn print_history(engine: &BenchmarkEngine, key: BenchmarkKey) {
    let entries = engine.history(key);
    if entries.is_empty() {
        println!("no results for {key}");
        return;
    }
    let summary = engine.trend(key);
    let unit = entries[0].result.unit.clone();
    println!(
        "{} - {} runs, average {:.2} {unit}{}",
        key.label(),
        entries.len(),
        summary.mean,
        if summary.lower_is_better {
            " (lower is better)"
        } else {
            ""
        }
    );
    for (entry, point) in entries.iter().zip(&summary.points) {
        let change = match point.percent_change {
            Some(pct) => format!("{}{pct:.1}%", if pct > 0.0 { "+" } else { "" }),
            None => "n/a".to_string(),
        };
        println!(
            "  {}  {:>12.2} {unit}  {change}",
            entry.timestamp, point.value
        );
    }
}
