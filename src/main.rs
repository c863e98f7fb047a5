use clap::Parser;
use exam_prep::app::report::{render_catalog, render_exam, render_history};
use exam_prep::config::Command;
use exam_prep::core::history::{export_csv, read_history};
use exam_prep::domain::ports::ResultSink;
use exam_prep::utils::error::ErrorSeverity;
use exam_prep::utils::logger;
use exam_prep::{
    take_exam, AttemptPlan, CliConfig, ExamEngine, ExamError, HistorySink, LocalStorage,
    NoHistory, Settings, TerminalRunner,
};

type Engine = ExamEngine<LocalStorage, Box<dyn ResultSink>>;

fn build_engine(settings: &Settings, history: bool) -> Engine {
    let sink: Box<dyn ResultSink> = if history {
        Box::new(HistorySink::new(LocalStorage::new(&settings.history_folder)))
    } else {
        Box::new(NoHistory)
    };
    ExamEngine::new(
        LocalStorage::new(&settings.exam_folder),
        sink,
        settings.seed_example,
    )
}

async fn take(
    settings: &Settings,
    name: &str,
    plan: AttemptPlan,
    history: bool,
) -> exam_prep::Result<()> {
    let mut engine = build_engine(settings, history);
    engine.load().await?;

    let stdin = std::io::stdin();
    let mut runner = TerminalRunner::new(stdin.lock(), std::io::stdout());
    let results = take_exam(&engine, &mut runner, name, plan).await?;
    tracing::debug!("Finished {} attempts at '{}'", results.len(), name);
    Ok(())
}

async fn run(command: Command, settings: &Settings) -> exam_prep::Result<()> {
    match command {
        Command::List => {
            let mut engine = build_engine(settings, false);
            let catalog = engine.load().await?;
            print!("{}", render_catalog(catalog));
        }
        Command::Show { name } => {
            let mut engine = build_engine(settings, false);
            engine.load().await?;
            print!("{}", render_exam(engine.exam(&name)?));
        }
        Command::Check => {
            let engine = build_engine(settings, false);
            let checks = engine.check().await?;
            let failed = checks.iter().filter(|c| !c.is_ok()).count();
            for check in &checks {
                match &check.outcome {
                    Ok(name) => println!("✅ {}: {}", check.file, name),
                    Err(e) => println!("❌ {}: {}", check.file, e),
                }
            }
            println!("{} files checked, {} with problems", checks.len(), failed);
            if failed > 0 {
                return Err(ExamError::ValidationError {
                    message: format!("{} of {} exam files are invalid", failed, checks.len()),
                });
            }
        }
        Command::Take {
            name,
            shuffle,
            seed,
            no_history,
        } => {
            let plan = AttemptPlan {
                shuffle: shuffle || seed.is_some() || settings.shuffle,
                seed,
            };
            take(settings, &name, plan, settings.history_enabled && !no_history).await?;
        }
        Command::History { exam, csv } => {
            let storage = LocalStorage::new(&settings.history_folder);
            let entries = read_history(&storage, exam.as_deref()).await?;
            match csv {
                Some(path) => {
                    let file = std::fs::File::create(&path)?;
                    export_csv(&entries, file)?;
                    tracing::info!("📁 Wrote {} results to {}", entries.len(), path.display());
                    println!("📁 Wrote {} results to {}", entries.len(), path.display());
                }
                None => print!("{}", render_history(&entries)),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match Settings::resolve(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(
        cli.verbose,
        Some(settings.log_level.as_str()),
        settings.log_format,
    );

    tracing::info!("🚀 Starting exam-prep");
    tracing::debug!("Settings: {:?}", settings);

    if let Err(e) = run(cli.command.unwrap_or(Command::List), &settings).await {
        tracing::error!(
            "❌ exam-prep failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
