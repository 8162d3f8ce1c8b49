//! `ffsim` - play, replay and check freight forwarding training cases

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ffsim_content::{builtin_library, CaseId, Library};
use ffsim_engine::test_harness::{run_simulator, SimulatorConfig, TestHarness};
use ffsim_engine::{
    logging, AppConfig, GradingScheme, Progression, ProgressionEngine, Report, Session, StageView,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn cli() -> Command {
    Command::new("ffsim")
        .version(ffsim_engine::VERSION)
        .about("Freight forwarding training simulator")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to ffsim.toml"),
        )
        .arg(
            Arg::new("content")
                .long("content")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Content pack (YAML or JSON) instead of the built-in cases"),
        )
        .arg(
            Arg::new("grading")
                .long("grading")
                .global(true)
                .value_parser(["tiered", "strict"])
                .help("Grade table"),
        )
        .subcommand(Command::new("cases").about("List available cases"))
        .subcommand(
            Command::new("play")
                .about("Play a case")
                .arg(Arg::new("case").required(true).help("Case id"))
                .arg(
                    Arg::new("choices")
                        .long("choices")
                        .value_delimiter(',')
                        .help("Comma-separated choice ids instead of prompting"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the report as JSON"),
                )
                .arg(
                    Arg::new("save")
                        .long("save")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write a transcript of the playthrough"),
                ),
        )
        .subcommand(
            Command::new("replay")
                .about("Replay a saved transcript")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the report as JSON"),
                ),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run randomized playthroughs and check invariants")
                .arg(
                    Arg::new("runs")
                        .long("runs")
                        .default_value("1000")
                        .value_parser(value_parser!(u64))
                        .help("Number of sessions"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first violation"),
                ),
        )
        .subcommand(Command::new("check").about("Audit content and certify it against the engine"))
}

fn main() -> Result<ExitCode> {
    let matches = cli().get_matches();

    let mut config = AppConfig::load_or_default(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    if let Some(path) = matches.get_one::<PathBuf>("content") {
        config.content.path = Some(path.clone());
    }
    if let Some(scheme) = matches.get_one::<String>("grading") {
        config.engine.grading = match scheme.as_str() {
            "strict" => GradingScheme::Strict,
            _ => GradingScheme::Tiered,
        };
    }
    logging::init(&config.log);

    let library = load_library(config.content.path.as_deref())?;
    let engine = ProgressionEngine::from_library(library, config.engine);

    match matches.subcommand() {
        Some(("cases", _)) => {
            list_cases(&engine);
            Ok(ExitCode::SUCCESS)
        }
        Some(("play", args)) => play(&engine, args),
        Some(("replay", args)) => replay(&engine, args),
        Some(("simulate", args)) => {
            let sim = SimulatorConfig {
                seed: args.get_one::<u64>("seed").copied().unwrap_or(42),
                runs: args.get_one::<u64>("runs").copied().unwrap_or(1_000),
                stop_on_first_violation: args.get_flag("stop-on-violation"),
                ..Default::default()
            };
            let report = run_simulator(&engine, sim);
            println!("{}", report.generate_text());
            Ok(exit_status(report.passed()))
        }
        Some(("check", _)) => Ok(check(&engine)),
        _ => unreachable!("subcommand is required"),
    }
}

fn load_library(path: Option<&Path>) -> Result<Library> {
    match path {
        Some(path) => Library::from_path(path)
            .with_context(|| format!("loading content pack {}", path.display())),
        None => builtin_library().context("loading built-in content"),
    }
}

fn exit_status(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn list_cases(engine: &ProgressionEngine) {
    for case in engine.catalog().iter() {
        println!(
            "{:<10} {:<8} {:>2} stages  {}",
            case.id,
            case.difficulty,
            case.stage_count(),
            case.title
        );
    }
}

fn play(engine: &ProgressionEngine, args: &ArgMatches) -> Result<ExitCode> {
    let case_id = args
        .get_one::<String>("case")
        .map(|s| CaseId::from(s.as_str()))
        .context("case id is required")?;
    let scripted: Option<Vec<String>> = args
        .get_many::<String>("choices")
        .map(|values| values.cloned().collect());

    let (mut session, mut view) = engine.start_session(&case_id)?;

    match scripted {
        Some(choices) => {
            for input in choices {
                if session.is_terminal() {
                    bail!("choice {input} given after the session ended");
                }
                let choice = view.choice_for_input(&input);
                if let Some(next) = engine.resolve_choice(&mut session, &choice)?.next {
                    view = next;
                }
            }
        }
        None => {
            let stdin = io::stdin();
            let mut lines = stdin.lock().lines();
            loop {
                print_view(&view);
                print!("> ");
                io::stdout().flush()?;

                let Some(line) = lines.next().transpose()? else {
                    bail!("input closed before the case ended");
                };
                let choice = view.choice_for_input(&line);
                match engine.resolve_choice(&mut session, &choice) {
                    Ok(transition) => match transition.next {
                        Some(next) => view = next,
                        None => {
                            println!("\n{}\n", transition.feedback.text);
                            break;
                        }
                    },
                    Err(err) if err.is_recoverable() => println!("{err}"),
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }

    let report = engine.finalize_session(&session)?;
    print_report(&report, args.get_flag("json"))?;

    if let Some(path) = args.get_one::<PathBuf>("save") {
        save_transcript(engine, &session, path)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn replay(engine: &ProgressionEngine, args: &ArgMatches) -> Result<ExitCode> {
    let path = args.get_one::<PathBuf>("file").context("transcript path is required")?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading transcript {}", path.display()))?;
    let transcript = ffsim_engine::Transcript::from_json(&raw)
        .with_context(|| format!("parsing transcript {}", path.display()))?;

    let replay = engine.replay(&transcript)?;
    print_report(&replay.report, args.get_flag("json"))?;
    Ok(ExitCode::SUCCESS)
}

fn check(engine: &ProgressionEngine) -> ExitCode {
    let gaps = TestHarness::audit_content(engine);
    for gap in &gaps {
        println!("missing content: {}/{}", gap.case, gap.stage);
    }

    let report = TestHarness::run_certification(engine, 10, 500);
    println!(
        "{} cases, {} sessions over {} seeds, {} violations",
        engine.catalog().len(),
        report.sessions,
        report.seeds_tested,
        report.total_violations
    );

    let ok = gaps.is_empty() && report.passed;
    println!("{}", if ok { "PASS" } else { "FAIL" });
    exit_status(ok)
}

fn print_view(view: &StageView) {
    if let Some(feedback) = &view.feedback {
        println!("\n{}", feedback.text);
        println!("({})", feedback.scores);
    }
    println!("\n[{}/{}] {}\n", view.position, view.total, view.title);
    println!("{}\n", view.narrative);
    for choice in &view.choices {
        println!("  {}. {}", choice.id, choice.text);
    }
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

fn save_transcript(engine: &ProgressionEngine, session: &Session, path: &Path) -> Result<()> {
    let json = engine.transcript(session).to_json()?;
    std::fs::write(path, json).with_context(|| format!("writing transcript {}", path.display()))?;
    tracing::info!("Transcript saved to {}", path.display());
    Ok(())
}
