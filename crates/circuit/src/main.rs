//! Circuit CLI
//!
//! Register players, record stage results and print tournament rankings.

use chrono::Utc;
use circuit::circuit_core::{
    calculate_points, NewPlayer, NewTournament, StageEntry, STAGES_PER_TOURNAMENT,
};
use circuit::{report_file_name, Circuit, CircuitConfig, SqliteStore, DEFAULT_CONFIG_FILE};
use std::env;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn Error>>;

fn print_usage() {
    println!("Poker Circuit Runner");
    println!();
    println!("Usage:");
    println!("  circuit [--config PATH] <command>");
    println!();
    println!("Commands:");
    println!("  player add <full_name> <pix_key> <identifier>");
    println!("  player list");
    println!("  player remove <player_id>");
    println!("  tournament add <name> [--year Y] [--description TEXT] [--start DATE] [--end DATE]");
    println!("  tournament list");
    println!("  tournament remove <tournament_id>");
    println!("  tournament stages <tournament_id>");
    println!("  stage submit <stage_id> <player_id:position>...");
    println!("  stage show <stage_id>");
    println!("  stage clear <stage_id>");
    println!("  ranking <tournament_id> [--json PATH]");
    println!("  points <position> <participants> [--final]");
    println!();
    println!("Examples:");
    println!("  circuit tournament add \"Season 2026\" --year 2026");
    println!("  circuit stage submit 3 4:1 7:2 2:3");
    println!("  circuit ranking 1 --json reports/season.json");
}

fn parse_id(value: Option<&String>, what: &str) -> Result<i64, Box<dyn Error>> {
    let raw = value.ok_or_else(|| format!("missing {}", what))?;
    raw.parse()
        .map_err(|_| format!("invalid {}: {}", what, raw).into())
}

fn parse_entry(arg: &str) -> Result<StageEntry, Box<dyn Error>> {
    let (player, position) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected player_id:position, got {}", arg))?;
    let player_id = player
        .parse()
        .map_err(|_| format!("invalid player id in {}", arg))?;
    let position = position
        .parse()
        .map_err(|_| format!("invalid position in {}", arg))?;
    Ok(StageEntry::new(player_id, position))
}

fn open_circuit(config: &CircuitConfig) -> Result<Circuit<SqliteStore>, Box<dyn Error>> {
    let store = SqliteStore::open(&config.database_path)?;
    Ok(Circuit::new(store))
}

fn run_player(args: &[String], config: &CircuitConfig) -> CliResult {
    let mut circuit = open_circuit(config)?;
    match args.first().map(String::as_str) {
        Some("add") => {
            if args.len() < 4 {
                return Err("player add requires a name, a pix key and an identifier".into());
            }
            let player = circuit.register_player(NewPlayer {
                full_name: args[1].clone(),
                pix_key: args[2].clone(),
                unique_identifier: args[3].clone(),
            })?;
            println!("Registered player {} ({})", player.id, player.full_name);
        }
        Some("list") => {
            let players = circuit.list_players()?;
            if players.is_empty() {
                println!("No players registered.");
                return Ok(());
            }
            println!("{:>5}  {:<28} {:<16} {}", "ID", "Name", "Identifier", "PIX");
            for p in players {
                println!(
                    "{:>5}  {:<28} {:<16} {}",
                    p.id, p.full_name, p.unique_identifier, p.pix_key
                );
            }
        }
        Some("remove") => {
            let id = parse_id(args.get(1), "player id")?;
            circuit.deactivate_player(id)?;
            println!("Player {} deactivated", id);
        }
        _ => return Err("player expects add, list or remove".into()),
    }
    Ok(())
}

fn run_tournament(args: &[String], config: &CircuitConfig) -> CliResult {
    let mut circuit = open_circuit(config)?;
    match args.first().map(String::as_str) {
        Some("add") => {
            let name = args.get(1).ok_or("tournament add requires a name")?;
            let mut tournament = NewTournament {
                name: name.clone(),
                ..Default::default()
            };

            let mut i = 2;
            while i < args.len() {
                let value = args.get(i + 1).cloned();
                match args[i].as_str() {
                    "--year" | "-y" => {
                        let raw = value.ok_or("--year needs a value")?;
                        tournament.year =
                            Some(raw.parse().map_err(|_| format!("invalid year: {}", raw))?);
                        i += 1;
                    }
                    "--description" | "-d" => {
                        tournament.description = Some(value.ok_or("--description needs a value")?);
                        i += 1;
                    }
                    "--start" => {
                        tournament.start_date = Some(value.ok_or("--start needs a value")?);
                        i += 1;
                    }
                    "--end" => {
                        tournament.end_date = Some(value.ok_or("--end needs a value")?);
                        i += 1;
                    }
                    other => return Err(format!("unknown option: {}", other).into()),
                }
                i += 1;
            }

            let created = circuit.create_tournament(tournament)?;
            println!(
                "Created tournament {} ({}) with {} stages",
                created.id, created.name, STAGES_PER_TOURNAMENT
            );
        }
        Some("list") => {
            let tournaments = circuit.list_tournaments()?;
            if tournaments.is_empty() {
                println!("No tournaments yet.");
                return Ok(());
            }
            for t in tournaments {
                let year = t.year.map(|y| y.to_string()).unwrap_or_default();
                println!("{:>5}  {:<32} {}", t.id, t.name, year);
            }
        }
        Some("remove") => {
            let id = parse_id(args.get(1), "tournament id")?;
            circuit.delete_tournament(id)?;
            println!("Tournament {} deleted", id);
        }
        Some("stages") => {
            let id = parse_id(args.get(1), "tournament id")?;
            for stage in circuit.stages(id)? {
                let status = if stage.is_completed {
                    format!("completed, {} players", stage.total_participants)
                } else {
                    "pending".to_string()
                };
                let kind = if stage.is_final_stage { " [final]" } else { "" };
                println!("{:>5}  {:<10}{:<8} {}", stage.id, stage.name, kind, status);
            }
        }
        _ => return Err("tournament expects add, list, remove or stages".into()),
    }
    Ok(())
}

fn run_stage(args: &[String], config: &CircuitConfig) -> CliResult {
    let mut circuit = open_circuit(config)?;
    let stage_id = parse_id(args.get(1), "stage id")?;
    match args.first().map(String::as_str) {
        Some("submit") => {
            let entries = args[2..]
                .iter()
                .map(|a| parse_entry(a))
                .collect::<Result<Vec<_>, _>>()?;
            let stage = circuit.submit_stage_results(stage_id, &entries)?;
            println!(
                "Saved {} results for {}",
                stage.total_participants, stage.name
            );
            print_stage_results(&circuit, stage_id)?;
        }
        Some("show") => print_stage_results(&circuit, stage_id)?,
        Some("clear") => {
            let stage = circuit.clear_stage_results(stage_id)?;
            println!("Cleared results of {}", stage.name);
        }
        _ => return Err("stage expects submit, show or clear".into()),
    }
    Ok(())
}

fn print_stage_results(circuit: &Circuit<SqliteStore>, stage_id: i64) -> CliResult {
    let stage = circuit.stage(stage_id)?;
    let results = circuit.stage_results(stage_id)?;
    println!("=== {} ===", stage.name);
    if results.is_empty() {
        println!("No results recorded.");
        return Ok(());
    }
    for r in results {
        println!(
            "{:>4}  {:<28} {:>4} pts",
            r.final_position, r.player_name, r.points_earned
        );
    }
    Ok(())
}

fn run_ranking(args: &[String], config: &CircuitConfig) -> CliResult {
    let circuit = open_circuit(config)?;
    let tournament_id = parse_id(args.first(), "tournament id")?;

    let mut json_path: Option<PathBuf> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--json" | "-j" => {
                json_path = Some(match args.get(i + 1) {
                    Some(path) => {
                        i += 1;
                        PathBuf::from(path)
                    }
                    None => PathBuf::new(),
                });
            }
            other => return Err(format!("unknown option: {}", other).into()),
        }
        i += 1;
    }

    let report = circuit.ranking_report(tournament_id)?;
    report.print_report(config.hide_zero_point_players);

    if let Some(path) = json_path {
        let path = if path.as_os_str().is_empty() {
            config.report_dir.join(format!(
                "{}.json",
                report_file_name(&report.tournament.name, Utc::now().date_naive())
            ))
        } else {
            path
        };
        report.save_json(&path)?;
        println!("Ranking exported to {}", path.display());
    }
    Ok(())
}

fn run_points(args: &[String]) -> CliResult {
    if args.len() < 2 {
        return Err("points requires a position and a participant count".into());
    }
    let position: u32 = args[0]
        .parse()
        .map_err(|_| format!("invalid position: {}", args[0]))?;
    let participants: u32 = args[1]
        .parse()
        .map_err(|_| format!("invalid participant count: {}", args[1]))?;
    if position == 0 || position > participants {
        return Err("position must be between 1 and the participant count".into());
    }
    let is_final = args[2..].iter().any(|a| a == "--final" || a == "-f");

    println!(
        "Position {} of {}{}: {} points",
        position,
        participants,
        if is_final { " (final stage)" } else { "" },
        calculate_points(position, participants, is_final)
    );
    Ok(())
}

fn init_tracing(config: &CircuitConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 {
            eprintln!("Error: --config requires a path");
            std::process::exit(1);
        }
        config_path = PathBuf::from(&args[1]);
        args.drain(..2);
    }

    let config = match CircuitConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    if args.is_empty() {
        print_usage();
        return;
    }

    let result = match args[0].as_str() {
        "player" => run_player(&args[1..], &config),
        "tournament" => run_tournament(&args[1..], &config),
        "stage" => run_stage(&args[1..], &config),
        "ranking" => run_ranking(&args[1..], &config),
        "points" => run_points(&args[1..]),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
