//! Term Realms binary: CLI handling, terminal setup, and the outer screen
//! state machine driving the game modes.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use rand::Rng;
use ratatui::{backend::CrosstermBackend, Terminal};

use realms::catalog::Catalogs;
use realms::combat::{CombatAction, CombatOutcome, Encounter};
use realms::core::session::Session;
use realms::dungeon::generation::GeneratorParams;
use realms::dungeon::logic::{dungeon_frame, enter_dungeon, on_boss_defeated, step, StepOutcome};
use realms::error::AppError;
use realms::input::{is_cancel, movement_delta, CrosstermInput, InputSource, Key};
use realms::monster::Monster;
use realms::player::{ClassKind, Player};
use realms::render::FrameSink;
use realms::training::{
    apply_reward, run_kernel, training_hint, ArcherKernel, MeditationKernel, TrainingOutcome,
    WarriorKernel,
};
use realms::ui::TerminalUi;

struct CliOptions {
    seed: Option<u64>,
    ascii: bool,
    data_dir: PathBuf,
}

fn print_help() {
    println!("Term Realms - terminal dungeon RPG\n");
    println!("Usage: realms [options]\n");
    println!("Options:");
    println!("  --seed <n>    Seed the session RNG (reproducible runs)");
    println!("  --ascii       Restrict rendering to plain ASCII");
    println!("  --data <dir>  Catalog directory (default: data)");
    println!("  --version     Show version information");
    println!("  --help        Show this help message");
}

fn parse_args() -> Result<Option<CliOptions>, String> {
    let mut options = CliOptions {
        seed: None,
        ascii: std::env::var("REALMS_ASCII").map(|v| v == "1").unwrap_or(false),
        data_dir: PathBuf::from("data"),
    };
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            "--version" | "-v" => {
                println!("realms {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            "--ascii" => options.ascii = true,
            "--seed" => {
                index += 1;
                let value = args.get(index).ok_or("--seed requires a number")?;
                options.seed = Some(value.parse().map_err(|_| "--seed requires a number")?);
            }
            "--data" => {
                index += 1;
                let value = args.get(index).ok_or("--data requires a directory")?;
                options.data_dir = PathBuf::from(value);
            }
            other => return Err(format!("unknown option: {}", other)),
        }
        index += 1;
    }
    Ok(Some(options))
}

fn main() -> ExitCode {
    let options = match parse_args() {
        Ok(Some(options)) => options,
        Ok(None) => return ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'realms --help' for usage.");
            return ExitCode::FAILURE;
        }
    };

    // Catalog problems are configuration errors: report and stop before
    // touching the terminal.
    let catalogs = match Catalogs::load(&options.data_dir) {
        Ok(catalogs) => catalogs,
        Err(error) => {
            eprintln!("catalog error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let result = with_terminal(options.ascii, |ui, input| {
        run_game(ui, input, catalogs, options.seed)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("fatal: {}", error);
            ExitCode::FAILURE
        }
    }
}

/// Raw-mode/alternate-screen bracket around the game; teardown runs even
/// when the game errors out.
fn with_terminal<F>(ascii: bool, run: F) -> Result<(), AppError>
where
    F: FnOnce(&mut TerminalUi, &mut CrosstermInput) -> Result<(), AppError>,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    let mut ui = TerminalUi::new(terminal, ascii);
    let mut input = CrosstermInput;

    let result = run(&mut ui, &mut input);

    let _ = disable_raw_mode();
    let _ = io::stdout().execute(LeaveAlternateScreen);
    result
}

fn run_game(
    ui: &mut TerminalUi,
    input: &mut CrosstermInput,
    catalogs: Catalogs,
    seed: Option<u64>,
) -> Result<(), AppError> {
    loop {
        let choice = ui.menu(
            input,
            "TERM REALMS",
            "A dungeon crawl in your terminal.",
            &["Create Character".to_string(), "Exit".to_string()],
            None,
        )?;
        match choice {
            Some(0) => {}
            _ => return Ok(()),
        }

        let Some(player) = create_character(ui, input)? else {
            continue;
        };
        let mut session = Session::new(player, catalogs.clone(), seed);

        let opening =
            session.catalogs.opening_lines[session.rng.gen_range(0..session.catalogs.opening_lines.len())]
                .clone();
        ui.toast(input, &opening)?;

        town_loop(ui, input, &mut session)?;
    }
}

fn create_character(
    ui: &mut TerminalUi,
    input: &mut CrosstermInput,
) -> Result<Option<Player>, AppError> {
    let class_options: Vec<String> = ClassKind::ALL
        .iter()
        .map(|class| {
            let (hp, mp, strength, defense, speed) = class.base_stats();
            format!(
                "{:<8} HP {:>3}  MP {:>2}  STR {:>2}  DEF {:>2}  SPD {:>2}",
                class.name(),
                hp,
                mp,
                strength,
                defense,
                speed
            )
        })
        .collect();
    let Some(class_index) = ui.menu(
        input,
        "CHOOSE CLASS",
        "Each class trains differently.",
        &class_options,
        None,
    )?
    else {
        return Ok(None);
    };
    let class = ClassKind::ALL[class_index];

    let Some(name) = ui.name_entry(input)? else {
        return Ok(None);
    };
    Ok(Some(Player::new(name, class)))
}

fn town_loop(
    ui: &mut TerminalUi,
    input: &mut CrosstermInput,
    session: &mut Session,
) -> Result<(), AppError> {
    let options = [
        "Enter Dungeon".to_string(),
        "Training".to_string(),
        "Market".to_string(),
        "Status".to_string(),
        "Quit".to_string(),
    ];
    loop {
        let status = format!(
            "{} | Lv {} | HP {}/{} | Gold {} | Depth {}",
            session.player.name,
            session.player.level,
            session.player.hp,
            session.player.max_hp,
            session.player.gold,
            session.depth
        );
        let choice = ui.menu(
            input,
            "TOWN",
            "Rest between runs, then descend.",
            &options,
            Some(&status),
        )?;
        match choice {
            Some(0) => {
                if !dungeon_mode(ui, input, session)? {
                    ui.toast(input, "You were defeated. The run ends here.")?;
                    return Ok(());
                }
            }
            Some(1) => training_mode(ui, input, session)?,
            Some(2) => market_mode(ui, input, session)?,
            Some(3) => ui.status_screen(input, &session.player)?,
            _ => return Ok(()),
        }
    }
}

/// One dungeon visit. Returns false when the player died.
fn dungeon_mode(
    ui: &mut TerminalUi,
    input: &mut CrosstermInput,
    session: &mut Session,
) -> Result<bool, AppError> {
    let params = GeneratorParams::default();
    let mut dungeon = enter_dungeon(session.depth, &params, &mut session.rng)?;

    loop {
        ui.present(&dungeon_frame(&dungeon, &session.player))?;
        let key = input.wait()?;
        if is_cancel(key) {
            return Ok(true);
        }
        let Some((dx, dy)) = movement_delta(key) else {
            dungeon.message = "Use W/A/S/D or arrow keys.".to_string();
            continue;
        };

        match step(
            &mut dungeon,
            &mut session.player,
            &session.catalogs,
            dx,
            dy,
            &mut session.rng,
        ) {
            StepOutcome::Stayed | StepOutcome::Moved => {}
            StepOutcome::Encounter(monster) => {
                match combat_mode(ui, input, session, monster)? {
                    CombatOutcome::Defeat => return Ok(false),
                    CombatOutcome::Victory { .. } | CombatOutcome::Fled => {}
                }
            }
            StepOutcome::BossEncounter(monster) => {
                let boss_name = monster.name.clone();
                match combat_mode(ui, input, session, monster)? {
                    CombatOutcome::Defeat => return Ok(false),
                    CombatOutcome::Victory { .. } => {
                        on_boss_defeated(
                            &mut dungeon,
                            &mut session.player,
                            &boss_name,
                            &mut session.rng,
                        );
                    }
                    CombatOutcome::Fled => {
                        dungeon.message = "You slip away. The boss waits.".to_string();
                    }
                }
            }
            StepOutcome::ExitReached { bonus_gold } => {
                session.depth += 1;
                ui.toast(
                    input,
                    &format!(
                        "Door reached. +{} gold. Dungeon level {}.",
                        bonus_gold, session.depth
                    ),
                )?;
                return Ok(true);
            }
        }
    }
}

fn combat_mode(
    ui: &mut TerminalUi,
    input: &mut CrosstermInput,
    session: &mut Session,
    monster: Monster,
) -> Result<CombatOutcome, AppError> {
    let mut encounter = Encounter::new(monster);
    let mut log = vec![encounter.opening().to_string()];
    let mut selected = 0usize;

    loop {
        ui.draw_combat(&encounter, &session.player, &log, selected)?;
        match input.wait()? {
            Key::Up | Key::Char('w') | Key::Char('W') => {
                selected = selected.checked_sub(1).unwrap_or(CombatAction::ALL.len() - 1);
            }
            Key::Down | Key::Char('s') | Key::Char('S') => {
                selected = (selected + 1) % CombatAction::ALL.len();
            }
            Key::Enter => {
                let action = CombatAction::ALL[selected];
                let skills = session.catalogs.skills_for(session.player.class);
                let events =
                    encounter.resolve_round(&mut session.player, skills, action, &mut session.rng);
                log.extend(events.iter().map(ToString::to_string));

                if let Some(outcome) = encounter.outcome() {
                    let message = match outcome {
                        CombatOutcome::Victory { xp, gold, leveled } => {
                            let mut message = format!("Victory: +{} XP, +{} gold", xp, gold);
                            if leveled {
                                message.push_str(" | LEVEL UP");
                            }
                            message
                        }
                        CombatOutcome::Fled => "You escaped the battle.".to_string(),
                        CombatOutcome::Defeat => "You were defeated.".to_string(),
                    };
                    ui.toast(input, &message)?;
                    return Ok(outcome);
                }
            }
            _ => {}
        }
    }
}

fn training_mode(
    ui: &mut TerminalUi,
    input: &mut CrosstermInput,
    session: &mut Session,
) -> Result<(), AppError> {
    ui.toast(input, training_hint(session.player.class))?;

    let reward = match session.player.class {
        ClassKind::Warrior => {
            let kernel = WarriorKernel::new(44, 16);
            run_kernel(kernel, &mut session.rng, input, ui)?.reward()
        }
        ClassKind::Mage => {
            let kernel = MeditationKernel::new(40, 14);
            run_kernel(kernel, &mut session.rng, input, ui)?.reward()
        }
        ClassKind::Archer => {
            let kernel = ArcherKernel::new(60, 16);
            run_kernel(kernel, &mut session.rng, input, ui)?.reward()
        }
    };

    let (message, _leveled) = apply_reward(&mut session.player, &reward);
    ui.toast(input, &message)?;
    Ok(())
}

fn market_mode(
    ui: &mut TerminalUi,
    input: &mut CrosstermInput,
    session: &mut Session,
) -> Result<(), AppError> {
    loop {
        let mut options: Vec<String> = session
            .catalogs
            .potions
            .iter()
            .map(|potion| {
                format!(
                    "{} ({}g) +{} potion(s) - {}",
                    potion.name, potion.price, potion.stock_amount, potion.description
                )
            })
            .collect();
        options.push("Back".to_string());

        let title = format!("MARKET | Gold: {}", session.player.gold);
        let choice = ui.menu(
            input,
            &title,
            "Buy supplies before the next run.",
            &options,
            None,
        )?;
        let Some(choice) = choice else {
            return Ok(());
        };
        if choice == options.len() - 1 {
            return Ok(());
        }

        let potion = session.catalogs.potions[choice].clone();
        if session.player.gold < potion.price {
            ui.toast(input, "Not enough gold.")?;
            continue;
        }
        session.player.gold -= potion.price;
        session.player.potions += potion.stock_amount;
        ui.toast(input, &format!("Bought {}.", potion.name))?;
    }
}
