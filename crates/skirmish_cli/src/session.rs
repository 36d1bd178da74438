//! Console flows behind the subcommands, generic over their input and output
//! so they can be driven from tests.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use skirmish_core::{
    Battle, BattleEvent, BuffCode, Dice, EventLog, Outcome, SimulationRng, Team, UnitKind,
};
use skirmish_kit::{BuildCommand, GameConfig, History, Purchase, SaveGame, TeamDraft};
use tracing::{info, warn};

const DEFAULT_SAVE_PATH: &str = "skirmish.save";

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Writes `text` as-is; for values whose `Display` already ends a line.
    pub fn show(&mut self, text: impl Display) -> Result<()> {
        write!(self.output, "{text}")?;
        Ok(())
    }

    /// Prompts and reads one trimmed line. `None` once input is closed.
    pub fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Yes/No question. Closed input counts as No.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        loop {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(false);
            };
            match answer.to_ascii_lowercase().as_str() {
                "yes" | "y" => return Ok(true),
                "no" | "n" => return Ok(false),
                _ => self.say("Please answer Yes or No.")?,
            }
        }
    }

    fn ask_name(&mut self, prompt: &str) -> Result<String> {
        loop {
            match self.ask(prompt)? {
                None => bail!("input closed before a team name was given"),
                Some(name) if name.is_empty() => self.say("A team needs a name.")?,
                Some(name) => return Ok(name),
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Everything needed to report on a battle once it is over.
#[derive(Debug)]
pub struct Finished {
    pub outcome: Outcome,
    pub rounds: u32,
    pub events: Vec<BattleEvent>,
    pub home: Team,
    pub away: Team,
}

/// The interactive game. `Ok(None)` when the player backs out before the
/// battle starts.
pub fn play<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &GameConfig,
    mut dice: SimulationRng,
) -> Result<Option<Finished>> {
    if !console.confirm("Create game? (Yes/No): ")? {
        return Ok(None);
    }
    let home_name = console.ask_name("Enter Team 1 name: ")?;
    let away_name = console.ask_name("Enter Team 2 name: ")?;

    let mut teams = Vec::with_capacity(2);
    for name in [home_name, away_name] {
        let mut draft = TeamDraft::new(name, config.army.budget);
        if console.confirm(&format!("Build {} manually? (Yes/No): ", draft.name))? {
            draft = build_manually(console, draft)?;
        } else {
            draft.auto_fill(&mut dice);
        }
        info!(target: "skirmish_cli.play", team = %draft.name, units = draft.roster.len(), budget_left = draft.budget, "army ready");
        teams.push(draft.into_team());
    }
    let away = teams.pop();
    let home = teams.pop();
    let (Some(home), Some(away)) = (home, away) else {
        bail!("team setup incomplete");
    };
    console.show(&home)?;
    console.show(&away)?;

    match console.ask("Press 'Start' to begin: ")? {
        Some(answer) if answer.eq_ignore_ascii_case("start") => {}
        _ => return Ok(None),
    }
    let battle = Battle::new(home, away, config.rules.clone(), dice);
    fight(console, battle, true).map(Some)
}

/// Both armies bought automatically, battle run to the end.
pub fn auto<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &GameConfig,
    names: (&str, &str),
    mut dice: SimulationRng,
) -> Result<Finished> {
    let mut home = TeamDraft::new(names.0, config.army.budget);
    let mut away = TeamDraft::new(names.1, config.army.budget);
    home.auto_fill(&mut dice);
    away.auto_fill(&mut dice);
    let (home, away) = (home.into_team(), away.into_team());
    console.show(&home)?;
    console.show(&away)?;
    let battle = Battle::new(home, away, config.rules.clone(), dice);
    fight(console, battle, false)
}

/// Continues a saved battle to the end.
pub fn resume<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &GameConfig,
    save_path: &Path,
    dice: SimulationRng,
) -> Result<Finished> {
    let (save, warnings) = SaveGame::load(save_path)?;
    for warning in &warnings {
        console.say(format!("Warning: {warning}"))?;
    }
    console.say(format!("Resuming after round {}.", save.round))?;
    console.show(&save.home)?;
    console.show(&save.away)?;
    let battle = Battle::resume(save.home, save.away, config.rules.clone(), dice, save.round);
    fight(console, battle, false)
}

fn build_manually<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    mut draft: TeamDraft,
) -> Result<TeamDraft> {
    console.say(format!("{} - Starting balance: {}", draft.name, draft.budget))?;
    let units: Vec<String> = UnitKind::ALL
        .iter()
        .map(|k| format!("{} ({})", k.code(), k.cost()))
        .collect();
    console.say(format!("Units: {}", units.join(", ")))?;
    let buffs: Vec<String> = BuffCode::ALL
        .iter()
        .map(|b| format!("{} {} ({})", b.code(), b, b.buff().cost))
        .collect();
    console.say(format!(
        "Light infantry buffs (buff <position> <code>): {}",
        buffs.join(", ")
    ))?;

    let mut history = History::new();
    loop {
        let Some(line) = console.ask("Enter unit type (or 'done' to finish): ")? else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        let command = match line.parse::<BuildCommand>() {
            Ok(command) => command,
            Err(err) => {
                console.say(format!("Invalid command: {err}"))?;
                continue;
            }
        };
        match command {
            BuildCommand::Done => break,
            BuildCommand::Show => console.show(&draft)?,
            BuildCommand::Undo => match history.undo(&mut draft) {
                Ok(()) => console.say(format!("Undone. Remaining balance: {}", draft.budget))?,
                Err(err) => console.say(format!("Cannot undo: {err}"))?,
            },
            BuildCommand::Redo => match history.redo(&mut draft) {
                Ok(()) => console.say(format!("Redone. Remaining balance: {}", draft.budget))?,
                Err(err) => console.say(format!("Cannot redo: {err}"))?,
            },
            BuildCommand::Buy(purchase) => {
                match history.apply(&mut draft, |d| d.execute(purchase)) {
                    Ok(()) => console.say(describe(purchase, draft.budget))?,
                    Err(err) => console.say(format!("Invalid purchase: {err}"))?,
                }
                if !draft.can_afford_anything() {
                    console.say("No unit is affordable any more. Use 'undo' or 'done'.")?;
                }
            }
        }
    }
    Ok(draft)
}

fn describe(purchase: Purchase, budget: u32) -> String {
    match purchase {
        Purchase::Unit(kind) => format!("Added {kind}. Remaining balance: {budget}"),
        Purchase::Buff { position, code } => {
            format!("Equipped {code} on [{position}]. Remaining balance: {budget}")
        }
    }
}

/// Plays rounds until the battle is decided, printing narration and both
/// rosters after every round.
fn fight<R: BufRead, W: Write, D: Dice>(
    console: &mut Console<R, W>,
    mut battle: Battle<D>,
    offer_save: bool,
) -> Result<Finished> {
    let mut log = EventLog::new();
    let mut events = Vec::new();

    let outcome = loop {
        if battle.outcome().is_some() {
            let outcome = battle.run(&mut log);
            narrate(console, &mut log, &mut events)?;
            break outcome;
        }
        console.say("")?;
        let outcome = battle.play_round(&mut log);
        narrate(console, &mut log, &mut events)?;
        console.show(battle.home())?;
        console.show(battle.away())?;
        if let Some(outcome) = outcome {
            break outcome;
        }
        if offer_save {
            offer_to_save(console, &battle)?;
        }
    };

    let rounds = battle.round();
    let (home, away) = battle.into_teams();
    Ok(Finished {
        outcome,
        rounds,
        events,
        home,
        away,
    })
}

fn narrate<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    log: &mut EventLog,
    events: &mut Vec<BattleEvent>,
) -> Result<()> {
    let fresh = log.drain();
    for event in &fresh {
        console.say(&event.message)?;
    }
    events.extend(fresh);
    Ok(())
}

fn offer_to_save<R: BufRead, W: Write, D: Dice>(
    console: &mut Console<R, W>,
    battle: &Battle<D>,
) -> Result<()> {
    if !console.confirm("Save game? (Yes/No): ")? {
        return Ok(());
    }
    let path = match console.ask(&format!("Save file [{DEFAULT_SAVE_PATH}]: "))? {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_SAVE_PATH),
    };
    match SaveGame::capture(battle).store(&path) {
        Ok(()) => console.say(format!("Saved to {}", path.display())),
        Err(err) => {
            warn!(target: "skirmish_cli.play", path = %path.display(), %err, "save failed");
            console.say(format!("Could not save: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{Side, UnitKind};
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn text(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    fn temp_save(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("skirmish-{tag}-{}.save", std::process::id()))
    }

    #[test]
    fn declining_creates_nothing() {
        let mut c = console("No\n");
        let result = play(&mut c, &GameConfig::default(), SimulationRng::new(1)).unwrap();
        assert!(result.is_none());

        let mut c = console("");
        let result = play(&mut c, &GameConfig::default(), SimulationRng::new(1)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn manual_build_with_undo_then_heavy_duel() {
        let input = "maybe\nYes\nRed\nBlue\nYes\nHI\nbuff 1 HR\nLI\nbuff 2 HR\nundo\nredo\nshow\ndone\nyes\nHI\ndone\nStart\n";
        let mut c = console(input);
        let finished = play(&mut c, &GameConfig::default(), SimulationRng::new(1))
            .unwrap()
            .unwrap();

        assert_eq!(
            finished.outcome,
            Outcome::Victory {
                side: Side::Home,
                team: "Red".into()
            }
        );
        assert_eq!(finished.rounds, 5);
        let li = finished.home.roster.get(1).unwrap();
        assert_eq!(li.kind(), UnitKind::LightInfantry);
        assert!(li.has_buff(BuffCode::Horse));

        let out = text(c);
        assert!(out.contains("Please answer Yes or No."));
        assert!(out.contains("Invalid purchase: unit at position 1 is not light infantry"));
        assert!(out.contains("Undone. Remaining balance: 110"));
        assert!(out.contains("Redone. Remaining balance: 90"));
        assert!(out.contains("Red (budget 90):"));
        assert!(out.contains("Red: Heavy Infantry [1] attacks Blue: Heavy Infantry [1] and deals 20 damage."));
        assert!(out.contains("Blue:\nNo units remaining.\n"));
        assert!(out.ends_with("Red wins!\nRed:\n[1] Heavy Infantry - 20 HP\n[2] Light Infantry - 70 HP (Horse)\nBlue:\nNo units remaining.\n"));
    }

    #[test]
    fn spent_budget_still_accepts_undo() {
        let input = "Yes\nRed\nBlue\nYes\nHI\nHI\nHI\nHI\nHI\nLI\nundo\nLI\ndone\nNo\nStart\n";
        let mut c = console(input);
        let finished = play(&mut c, &GameConfig::default(), SimulationRng::new(1))
            .unwrap()
            .unwrap();
        assert!(finished.rounds >= 1);

        let out = text(c);
        assert!(out.contains("Added Heavy Infantry. Remaining balance: 0"));
        assert!(out.contains("No unit is affordable any more. Use 'undo' or 'done'."));
        assert!(out.contains("Invalid purchase: Light Infantry costs 10, only 0 left"));
        assert!(out.contains("Undone. Remaining balance: 30"));
        assert!(out.contains("Added Light Infantry. Remaining balance: 20"));
        assert!(out.contains("[5] Light Infantry"));
        assert!(!out.contains("Please answer Yes or No."));
    }

    #[test]
    fn anything_but_start_cancels() {
        let mut c = console("Yes\nRed\nBlue\nNo\nNo\nLater\n");
        let result = play(&mut c, &GameConfig::default(), SimulationRng::new(3)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn saving_after_a_round_then_resuming() {
        let path = temp_save("play");
        let input = format!(
            "Yes\nRed\nBlue\nYes\nHI\ndone\nYes\nHI\ndone\nStart\nYes\n{}\nNo\nNo\nNo\n",
            path.display()
        );
        let mut c = console(&input);
        let finished = play(&mut c, &GameConfig::default(), SimulationRng::new(1))
            .unwrap()
            .unwrap();
        assert_eq!(finished.rounds, 5);

        let (save, warnings) = SaveGame::load(&path).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(save.round, 1);
        assert_eq!(save.home.roster.get(0).unwrap().hp, 80);
        assert_eq!(save.away.roster.get(0).unwrap().hp, 80);

        let mut c = console("");
        let resumed = resume(&mut c, &GameConfig::default(), &path, SimulationRng::new(1)).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(resumed.rounds, 5);
        assert_eq!(resumed.outcome, finished.outcome);
        assert!(text(c).starts_with("Resuming after round 1.\n"));
    }

    #[test]
    fn auto_battles_are_reproducible() {
        let config = GameConfig::default();
        let mut first = console("");
        let a = auto(&mut first, &config, ("Red", "Blue"), SimulationRng::new(17)).unwrap();
        let mut second = console("");
        let b = auto(&mut second, &config, ("Red", "Blue"), SimulationRng::new(17)).unwrap();
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.rounds, b.rounds);
        assert_eq!(a.events, b.events);
        assert_eq!(text(first), text(second));
    }
}
