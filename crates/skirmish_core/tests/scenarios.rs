use skirmish_core::{
    Battle, BattleEvent, BuffCode, Outcome, Rules, ScriptedDice, Side, Team, UnitKind,
};

fn team(name: &str, kinds: &[UnitKind]) -> Team {
    let mut team = Team::new(name);
    for &kind in kinds {
        team.roster.push(kind);
    }
    team
}

fn kinds(team: &Team) -> Vec<UnitKind> {
    team.roster.iter().map(|u| u.kind()).collect()
}

#[test]
fn forced_clone_lands_behind_original_and_waits() {
    let rules = Rules {
        clone_chance_percent: 100,
        ..Rules::default()
    };
    // LI bonus roll, archer volley, wizard clone roll.
    let dice = ScriptedDice::new([0, 1, 0]);
    let mut battle = Battle::new(
        team(
            "Red",
            &[UnitKind::LightInfantry, UnitKind::Archer, UnitKind::Wizard],
        ),
        team("Blue", &[UnitKind::HeavyInfantry]),
        rules,
        dice,
    );
    let mut events: Vec<BattleEvent> = Vec::new();
    assert_eq!(battle.play_round(&mut events), None);

    assert_eq!(
        kinds(battle.home()),
        vec![
            UnitKind::LightInfantry,
            UnitKind::LightInfantry,
            UnitKind::Archer,
            UnitKind::Wizard
        ]
    );
    assert!(battle.home().roster.is_dense());
    assert_eq!(battle.home().roster.get(0).unwrap().hp, 30);
    assert_eq!(battle.home().roster.get(1).unwrap().hp, 50);
    assert_eq!(battle.away().roster.get(0).unwrap().hp, 100 - 16 - 7);
    assert_eq!(events.len(), 6);
    assert_eq!(events[4].message, "Red: Wizard [3] clones Light Infantry [1]!");
    assert_eq!(battle.dice_mut().remaining(), 0);
}

#[test]
fn shielded_infantry_loses_shield_on_the_hit_that_passes_threshold() {
    let home = team("Red", &[UnitKind::HeavyInfantry]);
    let mut away = team("Blue", &[UnitKind::LightInfantry]);
    away.roster.units_mut()[0].grant_buff(BuffCode::Shield).unwrap();

    let mut battle = Battle::new(home, away, Rules::default(), ScriptedDice::default());
    let mut events: Vec<BattleEvent> = Vec::new();
    let outcome = battle.run(&mut events);

    // Every heavy hit is cut to 10; the fifth takes the total to 50.
    let red_hits: Vec<&str> = events
        .iter()
        .map(|e| e.message.as_str())
        .filter(|m| m.starts_with("Red:") && m.contains("attacks"))
        .collect();
    assert_eq!(red_hits.len(), 5);
    assert!(red_hits.iter().all(|m| m.ends_with("deals 10 damage.")));
    let loss = events
        .iter()
        .position(|e| e.message == "Blue: Light Infantry [1] loses its Shield!")
        .unwrap();
    assert_eq!(events[loss - 1].message, red_hits[4]);
    assert_eq!(battle.round(), 5);
    assert_eq!(battle.home().roster.get(0).unwrap().hp, 100 - 4 * 16);
    assert!(matches!(
        outcome,
        Outcome::Victory {
            side: Side::Home,
            ..
        }
    ));
}

#[test]
fn roster_listing() {
    let mut red = team(
        "Red",
        &[UnitKind::LightInfantry, UnitKind::Healer, UnitKind::SiegeSupport],
    );
    let li = &mut red.roster.units_mut()[0];
    li.grant_buff(BuffCode::Horse).unwrap();
    li.grant_buff(BuffCode::Shield).unwrap();
    insta::assert_snapshot!(red.to_string().trim_end(), @r"
    Red:
    [1] Light Infantry - 70 HP (Horse, Shield)
    [2] Healer - 50 HP (3 charges)
    [3] Rolling Fort - 60 HP
    ");
}
