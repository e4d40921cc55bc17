//! Battle resolution integration tests

use conquest_core::army::*;
use conquest_core::battle::*;
use conquest_core::campaign::*;
use conquest_core::core::*;
use conquest_core::data::GameData;
use rand::rngs::mock::StepRng;

const PLAYER: PlayerId = PlayerId(1);
const NPC: PlayerId = PlayerId(7);
const HOME: TileCoord = TileCoord { x: 0, y: 0 };
const TARGET: TileCoord = TileCoord { x: 3, y: 4 };

fn world(target_terrain: TerrainType, garrison: Composition) -> TileGrid {
    let mut map = TileGrid::new();
    map.insert(
        Tile::new(HOME, TerrainType::City)
            .with_owner(PLAYER)
            .with_garrison(Composition::new().with(UnitType::Militia, 2)),
    );
    map.insert(
        Tile::new(TARGET, target_terrain)
            .with_owner(NPC)
            .with_garrison(garrison),
    );
    map
}

#[test]
fn test_empty_defender_is_taken_without_a_fight() {
    let mut engine = BattleEngine::with_seed(GameData::standard(), 42);
    let mut map = world(TerrainType::Plains, Composition::new());
    let army = Composition::new().with(UnitType::Militia, 10);

    let report = engine
        .resolve_battle(&mut map, &AttackRequest::new(PLAYER, HOME, TARGET, army.clone()))
        .unwrap();

    assert_eq!(report.outcome, Outcome::Victory);
    assert_eq!(report.rounds_fought(), 0);
    assert_eq!(report.final_attacker, army);
    assert_eq!(report.attacker_casualties, 0);
    assert_eq!(report.narrative, "Tile conquered. 10 troops survived.");

    let tile = map.tile(TARGET).unwrap();
    assert_eq!(tile.owner, Some(PLAYER));
    assert_eq!(tile.garrison, army);
}

#[test]
fn test_empty_attacker_always_loses() {
    let mut engine = BattleEngine::with_seed(GameData::standard(), 42);
    let garrison = Composition::new()
        .with(UnitType::Archer, 6)
        .with(UnitType::Cavalry, 2);
    let mut map = world(TerrainType::Forest, garrison.clone());

    let report = engine
        .resolve_battle(
            &mut map,
            &AttackRequest::new(PLAYER, HOME, TARGET, Composition::new()),
        )
        .unwrap();

    assert_eq!(report.outcome, Outcome::Defeat);
    assert_eq!(report.rounds_fought(), 0);
    assert_eq!(report.narrative, "Attack failed. 0 troops returned.");

    let target = map.tile(TARGET).unwrap();
    assert_eq!(target.owner, Some(NPC));
    assert_eq!(target.garrison, garrison);
    assert_eq!(map.tile(HOME).unwrap().garrison.total(), 2);
}

#[test]
fn test_armor_mitigation_endpoints() {
    assert_eq!(mitigate(250.0, 0.0), 250.0);
    assert_eq!(mitigate(250.0, 100.0), 125.0);
    assert!(mitigate(250.0, 300.0) < mitigate(250.0, 100.0));
}

#[test]
fn test_ranged_attacker_strikes_first() {
    let ranged = UnitStats { hp: 45, attack: 10.0, armor: 0.0, range: 3, speed: 2.0 };
    let melee = UnitStats { range: 1, ..ranged };

    let mut catalog = UnitStatTable::empty();
    catalog.insert(UnitType::Archer, ranged);
    catalog.insert(UnitType::Militia, melee);

    let mut attacker = prepare_attacker(
        &Composition::new().with(UnitType::Archer, 100),
        &catalog,
        &[],
    );
    let mut defender = prepare_defender(
        &Composition::new().with(UnitType::Militia, 100),
        &catalog,
        0.0,
    );

    // Constant variance factor so only phase order separates the sides
    let mut rng = StepRng::new(1 << 63, 0);
    let round = simulate_round(&mut attacker, &mut defender, &mut rng);

    let attacker_lost = round.casualties(Side::Attacker).total();
    let defender_lost = round.casualties(Side::Defender).total();
    assert!(defender_lost > 0);
    assert!(
        attacker_lost < defender_lost,
        "attacker lost {}, defender lost {}",
        attacker_lost,
        defender_lost
    );
}

#[test]
fn test_failed_attack_sends_survivors_home() {
    let mut engine = BattleEngine::with_seed(GameData::standard(), 9);
    let garrison = Composition::new().with(UnitType::Cavalry, 200);
    let mut map = world(TerrainType::Mountain, garrison);
    let army = Composition::new().with(UnitType::Archer, 5);

    let report = engine
        .resolve_battle(&mut map, &AttackRequest::new(PLAYER, HOME, TARGET, army))
        .unwrap();

    assert_eq!(report.outcome, Outcome::Defeat);
    let home = map.tile(HOME).unwrap();
    assert_eq!(home.garrison.get(UnitType::Militia), 2);
    assert_eq!(
        home.garrison.get(UnitType::Archer),
        report.final_attacker.get(UnitType::Archer)
    );

    let target = map.tile(TARGET).unwrap();
    assert_eq!(target.owner, Some(NPC));
    assert_eq!(target.garrison, report.final_defender);
}

#[test]
fn test_overwhelming_attack_conquers() {
    let mut engine = BattleEngine::with_seed(GameData::standard(), 1);
    let mut map = world(TerrainType::Plains, Composition::new().with(UnitType::Militia, 5));
    let army = Composition::new()
        .with(UnitType::Archer, 100)
        .with(UnitType::Cavalry, 100);

    let report = engine
        .resolve_battle(&mut map, &AttackRequest::new(PLAYER, HOME, TARGET, army))
        .unwrap();

    assert_eq!(report.outcome, Outcome::Victory);
    assert_eq!(report.defender_casualties, 5);
    assert!(report.final_defender.is_empty());

    let tile = map.tile(TARGET).unwrap();
    assert_eq!(tile.owner, Some(PLAYER));
    assert_eq!(tile.garrison, report.final_attacker);
}

#[test]
fn test_report_accounts_for_every_casualty() {
    let mut engine = BattleEngine::with_seed(GameData::standard(), 1234);
    let garrison = Composition::new()
        .with(UnitType::Militia, 60)
        .with(UnitType::Archer, 30);
    let mut map = world(TerrainType::Ruins, garrison);
    let army = Composition::new()
        .with(UnitType::Militia, 50)
        .with(UnitType::Archer, 25)
        .with(UnitType::Cavalry, 20);

    let report = engine
        .resolve_battle(&mut map, &AttackRequest::new(PLAYER, HOME, TARGET, army))
        .unwrap();

    assert!(report.rounds_fought() <= MAX_ROUNDS as usize);

    let attacker_round_losses: u64 = report
        .rounds
        .iter()
        .map(|r| r.attacker_casualties.total())
        .sum();
    let defender_round_losses: u64 = report
        .rounds
        .iter()
        .map(|r| r.defender_casualties.total())
        .sum();
    assert_eq!(attacker_round_losses, report.attacker_casualties);
    assert_eq!(defender_round_losses, report.defender_casualties);

    let breakdown_losses: u64 = report
        .attacker_breakdown()
        .iter()
        .map(|l| l.lost() as u64)
        .sum();
    assert_eq!(breakdown_losses, report.attacker_casualties);
    assert_eq!(report.initial_attacker_total(), 95);
    assert_eq!(report.initial_defender_total(), 90);
    assert_eq!(report.terrain, "Ruins");
}

#[test]
fn test_same_seed_same_battle() {
    let run = |seed| {
        let mut engine = BattleEngine::with_seed(GameData::standard(), seed);
        let mut map = world(
            TerrainType::Snow,
            Composition::new().with(UnitType::Militia, 40),
        );
        let army = Composition::new()
            .with(UnitType::Militia, 30)
            .with(UnitType::Archer, 20);
        let report = engine
            .resolve_battle(&mut map, &AttackRequest::new(PLAYER, HOME, TARGET, army))
            .unwrap();
        (report.rounds, report.final_attacker, report.final_defender)
    };

    assert_eq!(run(99), run(99));
}

#[test]
fn test_terrain_strengthens_defender_armor() {
    let mut engine = BattleEngine::with_seed(GameData::standard(), 5);
    let garrison = Composition::new().with(UnitType::Militia, 10);
    let army = Composition::new().with(UnitType::Militia, 1);

    let mut plains = world(TerrainType::Plains, garrison.clone());
    let mut city = world(TerrainType::City, garrison);
    let request = AttackRequest::new(PLAYER, HOME, TARGET, army);

    let on_plains = engine.resolve_battle(&mut plains, &request).unwrap();
    let in_city = engine.resolve_battle(&mut city, &request).unwrap();

    let armor = |r: &BattleReport| r.initial_defender.get(UnitType::Militia).unwrap().stats.armor;
    assert_eq!(armor(&on_plains), 5.0);
    assert!((armor(&in_city) - 6.5).abs() < 1e-9);
}

#[test]
fn test_leader_and_strategy_stack() {
    let mut engine = BattleEngine::with_seed(GameData::standard(), 5);
    let mut map = world(TerrainType::Plains, Composition::new().with(UnitType::Militia, 1));
    let request = AttackRequest::new(
        PLAYER,
        HOME,
        TARGET,
        Composition::new()
            .with(UnitType::Militia, 10)
            .with(UnitType::Cavalry, 10),
    )
    .with_leader(LeaderId::new("gen1"))
    .with_strategy(StrategyId::new("guerilla_tactics"));

    let report = engine.resolve_battle(&mut map, &request).unwrap();

    let militia = report.initial_attacker.get(UnitType::Militia).unwrap();
    assert!((militia.stats.attack - 8.8).abs() < 1e-9);
    assert_eq!(militia.stats.hp, 60);

    let cavalry = report.initial_attacker.get(UnitType::Cavalry).unwrap();
    assert!((cavalry.stats.attack - 16.5).abs() < 1e-9);
    // Leaders only lend attack
    assert_eq!(cavalry.stats.speed, 4.0);
    assert_eq!(cavalry.stats.hp, 80);

    assert_eq!(report.leader, Some(LeaderId::new("gen1")));
    assert_eq!(report.strategy, Some(StrategyId::new("guerilla_tactics")));
}

#[test]
fn test_log_keeps_last_hundred() {
    let mut engine = BattleEngine::with_seed(GameData::standard(), 3);
    let mut map = world(TerrainType::Plains, Composition::new());
    let request = AttackRequest::new(
        PLAYER,
        HOME,
        TARGET,
        Composition::new().with(UnitType::Militia, 1),
    );

    for _ in 0..101 {
        engine.resolve_battle(&mut map, &request).unwrap();
    }

    let log = engine.battle_log();
    assert_eq!(log.len(), BATTLE_LOG_CAPACITY);
    assert!(engine.report(BattleId(1)).is_none());
    assert_eq!(log.iter().next().unwrap().id, BattleId(2));
    assert_eq!(log.latest().unwrap().id, BattleId(101));
    assert_eq!(engine.drain_notifications().len(), 101);

    engine.clear_battle_log();
    assert!(engine.battle_log().is_empty());

    let next = engine.resolve_battle(&mut map, &request).unwrap();
    assert_eq!(next.id, BattleId(102));
}

#[test]
fn test_game_data_file_drives_engine() {
    let data = GameData::load_from_toml(std::path::Path::new("data/game_data.toml"))
        .expect("Should load data/game_data.toml");
    let mut engine = BattleEngine::with_seed(data, 11);
    let mut map = world(TerrainType::Desert, Composition::new().with(UnitType::Archer, 3));

    let report = engine
        .resolve_battle(
            &mut map,
            &AttackRequest::new(
                PLAYER,
                HOME,
                TARGET,
                Composition::new().with(UnitType::Cavalry, 50),
            ),
        )
        .unwrap();

    assert_eq!(report.outcome, Outcome::Victory);
    assert_eq!(report.terrain, "Desert");
}
