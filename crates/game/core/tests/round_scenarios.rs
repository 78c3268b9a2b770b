use std::collections::VecDeque;

use melee_core::{
    AbortReason, Arena, AttackKind, Attitude, Battlefield, CombatConfig, CombatEnv, CombatError,
    CombatEvent, CombatLog, CombatTables, Combatant, Conditions, CreatureTraits, EntityId,
    GridMap, HandSlot, MeleeResolver, Mount, NaturalAttack, PcgRng, Position, Prompter,
    ResistVector, ResourceMeter, RoundOptions, RoundOutcome, SpecialMode, StabType, StrikeReport,
    StrikeRequest, StrikeSource, Striker, Weapon, WeaponClass, WeaponSlots,
};

// ============================================================================
// Scripted collaborators
// ============================================================================

/// Side effect applied to the battlefield right after the nth strike.
#[derive(Clone, Copy, Debug)]
enum Effect {
    Kill(EntityId),
    Remove(EntityId),
    Charm(EntityId),
    SetHeads(EntityId, u8),
}

/// Records every request and connects unless told otherwise.
#[derive(Default)]
struct ScriptedStriker {
    requests: Vec<StrikeRequest>,
    effects: Vec<(usize, Effect)>,
    cancel_at: Option<usize>,
}

impl ScriptedStriker {
    fn after(mut self, strike: usize, effect: Effect) -> Self {
        self.effects.push((strike, effect));
        self
    }

    fn cancelling(mut self, strike: usize) -> Self {
        self.cancel_at = Some(strike);
        self
    }

    fn sources(&self) -> Vec<StrikeSource> {
        self.requests.iter().map(|r| r.source).collect()
    }

    fn defenders(&self) -> Vec<EntityId> {
        self.requests.iter().map(|r| r.defender).collect()
    }
}

impl Striker for ScriptedStriker {
    fn strike(&mut self, arena: &mut Arena<'_>, request: &StrikeRequest) -> StrikeReport {
        let index = self.requests.len();
        self.requests.push(*request);
        if self.cancel_at == Some(index) {
            return StrikeReport::cancelled(request);
        }

        for &(_, effect) in self.effects.iter().filter(|(at, _)| *at == index) {
            match effect {
                Effect::Kill(id) => {
                    if let Some(c) = arena.field.get_mut(id) {
                        c.hp.current = 0;
                    }
                }
                Effect::Remove(id) => {
                    arena.field.remove(id);
                }
                Effect::Charm(id) => {
                    if let Some(c) = arena.field.get_mut(id) {
                        c.attitude = Attitude::Friendly;
                    }
                }
                Effect::SetHeads(id, heads) => {
                    if let Some(traits) = arena
                        .field
                        .get_mut(id)
                        .and_then(|c| c.creature_traits_mut())
                    {
                        traits.heads = heads;
                    }
                }
            }
        }

        StrikeReport {
            connected: true,
            cancelled: false,
            effective_index_after: request.effective_index + 1,
            damage: 1,
        }
    }
}

/// Answers prompts from a queue, accepting once it runs dry.
#[derive(Default)]
struct ScriptedPrompter {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        self.asked.push(question.to_owned());
        self.answers.pop_front().unwrap_or(true)
    }
}

// ============================================================================
// Scenario harness
// ============================================================================

struct Scenario {
    field: Battlefield,
    map: GridMap,
    tables: CombatTables,
    config: CombatConfig,
    rng: PcgRng,
    log: CombatLog,
    prompter: ScriptedPrompter,
}

impl Scenario {
    fn new(combatants: impl IntoIterator<Item = Combatant>) -> Self {
        Self {
            field: Battlefield::from_combatants(combatants),
            map: GridMap::open(8, 8),
            tables: CombatTables::standard(),
            config: CombatConfig::default(),
            rng: PcgRng::new(7),
            log: CombatLog::new(),
            prompter: ScriptedPrompter::default(),
        }
    }

    fn run(
        &mut self,
        striker: ScriptedStriker,
        attacker: EntityId,
        defender: EntityId,
        options: RoundOptions,
    ) -> (Result<RoundOutcome, CombatError>, ScriptedStriker) {
        let env = CombatEnv::new(&self.map, &self.tables, &self.config);
        let arena = Arena::new(
            &mut self.field,
            env,
            &mut self.rng,
            &mut self.prompter,
            &mut self.log,
        );
        let mut resolver = MeleeResolver::with_striker(arena, striker);
        let result = resolver.resolve_melee_round(attacker, defender, options);
        (result, resolver.into_striker())
    }

    fn round(
        &mut self,
        striker: ScriptedStriker,
        attacker: EntityId,
        defender: EntityId,
    ) -> (RoundOutcome, ScriptedStriker) {
        let (result, striker) = self.run(striker, attacker, defender, RoundOptions::default());
        (result.expect("round should start"), striker)
    }

    fn logged(&self, pred: impl Fn(&CombatEvent) -> bool) -> usize {
        self.log.events().iter().filter(|e| pred(e)).count()
    }
}

const ORC: EntityId = EntityId(1);
const GOBLIN: EntityId = EntityId(2);
const HYDRA: EntityId = EntityId(3);

fn sword() -> Weapon {
    Weapon::new("long sword", WeaponClass::LongBlade, 10, 12)
}

fn dagger() -> Weapon {
    Weapon::new("dagger", WeaponClass::ShortBlade, 4, 10)
}

fn axe() -> Weapon {
    Weapon::new("war axe", WeaponClass::Axe, 11, 15)
}

fn player(weapons: WeaponSlots) -> Combatant {
    Combatant::player("you", Position::new(3, 3), 40).with_weapons(weapons)
}

fn creature(id: EntityId, name: &str, position: Position, traits: CreatureTraits) -> Combatant {
    Combatant::creature(id, name, position, 20, traits)
}

fn orc(id: EntityId, position: Position) -> Combatant {
    creature(
        id,
        "orc",
        position,
        CreatureTraits::with_attacks([NaturalAttack::new(AttackKind::Hit, 6)]),
    )
}

fn hydra(heads: u8, position: Position) -> Combatant {
    let mut traits =
        CreatureTraits::with_attacks([NaturalAttack::new(AttackKind::Bite, 5).per_head()]);
    traits.heads = heads;
    creature(HYDRA, "hydra", position, traits)
}

// ============================================================================
// Player rounds
// ============================================================================

#[test]
fn single_one_handed_weapon_strikes_once() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::wielding(sword())),
        orc(ORC, Position::new(3, 2)),
    ]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), EntityId::PLAYER, ORC);

    assert!(outcome.consumed_turn);
    assert!(outcome.did_hit);
    assert_eq!(outcome.aborted, None);
    assert_eq!(outcome.time_cost, 12);
    assert_eq!(striker.sources(), vec![StrikeSource::Hand(HandSlot::Primary)]);
}

#[test]
fn two_hander_never_swings_the_offhand() {
    let greatsword = Weapon::new("great sword", WeaponClass::LongBlade, 17, 17).two_handed();
    let mut scenario = Scenario::new([
        player(WeaponSlots::dual(greatsword, dagger())),
        orc(ORC, Position::new(3, 2)),
    ]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), EntityId::PLAYER, ORC);

    assert!(outcome.consumed_turn);
    assert_eq!(striker.sources(), vec![StrikeSource::Hand(HandSlot::Primary)]);
}

#[test]
fn dual_wielding_charges_half_for_the_offhand() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::dual(dagger(), dagger())),
        orc(ORC, Position::new(3, 2)),
    ]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), EntityId::PLAYER, ORC);

    assert_eq!(
        striker.sources(),
        vec![
            StrikeSource::Hand(HandSlot::Primary),
            StrikeSource::Hand(HandSlot::Offhand)
        ]
    );
    assert_eq!(striker.requests[1].effective_index, 1);
    assert_eq!(outcome.time_cost, 10 + 5);
    assert_eq!(outcome.strikes, 2);
}

#[test]
fn removed_defender_ends_the_round_without_error() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::dual(dagger(), dagger())),
        orc(ORC, Position::new(3, 2)),
    ]);
    let striker = ScriptedStriker::default().after(0, Effect::Remove(ORC));
    let (outcome, striker) = scenario.round(striker, EntityId::PLAYER, ORC);

    assert!(outcome.consumed_turn);
    assert_eq!(striker.requests.len(), 1);
    assert_eq!(outcome.aborted, None);
}

#[test]
fn charmed_defender_is_not_struck_again() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::dual(dagger(), dagger())),
        orc(ORC, Position::new(3, 2)),
    ]);
    let striker = ScriptedStriker::default().after(0, Effect::Charm(ORC));
    let (outcome, striker) = scenario.round(striker, EntityId::PLAYER, ORC);

    assert!(outcome.consumed_turn);
    assert_eq!(striker.requests.len(), 1);
}

#[test]
fn no_usable_weapon_aborts_for_free() {
    let greatsword = Weapon::new("great sword", WeaponClass::LongBlade, 17, 17).two_handed();
    let mut one_armed = player(WeaponSlots::wielding(greatsword));
    if let Some(traits) = one_armed.player_traits_mut() {
        traits.hands = 1;
    }
    let mut scenario = Scenario::new([one_armed, orc(ORC, Position::new(3, 2))]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), EntityId::PLAYER, ORC);

    assert!(!outcome.consumed_turn);
    assert_eq!(outcome.aborted, Some(AbortReason::UnsuitableEquipment));
    assert_eq!(outcome.time_cost, 0);
    assert!(striker.requests.is_empty());
    assert_eq!(
        scenario.logged(|e| matches!(e, CombatEvent::CannotAttack { .. })),
        1
    );
}

#[test]
fn declining_to_attack_a_neutral_costs_nothing() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::wielding(sword())),
        orc(ORC, Position::new(3, 2)).with_attitude(Attitude::Neutral),
    ]);
    scenario.prompter = ScriptedPrompter::answering([false]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), EntityId::PLAYER, ORC);

    assert!(!outcome.consumed_turn);
    assert_eq!(outcome.aborted, Some(AbortReason::Declined));
    assert!(striker.requests.is_empty());
    assert_eq!(scenario.prompter.asked, vec!["Really attack orc?".to_owned()]);
    assert_eq!(scenario.logged(|e| matches!(e, CombatEvent::Declined { .. })), 1);
}

#[test]
fn launcher_bash_asks_first() {
    let bow = Weapon::new("shortbow", WeaponClass::Launcher, 2, 10);
    let mut scenario = Scenario::new([
        player(WeaponSlots::wielding(bow)),
        orc(ORC, Position::new(3, 2)),
    ]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), EntityId::PLAYER, ORC);

    assert!(outcome.consumed_turn);
    assert_eq!(striker.requests.len(), 1);
    assert_eq!(
        scenario.prompter.asked,
        vec!["Really attack while wielding shortbow?".to_owned()]
    );
}

#[test]
fn cancelling_the_first_strike_is_free() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::dual(dagger(), dagger())),
        orc(ORC, Position::new(3, 2)),
    ]);
    let (outcome, _) = scenario.round(
        ScriptedStriker::default().cancelling(0),
        EntityId::PLAYER,
        ORC,
    );
    assert!(!outcome.consumed_turn);
    assert_eq!(outcome.aborted, Some(AbortReason::Cancelled));
    assert_eq!(outcome.time_cost, 0);
}

#[test]
fn cancelling_a_later_strike_still_costs_the_turn() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::dual(dagger(), dagger())),
        orc(ORC, Position::new(3, 2)),
    ]);
    let (outcome, _) = scenario.round(
        ScriptedStriker::default().cancelling(1),
        EntityId::PLAYER,
        ORC,
    );
    assert!(outcome.consumed_turn);
    assert_eq!(outcome.aborted, Some(AbortReason::Cancelled));
    assert_eq!(outcome.time_cost, 10);
}

#[test]
fn cancelled_bonus_strike_ends_the_round() {
    let mut mutant = player(WeaponSlots::wielding(sword()));
    if let Some(traits) = mutant.player_traits_mut() {
        traits.extra_strikes = 2;
    }
    let mut scenario = Scenario::new([mutant, orc(ORC, Position::new(3, 2))]);
    let (outcome, striker) = scenario.round(
        ScriptedStriker::default().cancelling(1),
        EntityId::PLAYER,
        ORC,
    );

    assert_eq!(
        striker.sources(),
        vec![StrikeSource::Hand(HandSlot::Primary), StrikeSource::Aux]
    );
    assert!(outcome.consumed_turn);
    assert_eq!(outcome.aborted, Some(AbortReason::Cancelled));
    assert_eq!(outcome.strikes, 1);
    assert_eq!(outcome.time_cost, 12);
}

#[test]
fn cancelled_cleave_strike_stops_the_sweep_and_the_offhand() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::dual(axe(), dagger())),
        orc(ORC, Position::new(3, 2)),
        orc(GOBLIN, Position::new(4, 3)),
        orc(EntityId(4), Position::new(2, 4)),
    ]);
    let (outcome, striker) = scenario.round(
        ScriptedStriker::default().cancelling(1),
        EntityId::PLAYER,
        ORC,
    );

    assert_eq!(striker.requests.len(), 2);
    assert!(striker.requests[1].cleaving);
    assert!(
        striker
            .sources()
            .iter()
            .all(|s| *s == StrikeSource::Hand(HandSlot::Primary))
    );
    assert!(outcome.consumed_turn);
    assert_eq!(outcome.aborted, Some(AbortReason::Cancelled));
    assert_eq!(outcome.time_cost, 15);
}

#[test]
fn cancelled_companion_strike_ends_the_round() {
    let spectral = creature(
        EntityId(5),
        "spectral weapon",
        Position::new(4, 2),
        CreatureTraits::with_attacks([NaturalAttack::new(AttackKind::Hit, 4)]),
    )
    .with_attitude(Attitude::Friendly);
    let mut scenario = Scenario::new([
        player(WeaponSlots::dual(dagger(), dagger())).with_companion(EntityId(5)),
        orc(ORC, Position::new(3, 2)),
        spectral,
    ]);
    let (outcome, striker) = scenario.round(
        ScriptedStriker::default().cancelling(1),
        EntityId::PLAYER,
        ORC,
    );

    assert_eq!(striker.requests.len(), 2);
    assert_eq!(striker.requests[1].attacker, EntityId(5));
    assert_eq!(outcome.aborted, Some(AbortReason::Cancelled));
    assert_eq!(outcome.strikes, 1);
    assert_eq!(outcome.time_cost, 10);
}

#[test]
fn cancelled_mount_bite_leaves_energy_alone() {
    let mut rider = player(WeaponSlots::wielding(sword()));
    if let Some(traits) = rider.player_traits_mut() {
        traits.mount = Some(Mount {
            name: "hydra mount".into(),
            heads: 3,
            energy: ResourceMeter::new(25, 30),
            hp: ResourceMeter::full(20),
            resists: ResistVector::none(),
            bite_damage: 5,
        });
    }
    let mut scenario = Scenario::new([rider, orc(ORC, Position::new(3, 2))]);
    let (outcome, striker) = scenario.round(
        ScriptedStriker::default().cancelling(1),
        EntityId::PLAYER,
        ORC,
    );

    assert_eq!(striker.requests.len(), 2);
    assert_eq!(outcome.aborted, Some(AbortReason::Cancelled));
    let energy = scenario
        .field
        .player()
        .and_then(|p| p.mount())
        .map(|m| m.energy.current);
    assert_eq!(energy, Some(25));
}

#[test]
fn defender_out_of_reach_costs_nothing_and_is_not_swapped() {
    let mut mutant = player(WeaponSlots::wielding(sword()));
    if let Some(traits) = mutant.player_traits_mut() {
        traits.extra_strikes = 1;
    }
    let mut scenario = Scenario::new([
        mutant,
        orc(ORC, Position::new(3, 0)),
        orc(GOBLIN, Position::new(4, 3)),
    ]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), EntityId::PLAYER, ORC);

    assert!(striker.requests.is_empty());
    assert!(!outcome.consumed_turn);
    assert_eq!(outcome.aborted, Some(AbortReason::OutOfReach));
    assert_eq!(outcome.time_cost, 0);
    assert_eq!(
        scenario.logged(|e| matches!(e, CombatEvent::Retarget { .. })),
        0
    );
}

#[test]
fn bonus_strike_retargets_after_a_kill() {
    let mut mutant = player(WeaponSlots::wielding(sword()));
    if let Some(traits) = mutant.player_traits_mut() {
        traits.extra_strikes = 1;
    }
    let mut scenario = Scenario::new([
        mutant,
        orc(ORC, Position::new(3, 2)),
        orc(GOBLIN, Position::new(4, 3)),
    ]);
    let striker = ScriptedStriker::default().after(0, Effect::Kill(ORC));
    let (outcome, striker) = scenario.round(striker, EntityId::PLAYER, ORC);

    assert_eq!(striker.defenders(), vec![ORC, GOBLIN]);
    assert_eq!(striker.requests[1].source, StrikeSource::Aux);
    assert_eq!(outcome.time_cost, 12 + 10 * 25 / 100);
    assert_eq!(
        scenario.logged(|e| matches!(e, CombatEvent::Retarget { to: GOBLIN, .. })),
        1
    );
}

#[test]
fn bonus_strike_never_retargets_onto_allies_or_neutrals() {
    let mut mutant = player(WeaponSlots::wielding(sword()));
    if let Some(traits) = mutant.player_traits_mut() {
        traits.extra_strikes = 2;
    }
    let mut scenario = Scenario::new([
        mutant,
        orc(ORC, Position::new(3, 2)),
        orc(GOBLIN, Position::new(4, 3)).with_attitude(Attitude::Friendly),
        orc(EntityId(4), Position::new(2, 3)).with_attitude(Attitude::Neutral),
    ]);
    let striker = ScriptedStriker::default().after(0, Effect::Kill(ORC));
    let (outcome, striker) = scenario.round(striker, EntityId::PLAYER, ORC);

    assert!(outcome.consumed_turn);
    assert_eq!(striker.defenders(), vec![ORC]);
}

#[test]
fn mount_heads_bite_until_energy_runs_out() {
    let mut rider = player(WeaponSlots::wielding(sword()));
    if let Some(traits) = rider.player_traits_mut() {
        traits.mount = Some(Mount {
            name: "hydra mount".into(),
            heads: 3,
            energy: ResourceMeter::new(25, 30),
            hp: ResourceMeter::full(20),
            resists: ResistVector::none(),
            bite_damage: 5,
        });
    }
    let mut scenario = Scenario::new([rider, orc(ORC, Position::new(3, 2))]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), EntityId::PLAYER, ORC);

    assert_eq!(
        striker.sources(),
        vec![
            StrikeSource::Hand(HandSlot::Primary),
            StrikeSource::MountHead,
            StrikeSource::MountHead
        ]
    );
    // An active mount makes its bites free.
    assert_eq!(outcome.time_cost, 12);
    let energy = scenario
        .field
        .player()
        .and_then(|p| p.mount())
        .map(|m| m.energy.current);
    assert_eq!(energy, Some(5));
    assert_eq!(
        scenario.logged(|e| matches!(e, CombatEvent::MountExhausted { .. })),
        1
    );
}

#[test]
fn axe_cleaves_into_neighbours() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::wielding(axe())),
        orc(ORC, Position::new(3, 2)),
        orc(GOBLIN, Position::new(4, 3)),
        orc(EntityId(4), Position::new(2, 4)),
        orc(EntityId(5), Position::new(2, 2)).with_attitude(Attitude::Friendly),
    ]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), EntityId::PLAYER, ORC);

    assert_eq!(striker.requests.len(), 3);
    assert!(!striker.requests[0].cleaving);
    assert!(striker.requests[1..].iter().all(|r| r.cleaving));
    let mut cleaved: Vec<_> = striker.defenders()[1..].to_vec();
    cleaved.sort();
    assert_eq!(cleaved, vec![GOBLIN, EntityId(4)]);
    assert_eq!(striker.requests[2].effective_index, 2);
    // Cleave strikes are free.
    assert_eq!(outcome.time_cost, 15);
}

#[test]
fn cleave_clangs_against_walls() {
    let mut scenario = Scenario::new([
        Combatant::player("you", Position::new(2, 2), 40)
            .with_weapons(WeaponSlots::wielding(axe())),
        orc(ORC, Position::new(2, 1)),
        orc(GOBLIN, Position::new(3, 3)),
    ]);
    scenario.map = GridMap::open(6, 6).with_walls([Position::new(3, 2), Position::new(2, 3)]);
    let (_, striker) = scenario.round(ScriptedStriker::default(), EntityId::PLAYER, ORC);

    assert_eq!(striker.defenders(), vec![ORC]);
    assert_eq!(
        scenario.logged(|e| matches!(e, CombatEvent::ClangsAgainstWall { defender: GOBLIN, .. })),
        1
    );
}

#[test]
fn whirlwind_skips_cleave_and_offhand() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::dual(axe(), dagger())),
        orc(ORC, Position::new(3, 2)),
        orc(GOBLIN, Position::new(4, 3)),
    ]);
    let options = RoundOptions::default().with_special(SpecialMode::Whirlwind, 2);
    let (result, striker) =
        scenario.run(ScriptedStriker::default(), EntityId::PLAYER, ORC, options);

    assert!(result.is_ok_and(|o| o.consumed_turn));
    assert_eq!(striker.requests.len(), 1);
    assert_eq!(striker.requests[0].special, Some(SpecialMode::Whirlwind));
    assert_eq!(striker.requests[0].target_count, 2);
}

#[test]
fn lunge_keeps_cleave_but_drops_offhand() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::dual(axe(), dagger())),
        orc(ORC, Position::new(3, 2)),
        orc(GOBLIN, Position::new(4, 3)),
    ]);
    let options = RoundOptions::default().with_special(SpecialMode::Lunge, 1);
    let (_, striker) = scenario.run(ScriptedStriker::default(), EntityId::PLAYER, ORC, options);

    assert_eq!(striker.defenders(), vec![ORC, GOBLIN]);
    assert!(
        striker
            .sources()
            .iter()
            .all(|s| *s == StrikeSource::Hand(HandSlot::Primary))
    );
}

#[test]
fn companion_mirrors_connecting_strikes() {
    let spectral = creature(
        EntityId(5),
        "spectral weapon",
        Position::new(4, 2),
        CreatureTraits::with_attacks([NaturalAttack::new(AttackKind::Hit, 4)]),
    )
    .with_attitude(Attitude::Friendly);
    let mut scenario = Scenario::new([
        player(WeaponSlots::wielding(sword())).with_companion(EntityId(5)),
        orc(ORC, Position::new(3, 2)),
        spectral,
    ]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), EntityId::PLAYER, ORC);
    assert_eq!(striker.requests.len(), 2);
    assert_eq!(striker.requests[1].attacker, EntityId(5));
    assert_eq!(outcome.strikes, 2);
    assert_eq!(outcome.time_cost, 12);

    let (_, striker) = scenario.run(
        ScriptedStriker::default(),
        EntityId::PLAYER,
        ORC,
        RoundOptions::simulated(),
    );
    assert_eq!(striker.requests.len(), 1);
}

// ============================================================================
// Creature rounds
// ============================================================================

#[test]
fn hydra_bites_once_per_head() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::wielding(sword())),
        hydra(4, Position::new(3, 2)),
    ]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), HYDRA, EntityId::PLAYER);

    assert!(outcome.consumed_turn);
    assert_eq!(striker.sources(), vec![StrikeSource::Natural(0); 4]);
    assert_eq!(
        striker.requests.iter().map(|r| r.effective_index).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
    // The whole round is one action.
    assert_eq!(outcome.time_cost, u32::from(CombatConfig::DEFAULT_UNARMED_DELAY));
}

#[test]
fn lost_heads_cut_the_repeats_short() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::wielding(sword())),
        hydra(5, Position::new(3, 2)),
    ]);
    let striker = ScriptedStriker::default().after(0, Effect::SetHeads(HYDRA, 2));
    let (_, striker) = scenario.round(striker, HYDRA, EntityId::PLAYER);
    assert_eq!(striker.requests.len(), 2);
}

#[test]
fn attack_slots_are_capped() {
    let traits = CreatureTraits::with_attacks([
        NaturalAttack::new(AttackKind::Bite, 5),
        NaturalAttack::new(AttackKind::Claw, 3),
        NaturalAttack::new(AttackKind::Claw, 3),
        NaturalAttack::new(AttackKind::Sting, 2),
    ]);
    let mut scenario = Scenario::new([
        player(WeaponSlots::wielding(sword())),
        creature(GOBLIN, "manticore", Position::new(3, 2), traits),
    ]);
    scenario.config.max_monster_attack_slots = 2;
    let (_, striker) = scenario.round(ScriptedStriker::default(), GOBLIN, EntityId::PLAYER);
    assert_eq!(
        striker.sources(),
        vec![StrikeSource::Natural(0), StrikeSource::Natural(1)]
    );
}

#[test]
fn dying_attacker_stops_immediately() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::wielding(sword())),
        hydra(4, Position::new(3, 2)),
    ]);
    let striker = ScriptedStriker::default().after(0, Effect::Kill(HYDRA));
    let (outcome, striker) = scenario.round(striker, HYDRA, EntityId::PLAYER);
    assert!(outcome.consumed_turn);
    assert_eq!(striker.requests.len(), 1);
}

fn two_slot_brute(multi_target: bool) -> Combatant {
    let mut traits = CreatureTraits::with_attacks([
        NaturalAttack::new(AttackKind::Bite, 5),
        NaturalAttack::new(AttackKind::Claw, 3),
    ]);
    traits.multi_target = multi_target;
    creature(HYDRA, "ettin", Position::new(3, 3), traits)
}

#[test]
fn multi_targeting_creature_turns_on_the_player() {
    let mut scenario = Scenario::new([
        Combatant::player("you", Position::new(3, 2), 40),
        two_slot_brute(true),
        orc(ORC, Position::new(3, 4)).with_attitude(Attitude::Friendly),
        orc(GOBLIN, Position::new(4, 4)).with_attitude(Attitude::Friendly),
    ]);
    let striker = ScriptedStriker::default().after(0, Effect::Kill(ORC));
    let (outcome, striker) = scenario.round(striker, HYDRA, ORC);

    assert!(outcome.consumed_turn);
    assert_eq!(striker.defenders(), vec![ORC, EntityId::PLAYER]);
    assert_eq!(
        scenario.logged(|e| matches!(e, CombatEvent::Retarget { .. })),
        1
    );
}

#[test]
fn single_target_creature_stops_when_target_is_lost() {
    let mut scenario = Scenario::new([
        Combatant::player("you", Position::new(3, 2), 40),
        two_slot_brute(false),
        orc(ORC, Position::new(3, 4)).with_attitude(Attitude::Friendly),
    ]);
    let striker = ScriptedStriker::default().after(0, Effect::Remove(ORC));
    let (result, striker) = scenario.run(striker, HYDRA, ORC, RoundOptions::default());

    assert!(result.is_ok_and(|o| o.consumed_turn));
    assert_eq!(striker.defenders(), vec![ORC]);
}

#[test]
fn creature_out_of_reach_does_not_start() {
    let mut scenario = Scenario::new([
        Combatant::player("you", Position::new(3, 0), 40),
        two_slot_brute(true),
        orc(ORC, Position::new(3, 4)).with_attitude(Attitude::Friendly),
    ]);
    let (outcome, striker) = scenario.round(ScriptedStriker::default(), HYDRA, EntityId::PLAYER);

    assert!(striker.requests.is_empty());
    assert!(!outcome.consumed_turn);
    assert_eq!(outcome.aborted, Some(AbortReason::OutOfReach));
    assert_eq!(outcome.strikes, 0);
}

#[test]
fn reach_attacker_may_kite_before_striking() {
    let mut traits = CreatureTraits::with_attacks([NaturalAttack::new(AttackKind::Hit, 6)]);
    traits.intelligent = true;
    let pikeman = creature(GOBLIN, "pikeman", Position::new(3, 3), traits).with_weapons(
        WeaponSlots::wielding(Weapon::new("spear", WeaponClass::Polearm, 7, 13)),
    );
    let mut scenario = Scenario::new([Combatant::player("you", Position::new(3, 2), 40), pikeman]);
    scenario.config.kite_chance = 1;

    let (outcome, striker) = scenario.round(ScriptedStriker::default(), GOBLIN, EntityId::PLAYER);
    assert_eq!(striker.requests.len(), 1);
    assert_eq!(outcome.time_cost, 13 + CombatConfig::DEFAULT_KITE_TIME_COST);
    assert_eq!(
        scenario.field.get(GOBLIN).map(|c| c.position),
        Some(Position::new(3, 4))
    );
    assert_eq!(scenario.logged(|e| matches!(e, CombatEvent::KiteHop { .. })), 1);

    // Simulated rounds never move anyone.
    let (_, _) = scenario.run(
        ScriptedStriker::default(),
        GOBLIN,
        EntityId::PLAYER,
        RoundOptions::simulated(),
    );
    assert_eq!(
        scenario.field.get(GOBLIN).map(|c| c.position),
        Some(Position::new(3, 4))
    );
}

#[test]
fn kiting_needs_open_ground() {
    let mut traits = CreatureTraits::with_attacks([NaturalAttack::new(AttackKind::Hit, 6)]);
    traits.intelligent = true;
    let pikeman = creature(GOBLIN, "pikeman", Position::new(3, 3), traits).with_weapons(
        WeaponSlots::wielding(Weapon::new("spear", WeaponClass::Polearm, 7, 13)),
    );
    let mut scenario = Scenario::new([Combatant::player("you", Position::new(3, 2), 40), pikeman]);
    scenario.config.kite_chance = 1;
    scenario.map = GridMap::open(8, 8).with_walls([Position::new(3, 4)]);

    let (outcome, _) = scenario.round(ScriptedStriker::default(), GOBLIN, EntityId::PLAYER);
    assert_eq!(outcome.time_cost, 13);
    assert_eq!(
        scenario.field.get(GOBLIN).map(|c| c.position),
        Some(Position::new(3, 3))
    );
}

// ============================================================================
// Preconditions and facade queries
// ============================================================================

#[test]
fn invalid_rounds_are_errors() {
    let mut corpse = orc(ORC, Position::new(3, 2));
    corpse.hp = ResourceMeter::new(0, 20);
    let mut gone = orc(GOBLIN, Position::new(4, 3));
    gone.removed = true;
    let mut scenario = Scenario::new([player(WeaponSlots::wielding(sword())), corpse, gone]);

    let (result, _) = scenario.run(
        ScriptedStriker::default(),
        EntityId::PLAYER,
        ORC,
        RoundOptions::default(),
    );
    assert!(matches!(result, Err(CombatError::DefenderDead { id: ORC, .. })));

    let (result, _) = scenario.run(
        ScriptedStriker::default(),
        EntityId::PLAYER,
        GOBLIN,
        RoundOptions::default(),
    );
    assert!(matches!(result, Err(CombatError::DefenderRemoved { id: GOBLIN, .. })));

    let (result, _) = scenario.run(
        ScriptedStriker::default(),
        EntityId::PLAYER,
        EntityId::PLAYER,
        RoundOptions::default(),
    );
    assert!(matches!(result, Err(CombatError::SelfTarget { .. })));

    let (result, striker) = scenario.run(
        ScriptedStriker::default(),
        EntityId::PLAYER,
        EntityId(99),
        RoundOptions::default(),
    );
    assert!(matches!(result, Err(CombatError::UnknownCombatant { id: EntityId(99) })));
    assert!(striker.requests.is_empty());
}

#[test]
fn facade_queries() {
    let mut scenario = Scenario::new([
        player(WeaponSlots::wielding(axe())),
        orc(ORC, Position::new(3, 2)).with_conditions(Conditions::ASLEEP),
        orc(GOBLIN, Position::new(4, 3)),
    ]);
    let env = CombatEnv::new(&scenario.map, &scenario.tables, &scenario.config);
    let arena = Arena::new(
        &mut scenario.field,
        env,
        &mut scenario.rng,
        &mut scenario.prompter,
        &mut scenario.log,
    );
    let mut resolver = MeleeResolver::with_striker(arena, ScriptedStriker::default());

    assert_eq!(
        resolver.resolve_stab_classification(Some(EntityId::PLAYER), ORC, true),
        Ok(StabType::Sleeping)
    );
    assert_eq!(
        resolver.resolve_stab_classification(None, GOBLIN, false),
        Ok(StabType::NoStab)
    );

    let mut targets = resolver
        .build_cleave_targets(EntityId::PLAYER, Position::new(3, 2), HandSlot::Primary)
        .expect("player exists");
    assert_eq!(targets.len(), 2);
    assert_eq!(targets.front(), Some(&ORC));

    let after = resolver
        .execute_cleave(EntityId::PLAYER, &mut targets, HandSlot::Primary, 1, None)
        .expect("player exists");
    assert_eq!(after.effective_index, 3);
    assert!(!after.cancelled);
    assert!(targets.is_empty());
    assert_eq!(resolver.striker().requests.len(), 2);

    let blocked = resolver.mitigate_by_armor(1_000_000, 40);
    let rate = f64::from(blocked) / 1_000_000.0;
    assert!((rate - 0.39).abs() < 0.02, "blocked {rate}");
}
