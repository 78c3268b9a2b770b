//! Melee round sequencing.
//!
//! [`MeleeResolver`] is the entry point the turn scheduler talks to. A round
//! decides how many strikes happen, against whom, and what they cost; each
//! strike itself is delegated to a [`Striker`].
//!
//! # Player rounds
//!
//! 1. Work out which hands can swing; abort for free if none can
//! 2. Confirm attacks on non-hostile targets and with unsuitable weapons
//! 3. Swing each usable hand at the defender, cleaving where the weapon allows
//! 4. Spend bonus strikes (mutations, mount heads), retargeting when the
//!    original defender is gone
//!
//! A defender out of reach before the first strike ends the round for free.
//! A cancelled strike ends it at once; the turn is still spent if an earlier
//! strike went through.
//!
//! # Creature rounds
//!
//! Natural attack slots are walked in order. Per-head slots repeat once per
//! current head. A lost defender ends the round unless the creature can pick
//! another target.
//!
//! Every strike can kill, move, remove or charm anything on the battlefield,
//! so nothing read before a strike is trusted after it.

use crate::combat::cleave::{self, CleaveOutcome, CleaveTargets};
use crate::combat::guards;
use crate::combat::{
    AbortReason, Arena, AttackRound, CombatEvent, DamageFlavour, ResistSource, RoundOptions,
    RoundOutcome, SpecialMode, StabType, StandardStriker, StrikeReport, StrikeRequest,
    StrikeSource, Striker, armor, resist, stab,
};
use crate::env::CleaveShape;
use crate::error::CombatError;
use crate::state::{Attitude, Combatant, EntityId, Fighter, HandSlot, Position};

/// Resolves melee rounds and answers the related combat queries.
pub struct MeleeResolver<'a, S = StandardStriker> {
    arena: Arena<'a>,
    striker: S,
}

impl<'a> MeleeResolver<'a, StandardStriker> {
    pub fn new(arena: Arena<'a>) -> Self {
        Self::with_striker(arena, StandardStriker)
    }
}

impl<'a, S: Striker> MeleeResolver<'a, S> {
    pub fn with_striker(arena: Arena<'a>, striker: S) -> Self {
        Self { arena, striker }
    }

    pub fn arena(&self) -> &Arena<'a> {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena<'a> {
        &mut self.arena
    }

    pub fn striker(&self) -> &S {
        &self.striker
    }

    pub fn into_striker(self) -> S {
        self.striker
    }

    // ===== exposed operations =====

    /// Runs one full melee round of `attacker` against `defender`.
    ///
    /// Returns `Err` only for caller bugs: unknown ids, a dead attacker, or a
    /// defender that is already dead or removed. Everything that can go wrong
    /// during the round is reported through [`RoundOutcome`].
    pub fn resolve_melee_round(
        &mut self,
        attacker: EntityId,
        defender: EntityId,
        options: RoundOptions,
    ) -> Result<RoundOutcome, CombatError> {
        self.validate_round(attacker, defender)?;
        let is_player = self.combatant(attacker)?.is_player();

        tracing::debug!(
            %attacker,
            %defender,
            simulated = options.simulated,
            special = ?options.special,
            "melee round start"
        );
        let outcome = if is_player {
            self.player_round(attacker, defender, &options)?
        } else {
            self.creature_round(attacker, defender, &options)?
        };
        tracing::info!(
            %attacker,
            %defender,
            consumed_turn = outcome.consumed_turn,
            did_hit = outcome.did_hit,
            strikes = outcome.strikes,
            time_cost = outcome.time_cost,
            aborted = ?outcome.aborted,
            "melee round resolved"
        );
        Ok(outcome)
    }

    /// Classifies how open `defender` is to a stab from `attacker`.
    pub fn resolve_stab_classification(
        &self,
        attacker: Option<EntityId>,
        defender: EntityId,
        committing: bool,
    ) -> Result<StabType, CombatError> {
        let attacker = attacker.map(|id| self.combatant(id)).transpose()?;
        let defender = self.combatant(defender)?;
        Ok(stab::classify(
            attacker,
            defender,
            self.arena.env.map,
            committing,
        ))
    }

    /// Applies `defender`'s resistances to `raw` damage of `flavour`.
    ///
    /// With [`ResistSource::Mount`] the check is made against the ridden
    /// mount; a defender without a mount falls back to itself.
    pub fn adjust_for_resistance(
        &mut self,
        defender: EntityId,
        flavour: DamageFlavour,
        raw: i32,
        source: ResistSource,
    ) -> Result<i32, CombatError> {
        let combatant = self
            .arena
            .field
            .get(defender)
            .ok_or(CombatError::UnknownCombatant { id: defender })?;
        let tables = self.arena.env.tables;
        let rng = &mut *self.arena.rng;
        let adjusted = match (source, combatant.mount_view()) {
            (ResistSource::Mount, Some(view)) => {
                resist::resist_adjust_damage(&view, flavour, raw, tables, rng)
            }
            _ => resist::resist_adjust_damage(combatant, flavour, raw, tables, rng),
        };
        Ok(adjusted)
    }

    /// Damage points `armor` blocks out of `damage`.
    pub fn mitigate_by_armor(&mut self, damage: i32, armor: i32) -> i32 {
        armor::mitigate(damage, armor, &mut *self.arena.rng)
    }

    /// Targets one swing from `slot` at `position` would reach, in strike order.
    pub fn build_cleave_targets(
        &mut self,
        attacker: EntityId,
        position: Position,
        slot: HandSlot,
    ) -> Result<CleaveTargets, CombatError> {
        let combatant = self
            .arena
            .field
            .get(attacker)
            .ok_or(CombatError::UnknownCombatant { id: attacker })?;
        Ok(cleave::build_cleave_targets(
            &*self.arena.field,
            self.arena.env,
            &mut *self.arena.rng,
            combatant,
            position,
            slot,
        ))
    }

    /// Strikes the queued `targets` in order.
    pub fn execute_cleave(
        &mut self,
        attacker: EntityId,
        targets: &mut CleaveTargets,
        slot: HandSlot,
        start_index: u8,
        special: Option<SpecialMode>,
    ) -> Result<CleaveOutcome, CombatError> {
        self.combatant(attacker)?;
        let options = RoundOptions {
            special,
            ..RoundOptions::default()
        };
        Ok(cleave::execute_cleave(
            &mut self.arena,
            &mut self.striker,
            attacker,
            targets,
            slot,
            start_index,
            &options,
        ))
    }

    // ===== validation =====

    fn combatant(&self, id: EntityId) -> Result<&Combatant, CombatError> {
        self.arena
            .field
            .get(id)
            .ok_or(CombatError::UnknownCombatant { id })
    }

    fn validate_round(&self, attacker: EntityId, defender: EntityId) -> Result<(), CombatError> {
        if attacker == defender {
            return Err(CombatError::SelfTarget { id: attacker });
        }
        if !self.combatant(attacker)?.is_alive() {
            return Err(CombatError::AttackerDead { id: attacker });
        }
        let target = self.combatant(defender)?;
        if !target.is_alive() {
            return Err(CombatError::defender_dead(defender, target.position));
        }
        if target.removed {
            return Err(CombatError::defender_removed(defender, target.position));
        }
        Ok(())
    }

    fn attacker_alive(&self, id: EntityId) -> bool {
        self.arena.field.get(id).is_some_and(|c| c.is_alive())
    }

    /// The round's defender can still be struck from `source`: present, in
    /// reach, and on the same side it was on when the round started.
    fn defender_valid(&self, round: &AttackRound, source: StrikeSource) -> bool {
        let (Some(attacker), Some(defender)) = (
            self.arena.field.get(round.attacker),
            self.arena.field.get(round.defender),
        ) else {
            return false;
        };
        defender.is_present()
            && defender.attitude == round.initial_attitude
            && attacker.position.distance(defender.position)
                <= source.reach(attacker, self.arena.env.tables)
    }

    // ===== strikes =====

    fn request(
        &self,
        round: &AttackRound,
        source: StrikeSource,
        options: &RoundOptions,
    ) -> StrikeRequest {
        StrikeRequest {
            attacker: round.attacker,
            defender: round.defender,
            source,
            attack_index: round.attack_index,
            effective_index: round.effective_index,
            simulated: options.simulated,
            special: options.special,
            target_count: options.target_count,
            cleaving: false,
        }
    }

    /// Performs one counted strike and books it into the round.
    ///
    /// `percent` is the time share charged if the strike actually happens.
    fn strike(
        &mut self,
        round: &mut AttackRound,
        source: StrikeSource,
        options: &RoundOptions,
        delay: u16,
        percent: u32,
    ) -> StrikeReport {
        let request = self.request(round, source, options);
        let report = self.striker.strike(&mut self.arena, &request);
        round.attack_index = round.attack_index.saturating_add(1);
        if report.cancelled {
            return report;
        }
        if report.effective_index_after > round.effective_index {
            round.charge(delay, percent);
            round.consumed_time = true;
            round.strikes += 1;
        }
        round.effective_index = report.effective_index_after;
        round.did_hit |= report.connected;
        tracing::debug!(
            attacker = %round.attacker,
            defender = %round.defender,
            ?source,
            effective_index = round.effective_index,
            connected = report.connected,
            "sub-attack"
        );
        report
    }

    // ===== player =====

    fn player_round(
        &mut self,
        attacker_id: EntityId,
        defender_id: EntityId,
        options: &RoundOptions,
    ) -> Result<RoundOutcome, CombatError> {
        let attacker = self.combatant(attacker_id)?.clone();
        let defender = self.combatant(defender_id)?.clone();

        let mut slots = guards::usable_weapon_slots(&attacker, self.arena.env.tables);
        if slots.is_empty() {
            self.arena.log.push(CombatEvent::CannotAttack {
                attacker: attacker_id,
            });
            tracing::info!(attacker = %attacker_id, "no usable melee weapon");
            return Ok(RoundOutcome::not_started(AbortReason::UnsuitableEquipment));
        }
        if let Err(reason) = guards::confirm_attack(&mut self.arena, &attacker, &defender, &slots) {
            return Ok(RoundOutcome::not_started(reason));
        }
        if !options.allows_extra_attacks() {
            slots.truncate(1);
        }

        let mut round = AttackRound::new(attacker_id, defender_id, defender.attitude);
        let extra_attack = attacker.has_extra_attack();

        for slot in slots {
            if !self.attacker_alive(attacker_id) {
                return Ok(round.finish());
            }
            let source = StrikeSource::Hand(slot);
            if !self.defender_valid(&round, source) {
                if !round.consumed_time {
                    tracing::debug!(
                        attacker = %attacker_id,
                        defender = %defender_id,
                        "defender out of reach"
                    );
                    return Ok(RoundOutcome::not_started(AbortReason::OutOfReach));
                }
                break;
            }

            let delay = attacker
                .weapon(slot)
                .map_or(self.arena.env.config.unarmed_delay, |weapon| weapon.delay);
            let percent = self
                .arena
                .env
                .config
                .cost_percent(round.effective_index, false, extra_attack);

            let mut cleave_targets = self.sweep_targets(&round, slot, options)?;
            let report = self.strike(&mut round, source, options, delay, percent);
            if report.cancelled {
                return Ok(round.abort(AbortReason::Cancelled));
            }

            if let Some(targets) = cleave_targets.as_mut() {
                let swept = cleave::execute_cleave(
                    &mut self.arena,
                    &mut self.striker,
                    attacker_id,
                    targets,
                    slot,
                    round.effective_index,
                    options,
                );
                round.effective_index = swept.effective_index;
                if swept.cancelled {
                    return Ok(round.abort(AbortReason::Cancelled));
                }
            }
            if report.connected && !options.simulated && self.companion_strike(&mut round, options)
            {
                return Ok(round.abort(AbortReason::Cancelled));
            }
        }

        if options.allows_extra_attacks()
            && self.bonus_strikes(&mut round, &attacker, options, extra_attack)
        {
            return Ok(round.abort(AbortReason::Cancelled));
        }
        Ok(round.finish())
    }

    /// Secondary targets of a cleaving swing, with the primary defender taken off.
    fn sweep_targets(
        &mut self,
        round: &AttackRound,
        slot: HandSlot,
        options: &RoundOptions,
    ) -> Result<Option<CleaveTargets>, CombatError> {
        let attacker = self.combatant(round.attacker)?;
        if !options.allows_cleave()
            || cleave::cleave_shape(attacker, slot, self.arena.env.tables) == CleaveShape::None
        {
            return Ok(None);
        }
        let primary = self.combatant(round.defender)?.position;
        let mut targets = self.build_cleave_targets(round.attacker, primary, slot)?;
        if targets.front() == Some(&round.defender) {
            targets.pop_front();
        }
        Ok(Some(targets))
    }

    /// A companion mirrors a connecting hand strike when it can reach.
    /// Returns true when the mirrored strike was cancelled.
    fn companion_strike(&mut self, round: &mut AttackRound, options: &RoundOptions) -> bool {
        let Some(companion_id) = self
            .arena
            .field
            .get(round.attacker)
            .and_then(|attacker| attacker.companion)
        else {
            return false;
        };
        let (Some(companion), Some(defender)) = (
            self.arena.field.get(companion_id),
            self.arena.field.get(round.defender),
        ) else {
            return false;
        };
        let source = StrikeSource::Hand(HandSlot::Primary);
        let in_reach = companion.position.distance(defender.position)
            <= source.reach(companion, self.arena.env.tables);
        if !companion.is_present() || !defender.is_present() || !in_reach {
            return false;
        }

        let request = StrikeRequest {
            attacker: companion_id,
            ..self.request(round, source, options)
        };
        let report = self.striker.strike(&mut self.arena, &request);
        if report.cancelled {
            return true;
        }
        if report.connected || report.effective_index_after > request.effective_index {
            round.strikes += 1;
        }
        tracing::debug!(
            companion = %companion_id,
            defender = %round.defender,
            connected = report.connected,
            "companion strike"
        );
        false
    }

    /// Mutation strikes, then one strike per mount head. Returns true when a
    /// strike was cancelled.
    fn bonus_strikes(
        &mut self,
        round: &mut AttackRound,
        attacker: &Combatant,
        options: &RoundOptions,
        extra_attack: bool,
    ) -> bool {
        let config = self.arena.env.config;
        let delay = config.unarmed_delay;

        let extra_strikes = attacker
            .player_traits()
            .map_or(0, |traits| traits.extra_strikes);
        for _ in 0..extra_strikes {
            if !self.attacker_alive(round.attacker)
                || !self.acquire_target(round, StrikeSource::Aux)
            {
                return false;
            }
            let percent = config.cost_percent(round.effective_index, true, extra_attack);
            if self.strike(round, StrikeSource::Aux, options, delay, percent).cancelled {
                return true;
            }
        }

        let heads = attacker.mount().map_or(0, |mount| mount.heads);
        for _ in 0..heads {
            if !self.attacker_alive(round.attacker) {
                return false;
            }
            let rider = round.attacker;
            let affordable = self
                .arena
                .field
                .get(rider)
                .and_then(Combatant::mount)
                .is_some_and(|mount| mount.can_afford(config.mount_attack_energy));
            if !affordable {
                self.arena.log.push(CombatEvent::MountExhausted { rider });
                tracing::debug!(%rider, "mount exhausted");
                return false;
            }
            if !self.acquire_target(round, StrikeSource::MountHead) {
                return false;
            }

            let before = round.effective_index;
            let percent = config.cost_percent(before, true, extra_attack);
            let report = self.strike(round, StrikeSource::MountHead, options, delay, percent);
            if report.cancelled {
                return true;
            }
            // Only a bite that actually happened tires the mount.
            if report.effective_index_after > before
                && let Some(mount) = self.arena.field.get_mut(rider).and_then(Combatant::mount_mut)
            {
                mount.energy.drain(config.mount_attack_energy);
            }
        }
        false
    }

    /// Keeps the current defender if it is still valid, otherwise picks a
    /// random adjacent hostile. Returns false when nobody is left to hit.
    ///
    /// A round that has not struck anything yet never retargets.
    fn acquire_target(&mut self, round: &mut AttackRound, source: StrikeSource) -> bool {
        if self.defender_valid(round, source) {
            return true;
        }
        if !round.consumed_time {
            return false;
        }
        let Some(attacker) = self.arena.field.get(round.attacker) else {
            return false;
        };
        let candidates: Vec<EntityId> = self
            .arena
            .field
            .adjacent_to(attacker.position)
            .into_iter()
            .filter(|&id| {
                self.arena.field.get(id).is_some_and(|other| {
                    other.id != attacker.id
                        && !other.is_aligned_with(attacker)
                        && other.attitude != Attitude::Neutral
                })
            })
            .collect();
        let Some(index) = self.arena.rng.choose_index(candidates.len()) else {
            tracing::debug!(attacker = %round.attacker, "no target left for bonus strikes");
            return false;
        };
        self.retarget(round, candidates[index]);
        true
    }

    fn retarget(&mut self, round: &mut AttackRound, target: EntityId) {
        let attitude = self
            .arena
            .field
            .get(target)
            .map_or(round.initial_attitude, |c| c.attitude);
        self.arena.log.push(CombatEvent::Retarget {
            attacker: round.attacker,
            from: round.defender,
            to: target,
        });
        tracing::debug!(
            attacker = %round.attacker,
            from = %round.defender,
            to = %target,
            "retarget"
        );
        round.defender = target;
        round.initial_attitude = attitude;
    }

    // ===== creature =====

    fn creature_round(
        &mut self,
        attacker_id: EntityId,
        defender_id: EntityId,
        options: &RoundOptions,
    ) -> Result<RoundOutcome, CombatError> {
        let attacker = self.combatant(attacker_id)?;
        let defender = self.combatant(defender_id)?;
        let Some(traits) = attacker.creature_traits() else {
            return Ok(RoundOutcome::not_started(AbortReason::UnsuitableEquipment));
        };
        let attacks = traits.attacks.clone();
        let multi_target = traits.multi_target;
        let delay = attacker
            .weapon(HandSlot::Primary)
            .map_or(self.arena.env.config.unarmed_delay, |weapon| weapon.delay);

        let config = self.arena.env.config;
        let slot_cap = config.attack_slot_cap().min(attacks.len());
        let total_cap = config.attack_slot_cap() + usize::from(attacker.heads()) - 1;
        let mut round = AttackRound::new(attacker_id, defender_id, defender.attitude);

        if !options.simulated {
            self.try_kite(&mut round, config.kite_time_cost);
        }

        'slots: for (index, attack) in attacks.iter().take(slot_cap).enumerate() {
            let source = StrikeSource::Natural(index as u8);
            let mut repeats = 0u8;
            loop {
                if usize::from(round.attack_index) >= total_cap
                    || !self.attacker_alive(attacker_id)
                {
                    break 'slots;
                }
                if !self.defender_valid(&round, source) {
                    if !round.consumed_time {
                        tracing::debug!(
                            attacker = %attacker_id,
                            defender = %defender_id,
                            "defender out of reach"
                        );
                        return Ok(RoundOutcome::not_started(AbortReason::OutOfReach));
                    }
                    if !(multi_target && self.creature_retarget(&mut round, source)) {
                        break 'slots;
                    }
                }

                // A creature's whole round costs one action.
                let percent = if round.consumed_time { 0 } else { 100 };
                let report = self.strike(&mut round, source, options, delay, percent);
                if report.cancelled {
                    return Ok(round.abort(AbortReason::Cancelled));
                }

                repeats += 1;
                let heads = self.arena.field.get(attacker_id).map_or(0, Combatant::heads);
                if !attack.per_head || repeats >= heads {
                    break;
                }
            }
        }
        Ok(round.finish())
    }

    /// Picks a new adjacent target, preferring the player when hostile.
    fn creature_retarget(&mut self, round: &mut AttackRound, source: StrikeSource) -> bool {
        let Some(attacker) = self.arena.field.get(round.attacker) else {
            return false;
        };
        let reach = source.reach(attacker, self.arena.env.tables);
        let hostile = |other: &Combatant| {
            other.id != attacker.id
                && other.is_present()
                && !other.is_aligned_with(attacker)
                && attacker.position.distance(other.position) <= reach
        };

        let player = self
            .arena
            .field
            .player()
            .filter(|&player| player.position.is_adjacent(attacker.position) && hostile(player))
            .map(|player| player.id);
        let target = match player {
            Some(id) => Some(id),
            None => {
                let candidates: Vec<EntityId> = self
                    .arena
                    .field
                    .adjacent_to(attacker.position)
                    .into_iter()
                    .filter(|&id| self.arena.field.get(id).is_some_and(hostile))
                    .collect();
                self.arena
                    .rng
                    .choose_index(candidates.len())
                    .map(|index| candidates[index])
            }
        };
        match target {
            Some(target) if target != round.defender => {
                self.retarget(round, target);
                true
            }
            _ => false,
        }
    }

    /// A reach attacker adjacent to its target may step straight back first.
    fn try_kite(&mut self, round: &mut AttackRound, time_cost: u32) {
        let (Some(attacker), Some(defender)) = (
            self.arena.field.get(round.attacker),
            self.arena.field.get(round.defender),
        ) else {
            return;
        };
        let reach = StrikeSource::Natural(0).reach(attacker, self.arena.env.tables);
        if reach < 2 || !attacker.position.is_adjacent(defender.position) {
            return;
        }
        let from = attacker.position;
        let to = from.offset(defender.position.delta_to(from).signum());
        let map = self.arena.env.map;
        let open = map.contains(to)
            && map.is_passable(to)
            && !self.arena.field.is_occupied(to)
            && to.distance(defender.position) <= reach;
        if !open || !self.arena.rng.one_chance_in(self.arena.env.config.kite_chance) {
            return;
        }

        self.arena.field.move_to(round.attacker, to);
        round.time_cost += time_cost;
        self.arena.log.push(CombatEvent::KiteHop {
            attacker: round.attacker,
            from,
            to,
        });
        tracing::debug!(attacker = %round.attacker, %from, %to, "kite hop");
    }
}
