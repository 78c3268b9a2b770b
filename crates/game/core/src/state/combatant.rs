//! Combatants and the shared fighter contract.
//!
//! The player and creatures share one [`Combatant`] record; the differences
//! live in [`CombatantKind`]. Code that only needs the common capabilities
//! (position, resistances, vitality, weapons) takes `&impl Fighter`, which is
//! also implemented by [`MountView`] so a mount can stand in as a secondary
//! resistance source.

use arrayvec::ArrayVec;
use strum::{EnumString, IntoStaticStr};

use crate::combat::DamageFlavour;
use crate::config::CombatConfig;
use crate::state::{
    Conditions, EntityId, HandSlot, Position, ResistKind, ResistVector, ResourceMeter, Weapon,
    WeaponSlots,
};

/// Disposition of a combatant towards the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Attitude {
    #[default]
    Hostile,
    Neutral,
    /// On the player's side. The player itself is always friendly.
    Friendly,
}

/// Which concrete variant sits behind a [`Fighter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FighterKind {
    Player,
    Creature,
    Mount,
}

/// Rare worn items that nudge a creature's resistance level per check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ResistCharm {
    /// Sometimes adds a level against fire, cold and electricity.
    WardingCloak,
    /// Randomly adds or removes a level against anything resistible.
    ChaosAmulet,
}

/// Shared capability contract of everything that can be struck.
pub trait Fighter {
    fn fighter_kind(&self) -> FighterKind;
    fn position(&self) -> Position;
    fn is_alive(&self) -> bool;
    fn resistance(&self, kind: ResistKind) -> i8;
    fn weapon(&self, slot: HandSlot) -> Option<&Weapon>;

    /// Intangible fighters skip elemental mitigation entirely.
    fn is_intangible(&self) -> bool {
        false
    }

    fn resist_charm(&self) -> Option<ResistCharm> {
        None
    }

    fn is_creature(&self) -> bool {
        self.fighter_kind() == FighterKind::Creature
    }
}

/// Style of a natural attack slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackKind {
    /// Swing whatever is wielded; falls back to the listed damage when empty-handed.
    Hit,
    Bite,
    Claw,
    Sting,
    Kick,
    Gore,
}

/// One entry of a creature's attack list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NaturalAttack {
    pub kind: AttackKind,
    pub damage: u16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flavour: DamageFlavour,
    /// Repeats once per head before the next slot is reached.
    #[cfg_attr(feature = "serde", serde(default))]
    pub per_head: bool,
}

impl NaturalAttack {
    pub const fn new(kind: AttackKind, damage: u16) -> Self {
        Self {
            kind,
            damage,
            flavour: DamageFlavour::Physical,
            per_head: false,
        }
    }

    pub const fn per_head(mut self) -> Self {
        self.per_head = true;
        self
    }

    pub const fn with_flavour(mut self, flavour: DamageFlavour) -> Self {
        self.flavour = flavour;
        self
    }
}

pub type AttackList = ArrayVec<NaturalAttack, { CombatConfig::MAX_ATTACK_SLOTS }>;

/// Companion ridden by the player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mount {
    pub name: String,
    /// Each head grants one bonus bite per round while energy lasts.
    pub heads: u8,
    pub energy: ResourceMeter,
    pub hp: ResourceMeter,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resists: ResistVector,
    pub bite_damage: u16,
}

impl Mount {
    pub fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }

    /// Whether another head attack can be paid for.
    pub fn can_afford(&self, cost: u32) -> bool {
        self.is_alive() && self.energy.current >= cost
    }
}

/// Traits only the player has.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerTraits {
    /// Hands available for wielding; forms can reduce this.
    pub hands: u8,
    /// Bonus strikes from mutations, redirected if the target is lost.
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_strikes: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mount: Option<Mount>,
    /// Conduct that forbids stabbing intelligent foes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub forbids_stabbing: bool,
}

impl Default for PlayerTraits {
    fn default() -> Self {
        Self {
            hands: 2,
            extra_strikes: 0,
            mount: None,
            forbids_stabbing: false,
        }
    }
}

/// Traits only creatures have.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureTraits {
    pub attacks: AttackList,
    /// Current head count for per-head attack slots (0 or 1 for most creatures).
    #[cfg_attr(feature = "serde", serde(default))]
    pub heads: u8,
    /// May switch to another adjacent foe when its target is lost mid-round.
    #[cfg_attr(feature = "serde", serde(default))]
    pub multi_target: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub intelligent: bool,
    /// Plants, fungi and other things that cannot fight back.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inanimate: bool,
    /// Moves erratically (bats, butterflies); never counts as distracted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub erratic: bool,
    /// Guardians that are always watching.
    #[cfg_attr(feature = "serde", serde(default))]
    pub distraction_immune: bool,
    /// Confusion is innate rather than a temporary state.
    #[cfg_attr(feature = "serde", serde(default))]
    pub perma_confused: bool,
    /// Who the creature is currently fighting, as tracked by its AI.
    #[cfg_attr(feature = "serde", serde(default))]
    pub focus: Option<EntityId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub charm: Option<ResistCharm>,
}

impl CreatureTraits {
    pub fn with_attacks(attacks: impl IntoIterator<Item = NaturalAttack>) -> Self {
        Self {
            attacks: attacks.into_iter().collect(),
            heads: 1,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantKind {
    Player(PlayerTraits),
    Creature(CreatureTraits),
}

/// Anything capable of attacking or being attacked.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
    pub hp: ResourceMeter,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: Conditions,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resists: ResistVector,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub evasion: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attitude: Attitude,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapons: WeaponSlots,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sees_invisible: bool,
    /// Taken off the battlefield (banished, shafted) while still alive.
    #[cfg_attr(feature = "serde", serde(default))]
    pub removed: bool,
    /// Dependent entity that mirrors this combatant's connecting strikes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub companion: Option<EntityId>,
    pub kind: CombatantKind,
}

impl Combatant {
    /// Creates the player combatant. The player is always on the friendly side.
    pub fn player(name: impl Into<String>, position: Position, hp: u32) -> Self {
        Self::base(
            EntityId::PLAYER,
            name,
            position,
            hp,
            Attitude::Friendly,
            CombatantKind::Player(PlayerTraits::default()),
        )
    }

    pub fn creature(
        id: EntityId,
        name: impl Into<String>,
        position: Position,
        hp: u32,
        traits: CreatureTraits,
    ) -> Self {
        Self::base(
            id,
            name,
            position,
            hp,
            Attitude::Hostile,
            CombatantKind::Creature(traits),
        )
    }

    fn base(
        id: EntityId,
        name: impl Into<String>,
        position: Position,
        hp: u32,
        attitude: Attitude,
        kind: CombatantKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            hp: ResourceMeter::full(hp),
            conditions: Conditions::empty(),
            resists: ResistVector::none(),
            armor: 0,
            evasion: 0,
            attitude,
            weapons: WeaponSlots::empty(),
            sees_invisible: false,
            removed: false,
            companion: None,
            kind,
        }
    }

    // ===== builder helpers =====

    pub fn with_attitude(mut self, attitude: Attitude) -> Self {
        self.attitude = attitude;
        self
    }

    pub fn with_weapons(mut self, weapons: WeaponSlots) -> Self {
        self.weapons = weapons;
        self
    }

    pub fn with_armor(mut self, armor: i32) -> Self {
        self.armor = armor;
        self
    }

    pub fn with_resists(mut self, resists: ResistVector) -> Self {
        self.resists = resists;
        self
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_companion(mut self, companion: EntityId) -> Self {
        self.companion = Some(companion);
        self
    }

    // ===== queries =====

    pub fn is_player(&self) -> bool {
        matches!(self.kind, CombatantKind::Player(_))
    }

    pub fn player_traits(&self) -> Option<&PlayerTraits> {
        match &self.kind {
            CombatantKind::Player(traits) => Some(traits),
            CombatantKind::Creature(_) => None,
        }
    }

    pub fn player_traits_mut(&mut self) -> Option<&mut PlayerTraits> {
        match &mut self.kind {
            CombatantKind::Player(traits) => Some(traits),
            CombatantKind::Creature(_) => None,
        }
    }

    pub fn creature_traits(&self) -> Option<&CreatureTraits> {
        match &self.kind {
            CombatantKind::Creature(traits) => Some(traits),
            CombatantKind::Player(_) => None,
        }
    }

    pub fn creature_traits_mut(&mut self) -> Option<&mut CreatureTraits> {
        match &mut self.kind {
            CombatantKind::Creature(traits) => Some(traits),
            CombatantKind::Player(_) => None,
        }
    }

    /// Alive and still on the battlefield.
    pub fn is_present(&self) -> bool {
        self.is_alive() && !self.removed
    }

    pub fn has(&self, conditions: Conditions) -> bool {
        self.conditions.intersects(conditions)
    }

    /// Same side of the fight. Neutrals are only aligned with other neutrals.
    pub fn is_aligned_with(&self, other: &Combatant) -> bool {
        self.attitude == other.attitude
    }

    /// Whether this combatant can perceive `other` when they share line of sight.
    pub fn perceives(&self, other: &Combatant) -> bool {
        !other.has(Conditions::INVISIBLE) || self.sees_invisible
    }

    pub fn mount(&self) -> Option<&Mount> {
        self.player_traits().and_then(|traits| traits.mount.as_ref())
    }

    pub fn mount_mut(&mut self) -> Option<&mut Mount> {
        self.player_traits_mut()
            .and_then(|traits| traits.mount.as_mut())
    }

    /// Mount viewed as a secondary resistance source, if one is ridden.
    pub fn mount_view(&self) -> Option<MountView<'_>> {
        self.mount().map(|mount| MountView { rider: self, mount })
    }

    /// Transformation or ridden mount grants a free extra attack this round.
    pub fn has_extra_attack(&self) -> bool {
        self.has(Conditions::EXTRA_ATTACK) || self.mount().is_some_and(Mount::is_alive)
    }

    /// Current head count; creatures without heads count as one.
    pub fn heads(&self) -> u8 {
        self.creature_traits()
            .map_or(1, |traits| traits.heads.max(1))
    }
}

impl Fighter for Combatant {
    fn fighter_kind(&self) -> FighterKind {
        match self.kind {
            CombatantKind::Player(_) => FighterKind::Player,
            CombatantKind::Creature(_) => FighterKind::Creature,
        }
    }

    fn position(&self) -> Position {
        self.position
    }

    fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }

    fn resistance(&self, kind: ResistKind) -> i8 {
        self.resists.get(kind)
    }

    fn weapon(&self, slot: HandSlot) -> Option<&Weapon> {
        self.weapons.get(slot)
    }

    fn is_intangible(&self) -> bool {
        self.has(Conditions::INTANGIBLE)
    }

    fn resist_charm(&self) -> Option<ResistCharm> {
        self.creature_traits().and_then(|traits| traits.charm)
    }
}

/// A ridden mount seen through the fighter contract.
#[derive(Clone, Copy, Debug)]
pub struct MountView<'a> {
    pub rider: &'a Combatant,
    pub mount: &'a Mount,
}

impl Fighter for MountView<'_> {
    fn fighter_kind(&self) -> FighterKind {
        FighterKind::Mount
    }

    fn position(&self) -> Position {
        self.rider.position
    }

    fn is_alive(&self) -> bool {
        self.mount.is_alive()
    }

    fn resistance(&self, kind: ResistKind) -> i8 {
        self.mount.resists.get(kind)
    }

    fn weapon(&self, _slot: HandSlot) -> Option<&Weapon> {
        None
    }
}
