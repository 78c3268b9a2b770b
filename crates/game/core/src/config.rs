/// Combat tuning constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Distinct natural attack slots a creature may use per round.
    pub max_monster_attack_slots: u8,
    /// Time share of the second sub-attack (offhand) in percent.
    pub offhand_cost_percent: u32,
    /// Time share of bonus (mutation or mount) attacks in percent.
    pub aux_cost_percent: u32,
    /// Mount energy spent per head attack.
    pub mount_attack_energy: u32,
    /// A reach attacker hops back with probability 1 / `kite_chance`.
    pub kite_chance: u32,
    /// Extra ticks charged for a kiting hop.
    pub kite_time_cost: u32,
    pub unarmed_delay: u16,
    pub unarmed_damage: u16,
    /// A hit against a mounted player lands on the mount with probability 1 / this.
    pub mount_absorb_chance: u32,
    /// Base to-hit chance in percent for the standard striker.
    pub base_hit_chance: u32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Capacity of a creature's natural attack list.
    pub const MAX_ATTACK_SLOTS: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_MONSTER_ATTACK_SLOTS: u8 = 4;
    pub const DEFAULT_OFFHAND_COST_PERCENT: u32 = 50;
    pub const DEFAULT_AUX_COST_PERCENT: u32 = 25;
    pub const DEFAULT_MOUNT_ATTACK_ENERGY: u32 = 10;
    pub const DEFAULT_KITE_CHANCE: u32 = 8;
    pub const DEFAULT_KITE_TIME_COST: u32 = 2;
    pub const DEFAULT_UNARMED_DELAY: u16 = 10;
    pub const DEFAULT_UNARMED_DAMAGE: u16 = 3;
    pub const DEFAULT_MOUNT_ABSORB_CHANCE: u32 = 3;
    pub const DEFAULT_BASE_HIT_CHANCE: u32 = 80;

    pub fn new() -> Self {
        Self {
            max_monster_attack_slots: Self::DEFAULT_MAX_MONSTER_ATTACK_SLOTS,
            offhand_cost_percent: Self::DEFAULT_OFFHAND_COST_PERCENT,
            aux_cost_percent: Self::DEFAULT_AUX_COST_PERCENT,
            mount_attack_energy: Self::DEFAULT_MOUNT_ATTACK_ENERGY,
            kite_chance: Self::DEFAULT_KITE_CHANCE,
            kite_time_cost: Self::DEFAULT_KITE_TIME_COST,
            unarmed_delay: Self::DEFAULT_UNARMED_DELAY,
            unarmed_damage: Self::DEFAULT_UNARMED_DAMAGE,
            mount_absorb_chance: Self::DEFAULT_MOUNT_ABSORB_CHANCE,
            base_hit_chance: Self::DEFAULT_BASE_HIT_CHANCE,
        }
    }

    /// Attack slots actually usable, never more than the list capacity.
    pub fn attack_slot_cap(&self) -> usize {
        usize::from(self.max_monster_attack_slots).min(Self::MAX_ATTACK_SLOTS)
    }

    /// Time share in percent for a sub-attack.
    ///
    /// Weapon swings pay in full only as the first effective attack of the
    /// round; bonus attacks pay the auxiliary share, or nothing while an
    /// extra-attack state is active.
    pub fn cost_percent(&self, effective_index: u8, bonus: bool, extra_attack: bool) -> u32 {
        match (bonus, effective_index) {
            (true, _) if extra_attack => 0,
            (true, _) => self.aux_cost_percent,
            (false, 0) => 100,
            (false, _) => self.offhand_cost_percent,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
