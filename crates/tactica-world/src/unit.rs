use glam::IVec3;
use tactica_core::direction::Direction;
use tactica_core::types::{Faction, Position, UnitId};

/// Body collision data of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitBody {
    /// Height in voxels while standing.
    pub stand_height: i32,
    /// Height in voxels while kneeling.
    pub kneel_height: i32,
    /// Loft used for every body slice below the current height.
    pub loft: u16,
}

impl Default for UnitBody {
    fn default() -> Self {
        Self {
            stand_height: 22,
            kneel_height: 14,
            loft: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    Standing,
    Turning,
    Dead,
    Unconscious,
}

/// Armor per body side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Armor {
    pub front: i32,
    pub side: i32,
    pub rear: i32,
    pub under: i32,
}

impl Armor {
    pub fn uniform(value: i32) -> Self {
        Self {
            front: value,
            side: value,
            rear: value,
            under: value,
        }
    }
}

/// A ranged weapon carried in the main hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    pub name: String,
    /// Snap shot cost as a percentage of the carrier's base time units.
    pub snap_shot_tu_percent: i32,
    /// Rounds in the loaded clip; None when nothing is loaded.
    pub ammo: Option<i32>,
}

impl Weapon {
    pub fn new(name: impl Into<String>, snap_shot_tu_percent: i32, ammo: Option<i32>) -> Self {
        Self {
            name: name.into(),
            snap_shot_tu_percent,
            ammo,
        }
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo.is_some_and(|rounds| rounds > 0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionType {
    #[default]
    None,
    SnapShot,
}

/// Aggression slot of an AI controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggroState {
    target: Option<UnitId>,
}

impl AggroState {
    pub fn target(&self) -> Option<UnitId> {
        self.target
    }

    pub fn set_target(&mut self, target: UnitId) {
        self.target = Some(target);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    Patrol,
    Aggro(AggroState),
}

/// A combatant on the battlefield.
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub faction: Faction,
    pub position: Position,
    pub direction: Direction,
    target_direction: Direction,
    status: UnitStatus,
    pub kneeled: bool,
    pub body: UnitBody,
    pub health: i32,
    pub armor: Armor,
    stun: i32,
    fire_turns: i32,
    pub time_units: i32,
    pub base_time_units: i32,
    /// Reactions stat; scaled by the remaining time-unit fraction.
    pub reactions: i32,
    visible_units: Vec<UnitId>,
    ai_state: Option<AiState>,
    pub main_hand: Option<Weapon>,
}

impl Unit {
    pub fn new(faction: Faction, position: Position) -> Self {
        Self {
            id: UnitId(0),
            faction,
            position,
            direction: Direction::North,
            target_direction: Direction::North,
            status: UnitStatus::Standing,
            kneeled: false,
            body: UnitBody::default(),
            health: 40,
            armor: Armor::default(),
            stun: 0,
            fire_turns: 0,
            time_units: 60,
            base_time_units: 60,
            reactions: 50,
            visible_units: Vec::new(),
            ai_state: None,
            main_hand: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self.target_direction = direction;
        self
    }

    pub fn with_body(mut self, body: UnitBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn with_armor(mut self, armor: Armor) -> Self {
        self.armor = armor;
        self
    }

    pub fn with_time_units(mut self, time_units: i32) -> Self {
        self.time_units = time_units;
        self.base_time_units = time_units;
        self
    }

    pub fn with_reactions(mut self, reactions: i32) -> Self {
        self.reactions = reactions;
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.main_hand = Some(weapon);
        self
    }

    pub fn with_ai(mut self, state: AiState) -> Self {
        self.ai_state = Some(state);
        self
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    /// Dead or unconscious.
    pub fn is_out(&self) -> bool {
        matches!(self.status, UnitStatus::Dead | UnitStatus::Unconscious)
    }

    /// Current body height in voxels.
    pub fn height(&self) -> i32 {
        if self.kneeled {
            self.body.kneel_height
        } else {
            self.body.stand_height
        }
    }

    /// Reaction standing: reactions scaled by the fraction of time units left.
    pub fn reaction_score(&self) -> f64 {
        if self.base_time_units <= 0 {
            return 0.0;
        }
        self.reactions as f64 * self.time_units as f64 / self.base_time_units as f64
    }

    // --- Vitals ---

    /// Apply damage arriving at `offset` (voxels from the body centre; zero means
    /// from underneath). Returns the damage that got through the armor.
    pub fn damage(&mut self, offset: IVec3, power: i32) -> i32 {
        if self.status == UnitStatus::Dead {
            return 0;
        }
        let armor = self.armor_facing(offset);
        let wound = (power - armor).max(0);
        self.health = (self.health - wound).max(0);
        if self.health == 0 {
            self.status = UnitStatus::Dead;
        } else if self.stun >= self.health {
            self.status = UnitStatus::Unconscious;
        }
        wound
    }

    fn armor_facing(&self, offset: IVec3) -> i32 {
        let Some(side) = Direction::towards(IVec3::ZERO, offset) else {
            return self.armor.under;
        };
        match (side.index() - self.direction.index()).rem_euclid(8) {
            0 => self.armor.front,
            4 => self.armor.rear,
            _ => self.armor.side,
        }
    }

    pub fn stun_level(&self) -> i32 {
        self.stun
    }

    pub fn stun(&mut self, power: i32) {
        if power <= 0 || self.is_out() {
            return;
        }
        self.stun += power;
        if self.stun >= self.health {
            self.status = UnitStatus::Unconscious;
        }
    }

    pub fn fire_turns(&self) -> i32 {
        self.fire_turns
    }

    pub fn set_fire(&mut self, turns: i32) {
        self.fire_turns = turns.max(0);
    }

    // --- Facing ---

    /// Start turning towards a tile. No-op when it is straight above or below.
    pub fn look_at(&mut self, target: Position) {
        let Some(direction) = Direction::towards(self.position, target) else {
            return;
        };
        self.target_direction = direction;
        if direction != self.direction && !self.is_out() {
            self.status = UnitStatus::Turning;
        }
    }

    /// Rotate one eighth of a turn towards the target facing, taking the short way.
    pub fn turn(&mut self) {
        if self.status != UnitStatus::Turning {
            return;
        }
        let delta = (self.target_direction.index() - self.direction.index()).rem_euclid(8);
        self.direction = match delta {
            0 => self.direction,
            1..=4 => self.direction.clockwise(),
            _ => self.direction.counter_clockwise(),
        };
        if self.direction == self.target_direction {
            self.status = UnitStatus::Standing;
        }
    }

    /// Turn to face a tile, completing the whole rotation before returning.
    pub fn turn_to_face(&mut self, target: Position) {
        self.look_at(target);
        // Four steps reach any facing.
        for _ in 0..8 {
            if self.status != UnitStatus::Turning {
                break;
            }
            self.turn();
        }
    }

    // --- Time units ---

    /// Time-unit cost of an action with a weapon.
    pub fn action_tus(&self, action: ActionType, weapon: &Weapon) -> i32 {
        match action {
            ActionType::None => 0,
            ActionType::SnapShot => self.base_time_units * weapon.snap_shot_tu_percent / 100,
        }
    }

    /// Deduct time units if affordable. Debug mode always succeeds for free.
    pub fn spend_time_units(&mut self, cost: i32, debug_mode: bool) -> bool {
        if debug_mode {
            return true;
        }
        if cost <= self.time_units {
            self.time_units -= cost;
            true
        } else {
            false
        }
    }

    // --- AI state ---

    pub fn ai_state(&self) -> Option<&AiState> {
        self.ai_state.as_ref()
    }

    /// The unit's aggression slot, switching its controller to aggression first
    /// when it has none.
    pub fn aggro_state_mut(&mut self) -> &mut AggroState {
        if !matches!(self.ai_state, Some(AiState::Aggro(_))) {
            log::trace!("unit {} switches to aggression", self.id);
            self.ai_state = Some(AiState::Aggro(AggroState::default()));
        }
        match &mut self.ai_state {
            Some(AiState::Aggro(state)) => state,
            _ => unreachable!("aggression state installed above"),
        }
    }

    // --- Visibility ---

    pub fn visible_units(&self) -> &[UnitId] {
        &self.visible_units
    }

    /// Record a sighting. Returns true when the unit was not yet visible.
    pub fn add_visible(&mut self, unit: UnitId) -> bool {
        if self.visible_units.contains(&unit) {
            return false;
        }
        self.visible_units.push(unit);
        true
    }

    pub fn clear_visible(&mut self) {
        self.visible_units.clear();
    }

    pub fn sees(&self, unit: UnitId) -> bool {
        self.visible_units.contains(&unit)
    }

    /// Checksum of the visible set: sum of id + 1.
    pub fn visible_checksum(&self) -> u64 {
        self.visible_units.iter().map(|id| id.0 as u64 + 1).sum()
    }
}
