use tactica_core::constants::{
    FIREPROOF, LIGHT_LAYERS, MAX_LIGHT, MAX_SMOKE, UFO_DOOR_OPEN_FRAME,
};
use tactica_core::terrain::{DoorKind, TerrainPartDef, TerrainPartTable};
use tactica_core::types::{
    DiscoveryChannel, DoorOutcome, ItemId, PartId, Position, TilePart, UnitId, ALL_PARTS,
};

/// One grid cell: up to four shared terrain parts plus per-turn mutable state.
#[derive(Debug, Clone)]
pub struct Tile {
    position: Position,
    parts: [Option<PartId>; 4],
    /// UFO door animation frame per part slot (0 = closed).
    door_frames: [u8; 4],
    discovered: [bool; 3],
    light: [i32; LIGHT_LAYERS],
    smoke: i32,
    fire: i32,
    /// Pending explosive power, consumed by `detonate` or `take_explosive`.
    explosive: i32,
    unit: Option<UnitId>,
    items: Vec<ItemId>,
}

impl Tile {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            parts: [None; 4],
            door_frames: [0; 4],
            discovered: [false; 3],
            light: [0; LIGHT_LAYERS],
            smoke: 0,
            fire: 0,
            explosive: 0,
            unit: None,
            items: Vec::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    // --- Parts ---

    pub fn part(&self, slot: TilePart) -> Option<PartId> {
        self.parts[slot.index()]
    }

    /// Place (or clear) a part. Resets the slot's door animation.
    pub fn set_part(&mut self, slot: TilePart, part: Option<PartId>) {
        self.parts[slot.index()] = part;
        self.door_frames[slot.index()] = 0;
    }

    pub fn has_part(&self, slot: TilePart) -> bool {
        self.parts[slot.index()].is_some()
    }

    /// Resolve the descriptor in a slot.
    pub fn part_def<'a>(
        &self,
        slot: TilePart,
        parts: &'a TerrainPartTable,
    ) -> Option<&'a TerrainPartDef> {
        self.part(slot).and_then(|id| parts.get(id))
    }

    /// UFO doors stay logically present while open; this tells whether one is.
    pub fn is_ufo_door_open(&self, slot: TilePart, parts: &TerrainPartTable) -> bool {
        self.part_def(slot, parts).is_some_and(|def| def.is_ufo_door())
            && self.door_frames[slot.index()] != 0
    }

    /// Lowest standing-surface offset of the floor and object parts.
    pub fn terrain_level(&self, parts: &TerrainPartTable) -> i32 {
        [TilePart::Floor, TilePart::Object]
            .iter()
            .filter_map(|&slot| self.part_def(slot, parts))
            .map(|def| def.terrain_level)
            .fold(0, i32::min)
    }

    /// Lowest flammability of all present parts; fireproof when empty.
    pub fn flammability(&self, parts: &TerrainPartTable) -> i32 {
        ALL_PARTS
            .iter()
            .filter_map(|&slot| self.part_def(slot, parts))
            .map(|def| def.flammability)
            .fold(FIREPROOF, i32::min)
    }

    fn fuel(&self, parts: &TerrainPartTable) -> i32 {
        ALL_PARTS
            .iter()
            .filter_map(|&slot| self.part_def(slot, parts))
            .map(|def| def.fuel)
            .max()
            .unwrap_or(0)
    }

    // --- Doors ---

    /// Try to open the door in a slot.
    pub fn open_door(&mut self, slot: TilePart, parts: &TerrainPartTable) -> DoorOutcome {
        let Some(def) = self.part_def(slot, parts) else {
            return DoorOutcome::NoDoor;
        };
        let i = slot.index();
        match def.door {
            DoorKind::None => DoorOutcome::NoDoor,
            DoorKind::Hinged { open_part } => {
                self.set_part(slot, Some(open_part));
                DoorOutcome::Opened
            }
            DoorKind::Ufo => match self.door_frames[i] {
                0 => {
                    self.door_frames[i] = 1;
                    DoorOutcome::UfoOpening
                }
                UFO_DOOR_OPEN_FRAME => DoorOutcome::NoDoor,
                _ => DoorOutcome::UfoStillOpening,
            },
        }
    }

    /// Step every opening UFO door one animation frame.
    pub fn advance_door_frames(&mut self, parts: &TerrainPartTable) {
        for slot in ALL_PARTS {
            let i = slot.index();
            if self.door_frames[i] != 0
                && self.door_frames[i] < UFO_DOOR_OPEN_FRAME
                && self.part_def(slot, parts).is_some_and(|d| d.is_ufo_door())
            {
                self.door_frames[i] += 1;
            }
        }
    }

    /// Close all open UFO doors on this tile. Returns how many were closed.
    pub fn close_ufo_door(&mut self, parts: &TerrainPartTable) -> i32 {
        let mut closed = 0;
        for slot in ALL_PARTS {
            if self.is_ufo_door_open(slot, parts) {
                self.door_frames[slot.index()] = 0;
                closed += 1;
            }
        }
        closed
    }

    pub fn door_frame(&self, slot: TilePart) -> u8 {
        self.door_frames[slot.index()]
    }

    // --- Damage ---

    /// Apply terrain damage to a part. Returns true when the part was destroyed.
    pub fn damage(&mut self, slot: TilePart, power: i32, parts: &TerrainPartTable) -> bool {
        match self.part_def(slot, parts) {
            Some(def) if power >= def.armor => {
                self.destroy(slot, parts);
                true
            }
            _ => false,
        }
    }

    /// Replace a part with its die part. Explosive parts leave a pending detonation.
    pub fn destroy(&mut self, slot: TilePart, parts: &TerrainPartTable) {
        let Some(def) = self.part_def(slot, parts) else {
            return;
        };
        let (die_part, explosive) = (def.die_part, def.explosive);
        log::trace!(
            "destroyed '{}' at {} ({:?})",
            def.name,
            self.position,
            slot
        );
        self.set_part(slot, die_part);
        if explosive > 0 {
            self.set_explosive(explosive);
        }
    }

    pub fn explosive(&self) -> i32 {
        self.explosive
    }

    /// Raise the pending explosive power; never lowers it.
    pub fn set_explosive(&mut self, power: i32) {
        if power > self.explosive {
            self.explosive = power;
        }
    }

    /// Consume the pending explosive power.
    pub fn take_explosive(&mut self) -> i32 {
        std::mem::take(&mut self.explosive)
    }

    /// Finalise terrain destruction from the pending explosive power.
    ///
    /// Every part whose armor does not exceed the power is destroyed; when the
    /// power left over also beats the die part's armor, that goes as well.
    /// Destroyed explosive parts may set a fresh marker for chained detonation.
    /// Returns the consumed power.
    pub fn detonate(&mut self, parts: &TerrainPartTable) -> i32 {
        let power = self.take_explosive();
        if power == 0 {
            return 0;
        }
        for slot in ALL_PARTS {
            let Some(armor) = self.part_def(slot, parts).map(|d| d.armor) else {
                continue;
            };
            if power < armor {
                continue;
            }
            self.destroy(slot, parts);
            let remaining = power - armor;
            if self
                .part_def(slot, parts)
                .is_some_and(|next| remaining >= next.armor)
            {
                self.destroy(slot, parts);
            }
        }
        power
    }

    // --- Light ---

    /// Add a light contribution; a layer keeps its brightest contribution (0–15).
    pub fn add_light(&mut self, power: i32, layer: usize) {
        if let Some(value) = self.light.get_mut(layer) {
            *value = (*value).max(power.min(MAX_LIGHT));
        }
    }

    pub fn reset_light(&mut self, layer: usize) {
        if let Some(value) = self.light.get_mut(layer) {
            *value = 0;
        }
    }

    pub fn light(&self, layer: usize) -> i32 {
        self.light.get(layer).copied().unwrap_or(0)
    }

    /// Darkness 0 (lit) – 15 (black), from the brightest layer.
    pub fn shade(&self) -> i32 {
        let brightest = self.light.iter().copied().max().unwrap_or(0);
        (MAX_LIGHT - brightest).max(0)
    }

    // --- Smoke and fire ---

    pub fn smoke(&self) -> i32 {
        self.smoke
    }

    pub fn add_smoke(&mut self, amount: i32) {
        self.smoke = (self.smoke + amount).clamp(0, MAX_SMOKE);
    }

    pub fn fire(&self) -> i32 {
        self.fire
    }

    /// Set the tile on fire. Fireproof or already burning tiles are unaffected.
    pub fn ignite(&mut self, parts: &TerrainPartTable) -> bool {
        if self.fire > 0 {
            return false;
        }
        let flammability = self.flammability(parts);
        if flammability >= FIREPROOF {
            return false;
        }
        self.fire = self.fuel(parts).max(1);
        self.smoke = self.smoke.max((15 - flammability / 10).clamp(1, 12));
        true
    }

    /// Thin smoke by one level. A burning tile keeps smoking.
    pub fn decay_smoke(&mut self) {
        if self.fire == 0 && self.smoke > 0 {
            self.smoke -= 1;
        }
    }

    /// Burn one turn of fuel. When the fire dies the flammable parts burn away.
    pub fn decay_fire(&mut self, parts: &TerrainPartTable) {
        if self.fire == 0 {
            return;
        }
        self.fire -= 1;
        if self.fire == 0 {
            for slot in ALL_PARTS {
                if self.part_def(slot, parts).is_some_and(|d| d.is_flammable()) {
                    self.destroy(slot, parts);
                }
            }
        }
    }

    /// Natural end-of-turn decay of smoke and fire.
    pub fn prepare_new_turn(&mut self, parts: &TerrainPartTable) {
        self.decay_smoke();
        self.decay_fire(parts);
    }

    // --- Discovery ---

    pub fn is_discovered(&self, channel: DiscoveryChannel) -> bool {
        self.discovered[channel as usize]
    }

    pub fn set_discovered(&mut self, channel: DiscoveryChannel, value: bool) {
        self.discovered[channel as usize] = value;
    }

    // --- Occupant and items ---

    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }

    pub fn set_unit(&mut self, unit: Option<UnitId>) {
        self.unit = unit;
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn add_item(&mut self, item: ItemId) {
        self.items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    fn table() -> TerrainPartTable {
        let mut floor = TerrainPartDef::new(1, "Grass");
        floor.armor = 10;
        floor.flammability = 40;
        floor.fuel = 3;
        floor.die_part = Some(PartId(2));

        let mut scorched = TerrainPartDef::new(2, "Scorched");
        scorched.armor = 60;

        let mut crate_part = TerrainPartDef::new(3, "Fuel drum");
        crate_part.armor = 20;
        crate_part.explosive = 40;

        let mut door = TerrainPartDef::new(4, "Wooden door");
        door.door = DoorKind::Hinged {
            open_part: PartId(5),
        };
        let open = TerrainPartDef::new(5, "Open door");

        let mut ufo = TerrainPartDef::new(6, "Ufo door");
        ufo.door = DoorKind::Ufo;

        TerrainPartTable::from_parts(vec![
            TerrainPartDef::new(0, "Nothing"),
            floor,
            scorched,
            crate_part,
            door,
            open,
            ufo,
        ])
    }

    fn tile() -> Tile {
        Tile::new(IVec3::new(1, 2, 0))
    }

    #[test]
    fn test_light_keeps_brightest_and_clamps() {
        let mut t = tile();
        t.add_light(8, 1);
        t.add_light(5, 1);
        assert_eq!(t.light(1), 8);
        t.add_light(40, 1);
        assert_eq!(t.light(1), 15);
        t.add_light(-3, 2);
        assert_eq!(t.light(2), 0);
        assert_eq!(t.shade(), 0);
    }

    #[test]
    fn test_reset_light_only_touches_one_layer() {
        let mut t = tile();
        t.add_light(4, 0);
        t.add_light(9, 1);
        t.add_light(6, 2);
        t.reset_light(1);
        assert_eq!(t.light(0), 4);
        assert_eq!(t.light(1), 0);
        assert_eq!(t.light(2), 6);
        assert_eq!(t.shade(), 9);
    }

    #[test]
    fn test_damage_at_armor_destroys_to_die_part() {
        let parts = table();
        let mut t = tile();
        t.set_part(TilePart::Floor, Some(PartId(1)));
        assert!(!t.damage(TilePart::Floor, 9, &parts));
        assert!(t.damage(TilePart::Floor, 10, &parts));
        assert_eq!(t.part(TilePart::Floor), Some(PartId(2)));
    }

    #[test]
    fn test_destroying_explosive_part_sets_marker() {
        let parts = table();
        let mut t = tile();
        t.set_part(TilePart::Object, Some(PartId(3)));
        t.destroy(TilePart::Object, &parts);
        assert_eq!(t.part(TilePart::Object), None);
        assert_eq!(t.explosive(), 40);
        assert_eq!(t.take_explosive(), 40);
        assert_eq!(t.explosive(), 0);
    }

    #[test]
    fn test_detonate_consumes_marker() {
        let parts = table();
        let mut t = tile();
        t.set_part(TilePart::Floor, Some(PartId(1)));
        t.set_explosive(30);
        t.set_explosive(12);
        assert_eq!(t.detonate(&parts), 30);
        // 30 >= 10 destroys grass; 20 left < 60 keeps the scorched remains.
        assert_eq!(t.part(TilePart::Floor), Some(PartId(2)));
        assert_eq!(t.explosive(), 0);
        assert_eq!(t.detonate(&parts), 0);
    }

    #[test]
    fn test_detonate_chains_through_explosive_object() {
        let parts = table();
        let mut t = tile();
        t.set_part(TilePart::Object, Some(PartId(3)));
        t.set_explosive(25);
        t.detonate(&parts);
        assert_eq!(t.part(TilePart::Object), None);
        assert_eq!(t.explosive(), 40);
    }

    #[test]
    fn test_ignite_and_burn_out() {
        let parts = table();
        let mut t = tile();
        t.set_part(TilePart::Floor, Some(PartId(1)));
        assert_eq!(t.flammability(&parts), 40);
        assert!(t.ignite(&parts));
        assert!(!t.ignite(&parts));
        assert_eq!(t.fire(), 3);
        assert_eq!(t.smoke(), 11);

        t.prepare_new_turn(&parts);
        t.prepare_new_turn(&parts);
        assert_eq!(t.fire(), 1);
        assert_eq!(t.smoke(), 11);
        t.prepare_new_turn(&parts);
        assert_eq!(t.fire(), 0);
        assert_eq!(t.part(TilePart::Floor), Some(PartId(2)));
        t.prepare_new_turn(&parts);
        assert_eq!(t.smoke(), 10);
    }

    #[test]
    fn test_fireproof_tile_never_ignites() {
        let parts = table();
        let mut t = tile();
        assert_eq!(t.flammability(&parts), FIREPROOF);
        assert!(!t.ignite(&parts));
        assert_eq!(t.fire(), 0);
    }

    #[test]
    fn test_smoke_clamped() {
        let mut t = tile();
        t.add_smoke(15);
        t.add_smoke(15);
        assert_eq!(t.smoke(), MAX_SMOKE);
    }

    #[test]
    fn test_hinged_door_swaps_part() {
        let parts = table();
        let mut t = tile();
        t.set_part(TilePart::NorthWall, Some(PartId(4)));
        assert_eq!(t.open_door(TilePart::NorthWall, &parts), DoorOutcome::Opened);
        assert_eq!(t.part(TilePart::NorthWall), Some(PartId(5)));
        assert_eq!(t.open_door(TilePart::NorthWall, &parts), DoorOutcome::NoDoor);
        assert_eq!(t.open_door(TilePart::WestWall, &parts), DoorOutcome::NoDoor);
    }

    #[test]
    fn test_ufo_door_animation() {
        let parts = table();
        let mut t = tile();
        t.set_part(TilePart::WestWall, Some(PartId(6)));
        assert!(!t.is_ufo_door_open(TilePart::WestWall, &parts));
        assert_eq!(t.open_door(TilePart::WestWall, &parts), DoorOutcome::UfoOpening);
        assert!(t.is_ufo_door_open(TilePart::WestWall, &parts));
        assert_eq!(
            t.open_door(TilePart::WestWall, &parts),
            DoorOutcome::UfoStillOpening
        );
        for _ in 0..10 {
            t.advance_door_frames(&parts);
        }
        assert_eq!(t.door_frame(TilePart::WestWall), UFO_DOOR_OPEN_FRAME);
        assert_eq!(t.open_door(TilePart::WestWall, &parts), DoorOutcome::NoDoor);

        assert_eq!(t.close_ufo_door(&parts), 1);
        assert!(!t.is_ufo_door_open(TilePart::WestWall, &parts));
        assert_eq!(t.close_ufo_door(&parts), 0);
    }

    #[test]
    fn test_terrain_level_uses_lowest() {
        let mut raised = TerrainPartDef::new(1, "Table");
        raised.terrain_level = -8;
        let parts = TerrainPartTable::from_parts(vec![TerrainPartDef::new(0, "Floor"), raised]);
        let mut t = tile();
        assert_eq!(t.terrain_level(&parts), 0);
        t.set_part(TilePart::Floor, Some(PartId(0)));
        t.set_part(TilePart::Object, Some(PartId(1)));
        assert_eq!(t.terrain_level(&parts), -8);
    }
}
