//! Reaction fire: opposing units interrupting an action with a snap shot.

use tactica_core::constants::REACTION_RANGE;
use tactica_core::math::tile_distance;
use tactica_core::types::{Faction, Position, TurnContext, UnitId};
use tactica_world::unit::{ActionType, Weapon};
use tactica_world::Battlefield;

use crate::fov::calculate_fov;
use crate::rng::RandomSource;

/// An action about to be carried out, filled in by `check_reaction_fire`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleAction {
    pub actor: Option<UnitId>,
    pub action_type: ActionType,
    pub target: Position,
    pub weapon: Option<Weapon>,
    /// Time units the action costs the actor.
    pub time_units: i32,
}

/// Check whether an opposing unit reacts to `unit` acting.
///
/// A hostile `potential_victim` may first turn to face the actor, which forces a
/// field-of-view refresh. The best-scoring opposing unit within range that sees
/// the actor fires a snap shot when its score beats the actor's own, it holds a
/// loaded weapon and it can pay the time units. On success `action` describes
/// the shot and hostile participants target each other.
pub fn check_reaction_fire(
    bf: &mut Battlefield,
    unit: UnitId,
    action: &mut BattleAction,
    potential_victim: Option<UnitId>,
    mut recalculate_fov: bool,
    rng: &mut dyn RandomSource,
    ctx: &TurnContext,
) -> bool {
    action.actor = None;
    let Some((position, faction, own_score)) = bf
        .unit(unit)
        .map(|u| (u.position, u.faction, u.reaction_score()))
    else {
        return false;
    };
    if faction != ctx.active_side {
        return false;
    }

    if let Some(victim) = potential_victim {
        if rng.generate(0, 4) == 1 {
            if let Some(victim) = bf.unit_mut(victim).filter(|v| v.faction == Faction::Hostile) {
                let facing = victim.direction;
                victim.turn_to_face(position);
                if victim.direction != facing {
                    recalculate_fov = true;
                }
            }
        }
    }

    let watchers: Vec<UnitId> = bf
        .units
        .iter()
        .filter(|u| {
            tile_distance(position, u.position) < REACTION_RANGE
                && u.faction != ctx.active_side
                && !u.is_out()
        })
        .map(|u| u.id)
        .collect();

    let mut highest = 0.0;
    for id in watchers {
        if recalculate_fov {
            calculate_fov(bf, id);
        }
        let Some(watcher) = bf.unit(id) else {
            continue;
        };
        let score = watcher.reaction_score();
        if watcher.sees(unit) && score > highest {
            highest = score;
            action.actor = Some(id);
        }
    }

    let Some(shooter) = action.actor else {
        return false;
    };
    if highest <= own_score {
        return false;
    }

    action.action_type = ActionType::SnapShot;
    action.target = position;
    action.weapon = bf.main_hand_weapon(shooter).cloned();
    let Some(reactor) = bf.unit_mut(shooter) else {
        return false;
    };
    action.time_units = action
        .weapon
        .as_ref()
        .map_or(0, |w| reactor.action_tus(action.action_type, w));
    let loaded = action.weapon.as_ref().is_some_and(Weapon::has_ammo);
    if !loaded || !reactor.spend_time_units(action.time_units, ctx.debug_mode) {
        return false;
    }
    let shooter_faction = reactor.faction;

    if faction == Faction::Hostile {
        if let Some(target) = bf.unit_mut(unit) {
            target.aggro_state_mut().set_target(shooter);
        }
    }
    if shooter_faction == Faction::Hostile {
        if let Some(reactor) = bf.unit_mut(shooter) {
            reactor.aggro_state_mut().set_target(unit);
        }
    }
    log::debug!(
        "unit {} reacts to unit {} with a snap shot ({} TU)",
        shooter,
        unit,
        action.time_units
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fov::calculate_fov_area;
    use crate::test_harness::*;
    use glam::IVec3;
    use tactica_core::direction::Direction;
    use tactica_world::unit::{AiState, Unit};

    fn at(x: i32, y: i32) -> Position {
        IVec3::new(x, y, 0)
    }

    fn rifle(ammo: Option<i32>) -> Weapon {
        Weapon::new("Rifle", 25, ammo)
    }

    /// A player soldier walking east towards an alien watching west.
    fn standoff(alien_reactions: i32, ammo: Option<i32>) -> (Battlefield, UnitId, UnitId) {
        let mut bf = open_ground(20, 20, 1);
        daylight(&mut bf);
        let soldier = spawn(&mut bf, Faction::Player, at(2, 10), Direction::East);
        let alien = bf
            .spawn_unit(armed(
                Faction::Hostile,
                at(8, 10),
                Direction::West,
                alien_reactions,
                rifle(ammo),
            ))
            .unwrap();
        (bf, soldier, alien)
    }

    fn armed(
        faction: Faction,
        pos: Position,
        facing: Direction,
        reactions: i32,
        weapon: Weapon,
    ) -> Unit {
        soldier(faction, pos, facing)
            .with_reactions(reactions)
            .with_weapon(weapon)
    }

    fn player_turn() -> TurnContext {
        TurnContext::new(0, Faction::Player)
    }

    #[test]
    fn test_inactive_side_never_triggers() {
        let (mut bf, soldier, alien) = standoff(80, Some(10));
        let mut action = BattleAction {
            actor: Some(alien),
            ..BattleAction::default()
        };
        let ctx = TurnContext::new(0, Faction::Hostile);
        let fired = check_reaction_fire(
            &mut bf,
            soldier,
            &mut action,
            None,
            true,
            &mut FixedRandom::low(),
            &ctx,
        );
        assert!(!fired);
        assert_eq!(action.actor, None);
    }

    #[test]
    fn test_faster_watcher_fires_snap_shot() {
        let (mut bf, soldier, alien) = standoff(80, Some(10));
        let mut action = BattleAction::default();
        let fired = check_reaction_fire(
            &mut bf,
            soldier,
            &mut action,
            None,
            true,
            &mut FixedRandom::low(),
            &player_turn(),
        );
        assert!(fired);
        assert_eq!(action.actor, Some(alien));
        assert_eq!(action.action_type, ActionType::SnapShot);
        assert_eq!(action.target, at(2, 10));
        assert_eq!(action.weapon, Some(rifle(Some(10))));
        assert_eq!(action.time_units, 15);

        let shooter = bf.unit(alien).unwrap();
        assert_eq!(shooter.time_units, 45);
        match shooter.ai_state() {
            Some(AiState::Aggro(state)) => assert_eq!(state.target(), Some(soldier)),
            other => panic!("expected aggression, got {other:?}"),
        }
        // Player units have no AI controller to update.
        assert!(bf.unit(soldier).unwrap().ai_state().is_none());
    }

    #[test]
    fn test_slower_watcher_holds_fire() {
        let (mut bf, soldier, alien) = standoff(30, Some(10));
        let mut action = BattleAction::default();
        let fired = check_reaction_fire(
            &mut bf,
            soldier,
            &mut action,
            None,
            true,
            &mut FixedRandom::low(),
            &player_turn(),
        );
        assert!(!fired);
        assert_eq!(bf.unit(alien).unwrap().time_units, 60);
        assert!(bf.unit(alien).unwrap().ai_state().is_none());
    }

    #[test]
    fn test_empty_weapon_holds_fire() {
        for ammo in [None, Some(0)] {
            let (mut bf, soldier, alien) = standoff(80, ammo);
            let mut action = BattleAction::default();
            let fired = check_reaction_fire(
                &mut bf,
                soldier,
                &mut action,
                None,
                true,
                &mut FixedRandom::low(),
                &player_turn(),
            );
            assert!(!fired);
            assert_eq!(bf.unit(alien).unwrap().time_units, 60);
        }
    }

    #[test]
    fn test_unaffordable_shot_holds_fire_unless_debugging() {
        let (mut bf, soldier, alien) = standoff(400, Some(10));
        bf.unit_mut(alien).unwrap().time_units = 10;
        let mut action = BattleAction::default();
        let mut rng = FixedRandom::low();
        assert!(!check_reaction_fire(
            &mut bf,
            soldier,
            &mut action,
            None,
            true,
            &mut rng,
            &player_turn(),
        ));
        assert_eq!(bf.unit(alien).unwrap().time_units, 10);

        let ctx = TurnContext {
            debug_mode: true,
            ..player_turn()
        };
        assert!(check_reaction_fire(
            &mut bf,
            soldier,
            &mut action,
            None,
            true,
            &mut rng,
            &ctx,
        ));
        assert_eq!(bf.unit(alien).unwrap().time_units, 10);
    }

    #[test]
    fn test_watchers_beyond_range_ignored() {
        let mut bf = open_ground(24, 3, 1);
        daylight(&mut bf);
        let soldier = spawn(&mut bf, Faction::Player, at(0, 1), Direction::East);
        let alien = bf
            .spawn_unit(armed(Faction::Hostile, at(19, 1), Direction::West, 200, rifle(Some(5))))
            .unwrap();
        calculate_fov_area(&mut bf, &TurnContext::new(0, Faction::Hostile));
        assert!(bf.unit(alien).unwrap().sees(soldier));

        let mut action = BattleAction::default();
        assert!(!check_reaction_fire(
            &mut bf,
            soldier,
            &mut action,
            None,
            false,
            &mut FixedRandom::low(),
            &player_turn(),
        ));
        assert_eq!(action.actor, None);
    }

    #[test]
    fn test_victim_turns_to_face_and_reacts() {
        let (mut bf, soldier, alien) = standoff(80, Some(10));
        bf.unit_mut(alien).unwrap().direction = Direction::East;

        // The roll misses: the alien keeps looking away and its stale view is empty.
        let mut action = BattleAction::default();
        let mut miss = ScriptedRandom::new().ints(&[0]);
        assert!(!check_reaction_fire(
            &mut bf,
            soldier,
            &mut action,
            Some(alien),
            false,
            &mut miss,
            &player_turn(),
        ));
        assert_eq!(bf.unit(alien).unwrap().direction, Direction::East);

        let mut hit = ScriptedRandom::new().ints(&[1]);
        assert!(check_reaction_fire(
            &mut bf,
            soldier,
            &mut action,
            Some(alien),
            false,
            &mut hit,
            &player_turn(),
        ));
        assert_eq!(bf.unit(alien).unwrap().direction, Direction::West);
        assert_eq!(action.actor, Some(alien));
    }

    #[test]
    fn test_hostile_actor_targets_its_shooter() {
        let mut bf = open_ground(20, 20, 1);
        daylight(&mut bf);
        let alien = spawn(&mut bf, Faction::Hostile, at(2, 10), Direction::East);
        let soldier = bf
            .spawn_unit(armed(Faction::Player, at(8, 10), Direction::West, 90, rifle(Some(3))))
            .unwrap();
        let mut action = BattleAction::default();
        assert!(check_reaction_fire(
            &mut bf,
            alien,
            &mut action,
            None,
            true,
            &mut FixedRandom::low(),
            &TurnContext::new(0, Faction::Hostile),
        ));
        assert_eq!(action.actor, Some(soldier));
        match bf.unit(alien).unwrap().ai_state() {
            Some(AiState::Aggro(state)) => assert_eq!(state.target(), Some(soldier)),
            other => panic!("expected aggression, got {other:?}"),
        }
        assert!(bf.unit(soldier).unwrap().ai_state().is_none());
    }
}
