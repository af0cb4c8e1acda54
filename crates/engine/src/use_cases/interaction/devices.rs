//! Pressure plates and mechanisms.
//!
//! Devices read their linked trap but never touch it; the trap fires when
//! the registry applies the device's link updates.

use delve_domain::{
    check_pressure_plate, detect_mechanism, detect_pressure_plate, interact_with_mechanism,
    jam_pressure_plate, release_pressure_plate, ActorStats, DetectionResult, InventoryQuery,
    MechanismId, MechanismResult, PlateId, PressurePlateJamResult, PressurePlateResult,
};

use super::{Interaction, InteractionService};
use crate::error::EngineError;

impl InteractionService {
    pub fn step_on_plate(
        &mut self,
        actor: &dyn ActorStats,
        plate_id: &PlateId,
    ) -> Result<Interaction<PressurePlateResult>, EngineError> {
        let links = &self.registry.plate(plate_id)?.links;
        self.registry.check_links(links)?;
        let trap_id = links.trap_id.clone();
        let linked_trap = self.registry.trap_snapshot(trap_id.as_ref());

        let plate = self.registry.plate_mut(plate_id)?;
        let result = check_pressure_plate(actor, plate, linked_trap.as_ref());
        let updates = result.link_updates.clone();
        self.settle(result, Vec::new(), &updates)
    }

    pub fn jam_plate(
        &mut self,
        actor: &dyn ActorStats,
        plate_id: &PlateId,
    ) -> Result<Interaction<PressurePlateJamResult>, EngineError> {
        let links = &self.registry.plate(plate_id)?.links;
        self.registry.check_links(links)?;
        let trap_id = links.trap_id.clone();
        let linked_trap = self.registry.trap_snapshot(trap_id.as_ref());

        let plate = self.registry.plate_mut(plate_id)?;
        let result = jam_pressure_plate(actor, plate, linked_trap.as_ref(), self.dice.as_ref());
        let updates = result.link_updates.clone();
        self.settle(result, Vec::new(), &updates)
    }

    /// Let a pressed plate rise. Returns whether it was pressed.
    pub fn release_plate(&mut self, plate_id: &PlateId) -> Result<bool, EngineError> {
        Ok(release_pressure_plate(self.registry.plate_mut(plate_id)?))
    }

    pub fn search_for_plate(
        &mut self,
        actor: &dyn ActorStats,
        plate_id: &PlateId,
    ) -> Result<DetectionResult, EngineError> {
        let plate = self.registry.plate_mut(plate_id)?;
        Ok(detect_pressure_plate(actor, plate, self.dice.as_ref()))
    }

    pub fn operate_mechanism(
        &mut self,
        actor: &dyn ActorStats,
        inventory: &dyn InventoryQuery,
        mechanism_id: &MechanismId,
    ) -> Result<Interaction<MechanismResult>, EngineError> {
        let links = &self.registry.mechanism(mechanism_id)?.links;
        self.registry.check_links(links)?;
        let trap_id = links.trap_id.clone();
        let linked_trap = self.registry.trap_snapshot(trap_id.as_ref());

        let mechanism = self.registry.mechanism_mut(mechanism_id)?;
        let result = interact_with_mechanism(
            actor,
            mechanism,
            inventory,
            linked_trap.as_ref(),
            self.dice.as_ref(),
        );
        if let Some(item) = &result.consumed_item {
            tracing::debug!(mechanism_id = %mechanism_id, item_id = %item, "Aid consumed");
        }
        let updates = result.link_updates.clone();
        self.settle(result, Vec::new(), &updates)
    }

    pub fn search_for_mechanism(
        &mut self,
        actor: &dyn ActorStats,
        mechanism_id: &MechanismId,
    ) -> Result<DetectionResult, EngineError> {
        let mechanism = self.registry.mechanism_mut(mechanism_id)?;
        Ok(detect_mechanism(actor, mechanism, self.dice.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use delve_domain::{
        Ability, DamageType, DiceFormula, ItemId, LinkUpdate, Links, Lock, LockId, Mechanism,
        PressurePlate, Puzzle, PuzzleId, PuzzleKind, Size, Trap, TrapEffect, TrapId, TrapKind,
        TriggerCondition,
    };

    use super::super::test_support::{commoner, rogue, scripted};
    use super::*;
    use crate::stores::InteractionRegistry;

    fn pit() -> Trap {
        Trap::new(
            TrapId::new("pit"),
            "Spiked pit",
            TrapKind::Mechanical,
            TriggerCondition::Proximity,
            13,
            13,
            TrapEffect::damage(DiceFormula::new(2, 6, 0).expect("formula"), DamageType::Piercing),
        )
    }

    fn gallery() -> InteractionRegistry {
        let mut registry = InteractionRegistry::new();
        registry.insert_trap(pit());
        registry.insert_lock(Lock::new(LockId::new("gate"), 18));
        registry.insert_plate(
            PressurePlate::new(PlateId::new("flagstone"), "loose flagstone", Size::Small)
                .with_links(Links::none().with_trap(TrapId::new("pit"))),
        );
        registry.insert_puzzle(Puzzle::new(
            PuzzleId::new("levers"),
            "Twin levers",
            PuzzleKind::Sequence {
                solution: vec!["west:on".into(), "east:on".into()],
                input: Vec::new(),
            },
            "The gate rises.",
        )
        .unlocks(LockId::new("gate")));
        for side in ["west", "east"] {
            registry.insert_mechanism(
                Mechanism::lever(MechanismId::new(side), format!("{side} lever")).with_links(
                    Links::none().with_puzzle(PuzzleId::new("levers"), side),
                ),
            );
        }
        registry
    }

    fn service(faces: &[i32]) -> InteractionService {
        InteractionService::new(Arc::new(scripted(faces)), gallery())
    }

    #[test]
    fn stepping_on_a_plate_springs_the_pit() {
        let mut service = service(&[3, 4]);
        let outcome = service
            .step_on_plate(&commoner(), &PlateId::new("flagstone"))
            .expect("step");
        assert!(outcome.result.triggered);
        assert_eq!(outcome.links.fired_traps.len(), 1);
        assert_eq!(outcome.total_damage(), 7);
        assert!(service.registry().trap(&TrapId::new("pit")).expect("trap").is_triggered);

        // Released and pressed again, the spent pit stays quiet.
        assert!(service.release_plate(&PlateId::new("flagstone")).expect("release"));
        let again = service
            .step_on_plate(&commoner(), &PlateId::new("flagstone"))
            .expect("step");
        assert!(again.result.triggered);
        assert!(again.damage.is_empty());
    }

    #[test]
    fn tiny_actors_pass_over() {
        let mut service = service(&[]);
        let sprite = commoner().with_size(Size::Tiny);
        let outcome = service
            .step_on_plate(&sprite, &PlateId::new("flagstone"))
            .expect("step");
        assert!(!outcome.result.triggered);
        assert!(outcome.links.applied.is_empty());
    }

    #[test]
    fn jammed_plate_stays_safe() {
        // 12 + 4 vs jam DC 10
        let mut service = service(&[12]);
        assert!(service.jam_plate(&rogue(), &PlateId::new("flagstone")).expect("jam").result.success);
        let outcome = service
            .step_on_plate(&rogue().with_score(Ability::Strength, 18), &PlateId::new("flagstone"))
            .expect("step");
        assert!(!outcome.result.triggered);
        assert!(service.registry().trap(&TrapId::new("pit")).expect("trap").is_armed());
    }

    #[test]
    fn levers_feed_the_puzzle_which_opens_the_gate() {
        let mut service = service(&[]);
        let no_items: Vec<ItemId> = Vec::new();

        let west = service
            .operate_mechanism(&commoner(), &no_items, &MechanismId::new("west"))
            .expect("west");
        assert_eq!(
            west.links.applied,
            vec![LinkUpdate::PuzzleSignal {
                puzzle_id: PuzzleId::new("levers"),
                signal: "west:on".to_string(),
            }]
        );
        assert!(service.registry().lock(&LockId::new("gate")).expect("gate").is_locked);

        let east = service
            .operate_mechanism(&commoner(), &no_items, &MechanismId::new("east"))
            .expect("east");
        assert!(east.links.puzzle_reactions[0].result.is_solved);
        assert!(!service.registry().lock(&LockId::new("gate")).expect("gate").is_locked);
    }

    #[test]
    fn dangling_links_are_reported() {
        let mut registry = gallery();
        registry.insert_mechanism(
            Mechanism::lever(MechanismId::new("rusty"), "rusty lever")
                .with_links(Links::none().with_lock(LockId::new("missing"))),
        );
        let mut service = InteractionService::new(Arc::new(scripted(&[])), registry);
        let err = service
            .operate_mechanism(&commoner(), &Vec::<ItemId>::new(), &MechanismId::new("rusty"))
            .expect_err("missing lock");
        assert!(matches!(err, EngineError::MissingLinkTarget(target) if target == "lock:missing"));
        let rusty = service.registry().mechanism(&MechanismId::new("rusty")).expect("lever");
        assert_eq!(rusty.current_state(), "off");
    }

    #[test]
    fn plate_wired_to_a_missing_puzzle_stays_up() {
        let mut registry = gallery();
        registry.insert_plate(
            PressurePlate::new(PlateId::new("tile"), "cracked tile", Size::Small)
                .with_links(Links::none().with_puzzle(PuzzleId::new("mosaic"), "tile")),
        );
        let before = registry.clone();
        let mut service = InteractionService::new(Arc::new(scripted(&[])), registry);
        let err = service
            .step_on_plate(&commoner(), &PlateId::new("tile"))
            .expect_err("missing puzzle");
        assert!(matches!(err, EngineError::MissingLinkTarget(target) if target == "puzzle:mosaic"));
        assert_eq!(service.registry(), &before);
    }
}
