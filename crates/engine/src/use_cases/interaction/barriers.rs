//! Locks, traps, glyphs and secret doors.

use delve_domain::{
    attempt_break, attempt_lockpick, detect_glyph, detect_trap, disarm_glyph, disarm_trap,
    identify_glyph_school, investigate_mechanism, operate_secret_door, search_for_secret_door,
    unlock_with_key, ActorStats, BreakResult, DoorId, GlyphIdentification, InventoryQuery,
    LinkUpdate, LockAction, LockId, LockpickResult, MechanismInsight, SecretDoorResult,
    TrapDetectionResult, TrapDisarmResult, TrapId, TrapKind,
};

use super::{Interaction, InteractionService};
use crate::error::EngineError;

/// Opening a lock also releases every door that mirrors it.
fn opened(lock_id: &LockId, opened: bool) -> Vec<LinkUpdate> {
    if opened {
        vec![LinkUpdate::LockToggle {
            lock_id: lock_id.clone(),
            action: LockAction::Unlock,
        }]
    } else {
        Vec::new()
    }
}

impl InteractionService {
    pub fn use_key(
        &mut self,
        inventory: &dyn InventoryQuery,
        lock_id: &LockId,
    ) -> Result<Interaction<bool>, EngineError> {
        let lock = self.registry.lock_mut(lock_id)?;
        let was_barring = lock.is_barring();
        let unlocked = unlock_with_key(lock, inventory);
        self.settle(unlocked, Vec::new(), &opened(lock_id, was_barring && unlocked))
    }

    pub fn pick_lock(
        &mut self,
        actor: &dyn ActorStats,
        inventory: &dyn InventoryQuery,
        lock_id: &LockId,
    ) -> Result<Interaction<LockpickResult>, EngineError> {
        let lock = self.registry.lock_mut(lock_id)?;
        let was_barring = lock.is_barring();
        let result = attempt_lockpick(actor, lock, inventory, self.dice.as_ref());
        let now_open = was_barring && result.success;

        let damage = result
            .triggered_trap
            .as_ref()
            .and_then(|t| self.roll_trap(t))
            .into_iter()
            .collect();
        self.settle(result, damage, &opened(lock_id, now_open))
    }

    pub fn break_lock(
        &mut self,
        actor: &dyn ActorStats,
        lock_id: &LockId,
    ) -> Result<Interaction<BreakResult>, EngineError> {
        let lock = self.registry.lock_mut(lock_id)?;
        let was_barring = lock.is_barring();
        let result = attempt_break(actor, lock, self.dice.as_ref());
        let now_open = was_barring && result.is_broken;
        self.settle(result, Vec::new(), &opened(lock_id, now_open))
    }

    /// Search for a trap, routed by kind: glyphs take an arcane eye.
    pub fn search_for_trap(
        &self,
        actor: &dyn ActorStats,
        trap_id: &TrapId,
    ) -> Result<TrapDetectionResult, EngineError> {
        let trap = self.registry.trap(trap_id)?;
        Ok(match trap.kind {
            TrapKind::Mechanical => detect_trap(actor, trap, self.dice.as_ref()),
            TrapKind::Magical => detect_glyph(actor, trap, self.dice.as_ref()),
        })
    }

    pub fn disarm_trap(
        &mut self,
        actor: &dyn ActorStats,
        inventory: &dyn InventoryQuery,
        trap_id: &TrapId,
    ) -> Result<Interaction<TrapDisarmResult>, EngineError> {
        let trap = self.registry.trap_mut(trap_id)?;
        let result = disarm_trap(actor, trap, inventory, self.dice.as_ref());
        self.settle_disarm(result)
    }

    pub fn disarm_glyph(
        &mut self,
        actor: &dyn ActorStats,
        trap_id: &TrapId,
    ) -> Result<Interaction<TrapDisarmResult>, EngineError> {
        let glyph = self.registry.trap_mut(trap_id)?;
        let result = disarm_glyph(actor, glyph, self.dice.as_ref());
        self.settle_disarm(result)
    }

    fn settle_disarm(
        &mut self,
        result: TrapDisarmResult,
    ) -> Result<Interaction<TrapDisarmResult>, EngineError> {
        let damage = result
            .triggered_trap
            .as_ref()
            .and_then(|t| self.roll_trap(t))
            .into_iter()
            .collect();
        self.settle(result, damage, &[])
    }

    pub fn identify_glyph(
        &self,
        actor: &dyn ActorStats,
        trap_id: &TrapId,
    ) -> Result<GlyphIdentification, EngineError> {
        let glyph = self.registry.trap(trap_id)?;
        Ok(identify_glyph_school(actor, glyph, self.dice.as_ref()))
    }

    /// Re-arm a spent resetable trap.
    pub fn reset_trap(&mut self, trap_id: &TrapId) -> Result<(), EngineError> {
        self.registry.trap_mut(trap_id)?.reset()?;
        tracing::info!(trap_id = %trap_id, "Trap reset");
        Ok(())
    }

    pub fn search_for_door(
        &mut self,
        actor: &dyn ActorStats,
        door_id: &DoorId,
    ) -> Result<SecretDoorResult, EngineError> {
        let door = self.registry.door_mut(door_id)?;
        Ok(search_for_secret_door(actor, door, self.dice.as_ref()))
    }

    pub fn investigate_door(
        &self,
        actor: &dyn ActorStats,
        door_id: &DoorId,
    ) -> Result<MechanismInsight, EngineError> {
        let door = self.registry.door(door_id)?;
        Ok(investigate_mechanism(actor, door, self.dice.as_ref()))
    }

    pub fn operate_door(&mut self, door_id: &DoorId) -> Result<SecretDoorResult, EngineError> {
        Ok(operate_secret_door(self.registry.door_mut(door_id)?))
    }
}
