//! Id-keyed arena of every interactive record in play.
//!
//! Records never reference each other directly; the registry resolves ids
//! and applies the link updates the rules hand back.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use delve_domain::{
    attempt_puzzle_input, ChallengeId, DoorId, LinkUpdate, Links, Lock, LockAction, LockId,
    Mechanism, MechanismId, PlateId, PressurePlate, Puzzle, PuzzleId, PuzzleResult, SecretDoor,
    SkillChallenge, Trap, TrapId, TriggeredTrap,
};

use crate::error::EngineError;

/// A puzzle that reacted to a signal while links were applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleReaction {
    pub puzzle_id: PuzzleId,
    pub result: PuzzleResult,
}

/// Everything a batch of link updates set in motion, cascades included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkReport {
    pub applied: Vec<LinkUpdate>,
    pub puzzle_reactions: Vec<PuzzleReaction>,
    /// Traps that actually went off; resolved traps are skipped
    pub fired_traps: Vec<TriggeredTrap>,
}

/// Insert and lookup helpers for one record type.
macro_rules! registry_accessors {
    ($field:ident, $id:ty, $record:ty, $label:literal, $insert:ident, $get:ident, $get_mut:ident) => {
        /// Register a record, replacing any previous one with the same id.
        pub fn $insert(&mut self, record: $record) -> Option<$record> {
            self.$field.insert(record.id.clone(), record)
        }

        pub fn $get(&self, id: &$id) -> Result<&$record, EngineError> {
            self.$field
                .get(id)
                .ok_or_else(|| EngineError::not_found($label, id))
        }

        pub fn $get_mut(&mut self, id: &$id) -> Result<&mut $record, EngineError> {
            self.$field
                .get_mut(id)
                .ok_or_else(|| EngineError::not_found($label, id))
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRegistry {
    #[serde(default)]
    locks: HashMap<LockId, Lock>,
    #[serde(default)]
    traps: HashMap<TrapId, Trap>,
    #[serde(default)]
    plates: HashMap<PlateId, PressurePlate>,
    #[serde(default)]
    mechanisms: HashMap<MechanismId, Mechanism>,
    #[serde(default)]
    doors: HashMap<DoorId, SecretDoor>,
    #[serde(default)]
    puzzles: HashMap<PuzzleId, Puzzle>,
    #[serde(default)]
    challenges: HashMap<ChallengeId, SkillChallenge>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    registry_accessors!(locks, LockId, Lock, "Lock", insert_lock, lock, lock_mut);
    registry_accessors!(traps, TrapId, Trap, "Trap", insert_trap, trap, trap_mut);
    registry_accessors!(plates, PlateId, PressurePlate, "Pressure plate", insert_plate, plate, plate_mut);
    registry_accessors!(mechanisms, MechanismId, Mechanism, "Mechanism", insert_mechanism, mechanism, mechanism_mut);
    registry_accessors!(doors, DoorId, SecretDoor, "Secret door", insert_door, door, door_mut);
    registry_accessors!(puzzles, PuzzleId, Puzzle, "Puzzle", insert_puzzle, puzzle, puzzle_mut);
    registry_accessors!(challenges, ChallengeId, SkillChallenge, "Skill challenge", insert_challenge, challenge, challenge_mut);

    /// Copy of a trap, for rules that only read their linked trap.
    pub fn trap_snapshot(&self, id: Option<&TrapId>) -> Option<Trap> {
        id.and_then(|id| self.traps.get(id)).cloned()
    }

    /// Follow-up updates owed by a puzzle result: its unlocks, plus the
    /// failure trap if one is registered and still armed.
    pub fn puzzle_follow_ups(&self, result: &PuzzleResult) -> Vec<LinkUpdate> {
        let mut updates = result.link_updates.clone();
        let failure_trap = result
            .consequence
            .as_ref()
            .and_then(|c| c.trap_id.as_ref())
            .and_then(|id| self.traps.get(id));
        if let Some(trap) = failure_trap.filter(|t| t.is_armed()) {
            updates.push(LinkUpdate::TrapTriggered {
                trap_id: trap.id.clone(),
                effect: trap.effect.clone(),
            });
        }
        updates
    }

    /// Reject a plate's or mechanism's wiring when its lock or puzzle is not
    /// registered. Run before the rule so a dangling link leaves the device
    /// untouched. Missing traps are tolerated: the rule never fires them.
    pub fn check_links(&self, links: &Links) -> Result<(), EngineError> {
        if let Some(lock_id) = &links.lock_id {
            self.require_lock_target(lock_id)?;
        }
        match &links.puzzle {
            Some(link) if !self.puzzles.contains_key(&link.puzzle_id) => {
                Err(EngineError::MissingLinkTarget(format!("puzzle:{}", link.puzzle_id)))
            }
            _ => Ok(()),
        }
    }

    /// Reject a puzzle whose success unlocks a lock nobody registered.
    pub fn check_puzzle_links(&self, puzzle_id: &PuzzleId) -> Result<(), EngineError> {
        match &self.puzzle(puzzle_id)?.on_success.unlock_id {
            Some(lock_id) => self.require_lock_target(lock_id),
            None => Ok(()),
        }
    }

    fn has_lock_target(&self, lock_id: &LockId) -> bool {
        self.locks.contains_key(lock_id) || self.doors_linked_to(lock_id).next().is_some()
    }

    fn require_lock_target(&self, lock_id: &LockId) -> Result<(), EngineError> {
        if self.has_lock_target(lock_id) {
            Ok(())
        } else {
            Err(EngineError::MissingLinkTarget(format!("lock:{}", lock_id)))
        }
    }

    fn check_target(&self, update: &LinkUpdate) -> Result<(), EngineError> {
        let present = match update {
            LinkUpdate::LockToggle { lock_id, .. } => self.has_lock_target(lock_id),
            LinkUpdate::PuzzleSignal { puzzle_id, .. } => self.puzzles.contains_key(puzzle_id),
            LinkUpdate::TrapTriggered { trap_id, .. } => self.traps.contains_key(trap_id),
        };
        if present {
            Ok(())
        } else {
            Err(EngineError::MissingLinkTarget(update.target()))
        }
    }

    fn doors_linked_to<'a>(&'a self, lock_id: &'a LockId) -> impl Iterator<Item = &'a SecretDoor> + 'a {
        self.doors
            .values()
            .filter(move |door| door.linked_lock_id.as_ref() == Some(lock_id))
    }

    /// Apply a batch of link updates.
    ///
    /// Every target is checked before anything changes; one missing target
    /// rejects the whole batch. Updates cascading out of puzzle reactions are
    /// applied after the batch, and a cascade whose target is missing is
    /// dropped with a warning.
    pub fn apply_link_updates(&mut self, updates: &[LinkUpdate]) -> Result<LinkReport, EngineError> {
        for update in updates {
            self.check_target(update)?;
        }

        let mut report = LinkReport::default();
        let mut pending: VecDeque<LinkUpdate> = updates.iter().cloned().collect();

        while let Some(update) = pending.pop_front() {
            match &update {
                LinkUpdate::LockToggle { lock_id, action } => self.toggle_lock(lock_id, *action),
                LinkUpdate::PuzzleSignal { puzzle_id, signal } => {
                    let Some(puzzle) = self.puzzles.get_mut(puzzle_id) else {
                        continue;
                    };
                    let result = attempt_puzzle_input(puzzle, signal);
                    for follow_up in self.puzzle_follow_ups(&result) {
                        match self.check_target(&follow_up) {
                            Ok(()) => pending.push_back(follow_up),
                            Err(e) => tracing::warn!(
                                puzzle_id = %puzzle_id,
                                error = %e,
                                "Dropping puzzle follow-up"
                            ),
                        }
                    }
                    report.puzzle_reactions.push(PuzzleReaction {
                        puzzle_id: puzzle_id.clone(),
                        result,
                    });
                }
                LinkUpdate::TrapTriggered { trap_id, .. } => {
                    let fired = self.traps.get_mut(trap_id).and_then(Trap::trigger);
                    match fired {
                        Some(effect) => report.fired_traps.push(TriggeredTrap {
                            trap_id: trap_id.clone(),
                            effect,
                        }),
                        None => tracing::debug!(trap_id = %trap_id, "Linked trap already resolved"),
                    }
                }
            }
            tracing::debug!(link = %update.target(), "Link update applied");
            report.applied.push(update);
        }

        Ok(report)
    }

    /// Apply a lock action to the lock and to every door mirroring it.
    fn toggle_lock(&mut self, lock_id: &LockId, action: LockAction) {
        let mirrored = self.locks.get_mut(lock_id).map(|lock| {
            lock.is_locked = action.apply(lock.is_locked);
            lock.is_locked
        });

        for door in self
            .doors
            .values_mut()
            .filter(|door| door.linked_lock_id.as_ref() == Some(lock_id))
        {
            door.is_locked = mirrored.unwrap_or_else(|| action.apply(door.is_locked));
        }
        tracing::info!(lock_id = %lock_id, action = ?action, locked = ?mirrored, "Lock toggled");
    }

    /// Serialize every record to JSON.
    pub fn snapshot(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn restore(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_domain::{
        DiceFormula, DamageType, DoorState, PuzzleFailure, PuzzleKind, TrapEffect, TrapKind,
        TriggerCondition,
    };

    fn dart_trap(id: &str) -> Trap {
        Trap::new(
            TrapId::new(id),
            "Dart trap",
            TrapKind::Mechanical,
            TriggerCondition::Touch,
            12,
            13,
            TrapEffect::damage(DiceFormula::new(1, 4, 0).expect("valid formula"), DamageType::Piercing),
        )
    }

    fn lever_sequence() -> Puzzle {
        Puzzle::new(
            PuzzleId::new("levers"),
            "Lever bank",
            PuzzleKind::Sequence {
                solution: vec!["left".into(), "right".into()],
                input: Vec::new(),
            },
            "The vault door grinds open.",
        )
        .unlocks(LockId::new("vault"))
        .with_max_attempts(1)
        .with_failure(PuzzleFailure {
            message: "Darts fly from the walls!".to_string(),
            trap_id: Some(TrapId::new("darts")),
            damage: None,
        })
    }

    fn dungeon() -> InteractionRegistry {
        let mut registry = InteractionRegistry::new();
        registry.insert_lock(Lock::new(LockId::new("vault"), 15));
        registry.insert_door(
            SecretDoor::new(DoorId::new("bookcase"), "bookcase", 15, 13, "Pull the tome.")
                .linked_to(LockId::new("vault"))
                .in_state(DoorState::Detected),
        );
        registry.insert_trap(dart_trap("darts"));
        registry.insert_puzzle(lever_sequence());
        registry
    }

    fn toggle(lock: &str, action: LockAction) -> LinkUpdate {
        LinkUpdate::LockToggle {
            lock_id: LockId::new(lock),
            action,
        }
    }

    fn signal(value: &str) -> LinkUpdate {
        LinkUpdate::PuzzleSignal {
            puzzle_id: PuzzleId::new("levers"),
            signal: value.to_string(),
        }
    }

    #[test]
    fn lock_toggles_reach_linked_doors() {
        let mut registry = dungeon();
        registry
            .apply_link_updates(&[toggle("vault", LockAction::Toggle)])
            .expect("apply");
        assert!(!registry.lock(&LockId::new("vault")).expect("lock").is_locked);
        assert!(!registry.door(&DoorId::new("bookcase")).expect("door").is_locked);

        registry
            .apply_link_updates(&[toggle("vault", LockAction::Lock)])
            .expect("apply");
        assert!(registry.door(&DoorId::new("bookcase")).expect("door").is_locked);
    }

    #[test]
    fn missing_target_rejects_the_whole_batch() {
        let mut registry = dungeon();
        let before = registry.clone();
        let err = registry
            .apply_link_updates(&[toggle("vault", LockAction::Unlock), toggle("nowhere", LockAction::Unlock)])
            .expect_err("missing lock");
        assert!(matches!(err, EngineError::MissingLinkTarget(target) if target == "lock:nowhere"));
        assert_eq!(registry, before);
    }

    #[test]
    fn solved_puzzle_unlocks_its_lock() {
        let mut registry = dungeon();
        let report = registry
            .apply_link_updates(&[signal("left"), signal("right")])
            .expect("apply");
        assert_eq!(report.puzzle_reactions.len(), 2);
        assert!(report.puzzle_reactions[1].result.is_solved);
        assert!(report.applied.contains(&toggle("vault", LockAction::Unlock)));
        assert!(!registry.lock(&LockId::new("vault")).expect("lock").is_locked);
        assert!(!registry.door(&DoorId::new("bookcase")).expect("door").is_locked);
    }

    #[test]
    fn failed_puzzle_fires_its_trap_once() {
        let mut registry = dungeon();
        let report = registry.apply_link_updates(&[signal("right")]).expect("apply");
        assert_eq!(report.fired_traps.len(), 1);
        assert!(registry.trap(&TrapId::new("darts")).expect("trap").is_triggered);

        let again = registry
            .apply_link_updates(&[LinkUpdate::TrapTriggered {
                trap_id: TrapId::new("darts"),
                effect: TrapEffect::default(),
            }])
            .expect("apply");
        assert!(again.fired_traps.is_empty());
    }

    #[test]
    fn disarmed_traps_ignore_triggers() {
        let mut registry = dungeon();
        registry.trap_mut(&TrapId::new("darts")).expect("trap").is_disarmed = true;
        let report = registry
            .apply_link_updates(&[LinkUpdate::TrapTriggered {
                trap_id: TrapId::new("darts"),
                effect: TrapEffect::default(),
            }])
            .expect("apply");
        assert!(report.fired_traps.is_empty());
        assert!(!registry.trap(&TrapId::new("darts")).expect("trap").is_triggered);
    }

    #[test]
    fn snapshot_restores_identical_registry() {
        let mut registry = dungeon();
        registry.apply_link_updates(&[signal("left")]).expect("apply");
        let json = registry.snapshot().expect("snapshot");
        let restored = InteractionRegistry::restore(&json).expect("restore");
        assert_eq!(restored, registry);
    }

    #[test]
    fn wiring_checks_name_the_missing_target() {
        let registry = dungeon();
        assert!(registry
            .check_links(&Links::none().with_lock(LockId::new("vault")).with_trap(TrapId::new("gone")))
            .is_ok());

        let err = registry
            .check_links(&Links::none().with_puzzle(PuzzleId::new("mirrors"), "north"))
            .expect_err("missing puzzle");
        assert!(matches!(err, EngineError::MissingLinkTarget(target) if target == "puzzle:mirrors"));

        let err = registry
            .check_links(&Links::none().with_lock(LockId::new("cellar")))
            .expect_err("missing lock");
        assert!(matches!(err, EngineError::MissingLinkTarget(target) if target == "lock:cellar"));
    }

    #[test]
    fn puzzle_unlocking_a_door_only_lock_passes() {
        let mut registry = dungeon();
        registry.check_puzzle_links(&PuzzleId::new("levers")).expect("vault registered");

        registry.insert_door(
            SecretDoor::new(DoorId::new("hatch"), "hatch", 12, 10, "Lift the stone.")
                .linked_to(LockId::new("hatch-bolt")),
        );
        registry.insert_puzzle(lever_sequence().unlocks(LockId::new("hatch-bolt")));
        registry.check_puzzle_links(&PuzzleId::new("levers")).expect("door mirrors the bolt");

        registry.insert_puzzle(lever_sequence().unlocks(LockId::new("nowhere")));
        assert!(matches!(
            registry.check_puzzle_links(&PuzzleId::new("levers")),
            Err(EngineError::MissingLinkTarget(target)) if target == "lock:nowhere"
        ));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let registry = InteractionRegistry::new();
        let err = registry.lock(&LockId::new("ghost")).expect_err("missing");
        assert_eq!(err.to_string(), "Lock not found: ghost");
    }
}
