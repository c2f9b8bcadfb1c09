#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! NPC roster and behaviour system.

mod npc;

use std::time::Duration;

use campus_runner_core::{CellCoord, Event, NpcId, NpcKind, NpcSnapshot};
use campus_runner_system_pathfinding::NavigationGraph;
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

pub use self::npc::{Npc, CATCH_DISTANCE, IDLE_DWELL, INTERACT_DURATION, MOVE_DELAY};

const MAX_STUDENTS: usize = 3;
const PROFESSOR_BUILDING: usize = 3;

const STUDENT_LINES: [&str; 3] = [
    "Hey! Need help finding a building?",
    "The library is a great place to study!",
    "Have you tried the food court yet?",
];
const SECURITY_LINES: [&str; 3] = [
    "Keep moving, no loitering!",
    "ID card please... just kidding!",
    "Stay on the designated paths.",
];
const PROFESSOR_LINES: [&str; 3] = [
    "Remember, A* is more efficient than BFS!",
    "Algorithms are the heart of computer science.",
    "Don't forget about graph theory!",
];

/// Picks a dialogue line appropriate for `kind`.
pub fn dialogue_for<R: Rng + ?Sized>(kind: NpcKind, rng: &mut R) -> &'static str {
    let lines: &[&'static str] = match kind {
        NpcKind::Student => &STUDENT_LINES,
        NpcKind::Security => &SECURITY_LINES,
        NpcKind::Professor => &PROFESSOR_LINES,
    };
    lines.choose(rng).copied().unwrap_or("...")
}

/// Collection of every NPC on campus.
#[derive(Clone, Debug, Default)]
pub struct Npcs {
    npcs: Vec<Npc>,
}

impl Npcs {
    /// Populates the campus from an ordered list of building cells.
    ///
    /// Up to three students start on the first buildings and walk to the next
    /// one. With more than two buildings a guard starts at the middle building
    /// and patrols between the first and last; with more than four a professor
    /// stays at the fourth.
    pub fn spawn_roster<R: Rng + ?Sized>(buildings: &[CellCoord], rng: &mut R) -> Self {
        let mut roster = Self::default();

        for (index, &start) in buildings.iter().enumerate().take(MAX_STUDENTS) {
            let mut waypoints = vec![start];
            if let Some(&next) = buildings.get(index + 1) {
                waypoints.push(next);
            }
            let _ = roster.spawn(NpcKind::Student, start, waypoints, rng);
        }

        if buildings.len() > 2 {
            let start = buildings[buildings.len() / 2];
            let waypoints = vec![buildings[0], buildings[buildings.len() - 1]];
            let _ = roster.spawn(NpcKind::Security, start, waypoints, rng);
        }

        if buildings.len() > PROFESSOR_BUILDING + 1 {
            let start = buildings[PROFESSOR_BUILDING];
            let _ = roster.spawn(NpcKind::Professor, start, vec![start], rng);
        }

        debug!(npcs = roster.len(), "npc roster spawned");
        roster
    }

    /// Adds an NPC with the next free identifier.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        kind: NpcKind,
        start: CellCoord,
        waypoints: Vec<CellCoord>,
        rng: &mut R,
    ) -> NpcId {
        let id = NpcId::new(u32::try_from(self.npcs.len()).unwrap_or(u32::MAX));
        let dialogue = dialogue_for(kind, rng);
        self.npcs.push(Npc::new(id, kind, start, waypoints, dialogue));
        id
    }

    /// Updates every NPC once per `TimeAdvanced` event.
    pub fn handle(&mut self, events: &[Event], player: CellCoord, graph: &NavigationGraph) {
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.update_all(*dt, player, graph);
            }
        }
    }

    /// Runs one behaviour update on every NPC.
    pub fn update_all(&mut self, dt: Duration, player: CellCoord, graph: &NavigationGraph) {
        for npc in &mut self.npcs {
            npc.update(dt, player, graph);
        }
    }

    /// First NPC standing close enough to talk to the player.
    #[must_use]
    pub fn interaction_near(&self, player: CellCoord) -> Option<&Npc> {
        self.npcs
            .iter()
            .find(|npc| npc.position().euclidean_distance(player) < CATCH_DISTANCE)
    }

    /// NPC occupying `cell`, if any.
    #[must_use]
    pub fn blocking_at(&self, cell: CellCoord) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.position() == cell)
    }

    /// Iterates the NPCs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Npc> {
        self.npcs.iter()
    }

    /// Presentation snapshots of every NPC.
    #[must_use]
    pub fn snapshots(&self) -> Vec<NpcSnapshot> {
        self.npcs.iter().map(Npc::snapshot).collect()
    }

    /// Number of NPCs on campus.
    #[must_use]
    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    /// Reports whether the campus has no NPCs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn buildings(count: u32) -> Vec<CellCoord> {
        (0..count).map(|index| CellCoord::new(index * 2, 0)).collect()
    }

    #[test]
    fn full_roster_has_students_guard_and_professor() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let cells = buildings(6);
        let npcs = Npcs::spawn_roster(&cells, &mut rng);

        let kinds: Vec<_> = npcs.iter().map(Npc::kind).collect();
        assert_eq!(
            kinds,
            vec![
                NpcKind::Student,
                NpcKind::Student,
                NpcKind::Student,
                NpcKind::Security,
                NpcKind::Professor,
            ]
        );

        let guard = npcs
            .iter()
            .find(|npc| npc.kind() == NpcKind::Security)
            .expect("guard spawned");
        assert_eq!(guard.start(), cells[3]);
        let professor = npcs
            .iter()
            .find(|npc| npc.kind() == NpcKind::Professor)
            .expect("professor spawned");
        assert_eq!(professor.start(), cells[3]);
    }

    #[test]
    fn roster_identifiers_are_sequential() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let npcs = Npcs::spawn_roster(&buildings(5), &mut rng);

        let ids: Vec<u32> = npcs.iter().map(|npc| npc.id().get()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn small_campus_only_gets_students() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let npcs = Npcs::spawn_roster(&buildings(2), &mut rng);
        assert_eq!(npcs.len(), 2);
        assert!(npcs.iter().all(|npc| npc.kind() == NpcKind::Student));

        let empty = Npcs::spawn_roster(&[], &mut rng);
        assert!(empty.is_empty());
    }

    #[test]
    fn dialogue_comes_from_the_kind_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..10 {
            assert!(SECURITY_LINES.contains(&dialogue_for(NpcKind::Security, &mut rng)));
            assert!(PROFESSOR_LINES.contains(&dialogue_for(NpcKind::Professor, &mut rng)));
        }
    }

    #[test]
    fn interaction_and_blocking_queries() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut npcs = Npcs::default();
        let id = npcs.spawn(NpcKind::Student, CellCoord::new(4, 4), Vec::new(), &mut rng);

        assert_eq!(
            npcs.interaction_near(CellCoord::new(5, 5)).map(Npc::id),
            Some(id)
        );
        assert!(npcs.interaction_near(CellCoord::new(6, 4)).is_none());
        assert_eq!(npcs.blocking_at(CellCoord::new(4, 4)).map(Npc::id), Some(id));
        assert!(npcs.blocking_at(CellCoord::new(4, 5)).is_none());
    }
}
