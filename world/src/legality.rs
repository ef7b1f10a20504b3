//! Movement legality: bounds, walls, obstacles, same-side stacking and the lane blockade.

use nexus_lanes_core::{ActionError, CellCoord, Direction, Lane, Side, UnitId};

use crate::World;

impl World {
    /// Row of the living opposing unit nearest to `side` within `lane`.
    ///
    /// For heroes this is the largest monster row, for monsters the smallest hero row.
    pub(crate) fn lane_front(&self, side: Side, lane: Lane) -> Option<u32> {
        let rows = self
            .roster(side.opponent())
            .iter()
            .filter(|unit| unit.alive && unit.cell.lane() == Some(lane))
            .map(|unit| unit.cell.row());
        match side {
            Side::Hero => rows.max(),
            Side::Monster => rows.min(),
        }
    }

    /// Validates that `unit` may end a step or teleport on `destination`.
    pub(crate) fn check_destination(
        &self,
        unit: UnitId,
        destination: CellCoord,
    ) -> Result<(), ActionError> {
        if !self.board.contains(destination) {
            return Err(ActionError::OutOfBounds);
        }
        if !self.board.is_accessible(destination) {
            return Err(ActionError::Inaccessible(destination));
        }
        if self.obstacles.contains(&destination) {
            return Err(ActionError::Obstructed(destination));
        }
        let lane = destination
            .lane()
            .ok_or(ActionError::NoLane(destination))?;
        let side = unit.side();
        let stacked = self
            .roster(side)
            .iter()
            .any(|other| other.alive && other.id != unit && other.cell == destination);
        if stacked {
            return Err(ActionError::Occupied(destination));
        }
        if let Some(front) = self.lane_front(side, lane) {
            let crosses = match side {
                Side::Hero => destination.row() < front,
                Side::Monster => destination.row() > front,
            };
            if crosses {
                return Err(ActionError::LaneBlocked(destination));
            }
        }
        Ok(())
    }

    /// First legal landing cell beside `ally` for a hero teleporting from another lane.
    pub(crate) fn teleport_destination(
        &self,
        hero: UnitId,
        ally: UnitId,
        ally_cell: CellCoord,
    ) -> Result<CellCoord, ActionError> {
        let ally_lane = ally_cell.lane().ok_or(ActionError::NoLane(ally_cell))?;
        Direction::ALL
            .into_iter()
            .filter_map(|direction| ally_cell.step(direction))
            .filter(|candidate| candidate.lane() == Some(ally_lane))
            .filter(|candidate| candidate.row() >= ally_cell.row())
            .find(|candidate| self.check_destination(hero, *candidate).is_ok())
            .ok_or(ActionError::NoTeleportDestination(ally))
    }
}
