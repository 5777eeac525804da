use std::fmt::{self, Display, Formatter};

use bevy::prelude::*;

use crate::error::PuzzleError;

pub const GRID_SIZE: usize = 3;
pub const SLOT_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Identity of a tile, 1 through 9. Slot `k` is correctly filled by tile `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u8);

impl TileId {
    pub fn new(id: u8) -> Option<Self> {
        (1..=SLOT_COUNT as u8).contains(&id).then_some(Self(id))
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// All identities in slot order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=SLOT_COUNT as u8).map(Self)
    }

    const fn from_slot_index(index: usize) -> Self {
        Self(index as u8 + 1)
    }
}

impl Display for TileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    id: TileId,
    position: Vec2,
    occupant: TileId,
}

impl Slot {
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// Centre of the slot relative to the puzzle origin. Never changes.
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    pub const fn occupant(&self) -> TileId {
        self.occupant
    }

    pub fn is_correct(&self) -> bool {
        self.id == self.occupant
    }
}

/// The nine fixed grid positions and the tile currently assigned to each.
///
/// Occupants always form a permutation of `1..=9`: they only ever change through
/// [`SlotRegistry::initialize`] and [`SlotRegistry::swap_occupants`].
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SlotRegistry {
    slots: Vec<Slot>,
}

impl SlotRegistry {
    /// Builds the grid in its solved layout, slot 1 at the top-left.
    pub fn new(spacing: f32) -> Self {
        let slots = (0..SLOT_COUNT)
            .map(|index| {
                let id = TileId::from_slot_index(index);
                Slot {
                    id,
                    position: Self::slot_position(index, spacing),
                    occupant: id,
                }
            })
            .collect();
        Self { slots }
    }

    /// Builds the grid with an explicit layout, `occupants[k]` being the tile in slot `k + 1`.
    pub fn from_occupants(spacing: f32, occupants: [u8; SLOT_COUNT]) -> Result<Self, PuzzleError> {
        let mut sorted = occupants;
        sorted.sort_unstable();
        if !sorted.iter().copied().eq(TileId::all().map(TileId::get)) {
            return Err(PuzzleError::NotAPermutation {
                occupants: occupants.to_vec(),
            });
        }

        let mut registry = Self::new(spacing);
        for (slot, occupant) in registry.slots.iter_mut().zip(occupants) {
            slot.occupant = TileId(occupant);
        }
        Ok(registry)
    }

    fn slot_position(index: usize, spacing: f32) -> Vec2 {
        let column = (index % GRID_SIZE) as f32;
        let row = (index / GRID_SIZE) as f32;
        Vec2::new((column - 1.0) * spacing, (1.0 - row) * spacing)
    }

    /// Deals a fresh, uniformly random layout.
    pub fn initialize(&mut self, rng: &mut fastrand::Rng) {
        let mut occupants: Vec<TileId> = TileId::all().collect();
        shuffle(&mut occupants, rng);
        for (slot, occupant) in self.slots.iter_mut().zip(occupants) {
            slot.occupant = occupant;
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn occupants(&self) -> impl Iterator<Item = TileId> + '_ {
        self.slots.iter().map(Slot::occupant)
    }

    /// Index of the slot currently holding `tile`.
    pub fn slot_index_of(&self, tile: TileId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.occupant == tile)
    }

    /// Position a tile should rest at given the current occupancy.
    pub fn position_of(&self, tile: TileId) -> Option<Vec2> {
        self.slot_index_of(tile)
            .and_then(|index| self.slots.get(index))
            .map(Slot::position)
    }

    /// First slot, in registry order, whose box of `half_size` around its centre contains
    /// `point`. Edges count as inside.
    pub fn find_slot_containing_point(&self, point: Vec2, half_size: Vec2) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| Rect::from_center_half_size(slot.position, half_size).contains(point))
    }

    /// Exchanges the occupants of two slots.
    ///
    /// Returns the two tiles whose binding changed, or `None` when nothing moved
    /// (same slot twice, or an index outside the grid).
    pub fn swap_occupants(&mut self, a: usize, b: usize) -> Option<[TileId; 2]> {
        if a == b {
            return None;
        }
        let first = self.slots.get(a)?.occupant;
        let second = self.slots.get(b)?.occupant;
        self.slots.get_mut(a)?.occupant = second;
        self.slots.get_mut(b)?.occupant = first;
        Some([first, second])
    }

    pub fn is_solved(&self) -> bool {
        self.slots.iter().all(Slot::is_correct)
    }
}

/// Unbiased in-place Fisher–Yates shuffle.
pub fn shuffle<T>(items: &mut [T], rng: &mut fastrand::Rng) {
    for i in (1..items.len()).rev() {
        let j = rng.usize(0..=i);
        items.swap(i, j);
    }
}

impl Display for SlotRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.slots.chunks(GRID_SIZE) {
            for slot in row {
                if slot.is_correct() {
                    write!(f, "[{}]", slot.occupant)?;
                } else {
                    write!(f, " {} ", slot.occupant)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
