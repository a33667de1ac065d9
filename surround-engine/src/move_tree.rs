use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::RangeInclusive;

use crate::arena::{PositionArena, PositionId};
use crate::variation::Variation;

/// Every position reachable from the game's start, indexed by move number and
/// branch slot.
///
/// Slot 0 at a move number is the main line; slots 1.. hold variations and may
/// contain holes. Each position also carries a layout `level` so branches can be
/// drawn side by side without crossing.
#[derive(Debug, Clone)]
pub struct MoveTree {
    root: PositionId,
    root_move_number: u32,
    largest_move_number: u32,
    slots: BTreeMap<u32, Vec<Option<PositionId>>>,
    levels: HashMap<PositionId, usize>,
    indices: HashMap<PositionId, usize>,
    next: HashMap<PositionId, Vec<PositionId>>,
    max_level: usize,
}

impl MoveTree {
    pub fn new(arena: &PositionArena, root: PositionId) -> Self {
        let number = arena.get(root).last_move_number();
        MoveTree {
            root,
            root_move_number: number,
            largest_move_number: number,
            slots: BTreeMap::from([(number, vec![Some(root)])]),
            levels: HashMap::from([(root, 0)]),
            indices: HashMap::from([(root, 0)]),
            next: HashMap::new(),
            max_level: 0,
        }
    }

    // -- Accessors --

    pub fn root(&self) -> PositionId {
        self.root
    }

    pub fn move_number_range(&self) -> RangeInclusive<u32> {
        self.root_move_number..=self.largest_move_number
    }

    pub fn largest_move_number(&self) -> u32 {
        self.largest_move_number
    }

    pub fn positions_at(&self, move_number: u32) -> &[Option<PositionId>] {
        self.slots
            .get(&move_number)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn main_line_position(&self, move_number: u32) -> Option<PositionId> {
        self.positions_at(move_number).first().copied().flatten()
    }

    pub fn level(&self, id: PositionId) -> Option<usize> {
        self.levels.get(&id).copied()
    }

    pub fn index(&self, id: PositionId) -> Option<usize> {
        self.indices.get(&id).copied()
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn next_positions(&self, id: PositionId) -> &[PositionId] {
        self.next.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: PositionId) -> bool {
        self.indices.contains_key(&id)
    }

    pub fn is_main_line(&self, id: PositionId) -> bool {
        self.index(id) == Some(0)
    }

    // -- Registration --

    /// Insert `new`, reached from `from`, and return the canonical id for it.
    ///
    /// On the main line an equal board already in slot 0 is returned instead, and a
    /// different one is removed with its whole subtree. As a variation, an equal board
    /// with the same parent is reused; otherwise `new` goes after every sibling whose
    /// parent sits at or before `from`'s slot. A `from` outside the tree leaves the
    /// tree unchanged.
    pub fn register(
        &mut self,
        arena: &PositionArena,
        new: PositionId,
        from: PositionId,
        main_branch: bool,
    ) -> PositionId {
        let Some(from_index) = self.index(from) else {
            return new;
        };
        let number = arena.get(new).last_move_number();

        if main_branch {
            if let Some(existing) = self.main_line_position(number) {
                if arena.get(existing).has_the_same_position(arena.get(new)) {
                    return existing;
                }
                self.remove_data(arena, existing);
            }
            self.place(number, 0, new);
            self.levels.insert(new, 0);
        } else if self.slots.contains_key(&number) {
            if let Some(existing) = self.converged_variation(arena, number, new, from) {
                return existing;
            }
            let index = self.insertion_index(arena, number, from_index);
            let slots = self.slots.entry(number).or_default();
            slots.insert(index, Some(new));
            for (i, slot) in slots.iter().enumerate().skip(index) {
                if let Some(id) = slot {
                    self.indices.insert(*id, i);
                }
            }
        } else {
            self.place(number, 1, new);
            self.levels.insert(new, 1);
            self.max_level = self.max_level.max(1);
        }

        self.largest_move_number = self.largest_move_number.max(number);
        self.next.entry(from).or_default().push(new);
        self.calculate_levels(arena);
        new
    }

    fn place(&mut self, move_number: u32, index: usize, id: PositionId) {
        let slots = self.slots.entry(move_number).or_default();
        if slots.len() <= index {
            slots.resize(index + 1, None);
        }
        slots[index] = Some(id);
        self.indices.insert(id, index);
    }

    fn converged_variation(
        &self,
        arena: &PositionArena,
        move_number: u32,
        new: PositionId,
        from: PositionId,
    ) -> Option<PositionId> {
        let board = arena.get(new);
        self.positions_at(move_number)
            .iter()
            .skip(1)
            .flatten()
            .copied()
            .find(|&p| arena.previous(p) == Some(from) && arena.get(p).has_the_same_position(board))
    }

    fn insertion_index(&self, arena: &PositionArena, move_number: u32, from_index: usize) -> usize {
        let slots = self.positions_at(move_number);
        let mut index = 1;
        while index < slots.len() {
            let parent_is_later = slots[index]
                .and_then(|p| arena.previous(p))
                .and_then(|parent| self.index(parent))
                .is_some_and(|parent_index| parent_index > from_index);
            if parent_is_later {
                break;
            }
            index += 1;
        }
        index
    }

    // -- Removal --

    /// Forget `id` and everything registered below it. The root stays.
    pub fn remove_data(&mut self, arena: &PositionArena, id: PositionId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        if let Some(parent) = arena.previous(id) {
            if let Some(siblings) = self.next.get_mut(&parent) {
                siblings.retain(|&p| p != id);
            }
        }

        let mut touched = BTreeSet::new();
        let mut stack = vec![id];
        while let Some(p) = stack.pop() {
            let number = arena.get(p).last_move_number();
            if let Some(index) = self.indices.remove(&p) {
                if let Some(slot) = self.slots.get_mut(&number).and_then(|s| s.get_mut(index)) {
                    if *slot == Some(p) {
                        *slot = None;
                    }
                }
            }
            self.levels.remove(&p);
            touched.insert(number);
            if let Some(children) = self.next.remove(&p) {
                stack.extend(children);
            }
        }

        for number in touched {
            if let Some(slots) = self.slots.get_mut(&number) {
                while slots.last() == Some(&None) {
                    slots.pop();
                }
                if slots.is_empty() {
                    self.slots.remove(&number);
                }
            }
        }
        self.largest_move_number = self
            .slots
            .keys()
            .next_back()
            .copied()
            .unwrap_or(self.root_move_number);
        self.calculate_levels(arena);
    }

    // -- Layout --

    /// Recompute branch levels, newest move number first, starting from the children
    /// of each main-line position.
    pub fn calculate_levels(&mut self, arena: &PositionArena) {
        self.max_level = 0;
        for number in self.move_number_range().rev() {
            let Some(main) = self.main_line_position(number) else {
                continue;
            };
            let children = self.next_positions(main).to_vec();
            for child in children {
                self.propagate_levels(arena, child);
            }
        }
    }

    fn propagate_levels(&mut self, arena: &PositionArena, start: PositionId) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(level) = self.derived_level(arena, id) else {
                continue;
            };
            self.levels.insert(id, level);
            self.max_level = self.max_level.max(level);
            stack.extend(self.next_positions(id).iter().rev().copied());
        }
    }

    /// The level a variation node needs, or `None` for main-line nodes and nodes whose
    /// neighbours have no level yet.
    fn derived_level(&self, arena: &PositionArena, id: PositionId) -> Option<usize> {
        let index = self.index(id).filter(|&i| i > 0)?;
        let slots = self.positions_at(arena.get(id).last_move_number());
        let preceding = *slots.get(index - 1)?;
        let preceding_level = match preceding {
            Some(p) => self.level(p)?,
            None => 0,
        };
        let parent_level = self.level(arena.previous(id)?)?;

        let mut level = self
            .level(id)
            .unwrap_or(index)
            .max(preceding_level + 1)
            .max(parent_level);
        // The preceding sibling's newest branch must not be crossed either.
        let nephew = preceding.and_then(|p| self.next_positions(p).last().copied());
        if let Some(nephew_level) = nephew.and_then(|n| self.level(n)) {
            level = level.max(nephew_level);
        }
        Some(level)
    }

    /// The branch from the nearest main-line ancestor to `to`, or `None` when `to` is
    /// itself on the main line.
    pub fn variation(&self, arena: &PositionArena, to: PositionId) -> Option<Variation> {
        if self.index(to).unwrap_or(0) == 0 {
            return None;
        }
        let base = arena.history(to).find(|&p| self.is_main_line(p))?;
        Some(Variation::between(arena, to, base))
    }
}
