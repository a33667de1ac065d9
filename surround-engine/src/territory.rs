use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::position::BoardPosition;
use crate::stone::{PointState, StoneColor};

/// What a point counts as once removed (dead) stones are taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Stones(StoneColor),
    Empty,
    /// An empty point explicitly marked neutral.
    Dame,
}

/// A maximal connected region of points with the same [`RegionKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerritoryGroup {
    pub kind: RegionKind,
    pub points: Vec<Point>,
    /// Indices of adjacent groups in the slice returned alongside this one.
    pub neighbors: BTreeSet<usize>,
    territory: Option<StoneColor>,
}

impl TerritoryGroup {
    pub fn is_territory(&self) -> bool {
        self.territory.is_some()
    }

    /// The color this region counts for, if it is territory.
    pub fn owner(&self) -> Option<StoneColor> {
        self.territory
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn region_kind(position: &BoardPosition, point: Point) -> RegionKind {
    let removed = position.is_removed(point);
    match position.point_state(point) {
        PointState::Occupied(color) if !removed => RegionKind::Stones(color),
        PointState::Occupied(_) => RegionKind::Empty,
        PointState::Empty if removed => RegionKind::Dame,
        PointState::Empty => RegionKind::Empty,
    }
}

/// Partition the board into regions, link adjacent regions, then decide which empty
/// regions are territory.
pub fn construct_territory_groups(position: &BoardPosition) -> Vec<TerritoryGroup> {
    let size = position.board().len();
    let mut group_of = vec![usize::MAX; size];
    let mut groups: Vec<TerritoryGroup> = Vec::new();

    for row in 0..position.height() {
        for column in 0..position.width() {
            let start = (row, column);
            if group_of[position.idx(start)] != usize::MAX {
                continue;
            }

            let kind = region_kind(position, start);
            let id = groups.len();
            let mut points = Vec::new();
            let mut stack = vec![start];
            while let Some(p) = stack.pop() {
                let pi = position.idx(p);
                if group_of[pi] != usize::MAX {
                    continue;
                }
                group_of[pi] = id;
                points.push(p);
                for n in position.neighbors(p) {
                    if group_of[position.idx(n)] == usize::MAX
                        && region_kind(position, n) == kind
                    {
                        stack.push(n);
                    }
                }
            }

            groups.push(TerritoryGroup {
                kind,
                points,
                neighbors: BTreeSet::new(),
                territory: None,
            });
        }
    }

    for id in 0..groups.len() {
        let mut adjacent = BTreeSet::new();
        for &p in &groups[id].points {
            for n in position.neighbors(p) {
                let other = group_of[position.idx(n)];
                if other != id {
                    adjacent.insert(other);
                }
            }
        }
        for &other in &adjacent {
            groups[other].neighbors.insert(id);
        }
        groups[id].neighbors.extend(adjacent);
    }

    let owners: Vec<Option<StoneColor>> = groups
        .iter()
        .map(|g| surrounding_color(g, &groups))
        .collect();
    for (group, owner) in groups.iter_mut().zip(owners) {
        group.territory = owner;
    }

    groups
}

/// The single stone color bordering an empty region. A region touching dame or
/// both colors belongs to nobody.
fn surrounding_color(group: &TerritoryGroup, groups: &[TerritoryGroup]) -> Option<StoneColor> {
    if group.kind != RegionKind::Empty {
        return None;
    }
    let mut owner = None;
    for &n in &group.neighbors {
        match groups[n].kind {
            RegionKind::Stones(color) => match owner {
                None => owner = Some(color),
                Some(seen) if seen != color => return None,
                Some(_) => {}
            },
            RegionKind::Dame | RegionKind::Empty => return None,
        }
    }
    owner
}
