use std::collections::HashMap;

use arrayvec::ArrayVec;

use crate::stone::Stone;
use crate::Point;

pub type ChainId = u32;

/// A maximal 4-connected set of same-state cells: a stone chain, or an empty
/// region when `stone` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub stone: Option<Stone>,
    pub points: Vec<Point>,
}

impl Chain {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Incremental partition of the board into stone chains and empty regions.
///
/// Every cell belongs to exactly one chain: `ids` maps cells to their owning
/// chain, `chains` maps ids to member lists. Placement, capture and their
/// undos keep both directions of the mapping consistent, so no operation ever
/// has to rescan the whole board to find a point's group.
#[derive(Debug, Clone)]
pub struct Chains {
    size: u8,
    ids: Vec<ChainId>,
    chains: HashMap<ChainId, Chain>,
    next_id: ChainId,
}

impl Chains {
    /// A fresh partition: the whole board is one empty region.
    pub fn new(size: u8) -> Self {
        let n = size as usize * size as usize;
        let mut points = Vec::with_capacity(n);
        for y in 1..=size {
            for x in 1..=size {
                points.push((x, y));
            }
        }
        let mut chains = HashMap::new();
        chains.insert(0, Chain { stone: None, points });
        Chains {
            size,
            ids: vec![0; n],
            chains,
            next_id: 1,
        }
    }

    #[inline]
    fn idx(&self, (x, y): Point) -> usize {
        (y as usize - 1) * self.size as usize + (x as usize - 1)
    }

    fn fresh_id(&mut self) -> ChainId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // -- Accessors --

    pub fn size(&self) -> u8 {
        self.size
    }

    /// The 4-connected neighbors that are on the board.
    pub fn neighbors(&self, (x, y): Point) -> ArrayVec<Point, 4> {
        let mut result = ArrayVec::new();
        if x > 1 {
            result.push((x - 1, y));
        }
        if x < self.size {
            result.push((x + 1, y));
        }
        if y > 1 {
            result.push((x, y - 1));
        }
        if y < self.size {
            result.push((x, y + 1));
        }
        result
    }

    pub fn id_at(&self, point: Point) -> ChainId {
        self.ids[self.idx(point)]
    }

    pub fn chain(&self, id: ChainId) -> &Chain {
        &self.chains[&id]
    }

    pub fn chain_at(&self, point: Point) -> &Chain {
        self.chain(self.id_at(point))
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        self.chain_at(point).stone
    }

    /// Ids of every chain of the given color, in ascending order.
    pub fn ids_of(&self, stone: Stone) -> Vec<ChainId> {
        let mut ids: Vec<ChainId> = self
            .chains
            .iter()
            .filter(|(_, c)| c.stone == Some(stone))
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of every empty region, in ascending order.
    pub fn empty_ids(&self) -> Vec<ChainId> {
        let mut ids: Vec<ChainId> = self
            .chains
            .iter()
            .filter(|(_, c)| c.stone.is_none())
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Member lists of the color's chains, each sorted, outer list sorted.
    /// The normalized form used for partition comparisons.
    pub fn chains_of(&self, stone: Stone) -> Vec<Vec<Point>> {
        self.normalized(Some(stone))
    }

    /// Member lists of the empty regions, normalized like `chains_of`.
    pub fn empty_regions(&self) -> Vec<Vec<Point>> {
        self.normalized(None)
    }

    fn normalized(&self, stone: Option<Stone>) -> Vec<Vec<Point>> {
        let mut out: Vec<Vec<Point>> = self
            .chains
            .values()
            .filter(|c| c.stone == stone)
            .map(|c| {
                let mut points = c.points.clone();
                points.sort_unstable();
                points
            })
            .collect();
        out.sort();
        out
    }

    /// Number of distinct empty cells adjacent to the chain.
    pub fn liberty_count(&self, id: ChainId) -> usize {
        let chain = &self.chains[&id];
        let mut seen = vec![false; self.ids.len()];
        let mut count = 0;
        for &p in &chain.points {
            for n in self.neighbors(p) {
                let i = self.idx(n);
                if !seen[i] && self.chains[&self.ids[i]].stone.is_none() {
                    seen[i] = true;
                    count += 1;
                }
            }
        }
        count
    }

    // -- Mutation --

    /// Place a stone on an empty cell: detach the cell from its empty region
    /// (splitting the region when the removal disconnects it) and merge it
    /// with every adjacent friendly chain.
    pub fn place(&mut self, point: Point, stone: Stone) {
        debug_assert!(self.chain_at(point).stone.is_none());
        self.detach(point);

        let mut friendly: ArrayVec<ChainId, 4> = ArrayVec::new();
        for n in self.neighbors(point) {
            let id = self.id_at(n);
            if self.chains[&id].stone == Some(stone) && !friendly.contains(&id) {
                friendly.push(id);
            }
        }
        self.attach(point, Some(stone), &friendly);
    }

    /// Take a stone back off the board: detach it from its chain (splitting
    /// the remainder when needed) and fold the cell into the empty partition.
    pub fn remove_stone(&mut self, point: Point) {
        debug_assert!(self.chain_at(point).stone.is_some());
        self.detach(point);

        let mut adjacent: ArrayVec<ChainId, 4> = ArrayVec::new();
        for n in self.neighbors(point) {
            let id = self.id_at(n);
            if self.chains[&id].stone.is_none() && !adjacent.contains(&id) {
                adjacent.push(id);
            }
        }
        self.attach(point, None, &adjacent);
    }

    /// Remove a whole chain from the board. Its cells become a single empty
    /// region, reconciled with every empty region that bordered the chain.
    /// Returns the removed points.
    pub fn capture(&mut self, id: ChainId) -> Vec<Point> {
        let chain = self.chains.get_mut(&id).expect("capture of unknown chain");
        debug_assert!(chain.stone.is_some());
        chain.stone = None;
        let points = chain.points.clone();

        for &p in &points {
            for n in self.neighbors(p) {
                let nid = self.id_at(n);
                if nid != id && self.chains[&nid].stone.is_none() {
                    self.merge_into(id, nid);
                }
            }
        }
        points
    }

    /// Put captured stones back: carve their cells out of the empty partition
    /// (splitting the leftovers into components) and re-create the chains.
    /// `points` may be the union of several chains when one move captured
    /// more than one; the final split pulls them apart again.
    pub fn restore(&mut self, points: &[Point], stone: Stone) {
        let mut affected: ArrayVec<ChainId, 4> = ArrayVec::new();
        for &p in points {
            let id = self.id_at(p);
            debug_assert!(self.chains[&id].stone.is_none());
            if !affected.contains(&id) {
                affected.push(id);
            }
        }

        let id = self.fresh_id();
        for &p in points {
            let i = self.idx(p);
            self.ids[i] = id;
        }
        self.chains.insert(
            id,
            Chain {
                stone: Some(stone),
                points: points.to_vec(),
            },
        );

        for old in affected {
            let chain = self.chains.get_mut(&old).expect("missing empty region");
            chain.points.retain(|p| !points.contains(p));
            if chain.points.is_empty() {
                self.chains.remove(&old);
            } else {
                self.split(old);
            }
        }

        self.split(id);
    }

    // -- Internal helpers --

    /// Remove a single cell from its chain, splitting the remainder into
    /// connected components when the removal disconnects it. The cell's own
    /// `ids` entry is stale until the caller re-attaches it.
    fn detach(&mut self, point: Point) {
        let id = self.id_at(point);
        let chain = self.chains.get_mut(&id).expect("detach from unknown chain");
        chain.points.retain(|&p| p != point);
        if chain.points.is_empty() {
            self.chains.remove(&id);
        } else {
            self.split(id);
        }
    }

    /// Give a detached cell a home: a fresh chain when it touches nothing of
    /// its kind, otherwise the union of the given sibling chains.
    fn attach(&mut self, point: Point, stone: Option<Stone>, siblings: &[ChainId]) {
        match siblings.first().copied() {
            None => {
                let id = self.fresh_id();
                let i = self.idx(point);
                self.ids[i] = id;
                self.chains.insert(
                    id,
                    Chain {
                        stone,
                        points: vec![point],
                    },
                );
            }
            Some(target) => {
                for &id in &siblings[1..] {
                    self.merge_into(target, id);
                }
                let i = self.idx(point);
                self.ids[i] = target;
                self.chains
                    .get_mut(&target)
                    .expect("missing merge target")
                    .points
                    .push(point);
            }
        }
    }

    /// Merge chain `src` into `dst`, rewriting cell ownership.
    fn merge_into(&mut self, dst: ChainId, src: ChainId) {
        if dst == src {
            return;
        }
        let Chain { points, .. } = self.chains.remove(&src).expect("merge of unknown chain");
        for &p in &points {
            let i = self.idx(p);
            self.ids[i] = dst;
        }
        self.chains
            .get_mut(&dst)
            .expect("missing merge target")
            .points
            .extend(points);
    }

    /// Recompute the connected components of a chain's member set and replace
    /// the chain when it has come apart. Worklist flood fill restricted to
    /// the chain's current members.
    fn split(&mut self, id: ChainId) {
        let chain = &self.chains[&id];
        if chain.points.len() <= 1 {
            return;
        }
        let stone = chain.stone;
        let points = chain.points.clone();

        let mut member = vec![false; self.ids.len()];
        for &p in &points {
            member[self.idx(p)] = true;
        }

        let mut seen = vec![false; self.ids.len()];
        let mut components: Vec<Vec<Point>> = Vec::new();
        for &start in &points {
            if seen[self.idx(start)] {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            while let Some(p) = stack.pop() {
                let i = self.idx(p);
                if seen[i] {
                    continue;
                }
                seen[i] = true;
                component.push(p);
                for n in self.neighbors(p) {
                    let ni = self.idx(n);
                    if member[ni] && !seen[ni] {
                        stack.push(n);
                    }
                }
            }
            components.push(component);
        }

        if components.len() == 1 {
            return;
        }

        let mut rest = components.into_iter();
        self.chains.get_mut(&id).expect("split of unknown chain").points =
            rest.next().expect("split produced no components");
        for component in rest {
            let nid = self.fresh_id();
            for &p in &component {
                let i = self.idx(p);
                self.ids[i] = nid;
            }
            self.chains.insert(
                nid,
                Chain {
                    stone,
                    points: component,
                },
            );
        }
    }
}

/// Semantic equality: same cell occupancy and same partition membership,
/// regardless of chain ids or member ordering.
impl PartialEq for Chains {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.chains_of(Stone::Black) == other.chains_of(Stone::Black)
            && self.chains_of(Stone::White) == other.chains_of(Stone::White)
            && self.empty_regions() == other.empty_regions()
    }
}
