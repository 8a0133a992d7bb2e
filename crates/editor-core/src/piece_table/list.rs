use crate::piece_table::piece::Piece;

/// Stable handle to a piece in a [`PieceList`].
///
/// Slots are recycled after removal; the generation makes handles to a
/// removed piece stop resolving instead of aliasing whatever reuses the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PieceId {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node {
    piece: Piece,
    prev: Option<PieceId>,
    next: Option<PieceId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Doubly linked list of pieces stored in an arena.
///
/// Inserting or removing a piece touches only its neighbours' links, so
/// handles to every other piece stay valid across the operation.
#[derive(Debug, Default)]
pub struct PieceList {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<PieceId>,
    tail: Option<PieceId>,
    count: usize,
}

/*

====================================
========= INLINE METHODS  ==========
====================================

*/

impl PieceList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live pieces.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<PieceId> {
        self.head
    }

    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<PieceId> {
        self.tail
    }

    #[inline]
    fn node(&self, id: PieceId) -> Option<&Node> {
        let slot = self.slots.get(id.index)?;

        if slot.generation != id.generation {
            return None;
        }

        slot.node.as_ref()
    }

    #[inline]
    fn node_mut(&mut self, id: PieceId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index)?;

        if slot.generation != id.generation {
            return None;
        }

        slot.node.as_mut()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.node(id).map(|node| &node.piece)
    }

    #[inline]
    pub fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.node_mut(id).map(|node| &mut node.piece)
    }

    /// Piece following `id` in document order.
    #[inline]
    #[must_use]
    pub fn next(&self, id: PieceId) -> Option<PieceId> {
        self.node(id)?.next
    }

    /// Piece preceding `id` in document order.
    #[inline]
    #[must_use]
    pub fn prev(&self, id: PieceId) -> Option<PieceId> {
        self.node(id)?.prev
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            next: self.head,
        }
    }
}

/*

=====================================
========= INSERT / REMOVE  ==========
=====================================

*/

impl PieceList {
    fn allocate(&mut self, node: Node) -> PieceId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];

            slot.node = Some(node);

            return PieceId {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });

        PieceId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Inserts `piece` at the front of the list.
    pub fn push_front(&mut self, piece: Piece) -> PieceId {
        let next = self.head;
        let id = self.allocate(Node {
            piece,
            prev: None,
            next,
        });

        match next.and_then(|n| self.node_mut(n)) {
            Some(node) => node.prev = Some(id),
            None => self.tail = Some(id),
        }

        self.head = Some(id);
        self.count += 1;

        id
    }

    /// Inserts `piece` at the back of the list.
    pub fn push_back(&mut self, piece: Piece) -> PieceId {
        let Some(tail) = self.tail else {
            return self.push_front(piece);
        };
        let id = self.allocate(Node {
            piece,
            prev: Some(tail),
            next: None,
        });

        if let Some(node) = self.node_mut(tail) {
            node.next = Some(id);
        }

        self.tail = Some(id);
        self.count += 1;

        id
    }

    /// Inserts `piece` immediately after `anchor`.
    ///
    /// Returns `None` without touching the list when `anchor` is stale.
    pub fn insert_after(&mut self, anchor: PieceId, piece: Piece) -> Option<PieceId> {
        let next = self.node(anchor)?.next;
        let id = self.allocate(Node {
            piece,
            prev: Some(anchor),
            next,
        });

        if let Some(node) = self.node_mut(anchor) {
            node.next = Some(id);
        }

        match next.and_then(|n| self.node_mut(n)) {
            Some(node) => node.prev = Some(id),
            None => self.tail = Some(id),
        }

        self.count += 1;

        Some(id)
    }

    /// Unlinks `id` and returns its piece. Its slot is recycled under a new
    /// generation.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let slot = self.slots.get_mut(id.index)?;

        if slot.generation != id.generation {
            return None;
        }

        let node = slot.node.take()?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        match node.prev.and_then(|p| self.node_mut(p)) {
            Some(prev) => prev.next = node.next,
            None => self.head = node.next,
        }

        match node.next.and_then(|n| self.node_mut(n)) {
            Some(next) => next.prev = node.prev,
            None => self.tail = node.prev,
        }

        self.count -= 1;

        Some(node.piece)
    }
}

/// Iterator over `(handle, piece)` pairs in document order.
#[derive(Debug)]
pub struct Iter<'list> {
    list: &'list PieceList,
    next: Option<PieceId>,
}

impl<'list> Iterator for Iter<'list> {
    type Item = (PieceId, &'list Piece);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.list.node(id)?;

        self.next = node.next;

        Some((id, &node.piece))
    }
}
