use alloc::collections::VecDeque;
use alloc::vec::Vec;
use rand::prelude::*;

use crate::*;

/// Number of upcoming pieces the player can see.
pub const QUEUE_CAPACITY: usize = 4;

/// FIFO of the next pieces to place, refilled at the tail.
#[derive(Clone, Debug)]
pub struct PieceQueue {
    pending: VecDeque<Piece>,
    catalog: Vec<PieceKind>,
    rng: SmallRng,
}

impl PieceQueue {
    /// Full queue of random pieces drawn from `catalog`.
    pub fn new(catalog: Vec<PieceKind>, seed: u64) -> Result<Self> {
        Self::with_pending(catalog, &[], seed)
    }

    /// Queue whose head is `pending`, padded with random pieces.
    pub fn with_pending(catalog: Vec<PieceKind>, pending: &[Piece], seed: u64) -> Result<Self> {
        if catalog.is_empty() {
            return Err(GameError::EmptyPieceSet);
        }
        if catalog.iter().any(|kind| kind.is_start()) {
            return Err(GameError::StartInPieceSet);
        }
        if pending.len() > QUEUE_CAPACITY {
            return Err(GameError::QueueOverflow);
        }

        let mut queue = Self {
            pending: pending.iter().copied().collect(),
            catalog,
            rng: SmallRng::seed_from_u64(seed),
        };
        while queue.pending.len() < QUEUE_CAPACITY {
            queue.add_one();
        }
        Ok(queue)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The piece the next placement will use.
    pub fn peek(&self) -> Option<Piece> {
        self.pending.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Piece> + '_ {
        self.pending.iter().copied()
    }

    pub fn take_first(&mut self) -> Option<Piece> {
        self.pending.pop_front()
    }

    /// Appends one random piece. Call once after every successful `take_first`.
    pub fn add_one(&mut self) {
        let kind = self.catalog[self.rng.random_range(0..self.catalog.len())];
        let rotation = Rotation::ALL[self.rng.random_range(0..Rotation::ALL.len())];
        self.pending.push_back(Piece::new(kind, rotation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn catalog() -> Vec<PieceKind> {
        vec![PieceKind::Straight, PieceKind::Corner, PieceKind::Cross]
    }

    #[test]
    fn starts_full() {
        let queue = PieceQueue::new(catalog(), 7).unwrap();

        assert_eq!(queue.len(), QUEUE_CAPACITY);
        assert!(queue.iter().all(|piece| !piece.kind.is_start()));
    }

    #[test]
    fn take_and_refill_keeps_fifo_order() {
        let mut queue = PieceQueue::new(catalog(), 11).unwrap();
        let before: Vec<Piece> = queue.iter().collect();

        let first = queue.take_first().unwrap();
        queue.add_one();

        assert_eq!(first, before[0]);
        assert_eq!(queue.len(), QUEUE_CAPACITY);
        assert_eq!(queue.iter().take(3).collect::<Vec<_>>(), &before[1..]);
    }

    #[test]
    fn scripted_head_is_served_first() {
        let scripted = [
            Piece::new(PieceKind::Cross, Rotation::R90),
            Piece::new(PieceKind::Corner, Rotation::R180),
        ];
        let mut queue = PieceQueue::with_pending(catalog(), &scripted, 3).unwrap();

        assert_eq!(queue.peek(), Some(scripted[0]));
        assert_eq!(queue.take_first(), Some(scripted[0]));
        assert_eq!(queue.take_first(), Some(scripted[1]));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn draws_only_enabled_kinds() {
        let mut queue = PieceQueue::new(vec![PieceKind::Corner], 5).unwrap();

        for _ in 0..50 {
            let piece = queue.take_first().unwrap();
            assert_eq!(piece.kind, PieceKind::Corner);
            queue.add_one();
        }
    }

    #[test]
    fn same_seed_same_pieces() {
        let a = PieceQueue::new(catalog(), 42).unwrap();
        let b = PieceQueue::new(catalog(), 42).unwrap();

        assert!(a.iter().eq(b.iter()));
    }

    #[test]
    fn rejects_bad_catalogs_and_overflow() {
        assert_eq!(
            PieceQueue::new(Vec::new(), 1).unwrap_err(),
            GameError::EmptyPieceSet
        );
        assert_eq!(
            PieceQueue::new(vec![PieceKind::Start], 1).unwrap_err(),
            GameError::StartInPieceSet
        );
        let too_many = [Piece::new(PieceKind::Cross, Rotation::R0); 5];
        assert_eq!(
            PieceQueue::with_pending(catalog(), &too_many, 1).unwrap_err(),
            GameError::QueueOverflow
        );
    }
}
