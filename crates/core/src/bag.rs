//! Bag module - piece randomization with a no-repeat window of 7
//!
//! Two strategies give the same guarantee (7 consecutive draws since a reset
//! are all distinct, the 8th may repeat anything):
//!
//! - **Shuffle**: a Fisher-Yates shuffled permutation of the 7 shapes,
//!   refilled after every 7 draws. No retry loop.
//! - **Rejection**: uniform draws rejected while the index is already in the
//!   [`TakenSet`], which is cleared once it holds all 7 indices.
//!
//! A scripted sequence is also supported for deterministic tests and demos.
//! Also provides a simple LCG so every strategy is reproducible from a seed.

use arrayvec::ArrayVec;

use stackfall_types::{BagKind, Shape, SHAPE_COUNT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Shape indices drawn since the last reset, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TakenSet {
    taken: ArrayVec<u8, SHAPE_COUNT>,
}

impl TakenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a drawn index. Returns false if the set is already full.
    pub fn push(&mut self, index: u8) -> bool {
        self.taken.try_push(index).is_ok()
    }

    pub fn contains(&self, index: u8) -> bool {
        self.taken.contains(&index)
    }

    pub fn clear(&mut self) {
        self.taken.clear();
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.taken.is_full()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.taken
    }
}

#[derive(Debug, Clone)]
enum Strategy {
    Shuffle {
        bag: [Shape; SHAPE_COUNT],
        index: usize,
        rng: SimpleRng,
    },
    Rejection {
        taken: TakenSet,
        rng: SimpleRng,
    },
    Scripted {
        sequence: Vec<Shape>,
        index: usize,
    },
}

/// Source of new shapes for the controller.
#[derive(Debug, Clone)]
pub struct BagRandomizer {
    strategy: Strategy,
}

impl BagRandomizer {
    /// Create a randomizer of the given kind seeded with `seed`.
    pub fn new(kind: BagKind, seed: u32) -> Self {
        match kind {
            BagKind::Shuffle => Self::shuffled(seed),
            BagKind::Rejection => Self::rejection(seed),
        }
    }

    pub fn shuffled(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let mut bag = Shape::ALL;
        rng.shuffle(&mut bag);
        Self {
            strategy: Strategy::Shuffle { bag, index: 0, rng },
        }
    }

    pub fn rejection(seed: u32) -> Self {
        Self {
            strategy: Strategy::Rejection {
                taken: TakenSet::new(),
                rng: SimpleRng::new(seed),
            },
        }
    }

    /// Cycle through a fixed sequence. An empty sequence falls back to [`Shape::ALL`].
    pub fn scripted(sequence: impl Into<Vec<Shape>>) -> Self {
        let mut sequence = sequence.into();
        if sequence.is_empty() {
            sequence = Shape::ALL.to_vec();
        }
        Self {
            strategy: Strategy::Scripted { sequence, index: 0 },
        }
    }

    /// Draw the next shape
    pub fn draw(&mut self) -> Shape {
        match &mut self.strategy {
            Strategy::Shuffle { bag, index, rng } => {
                if *index >= SHAPE_COUNT {
                    *bag = Shape::ALL;
                    rng.shuffle(bag);
                    *index = 0;
                }
                let shape = bag[*index];
                *index += 1;
                shape
            }
            Strategy::Rejection { taken, rng } => {
                if taken.is_full() {
                    taken.clear();
                }
                let mut index = rng.next_range(SHAPE_COUNT as u32) as u8;
                while taken.contains(index) {
                    index = rng.next_range(SHAPE_COUNT as u32) as u8;
                }
                taken.push(index);
                Shape::ALL[index as usize]
            }
            Strategy::Scripted { sequence, index } => {
                let shape = sequence[*index % sequence.len()];
                *index += 1;
                shape
            }
        }
    }

    /// Peek at the next shape without drawing it.
    ///
    /// Rejection sampling cannot know its next draw without consuming the RNG,
    /// so it returns `None`.
    pub fn peek(&self) -> Option<Shape> {
        match &self.strategy {
            Strategy::Shuffle { bag, index, rng } => {
                if *index < SHAPE_COUNT {
                    return Some(bag[*index]);
                }
                // Preview the next bag from a copy of the RNG so the real draw matches.
                let mut preview_rng = rng.clone();
                let mut next_bag = Shape::ALL;
                preview_rng.shuffle(&mut next_bag);
                Some(next_bag[0])
            }
            Strategy::Rejection { .. } => None,
            Strategy::Scripted { sequence, index } => Some(sequence[*index % sequence.len()]),
        }
    }

    /// Taken indices of the rejection strategy (None for other strategies).
    pub fn taken(&self) -> Option<&TakenSet> {
        match &self.strategy {
            Strategy::Rejection { taken, .. } => Some(taken),
            _ => None,
        }
    }
}

impl Default for BagRandomizer {
    fn default() -> Self {
        Self::shuffled(1)
    }
}
