use std::num::NonZero;

use quickcheck::{Arbitrary, Gen};

use crate::board::Board;
use crate::builder::BoardBuilder;
use crate::square::Coord;

/// Legal moves on an initially empty `ROWS` by `COLS` board, followed by one more legal column.
#[derive(Clone, Debug)]
pub(crate) struct MoveSequence<const ROWS: usize, const COLS: usize> {
    pub(crate) moves: Vec<Coord>,
    pub(crate) next: Coord,
}

impl<const ROWS: usize, const COLS: usize> MoveSequence<ROWS, COLS> {
    const MAX_MOVES: usize = 30;

    /// The board after [`Self::moves`], connecting `num_to_connect`.
    pub(crate) fn board(&self, num_to_connect: usize) -> Board {
        let mut builder = BoardBuilder::with_dims((NonZero::new(ROWS).unwrap(), NonZero::new(COLS).unwrap()));
        builder.num_to_connect(num_to_connect);
        for col in self.moves.iter() {
            builder.play(*col);
        }
        builder.build().unwrap()
    }
}

fn open_column(heights: &[usize], rows: usize, g: &mut Gen) -> Coord {
    let open: Vec<_> = (0..heights.len()).filter(|col| heights[*col] < rows).collect();
    *g.choose(&open).unwrap()
}

impl<const ROWS: usize, const COLS: usize> Arbitrary for MoveSequence<ROWS, COLS> {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % (Self::MAX_MOVES.min(ROWS * COLS - 1) + 1);
        let mut heights = [0; COLS];
        let mut moves = Vec::with_capacity(len);
        for _ in 0..len {
            let col = open_column(&heights, ROWS, g);
            heights[col] += 1;
            moves.push(col);
        }
        let next = open_column(&heights, ROWS, g);

        Self { moves, next }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        // dropping trailing moves keeps every prefix legal, and the next move stays legal with fewer pieces
        let this = self.clone();
        Box::new((0..self.moves.len()).rev().map(move |len| Self { moves: this.moves[..len].to_vec(), next: this.next }))
    }
}
