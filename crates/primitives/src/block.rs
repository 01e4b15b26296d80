use crate::BlobError;
use std::{fmt, vec::Vec};

/// A closed interval of L2 block numbers.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockInterval {
    /// The first block number of the interval.
    pub start_block_number: u64,
    /// The last block number of the interval, inclusive.
    pub end_block_number: u64,
}

impl BlockInterval {
    /// Returns a new [`BlockInterval`] between the two block numbers, inclusive.
    pub const fn between(start_block_number: u64, end_block_number: u64) -> Result<Self, BlobError> {
        if start_block_number > end_block_number {
            return Err(BlobError::InvalidInterval {
                start: start_block_number,
                end: end_block_number,
            });
        }
        Ok(Self { start_block_number, end_block_number })
    }

    /// Returns the number of blocks in the interval.
    pub const fn len(&self) -> u64 {
        self.end_block_number.saturating_sub(self.start_block_number).saturating_add(1)
    }

    /// Returns true if the block number is part of the interval.
    pub const fn contains(&self, block_number: u64) -> bool {
        self.start_block_number <= block_number && block_number <= self.end_block_number
    }

    /// Returns true if `next` starts on the block right after the end of this interval.
    pub const fn is_followed_by(&self, next: &Self) -> bool {
        match self.end_block_number.checked_add(1) {
            Some(expected) => expected == next.start_block_number,
            None => false,
        }
    }
}

impl fmt::Display for BlockInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]{}", self.start_block_number, self.end_block_number, self.len())
    }
}

/// A compact representation of consecutive block intervals: a starting block number followed by
/// the end block number of every interval.
///
/// This is the conflation order handed to the shnarf calculator and the prover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockIntervals {
    /// The start block number of the first interval.
    pub starting_block_number: u64,
    /// The end block number of each interval, in order.
    pub upper_boundaries: Vec<u64>,
}

impl BlockIntervals {
    /// Expands the compact representation into the list of [`BlockInterval`]s.
    pub fn to_intervals(&self) -> Vec<BlockInterval> {
        let mut start = self.starting_block_number;
        self.upper_boundaries
            .iter()
            .map(|&end| {
                let interval = BlockInterval { start_block_number: start, end_block_number: end };
                start = end.saturating_add(1);
                interval
            })
            .collect()
    }

    /// Returns the last block number covered by the intervals, if any.
    pub fn end_block_number(&self) -> Option<u64> {
        self.upper_boundaries.last().copied()
    }
}

impl fmt::Display for BlockIntervals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let intervals = self.to_intervals();
        write!(f, "[")?;
        for (i, interval) in intervals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{interval}")?;
        }
        write!(f, "]")
    }
}
