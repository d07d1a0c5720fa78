//! Train / validation / test partitioning.
//!
//! With `N` triplets and train fraction `ratio`, the holdout is
//! `H = floor((1 - ratio) * N)`. After a uniform shuffle the last `H`
//! triplets are held out. Validation is `shuffled[N - H .. N - floor(H / 2)]`
//! and test is the final `floor(H / 2)` triplets, so with an odd holdout the
//! truncation leaves validation one triplet larger than test.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SplitError;
use crate::triplet::Triplet;

/// Default fraction of triplets kept for training.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Absorbs binary rounding in `(1 - ratio) * N` (`1.0 - 0.8` is slightly
/// below `0.2`), so exact decimal products floor to themselves.
const RELATIVE_SLACK: f64 = 1e-12;

/// The three partitions of a triplet store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Vec<Triplet>,
    pub valid: Vec<Triplet>,
    pub test: Vec<Triplet>,
}

impl Split {
    /// Total number of triplets over all partitions.
    pub fn len(&self) -> usize {
        self.train.len() + self.valid.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `train ++ valid ++ test`.
    pub fn concat(&self) -> Vec<Triplet> {
        let mut all = Vec::with_capacity(self.len());
        all.extend_from_slice(&self.train);
        all.extend_from_slice(&self.valid);
        all.extend_from_slice(&self.test);
        all
    }
}

/// Number of triplets held out of training.
pub fn holdout_size(total: usize, ratio: f64) -> Result<usize, SplitError> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(SplitError::InvalidRatio { ratio });
    }
    let raw = (1.0 - ratio) * total as f64;
    let holdout = (raw * (1.0 + RELATIVE_SLACK)).floor() as usize;
    Ok(holdout.min(total))
}

/// Shuffle `triplets` with `rng` and cut them into train, valid and test.
pub fn split<R: Rng + ?Sized>(
    triplets: &[Triplet],
    ratio: f64,
    rng: &mut R,
) -> Result<Split, SplitError> {
    let total = triplets.len();
    let holdout = holdout_size(total, ratio)?;

    let mut order: Vec<usize> = (0..total).collect();
    order.shuffle(rng);
    let shuffled: Vec<Triplet> = order.into_iter().map(|i| triplets[i]).collect();

    let train_end = total - holdout;
    let valid_end = total - holdout / 2;

    let split = Split {
        train: shuffled[..train_end].to_vec(),
        valid: shuffled[train_end..valid_end].to_vec(),
        test: shuffled[valid_end..].to_vec(),
    };
    tracing::debug!(
        total,
        holdout,
        train = split.train.len(),
        valid = split.valid.len(),
        test = split.test.len(),
        "split triplets"
    );
    Ok(split)
}
