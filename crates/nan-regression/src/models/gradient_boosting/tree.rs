//! Best-first regression tree grown on binned features.

use super::binning::BinMapper;
use crate::config::GradientBoostingConfig;
use ndarray::{Array2, ArrayView1};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A node of a fitted tree. Children are indices into [`Tree::nodes`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        /// Observed values `<= threshold` go left.
        threshold: f64,
        /// Where a missing value goes.
        missing_go_left: bool,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree stored as a flat arena, root at index 0.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Leaf value reached by a raw (unbinned) row. `NaN` entries follow the
    /// learned missing direction.
    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    missing_go_left,
                    left,
                    right,
                } => {
                    let value = row[*feature];
                    let go_left = if value.is_nan() {
                        *missing_go_left
                    } else {
                        value <= *threshold
                    };
                    idx = if go_left { *left } else { *right };
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BinStats {
    sum_gradients: f64,
    count: usize,
}

impl BinStats {
    fn add(&mut self, other: BinStats) {
        self.sum_gradients += other.sum_gradients;
        self.count += other.count;
    }

    fn minus(self, other: BinStats) -> BinStats {
        BinStats {
            sum_gradients: self.sum_gradients - other.sum_gradients,
            count: self.count - other.count,
        }
    }
}

/// Squared-error objective: hessians are all 1, so the hessian sum is the count.
fn leaf_score(stats: BinStats, l2: f64) -> f64 {
    stats.sum_gradients * stats.sum_gradients / (stats.count as f64 + l2)
}

fn leaf_value(stats: BinStats, l2: f64) -> f64 {
    -stats.sum_gradients / (stats.count as f64 + l2)
}

#[derive(Debug, Clone, Copy)]
struct SplitInfo {
    gain: f64,
    feature: usize,
    /// Last non-missing bin sent left.
    bin: usize,
    missing_go_left: bool,
}

/// A splittable leaf waiting in the growth queue, ordered by gain.
struct Candidate {
    node: usize,
    split: SplitInfo,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Equal gains: the older node wins.
        self.split
            .gain
            .total_cmp(&other.split.gain)
            .then_with(|| other.node.cmp(&self.node))
    }
}

enum Slot {
    Leaf {
        samples: Vec<usize>,
        depth: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        missing_go_left: bool,
        left: usize,
        right: usize,
    },
}

/// Grows one tree on the current gradients.
pub struct TreeGrower<'a> {
    binned: &'a Array2<u8>,
    gradients: &'a [f64],
    mapper: &'a BinMapper,
    params: &'a GradientBoostingConfig,
}

impl<'a> TreeGrower<'a> {
    pub fn new(
        binned: &'a Array2<u8>,
        gradients: &'a [f64],
        mapper: &'a BinMapper,
        params: &'a GradientBoostingConfig,
    ) -> Self {
        Self {
            binned,
            gradients,
            mapper,
            params,
        }
    }

    /// Grow leaf-wise: always split the leaf with the largest gain until
    /// `max_leaf_nodes` is reached or no leaf can be split.
    pub fn grow(&self) -> Tree {
        let max_depth = self.params.max_depth.unwrap_or(usize::MAX);
        let root: Vec<usize> = (0..self.binned.nrows()).collect();

        let mut heap = BinaryHeap::new();
        if max_depth > 0 {
            if let Some(split) = self.find_best_split(&root) {
                heap.push(Candidate { node: 0, split });
            }
        }
        let mut slots = vec![Slot::Leaf {
            samples: root,
            depth: 0,
        }];
        let mut n_leaves = 1;

        while n_leaves < self.params.max_leaf_nodes {
            let Some(Candidate { node, split }) = heap.pop() else {
                break;
            };

            let left_id = slots.len();
            let right_id = left_id + 1;
            let placeholder = Slot::Split {
                feature: split.feature,
                threshold: self.threshold(&split),
                missing_go_left: split.missing_go_left,
                left: left_id,
                right: right_id,
            };
            let Slot::Leaf { samples, depth } = std::mem::replace(&mut slots[node], placeholder)
            else {
                continue;
            };

            let (left, right): (Vec<usize>, Vec<usize>) = samples
                .into_iter()
                .partition(|&i| self.goes_left(i, &split));

            for (child_id, child) in [(left_id, &left), (right_id, &right)] {
                if depth + 1 < max_depth {
                    if let Some(child_split) = self.find_best_split(child) {
                        heap.push(Candidate {
                            node: child_id,
                            split: child_split,
                        });
                    }
                }
            }
            slots.push(Slot::Leaf {
                samples: left,
                depth: depth + 1,
            });
            slots.push(Slot::Leaf {
                samples: right,
                depth: depth + 1,
            });
            n_leaves += 1;
        }

        let l2 = self.params.l2_regularization;
        let nodes = slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Leaf { samples, .. } => Node::Leaf {
                    value: leaf_value(self.stats(&samples), l2),
                },
                Slot::Split {
                    feature,
                    threshold,
                    missing_go_left,
                    left,
                    right,
                } => Node::Split {
                    feature,
                    threshold,
                    missing_go_left,
                    left,
                    right,
                },
            })
            .collect();
        Tree { nodes }
    }

    fn stats(&self, samples: &[usize]) -> BinStats {
        BinStats {
            sum_gradients: samples.iter().map(|&i| self.gradients[i]).sum(),
            count: samples.len(),
        }
    }

    /// Raw-value threshold matching a bin split. Splitting after the last
    /// non-missing bin sends every observed value left.
    fn threshold(&self, split: &SplitInfo) -> f64 {
        let thresholds = self.mapper.thresholds(split.feature);
        thresholds.get(split.bin).copied().unwrap_or(f64::INFINITY)
    }

    fn goes_left(&self, sample: usize, split: &SplitInfo) -> bool {
        let bin = self.binned[[sample, split.feature]] as usize;
        if bin == self.mapper.missing_bin() {
            split.missing_go_left
        } else {
            bin <= split.bin
        }
    }

    /// Best split of `samples` over all features, trying the missing values on
    /// each side. Returns `None` when no split has positive gain while keeping
    /// `min_samples_leaf` samples on both sides.
    fn find_best_split(&self, samples: &[usize]) -> Option<SplitInfo> {
        let min_leaf = self.params.min_samples_leaf;
        if samples.len() < 2 * min_leaf {
            return None;
        }

        let l2 = self.params.l2_regularization;
        let total = self.stats(samples);
        let parent_score = leaf_score(total, l2);
        let missing_bin = self.mapper.missing_bin();

        let mut best: Option<SplitInfo> = None;
        let mut consider = |left: BinStats, feature: usize, bin: usize, missing_go_left: bool| {
            let right = total.minus(left);
            if left.count < min_leaf || right.count < min_leaf {
                return;
            }
            let gain = leaf_score(left, l2) + leaf_score(right, l2) - parent_score;
            let best_gain = best.map_or(0.0, |b| b.gain);
            if gain > best_gain {
                best = Some(SplitInfo {
                    gain,
                    feature,
                    bin,
                    missing_go_left,
                });
            }
        };

        for feature in 0..self.binned.ncols() {
            let n_bins = self.mapper.n_bins_non_missing(feature);
            if n_bins == 0 {
                continue;
            }

            let mut histogram = vec![BinStats::default(); n_bins];
            let mut missing = BinStats::default();
            for &i in samples {
                let bin = self.binned[[i, feature]] as usize;
                let slot = if bin == missing_bin {
                    &mut missing
                } else {
                    &mut histogram[bin]
                };
                slot.sum_gradients += self.gradients[i];
                slot.count += 1;
            }

            let mut observed_left = BinStats::default();
            for (bin, stats) in histogram.iter().enumerate() {
                observed_left.add(*stats);
                let last = bin + 1 == n_bins;

                if missing.count == 0 {
                    if last {
                        continue;
                    }
                    // Nothing to learn from: send future missing values to
                    // the larger child.
                    let right_count = total.count - observed_left.count;
                    consider(observed_left, feature, bin, observed_left.count >= right_count);
                } else if last {
                    consider(observed_left, feature, bin, false);
                } else {
                    let mut with_missing = observed_left;
                    with_missing.add(missing);
                    consider(with_missing, feature, bin, true);
                    consider(observed_left, feature, bin, false);
                }
            }
        }

        best
    }
}
