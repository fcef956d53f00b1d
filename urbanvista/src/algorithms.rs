// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::collections::HashSet;

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::encoder::FeatureVector;
use crate::errors::ModelError;

/// A fitted model that maps one feature row to a scalar price.
///
/// Models remember the names of the columns they were trained on, in training
/// order. [`Regressor::predict`] gathers the row's values by those names, so the
/// caller's column order never matters, only the column set.
pub trait Regressor {
    /// Feature names in the order `predict_dense` expects them.
    fn feature_names(&self) -> &[String];

    /// Predicts from a dense row laid out in `feature_names` order.
    fn predict_dense(&self, row: ArrayView1<'_, f64>) -> Result<f64, ModelError>;

    /// Predicts from a schema-keyed row.
    ///
    /// Fails with [`ModelError::MissingFeature`] when the row lacks a model feature
    /// and with [`ModelError::UnexpectedFeature`] when it carries an extra column.
    fn predict(&self, row: &FeatureVector<'_>) -> Result<f64, ModelError> {
        let names = self.feature_names();
        let mut dense = Array1::zeros(names.len());
        for (slot, name) in dense.iter_mut().zip(names) {
            *slot = row.get(name).ok_or_else(|| ModelError::MissingFeature(name.clone()))?;
        }
        if row.len() != names.len() {
            let extra = row
                .columns()
                .find(|column| !names.iter().any(|name| name == column))
                .unwrap_or_default();
            return Err(ModelError::UnexpectedFeature(extra.to_string()));
        }
        self.predict_dense(dense.view())
    }
}

/// Represents a node of a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum TreeNode {
    Internal { feature: usize, threshold: f64, left: Box<TreeNode>, right: Box<TreeNode> },
    Leaf { prediction: f64, samples: usize },
}

impl TreeNode {
    fn predict(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut current = self;
        loop {
            match current {
                TreeNode::Leaf { prediction, .. } => return *prediction,
                TreeNode::Internal { feature, threshold, left, right } => {
                    current = if row[*feature] < *threshold { left } else { right };
                }
            }
        }
    }

    /// Largest feature index any split reads; `None` for a lone leaf.
    fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Internal { feature, left, right, .. } => {
                Some(*feature).max(left.max_feature()).max(right.max_feature())
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct TreeParams {
    max_depth: usize,
    min_samples_split: usize,
    min_samples_leaf: usize,
    /// Features tried per split; `None` tries all of them.
    max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams { max_depth: 12, min_samples_split: 2, min_samples_leaf: 1, max_features: None }
    }
}

impl TreeParams {
    fn validate(&self) -> Result<(), ModelError> {
        if self.max_depth == 0 {
            return Err(ModelError::InvalidParameter("max_depth must be at least 1".into()));
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidParameter("min_samples_split must be at least 2".into()));
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParameter("min_samples_leaf must be at least 1".into()));
        }
        if self.max_features == Some(0) {
            return Err(ModelError::InvalidParameter("max_features must be at least 1".into()));
        }
        Ok(())
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    score: f64,
}

/// Grows one CART regression tree on the rows in `indices`.
struct TreeGrower<'a, R: Rng> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    params: TreeParams,
    rng: &'a mut R,
}

impl<R: Rng> TreeGrower<'_, R> {
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> TreeNode {
        let n = indices.len();
        let sum: f64 = indices.iter().map(|&i| self.y[i]).sum();
        let mean = if n == 0 { 0.0 } else { sum / n as f64 };
        let pure = indices.iter().all(|&i| self.y[i] == self.y[indices[0]]);

        if depth >= self.params.max_depth || n < self.params.min_samples_split || pure {
            return TreeNode::Leaf { prediction: mean, samples: n };
        }

        let Some(split) = self.best_split(&indices) else {
            return TreeNode::Leaf { prediction: mean, samples: n };
        };

        let (left, right): (Vec<usize>, Vec<usize>) =
            indices.into_iter().partition(|&i| self.x[[i, split.feature]] < split.threshold);

        let left = self.grow(left, depth + 1);
        let right = self.grow(right, depth + 1);
        TreeNode::Internal {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        let n_features = self.x.ncols();
        match self.params.max_features {
            Some(k) if k < n_features => {
                rand::seq::index::sample(self.rng, n_features, k).into_vec()
            }
            _ => (0..n_features).collect(),
        }
    }

    /// Finds the split maximising `sum_l^2 / n_l + sum_r^2 / n_r`, which is the same
    /// as minimising the summed squared error of both children.
    fn best_split(&mut self, indices: &[usize]) -> Option<Split> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf;
        let total: f64 = indices.iter().map(|&i| self.y[i]).sum();
        let parent_score = total * total / n as f64;
        let mut best: Option<Split> = None;

        let mut column: Vec<(f64, f64)> = Vec::with_capacity(n);
        for feature in self.candidate_features() {
            column.clear();
            column.extend(indices.iter().map(|&i| (self.x[[i, feature]], self.y[i])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            if column[0].0 == column[n - 1].0 {
                continue;
            }

            let mut left_sum = 0.0;
            for position in 0..n - 1 {
                left_sum += column[position].1;
                let left_count = position + 1;
                let right_count = n - left_count;
                if column[position].0 == column[position + 1].0 {
                    continue;
                }
                if left_count < min_leaf || right_count < min_leaf {
                    continue;
                }

                let right_sum = total - left_sum;
                let score = left_sum * left_sum / left_count as f64
                    + right_sum * right_sum / right_count as f64;
                if score > parent_score * (1.0 + 1e-12)
                    && best.as_ref().map_or(true, |b| score > b.score)
                {
                    best = Some(Split {
                        feature,
                        threshold: (column[position].0 + column[position + 1].0) / 2.0,
                        score,
                    });
                }
            }
        }
        best
    }
}

fn check_training_input(
    x: &Array2<f64>,
    y: &Array1<f64>,
    feature_names: &[String],
) -> Result<(), ModelError> {
    if x.nrows() == 0 || x.ncols() == 0 || y.is_empty() {
        return Err(ModelError::EmptyInput);
    }
    if x.nrows() != y.len() {
        return Err(ModelError::DimensionMismatch { expected: x.nrows(), actual: y.len() });
    }
    if feature_names.len() != x.ncols() {
        return Err(ModelError::DimensionMismatch {
            expected: x.ncols(),
            actual: feature_names.len(),
        });
    }
    if x.iter().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::InvalidNumericValue);
    }
    Ok(())
}

fn check_row(row: ArrayView1<'_, f64>, n_features: usize) -> Result<(), ModelError> {
    if row.len() != n_features {
        return Err(ModelError::DimensionMismatch { expected: n_features, actual: row.len() });
    }
    if row.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::InvalidNumericValue);
    }
    Ok(())
}

pub struct DecisionTreeRegressorBuilder {
    params: TreeParams,
    seed: u64,
}

impl DecisionTreeRegressorBuilder {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.params.max_depth = max_depth;
        self
    }

    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.params.min_samples_split = min_samples_split;
        self
    }

    pub fn min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.params.min_samples_leaf = min_samples_leaf;
        self
    }

    pub fn max_features(mut self, max_features: usize) -> Self {
        self.params.max_features = Some(max_features);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> DecisionTreeRegressor {
        DecisionTreeRegressor {
            params: self.params,
            seed: self.seed,
            feature_names: Vec::new(),
            root: None,
        }
    }
}

/// A CART regression tree: squared-error splits, mean-valued leaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    params: TreeParams,
    seed: u64,
    feature_names: Vec<String>,
    root: Option<TreeNode>,
}

impl DecisionTreeRegressor {
    pub fn new() -> DecisionTreeRegressorBuilder {
        DecisionTreeRegressorBuilder { params: TreeParams::default(), seed: 0 }
    }

    pub fn fit(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        feature_names: &[String],
    ) -> Result<(), ModelError> {
        self.params.validate()?;
        check_training_input(x, y, feature_names)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut grower = TreeGrower { x, y, params: self.params, rng: &mut rng };
        let root = grower.grow((0..x.nrows()).collect(), 0);
        debug!("Grew regression tree of depth {}", root.depth());

        self.feature_names = feature_names.to_vec();
        self.root = Some(root);
        Ok(())
    }

    pub fn depth(&self) -> Option<usize> {
        self.root.as_ref().map(TreeNode::depth)
    }
}

impl Regressor for DecisionTreeRegressor {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_dense(&self, row: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        let root = self.root.as_ref().ok_or(ModelError::NotFitted)?;
        check_row(row, self.feature_names.len())?;
        Ok(root.predict(row))
    }
}

pub struct RandomForestRegressorBuilder {
    n_trees: usize,
    sample_size: Option<usize>,
    params: TreeParams,
    seed: u64,
}

impl RandomForestRegressorBuilder {
    pub fn n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    /// Rows drawn (with replacement) per tree; defaults to the training set size.
    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.params.max_depth = max_depth;
        self
    }

    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.params.min_samples_split = min_samples_split;
        self
    }

    pub fn min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.params.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Features tried per split; defaults to a third of the features.
    pub fn max_features(mut self, max_features: usize) -> Self {
        self.params.max_features = Some(max_features);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> RandomForestRegressor {
        RandomForestRegressor {
            n_trees: self.n_trees,
            sample_size: self.sample_size,
            params: self.params,
            seed: self.seed,
            feature_names: Vec::new(),
            trees: Vec::new(),
        }
    }
}

/// Bootstrap ensemble of regression trees; predictions are the mean over trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    n_trees: usize,
    sample_size: Option<usize>,
    params: TreeParams,
    seed: u64,
    feature_names: Vec<String>,
    trees: Vec<TreeNode>,
}

impl RandomForestRegressor {
    pub fn new() -> RandomForestRegressorBuilder {
        RandomForestRegressorBuilder {
            n_trees: 50,
            sample_size: None,
            params: TreeParams { max_depth: 16, ..TreeParams::default() },
            seed: 42,
        }
    }

    pub fn fit(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        feature_names: &[String],
    ) -> Result<(), ModelError> {
        if self.n_trees == 0 {
            return Err(ModelError::InvalidParameter("n_trees must be at least 1".into()));
        }
        if self.sample_size == Some(0) {
            return Err(ModelError::InvalidParameter("sample_size must be at least 1".into()));
        }
        self.params.validate()?;
        check_training_input(x, y, feature_names)?;

        let n_samples = x.nrows();
        let sample_size = self.sample_size.unwrap_or(n_samples);
        let params = TreeParams {
            max_features: self.params.max_features.or(Some((x.ncols() / 3).max(1))),
            ..self.params
        };

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut trees = Vec::with_capacity(self.n_trees);
        for t in 0..self.n_trees {
            let indices: Vec<usize> =
                (0..sample_size).map(|_| rng.gen_range(0..n_samples)).collect();
            let x_bootstrap = x.select(Axis(0), &indices);
            let y_bootstrap = y.select(Axis(0), &indices);

            let mut tree_rng = StdRng::seed_from_u64(rng.gen());
            let mut grower =
                TreeGrower { x: &x_bootstrap, y: &y_bootstrap, params, rng: &mut tree_rng };
            let root = grower.grow((0..sample_size).collect(), 0);
            debug!("Tree {}/{}: depth {}", t + 1, self.n_trees, root.depth());
            trees.push(root);
        }

        self.feature_names = feature_names.to_vec();
        self.trees = trees;
        Ok(())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Checks a forest that did not come from [`RandomForestRegressor::fit`], such as
    /// one read back from disk: it must hold at least one tree, name each feature
    /// once and only split on features it names.
    pub fn check_integrity(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        let mut seen = HashSet::with_capacity(self.feature_names.len());
        if let Some(name) = self.feature_names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(ModelError::DuplicateFeature(name.clone()));
        }
        let n_features = self.feature_names.len();
        for (tree, root) in self.trees.iter().enumerate() {
            if let Some(feature) = root.max_feature().filter(|&f| f >= n_features) {
                return Err(ModelError::FeatureOutOfRange { tree, feature, n_features });
            }
        }
        Ok(())
    }

    /// Predicts every row of a dense matrix laid out in `feature_names` order.
    pub fn predict_matrix(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        if x.nrows() == 0 {
            return Err(ModelError::EmptyInput);
        }
        x.outer_iter().map(|row| self.predict_dense(row)).collect()
    }
}

impl Regressor for RandomForestRegressor {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_dense(&self, row: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        check_row(row, self.feature_names.len())?;
        let total: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        Ok(total / self.trees.len() as f64)
    }
}
