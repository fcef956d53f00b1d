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

use ndarray::Array1;

use crate::errors::LossError;

pub trait LossFunction {
    fn calculate(&self, predictions: &Array1<f64>, actuals: &Array1<f64>)
    -> Result<f64, LossError>;
}

fn check_inputs(predictions: &Array1<f64>, actuals: &Array1<f64>) -> Result<(), LossError> {
    if predictions.is_empty() || actuals.is_empty() {
        return Err(LossError::EmptyInput);
    }

    if predictions.len() != actuals.len() {
        return Err(LossError::DimensionMismatch {
            expected: predictions.len(),
            actual: actuals.len(),
        });
    }

    if predictions.iter().any(|&v| !v.is_finite()) || actuals.iter().any(|&v| !v.is_finite()) {
        return Err(LossError::InvalidNumericValue);
    }
    Ok(())
}

/// Mean squared error.
pub struct MSE;

impl LossFunction for MSE {
    fn calculate(
        &self,
        predictions: &Array1<f64>,
        actuals: &Array1<f64>,
    ) -> Result<f64, LossError> {
        check_inputs(predictions, actuals)?;
        let diff = predictions - actuals;
        diff.mapv(|x| x * x).mean().ok_or(LossError::EmptyInput)
    }
}

/// Mean absolute error, in the target's own unit (INR for prices).
pub struct MAE;

impl LossFunction for MAE {
    fn calculate(
        &self,
        predictions: &Array1<f64>,
        actuals: &Array1<f64>,
    ) -> Result<f64, LossError> {
        check_inputs(predictions, actuals)?;
        let diff = predictions - actuals;
        diff.mapv(f64::abs).mean().ok_or(LossError::EmptyInput)
    }
}

/// Coefficient of determination.
///
/// Returns 1.0 for a perfect fit of a constant target and 0.0 for an imperfect one,
/// since the total variance is zero there.
pub fn r2_score(predictions: &Array1<f64>, actuals: &Array1<f64>) -> Result<f64, LossError> {
    check_inputs(predictions, actuals)?;
    let mean = actuals.mean().ok_or(LossError::EmptyInput)?;
    let residual: f64 = (actuals - predictions).mapv(|x| x * x).sum();
    let total: f64 = actuals.mapv(|y| (y - mean) * (y - mean)).sum();
    if total == 0.0 {
        return Ok(if residual == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - residual / total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    #[test]
    fn test_mse_empty_input() {
        let loss = MSE;
        let predictions: Array1<f64> = Array1::zeros(0);
        let actuals = array![1.0];
        let result = loss.calculate(&predictions, &actuals);
        assert!(matches!(result, Err(LossError::EmptyInput)));
    }

    #[test]
    fn test_mse_dimension_mismatch() {
        let loss = MSE;
        let predictions = array![1.0, 2.0];
        let actuals = array![1.0, 2.0, 3.0];
        let result = loss.calculate(&predictions, &actuals);
        assert!(matches!(result, Err(LossError::DimensionMismatch { expected: 2, actual: 3 })));
    }

    #[test]
    fn test_mse_valid_computation() {
        let loss = MSE;
        let predictions = array![1.0, 2.0, 3.0];
        let actuals = array![1.1, 2.1, 3.1];
        let mse = loss.calculate(&predictions, &actuals).unwrap();
        assert!((mse - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_mae_invalid_numeric_value() {
        let loss = MAE;
        let predictions = array![1.0, f64::NAN];
        let actuals = array![1.0, 2.0];
        let result = loss.calculate(&predictions, &actuals);
        assert!(matches!(result, Err(LossError::InvalidNumericValue)));
    }

    #[test]
    fn test_mae_valid_computation() {
        let loss = MAE;
        let predictions = array![100.0, 250.0, 300.0];
        let actuals = array![110.0, 230.0, 300.0];
        let mae = loss.calculate(&predictions, &actuals).unwrap();
        assert!((mae - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_r2_perfect_and_mean_predictions() {
        let actuals = array![1.0, 2.0, 3.0, 4.0];
        assert_eq!(r2_score(&actuals.clone(), &actuals).unwrap(), 1.0);

        let mean_only = array![2.5, 2.5, 2.5, 2.5];
        assert!(r2_score(&mean_only, &actuals).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_r2_constant_target() {
        let actuals = array![5.0, 5.0];
        assert_eq!(r2_score(&array![5.0, 5.0], &actuals).unwrap(), 1.0);
        assert_eq!(r2_score(&array![4.0, 6.0], &actuals).unwrap(), 0.0);
    }

    #[test]
    fn test_r2_empty_input() {
        let empty: Array1<f64> = Array1::zeros(0);
        assert_eq!(r2_score(&empty, &empty), Err(LossError::EmptyInput));
    }
}
