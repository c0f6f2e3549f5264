pub mod error;
pub mod input;
pub mod score;
pub mod table;

use std::cmp::Reverse;
use std::path::Path;

use ordered_float::NotNan;

pub use crate::error::Error;
pub use crate::input::{DecisionMatrix, Impact, Weights};
pub use crate::score::Score;
pub use crate::table::{RawTable, ResultTable};

/// Closeness score and rank for one alternative, aligned with the input row
/// order of the matrix it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked {
    pub score: Score,
    pub rank: u32,
}

/// Rank alternatives with the TOPSIS method: vector-normalize each criteria
/// column, apply the weights, take the per-column extremes as the ideal best
/// and worst alternatives (direction given by the impacts), and score each
/// row by its relative closeness `d_worst / (d_best + d_worst)` to those
/// ideals. Higher scores are better; rank 1 is best.
///
/// Ranks are dense: rows share a rank only when their scores are equal after
/// rounding to 4 decimal places, and rows with equal rounded scores keep
/// their input order. The computation is deterministic; identical input
/// always yields identical output.
pub fn rank(
    matrix: &DecisionMatrix,
    weights: &Weights,
    impacts: &[Impact],
) -> Result<Vec<Ranked>, Error> {
    let criteria = matrix.criteria_count();
    if weights.len() != criteria || impacts.len() != criteria {
        return Err(Error::CountMismatch {
            weights: weights.len(),
            impacts: impacts.len(),
            criteria,
        });
    }

    let weighted = weighted_normals(matrix, weights)?;

    let mut ideal_best = vec![0.0; criteria];
    let mut ideal_worst = vec![0.0; criteria];
    for column in 0..criteria {
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for row in &weighted {
            max = max.max(row[column]);
            min = min.min(row[column]);
        }
        (ideal_best[column], ideal_worst[column]) = match impacts[column] {
            Impact::Benefit => (max, min),
            Impact::Cost => (min, max),
        };
    }

    let scores: Vec<Score> = weighted
        .iter()
        .map(|row| closeness(row, &ideal_best, &ideal_worst))
        .collect();
    let ranks = assign_ranks(&scores);

    Ok(scores
        .into_iter()
        .zip(ranks)
        .map(|(score, rank)| Ranked { score, rank })
        .collect())
}

/// Validate a raw table against comma-separated weight and impact strings and
/// rank it, returning the original columns with `Topsis Score` and `Rank`
/// appended in input row order.
pub fn rank_table(table: &RawTable, weights: &str, impacts: &str) -> Result<ResultTable, Error> {
    let matrix = DecisionMatrix::from_table(table)?;
    let weights = Weights::parse(weights)?;
    let impacts = Impact::parse_list(impacts)?;
    let ranked = rank(&matrix, &weights, &impacts)?;
    Ok(ResultTable::new(table, &ranked))
}

/// [`rank_table`] over a CSV file on disk.
pub fn rank_file(input: &Path, weights: &str, impacts: &str) -> Result<ResultTable, Error> {
    let table = RawTable::load(input)?;
    rank_table(&table, weights, impacts)
}

/// Divide each criteria column by its Euclidean norm and multiply by its
/// weight. A column of all zeros has no defined direction and is rejected.
fn weighted_normals(matrix: &DecisionMatrix, weights: &Weights) -> Result<Vec<Vec<f64>>, Error> {
    let values = matrix.values();
    let criteria = matrix.criteria_count();

    let mut norms = vec![0.0; criteria];
    for row in values {
        for (norm, value) in norms.iter_mut().zip(row) {
            *norm += value * value;
        }
    }
    for (column, norm) in norms.iter_mut().enumerate() {
        *norm = norm.sqrt();
        if *norm == 0.0 {
            return Err(Error::DegenerateColumn {
                column: matrix.column_name(column).to_string(),
            });
        }
    }

    let weights = weights.as_slice();
    Ok(values
        .iter()
        .map(|row| {
            row.iter()
                .zip(&norms)
                .zip(weights)
                .map(|((value, norm), weight)| value / norm * weight)
                .collect()
        })
        .collect())
}

fn closeness(row: &[f64], ideal_best: &[f64], ideal_worst: &[f64]) -> Score {
    let d_best = distance(row, ideal_best);
    let d_worst = distance(row, ideal_worst);
    if d_best + d_worst == 0.0 {
        // The row coincides with both ideals, which only happens when it is
        // the sole alternative. The closeness ratio is undefined there; 0.5
        // is the documented convention, never NaN.
        return Score::new(0.5).unwrap();
    }
    // d_worst <= d_best + d_worst holds under rounding, so the ratio stays
    // within [0, 1] and is never NaN.
    Score::new(d_worst / (d_best + d_worst)).unwrap()
}

fn distance(row: &[f64], ideal: &[f64]) -> f64 {
    row.iter()
        .zip(ideal)
        .map(|(value, ideal)| (value - ideal) * (value - ideal))
        .sum::<f64>()
        .sqrt()
}

/// Dense ranks from a stable descending sort on score: 1 for the highest
/// rounded score, incrementing once per distinct rounded score.
fn assign_ranks(scores: &[Score]) -> Vec<u32> {
    let keys: Vec<Reverse<NotNan<f64>>> = scores
        .iter()
        .map(|score| Reverse(score.as_inner()))
        .collect();
    let mut sort = permutation::sort_by_key(keys.as_slice(), |key| *key);
    let mut order: Vec<usize> = (0..scores.len()).collect();
    sort.apply_slice_in_place(&mut order);

    let mut ranks = vec![0; scores.len()];
    let mut rank = 0;
    let mut previous: Option<NotNan<f64>> = None;
    for &row in &order {
        let key = scores[row].rounded();
        if previous != Some(key) {
            rank += 1;
            previous = Some(key);
        }
        ranks[row] = rank;
    }
    ranks
}
