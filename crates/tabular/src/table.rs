//! The row table and its outer join.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::{TabularError, TabularResult};

/// An ordered sequence of rows over named columns. Cells are optional:
/// `None` marks a value absent after an outer join; `NaN` carries a fill
/// value from the source data. Both serialize as an empty CSV field.
#[derive(Debug, Clone, PartialEq)]
pub struct RowTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl RowTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn push_row(&mut self, row: Vec<Option<f64>>) -> TabularResult<()> {
        if row.len() != self.columns.len() {
            return Err(TabularError::RowLengthMismatch {
                got: row.len(),
                expected: self.columns.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Serialize as CSV. Absent cells and NaN both become empty fields.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.columns.join(","));
        out.push('\n');
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if let Some(v) = cell {
                    if !v.is_nan() {
                        let _ = write!(out, "{}", v);
                    }
                }
            }
            out.push('\n');
        }
        out
    }

    /// Full outer join with `other`.
    ///
    /// The join key is the intersection of the two tables' column-name
    /// sets. That is intentionally the whole column set, not just
    /// coordinate columns: if a later variable's name collides with an
    /// already-merged column, the key silently includes it. Kept for
    /// compatibility with the original merge behavior.
    ///
    /// Every row from each side is kept: rows combine where all key cells
    /// match, and unmatched rows keep the opposite side's non-key columns
    /// empty. Result rows are this table's rows in order (expanded by their
    /// matches), then unmatched `other` rows. Key equality treats NaN as
    /// equal to NaN and `-0.0` as equal to `0.0`.
    pub fn outer_join(&self, other: &RowTable) -> TabularResult<RowTable> {
        let key_cols: Vec<&String> = self
            .columns
            .iter()
            .filter(|c| other.column_index(c).is_some())
            .collect();
        if key_cols.is_empty() {
            return Err(TabularError::NoCommonColumns);
        }

        let left_key: Vec<usize> = key_cols
            .iter()
            .map(|c| self.column_index(c).unwrap_or_default())
            .collect();
        let right_key: Vec<usize> = key_cols
            .iter()
            .map(|c| other.column_index(c).unwrap_or_default())
            .collect();
        // Columns only `other` contributes, in its order.
        let right_extra: Vec<usize> = (0..other.columns.len())
            .filter(|i| !right_key.contains(i))
            .collect();

        let mut columns = self.columns.clone();
        columns.extend(right_extra.iter().map(|&i| other.columns[i].clone()));
        let mut result = RowTable::new(columns);

        // Index the right side by key tuple.
        let mut index: HashMap<Vec<Option<u64>>, Vec<usize>> = HashMap::new();
        for (ri, row) in other.rows.iter().enumerate() {
            let key = encode_key(row, &right_key);
            index.entry(key).or_default().push(ri);
        }

        let mut matched = vec![false; other.rows.len()];
        for row in &self.rows {
            let key = encode_key(row, &left_key);
            match index.get(&key) {
                Some(right_rows) => {
                    for &ri in right_rows {
                        matched[ri] = true;
                        let mut combined = row.clone();
                        combined.extend(right_extra.iter().map(|&i| other.rows[ri][i]));
                        result.rows.push(combined);
                    }
                }
                None => {
                    let mut combined = row.clone();
                    combined.extend(std::iter::repeat(None).take(right_extra.len()));
                    result.rows.push(combined);
                }
            }
        }

        // Right-only rows: key cells carried over, left-only columns empty.
        for (ri, row) in other.rows.iter().enumerate() {
            if matched[ri] {
                continue;
            }
            let mut combined: Vec<Option<f64>> = self
                .columns
                .iter()
                .map(|c| {
                    key_cols
                        .iter()
                        .position(|k| *k == c)
                        .and_then(|pos| row[right_key[pos]])
                })
                .collect();
            combined.extend(right_extra.iter().map(|&i| row[i]));
            result.rows.push(combined);
        }

        Ok(result)
    }
}

/// Canonical hashable encoding of the key cells of one row.
fn encode_key(row: &[Option<f64>], key_idx: &[usize]) -> Vec<Option<u64>> {
    key_idx
        .iter()
        .map(|&i| row[i].map(canonical_bits))
        .collect()
}

/// Bit pattern with NaN collapsed to one representation and -0.0
/// normalized to 0.0, so NaN keys match NaN keys the way pandas merges do.
fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[Option<f64>]]) -> RowTable {
        let mut t = RowTable::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.to_vec()).unwrap();
        }
        t
    }

    #[test]
    fn test_join_on_shared_coordinates() {
        let left = table(
            &["x", "a"],
            &[
                &[Some(0.0), Some(1.0)],
                &[Some(1.0), Some(2.0)],
            ],
        );
        let right = table(
            &["x", "b"],
            &[
                &[Some(1.0), Some(20.0)],
                &[Some(2.0), Some(30.0)],
            ],
        );

        let joined = left.outer_join(&right).unwrap();
        assert_eq!(joined.columns(), &["x", "a", "b"]);
        // one matched pair + one unmatched left + one unmatched right
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.rows()[0], vec![Some(0.0), Some(1.0), None]);
        assert_eq!(joined.rows()[1], vec![Some(1.0), Some(2.0), Some(20.0)]);
        assert_eq!(joined.rows()[2], vec![Some(2.0), None, Some(30.0)]);
    }

    #[test]
    fn test_join_cardinality() {
        // |result| = matched pairs + unmatched left + unmatched right
        let left = table(
            &["x", "a"],
            &[
                &[Some(0.0), Some(1.0)],
                &[Some(1.0), Some(2.0)],
                &[Some(9.0), Some(3.0)],
            ],
        );
        let right = table(
            &["x", "b"],
            &[
                &[Some(0.0), Some(5.0)],
                &[Some(1.0), Some(6.0)],
                &[Some(7.0), Some(7.0)],
            ],
        );
        let joined = left.outer_join(&right).unwrap();
        assert_eq!(joined.len(), 2 + 1 + 1);
    }

    #[test]
    fn test_join_no_common_columns() {
        let left = table(&["x", "a"], &[&[Some(0.0), Some(1.0)]]);
        let right = table(&["y", "b"], &[&[Some(0.0), Some(2.0)]]);
        assert!(matches!(
            left.outer_join(&right),
            Err(TabularError::NoCommonColumns)
        ));
    }

    #[test]
    fn test_join_key_includes_colliding_value_column() {
        // "a" exists on both sides, so it joins the key alongside "x".
        let left = table(&["x", "a"], &[&[Some(0.0), Some(1.0)]]);
        let right = table(
            &["x", "a", "b"],
            &[
                &[Some(0.0), Some(1.0), Some(10.0)],
                &[Some(0.0), Some(2.0), Some(20.0)],
            ],
        );
        let joined = left.outer_join(&right).unwrap();
        // Only the (0.0, 1.0) row matches; (0.0, 2.0) stays unmatched.
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.rows()[0], vec![Some(0.0), Some(1.0), Some(10.0)]);
        assert_eq!(joined.rows()[1], vec![Some(0.0), Some(2.0), Some(20.0)]);
    }

    #[test]
    fn test_join_order_sensitivity() {
        // The key sets diverge between association orders: joining t1
        // first puts "a" into the accumulator, so the final key is
        // {x, a}; joining t2 and t3 first keys them on {x} alone. The
        // results differ, which is why merge order is fixed.
        let t1 = table(
            &["x", "a"],
            &[
                &[Some(0.0), Some(1.0)],
                &[Some(0.0), Some(2.0)],
            ],
        );
        let t2 = table(&["x", "b"], &[&[Some(0.0), Some(5.0)]]);
        let t3 = table(&["x", "a", "c"], &[&[Some(0.0), Some(1.0), Some(7.0)]]);

        let left_first = t1.outer_join(&t2).unwrap().outer_join(&t3).unwrap();
        let right_first = t1.outer_join(&t2.outer_join(&t3).unwrap()).unwrap();

        assert_eq!(left_first.columns(), right_first.columns());
        assert_ne!(left_first.rows(), right_first.rows());
        // Left-association keeps b=5 on the (x=0, a=2) row; the other
        // order loses it because {x, a} was already the key.
        let a2_row_left = left_first
            .rows()
            .iter()
            .find(|r| r[1] == Some(2.0))
            .unwrap();
        let a2_row_right = right_first
            .rows()
            .iter()
            .find(|r| r[1] == Some(2.0))
            .unwrap();
        assert_eq!(a2_row_left[2], Some(5.0));
        assert_eq!(a2_row_right[2], None);
    }

    #[test]
    fn test_nan_keys_match() {
        let left = table(&["x", "a"], &[&[Some(f64::NAN), Some(1.0)]]);
        let right = table(&["x", "b"], &[&[Some(f64::NAN), Some(2.0)]]);
        let joined = left.outer_join(&right).unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined.rows()[0][1], Some(1.0));
        assert_eq!(joined.rows()[0][2], Some(2.0));
    }

    #[test]
    fn test_negative_zero_key_matches_zero() {
        let left = table(&["x", "a"], &[&[Some(-0.0), Some(1.0)]]);
        let right = table(&["x", "b"], &[&[Some(0.0), Some(2.0)]]);
        assert_eq!(left.outer_join(&right).unwrap().len(), 1);
    }

    #[test]
    fn test_csv_serialization() {
        let t = table(
            &["x", "t2"],
            &[
                &[Some(0.0), Some(1.5)],
                &[Some(1.0), None],
                &[Some(2.0), Some(f64::NAN)],
            ],
        );
        assert_eq!(t.to_csv(), "x,t2\n0,1.5\n1,\n2,\n");
    }

    #[test]
    fn test_push_row_length_check() {
        let mut t = RowTable::new(vec!["a".into(), "b".into()]);
        assert!(t.push_row(vec![Some(1.0)]).is_err());
    }
}
