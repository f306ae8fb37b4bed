//! Cleaning strategies for raw tabular input
//!
//! Two deliberately distinct strategies share one coercion primitive:
//! grouped cleaning drops bad cells per column independently (ANOVA),
//! aligned cleaning drops whole rows on any bad cell (regression), because
//! a fit needs cross-column row alignment. Neither strategy errors on bad
//! input; size adequacy is the engines' concern.

use crate::types::{AlignedTable, Cell, Group, GroupedData, Table};

/// Coerce one cell to a finite floating-point value.
///
/// Numbers pass through (non-finite rejected), text is trimmed and parsed,
/// null and unparsable text yield `None`.
pub fn coerce_numeric(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(v) if v.is_finite() => Some(*v),
        Cell::Number(_) => None,
        Cell::Text(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => None,
        },
        Cell::Null => None,
    }
}

/// Column-wise cleaning for the ANOVA path.
///
/// Transposes rows to columns, then independently drops null and
/// non-numeric cells per column. Columns with zero surviving values are
/// dropped from the group set rather than zero-filled.
pub fn clean_grouped(table: &Table) -> GroupedData {
    let mut groups = Vec::with_capacity(table.columns().len());
    let mut n_total = 0;

    for (j, name) in table.columns().iter().enumerate() {
        let values: Vec<f64> = table
            .rows()
            .iter()
            .filter_map(|row| coerce_numeric(&row[j]))
            .collect();

        if values.is_empty() {
            continue;
        }

        n_total += values.len();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        groups.push(Group {
            name: name.clone(),
            values,
            mean,
        });
    }

    GroupedData { groups, n_total }
}

/// Row-wise (listwise) cleaning for the regression path.
///
/// Any row containing a coercion failure in any column is removed in its
/// entirety, so every retained row is fully numeric and aligned. Original
/// row indices are kept for per-observation reporting.
pub fn clean_aligned(table: &Table) -> AlignedTable {
    let mut rows = Vec::with_capacity(table.rows().len());
    let mut row_ids = Vec::with_capacity(table.rows().len());

    for (i, row) in table.rows().iter().enumerate() {
        let numeric: Option<Vec<f64>> = row.iter().map(coerce_numeric).collect();
        if let Some(values) = numeric {
            rows.push(values);
            row_ids.push(i);
        }
    }

    AlignedTable {
        columns: table.columns().to_vec(),
        rows,
        row_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect(), rows).unwrap()
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric(&Cell::Number(1.5)), Some(1.5));
        assert_eq!(coerce_numeric(&Cell::Text(" 2.5 ".into())), Some(2.5));
        assert_eq!(coerce_numeric(&Cell::Text("abc".into())), None);
        assert_eq!(coerce_numeric(&Cell::Null), None);
        assert_eq!(coerce_numeric(&Cell::Number(f64::NAN)), None);
        assert_eq!(coerce_numeric(&Cell::Number(f64::INFINITY)), None);
    }

    #[test]
    fn test_grouped_drops_bad_cells_per_column() {
        let t = table(
            &["a", "b"],
            vec![
                vec![Cell::Number(1.0), Cell::Number(4.0)],
                vec![Cell::Null, Cell::Number(5.0)],
                vec![Cell::Number(3.0), Cell::Text("x".into())],
            ],
        );
        let cleaned = clean_grouped(&t);

        assert_eq!(cleaned.groups.len(), 2);
        assert_eq!(cleaned.groups[0].values, vec![1.0, 3.0]);
        assert_eq!(cleaned.groups[1].values, vec![4.0, 5.0]);
        assert!((cleaned.groups[0].mean - 2.0).abs() < 1e-12);
        assert!((cleaned.groups[1].mean - 4.5).abs() < 1e-12);
        assert_eq!(cleaned.n_total, 4);
    }

    #[test]
    fn test_grouped_drops_empty_column_entirely() {
        let t = table(
            &["a", "junk"],
            vec![
                vec![Cell::Number(1.0), Cell::Text("x".into())],
                vec![Cell::Number(2.0), Cell::Null],
            ],
        );
        let cleaned = clean_grouped(&t);

        assert_eq!(cleaned.groups.len(), 1);
        assert_eq!(cleaned.groups[0].name, "a");
        assert_eq!(cleaned.n_total, 2);
    }

    #[test]
    fn test_aligned_listwise_deletion() {
        let t = table(
            &["x", "y"],
            vec![
                vec![Cell::Number(1.0), Cell::Number(2.0)],
                vec![Cell::Number(3.0), Cell::Text("bad".into())],
                vec![Cell::Text("4".into()), Cell::Number(5.0)],
            ],
        );
        let cleaned = clean_aligned(&t);

        assert_eq!(cleaned.rows, vec![vec![1.0, 2.0], vec![4.0, 5.0]]);
        assert_eq!(cleaned.row_ids, vec![0, 2]);
        assert_eq!(cleaned.columns, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_aligned_all_rows_bad() {
        let t = table(
            &["x", "y"],
            vec![
                vec![Cell::Null, Cell::Number(2.0)],
                vec![Cell::Number(3.0), Cell::Null],
            ],
        );
        let cleaned = clean_aligned(&t);
        assert!(cleaned.rows.is_empty());
    }
}
