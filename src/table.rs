/// Variable-by-sample table: one row per sample, one column per free variable.
///
/// The containers themselves live outside this crate; anything that can hand
/// out rows as `f64` slices can be evaluated with [`crate::Equation::eval_table`].
pub trait SampleTable {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    fn row(&self, index: usize) -> &[f64];
}

/// Rows of a `Vec<f64>` slice. The first row decides the column count; an
/// empty table has zero columns, which evaluation accepts since it has no rows.
impl SampleTable for [Vec<f64>] {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn column_count(&self) -> usize {
        self.first().map_or(0, Vec::len)
    }

    fn row(&self, index: usize) -> &[f64] {
        &self[index]
    }
}

impl SampleTable for Vec<Vec<f64>> {
    fn row_count(&self) -> usize {
        self.as_slice().row_count()
    }

    fn column_count(&self) -> usize {
        self.as_slice().column_count()
    }

    fn row(&self, index: usize) -> &[f64] {
        self.as_slice().row(index)
    }
}

impl<const N: usize> SampleTable for [[f64; N]] {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn column_count(&self) -> usize {
        N
    }

    fn row(&self, index: usize) -> &[f64] {
        &self[index]
    }
}

impl<const N: usize> SampleTable for Vec<[f64; N]> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn column_count(&self) -> usize {
        N
    }

    fn row(&self, index: usize) -> &[f64] {
        &self[index]
    }
}
