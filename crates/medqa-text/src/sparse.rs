/// L2-normalized sparse vector over vocabulary term ids.
///
/// Entries are sorted by term id and hold only non-zero weights. A vector
/// whose raw weights are all zero stays the zero vector instead of being
/// divided by a zero norm.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(u32, f64)>,
}

impl SparseVector {
    /// Normalizes raw `(term, weight)` pairs to unit length.
    ///
    /// Repeated term ids are summed before normalizing.
    pub fn from_weights(mut weights: Vec<(u32, f64)>) -> Self {
        weights.retain(|(_, w)| *w != 0.0);
        weights.sort_by_key(|(t, _)| *t);
        let mut entries: Vec<(u32, f64)> = Vec::with_capacity(weights.len());
        for (term, w) in weights {
            match entries.last_mut() {
                Some((last, acc)) if *last == term => *acc += w,
                _ => entries.push((term, w)),
            }
        }
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 && norm.is_finite() {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        } else {
            entries.clear();
        }
        Self { entries }
    }

    /// Dot product over shared terms; the cosine similarity for unit vectors.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, term: u32) -> f64 {
        self.entries
            .binary_search_by_key(&term, |(t, _)| *t)
            .map_or(0.0, |i| self.entries[i].1)
    }

    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }
}
