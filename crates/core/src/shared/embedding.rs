/// A fixed-length face feature vector.
///
/// The dimension is set by the extractor that produced it (512 for the
/// bundled ArcFace model). Embeddings are immutable once produced; the only
/// operation the rest of the system needs is Euclidean distance.
#[derive(Clone, Debug, PartialEq)]
pub struct Embedding {
    values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn euclidean_distance(&self, other: &Embedding) -> f32 {
        debug_assert_eq!(
            self.values.len(),
            other.values.len(),
            "embeddings must have equal dimension"
        );
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

/// Scale a vector to unit L2 norm in place. Zero vectors are left unchanged.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
