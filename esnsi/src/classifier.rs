/// A decoded simple classifier: metadata plus records of type `T`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classifier<T> {
    pub name: String,
    pub code: String,
    pub uid: String,
    pub version: i64,
    pub records: Vec<T>,
}

impl<T> Classifier<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
