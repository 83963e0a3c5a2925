use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Shape(pub SmallVec<[usize; 6]>);

impl Shape {
    pub fn from_slice(d: &[usize]) -> Self {
        Self(d.iter().copied().collect())
    }
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Size along `index`; negative indices count from the end (`-1` is the last dim).
    pub fn dim(&self, index: isize) -> Option<usize> {
        let rank = self.rank() as isize;
        let idx = if index < 0 { rank + index } else { index };
        if idx < 0 || idx >= rank {
            return None;
        }
        self.0.get(idx as usize).copied()
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
