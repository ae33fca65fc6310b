use super::value::Value;

/// One row, addressed by column position.
pub type Tuple = Vec<Value>;

/// Read-only positional access to a row, whether it is stored contiguously or
/// assembled from two halves by a [`FrameTuple`].
pub trait TupleView {
    fn width(&self) -> usize;

    fn value(&self, idx: usize) -> Option<&Value>;
}

impl TupleView for [Value] {
    #[inline]
    fn width(&self) -> usize {
        self.len()
    }

    #[inline]
    fn value(&self, idx: usize) -> Option<&Value> {
        self.get(idx)
    }
}

impl TupleView for Vec<Value> {
    #[inline]
    fn width(&self) -> usize {
        self.len()
    }

    #[inline]
    fn value(&self, idx: usize) -> Option<&Value> {
        self.get(idx)
    }
}

/// Zero-copy concatenation of a left and a right row.
#[derive(Debug, Clone, Copy)]
pub struct FrameTuple<'a> {
    left: &'a [Value],
    right: &'a [Value],
}

impl<'a> FrameTuple<'a> {
    #[must_use]
    pub const fn new(left: &'a [Value], right: &'a [Value]) -> Self {
        Self { left, right }
    }

    /// Copies the frame's values into `out`, reusing its allocation.
    pub fn write_into(&self, out: &mut Tuple) {
        out.clear();
        out.extend_from_slice(self.left);
        out.extend_from_slice(self.right);
    }
}

impl TupleView for FrameTuple<'_> {
    #[inline]
    fn width(&self) -> usize {
        self.left.len() + self.right.len()
    }

    #[inline]
    fn value(&self, idx: usize) -> Option<&Value> {
        match idx.checked_sub(self.left.len()) {
            None => self.left.get(idx),
            Some(right_idx) => self.right.get(right_idx),
        }
    }
}

/// A tuple of `width` nulls, standing in for a missing join side.
#[must_use]
pub fn null_padded_tuple(width: usize) -> Tuple {
    vec![Value::Null; width]
}
