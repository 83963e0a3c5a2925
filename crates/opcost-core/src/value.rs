use crate::Shape;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValueName(pub String);

impl From<&str> for ValueName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ValueName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Read-only view of one tensor-valued edge in a computation graph.
///
/// Hosts adapt their own value types by implementing this; the cost
/// handlers only ever ask whether the shape is resolved and, if so, for
/// its sizes.
pub trait ShapeDescriptor {
    /// True when every dimension of the edge is known.
    fn is_complete(&self) -> bool;

    /// Dimension sizes, or `None` while the shape is unresolved.
    fn sizes(&self) -> Option<Shape>;
}

impl<T: ShapeDescriptor + ?Sized> ShapeDescriptor for &T {
    fn is_complete(&self) -> bool {
        (**self).is_complete()
    }

    fn sizes(&self) -> Option<Shape> {
        (**self).sizes()
    }
}

impl ShapeDescriptor for Shape {
    fn is_complete(&self) -> bool {
        true
    }

    fn sizes(&self) -> Option<Shape> {
        Some(self.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueInfo {
    pub name: ValueName,
    pub dims: Vec<Option<usize>>, // None = dynamic
}

impl ValueInfo {
    pub fn known(name: impl Into<ValueName>, dims: &[usize]) -> Self {
        Self {
            name: name.into(),
            dims: dims.iter().copied().map(Some).collect(),
        }
    }

    pub fn dynamic(name: impl Into<ValueName>, dims: Vec<Option<usize>>) -> Self {
        Self {
            name: name.into(),
            dims,
        }
    }
}

impl ShapeDescriptor for ValueInfo {
    fn is_complete(&self) -> bool {
        self.dims.iter().all(Option::is_some)
    }

    fn sizes(&self) -> Option<Shape> {
        self.dims.iter().copied().collect::<Option<Shape>>()
    }
}
