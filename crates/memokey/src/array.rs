//! Array capabilities needed for key derivation
//!
//! A value can be keyed by content when it exposes a shape, an element
//! type tag and contiguous access to its elements in row-major order.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Error, Result};

/// Element type tag stored in every array key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementType {
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `f32`
    F32,
    /// `f64`
    F64,
}

impl ElementType {
    /// Size of one element in bytes
    pub fn size(self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 => 2,
            ElementType::I32 | ElementType::U32 | ElementType::F32 => 4,
            ElementType::I64 | ElementType::U64 | ElementType::F64 => 8,
        }
    }

    /// Short type name, e.g. `f64`
    pub fn name(self) -> &'static str {
        match self {
            ElementType::I8 => "i8",
            ElementType::I16 => "i16",
            ElementType::I32 => "i32",
            ElementType::I64 => "i64",
            ElementType::U8 => "u8",
            ElementType::U16 => "u16",
            ElementType::U32 => "u32",
            ElementType::U64 => "u64",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric element that can be copied into a key
pub trait Element: Copy + Send + Sync + 'static {
    /// Type tag for this element
    const TYPE: ElementType;

    /// Append the little-endian bytes of `self` to `out`
    fn write_le(self, out: &mut Vec<u8>);
}

macro_rules! impl_element {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const TYPE: ElementType = ElementType::$tag;

                #[inline]
                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_element! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64,
}

/// Anything that can be keyed by its array contents
pub trait ArrayLike {
    /// Element type
    type Elem: Element;

    /// Dimensions, outermost first
    fn shape(&self) -> Cow<'_, [usize]>;

    /// Elements in row-major order, or `None` without contiguous storage
    fn elements(&self) -> Option<&[Self::Elem]>;
}

impl<T: Element> ArrayLike for [T] {
    type Elem = T;

    fn shape(&self) -> Cow<'_, [usize]> {
        Cow::Owned(vec![self.len()])
    }

    fn elements(&self) -> Option<&[T]> {
        Some(self)
    }
}

impl<T: Element> ArrayLike for Vec<T> {
    type Elem = T;

    fn shape(&self) -> Cow<'_, [usize]> {
        self.as_slice().shape()
    }

    fn elements(&self) -> Option<&[T]> {
        Some(self.as_slice())
    }
}

impl<T: Element, const N: usize> ArrayLike for [T; N] {
    type Elem = T;

    fn shape(&self) -> Cow<'_, [usize]> {
        Cow::Owned(vec![N])
    }

    fn elements(&self) -> Option<&[T]> {
        Some(self.as_slice())
    }
}

impl<A: ArrayLike + ?Sized> ArrayLike for &A {
    type Elem = A::Elem;

    fn shape(&self) -> Cow<'_, [usize]> {
        (**self).shape()
    }

    fn elements(&self) -> Option<&[A::Elem]> {
        (**self).elements()
    }
}

/// Dense n-dimensional array stored in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct Array<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T: Element> Array<T> {
    /// Create a one-dimensional array
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Create an array with an explicit shape
    ///
    /// Fails when the shape does not describe `data.len()` elements.
    pub fn from_shape_vec(shape: Vec<usize>, data: Vec<T>) -> Result<Self> {
        match element_count(&shape) {
            Some(count) if count == data.len() => Ok(Self { shape, data }),
            _ => Err(Error::UnsupportedArgumentType(format!(
                "shape {:?} does not describe {} elements",
                shape,
                data.len()
            ))),
        }
    }

    /// Array of `value` repeated over `shape`
    pub fn full(shape: Vec<usize>, value: T) -> Result<Self> {
        let count = element_count(&shape).ok_or_else(|| {
            Error::UnsupportedArgumentType(format!("shape {:?} overflows usize", shape))
        })?;
        Ok(Self {
            shape,
            data: vec![value; count],
        })
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the array holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements in row-major order
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable elements in row-major order
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Reinterpret the elements with a new shape of the same size
    pub fn reshape(self, shape: Vec<usize>) -> Result<Self> {
        Self::from_shape_vec(shape, self.data)
    }

    /// Consume the array, returning its elements
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Element> ArrayLike for Array<T> {
    type Elem = T;

    fn shape(&self) -> Cow<'_, [usize]> {
        Cow::Borrowed(&self.shape)
    }

    fn elements(&self) -> Option<&[T]> {
        Some(&self.data)
    }
}

impl<T: Element> From<Vec<T>> for Array<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

/// Product of the dimensions, `None` on overflow
pub(crate) fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}
