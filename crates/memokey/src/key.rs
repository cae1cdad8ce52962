//! Array keys, argument keys and call keys
//!
//! An [`ArrayKey`] owns a copy of the array contents, so mutating the
//! source array after the key was taken never changes the stored key.

use std::any::Any;
use std::fmt;
use std::hash::Hash;

use ahash::RandomState;

use crate::array::{element_count, Array, ArrayLike, Element, ElementType};
use crate::error::{Error, Result};

/// Seeds for [`ArrayKey::fingerprint`]
const FINGERPRINT_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Content-derived key for an array argument
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ArrayKey {
    shape: Box<[usize]>,
    element_type: ElementType,
    bytes: Box<[u8]>,
}

impl ArrayKey {
    /// Derive a key from the current contents of `array`
    ///
    /// Reads every element once. Floats are keyed by bit pattern.
    ///
    /// # Errors
    /// * `UnsupportedArgumentType` - no contiguous storage, or the shape
    ///   does not describe the element count
    pub fn derive<A: ArrayLike + ?Sized>(array: &A) -> Result<Self> {
        let element_type = <A::Elem as Element>::TYPE;
        let elements = array.elements().ok_or_else(|| {
            Error::UnsupportedArgumentType(format!(
                "{} array without contiguous element storage",
                element_type
            ))
        })?;

        let shape = array.shape();
        if element_count(&shape) != Some(elements.len()) {
            return Err(Error::UnsupportedArgumentType(format!(
                "shape {:?} does not describe {} elements",
                shape,
                elements.len()
            )));
        }

        let mut bytes = Vec::with_capacity(elements.len() * element_type.size());
        for &elem in elements {
            elem.write_le(&mut bytes);
        }

        Ok(Self {
            shape: shape.into_owned().into_boxed_slice(),
            element_type,
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Derive a key from a value whose type is only known at runtime
    ///
    /// Accepts `Vec<T>` and [`Array<T>`] for every supported element type.
    pub fn from_any(value: &dyn Any) -> Result<Self> {
        macro_rules! try_downcast {
            ($($ty:ty),*) => {
                $(
                    if let Some(v) = value.downcast_ref::<Vec<$ty>>() {
                        return Self::derive(v);
                    }
                    if let Some(a) = value.downcast_ref::<Array<$ty>>() {
                        return Self::derive(a);
                    }
                )*
            };
        }
        try_downcast!(f64, f32, i64, i32, i16, i8, u64, u32, u16, u8);

        Err(Error::UnsupportedArgumentType(
            "value is not a numeric array".to_string(),
        ))
    }

    /// Dimensions of the source array
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Element type of the source array
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Copied contents, little-endian
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 64-bit hash of the key, stable across process runs of the same build
    pub fn fingerprint(&self) -> u64 {
        let [k0, k1, k2, k3] = FINGERPRINT_SEEDS;
        RandomState::with_seeds(k0, k1, k2, k3).hash_one(self)
    }
}

impl fmt::Debug for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayKey")
            .field("shape", &self.shape)
            .field("element_type", &self.element_type)
            .field("fingerprint", &format_args!("{:016x}", self.fingerprint()))
            .finish()
    }
}

/// Hashable form of a non-array call argument
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgKey {
    /// No arguments
    Unit,
    /// Boolean
    Bool(bool),
    /// Any primitive integer
    Int(i128),
    /// Character
    Char(char),
    /// String
    Str(Box<str>),
    /// Float by value, as `f64` bits with `-0.0` folded into `0.0`
    Float(u64),
    /// Optional argument
    Option(Option<Box<ArgKey>>),
    /// Positional sequence (tuples, vectors, slices)
    Seq(Box<[ArgKey]>),
    /// Keyword arguments sorted by name
    Named(Box<[(Box<str>, ArgKey)]>),
    /// Nested array argument
    Array(ArrayKey),
}

impl ArgKey {
    fn float(value: f64) -> Result<Self> {
        if value.is_nan() {
            return Err(Error::UnhashableArgument(
                "NaN is not equal to itself".to_string(),
            ));
        }
        // 0.0 == -0.0
        let value = if value == 0.0 { 0.0 } else { value };
        Ok(ArgKey::Float(value.to_bits()))
    }
}

/// Conversion of a call argument into an [`ArgKey`]
pub trait KeyPart {
    /// Key for this argument
    ///
    /// # Errors
    /// * `UnhashableArgument` - the value has no usable equality
    fn key_part(&self) -> Result<ArgKey>;
}

impl KeyPart for () {
    fn key_part(&self) -> Result<ArgKey> {
        Ok(ArgKey::Unit)
    }
}

impl KeyPart for bool {
    fn key_part(&self) -> Result<ArgKey> {
        Ok(ArgKey::Bool(*self))
    }
}

impl KeyPart for char {
    fn key_part(&self) -> Result<ArgKey> {
        Ok(ArgKey::Char(*self))
    }
}

macro_rules! impl_int_key_part {
    ($($ty:ty),*) => {
        $(
            impl KeyPart for $ty {
                fn key_part(&self) -> Result<ArgKey> {
                    Ok(ArgKey::Int(i128::from(*self)))
                }
            }
        )*
    };
}

impl_int_key_part!(i8, i16, i32, i64, u8, u16, u32, u64);

impl KeyPart for usize {
    fn key_part(&self) -> Result<ArgKey> {
        Ok(ArgKey::Int(*self as i128))
    }
}

impl KeyPart for isize {
    fn key_part(&self) -> Result<ArgKey> {
        Ok(ArgKey::Int(*self as i128))
    }
}

impl KeyPart for f64 {
    fn key_part(&self) -> Result<ArgKey> {
        ArgKey::float(*self)
    }
}

impl KeyPart for f32 {
    fn key_part(&self) -> Result<ArgKey> {
        ArgKey::float(f64::from(*self))
    }
}

impl KeyPart for str {
    fn key_part(&self) -> Result<ArgKey> {
        Ok(ArgKey::Str(self.into()))
    }
}

impl KeyPart for String {
    fn key_part(&self) -> Result<ArgKey> {
        self.as_str().key_part()
    }
}

impl<T: KeyPart + ?Sized> KeyPart for &T {
    fn key_part(&self) -> Result<ArgKey> {
        (**self).key_part()
    }
}

impl<T: KeyPart> KeyPart for Option<T> {
    fn key_part(&self) -> Result<ArgKey> {
        match self {
            Some(value) => Ok(ArgKey::Option(Some(Box::new(value.key_part()?)))),
            None => Ok(ArgKey::Option(None)),
        }
    }
}

impl<T: KeyPart> KeyPart for [T] {
    fn key_part(&self) -> Result<ArgKey> {
        let parts = self
            .iter()
            .map(KeyPart::key_part)
            .collect::<Result<Vec<_>>>()?;
        Ok(ArgKey::Seq(parts.into_boxed_slice()))
    }
}

impl<T: KeyPart> KeyPart for Vec<T> {
    fn key_part(&self) -> Result<ArgKey> {
        self.as_slice().key_part()
    }
}

macro_rules! impl_tuple_key_part {
    ($($name:ident),+) => {
        impl<$($name: KeyPart),+> KeyPart for ($($name,)+) {
            #[allow(non_snake_case)]
            fn key_part(&self) -> Result<ArgKey> {
                let ($($name,)+) = self;
                Ok(ArgKey::Seq(vec![$($name.key_part()?),+].into_boxed_slice()))
            }
        }
    };
}

impl_tuple_key_part!(A);
impl_tuple_key_part!(A, B);
impl_tuple_key_part!(A, B, C);
impl_tuple_key_part!(A, B, C, D);

impl KeyPart for ArrayKey {
    fn key_part(&self) -> Result<ArgKey> {
        Ok(ArgKey::Array(self.clone()))
    }
}

/// Keyword arguments taking part in a call key
///
/// Order of insertion does not matter; a repeated name replaces the
/// earlier value.
#[derive(Default)]
pub struct Kwargs<'a> {
    args: Vec<(&'a str, &'a dyn KeyPart)>,
}

impl<'a> Kwargs<'a> {
    /// Empty keyword set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a keyword argument
    pub fn with(mut self, name: &'a str, value: &'a dyn KeyPart) -> Self {
        match self.args.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.args.push((name, value)),
        }
        self
    }

    /// Number of keyword arguments
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if no keyword arguments were given
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl KeyPart for Kwargs<'_> {
    fn key_part(&self) -> Result<ArgKey> {
        let mut named = self
            .args
            .iter()
            .map(|(name, value)| -> Result<(Box<str>, ArgKey)> {
                Ok((Box::from(*name), value.key_part()?))
            })
            .collect::<Result<Vec<_>>>()?;
        named.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(ArgKey::Named(named.into_boxed_slice()))
    }
}

impl fmt::Debug for Kwargs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.args.iter().map(|(name, _)| name))
            .finish()
    }
}

/// Full lookup key of one memoized call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallKey {
    array: ArrayKey,
    rest: ArgKey,
}

impl CallKey {
    /// Combine a derived array key with the remaining arguments' key
    pub fn new(array: ArrayKey, rest: ArgKey) -> Self {
        Self { array, rest }
    }

    /// Derive the key for a call with `array` and trailing arguments `rest`
    ///
    /// The array is keyed first, so an unsupported array is reported even
    /// when the trailing arguments are also unhashable.
    pub fn derive<A, R>(array: &A, rest: &R) -> Result<Self>
    where
        A: ArrayLike + ?Sized,
        R: KeyPart + ?Sized,
    {
        let array = ArrayKey::derive(array)?;
        let rest = rest.key_part()?;
        Ok(Self { array, rest })
    }

    /// Array part of the key
    pub fn array(&self) -> &ArrayKey {
        &self.array
    }

    /// Trailing-argument part of the key
    pub fn rest(&self) -> &ArgKey {
        &self.rest
    }
}
