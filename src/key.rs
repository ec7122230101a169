//! Integral key types used to address slots.

use core::fmt::Debug;
use core::hash::Hash;

/// A key that addresses a slot by position.
///
/// Keys are born from slot positions (`from_index`) and turned back into
/// positions on lookup (`to_index`). A value that cannot be represented,
/// such as a negative signed key, maps to `None` and is treated as absent.
pub trait Key: Copy + Ord + Hash + Debug {
    /// Convert a slot position into a key, or `None` if it does not fit.
    fn from_index(index: usize) -> Option<Self>;

    /// Convert a key back into a slot position.
    fn to_index(self) -> Option<usize>;
}

macro_rules! impl_key_for_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl Key for $t {
                #[inline]
                fn from_index(index: usize) -> Option<Self> {
                    <$t>::try_from(index).ok()
                }

                #[inline]
                fn to_index(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }
            }
        )*
    };
}

impl_key_for_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64);

/// Declare newtype keys backed by a primitive integer.
///
/// ```
/// id_bimap::new_key_type! {
///     /// Identifies an interned symbol.
///     pub struct SymbolId(u32);
/// }
///
/// let mut symbols: id_bimap::IdBimap<String, SymbolId> = id_bimap::IdBimap::new();
/// let (id, _) = symbols.insert("main".to_string());
/// assert_eq!(id, SymbolId(0));
/// ```
#[macro_export]
macro_rules! new_key_type {
    ( $(#[$outer:meta])* $vis:vis struct $name:ident($repr:ty); $($rest:tt)* ) => {
        $(#[$outer])*
        #[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        $vis struct $name(pub $repr);

        impl $crate::Key for $name {
            #[inline]
            fn from_index(index: usize) -> Option<Self> {
                <$repr as $crate::Key>::from_index(index).map($name)
            }

            #[inline]
            fn to_index(self) -> Option<usize> {
                <$repr as $crate::Key>::to_index(self.0)
            }
        }

        $crate::new_key_type!($($rest)*);
    };

    () => {};
}
