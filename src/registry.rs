//! Codec lookup by type.
//!
//! Codecs are plain values and are usually passed around directly. When the codec for a type has
//! to be chosen at runtime, for example by a generic loader that only knows the row type, a
//! [`CodecRegistry`] maps types to the codecs registered for them.
//!
//! ```
//! use ironcsv::{cell, CellCodec, CodecRegistry};
//! use ironcsv::cell::CellDecoder;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut registry = CodecRegistry::with_defaults();
//! registry.register(cell::option(cell::i64()));
//!
//! let codec: CellCodec<Option<i64>> = registry.require()?;
//! assert_eq!(codec.decode(""), Ok(None));
//! assert!(registry.get::<std::net::Ipv4Addr>().is_none());
//! # Ok(())
//! # }
//! ```

use crate::cell::{self, CellCodec};
use crate::row::RowCodec;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

/// A lightweight runtime type identifier.
///
/// ```
/// use ironcsv::registry::TypeTag;
/// let tag = TypeTag::of::<u32>();
/// assert_eq!(tag.name, "u32");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    pub id: TypeId,
    /// Readable type name (best-effort).
    pub name: &'static str,
}

impl TypeTag {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type Entry = Box<dyn Any + Send + Sync>;

/// Cell and row codecs indexed by the type they convert.
///
/// Registering a codec for a type that already has one replaces it.
#[derive(Default)]
pub struct CodecRegistry {
    cells: HashMap<TypeTag, Entry>,
    rows: HashMap<TypeTag, Entry>,
}

macro_rules! register_builtins {
    ($registry:ident: $($ctor:ident),+ $(,)?) => {
        $( $registry.register(cell::$ctor()); )+
    };
}

impl CodecRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in cell codecs for the primitive types and `String`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        register_builtins!(registry:
            i8, i16, i32, i64, i128, isize,
            u8, u16, u32, u64, u128, usize,
            f32, f64, bool, char, string, unit,
        );
        registry
    }

    /// Register the cell codec for `A`, returning the one it replaces.
    pub fn register<A: 'static>(&mut self, codec: CellCodec<A>) -> Option<CellCodec<A>> {
        self.cells
            .insert(TypeTag::of::<A>(), Box::new(codec))
            .and_then(|old| old.downcast::<CellCodec<A>>().ok())
            .map(|old| *old)
    }

    /// Register the row codec for `A`, returning the one it replaces.
    pub fn register_row<A: 'static>(&mut self, codec: RowCodec<A>) -> Option<RowCodec<A>> {
        self.rows
            .insert(TypeTag::of::<A>(), Box::new(codec))
            .and_then(|old| old.downcast::<RowCodec<A>>().ok())
            .map(|old| *old)
    }

    /// The cell codec registered for `A`, if any.
    pub fn get<A: 'static>(&self) -> Option<CellCodec<A>> {
        self.cells
            .get(&TypeTag::of::<A>())
            .and_then(|entry| entry.downcast_ref::<CellCodec<A>>())
            .cloned()
    }

    /// The row codec registered for `A`. Falls back to a one-column row over the cell codec.
    pub fn get_row<A: 'static>(&self) -> Option<RowCodec<A>> {
        self.rows
            .get(&TypeTag::of::<A>())
            .and_then(|entry| entry.downcast_ref::<RowCodec<A>>())
            .cloned()
            .or_else(|| self.get::<A>().map(RowCodec::from))
    }

    /// Like [`get`](Self::get), but a missing codec is an error.
    ///
    /// # Errors
    /// Returns an error naming `A` if no cell codec is registered for it.
    pub fn require<A: 'static>(&self) -> anyhow::Result<CellCodec<A>> {
        self.get::<A>()
            .ok_or_else(|| anyhow::anyhow!("no cell codec registered for {}", TypeTag::of::<A>()))
    }

    /// Like [`get_row`](Self::get_row), but a missing codec is an error.
    ///
    /// # Errors
    /// Returns an error naming `A` if neither a row nor a cell codec is registered for it.
    pub fn require_row<A: 'static>(&self) -> anyhow::Result<RowCodec<A>> {
        self.get_row::<A>()
            .ok_or_else(|| anyhow::anyhow!("no row codec registered for {}", TypeTag::of::<A>()))
    }

    pub fn contains<A: 'static>(&self) -> bool {
        let tag = TypeTag::of::<A>();
        self.cells.contains_key(&tag) || self.rows.contains_key(&tag)
    }

    /// Types with a registered cell or row codec, in no particular order.
    pub fn types(&self) -> impl Iterator<Item = TypeTag> + '_ {
        self.cells.keys().chain(self.rows.keys()).copied()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("cells", &self.cells.keys().map(|t| t.name).collect::<Vec<_>>())
            .field("rows", &self.rows.keys().map(|t| t.name).collect::<Vec<_>>())
            .finish()
    }
}
