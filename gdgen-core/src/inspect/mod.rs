// Debugger Container Inspectors
//
// Synthetic child providers and summaries for the engine's containers as
// seen by a debugger. The debugger's object model is reached through the
// `DebugValue` and `MemoryReader` traits so the providers can run against
// a live process or a captured memory snapshot alike.

pub mod category;
pub mod layout;
pub mod memory;
pub mod providers;
pub mod summary;


use thiserror::Error;

pub use category::{CATEGORY_NAME, FormatterCategory, InspectorKind};
pub use layout::{ArrayFields, CowDataLayout};
pub use memory::{MemoryReader, MemorySnapshot};
pub use providers::{CountedArrayProvider, VectorProvider};
pub use summary::Summary;

/// Failures while resolving a debugged value. Providers never let these
/// escape; they degrade to an empty container instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InspectError {
    #[error("no member '{0}'")]
    MissingMember(String),

    #[error("no template argument {0}")]
    MissingTemplateArgument(usize),

    #[error("cannot read {len} bytes at {address:#x}")]
    UnreadableMemory { address: u64, len: usize },

    #[error("address arithmetic overflows at {0:#x}")]
    AddressOverflow(u64),

    #[error("value '{0}' cannot be shown as a string")]
    NotAString(String),

    #[error("summary needs a synthetic provider")]
    NoSyntheticProvider,
}

/// Name and size of a debugged type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: String,
    pub byte_size: u64,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>, byte_size: u64) -> Self {
        Self { name: name.into(), byte_size }
    }

    /// `unsigned long long`, the type of the metadata children
    pub fn u64() -> Self {
        Self::new("unsigned long long", 8)
    }
}

/// A child value created at an address, read lazily
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub name: String,
    pub address: u64,
    pub type_info: TypeInfo,
}

impl Child {
    /// Read the child as an 8-byte unsigned value
    pub fn read_u64(&self, memory: &dyn MemoryReader) -> Result<u64, InspectError> {
        memory.read_u64(self.address)
    }
}

/// A value in the debugged program
pub trait DebugValue {
    fn type_name(&self) -> &str;

    /// Type of the `index`th template argument
    fn template_argument(&self, index: usize) -> Option<TypeInfo>;

    /// Unsigned (or pointer) value of a nested member, e.g.
    /// `["_cowdata", "_ptr"]`
    fn member_unsigned(&self, path: &[&str]) -> Result<u64, InspectError>;

    /// Memory of the process this value lives in
    fn memory(&self) -> &dyn MemoryReader;

    /// Type pointed to by a pointer member, when the debugger knows it
    fn member_pointee(&self, _path: &[&str]) -> Option<TypeInfo> {
        None
    }

    /// String behind a pointer member, decoded with the width of the
    /// pointee type (`char32_t` for `String`, `char` for `CharString`). An
    /// unknown pointee is read as UTF-8 and a null pointer is the empty
    /// string.
    fn member_string(&self, path: &[&str]) -> Result<String, InspectError> {
        let address = self.member_unsigned(path)?;
        if address == 0 {
            return Ok(String::new());
        }
        let width = self.member_pointee(path).map_or(1, |t| t.byte_size);
        let unit = usize::try_from(width)
            .map_err(|_| InspectError::NotAString(format!("{}-byte characters", width)))?;
        self.memory().read_string_units(address, unit)
    }
}

/// Synthetic children of a container value
pub trait SyntheticProvider {
    /// Re-read the container. Returns false when the value could not be
    /// resolved, in which case the container has no children.
    fn update(&mut self, value: &dyn DebugValue) -> bool;

    fn num_children(&self) -> usize;

    /// Index of a child called `[n]` (or a metadata child name)
    fn child_index(&self, name: &str) -> Option<usize>;

    fn child_at_index(&self, index: usize) -> Option<Child>;

    fn has_children(&self) -> bool {
        self.num_children() > 0
    }
}

/// `[12]` -> 12
pub(crate) fn parse_element_name(name: &str) -> Option<usize> {
    name.trim_start_matches('[').trim_end_matches(']').parse().ok()
}
