//! In-memory layouts of the inspected containers

/// Header layout of copy-on-write storage. The element count and the
/// reference count sit just before the first element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CowDataLayout {
    /// `[ref_count: u64][size: u64][elements...]`
    #[default]
    V1,
}

impl CowDataLayout {
    /// Member path of the data pointer inside a `Vector<T>`
    pub fn data_member(&self) -> &'static [&'static str] {
        match self {
            CowDataLayout::V1 => &["_cowdata", "_ptr"],
        }
    }

    /// Bytes between the element count and the data pointer
    pub fn size_offset(&self) -> u64 {
        match self {
            CowDataLayout::V1 => 8,
        }
    }

    /// Bytes between the reference count and the data pointer
    pub fn ref_count_offset(&self) -> u64 {
        match self {
            CowDataLayout::V1 => 16,
        }
    }
}

/// Count and data members of a plain counted array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayFields {
    pub count: &'static str,
    pub data: &'static str,
}

impl ArrayFields {
    pub const LOCAL_VECTOR: ArrayFields = ArrayFields { count: "count", data: "data" };
    pub const VECTOR_VIEW: ArrayFields = ArrayFields { count: "_size", data: "_ptr" };
}
