//! Synthetic child providers for `Vector`, `LocalVector` and `VectorView`

use tracing::{debug, trace};

use super::layout::{ArrayFields, CowDataLayout};
use super::{Child, DebugValue, InspectError, SyntheticProvider, TypeInfo, parse_element_name};

/// Resolved element storage of a container
#[derive(Debug, Clone, PartialEq, Eq)]
struct Elements {
    count: usize,
    data: u64,
    element: TypeInfo,
}

impl Elements {
    fn child(&self, index: usize) -> Option<Child> {
        if index >= self.count {
            return None;
        }
        let offset = (index as u64).checked_mul(self.element.byte_size)?;
        Some(Child {
            name: format!("[{}]", index),
            address: self.data.checked_add(offset)?,
            type_info: self.element.clone(),
        })
    }
}

/// Elements must end inside the address space and leave room for the
/// metadata children
fn check_extent(count: usize, data: u64, element: &TypeInfo) -> Result<(), InspectError> {
    (count as u64)
        .checked_mul(element.byte_size)
        .and_then(|len| data.checked_add(len))
        .filter(|_| count.checked_add(2).is_some())
        .map(|_| ())
        .ok_or(InspectError::AddressOverflow(data))
}

fn element_type(value: &dyn DebugValue) -> Result<TypeInfo, InspectError> {
    value.template_argument(0).ok_or(InspectError::MissingTemplateArgument(0))
}

fn to_count(raw: u64) -> Result<usize, InspectError> {
    usize::try_from(raw).map_err(|_| InspectError::AddressOverflow(raw))
}

/// `LocalVector<T>` and `VectorView<T>`: a count member and a data pointer
#[derive(Debug, Clone)]
pub struct CountedArrayProvider {
    fields: ArrayFields,
    elements: Option<Elements>,
}

impl CountedArrayProvider {
    pub fn new(fields: ArrayFields) -> Self {
        Self { fields, elements: None }
    }

    pub fn local_vector() -> Self {
        Self::new(ArrayFields::LOCAL_VECTOR)
    }

    pub fn vector_view() -> Self {
        Self::new(ArrayFields::VECTOR_VIEW)
    }

    fn resolve(&self, value: &dyn DebugValue) -> Result<Elements, InspectError> {
        let count = to_count(value.member_unsigned(&[self.fields.count])?)?;
        let data = value.member_unsigned(&[self.fields.data])?;
        let element = element_type(value)?;
        check_extent(count, data, &element)?;
        Ok(Elements { count, data, element })
    }
}

impl SyntheticProvider for CountedArrayProvider {
    fn update(&mut self, value: &dyn DebugValue) -> bool {
        match self.resolve(value) {
            Ok(elements) => {
                trace!("{}: {} elements at {:#x}", value.type_name(), elements.count, elements.data);
                self.elements = Some(elements);
                true
            }
            Err(e) => {
                debug!("{}: {}", value.type_name(), e);
                self.elements = None;
                false
            }
        }
    }

    fn num_children(&self) -> usize {
        self.elements.as_ref().map_or(0, |e| e.count)
    }

    fn child_index(&self, name: &str) -> Option<usize> {
        parse_element_name(name)
    }

    fn child_at_index(&self, index: usize) -> Option<Child> {
        self.elements.as_ref()?.child(index)
    }
}

/// `Vector<T>`: copy-on-write storage whose size and reference count live
/// in a header before the elements. Non-empty vectors expose two extra
/// children, `size` and `ref_count`, after the elements.
#[derive(Debug, Clone, Default)]
pub struct VectorProvider {
    layout: CowDataLayout,
    elements: Option<Elements>,
}

impl VectorProvider {
    pub fn new(layout: CowDataLayout) -> Self {
        Self { layout, elements: None }
    }

    fn resolve(&self, value: &dyn DebugValue) -> Result<Option<Elements>, InspectError> {
        let data = value.member_unsigned(self.layout.data_member())?;
        let element = element_type(value)?;
        if data == 0 {
            return Ok(None);
        }

        let size_at =
            data.checked_sub(self.layout.size_offset()).ok_or(InspectError::AddressOverflow(data))?;
        let count = to_count(value.memory().read_u64(size_at)?)?;
        if count == 0 {
            return Ok(None);
        }
        check_extent(count, data, &element)?;
        Ok(Some(Elements { count, data, element }))
    }

    fn header_child(&self, name: &str, offset: u64) -> Option<Child> {
        let data = self.elements.as_ref()?.data;
        Some(Child { name: name.to_string(), address: data.checked_sub(offset)?, type_info: TypeInfo::u64() })
    }

    fn count(&self) -> usize {
        self.elements.as_ref().map_or(0, |e| e.count)
    }
}

impl SyntheticProvider for VectorProvider {
    fn update(&mut self, value: &dyn DebugValue) -> bool {
        match self.resolve(value) {
            Ok(elements) => {
                self.elements = elements;
                trace!("{}: {} elements", value.type_name(), self.count());
                true
            }
            Err(e) => {
                debug!("{}: {}", value.type_name(), e);
                self.elements = None;
                false
            }
        }
    }

    fn num_children(&self) -> usize {
        match self.count() {
            0 => 0,
            count => count.saturating_add(2),
        }
    }

    fn child_index(&self, name: &str) -> Option<usize> {
        match name {
            "size" => Some(self.count()),
            "ref_count" => self.count().checked_add(1),
            _ => parse_element_name(name),
        }
    }

    fn child_at_index(&self, index: usize) -> Option<Child> {
        let count = self.count();
        if count == 0 {
            None
        } else if index == count {
            self.header_child("size", self.layout.size_offset())
        } else if Some(index) == count.checked_add(1) {
            self.header_child("ref_count", self.layout.ref_count_offset())
        } else {
            self.elements.as_ref()?.child(index)
        }
    }
}
