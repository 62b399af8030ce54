/// Identity of an element across frames.
///
/// Retained state (scroll offsets, previous boxes, hover) is keyed by it, so
/// an element must hash to the same id every frame to keep that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId {
    pub id: u32,
    pub offset: u32,
    pub base_id: u32,
}

impl ElementId {
    /// Creates an id from `label`
    #[inline]
    pub fn new(label: &str) -> ElementId {
        hash_string(label, 0)
    }

    /// Creates an id from `label` and `index`, for elements generated in a loop
    #[inline]
    pub fn new_index(label: &str, index: u32) -> ElementId {
        hash_string_with_offset(label, index, 0)
    }

    /// Like [`ElementId::new_index`], scoped under `parent` so equal labels in
    /// different subtrees do not collide.
    #[inline]
    pub fn new_index_with_parent(label: &str, index: u32, parent: ElementId) -> ElementId {
        hash_string_with_offset(label, index, parent.id)
    }
}

impl From<&str> for ElementId {
    fn from(label: &str) -> Self {
        ElementId::new(label)
    }
}

impl From<(&str, u32)> for ElementId {
    fn from((label, index): (&str, u32)) -> Self {
        ElementId::new_index(label, index)
    }
}

pub fn hash_string(key: &str, seed: u32) -> ElementId {
    let mut hash: u32 = seed;
    for b in key.bytes() {
        hash = hash.wrapping_add(b as u32);
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    ElementId {
        id: hash.wrapping_add(1),
        offset: 0,
        base_id: hash.wrapping_add(1),
    }
}

pub fn hash_string_with_offset(key: &str, offset: u32, seed: u32) -> ElementId {
    let mut base: u32 = seed;
    for b in key.bytes() {
        base = base.wrapping_add(b as u32);
        base = base.wrapping_add(base << 10);
        base ^= base >> 6;
    }
    let mut hash = base;
    hash = hash.wrapping_add(offset);
    hash = hash.wrapping_add(hash << 10);
    hash ^= hash >> 6;

    hash = hash.wrapping_add(hash << 3);
    base = base.wrapping_add(base << 3);
    hash ^= hash >> 11;
    base ^= base >> 11;
    hash = hash.wrapping_add(hash << 15);
    base = base.wrapping_add(base << 15);
    ElementId {
        id: hash.wrapping_add(1),
        offset,
        base_id: base.wrapping_add(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable() {
        assert_eq!(ElementId::new("sidebar"), ElementId::new("sidebar"));
        assert_ne!(ElementId::new("sidebar"), ElementId::new("content"));
    }

    #[test]
    fn indexed_ids_share_base() {
        let a = ElementId::new_index("row", 0);
        let b = ElementId::new_index("row", 1);
        assert_ne!(a.id, b.id);
        assert_eq!(a.base_id, b.base_id);
        assert_eq!(b.offset, 1);
    }

    #[test]
    fn parent_scopes_ids() {
        let left = ElementId::new("left");
        let right = ElementId::new("right");
        assert_ne!(
            ElementId::new_index_with_parent("button", 0, left),
            ElementId::new_index_with_parent("button", 0, right)
        );
    }
}
