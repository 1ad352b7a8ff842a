use crate::segment::SegmentId;

/// Identity set of segment ids, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SegmentCollection {
    members: Vec<SegmentId>,
}

impl SegmentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the id was already a member.
    pub fn insert(&mut self, id: SegmentId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.members.push(id);
        true
    }

    pub fn remove(&mut self, id: SegmentId) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != id);
        self.members.len() != before
    }

    pub fn contains(&self, id: SegmentId) -> bool {
        self.members.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.members.iter().copied()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.members.len()
    }
}
