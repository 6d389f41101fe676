//! Null markers for the values of a fixed-width block.

use strata_shared_vec::SharedVec;

/// Null markers for the values of a block.
///
/// This enum provides three different storage methods for tracking null/non-null values:
/// - `Trivial`: All values are valid (non-null), no per-position storage
/// - `Nulls`: All values are null, no per-position storage
/// - `Bytes`: Mixed null/non-null values using a byte per position (1=present, 0=null)
///
/// Every constructor that copies markers ([`Presence::copy_range`], [`Presence::gather`],
/// [`PresenceBuilder::build`]) normalizes uniform byte runs back into `Trivial` or `Nulls`,
/// so `is_trivial_all_null()` is exact for those results.
#[derive(Debug, Clone)]
pub enum Presence {
    /// All values are valid (present).
    Trivial(usize),

    /// All values are null.
    Nulls(usize),

    /// Presence encoded as byte array, where a byte at position `i` indicates whether
    /// the value at position `i` is valid or not (`1` - value is present, `0` - value
    /// is null).
    Bytes(SharedVec<u8>),
}

impl Presence {
    /// Classifies a run of presence bytes into the most compact representation.
    pub fn from_bytes(bytes: Vec<u8>) -> Presence {
        if bytes.iter().all(|&b| b != 0) {
            Presence::Trivial(bytes.len())
        } else if bytes.iter().all(|&b| b == 0) {
            Presence::Nulls(bytes.len())
        } else {
            Presence::Bytes(SharedVec::from_vec(bytes))
        }
    }

    /// Returns the number of positions tracked by this presence.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Trivial(len) => *len,
            Self::Nulls(len) => *len,
            Self::Bytes(presence) => presence.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of null values in this `Presence`.
    pub fn count_nulls(&self) -> usize {
        match self {
            Self::Trivial(_) => 0,
            Self::Nulls(len) => *len,
            Self::Bytes(presence) => presence.iter().filter(|&&b| b == 0).count(),
        }
    }

    /// Returns `true` if all values are null.
    #[inline]
    pub fn is_trivial_all_null(&self) -> bool {
        matches!(self, Self::Nulls(_))
    }

    /// Returns `true` if this presence is empty or in `Nulls` form.
    ///
    /// Exact for normalized presences; a `Bytes` presence is never reported as all-null.
    #[inline]
    pub fn is_all_null(&self) -> bool {
        self.is_empty() || self.is_trivial_all_null()
    }

    /// Returns `true` if the value at the specified index is null.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds of a `Bytes` presence. Callers validate
    /// positions against the owning block first.
    #[inline]
    pub fn is_null(&self, index: usize) -> bool {
        match self {
            Self::Trivial(_) => false,
            Self::Nulls(_) => true,
            Self::Bytes(presence) => presence[index] == 0,
        }
    }

    /// Returns `true` if every position in `offset..offset + len` is null.
    ///
    /// An empty range is vacuously all-null.
    pub fn is_range_all_null(&self, offset: usize, len: usize) -> bool {
        match self {
            Self::Trivial(_) => len == 0,
            Self::Nulls(_) => true,
            Self::Bytes(presence) => presence[offset..offset + len].iter().all(|&b| b == 0),
        }
    }

    /// Returns a presence for `offset..offset + len` that shares the marker bytes
    /// with `self` when they are still needed.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the length of this presence.
    pub fn slice(&self, offset: usize, len: usize) -> Presence {
        assert!(offset + len <= self.len());
        match self {
            Presence::Trivial(_) => Presence::Trivial(len),
            Presence::Nulls(_) => Presence::Nulls(len),
            Presence::Bytes(bytes) => {
                let range = &bytes[offset..offset + len];
                if range.iter().all(|&b| b != 0) {
                    Presence::Trivial(len)
                } else if range.iter().all(|&b| b == 0) {
                    Presence::Nulls(len)
                } else {
                    Presence::Bytes(bytes.slice(offset..offset + len))
                }
            }
        }
    }

    /// Creates an independent presence for `offset..offset + len`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the length of this presence.
    pub fn copy_range(&self, offset: usize, len: usize) -> Presence {
        assert!(offset + len <= self.len());
        match self {
            Presence::Trivial(_) => Presence::Trivial(len),
            Presence::Nulls(_) => Presence::Nulls(len),
            Presence::Bytes(bytes) => Presence::from_bytes(bytes[offset..offset + len].to_vec()),
        }
    }

    /// Creates an independent presence holding the markers at `indices`, in order.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds of a `Bytes` presence.
    pub fn gather(&self, indices: &[usize]) -> Presence {
        match self {
            Presence::Trivial(_) => Presence::Trivial(indices.len()),
            Presence::Nulls(_) => Presence::Nulls(indices.len()),
            Presence::Bytes(bytes) => {
                Presence::from_bytes(indices.iter().map(|&i| bytes[i]).collect())
            }
        }
    }

    /// Returns the identity and size of the marker buffer, if one is allocated.
    pub fn buffer_part(&self) -> Option<(usize, usize)> {
        match self {
            Presence::Bytes(bytes) => Some((bytes.allocation_id(), bytes.retained_size_in_bytes())),
            _ => None,
        }
    }

    /// Memory retained by the marker buffer (zero for the trivial forms).
    pub fn retained_size_in_bytes(&self) -> usize {
        self.buffer_part().map_or(0, |(_, size)| size)
    }
}

impl PartialEq for Presence {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Trivial(left), Self::Trivial(right)) => left == right,
            (Self::Nulls(left), Self::Nulls(right)) => left == right,
            (Self::Bytes(left), Self::Bytes(right)) => left.as_slice() == right.as_slice(),
            _ => false,
        }
    }
}

impl Default for Presence {
    fn default() -> Self {
        Presence::Trivial(0)
    }
}

/// A builder for the [`Presence`] markers of a block under construction.
///
/// Starts empty and stays in a run-length form (`Trivial` or `Nulls`) for as long as
/// every appended entry has the same nullness; the first mixed entry materializes
/// one marker byte per position.
#[derive(Debug, Clone)]
pub struct PresenceBuilder {
    state: BuilderState,
}

#[derive(Debug, Clone)]
enum BuilderState {
    Trivial(usize),
    Nulls(usize),
    Bytes(Vec<u8>),
}

impl PresenceBuilder {
    pub fn new() -> Self {
        Self {
            state: BuilderState::Trivial(0),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match &self.state {
            BuilderState::Trivial(len) => *len,
            BuilderState::Nulls(len) => *len,
            BuilderState::Bytes(bytes) => bytes.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` while no non-null entry has been added (including when empty).
    #[inline]
    pub fn is_all_null(&self) -> bool {
        match &self.state {
            BuilderState::Trivial(len) => *len == 0,
            BuilderState::Nulls(_) => true,
            BuilderState::Bytes(_) => false,
        }
    }

    pub fn add_null(&mut self) {
        match &mut self.state {
            BuilderState::Trivial(len) => {
                if *len > 0 {
                    let mut bytes = Vec::with_capacity(*len + 1);
                    bytes.resize(*len, 1);
                    bytes.push(0);
                    self.state = BuilderState::Bytes(bytes);
                } else {
                    self.state = BuilderState::Nulls(1);
                }
            }
            BuilderState::Nulls(len) => *len += 1,
            BuilderState::Bytes(bytes) => bytes.push(0),
        }
    }

    pub fn add_non_null(&mut self) {
        match &mut self.state {
            BuilderState::Trivial(len) => *len += 1,
            BuilderState::Nulls(len) => {
                let mut bytes = Vec::with_capacity(*len + 1);
                bytes.resize(*len, 0);
                bytes.push(1);
                self.state = BuilderState::Bytes(bytes);
            }
            BuilderState::Bytes(bytes) => bytes.push(1),
        }
    }

    /// Returns `true` if the entry at `index` is null.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds of a mixed builder.
    #[inline]
    pub fn is_null(&self, index: usize) -> bool {
        match &self.state {
            BuilderState::Trivial(_) => false,
            BuilderState::Nulls(_) => true,
            BuilderState::Bytes(bytes) => bytes[index] == 0,
        }
    }

    /// Creates an independent presence for `offset..offset + len`.
    pub fn copy_range(&self, offset: usize, len: usize) -> Presence {
        assert!(offset + len <= self.len());
        match &self.state {
            BuilderState::Trivial(_) => Presence::Trivial(len),
            BuilderState::Nulls(_) => Presence::Nulls(len),
            BuilderState::Bytes(bytes) => Presence::from_bytes(bytes[offset..offset + len].to_vec()),
        }
    }

    /// Creates an independent presence holding the markers at `indices`, in order.
    pub fn gather(&self, indices: &[usize]) -> Presence {
        match &self.state {
            BuilderState::Trivial(_) => Presence::Trivial(indices.len()),
            BuilderState::Nulls(_) => Presence::Nulls(indices.len()),
            BuilderState::Bytes(bytes) => {
                Presence::from_bytes(indices.iter().map(|&i| bytes[i]).collect())
            }
        }
    }

    pub fn retained_size_in_bytes(&self) -> usize {
        match &self.state {
            BuilderState::Bytes(bytes) => bytes.capacity(),
            _ => 0,
        }
    }

    /// Consumes this builder and returns the presence.
    pub fn build(self) -> Presence {
        match self.state {
            BuilderState::Trivial(len) => Presence::Trivial(len),
            BuilderState::Nulls(len) => Presence::Nulls(len),
            BuilderState::Bytes(bytes) => Presence::from_bytes(bytes),
        }
    }
}

impl Default for PresenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
