/// Failures raised by operations on the geometric substrate.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum GeometryError {
    /// A split would push a polygon past its fixed side capacity.
    #[error("polygon cannot have more than 15 sides")]
    TooManySides,
    /// The clipping polygon is a point or a line.
    #[error("clipping polygon must have at least 3 sides")]
    DegenerateClipper,
    /// A polygon taking part in clipping has no bounding box (no sides).
    #[error("cannot clip an incomplete primitive")]
    IncompletePrimitive,
    /// Vertices were marked as used after the most recent duplicate scan,
    /// so renumbering could keep a duplicate and drop its representative.
    #[error("vertices were marked after the last duplicate scan")]
    StaleDuplicates,
}

/// Failures raised by the clip driver.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClipError {
    /// The split budget ([`MAX_SPLITS`](crate::clip::MAX_SPLITS)) was
    /// exhausted, which indicates a pathological input. The groups are left
    /// in an intermediate but internally consistent state; the caller must
    /// discard the result.
    #[error("aborted polygon clipping after {0} splits")]
    TooManySplits(u32),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
