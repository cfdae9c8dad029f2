/// What to do when an added file collides with an existing entry of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Replace the existing entry with the new file.
    Overwrite,

    /// Keep the existing entry and do not write the new file.
    Skip,
}

/// A decision source for name collisions during an add.
///
/// [`Archive::add_paths`] consults this whenever a computed entry name already exists in the
/// archive. Interactive callers can prompt the operator; batch callers can supply a fixed policy.
/// Any closure with the right signature works:
///
/// ```
/// use sqlarbox::Resolution;
///
/// let mut always_skip = |_: &str| Resolution::Skip;
/// ```
///
/// [`Archive::add_paths`]: crate::Archive::add_paths
pub trait ResolveCollision {
    /// Decide what to do about an existing entry named `name`.
    fn resolve(&mut self, name: &str) -> Resolution;
}

impl<F> ResolveCollision for F
where
    F: FnMut(&str) -> Resolution + ?Sized,
{
    fn resolve(&mut self, name: &str) -> Resolution {
        self(name)
    }
}
