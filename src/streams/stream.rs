use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::io::Error;

/// Pull-based source of observations sharing one [`InstanceHeader`].
///
/// Finite sources report `false` from [`Stream::has_more_instances`] once
/// exhausted, after which [`Stream::next_instance`] returns `None`. Generators
/// may be unbounded.
pub trait Stream {
    fn header(&self) -> &InstanceHeader;

    fn has_more_instances(&self) -> bool;

    fn next_instance(&mut self) -> Option<Box<dyn Instance>>;

    /// Rewinds to the first observation. Seeded generators replay the same
    /// sequence.
    fn restart(&mut self) -> Result<(), Error>;
}
