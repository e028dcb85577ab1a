/// Optional native capabilities a codec may depend on.
///
/// A closed enumeration: codecs are never discovered dynamically, so the set
/// of probeable capabilities is fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Zstandard support in the running build.
    Zstd,
}

/// Runtime check for whether an optional codec capability is present.
///
/// Implementations must be pure, cheap, and repeatable: the registry may
/// probe once per configuration-form render and once per store construction.
/// A missing capability is a normal `false`, never an error.
///
/// The production implementation lives with the codec crate (it knows the
/// compiled feature set); tests inject fixed probes to simulate an absent
/// capability deterministically.
pub trait CapabilityProbe: Send + Sync {
    fn has(&self, capability: Capability) -> bool;
}
