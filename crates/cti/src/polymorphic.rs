use crate::Instance;

use cti_core::Error;

/// Outcome of loading a row through a model that may stand for several
/// concrete types.
#[derive(Debug)]
pub enum Polymorphic {
    /// The model does not act as a superclass; the row is returned as is.
    Concrete(Instance),

    /// The row's discriminator named a type and the row was loaded through
    /// it.
    Resolved(Instance),

    /// The row could not be re-resolved and is returned typed as the
    /// superclass.
    Fallback {
        instance: Instance,
        reason: FallbackReason,
    },
}

#[derive(Debug)]
pub enum FallbackReason {
    /// The discriminator column is `Null` or blank
    NoDiscriminator,

    /// The discriminator names neither the model nor one of its subclasses
    UnknownType(String),

    /// Loading the row through the concrete type failed
    LookupFailed(Error),
}

impl Polymorphic {
    pub fn instance(&self) -> &Instance {
        match self {
            Polymorphic::Concrete(instance) | Polymorphic::Resolved(instance) => instance,
            Polymorphic::Fallback { instance, .. } => instance,
        }
    }

    pub fn into_instance(self) -> Instance {
        match self {
            Polymorphic::Concrete(instance) | Polymorphic::Resolved(instance) => instance,
            Polymorphic::Fallback { instance, .. } => instance,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Polymorphic::Resolved(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Polymorphic::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Polymorphic::Fallback { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
