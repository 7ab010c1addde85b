//! Type-erased index keys.
//!
//! Join indexes and group maps are shared by pipelines over arbitrary
//! types, so the values they are keyed on are erased behind [`EqKey`] and
//! [`OrdKey`]. Keys of different concrete types never compare equal.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Object-safe equality and hashing.
pub trait DynKey: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn DynKey) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T> DynKey for T
where
    T: Eq + Hash + Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn DynKey) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

/// Hashable key for equality indexes and group maps.
///
/// ```
/// use reteforge_scoring::graph::EqKey;
///
/// assert_eq!(EqKey::new(3_u32), EqKey::new(3_u32));
/// assert_ne!(EqKey::new(3_u32), EqKey::new(4_u32));
/// // Same value, different type
/// assert_ne!(EqKey::new(3_u32), EqKey::new(3_u64));
/// ```
#[derive(Clone)]
pub struct EqKey(Arc<dyn DynKey>);

impl EqKey {
    pub fn new<T>(value: T) -> Self
    where
        T: Eq + Hash + Debug + Send + Sync + 'static,
    {
        Self(Arc::new(value))
    }

    /// Attempts to downcast to the concrete key type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        let key: &dyn DynKey = self.0.as_ref();
        key.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for EqKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

impl Eq for EqKey {}

impl Hash for EqKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

impl Debug for EqKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}

/// Object-safe total ordering.
pub trait DynOrd: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn dyn_cmp(&self, other: &dyn DynOrd) -> Ordering;
}

impl<T> DynOrd for T
where
    T: Ord + Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_cmp(&self, other: &dyn DynOrd) -> Ordering {
        match other.as_any().downcast_ref::<T>() {
            Some(other) => self.cmp(other),
            // Keys of different types sort by type so the order stays total.
            None => TypeId::of::<T>().cmp(&other.as_any().type_id()),
        }
    }
}

/// Ordered key for range indexes.
///
/// ```
/// use reteforge_scoring::graph::OrdKey;
///
/// assert!(OrdKey::new(1_i64) < OrdKey::new(2_i64));
/// assert_eq!(OrdKey::new("a"), OrdKey::new("a"));
/// ```
#[derive(Clone)]
pub struct OrdKey(Arc<dyn DynOrd>);

impl OrdKey {
    pub fn new<T>(value: T) -> Self
    where
        T: Ord + Debug + Send + Sync + 'static,
    {
        Self(Arc::new(value))
    }

    /// The single key used when a join has no indexed comparison.
    pub(crate) fn unit() -> Self {
        Self::new(())
    }
}

impl PartialEq for OrdKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrdKey {}

impl PartialOrd for OrdKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.dyn_cmp(other.0.as_ref())
    }
}

impl Debug for OrdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}
