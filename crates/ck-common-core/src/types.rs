//! Type tags shared across the Chalk runtime.

use num_enum::TryFromPrimitive;

/// Object kind - the runtime classification of heap objects.
///
/// Every heap allocation carries exactly one of these. Host code never sees
/// them directly; it sees the coarser [`ApiType`] obtained through
/// [`ObjectKind::api_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum ObjectKind {
    Class = 0,
    Closure = 1,
    Dict = 2,
    Fiber = 3,
    Foreign = 4,
    Function = 5,
    Instance = 6,
    List = 7,
    Module = 8,
    Range = 9,
    String = 10,
    Upvalue = 11,
}

impl ObjectKind {
    /// Number of object kinds.
    pub const COUNT: usize = 12;

    /// Create an ObjectKind from its u8 representation.
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// The public type tag for objects of this kind.
    #[inline]
    pub fn api_type(self) -> ApiType {
        API_OBJECT_TYPES[self as usize]
    }
}

/// Host-visible type of a stack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum ApiType {
    Null = 0,
    Integer = 1,
    String = 2,
    List = 3,
    Dict = 4,
    Function = 5,
    Object = 6,
}

/// Mapping from internal object kind to API type, indexed by `ObjectKind as usize`.
///
/// Only closures are callable from the host, so a bare `Function` reports as
/// a generic object.
pub const API_OBJECT_TYPES: [ApiType; ObjectKind::COUNT] = [
    ApiType::Object,   // Class
    ApiType::Function, // Closure
    ApiType::Dict,     // Dict
    ApiType::Object,   // Fiber
    ApiType::Object,   // Foreign
    ApiType::Object,   // Function
    ApiType::Object,   // Instance
    ApiType::List,     // List
    ApiType::Object,   // Module
    ApiType::Object,   // Range
    ApiType::String,   // String
    ApiType::Object,   // Upvalue
];
